//! Support for client configuration options

use once_cell::sync::Lazy;
use url::Url;

/// Environment variable that overrides the default service location
pub const SERVER_ENV_VAR: &str = "CORKBOARD_SERVER";

/// Where the task service listens by default (the address of a locally-run
/// development service)
pub const DEFAULT_SERVER: &str = "http://localhost:5000/";

/// The base URL of the task service: `$CORKBOARD_SERVER` when it is set to a
/// valid URL, [`DEFAULT_SERVER`] otherwise.
///
/// When overriding, keep a trailing slash after any path, so that endpoints
/// can be joined onto it.
pub static SERVER_URL: Lazy<Url> = Lazy::new(|| {
    match std::env::var(SERVER_ENV_VAR) {
        Ok(raw) => match Url::parse(&raw) {
            Ok(url) => url,
            Err(err) => {
                log::warn!("Invalid {} value {:?} ({}), falling back to {}", SERVER_ENV_VAR, raw, err, DEFAULT_SERVER);
                default_server_url()
            }
        },
        Err(_) => default_server_url(),
    }
});

fn default_server_url() -> Url {
    Url::parse(DEFAULT_SERVER).unwrap(/* the default is a valid URL */)
}
