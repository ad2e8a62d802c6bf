use corkboard::client::RestClient;
use corkboard::TaskStore;

// TODO: change this value with yours
pub const URL: &str = "http://localhost:5000/";

/// Initializes a store over the service, and runs an initial fetch
pub async fn initial_fetch() -> TaskStore<RestClient> {
    let client = RestClient::new(URL).unwrap();
    let mut store = TaskStore::new(client);

    println!("Fetching the task list from {} ...", URL);
    println!("Depending on your RUST_LOG value, you may see more or less details about what happens.");
    if store.fetch_all().await == false {
        log::warn!("The initial fetch did not complete, see the previous log lines for more info.");
    }

    println!("---- Tasks on the service -----");
    corkboard::utils::print_task_list(store.tasks());

    store
}
