use corkboard::client::RestClient;
use corkboard::settings::SERVER_URL;
use corkboard::store::feedback::feedback_channel;
use corkboard::TaskStore;

#[tokio::main]
async fn main() {
    env_logger::init();

    let client = RestClient::from_url(SERVER_URL.clone());
    let (sender, mut receiver) = feedback_channel();
    let mut store = TaskStore::new_with_feedback(client, sender);

    println!("---- fetching from {} -----", SERVER_URL.as_str());
    if store.fetch_all().await == false {
        log::error!("Unable to fetch: {:?}", store.error());
    }
    corkboard::utils::print_task_list(store.tasks());

    println!("---- what the store reported -----");
    while let Ok(event) = receiver.try_recv() {
        println!("  * {}", event);
    }
}
