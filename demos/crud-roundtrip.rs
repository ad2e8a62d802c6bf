//! This is an example of how corkboard can be used.
//! It creates a task on the service, marks it completed, then deletes it,
//! printing the task list at every step.

use chrono::{Duration, Utc};

use corkboard::utils::{pause, print_task_list};
use corkboard::{NewTask, Priority, TaskId};

mod shared;
use shared::initial_fetch;
use shared::URL;

const DEMO_TITLE: &str = "Try out corkboard";

#[tokio::main]
async fn main() {
    env_logger::init();

    println!("This example will create, complete and delete a task on a task service.");
    println!("Make sure you have edited the constant in the 'shared.rs' file to point to your service.");
    println!("You can also set the RUST_LOG environment variable to display more info about the requests.");
    println!("");
    println!("This will use the following settings:");
    println!("  * URL = {}", URL);
    pause();

    let mut store = initial_fetch().await;

    let draft = NewTask {
        title: DEMO_TITLE.to_string(),
        description: "Created by the crud-roundtrip example".to_string(),
        due_date: Some(Utc::now() + Duration::days(1)),
        priority: Priority::High,
    };
    println!("Creating {:?}...", DEMO_TITLE);
    if store.create(&draft).await == false {
        println!("Unable to create the task: {:?}", store.error());
        return;
    }
    print_task_list(store.tasks());

    let id = match find_demo_task(store.tasks()) {
        Some(id) => id,
        None => {
            println!("The created task did not come back in the refetch, stopping here.");
            return;
        }
    };

    println!("Completing task {}...", id);
    store.toggle_completed(id).await;
    print_task_list(store.tasks());

    println!("Deleting task {}...", id);
    store.delete(id).await;
    print_task_list(store.tasks());

    println!("Done.");
}

fn find_demo_task(tasks: &[corkboard::Task]) -> Option<TaskId> {
    tasks
        .iter()
        .find(|task| task.title() == DEMO_TITLE)
        .map(|task| task.id())
}
