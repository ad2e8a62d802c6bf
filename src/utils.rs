///! Some utility functions

use std::io::{stdin, stdout, Read, Write};

use chrono::{DateTime, Utc};

use crate::dates;
use crate::task::Task;
use crate::view;

/// A debug utility that pretty-prints a task list, in display order
pub fn print_task_list(tasks: &[Task]) {
    let now = Utc::now();
    for task in view::sorted_for_display(tasks) {
        print_task(task, &now);
    }
}

/// A debug utility that pretty-prints a single task
pub fn print_task(task: &Task, now: &DateTime<Utc>) {
    let completion = if task.completed() { "✓" } else { " " };
    let rank = if task.priority().is_high() { "!" } else { " " };
    let deadline = match task.due_date() {
        None => String::new(),
        Some(due_date) => {
            let time_left = view::countdown_label(due_date, now);
            if time_left.is_empty() {
                dates::format_display(due_date)
            } else {
                format!("{} ({})", dates::format_display(due_date), time_left)
            }
        }
    };
    println!("    {}{} {}\t{}\t{}", completion, rank, task.title(), task.id(), deadline);
}

/// Wait for the user to press enter
pub fn pause() {
    let mut stdout = stdout();
    stdout.write_all(b"Press Enter to continue...").unwrap();
    stdout.flush().unwrap();
    stdin().read_exact(&mut [0]).unwrap();
}
