//! Derived state for the task list view
//!
//! Everything here is a pure function of the task list and a caller-provided
//! "now". UIs re-run these every tick (countdowns change every second), so
//! nothing in this module keeps state of its own.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};

use crate::task::Task;

/// Comparator that puts high-priority tasks before everything else.
///
/// Tasks of equal rank compare as equal, so a stable sort keeps them in the
/// order the service returned them: this is a partition, not a total order.
pub fn compare_priority(a: &Task, b: &Task) -> Ordering {
    match (a.priority().is_high(), b.priority().is_high()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// The order the task list is displayed in: high-priority tasks first,
/// everything else in service order
pub fn sorted_for_display(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| compare_priority(a, b));
    sorted
}

/// The "time remaining" label of a task due at `due_date`, as seen at `now`.
///
/// Deadlines that have passed (even by a second) are `"Expired"`. Otherwise
/// the label spells out the non-zero components, `"1 day 2 hours"` style, so
/// a deadline less than a minute away comes out as an empty string.
pub fn countdown_label(due_date: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let time_left = due_date.signed_duration_since(*now);
    if time_left <= Duration::zero() {
        return "Expired".to_string();
    }

    let days = time_left.num_days();
    let hours = time_left.num_hours() % 24;
    let minutes = time_left.num_minutes() % 60;

    let mut label = String::new();
    if days > 0 {
        label += &format!("{} day{} ", days, if days > 1 { "s" } else { "" });
    }
    if hours > 0 {
        label += &format!("{} hour{} ", hours, if hours > 1 { "s" } else { "" });
    }
    if minutes > 0 {
        label += &format!("{} minute{}", minutes, if minutes > 1 { "s" } else { "" });
    }

    label.trim().to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::task::{Priority, TaskId};

    use chrono::TimeZone;

    fn task(id: i64, title: &str, priority: Priority) -> Task {
        Task::new_with_parameters(TaskId::from(id), title.to_string(), String::new(), None, priority, false)
    }

    #[test]
    fn high_priority_tasks_come_first() {
        let tasks = vec![
            task(1, "low a", Priority::Low),
            task(2, "high a", Priority::High),
            task(3, "low b", Priority::Low),
            task(4, "high b", Priority::High),
        ];

        let sorted = sorted_for_display(&tasks);
        let titles: Vec<&str> = sorted.iter().map(|task| task.title()).collect();
        assert_eq!(titles, ["high a", "high b", "low a", "low b"]);
    }

    #[test]
    fn the_sort_keeps_service_order_within_a_rank() {
        // All the same rank: the output must be the input, untouched
        let tasks = vec![
            task(3, "c", Priority::Low),
            task(1, "a", Priority::Low),
            task(2, "b", Priority::Low),
        ];
        let sorted = sorted_for_display(&tasks);
        let titles: Vec<&str> = sorted.iter().map(|task| task.title()).collect();
        assert_eq!(titles, ["c", "a", "b"]);
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn countdowns_spell_out_the_remaining_time() {
        let now = at(2024, 3, 10, 12, 0, 0);

        assert_eq!(countdown_label(&at(2024, 3, 11, 14, 0, 0), &now), "1 day 2 hours");
        assert_eq!(countdown_label(&at(2024, 3, 12, 12, 0, 0), &now), "2 days");
        assert_eq!(countdown_label(&at(2024, 3, 10, 13, 1, 0), &now), "1 hour 1 minute");
        assert_eq!(countdown_label(&at(2024, 3, 10, 12, 30, 0), &now), "30 minutes");
        // Zero components are skipped, even in the middle
        assert_eq!(countdown_label(&at(2024, 3, 11, 12, 5, 0), &now), "1 day 5 minutes");
    }

    #[test]
    fn passed_deadlines_are_expired() {
        let now = at(2024, 3, 10, 12, 0, 0);

        assert_eq!(countdown_label(&at(2024, 3, 10, 11, 59, 59), &now), "Expired");
        // Due exactly now counts as expired too
        assert_eq!(countdown_label(&now, &now), "Expired");
        assert_eq!(countdown_label(&at(2023, 1, 1, 0, 0, 0), &now), "Expired");
    }

    #[test]
    fn deadlines_under_a_minute_have_no_label() {
        let now = at(2024, 3, 10, 12, 0, 0);
        assert_eq!(countdown_label(&at(2024, 3, 10, 12, 0, 45), &now), "");
    }
}
