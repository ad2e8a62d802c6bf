//! Utilities to observe what the store is doing
//!
//! Store operations absorb their errors, so a UI that wants to show toasts or
//! strike a task through right away listens on a feedback channel instead of
//! inspecting return values.

use std::fmt::{Display, Error, Formatter};

use crate::task::TaskId;

/// A draft problem the store refused to submit.
///
/// These never reach the service, they are reported to the user and the draft
/// stays as it is. [`Display`] gives the exact wording to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Warning {
    /// The draft has no title (or only whitespace)
    EmptyTitle,
    /// The draft deadline falls on a day that is already over
    DueDateInPast,
    /// A typed-in deadline could not be parsed
    UnparseableDate,
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Warning::EmptyTitle => write!(f, "Please enter a task title."),
            Warning::DueDateInPast => write!(f, "Due date must be today or in the future."),
            Warning::UnparseableDate => write!(f, "Invalid date format. Please enter a valid date."),
        }
    }
}

/// An event that happens while the store talks to the service
#[derive(Clone, Debug)]
pub enum StoreEvent {
    /// A draft was rejected before any request was sent.
    /// Meant to be shown as a short-lived toast.
    Warned(Warning),
    /// The local list has been replaced with a fresh copy from the service
    Refreshed { tasks: usize },
    /// A service call failed. `message` is the user-facing wording, the
    /// underlying cause is in the log.
    Failed { message: &'static str },
    /// The service accepted an update that marked this task completed.
    /// Views can strike it through right away, without waiting for the
    /// refresh that follows.
    Completed(TaskId),
}

impl Display for StoreEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            StoreEvent::Warned(warning) => write!(f, "{}", warning),
            StoreEvent::Refreshed { tasks } => write!(f, "Refreshed ({} tasks)", tasks),
            StoreEvent::Failed { message } => write!(f, "{}", message),
            StoreEvent::Completed(id) => write!(f, "Task {} completed", id),
        }
    }
}

/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::mpsc::UnboundedSender<StoreEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::mpsc::UnboundedReceiver<StoreEvent>;

/// Create a feedback channel, that can be used to follow what the store does
/// with the operations it is asked to run.
///
/// The channel is unbounded so that the store never waits on a slow listener.
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
