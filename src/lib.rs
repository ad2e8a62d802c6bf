//! This crate provides a way to manage a to-do list kept on a remote REST task service.
//!
//! It provides a REST client in the [`client`] module, that can be used as a stand-alone module.
//!
//! Because the service is the single source of truth, local state is owned by a [`TaskStore`](store::TaskStore): \
//! it sends every change to the service first, refetches the whole list afterwards, and absorbs errors into
//! user-facing messages, so that a flaky connection never tears the client down. \
//! What the store reports while it works can be followed on a [feedback channel](store::feedback).
//!
//! The [`composer`] module holds the draft of the task being typed in, and the [`view`] module computes
//! everything the task list displays (display order, countdown labels) as pure functions.
//!
//! The `corkboard` binary glues these together into a terminal UI.

pub mod traits;

mod task;
pub use task::{NewTask, Priority, Task, TaskId, TaskPatch};
pub mod store;
pub use store::TaskStore;
mod composer;
pub use composer::Composer;

pub mod client;
pub mod dates;
pub mod view;
pub mod mock_service;

pub mod settings;
pub mod utils;
