//! # Commands
//!
//! The business logic: joins, aggregates and mutations. Each command is a plain
//! function generic over the repository traits it needs, so it runs unchanged
//! against the memory, file or REST backend. Commands do no I/O of their own
//! and return typed data; turning that into the uniform outcome shape is the
//! API facade's job.

pub mod config;
pub mod dashboard;
pub mod projects;
pub mod public_repos;
pub mod session;
pub mod tasks;
pub mod users;
pub mod workspaces;

/// What a command produced, plus a line for the user when it changed something.
#[derive(Debug, Clone, PartialEq)]
pub struct CmdResult<T> {
    pub data: T,
    pub message: Option<String>,
}

impl<T> CmdResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
