//! # Vista Architecture
//!
//! Vista is the core of the ProjectVista admin console: it reads a realtime
//! database laid out as independent top-level collections and stitches the
//! records back together (task → user, project → user, workspace → tasks),
//! computes the dashboard aggregates, and applies the few mutations the
//! console allows. The CLI is one client of that core.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (cli/, wired by main.rs)                               │
//! │  - Parses arguments, renders output, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - One method per operation, every result an `Outcome<T>`   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - Joins, aggregates, mutations over repository traits      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Repositories (repository/)                                 │
//! │  - One trait per entity, `Database<S>` implements them all  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - `TreeStore` trait: memory, JSON file, hosted REST        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout or stderr and nothing exits
//! the process. Diagnostics go through `tracing`; the binary decides where
//! they end up.
//!
//! ## Absence Is Not Failure
//!
//! An empty collection is an empty list. A task whose owner was deleted
//! still loads, with no user attached. Only a missing *primary* record is
//! `NotFound`, and mutations check for it before writing so that a bad id
//! never creates a stub node.
//!
//! ## Testing
//!
//! Commands are tested against `MemoryStore`, which can also simulate a dead
//! network and counts writes so tests can assert that a failure touched
//! nothing. The file backend and the binary are covered from `tests/`.

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod normalize;
pub mod repository;
pub mod session;
pub mod store;
