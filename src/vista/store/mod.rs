//! # Storage Layer
//!
//! Everything vista knows lives in one hierarchical key-value tree, the way
//! the hosted realtime database stores it. The [`TreeStore`] trait is the
//! only door into that tree; the repository layer above it never sees how
//! the tree is kept.
//!
//! ## The Tree
//!
//! ```text
//! /
//! ├── admin                       # singleton credential record
//! ├── users/{userId}
//! ├── tasks/{taskId}              # userId field → users
//! ├── projects/{userId}/{projectId}
//! ├── workspaces/{workspaceId}
//! ├── workSpaceTasks/{taskId}     # workspaceId field → workspaces
//! └── publicrep/{repoId}/comments/{commentId}
//! ```
//!
//! Identity is always the path segment, never a field.
//!
//! ## Rules Every Backend Honors
//!
//! - `null` and empty objects are never stored. Reading them yields `None`.
//! - Removing the last child of a node removes the node itself.
//! - `update` is a shallow merge: untouched fields survive, `null` removes.
//! - Deleting a path that does not exist succeeds.
//!
//! ## Implementations
//!
//! - [`memory::MemoryStore`]: In-memory tree, used by the tests.
//! - [`fs::FileStore`]: One JSON document on disk (the database's export format).
//! - [`rest::RestStore`]: The hosted database over its REST interface.

use crate::error::Result;
use serde_json::{Map, Value};

pub mod fs;
pub mod memory;
pub mod path;
pub mod rest;
pub mod tree;

pub use path::NodePath;

/// Raw access to the database tree.
pub trait TreeStore {
    /// Read the node at `path`. Returns Ok(None) when nothing is stored there.
    fn read(&self, path: &NodePath) -> Result<Option<Value>>;

    /// Children of `collection` whose `field` equals `value`.
    ///
    /// Equivalent to an indexed equality query; backends without one scan.
    fn read_filtered(
        &self,
        collection: &NodePath,
        field: &str,
        value: &str,
    ) -> Result<Map<String, Value>>;

    /// Merge `fields` into the node at `path`, leaving every other field alone.
    fn update(&mut self, path: &NodePath, fields: Map<String, Value>) -> Result<()>;

    /// Remove the whole subtree at `path`.
    fn delete(&mut self, path: &NodePath) -> Result<()>;

    /// Overwrite the node at `path`.
    fn set(&mut self, path: &NodePath, value: Value) -> Result<()>;
}

impl<T: TreeStore + ?Sized> TreeStore for Box<T> {
    fn read(&self, path: &NodePath) -> Result<Option<Value>> {
        (**self).read(path)
    }

    fn read_filtered(
        &self,
        collection: &NodePath,
        field: &str,
        value: &str,
    ) -> Result<Map<String, Value>> {
        (**self).read_filtered(collection, field, value)
    }

    fn update(&mut self, path: &NodePath, fields: Map<String, Value>) -> Result<()> {
        (**self).update(path, fields)
    }

    fn delete(&mut self, path: &NodePath) -> Result<()> {
        (**self).delete(path)
    }

    fn set(&mut self, path: &NodePath, value: Value) -> Result<()> {
        (**self).set(path, value)
    }
}
