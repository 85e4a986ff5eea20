use super::path::NodePath;
use super::tree;
use super::TreeStore;
use crate::error::{Result, VistaError};
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};

/// In-memory database tree.
///
/// Uses `RefCell` for interior mutability since vista is single-threaded;
/// reads stay on `&self` like every other backend. Counts writes so tests can
/// assert that a failed operation touched nothing.
pub struct MemoryStore {
    root: RefCell<Value>,
    writes: Cell<usize>,
    simulate_failure: Cell<bool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            root: RefCell::new(tree::empty()),
            writes: Cell::new(0),
            simulate_failure: Cell::new(false),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a full tree, e.g. a `json!` literal in a test.
    pub fn from_value(value: Value) -> Self {
        let store = Self::default();
        *store.root.borrow_mut() = tree::normalize(value);
        store
    }

    /// Make every call fail as if the network were down.
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.set(simulate);
    }

    /// Number of mutating calls that reached the tree.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn snapshot(&self) -> Value {
        self.root.borrow().clone()
    }

    fn check(&self) -> Result<()> {
        if self.simulate_failure.get() {
            return Err(VistaError::Transport(
                "Simulated transport failure".to_string(),
            ));
        }
        Ok(())
    }

    fn record_write(&self) {
        self.writes.set(self.writes.get() + 1);
    }
}

impl TreeStore for MemoryStore {
    fn read(&self, path: &NodePath) -> Result<Option<Value>> {
        self.check()?;
        Ok(tree::get(&self.root.borrow(), path).cloned())
    }

    fn read_filtered(
        &self,
        collection: &NodePath,
        field: &str,
        value: &str,
    ) -> Result<Map<String, Value>> {
        self.check()?;
        let root = self.root.borrow();
        Ok(tree::filter_children(tree::get(&root, collection), field, value))
    }

    fn update(&mut self, path: &NodePath, fields: Map<String, Value>) -> Result<()> {
        self.check()?;
        tree::update(self.root.get_mut(), path, &fields)?;
        self.record_write();
        Ok(())
    }

    fn delete(&mut self, path: &NodePath) -> Result<()> {
        self.check()?;
        tree::remove(self.root.get_mut(), path);
        self.record_write();
        Ok(())
    }

    fn set(&mut self, path: &NodePath, value: Value) -> Result<()> {
        self.check()?;
        tree::set(self.root.get_mut(), path, value);
        self.record_write();
        Ok(())
    }
}
