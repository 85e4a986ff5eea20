use super::path::NodePath;
use super::tree;
use super::TreeStore;
use crate::error::Result;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// The whole database as one JSON document on disk.
///
/// This is the shape the hosted console exports, so a downloaded backup can be
/// administered offline. Every call reloads the file: another process (or a
/// fresh export) may have replaced it since the last call. A missing file is
/// an empty tree.
pub struct FileStore {
    file: PathBuf,
}

impl FileStore {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    fn load(&self) -> Result<Value> {
        if !self.file.exists() {
            return Ok(tree::empty());
        }
        let content = fs::read_to_string(&self.file)?;
        if content.trim().is_empty() {
            return Ok(tree::empty());
        }
        let value: Value = serde_json::from_str(&content)?;
        Ok(tree::normalize(value))
    }

    /// Write via a temp file and rename so a crash never leaves half a document.
    fn save(&self, root: &Value) -> Result<()> {
        let dir = self
            .file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        let content = serde_json::to_string_pretty(root)?;
        let tmp_file = dir.join(format!(".vista-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content)?;
        fs::rename(&tmp_file, &self.file)?;
        tracing::debug!(file = %self.file.display(), "database file written");
        Ok(())
    }

    fn mutate(&self, apply: impl FnOnce(&mut Value) -> Result<()>) -> Result<()> {
        let mut root = self.load()?;
        apply(&mut root)?;
        self.save(&root)
    }
}

impl TreeStore for FileStore {
    fn read(&self, path: &NodePath) -> Result<Option<Value>> {
        let root = self.load()?;
        Ok(tree::get(&root, path).cloned())
    }

    fn read_filtered(
        &self,
        collection: &NodePath,
        field: &str,
        value: &str,
    ) -> Result<Map<String, Value>> {
        let root = self.load()?;
        Ok(tree::filter_children(tree::get(&root, collection), field, value))
    }

    fn update(&mut self, path: &NodePath, fields: Map<String, Value>) -> Result<()> {
        self.mutate(|root| tree::update(root, path, &fields))
    }

    fn delete(&mut self, path: &NodePath) -> Result<()> {
        self.mutate(|root| {
            tree::remove(root, path);
            Ok(())
        })
    }

    fn set(&mut self, path: &NodePath, value: Value) -> Result<()> {
        self.mutate(|root| {
            tree::set(root, path, value);
            Ok(())
        })
    }
}
