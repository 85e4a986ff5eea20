//! # Repositories
//!
//! One trait per entity, each a narrow `find`/`list`/`delete` contract over the
//! tree. Commands compose joins out of these traits and never build paths
//! themselves, so a storage-specific lookup (the project owner scan, the
//! workspace task filter) lives in exactly one place and can be swapped for an
//! indexed query without touching the join logic.
//!
//! [`Database`] implements every trait on top of any [`TreeStore`].
//!
//! Lookups return `Ok(None)` for a missing record. Deletes of a missing record
//! are the caller's concern: the tree itself treats them as a no-op.

use crate::error::Result;
use crate::model::{AdminCredential, Project, PublicRepo, Task, User, Workspace, WorkspaceTask};
use serde_json::{Map, Value};

mod database;

pub use database::Database;

pub const ADMIN: &str = "admin";
pub const USERS: &str = "users";
pub const TASKS: &str = "tasks";
pub const PROJECTS: &str = "projects";
pub const WORKSPACES: &str = "workspaces";
pub const WORKSPACE_TASKS: &str = "workSpaceTasks";
pub const PUBLIC_REPOS: &str = "publicrep";

pub trait UserRepository {
    fn users(&self) -> Result<Vec<User>>;
    fn find_user(&self, id: &str) -> Result<Option<User>>;
    fn delete_user(&mut self, id: &str) -> Result<()>;
}

pub trait TaskRepository {
    fn tasks(&self) -> Result<Vec<Task>>;
    fn find_task(&self, id: &str) -> Result<Option<Task>>;
    /// Shallow merge into `tasks/{id}`.
    fn patch_task(&mut self, id: &str, fields: Map<String, Value>) -> Result<()>;
}

pub trait ProjectRepository {
    fn projects(&self) -> Result<Vec<Project>>;
    /// Scan every owner's projects for `id`; the first owner holding it wins.
    fn locate_project(&self, id: &str) -> Result<Option<Project>>;
    fn delete_project(&mut self, user_id: &str, id: &str) -> Result<()>;
}

pub trait WorkspaceRepository {
    fn workspaces(&self) -> Result<Vec<Workspace>>;
    fn find_workspace(&self, id: &str) -> Result<Option<Workspace>>;
    fn delete_workspace(&mut self, id: &str) -> Result<()>;
}

pub trait WorkspaceTaskRepository {
    /// Every workspace task whose `workspaceId` equals `workspace_id`.
    fn tasks_in_workspace(&self, workspace_id: &str) -> Result<Vec<WorkspaceTask>>;
    fn delete_workspace_task(&mut self, id: &str) -> Result<()>;
}

pub trait PublicRepoRepository {
    fn public_repos(&self) -> Result<Vec<PublicRepo>>;
    fn find_public_repo(&self, id: &str) -> Result<Option<PublicRepo>>;
    fn delete_public_repo(&mut self, id: &str) -> Result<()>;
    fn delete_repo_comment(&mut self, repo_id: &str, comment_id: &str) -> Result<()>;
}

pub trait AdminRepository {
    fn admin_credential(&self) -> Result<Option<AdminCredential>>;
}
