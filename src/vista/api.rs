//! # API Facade
//!
//! The single entry point for every console operation. It dispatches to the
//! command layer and converts whatever comes back into an [`Outcome`]: the
//! uniform `{success, data?, message?, error?}` shape callers branch on.
//!
//! Nothing crosses this boundary as an `Err`. A missing record, a refused
//! request or a timed-out connection all become `success: false` with the
//! error's text. The failure is logged here below the default `warn` level,
//! since the caller prints the error text itself.
//!
//! `VistaApi<S: TreeStore>` is generic over the storage backend: the CLI picks
//! one from config, the tests use `MemoryStore`.

use crate::auth::AdminRecordAuth;
use crate::commands::{self, CmdResult};
use crate::error::Result;
use crate::model::{Project, PublicRepo, Task, User, Workspace};
use crate::repository::Database;
use crate::session::{Session, SessionStore};
use crate::store::TreeStore;
use serde::Serialize;

pub use crate::commands::config::{ConfigAction, ConfigEntries};
pub use crate::commands::dashboard::{Dashboard, StatusHistogram, UserProductivity};
pub use crate::commands::projects::ProjectWithUser;
pub use crate::commands::tasks::{TaskWithUser, TasksAndUsers};
pub use crate::commands::workspaces::{CascadePolicy, WorkspaceWithTasks};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }

    fn from_result(operation: &str, result: Result<CmdResult<T>>) -> Self {
        match result {
            Ok(CmdResult { data, message }) => Self {
                message,
                ..Self::ok(data)
            },
            Err(e) => {
                if e.is_not_found() {
                    tracing::debug!(operation, error = %e, "not found");
                } else {
                    tracing::info!(operation, error = %e, "operation failed");
                }
                Self::failed(e.to_string())
            }
        }
    }
}

pub struct VistaApi<S: TreeStore> {
    db: Database<S>,
    cascade: CascadePolicy,
}

impl<S: TreeStore> VistaApi<S> {
    pub fn new(store: S) -> Self {
        Self {
            db: Database::new(store),
            cascade: CascadePolicy::default(),
        }
    }

    pub fn with_cascade(mut self, cascade: CascadePolicy) -> Self {
        self.cascade = cascade;
        self
    }

    pub fn database(&self) -> &Database<S> {
        &self.db
    }

    pub fn list_users(&self) -> Outcome<Vec<User>> {
        Outcome::from_result("list_users", commands::users::list(&self.db))
    }

    pub fn delete_users_by_email(&mut self, email: &str) -> Outcome<usize> {
        Outcome::from_result(
            "delete_users_by_email",
            commands::users::delete_by_email(&mut self.db, email),
        )
    }

    pub fn delete_user(&mut self, id: &str) -> Outcome<()> {
        Outcome::from_result("delete_user", commands::users::delete(&mut self.db, id))
    }

    pub fn list_tasks(&self) -> Outcome<Vec<Task>> {
        Outcome::from_result("list_tasks", commands::tasks::list(&self.db))
    }

    pub fn tasks_with_users(&self) -> Outcome<TasksAndUsers> {
        Outcome::from_result("tasks_with_users", commands::tasks::with_users(&self.db))
    }

    pub fn task_with_user(&self, id: &str) -> Outcome<TaskWithUser> {
        Outcome::from_result("task_with_user", commands::tasks::with_user(&self.db, id))
    }

    pub fn complete_task(&mut self, id: &str) -> Outcome<Task> {
        Outcome::from_result("complete_task", commands::tasks::complete(&mut self.db, id))
    }

    pub fn list_projects(&self) -> Outcome<Vec<Project>> {
        Outcome::from_result("list_projects", commands::projects::list(&self.db))
    }

    pub fn project_with_user(&self, id: &str) -> Outcome<ProjectWithUser> {
        Outcome::from_result(
            "project_with_user",
            commands::projects::with_user(&self.db, id),
        )
    }

    pub fn delete_project(&mut self, id: &str) -> Outcome<Project> {
        Outcome::from_result(
            "delete_project",
            commands::projects::delete(&mut self.db, id),
        )
    }

    pub fn list_workspaces(&self) -> Outcome<Vec<Workspace>> {
        Outcome::from_result("list_workspaces", commands::workspaces::list(&self.db))
    }

    pub fn workspace_with_tasks(&self, id: &str) -> Outcome<WorkspaceWithTasks> {
        Outcome::from_result(
            "workspace_with_tasks",
            commands::workspaces::with_tasks(&self.db, id),
        )
    }

    /// Data is the number of workspace tasks removed with it.
    pub fn delete_workspace(&mut self, id: &str) -> Outcome<usize> {
        Outcome::from_result(
            "delete_workspace",
            commands::workspaces::delete(&mut self.db, id, self.cascade),
        )
    }

    pub fn list_public_repos(&self) -> Outcome<Vec<PublicRepo>> {
        Outcome::from_result(
            "list_public_repos",
            commands::public_repos::list(&self.db),
        )
    }

    pub fn public_repo(&self, id: &str) -> Outcome<PublicRepo> {
        Outcome::from_result("public_repo", commands::public_repos::get(&self.db, id))
    }

    pub fn delete_public_repo(&mut self, id: &str) -> Outcome<()> {
        Outcome::from_result(
            "delete_public_repo",
            commands::public_repos::delete(&mut self.db, id),
        )
    }

    pub fn delete_repo_comment(&mut self, repo_id: &str, comment_id: &str) -> Outcome<()> {
        Outcome::from_result(
            "delete_repo_comment",
            commands::public_repos::delete_comment(&mut self.db, repo_id, comment_id),
        )
    }

    pub fn dashboard(&self) -> Outcome<Dashboard> {
        Outcome::from_result("dashboard", commands::dashboard::run(&self.db))
    }

    pub fn login(&self, sessions: &SessionStore, email: &str, password: &str) -> Outcome<Session> {
        let auth = AdminRecordAuth::new(&self.db);
        Outcome::from_result(
            "login",
            commands::session::login(&auth, sessions, email, password),
        )
    }
}

/// Operations that need no database.
pub fn logout(sessions: &SessionStore) -> Outcome<Session> {
    Outcome::from_result("logout", commands::session::logout(sessions))
}

pub fn session_status(sessions: &SessionStore) -> Outcome<Session> {
    Outcome::from_result("status", commands::session::status(sessions))
}

/// Succeeds only with a logged-in session.
pub fn require_login(sessions: &SessionStore) -> Outcome<Session> {
    Outcome::from_result(
        "require_login",
        commands::session::require_login(sessions).map(CmdResult::new),
    )
}

pub fn config(dir: &std::path::Path, action: ConfigAction) -> Outcome<ConfigEntries> {
    Outcome::from_result("config", commands::config::run(dir, action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    fn api() -> VistaApi<MemoryStore> {
        VistaApi::new(MemoryStore::from_value(json!({
            "users": {"u1": {"name": "Aarav Sharma"}},
            "tasks": {
                "t1": {"name": "Ship", "status": "completed", "userId": "u1"},
                "t2": {"name": "Orphan", "status": "pending", "userId": "gone"}
            },
            "workspaces": {"A": {"name": "Design"}},
            "workSpaceTasks": {"w1": {"workspaceId": "A"}}
        })))
    }

    #[test]
    fn absent_collection_is_successful_empty_list() {
        let api = VistaApi::new(MemoryStore::new());
        let outcome = api.list_projects();
        assert!(outcome.success);
        assert_eq!(outcome.data, Some(vec![]));
        assert!(api.list_public_repos().success);
    }

    #[test]
    fn dangling_foreign_key_is_still_success() {
        let outcome = api().task_with_user("t2");
        assert!(outcome.success);
        assert!(outcome.data.unwrap().user.is_none());
    }

    #[test]
    fn not_found_becomes_failed_outcome() {
        let mut api = api();
        let outcome = api.delete_project("p1");
        assert!(!outcome.success);
        assert!(outcome.data.is_none());
        assert_eq!(outcome.error.as_deref(), Some("Project p1 not found"));
    }

    #[test]
    fn transport_failure_becomes_failed_outcome() {
        let api = api();
        api.database().store().set_simulate_failure(true);
        let outcome = api.list_users();
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("Simulated transport failure"));
    }

    #[test]
    fn invalid_id_becomes_failed_outcome() {
        let outcome = api().task_with_user("bad.id");
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().starts_with("Invalid path"));
    }

    #[test]
    fn mutation_carries_message() {
        let mut api = api();
        let outcome = api.complete_task("t2");
        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Task marked as completed: Orphan"));
    }

    #[test]
    fn cascade_policy_is_honored() {
        let mut api = api().with_cascade(CascadePolicy::Delete);
        assert_eq!(api.delete_workspace("A").data, Some(1));
        assert_eq!(api.database().store().snapshot().get("workSpaceTasks"), None);
    }

    #[test]
    fn outcome_serializes_without_absent_fields() {
        let value = serde_json::to_value(Outcome::<()>::failed("Task t9 not found")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "Task t9 not found"}));
        let value = serde_json::to_value(api().dashboard()).unwrap();
        assert_eq!(value["data"]["statusCounts"]["completed"], json!(1));
    }
}
