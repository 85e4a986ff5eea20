use crate::commands::CmdResult;
use crate::error::{Result, VistaError};
use crate::model::{Task, TaskStatus, User};
use crate::repository::{TaskRepository, UserRepository};
use serde::Serialize;
use serde_json::{Map, Value};

/// A task and its owner; `user` is `None` when `userId` does not resolve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskWithUser {
    pub task: Task,
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasksAndUsers {
    pub tasks: Vec<Task>,
    pub users: Vec<User>,
}

pub fn list<R: TaskRepository>(repo: &R) -> Result<CmdResult<Vec<Task>>> {
    Ok(CmdResult::new(repo.tasks()?))
}

pub fn with_users<R: TaskRepository + UserRepository>(repo: &R) -> Result<CmdResult<TasksAndUsers>> {
    Ok(CmdResult::new(TasksAndUsers {
        tasks: repo.tasks()?,
        users: repo.users()?,
    }))
}

pub fn with_user<R: TaskRepository + UserRepository>(
    repo: &R,
    id: &str,
) -> Result<CmdResult<TaskWithUser>> {
    let task = repo
        .find_task(id)?
        .ok_or_else(|| VistaError::not_found(format!("Task {id}")))?;
    let user = match task.user_id.as_deref() {
        Some(user_id) => resolve_user(repo, user_id)?,
        None => None,
    };
    Ok(CmdResult::new(TaskWithUser { task, user }))
}

/// Patch `status` only. Completing a completed task is a harmless rewrite.
pub fn complete<R: TaskRepository>(repo: &mut R, id: &str) -> Result<CmdResult<Task>> {
    if repo.find_task(id)?.is_none() {
        return Err(VistaError::not_found(format!("Task {id}")));
    }
    let mut fields = Map::new();
    fields.insert(
        "status".to_string(),
        Value::String(TaskStatus::Completed.as_str().to_string()),
    );
    repo.patch_task(id, fields)?;
    let task = repo
        .find_task(id)?
        .ok_or_else(|| VistaError::not_found(format!("Task {id}")))?;
    let message = format!("Task marked as completed: {}", task.display_name());
    Ok(CmdResult::new(task).with_message(message))
}

/// A dangling or malformed foreign key is a missing relation, not a failure.
pub(crate) fn resolve_user<R: UserRepository>(repo: &R, user_id: &str) -> Result<Option<User>> {
    match repo.find_user(user_id) {
        Ok(user) => Ok(user),
        Err(VistaError::InvalidPath(reason)) => {
            tracing::debug!(user_id, %reason, "foreign key is not a valid key");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::repository::Database;
    use crate::store::memory::MemoryStore;
    use crate::store::NodePath;
    use crate::store::TreeStore;
    use serde_json::json;

    #[test]
    fn joins_task_with_owner() {
        let db = fixtures::database();
        let joined = with_user(&db, "t3").unwrap().data;
        assert_eq!(joined.task.display_name(), "Review PR");
        assert_eq!(joined.user.unwrap().id, "u2");
    }

    #[test]
    fn dangling_owner_yields_no_user() {
        let db = fixtures::database();
        let joined = with_user(&db, "t4").unwrap().data;
        assert_eq!(joined.task.id, "t4");
        assert!(joined.user.is_none());
    }

    #[test]
    fn task_without_owner_field_yields_no_user() {
        let db = fixtures::database();
        assert!(with_user(&db, "t5").unwrap().data.user.is_none());
    }

    #[test]
    fn malformed_owner_key_yields_no_user() {
        let db = Database::new(MemoryStore::from_value(json!({
            "tasks": {"t1": {"name": "x", "userId": "a.b"}}
        })));
        assert!(with_user(&db, "t1").unwrap().data.user.is_none());
    }

    #[test]
    fn missing_task_is_not_found() {
        let db = fixtures::database();
        assert!(with_user(&db, "nope").unwrap_err().is_not_found());
    }

    #[test]
    fn lists_tasks_and_users_together() {
        let db = fixtures::database();
        let both = with_users(&db).unwrap().data;
        assert_eq!(both.tasks.len(), 5);
        assert_eq!(both.users.len(), 4);
    }

    #[test]
    fn complete_patches_status_only() {
        let mut db = fixtures::database();
        let task = complete(&mut db, "t3").unwrap().data;
        assert_eq!(task.status(), Some(TaskStatus::Completed));
        assert_eq!(task.name.as_deref(), Some("Review PR"));
        assert_eq!(task.user_id.as_deref(), Some("u2"));
    }

    #[test]
    fn completing_twice_is_idempotent() {
        let mut db = fixtures::database();
        let path = NodePath::parse("tasks/t1").unwrap();
        let before = db.store().read(&path).unwrap();
        complete(&mut db, "t1").unwrap();
        complete(&mut db, "t1").unwrap();
        assert_eq!(db.store().read(&path).unwrap(), before);
    }

    #[test]
    fn completing_missing_task_writes_nothing() {
        let mut db = fixtures::database();
        assert!(complete(&mut db, "nope").unwrap_err().is_not_found());
        assert_eq!(db.store().write_count(), 0);
        assert!(db.store().snapshot()["tasks"].get("nope").is_none());
    }

    #[test]
    fn absent_collection_lists_empty() {
        let db = Database::new(MemoryStore::new());
        assert!(list(&db).unwrap().data.is_empty());
    }

    #[test]
    fn transport_failure_surfaces_as_error() {
        let db = fixtures::database();
        db.store().set_simulate_failure(true);
        assert!(matches!(list(&db), Err(VistaError::Transport(_))));
    }
}
