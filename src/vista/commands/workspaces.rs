use crate::commands::CmdResult;
use crate::error::{Result, VistaError};
use crate::model::{Workspace, WorkspaceTask};
use crate::repository::{WorkspaceRepository, WorkspaceTaskRepository};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkspaceWithTasks {
    pub workspace: Workspace,
    pub tasks: Vec<WorkspaceTask>,
}

/// What to do with a workspace's tasks when the workspace goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CascadePolicy {
    /// Leave them in `workSpaceTasks`, pointing at a workspace that no longer exists.
    #[default]
    Orphan,
    Delete,
}

impl CascadePolicy {
    pub fn from_flag(cascade: bool) -> Self {
        if cascade {
            CascadePolicy::Delete
        } else {
            CascadePolicy::Orphan
        }
    }
}

pub fn list<R: WorkspaceRepository>(repo: &R) -> Result<CmdResult<Vec<Workspace>>> {
    Ok(CmdResult::new(repo.workspaces()?))
}

pub fn with_tasks<R: WorkspaceRepository + WorkspaceTaskRepository>(
    repo: &R,
    id: &str,
) -> Result<CmdResult<WorkspaceWithTasks>> {
    let workspace = repo
        .find_workspace(id)?
        .ok_or_else(|| VistaError::not_found(format!("Workspace {id}")))?;
    let tasks = repo.tasks_in_workspace(&workspace.id)?;
    Ok(CmdResult::new(WorkspaceWithTasks { workspace, tasks }))
}

/// Returns the number of workspace tasks removed along with the workspace.
pub fn delete<R: WorkspaceRepository + WorkspaceTaskRepository>(
    repo: &mut R,
    id: &str,
    policy: CascadePolicy,
) -> Result<CmdResult<usize>> {
    let workspace = repo
        .find_workspace(id)?
        .ok_or_else(|| VistaError::not_found(format!("Workspace {id}")))?;
    let name = workspace.name.as_deref().unwrap_or(&workspace.id).to_string();

    let removed = match policy {
        CascadePolicy::Orphan => 0,
        CascadePolicy::Delete => {
            let tasks = repo.tasks_in_workspace(&workspace.id)?;
            for task in &tasks {
                repo.delete_workspace_task(&task.id)?;
            }
            tasks.len()
        }
    };
    repo.delete_workspace(&workspace.id)?;

    let message = match policy {
        CascadePolicy::Orphan => format!("Workspace deleted: {name}"),
        CascadePolicy::Delete => format!("Workspace deleted: {name} ({removed} tasks removed)"),
    };
    Ok(CmdResult::new(removed).with_message(message))
}
