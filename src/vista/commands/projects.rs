use crate::commands::tasks::resolve_user;
use crate::commands::CmdResult;
use crate::error::{Result, VistaError};
use crate::model::{Project, User};
use crate::repository::{ProjectRepository, UserRepository};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectWithUser {
    pub project: Project,
    pub user: Option<User>,
}

pub fn list<R: ProjectRepository>(repo: &R) -> Result<CmdResult<Vec<Project>>> {
    Ok(CmdResult::new(repo.projects()?))
}

pub fn with_user<R: ProjectRepository + UserRepository>(
    repo: &R,
    id: &str,
) -> Result<CmdResult<ProjectWithUser>> {
    let project = locate(repo, id)?;
    let user = resolve_user(repo, &project.user_id)?;
    Ok(CmdResult::new(ProjectWithUser { project, user }))
}

/// Projects live under their owner, so the owner has to be found before the
/// delete. An id no owner holds is reported, never silently ignored.
pub fn delete<R: ProjectRepository>(repo: &mut R, id: &str) -> Result<CmdResult<Project>> {
    let project = locate(repo, id)?;
    repo.delete_project(&project.user_id, &project.id)?;
    let message = format!(
        "Project deleted: {}",
        project.name.as_deref().unwrap_or(&project.id)
    );
    Ok(CmdResult::new(project).with_message(message))
}

fn locate<R: ProjectRepository>(repo: &R, id: &str) -> Result<Project> {
    repo.locate_project(id)?
        .ok_or_else(|| VistaError::not_found(format!("Project {id}")))
}
