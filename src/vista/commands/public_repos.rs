use crate::commands::CmdResult;
use crate::error::{Result, VistaError};
use crate::model::PublicRepo;
use crate::repository::PublicRepoRepository;

pub fn list<R: PublicRepoRepository>(repo: &R) -> Result<CmdResult<Vec<PublicRepo>>> {
    Ok(CmdResult::new(repo.public_repos()?))
}

pub fn get<R: PublicRepoRepository>(repo: &R, id: &str) -> Result<CmdResult<PublicRepo>> {
    Ok(CmdResult::new(find(repo, id)?))
}

pub fn delete<R: PublicRepoRepository>(repo: &mut R, id: &str) -> Result<CmdResult<()>> {
    let public = find(repo, id)?;
    repo.delete_public_repo(&public.id)?;
    Ok(CmdResult::new(()).with_message(format!(
        "Repository deleted: {}",
        public.name.as_deref().unwrap_or(&public.id)
    )))
}

pub fn delete_comment<R: PublicRepoRepository>(
    repo: &mut R,
    repo_id: &str,
    comment_id: &str,
) -> Result<CmdResult<()>> {
    let public = find(repo, repo_id)?;
    if !public.comments.contains_key(comment_id) {
        return Err(VistaError::not_found(format!(
            "Comment {comment_id} on repository {repo_id}"
        )));
    }
    repo.delete_repo_comment(&public.id, comment_id)?;
    Ok(CmdResult::new(()).with_message(format!("Comment deleted: {comment_id}")))
}

fn find<R: PublicRepoRepository>(repo: &R, id: &str) -> Result<PublicRepo> {
    repo.find_public_repo(id)?
        .ok_or_else(|| VistaError::not_found(format!("Repository {id}")))
}
