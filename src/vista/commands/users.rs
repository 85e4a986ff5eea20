use crate::commands::CmdResult;
use crate::error::{Result, VistaError};
use crate::model::User;
use crate::repository::UserRepository;

pub fn list<R: UserRepository>(repo: &R) -> Result<CmdResult<Vec<User>>> {
    Ok(CmdResult::new(repo.users()?))
}

/// Delete every user registered under `email`. Reports how many went.
pub fn delete_by_email<R: UserRepository>(repo: &mut R, email: &str) -> Result<CmdResult<usize>> {
    let matching: Vec<String> = repo
        .users()?
        .into_iter()
        .filter(|user| user.email.as_deref() == Some(email))
        .map(|user| user.id)
        .collect();
    if matching.is_empty() {
        return Err(VistaError::not_found(format!("User with email {email}")));
    }
    let count = matching.len();
    for (deleted, id) in matching.iter().enumerate() {
        repo.delete_user(id).map_err(|e| match deleted {
            0 => e,
            _ => VistaError::PartialDelete {
                deleted,
                total: count,
                source: Box::new(e),
            },
        })?;
    }
    Ok(CmdResult::new(count).with_message(format!(
        "Deleted {count} user{} with email {email}",
        if count == 1 { "" } else { "s" }
    )))
}

pub fn delete<R: UserRepository>(repo: &mut R, id: &str) -> Result<CmdResult<()>> {
    let user = repo
        .find_user(id)?
        .ok_or_else(|| VistaError::not_found(format!("User {id}")))?;
    repo.delete_user(&user.id)?;
    Ok(CmdResult::new(()).with_message(format!("User deleted: {}", user.first_name())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::repository::Database;
    use crate::store::memory::MemoryStore;

    /// Users whose deletes start failing after `deletes_left` succeed.
    struct FailingDeletes {
        db: Database<MemoryStore>,
        deletes_left: usize,
    }

    impl UserRepository for FailingDeletes {
        fn users(&self) -> Result<Vec<User>> {
            self.db.users()
        }

        fn find_user(&self, id: &str) -> Result<Option<User>> {
            self.db.find_user(id)
        }

        fn delete_user(&mut self, id: &str) -> Result<()> {
            if self.deletes_left == 0 {
                return Err(VistaError::Transport("connection reset".to_string()));
            }
            self.deletes_left -= 1;
            self.db.delete_user(id)
        }
    }

    #[test]
    fn lists_every_user() {
        let db = fixtures::database();
        let users = list(&db).unwrap().data;
        assert_eq!(users.len(), 4);
    }

    #[test]
    fn empty_database_lists_nothing() {
        let db = Database::new(MemoryStore::new());
        assert!(list(&db).unwrap().data.is_empty());
    }

    #[test]
    fn deletes_all_users_sharing_an_email() {
        let mut db = fixtures::database();
        let result = delete_by_email(&mut db, "dup@vista.io").unwrap();
        assert_eq!(result.data, 2);
        assert_eq!(result.message.as_deref(), Some("Deleted 2 users with email dup@vista.io"));
        assert_eq!(list(&db).unwrap().data.len(), 2);
    }

    #[test]
    fn unknown_email_is_not_found_and_writes_nothing() {
        let mut db = fixtures::database();
        let err = delete_by_email(&mut db, "nobody@vista.io").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(db.store().write_count(), 0);
    }

    #[test]
    fn deleting_missing_user_fails_closed() {
        let mut db = fixtures::database();
        delete(&mut db, "u2").unwrap();
        assert!(delete(&mut db, "u2").unwrap_err().is_not_found());
        assert_eq!(db.store().write_count(), 1);
    }

    #[test]
    fn failure_midway_reports_what_was_deleted() {
        let mut repo = FailingDeletes {
            db: fixtures::database(),
            deletes_left: 1,
        };
        let err = delete_by_email(&mut repo, "dup@vista.io").unwrap_err();
        assert!(matches!(
            err,
            VistaError::PartialDelete {
                deleted: 1,
                total: 2,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "Deleted 1 of 2 users before failing: Transport error: connection reset"
        );
        assert_eq!(list(&repo.db).unwrap().data.len(), 3);
    }

    #[test]
    fn failure_before_any_delete_is_passed_through() {
        let mut repo = FailingDeletes {
            db: fixtures::database(),
            deletes_left: 0,
        };
        let err = delete_by_email(&mut repo, "dup@vista.io").unwrap_err();
        assert!(matches!(err, VistaError::Transport(_)));
    }
}
