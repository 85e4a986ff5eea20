//! Who may use the console.
//!
//! The only check today is a plaintext comparison against the `admin` record.
//! It sits behind [`AuthProvider`] so a real identity service can replace it
//! without touching the rest of the console.

use crate::error::{Result, VistaError};
use crate::repository::AdminRepository;

pub trait AuthProvider {
    /// `Ok(())` when the pair may log in, `InvalidCredentials` otherwise.
    fn verify(&self, email: &str, password: &str) -> Result<()>;
}

/// Checks credentials against the `admin` record of the database.
pub struct AdminRecordAuth<'a, R: AdminRepository> {
    repo: &'a R,
}

impl<'a, R: AdminRepository> AdminRecordAuth<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }
}

impl<R: AdminRepository> AuthProvider for AdminRecordAuth<'_, R> {
    fn verify(&self, email: &str, password: &str) -> Result<()> {
        let Some(admin) = self.repo.admin_credential()? else {
            tracing::warn!("no admin record in the database");
            return Err(VistaError::InvalidCredentials);
        };
        if admin.email == email && admin.password == password {
            Ok(())
        } else {
            Err(VistaError::InvalidCredentials)
        }
    }
}
