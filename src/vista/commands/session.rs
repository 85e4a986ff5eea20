use crate::auth::AuthProvider;
use crate::commands::CmdResult;
use crate::error::{Result, VistaError};
use crate::session::{Session, SessionEvent, SessionStore};
use chrono::Utc;

pub fn login<A: AuthProvider>(
    auth: &A,
    sessions: &SessionStore,
    email: &str,
    password: &str,
) -> Result<CmdResult<Session>> {
    auth.verify(email, password)?;
    let session = sessions.load().apply(SessionEvent::LoggedIn {
        email: email.to_string(),
        at: Utc::now(),
    });
    sessions.save(&session)?;
    tracing::info!(email, "admin logged in");
    Ok(CmdResult::new(session).with_message(format!("Logged in as {email}")))
}

pub fn logout(sessions: &SessionStore) -> Result<CmdResult<Session>> {
    let session = sessions.load().apply(SessionEvent::LoggedOut);
    sessions.save(&session)?;
    Ok(CmdResult::new(session).with_message("Logged out"))
}

pub fn status(sessions: &SessionStore) -> Result<CmdResult<Session>> {
    Ok(CmdResult::new(sessions.load()))
}

/// The gate in front of every admin operation.
pub fn require_login(sessions: &SessionStore) -> Result<Session> {
    let session = sessions.load();
    if session.logged_in {
        Ok(session)
    } else {
        Err(VistaError::NotLoggedIn)
    }
}
