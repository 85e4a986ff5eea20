use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SESSION_FILENAME: &str = "session.json";

/// The console's login state.
///
/// Only [`Session::apply`] changes it; the CLI loads it at startup, applies
/// the event a command produced and saves the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { email: String, at: DateTime<Utc> },
    LoggedOut,
}

impl Session {
    pub fn apply(self, event: SessionEvent) -> Session {
        match event {
            SessionEvent::LoggedIn { email, at } => Session {
                logged_in: true,
                email: Some(email),
                since: Some(at),
            },
            SessionEvent::LoggedOut => Session::default(),
        }
    }
}

/// `session.json` in the data directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILENAME)
    }

    /// A missing or unreadable session file means logged out.
    pub fn load(&self) -> Session {
        let path = self.path();
        let Ok(content) = fs::read_to_string(&path) else {
            return Session::default();
        };
        match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "ignoring corrupt session file");
                Session::default()
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        ensure_dir(&self.dir)?;
        fs::write(self.path(), serde_json::to_string_pretty(session)?)?;
        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
