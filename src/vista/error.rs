use thiserror::Error;

#[derive(Error, Debug)]
pub enum VistaError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Credentials not matched")]
    InvalidCredentials,

    #[error("Not logged in, run `vista login` first")]
    NotLoggedIn,

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Deleted {deleted} of {total} users before failing: {source}")]
    PartialDelete {
        deleted: usize,
        total: usize,
        #[source]
        source: Box<VistaError>,
    },
}

impl VistaError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for VistaError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Transport(format!("request timed out: {}", value))
        } else {
            Self::Transport(value.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, VistaError>;
