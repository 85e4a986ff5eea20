use crate::api::{CascadePolicy, VistaApi};
use crate::config::{self, Backend, VistaConfig};
use crate::error::{Result, VistaError};
use crate::session::SessionStore;
use crate::store::fs::FileStore;
use crate::store::rest::RestStore;
use crate::store::TreeStore;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub type DynStore = Box<dyn TreeStore>;

pub struct VistaContext {
    pub api: VistaApi<DynStore>,
    pub config: VistaConfig,
    pub data_dir: PathBuf,
    pub sessions: SessionStore,
}

/// Everything a client needs, built from `config.json` in `data_dir` plus
/// the environment overrides.
pub fn initialize(data_dir: &Path) -> Result<VistaContext> {
    let config = VistaConfig::load(data_dir)?.with_env_overrides();
    let store = open_store(&config, data_dir)?;
    let api = VistaApi::new(store)
        .with_cascade(CascadePolicy::from_flag(config.cascade_workspace_tasks));
    Ok(VistaContext {
        api,
        sessions: SessionStore::new(data_dir),
        data_dir: data_dir.to_path_buf(),
        config,
    })
}

/// Data directory from `VISTA_HOME` or the platform default.
pub fn default_data_dir() -> Result<PathBuf> {
    config::data_dir()
}

pub fn open_store(config: &VistaConfig, data_dir: &Path) -> Result<DynStore> {
    let store: DynStore = match config.backend {
        Backend::File => {
            let file = config.database_file(data_dir);
            tracing::debug!(file = %file.display(), "using file backend");
            Box::new(FileStore::new(file))
        }
        Backend::Rest => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                VistaError::Config(format!(
                    "the rest backend needs database_url (or {})",
                    config::ENV_DATABASE_URL
                ))
            })?;
            tracing::debug!(url, timeout_secs = config.timeout_secs, "using rest backend");
            Box::new(RestStore::new(
                url,
                config.auth_token.clone(),
                Duration::from_secs(config.timeout_secs),
            )?)
        }
    };
    Ok(store)
}
