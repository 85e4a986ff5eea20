use crate::commands::CmdResult;
use crate::config::{VistaConfig, KEYS};
use crate::error::{Result, VistaError};
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// `(key, value)` pairs in display order.
pub type ConfigEntries = Vec<(String, String)>;

pub fn run(dir: &Path, action: ConfigAction) -> Result<CmdResult<ConfigEntries>> {
    let mut config = VistaConfig::load(dir)?;
    match action {
        ConfigAction::ShowAll => Ok(CmdResult::new(entries(&config))),
        ConfigAction::ShowKey(key) => {
            let value = config
                .get(&key)
                .ok_or_else(|| VistaError::Config(format!("Unknown config key: {key}")))?;
            Ok(CmdResult::new(vec![(key, value)]))
        }
        ConfigAction::Set(key, value) => {
            config.set(&key, &value)?;
            config.save(dir)?;
            let shown = config.get(&key).unwrap_or(value);
            let message = format!("{key} set to {shown}");
            Ok(CmdResult::new(vec![(key, shown)]).with_message(message))
        }
    }
}

fn entries(config: &VistaConfig) -> ConfigEntries {
    KEYS.iter()
        .map(|key| (key.to_string(), config.get(key).unwrap_or_default()))
        .collect()
}
