//! Загрузка конфигурации стола: TOML-файл + переопределения из окружения.
//!
//! Порядок: значения по умолчанию → файл (`HOLDEM_CONFIG`) → переменные
//! `HOLDEM_*`. Итог всегда проходит `TableConfig::validate`.

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::domain::{Chips, ConfigError, EquityConfig, RakeConfig, TableConfig};

pub const ENV_CONFIG_PATH: &str = "HOLDEM_CONFIG";
pub const ENV_SMALL_BLIND: &str = "HOLDEM_SMALL_BLIND";
pub const ENV_BIG_BLIND: &str = "HOLDEM_BIG_BLIND";
pub const ENV_STARTING_STACK: &str = "HOLDEM_STARTING_STACK";
pub const ENV_EQUITY_SAMPLES: &str = "HOLDEM_EQUITY_SAMPLES";

/// Файл конфига: все поля необязательные, отсутствующие берутся по умолчанию.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    num_players: Option<u8>,
    #[serde(default)]
    starting_stack: Option<u64>,
    #[serde(default)]
    small_blind: Option<u64>,
    #[serde(default)]
    big_blind: Option<u64>,
    #[serde(default)]
    rake: Option<RakeConfig>,
    #[serde(default)]
    equity: Option<EquityConfig>,
}

impl FileConfig {
    fn merge_into(self, cfg: &mut TableConfig) {
        if let Some(v) = self.num_players {
            cfg.num_players = v;
        }
        if let Some(v) = self.starting_stack {
            cfg.starting_stack = Chips(v);
        }
        if let Some(v) = self.small_blind {
            cfg.stakes.small_blind = Chips(v);
        }
        if let Some(v) = self.big_blind {
            cfg.stakes.big_blind = Chips(v);
        }
        if let Some(v) = self.rake {
            cfg.rake = v;
        }
        if let Some(v) = self.equity {
            cfg.equity = v;
        }
    }
}

/// Разобрать TOML-строку поверх значений по умолчанию.
pub fn parse_config(s: &str) -> Result<TableConfig, ConfigError> {
    let file: FileConfig = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
    let mut cfg = TableConfig::default();
    file.merge_into(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}

/// Прочитать конфиг из TOML-файла.
pub fn load_config(path: impl AsRef<Path>) -> Result<TableConfig, ConfigError> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
    debug!("конфиг загружен из {}", path.display());
    parse_config(&s)
}

/// Конфиг из окружения процесса.
pub fn load_from_env() -> Result<TableConfig, ConfigError> {
    load_with(|name| std::env::var(name).ok())
}

/// То же, что `load_from_env`, но с произвольным источником переменных.
pub fn load_with<F>(lookup: F) -> Result<TableConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match lookup(ENV_CONFIG_PATH).filter(|p| !p.is_empty()) {
        Some(path) => load_config(path)?,
        None => TableConfig::default(),
    };

    if let Some(v) = env_number(&lookup, ENV_SMALL_BLIND)? {
        cfg.stakes.small_blind = Chips(v);
    }
    if let Some(v) = env_number(&lookup, ENV_BIG_BLIND)? {
        cfg.stakes.big_blind = Chips(v);
    }
    if let Some(v) = env_number(&lookup, ENV_STARTING_STACK)? {
        cfg.starting_stack = Chips(v);
    }
    if let Some(v) = env_number(&lookup, ENV_EQUITY_SAMPLES)? {
        cfg.equity.samples = u32::try_from(v).map_err(|_| ConfigError::Env {
            name: ENV_EQUITY_SAMPLES.to_string(),
            value: v.to_string(),
        })?;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn env_number<F>(lookup: &F, name: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env {
                name: name.to_string(),
                value,
            }),
        _ => Ok(None),
    }
}
