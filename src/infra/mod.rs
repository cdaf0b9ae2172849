//! Инфраструктурный слой вокруг покерного движка:
//! - RNG-реализации для движка и equity;
//! - загрузка конфигурации (TOML + окружение);
//! - снапшоты игры в JSON.

pub mod config;
pub mod rng;
pub mod snapshot;

pub use config::{load_config, load_from_env, parse_config};
pub use rng::*;
pub use snapshot::SnapshotError;
