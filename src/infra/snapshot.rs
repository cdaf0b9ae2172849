//! Сохранение и восстановление игры посреди раздачи (JSON).
//!
//! В снапшот попадает всё: кнопка, стеки и вклады игроков, улица, борд,
//! остаток колоды, раунд ставок и банк. Кэш equity не сохраняется.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::state::GameState;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("ошибка сериализации: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn to_json(state: &GameState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(state)?)
}

pub fn from_json(s: &str) -> Result<GameState, SnapshotError> {
    Ok(serde_json::from_str(s)?)
}

pub fn save(state: &GameState, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    fs::write(path, serde_json::to_vec_pretty(state)?)?;
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<GameState, SnapshotError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
