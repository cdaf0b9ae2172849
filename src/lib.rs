//! Движок Texas Hold'em на 2–10 игроков.
//!
//! Слои:
//! - `domain` – карты, колода, фишки, игроки, стол;
//! - `eval` – оценка рук и equity;
//! - `engine` – ставки, банки, рейк, переходы улиц, шоудаун;
//! - `infra` – RNG, конфиг, снапшоты;
//! - `api` – DTO для внешнего кода;
//! - `state` – `GameState`, через который работает вызывающий код.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod state;

pub use engine::{EngineError, ErrorKind, LegalAction, PlayerActionKind, RandomSource};
pub use state::GameState;
