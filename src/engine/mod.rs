//! Покерный движок: ставки, переход улиц, сайд-поты, рейк, шоудаун.
//!
//! Высокоуровневый объект: `HandEngine`
//! Основные операции:
//!   - `start_hand` – запустить новую раздачу
//!   - `apply_action` – применить действие игрока
//!   - `advance_if_needed` – авто-переход улиц/завершение раздачи

pub mod actions;
pub mod betting;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod pot;
pub mod side_pots;
pub mod validation;

pub use actions::{ActionOutcome, BetEffect, LegalAction, PlayerAction, PlayerActionKind};
pub use betting::BettingState;
pub use errors::{EngineError, ErrorKind};
pub use game_loop::{
    abort_hand, advance_if_needed, apply_action, begin_hand, start_hand, HandEngine, HandStatus,
};
pub use hand_history::{HandEvent, HandEventKind, HandHistory};
pub use pot::{Pot, PotManager};
pub use side_pots::compute_side_pots;
pub use validation::{legal_actions, validate_action};

/// RNG интерфейс для engine и оценки equity.
/// Реализации – в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);

    /// Случайный индекс в диапазоне `0..upper` (`upper > 0`).
    fn pick(&mut self, upper: usize) -> usize;
}
