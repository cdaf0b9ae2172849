//! Модуль оценки силы покерных рук (Texas Hold'em).
//!
//! Основные функции:
//!   `evaluate_best_hand(hole, board) -> Option<HandRank>`
//!   `estimate_equity(hole, board, opponents, samples, rng) -> Result<f64, EquityError>`

pub mod equity;
pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;

pub use equity::{
    equity_for, estimate_equity, preflop_strength, EquityCache, EquityError, EquityKey,
};
pub use evaluator::{compare_hands, evaluate_best_hand, evaluate_cards};
pub use hand_rank::{compare_ranks, describe_hand, hand_category, Comparison, HandCategory};
