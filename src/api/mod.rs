//! Внешний API покерного движка, не зависящий от транспорта.
//!
//! DTO (dto.rs) – то, что видит вызывающий код: публичный вид стола,
//! допустимые действия и итог раздачи. Сами операции – в `state::GameState`.

pub mod dto;

pub use crate::engine::LegalAction;
pub use dto::*;
