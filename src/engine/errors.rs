use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Chips, ConfigError, SeatIndex};
use crate::eval::EquityError;

/// Класс ошибки: что с ней делать вызывающему коду.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Неверный ход/сумма/очерёдность. Состояние не изменено, можно повторить.
    InvalidAction,
    /// Ставка больше стека. Движок обрезает её до all-in,
    /// поэтому этот класс не выдаётся ни одной ошибкой.
    InsufficientFunds,
    /// Нарушен инвариант движка (баг). Раздачу нужно прервать.
    InvariantViolation,
    /// Некорректная конфигурация игры.
    Configuration,
}

/// Ошибки движка покера.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("Недостаточно игроков с фишками для раздачи")]
    NotEnoughPlayers,

    #[error("Раздача уже идёт")]
    HandAlreadyInProgress,

    #[error("Раздача не активна")]
    NoActiveHand,

    #[error("Сейчас ход места {expected:?}, а не {actual}")]
    NotPlayersTurn {
        expected: Option<SeatIndex>,
        actual: SeatIndex,
    },

    #[error("Игрок на месте {0} не может действовать (fold / all-in / sit out)")]
    PlayerCannotAct(SeatIndex),

    #[error("Невозможно выполнить check – нужно уравнять {to_call}")]
    CannotCheck { to_call: Chips },

    #[error("Недопустимый рейз до {to}: текущая ставка {current_bet}")]
    InvalidRaise { to: Chips, current_bet: Chips },

    #[error("Размер рейза слишком мал: минимум до {min_to}")]
    RaiseTooSmall { min_to: Chips },

    #[error("Ставки не переоткрыты неполным all-in – доступны только call или fold")]
    ReraiseNotAllowed,

    #[error("Операция доступна только между раздачами")]
    HandInProgress,

    #[error("Нарушен инвариант движка: {0}")]
    Invariant(String),

    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] ConfigError),

    #[error("Ошибка оценки equity: {0}")]
    Equity(#[from] EquityError),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Invariant(_) => ErrorKind::InvariantViolation,
            EngineError::Config(_) => ErrorKind::Configuration,
            _ => ErrorKind::InvalidAction,
        }
    }

    /// Можно ли повторить запрос с исправленными параметрами.
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::InvariantViolation
    }
}
