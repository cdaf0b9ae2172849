use serde::{Deserialize, Serialize};

use crate::domain::{Chips, SeatIndex};

/// Тип действия игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    Fold,
    Check,
    /// Уравнять текущую ставку (или all-in на меньшую сумму, если стек короче).
    Call,
    /// Поднять ставку ДО указанной суммы на этой улице.
    /// Если ставки ещё нет, это открывающий bet.
    Raise(Chips),
    /// All-in – поставить весь стек.
    AllIn,
}

/// Конкретное действие игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    pub seat: SeatIndex,
    pub kind: PlayerActionKind,
}

impl PlayerAction {
    pub fn new(seat: SeatIndex, kind: PlayerActionKind) -> Self {
        Self { seat, kind }
    }
}

/// Как all-in повлиял на ставки.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BetEffect {
    /// Не превысил текущую ставку (call на меньшую или равную сумму).
    None,
    /// Полноценный рейз: торговля переоткрыта.
    FullRaise,
    /// Неполный рейз: ставка выросла, но min_raise и право на рейз не обновились.
    ShortRaise,
}

/// Что фактически произошло с фишками после действия.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionOutcome {
    Folded,
    Checked,
    Called { added: Chips },
    Raised { added: Chips, to: Chips },
    AllIn { added: Chips, to: Chips, effect: BetEffect },
}

impl ActionOutcome {
    /// Сколько фишек ушло в банк этим действием.
    pub fn added(&self) -> Chips {
        match *self {
            ActionOutcome::Folded | ActionOutcome::Checked => Chips::ZERO,
            ActionOutcome::Called { added }
            | ActionOutcome::Raised { added, .. }
            | ActionOutcome::AllIn { added, .. } => added,
        }
    }
}

/// Допустимое действие для конкретного игрока в текущем состоянии.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LegalAction {
    Fold,
    Check,
    /// Call с суммой доплаты (может быть меньше to_call, если стек короче).
    Call(Chips),
    /// Raise до суммы в диапазоне [min, max] (max = весь стек).
    Raise { min: Chips, max: Chips },
    /// All-in, итоговая ставка игрока на улице.
    AllIn(Chips),
}
