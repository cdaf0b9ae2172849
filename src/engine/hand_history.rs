use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{HandRank, Street};
use crate::domain::{HandId, SeatIndex};
use crate::engine::actions::ActionOutcome;

/// Тип события в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandEventKind {
    /// Новая раздача началась.
    HandStarted {
        hand_id: HandId,
        button: SeatIndex,
    },

    /// Блайнды (место, реально поставленная сумма).
    BlindsPosted {
        small_blind: (SeatIndex, Chips),
        big_blind: (SeatIndex, Chips),
    },

    /// Игрок получил карманные карты.
    HoleCardsDealt {
        seat: SeatIndex,
        cards: Vec<Card>,
    },

    /// Открыты общие карты на борде (только новые карты улицы).
    BoardDealt {
        street: Street,
        cards: Vec<Card>,
    },

    /// Действие игрока.
    PlayerActed {
        seat: SeatIndex,
        outcome: ActionOutcome,
        new_stack: Chips,
        pot_after: Chips,
    },

    /// Переход на новую улицу.
    StreetChanged {
        street: Street,
    },

    /// Несколлированная часть ставки вернулась игроку.
    UncalledReturned {
        seat: SeatIndex,
        amount: Chips,
    },

    /// Шоудаун – открытие карт.
    ShowdownReveal {
        seat: SeatIndex,
        hole_cards: Vec<Card>,
        rank: HandRank,
    },

    /// Рейк раздачи.
    RakeTaken {
        amount: Chips,
    },

    /// Выплата банка(ов).
    PotAwarded {
        seat: SeatIndex,
        amount: Chips,
    },

    /// Раздача завершена.
    HandFinished {
        hand_id: HandId,
    },

    /// Раздача прервана из-за нарушенного инварианта, вклады возвращены.
    HandAborted {
        hand_id: HandId,
        reason: String,
    },
}

/// Событие в раздаче с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvent {
    pub index: u32,
    pub kind: HandEventKind,
}

/// Полная история раздачи.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandHistory {
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: HandEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, kind });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Все действия игроков по порядку.
    pub fn actions(&self) -> impl Iterator<Item = (SeatIndex, &ActionOutcome)> {
        self.events.iter().filter_map(|e| match &e.kind {
            HandEventKind::PlayerActed { seat, outcome, .. } => Some((*seat, outcome)),
            _ => None,
        })
    }
}
