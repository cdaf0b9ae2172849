use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{HandId, SeatIndex};

/// Улица раздачи. Порядок строгий, каждая улица посещается не более одного раза.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// Следующая улица (Showdown – последняя).
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => Some(Street::Showdown),
            Street::Showdown => None,
        }
    }

    /// Сколько карт открывается при переходе на эту улицу.
    pub fn cards_dealt(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Preflop | Street::Showdown => 0,
        }
    }
}

/// Ранг руки. Чем больше значение, тем сильнее рука; равные значения = сплит.
/// Кодирование – в `eval::hand_rank`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandRank(pub u32);

/// Итог конкретного игрока в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerHandResult {
    pub seat: SeatIndex,
    /// Итоговый ранг руки (если дошёл до шоудауна).
    pub rank: Option<HandRank>,
    /// Открытые карты (только при шоудауне).
    pub revealed: Option<Vec<Card>>,
    /// Сколько всего внёс в банк (после возврата несколлированной части).
    pub invested: Chips,
    /// Сколько забрал из банков.
    pub won: Chips,
    /// Чистый результат: won - invested.
    pub net: i64,
    pub is_winner: bool,
}

/// Краткое описание завершённой раздачи. Удобно для истории/реплеера.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandSummary {
    pub hand_id: HandId,
    pub street_reached: Street,
    pub went_to_showdown: bool,
    pub board: Vec<Card>,
    /// Все фишки, внесённые в раздачу (до возврата).
    pub total_pot: Chips,
    /// Возврат несколлированной ставки (seat, сумма).
    pub uncalled_returned: Option<(SeatIndex, Chips)>,
    pub rake: Chips,
    pub results: Vec<PlayerHandResult>,
}

impl HandSummary {
    pub fn winners(&self) -> Vec<SeatIndex> {
        self.results
            .iter()
            .filter(|r| r.is_winner)
            .map(|r| r.seat)
            .collect()
    }
}
