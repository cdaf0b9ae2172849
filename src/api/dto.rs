use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{HandRank, HandSummary, Street};
use crate::domain::player::PlayerStatus;
use crate::domain::table::Table;
use crate::domain::{HandId, SeatIndex};
use crate::engine::HandEngine;
use crate::eval::describe_hand;

/// DTO игрока за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub seat: SeatIndex,
    pub stack: Chips,
    pub bet_this_round: Chips,
    pub total_bet_this_hand: Chips,
    pub status: PlayerStatus,
    /// Карманные карты – только для "героя".
    pub hole_cards: Option<Vec<Card>>,
}

/// Что видит конкретный игрок (или наблюдатель, если `hero = None`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicView {
    pub hand_id: Option<HandId>,
    pub hand_in_progress: bool,
    pub button: Option<SeatIndex>,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub street: Street,
    pub board: Vec<Card>,
    /// Все фишки в центре стола.
    pub pot: Chips,
    pub current_bet: Chips,
    pub min_raise: Chips,
    /// Чей сейчас ход (если раздача идёт).
    pub acting_seat: Option<SeatIndex>,
    pub hero: Option<SeatIndex>,
    pub players: Vec<PlayerView>,
}

impl PublicView {
    pub fn build(table: &Table, engine: Option<&HandEngine>, hero: Option<SeatIndex>) -> Self {
        let live = engine.filter(|e| !e.is_finished());

        let players = table
            .seats
            .iter()
            .map(|p| PlayerView {
                seat: p.seat,
                stack: p.stack,
                bet_this_round: p.bet_this_round,
                total_bet_this_hand: p.total_bet_this_hand,
                status: p.status,
                hole_cards: (hero == Some(p.seat) && !p.hole_cards.is_empty())
                    .then(|| p.hole_cards.clone()),
            })
            .collect();

        Self {
            hand_id: engine.map(|e| e.hand_id),
            hand_in_progress: table.hand_in_progress,
            button: table.dealer_button,
            small_blind: table.config.stakes.small_blind,
            big_blind: table.config.stakes.big_blind,
            street: table.street,
            board: table.board.clone(),
            pot: live.map(|e| e.pots.total).unwrap_or(Chips::ZERO),
            current_bet: live.map(|e| e.betting.current_bet).unwrap_or(Chips::ZERO),
            min_raise: live.map(|e| e.betting.min_raise).unwrap_or(Chips::ZERO),
            acting_seat: live.and_then(|e| e.current_actor),
            hero,
            players,
        }
    }

    pub fn player(&self, seat: SeatIndex) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.seat == seat)
    }
}

/// Результат одного игрока в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatResultView {
    pub seat: SeatIndex,
    pub net: i64,
    pub won: Chips,
    pub rank: Option<HandRank>,
    /// Название комбинации ("Full house"), если рука вскрывалась.
    pub description: Option<String>,
    pub revealed: Option<Vec<Card>>,
}

/// Итог раздачи для внешнего кода.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandResultView {
    pub hand_id: HandId,
    pub went_to_showdown: bool,
    pub street_reached: Street,
    pub board: Vec<Card>,
    pub total_pot: Chips,
    pub rake: Chips,
    pub uncalled_returned: Option<(SeatIndex, Chips)>,
    pub players: Vec<SeatResultView>,
}

impl HandResultView {
    pub fn net_for(&self, seat: SeatIndex) -> Option<i64> {
        self.players.iter().find(|p| p.seat == seat).map(|p| p.net)
    }
}

impl From<&HandSummary> for HandResultView {
    fn from(summary: &HandSummary) -> Self {
        let players = summary
            .results
            .iter()
            .map(|r| SeatResultView {
                seat: r.seat,
                net: r.net,
                won: r.won,
                rank: r.rank,
                description: r.rank.map(|rank| describe_hand(rank).to_string()),
                revealed: r.revealed.clone(),
            })
            .collect();

        Self {
            hand_id: summary.hand_id,
            went_to_showdown: summary.went_to_showdown,
            street_reached: summary.street_reached,
            board: summary.board.clone(),
            total_pot: summary.total_pot,
            rake: summary.rake,
            uncalled_returned: summary.uncalled_returned,
            players,
        }
    }
}
