use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::SeatIndex;

/// Статус игрока в контексте текущей раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Игрок активен в текущей раздаче и может ходить.
    Active,
    /// Игрок сфолдил и больше не претендует на банк.
    Folded,
    /// Игрок в олл-ине – ставок больше не делает, но банк выиграть может.
    AllIn,
    /// Игрок не участвует в раздаче (sit out или нулевой стек).
    SittingOut,
}

/// Состояние игрока за столом. Живёт в арене `Table::seats`, индекс = seat.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub seat: SeatIndex,
    /// Текущий стек за столом.
    pub stack: Chips,
    /// Ставка на текущей улице.
    pub bet_this_round: Chips,
    /// Всего внесено в банк за раздачу (для сайд-потов).
    pub total_bet_this_hand: Chips,
    pub status: PlayerStatus,
    /// Карманные карты (0 или 2).
    pub hole_cards: Vec<Card>,
    /// Игрок попросил пропускать раздачи.
    pub sitting_out: bool,
}

impl Player {
    pub fn new(seat: SeatIndex, stack: Chips) -> Self {
        Self {
            seat,
            stack,
            bet_this_round: Chips::ZERO,
            total_bet_this_hand: Chips::ZERO,
            status: PlayerStatus::Active,
            hole_cards: Vec::new(),
            sitting_out: false,
        }
    }

    /// Ещё претендует на банк (не сфолдил и сдан в раздачу).
    pub fn is_in_hand(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    /// Может делать действия (не folded / не all-in / не sit out).
    pub fn can_act(&self) -> bool {
        matches!(self.status, PlayerStatus::Active)
    }

    /// Сбросить поля раздачи. Нулевой стек или sit out → SittingOut.
    pub fn reset_for_hand(&mut self) {
        self.bet_this_round = Chips::ZERO;
        self.total_bet_this_hand = Chips::ZERO;
        self.hole_cards.clear();
        self.status = if self.sitting_out || self.stack.is_zero() {
            PlayerStatus::SittingOut
        } else {
            PlayerStatus::Active
        };
    }

    /// Перенести из стека в банк не более `amount`.
    /// Если стек закончился – игрок переходит в AllIn.
    /// Возвращает реально внесённую сумму.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let real = amount.min(self.stack);
        self.stack -= real;
        self.bet_this_round += real;
        self.total_bet_this_hand += real;
        if self.stack.is_zero() && self.status == PlayerStatus::Active {
            self.status = PlayerStatus::AllIn;
        }
        real
    }

    /// Вернуть несколлированную часть ставки обратно в стек.
    pub fn refund(&mut self, amount: Chips) {
        let real = amount.min(self.total_bet_this_hand);
        self.total_bet_this_hand -= real;
        self.bet_this_round = self.bet_this_round.saturating_sub(real);
        self.stack += real;
    }
}
