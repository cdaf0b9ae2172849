use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::SeatIndex;

/// Состояние раунда ставок (на конкретной улице).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingState {
    /// Текущая целевая ставка, до которой должны дотянуться игроки (BB, bet, raise).
    pub current_bet: Chips,
    /// Минимальный размер повышающей части рейза.
    pub min_raise: Chips,
    /// Seat последнего агрессора (bet/raise/all-in).
    pub last_aggressor: Option<SeatIndex>,
    /// Улица, к которой относится этот раунд.
    pub street: Street,
    /// Очередь ходящих (по кругу), кто ещё должен сделать действие на этой улице.
    pub to_act: Vec<SeatIndex>,
    /// Кто уже действовал после последнего полного рейза и столкнулся
    /// с неполным all-in: им доступны только call/fold.
    #[serde(default)]
    pub raise_blocked: Vec<SeatIndex>,
}

impl BettingState {
    pub fn new(street: Street, current_bet: Chips, min_raise: Chips, to_act: Vec<SeatIndex>) -> Self {
        Self {
            current_bet,
            min_raise,
            last_aggressor: None,
            street,
            to_act,
            raise_blocked: Vec::new(),
        }
    }

    /// Удалить seat из очереди to_act, если он там есть.
    pub fn mark_acted(&mut self, seat: SeatIndex) {
        self.to_act.retain(|s| *s != seat);
    }

    pub fn next_to_act(&self) -> Option<SeatIndex> {
        self.to_act.first().copied()
    }

    pub fn can_raise(&self, seat: SeatIndex) -> bool {
        !self.raise_blocked.contains(&seat)
    }

    /// Обновить состояние после полного bet/raise:
    /// - current_bet и min_raise;
    /// - last_aggressor;
    /// - торговля переоткрыта для всех, очередь перестраивается (engine её сформирует).
    pub fn on_raise(&mut self, seat: SeatIndex, new_bet: Chips, raise_size: Chips, new_to_act: Vec<SeatIndex>) {
        self.current_bet = new_bet;
        self.min_raise = raise_size;
        self.last_aggressor = Some(seat);
        self.to_act = new_to_act;
        self.raise_blocked.clear();
    }

    /// Неполный all-in рейз: ставка растёт, min_raise остаётся прежним.
    /// Все активные, кто уже отходил (их нет в текущей очереди), получают только call/fold.
    pub fn on_short_raise(&mut self, seat: SeatIndex, new_bet: Chips, new_to_act: Vec<SeatIndex>) {
        for s in &new_to_act {
            if !self.to_act.contains(s) && !self.raise_blocked.contains(s) {
                self.raise_blocked.push(*s);
            }
        }
        self.current_bet = new_bet;
        self.last_aggressor = Some(seat);
        self.to_act = new_to_act;
    }

    /// Проверка, завершён ли раунд ставок:
    /// - очередь пуста.
    pub fn is_round_complete(&self) -> bool {
        self.to_act.is_empty()
    }
}
