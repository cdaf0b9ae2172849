use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::HandRank;
use crate::domain::player::{Player, PlayerStatus};
use crate::domain::table::{RakeConfig, TableStakes};
use crate::domain::SeatIndex;
use crate::engine::actions::{ActionOutcome, PlayerActionKind};
use crate::engine::betting::BettingState;
use crate::engine::errors::EngineError;
use crate::engine::side_pots::compute_side_pots;
use crate::engine::validation::validate_action;

/// Банк (main или side pot): сумма и кто может его выиграть.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub amount: Chips,
    pub eligible_seats: Vec<SeatIndex>,
}

impl Pot {
    pub fn new(amount: Chips, eligible_seats: Vec<SeatIndex>) -> Self {
        Self {
            amount,
            eligible_seats,
        }
    }

    /// Банк разыгрывается между двумя и более игроками.
    pub fn is_contested(&self) -> bool {
        self.eligible_seats.len() >= 2
    }
}

/// Учёт фишек раздачи: блайнды, ставки, возврат несколлированного,
/// сайд-поты, рейк и выплаты.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotManager {
    pub stakes: TableStakes,
    pub rake: RakeConfig,
    /// Все фишки в центре стола (ещё не выплаченные и не ушедшие в рейк).
    pub total: Chips,
    /// Банки после `finalize_pots`.
    pub pots: Vec<Pot>,
    /// Рейк, снятый в этой раздаче.
    pub rake_taken: Chips,
}

impl PotManager {
    pub fn new(stakes: TableStakes, rake: RakeConfig) -> Self {
        Self {
            stakes,
            rake,
            total: Chips::ZERO,
            pots: Vec::new(),
            rake_taken: Chips::ZERO,
        }
    }

    /// Поставить блайнд. Если стек меньше – игрок идёт all-in на остаток,
    /// но никогда не выбывает из раздачи.
    pub fn post_blind(&mut self, player: &mut Player, amount: Chips) -> Chips {
        let paid = player.commit(amount);
        self.total += paid;
        paid
    }

    /// Проверить и применить действие к стеку игрока.
    /// При ошибке ни игрок, ни банк не меняются.
    pub fn apply_action(
        &mut self,
        player: &mut Player,
        action: &PlayerActionKind,
        betting: &BettingState,
    ) -> Result<ActionOutcome, EngineError> {
        let outcome = validate_action(player, action, betting)?;

        match outcome {
            ActionOutcome::Folded => player.status = PlayerStatus::Folded,
            ActionOutcome::Checked => {}
            ActionOutcome::Called { added }
            | ActionOutcome::Raised { added, .. }
            | ActionOutcome::AllIn { added, .. } => {
                let paid = player.commit(added);
                if paid != added {
                    return Err(EngineError::Invariant(format!(
                        "место {}: списано {paid} вместо {added}",
                        player.seat
                    )));
                }
                self.total += paid;
            }
        }

        Ok(outcome)
    }

    /// Вернуть несколлированную часть ставки: если один игрок внёс больше всех,
    /// разница со вторым по величине вкладом возвращается ему до расчёта рейка.
    pub fn return_uncalled(&mut self, seats: &mut [Player]) -> Option<(SeatIndex, Chips)> {
        let mut by_contribution: Vec<(Chips, usize)> = seats
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.total_bet_this_hand.is_zero())
            .map(|(idx, p)| (p.total_bet_this_hand, idx))
            .collect();
        by_contribution.sort_by(|a, b| b.0.cmp(&a.0));

        let (top, top_idx) = *by_contribution.first()?;
        let second = by_contribution.get(1).map(|(c, _)| *c).unwrap_or(Chips::ZERO);
        if top == second {
            return None;
        }

        let excess = top - second;
        let player = &mut seats[top_idx];
        player.refund(excess);
        self.total -= excess;
        debug!("возврат несколлированных {excess} месту {}", player.seat);
        Some((player.seat, excess))
    }

    /// Разбить внесённые фишки на main pot и side pots.
    pub fn finalize_pots(&mut self, seats: &[Player]) -> Vec<Pot> {
        let contributions: BTreeMap<SeatIndex, Chips> = seats
            .iter()
            .filter(|p| !p.total_bet_this_hand.is_zero())
            .map(|p| (p.seat, p.total_bet_this_hand))
            .collect();
        let contenders: BTreeSet<SeatIndex> = seats
            .iter()
            .filter(|p| p.is_in_hand())
            .map(|p| p.seat)
            .collect();

        self.pots = compute_side_pots(&contributions, &contenders);
        self.pots.clone()
    }

    /// Снять рейк с одного банка. Возвращает сумму, которая остаётся победителям.
    ///
    /// Рейк берётся только с разыгрываемых банков; потолок общий на раздачу.
    pub fn apply_rake(&mut self, pot: &mut Pot) -> Chips {
        if !self.rake.is_enabled() || !pot.is_contested() {
            return pot.amount;
        }

        let mut rake = self.rake.raw_rake(pot.amount);
        if let Some(cap) = self.rake.cap {
            rake = rake.min(cap.saturating_sub(self.rake_taken));
        }

        pot.amount -= rake;
        self.rake_taken += rake;
        self.total -= rake;
        pot.amount
    }

    /// Снять рейк со всех банков, начиная с main pot. Возвращает рейк раздачи.
    pub fn rake_all(&mut self) -> Chips {
        let mut pots = std::mem::take(&mut self.pots);
        for pot in pots.iter_mut() {
            self.apply_rake(pot);
        }
        self.pots = pots;
        self.rake_taken
    }

    /// Раздать банки победителям и зачислить выигрыш в стеки.
    ///
    /// `ranks` – ранги рук вскрывшихся игроков, `order` – порядок мест слева
    /// от кнопки: при сплите лишние фишки получает первый из победителей в нём.
    pub fn distribute(
        &mut self,
        seats: &mut [Player],
        ranks: &BTreeMap<SeatIndex, HandRank>,
        order: &[SeatIndex],
    ) -> Result<BTreeMap<SeatIndex, Chips>, EngineError> {
        let mut won: BTreeMap<SeatIndex, Chips> = BTreeMap::new();

        for pot in &self.pots {
            let winners = pot_winners(pot, ranks, order)?;
            let n = winners.len() as u64;
            let share = Chips(pot.amount.0 / n);
            let remainder = Chips(pot.amount.0 % n);

            for (i, seat) in winners.iter().enumerate() {
                let prize = if i == 0 { share + remainder } else { share };
                let player = seats
                    .get_mut(*seat as usize)
                    .ok_or(EngineError::InvalidSeat(*seat))?;
                player.stack += prize;
                *won.entry(*seat).or_insert(Chips::ZERO) += prize;
            }
            debug!("банк {} → места {:?}", pot.amount, winners);
            self.total -= pot.amount;
        }

        if !self.total.is_zero() {
            return Err(EngineError::Invariant(format!(
                "после выплат в банке осталось {}",
                self.total
            )));
        }

        Ok(won)
    }
}

/// Победители одного банка в порядке `order`.
fn pot_winners(
    pot: &Pot,
    ranks: &BTreeMap<SeatIndex, HandRank>,
    order: &[SeatIndex],
) -> Result<Vec<SeatIndex>, EngineError> {
    if let [only] = pot.eligible_seats.as_slice() {
        return Ok(vec![*only]);
    }

    let mut best: Option<HandRank> = None;
    let mut winners: Vec<SeatIndex> = Vec::new();
    for &seat in &pot.eligible_seats {
        let rank = *ranks.get(&seat).ok_or_else(|| {
            EngineError::Invariant(format!("нет ранга руки для места {seat}"))
        })?;
        match best {
            Some(b) if rank < b => {}
            Some(b) if rank == b => winners.push(seat),
            _ => {
                best = Some(rank);
                winners.clear();
                winners.push(seat);
            }
        }
    }

    if winners.is_empty() {
        return Err(EngineError::Invariant("банк без претендентов".to_string()));
    }

    let position = |seat: &SeatIndex| order.iter().position(|s| s == seat).unwrap_or(usize::MAX);
    winners.sort_by_key(|s| (position(s), *s));
    Ok(winners)
}
