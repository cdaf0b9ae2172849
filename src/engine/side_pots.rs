use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{chips::Chips, SeatIndex};
use crate::engine::pot::Pot;

/// Посчитать банки (main + side pots) из сумм, которые внесли игроки.
///
/// Вход:
///   contributions[seat] = сколько суммарно фишек поставил игрок (во всех улицах),
///   contenders = кто ещё претендует на банк (не сфолдил).
/// Выход: список банков в порядке "от младших" к "старшим".
///
/// Фишки сфолдивших игроков попадают в банки своих уровней, но права на них
/// они не имеют. Уровень без единого претендента вливается в предыдущий банк
/// (или в следующий, если предыдущего нет).
pub fn compute_side_pots(
    contributions: &BTreeMap<SeatIndex, Chips>,
    contenders: &BTreeSet<SeatIndex>,
) -> Vec<Pot> {
    // Уровни вкладов по возрастанию, без повторов и нулей.
    let levels: BTreeSet<Chips> = contributions
        .values()
        .copied()
        .filter(|c| !c.is_zero())
        .collect();

    let mut pots: Vec<Pot> = Vec::new();
    let mut prev_level = Chips::ZERO;
    let mut carry = Chips::ZERO;

    for level in levels {
        let level_diff = level - prev_level;

        // Все, кто внёс хотя бы `level`, платят level_diff в этот уровень.
        let payers = contributions.values().filter(|c| **c >= level).count();
        let amount = level_diff.times(payers) + carry;
        carry = Chips::ZERO;

        let eligible: Vec<SeatIndex> = contributions
            .iter()
            .filter(|(seat, c)| **c >= level && contenders.contains(*seat))
            .map(|(seat, _)| *seat)
            .collect();

        if eligible.is_empty() {
            match pots.last_mut() {
                Some(last) => last.amount += amount,
                None => carry = amount,
            }
        } else if pots.last().map(|p| p.eligible_seats == eligible).unwrap_or(false) {
            // Тот же состав претендентов – это один и тот же банк.
            if let Some(last) = pots.last_mut() {
                last.amount += amount;
            }
        } else {
            pots.push(Pot::new(amount, eligible));
        }

        prev_level = level;
    }

    pots
}
