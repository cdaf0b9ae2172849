//! Оценка equity: Monte Carlo по случайным добивкам борда и рукам оппонентов,
//! плюс дешёвая эвристика для префлопа и кэш в пределах раздачи.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::card::Card;
use crate::domain::deck::Deck;
use crate::domain::table::{EquityConfig, MAX_PLAYERS};
use crate::engine::RandomSource;

use super::evaluator::evaluate_best_hand;

/// Ошибки входных данных для equity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EquityError {
    #[error("нужно ровно 2 карманные карты, получено {0}")]
    HoleCards(usize),

    #[error("на борде не может быть больше 5 карт, получено {0}")]
    BoardTooLong(usize),

    #[error("карта {0} встречается дважды")]
    DuplicateCard(Card),

    #[error("число оппонентов должно быть от 1 до 9, получено {0}")]
    Opponents(usize),

    #[error("количество симуляций должно быть больше нуля")]
    ZeroSamples,
}

/// Проверить входные карты и число оппонентов.
fn validate_input(hole: &[Card], board: &[Card], opponents: usize) -> Result<(), EquityError> {
    if hole.len() != 2 {
        return Err(EquityError::HoleCards(hole.len()));
    }
    if board.len() > 5 {
        return Err(EquityError::BoardTooLong(board.len()));
    }
    if opponents == 0 || opponents >= MAX_PLAYERS as usize {
        return Err(EquityError::Opponents(opponents));
    }

    let mut seen = [false; 52];
    for card in hole.iter().chain(board.iter()) {
        let idx = card.index() as usize;
        if seen[idx] {
            return Err(EquityError::DuplicateCard(*card));
        }
        seen[idx] = true;
    }
    Ok(())
}

/// Monte Carlo оценка вероятности выиграть банк.
///
/// Каждая симуляция добирает борд до 5 карт и раздаёт по 2 карты каждому
/// оппоненту из оставшейся колоды. Победа = 1, сплит на k рук = 1/k.
pub fn estimate_equity<R: RandomSource>(
    hole: &[Card],
    board: &[Card],
    opponents: usize,
    samples: u32,
    rng: &mut R,
) -> Result<f64, EquityError> {
    validate_input(hole, board, opponents)?;
    if samples == 0 {
        return Err(EquityError::ZeroSamples);
    }

    let mut remaining: Vec<Card> = Deck::standard_52()
        .cards
        .into_iter()
        .filter(|c| !hole.contains(c) && !board.contains(c))
        .collect();

    let missing_board = 5 - board.len();
    let need = missing_board + 2 * opponents;

    let mut full_board = [hole[0]; 5];
    full_board[..board.len()].copy_from_slice(board);

    let mut total = 0.0f64;
    for _ in 0..samples {
        // Частичный Fisher–Yates: перемешиваем только первые `need` карт.
        let len = remaining.len();
        for i in 0..need {
            let j = i + rng.pick(len - i);
            remaining.swap(i, j);
        }

        full_board[board.len()..].copy_from_slice(&remaining[..missing_board]);
        let Some(hero) = evaluate_best_hand(hole, &full_board) else {
            continue;
        };

        let mut best_opp = None;
        let mut tied = 0usize;
        for opp in remaining[missing_board..need].chunks_exact(2) {
            let Some(rank) = evaluate_best_hand(opp, &full_board) else {
                continue;
            };
            if rank > hero {
                best_opp = Some(rank);
                break;
            }
            if rank == hero {
                tied += 1;
            }
            best_opp = best_opp.max(Some(rank));
        }

        match best_opp {
            Some(r) if r > hero => {}
            _ => total += 1.0 / (tied as f64 + 1.0),
        }
    }

    Ok(total / samples as f64)
}

/// Закрытая эвристика силы руки на префлопе.
///
/// Пары: 0.50 + 0.025 за каждый ранг выше двойки.
/// Непарные: вклад старшей и младшей карты, бонус за одномастность и связность.
/// Против нескольких оппонентов equity падает степенным образом.
pub fn preflop_strength(hole: &[Card], opponents: usize) -> Result<f64, EquityError> {
    validate_input(hole, &[], opponents)?;

    let (a, b) = (hole[0], hole[1]);
    let hi = a.rank.value().max(b.rank.value()) as f64;
    let lo = a.rank.value().min(b.rank.value()) as f64;

    let heads_up = if a.rank == b.rank {
        0.50 + (hi - 2.0) * 0.025
    } else {
        let mut s = 0.30 + (hi - 2.0) * 0.012 + (lo - 2.0) * 0.008;
        if a.suit == b.suit {
            s += 0.03;
        }
        match hi - lo {
            g if g == 1.0 => s += 0.02,
            g if g == 2.0 => s += 0.01,
            _ => {}
        }
        s
    };

    let adjusted = heads_up.powf(0.5 + 0.5 * opponents as f64);
    Ok(adjusted.clamp(0.0, 1.0))
}

/// Выбрать способ оценки по конфигу: эвристика на префлопе или Monte Carlo.
pub fn equity_for<R: RandomSource>(
    hole: &[Card],
    board: &[Card],
    opponents: usize,
    config: &EquityConfig,
    rng: &mut R,
) -> Result<f64, EquityError> {
    if board.is_empty() && config.preflop_heuristic {
        preflop_strength(hole, opponents)
    } else {
        estimate_equity(hole, board, opponents, config.samples, rng)
    }
}

/// Ключ кэша: карманные карты и борд без учёта порядка, число оппонентов.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EquityKey {
    hole: [u8; 2],
    board: Vec<u8>,
    opponents: usize,
}

impl EquityKey {
    pub fn new(hole: &[Card], board: &[Card], opponents: usize) -> Self {
        let mut h = [0u8; 2];
        for (slot, card) in h.iter_mut().zip(hole) {
            *slot = card.index();
        }
        h.sort_unstable();
        let mut b: Vec<u8> = board.iter().map(|c| c.index()).collect();
        b.sort_unstable();
        Self {
            hole: h,
            board: b,
            opponents,
        }
    }
}

/// Кэш equity в пределах одной раздачи. Очищается при старте следующей.
#[derive(Clone, Debug, Default)]
pub struct EquityCache {
    entries: HashMap<EquityKey, f64>,
}

impl EquityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &EquityKey) -> Option<f64> {
        self.entries.get(key).copied()
    }

    /// Вернуть значение из кэша или посчитать и запомнить.
    /// Ошибки не кэшируются.
    pub fn get_or_compute<F>(&mut self, key: EquityKey, compute: F) -> Result<f64, EquityError>
    where
        F: FnOnce() -> Result<f64, EquityError>,
    {
        if let Some(v) = self.get(&key) {
            return Ok(v);
        }
        let value = compute()?;
        self.entries.insert(key, value);
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
