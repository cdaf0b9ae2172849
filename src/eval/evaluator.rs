use crate::domain::card::Card;
use crate::domain::hand::HandRank;

use super::hand_rank::{compare_ranks, Comparison, HandCategory};
use super::lookup_tables::{detect_straight, rank_to_bit, ranks_desc, RankMask};

/// Главная функция: вычислить лучшую 5-карточную руку из hole + board.
///
/// Работает для любых 5–7 карт суммарно. Если карт меньше 5 или больше 7 – `None`.
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> Option<HandRank> {
    let total = hole.len() + board.len();
    if !(5..=7).contains(&total) {
        return None;
    }

    let first = hole.iter().chain(board.iter()).next().copied()?;
    let mut all = [first; 7];
    for (slot, card) in all.iter_mut().zip(hole.iter().chain(board.iter())) {
        *slot = *card;
    }
    evaluate_cards(&all[..total])
}

/// Оценить набор из 5–7 карт. Результат не зависит от порядка карт.
pub fn evaluate_cards(cards: &[Card]) -> Option<HandRank> {
    if !(5..=7).contains(&cards.len()) {
        return None;
    }
    Some(rank_cards(cards))
}

/// Сравнить две руки (hole + общий board).
pub fn compare_hands(a: &[Card], b: &[Card], board: &[Card]) -> Option<Comparison> {
    let ra = evaluate_best_hand(a, board)?;
    let rb = evaluate_best_hand(b, board)?;
    Some(compare_ranks(ra, rb))
}

/// Счётчики рангов и мастей по набору карт.
struct CardCounts {
    /// rank_counts[v] – сколько карт ранга v (2..14).
    rank_counts: [u8; 15],
    rank_mask: RankMask,
    /// Маска рангов по каждой масти.
    suit_masks: [RankMask; 4],
    suit_counts: [u8; 4],
}

impl CardCounts {
    fn from_cards(cards: &[Card]) -> Self {
        let mut counts = CardCounts {
            rank_counts: [0; 15],
            rank_mask: 0,
            suit_masks: [0; 4],
            suit_counts: [0; 4],
        };
        for card in cards {
            let bit = rank_to_bit(card.rank);
            let suit = card.suit.index();
            counts.rank_counts[card.rank.value() as usize] += 1;
            counts.rank_mask |= bit;
            counts.suit_masks[suit] |= bit;
            counts.suit_counts[suit] += 1;
        }
        counts
    }

    /// Ранги, у которых ровно/не меньше `n` карт, по убыванию.
    fn ranks_with_count(&self, n: u8) -> impl Iterator<Item = u8> + '_ {
        (2..=14u8).rev().filter(move |&v| self.rank_counts[v as usize] >= n)
    }

    /// Старшие кикеры, исключая указанные ранги.
    fn kickers(&self, exclude: &[u8], take: usize) -> impl Iterator<Item = u8> + '_ {
        let exclude = exclude.to_vec();
        ranks_desc(self.rank_mask)
            .filter(move |v| !exclude.contains(v))
            .take(take)
    }
}

/// Собрать массив рангов длины 5 (недостающие позиции = 0).
fn pack(ranks: impl IntoIterator<Item = u8>) -> [u8; 5] {
    let mut out = [0u8; 5];
    for (slot, r) in out.iter_mut().zip(ranks) {
        *slot = r;
    }
    out
}

/// Оценка 5–7 карт без перебора комбинаций: по счётчикам рангов и мастей
/// сразу выбираем лучшую 5-карточную руку.
fn rank_cards(cards: &[Card]) -> HandRank {
    let counts = CardCounts::from_cards(cards);

    // Флеш-масть (при 5–7 картах может быть максимум одна).
    let flush_suit = counts.suit_counts.iter().position(|&c| c >= 5);

    // Straight flush.
    if let Some(suit) = flush_suit {
        if let Some(high) = detect_straight(counts.suit_masks[suit]) {
            return HandRank::from_category_and_ranks(HandCategory::StraightFlush, pack([high]));
        }
    }

    // Four of a kind.
    if let Some(quad) = counts.ranks_with_count(4).next() {
        let kicker = counts.kickers(&[quad], 1);
        return HandRank::from_category_and_ranks(
            HandCategory::FourOfAKind,
            pack(std::iter::once(quad).chain(kicker)),
        );
    }

    // Full house: старший сет + лучшая из оставшихся пар (второй сет тоже годится).
    if let Some(trips) = counts.ranks_with_count(3).next() {
        if let Some(pair) = counts.ranks_with_count(2).find(|&v| v != trips) {
            return HandRank::from_category_and_ranks(HandCategory::FullHouse, pack([trips, pair]));
        }
    }

    // Flush: 5 старших карт флеш-масти.
    if let Some(suit) = flush_suit {
        return HandRank::from_category_and_ranks(
            HandCategory::Flush,
            pack(ranks_desc(counts.suit_masks[suit])),
        );
    }

    // Straight.
    if let Some(high) = detect_straight(counts.rank_mask) {
        return HandRank::from_category_and_ranks(HandCategory::Straight, pack([high]));
    }

    // Three of a kind.
    if let Some(trips) = counts.ranks_with_count(3).next() {
        let kickers = counts.kickers(&[trips], 2);
        return HandRank::from_category_and_ranks(
            HandCategory::ThreeOfAKind,
            pack(std::iter::once(trips).chain(kickers)),
        );
    }

    let pairs: Vec<u8> = counts.ranks_with_count(2).take(2).collect();
    match pairs[..] {
        // Two pair: третья пара (если есть) может стать кикером.
        [high, low] => {
            let kicker = counts.kickers(&[high, low], 1);
            HandRank::from_category_and_ranks(
                HandCategory::TwoPair,
                pack([high, low].into_iter().chain(kicker)),
            )
        }
        [pair] => {
            let kickers = counts.kickers(&[pair], 3);
            HandRank::from_category_and_ranks(
                HandCategory::OnePair,
                pack(std::iter::once(pair).chain(kickers)),
            )
        }
        _ => HandRank::from_category_and_ranks(
            HandCategory::HighCard,
            pack(ranks_desc(counts.rank_mask)),
        ),
    }
}
