use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};

/// Колода карт. В домене – просто упорядоченный список карт,
/// который раздаётся сверху вниз (с начала списка).
/// Перемешивание делает engine (через RNG из infra), НЕ здесь.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
    /// Сколько карт уже роздано (позиция "верха" колоды).
    pub position: usize,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards, position: 0 }
    }

    /// Сколько карт ещё не роздано.
    pub fn len(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Взять одну карту сверху колоды.
    pub fn draw_one(&mut self) -> Option<Card> {
        let card = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(card)
    }

    /// Взять n карт сверху. Если карт не хватает – `None`, колода не трогается.
    pub fn draw_n(&mut self, n: usize) -> Option<Vec<Card>> {
        if self.len() < n {
            return None;
        }
        let taken = self.cards[self.position..self.position + n].to_vec();
        self.position += n;
        Some(taken)
    }

    /// Сжечь карту (burn) перед улицей.
    pub fn burn(&mut self) -> Option<Card> {
        self.draw_one()
    }

    /// Ещё не розданные карты, в порядке раздачи.
    pub fn remaining(&self) -> &[Card] {
        &self.cards[self.position.min(self.cards.len())..]
    }
}
