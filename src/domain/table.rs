use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::player::Player;

/// Индекс места за столом (0..num_players-1).
pub type SeatIndex = u8;

/// Минимум и максимум игроков за столом.
pub const MIN_PLAYERS: u8 = 2;
pub const MAX_PLAYERS: u8 = 10;

/// Ошибки конфигурации стола.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("число игроков должно быть от 2 до 10, получено {0}")]
    PlayerCount(u8),

    #[error("big blind должен быть больше нуля")]
    ZeroBigBlind,

    #[error("small blind ({small}) больше big blind ({big})")]
    SmallBlindAboveBigBlind { small: Chips, big: Chips },

    #[error("стартовый стек должен быть больше нуля")]
    ZeroStartingStack,

    #[error("ставка рейка {0} bps вне диапазона 0..=10000")]
    RakeRate(u32),

    #[error("количество симуляций equity должно быть больше нуля")]
    ZeroEquitySamples,

    #[error("не удалось прочитать конфиг: {0}")]
    Io(String),

    #[error("не удалось разобрать конфиг: {0}")]
    Parse(String),

    #[error("некорректное значение переменной окружения {name}: {value:?}")]
    Env { name: String, value: String },
}

/// Стейки стола (SB/BB).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
}

impl TableStakes {
    pub fn new(sb: Chips, bb: Chips) -> Self {
        Self {
            small_blind: sb,
            big_blind: bb,
        }
    }
}

/// Рейк: доля банка в базисных пунктах (500 = 5%) и потолок за раздачу.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RakeConfig {
    pub rate_bps: u32,
    pub cap: Option<Chips>,
}

impl RakeConfig {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn new(rate_bps: u32, cap: Option<Chips>) -> Self {
        Self { rate_bps, cap }
    }

    pub fn is_enabled(&self) -> bool {
        self.rate_bps > 0 && self.cap != Some(Chips::ZERO)
    }

    /// Рейк с банка `amount` без учёта потолка (округление вниз).
    pub fn raw_rake(&self, amount: Chips) -> Chips {
        let value = (amount.0 as u128 * self.rate_bps as u128) / 10_000;
        Chips(value as u64)
    }
}

/// Настройки оценки equity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EquityConfig {
    /// Сколько Monte Carlo симуляций на один запрос.
    pub samples: u32,
    /// На префлопе использовать эвристику вместо симуляции.
    pub preflop_heuristic: bool,
}

impl Default for EquityConfig {
    fn default() -> Self {
        Self {
            samples: 1_000,
            preflop_heuristic: true,
        }
    }
}

/// Конфиг стола: сколько игроков, стеки, блайнды, рейк, equity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    pub num_players: u8,
    pub starting_stack: Chips,
    pub stakes: TableStakes,
    #[serde(default)]
    pub rake: RakeConfig,
    #[serde(default)]
    pub equity: EquityConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            num_players: 6,
            starting_stack: Chips(10_000),
            stakes: TableStakes::new(Chips(50), Chips(100)),
            rake: RakeConfig::disabled(),
            equity: EquityConfig::default(),
        }
    }
}

impl TableConfig {
    pub fn new(
        num_players: u8,
        starting_stack: Chips,
        small_blind: Chips,
        big_blind: Chips,
        rake: RakeConfig,
    ) -> Self {
        Self {
            num_players,
            starting_stack,
            stakes: TableStakes::new(small_blind, big_blind),
            rake,
            equity: EquityConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.num_players) {
            return Err(ConfigError::PlayerCount(self.num_players));
        }
        if self.stakes.big_blind.is_zero() {
            return Err(ConfigError::ZeroBigBlind);
        }
        if self.stakes.small_blind > self.stakes.big_blind {
            return Err(ConfigError::SmallBlindAboveBigBlind {
                small: self.stakes.small_blind,
                big: self.stakes.big_blind,
            });
        }
        if self.starting_stack.is_zero() {
            return Err(ConfigError::ZeroStartingStack);
        }
        if self.rake.rate_bps > 10_000 {
            return Err(ConfigError::RakeRate(self.rake.rate_bps));
        }
        if self.equity.samples == 0 {
            return Err(ConfigError::ZeroEquitySamples);
        }
        Ok(())
    }
}

/// Основное состояние стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub config: TableConfig,

    /// Места за столом: индекс вектора = SeatIndex. Арена фиксированного размера,
    /// игроки не удаляются, только меняют статус.
    pub seats: Vec<Player>,

    /// Общие карты борда (0, 3, 4 или 5 карт).
    pub board: Vec<Card>,

    /// Место дилерской кнопки или None, если раздач ещё не было.
    pub dealer_button: Option<SeatIndex>,

    /// Текущая улица раздачи.
    pub street: Street,

    /// Идёт ли сейчас раздача.
    pub hand_in_progress: bool,

    /// Сколько раздач начато за сессию.
    pub hands_played: u64,
}

impl Table {
    /// Создать стол и рассадить `num_players` игроков со стартовым стеком.
    pub fn new(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seats = (0..config.num_players)
            .map(|seat| Player::new(seat, config.starting_stack))
            .collect();
        Ok(Self {
            config,
            seats,
            board: Vec::new(),
            dealer_button: None,
            street: Street::Preflop,
            hand_in_progress: false,
            hands_played: 0,
        })
    }

    pub fn num_seats(&self) -> usize {
        self.seats.len()
    }

    pub fn player(&self, seat: SeatIndex) -> Option<&Player> {
        self.seats.get(seat as usize)
    }

    pub fn player_mut(&mut self, seat: SeatIndex) -> Option<&mut Player> {
        self.seats.get_mut(seat as usize)
    }

    /// Сумма стеков всех игроков.
    pub fn total_stacks(&self) -> Chips {
        self.seats.iter().map(|p| p.stack).sum()
    }

    /// Сумма вкладов за текущую раздачу.
    pub fn total_committed(&self) -> Chips {
        self.seats.iter().map(|p| p.total_bet_this_hand).sum()
    }
}
