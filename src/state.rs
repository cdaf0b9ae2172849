//! `GameState` – то, что держит внешний код: стол, текущая раздача и учёт
//! фишек за всю сессию. Все операции берут явный `&mut GameState`,
//! глобального состояния нет.

use std::collections::HashSet;

use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::api::{HandResultView, PublicView};
use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::table::{RakeConfig, Table, TableConfig};
use crate::domain::{HandId, SeatIndex};
use crate::engine::actions::{LegalAction, PlayerAction, PlayerActionKind};
use crate::engine::errors::EngineError;
use crate::engine::game_loop::{self, HandEngine, HandStatus};
use crate::engine::validation::{diff_to_call, legal_actions};
use crate::engine::RandomSource;
use crate::eval::{equity_for, EquityCache, EquityKey};

/// Состояние игры: стол + текущая (или последняя завершённая) раздача.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub table: Table,
    /// Текущая раздача. После завершения остаётся до старта следующей,
    /// чтобы можно было прочитать итог.
    pub engine: Option<HandEngine>,
    pub next_hand_id: HandId,
    /// Все фишки сессии: стартовые стеки + ребаи.
    pub chips_in_play: Chips,
    /// Рейк, снятый в завершённых раздачах.
    pub rake_collected: Chips,
    #[serde(skip)]
    equity_cache: EquityCache,
}

impl GameState {
    /// Новая игра: `num_players` игроков со стартовым стеком.
    pub fn new_game(
        num_players: u8,
        starting_stack: Chips,
        small_blind: Chips,
        big_blind: Chips,
        rake: RakeConfig,
    ) -> Result<Self, EngineError> {
        Self::new_game_with(TableConfig::new(
            num_players,
            starting_stack,
            small_blind,
            big_blind,
            rake,
        ))
    }

    pub fn new_game_with(config: TableConfig) -> Result<Self, EngineError> {
        let table = Table::new(config)?;
        let chips_in_play = table.total_stacks();
        Ok(Self {
            table,
            engine: None,
            next_hand_id: 1,
            chips_in_play,
            rake_collected: Chips::ZERO,
            equity_cache: EquityCache::new(),
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.table.config
    }

    /// Живая (не завершённая) раздача.
    fn live_engine(&self) -> Option<&HandEngine> {
        self.engine.as_ref().filter(|e| !e.is_finished())
    }

    /// Начать новую раздачу. Возвращает вид стола для игрока, который ходит первым.
    pub fn start_hand<R: RandomSource>(&mut self, rng: &mut R) -> Result<PublicView, EngineError> {
        let hand_id = self.next_hand_id;
        let engine = game_loop::begin_hand(&mut self.table, rng, hand_id)?;

        self.next_hand_id += 1;
        self.equity_cache.clear();
        self.engine = Some(engine);

        // Если после блайндов ходить некому (все в all-in) – докручиваем борд сразу.
        self.run_step(game_loop::advance_if_needed)?;
        Ok(self.view_for(self.acting_seat()))
    }

    /// Шаг живой раздачи + учёт рейка + проверка инвариантов.
    /// Нарушенный инвариант прерывает раздачу.
    fn run_step<F>(&mut self, step: F) -> Result<(), EngineError>
    where
        F: FnOnce(&mut Table, &mut HandEngine) -> Result<HandStatus, EngineError>,
    {
        let result = {
            let engine = self
                .engine
                .as_mut()
                .filter(|e| !e.is_finished())
                .ok_or(EngineError::NoActiveHand)?;
            step(&mut self.table, &mut *engine).map(|status| match status {
                HandStatus::Finished(_) => engine.pots.rake_taken,
                HandStatus::Ongoing => Chips::ZERO,
            })
        };

        let rake = match result {
            Ok(rake) => rake,
            Err(e) => {
                if let EngineError::Invariant(_) = e {
                    self.abort_hand(&e);
                }
                return Err(e);
            }
        };
        self.rake_collected += rake;

        if let Err(e) = self.check_invariants() {
            self.abort_hand(&e);
            return Err(e);
        }
        Ok(())
    }

    fn abort_hand(&mut self, cause: &EngineError) {
        if let Some(engine) = self.engine.as_mut() {
            game_loop::abort_hand(&mut self.table, engine, &cause.to_string());
        }
    }

    /// Чей сейчас ход.
    pub fn acting_seat(&self) -> Option<SeatIndex> {
        self.live_engine().and_then(|e| e.current_actor)
    }

    /// Допустимые действия места. Не его ход или раздачи нет – пустой список.
    pub fn legal_actions(&self, seat: SeatIndex) -> Vec<LegalAction> {
        match (self.live_engine(), self.table.player(seat)) {
            (Some(engine), Some(player)) if engine.current_actor == Some(seat) => {
                legal_actions(player, &engine.betting)
            }
            _ => Vec::new(),
        }
    }

    /// Применить действие. При ошибке валидации состояние не меняется.
    /// Нарушенный инвариант прерывает раздачу, дальнейшие ходы – `NoActiveHand`.
    /// Возвращает вид стола для следующего ходящего (или для `seat`, если раздача закончилась).
    pub fn apply_action(
        &mut self,
        seat: SeatIndex,
        action: PlayerActionKind,
    ) -> Result<PublicView, EngineError> {
        self.run_step(|table, engine| {
            game_loop::apply_action(table, engine, PlayerAction::new(seat, action))
        })
        .map_err(|e| {
            if e.is_recoverable() {
                warn!("место {seat}: действие {action:?} отклонено: {e}");
            }
            e
        })?;

        Ok(self.view_for(self.acting_seat().or(Some(seat))))
    }

    /// Итог последней завершённой раздачи.
    pub fn hand_result(&self) -> Option<HandResultView> {
        self.engine
            .as_ref()
            .and_then(|e| e.summary.as_ref())
            .map(HandResultView::from)
    }

    /// Оценка equity. Кэшируется в пределах раздачи.
    pub fn equity<R: RandomSource>(
        &mut self,
        hole: &[Card],
        board: &[Card],
        opponents: usize,
        rng: &mut R,
    ) -> Result<f64, EngineError> {
        let config = self.table.config.equity.clone();
        let key = EquityKey::new(hole, board, opponents);
        let value = self
            .equity_cache
            .get_or_compute(key, || equity_for(hole, board, opponents, &config, rng))?;
        Ok(value)
    }

    pub fn equity_cache(&self) -> &EquityCache {
        &self.equity_cache
    }

    /// Действие по умолчанию (например, по таймауту): check, если можно, иначе fold.
    pub fn default_action(&self, seat: SeatIndex) -> Option<PlayerActionKind> {
        let engine = self.live_engine()?;
        if engine.current_actor != Some(seat) {
            return None;
        }
        let player = self.table.player(seat)?;
        if diff_to_call(player, &engine.betting).is_zero() {
            Some(PlayerActionKind::Check)
        } else {
            Some(PlayerActionKind::Fold)
        }
    }

    /// Проверка инвариантов:
    /// - стеки + банк + рейк = все фишки сессии;
    /// - в живой раздаче банк = сумма вкладов игроков;
    /// - ни одна карта не встречается дважды (руки, борд, колода).
    pub fn check_invariants(&self) -> Result<(), EngineError> {
        let live = self.live_engine();
        let in_pot = live.map(|e| e.pots.total).unwrap_or(Chips::ZERO);
        let accounted = self.table.total_stacks() + in_pot + self.rake_collected;
        if accounted != self.chips_in_play {
            let msg = format!(
                "фишки не сходятся: стеки {} + банк {in_pot} + рейк {} != {}",
                self.table.total_stacks(),
                self.rake_collected,
                self.chips_in_play
            );
            error!("{msg}");
            return Err(EngineError::Invariant(msg));
        }

        let committed = self.table.total_committed();
        if live.is_some() && committed != in_pot {
            let msg = format!("банк {in_pot} != вклады игроков {committed}");
            error!("{msg}");
            return Err(EngineError::Invariant(msg));
        }

        let mut seen = HashSet::new();
        let deck = live.map(|e| e.deck.remaining()).unwrap_or(&[]);
        let cards = self
            .table
            .seats
            .iter()
            .flat_map(|p| p.hole_cards.iter())
            .chain(self.table.board.iter())
            .chain(deck.iter());
        for card in cards {
            if !seen.insert(*card) {
                let msg = format!("карта {card} встречается дважды");
                error!("{msg}");
                return Err(EngineError::Invariant(msg));
            }
        }

        Ok(())
    }

    fn ensure_between_hands(&self, seat: SeatIndex) -> Result<(), EngineError> {
        if self.table.player(seat).is_none() {
            return Err(EngineError::InvalidSeat(seat));
        }
        if self.table.hand_in_progress {
            return Err(EngineError::HandInProgress);
        }
        Ok(())
    }

    /// Пропускать раздачи начиная со следующей.
    pub fn sit_out(&mut self, seat: SeatIndex) -> Result<(), EngineError> {
        self.ensure_between_hands(seat)?;
        if let Some(p) = self.table.player_mut(seat) {
            p.sitting_out = true;
        }
        Ok(())
    }

    pub fn sit_in(&mut self, seat: SeatIndex) -> Result<(), EngineError> {
        self.ensure_between_hands(seat)?;
        if let Some(p) = self.table.player_mut(seat) {
            p.sitting_out = false;
        }
        Ok(())
    }

    /// Докупить фишки между раздачами.
    pub fn rebuy(&mut self, seat: SeatIndex, amount: Chips) -> Result<(), EngineError> {
        self.ensure_between_hands(seat)?;
        if let Some(p) = self.table.player_mut(seat) {
            p.stack += amount;
            self.chips_in_play += amount;
        }
        Ok(())
    }

    /// Вид стола глазами `hero` (None – наблюдатель, без карманных карт).
    pub fn view_for(&self, hero: Option<SeatIndex>) -> PublicView {
        PublicView::build(&self.table, self.engine.as_ref(), hero)
    }
}
