use std::collections::BTreeMap;

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{HandRank, HandSummary, PlayerHandResult, Street};
use crate::domain::player::PlayerStatus;
use crate::domain::table::Table;
use crate::domain::{HandId, SeatIndex};
use crate::engine::actions::{ActionOutcome, BetEffect, PlayerAction};
use crate::engine::betting::BettingState;
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::engine::positions::{
    active_after, active_left_of, circle_left_of, dealt_in_order, next_dealer,
};
use crate::engine::pot::PotManager;
use crate::engine::RandomSource;
use crate::eval::evaluate_best_hand;

/// Статус раздачи для внешнего кода.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandStatus {
    Ongoing,
    Finished(HandSummary),
}

/// Внутреннее состояние раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEngine {
    pub hand_id: HandId,
    pub button: SeatIndex,
    pub deck: Deck,
    pub betting: BettingState,
    pub pots: PotManager,
    /// Чей сейчас ход (seat).
    pub current_actor: Option<SeatIndex>,
    /// История раздачи.
    pub history: HandHistory,
    /// Итог раздачи, когда она завершена.
    pub summary: Option<HandSummary>,
    /// Причина, если раздача прервана (нарушен инвариант).
    #[serde(default)]
    pub aborted: Option<String>,
}

impl HandEngine {
    /// Раздача закончена: сыграна до конца или прервана.
    pub fn is_finished(&self) -> bool {
        self.summary.is_some() || self.aborted.is_some()
    }
}

/// Сколько игроков могут получить карты: есть фишки и не sit out.
fn fundable_players(table: &Table) -> usize {
    table
        .seats
        .iter()
        .filter(|p| !p.sitting_out && !p.stack.is_zero())
        .count()
}

fn deck_exhausted() -> EngineError {
    EngineError::Invariant("в колоде закончились карты".to_string())
}

/// Старт новой раздачи: `begin_hand` и сразу `advance_if_needed`
/// (если после блайндов ходить некому, борд докручивается).
pub fn start_hand<R: RandomSource>(
    table: &mut Table,
    rng: &mut R,
    new_hand_id: HandId,
) -> Result<HandEngine, EngineError> {
    let mut engine = begin_hand(table, rng, new_hand_id)?;
    advance_if_needed(table, &mut engine)?;
    Ok(engine)
}

/// Подготовка раздачи:
/// - выбирает дилера;
/// - раздаёт карманные карты;
/// - постит блайнды;
/// - настраивает BettingState и current_actor.
///
/// Ошибка возможна только до первой ставки, стол при этом не меняется.
pub fn begin_hand<R: RandomSource>(
    table: &mut Table,
    rng: &mut R,
    new_hand_id: HandId,
) -> Result<HandEngine, EngineError> {
    if table.hand_in_progress {
        return Err(EngineError::HandAlreadyInProgress);
    }
    if fundable_players(table) < 2 {
        return Err(EngineError::NotEnoughPlayers);
    }

    // Сброс board и полей раздачи у игроков.
    for p in table.seats.iter_mut() {
        p.reset_for_hand();
    }
    table.board.clear();
    table.street = Street::Preflop;

    // Определяем дилера (кнопку).
    let button = next_dealer(table).ok_or(EngineError::NotEnoughPlayers)?;

    // Хедз-ап: кнопка ставит SB и ходит первой на префлопе.
    let order = dealt_in_order(table, button);
    let (sb_seat, bb_seat) = match order[..] {
        [bb, btn] => (btn, bb),
        [sb, bb, ..] => (sb, bb),
        _ => return Err(EngineError::NotEnoughPlayers),
    };

    let mut deck = Deck::standard_52();
    rng.shuffle(&mut deck.cards);

    // Hole cards: по 2 карты, по кругу начиная слева от кнопки.
    let dealt = deck
        .draw_n(order.len() * 2)
        .ok_or_else(deck_exhausted)?;
    let (first, second) = dealt.split_at(order.len());
    for (i, &seat) in order.iter().enumerate() {
        table.seats[seat as usize].hole_cards = vec![first[i], second[i]];
    }
    table.dealer_button = Some(button);

    let stakes = table.config.stakes.clone();
    let mut pots = PotManager::new(stakes.clone(), table.config.rake.clone());
    let mut history = HandHistory::new();
    history.push(HandEventKind::HandStarted {
        hand_id: new_hand_id,
        button,
    });

    let sb_paid = pots.post_blind(&mut table.seats[sb_seat as usize], stakes.small_blind);
    let bb_paid = pots.post_blind(&mut table.seats[bb_seat as usize], stakes.big_blind);
    history.push(HandEventKind::BlindsPosted {
        small_blind: (sb_seat, sb_paid),
        big_blind: (bb_seat, bb_paid),
    });
    for &seat in &order {
        history.push(HandEventKind::HoleCardsDealt {
            seat,
            cards: table.seats[seat as usize].hole_cards.clone(),
        });
    }

    // Первым на префлопе ходит первый активный слева от BB, BB закрывает круг.
    // Ставка для колла – номинальный BB, даже если BB поставил меньше.
    let mut to_act = active_after(table, bb_seat);
    if table.seats[bb_seat as usize].can_act() {
        to_act.push(bb_seat);
    }
    let betting = BettingState::new(Street::Preflop, stakes.big_blind, stakes.big_blind, to_act);

    table.hand_in_progress = true;
    table.hands_played += 1;

    info!(
        "раздача #{new_hand_id}: кнопка {button}, SB {sb_seat} ({sb_paid}), BB {bb_seat} ({bb_paid}), игроков {}",
        order.len()
    );

    Ok(HandEngine {
        hand_id: new_hand_id,
        button,
        deck,
        current_actor: betting.next_to_act(),
        betting,
        pots,
        history,
        summary: None,
        aborted: None,
    })
}

/// Прервать раздачу после нарушения инварианта.
///
/// Вклады за раздачу возвращаются в стеки, стол свободен для следующей
/// раздачи. Банки, борд, карты и история остаются для диагностики.
pub fn abort_hand(table: &mut Table, engine: &mut HandEngine, reason: &str) {
    if engine.is_finished() {
        return;
    }

    for p in table.seats.iter_mut() {
        let committed = p.total_bet_this_hand;
        p.refund(committed);
    }
    table.hand_in_progress = false;
    engine.current_actor = None;
    engine.betting.to_act.clear();
    engine.history.push(HandEventKind::HandAborted {
        hand_id: engine.hand_id,
        reason: reason.to_string(),
    });
    engine.aborted = Some(reason.to_string());

    error!(
        "раздача #{} прервана: {reason}; банки {:?}, стол {:?}",
        engine.hand_id, engine.pots, table
    );
}

/// Применить действие игрока. Возвращает статус раздачи (идёт / закончилась).
///
/// Все проверки выполняются до изменения состояния.
pub fn apply_action(
    table: &mut Table,
    engine: &mut HandEngine,
    action: PlayerAction,
) -> Result<HandStatus, EngineError> {
    if !table.hand_in_progress || engine.is_finished() {
        return Err(EngineError::NoActiveHand);
    }

    let seat = action.seat;
    if table.player(seat).is_none() {
        return Err(EngineError::InvalidSeat(seat));
    }

    // Проверяем, что сейчас ход этого seat.
    if engine.current_actor != Some(seat) {
        return Err(EngineError::NotPlayersTurn {
            expected: engine.current_actor,
            actual: seat,
        });
    }

    let current_bet_before = engine.betting.current_bet;
    let player = &mut table.seats[seat as usize];
    let outcome = engine
        .pots
        .apply_action(player, &action.kind, &engine.betting)?;
    let new_stack = player.stack;

    // Обновляем раунд ставок.
    match outcome {
        ActionOutcome::Raised { to, .. }
        | ActionOutcome::AllIn {
            to,
            effect: BetEffect::FullRaise,
            ..
        } => {
            let order = active_after(table, seat);
            engine
                .betting
                .on_raise(seat, to, to - current_bet_before, order);
        }
        ActionOutcome::AllIn {
            to,
            effect: BetEffect::ShortRaise,
            ..
        } => {
            let order = active_after(table, seat);
            engine.betting.on_short_raise(seat, to, order);
        }
        _ => {}
    }

    // Текущий игрок походил → убираем из очереди.
    engine.betting.mark_acted(seat);

    engine.history.push(HandEventKind::PlayerActed {
        seat,
        outcome,
        new_stack,
        pot_after: engine.pots.total,
    });
    debug!("место {seat}: {outcome:?}, стек {new_stack}, банк {}", engine.pots.total);

    advance_if_needed(table, engine)
}

/// Подсчёт игроков, претендующих на банк (не folded, сданы в раздачу).
fn count_in_hand(table: &Table) -> usize {
    table.seats.iter().filter(|p| p.is_in_hand()).count()
}

/// Торговля на улице невозможна: ходить некому, или единственному
/// активному игроку нечего уравнивать.
fn betting_closed(table: &Table, betting: &BettingState) -> bool {
    let mut active = table.seats.iter().filter(|p| p.can_act());
    match (active.next(), active.next()) {
        (None, _) => true,
        (Some(p), None) => p.bet_this_round >= betting.current_bet,
        _ => false,
    }
}

/// Переход улиц / шоудаун / завершение раздачи.
///
/// Если торговля невозможна (остальные в all-in), оставшиеся улицы
/// открываются подряд без ставок.
pub fn advance_if_needed(
    table: &mut Table,
    engine: &mut HandEngine,
) -> Result<HandStatus, EngineError> {
    loop {
        if let Some(summary) = &engine.summary {
            return Ok(HandStatus::Finished(summary.clone()));
        }

        // Остался один претендент – забирает банк без шоудауна.
        if count_in_hand(table) <= 1 {
            return finish_hand(table, engine, false);
        }

        if !engine.betting.is_round_complete() && !betting_closed(table, &engine.betting) {
            engine.current_actor = engine.betting.next_to_act();
            return Ok(HandStatus::Ongoing);
        }

        let next = match table.street {
            Street::River => return finish_hand(table, engine, true),
            street => street.next().ok_or_else(|| {
                EngineError::Invariant(format!("переход с улицы {street:?}"))
            })?,
        };
        deal_street(table, engine, next)?;
    }
}

/// Сжечь карту, открыть карты улицы и начать новый раунд ставок.
fn deal_street(table: &mut Table, engine: &mut HandEngine, street: Street) -> Result<(), EngineError> {
    engine.deck.burn().ok_or_else(deck_exhausted)?;
    let cards = engine
        .deck
        .draw_n(street.cards_dealt())
        .ok_or_else(deck_exhausted)?;
    table.board.extend_from_slice(&cards);
    table.street = street;

    engine.history.push(HandEventKind::BoardDealt { street, cards });
    engine.history.push(HandEventKind::StreetChanged { street });
    debug!("улица {street:?}: борд {:?}", table.board);

    for p in table.seats.iter_mut() {
        p.bet_this_round = Chips::ZERO;
    }

    // На постфлоп улицах первым ходит первый активный игрок слева от дилера.
    // Если активных меньше двух – торговли нет, очередь пустая.
    let mut to_act = active_left_of(table, engine.button);
    if to_act.len() < 2 {
        to_act.clear();
    }
    engine.betting = BettingState::new(street, Chips::ZERO, table.config.stakes.big_blind, to_act);
    engine.current_actor = engine.betting.next_to_act();
    Ok(())
}

/// Завершение раздачи: возврат несколлированного, банки, рейк, шоудаун, выплаты.
fn finish_hand(
    table: &mut Table,
    engine: &mut HandEngine,
    showdown: bool,
) -> Result<HandStatus, EngineError> {
    let total_pot = engine.pots.total;

    let uncalled = engine.pots.return_uncalled(&mut table.seats);
    if let Some((seat, amount)) = uncalled {
        engine
            .history
            .push(HandEventKind::UncalledReturned { seat, amount });
    }

    engine.pots.finalize_pots(&table.seats);
    let rake = engine.pots.rake_all();
    if !rake.is_zero() {
        engine.history.push(HandEventKind::RakeTaken { amount: rake });
    }

    // Вскрытие: ранжируем всех, кто дошёл до шоудауна.
    let mut ranks: BTreeMap<SeatIndex, HandRank> = BTreeMap::new();
    if showdown {
        for p in table.seats.iter().filter(|p| p.is_in_hand()) {
            let rank = evaluate_best_hand(&p.hole_cards, &table.board).ok_or_else(|| {
                EngineError::Invariant(format!(
                    "не удалось оценить руку места {}: {} + {} карт",
                    p.seat,
                    p.hole_cards.len(),
                    table.board.len()
                ))
            })?;
            ranks.insert(p.seat, rank);
            engine.history.push(HandEventKind::ShowdownReveal {
                seat: p.seat,
                hole_cards: p.hole_cards.clone(),
                rank,
            });
        }
    }

    let order = circle_left_of(table, engine.button, |_| true);
    let won = engine.pots.distribute(&mut table.seats, &ranks, &order)?;
    for (&seat, &amount) in &won {
        engine
            .history
            .push(HandEventKind::PotAwarded { seat, amount });
    }

    let results: Vec<PlayerHandResult> = table
        .seats
        .iter()
        .filter(|p| p.status != PlayerStatus::SittingOut)
        .map(|p| {
            let won = won.get(&p.seat).copied().unwrap_or(Chips::ZERO);
            let invested = p.total_bet_this_hand;
            PlayerHandResult {
                seat: p.seat,
                rank: ranks.get(&p.seat).copied(),
                revealed: ranks.get(&p.seat).map(|_| p.hole_cards.clone()),
                invested,
                won,
                net: won.signed_diff(invested),
                is_winner: !won.is_zero(),
            }
        })
        .collect();

    if showdown {
        table.street = Street::Showdown;
    }

    let summary = HandSummary {
        hand_id: engine.hand_id,
        street_reached: table.street,
        went_to_showdown: showdown,
        board: table.board.clone(),
        total_pot,
        uncalled_returned: uncalled,
        rake,
        results,
    };

    for p in table.seats.iter_mut() {
        p.hole_cards.clear();
    }
    table.hand_in_progress = false;
    engine.current_actor = None;
    engine.betting.to_act.clear();
    engine.history.push(HandEventKind::HandFinished {
        hand_id: engine.hand_id,
    });

    info!(
        "раздача #{} завершена на {:?}: банк {total_pot}, рейк {rake}, победители {:?}",
        engine.hand_id,
        summary.street_reached,
        summary.winners()
    );

    engine.summary = Some(summary.clone());
    Ok(HandStatus::Finished(summary))
}
