// tests/engine_actions_tests.rs

//! Тесты action-логики на уровне engine:
//! - validate_action ничего не меняет и считает исход
//! - короткий стек: call → all-in
//! - неполный all-in и блокировка рейза
//! - классы ошибок
//! - история раздачи через start_hand / apply_action

use holdem_engine::domain::{
    Chips, ConfigError, Player, PlayerStatus, RakeConfig, Street, Table, TableConfig,
};
use holdem_engine::engine::{
    apply_action, legal_actions, start_hand, validate_action, ActionOutcome, BetEffect,
    BettingState, EngineError, ErrorKind, HandEventKind, HandStatus, LegalAction, PlayerAction,
    PlayerActionKind,
};
use holdem_engine::infra::DeterministicRng;

/// Раунд ставок на флопе: ставка `bet`, min_raise `min_raise`, в очереди места 0..3.
fn flop_betting(bet: u64, min_raise: u64) -> BettingState {
    BettingState::new(Street::Flop, Chips(bet), Chips(min_raise), vec![0, 1, 2])
}

fn player(seat: u8, stack: u64, bet: u64) -> Player {
    let mut p = Player::new(seat, Chips(stack + bet));
    p.commit(Chips(bet));
    p
}

// ===== VALIDATE_ACTION =====

#[test]
fn validate_action_is_pure() {
    let p = player(0, 500, 0);
    let betting = flop_betting(100, 100);
    let before = p.clone();

    let outcome = validate_action(&p, &PlayerActionKind::Call, &betting).unwrap();
    assert_eq!(outcome, ActionOutcome::Called { added: Chips(100) });
    assert_eq!(p, before);
}

#[test]
fn call_without_bet_is_check() {
    let p = player(0, 500, 0);
    let betting = flop_betting(0, 10);
    assert_eq!(
        validate_action(&p, &PlayerActionKind::Call, &betting),
        Ok(ActionOutcome::Checked)
    );
}

#[test]
fn short_stack_call_goes_all_in() {
    let p = player(1, 60, 0);
    let betting = flop_betting(100, 100);

    let outcome = validate_action(&p, &PlayerActionKind::Call, &betting).unwrap();
    assert_eq!(
        outcome,
        ActionOutcome::AllIn {
            added: Chips(60),
            to: Chips(60),
            effect: BetEffect::None
        }
    );
    assert_eq!(outcome.added(), Chips(60));
}

#[test]
fn opening_bet_and_raise_sizes() {
    let p = player(0, 1_000, 0);

    // Открывающий bet на пустой улице: минимум – BB.
    let open = flop_betting(0, 10);
    assert_eq!(
        validate_action(&p, &PlayerActionKind::Raise(Chips(10)), &open),
        Ok(ActionOutcome::Raised { added: Chips(10), to: Chips(10) })
    );
    assert_eq!(
        validate_action(&p, &PlayerActionKind::Raise(Chips(9)), &open),
        Err(EngineError::RaiseTooSmall { min_to: Chips(10) })
    );

    // Против ставки 100 (прошлый рейз 100) минимум – до 200.
    let facing = flop_betting(100, 100);
    assert_eq!(
        validate_action(&p, &PlayerActionKind::Raise(Chips(199)), &facing),
        Err(EngineError::RaiseTooSmall { min_to: Chips(200) })
    );
    assert!(validate_action(&p, &PlayerActionKind::Raise(Chips(200)), &facing).is_ok());
}

#[test]
fn all_in_effect_depends_on_size() {
    let betting = flop_betting(100, 100);

    let short = player(0, 150, 0);
    let full = player(1, 250, 0);

    assert!(matches!(
        validate_action(&short, &PlayerActionKind::AllIn, &betting),
        Ok(ActionOutcome::AllIn { effect: BetEffect::ShortRaise, .. })
    ));
    assert!(matches!(
        validate_action(&full, &PlayerActionKind::AllIn, &betting),
        Ok(ActionOutcome::AllIn { effect: BetEffect::FullRaise, to, .. }) if to == Chips(250)
    ));
}

#[test]
fn folded_or_all_in_player_cannot_act() {
    let betting = flop_betting(0, 10);

    let mut folded = player(2, 100, 0);
    folded.status = PlayerStatus::Folded;
    assert_eq!(
        validate_action(&folded, &PlayerActionKind::Check, &betting),
        Err(EngineError::PlayerCannotAct(2))
    );
    assert!(legal_actions(&folded, &betting).is_empty());

    let all_in = player(1, 0, 100);
    assert_eq!(all_in.status, PlayerStatus::AllIn);
    assert!(validate_action(&all_in, &PlayerActionKind::Fold, &betting).is_err());
}

// ===== BETTING STATE =====

#[test]
fn short_raise_blocks_only_players_who_already_acted() {
    // Место 0 поставило, место 1 уже ответило, место 2 ещё не ходило.
    let mut betting = flop_betting(0, 10);
    betting.on_raise(0, Chips(100), Chips(100), vec![1, 2, 3]);
    betting.mark_acted(1);
    assert_eq!(betting.to_act, vec![2, 3]);

    // Место 3 идёт all-in на 150 (неполный рейз).
    betting.on_short_raise(3, Chips(150), vec![0, 1, 2]);

    assert_eq!(betting.current_bet, Chips(150));
    assert_eq!(betting.min_raise, Chips(100));
    assert!(!betting.can_raise(0));
    assert!(!betting.can_raise(1));
    assert!(betting.can_raise(2));

    // Полный рейз снимает блокировку.
    betting.on_raise(2, Chips(400), Chips(250), vec![0, 1]);
    assert!(betting.can_raise(0));
    assert!(betting.raise_blocked.is_empty());
}

#[test]
fn blocked_player_sees_only_call_and_fold() {
    let mut betting = flop_betting(100, 100);
    betting.raise_blocked.push(0);

    let p = player(0, 900, 100);
    let facing_short = BettingState {
        current_bet: Chips(150),
        ..betting
    };

    assert_eq!(
        legal_actions(&p, &facing_short),
        vec![LegalAction::Fold, LegalAction::Call(Chips(50))]
    );
}

// ===== ОШИБКИ =====

#[test]
fn error_kinds() {
    assert_eq!(
        EngineError::Invariant("колода".into()).kind(),
        ErrorKind::InvariantViolation
    );
    assert!(!EngineError::Invariant("колода".into()).is_recoverable());
    assert_eq!(
        EngineError::from(ConfigError::ZeroBigBlind).kind(),
        ErrorKind::Configuration
    );
    assert_eq!(EngineError::ReraiseNotAllowed.kind(), ErrorKind::InvalidAction);
    assert!(EngineError::CannotCheck { to_call: Chips(10) }.is_recoverable());
}

#[test]
fn betting_more_than_stack_is_clamped_not_rejected() {
    let p = player(0, 300, 0);
    let betting = flop_betting(100, 100);

    for action in [PlayerActionKind::Raise(Chips(5_000)), PlayerActionKind::AllIn] {
        assert_eq!(
            validate_action(&p, &action, &betting),
            Ok(ActionOutcome::AllIn {
                added: Chips(300),
                to: Chips(300),
                effect: BetEffect::FullRaise
            })
        );
    }

    // Пустой стек – игрок уже в AllIn и не ходит вовсе.
    let broke = player(1, 0, 200);
    assert_eq!(
        validate_action(&broke, &PlayerActionKind::AllIn, &betting),
        Err(EngineError::PlayerCannotAct(1))
    );
}

// ===== HAND ENGINE + HISTORY =====

#[test]
fn hand_history_records_the_hand() {
    let cfg = TableConfig::new(3, Chips(1_000), Chips(5), Chips(10), RakeConfig::disabled());
    let mut table = Table::new(cfg).unwrap();
    let mut rng = DeterministicRng::from_seed(3);

    let mut engine = start_hand(&mut table, &mut rng, 42).unwrap();
    assert_eq!(engine.hand_id, 42);
    assert_eq!(engine.button, 0);
    assert_eq!(engine.current_actor, Some(0));

    let status = apply_action(
        &mut table,
        &mut engine,
        PlayerAction::new(0, PlayerActionKind::Raise(Chips(30))),
    )
    .unwrap();
    assert_eq!(status, HandStatus::Ongoing);
    apply_action(&mut table, &mut engine, PlayerAction::new(1, PlayerActionKind::Fold)).unwrap();
    let status =
        apply_action(&mut table, &mut engine, PlayerAction::new(2, PlayerActionKind::Fold)).unwrap();

    let summary = match status {
        HandStatus::Finished(summary) => summary,
        HandStatus::Ongoing => panic!("раздача должна закончиться"),
    };
    assert_eq!(summary.winners(), vec![0]);
    assert!(engine.is_finished());

    let events: Vec<&HandEventKind> = engine.history.events.iter().map(|e| &e.kind).collect();
    assert!(matches!(events[0], HandEventKind::HandStarted { hand_id: 42, button: 0 }));
    assert!(matches!(
        events[1],
        HandEventKind::BlindsPosted { small_blind: (1, _), big_blind: (2, _) }
    ));
    assert!(matches!(events.last(), Some(HandEventKind::HandFinished { hand_id: 42 })));
    assert!(events
        .iter()
        .any(|e| matches!(e, HandEventKind::UncalledReturned { seat: 0, amount } if *amount == Chips(20))));

    let actions: Vec<u8> = engine.history.actions().map(|(seat, _)| seat).collect();
    assert_eq!(actions, vec![0, 1, 2]);

    // Индексы событий идут подряд.
    for (i, e) in engine.history.events.iter().enumerate() {
        assert_eq!(e.index as usize, i);
    }

    // Ход после завершения отклоняется.
    assert_eq!(
        apply_action(&mut table, &mut engine, PlayerAction::new(0, PlayerActionKind::Check)),
        Err(EngineError::NoActiveHand)
    );
}
