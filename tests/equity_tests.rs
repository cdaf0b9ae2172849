//! Тесты equity: Monte Carlo с фиксированным seed, префлоп-эвристика,
//! ошибки входа и кэш в пределах раздачи.

use holdem_engine::domain::{parse_cards, Card, Chips, EquityConfig, RakeConfig};
use holdem_engine::eval::{equity_for, estimate_equity, preflop_strength, EquityError};
use holdem_engine::infra::DeterministicRng;
use holdem_engine::GameState;

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).unwrap()
}

// ===== MONTE CARLO =====

#[test]
fn pair_beats_no_pair_on_same_board() {
    let board = cards("Kc 7d 2s");
    let mut rng = DeterministicRng::from_seed(7);

    let aces = estimate_equity(&cards("Ah Ad"), &board, 1, 2_000, &mut rng).unwrap();
    let queen_jack = estimate_equity(&cards("Qh Jd"), &board, 1, 2_000, &mut rng).unwrap();

    assert!(aces > queen_jack, "AA {aces} должно быть выше QJ {queen_jack}");
    assert!(aces > 0.75);
}

#[test]
fn nuts_on_river_is_certain() {
    let mut rng = DeterministicRng::from_seed(1);
    let eq = estimate_equity(&cards("Ah Kh"), &cards("Qh Jh Th 2c 3d"), 3, 300, &mut rng).unwrap();
    assert_eq!(eq, 1.0);
}

#[test]
fn board_royal_flush_splits_evenly() {
    let board = cards("Ah Kh Qh Jh Th");
    let mut rng = DeterministicRng::from_seed(5);

    let heads_up = estimate_equity(&cards("2c 3c"), &board, 1, 200, &mut rng).unwrap();
    assert!((heads_up - 0.5).abs() < 1e-9);

    let three_way = estimate_equity(&cards("2c 3c"), &board, 2, 200, &mut rng).unwrap();
    assert!((three_way - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn same_seed_gives_same_estimate() {
    let board = cards("9s 8s 2d");
    let a = estimate_equity(&cards("As Ks"), &board, 2, 500, &mut DeterministicRng::from_seed(99));
    let b = estimate_equity(&cards("As Ks"), &board, 2, 500, &mut DeterministicRng::from_seed(99));
    assert_eq!(a, b);
}

#[test]
fn equity_input_errors() {
    let mut rng = DeterministicRng::from_seed(0);

    assert_eq!(
        estimate_equity(&cards("Ah"), &[], 1, 10, &mut rng),
        Err(EquityError::HoleCards(1))
    );
    assert_eq!(
        estimate_equity(&cards("Ah Kd"), &cards("2c 3c 4c 5c 6c 7c"), 1, 10, &mut rng),
        Err(EquityError::BoardTooLong(6))
    );
    assert_eq!(
        estimate_equity(&cards("Ah Kd"), &cards("Ah 3c 4c"), 1, 10, &mut rng),
        Err(EquityError::DuplicateCard("Ah".parse().unwrap()))
    );
    assert_eq!(
        estimate_equity(&cards("Ah Kd"), &[], 0, 10, &mut rng),
        Err(EquityError::Opponents(0))
    );
    assert_eq!(
        estimate_equity(&cards("Ah Kd"), &[], 1, 0, &mut rng),
        Err(EquityError::ZeroSamples)
    );
}

// ===== ПРЕФЛОП-ЭВРИСТИКА =====

#[test]
fn preflop_heuristic_orders_hands() {
    let aa = preflop_strength(&cards("Ah Ad"), 1).unwrap();
    let kk = preflop_strength(&cards("Kh Kd"), 1).unwrap();
    let aks = preflop_strength(&cards("Ah Ks"), 1).unwrap();
    let seven_two = preflop_strength(&cards("7h 2d"), 1).unwrap();

    assert!(aa > kk);
    assert!(kk > aks);
    assert!(aks > seven_two);
    assert!((0.0..=1.0).contains(&seven_two));
}

#[test]
fn preflop_heuristic_drops_against_more_opponents() {
    let hu = preflop_strength(&cards("Qh Qd"), 1).unwrap();
    let six_way = preflop_strength(&cards("Qh Qd"), 5).unwrap();
    assert!(six_way < hu);
}

#[test]
fn suited_connectors_get_bonus() {
    let suited = preflop_strength(&cards("9h 8h"), 1).unwrap();
    let offsuit = preflop_strength(&cards("9h 8d"), 1).unwrap();
    let gapped = preflop_strength(&cards("9h 5d"), 1).unwrap();
    assert!(suited > offsuit);
    assert!(offsuit > gapped);
}

#[test]
fn config_selects_heuristic_only_preflop() {
    let mut rng = DeterministicRng::from_seed(2);
    let cfg = EquityConfig {
        samples: 100,
        preflop_heuristic: true,
    };

    let pre = equity_for(&cards("Ah Ad"), &[], 1, &cfg, &mut rng).unwrap();
    assert_eq!(pre, preflop_strength(&cards("Ah Ad"), 1).unwrap());

    let river = equity_for(&cards("Ah Kh"), &cards("Qh Jh Th 2c 3d"), 1, &cfg, &mut rng).unwrap();
    assert_eq!(river, 1.0);
}

// ===== КЭШ =====

#[test]
fn game_state_caches_equity_within_hand() {
    let mut state = GameState::new_game(3, Chips(1_000), Chips(5), Chips(10), RakeConfig::disabled()).unwrap();
    state.table.config.equity.samples = 200;
    let mut rng = DeterministicRng::from_seed(4);
    state.start_hand(&mut rng).unwrap();

    let board = cards("Kc 7d 2s");
    let first = state.equity(&cards("Ah Ad"), &board, 2, &mut rng).unwrap();
    let again = state.equity(&cards("Ad Ah"), &board, 2, &mut rng).unwrap();
    assert_eq!(first, again, "порядок карманных карт не важен для кэша");
    assert_eq!(state.equity_cache().len(), 1);

    let shuffled = state.equity(&cards("Ah Ad"), &cards("2s Kc 7d"), 2, &mut rng).unwrap();
    assert_eq!(first, shuffled, "порядок карт борда не важен для кэша");
    assert_eq!(state.equity_cache().len(), 1);

    state.equity(&cards("Ah Ad"), &board, 1, &mut rng).unwrap();
    assert_eq!(state.equity_cache().len(), 2);

    // Ошибки не кэшируются.
    assert!(state.equity(&cards("Ah"), &board, 1, &mut rng).is_err());
    assert_eq!(state.equity_cache().len(), 2);
}

#[test]
fn equity_cache_is_cleared_on_new_hand() {
    let mut state = GameState::new_game(2, Chips(1_000), Chips(5), Chips(10), RakeConfig::disabled()).unwrap();
    let mut rng = DeterministicRng::from_seed(8);
    state.start_hand(&mut rng).unwrap();
    state.equity(&cards("Ah Ad"), &[], 1, &mut rng).unwrap();
    assert_eq!(state.equity_cache().len(), 1);

    // Сбрасываем раздачу фолдом и начинаем следующую.
    let seat = state.acting_seat().unwrap();
    state.apply_action(seat, holdem_engine::PlayerActionKind::Fold).unwrap();
    state.start_hand(&mut rng).unwrap();
    assert!(state.equity_cache().is_empty());
}
