//! Тесты эвалюатора: категории рук, wheel, лучшая пятёрка из 7,
//! независимость от порядка карт и согласованность сравнения.

use holdem_engine::domain::{parse_cards, Card, HandRank};
use holdem_engine::engine::RandomSource;
use holdem_engine::eval::{
    compare_hands, compare_ranks, describe_hand, evaluate_best_hand, evaluate_cards, Comparison,
    HandCategory,
};
use holdem_engine::infra::DeterministicRng;

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).unwrap()
}

fn rank(s: &str) -> HandRank {
    evaluate_cards(&cards(s)).unwrap()
}

// ===== КАТЕГОРИИ =====

#[test]
fn classifies_every_category() {
    let cases = [
        ("Ah Kd 9c 7s 3h", HandCategory::HighCard),
        ("Ah Ad 9c 7s 3h", HandCategory::OnePair),
        ("Ah Ad 9c 9s 3h", HandCategory::TwoPair),
        ("Ah Ad Ac 9s 3h", HandCategory::ThreeOfAKind),
        ("9h Td Jc Qs Kh", HandCategory::Straight),
        ("Ah Th 9h 7h 3h", HandCategory::Flush),
        ("Ah Ad Ac 9s 9h", HandCategory::FullHouse),
        ("Ah Ad Ac As 9h", HandCategory::FourOfAKind),
        ("9h Th Jh Qh Kh", HandCategory::StraightFlush),
    ];
    for (hand, category) in cases {
        assert_eq!(rank(hand).category(), category, "рука {hand}");
    }
}

#[test]
fn categories_are_strictly_ordered() {
    let ladder = [
        "Ah Kd 9c 7s 3h",
        "2h 2d 4c 5s 7h",
        "2h 2d 3c 3s 5h",
        "2h 2d 2c 4s 5h",
        "Ah 2d 3c 4s 5h",
        "2h 4h 6h 8h Th",
        "2h 2d 2c 3s 3h",
        "2h 2d 2c 2s 3h",
        "Ah 2h 3h 4h 5h",
    ];
    for pair in ladder.windows(2) {
        assert!(rank(pair[0]) < rank(pair[1]), "{} < {}", pair[0], pair[1]);
    }
}

#[test]
fn wheel_is_lowest_straight() {
    let wheel = rank("Ah 2d 3c 4s 5h");
    let six_high = rank("2d 3c 4s 5h 6c");
    assert_eq!(wheel.category(), HandCategory::Straight);
    assert!(wheel < six_high);

    let steel_wheel = rank("Ac 2c 3c 4c 5c");
    assert_eq!(steel_wheel.category(), HandCategory::StraightFlush);
    assert!(steel_wheel < rank("2c 3c 4c 5c 6c"));
}

#[test]
fn kickers_break_ties() {
    assert!(rank("Ah Ad Kc 7s 3h") > rank("Ah Ad Qc 7s 3h"));
    assert!(rank("Kh Kd 5c 5s Ah") > rank("Kh Kd 5c 5s Qh"));
    assert_eq!(rank("Ah Ad Kc 7s 3h"), rank("As Ac Kd 7h 3c"));
}

// ===== ЛУЧШАЯ ПЯТЁРКА ИЗ 7 =====

#[test]
fn best_five_out_of_seven() {
    let hole = cards("Ah Kh");
    let board = cards("Qh Jh Th 2c 3d");
    let r = evaluate_best_hand(&hole, &board).unwrap();
    assert_eq!(r.category(), HandCategory::StraightFlush);
    assert_eq!(describe_hand(r), "Straight flush");

    // Флеш на борде сильнее стрита из руки.
    let r = evaluate_best_hand(&cards("9c Tc"), &cards("Jh Qh Kh 2h 5h")).unwrap();
    assert_eq!(r.category(), HandCategory::Flush);
}

#[test]
fn board_plays_for_both() {
    let board = cards("Ah Kh Qh Jh Th");
    assert_eq!(
        compare_hands(&cards("2c 3d"), &cards("4s 5s"), &board),
        Some(Comparison::Tie)
    );
}

#[test]
fn straight_beats_three_of_a_kind_on_seven_cards() {
    let r = evaluate_best_hand(&cards("8c 8d"), &cards("8h 9s Tc Jd Qc")).unwrap();
    assert_eq!(r.category(), HandCategory::Straight);
}

#[test]
fn wrong_number_of_cards_is_rejected() {
    assert!(evaluate_cards(&cards("Ah Kh Qh Jh")).is_none());
    assert!(evaluate_cards(&cards("Ah Kh Qh Jh Th 9h 8h 7h")).is_none());
    assert!(evaluate_best_hand(&cards("Ah Kh"), &cards("2c 3c")).is_none());
}

// ===== СВОЙСТВА =====

#[test]
fn rank_is_permutation_invariant() {
    let mut rng = DeterministicRng::from_seed(11);
    let mut deck = holdem_engine::domain::Deck::standard_52();

    for _ in 0..200 {
        rng.shuffle(&mut deck.cards);
        let mut seven: Vec<Card> = deck.cards[..7].to_vec();
        let base = evaluate_cards(&seven).unwrap();
        for _ in 0..5 {
            rng.shuffle(&mut seven);
            assert_eq!(evaluate_cards(&seven), Some(base));
        }
    }
}

#[test]
fn compare_is_antisymmetric() {
    let mut rng = DeterministicRng::from_seed(3);
    let mut deck = holdem_engine::domain::Deck::standard_52();

    for _ in 0..300 {
        rng.shuffle(&mut deck.cards);
        let board = &deck.cards[4..9];
        let a = &deck.cards[0..2];
        let b = &deck.cards[2..4];

        let ab = compare_hands(a, b, board).unwrap();
        let ba = compare_hands(b, a, board).unwrap();
        let expected = match ab {
            Comparison::FirstWins => Comparison::SecondWins,
            Comparison::SecondWins => Comparison::FirstWins,
            Comparison::Tie => Comparison::Tie,
        };
        assert_eq!(ba, expected);

        let ra = evaluate_best_hand(a, board).unwrap();
        let rb = evaluate_best_hand(b, board).unwrap();
        assert_eq!(ab == Comparison::Tie, ra == rb);
        assert_eq!(compare_ranks(ra, rb), ab);
    }
}
