//! Integration tests driving the calculator through its public surface:
//! key sequences → engine → history → persistence → export.

use abacus_core::{
    Calculator, Category, Effect, HISTORY_LIMIT, KeyAction, Mode, Operator, PersistedState,
    RateFeed, SoundCue, Theme, convert_units, evaluate, format_number, history_to_csv,
    mock_fetch, parse_key_sequence, plot,
};
use approx::assert_relative_eq;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn run(keys: &str) -> Calculator {
    let mut calc = Calculator::new();
    press(&mut calc, keys);
    calc
}

fn press(calc: &mut Calculator, keys: &str) {
    for action in parse_key_sequence(keys).unwrap() {
        calc.apply(action);
    }
}

#[test]
fn chained_evaluation_has_no_precedence() {
    let calc = run("2 + 3 * 4 =");
    assert_eq!(calc.display(), "20");
    let entry = calc.history().latest().unwrap();
    assert_eq!(entry.expression, "5 × 4");
    assert_eq!(entry.result, "20");
}

#[test]
fn keyboard_session_with_undo_and_redo() {
    let mut calc = run("1 2 + 8 enter");
    assert_eq!(calc.display(), "20");

    press(&mut calc, "ctrl+z");
    assert_eq!(calc.display(), "8");
    assert_eq!(calc.operation(), Some(Operator::Add));
    assert_eq!(calc.previous_value(), "12");

    press(&mut calc, "ctrl+shift+z");
    assert_eq!(calc.display(), "20");

    press(&mut calc, "ctrl+z 5");
    assert!(!calc.can_redo());
    assert_eq!(calc.display(), "85");
}

#[test]
fn error_recovery_via_keyboard() {
    let mut calc = run("7 / 0 =");
    assert_eq!(calc.display(), "Error");
    press(&mut calc, "+ 4");
    assert_eq!(calc.display(), "4");
    press(&mut calc, "* 2 =");
    assert_eq!(calc.display(), "8");
    assert_eq!(calc.history().len(), 1);
}

#[test]
fn history_is_bounded_newest_first() {
    let mut calc = Calculator::new();
    for i in 1..=HISTORY_LIMIT + 1 {
        press(&mut calc, &format!("{i} + 0 ="));
    }
    let history = calc.history();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history.latest().unwrap().expression, "101 + 0");
    assert!(history.iter().all(|e| e.expression != "1 + 0"));
}

#[test]
fn persisted_state_round_trips_through_json() {
    let mut calc = run("6 * 7 =");
    calc.memory_store(42.0);
    calc.set_mode(Mode::Scientific);
    calc.toggle_scientific();
    calc.set_theme(Theme::forest());

    let json = calc.take_persisted().unwrap().to_json().unwrap();
    assert!(json.contains("\"isScientific\":true"));
    assert!(json.contains("\"mode\":\"scientific\""));

    let state = PersistedState::from_json(&json).unwrap();
    let restored = Calculator::restore(state, 50);
    assert_eq!(restored.memory(), 42.0);
    assert_eq!(restored.mode(), Mode::Scientific);
    assert_eq!(restored.theme().name, "forest");
    assert_eq!(restored.history().latest().unwrap().result, "42");
}

#[test]
fn effects_follow_key_presses() {
    let mut calc = Calculator::new();
    calc.apply(KeyAction::Digit('3'));
    calc.apply(KeyAction::Calculate);
    calc.apply(KeyAction::ToggleTheme);
    let effects = calc.drain_effects();
    assert_eq!(effects[0], Effect::Sound(SoundCue::Click));
    assert_eq!(effects[1], Effect::Sound(SoundCue::Equals));
    assert!(matches!(effects[2], Effect::ThemeApplied(ref t) if t.is_dark));
}

#[test]
fn csv_export_of_a_session() {
    let calc = run("1 + 1 = 2 * 3 =");
    let csv = history_to_csv(calc.history().iter()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Expression,Result,Date,Time"));
    assert!(lines.next().unwrap().starts_with("\"2 × 3\",\"6\","));
    assert!(lines.next().unwrap().starts_with("\"1 + 1\",\"2\","));
}

#[test]
fn rate_feed_with_random_fetches() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut feed = RateFeed::new();
    let old = feed.begin_fetch();
    let new = feed.begin_fetch();
    let fresh = mock_fetch(&mut rng);
    let eur = fresh.rate("EUR").unwrap();
    assert!(feed.complete(new, fresh, 10));
    assert!(!feed.complete(old, mock_fetch(&mut rng), 20));
    assert_eq!(feed.rates().rate("EUR"), Some(eur));
}

#[test]
fn plot_drops_invalid_samples() {
    let points = plot("ln(x)", -5.0, 5.0).unwrap();
    assert!(points.iter().all(|p| p.x > 0.0));
    assert!(points.len() < abacus_core::PLOT_SAMPLES);
}

#[test]
fn format_examples() {
    assert!(format_number(1000.0).contains(','));
    assert_eq!(format_number(f64::NAN), "Error");
    assert!(format_number(1e16).contains('e'));
    assert_eq!(format_number(0.1 + 0.2), "0.3");
}

proptest! {
    #[test]
    fn digit_entry_concatenates(digits in "[1-9][0-9]{0,10}") {
        let mut calc = Calculator::new();
        for c in digits.chars() {
            calc.input_digit(c);
        }
        prop_assert_eq!(calc.display(), digits.as_str());
    }

    #[test]
    fn at_most_one_decimal_point(keys in "[0-9.]{1,16}") {
        let mut calc = Calculator::new();
        for c in keys.chars() {
            calc.apply(abacus_core::map_key(&c.to_string(), false, false).unwrap());
        }
        prop_assert!(calc.display().matches('.').count() <= 1);
        prop_assert!(!calc.display().starts_with("00"));
    }

    #[test]
    fn division_fails_only_on_zero(a in -1e6f64..1e6, b in -1e6f64..1e6) {
        match evaluate(a, b, "÷") {
            Ok(q) => {
                prop_assert!(b != 0.0);
                prop_assert!((q - a / b).abs() <= 1e-9 * q.abs().max(1.0));
            }
            Err(_) => prop_assert_eq!(b, 0.0),
        }
    }

    #[test]
    fn undo_restores_prior_state(a in 1u32..1000, b in 1u32..1000, op in 0usize..4) {
        let symbol = ["+", "-", "*", "/"][op];
        let mut calc = run(&format!("{a} {symbol} {b}"));
        let before = (
            calc.display().to_string(),
            calc.previous_value().to_string(),
            calc.operation(),
            calc.memory(),
        );
        calc.calculate();
        calc.undo();
        prop_assert_eq!(calc.display(), before.0.as_str());
        prop_assert_eq!(calc.previous_value(), before.1.as_str());
        prop_assert_eq!(calc.operation(), before.2);
        prop_assert_eq!(calc.memory(), before.3);

        let after_undo = calc.display().to_string();
        calc.redo();
        calc.undo();
        prop_assert_eq!(calc.display(), after_undo.as_str());
    }

    #[test]
    fn clear_then_digit_matches_fresh_session(prefix in "[0-9+*=.-]{0,12}", d in 0u32..10) {
        let digit = char::from_digit(d, 10).unwrap();
        let mut used = Calculator::new();
        press(&mut used, &prefix);
        used.clear();
        used.input_digit(digit);

        let mut fresh = Calculator::new();
        fresh.input_digit(digit);

        prop_assert_eq!(used.display(), fresh.display());
        prop_assert_eq!(used.previous_value(), fresh.previous_value());
        prop_assert_eq!(used.operation(), fresh.operation());
        prop_assert_eq!(used.is_waiting_for_value(), fresh.is_waiting_for_value());
    }

    #[test]
    fn unit_round_trip(v in -1e6f64..1e6, cat in 0usize..5, i in 0usize..9, j in 0usize..9) {
        let category = Category::ALL[cat];
        prop_assume!(category != Category::Temperature);
        let units = category.units();
        let (from, to) = (&units[i % units.len()], &units[j % units.len()]);
        let there = convert_units(v, from.symbol, to.symbol, Some(category)).unwrap();
        let back = convert_units(there, to.symbol, from.symbol, Some(category)).unwrap();
        assert_relative_eq!(back, v, epsilon = 1e-9, max_relative = 1e-12);
    }
}
