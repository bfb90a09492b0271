//! Browser tests, run with `wasm-pack test --headless --firefox crates/ps-wasm`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use ps_wasm::{PixelSlots, evaluate_spin};

wasm_bindgen_test_configure!(run_in_browser);

fn payline(glyphs: &[&str]) -> JsValue {
    serde_wasm_bindgen::to_value(glyphs).unwrap()
}

#[wasm_bindgen_test]
fn test_evaluate_pair() {
    let outcome = evaluate_spin(payline(&["👾", "👾", "🎮"]), 10.0).unwrap();
    let outcome: serde_json::Value = serde_wasm_bindgen::from_value(outcome).unwrap();
    assert_eq!(outcome["isWin"], true);
    assert_eq!(outcome["payout"], 20);
}

#[wasm_bindgen_test]
fn test_spin_round_trip() {
    let mut game = PixelSlots::new(None).unwrap();
    game.reset_balance();
    assert_eq!(game.balance(), 1000.0);

    game.start_spin().unwrap();
    assert!(game.is_spinning());
    assert!(!game.increase_bet(5.0));

    let report = game.resolve_spin(payline(&["🏆", "🏆", "🏆"])).unwrap();
    assert!(!report.is_null());
    assert!(!game.is_spinning());
    assert_eq!(game.balance(), 1000.0 - game.current_bet() + game.current_bet() * 30.0);
}
