//! Drives raw feed frames through the store into the analyzer, the same path the
//! listener thread and the display loop take at runtime.

use digitflow_feed::data_sources::apply_frame;
use digitflow_feed::summary::{refresh_signal, CONFIDENCE_CAP};
use digitflow_feed::{Signal, WindowStore};

const WINDOW_SIZE: usize = 50;
const VALIDITY_TICKS: u32 = 7;

fn tracked() -> Vec<String> {
    ["R_10", "R_25", "R_50", "R_75", "R_100"]
        .iter()
        .map(|symbol| symbol.to_string())
        .collect()
}

fn tick_frame(symbol: &str, quote: &str) -> Vec<u8> {
    format!(r#"{{"tick": {{"symbol": "{}", "quote": "{}"}}}}"#, symbol, quote).into_bytes()
}

#[test]
fn no_signal_until_the_window_is_full() {
    let store = WindowStore::new(&tracked(), WINDOW_SIZE);

    for i in 0..WINDOW_SIZE - 1 {
        assert!(apply_frame(&store, &tick_frame("R_25", &format!("100.0{}", i % 10))));
        assert!(refresh_signal(&store, "R_25", VALIDITY_TICKS).is_none());
    }

    assert!(apply_frame(&store, &tick_frame("R_25", "100.09")));
    assert!(refresh_signal(&store, "R_25", VALIDITY_TICKS).is_some());
}

#[test]
fn constant_last_digit_hits_the_confidence_cap() {
    let store = WindowStore::new(&tracked(), WINDOW_SIZE);

    for i in 0..WINDOW_SIZE {
        apply_frame(&store, &tick_frame("R_100", &format!("{}.13", 900 + i)));
    }

    let summary = refresh_signal(&store, "R_100", VALIDITY_TICKS).unwrap();
    assert_eq!(
        summary.signal,
        Signal {
            digit: 3,
            valid_for: VALIDITY_TICKS,
            confidence: CONFIDENCE_CAP,
        }
    );
    assert_eq!(store.signal("R_100"), Some(summary.signal));
    assert_eq!(store.signal("R_10"), None);
}

#[test]
fn window_slides_forward_oldest_first() {
    let store = WindowStore::new(&tracked(), WINDOW_SIZE);

    for _ in 0..WINDOW_SIZE {
        apply_frame(&store, &tick_frame("R_50", "10.1"));
    }
    for _ in 0..30 {
        apply_frame(&store, &tick_frame("R_50", "10.8"));
    }

    let digits = store.snapshot("R_50").unwrap();
    assert_eq!(digits.len(), WINDOW_SIZE);
    assert_eq!(&digits[..20], &[1u8; 20]);
    assert_eq!(&digits[20..], &[8u8; 30]);

    let summary = refresh_signal(&store, "R_50", VALIDITY_TICKS).unwrap();
    assert_eq!(summary.signal.digit, 8);
    assert_eq!(summary.signal.confidence, 60);
}

#[test]
fn noise_between_ticks_does_not_disturb_the_window() {
    let store = WindowStore::new(&tracked(), WINDOW_SIZE);

    apply_frame(&store, &tick_frame("R_10", "123.47"));
    apply_frame(&store, br#"{"msg_type": "tick", "echo_req": {"ticks": "R_10"}}"#);
    apply_frame(&store, b"<html>bad gateway</html>");
    apply_frame(&store, &tick_frame("R_10", "123.5"));

    assert_eq!(store.snapshot("R_10"), Some(vec![7, 5]));

    let counters = store.counters();
    assert_eq!(counters.ticks_accepted, 2);
    assert_eq!(counters.frames_ignored, 2);
}
