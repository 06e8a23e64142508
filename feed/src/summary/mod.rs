use crate::window::WindowStore;

mod calculate;
pub use calculate::{
    calculate_digit_summary, DigitFrequency, DigitSummary, Signal, CONFIDENCE_CAP,
};

/// Recomputes the signal for `symbol` from a snapshot of its window and records it
/// in the store. Returns `None` for untracked symbols and for windows that are not
/// full yet.
pub fn refresh_signal(store: &WindowStore, symbol: &str, valid_for: u32) -> Option<DigitSummary> {
    let digits = store.snapshot(symbol)?;

    let summary = calculate_digit_summary(&digits, store.window_size(), valid_for);
    store.record_signal(symbol, summary.as_ref().map(|summary| summary.signal));

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_is_recorded_once_the_window_fills() {
        let store = WindowStore::new(&["R_10".to_string()], 5);

        for _ in 0..4 {
            store.push_digit("R_10", 8);
        }
        assert!(refresh_signal(&store, "R_10", 7).is_none());
        assert_eq!(store.signal("R_10"), None);

        store.push_digit("R_10", 8);
        let summary = refresh_signal(&store, "R_10", 7).unwrap();
        assert_eq!(summary.signal.digit, 8);
        assert_eq!(store.signal("R_10"), Some(summary.signal));
    }

    #[test]
    fn untracked_symbol_has_no_summary() {
        let store = WindowStore::new(&["R_10".to_string()], 5);
        assert!(refresh_signal(&store, "R_50", 7).is_none());
    }
}
