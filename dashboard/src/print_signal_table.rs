use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};

use digitflow_feed::{DigitSummary, FeedCounters, FeedStatus, Signal};

fn clear_terminal() {
    print!("{}c", 27 as char);
}

pub fn build_frequency_table(summary: &DigitSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Digit").fg(Color::Green),
            Cell::new("Count"),
            Cell::new("Percent"),
        ]);

    for (rank, row) in summary.frequencies.iter().enumerate() {
        let percent = format!("{:.1}", row.percent);

        if rank == 0 {
            table.add_row(vec![
                Cell::new(row.digit).fg(Color::Green),
                Cell::new(row.count).fg(Color::Green),
                Cell::new(percent).fg(Color::Green),
            ]);
        } else {
            table.add_row(vec![
                Cell::new(row.digit),
                Cell::new(row.count),
                Cell::new(percent),
            ]);
        }
    }

    table
}

/// Selector entries with each instrument's latest signal, e.g. `1) R_10 [3 @ 40%]`.
fn render_board(board: &[(String, Option<Signal>)]) -> String {
    let choices: Vec<String> = board
        .iter()
        .enumerate()
        .map(|(i, (symbol, signal))| match signal {
            Some(signal) => format!(
                "{}) {} [{} @ {}%]",
                i + 1,
                symbol,
                signal.digit,
                signal.confidence
            ),
            None => format!("{}) {} [-]", i + 1, symbol),
        })
        .collect();

    choices.join("  ")
}

pub fn render_analysis(
    symbol: &str,
    summary: &DigitSummary,
    board: &[(String, Option<Signal>)],
    status: FeedStatus,
    counters: FeedCounters,
) -> String {
    let signal = summary.signal;

    let lines = vec![
        format!("Analysis for {}", symbol),
        build_frequency_table(summary).to_string(),
        format!("Recommended digit to trade: {}", signal.digit),
        format!("Signal valid for next: {} seconds", signal.valid_for),
        format!("Confidence: {}%", signal.confidence),
        String::new(),
        format!(
            "Feed: {} | ticks: {} | ignored frames: {} | reconnects: {}",
            status, counters.ticks_accepted, counters.frames_ignored, counters.reconnects
        ),
        format!("Select instrument (name or number): {}", render_board(board)),
    ];

    lines.join("\n")
}

pub fn print_analysis(
    symbol: &str,
    summary: &DigitSummary,
    board: &[(String, Option<Signal>)],
    status: FeedStatus,
    counters: FeedCounters,
) {
    clear_terminal();
    println!("{}", render_analysis(symbol, summary, board, status, counters));
}

pub fn render_waiting(symbol: &str, collected: usize, window_size: usize) -> String {
    format!(
        "Waiting for a full window on {} ({}/{} ticks)",
        symbol, collected, window_size
    )
}

pub fn print_waiting(symbol: &str, collected: usize, window_size: usize) {
    clear_terminal();
    println!("{}", render_waiting(symbol, collected, window_size));
}

pub fn print_status_line(symbol: &str, status: FeedStatus) {
    println!("Tick feed {} (waiting for a full window on {})", status, symbol);
}

#[cfg(test)]
mod tests {
    use digitflow_feed::summary::calculate_digit_summary;

    use super::*;

    fn board() -> Vec<(String, Option<Signal>)> {
        vec![
            (
                "R_10".to_string(),
                Some(Signal {
                    digit: 4,
                    valid_for: 7,
                    confidence: 40,
                }),
            ),
            ("R_25".to_string(), None),
        ]
    }

    #[test]
    fn table_lists_every_digit_with_count_and_percent() {
        let summary = calculate_digit_summary(&[3; 50], 50, 7).unwrap();
        let table = build_frequency_table(&summary).to_string();

        assert!(table.contains("Digit"));
        assert!(table.contains("Count"));
        assert!(table.contains("Percent"));
        assert!(table.contains("100.0"));
        assert!(table.contains("50"));
        assert_eq!(table.matches("0.0").count(), 10);
    }

    #[test]
    fn rendering_includes_signal_and_selector() {
        let summary = calculate_digit_summary(&[3; 50], 50, 7).unwrap();
        let rendered = render_analysis(
            "R_25",
            &summary,
            &board(),
            FeedStatus::Connected,
            FeedCounters {
                ticks_accepted: 120,
                frames_ignored: 4,
                reconnects: 1,
            },
        );

        assert!(rendered.starts_with("Analysis for R_25"));
        assert!(rendered.contains("Recommended digit to trade: 3"));
        assert!(rendered.contains("Signal valid for next: 7 seconds"));
        assert!(rendered.contains("Confidence: 95%"));
        assert!(rendered.contains("Feed: connected | ticks: 120 | ignored frames: 4 | reconnects: 1"));
        assert!(rendered.contains("1) R_10 [4 @ 40%]  2) R_25 [-]"));
    }

    #[test]
    fn waiting_line_names_the_instrument_and_progress() {
        assert_eq!(
            render_waiting("R_75", 12, 50),
            "Waiting for a full window on R_75 (12/50 ticks)"
        );
    }
}
