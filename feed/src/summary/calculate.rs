/// Confidence is the top digit's share of the window, never reported above this.
pub const CONFIDENCE_CAP: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigitFrequency {
    pub digit: u8,
    pub count: usize,
    /// Share of the window in percent, 0.0..=100.0.
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    /// Recommended digit to trade.
    pub digit: u8,
    /// How long the recommendation is shown as valid, in ticks (roughly seconds).
    pub valid_for: u32,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DigitSummary {
    /// All ten digits, most frequent first.
    pub frequencies: Vec<DigitFrequency>,
    pub signal: Signal,
}

/// Counts each digit of a full window and picks the most frequent one.
///
/// Returns `None` until the window holds `window_size` digits. Rows are ranked by
/// count with a stable sort over digits 0..=9, so on a tie the lowest digit ranks
/// first and becomes the signal.
pub fn calculate_digit_summary(
    digits: &[u8],
    window_size: usize,
    valid_for: u32,
) -> Option<DigitSummary> {
    if window_size == 0 || digits.len() < window_size {
        return None;
    }

    let mut counts = [0usize; 10];
    for &digit in digits {
        if let Some(count) = counts.get_mut(digit as usize) {
            *count += 1;
        }
    }

    let total: usize = counts.iter().sum();
    if total == 0 {
        return None;
    }

    let mut frequencies: Vec<DigitFrequency> = counts
        .iter()
        .enumerate()
        .map(|(digit, &count)| DigitFrequency {
            digit: digit as u8,
            count,
            percent: count as f64 / total as f64 * 100.0,
        })
        .collect();

    frequencies.sort_by(|a, b| b.count.cmp(&a.count));

    let top = frequencies[0];
    let confidence = top
        .percent
        .round_ties_even()
        .min(CONFIDENCE_CAP as f64) as u8;

    Some(DigitSummary {
        frequencies,
        signal: Signal {
            digit: top.digit,
            valid_for,
            confidence,
        },
    })
}
