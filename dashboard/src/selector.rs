use std::io::{self, BufRead};
use std::thread;

use tracing::{debug, warn};

/// Maps selector input to a tracked symbol: either the symbol itself (any case) or its
/// 1-based position in the list.
pub fn resolve_selection(input: &str, symbols: &[String]) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(position) = input.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| symbols.get(index))
            .cloned();
    }

    symbols
        .iter()
        .find(|symbol| symbol.eq_ignore_ascii_case(input))
        .cloned()
}

/// Reads instrument choices from stdin on a background thread. Each valid line is
/// sent to the display loop; the channel disconnects when stdin closes.
pub fn spawn_stdin_selector(symbols: Vec<String>) -> io::Result<flume::Receiver<String>> {
    let (tx, rx) = flume::unbounded::<String>();

    thread::Builder::new()
        .name("instrument-selector".to_string())
        .spawn(move || {
            let stdin = io::stdin();

            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(error) => {
                        warn!(error = %error, "failed to read instrument selection");
                        break;
                    }
                };

                if line.trim().is_empty() {
                    continue;
                }

                match resolve_selection(&line, &symbols) {
                    Some(symbol) => {
                        if tx.send(symbol).is_err() {
                            break;
                        }
                    }
                    None => warn!(
                        input = %line.trim(),
                        "unknown instrument, expected one of {:?} or its number",
                        symbols
                    ),
                }
            }

            debug!("instrument selector finished");
        })?;

    Ok(rx)
}
