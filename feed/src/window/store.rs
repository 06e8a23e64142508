use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use super::DigitWindow;
use crate::summary::Signal;

/// Connection state of the tick listener as seen by the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Connecting,
    Connected,
    /// `retry_in` is `None` once the listener has stopped for good.
    Disconnected { retry_in: Option<Duration> },
}

impl fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedStatus::Connecting => write!(f, "connecting"),
            FeedStatus::Connected => write!(f, "connected"),
            FeedStatus::Disconnected {
                retry_in: Some(delay),
            } => write!(f, "disconnected, retrying in {:.1}s", delay.as_secs_f64()),
            FeedStatus::Disconnected { retry_in: None } => write!(f, "disconnected"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedCounters {
    pub ticks_accepted: u64,
    pub frames_ignored: u64,
    pub reconnects: u64,
}

/// Per-instrument digit windows and signals, shared between the tick listener
/// (the only writer of windows) and the display loop.
///
/// Every tracked symbol gets an empty window at construction and keeps it for the
/// lifetime of the store.
#[derive(Debug)]
pub struct WindowStore {
    symbols: Vec<String>,
    window_size: usize,
    windows: HashMap<String, Mutex<DigitWindow>>,
    signals: Mutex<HashMap<String, Signal>>,
    status: Mutex<FeedStatus>,
    ticks_accepted: AtomicU64,
    frames_ignored: AtomicU64,
    reconnects: AtomicU64,
}

impl WindowStore {
    pub fn new(symbols: &[String], window_size: usize) -> Self {
        let windows = symbols
            .iter()
            .map(|symbol| (symbol.clone(), Mutex::new(DigitWindow::new(window_size))))
            .collect();

        Self {
            symbols: symbols.to_vec(),
            window_size: window_size.max(1),
            windows,
            signals: Mutex::new(HashMap::new()),
            status: Mutex::new(FeedStatus::Connecting),
            ticks_accepted: AtomicU64::new(0),
            frames_ignored: AtomicU64::new(0),
            reconnects: AtomicU64::new(0),
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Appends a digit to the symbol's window. Returns `false` for untracked symbols.
    pub fn push_digit(&self, symbol: &str, digit: u8) -> bool {
        match self.windows.get(symbol) {
            Some(window) => {
                window.lock().push(digit);
                self.ticks_accepted.fetch_add(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Copy of the symbol's window, oldest digit first.
    pub fn snapshot(&self, symbol: &str) -> Option<Vec<u8>> {
        self.windows.get(symbol).map(|window| window.lock().snapshot())
    }

    pub fn window_len(&self, symbol: &str) -> Option<usize> {
        self.windows.get(symbol).map(|window| window.lock().len())
    }

    pub fn record_signal(&self, symbol: &str, signal: Option<Signal>) {
        let mut signals = self.signals.lock();
        match signal {
            Some(signal) => {
                signals.insert(symbol.to_string(), signal);
            }
            None => {
                signals.remove(symbol);
            }
        }
    }

    pub fn signal(&self, symbol: &str) -> Option<Signal> {
        self.signals.lock().get(symbol).copied()
    }

    pub fn set_status(&self, status: FeedStatus) {
        *self.status.lock() = status;
    }

    pub fn status(&self) -> FeedStatus {
        *self.status.lock()
    }

    pub fn note_ignored_frame(&self) {
        self.frames_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn note_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn counters(&self) -> FeedCounters {
        FeedCounters {
            ticks_accepted: self.ticks_accepted.load(Ordering::Relaxed),
            frames_ignored: self.frames_ignored.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}
