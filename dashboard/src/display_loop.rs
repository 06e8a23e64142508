use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::info;

use digitflow_feed::summary::refresh_signal;
use digitflow_feed::{DigitSummary, FeedCounters, FeedStatus, Signal, WindowStore};

use crate::print_signal_table::{print_analysis, print_status_line, print_waiting};

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Analysis {
        symbol: String,
        summary: DigitSummary,
        status: FeedStatus,
        counters: FeedCounters,
        /// Latest recorded signal of every tracked instrument, in selector order.
        board: Vec<(String, Option<Signal>)>,
    },
    /// Replaces the previous instrument's table after a switch to a window that is
    /// not full yet.
    Waiting {
        symbol: String,
        collected: usize,
        window_size: usize,
    },
    /// Shown instead of an analysis when the window is not full and the feed just
    /// went down, so a stalled dashboard never looks healthy.
    FeedDown { symbol: String, status: FeedStatus },
}

pub struct DisplayLoop {
    store: Arc<WindowStore>,
    selection_rx: flume::Receiver<String>,
    selected: String,
    refresh_interval: Duration,
    valid_for: u32,
    last_status: Option<FeedStatus>,
}

impl DisplayLoop {
    pub fn new(
        store: Arc<WindowStore>,
        selection_rx: flume::Receiver<String>,
        selected: String,
        refresh_interval: Duration,
        valid_for: u32,
    ) -> Self {
        Self {
            store,
            selection_rx,
            selected,
            refresh_interval,
            valid_for,
            last_status: None,
        }
    }

    /// Redraws on every interval tick until the task is dropped.
    pub async fn run(mut self) {
        let mut interval = time::interval(self.refresh_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match self.next_frame() {
                Some(Frame::Analysis {
                    symbol,
                    summary,
                    status,
                    counters,
                    board,
                }) => print_analysis(&symbol, &summary, &board, status, counters),
                Some(Frame::Waiting {
                    symbol,
                    collected,
                    window_size,
                }) => print_waiting(&symbol, collected, window_size),
                Some(Frame::FeedDown { symbol, status }) => print_status_line(&symbol, status),
                None => (),
            }
        }
    }

    pub fn next_frame(&mut self) -> Option<Frame> {
        let mut selection_changed = self.last_status.is_none();

        let selection_rx_drain = self.selection_rx.drain();
        if let Some(symbol) = selection_rx_drain.last() {
            if symbol != self.selected {
                info!(symbol = %symbol, "instrument selected");
                self.selected = symbol;
                selection_changed = true;
            }
        }

        let status = self.store.status();
        let status_changed = self.last_status != Some(status);
        self.last_status = Some(status);

        let summary = refresh_signal(&self.store, &self.selected, self.valid_for);
        for symbol in self.store.symbols() {
            if symbol != &self.selected {
                refresh_signal(&self.store, symbol, self.valid_for);
            }
        }

        match summary {
            Some(summary) => Some(Frame::Analysis {
                symbol: self.selected.clone(),
                summary,
                status,
                counters: self.store.counters(),
                board: self.signal_board(),
            }),
            None if status_changed && matches!(status, FeedStatus::Disconnected { .. }) => {
                Some(Frame::FeedDown {
                    symbol: self.selected.clone(),
                    status,
                })
            }
            None if selection_changed => Some(Frame::Waiting {
                symbol: self.selected.clone(),
                collected: self.store.window_len(&self.selected).unwrap_or(0),
                window_size: self.store.window_size(),
            }),
            None => None,
        }
    }

    fn signal_board(&self) -> Vec<(String, Option<Signal>)> {
        self.store
            .symbols()
            .iter()
            .map(|symbol| (symbol.clone(), self.store.signal(symbol)))
            .collect()
    }
}
