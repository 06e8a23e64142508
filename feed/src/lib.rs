//! Live tick ingestion and last-digit frequency analysis.
//!
//! The tick listener ([`data_sources::spawn_listener`]) keeps a rolling window of
//! last digits per instrument in a shared [`WindowStore`]; [`summary::refresh_signal`]
//! turns a snapshot of one window into a ranked digit table and a [`Signal`].

pub mod config;
pub mod data_sources;
pub mod error;
mod helpers;
pub mod summary;
pub mod window;

pub use config::Settings;
pub use error::{ConfigError, FeedError};
pub use summary::{DigitFrequency, DigitSummary, Signal};
pub use window::{FeedCounters, FeedStatus, WindowStore};
