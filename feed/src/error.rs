use std::io;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for \"{var}\" env var: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("can't connect to tick feed: {0}")]
    Connect(#[source] tungstenite::Error),
    #[error("error reading message from tick feed: {0}")]
    Read(#[source] tungstenite::Error),
    #[error("error writing message to tick feed: {0}")]
    Write(#[source] tungstenite::Error),
    #[error("failed to configure tick feed socket: {0}")]
    Socket(#[source] io::Error),
    #[error("tick feed connection is closed")]
    Closed,
    #[error("no frame from tick feed for {silent_for:?}")]
    Stale { silent_for: Duration },
}
