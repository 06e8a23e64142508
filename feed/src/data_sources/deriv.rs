use std::io;
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::json;
use tracing::{debug, info, trace, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{connect, Message};
use url::Url;

use super::backoff::Backoff;
use super::tick_message::{parse_frame, InboundFrame};
use crate::error::FeedError;
use crate::window::{FeedStatus, WindowStore};

const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);
const READ_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn subscribe_message(symbol: &str) -> String {
    json!({ "ticks": symbol, "subscribe": 1 }).to_string()
}

/// Applies one inbound text frame to the store. Returns `true` when a digit was
/// appended to a window; everything else leaves the windows untouched.
pub fn apply_frame(store: &WindowStore, data: &[u8]) -> bool {
    match parse_frame(data) {
        InboundFrame::Tick(tick) => {
            if store.push_digit(&tick.symbol, tick.digit) {
                trace!(symbol = %tick.symbol, digit = tick.digit, "tick accepted");
                true
            } else {
                debug!(symbol = %tick.symbol, "tick for untracked symbol ignored");
                store.note_ignored_frame();
                false
            }
        }
        InboundFrame::ApiError {
            code,
            message,
            msg_type,
        } => {
            warn!(
                code = %code,
                msg_type = msg_type.as_deref().unwrap_or("unknown"),
                "error from tick feed: {}",
                message
            );
            store.note_ignored_frame();
            false
        }
        InboundFrame::Ignored => {
            trace!("frame without a usable tick ignored");
            store.note_ignored_frame();
            false
        }
    }
}

/// Keeps a connection to the tick feed alive until `shutdown` is set, reconnecting
/// with exponential backoff after every failed, dropped or stale connection.
pub(super) fn run(
    url: Url,
    symbols: Vec<String>,
    mut backoff: Backoff,
    stale_after: Duration,
    store: &WindowStore,
    shutdown: &AtomicBool,
) {
    while !shutdown.load(Ordering::Relaxed) {
        store.set_status(FeedStatus::Connecting);
        let ticks_before = store.counters().ticks_accepted;

        match stream_ticks(&url, &symbols, stale_after, store, shutdown) {
            Ok(()) => info!("tick feed connection closed"),
            Err(error) => warn!(error = %error, "tick feed connection failed"),
        }

        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        if store.counters().ticks_accepted > ticks_before {
            backoff.reset();
        }

        let delay = backoff.next_delay();
        store.note_reconnect();
        store.set_status(FeedStatus::Disconnected {
            retry_in: Some(delay),
        });
        warn!(
            retry_in_ms = delay.as_millis() as u64,
            "reconnecting to tick feed"
        );

        sleep_unless_shutdown(delay, shutdown);
    }

    store.set_status(FeedStatus::Disconnected { retry_in: None });
    info!("tick listener stopped");
}

fn stream_ticks(
    url: &Url,
    symbols: &[String],
    stale_after: Duration,
    store: &WindowStore,
    shutdown: &AtomicBool,
) -> Result<(), FeedError> {
    let (mut socket, _) = connect(url.clone()).map_err(FeedError::Connect)?;
    set_read_timeout(socket.get_mut(), read_timeout(stale_after)).map_err(FeedError::Socket)?;
    info!(url = %url, "connected to tick feed");

    for symbol in symbols {
        socket
            .write_message(Message::Text(subscribe_message(symbol)))
            .map_err(FeedError::Write)?;
        debug!(symbol = %symbol, "subscribed to ticks");
    }

    store.set_status(FeedStatus::Connected);
    let mut last_frame = Instant::now();

    loop {
        if shutdown.load(Ordering::Relaxed) {
            if let Err(error) = socket.close(None) {
                debug!(error = %error, "failed to close tick feed connection");
            }
            return Ok(());
        }

        if !socket.can_read() {
            return Err(FeedError::Closed);
        }

        let message = match socket.read_message() {
            Ok(message) => message,
            Err(tungstenite::Error::Io(error)) if is_read_timeout(&error) => {
                let silent_for = last_frame.elapsed();
                if silent_for >= stale_after {
                    return Err(FeedError::Stale { silent_for });
                }
                continue;
            }
            Err(error) => return Err(FeedError::Read(error)),
        };
        last_frame = Instant::now();

        match message {
            Message::Text(text) => {
                apply_frame(store, text.as_bytes());
            }
            Message::Binary(data) => {
                apply_frame(store, &data);
            }
            Message::Ping(payload) => {
                socket
                    .write_message(Message::Pong(payload))
                    .map_err(FeedError::Write)?;
            }
            Message::Close(frame) => {
                info!(frame = ?frame, "tick feed sent close frame");
                return Ok(());
            }
            _ => {}
        }
    }
}

/// Reads wake up at least this often so shutdown and staleness are noticed on a
/// silent connection.
fn read_timeout(stale_after: Duration) -> Duration {
    stale_after
        .min(READ_POLL_INTERVAL)
        .max(Duration::from_millis(1))
}

fn set_read_timeout(stream: &mut MaybeTlsStream<TcpStream>, timeout: Duration) -> io::Result<()> {
    match stream {
        MaybeTlsStream::Plain(stream) => stream.set_read_timeout(Some(timeout)),
        MaybeTlsStream::Rustls(stream) => stream.sock.set_read_timeout(Some(timeout)),
        _ => {
            warn!("unsupported tick feed stream, reads will block without a timeout");
            Ok(())
        }
    }
}

fn is_read_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

fn sleep_unless_shutdown(delay: Duration, shutdown: &AtomicBool) {
    let deadline = Instant::now() + delay;

    while !shutdown.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(SHUTDOWN_POLL_INTERVAL));
    }
}
