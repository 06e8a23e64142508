use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::Settings;
use crate::window::WindowStore;

mod backoff;
mod deriv;
pub mod tick_message;

pub use backoff::Backoff;
pub use deriv::{apply_frame, subscribe_message};

/// Starts the tick listener on its own OS thread. It writes into `store` until
/// `shutdown` is set.
pub fn spawn_listener(
    settings: &Settings,
    store: Arc<WindowStore>,
    shutdown: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    let url = settings.feed_url.clone();
    let symbols = settings.symbols.clone();
    let backoff = Backoff::new(settings.reconnect_min, settings.reconnect_max);
    let stale_after = settings.stale_after;

    thread::Builder::new()
        .name("tick-listener".to_string())
        .spawn(move || deriv::run(url, symbols, backoff, stale_after, &store, &shutdown))
}
