use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use digitflow_feed::data_sources::spawn_listener;
use digitflow_feed::{Settings, WindowStore};

mod display_loop;
use display_loop::DisplayLoop;

mod print_signal_table;

mod selector;
use selector::spawn_stdin_selector;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let settings = Settings::from_env().context("failed to read configuration")?;
    info!(
        symbols = ?settings.symbols,
        window_size = settings.window_size,
        url = %settings.feed_url,
        "starting digit dashboard"
    );

    let store = Arc::new(WindowStore::new(&settings.symbols, settings.window_size));
    let shutdown = Arc::new(AtomicBool::new(false));

    // Not joined on exit: the listener may be blocked reading until the next tick.
    let _listener = spawn_listener(&settings, store.clone(), shutdown.clone())
        .context("failed to start tick listener")?;

    let selection_rx =
        spawn_stdin_selector(settings.symbols.clone()).context("failed to start selector")?;

    let display = DisplayLoop::new(
        store,
        selection_rx,
        settings.selected_symbol.clone(),
        settings.refresh_interval,
        settings.validity_ticks,
    );

    tokio::select! {
        _ = display.run() => {
            warn!("display loop finished unexpectedly");
        }
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for ctrl-c")?;
            info!("shutting down");
        }
    }

    shutdown.store(true, Ordering::Relaxed);

    Ok(())
}
