//! OS signal watcher.
//!
//! A dedicated thread runs a current-thread tokio runtime that waits for
//! Ctrl+C (SIGINT) or SIGTERM.  On the first signal it cancels the
//! [`ShutdownToken`] and forces the alarm outputs off straight away; the
//! detection log is left for the main loop to close.

use std::io;
use std::thread::{self, JoinHandle};

use log::{info, warn};

use crate::adapters::hardware::AlarmHandle;
use crate::app::ports::AlarmPort;
use crate::app::shutdown::ShutdownToken;

/// React to a shutdown request.  Only the first call has any effect;
/// returns whether this call was it.
pub fn handle_shutdown_signal<A: AlarmPort>(
    token: &ShutdownToken,
    alarm: &AlarmHandle<A>,
) -> bool {
    if !token.cancel() {
        return false;
    }
    alarm.force_off();
    true
}

/// Spawn the watcher thread.  Fails only if the runtime or thread cannot
/// be created.
pub fn spawn_signal_watcher<A>(
    token: ShutdownToken,
    alarm: AlarmHandle<A>,
) -> io::Result<JoinHandle<()>>
where
    A: AlarmPort + Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("signal-watcher".into())
        .spawn(move || {
            runtime.block_on(wait_for_shutdown());
            if handle_shutdown_signal(&token, &alarm) {
                info!("Shutdown signal received, alarm outputs off");
            }
        })
}

/// Resolve when `listener` reports a delivered signal.  A listener that
/// could not be installed parks forever instead of faking a shutdown.
async fn resolve_on_signal<F>(listener: F, name: &str)
where
    F: Future<Output = io::Result<()>>,
{
    match listener.await {
        Ok(()) => info!("{name} received"),
        Err(e) => {
            warn!("Cannot listen for {name}: {e}");
            std::future::pending::<()>().await;
        }
    }
}

/// Wait for Ctrl+C, or SIGTERM on Unix.
async fn wait_for_shutdown() {
    let interrupt = resolve_on_signal(tokio::signal::ctrl_c(), "SIGINT");

    #[cfg(unix)]
    let terminate = resolve_on_signal(
        async {
            use tokio::signal::unix::{SignalKind, signal};
            let mut term = signal(SignalKind::terminate())?;
            term.recv()
                .await
                .ok_or_else(|| io::Error::other("SIGTERM stream closed"))
        },
        "SIGTERM",
    );
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {}
        () = terminate => {}
    }
}
