//! Process-wide shutdown wiring for the CLI.

use std::sync::OnceLock;

/// Shutdown signal sender for the watch loop
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Install the Ctrl+C handler.
///
/// Before a watch loop registers itself there is nothing to drain, so the
/// process exits immediately.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| match SHUTDOWN_TX.get() {
        Some(tx) => {
            let _ = tx.send(());
        }
        None => std::process::exit(0),
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the channel notified on Ctrl+C.
pub fn register_shutdown(tx: crossbeam::channel::Sender<()>) {
    let _ = SHUTDOWN_TX.set(tx);
}
