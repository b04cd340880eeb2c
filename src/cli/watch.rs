//! `incompat watch` - live scanning of a file on disk.
//!
//! ```text
//! notify ──▶ fs events ──▶ MemoryDocument::replace_all ──▶ Engine
//!                      └─▶ reload_config ──▶ set_encoding ──┘
//! Engine ──watch<PanelState>──▶ ScanStatus (rows located via EngineHandle)
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::common::{read_text, render_rows};
use crate::actor::{Engine, EngineHandle};
use crate::config::{EngineConfig, cfg, reload_config};
use crate::core::{CharRange, PanelState, register_shutdown};
use crate::encoding::StandardEncodings;
use crate::logger::{status_clean, status_found, status_scanning, status_warning};
use crate::source::{HighlightSurface, MemoryDocument, TextSource};
use crate::{debug, log};

/// How often the loop polls for Ctrl+C
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Run watch mode until Ctrl+C.
pub fn watch_file(config: Arc<EngineConfig>, file: &Path) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    runtime.block_on(run(config, file))
}

async fn run(config: Arc<EngineConfig>, file: &Path) -> Result<()> {
    let file = file
        .canonicalize()
        .with_context(|| format!("failed to resolve `{}`", file.display()))?;
    let paths = WatchedPaths {
        file: file.clone(),
        config: config.config_path.clone(),
    };

    let doc = Arc::new(MemoryDocument::new(
        &read_text(&file)?,
        config.scan.encoding.clone(),
    ));

    let (shutdown_tx, shutdown_rx) = crossbeam::channel::unbounded::<()>();
    register_shutdown(shutdown_tx);

    // Watcher first, so edits made during startup are not lost
    let (_watcher, mut fs_rx) = spawn_watcher(&paths)?;

    let engine = Engine::new(Arc::clone(&doc) as Arc<dyn TextSource>, TerminalSurface)
        .with_debounce(config.trigger.debounce())
        .with_provider(Arc::new(StandardEncodings::new(config.scan.substitutes)))
        .spawn();
    let mut state_rx = engine.subscribe();
    engine.activate().await?;

    log!("watch"; "{} ({}), press Ctrl+C to stop", file.display(), config.scan.encoding);

    let mut poll = tokio::time::interval(SHUTDOWN_POLL);
    loop {
        tokio::select! {
            biased;

            _ = poll.tick() => {
                if shutdown_rx.try_recv().is_ok() {
                    debug!("watch"; "shutdown signal received");
                    break;
                }
            }

            Some(event) = fs_rx.recv() => on_fs_event(&event, &paths, &doc),

            changed = state_rx.changed() => {
                if changed.is_err() {
                    break; // Engine stopped
                }
                let state = state_rx.borrow_and_update().clone();
                show_state(&state, &engine);
            }
        }
    }

    engine.shutdown().await;
    Ok(())
}

/// Paths whose changes matter.
struct WatchedPaths {
    file: PathBuf,
    config: PathBuf,
}

/// Start a watcher on the parent directories of the file and the config.
///
/// Directories are watched instead of the files so atomic saves (write to a
/// temp file, rename over the original) are still seen.
fn spawn_watcher(
    paths: &WatchedPaths,
) -> Result<(notify::RecommendedWatcher, mpsc::Receiver<notify::Event>)> {
    let (notify_tx, notify_rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = notify_tx.send(res);
    })?;

    let mut roots: Vec<&Path> = Vec::with_capacity(2);
    for path in [&paths.file, &paths.config] {
        if let Some(parent) = path.parent()
            && parent.exists()
            && !roots.contains(&parent)
        {
            roots.push(parent);
        }
    }
    for root in roots {
        watcher
            .watch(root, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch `{}`", root.display()))?;
        debug!("watch"; "watching {}", root.display());
    }

    // notify delivers on its own thread; bridge into the runtime
    let (async_tx, async_rx) = mpsc::channel::<notify::Event>(64);
    std::thread::spawn(move || {
        while let Ok(result) = notify_rx.recv() {
            match result {
                Ok(event) => {
                    if async_tx.blocking_send(event).is_err() {
                        break; // Receiver dropped
                    }
                }
                Err(e) => log!("watch"; "notify error: {}", e),
            }
        }
    });

    Ok((watcher, async_rx))
}

fn on_fs_event(event: &notify::Event, paths: &WatchedPaths, doc: &MemoryDocument) {
    if matches!(event.kind, EventKind::Access(_)) {
        return;
    }

    if event.paths.iter().any(|p| p == &paths.file) {
        reload_file(&paths.file, doc);
    }
    if event.paths.iter().any(|p| p == &paths.config) {
        reload_encoding(doc);
    }
}

/// Replace the document text with the file content (a character edit).
fn reload_file(file: &Path, doc: &MemoryDocument) {
    match read_text(file) {
        Ok(text) => doc.replace_all(&text),
        // Mid-save or removed; the next event brings it back
        Err(e) => debug!("watch"; "{:#}", e),
    }
}

/// Reload the config; a changed `scan.encoding` becomes an encoding change.
fn reload_encoding(doc: &MemoryDocument) {
    match reload_config() {
        Ok(true) => {
            let config = cfg();
            debug!("watch"; "config reloaded ({})", config.scan.encoding);
            doc.set_encoding(&config.scan.encoding);
        }
        Ok(false) => {}
        Err(e) => status_warning(&format!("config not reloaded: {e:#}")),
    }
}

fn show_state(state: &PanelState, engine: &EngineHandle) {
    let summary = state.summary();
    if state.is_scanning {
        status_scanning(&summary);
        return;
    }

    let encoding = &state.result.encoding;
    if state.count() == 0 {
        status_clean(&format!("{summary} ({encoding})"));
        return;
    }

    // Locations come from the document's per-version line index
    let rows = render_rows(
        state.occurrences(),
        |o| engine.location(o),
        cfg().report.max_rows,
    );
    status_found(&format!("{summary} ({encoding})"), &rows);
}

/// Surface for a terminal: the table is the decoration, nothing to paint.
struct TerminalSurface;

impl HighlightSurface for TerminalSurface {
    fn clear_highlights(&mut self) {}

    fn highlight(&mut self, _range: CharRange) {}

    fn select(&mut self, range: CharRange) {
        debug!("watch"; "select {}", range);
    }
}
