//! Global config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement.
//! This enables hot-reloading of `incompat.toml` during watch mode.

use crate::config::EngineConfig;
use anyhow::{Result, anyhow};
use arc_swap::ArcSwap;
use std::hash::Hasher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<EngineConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(EngineConfig::default()));

/// Hash of the current config file content.
static CONFIG_HASH: AtomicU64 = AtomicU64::new(0);

#[inline]
pub fn cfg() -> Arc<EngineConfig> {
    CONFIG.load_full()
}

/// Reload config from disk if content changed.
///
/// Returns `Ok(true)` if config was updated, `Ok(false)` if unchanged.
pub fn reload_config() -> Result<bool> {
    use std::fs;

    let c = cfg();
    let cli = c
        .cli
        .ok_or_else(|| anyhow!("config reloaded before initialization"))?;

    // A deleted config falls back to defaults
    let content = fs::read_to_string(&c.config_path).unwrap_or_default();
    let new_hash = content_hash(&content);

    let old_hash = CONFIG_HASH.load(Ordering::Relaxed);
    if new_hash == old_hash {
        return Ok(false);
    }

    let new_config = EngineConfig::load(cli)?;
    CONFIG.store(Arc::new(new_config));
    CONFIG_HASH.store(new_hash, Ordering::Relaxed);

    Ok(true)
}

#[inline]
pub fn init_config(config: EngineConfig) -> Arc<EngineConfig> {
    use std::fs;

    let content = fs::read_to_string(&config.config_path).unwrap_or_default();
    CONFIG_HASH.store(content_hash(&content), Ordering::Relaxed);

    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}

fn content_hash(content: &str) -> u64 {
    let mut hasher = rustc_hash::FxHasher::default();
    hasher.write(content.as_bytes());
    hasher.finish()
}
