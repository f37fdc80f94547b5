//! Compilation cache.
//!
//! A process-wide table of compiled expressions keyed by
//! `(registry id, expression source)`. The table is created lazily on first
//! use and shared by every registry; each registry brings its own
//! enable/limit configuration.
//!
//! Concurrency: reads take the table's read lock only (concurrent readers
//! never block one another) and bump the entry's `last_access` stamp with
//! a relaxed atomic store. Writes (insert, evict) take the write lock
//! briefly. Eviction removes the smallest-stamp entries of the registry
//! being written until its count is back under the limit; in-flight reads
//! may lag the stamps it sees, which only makes the eviction decision
//! boundedly stale, never incorrect.
//!
//! The cache is an optimization, never a correctness dependency: with the
//! global kill switch off, `get` always misses and `put` warns once (via
//! `log`) and does nothing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::compiler::CompiledExpr;
use crate::registry::Registry;


struct Entry {
    artifact: CompiledExpr,
    last_access: AtomicU64,
}

/// Per-registry tables: registry id → source → entry.
type Table = hashbrown::HashMap<u64, hashbrown::HashMap<Box<str>, Entry>>;

struct ExprCache {
    table: RwLock<Table>,
    counter: AtomicU64,
}

static CACHE: OnceLock<ExprCache> = OnceLock::new();
static ENABLED: AtomicBool = AtomicBool::new(true);
static UNAVAILABLE_WARNED: AtomicBool = AtomicBool::new(false);

fn active() -> Option<&'static ExprCache> {
    if !ENABLED.load(Ordering::Relaxed) {
        return None;
    }
    Some(CACHE.get_or_init(|| ExprCache {
        table: RwLock::new(Table::new()),
        counter: AtomicU64::new(0),
    }))
}

// A poisoned lock only means another thread panicked mid-write; the map
// itself is still structurally sound, so recover the guard.
fn read_table(cache: &ExprCache) -> RwLockReadGuard<'_, Table> {
    cache.table.read().unwrap_or_else(|e| e.into_inner())
}

fn write_table(cache: &ExprCache) -> RwLockWriteGuard<'_, Table> {
    cache.table.write().unwrap_or_else(|e| e.into_inner())
}

/// Look up a compiled expression. A hit refreshes the entry's LRU stamp.
pub(crate) fn get(registry: &Registry, source: &str) -> Option<CompiledExpr> {
    if !registry.cache_enabled() {
        return None;
    }
    let cache = active()?;
    let table = read_table(cache);
    let entry = table.get(&registry.id())?.get(source)?;
    let stamp = cache.counter.fetch_add(1, Ordering::Relaxed);
    entry.last_access.store(stamp, Ordering::Relaxed);
    Some(entry.artifact.clone())
}

/// Insert a compiled expression, then evict the registry's least recently
/// used entries down to its limit.
pub(crate) fn put(registry: &Registry, source: &str, artifact: CompiledExpr) {
    if !registry.cache_enabled() {
        return;
    }
    let Some(cache) = active() else {
        warn_unavailable();
        return;
    };
    let stamp = cache.counter.fetch_add(1, Ordering::Relaxed);
    let mut table = write_table(cache);
    let entries = table.entry(registry.id()).or_default();
    entries.insert(
        Box::from(source),
        Entry {
            artifact,
            last_access: AtomicU64::new(stamp),
        },
    );
    let limit = registry.cache_limit();
    while entries.len() > limit {
        let victim = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access.load(Ordering::Relaxed))
            .map(|(source, _)| source.clone());
        match victim {
            Some(source) => {
                entries.remove(&source);
            }
            None => break,
        }
    }
}

fn warn_unavailable() {
    if !UNAVAILABLE_WARNED.swap(true, Ordering::Relaxed) {
        log::warn!("expression cache is unavailable; compilations will not be reused");
    }
}

/// Process-wide kill switch. While disabled, `get` always misses and `put`
/// becomes a warn-once no-op; correctness is unaffected. Existing entries
/// are kept and become visible again when re-enabled.
pub fn set_global_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

// Maintenance entry points below read `CACHE` directly rather than through
// `active()`: clearing and inspection must work even while the kill switch
// has caching disabled.

/// Drop every cached compilation.
pub fn clear() {
    if let Some(cache) = CACHE.get() {
        write_table(cache).clear();
    }
}

/// Drop the cached compilations of one registry.
pub fn clear_registry(registry_id: u64) {
    if let Some(cache) = CACHE.get() {
        write_table(cache).remove(&registry_id);
    }
}

/// Number of cached compilations for one registry.
pub fn len_for_registry(registry_id: u64) -> usize {
    match CACHE.get() {
        Some(cache) => read_table(cache)
            .get(&registry_id)
            .map(|entries| entries.len())
            .unwrap_or(0),
        None => 0,
    }
}

pub(crate) fn contains(registry_id: u64, source: &str) -> bool {
    match CACHE.get() {
        Some(cache) => read_table(cache)
            .get(&registry_id)
            .is_some_and(|entries| entries.contains_key(source)),
        None => false,
    }
}
