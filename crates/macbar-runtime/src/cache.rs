//! Process-wide memoized table load.
//!
//! The first [`load_cached`] call for a given file list reads and parses the
//! exports; later calls hand out the same [`Arc`] without touching disk.
//! Nothing expires on its own: [`reset`] is the only way to force a re-read.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use encoding_rs::Encoding;
use macbar_core::error::Result;
use macbar_core::models::{Month, UnifiedTable};
use macbar_data::reader::{load, MonthFile};
use once_cell::sync::Lazy;
use tracing::debug;

/// Ordered file list plus the decoder name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    files: Vec<(PathBuf, Month)>,
    encoding: &'static str,
}

impl CacheKey {
    fn new(files: &[MonthFile], encoding: &'static Encoding) -> Self {
        Self {
            files: files.iter().map(|f| (f.path.clone(), f.month)).collect(),
            encoding: encoding.name(),
        }
    }
}

static LOAD_CACHE: Lazy<Mutex<HashMap<CacheKey, Arc<UnifiedTable>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn cache() -> MutexGuard<'static, HashMap<CacheKey, Arc<UnifiedTable>>> {
    // A panic while holding the lock cannot leave a half-written entry.
    LOAD_CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Return the table for `files`, loading it on first use.
///
/// A failed load is not remembered; the next call tries again.
pub fn load_cached(files: &[MonthFile], encoding: &'static Encoding) -> Result<Arc<UnifiedTable>> {
    let key = CacheKey::new(files, encoding);
    let mut cache = cache();

    if let Some(table) = cache.get(&key) {
        debug!("Load cache hit ({} files)", files.len());
        return Ok(Arc::clone(table));
    }

    debug!("Load cache miss ({} files); reading exports", files.len());
    let table = Arc::new(load(files, encoding)?);
    cache.insert(key, Arc::clone(&table));
    Ok(table)
}

/// `true` when a table for exactly this file list and encoding is held.
pub fn is_cached(files: &[MonthFile], encoding: &'static Encoding) -> bool {
    cache().contains_key(&CacheKey::new(files, encoding))
}

/// Drop every cached table.
pub fn reset() {
    let mut cache = cache();
    let dropped = cache.len();
    cache.clear();
    debug!("Load cache reset ({} entries dropped)", dropped);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    // The cache is global; tests that reset it must not interleave.
    static SERIAL: Mutex<()> = Mutex::new(());

    const LATIN1: &Encoding = encoding_rs::WINDOWS_1252;

    fn serial() -> MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn write_export(dir: &Path, name: &str, body: &str) -> MonthFile {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        MonthFile::new(path, Month::April)
    }

    #[test]
    fn test_load_cached_returns_same_arc() {
        let _guard = serial();
        let dir = TempDir::new().unwrap();
        let files = vec![write_export(dir.path(), "april.csv", "Order ID\nA1\nA2\n")];

        let first = load_cached(&files, LATIN1).unwrap();
        let second = load_cached(&files, LATIN1).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(is_cached(&files, LATIN1));
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_load_cached_ignores_file_changes_until_reset() {
        let _guard = serial();
        let dir = TempDir::new().unwrap();
        let files = vec![write_export(dir.path(), "april.csv", "Order ID\nA1\n")];

        let before = load_cached(&files, LATIN1).unwrap();
        std::fs::write(&files[0].path, "Order ID\nA1\nA2\nA3\n").unwrap();

        let cached = load_cached(&files, LATIN1).unwrap();
        assert_eq!(cached.len(), 1);

        reset();
        assert!(!is_cached(&files, LATIN1));
        let after = load_cached(&files, LATIN1).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.len(), 3);
    }

    #[test]
    fn test_load_cached_errors_are_not_cached() {
        let _guard = serial();
        let dir = TempDir::new().unwrap();
        let files = vec![MonthFile::new(dir.path().join("may.csv"), Month::May)];

        assert!(load_cached(&files, LATIN1).is_err());
        assert!(!is_cached(&files, LATIN1));

        std::fs::write(&files[0].path, "Order ID\nM1\n").unwrap();
        let table = load_cached(&files, LATIN1).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_cache_key_includes_encoding() {
        let _guard = serial();
        let dir = TempDir::new().unwrap();
        let files = vec![write_export(dir.path(), "april.csv", "Order ID\nA1\n")];

        let latin = load_cached(&files, LATIN1).unwrap();
        assert!(!is_cached(&files, encoding_rs::UTF_8));
        let utf8 = load_cached(&files, encoding_rs::UTF_8).unwrap();
        assert!(!Arc::ptr_eq(&latin, &utf8));
    }
}
