use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Per-user state directory under the home directory.
pub const APP_DIR_NAME: &str = ".macbar-dashboard";

/// Data directory names tried, relative to the working directory.
const LOCAL_DATA_DIRS: [&str; 2] = ["roni_challenge_data", "data"];

fn home_or_cwd() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.macbar-dashboard/` and its `logs/` subdirectory exist.
///
/// Returns the application directory.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    ensure_directories_in(&home_or_cwd())
}

pub fn ensure_directories_in(home: &Path) -> anyhow::Result<PathBuf> {
    let app_dir = home.join(APP_DIR_NAME);
    std::fs::create_dir_all(app_dir.join("logs"))
        .with_context(|| format!("Failed to create {}", app_dir.display()))?;
    Ok(app_dir)
}

/// Default log file used when the terminal dashboard owns the screen.
pub fn default_log_file(app_dir: &Path) -> PathBuf {
    app_dir.join("logs").join("macbar-dashboard.log")
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `DEBUG` / `INFO` / `WARNING` / `ERROR` / `CRITICAL` level name to an
/// `EnvFilter` directive. Unknown names pass through unchanged.
fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` set, output is appended to that file without ANSI colour
/// codes; otherwise it goes to stderr. Falls back to `info` when the level
/// is not recognised.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            registry
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .init();
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_thread_ids(false),
                )
                .init();
        }
    }

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate the directory holding the monthly exports.
///
/// An explicit path (flag or `MACBAR_DATA_DIR`) is used as given. Otherwise
/// the first existing of `./roni_challenge_data`, `./data` and
/// `~/.macbar-dashboard/data` wins. `None` when nothing exists.
pub fn discover_data_path(explicit: Option<&Path>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    discover_data_path_in(explicit, &cwd, dirs::home_dir().as_deref())
}

pub fn discover_data_path_in(
    explicit: Option<&Path>,
    cwd: &Path,
    home: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    LOCAL_DATA_DIRS
        .iter()
        .map(|name| cwd.join(name))
        .chain(home.map(|h| h.join(APP_DIR_NAME).join("data")))
        .find(|p| p.is_dir())
}

/// Where to look when discovery finds nothing; the load then reports which
/// file is missing.
pub fn fallback_data_path() -> PathBuf {
    PathBuf::from(LOCAL_DATA_DIRS[0])
}

// ── Tests ──────────────────────────────────────────────────────────────────────
