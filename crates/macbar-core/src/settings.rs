use chrono::Weekday;
use clap::{CommandFactory, Parser};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{DashboardError, Result};
use crate::models::{Filter, Month, Selections};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Sales dashboard for Roni's Mac Bar point-of-sale exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "macbar-dashboard",
    about = "Sales dashboard for Roni's Mac Bar point-of-sale exports",
    version
)]
pub struct Settings {
    /// Directory holding the monthly exports (`april_2024.csv` … `october_2024.csv`)
    #[arg(long, env = "MACBAR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Year in the export file names
    #[arg(long, default_value = "2024")]
    pub year: i32,

    /// Text encoding of the exports
    #[arg(long, default_value = "ISO-8859-1")]
    pub encoding: String,

    /// Month filter ("All" or April-October)
    #[arg(long, default_value = "All")]
    pub month: String,

    /// Day-of-week filter ("All" or a weekday name)
    #[arg(long, default_value = "All")]
    pub day: String,

    /// Output renderer
    #[arg(long, default_value = "tui", value_parser = ["tui", "text", "json"])]
    pub output: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Fill hours without orders with zero in the hourly series
    #[arg(long)]
    pub zero_fill_hours: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.macbar-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".macbar-dashboard").join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to the default path.
    pub fn save(&self) -> std::result::Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the default config file if it exists.
    pub fn clear() -> std::result::Result<(), std::io::Error> {
        Self::clear_at(&Self::config_path())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins. The data dir counts as explicit when it came from
        // the environment too.
        if settings.data_dir.is_none() {
            settings.data_dir = last.data_dir;
        }
        if !is_arg_explicitly_set(&matches, "year") {
            if let Some(v) = last.year {
                settings.year = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "encoding") {
            if let Some(v) = last.encoding {
                settings.encoding = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "month") {
            if let Some(v) = last.month {
                settings.month = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "day") {
            if let Some(v) = last.day {
                settings.day = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "output") {
            if let Some(v) = last.output {
                settings.output = v;
            }
        }

        settings = Self::apply_debug_flag(settings);

        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// Resolve the configured encoding label (e.g. `"ISO-8859-1"`, `"utf-8"`).
    ///
    /// Labels follow the WHATWG Encoding Standard, so the Latin-1 family maps
    /// to windows-1252.
    pub fn text_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| DashboardError::UnknownEncoding(self.encoding.clone()))
    }

    /// Parse the `--month` / `--day` strings into filter selections.
    pub fn selections(&self) -> Result<Selections> {
        let month: Filter<Month> = self.month.parse()?;
        let day: Filter<Weekday> = self.day.parse()?;
        Ok(Selections::new(month, day))
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            data_dir: s.data_dir.clone(),
            year: Some(s.year),
            encoding: Some(s.encoding.clone()),
            month: Some(s.month.clone()),
            day: Some(s.day.clone()),
            output: Some(s.output.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    fn args(list: &[&str]) -> Vec<std::ffi::OsString> {
        list.iter().map(|s| s.into()).collect()
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            data_dir: Some(PathBuf::from("/srv/exports")),
            year: Some(2023),
            encoding: Some("utf-8".to_string()),
            month: Some("August".to_string()),
            day: Some("Friday".to_string()),
            output: Some("text".to_string()),
        };

        params.save_to(&path).expect("save");
        let loaded = LastUsedParams::load_from(&path);

        assert_eq!(loaded.theme, Some("dark".to_string()));
        assert_eq!(loaded.data_dir, Some(PathBuf::from("/srv/exports")));
        assert_eq!(loaded.year, Some(2023));
        assert_eq!(loaded.encoding, Some("utf-8".to_string()));
        assert_eq!(loaded.month, Some("August".to_string()));
        assert_eq!(loaded.day, Some("Friday".to_string()));
        assert_eq!(loaded.output, Some("text".to_string()));
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        };
        params.save_to(&path).expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    #[test]
    fn test_last_used_params_default_when_missing_or_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        assert!(LastUsedParams::load_from(&path).month.is_none());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(LastUsedParams::load_from(&path).theme.is_none());
    }

    // ── Settings parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["macbar-dashboard"]);

        assert_eq!(settings.year, 2024);
        assert_eq!(settings.encoding, "ISO-8859-1");
        assert_eq!(settings.month, "All");
        assert_eq!(settings.day, "All");
        assert_eq!(settings.output, "tui");
        assert_eq!(settings.theme, "auto");
        assert!(!settings.zero_fill_hours);
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_cli_filters() {
        let settings = Settings::parse_from([
            "macbar-dashboard",
            "--month",
            "September",
            "--day",
            "Monday",
        ]);
        let sel = settings.selections().unwrap();
        assert_eq!(sel.month, Filter::Only(Month::September));
        assert_eq!(sel.day, Filter::Only(Weekday::Mon));
    }

    #[test]
    fn test_settings_invalid_filter_is_error() {
        let settings = Settings::parse_from(["macbar-dashboard", "--month", "December"]);
        assert!(matches!(
            settings.selections(),
            Err(DashboardError::UnknownMonth(_))
        ));
    }

    #[test]
    fn test_settings_text_encoding_latin1() {
        let settings = Settings::parse_from(["macbar-dashboard"]);
        let enc = settings.text_encoding().unwrap();
        assert_eq!(enc, encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_settings_text_encoding_unknown() {
        let settings = Settings::parse_from(["macbar-dashboard", "--encoding", "klingon-8"]);
        assert!(matches!(
            settings.text_encoding(),
            Err(DashboardError::UnknownEncoding(_))
        ));
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_filters() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            month: Some("July".to_string()),
            day: Some("Sunday".to_string()),
            theme: Some("classic".to_string()),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings =
            Settings::load_with_last_used_impl(args(&["macbar-dashboard"]), &config_path);
        assert_eq!(settings.month, "July");
        assert_eq!(settings.day, "Sunday");
        assert_eq!(settings.theme, "classic");
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            month: Some("July".to_string()),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings = Settings::load_with_last_used_impl(
            args(&["macbar-dashboard", "--month", "All"]),
            &config_path,
        );
        assert_eq!(settings.month, "All");
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        LastUsedParams::default()
            .save_to(&config_path)
            .expect("save");
        assert!(config_path.exists());

        Settings::load_with_last_used_impl(
            args(&["macbar-dashboard", "--clear"]),
            &config_path,
        );

        assert!(!config_path.exists());
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            args(&["macbar-dashboard", "--debug"]),
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            args(&["macbar-dashboard", "--day", "Tuesday", "--output", "json"]),
            &config_path,
        );

        assert!(config_path.exists());
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.day, Some("Tuesday".to_string()));
        assert_eq!(loaded.output, Some("json".to_string()));
    }
}
