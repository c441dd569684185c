use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales dashboard.
///
/// Load-stage failures (`FileRead`, `Decode`, `CsvParse`, `UnknownEncoding`)
/// are fatal for the whole load; aggregation itself never fails.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A monthly export could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes of an export are not valid in the configured encoding.
    #[error("Failed to decode {path} as {encoding}")]
    Decode { path: PathBuf, encoding: String },

    /// An export is not well-formed delimited data.
    #[error("Failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The configured encoding label is not recognised.
    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    /// A month name is not one of April through October.
    #[error("Unknown month: {0}")]
    UnknownMonth(String),

    /// A day name is not an English weekday.
    #[error("Unknown day of week: {0}")]
    UnknownDay(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A report could not be serialised.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashboardError {
    /// `true` for failures raised while loading the monthly exports.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            DashboardError::FileRead { .. }
                | DashboardError::Decode { .. }
                | DashboardError::CsvParse { .. }
                | DashboardError::UnknownEncoding(_)
        )
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DashboardError::FileRead {
            path: PathBuf::from("/data/april_2024.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/april_2024.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_decode() {
        let err = DashboardError::Decode {
            path: PathBuf::from("may_2024.csv"),
            encoding: "UTF-8".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to decode may_2024.csv as UTF-8");
    }

    #[test]
    fn test_error_display_unknown_month() {
        let err = DashboardError::UnknownMonth("December".to_string());
        assert_eq!(err.to_string(), "Unknown month: December");
    }

    #[test]
    fn test_error_display_unknown_day() {
        let err = DashboardError::UnknownDay("Funday".to_string());
        assert_eq!(err.to_string(), "Unknown day of week: Funday");
    }

    #[test]
    fn test_error_display_unknown_encoding() {
        let err = DashboardError::UnknownEncoding("klingon-8".to_string());
        assert_eq!(err.to_string(), "Unknown text encoding: klingon-8");
    }

    #[test]
    fn test_error_display_config() {
        let err = DashboardError::Config("missing data dir".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing data dir");
    }

    #[test]
    fn test_load_errors_are_distinguished() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let load = DashboardError::FileRead {
            path: PathBuf::from("june_2024.csv"),
            source: io_err,
        };
        assert!(load.is_load_error());
        assert!(DashboardError::UnknownEncoding("x".into()).is_load_error());
        assert!(!DashboardError::UnknownMonth("x".into()).is_load_error());
        assert!(!DashboardError::Terminal("x".into()).is_load_error());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DashboardError = io_err.into();
        assert!(err.to_string().contains("denied"));
        assert!(!err.is_load_error());
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(err.to_string().contains("Failed to serialise JSON"));
    }
}
