//! Monthly export discovery and loading.
//!
//! Reads one point-of-sale CSV per month, decodes it from its legacy
//! single-byte encoding, normalises column names, derives `Month` and
//! `DayOfWeek`, and concatenates everything into a [`UnifiedTable`].

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use macbar_core::error::{DashboardError, Result};
use macbar_core::models::{Category, Month, OrderLine, UnifiedTable};
use macbar_core::time_utils::parse_sent_date;
use tracing::{debug, info, warn};

/// Column names consumed by the pipeline, after whitespace trimming.
pub const ORDER_NUMBER: &str = "Order #";
pub const ORDER_ID: &str = "Order ID";
pub const SENT_DATE: &str = "Sent Date";
pub const MODIFIER: &str = "Modifier";
pub const MONTH: &str = "Month";
pub const DAY_OF_WEEK: &str = "DayOfWeek";

// ── MonthFile ─────────────────────────────────────────────────────────────────

/// One export file and the month its rows belong to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonthFile {
    pub path: PathBuf,
    pub month: Month,
}

impl MonthFile {
    pub fn new(path: impl Into<PathBuf>, month: Month) -> Self {
        Self {
            path: path.into(),
            month,
        }
    }
}

/// The seven standard exports under `data_dir`: `april_<year>.csv` through
/// `october_<year>.csv`, in calendar order.
pub fn month_files(data_dir: &Path, year: i32) -> Vec<MonthFile> {
    Month::ALL
        .into_iter()
        .map(|month| {
            let name = format!("{}_{}.csv", month.file_stem(), year);
            MonthFile::new(data_dir.join(name), month)
        })
        .collect()
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every file in `files` into one table, in list order then row order.
///
/// Any unreadable, undecodable or malformed file fails the whole load; there
/// is no partial result. A month listed twice is simply appended twice.
pub fn load(files: &[MonthFile], encoding: &'static Encoding) -> Result<UnifiedTable> {
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<OrderLine> = Vec::new();
    let mut seen_months: HashSet<Month> = HashSet::new();

    for file in files {
        if !seen_months.insert(file.month) {
            warn!(
                "Month {} is supplied by more than one file; rows are appended without merging",
                file.month
            );
        }

        let (file_columns, file_rows) = read_month_file(file, encoding)?;
        for column in file_columns {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        rows.extend(file_rows);
    }

    info!("Loaded {} order lines from {} files", rows.len(), files.len());

    Ok(UnifiedTable::new(columns, rows))
}

/// Read and parse a single monthly export.
///
/// Returns the file's column names (trimmed, plus any derived columns) and
/// its rows.
pub fn read_month_file(
    file: &MonthFile,
    encoding: &'static Encoding,
) -> Result<(Vec<String>, Vec<OrderLine>)> {
    let bytes = std::fs::read(&file.path).map_err(|source| DashboardError::FileRead {
        path: file.path.clone(),
        source,
    })?;
    let content = decode(&file.path, &bytes, encoding)?;
    parse_export(&content, file.month, &file.path)
}

/// Parse decoded CSV text whose rows default to `month`.
///
/// `path` is only used for error messages and logging.
pub fn parse_export(
    content: &str,
    month: Month,
    path: &Path,
) -> Result<(Vec<String>, Vec<OrderLine>)> {
    let csv_err = |source: csv::Error| DashboardError::CsvParse {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut columns: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let index_of = |name: &str| columns.iter().position(|c| c == name);
    let order_number_idx = index_of(ORDER_NUMBER);
    let order_id_idx = index_of(ORDER_ID);
    let sent_date_idx = index_of(SENT_DATE);
    let modifier_idx = index_of(MODIFIER);
    let month_idx = index_of(MONTH);
    let consumed = [
        order_number_idx,
        order_id_idx,
        sent_date_idx,
        modifier_idx,
        month_idx,
    ];

    let mut rows: Vec<OrderLine> = Vec::new();
    let mut unparsed_dates = 0u64;
    let mut unknown_months = 0u64;

    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let cell = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| record.get(i))
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string())
        };

        let row_month = match cell(month_idx) {
            Some(label) => Month::parse_label(&label).unwrap_or_else(|_| {
                unknown_months += 1;
                month
            }),
            None => month,
        };

        let sent_date = match cell(sent_date_idx) {
            Some(raw) => {
                let parsed = parse_sent_date(&raw);
                if parsed.is_none() {
                    unparsed_dates += 1;
                }
                parsed
            }
            None => None,
        };

        let mut extra = BTreeMap::new();
        for (i, value) in record.iter().enumerate() {
            if consumed.contains(&Some(i)) {
                continue;
            }
            if let Some(name) = columns.get(i) {
                extra.insert(name.clone(), value.to_string());
            }
        }

        let mut line = OrderLine::new(row_month).with_sent_date(sent_date);
        line.order_number = cell(order_number_idx);
        line.order_id = cell(order_id_idx);
        line.modifier = cell(modifier_idx);
        line.extra = extra;
        rows.push(line);
    }

    if month_idx.is_none() {
        columns.push(MONTH.to_string());
    }
    if sent_date_idx.is_some() {
        columns.push(DAY_OF_WEEK.to_string());
    } else {
        warn!("{} has no {} column; no day-of-week data", path.display(), SENT_DATE);
    }

    if unparsed_dates > 0 {
        warn!(
            "{}: {} {} values could not be parsed and are treated as missing",
            path.display(),
            unparsed_dates,
            SENT_DATE
        );
    }
    if unknown_months > 0 {
        warn!(
            "{}: {} rows name an untracked month; assigned to {}",
            path.display(),
            unknown_months,
            month
        );
    }

    debug!(
        "File {}: {} rows, {} columns",
        path.display(),
        rows.len(),
        columns.len()
    );

    Ok((columns, rows))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Decode raw bytes; a byte sequence invalid in `encoding` is fatal.
fn decode(path: &Path, bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DashboardError::Decode {
            path: path.to_path_buf(),
            encoding: used.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
