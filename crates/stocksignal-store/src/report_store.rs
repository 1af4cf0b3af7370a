//! The persisted report table.
//!
//! The file is UTF-8 CSV prefixed with a byte-order mark so spreadsheet tools
//! pick the right encoding. Each write replaces the whole file atomically.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use stocksignal_core::{ChangePercent, Recommendation, Report, ReportRow, REPORT_COLUMNS};
use uuid::Uuid;

use crate::error::StoreError;
use crate::prices::parse_price;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Handle to the report file at a fixed path.
#[derive(Debug, Clone)]
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the stored report with `report`.
    ///
    /// Rows are written to a sibling temp file unique to this write, which is
    /// then renamed over the target. Readers see either the old table or the
    /// new one, even when several processes write the same store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the temp file cannot be written or renamed.
    pub fn write(&self, report: &Report) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = write_table(&temp_path, report) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            tracing::error!(error = %e, path = %self.path.display(), "failed to replace report file");
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::io(&self.path, e));
        }

        tracing::info!(path = %self.path.display(), rows = report.len(), "report saved");
        Ok(())
    }

    /// Load the stored report. `Ok(None)` means no report has been written yet.
    ///
    /// Rows with an unknown recommendation are skipped. Unparseable price or
    /// change cells are read as missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn read(&self) -> Result<Option<Report>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        let body = bytes.strip_prefix(BOM).unwrap_or(&bytes[..]);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(body);
        let headers = reader
            .headers()
            .map_err(|e| StoreError::csv(&self.path, e))?
            .clone();
        for column in REPORT_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(StoreError::MissingColumn {
                    path: self.path.clone(),
                    column: column.to_string(),
                });
            }
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| StoreError::csv(&self.path, e))?;
            if let Some(row) = row_from_record(&headers, &record) {
                rows.push(row);
            }
        }
        Ok(Some(Report::new(rows)))
    }

    /// `<file name>.<uuid>.tmp` next to the report file.
    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map_or_else(|| "report".into(), |n| n.to_string_lossy());
        self.path
            .with_file_name(format!("{file_name}.{}.tmp", Uuid::new_v4()))
    }

    /// Modification time of the report file, if it exists.
    #[must_use]
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    }
}

fn write_table(path: &Path, report: &Report) -> Result<(), StoreError> {
    let mut file = fs::File::create_new(path).map_err(|e| StoreError::io(path, e))?;
    file.write_all(BOM).map_err(|e| StoreError::io(path, e))?;

    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(REPORT_COLUMNS)
        .map_err(|e| StoreError::csv(path, e))?;
    for row in report.rows() {
        let prior_close = row.prior_close.map(|p| p.to_string()).unwrap_or_default();
        let current = row.current_price.map(|p| p.to_string()).unwrap_or_default();
        writer
            .write_record([
                row.ticker.as_str(),
                row.recommendation.as_str(),
                prior_close.as_str(),
                current.as_str(),
                row.change_percent.to_string().as_str(),
                row.justification.as_str(),
            ])
            .map_err(|e| StoreError::csv(path, e))?;
    }

    let file = writer
        .into_inner()
        .map_err(|e| StoreError::io(path, e.into_error()))?;
    file.sync_all().map_err(|e| StoreError::io(path, e))
}

fn row_from_record(headers: &csv::StringRecord, record: &csv::StringRecord) -> Option<ReportRow> {
    let cell = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|i| record.get(i))
            .unwrap_or_default()
    };

    let ticker = cell("ticker").trim().to_string();
    let recommendation = match cell("recommendation").parse::<Recommendation>() {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(ticker = %ticker, error = %e, "skipping stored row");
            return None;
        }
    };
    let raw_change = cell("changePercent");
    let change_percent = ChangePercent::from_rendered(raw_change).unwrap_or_else(|| {
        tracing::warn!(ticker = %ticker, value = raw_change, "unreadable change cell");
        ChangePercent::NotApplicable
    });

    Some(ReportRow {
        ticker,
        recommendation,
        prior_close: parse_price(cell("priorClose")),
        current_price: parse_price(cell("current")),
        change_percent,
        justification: cell("justification").to_string(),
    })
}
