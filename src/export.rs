use crate::calculations::RowPricing;
use crate::engine::QuoteRequest;
use crate::report::{DocumentPair, ReportBundle};
use crate::validation::ValidationError;
use serde::Serialize;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(#[from] ValidationError),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Reads a quotation request from a JSON file and validates it.
pub fn load_request_from_json<P: AsRef<Path>>(path: P) -> ExportResult<QuoteRequest> {
    let file = File::open(path)?;
    let request: QuoteRequest = serde_json::from_reader(file)?;
    request.validate()?;
    Ok(request)
}

pub fn save_reports_to_json<P: AsRef<Path>>(bundle: &ReportBundle, path: P) -> ExportResult<()> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, bundle)?;
    info!(path = %path.as_ref().display(), "report payloads written");
    Ok(())
}

#[derive(Serialize)]
struct CostBreakdownRecord<'a> {
    role: &'a str,
    count: u32,
    hours: u32,
    compensation: String,
    employee_cost_per_hour: String,
    overhead_per_hour: String,
    margin_per_hour: String,
    total_hours: u64,
    internal_cost: String,
    internal_cost_plus_overhead: String,
    margin_amount: String,
}

impl<'a> CostBreakdownRecord<'a> {
    fn from_row(role: &'a str, row: &RowPricing) -> Self {
        Self {
            role,
            count: row.count,
            hours: row.hours,
            compensation: format_amount(row.compensation),
            employee_cost_per_hour: format_amount(row.employee_cost_per_hour),
            overhead_per_hour: format_amount(row.overhead_per_hour),
            margin_per_hour: format_amount(row.margin_per_hour),
            total_hours: row.total_hours,
            internal_cost: format_amount(row.internal_cost),
            internal_cost_plus_overhead: format_amount(row.internal_cost_plus_overhead),
            margin_amount: format_amount(row.margin_amount),
        }
    }
}

/// Writes the priced rows that have a role selected as a CSV sheet, amounts to two
/// decimals.
pub fn export_rows_to_csv<P: AsRef<Path>>(rows: &[RowPricing], path: P) -> ExportResult<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for row in rows {
        if let Some(role) = row.role.as_deref() {
            writer.serialize(CostBreakdownRecord::from_row(role, row))?;
        }
    }
    writer.flush()?;
    info!(path = %path.as_ref().display(), "cost breakdown written");
    Ok(())
}

/// Writes both rendered documents into `dir`, returning their paths (internal, client).
pub fn write_documents<P: AsRef<Path>>(
    documents: &DocumentPair,
    dir: P,
) -> ExportResult<(PathBuf, PathBuf)> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let internal = dir.join(&documents.internal.file_name);
    let client = dir.join(&documents.client.file_name);
    fs::write(&internal, &documents.internal.bytes)?;
    fs::write(&client, &documents.client.bytes)?;
    info!(dir = %dir.display(), "documents written");
    Ok((internal, client))
}

fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}
