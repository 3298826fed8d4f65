//! CSV export of ranked results.

use chrono::NaiveDate;

use crate::domain::RankedResult;

/// Column headers, in order.
pub const CSV_HEADER: [&str; 4] = ["name", "address", "category", "driving_time"];

/// Errors while writing the CSV document.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV flush failed: {0}")]
    Flush(String),

    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render results as CSV, one row per result in ranked order.
///
/// Missing addresses are written as `No address`; fields containing
/// commas, quotes or newlines are quoted.
pub fn to_csv(results: &[RankedResult]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for result in results {
        writer.write_record([
            result.name.as_str(),
            result.display_address(),
            result.display_label(),
            result.travel.text(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Download file name for an export made on `date`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use nearby_server::export::export_filename;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// assert_eq!(export_filename(date), "search-results-20240315.csv");
/// ```
pub fn export_filename(date: NaiveDate) -> String {
    format!("search-results-{}.csv", date.format("%Y%m%d"))
}
