use anyhow::{Context, Result};

use crate::import::dates::CANONICAL_DATE_FORMAT;
use crate::import::schema::IMPORT_COLUMNS;
use crate::models::application::ApplicationRow;

const EXTRA_COLUMNS: [&str; 3] = ["Min Salary", "Max Salary", "Created Date"];

/// Renders applications as CSV. The first eight columns follow the import
/// contract, so the output can be fed back into the importer.
pub fn render_csv(rows: &[ApplicationRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = IMPORT_COLUMNS
        .iter()
        .map(|c| c.canonical_name)
        .chain(EXTRA_COLUMNS);
    writer.write_record(header)?;

    for row in rows {
        writer.write_record([
            row.company_name.clone(),
            row.position.clone(),
            row.job_type.clone(),
            row.state.clone(),
            row.city.clone(),
            row.date_applied.format(CANONICAL_DATE_FORMAT).to_string(),
            row.work_mode.clone(),
            row.status.clone(),
            row.salary_min.to_string(),
            row.salary_max.to_string(),
            row.created_at.to_rfc3339(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV export: {e}"))?;
    String::from_utf8(bytes).context("CSV export produced invalid UTF-8")
}
