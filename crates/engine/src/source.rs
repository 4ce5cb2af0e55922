//! Evidence-row ingestion helpers.

use auditgrid_core::{AuditError, FieldValue, SourceRow};

/// Load CSV text into loosely-typed source rows. Headers become column
/// keys; every cell goes through [`FieldValue::from_input`]. Takes a
/// string, not a path — file IO stays with the caller.
pub fn rows_from_csv(csv_data: &str) -> Result<Vec<SourceRow>, AuditError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AuditError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AuditError::Csv(e.to_string()))?;
        let mut row = SourceRow::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(cell) = record.get(i) {
                row.set(header, FieldValue::from_input(cell));
            }
        }
        rows.push(row);
    }

    Ok(rows)
}
