//! CSV loading for batches and existing records.

use std::path::Path;

use notcore_dedup::columns::ID;
use notcore_dedup::{StoredRecord, Table};

use crate::CliError;

/// All lines of a CSV file, header included, as raw strings.
/// Ragged lines are kept so the table loader can name the offending row.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| CliError::usage(format!("cannot read {}: {e}", path.display())))?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| CliError::malformed(format!("{}: {e}", path.display())))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    // Spreadsheet exports often start with a UTF-8 BOM.
    if let Some(first) = rows.first_mut().and_then(|r| r.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }
    Ok(rows)
}

pub fn load_batch(path: &Path) -> Result<Table, CliError> {
    let rows = read_rows(path)?;
    Table::load(&rows).map_err(|e| {
        CliError::malformed(format!("{}: {e}", path.display()))
    })
}

/// Existing records keyed by their `id` column. Every other column becomes a field.
pub fn load_existing(path: &Path) -> Result<Vec<StoredRecord>, CliError> {
    let rows = read_rows(path)?;
    let Some((header, data)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let id_pos = header.iter().position(|h| h == ID).ok_or_else(|| {
        CliError::malformed(format!("{}: no '{ID}' column", path.display()))
    })?;

    let mut records = Vec::with_capacity(data.len());
    for (i, row) in data.iter().enumerate() {
        let line = i + 2;
        if row.len() != header.len() {
            return Err(CliError::malformed(format!(
                "{}: row {line} has {} fields, header has {}",
                path.display(),
                row.len(),
                header.len()
            )));
        }
        let id = row[id_pos].trim();
        if id.is_empty() {
            return Err(CliError::malformed(format!("{}: row {line} has a blank id", path.display())));
        }
        let fields = header.iter().map(String::as_str).zip(row.iter().map(String::as_str));
        let record = StoredRecord::new(id, fields)
            .map_err(|e| CliError::malformed(format!("{}: row {line}: {e}", path.display())))?;
        records.push(record);
    }

    log::debug!("loaded {} existing records from {}", records.len(), path.display());
    Ok(records)
}
