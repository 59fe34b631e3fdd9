use std::collections::BTreeMap;

use serde::Serialize;

use crate::builder::{
    find_against_persisted, find_in_file, find_in_file_par, DuplicateSets, Entity,
};
use crate::config::DedupSettings;
use crate::error::DedupError;
use crate::locale::Translator;
use crate::registry::LogicalOperator;
use crate::report::{
    find_identity_collisions, format_file_duplicates, format_identity_collisions,
    format_persisted_duplicates, Diagnostic,
};
use crate::table::Table;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DedupMeta {
    pub config_name: String,
    pub operator: LogicalOperator,
    pub types: Vec<&'static str>,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupSummary {
    pub rows: usize,
    pub duplicate_pairs: usize,
    pub rows_with_persisted_matches: usize,
    pub identity_collisions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupReport {
    pub meta: DedupMeta,
    pub summary: DedupSummary,
    pub file_duplicates: DuplicateSets,
    /// New row index -> ids of the persisted records it duplicates.
    pub persisted_duplicates: BTreeMap<usize, Vec<String>>,
    pub identity_collisions: BTreeMap<String, Vec<usize>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DedupReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Batches at least this large score their rows on the rayon pool.
pub const PARALLEL_ROWS: usize = 512;

/// One full pass over a loaded batch: identity collisions, in-file duplicates,
/// matches against persisted records, then diagnostics for all three.
/// Any error aborts the whole pass; nothing is partially reported.
pub fn run<E: Entity>(
    table: &Table,
    settings: &DedupSettings,
    persisted: &[E],
    tr: &dyn Translator,
) -> Result<DedupReport, DedupError> {
    let config = &settings.dedup;
    let label_column = settings.report.label_column.as_str();
    let mut diagnostics = Vec::new();

    // Literal identity collisions are independent of the configured types.
    let collisions = match settings.report.identity_column.as_deref() {
        Some(column) if table.has_column(column) => find_identity_collisions(table, column)?,
        Some(column) => {
            log::info!("identity column '{column}' not in batch, skipping collision check");
            BTreeMap::new()
        }
        None => BTreeMap::new(),
    };
    diagnostics.extend(format_identity_collisions(&collisions, table, label_column, tr)?);

    let file_duplicates = if table.nrows() >= PARALLEL_ROWS {
        find_in_file_par(table, config)?
    } else {
        find_in_file(table, config)?
    };
    diagnostics.extend(format_file_duplicates(
        &file_duplicates,
        config,
        table,
        label_column,
        tr,
    )?);

    let persisted_matches = if persisted.is_empty() {
        BTreeMap::new()
    } else {
        find_against_persisted(table, config, persisted)?
    };
    diagnostics.extend(format_persisted_duplicates(
        &persisted_matches,
        config,
        table,
        label_column,
        tr,
    )?);

    let summary = DedupSummary {
        rows: table.nrows(),
        duplicate_pairs: file_duplicates.pairs().len(),
        rows_with_persisted_matches: persisted_matches.len(),
        identity_collisions: collisions.len(),
    };
    log::info!(
        "{}: {} rows, {} duplicate pairs, {} rows matching persisted records, {} id collisions",
        settings.name,
        summary.rows,
        summary.duplicate_pairs,
        summary.rows_with_persisted_matches,
        summary.identity_collisions
    );

    Ok(DedupReport {
        meta: DedupMeta {
            config_name: settings.name.clone(),
            operator: config.operator,
            types: config.type_names(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        file_duplicates,
        persisted_duplicates: persisted_matches
            .into_iter()
            .map(|(row, entities)| (row, entities.iter().map(|e| e.id().to_string()).collect()))
            .collect(),
        identity_collisions: collisions
            .into_iter()
            .map(|(value, rows)| (value, rows.into_iter().collect()))
            .collect(),
        diagnostics,
    })
}
