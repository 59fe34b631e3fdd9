use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::builder::{entity_value, DuplicateSets, Entity};
use crate::columns::INDEX;
use crate::config::DeduplicationConfig;
use crate::error::DedupError;
use crate::locale::Translator;
use crate::table::{Predicate, Table, Value};

/// One user-facing problem: a primary message plus per-column detail lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub details: Vec<String>,
}

/// Spreadsheet line of a data row: 1-based, after the header.
fn line(row: usize) -> String {
    (row + 2).to_string()
}

/// Batch cell, with a missing column reported as an unknown field.
fn cell<'t>(table: &'t Table, row: usize, column: &str) -> Result<&'t Value, DedupError> {
    table.get(row, column).map_err(|e| match e {
        DedupError::UnknownColumn(c) => DedupError::UnknownField(c),
        other => other,
    })
}

/// One diagnostic per unordered duplicate pair, with a detail line for every
/// compared column that is not blank on both rows.
pub fn format_file_duplicates(
    sets: &DuplicateSets,
    config: &DeduplicationConfig,
    table: &Table,
    label_column: &str,
    tr: &dyn Translator,
) -> Result<Vec<Diagnostic>, DedupError> {
    let columns = config.columns();
    let mut out = Vec::new();

    for (a, b) in sets.pairs() {
        let mut details = Vec::new();
        for column in &columns {
            let value_a = cell(table, a, column)?;
            let value_b = cell(table, b, column)?;
            if value_a.is_empty() && value_b.is_empty() {
                continue;
            }
            details.push(tr.translate(
                "file_detail",
                &[
                    ("column", column.to_string()),
                    ("row_a", line(a)),
                    ("value_a", value_a.to_string()),
                    ("row_b", line(b)),
                    ("value_b", value_b.to_string()),
                ],
            ));
        }

        let message = tr.translate(
            "file_pair",
            &[
                ("label_a", cell(table, a, label_column)?.to_string()),
                ("row_a", line(a)),
                ("label_b", cell(table, b, label_column)?.to_string()),
                ("row_b", line(b)),
            ],
        );
        out.push(Diagnostic { message, details });
    }

    Ok(out)
}

/// One diagnostic per (new row, persisted entity) match.
pub fn format_persisted_duplicates<E: Entity>(
    matches: &BTreeMap<usize, Vec<&E>>,
    config: &DeduplicationConfig,
    table: &Table,
    label_column: &str,
    tr: &dyn Translator,
) -> Result<Vec<Diagnostic>, DedupError> {
    let columns = config.columns();
    let mut out = Vec::new();

    for (&row, entities) in matches {
        for entity in entities {
            let mut details = Vec::new();
            for column in &columns {
                let stored = entity_value(*entity, column)?;
                let submitted = cell(table, row, column)?;
                if stored.is_empty() && submitted.is_empty() {
                    continue;
                }
                details.push(tr.translate(
                    "persisted_detail",
                    &[
                        ("column", column.to_string()),
                        ("entity_value", stored.to_string()),
                        ("file_value", submitted.to_string()),
                    ],
                ));
            }

            let message = tr.translate(
                "persisted_match",
                &[
                    ("label", cell(table, row, label_column)?.to_string()),
                    ("row", line(row)),
                    ("entity_label", entity_value(*entity, label_column)?.to_string()),
                    ("entity_id", entity.id().to_string()),
                ],
            );
            out.push(Diagnostic { message, details });
        }
    }

    Ok(out)
}

/// Rows sharing an equal non-empty value in `column`, grouped by that value.
/// Only groups of two or more rows are returned.
pub fn find_identity_collisions(
    table: &Table,
    column: &str,
) -> Result<BTreeMap<String, BTreeSet<usize>>, DedupError> {
    let present = table
        .select(&[column])?
        .filter(&Predicate::neq(column, Value::Empty))?;

    let mut groups: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
    for r in 0..present.nrows() {
        let value = present.elem(r, column)?.to_string();
        let row = match present.elem(r, INDEX)? {
            Value::Index(i) => i,
            _ => present.original_index(r)?,
        };
        groups.entry(value).or_default().insert(row);
    }
    groups.retain(|_, rows| rows.len() > 1);
    Ok(groups)
}

pub fn format_identity_collisions(
    groups: &BTreeMap<String, BTreeSet<usize>>,
    table: &Table,
    label_column: &str,
    tr: &dyn Translator,
) -> Result<Vec<Diagnostic>, DedupError> {
    let mut out = Vec::with_capacity(groups.len());
    for (value, rows) in groups {
        let participants = rows
            .iter()
            .map(|&row| {
                Ok(tr.translate(
                    "identity_participant",
                    &[
                        ("label", cell(table, row, label_column)?.to_string()),
                        ("row", line(row)),
                    ],
                ))
            })
            .collect::<Result<Vec<_>, DedupError>>()?;

        out.push(Diagnostic {
            message: tr.translate(
                "identity_collision",
                &[("participants", participants.join(", ")), ("value", value.clone())],
            ),
            details: Vec::new(),
        });
    }
    Ok(out)
}
