use std::collections::{BTreeSet, HashMap};

use crate::error::DedupError;
use crate::registry::{DeduplicationType, LogicalOperator};
use crate::table::{Predicate, Table, Value};

/// Per-type lookup built once per pass so every reference row is scored
/// without rescanning the batch.
#[derive(Debug)]
pub enum TypeIndex {
    /// Non-empty value -> rows holding it in ANY of the type's columns.
    Or {
        positions: Vec<usize>,
        by_value: HashMap<Value, BTreeSet<usize>>,
    },
    /// Column-ordered value tuple -> rows holding exactly that tuple.
    And {
        positions: Vec<usize>,
        by_tuple: HashMap<Vec<Value>, BTreeSet<usize>>,
    },
}

impl TypeIndex {
    pub fn build(ty: &DeduplicationType, table: &Table) -> Result<Self, DedupError> {
        let positions = table.positions(ty.columns)?;

        match ty.condition {
            LogicalOperator::Or => {
                let mut by_value: HashMap<Value, BTreeSet<usize>> = HashMap::new();
                for &row in table.original_rows() {
                    for &p in &positions {
                        let value = table.value_at(row, p);
                        if !value.is_empty() {
                            by_value.entry(value.clone()).or_default().insert(row);
                        }
                    }
                }
                Ok(Self::Or { positions, by_value })
            }
            LogicalOperator::And => {
                let mut by_tuple: HashMap<Vec<Value>, BTreeSet<usize>> = HashMap::new();
                for &row in table.original_rows() {
                    let tuple = positions.iter().map(|&p| table.value_at(row, p).clone()).collect();
                    by_tuple.entry(tuple).or_default().insert(row);
                }
                Ok(Self::And { positions, by_tuple })
            }
        }
    }
}

fn check_reference(table: &Table, reference: usize) -> Result<(), DedupError> {
    if table.original_rows().binary_search(&reference).is_err() {
        return Err(DedupError::IndexOutOfRange {
            row: reference,
            column: crate::columns::INDEX.to_string(),
        });
    }
    Ok(())
}

/// Rows matching `reference` under one type, using a prebuilt index.
///
/// OR: any non-empty reference value found in any of the type's columns of
/// another row. AND: every column byte-identical, column for column. The
/// reference row itself is never part of the result.
pub fn score_type(
    index: &TypeIndex,
    table: &Table,
    reference: usize,
) -> Result<BTreeSet<usize>, DedupError> {
    check_reference(table, reference)?;

    let mut matches = match index {
        TypeIndex::Or { positions, by_value } => {
            let mut out = BTreeSet::new();
            for &p in positions {
                let value = table.value_at(reference, p);
                if value.is_empty() {
                    continue;
                }
                if let Some(rows) = by_value.get(value) {
                    out.extend(rows.iter().copied());
                }
            }
            out
        }
        TypeIndex::And { positions, by_tuple } => {
            let tuple: Vec<Value> = positions
                .iter()
                .map(|&p| table.value_at(reference, p).clone())
                .collect();
            if tuple.iter().all(Value::is_empty) {
                log::debug!("row {reference}: all AND columns blank, no matches");
                BTreeSet::new()
            } else {
                by_tuple.get(&tuple).cloned().unwrap_or_default()
            }
        }
    };

    matches.remove(&reference);
    Ok(matches)
}

/// Same contract as [`score_type`], computed by filtering the table directly.
/// Quadratic over a batch; kept as the reference behaviour the index must match.
pub fn score_type_scan(
    ty: &DeduplicationType,
    table: &Table,
    reference: usize,
) -> Result<BTreeSet<usize>, DedupError> {
    check_reference(table, reference)?;
    let positions = table.positions(ty.columns)?;
    let others = table.without_row(reference);
    let mut out = BTreeSet::new();

    match ty.condition {
        LogicalOperator::Or => {
            for &p in &positions {
                let value = table.value_at(reference, p);
                if value.is_empty() {
                    continue;
                }
                let predicates: Vec<Predicate> = ty
                    .columns
                    .iter()
                    .map(|c| Predicate::eq(c, value.clone()))
                    .collect();
                out.extend(others.filter_any(&predicates)?.original_rows().iter().copied());
            }
        }
        LogicalOperator::And => {
            if positions.iter().all(|&p| table.value_at(reference, p).is_empty()) {
                return Ok(out);
            }
            let mut remaining = others;
            for (column, &p) in ty.columns.iter().zip(&positions) {
                let value = table.value_at(reference, p).clone();
                remaining = remaining.filter(&Predicate::eq(column, value))?;
            }
            out.extend(remaining.original_rows().iter().copied());
        }
    }

    Ok(out)
}
