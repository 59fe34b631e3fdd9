use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rayon::prelude::*;
use serde::Serialize;

use crate::aggregate::{build_indexes, score_row, verdict};
use crate::config::DeduplicationConfig;
use crate::error::DedupError;
use crate::registry::{is_date_column, DeduplicationType, LogicalOperator};
use crate::table::{Predicate, Table, Value};

// ---------------------------------------------------------------------------
// In-file duplicates
// ---------------------------------------------------------------------------

/// Row index -> other row indices considered the same person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DuplicateSets {
    sets: Vec<BTreeSet<usize>>,
}

impl DuplicateSets {
    fn with_rows(rows: usize) -> Self {
        Self { sets: vec![BTreeSet::new(); rows] }
    }

    pub fn get(&self, row: usize) -> Option<&BTreeSet<usize>> {
        self.sets.get(row)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.iter().all(BTreeSet::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &BTreeSet<usize>)> {
        self.sets.iter().enumerate()
    }

    /// Each unordered pair once, in first-reported order. A pair is
    /// remembered under both orientations as soon as it is emitted.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let mut alerted: HashSet<(usize, usize)> = HashSet::new();
        let mut out = Vec::new();
        for (row, duplicates) in self.iter() {
            for &other in duplicates {
                if alerted.contains(&(row, other)) {
                    continue;
                }
                alerted.insert((row, other));
                alerted.insert((other, row));
                out.push((row, other));
            }
        }
        out
    }

    pub fn is_symmetric(&self) -> bool {
        self.iter().all(|(row, duplicates)| {
            duplicates
                .iter()
                .all(|&other| self.get(other).is_some_and(|s| s.contains(&row)))
        })
    }
}

fn width(table: &Table) -> usize {
    table.original_rows().last().map_or(0, |&r| r + 1)
}

/// Score every row of the batch against every other row.
pub fn find_in_file(
    table: &Table,
    config: &DeduplicationConfig,
) -> Result<DuplicateSets, DedupError> {
    let indexes = build_indexes(config, table)?;
    let mut out = DuplicateSets::with_rows(width(table));
    for &row in table.original_rows() {
        out.sets[row] = score_row(config, &indexes, table, row)?;
    }
    log::debug!(
        "in-file pass: {} rows, {} types, {} pairs",
        table.nrows(),
        config.types.len(),
        out.pairs().len()
    );
    Ok(out)
}

/// [`find_in_file`] with reference rows spread over the rayon pool.
/// Each row is scored independently; fragments are merged in row order.
pub fn find_in_file_par(
    table: &Table,
    config: &DeduplicationConfig,
) -> Result<DuplicateSets, DedupError> {
    let indexes = build_indexes(config, table)?;
    let fragments = table
        .original_rows()
        .par_iter()
        .map(|&row| score_row(config, &indexes, table, row).map(|set| (row, set)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = DuplicateSets::with_rows(width(table));
    for (row, set) in fragments {
        out.sets[row] = set;
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Against persisted records
// ---------------------------------------------------------------------------

/// An already-persisted record a new row can duplicate.
pub trait Entity {
    fn id(&self) -> &str;

    /// Value of a canonical column. Unknown columns fail with `UnknownField`.
    fn field_value(&self, column: &str) -> Result<Value, DedupError>;
}

/// Map-backed [`Entity`], for callers that hold persisted rows as plain fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: String,
    pub fields: HashMap<String, Value>,
}

impl StoredRecord {
    pub fn new<'a, I>(id: &str, fields: I) -> Result<Self, DedupError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let fields = fields
            .into_iter()
            .map(|(column, raw)| Value::parse_for(column, raw).map(|v| (column.to_string(), v)))
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self { id: id.to_string(), fields })
    }
}

impl Entity for StoredRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn field_value(&self, column: &str) -> Result<Value, DedupError> {
        self.fields
            .get(column)
            .cloned()
            .ok_or_else(|| DedupError::UnknownField(column.to_string()))
    }
}

/// Entity value for `column`, with text dates typed like table dates.
pub(crate) fn entity_value<E: Entity + ?Sized>(
    entity: &E,
    column: &str,
) -> Result<Value, DedupError> {
    match entity.field_value(column)? {
        Value::Text(raw) if is_date_column(column) => Value::parse_for(column, &raw),
        value => Ok(value),
    }
}

/// Rows of `table` matching `entity` under one type.
fn rows_matching_entity<E: Entity + ?Sized>(
    ty: &DeduplicationType,
    table: &Table,
    entity: &E,
) -> Result<Vec<usize>, DedupError> {
    let values = ty
        .columns
        .iter()
        .map(|c| entity_value(entity, c))
        .collect::<Result<Vec<_>, _>>()?;

    match ty.condition {
        LogicalOperator::Or => {
            let present: Vec<Value> = values.into_iter().filter(|v| !v.is_empty()).collect();
            if present.is_empty() {
                return Ok(Vec::new());
            }
            let predicates: Vec<Predicate> = ty
                .columns
                .iter()
                .map(|c| Predicate::is_in(c, present.clone()))
                .collect();
            Ok(table.filter_any(&predicates)?.original_rows().to_vec())
        }
        LogicalOperator::And => {
            if values.iter().all(Value::is_empty) {
                return Ok(Vec::new());
            }
            let mut remaining = table.clone();
            for (column, value) in ty.columns.iter().zip(values) {
                remaining = remaining.filter(&Predicate::eq(column, value))?;
            }
            Ok(remaining.original_rows().to_vec())
        }
    }
}

/// New row index -> persisted entities it duplicates. Rows without a match are absent.
pub fn find_against_persisted<'e, E: Entity>(
    table: &Table,
    config: &DeduplicationConfig,
    entities: &'e [E],
) -> Result<BTreeMap<usize, Vec<&'e E>>, DedupError> {
    let mut out: BTreeMap<usize, Vec<&'e E>> = BTreeMap::new();
    let rows = width(table);

    for entity in entities {
        let mut scores = vec![0u32; rows];
        for ty in &config.types {
            for row in rows_matching_entity(ty, table, entity)? {
                scores[row] += 1;
            }
        }
        // No reference row to exclude on this side.
        for row in verdict(config.operator, config.types.len(), &scores, usize::MAX) {
            out.entry(row).or_default().push(entity);
        }
    }

    log::debug!(
        "persisted pass: {} entities, {} rows with matches",
        entities.len(),
        out.len()
    );
    Ok(out)
}
