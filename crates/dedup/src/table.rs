use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::columns::{DATE_FORMAT, INDEX};
use crate::error::DedupError;
use crate::registry::is_date_column;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A single cell. Text is compared byte-for-byte; no trimming or case folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Value {
    Empty,
    Text(String),
    Date(NaiveDate),
    /// Original row position, only produced by the synthetic `index` column.
    Index(usize),
}

impl Value {
    /// Build a value for `column` from its raw text form. Date columns must be
    /// `YYYY-MM-DD`; everything else is kept as text.
    pub fn parse_for(column: &str, raw: &str) -> Result<Self, DedupError> {
        if raw.is_empty() {
            return Ok(Self::Empty);
        }
        if is_date_column(column) {
            return NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(Self::Date)
                .map_err(|_| {
                    DedupError::MalformedInput(format!(
                        "column '{column}': cannot parse date '{raw}'"
                    ))
                });
        }
        Ok(Self::Text(raw.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Comparator {
    Eq(Value),
    Neq(Value),
    In(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub comparator: Comparator,
}

impl Predicate {
    pub fn eq(column: &str, value: Value) -> Self {
        Self { column: column.to_string(), comparator: Comparator::Eq(value) }
    }

    pub fn neq(column: &str, value: Value) -> Self {
        Self { column: column.to_string(), comparator: Comparator::Neq(value) }
    }

    pub fn is_in(column: &str, values: Vec<Value>) -> Self {
        Self { column: column.to_string(), comparator: Comparator::In(values) }
    }

    fn accepts(&self, value: &Value) -> bool {
        match &self.comparator {
            Comparator::Eq(v) => value == v,
            Comparator::Neq(v) => value != v,
            Comparator::In(vs) => vs.contains(value),
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Storage {
    header: Vec<String>,
    positions: HashMap<String, usize>,
    cells: Vec<Vec<Value>>,
}

/// Index-addressable view over a batch of rows.
///
/// Cell storage is shared between a table and every view derived from it;
/// `select` and `filter` only build new row / column index lists. Each view
/// row remembers its position in the original batch, exposed through the
/// synthetic `index` column.
#[derive(Debug, Clone)]
pub struct Table {
    storage: Arc<Storage>,
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl Table {
    /// Load a header row followed by data rows.
    pub fn load(rows: &[Vec<String>]) -> Result<Self, DedupError> {
        let (header, data) = rows
            .split_first()
            .ok_or_else(|| DedupError::MalformedInput("missing header row".into()))?;

        let mut positions = HashMap::with_capacity(header.len());
        for (i, name) in header.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(DedupError::MalformedInput(format!(
                    "header column {} has no name",
                    i + 1
                )));
            }
            if name == INDEX {
                return Err(DedupError::MalformedInput(format!(
                    "header column '{INDEX}' is reserved"
                )));
            }
            if positions.insert(name.clone(), i).is_some() {
                return Err(DedupError::MalformedInput(format!(
                    "header column '{name}' appears more than once"
                )));
            }
        }

        let mut cells = Vec::with_capacity(data.len());
        for (r, row) in data.iter().enumerate() {
            if row.len() != header.len() {
                return Err(DedupError::MalformedInput(format!(
                    "row {} has {} fields, header has {}",
                    r + 2,
                    row.len(),
                    header.len()
                )));
            }
            let values = header
                .iter()
                .zip(row)
                .map(|(column, raw)| Value::parse_for(column, raw))
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(values);
        }

        let nrows = cells.len();
        let ncols = header.len();
        Ok(Self {
            storage: Arc::new(Storage { header: header.clone(), positions, cells }),
            rows: (0..nrows).collect(),
            cols: (0..ncols).collect(),
        })
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.cols.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.cols.iter().map(|&c| self.storage.header[c].as_str()).collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        column == INDEX || self.position(column).is_some()
    }

    /// Original batch position of view row `row`.
    pub fn original_index(&self, row: usize) -> Result<usize, DedupError> {
        self.rows.get(row).copied().ok_or_else(|| DedupError::IndexOutOfRange {
            row,
            column: INDEX.to_string(),
        })
    }

    /// Position of `column` in storage, if it is part of this view.
    fn position(&self, column: &str) -> Option<usize> {
        self.storage
            .positions
            .get(column)
            .copied()
            .filter(|p| self.cols.contains(p))
    }

    fn require(&self, column: &str) -> Result<Option<usize>, DedupError> {
        if column == INDEX {
            return Ok(None);
        }
        self.position(column)
            .map(Some)
            .ok_or_else(|| DedupError::UnknownColumn(column.to_string()))
    }

    fn cell(&self, original: usize, position: Option<usize>) -> Value {
        match position {
            Some(p) => self.storage.cells[original][p].clone(),
            None => Value::Index(original),
        }
    }

    /// Cell at view row `row`, column `column`.
    pub fn elem(&self, row: usize, column: &str) -> Result<Value, DedupError> {
        let original = *self.rows.get(row).ok_or_else(|| DedupError::IndexOutOfRange {
            row,
            column: column.to_string(),
        })?;
        let position = self.require(column).map_err(|_| DedupError::IndexOutOfRange {
            row,
            column: column.to_string(),
        })?;
        Ok(self.cell(original, position))
    }

    /// Cell addressed by original batch position instead of view position.
    pub fn get(&self, original: usize, column: &str) -> Result<&Value, DedupError> {
        let p = self
            .position(column)
            .ok_or_else(|| DedupError::UnknownColumn(column.to_string()))?;
        self.storage
            .cells
            .get(original)
            .map(|row| &row[p])
            .ok_or_else(|| DedupError::IndexOutOfRange { row: original, column: column.to_string() })
    }

    pub(crate) fn value_at(&self, original: usize, position: usize) -> &Value {
        &self.storage.cells[original][position]
    }

    /// Storage positions for `columns`, failing on the first unknown one.
    pub(crate) fn positions(&self, columns: &[&str]) -> Result<Vec<usize>, DedupError> {
        columns
            .iter()
            .map(|c| self.position(c).ok_or_else(|| DedupError::UnknownColumn(c.to_string())))
            .collect()
    }

    /// Original positions of the rows in this view, in view order.
    pub fn original_rows(&self) -> &[usize] {
        &self.rows
    }

    /// Column projection. Cell storage is shared, not copied.
    pub fn select(&self, columns: &[&str]) -> Result<Self, DedupError> {
        let mut cols = Vec::with_capacity(columns.len());
        for column in columns {
            if *column == INDEX {
                continue;
            }
            let p = self
                .position(column)
                .ok_or_else(|| DedupError::UnknownColumn(column.to_string()))?;
            if !cols.contains(&p) {
                cols.push(p);
            }
        }
        Ok(Self { storage: Arc::clone(&self.storage), rows: self.rows.clone(), cols })
    }

    /// Rows satisfying `predicate`.
    pub fn filter(&self, predicate: &Predicate) -> Result<Self, DedupError> {
        self.filter_any(std::slice::from_ref(predicate))
    }

    /// Rows satisfying at least one of `predicates`. No predicates keeps every row.
    pub fn filter_any(&self, predicates: &[Predicate]) -> Result<Self, DedupError> {
        if predicates.is_empty() {
            return Ok(self.clone());
        }
        let resolved = predicates
            .iter()
            .map(|p| self.require(&p.column).map(|pos| (p, pos)))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&original| {
                resolved.iter().any(|(p, pos)| match pos {
                    Some(c) => p.accepts(self.value_at(original, *c)),
                    None => p.accepts(&Value::Index(original)),
                })
            })
            .collect();
        Ok(Self { storage: Arc::clone(&self.storage), rows, cols: self.cols.clone() })
    }

    /// Every row except the one at original position `original`.
    pub fn without_row(&self, original: usize) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            rows: self.rows.iter().copied().filter(|&r| r != original).collect(),
            cols: self.cols.clone(),
        }
    }
}
