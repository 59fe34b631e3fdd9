use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupError {
    /// Jagged rows, blank or repeated header names, unparsable dates.
    MalformedInput(String),
    /// `elem` addressed a row or column outside the table.
    IndexOutOfRange { row: usize, column: String },
    /// Projection or filter on a column the table does not have.
    UnknownColumn(String),
    /// A persisted record or the formatter was asked for a field it cannot resolve.
    UnknownField(String),
    /// Configuration names a deduplication type that is not registered.
    UnknownDeduplicationType(String),
    /// Logical operator other than AND / OR.
    UnknownOperator(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (duplicate type, blank column name, etc.).
    ConfigValidation(String),
    /// Message catalog could not be parsed.
    Locale(String),
}

impl fmt::Display for DedupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput(msg) => write!(f, "malformed input: {msg}"),
            Self::IndexOutOfRange { row, column } => {
                write!(f, "index out of range: row {row}, column '{column}'")
            }
            Self::UnknownColumn(column) => write!(f, "unknown column: '{column}'"),
            Self::UnknownField(field) => write!(f, "unknown field: '{field}'"),
            Self::UnknownDeduplicationType(name) => {
                write!(f, "invalid deduplication type: {name}")
            }
            Self::UnknownOperator(op) => {
                write!(f, "unknown logical operator '{op}' (expected AND or OR)")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Locale(msg) => write!(f, "message catalog error: {msg}"),
        }
    }
}

impl std::error::Error for DedupError {}
