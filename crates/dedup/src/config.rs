use serde::Deserialize;

use crate::columns;
use crate::error::DedupError;
use crate::registry::{DeduplicationType, DeduplicationTypeName, LogicalOperator};

// ---------------------------------------------------------------------------
// Deduplication config
// ---------------------------------------------------------------------------

/// Overall operator plus the ordered list of types it combines.
#[derive(Debug, Clone, PartialEq)]
pub struct DeduplicationConfig {
    pub operator: LogicalOperator,
    pub types: Vec<&'static DeduplicationType>,
}

impl DeduplicationConfig {
    pub fn new(operator: LogicalOperator, names: &[DeduplicationTypeName]) -> Self {
        Self {
            operator,
            types: names.iter().map(|&n| DeduplicationType::get(n)).collect(),
        }
    }

    /// Resolve textual type identifiers and operator, as submitted by a form.
    pub fn from_names<S: AsRef<str>>(names: &[S], operator: &str) -> Result<Self, DedupError> {
        let operator: LogicalOperator = operator.parse()?;
        let types = names
            .iter()
            .map(|n| DeduplicationType::lookup(n.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { operator, types })
    }

    /// Every column compared by the configured types, in config order, without repeats.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for ty in &self.types {
            for column in ty.columns {
                if !out.contains(column) {
                    out.push(column);
                }
            }
        }
        out
    }

    pub fn type_names(&self) -> Vec<&'static str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default = "default_name")]
    name: String,
    operator: String,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    report: ReportConfig,
}

fn default_name() -> String {
    "deduplication".into()
}

/// Formatting options for diagnostics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportConfig {
    /// Column checked for literal collisions. `None` disables the check.
    #[serde(default)]
    pub identity_column: Option<String>,
    /// Column quoted next to row numbers in primary messages.
    #[serde(default = "default_label_column")]
    pub label_column: String,
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_label_column() -> String {
    columns::LAST_NAME.into()
}

fn default_locale() -> String {
    "en".into()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            identity_column: None,
            label_column: default_label_column(),
            locale: default_locale(),
        }
    }
}

/// A named, validated deduplication run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupSettings {
    pub name: String,
    pub dedup: DeduplicationConfig,
    pub report: ReportConfig,
}

impl DedupSettings {
    pub fn from_toml(input: &str) -> Result<Self, DedupError> {
        let raw: RawSettings =
            toml::from_str(input).map_err(|e| DedupError::ConfigParse(e.to_string()))?;
        let settings = Self {
            name: raw.name,
            dedup: DeduplicationConfig::from_names(&raw.types, &raw.operator)?,
            report: raw.report,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), DedupError> {
        let types = &self.dedup.types;
        for (i, ty) in types.iter().enumerate() {
            if types[..i].iter().any(|t| t.name == ty.name) {
                return Err(DedupError::ConfigValidation(format!(
                    "type '{}' is listed more than once",
                    ty.name
                )));
            }
        }

        if self.report.label_column.trim().is_empty() {
            return Err(DedupError::ConfigValidation("report.label_column is blank".into()));
        }
        if let Some(ref column) = self.report.identity_column {
            if column.trim().is_empty() {
                return Err(DedupError::ConfigValidation(
                    "report.identity_column is blank".into(),
                ));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
