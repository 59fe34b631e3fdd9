use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::columns;
use crate::error::DedupError;

// ---------------------------------------------------------------------------
// Logical operator
// ---------------------------------------------------------------------------

/// How a type combines its columns, and how a config combines its types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
}

impl FromStr for LogicalOperator {
    type Err = DedupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            _ => Err(DedupError::UnknownOperator(s.to_string())),
        }
    }
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Value domain
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDomain {
    String,
    Date,
}

// ---------------------------------------------------------------------------
// Type names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DeduplicationTypeName {
    Ids,
    PhoneNumbers,
    Emails,
    Names,
    FullName,
    FreeField1,
    FreeField2,
    FreeField3,
    FreeField4,
    FreeField5,
    BirthDate,
    MothersName,
}

impl DeduplicationTypeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ids => "Ids",
            Self::PhoneNumbers => "PhoneNumbers",
            Self::Emails => "Emails",
            Self::Names => "Names",
            Self::FullName => "FullName",
            Self::FreeField1 => "FreeField1",
            Self::FreeField2 => "FreeField2",
            Self::FreeField3 => "FreeField3",
            Self::FreeField4 => "FreeField4",
            Self::FreeField5 => "FreeField5",
            Self::BirthDate => "BirthDate",
            Self::MothersName => "MothersName",
        }
    }
}

impl FromStr for DeduplicationTypeName {
    type Err = DedupError;

    /// Identifiers are matched exactly; anything unregistered is an error
    /// rather than a type that silently matches nothing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        REGISTRY
            .iter()
            .find(|t| t.name.as_str() == s)
            .map(|t| t.name)
            .ok_or_else(|| DedupError::UnknownDeduplicationType(s.to_string()))
    }
}

impl std::fmt::Display for DeduplicationTypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// A named matching criterion over one or more columns.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct DeduplicationType {
    pub name: DeduplicationTypeName,
    pub label: &'static str,
    pub columns: &'static [&'static str],
    pub condition: LogicalOperator,
    pub domain: ValueDomain,
    /// Listing position in pickers and `types` output.
    pub order: u8,
}

impl DeduplicationType {
    pub fn get(name: DeduplicationTypeName) -> &'static DeduplicationType {
        // Every variant has exactly one entry; see `registry_covers_every_name`.
        REGISTRY
            .iter()
            .find(|t| t.name == name)
            .unwrap_or(&REGISTRY[0])
    }

    pub fn lookup(name: &str) -> Result<&'static DeduplicationType, DedupError> {
        name.parse::<DeduplicationTypeName>().map(Self::get)
    }
}

static REGISTRY: [DeduplicationType; 12] = [
    DeduplicationType {
        name: DeduplicationTypeName::Ids,
        label: "Identification numbers",
        columns: &[
            columns::IDENTIFICATION_NUMBER_1,
            columns::IDENTIFICATION_NUMBER_2,
            columns::IDENTIFICATION_NUMBER_3,
        ],
        condition: LogicalOperator::Or,
        domain: ValueDomain::String,
        order: 0,
    },
    DeduplicationType {
        name: DeduplicationTypeName::FreeField1,
        label: "Free Field 1",
        columns: &[columns::FREE_FIELD_1],
        condition: LogicalOperator::Or,
        domain: ValueDomain::String,
        order: 1,
    },
    DeduplicationType {
        name: DeduplicationTypeName::Emails,
        label: "E-Mails",
        columns: &[columns::EMAIL_1, columns::EMAIL_2, columns::EMAIL_3],
        condition: LogicalOperator::Or,
        domain: ValueDomain::String,
        order: 2,
    },
    DeduplicationType {
        name: DeduplicationTypeName::FreeField2,
        label: "Free Field 2",
        columns: &[columns::FREE_FIELD_2],
        condition: LogicalOperator::Or,
        domain: ValueDomain::String,
        order: 3,
    },
    DeduplicationType {
        name: DeduplicationTypeName::PhoneNumbers,
        label: "Phone numbers",
        columns: &[
            columns::PHONE_NUMBER_1,
            columns::PHONE_NUMBER_2,
            columns::PHONE_NUMBER_3,
        ],
        condition: LogicalOperator::Or,
        domain: ValueDomain::String,
        order: 4,
    },
    DeduplicationType {
        name: DeduplicationTypeName::FreeField3,
        label: "Free Field 3",
        columns: &[columns::FREE_FIELD_3],
        condition: LogicalOperator::Or,
        domain: ValueDomain::String,
        order: 5,
    },
    DeduplicationType {
        name: DeduplicationTypeName::FullName,
        label: "Full Name",
        columns: &[columns::FULL_NAME],
        condition: LogicalOperator::Or,
        domain: ValueDomain::String,
        order: 6,
    },
    DeduplicationType {
        name: DeduplicationTypeName::FreeField4,
        label: "Free Field 4",
        columns: &[columns::FREE_FIELD_4],
        condition: LogicalOperator::Or,
        domain: ValueDomain::String,
        order: 7,
    },
    DeduplicationType {
        name: DeduplicationTypeName::Names,
        label: "Names (First, Middle, Last, Native)",
        columns: &[
            columns::FIRST_NAME,
            columns::MIDDLE_NAME,
            columns::LAST_NAME,
            columns::NATIVE_NAME,
        ],
        condition: LogicalOperator::And,
        domain: ValueDomain::String,
        order: 8,
    },
    DeduplicationType {
        name: DeduplicationTypeName::FreeField5,
        label: "Free Field 5",
        columns: &[columns::FREE_FIELD_5],
        condition: LogicalOperator::Or,
        domain: ValueDomain::String,
        order: 9,
    },
    DeduplicationType {
        name: DeduplicationTypeName::BirthDate,
        label: "Birth date",
        columns: &[columns::BIRTH_DATE],
        condition: LogicalOperator::Or,
        domain: ValueDomain::Date,
        order: 10,
    },
    DeduplicationType {
        name: DeduplicationTypeName::MothersName,
        label: "Mother's name",
        columns: &[columns::MOTHERS_NAME],
        condition: LogicalOperator::Or,
        domain: ValueDomain::String,
        order: 11,
    },
];

/// All registered types, in listing order.
pub fn all() -> Vec<&'static DeduplicationType> {
    let mut types: Vec<_> = REGISTRY.iter().collect();
    types.sort_by_key(|t| t.order);
    types
}

/// Columns whose values are typed as dates rather than strings.
pub fn date_columns() -> impl Iterator<Item = &'static str> {
    REGISTRY
        .iter()
        .filter(|t| t.domain == ValueDomain::Date)
        .flat_map(|t| t.columns.iter().copied())
}

pub fn is_date_column(column: &str) -> bool {
    date_columns().any(|c| c == column)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_NAMES: [DeduplicationTypeName; 12] = [
        DeduplicationTypeName::Ids,
        DeduplicationTypeName::PhoneNumbers,
        DeduplicationTypeName::Emails,
        DeduplicationTypeName::Names,
        DeduplicationTypeName::FullName,
        DeduplicationTypeName::FreeField1,
        DeduplicationTypeName::FreeField2,
        DeduplicationTypeName::FreeField3,
        DeduplicationTypeName::FreeField4,
        DeduplicationTypeName::FreeField5,
        DeduplicationTypeName::BirthDate,
        DeduplicationTypeName::MothersName,
    ];

    #[test]
    fn registry_covers_every_name() {
        for name in ALL_NAMES {
            assert_eq!(DeduplicationType::get(name).name, name);
            assert_eq!(name.as_str().parse::<DeduplicationTypeName>().unwrap(), name);
        }
    }

    #[test]
    fn unknown_type_is_an_error() {
        let err = "Nicknames".parse::<DeduplicationTypeName>().unwrap_err();
        assert_eq!(err, DedupError::UnknownDeduplicationType("Nicknames".into()));
        // Identifiers are case-sensitive.
        assert!("ids".parse::<DeduplicationTypeName>().is_err());
    }

    #[test]
    fn listing_follows_order() {
        let names: Vec<_> = all().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names[0], "Ids");
        assert_eq!(names[1], "FreeField1");
        assert_eq!(names[8], "Names");
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn names_is_the_only_and_type() {
        let and_types: Vec<_> = all()
            .into_iter()
            .filter(|t| t.condition == LogicalOperator::And)
            .map(|t| t.name)
            .collect();
        assert_eq!(and_types, vec![DeduplicationTypeName::Names]);
    }

    #[test]
    fn operator_parsing() {
        assert_eq!("AND".parse::<LogicalOperator>().unwrap(), LogicalOperator::And);
        assert_eq!(" or ".parse::<LogicalOperator>().unwrap(), LogicalOperator::Or);
        assert!(matches!(
            "XOR".parse::<LogicalOperator>(),
            Err(DedupError::UnknownOperator(_))
        ));
    }

    #[test]
    fn birth_date_is_a_date_column() {
        assert!(is_date_column(columns::BIRTH_DATE));
        assert!(!is_date_column(columns::FULL_NAME));
    }
}
