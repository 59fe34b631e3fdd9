//! CLI Exit Code Registry
//!
//! Single source of truth for the `notcore-dedup` exit codes.
//! Scripts gate registration imports on these values.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Batch is clean                                       |
//! | 1    | Duplicates or identity collisions were reported      |
//! | 2    | Usage error (bad arguments, unreadable file)         |
//! | 3    | Invalid deduplication config or message catalog      |
//! | 4    | Malformed batch or persisted-record input            |

use notcore_dedup::DedupError;

/// Success - no diagnostics.
pub const EXIT_SUCCESS: u8 = 0;

/// The check ran and found duplicates. Like `diff(1)`, 1 means "not clean."
pub const EXIT_DUPLICATES: u8 = 1;

/// Usage error - bad arguments, missing or unreadable files.
pub const EXIT_USAGE: u8 = 2;

/// Config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Input CSV could not be turned into a table or record set.
pub const EXIT_MALFORMED_INPUT: u8 = 4;

/// Map an engine error to its exit code.
pub fn dedup_exit_code(err: &DedupError) -> u8 {
    match err {
        DedupError::ConfigParse(_)
        | DedupError::ConfigValidation(_)
        | DedupError::UnknownDeduplicationType(_)
        | DedupError::UnknownOperator(_)
        | DedupError::Locale(_) => EXIT_INVALID_CONFIG,
        // A batch missing the columns its config compares is bad input.
        DedupError::MalformedInput(_)
        | DedupError::UnknownColumn(_)
        | DedupError::UnknownField(_)
        | DedupError::IndexOutOfRange { .. } => EXIT_MALFORMED_INPUT,
    }
}
