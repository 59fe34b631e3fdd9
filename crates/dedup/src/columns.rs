//! Canonical column identifiers shared by the registry, the loader and the formatter.

pub const ID: &str = "id";
pub const FIRST_NAME: &str = "first_name";
pub const MIDDLE_NAME: &str = "middle_name";
pub const LAST_NAME: &str = "last_name";
pub const NATIVE_NAME: &str = "native_name";
pub const FULL_NAME: &str = "full_name";
pub const MOTHERS_NAME: &str = "mothers_name";
pub const BIRTH_DATE: &str = "birth_date";

pub const IDENTIFICATION_NUMBER_1: &str = "identification_number_1";
pub const IDENTIFICATION_NUMBER_2: &str = "identification_number_2";
pub const IDENTIFICATION_NUMBER_3: &str = "identification_number_3";

pub const EMAIL_1: &str = "email_1";
pub const EMAIL_2: &str = "email_2";
pub const EMAIL_3: &str = "email_3";

pub const PHONE_NUMBER_1: &str = "phone_number_1";
pub const PHONE_NUMBER_2: &str = "phone_number_2";
pub const PHONE_NUMBER_3: &str = "phone_number_3";

pub const FREE_FIELD_1: &str = "free_field_1";
pub const FREE_FIELD_2: &str = "free_field_2";
pub const FREE_FIELD_3: &str = "free_field_3";
pub const FREE_FIELD_4: &str = "free_field_4";
pub const FREE_FIELD_5: &str = "free_field_5";

/// Synthetic column carrying a row's position in the original batch.
/// Reserved: a header may not use it.
pub const INDEX: &str = "index";

/// Date format every date column is pre-normalized to.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
