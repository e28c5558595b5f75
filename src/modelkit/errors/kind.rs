//! Error kinds and details.

use serde::{Deserialize, Serialize};

/// What went wrong with an attribute.
///
/// Each kind has a stable key (used for message overrides) and a default
/// English template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Free-form message added directly by the caller
    Custom,
    Invalid,
    Blank,
    Present,
    TooShort { count: usize },
    TooLong { count: usize },
    WrongLength { count: usize },
    Inclusion,
    Exclusion,
    NotANumber,
    NotAnInteger,
    GreaterThan { count: f64 },
    GreaterThanOrEqualTo { count: f64 },
    EqualTo { count: f64 },
    LessThan { count: f64 },
    LessThanOrEqualTo { count: f64 },
    OtherThan { count: f64 },
    Odd,
    Even,
    Accepted,
    /// Confirmation did not match; `attribute` is the confirmed attribute
    Confirmation { attribute: String },
}

impl ErrorKind {
    pub fn key(&self) -> &'static str {
        match self {
            ErrorKind::Custom => "custom",
            ErrorKind::Invalid => "invalid",
            ErrorKind::Blank => "blank",
            ErrorKind::Present => "present",
            ErrorKind::TooShort { .. } => "too_short",
            ErrorKind::TooLong { .. } => "too_long",
            ErrorKind::WrongLength { .. } => "wrong_length",
            ErrorKind::Inclusion => "inclusion",
            ErrorKind::Exclusion => "exclusion",
            ErrorKind::NotANumber => "not_a_number",
            ErrorKind::NotAnInteger => "not_an_integer",
            ErrorKind::GreaterThan { .. } => "greater_than",
            ErrorKind::GreaterThanOrEqualTo { .. } => "greater_than_or_equal_to",
            ErrorKind::EqualTo { .. } => "equal_to",
            ErrorKind::LessThan { .. } => "less_than",
            ErrorKind::LessThanOrEqualTo { .. } => "less_than_or_equal_to",
            ErrorKind::OtherThan { .. } => "other_than",
            ErrorKind::Odd => "odd",
            ErrorKind::Even => "even",
            ErrorKind::Accepted => "accepted",
            ErrorKind::Confirmation { .. } => "confirmation",
        }
    }

    pub fn default_template(&self) -> &'static str {
        match self {
            ErrorKind::Custom | ErrorKind::Invalid => "is invalid",
            ErrorKind::Blank => "can't be blank",
            ErrorKind::Present => "must be blank",
            ErrorKind::TooShort { .. } => "is too short (minimum is %{count} characters)",
            ErrorKind::TooLong { .. } => "is too long (maximum is %{count} characters)",
            ErrorKind::WrongLength { .. } => "is the wrong length (should be %{count} characters)",
            ErrorKind::Inclusion => "is not included in the list",
            ErrorKind::Exclusion => "is reserved",
            ErrorKind::NotANumber => "is not a number",
            ErrorKind::NotAnInteger => "must be an integer",
            ErrorKind::GreaterThan { .. } => "must be greater than %{count}",
            ErrorKind::GreaterThanOrEqualTo { .. } => "must be greater than or equal to %{count}",
            ErrorKind::EqualTo { .. } => "must be equal to %{count}",
            ErrorKind::LessThan { .. } => "must be less than %{count}",
            ErrorKind::LessThanOrEqualTo { .. } => "must be less than or equal to %{count}",
            ErrorKind::OtherThan { .. } => "must be other than %{count}",
            ErrorKind::Odd => "must be odd",
            ErrorKind::Even => "must be even",
            ErrorKind::Accepted => "must be accepted",
            ErrorKind::Confirmation { .. } => "doesn't match %{attribute}",
        }
    }

    /// Value substituted for `%{count}`, if the kind carries one.
    pub fn count(&self) -> Option<String> {
        match self {
            ErrorKind::TooShort { count }
            | ErrorKind::TooLong { count }
            | ErrorKind::WrongLength { count } => Some(count.to_string()),
            ErrorKind::GreaterThan { count }
            | ErrorKind::GreaterThanOrEqualTo { count }
            | ErrorKind::EqualTo { count }
            | ErrorKind::LessThan { count }
            | ErrorKind::LessThanOrEqualTo { count }
            | ErrorKind::OtherThan { count } => Some(count.to_string()),
            _ => None,
        }
    }
}

/// One recorded error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Attribute name, or [`BASE`](crate::attributes::BASE) for whole-object errors
    pub attribute: String,
    pub kind: ErrorKind,
    /// Rendered message (without the attribute label)
    pub message: String,
}
