//! Shared validation error for write-model checks.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reasons for malformed write models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is blank after trim.
    BlankField(&'static str),
    /// Review rating outside the allowed [1,5] range.
    RatingOutOfRange(i64),
    /// Semester outside the allowed [1,12] range.
    SemesterOutOfRange(i64),
    /// Academic year outside the plausible [1950,2100] range.
    YearOutOfRange(i64),
    /// Year of study outside the allowed [1,6] range.
    StudyYearOutOfRange(i64),
    /// Nil UUID supplied for a stable identifier.
    NilId(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::RatingOutOfRange(value) => {
                write!(f, "rating must be between 1 and 5, got {value}")
            }
            Self::SemesterOutOfRange(value) => {
                write!(f, "semester must be between 1 and 12, got {value}")
            }
            Self::YearOutOfRange(value) => {
                write!(f, "year must be between 1950 and 2100, got {value}")
            }
            Self::StudyYearOutOfRange(value) => {
                write!(f, "year of study must be between 1 and 6, got {value}")
            }
            Self::NilId(field) => write!(f, "{field} must not be the nil uuid"),
        }
    }
}

impl Error for ValidationError {}
