use polars::prelude::PolarsError;
use thiserror::Error;

/// Every way an outcome can fail construction or validation.
#[derive(Debug, Error)]
pub enum OutcomeError {
    #[error("Field name '{0}' is used for more than one outcome field.")]
    NamingConflict(String),
    #[error("{what} must be {expected}, but found dtype {found}.")]
    TypeMismatch {
        what: String,
        expected: &'static str,
        found: String,
    },
    #[error("Invalid outcome structure: {0}")]
    Structure(String),
    #[error("Event indicator must be binary, but found {found} distinct values.")]
    Cardinality { found: usize },
    #[error("Non-boolean event indicator must contain 0 and 1 only, but found {found}.")]
    Encoding { found: String },
    #[error("Found input arrays with inconsistent numbers of samples: {lengths:?}")]
    LengthMismatch { lengths: Vec<usize> },
    #[error("All samples are censored.")]
    AllCensored,
    #[error("Found outcome with 0 samples, but at least 1 is required.")]
    Empty,
    #[error("Time-like argument {position} contains NaN or infinite values.")]
    NonFinite { position: usize },
    #[error("The column '{0}' was not found in the data frame.")]
    ColumnNotFound(String),
    #[error("Missing or null values were found in the column '{0}'.")]
    MissingValues(String),
    #[error("Error from the underlying Polars library: {0}")]
    Polars(#[from] PolarsError),
}

impl OutcomeError {
    pub(crate) fn type_mismatch(
        what: impl Into<String>,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            what: what.into(),
            expected,
            found: found.into(),
        }
    }

    pub(crate) fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }
}

/// Fails with [`OutcomeError::LengthMismatch`] unless every length is equal.
pub(crate) fn check_consistent_length(lengths: &[usize]) -> Result<(), OutcomeError> {
    match lengths.split_first() {
        Some((first, rest)) if rest.iter().any(|len| len != first) => {
            Err(OutcomeError::LengthMismatch {
                lengths: lengths.to_vec(),
            })
        }
        _ => Ok(()),
    }
}
