//! Categorical-aware tabular merging.
//!
//! Polars string columns carry no notion of a closed, possibly ordered category
//! set, and a generic concatenation has no way to reconcile one across inputs.
//! [`CategoricalFrame`] and [`CategoricalSeries`] keep the category set next to
//! the data, and [`safe_concat`] carries it through a merge.

use polars::prelude::PolarsError;
use thiserror::Error;

pub mod categorical;
pub mod concat;

pub use categorical::{CategoricalFrame, CategoricalSeries, CategorySpec, Tabular};
pub use concat::{ConcatAxis, ConcatOptions, safe_concat};

#[derive(Error, Debug)]
pub enum ConcatError {
    #[error("Duplicate categorical column '{0}' when concatenating along columns.")]
    DuplicateColumn(String),
    #[error("Categories for column '{0}' do not match.")]
    CategoryMismatch(String),
    #[error("Invalid categories: {0}")]
    InvalidCategories(String),
    #[error("Concatenation axis must be 0 (rows) or 1 (columns), but got {0}.")]
    UnsupportedAxis(usize),
    #[error("The column '{0}' was not found.")]
    ColumnNotFound(String),
    #[error("Column '{column}' must hold strings to be categorical, but has dtype {dtype}.")]
    NotString { column: String, dtype: String },
    #[error("No objects to concatenate.")]
    Empty,
    #[error("Error from the underlying Polars library: {0}")]
    Polars(#[from] PolarsError),
}
