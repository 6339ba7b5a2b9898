#![deny(dead_code)]
#![deny(unused_imports)]
//! Survival outcomes in one strict shape.
//!
//! Callers hand over event indicators and observation times in whatever form
//! they have them: separate arrays, two columns of a polars `DataFrame`, or a
//! packed record. Everything is resolved here into the canonical [`Outcome`]
//! (boolean event, `f64` time, optional `f64` entry time) and checked against the
//! usual survival invariants before any model code sees it.

pub mod config;
pub mod error;
pub mod structured;
pub mod tree;
pub mod validate;
pub mod values;

#[path = "../frames/mod.rs"]
pub mod frames;

#[path = "../shared/files.rs"]
pub mod shared_files;
pub mod shared {
    pub use super::shared_files as files;
}

pub use config::{ConfigError, OutcomeConfig};
pub use error::OutcomeError;
pub use frames::{
    CategoricalFrame, CategoricalSeries, CategorySpec, ConcatAxis, ConcatError, ConcatOptions,
    Tabular, safe_concat,
};
pub use structured::{Outcome, OutcomeField, OutcomeFields, PackedRecord, Surv};
pub use tree::{SurvivalTreeArrays, build_survival_tree_array};
pub use validate::{
    RawOutcome, SampleCount, ValidatedOutcome, check_array_survival, check_y_survival,
};
pub use values::RawArray;
