use super::ConcatError;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use polars::prelude::*;

/// The closed category set of a categorical column, in category order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpec {
    categories: Vec<String>,
    ordered: bool,
}

impl CategorySpec {
    pub fn new<I, S>(categories: I, ordered: bool) -> Result<Self, ConcatError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        let mut seen = AHashSet::with_capacity(categories.len());
        for category in &categories {
            if !seen.insert(category.as_str()) {
                return Err(ConcatError::InvalidCategories(format!(
                    "category '{category}' is listed more than once"
                )));
            }
        }
        Ok(Self {
            categories,
            ordered,
        })
    }

    /// Infers the categories of a string series: its distinct non-null values, sorted.
    pub fn from_series(series: &Series, ordered: bool) -> Result<Self, ConcatError> {
        let categories = string_values(series)?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .sorted()
            .dedup()
            .collect();
        Ok(Self {
            categories,
            ordered,
        })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn contains(&self, value: &str) -> bool {
        self.categories.iter().any(|category| category == value)
    }

    /// Category sets compare element-wise, so order matters; orderedness does not.
    pub fn same_categories(&self, other: &CategorySpec) -> bool {
        self.categories == other.categories
    }

    /// Returns `series` with every value outside the category set replaced by null.
    pub(crate) fn apply(&self, series: &Series) -> Result<Series, ConcatError> {
        let values = string_values(series)?;
        let allowed: AHashSet<&str> = self.categories.iter().map(String::as_str).collect();
        let kept: StringChunked = values
            .into_iter()
            .map(|value| value.filter(|value| allowed.contains(value)))
            .collect();
        Ok(kept.with_name(series.name().clone()).into_series())
    }
}

fn string_values(series: &Series) -> Result<&StringChunked, ConcatError> {
    series.str().map_err(|_| ConcatError::NotString {
        column: series.name().to_string(),
        dtype: series.dtype().to_string(),
    })
}

/// A data frame plus the category specs of its categorical columns.
///
/// Categorical columns are stored as polars string columns whose values all lie
/// in their spec (anything else has been nulled).
#[derive(Debug, Clone)]
pub struct CategoricalFrame {
    frame: DataFrame,
    categories: AHashMap<String, CategorySpec>,
}

impl CategoricalFrame {
    pub fn new(frame: DataFrame) -> Self {
        Self {
            frame,
            categories: AHashMap::new(),
        }
    }

    /// Marks the string column `name` categorical with the given categories.
    pub fn with_categorical(mut self, name: &str, spec: CategorySpec) -> Result<Self, ConcatError> {
        let column = self
            .frame
            .column(name)
            .map_err(|_| ConcatError::ColumnNotFound(name.to_string()))?;
        let recast = spec.apply(column.as_materialized_series())?;
        self.frame.with_column(recast)?;
        self.categories.insert(name.to_string(), spec);
        Ok(self)
    }

    /// Marks the string column `name` categorical, inferring sorted categories from its values.
    pub fn categorize(self, name: &str, ordered: bool) -> Result<Self, ConcatError> {
        let column = self
            .frame
            .column(name)
            .map_err(|_| ConcatError::ColumnNotFound(name.to_string()))?;
        let spec = CategorySpec::from_series(column.as_materialized_series(), ordered)?;
        self.with_categorical(name, spec)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Drops the category specs and returns the plain frame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn category_spec(&self, name: &str) -> Option<&CategorySpec> {
        self.categories.get(name)
    }

    /// Categorical columns in frame column order.
    pub fn categorical_columns(&self) -> Vec<(&str, &CategorySpec)> {
        self.frame
            .get_column_names()
            .into_iter()
            .filter_map(|name| {
                self.categories
                    .get_key_value(name.as_str())
                    .map(|(name, spec)| (name.as_str(), spec))
            })
            .collect()
    }
}

impl From<DataFrame> for CategoricalFrame {
    fn from(frame: DataFrame) -> Self {
        Self::new(frame)
    }
}

/// A single named column, optionally categorical.
#[derive(Debug, Clone)]
pub struct CategoricalSeries {
    series: Series,
    categories: Option<CategorySpec>,
}

impl CategoricalSeries {
    pub fn new(series: Series) -> Self {
        Self {
            series,
            categories: None,
        }
    }

    pub fn categorical(series: Series, spec: CategorySpec) -> Result<Self, ConcatError> {
        let series = spec.apply(&series)?;
        Ok(Self {
            series,
            categories: Some(spec),
        })
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn into_series(self) -> Series {
        self.series
    }

    pub fn name(&self) -> &str {
        self.series.name().as_str()
    }

    pub fn category_spec(&self) -> Option<&CategorySpec> {
        self.categories.as_ref()
    }
}

impl From<Series> for CategoricalSeries {
    fn from(series: Series) -> Self {
        Self::new(series)
    }
}

/// Input and output of [`super::safe_concat`].
#[derive(Debug, Clone)]
pub enum Tabular {
    Frame(CategoricalFrame),
    Series(CategoricalSeries),
}

impl Tabular {
    /// Categorical columns by name, in column order.
    pub fn categorical_columns(&self) -> Vec<(&str, &CategorySpec)> {
        match self {
            Tabular::Frame(frame) => frame.categorical_columns(),
            Tabular::Series(series) => series
                .category_spec()
                .map(|spec| (series.name(), spec))
                .into_iter()
                .collect(),
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        match self {
            Tabular::Frame(frame) => frame.frame().height(),
            Tabular::Series(series) => series.series().len(),
        }
    }

    pub fn as_frame(&self) -> Option<&CategoricalFrame> {
        match self {
            Tabular::Frame(frame) => Some(frame),
            Tabular::Series(_) => None,
        }
    }

    pub fn as_series(&self) -> Option<&CategoricalSeries> {
        match self {
            Tabular::Series(series) => Some(series),
            Tabular::Frame(_) => None,
        }
    }

    /// A plain copy without category specs, as a frame.
    pub(crate) fn to_plain_frame(&self) -> DataFrame {
        match self {
            Tabular::Frame(frame) => frame.frame().clone(),
            Tabular::Series(series) => series.series().clone().into_frame(),
        }
    }
}

impl From<CategoricalFrame> for Tabular {
    fn from(frame: CategoricalFrame) -> Self {
        Tabular::Frame(frame)
    }
}

impl From<CategoricalSeries> for Tabular {
    fn from(series: CategoricalSeries) -> Self {
        Tabular::Series(series)
    }
}

impl From<DataFrame> for Tabular {
    fn from(frame: DataFrame) -> Self {
        Tabular::Frame(CategoricalFrame::new(frame))
    }
}

impl From<Series> for Tabular {
    fn from(series: Series) -> Self {
        Tabular::Series(CategoricalSeries::new(series))
    }
}
