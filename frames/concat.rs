use super::ConcatError;
use super::categorical::{CategoricalFrame, CategoricalSeries, CategorySpec, Tabular};
use ahash::AHashMap;
use polars::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConcatAxis {
    /// Stack objects on top of each other (axis 0).
    #[default]
    Rows,
    /// Place objects side by side (axis 1).
    Columns,
}

impl TryFrom<usize> for ConcatAxis {
    type Error = ConcatError;

    fn try_from(axis: usize) -> Result<Self, Self::Error> {
        match axis {
            0 => Ok(ConcatAxis::Rows),
            1 => Ok(ConcatAxis::Columns),
            other => Err(ConcatError::UnsupportedAxis(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConcatOptions {
    pub axis: ConcatAxis,
}

impl ConcatOptions {
    pub fn along(axis: ConcatAxis) -> Self {
        Self { axis }
    }
}

/// Concatenates `objects` without losing their categorical columns.
///
/// Category specs are collected in one pass, first seen wins. Along columns a
/// categorical name may appear only once: differing categories are a
/// [`ConcatError::CategoryMismatch`], identical ones a
/// [`ConcatError::DuplicateColumn`]. Along rows differing specs are accepted and
/// the first one is reapplied to the merged column, so values from later
/// objects that fall outside it become null.
///
/// The inputs are left untouched. Series stacked along rows give a series
/// named after the first one; categories recorded under any other name are
/// dropped with a warning. Every other combination gives a frame.
pub fn safe_concat(objects: &[Tabular], options: &ConcatOptions) -> Result<Tabular, ConcatError> {
    if objects.is_empty() {
        return Err(ConcatError::Empty);
    }

    let mut specs: Vec<(String, CategorySpec)> = Vec::new();
    let mut seen: AHashMap<String, usize> = AHashMap::new();
    for object in objects {
        for (name, spec) in object.categorical_columns() {
            match seen.get(name).copied() {
                None => {
                    seen.insert(name.to_string(), specs.len());
                    specs.push((name.to_string(), spec.clone()));
                }
                Some(idx) => {
                    let first = &specs[idx].1;
                    match options.axis {
                        ConcatAxis::Columns if !first.same_categories(spec) => {
                            return Err(ConcatError::CategoryMismatch(name.to_string()));
                        }
                        ConcatAxis::Columns => {
                            return Err(ConcatError::DuplicateColumn(name.to_string()));
                        }
                        ConcatAxis::Rows if !first.same_categories(spec) => {
                            log::warn!(
                                "Categories for column '{}' differ between objects; keeping {:?} \
                                 from the first one, values outside it become null",
                                name,
                                first.categories()
                            );
                        }
                        ConcatAxis::Rows => {}
                    }
                }
            }
        }
    }

    let merged = match options.axis {
        ConcatAxis::Rows => concat_rows(objects)?,
        ConcatAxis::Columns => Tabular::Frame(CategoricalFrame::new(concat_columns(objects)?)),
    };

    log::debug!(
        "Concatenated {} objects along {:?} into {} rows, restoring {} categorical columns",
        objects.len(),
        options.axis,
        merged.height(),
        specs.len()
    );

    restore_categories(merged, specs)
}

fn concat_rows(objects: &[Tabular]) -> Result<Tabular, ConcatError> {
    let all_series: Option<Vec<&CategoricalSeries>> =
        objects.iter().map(Tabular::as_series).collect();
    if let Some(series) = all_series {
        let (first, rest) = series.split_first().ok_or(ConcatError::Empty)?;
        let mut merged = first.series().clone();
        for other in rest {
            merged.append(other.series())?;
        }
        return Ok(Tabular::Series(CategoricalSeries::new(merged)));
    }

    let (first, rest) = objects.split_first().ok_or(ConcatError::Empty)?;
    let mut merged = first.to_plain_frame();
    for other in rest {
        merged.vstack_mut(&other.to_plain_frame())?;
    }
    Ok(Tabular::Frame(CategoricalFrame::new(merged)))
}

fn concat_columns(objects: &[Tabular]) -> Result<DataFrame, ConcatError> {
    let (first, rest) = objects.split_first().ok_or(ConcatError::Empty)?;
    let mut merged = first.to_plain_frame();
    for other in rest {
        merged = merged.hstack(other.to_plain_frame().get_columns())?;
    }
    Ok(merged)
}

fn restore_categories(
    merged: Tabular,
    specs: Vec<(String, CategorySpec)>,
) -> Result<Tabular, ConcatError> {
    match merged {
        Tabular::Frame(frame) => {
            let frame = specs
                .into_iter()
                .try_fold(frame, |frame, (name, spec)| frame.with_categorical(&name, spec))?;
            Ok(Tabular::Frame(frame))
        }
        Tabular::Series(series) => {
            let mut kept = None;
            for (name, spec) in specs {
                if name == series.name() {
                    kept = Some(spec);
                } else {
                    log::warn!(
                        "Series '{}' was stacked under the name '{}'; its categories {:?} \
                         are not kept",
                        name,
                        series.name(),
                        spec.categories()
                    );
                }
            }
            match kept {
                Some(spec) => Ok(Tabular::Series(CategoricalSeries::categorical(
                    series.into_series(),
                    spec,
                )?)),
                None => Ok(Tabular::Series(series)),
            }
        }
    }
}
