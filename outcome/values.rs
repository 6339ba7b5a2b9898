use crate::error::OutcomeError;
use itertools::Itertools;
use ndarray::Array1;
use polars::prelude::*;

/// A one-dimensional input array whose element type is only known at runtime.
///
/// This is the boundary type for everything a caller may pass as an event
/// indicator or a time-like array. It is resolved to a concrete `bool`/`f64`
/// array exactly once, by the builder or the validator.
#[derive(Debug, Clone, PartialEq)]
pub enum RawArray {
    Bool(Array1<bool>),
    Int(Array1<i64>),
    Float(Array1<f64>),
    Text(Array1<String>),
}

impl RawArray {
    pub fn len(&self) -> usize {
        match self {
            RawArray::Bool(values) => values.len(),
            RawArray::Int(values) => values.len(),
            RawArray::Float(values) => values.len(),
            RawArray::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the element type, as reported in error messages.
    pub fn dtype(&self) -> &'static str {
        match self {
            RawArray::Bool(_) => "bool",
            RawArray::Int(_) => "int64",
            RawArray::Float(_) => "float64",
            RawArray::Text(_) => "str",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, RawArray::Int(_) | RawArray::Float(_))
    }

    /// Coerces every element to `f64`. Booleans become 0/1 and text is parsed.
    pub fn to_f64(&self, what: &str) -> Result<Array1<f64>, OutcomeError> {
        match self {
            RawArray::Bool(values) => Ok(values.mapv(|v| if v { 1.0 } else { 0.0 })),
            RawArray::Int(values) => Ok(values.mapv(|v| v as f64)),
            RawArray::Float(values) => Ok(values.clone()),
            RawArray::Text(values) => values
                .iter()
                .map(|text| {
                    text.trim().parse::<f64>().map_err(|_| {
                        OutcomeError::type_mismatch(
                            what,
                            "coercible to float64",
                            format!("str (value '{text}')"),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Array1::from_vec),
        }
    }

    /// Resolves an event indicator to booleans.
    ///
    /// Boolean input is taken as is. Any other input must hold exactly two
    /// distinct values which, sorted, equal 0 and 1 in the array's own type.
    pub fn coerce_event(&self) -> Result<Array1<bool>, OutcomeError> {
        match self {
            RawArray::Bool(values) => Ok(values.clone()),
            RawArray::Int(values) => {
                let distinct: Vec<i64> = values.iter().copied().sorted().dedup().collect();
                check_binary(&distinct, &[0, 1])?;
                Ok(values.mapv(|v| v == 1))
            }
            RawArray::Float(values) => {
                let mut distinct: Vec<f64> = values.to_vec();
                distinct.sort_by(f64::total_cmp);
                distinct.dedup_by(|a, b| a == b || (a.is_nan() && b.is_nan()));
                check_binary(&distinct, &[0.0, 1.0])?;
                Ok(values.mapv(|v| v == 1.0))
            }
            RawArray::Text(values) => {
                let distinct: Vec<&str> =
                    values.iter().map(String::as_str).sorted().dedup().collect();
                check_binary(&distinct, &["0", "1"])?;
                Ok(values.map(|v| v == "1"))
            }
        }
    }

    /// Reads a polars column without nulls into the matching variant.
    pub fn from_column(column: &Column) -> Result<Self, OutcomeError> {
        let name = column.name().to_string();
        if column.null_count() > 0 {
            return Err(OutcomeError::MissingValues(name));
        }
        let dtype = column.dtype().clone();
        let values = match dtype {
            DataType::Boolean => RawArray::Bool(column.bool()?.into_no_null_iter().collect()),
            DataType::String => RawArray::Text(
                column
                    .str()?
                    .into_no_null_iter()
                    .map(str::to_string)
                    .collect(),
            ),
            ref numeric if numeric.is_integer() => {
                let casted = column.strict_cast(&DataType::Int64).map_err(|_| {
                    OutcomeError::type_mismatch(
                        format!("column '{name}'"),
                        "coercible to int64",
                        numeric.to_string(),
                    )
                })?;
                RawArray::Int(casted.i64()?.into_no_null_iter().collect())
            }
            ref numeric if numeric.is_float() => {
                let casted = column.cast(&DataType::Float64)?;
                RawArray::Float(casted.f64()?.into_no_null_iter().collect())
            }
            other => {
                return Err(OutcomeError::type_mismatch(
                    format!("column '{name}'"),
                    "boolean, numeric or string",
                    other.to_string(),
                ));
            }
        };
        Ok(values)
    }
}

fn check_binary<T>(distinct: &[T], expected: &[T; 2]) -> Result<(), OutcomeError>
where
    T: PartialEq + std::fmt::Debug,
{
    if distinct.len() != 2 {
        return Err(OutcomeError::Cardinality {
            found: distinct.len(),
        });
    }
    if distinct != expected.as_slice() {
        return Err(OutcomeError::Encoding {
            found: format!("{distinct:?}"),
        });
    }
    Ok(())
}

macro_rules! raw_array_from {
    ($variant:ident, $elem:ty) => {
        impl From<Array1<$elem>> for RawArray {
            fn from(values: Array1<$elem>) -> Self {
                RawArray::$variant(values)
            }
        }

        impl From<Vec<$elem>> for RawArray {
            fn from(values: Vec<$elem>) -> Self {
                RawArray::$variant(Array1::from_vec(values))
            }
        }
    };
}

raw_array_from!(Bool, bool);
raw_array_from!(Int, i64);
raw_array_from!(Float, f64);
raw_array_from!(Text, String);

impl From<Vec<i32>> for RawArray {
    fn from(values: Vec<i32>) -> Self {
        RawArray::Int(values.into_iter().map(i64::from).collect())
    }
}

impl From<Vec<&str>> for RawArray {
    fn from(values: Vec<&str>) -> Self {
        RawArray::Text(values.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn integer_events_coerce_to_bool() {
        let raw = RawArray::from(vec![0i64, 1, 1, 0]);
        assert_eq!(raw.coerce_event().unwrap(), array![false, true, true, false]);
    }

    #[test]
    fn float_and_text_codes_compare_in_their_own_dtype() {
        let floats = RawArray::from(vec![1.0, 0.0, 1.0]);
        assert_eq!(floats.coerce_event().unwrap(), array![true, false, true]);

        let text = RawArray::from(vec!["1", "0", "0"]);
        assert_eq!(text.coerce_event().unwrap(), array![true, false, false]);
    }

    #[test]
    fn event_codes_must_be_binary() {
        let err = RawArray::from(vec![0i64, 1, 2]).coerce_event().unwrap_err();
        assert!(matches!(err, OutcomeError::Cardinality { found: 3 }));

        let err = RawArray::from(vec![1i64, 1, 1]).coerce_event().unwrap_err();
        assert!(matches!(err, OutcomeError::Cardinality { found: 1 }));

        let err = RawArray::from(vec![2i64, 3]).coerce_event().unwrap_err();
        assert!(matches!(err, OutcomeError::Encoding { .. }));

        let err = RawArray::from(vec!["yes", "no"]).coerce_event().unwrap_err();
        assert!(matches!(err, OutcomeError::Encoding { .. }));
    }

    #[test]
    fn nan_counts_as_one_distinct_code() {
        let err = RawArray::from(vec![0.0, f64::NAN, f64::NAN])
            .coerce_event()
            .unwrap_err();
        assert!(matches!(err, OutcomeError::Encoding { .. }));
    }

    #[test]
    fn text_times_are_parsed() {
        let raw = RawArray::from(vec!["1.5", " 2 ", "3e1"]);
        assert_eq!(raw.to_f64("time").unwrap(), array![1.5, 2.0, 30.0]);

        let err = RawArray::from(vec!["1.5", "soon"]).to_f64("time").unwrap_err();
        match err {
            OutcomeError::TypeMismatch { what, found, .. } => {
                assert_eq!(what, "time");
                assert!(found.contains("soon"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn boolean_times_widen_to_zero_one() {
        let raw = RawArray::from(vec![true, false]);
        assert_eq!(raw.to_f64("time").unwrap(), array![1.0, 0.0]);
        assert!(!raw.is_numeric());
    }

    #[test]
    fn columns_map_to_matching_variants() {
        let df = DataFrame::new(vec![
            Series::new("flag".into(), vec![true, false]).into(),
            Series::new("code".into(), vec![1i32, 0]).into(),
            Series::new("days".into(), vec![1.5f32, 2.5]).into(),
            Series::new("label".into(), vec!["a", "b"]).into(),
        ])
        .expect("construct frame");

        let flag = RawArray::from_column(df.column("flag").unwrap()).unwrap();
        assert_eq!(flag, RawArray::from(vec![true, false]));
        let code = RawArray::from_column(df.column("code").unwrap()).unwrap();
        assert_eq!(code, RawArray::from(vec![1i64, 0]));
        let days = RawArray::from_column(df.column("days").unwrap()).unwrap();
        assert_eq!(days, RawArray::from(vec![1.5, 2.5]));
        let label = RawArray::from_column(df.column("label").unwrap()).unwrap();
        assert_eq!(label.dtype(), "str");
    }

    #[test]
    fn narrow_and_unsigned_integers_widen_to_int64() {
        let df = DataFrame::new(vec![
            Series::new("status".into(), vec![1u8, 0, 1]).into(),
            Series::new("days".into(), vec![5u64, 12, 40]).into(),
        ])
        .expect("construct frame");

        let status = RawArray::from_column(df.column("status").unwrap()).unwrap();
        assert_eq!(status, RawArray::from(vec![1i64, 0, 1]));
        let days = RawArray::from_column(df.column("days").unwrap()).unwrap();
        assert_eq!(days, RawArray::from(vec![5i64, 12, 40]));
    }

    #[test]
    fn integers_beyond_int64_are_type_errors() {
        let df = DataFrame::new(vec![
            Series::new("days".into(), vec![5u64, 10_000_000_000_000_000_000]).into(),
        ])
        .expect("construct frame");
        let err = RawArray::from_column(df.column("days").unwrap()).unwrap_err();
        match err {
            OutcomeError::TypeMismatch { what, found, .. } => {
                assert_eq!(what, "column 'days'");
                assert_eq!(found, "u64");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unsupported_dtypes_are_type_errors() {
        let dates = Series::new("enrolled".into(), vec![19_000i32, 19_001])
            .cast(&DataType::Date)
            .expect("cast to date");
        let df = DataFrame::new(vec![dates.into()]).expect("construct frame");
        let err = RawArray::from_column(df.column("enrolled").unwrap()).unwrap_err();
        assert!(matches!(err, OutcomeError::TypeMismatch { what, .. } if what == "column 'enrolled'"));
    }

    #[test]
    fn columns_with_nulls_are_rejected() {
        let df = DataFrame::new(vec![
            Series::new("days".into(), vec![Some(1.0), None]).into(),
        ])
        .expect("construct frame");
        let err = RawArray::from_column(df.column("days").unwrap()).unwrap_err();
        assert!(matches!(err, OutcomeError::MissingValues(name) if name == "days"));
    }
}
