use crate::error::{OutcomeError, check_consistent_length};
use crate::structured::{DEFAULT_ENTRY_NAME, Outcome, OutcomeFields, PackedRecord};
use crate::values::RawArray;
use ndarray::{Array1, ArrayBase, ArrayView1, Ix2, RawData};
use polars::prelude::DataFrame;

/// An outcome as handed over by a caller, before validation.
#[derive(Debug, Clone)]
pub enum RawOutcome<'a> {
    /// A canonical outcome built by [`crate::Surv`].
    Outcome(&'a Outcome),
    /// Named fields: event indicator first, then time and an optional entry time.
    Packed(&'a PackedRecord),
    /// An event indicator with one or more time-like arrays. `None` slots are
    /// passed through unvalidated.
    Separate {
        event: &'a RawArray,
        times: Vec<Option<&'a RawArray>>,
    },
}

impl<'a> RawOutcome<'a> {
    pub fn separate(event: &'a RawArray, times: Vec<Option<&'a RawArray>>) -> Self {
        RawOutcome::Separate { event, times }
    }
}

impl<'a> From<&'a Outcome> for RawOutcome<'a> {
    fn from(outcome: &'a Outcome) -> Self {
        RawOutcome::Outcome(outcome)
    }
}

impl<'a> From<&'a PackedRecord> for RawOutcome<'a> {
    fn from(record: &'a PackedRecord) -> Self {
        RawOutcome::Packed(record)
    }
}

/// Result of [`check_y_survival`]: the event indicator followed by the
/// time-like arrays in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOutcome {
    pub event: Array1<bool>,
    pub times: Vec<Option<Array1<f64>>>,
}

impl ValidatedOutcome {
    /// The first time-like array, i.e. the time of event or censoring.
    pub fn time(&self) -> Option<ArrayView1<'_, f64>> {
        self.slot(0)
    }

    /// The second time-like array, i.e. the entry time, when present.
    pub fn entry(&self) -> Option<ArrayView1<'_, f64>> {
        self.slot(1)
    }

    fn slot(&self, idx: usize) -> Option<ArrayView1<'_, f64>> {
        self.times
            .get(idx)
            .and_then(Option::as_ref)
            .map(|values| values.view())
    }

    /// Repacks a validated result into a canonical outcome with default field
    /// names, so it can be validated again.
    pub fn into_outcome(self) -> Result<Outcome, OutcomeError> {
        let mut times = self.times.into_iter();
        let (time, entry) = match (times.next(), times.next(), times.next()) {
            (Some(Some(time)), entry, None) => (time, entry.flatten()),
            _ => {
                return Err(OutcomeError::structure(
                    "a canonical outcome needs a time and at most one entry time",
                ));
            }
        };
        check_consistent_length(&[self.event.len(), time.len()])?;
        if let Some(entry) = &entry {
            check_consistent_length(&[time.len(), entry.len()])?;
        }
        let mut fields = OutcomeFields::default();
        if entry.is_some() {
            fields.entry = Some(DEFAULT_ENTRY_NAME.to_string());
        }
        Ok(Outcome::from_parts(fields, self.event, time, entry))
    }
}

/// Anything with a number of samples along its first axis.
pub trait SampleCount {
    fn n_samples(&self) -> usize;
}

impl<S: RawData> SampleCount for ArrayBase<S, Ix2> {
    fn n_samples(&self) -> usize {
        self.nrows()
    }
}

impl SampleCount for DataFrame {
    fn n_samples(&self) -> usize {
        self.height()
    }
}

enum TimeArg<'a> {
    Raw(&'a RawArray),
    Float(ArrayView1<'a, f64>),
}

/// Checks that `y` correctly represents a survival outcome.
///
/// The event indicator must already be boolean; unlike [`crate::Surv::from_arrays`]
/// no 0/1 coercion happens here. Time-like arrays must be numeric and finite.
/// Unless `allow_all_censored` is set, at least one event must be observed.
pub fn check_y_survival<'a>(
    y: impl Into<RawOutcome<'a>>,
    allow_all_censored: bool,
) -> Result<ValidatedOutcome, OutcomeError> {
    let (event, time_args) = resolve(y.into())?;

    if !(allow_all_censored || event.iter().any(|&e| e)) {
        return Err(OutcomeError::AllCensored);
    }

    let mut times = Vec::with_capacity(time_args.len());
    for (idx, arg) in time_args.into_iter().enumerate() {
        let position = idx + 2;
        let values = match arg {
            None => {
                times.push(None);
                continue;
            }
            Some(TimeArg::Raw(raw)) => {
                if raw.is_empty() {
                    return Err(OutcomeError::Empty);
                }
                if !raw.is_numeric() {
                    return Err(OutcomeError::type_mismatch(
                        format!("time argument {position}"),
                        "numeric",
                        raw.dtype(),
                    ));
                }
                raw.to_f64(&format!("time argument {position}"))?
            }
            Some(TimeArg::Float(values)) => values.to_owned(),
        };
        if values.iter().any(|v| !v.is_finite()) {
            return Err(OutcomeError::NonFinite { position });
        }
        times.push(Some(values));
    }

    log::debug!(
        "Validated survival outcome: {} samples, {} events, {} time-like arrays",
        event.len(),
        event.iter().filter(|&&e| e).count(),
        times.len()
    );

    Ok(ValidatedOutcome { event, times })
}

fn resolve(y: RawOutcome<'_>) -> Result<(Array1<bool>, Vec<Option<TimeArg<'_>>>), OutcomeError> {
    match y {
        RawOutcome::Outcome(outcome) => {
            if outcome.is_empty() {
                return Err(OutcomeError::Empty);
            }
            let mut times = vec![Some(TimeArg::Float(outcome.time()))];
            times.extend(outcome.entry().map(|entry| Some(TimeArg::Float(entry))));
            Ok((outcome.event().to_owned(), times))
        }
        RawOutcome::Packed(record) => {
            if !(2..=3).contains(&record.n_fields()) {
                return Err(OutcomeError::structure(format!(
                    "y must contain two or three fields, with the first field being a binary \
                     event indicator, the second field the time of the event/censoring, and the \
                     third optional field the time of entry (found {} fields)",
                    record.n_fields()
                )));
            }
            let fields = record.fields();
            let event = check_event(&fields[0].1)?;
            let times = fields[1..]
                .iter()
                .map(|(_, values)| Some(TimeArg::Raw(values)))
                .collect();
            Ok((event, times))
        }
        RawOutcome::Separate { event, times } => {
            if times.is_empty() {
                return Err(OutcomeError::structure(
                    "an event indicator passed on its own needs at least one time-like array",
                ));
            }
            let event = check_event(event)?;
            Ok((event, times.into_iter().map(|t| t.map(TimeArg::Raw)).collect()))
        }
    }
}

fn check_event(raw: &RawArray) -> Result<Array1<bool>, OutcomeError> {
    if raw.is_empty() {
        return Err(OutcomeError::Empty);
    }
    match raw {
        RawArray::Bool(values) => Ok(values.clone()),
        other => Err(OutcomeError::type_mismatch(
            "elements of event indicator",
            "boolean",
            other.dtype(),
        )),
    }
}

/// Checks an outcome against a feature matrix and returns `(event, time)`.
///
/// Only two-field outcomes are accepted; entry times are not part of this path.
pub fn check_array_survival<'a, X>(
    x: &X,
    y: impl Into<RawOutcome<'a>>,
) -> Result<(Array1<bool>, Array1<f64>), OutcomeError>
where
    X: SampleCount + ?Sized,
{
    let ValidatedOutcome { event, times } = check_y_survival(y, false)?;
    let mut times = times.into_iter();
    let time = match (times.next(), times.next()) {
        (Some(Some(time)), None) => time,
        _ => {
            return Err(OutcomeError::structure(
                "expected exactly an event indicator and a time field",
            ));
        }
    };
    check_consistent_length(&[x.n_samples(), event.len(), time.len()])?;
    Ok((event, time))
}
