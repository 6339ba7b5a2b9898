//! Construction of packed survival outcomes.
//!
//! [`Surv`] turns an event indicator and an observed time, given as separate
//! arrays or as two columns of a polars `DataFrame`, into an [`Outcome`]: the
//! fixed-layout record every validator and builder in this crate consumes.
//! [`PackedRecord`] is the loosely typed counterpart for callers that already
//! hold named fields of arbitrary type.

use crate::error::{OutcomeError, check_consistent_length};
use crate::values::RawArray;
use ndarray::{Array1, ArrayView1};
use polars::prelude::DataFrame;

pub const DEFAULT_EVENT_NAME: &str = "event";
pub const DEFAULT_TIME_NAME: &str = "time";
pub const DEFAULT_ENTRY_NAME: &str = "entry";

/// Caller-facing names of the outcome fields, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeFields {
    pub event: String,
    pub time: String,
    pub entry: Option<String>,
}

impl Default for OutcomeFields {
    fn default() -> Self {
        Self {
            event: DEFAULT_EVENT_NAME.to_string(),
            time: DEFAULT_TIME_NAME.to_string(),
            entry: None,
        }
    }
}

impl OutcomeFields {
    /// Field names in field order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![self.event.as_str(), self.time.as_str()];
        names.extend(self.entry.as_deref());
        names
    }
}

/// A borrowed outcome field looked up by name.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeField<'a> {
    Event(ArrayView1<'a, bool>),
    Time(ArrayView1<'a, f64>),
}

/// Canonical survival outcome: event indicator, observed time and an optional
/// entry (left-truncation) time, all of the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    fields: OutcomeFields,
    event: Array1<bool>,
    time: Array1<f64>,
    entry: Option<Array1<f64>>,
}

impl Outcome {
    pub fn fields(&self) -> &OutcomeFields {
        &self.fields
    }

    pub fn event(&self) -> ArrayView1<'_, bool> {
        self.event.view()
    }

    pub fn time(&self) -> ArrayView1<'_, f64> {
        self.time.view()
    }

    pub fn entry(&self) -> Option<ArrayView1<'_, f64>> {
        self.entry.as_ref().map(|entry| entry.view())
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Number of fields, 2 or 3.
    pub fn n_fields(&self) -> usize {
        if self.entry.is_some() { 3 } else { 2 }
    }

    /// Looks a field up by its caller-chosen name.
    pub fn field(&self, name: &str) -> Option<OutcomeField<'_>> {
        if name == self.fields.event {
            return Some(OutcomeField::Event(self.event()));
        }
        if name == self.fields.time {
            return Some(OutcomeField::Time(self.time()));
        }
        match (&self.fields.entry, &self.entry) {
            (Some(entry_name), Some(entry)) if entry_name == name => {
                Some(OutcomeField::Time(entry.view()))
            }
            _ => None,
        }
    }

    /// Attaches an entry time as third field, coerced to `f64` like `time`.
    pub fn with_entry(
        mut self,
        entry: impl Into<RawArray>,
        name_entry: Option<&str>,
    ) -> Result<Self, OutcomeError> {
        let name = name_or(name_entry, DEFAULT_ENTRY_NAME);
        if name == self.fields.event || name == self.fields.time {
            return Err(OutcomeError::NamingConflict(name));
        }
        let entry = entry.into().to_f64(&name)?;
        check_consistent_length(&[self.len(), entry.len()])?;
        self.fields.entry = Some(name);
        self.entry = Some(entry);
        Ok(self)
    }

    /// Copies the outcome into a loosely typed record.
    pub fn to_record(&self) -> PackedRecord {
        let mut fields = vec![
            (self.fields.event.clone(), RawArray::Bool(self.event.clone())),
            (self.fields.time.clone(), RawArray::Float(self.time.clone())),
        ];
        if let (Some(name), Some(entry)) = (&self.fields.entry, &self.entry) {
            fields.push((name.clone(), RawArray::Float(entry.clone())));
        }
        PackedRecord { fields }
    }

    pub(crate) fn from_parts(
        fields: OutcomeFields,
        event: Array1<bool>,
        time: Array1<f64>,
        entry: Option<Array1<f64>>,
    ) -> Self {
        Self {
            fields,
            event,
            time,
            entry,
        }
    }
}

impl From<&Outcome> for PackedRecord {
    fn from(outcome: &Outcome) -> Self {
        outcome.to_record()
    }
}

/// Named, ordered fields of runtime-typed arrays sharing one length.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedRecord {
    fields: Vec<(String, RawArray)>,
}

impl PackedRecord {
    pub fn new(fields: Vec<(String, RawArray)>) -> Result<Self, OutcomeError> {
        for (idx, (name, _)) in fields.iter().enumerate() {
            if fields[..idx].iter().any(|(other, _)| other == name) {
                return Err(OutcomeError::NamingConflict(name.clone()));
            }
        }
        let lengths: Vec<usize> = fields.iter().map(|(_, values)| values.len()).collect();
        check_consistent_length(&lengths)?;
        Ok(Self { fields })
    }

    /// Packs the given columns of a data frame, in the given order.
    pub fn from_dataframe(data: &DataFrame, columns: &[&str]) -> Result<Self, OutcomeError> {
        let fields = columns
            .iter()
            .map(|&name| {
                let column = data
                    .column(name)
                    .map_err(|_| OutcomeError::ColumnNotFound(name.to_string()))?;
                Ok((name.to_string(), RawArray::from_column(column)?))
            })
            .collect::<Result<Vec<_>, OutcomeError>>()?;
        Self::new(fields)
    }

    pub fn fields(&self) -> &[(String, RawArray)] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&RawArray> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, values)| values)
    }

    pub fn n_fields(&self) -> usize {
        self.fields.len()
    }

    /// Number of samples; zero for a record without fields.
    pub fn len(&self) -> usize {
        self.fields.first().map_or(0, |(_, values)| values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builders for packed survival outcomes.
pub struct Surv;

impl Surv {
    /// Packs an event indicator and observed times into an [`Outcome`].
    ///
    /// `event` may be boolean, or hold exactly the two codes 0 and 1 in its own
    /// type (integers, floats or text). `time` is coerced to `f64`. Names default
    /// to `"event"` and `"time"` and must differ.
    pub fn from_arrays(
        event: impl Into<RawArray>,
        time: impl Into<RawArray>,
        name_event: Option<&str>,
        name_time: Option<&str>,
    ) -> Result<Outcome, OutcomeError> {
        let name_event = name_or(name_event, DEFAULT_EVENT_NAME);
        let name_time = name_or(name_time, DEFAULT_TIME_NAME);
        if name_event == name_time {
            return Err(OutcomeError::NamingConflict(name_time));
        }

        let time = time.into().to_f64(&name_time)?;
        let event = event.into();
        check_consistent_length(&[time.len(), event.len()])?;
        let event = event.coerce_event()?;

        log::debug!(
            "Packed outcome ('{}', '{}') with {} samples, {} events",
            name_event,
            name_time,
            time.len(),
            event.iter().filter(|&&e| e).count()
        );

        Ok(Outcome::from_parts(
            OutcomeFields {
                event: name_event,
                time: name_time,
                entry: None,
            },
            event,
            time,
            None,
        ))
    }

    /// Packs two columns of `data`; the fields are named after the columns.
    pub fn from_dataframe(
        event_col: &str,
        time_col: &str,
        data: &DataFrame,
    ) -> Result<Outcome, OutcomeError> {
        let event = column_values(data, event_col)?;
        let time = column_values(data, time_col)?;
        Self::from_arrays(event, time, Some(event_col), Some(time_col))
    }

    /// Like [`Surv::from_dataframe`], with a third column holding entry times.
    pub fn from_dataframe_with_entry(
        event_col: &str,
        time_col: &str,
        entry_col: &str,
        data: &DataFrame,
    ) -> Result<Outcome, OutcomeError> {
        let entry = column_values(data, entry_col)?;
        Self::from_dataframe(event_col, time_col, data)?.with_entry(entry, Some(entry_col))
    }
}

fn name_or(name: Option<&str>, default: &str) -> String {
    name.filter(|name| !name.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn column_values(data: &DataFrame, name: &str) -> Result<RawArray, OutcomeError> {
    let column = data
        .column(name)
        .map_err(|_| OutcomeError::ColumnNotFound(name.to_string()))?;
    RawArray::from_column(column)
}
