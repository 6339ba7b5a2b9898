use crate::error::{OutcomeError, check_consistent_length};
use crate::validate::{RawOutcome, SampleCount, ValidatedOutcome, check_y_survival};
use ndarray::{Array1, Array2};

/// Numeric view of an outcome for array-based survival trees.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalTreeArrays {
    /// Shape `[n_samples, 2 or 3]`: time, event as 0.0/1.0, and the entry time
    /// when the outcome carries one. Rows keep the input order.
    pub y_numeric: Array2<f64>,
    /// Sorted distinct times at which an event was observed.
    pub event_times: Array1<f64>,
    /// The event indicator, only when requested.
    pub event: Option<Array1<bool>>,
}

/// Builds the numeric outcome matrix and the event-time grid used by survival trees.
pub fn build_survival_tree_array<'a, X>(
    x: &X,
    y: impl Into<RawOutcome<'a>>,
    with_event: bool,
) -> Result<SurvivalTreeArrays, OutcomeError>
where
    X: SampleCount + ?Sized,
{
    let ValidatedOutcome { event, times } = check_y_survival(y, false)?;
    let mut times = times.into_iter();
    let (time, entry) = match (times.next(), times.next(), times.next()) {
        (Some(Some(time)), entry, None) => (time, entry.flatten()),
        _ => {
            return Err(OutcomeError::structure(
                "expected an event indicator, a time field and at most one entry field",
            ));
        }
    };

    let mut lengths = vec![x.n_samples(), event.len(), time.len()];
    lengths.extend(entry.as_ref().map(|entry| entry.len()));
    check_consistent_length(&lengths)?;

    let n_cols = 2 + usize::from(entry.is_some());
    let mut y_numeric = Array2::<f64>::zeros((time.len(), n_cols));
    y_numeric.column_mut(0).assign(&time);
    y_numeric
        .column_mut(1)
        .assign(&event.mapv(|e| if e { 1.0 } else { 0.0 }));
    if let Some(entry) = &entry {
        y_numeric.column_mut(2).assign(entry);
    }

    let event_times = unique_event_times(&time, &event);
    log::debug!(
        "Built survival tree arrays: {} x {}, {} distinct event times",
        y_numeric.nrows(),
        y_numeric.ncols(),
        event_times.len()
    );

    Ok(SurvivalTreeArrays {
        y_numeric,
        event_times,
        event: with_event.then_some(event),
    })
}

fn unique_event_times(time: &Array1<f64>, event: &Array1<bool>) -> Array1<f64> {
    let mut times: Vec<f64> = time
        .iter()
        .zip(event.iter())
        .filter_map(|(&t, &e)| e.then_some(t))
        .collect();
    times.sort_by(f64::total_cmp);
    times.dedup();
    Array1::from_vec(times)
}
