use ndarray::{Array2, array};
use polars::prelude::*;
use survkit::{
    OutcomeError, PackedRecord, RawArray, RawOutcome, Surv, build_survival_tree_array,
    check_array_survival, check_y_survival,
};

#[test]
fn boolean_and_numeric_inputs_round_trip() {
    let events = vec![true, false, true, false, false];
    let times = vec![3i64, 9, 1, 4, 4];
    let y = Surv::from_arrays(events.clone(), times.clone(), None, None).unwrap();
    let checked = check_y_survival(&y, false).unwrap();
    assert_eq!(checked.event.to_vec(), events);
    assert_eq!(
        checked.time().unwrap().to_vec(),
        times.iter().map(|&t| t as f64).collect::<Vec<_>>()
    );
}

#[test]
fn zero_one_codes_are_packed_as_booleans() {
    let y = Surv::from_arrays(vec![0i64, 1, 1, 0], vec![5i64, 3, 8, 2], None, None).unwrap();
    assert_eq!(y.event(), array![false, true, true, false]);
    assert_eq!(y.time(), array![5.0, 3.0, 8.0, 2.0]);
}

#[test]
fn censoring_rules() {
    let y = Surv::from_arrays(vec![true, true, true], vec![2i64, 2, 2], None, None).unwrap();
    assert!(check_y_survival(&y, false).is_ok());

    let y = Surv::from_arrays(vec![false, false, false], vec![1i64, 2, 3], None, None).unwrap();
    assert!(matches!(
        check_y_survival(&y, false),
        Err(OutcomeError::AllCensored)
    ));
    assert!(check_y_survival(&y, true).is_ok());
}

#[test]
fn constant_integer_codes_are_not_binary() {
    // A single distinct code is rejected before censoring is ever considered.
    let err = Surv::from_arrays(vec![0i64, 0, 0], vec![1i64, 2, 3], None, None).unwrap_err();
    assert!(matches!(err, OutcomeError::Cardinality { found: 1 }));
}

#[test]
fn malformed_event_codes() {
    let err = Surv::from_arrays(vec![0i64, 1, 2], vec![1i64, 2, 3], None, None).unwrap_err();
    assert!(matches!(err, OutcomeError::Cardinality { found: 3 }));

    let err = Surv::from_arrays(vec![2i64, 3], vec![1i64, 2], None, None).unwrap_err();
    assert!(matches!(err, OutcomeError::Encoding { .. }));

    let err = Surv::from_arrays(vec![true, false], vec![1.0, 2.0], Some("time"), Some("time"))
        .unwrap_err();
    assert!(matches!(err, OutcomeError::NamingConflict(_)));
}

#[test]
fn tree_arrays_with_entry_time() {
    let y = Surv::from_arrays(
        vec![true, false, true, true, false],
        vec![6.0, 2.0, 3.0, 6.0, 9.0],
        None,
        None,
    )
    .unwrap()
    .with_entry(vec![0.0, 1.0, 0.5, 2.0, 0.0], None)
    .unwrap();
    let x = Array2::<f64>::zeros((5, 3));

    let arrays = build_survival_tree_array(&x, &y, false).unwrap();
    assert_eq!(arrays.y_numeric.ncols(), 3);
    assert_eq!(arrays.y_numeric.row(1).to_vec(), vec![2.0, 0.0, 1.0]);
    assert_eq!(arrays.y_numeric.row(3).to_vec(), vec![6.0, 1.0, 2.0]);
    assert_eq!(arrays.event_times, array![3.0, 6.0]);
}

#[test]
fn feature_matrix_length_is_checked() {
    let y = Surv::from_arrays(vec![true, false], vec![1.0, 2.0], None, None).unwrap();
    let x = Array2::<f64>::zeros((3, 2));
    assert!(matches!(
        check_array_survival(&x, &y),
        Err(OutcomeError::LengthMismatch { .. })
    ));
}

#[test]
fn dataframes_work_as_features_and_outcomes() {
    let df = DataFrame::new(vec![
        Series::new("status".into(), vec![true, false, true]).into(),
        Series::new("days".into(), vec![12.0, 30.0, 7.5]).into(),
        Series::new("age".into(), vec![61i32, 54, 70]).into(),
    ])
    .expect("construct frame");

    let y = Surv::from_dataframe("status", "days", &df).unwrap();
    let (event, time) = check_array_survival(&df, &y).unwrap();
    assert_eq!(event, array![true, false, true]);
    assert_eq!(time, array![12.0, 30.0, 7.5]);

    let record = PackedRecord::from_dataframe(&df, &["status", "days", "age"]).unwrap();
    let checked = check_y_survival(&record, false).unwrap();
    assert_eq!(checked.entry().unwrap().to_vec(), vec![61.0, 54.0, 70.0]);
}

#[test]
fn packed_records_must_lead_with_a_boolean_event() {
    let record = PackedRecord::new(vec![
        ("status".to_string(), RawArray::from(vec![1i64, 0])),
        ("days".to_string(), RawArray::from(vec![1.0, 2.0])),
    ])
    .unwrap();
    assert!(matches!(
        check_y_survival(&record, false),
        Err(OutcomeError::TypeMismatch { .. })
    ));
}

#[test]
fn separate_arrays_skip_missing_slots() {
    let event = RawArray::from(vec![false, true]);
    let time = RawArray::from(vec![4i64, 5]);
    let checked = check_y_survival(RawOutcome::separate(&event, vec![None, Some(&time)]), false)
        .unwrap();
    assert!(checked.time().is_none());
    assert_eq!(checked.entry().unwrap().to_vec(), vec![4.0, 5.0]);
}

#[test]
fn revalidation_keeps_values() {
    let y = Surv::from_arrays(vec![1.0, 0.0, 1.0], vec![2.0, 5.0, 3.0], None, None).unwrap();
    let once = check_y_survival(&y, false).unwrap();
    let repacked = once.clone().into_outcome().unwrap();
    let twice = check_y_survival(&repacked, false).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn small_unsigned_event_codes_are_accepted() {
    let df = DataFrame::new(vec![
        Series::new("status".into(), vec![0u8, 1, 1]).into(),
        Series::new("days".into(), vec![4u8, 9, 2]).into(),
    ])
    .expect("construct frame");

    let y = Surv::from_dataframe("status", "days", &df).unwrap();
    assert_eq!(y.event(), array![false, true, true]);
    assert_eq!(y.time(), array![4.0, 9.0, 2.0]);
}

#[test]
fn date_columns_cannot_be_outcome_times() {
    let enrolled = Series::new("enrolled".into(), vec![19_000i32, 19_030])
        .cast(&DataType::Date)
        .expect("cast to date");
    let df = DataFrame::new(vec![
        Series::new("status".into(), vec![true, false]).into(),
        enrolled.into(),
    ])
    .expect("construct frame");

    let err = Surv::from_dataframe("status", "enrolled", &df).unwrap_err();
    assert!(matches!(err, OutcomeError::TypeMismatch { .. }));
}

#[test]
fn oversized_unsigned_times_are_rejected() {
    let df = DataFrame::new(vec![
        Series::new("status".into(), vec![true, false]).into(),
        Series::new("days".into(), vec![5u64, 10_000_000_000_000_000_000]).into(),
    ])
    .expect("construct frame");

    let err = Surv::from_dataframe("status", "days", &df).unwrap_err();
    assert!(matches!(err, OutcomeError::TypeMismatch { .. }));
}
