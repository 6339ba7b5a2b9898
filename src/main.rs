use clap::{Parser, Subcommand};
use polars::prelude::DataFrame;
use std::process;
use survkit::shared::files::{read_table, write_table};
use survkit::{
    CategoricalFrame, CategorySpec, ConcatAxis, ConcatOptions, OutcomeConfig, Surv, Tabular,
    build_survival_tree_array, check_y_survival, safe_concat,
};

#[derive(Parser)]
#[command(
    name = "survkit",
    version,
    about = "Validate survival outcomes and merge tables without losing categorical columns"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the survival outcome stored in a CSV/TSV table
    #[command(about = "Validate event/time columns of a table and print a summary")]
    Check {
        /// Path to the table (.tsv/.txt are tab separated, anything else comma separated)
        table: String,

        /// Column holding the event indicator (boolean or 0/1)
        #[arg(long)]
        event: Option<String>,

        /// Column holding the time of event or censoring
        #[arg(long)]
        time: Option<String>,

        /// Column holding the entry time, for left-truncated data
        #[arg(long)]
        entry: Option<String>,

        /// Accept tables in which every sample is censored
        #[arg(long)]
        allow_all_censored: bool,

        /// TOML file with column names and options; flags win over file values
        #[arg(long, value_name = "FILE")]
        config: Option<String>,
    },

    /// Concatenate tables, keeping the given string columns categorical
    #[command(about = "Merge tables along rows or columns (outputs: the merged table)")]
    Concat {
        /// Paths of the tables to merge, in order
        #[arg(required = true)]
        tables: Vec<String>,

        /// 0 stacks rows, 1 places tables side by side
        #[arg(long, default_value = "0")]
        axis: usize,

        /// String column to treat as categorical (repeatable)
        #[arg(long = "categorical", value_name = "COLUMN")]
        categorical: Vec<String>,

        /// Mark the categorical columns as ordered
        #[arg(long)]
        ordered: bool,

        /// Where to write the merged table
        #[arg(long)]
        output: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            table,
            event,
            time,
            entry,
            allow_all_censored,
            config,
        } => check_command(
            &table,
            OutcomeConfig {
                event,
                time,
                entry,
                allow_all_censored,
                separator: None,
            },
            config.as_deref(),
        ),
        Commands::Concat {
            tables,
            axis,
            categorical,
            ordered,
            output,
        } => concat_command(&tables, axis, &categorical, ordered, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn check_command(
    table_path: &str,
    overrides: OutcomeConfig,
    config_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => OutcomeConfig::load(path)?.merged_with(overrides),
        None => overrides,
    };
    let (event_col, time_col) = config.outcome_columns()?;

    let data = read_table(table_path, config.separator_byte()?)?;
    println!("Loaded {} samples from: {}", data.height(), table_path);

    let outcome = match config.entry.as_deref() {
        Some(entry_col) => Surv::from_dataframe_with_entry(event_col, time_col, entry_col, &data)?,
        None => Surv::from_dataframe(event_col, time_col, &data)?,
    };
    let validated = check_y_survival(&outcome, config.allow_all_censored)?;

    let n_events = validated.event.iter().filter(|&&e| e).count();
    println!("Events observed: {}", n_events);
    println!("Censored: {}", validated.event.len() - n_events);

    let time = outcome.time();
    let min_time = time.iter().copied().fold(f64::INFINITY, f64::min);
    let max_time = time.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    println!("Time range: ({:.3}, {:.3})", min_time, max_time);

    if let Some(entry) = outcome.entry() {
        let late = entry
            .iter()
            .zip(time.iter())
            .filter(|&(&start, &stop)| start > stop)
            .count();
        if late > 0 {
            log::warn!("{} samples enter observation after their recorded time", late);
        }
    }

    if n_events > 0 {
        let arrays = build_survival_tree_array(&data, &outcome, false)?;
        println!("Distinct event times: {}", arrays.event_times.len());
    }

    println!("Outcome is valid.");
    Ok(())
}

fn concat_command(
    table_paths: &[String],
    axis: usize,
    categorical: &[String],
    ordered: bool,
    output_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let axis = ConcatAxis::try_from(axis)?;
    let tables = table_paths
        .iter()
        .map(|path| read_table(path, None))
        .collect::<Result<Vec<DataFrame>, _>>()?;

    let specs = categorical
        .iter()
        .map(|name| Ok((name.as_str(), shared_categories(&tables, name, ordered)?)))
        .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;

    let mut objects = Vec::with_capacity(tables.len());
    for table in tables {
        let mut frame = CategoricalFrame::new(table);
        for (name, spec) in &specs {
            if frame.frame().column(name).is_ok() {
                frame = frame.with_categorical(name, spec.clone())?;
            }
        }
        objects.push(Tabular::Frame(frame));
    }

    let merged = safe_concat(&objects, &ConcatOptions::along(axis))?;
    let mut merged = match merged {
        Tabular::Frame(frame) => frame.into_frame(),
        Tabular::Series(series) => series.into_series().into_frame(),
    };
    write_table(&mut merged, output_path, None)?;
    println!(
        "Merged {} tables into {} rows x {} columns: {}",
        table_paths.len(),
        merged.height(),
        merged.width(),
        output_path
    );
    Ok(())
}

/// Sorted union of the values of `name` across every table that has it.
fn shared_categories(
    tables: &[DataFrame],
    name: &str,
    ordered: bool,
) -> Result<CategorySpec, Box<dyn std::error::Error>> {
    let mut values: Vec<String> = Vec::new();
    for table in tables {
        if let Ok(column) = table.column(name) {
            let spec = CategorySpec::from_series(column.as_materialized_series(), ordered)?;
            values.extend(spec.categories().iter().cloned());
        }
    }
    if values.is_empty() {
        return Err(format!("Categorical column '{}' was not found in any table", name).into());
    }
    values.sort();
    values.dedup();
    Ok(CategorySpec::new(values, ordered)?)
}
