//! `namelink` run and `namelink detect`.

use std::path::{Path, PathBuf};

use namelink_recon::config::OutputFormat;
use namelink_recon::engine::{resolve_name_column, RunOutput};
use namelink_recon::{LinkConfig, ReconError, TokenSortRatio};

use crate::exit_codes::{io_exit_code, recon_exit_code, EXIT_ERROR, EXIT_INVALID_CONFIG};
use crate::{CliError, Format, RunArgs};

fn load_config(path: Option<&Path>) -> Result<LinkConfig, CliError> {
    let Some(path) = path else {
        return Ok(LinkConfig::default());
    };

    let config_str = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(
            EXIT_INVALID_CONFIG,
            format!("cannot read config {}: {e}", path.display()),
        )
    })?;

    let config = LinkConfig::from_toml(&config_str)
        .map_err(|e| CliError::new(EXIT_INVALID_CONFIG, format!("{}: {e}", path.display())))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

fn read_input(path: &Path) -> Result<namelink_recon::Table, CliError> {
    namelink_io::read_table(path).map_err(|e| {
        let err = CliError::new(io_exit_code(&e), e.to_string());
        match e {
            namelink_io::IoError::NotFound(_) => {
                err.with_hint("Please ensure the file exists or specify the correct path.")
            }
            namelink_io::IoError::UnsupportedFormat(_) => {
                err.with_hint("supported inputs: .csv, .tsv, .txt, .xlsx, .xls, .xlsb, .ods")
            }
            _ => err,
        }
    })
}

fn engine_error(e: ReconError, table: &namelink_recon::Table, config: &LinkConfig) -> CliError {
    let err = CliError::new(recon_exit_code(&e, &config.timepoint_column), e.to_string());
    match e {
        ReconError::MissingColumn { ref column } if column == &config.timepoint_column => err
            .with_hint(format!(
                "available columns: {}",
                table.headers.join(", ")
            )),
        ReconError::MissingColumn { .. } | ReconError::NoSuitableColumn { .. } => {
            err.with_hint("pass --name-column to choose the key column explicitly")
        }
        ReconError::EmptyGroup { .. } => err.with_hint(format!(
            "expected rows tagged '{}' and '{}' in column '{}'",
            config.before_label, config.after_label, config.timepoint_column
        )),
        _ => err,
    }
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(threshold) = args.threshold {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(CliError::args(format!(
                "--threshold must be between 0 and 100, got {threshold}"
            )));
        }
        config.threshold = threshold;
    }
    if let Some(name) = args.name_column {
        config.name_column = Some(name);
    }
    config
        .validate()
        .map_err(|e| CliError::new(EXIT_INVALID_CONFIG, e.to_string()))?;

    // An explicit --output picks its format by extension, unless --format says otherwise
    let (output_path, inferred) = match args.output {
        Some(path) => {
            let format = OutputFormat::from_path(&path);
            (path, format)
        }
        None => (PathBuf::from(config.output.path()), config.output.format()),
    };
    let output_format = match args.format {
        Some(Format::Csv) => OutputFormat::Csv,
        Some(Format::Xlsx) => OutputFormat::Xlsx,
        None => inferred,
    };

    let table = read_input(&args.input)?;

    let out: RunOutput = namelink_recon::run(&table, &config, &TokenSortRatio)
        .map_err(|e| engine_error(e, &table, &config))?;

    if out.skipped_rows > 0 {
        log::warn!(
            "{} rows tagged neither '{}' nor '{}' were left out",
            out.skipped_rows,
            config.before_label,
            config.after_label
        );
    }

    let linked = out.table(&config);
    namelink_io::write_table(&linked, &output_path, output_format)
        .map_err(|e| CliError::new(io_exit_code(&e), e.to_string()))?;

    let report = out.report(&args.input.display().to_string());
    let summary = &report.summary;
    eprintln!("Results saved to '{}'", output_path.display());
    eprintln!("Total records: {}", summary.total_records);
    eprintln!("Unique identifiers issued: {}", summary.ids_issued);
    eprintln!("Matched pairs: {}", summary.matched_pairs);
    eprintln!(
        "Unmatched {}: {} ({} without a name)",
        config.before_label.to_lowercase(),
        summary.unmatched_before,
        summary.absent_name_before
    );
    eprintln!(
        "Unmatched {}: {}",
        config.after_label.to_lowercase(),
        summary.unmatched_after
    );

    if args.json {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    Ok(())
}

pub fn cmd_detect(input: PathBuf, config: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let table = read_input(&input)?;

    let choice =
        resolve_name_column(&table, &config).map_err(|e| engine_error(e, &table, &config))?;

    if json {
        let json_str = serde_json::to_string_pretty(&choice)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        println!("{} ({})", choice.column, choice.rule);
    }
    Ok(())
}
