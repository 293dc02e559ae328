use crate::config::LinkConfig;
use crate::error::ReconError;
use crate::linker::link;
use crate::model::{LinkMeta, LinkOutcome, LinkReport, Table, Timepoint};
use crate::selector::{detect_name_column, ColumnChoice, DetectionRule};
use crate::similarity::Similarity;
use crate::summary::compute_summary;

/// Everything a caller needs after one run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub column: ColumnChoice,
    pub outcome: LinkOutcome,
    /// Rows left out because their timepoint tag matched neither label.
    pub skipped_rows: usize,
}

impl RunOutput {
    /// Output table with the configured identifier column appended.
    pub fn table(&self, config: &LinkConfig) -> Table {
        self.outcome.to_table(&config.id_column)
    }

    pub fn report(&self, input: &str) -> LinkReport {
        LinkReport {
            meta: LinkMeta {
                input: input.to_string(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                skipped_rows: self.skipped_rows,
            },
            summary: compute_summary(&self.outcome),
            pairs: self.outcome.state.pairs().to_vec(),
        }
    }
}

/// Resolve the key column: the configured one if set, otherwise detected.
pub fn resolve_name_column(table: &Table, config: &LinkConfig) -> Result<ColumnChoice, ReconError> {
    if let Some(ref name) = config.name_column {
        if table.column_index(name).is_none() {
            return Err(ReconError::MissingColumn {
                column: name.clone(),
            });
        }
        return Ok(ColumnChoice {
            column: name.clone(),
            rule: DetectionRule::Configured,
        });
    }

    detect_name_column(
        &table.headers,
        &table.records,
        &config.timepoint_column,
        &config.missing_sentinel,
    )
}

/// Partition, pick the key column, then link. Nothing is issued unless
/// every earlier step succeeds.
pub fn run<S: Similarity + ?Sized>(
    table: &Table,
    config: &LinkConfig,
    similarity: &S,
) -> Result<RunOutput, ReconError> {
    config.validate()?;

    let partition = table.partition(
        &config.timepoint_column,
        &config.before_label,
        &config.after_label,
    )?;
    log::info!(
        "Baseline records: {}, Endline records: {}",
        partition.before.len(),
        partition.after.len()
    );
    if partition.before.is_empty() {
        return Err(ReconError::EmptyGroup {
            timepoint: Timepoint::Before,
        });
    }
    if partition.after.is_empty() {
        return Err(ReconError::EmptyGroup {
            timepoint: Timepoint::After,
        });
    }

    let column = resolve_name_column(table, config)?;
    log::info!("Using column '{}' for name matching ({})", column.column, column.rule);

    let outcome = link(
        &partition.before,
        &partition.after,
        &column.column,
        &config.link_options(),
        similarity,
    )?;

    Ok(RunOutput {
        column,
        outcome,
        skipped_rows: partition.skipped,
    })
}
