//! Differential expression orchestration
//!
//! Loads a count matrix and a design matrix, hands the numeric data to a
//! statistical engine together with a fixed model formula, re-attaches the
//! gene identifiers to the engine output and writes the results table.

mod engine;
mod results;

pub use engine::{DeseqRscriptEngine, DifferentialExpressionEngine, EngineOutput};
pub use results::{DiffExpressionResults, ResultsTable};

use std::path::Path;

use crate::error::Result;
use crate::io::{read_count_matrix, read_design_matrix, write_results};

/// Model formula handed to the engine: a single categorical covariate
pub const DESIGN_FORMULA: &str = "~ class_label";

/// Run the expression-analysis pipeline end to end.
///
/// Loads both input files, validates that the configured gene-id column is
/// present, fits the model through `engine`, re-attaches the gene
/// identifiers by row position and writes the results CSV to `output_path`.
pub fn run_expression_analysis<P: AsRef<Path>>(
    engine: &dyn DifferentialExpressionEngine,
    counts_path: P,
    design_path: P,
    gene_column: &str,
    output_path: P,
) -> Result<DiffExpressionResults> {
    log::info!(
        "Loading count matrix from: {}",
        counts_path.as_ref().display()
    );
    let counts = read_count_matrix(&counts_path, gene_column)?;
    log::info!("  {} genes, {} samples", counts.n_genes(), counts.n_samples());

    log::info!(
        "Loading design matrix from: {}",
        design_path.as_ref().display()
    );
    let design = read_design_matrix(&design_path)?;

    log::info!(
        "Number of columns in counts data {} | Number of rows in design matrix {}",
        counts.n_samples(),
        design.n_samples()
    );
    if counts.n_samples() != design.n_samples() {
        log::warn!(
            "Sample count mismatch: count matrix has {} samples, design matrix has {} rows",
            counts.n_samples(),
            design.n_samples()
        );
    }

    log::info!("Fitting model with design formula: {}", DESIGN_FORMULA);
    let output = engine.fit_and_summarize(&counts, &design, DESIGN_FORMULA)?;
    log::debug!("Model coefficients: {}", output.contrast_names.join(", "));
    log::debug!(
        "Normalized counts: {} genes x {} samples",
        output.normalized_counts.nrows(),
        output.normalized_counts.ncols()
    );

    let results = DiffExpressionResults::attach_genes(
        output.table,
        counts.gene_ids().to_vec(),
        gene_column,
    )?;

    log::info!("Writing results to: {}", output_path.as_ref().display());
    write_results(&output_path, &results)?;

    Ok(results)
}
