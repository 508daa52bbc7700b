//! Statistical engine abstraction and the DESeq2/R production engine

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use ndarray::Array2;

use crate::data::{CountMatrix, DesignMatrix, DesignValues};
use crate::error::{ForteError, Result};
use crate::expression::ResultsTable;

/// Output of one engine invocation
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Per-gene statistics for the default contrast, in input row order
    pub table: ResultsTable,
    /// Normalized counts (genes x samples)
    pub normalized_counts: Array2<f64>,
    /// Coefficient names of the fitted model
    pub contrast_names: Vec<String>,
}

/// A differential expression engine: fits the model described by `formula`
/// to the count and design matrices and summarizes the default contrast.
///
/// The orchestrator only depends on this trait, so tests can substitute a
/// stub implementation for the R subprocess.
pub trait DifferentialExpressionEngine {
    fn fit_and_summarize(
        &self,
        counts: &CountMatrix,
        design: &DesignMatrix,
        formula: &str,
    ) -> Result<EngineOutput>;
}

/// R script run by [`DeseqRscriptEngine`]. Arguments: counts table, design
/// table, model formula, results output, normalized-counts output,
/// coefficient-names output.
const DESEQ_SCRIPT: &str = r#"args <- commandArgs(trailingOnly = TRUE)
suppressMessages(library(DESeq2))
counts <- as.matrix(read.delim(args[1], row.names = 1, check.names = FALSE))
col_data <- read.delim(args[2], row.names = 1, check.names = FALSE, stringsAsFactors = TRUE)
dds <- DESeqDataSetFromMatrix(countData = counts, colData = col_data, design = as.formula(args[3]))
dds <- DESeq(dds)
res <- results(dds)
write.table(as.data.frame(res), args[4], sep = "\t", quote = FALSE)
write.table(counts(dds, normalized = TRUE), args[5], sep = "\t", quote = FALSE)
writeLines(resultsNames(dds), args[6])
"#;

/// Production engine: runs DESeq2 in an R subprocess via `Rscript`.
///
/// Inputs are written to a scratch directory as tab-delimited tables, the
/// fit is a single blocking call with no timeout, and the outputs are read
/// back positionally. Gene identifiers never cross the process boundary;
/// rows travel under synthetic names and are matched by order.
pub struct DeseqRscriptEngine {
    rscript: PathBuf,
}

impl DeseqRscriptEngine {
    /// Probe the R runtime and the DESeq2 installation. Fails with an
    /// environment error before any data is read if either is missing.
    pub fn new<P: Into<PathBuf>>(rscript: P) -> Result<Self> {
        let rscript = rscript.into();

        let probe = Command::new(&rscript)
            .arg("-e")
            .arg("suppressMessages(library(DESeq2)); cat(as.character(packageVersion('DESeq2')))")
            .output()
            .map_err(|e| ForteError::EngineUnavailable {
                reason: format!("could not run {}: {}", rscript.display(), e),
            })?;

        if !probe.status.success() {
            return Err(ForteError::EngineUnavailable {
                reason: format!(
                    "DESeq2 is not installed in the R environment at {}",
                    rscript.display()
                ),
            });
        }

        let version = String::from_utf8_lossy(&probe.stdout);
        log::info!("Using DESeq2 {} via {}", version.trim(), rscript.display());

        Ok(Self { rscript })
    }

    fn write_counts(counts: &CountMatrix, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        writeln!(file, "gene\t{}", counts.sample_ids().join("\t"))?;
        for i in 0..counts.n_genes() {
            let row: Vec<String> = counts
                .gene_counts(i)
                .iter()
                .map(|&x| format!("{:.0}", x))
                .collect();
            writeln!(file, "g{}\t{}", i, row.join("\t"))?;
        }
        Ok(())
    }

    fn write_design(design: &DesignMatrix, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        let names: Vec<&str> = design.columns().iter().map(|c| c.name.as_str()).collect();
        writeln!(file, "sample\t{}", names.join("\t"))?;
        for (i, sample) in design.sample_ids().iter().enumerate() {
            let mut fields = vec![sample.clone()];
            for column in design.columns() {
                match &column.values {
                    DesignValues::Categorical(v) => fields.push(v[i].clone()),
                    DesignValues::Continuous(v) => fields.push(format!("{}", v[i])),
                }
            }
            writeln!(file, "{}", fields.join("\t"))?;
        }
        Ok(())
    }
}

fn parse_field(field: &str) -> f64 {
    match field {
        "NA" | "NaN" | "" => f64::NAN,
        other => other.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// Parse the DESeq2 results table written by `write.table` with row names.
/// Column order: baseMean, log2FoldChange, lfcSE, stat, pvalue, padj.
fn read_results_table(path: &Path) -> Result<ResultsTable> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    lines.next().ok_or_else(|| ForteError::EngineFailed {
        reason: "engine produced an empty results table".to_string(),
    })??;

    let mut table = ResultsTable::default();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 7 {
            return Err(ForteError::EngineFailed {
                reason: format!("malformed results row: {}", line),
            });
        }
        table.base_mean.push(parse_field(fields[1]));
        table.log2_fold_change.push(parse_field(fields[2]));
        table.lfc_se.push(parse_field(fields[3]));
        table.stat.push(parse_field(fields[4]));
        table.pvalue.push(parse_field(fields[5]));
        table.padj.push(parse_field(fields[6]));
    }

    table.validate()?;
    Ok(table)
}

/// Parse the normalized count matrix written by `write.table` with row names
fn read_normalized_counts(path: &Path, n_samples: usize) -> Result<Array2<f64>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    lines.next().ok_or_else(|| ForteError::EngineFailed {
        reason: "engine produced an empty normalized count matrix".to_string(),
    })??;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != n_samples + 1 {
            return Err(ForteError::EngineFailed {
                reason: format!("malformed normalized count row: {}", line),
            });
        }
        rows.push(fields[1..].iter().map(|f| parse_field(f)).collect());
    }

    let n_genes = rows.len();
    let mut matrix = Array2::zeros((n_genes, n_samples));
    for (i, row) in rows.iter().enumerate() {
        for (j, &val) in row.iter().enumerate() {
            matrix[[i, j]] = val;
        }
    }
    Ok(matrix)
}

impl DifferentialExpressionEngine for DeseqRscriptEngine {
    fn fit_and_summarize(
        &self,
        counts: &CountMatrix,
        design: &DesignMatrix,
        formula: &str,
    ) -> Result<EngineOutput> {
        let dir = tempfile::tempdir()?;

        let counts_path = dir.path().join("counts.tsv");
        let design_path = dir.path().join("design.tsv");
        let script_path = dir.path().join("deseq.R");
        let results_path = dir.path().join("results.tsv");
        let norm_path = dir.path().join("normalized.tsv");
        let contrasts_path = dir.path().join("contrasts.txt");

        Self::write_counts(counts, &counts_path)?;
        Self::write_design(design, &design_path)?;
        std::fs::write(&script_path, DESEQ_SCRIPT)?;

        log::debug!("Running DESeq2 with design formula: {}", formula);
        let output = Command::new(&self.rscript)
            .arg(&script_path)
            .arg(&counts_path)
            .arg(&design_path)
            .arg(formula)
            .arg(&results_path)
            .arg(&norm_path)
            .arg(&contrasts_path)
            .output()
            .map_err(|e| ForteError::EngineFailed {
                reason: format!("failed to spawn {}: {}", self.rscript.display(), e),
            })?;

        if !output.status.success() {
            return Err(ForteError::EngineFailed {
                reason: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let table = read_results_table(&results_path)?;
        if table.n_rows() != counts.n_genes() {
            return Err(ForteError::DimensionMismatch {
                expected: format!("{} result rows", counts.n_genes()),
                got: format!("{} result rows", table.n_rows()),
            });
        }

        let normalized_counts = read_normalized_counts(&norm_path, counts.n_samples())?;

        let contrast_names: Vec<String> = BufReader::new(File::open(&contrasts_path)?)
            .lines()
            .collect::<std::io::Result<Vec<String>>>()?
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .collect();

        Ok(EngineOutput {
            table,
            normalized_counts,
            contrast_names,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_results_table_with_na() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "baseMean\tlog2FoldChange\tlfcSE\tstat\tpvalue\tpadj").unwrap();
        writeln!(file, "g0\t100.5\t1.2\t0.3\t4.0\t0.0001\t0.0004").unwrap();
        writeln!(file, "g1\t0\tNA\tNA\tNA\tNA\tNA").unwrap();

        let table = read_results_table(file.path()).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.base_mean[0], 100.5);
        assert!(table.pvalue[1].is_nan());
    }

    #[test]
    fn test_write_counts_format() {
        let counts = CountMatrix::new(
            array![[1.0, 2.0], [3.0, 4.0]],
            vec!["A".to_string(), "B".to_string()],
            vec!["s1".to_string(), "s2".to_string()],
        )
        .unwrap();

        let file = NamedTempFile::new().unwrap();
        DeseqRscriptEngine::write_counts(&counts, file.path()).unwrap();
        let written = std::fs::read_to_string(file.path()).unwrap();

        // Gene identifiers must not leak into the engine input
        assert_eq!(written, "gene\ts1\ts2\ng0\t1\t2\ng1\t3\t4\n");
    }

    #[test]
    fn test_write_design_format() {
        let mut design = DesignMatrix::new(vec!["s1".to_string(), "s2".to_string()]);
        design
            .add_categorical("class_label", vec!["ctrl".to_string(), "treat".to_string()])
            .unwrap();

        let file = NamedTempFile::new().unwrap();
        DeseqRscriptEngine::write_design(&design, file.path()).unwrap();
        let written = std::fs::read_to_string(file.path()).unwrap();

        assert_eq!(written, "sample\tclass_label\ns1\tctrl\ns2\ttreat\n");
    }
}
