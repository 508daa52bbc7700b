//! Differential expression results structures

use crate::error::{ForteError, Result};

/// Per-gene statistics as returned by the engine, in input row order.
/// Column layout matches the DESeq2 results table.
#[derive(Debug, Clone, Default)]
pub struct ResultsTable {
    /// Mean of normalized counts across all samples
    pub base_mean: Vec<f64>,
    /// Log2 fold change for the default contrast
    pub log2_fold_change: Vec<f64>,
    /// Standard error of the log2 fold change
    pub lfc_se: Vec<f64>,
    /// Wald statistic
    pub stat: Vec<f64>,
    /// Raw p-value
    pub pvalue: Vec<f64>,
    /// BH-adjusted p-value
    pub padj: Vec<f64>,
}

impl ResultsTable {
    /// Number of genes in the table
    pub fn n_rows(&self) -> usize {
        self.base_mean.len()
    }

    /// Check that all columns have the same length
    pub fn validate(&self) -> Result<()> {
        let n = self.n_rows();
        let columns = [
            self.log2_fold_change.len(),
            self.lfc_se.len(),
            self.stat.len(),
            self.pvalue.len(),
            self.padj.len(),
        ];
        if columns.iter().any(|&len| len != n) {
            return Err(ForteError::DimensionMismatch {
                expected: format!("{} rows in every results column", n),
                got: format!("{:?}", columns),
            });
        }
        Ok(())
    }
}

/// Engine results with the original gene identifiers re-attached.
/// Immutable after creation; one instance per pipeline run.
#[derive(Debug, Clone)]
pub struct DiffExpressionResults {
    /// Name of the gene identifier column, as configured by the caller
    pub gene_column: String,
    /// Gene identifiers in the original count matrix row order
    pub gene_ids: Vec<String>,
    /// Per-gene statistics, positionally aligned with `gene_ids`
    pub table: ResultsTable,
}

impl DiffExpressionResults {
    /// Re-attach gene identifiers to an engine results table by row position
    pub fn attach_genes(
        table: ResultsTable,
        gene_ids: Vec<String>,
        gene_column: &str,
    ) -> Result<Self> {
        table.validate()?;
        if table.n_rows() != gene_ids.len() {
            return Err(ForteError::DimensionMismatch {
                expected: format!("{} result rows", gene_ids.len()),
                got: format!("{} result rows", table.n_rows()),
            });
        }
        Ok(Self {
            gene_column: gene_column.to_string(),
            gene_ids,
            table,
        })
    }

    /// Number of genes
    pub fn n_genes(&self) -> usize {
        self.gene_ids.len()
    }

    /// Genes significant at the given adjusted p-value threshold
    pub fn significant_genes(&self, alpha: f64) -> Vec<&str> {
        self.gene_ids
            .iter()
            .zip(self.table.padj.iter())
            .filter(|(_, &p)| p.is_finite() && p < alpha)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}
