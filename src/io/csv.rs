//! Delimited-file reading and writing for count matrices, design matrices
//! and differential expression results

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use ndarray::Array2;

use crate::data::{CountMatrix, DesignMatrix};
use crate::error::{ForteError, Result};
use crate::expression::DiffExpressionResults;

/// Strip surrounding quotes from a string
fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')) {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

/// Detect the delimiter from a header line: tab wins over comma
fn detect_delimiter(header_line: &str) -> char {
    if header_line.contains('\t') {
        '\t'
    } else {
        ','
    }
}

/// Read a count matrix from a delimited file.
///
/// The gene identifier column is located by name anywhere in the header;
/// every other column is a sample. The identifiers are stripped out of the
/// numeric matrix but retained on the returned [`CountMatrix`] so they can
/// be re-attached to the engine output by row position.
pub fn read_count_matrix<P: AsRef<Path>>(path: P, gene_column: &str) -> Result<CountMatrix> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = lines.next().ok_or_else(|| ForteError::EmptyData {
        reason: "Empty count matrix file".to_string(),
    })??;

    let delimiter = detect_delimiter(&header_line);
    let header: Vec<String> = header_line
        .split(delimiter)
        .map(|s| strip_quotes(s))
        .collect();

    let gene_idx = header
        .iter()
        .position(|name| name == gene_column)
        .ok_or_else(|| ForteError::MissingGeneColumn {
            column: gene_column.to_string(),
            available: header.join(", "),
        })?;

    let sample_ids: Vec<String> = header
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != gene_idx)
        .map(|(_, name)| name.clone())
        .collect();
    let n_samples = sample_ids.len();

    if n_samples == 0 {
        return Err(ForteError::InvalidCountMatrix {
            reason: "No sample columns in count matrix".to_string(),
        });
    }

    let mut gene_ids: Vec<String> = Vec::new();
    let mut counts_data: Vec<Vec<f64>> = Vec::new();

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() != n_samples + 1 {
            return Err(ForteError::InvalidCountMatrix {
                reason: format!(
                    "Row has {} columns, expected {}",
                    fields.len(),
                    n_samples + 1
                ),
            });
        }

        gene_ids.push(strip_quotes(fields[gene_idx]));

        let row_counts: Result<Vec<f64>> = fields
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != gene_idx)
            .map(|(_, s)| {
                let val = strip_quotes(s);
                val.parse::<f64>().map_err(|_| ForteError::InvalidCountMatrix {
                    reason: format!("Invalid count value: {}", val),
                })
            })
            .collect();

        counts_data.push(row_counts?);
    }

    if gene_ids.is_empty() {
        return Err(ForteError::EmptyData {
            reason: "No genes found in count matrix".to_string(),
        });
    }

    let n_genes = gene_ids.len();
    let mut counts = Array2::zeros((n_genes, n_samples));

    for (i, row) in counts_data.iter().enumerate() {
        for (j, &val) in row.iter().enumerate() {
            counts[[i, j]] = val;
        }
    }

    CountMatrix::new(counts, gene_ids, sample_ids)
}

/// Read a sample design matrix from a delimited file.
///
/// Expected format: first column is sample IDs, remaining columns are
/// covariates. A column whose values all parse as numbers is treated as a
/// continuous covariate, otherwise as a categorical factor.
pub fn read_design_matrix<P: AsRef<Path>>(path: P) -> Result<DesignMatrix> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = lines.next().ok_or_else(|| ForteError::EmptyData {
        reason: "Empty design matrix file".to_string(),
    })??;

    let delimiter = detect_delimiter(&header_line);
    let header: Vec<String> = header_line
        .split(delimiter)
        .map(|s| strip_quotes(s))
        .collect();
    let covariate_names: Vec<String> = header[1..].to_vec();

    let mut sample_ids: Vec<String> = Vec::new();
    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); covariate_names.len()];

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() != covariate_names.len() + 1 {
            return Err(ForteError::InvalidDesignMatrix {
                reason: format!(
                    "Row has {} columns, expected {}",
                    fields.len(),
                    covariate_names.len() + 1
                ),
            });
        }

        sample_ids.push(strip_quotes(fields[0]));
        for (i, field) in fields[1..].iter().enumerate() {
            raw_columns[i].push(strip_quotes(field));
        }
    }

    if sample_ids.is_empty() {
        return Err(ForteError::EmptyData {
            reason: "No samples found in design matrix".to_string(),
        });
    }

    let mut design = DesignMatrix::new(sample_ids);
    for (name, values) in covariate_names.iter().zip(raw_columns) {
        let parsed: Option<Vec<f64>> = values.iter().map(|v| v.parse::<f64>().ok()).collect();
        match parsed {
            Some(numbers) => design.add_continuous(name, numbers)?,
            None => design.add_categorical(name, values)?,
        }
    }

    Ok(design)
}

fn format_stat(x: f64) -> String {
    if x.is_finite() {
        format!("{:.6}", x)
    } else {
        "NA".to_string()
    }
}

fn format_pvalue(x: f64) -> String {
    if x.is_finite() {
        format!("{:.6e}", x)
    } else {
        "NA".to_string()
    }
}

/// Write differential expression results to a CSV file.
/// The statistics columns come first and the gene identifier column last,
/// named after the configured gene-id column.
pub fn write_results<P: AsRef<Path>>(path: P, results: &DiffExpressionResults) -> Result<()> {
    let mut file = File::create(path)?;

    writeln!(
        file,
        "baseMean,log2FoldChange,lfcSE,stat,pvalue,padj,{}",
        results.gene_column
    )?;

    let table = &results.table;
    for (i, gene_id) in results.gene_ids.iter().enumerate() {
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            format_stat(table.base_mean[i]),
            format_stat(table.log2_fold_change[i]),
            format_stat(table.lfc_se[i]),
            format_stat(table.stat[i]),
            format_pvalue(table.pvalue[i]),
            format_pvalue(table.padj[i]),
            gene_id,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_count_matrix_gene_column_first() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene_symbol,s1,s2,s3").unwrap();
        writeln!(file, "A,100,200,150").unwrap();
        writeln!(file, "B,50,75,60").unwrap();

        let matrix = read_count_matrix(file.path(), "gene_symbol").unwrap();
        assert_eq!(matrix.n_genes(), 2);
        assert_eq!(matrix.n_samples(), 3);
        assert_eq!(matrix.gene_ids(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_read_count_matrix_gene_column_anywhere() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "s1\ts2\tgene_symbol\ts3").unwrap();
        writeln!(file, "100\t200\tA\t150").unwrap();

        let matrix = read_count_matrix(file.path(), "gene_symbol").unwrap();
        assert_eq!(matrix.n_samples(), 3);
        assert_eq!(matrix.gene_ids(), &["A".to_string()]);
        assert_eq!(matrix.counts()[[0, 2]], 150.0);
    }

    #[test]
    fn test_missing_gene_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id,s1,s2").unwrap();
        writeln!(file, "A,1,2").unwrap();

        let err = read_count_matrix(file.path(), "gene_symbol").unwrap_err();
        assert!(matches!(err, ForteError::MissingGeneColumn { .. }));
    }

    #[test]
    fn test_read_design_matrix_types() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sample,class_label,age").unwrap();
        writeln!(file, "s1,ctrl,61").unwrap();
        writeln!(file, "s2,treat,47").unwrap();

        let design = read_design_matrix(file.path()).unwrap();
        assert_eq!(design.n_samples(), 2);
        assert!(design.has_column("class_label"));
        assert_eq!(
            design.levels("class_label").unwrap(),
            vec!["ctrl".to_string(), "treat".to_string()]
        );
        // age parses as numbers, so it is continuous and has no levels
        assert!(design.levels("age").is_none());
    }
}
