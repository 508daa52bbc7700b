//! Sample design matrix for the differential expression model

use crate::error::{ForteError, Result};

/// Values of one design matrix column
#[derive(Debug, Clone, PartialEq)]
pub enum DesignValues {
    /// Categorical factor, e.g. the `class_label` condition
    Categorical(Vec<String>),
    /// Continuous covariate
    Continuous(Vec<f64>),
}

impl DesignValues {
    pub fn len(&self) -> usize {
        match self {
            DesignValues::Categorical(v) => v.len(),
            DesignValues::Continuous(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One named covariate column
#[derive(Debug, Clone)]
pub struct DesignColumn {
    pub name: String,
    pub values: DesignValues,
}

/// Sample design matrix: one row per sample, one column per covariate.
/// Column order is preserved from the input file because the matrix is
/// re-serialized in that order when handed to the statistical engine.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    sample_ids: Vec<String>,
    columns: Vec<DesignColumn>,
}

impl DesignMatrix {
    /// Create a new design matrix with no covariate columns
    pub fn new(sample_ids: Vec<String>) -> Self {
        Self {
            sample_ids,
            columns: Vec::new(),
        }
    }

    /// Add a categorical covariate column
    pub fn add_categorical(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        self.check_len(values.len())?;
        self.columns.push(DesignColumn {
            name: name.to_string(),
            values: DesignValues::Categorical(values),
        });
        Ok(())
    }

    /// Add a continuous covariate column
    pub fn add_continuous(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        self.check_len(values.len())?;
        self.columns.push(DesignColumn {
            name: name.to_string(),
            values: DesignValues::Continuous(values),
        });
        Ok(())
    }

    fn check_len(&self, got: usize) -> Result<()> {
        if got != self.sample_ids.len() {
            return Err(ForteError::DimensionMismatch {
                expected: format!("{} values", self.sample_ids.len()),
                got: format!("{} values", got),
            });
        }
        Ok(())
    }

    /// Get sample IDs
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Get number of samples (rows)
    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    /// Covariate columns in input order
    pub fn columns(&self) -> &[DesignColumn] {
        &self.columns
    }

    /// Check whether a covariate column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a covariate column by name
    pub fn column(&self, name: &str) -> Option<&DesignColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Unique levels of a categorical column, sorted
    pub fn levels(&self, name: &str) -> Option<Vec<String>> {
        match self.column(name).map(|c| &c.values) {
            Some(DesignValues::Categorical(values)) => {
                let mut unique: Vec<String> = values.clone();
                unique.sort();
                unique.dedup();
                Some(unique)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_matrix_levels() {
        let mut design = DesignMatrix::new(vec![
            "s1".to_string(),
            "s2".to_string(),
            "s3".to_string(),
            "s4".to_string(),
        ]);

        design
            .add_categorical(
                "class_label",
                vec![
                    "ctrl".to_string(),
                    "ctrl".to_string(),
                    "treat".to_string(),
                    "treat".to_string(),
                ],
            )
            .unwrap();

        assert!(design.has_column("class_label"));
        assert_eq!(
            design.levels("class_label").unwrap(),
            vec!["ctrl".to_string(), "treat".to_string()]
        );
    }

    #[test]
    fn test_wrong_length_column_rejected() {
        let mut design = DesignMatrix::new(vec!["s1".to_string(), "s2".to_string()]);
        let result = design.add_continuous("age", vec![50.0]);
        assert!(result.is_err());
    }
}
