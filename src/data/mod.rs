//! Data structures shared by the expression-analysis pipeline

mod count_matrix;
mod design;

pub use count_matrix::CountMatrix;
pub use design::{DesignColumn, DesignMatrix, DesignValues};
