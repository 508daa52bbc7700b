//! Input/Output for count matrices, design matrices and results tables

mod csv;

pub use self::csv::{read_count_matrix, read_design_matrix, write_results};
