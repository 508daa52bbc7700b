//! Workbook export of SPIA connectivity matrices

use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::pathway::spia::SpiaMatrices;

/// Write one worksheet per relation matrix: gene names along the first row
/// and first column, matrix entries in the body. The caller is responsible
/// for the no-overwrite gate; this function always writes.
pub fn spia_matrices_to_xlsx<P: AsRef<Path>>(matrices: &SpiaMatrices, path: P) -> Result<()> {
    let mut workbook = Workbook::new();

    for (label, matrix) in &matrices.matrices {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*label)?;

        for (j, gene) in matrices.genes.iter().enumerate() {
            sheet.write_string(0, (j + 1) as u16, gene)?;
        }
        for (i, gene) in matrices.genes.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, gene)?;
            for j in 0..matrices.n_genes() {
                sheet.write_number(row, (j + 1) as u16, matrix[[i, j]])?;
            }
        }
    }

    workbook.save(path.as_ref())?;
    Ok(())
}
