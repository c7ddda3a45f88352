use std::io::{self, Write};

use crate::matrix::Matrix;

/// Writes the result matrix row by row in fixed-width fields.
pub fn write_matrix<W: Write>(out: &mut W, mat: &Matrix) -> io::Result<()> {
    writeln!(out, "Resulting matrix MC:")?;
    for row in mat.rows() {
        for val in row {
            write!(out, "{:5} ", val)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_matrix() {
        let c = Matrix::from_rows(vec![vec![2, 4], vec![2, -40]]).unwrap();
        let mut out = Vec::new();
        write_matrix(&mut out, &c).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Resulting matrix MC:\n    2     4 \n    2   -40 \n"
        );
    }
}
