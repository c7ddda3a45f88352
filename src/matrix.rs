use crate::error::{Error, Result};

/// Square `i32` matrix.
///
/// Cells are kept twice: row-major in `data` and column-major in `tdata`, so
/// a row of the left operand and a column of the right operand are both
/// contiguous slices. `set` is the only way to mutate a cell and updates both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    data: Vec<i32>,
    tdata: Vec<i32>,
    size: usize,
}

impl Matrix {
    pub fn new(size: usize) -> Self {
        Matrix {
            data: vec![0; size * size],
            tdata: vec![0; size * size],
            size,
        }
    }

    pub fn from_fn<F>(size: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> i32,
    {
        let mut mat = Matrix::new(size);
        for i in 0..size {
            for j in 0..size {
                mat.set(i, j, f(i, j));
            }
        }
        mat
    }

    /// The sample operands: `A` is all ones, `B[r][c] = c + 1`.
    pub fn sample_pair(size: usize) -> (Matrix, Matrix) {
        let a = Matrix::from_fn(size, |_, _| 1);
        let b = Matrix::from_fn(size, |_, col| col as i32 + 1);
        (a, b)
    }

    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != size) {
            return Err(Error::NotSquare {
                rows: size,
                cols: row.len(),
            });
        }
        Ok(Matrix::from_fn(size, |i, j| rows[i][j]))
    }

    /// Builds a matrix from a column-major buffer of `size * size` cells.
    pub fn from_columns(size: usize, tdata: Vec<i32>) -> Self {
        assert_eq!(tdata.len(), size * size);
        let mut data = vec![0; size * size];
        for (j, col) in tdata.chunks_exact(size.max(1)).enumerate() {
            for (i, &val) in col.iter().enumerate() {
                data[i * size + j] = val;
            }
        }
        Matrix { data, tdata, size }
    }

    pub fn rand_matrix(size: usize) -> Matrix {
        Matrix::from_fn(size, |_, _| rand::random::<i8>() as i32)
    }

    /// Single-threaded product, used as the reference for the worker pool.
    pub fn naive_mul(a: &Matrix, b: &Matrix) -> Matrix {
        assert_eq!(a.size, b.size);
        let mut mat = Matrix::new(a.size);
        for i in 0..a.size {
            let row = a.row(i);
            for j in 0..b.size {
                mat.set(i, j, dot(row, b.col(j)));
            }
        }
        mat
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> i32 {
        self.data[i * self.size + j]
    }

    pub fn set(&mut self, i: usize, j: usize, val: i32) {
        self.data[i * self.size + j] = val;
        self.tdata[j * self.size + i] = val;
    }

    pub fn row(&self, idx: usize) -> &[i32] {
        let start = idx * self.size;
        &self.data[start..start + self.size]
    }

    pub fn col(&self, idx: usize) -> &[i32] {
        let start = idx * self.size;
        &self.tdata[start..start + self.size]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i32]> {
        (0..self.size).map(move |i| self.row(i))
    }

    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        self.rows().map(|row| row.to_vec()).collect()
    }
}

/// Dot product with wrapping `i32` arithmetic.
pub fn dot(row: &[i32], col: &[i32]) -> i32 {
    row.iter()
        .zip(col.iter())
        .fold(0i32, |acc, (x, y)| acc.wrapping_add(x.wrapping_mul(*y)))
}
