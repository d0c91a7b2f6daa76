//! Sparse matrix helpers in CSC (Compressed Sparse Column) format.
//!
//! Thin wrappers around `sprs` covering exactly what the problem model,
//! the benchmark loader, and the backend adapters need.

use sprs::{CsMat, TriMat};

/// Sparse matrix in CSC format.
pub type SparseCsc = CsMat<f64>;

/// Build a sparse CSC matrix from triplets (row, col, value).
pub fn from_triplets<I>(nrows: usize, ncols: usize, triplets: I) -> SparseCsc
where
    I: IntoIterator<Item = (usize, usize, f64)>,
{
    let mut tri = TriMat::new((nrows, ncols));
    for (i, j, v) in triplets {
        tri.add_triplet(i, j, v);
    }
    tri.to_csc()
}

/// Create an identity matrix in CSC format.
pub fn identity(n: usize) -> SparseCsc {
    from_triplets(n, n, (0..n).map(|i| (i, i, 1.0)))
}

/// Stack two sparse matrices vertically: [A; B]
pub fn vstack(a: &SparseCsc, b: &SparseCsc) -> SparseCsc {
    assert_eq!(a.cols(), b.cols(), "Matrices must have same number of columns");

    let nrows = a.rows() + b.rows();
    let mut tri = TriMat::new((nrows, a.cols()));

    for (&val, (row, col)) in a.iter() {
        tri.add_triplet(row, col, val);
    }
    for (&val, (row, col)) in b.iter() {
        tri.add_triplet(a.rows() + row, col, val);
    }

    tri.to_csc()
}

/// Sparse matrix-vector product: y = alpha * A * x + beta * y
pub fn spmv(a: &SparseCsc, x: &[f64], y: &mut [f64], alpha: f64, beta: f64) {
    assert_eq!(a.cols(), x.len());
    assert_eq!(a.rows(), y.len());

    if beta == 0.0 {
        y.fill(0.0);
    } else if beta != 1.0 {
        for yi in y.iter_mut() {
            *yi *= beta;
        }
    }

    if alpha != 0.0 {
        for (val, (row, col)) in a.iter() {
            y[row] += alpha * (*val) * x[col];
        }
    }
}

/// Disassemble a CSC matrix into (colptr, rowval, nzval) arrays.
///
/// Row indices within each column come out sorted, which is what the
/// backend crates expect.
pub fn csc_arrays(a: &SparseCsc) -> (Vec<usize>, Vec<usize>, Vec<f64>) {
    let mut colptr = Vec::with_capacity(a.cols() + 1);
    let mut rowval = Vec::with_capacity(a.nnz());
    let mut nzval = Vec::with_capacity(a.nnz());

    colptr.push(0);
    for col in a.outer_iterator() {
        for (row, &val) in col.iter() {
            rowval.push(row);
            nzval.push(val);
        }
        colptr.push(rowval.len());
    }

    (colptr, rowval, nzval)
}

/// Like [`csc_arrays`], keeping only the upper triangle (row <= col).
pub fn csc_upper_tri_arrays(a: &SparseCsc) -> (Vec<usize>, Vec<usize>, Vec<f64>) {
    let mut colptr = Vec::with_capacity(a.cols() + 1);
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();

    colptr.push(0);
    for (col_idx, col) in a.outer_iterator().enumerate() {
        for (row, &val) in col.iter() {
            if row <= col_idx {
                rowval.push(row);
                nzval.push(val);
            }
        }
        colptr.push(rowval.len());
    }

    (colptr, rowval, nzval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let eye = identity(3);
        assert_eq!(eye.rows(), 3);
        assert_eq!(eye.cols(), 3);
        assert_eq!(eye.nnz(), 3);
        for (&val, (row, col)) in eye.iter() {
            assert_eq!(row, col);
            assert_eq!(val, 1.0);
        }
    }

    #[test]
    fn test_vstack_dims() {
        let a = from_triplets(2, 3, vec![(0, 0, 1.0), (1, 2, 2.0)]);
        let b = from_triplets(3, 3, vec![(0, 1, 3.0)]);
        let stacked = vstack(&a, &b);
        assert_eq!(stacked.rows(), 5);
        assert_eq!(stacked.cols(), 3);
        assert_eq!(stacked.nnz(), 3);

        let entries: Vec<(usize, usize, f64)> =
            stacked.iter().map(|(&v, (r, c))| (r, c, v)).collect();
        assert!(entries.contains(&(0, 0, 1.0)));
        assert!(entries.contains(&(1, 2, 2.0)));
        assert!(entries.contains(&(2, 1, 3.0)));
    }

    #[test]
    fn test_spmv() {
        // A = [1 2; 0 3]
        let a = from_triplets(2, 2, vec![(0, 0, 1.0), (0, 1, 2.0), (1, 1, 3.0)]);
        let x = [1.0, 2.0];
        let mut y = [0.0, 0.0];
        spmv(&a, &x, &mut y, 1.0, 0.0);
        assert_eq!(y, [5.0, 6.0]);
    }

    #[test]
    fn test_csc_arrays_roundtrip() {
        let a = from_triplets(3, 2, vec![(0, 0, 1.0), (2, 0, 2.0), (1, 1, 3.0)]);
        let (colptr, rowval, nzval) = csc_arrays(&a);
        assert_eq!(colptr, vec![0, 2, 3]);
        assert_eq!(rowval, vec![0, 2, 1]);
        assert_eq!(nzval, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_upper_tri_extraction() {
        // Full symmetric 2x2 [[4,1],[1,2]]
        let p = from_triplets(
            2,
            2,
            vec![(0, 0, 4.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 2.0)],
        );
        let (colptr, rowval, nzval) = csc_upper_tri_arrays(&p);
        assert_eq!(colptr, vec![0, 1, 3]);
        assert_eq!(rowval, vec![0, 0, 1]);
        assert_eq!(nzval, vec![4.0, 1.0, 2.0]);
    }
}
