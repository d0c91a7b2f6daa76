//! Canonical QP problem representation and validation.

use crate::error::{HarnessError, HarnessResult};
use crate::linalg::sparse::{self, SparseCsc};

/// Convex quadratic program in canonical form:
///
/// ```text
/// minimize    (1/2) x^T P x + q^T x
/// subject to  l <= A x <= u
/// ```
///
/// Entries of `l` and `u` may be infinite to encode one-sided or absent
/// constraints. Box constraints on variables are expressed as ordinary rows
/// whose A-block is an identity.
///
/// A problem is validated once on construction and immutable afterwards, so
/// it can be handed to any number of backends by shared reference.
#[derive(Debug, Clone)]
pub struct QpProblem {
    p: SparseCsc,
    q: Vec<f64>,
    a: SparseCsc,
    l: Vec<f64>,
    u: Vec<f64>,
}

impl QpProblem {
    /// Build a problem, checking all shape and bound-ordering invariants.
    pub fn new(
        p: SparseCsc,
        q: Vec<f64>,
        a: SparseCsc,
        l: Vec<f64>,
        u: Vec<f64>,
    ) -> HarnessResult<Self> {
        let n = q.len();

        if p.rows() != p.cols() {
            return Err(HarnessError::Dimension(format!(
                "P has shape {}x{}, expected square",
                p.rows(),
                p.cols()
            )));
        }
        if p.rows() != n {
            return Err(HarnessError::Dimension(format!(
                "P has shape {}x{}, expected {}x{} to match q",
                p.rows(),
                p.cols(),
                n,
                n
            )));
        }
        if a.cols() != n {
            return Err(HarnessError::Dimension(format!(
                "A has {} cols, expected {}",
                a.cols(),
                n
            )));
        }
        if l.len() != a.rows() {
            return Err(HarnessError::Dimension(format!(
                "l has length {}, expected {} to match A rows",
                l.len(),
                a.rows()
            )));
        }
        if u.len() != a.rows() {
            return Err(HarnessError::Dimension(format!(
                "u has length {}, expected {} to match A rows",
                u.len(),
                a.rows()
            )));
        }
        for i in 0..l.len() {
            if l[i] > u[i] {
                return Err(HarnessError::Dimension(format!(
                    "row {} has lower bound {} > upper bound {}",
                    i, l[i], u[i]
                )));
            }
        }

        Ok(Self { p, q, a, l, u })
    }

    /// Number of decision variables.
    pub fn n(&self) -> usize {
        self.q.len()
    }

    /// Number of constraint rows.
    pub fn m(&self) -> usize {
        self.l.len()
    }

    /// Quadratic cost matrix P (full symmetric storage).
    pub fn p(&self) -> &SparseCsc {
        &self.p
    }

    /// Linear cost vector q.
    pub fn q(&self) -> &[f64] {
        &self.q
    }

    /// Constraint matrix A.
    pub fn a(&self) -> &SparseCsc {
        &self.a
    }

    /// Row lower bounds.
    pub fn l(&self) -> &[f64] {
        &self.l
    }

    /// Row upper bounds.
    pub fn u(&self) -> &[f64] {
        &self.u
    }

    /// Evaluate the objective (1/2) x^T P x + q^T x at a point.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        assert_eq!(x.len(), self.n());
        let mut px = vec![0.0; self.n()];
        sparse::spmv(&self.p, x, &mut px, 1.0, 0.0);

        let xpx: f64 = px.iter().zip(x.iter()).map(|(pi, xi)| pi * xi).sum();
        let qtx: f64 = self.q.iter().zip(x.iter()).map(|(qi, xi)| qi * xi).sum();
        0.5 * xpx + qtx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::sparse::from_triplets;

    fn simple_parts() -> (SparseCsc, Vec<f64>, SparseCsc, Vec<f64>, Vec<f64>) {
        let p = from_triplets(2, 2, vec![(0, 0, 1.0), (1, 1, 1.0)]);
        let a = from_triplets(3, 2, vec![(0, 0, 1.0), (1, 1, 1.0), (2, 0, 1.0)]);
        (
            p,
            vec![1.0, 1.0],
            a,
            vec![0.0, 0.0, -1.0],
            vec![1.0, 1.0, 1.0],
        )
    }

    #[test]
    fn test_valid_construction() {
        let (p, q, a, l, u) = simple_parts();
        let prob = QpProblem::new(p, q, a, l, u).unwrap();
        assert_eq!(prob.n(), 2);
        assert_eq!(prob.m(), 3);
        assert_eq!(prob.a().cols(), prob.n());
        assert_eq!(prob.l().len(), prob.a().rows());
        assert_eq!(prob.u().len(), prob.a().rows());
    }

    #[test]
    fn test_nonsquare_p_rejected() {
        let (_, q, a, l, u) = simple_parts();
        let p = from_triplets(2, 3, vec![(0, 0, 1.0)]);
        let err = QpProblem::new(p, q, a, l, u).unwrap_err();
        assert!(matches!(err, HarnessError::Dimension(_)));
    }

    #[test]
    fn test_p_q_mismatch_rejected() {
        let (_, q, a, l, u) = simple_parts();
        let p = from_triplets(3, 3, vec![(0, 0, 1.0)]);
        let err = QpProblem::new(p, q, a, l, u).unwrap_err();
        assert!(matches!(err, HarnessError::Dimension(_)));
    }

    #[test]
    fn test_a_cols_mismatch_rejected() {
        let (p, q, _, l, u) = simple_parts();
        let a = from_triplets(3, 3, vec![(0, 0, 1.0)]);
        let err = QpProblem::new(p, q, a, l, u).unwrap_err();
        assert!(matches!(err, HarnessError::Dimension(_)));
    }

    #[test]
    fn test_bound_length_mismatch_rejected() {
        let (p, q, a, l, _) = simple_parts();
        let err = QpProblem::new(p, q, a, l, vec![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, HarnessError::Dimension(_)));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let (p, q, a, _, u) = simple_parts();
        let err = QpProblem::new(p, q, a, vec![0.0, 2.0, -1.0], u).unwrap_err();
        assert!(matches!(err, HarnessError::Dimension(_)));
    }

    #[test]
    fn test_infinite_bounds_accepted() {
        let (p, q, a, _, _) = simple_parts();
        let l = vec![f64::NEG_INFINITY; 3];
        let u = vec![0.0, f64::INFINITY, 1.0];
        assert!(QpProblem::new(p, q, a, l, u).is_ok());
    }

    #[test]
    fn test_objective_value() {
        // P = [[4,1],[1,2]], q = [1,1], x = [0.3, 0.7]
        let p = from_triplets(
            2,
            2,
            vec![(0, 0, 4.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 2.0)],
        );
        let a = from_triplets(1, 2, vec![(0, 0, 1.0), (0, 1, 1.0)]);
        let prob = QpProblem::new(p, vec![1.0, 1.0], a, vec![1.0], vec![1.0]).unwrap();

        let obj = prob.objective_value(&[0.3, 0.7]);
        assert!((obj - 1.88).abs() < 1e-12);
    }
}
