//! Problem generators for controlled test scenarios.
//!
//! Fixed instances encode specific corner cases with literal data; the
//! randomized constructors take a caller-constructed random source so two
//! calls with identically seeded sources produce bit-identical problems.

use rand::Rng;

use crate::error::HarnessResult;
use crate::linalg::sparse;
use crate::problem::QpProblem;

/// Small strictly convex QP: one equality-like row plus box bounds.
///
/// ```text
/// minimize    (1/2) x^T [4 1; 1 2] x + [1 1]^T x
/// subject to  x0 + x1 = 1,  0 <= x <= 0.7
/// ```
pub fn small_qp() -> HarnessResult<QpProblem> {
    let p = sparse::from_triplets(
        2,
        2,
        vec![(0, 0, 4.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 2.0)],
    );
    let a = sparse::vstack(
        &sparse::from_triplets(1, 2, vec![(0, 0, 1.0), (0, 1, 1.0)]),
        &sparse::identity(2),
    );
    QpProblem::new(
        p,
        vec![1.0, 1.0],
        a,
        vec![1.0, 0.0, 0.0],
        vec![1.0, 0.7, 0.7],
    )
}

/// Semidefinite QP with one-sided inequality rows only.
///
/// All lower bounds are -inf; the objective matrix has a zero eigenvalue.
pub fn one_sided_qp() -> HarnessResult<QpProblem> {
    let p = sparse::from_triplets(2, 2, vec![(0, 0, 11.0)]);
    let a = sparse::from_triplets(
        5,
        2,
        vec![
            (0, 0, -1.0),
            (1, 1, -1.0),
            (2, 0, -1.0),
            (2, 1, -3.0),
            (3, 0, 2.0),
            (3, 1, 5.0),
            (4, 0, 3.0),
            (4, 1, 4.0),
        ],
    );
    let u = vec![0.0, 0.0, -15.0, 100.0, 80.0];
    let l = vec![f64::NEG_INFINITY; u.len()];
    QpProblem::new(p, vec![3.0, 4.0], a, l, u)
}

/// Random dense QP with `n` variables and `m` general rows.
///
/// P = G^T G for a dense random G, so it is positive semidefinite by
/// construction. Row bounds are unit-width perturbations around fixed
/// -3/+3 centers: `l < u` always holds, but feasibility of the system is
/// not guaranteed. An infeasible draw is valid input for exercising the
/// Infeasible status path.
pub fn random_qp<R: Rng>(n: usize, m: usize, rng: &mut R) -> HarnessResult<QpProblem> {
    let g: Vec<f64> = (0..n * n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let mut p_triplets = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let mut v = 0.0;
            for k in 0..n {
                v += g[k * n + i] * g[k * n + j];
            }
            p_triplets.push((i, j, v));
        }
    }
    let p = sparse::from_triplets(n, n, p_triplets);

    let q: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();

    let mut a_triplets = Vec::with_capacity(m * n);
    for i in 0..m {
        for j in 0..n {
            a_triplets.push((i, j, rng.gen_range(-1.0..1.0)));
        }
    }
    let a = sparse::from_triplets(m, n, a_triplets);

    let l: Vec<f64> = (0..m).map(|_| -3.0 + rng.gen_range(-1.0..1.0)).collect();
    let u: Vec<f64> = (0..m).map(|_| 3.0 + rng.gen_range(-1.0..1.0)).collect();

    QpProblem::new(p, q, a, l, u)
}

/// Random LP: zero objective matrix, `m` general rows plus an identity
/// block of box-bound rows (0 <= x <= 5).
pub fn random_lp<R: Rng>(n: usize, m: usize, rng: &mut R) -> HarnessResult<QpProblem> {
    let p = sparse::from_triplets(n, n, Vec::new());

    let q: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();

    let mut a_triplets = Vec::with_capacity(m * n);
    for i in 0..m {
        for j in 0..n {
            a_triplets.push((i, j, rng.gen_range(-1.0..1.0)));
        }
    }
    let a = sparse::vstack(
        &sparse::from_triplets(m, n, a_triplets),
        &sparse::identity(n),
    );

    let mut l: Vec<f64> = (0..m).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let mut u: Vec<f64> = (0..m).map(|_| 5.0 + rng.gen_range(-1.0..1.0)).collect();
    l.extend(std::iter::repeat(0.0).take(n));
    u.extend(std::iter::repeat(5.0).take(n));

    QpProblem::new(p, q, a, l, u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn matrix_bits(m: &sparse::SparseCsc) -> Vec<(usize, usize, u64)> {
        m.iter().map(|(&v, (r, c))| (r, c, v.to_bits())).collect()
    }

    #[test]
    fn test_small_qp_shape() {
        let prob = small_qp().unwrap();
        assert_eq!(prob.n(), 2);
        assert_eq!(prob.m(), 3);
        // Trailing rows are the identity box-bound block
        let entries: Vec<(usize, usize, f64)> =
            prob.a().iter().map(|(&v, (r, c))| (r, c, v)).collect();
        assert!(entries.contains(&(1, 0, 1.0)));
        assert!(entries.contains(&(2, 1, 1.0)));
    }

    #[test]
    fn test_one_sided_qp_bounds() {
        let prob = one_sided_qp().unwrap();
        assert_eq!(prob.m(), 5);
        assert!(prob.l().iter().all(|&li| li == f64::NEG_INFINITY));
        assert!(prob.u().iter().all(|&ui| ui.is_finite()));
    }

    #[test]
    fn test_random_qp_shape_invariant() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let prob = random_qp(5, 6, &mut rng).unwrap();
        assert_eq!(prob.n(), 5);
        assert_eq!(prob.m(), 6);
        assert_eq!(prob.a().cols(), 5);
        assert_eq!(prob.p().rows(), 5);
        assert_eq!(prob.p().cols(), 5);
        for i in 0..prob.m() {
            assert!(prob.l()[i] <= prob.u()[i]);
        }
    }

    #[test]
    fn test_random_qp_psd_diagonal() {
        // x^T (G^T G) x >= 0, in particular every diagonal entry of P
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let prob = random_qp(4, 3, &mut rng).unwrap();
        for (&val, (row, col)) in prob.p().iter() {
            if row == col {
                assert!(val >= 0.0);
            }
        }
        let x = [1.0, -2.0, 0.5, 3.0];
        let qtx: f64 = prob.q().iter().zip(x.iter()).map(|(qi, xi)| qi * xi).sum();
        assert!(prob.objective_value(&x) >= qtx - 1e-12);
    }

    #[test]
    fn test_random_qp_deterministic() {
        let mut r1 = ChaCha8Rng::seed_from_u64(42);
        let mut r2 = ChaCha8Rng::seed_from_u64(42);
        let p1 = random_qp(5, 6, &mut r1).unwrap();
        let p2 = random_qp(5, 6, &mut r2).unwrap();

        assert_eq!(p1.q(), p2.q());
        assert_eq!(p1.l(), p2.l());
        assert_eq!(p1.u(), p2.u());
        assert_eq!(matrix_bits(p1.p()), matrix_bits(p2.p()));
        assert_eq!(matrix_bits(p1.a()), matrix_bits(p2.a()));
    }

    #[test]
    fn test_random_lp_augmented_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let prob = random_lp(4, 2, &mut rng).unwrap();
        assert_eq!(prob.n(), 4);
        assert_eq!(prob.m(), 6);
        assert_eq!(prob.p().nnz(), 0);

        // Rows 2..6 must be the identity block
        let mut identity_entries = 0;
        for (&val, (row, col)) in prob.a().iter() {
            if row >= 2 {
                assert_eq!(row - 2, col);
                assert_eq!(val, 1.0);
                identity_entries += 1;
            }
        }
        assert_eq!(identity_entries, 4);
        assert_eq!(&prob.l()[2..], &[0.0; 4]);
        assert_eq!(&prob.u()[2..], &[5.0; 4]);
    }

    #[test]
    fn test_random_lp_deterministic() {
        let mut r1 = ChaCha8Rng::seed_from_u64(9);
        let mut r2 = ChaCha8Rng::seed_from_u64(9);
        let p1 = random_lp(3, 2, &mut r1).unwrap();
        let p2 = random_lp(3, 2, &mut r2).unwrap();
        assert_eq!(p1.q(), p2.q());
        assert_eq!(matrix_bits(p1.a()), matrix_bits(p2.a()));
        assert_eq!(p1.l(), p2.l());
        assert_eq!(p1.u(), p2.u());
    }
}
