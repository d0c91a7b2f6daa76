//! Clarabel backend adapter.
//!
//! Clarabel solves conic problems of the form `A x + s = b, s in K`, so the
//! canonical two-sided rows are split: rows with `l == u` become zero-cone
//! equalities, and each finite one-sided bound becomes a nonnegative-cone
//! row (`a^T x <= u` as-is, `a^T x >= l` negated). The split duals are
//! folded back into one multiplier per original row on the way out.

use std::time::Instant;

use clarabel::algebra::CscMatrix;
use clarabel::solver::{DefaultSettings, DefaultSolver, IPSolver, SolverStatus, SupportedConeT};

use super::{SolveStatus, SolverBackend, SolverResult};
use crate::error::HarnessResult;
use crate::linalg::sparse;
use crate::options::{self, SolverOptions};
use crate::problem::QpProblem;

const NAME: &str = "clarabel";

/// Clarabel solver backend (pure Rust interior point).
///
/// Recognized options (strict policy, unknown keys are rejected):
/// `max_iter` (int), `tol_gap_abs` (float), `tol_gap_rel` (float),
/// `tol_feas` (float), `equilibrate` (bool), `verbose` (bool),
/// `time_limit_ms` (int).
#[derive(Debug, Clone, Copy, Default)]
pub struct ClarabelBackend;

/// Where an original row's multiplier lives in the split conic form.
enum RowSlot {
    Eq(usize),
    Ineq {
        upper: Option<usize>,
        lower: Option<usize>,
    },
}

fn settings_from(opts: &SolverOptions) -> HarnessResult<DefaultSettings<f64>> {
    let mut settings = DefaultSettings::default();
    settings.verbose = false;

    for (key, value) in opts.iter() {
        match key {
            "max_iter" => settings.max_iter = options::expect_u32(NAME, key, value)?,
            "tol_gap_abs" => settings.tol_gap_abs = options::expect_f64(NAME, key, value)?,
            "tol_gap_rel" => settings.tol_gap_rel = options::expect_f64(NAME, key, value)?,
            "tol_feas" => settings.tol_feas = options::expect_f64(NAME, key, value)?,
            "equilibrate" => {
                settings.equilibrate_enable = options::expect_bool(NAME, key, value)?
            }
            "verbose" => settings.verbose = options::expect_bool(NAME, key, value)?,
            "time_limit_ms" => {
                settings.time_limit = options::expect_u64(NAME, key, value)? as f64 / 1000.0
            }
            _ => return Err(options::unknown_key(NAME, key)),
        }
    }

    Ok(settings)
}

impl SolverBackend for ClarabelBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn solve(&self, problem: &QpProblem, options: &SolverOptions) -> HarnessResult<SolverResult> {
        let settings = settings_from(options)?;
        let n = problem.n();
        let m = problem.m();
        let l = problem.l();
        let u = problem.u();

        // Row-major view of A for the row split
        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); m];
        for (&val, (row, col)) in problem.a().iter() {
            rows[row].push((col, val));
        }

        // Equality rows first (zero cone), split inequality rows after
        let mut slots: Vec<RowSlot> = Vec::with_capacity(m);
        let mut n_eq = 0;
        for i in 0..m {
            if l[i] == u[i] && l[i].is_finite() {
                slots.push(RowSlot::Eq(n_eq));
                n_eq += 1;
            } else {
                slots.push(RowSlot::Ineq {
                    upper: None,
                    lower: None,
                });
            }
        }

        let mut triplets = Vec::new();
        let mut b = Vec::with_capacity(m);
        for i in 0..m {
            if let RowSlot::Eq(pos) = slots[i] {
                for &(col, val) in &rows[i] {
                    triplets.push((pos, col, val));
                }
                b.push(l[i]);
            }
        }
        let mut next = n_eq;
        for i in 0..m {
            if let RowSlot::Ineq {
                ref mut upper,
                ref mut lower,
            } = slots[i]
            {
                if u[i].is_finite() {
                    for &(col, val) in &rows[i] {
                        triplets.push((next, col, val));
                    }
                    b.push(u[i]);
                    *upper = Some(next);
                    next += 1;
                }
                if l[i].is_finite() {
                    for &(col, val) in &rows[i] {
                        triplets.push((next, col, -val));
                    }
                    b.push(-l[i]);
                    *lower = Some(next);
                    next += 1;
                }
            }
        }
        let n_ineq = next - n_eq;

        let a_ext = sparse::from_triplets(next, n, triplets);
        let (colptr, rowval, nzval) = sparse::csc_arrays(&a_ext);
        let a_csc = CscMatrix::new(next, n, colptr, rowval, nzval);

        // Clarabel reads P as symmetric from its upper triangle
        let (p_colptr, p_rowval, p_nzval) = sparse::csc_upper_tri_arrays(problem.p());
        let p_csc = CscMatrix::new(n, n, p_colptr, p_rowval, p_nzval);

        let mut cones: Vec<SupportedConeT<f64>> = Vec::new();
        if n_eq > 0 {
            cones.push(SupportedConeT::ZeroConeT(n_eq));
        }
        if n_ineq > 0 {
            cones.push(SupportedConeT::NonnegativeConeT(n_ineq));
        }

        let start = Instant::now();
        let mut solver = DefaultSolver::new(&p_csc, problem.q(), &a_csc, &b, &cones, settings);
        solver.solve();
        let solve_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        let sol = &solver.solution;
        let status = match sol.status {
            SolverStatus::Solved | SolverStatus::AlmostSolved => SolveStatus::Optimal,
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                SolveStatus::Infeasible
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                SolveStatus::Unbounded
            }
            SolverStatus::MaxIterations | SolverStatus::MaxTime => SolveStatus::MaxIterReached,
            _ => SolveStatus::Error,
        };

        let has_iterate = matches!(status, SolveStatus::Optimal | SolveStatus::MaxIterReached);
        let (x, dual, obj_val) = if has_iterate {
            // Fold split cone duals back to one multiplier per original row,
            // in the convention P x + q + A^T y = 0
            let mut y = vec![0.0; m];
            for (i, slot) in slots.iter().enumerate() {
                y[i] = match *slot {
                    RowSlot::Eq(pos) => sol.z[pos],
                    RowSlot::Ineq { upper, lower } => {
                        let zu = upper.map_or(0.0, |k| sol.z[k]);
                        let zl = lower.map_or(0.0, |k| sol.z[k]);
                        zu - zl
                    }
                };
            }
            (Some(sol.x.clone()), Some(y), Some(sol.obj_val))
        } else {
            (None, None, None)
        };

        Ok(SolverResult {
            backend: NAME.to_string(),
            status,
            x,
            dual,
            obj_val,
            iterations: sol.iterations as usize,
            solve_time_ms,
            n,
            m,
        })
    }
}
