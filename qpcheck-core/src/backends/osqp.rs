//! OSQP backend adapter.
//!
//! OSQP natively solves `min (1/2) x^T P x + q^T x  s.t.  l <= A x <= u`,
//! so the translation is direct: P goes in as its upper triangle and
//! infinite bounds are clamped to the 1e30 magnitude OSQP treats as
//! unbounded. Duals come back already in the `P x + q + A^T y = 0`
//! convention.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use osqp::{CscMatrix, Problem, Settings, Status};

use super::{SolveStatus, SolverBackend, SolverResult};
use crate::error::{HarnessError, HarnessResult};
use crate::linalg::sparse;
use crate::options::{self, SolverOptions};
use crate::problem::QpProblem;

const NAME: &str = "osqp";

/// Magnitude OSQP interprets as infinite.
const OSQP_INF: f64 = 1e30;

/// OSQP solver backend (ADMM, C library).
///
/// Recognized options (strict policy, unknown keys are rejected):
/// `max_iter` (int), `eps_abs` (float), `eps_rel` (float), `alpha` (float),
/// `rho` (float), `scaling` (int, 0 disables), `polish` (bool),
/// `verbose` (bool), `time_limit_ms` (int).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsqpBackend;

fn settings_from(opts: &SolverOptions) -> HarnessResult<Settings> {
    let mut settings = Settings::default().verbose(false);

    for (key, value) in opts.iter() {
        settings = match key {
            "max_iter" => settings.max_iter(options::expect_u32(NAME, key, value)?),
            "eps_abs" => settings.eps_abs(options::expect_f64(NAME, key, value)?),
            "eps_rel" => settings.eps_rel(options::expect_f64(NAME, key, value)?),
            "alpha" => settings.alpha(options::expect_f64(NAME, key, value)?),
            "rho" => settings.rho(options::expect_f64(NAME, key, value)?),
            "scaling" => settings.scaling(options::expect_u32(NAME, key, value)?),
            "polish" => settings.polish(options::expect_bool(NAME, key, value)?),
            "verbose" => settings.verbose(options::expect_bool(NAME, key, value)?),
            "time_limit_ms" => settings.time_limit(Some(Duration::from_millis(
                options::expect_u64(NAME, key, value)?,
            ))),
            _ => return Err(options::unknown_key(NAME, key)),
        };
    }

    Ok(settings)
}

fn clamp_inf(v: f64) -> f64 {
    v.clamp(-OSQP_INF, OSQP_INF)
}

fn owned_csc(nrows: usize, ncols: usize, arrays: (Vec<usize>, Vec<usize>, Vec<f64>)) -> CscMatrix<'static> {
    let (indptr, indices, data) = arrays;
    CscMatrix {
        nrows,
        ncols,
        indptr: Cow::Owned(indptr),
        indices: Cow::Owned(indices),
        data: Cow::Owned(data),
    }
}

impl SolverBackend for OsqpBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn solve(&self, problem: &QpProblem, options: &SolverOptions) -> HarnessResult<SolverResult> {
        let settings = settings_from(options)?;
        let n = problem.n();
        let m = problem.m();

        let p_csc = owned_csc(n, n, sparse::csc_upper_tri_arrays(problem.p()));
        let a_csc = owned_csc(m, n, sparse::csc_arrays(problem.a()));

        let l: Vec<f64> = problem.l().iter().map(|&v| clamp_inf(v)).collect();
        let u: Vec<f64> = problem.u().iter().map(|&v| clamp_inf(v)).collect();

        let mut prob = Problem::new(p_csc, problem.q(), a_csc, &l, &u, &settings).map_err(|e| {
            HarnessError::SolverInvocation {
                backend: NAME.to_string(),
                message: format!("setup failed: {:?}", e),
            }
        })?;

        let start = Instant::now();
        let result = prob.solve();
        let solve_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        let (status, x, dual, obj_val, iterations) = match result {
            Status::Solved(s) | Status::SolvedInaccurate(s) => (
                SolveStatus::Optimal,
                Some(s.x().to_vec()),
                Some(s.y().to_vec()),
                Some(s.obj_val()),
                s.iter() as usize,
            ),
            Status::MaxIterationsReached(s) | Status::TimeLimitReached(s) => (
                SolveStatus::MaxIterReached,
                Some(s.x().to_vec()),
                Some(s.y().to_vec()),
                Some(s.obj_val()),
                s.iter() as usize,
            ),
            Status::PrimalInfeasible(_) | Status::PrimalInfeasibleInaccurate(_) => {
                (SolveStatus::Infeasible, None, None, None, 0)
            }
            Status::DualInfeasible(_) | Status::DualInfeasibleInaccurate(_) => {
                (SolveStatus::Unbounded, None, None, None, 0)
            }
            _ => (SolveStatus::Error, None, None, None, 0),
        };

        Ok(SolverResult {
            backend: NAME.to_string(),
            status,
            x,
            dual,
            obj_val,
            iterations,
            solve_time_ms,
            n,
            m,
        })
    }
}
