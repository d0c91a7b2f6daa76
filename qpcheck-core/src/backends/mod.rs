//! Solver backend adapters.
//!
//! Each backend translates the canonical problem into its solver's native
//! input form, runs the solver as an opaque synchronous call, and maps the
//! native termination code back into the shared [`SolveStatus`]. Callers
//! depend only on the [`SolverBackend`] trait.

use std::fmt;

use serde::Serialize;

use crate::error::HarnessResult;
use crate::options::SolverOptions;
use crate::problem::QpProblem;

mod clarabel;
mod osqp;

pub use self::clarabel::ClarabelBackend;
pub use self::osqp::OsqpBackend;

/// Outcome of one backend invocation.
///
/// Non-optimal termination is reportable data, not an error: a backend that
/// proves infeasibility or runs out of iterations has still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveStatus {
    /// Optimal solution found (within the backend's tolerances)
    Optimal,
    /// Problem proven primal infeasible
    Infeasible,
    /// Problem proven unbounded (dual infeasible)
    Unbounded,
    /// Iteration or time cap hit; best iterate returned
    MaxIterReached,
    /// Backend terminated abnormally (numerical breakdown, no progress)
    Error,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::Unbounded => write!(f, "Unbounded"),
            SolveStatus::MaxIterReached => write!(f, "MaxIter"),
            SolveStatus::Error => write!(f, "Error"),
        }
    }
}

/// Normalized result of one backend invocation on one problem.
///
/// Duals follow the stationarity convention `P x + q + A^T y = 0`, aligned
/// one-to-one with the rows of A, so dual vectors from different backends
/// are directly comparable.
#[derive(Debug, Clone, Serialize)]
pub struct SolverResult {
    /// Name of the backend that produced this result
    pub backend: String,
    /// Termination status
    pub status: SolveStatus,
    /// Primal solution (absent when the backend produced no iterate)
    pub x: Option<Vec<f64>>,
    /// Dual solution, length m (absent when the backend produced none)
    pub dual: Option<Vec<f64>>,
    /// Objective value at x
    pub obj_val: Option<f64>,
    /// Iterations used
    pub iterations: usize,
    /// Wall-clock solve time in milliseconds
    pub solve_time_ms: f64,
    /// Number of variables of the solved problem
    pub n: usize,
    /// Number of constraint rows of the solved problem
    pub m: usize,
}

/// Uniform call contract for solver backends.
pub trait SolverBackend {
    /// Stable backend identifier used in reports and error messages.
    fn name(&self) -> &'static str;

    /// Solve one problem.
    ///
    /// Returns a [`SolverResult`] for every run the backend completed,
    /// optimal or not. Fails with `UnsupportedOption` on a rejected
    /// configuration key and with `SolverInvocation` when the backend could
    /// not run at all; invocation failures are surfaced, never retried.
    fn solve(&self, problem: &QpProblem, options: &SolverOptions) -> HarnessResult<SolverResult>;
}
