//! Pairwise result comparison and multi-backend cross-checking.
//!
//! The comparison engine reports discrepancy magnitudes only; pass/fail
//! thresholding is the caller's concern. Metrics are flagged not-applicable
//! unless both results are Optimal, so a failed solve can never read as
//! agreement.

use std::fmt;

use serde::Serialize;

use crate::backends::{SolveStatus, SolverBackend, SolverResult};
use crate::error::{HarnessError, HarnessResult};
use crate::options::SolverOptions;
use crate::problem::QpProblem;

/// A discrepancy magnitude, or the marker that no comparison was possible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Metric {
    /// Computed norm
    Value(f64),
    /// No valid pair of solutions to compare
    NotApplicable,
}

impl Metric {
    /// The computed magnitude, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::NotApplicable => None,
        }
    }

    /// True when a magnitude was computed.
    pub fn is_applicable(&self) -> bool {
        matches!(self, Metric::Value(_))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{:.8}", v),
            Metric::NotApplicable => write!(f, "n/a"),
        }
    }
}

/// Pairwise numeric comparison between two results for the same problem.
#[derive(Debug, Clone, Serialize)]
pub struct DiscrepancyReport {
    /// First backend name
    pub backend_a: String,
    /// Second backend name
    pub backend_b: String,
    /// First backend's status
    pub status_a: SolveStatus,
    /// Second backend's status
    pub status_b: SolveStatus,
    /// |objval_a - objval_b|
    pub objective_diff: Metric,
    /// Euclidean norm of the primal solution difference
    pub solution_diff: Metric,
    /// Euclidean norm of the dual solution difference
    pub dual_diff: Metric,
}

impl DiscrepancyReport {
    /// True when both results were Optimal and all metrics were computed.
    pub fn is_applicable(&self) -> bool {
        self.objective_diff.is_applicable()
            && self.solution_diff.is_applicable()
            && self.dual_diff.is_applicable()
    }
}

impl fmt::Display for DiscrepancyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Comparison {} - {}", self.backend_a, self.backend_b)?;
        writeln!(f, "{}", "-".repeat(40))?;
        if self.status_a != SolveStatus::Optimal || self.status_b != SolveStatus::Optimal {
            writeln!(
                f,
                "Not comparable: status {} vs {}",
                self.status_a, self.status_b
            )?;
        }
        writeln!(f, "Difference in objective value  {}", self.objective_diff)?;
        writeln!(f, "Norm of solution difference    {}", self.solution_diff)?;
        write!(f, "Norm of dual difference        {}", self.dual_diff)
    }
}

#[inline]
fn norm2_diff(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Compare two results for the same problem.
///
/// Fails with `IncomparableResults` when the results describe problems of
/// different shape. When either status is not Optimal the report carries
/// all-NotApplicable metrics; absence of a valid solution is never read as
/// a zero discrepancy.
pub fn compare(a: &SolverResult, b: &SolverResult) -> HarnessResult<DiscrepancyReport> {
    if a.n != b.n || a.m != b.m {
        return Err(HarnessError::IncomparableResults(format!(
            "`{}` solved a {}x{} problem, `{}` solved a {}x{} problem",
            a.backend, a.m, a.n, b.backend, b.m, b.n
        )));
    }

    let mut report = DiscrepancyReport {
        backend_a: a.backend.clone(),
        backend_b: b.backend.clone(),
        status_a: a.status,
        status_b: b.status,
        objective_diff: Metric::NotApplicable,
        solution_diff: Metric::NotApplicable,
        dual_diff: Metric::NotApplicable,
    };

    if a.status != SolveStatus::Optimal || b.status != SolveStatus::Optimal {
        return Ok(report);
    }

    if let (Some(oa), Some(ob)) = (a.obj_val, b.obj_val) {
        report.objective_diff = Metric::Value((oa - ob).abs());
    }
    if let (Some(xa), Some(xb)) = (&a.x, &b.x) {
        report.solution_diff = Metric::Value(norm2_diff(xa, xb));
    }
    if let (Some(da), Some(db)) = (&a.dual, &b.dual) {
        report.dual_diff = Metric::Value(norm2_diff(da, db));
    }

    Ok(report)
}

/// Results of one problem fanned out to several backends.
#[derive(Debug, Clone)]
pub struct CrossCheck {
    /// One result per backend, in invocation order
    pub results: Vec<SolverResult>,
}

/// Serializable cross-check output: raw results plus pairwise comparisons.
#[derive(Debug, Clone, Serialize)]
pub struct CrossCheckReport {
    /// Per-backend results
    pub results: Vec<SolverResult>,
    /// All unordered backend pairs
    pub comparisons: Vec<DiscrepancyReport>,
}

impl CrossCheckReport {
    /// Machine-readable JSON rendering.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl CrossCheck {
    /// Wrap already-collected results.
    pub fn new(results: Vec<SolverResult>) -> Self {
        Self { results }
    }

    /// Solve one problem with each backend in turn.
    ///
    /// Invocation failures abort the run and surface as-is; there is no
    /// retry. Non-optimal statuses are collected like any other result.
    pub fn run(
        problem: &QpProblem,
        runs: &[(&dyn SolverBackend, &SolverOptions)],
    ) -> HarnessResult<Self> {
        let mut results = Vec::with_capacity(runs.len());
        for (backend, opts) in runs {
            results.push(backend.solve(problem, opts)?);
        }
        Ok(Self { results })
    }

    /// Discrepancy reports for all unordered result pairs.
    pub fn pairwise(&self) -> HarnessResult<Vec<DiscrepancyReport>> {
        let mut reports = Vec::new();
        for i in 0..self.results.len() {
            for j in (i + 1)..self.results.len() {
                reports.push(compare(&self.results[i], &self.results[j])?);
            }
        }
        Ok(reports)
    }

    /// Bundle results and comparisons for serialization.
    pub fn report(&self) -> HarnessResult<CrossCheckReport> {
        Ok(CrossCheckReport {
            results: self.results.clone(),
            comparisons: self.pairwise()?,
        })
    }

    /// Print the per-backend summary table.
    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(64));
        println!("Cross-check summary");
        println!("{}", "=".repeat(64));
        println!(
            "{:<12} {:>10} {:>8} {:>16} {:>10}",
            "Backend", "Status", "Iters", "Obj", "Time(ms)"
        );
        println!("{}", "-".repeat(64));

        for r in &self.results {
            let obj = r
                .obj_val
                .map(|v| format!("{:.6e}", v))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<12} {:>10} {:>8} {:>16} {:>10.2}",
                r.backend, r.status, r.iterations, obj, r.solve_time_ms
            );
        }
        println!("{}", "=".repeat(64));
    }

    /// Print every pairwise discrepancy report.
    pub fn print_reports(&self) -> HarnessResult<()> {
        for report in self.pairwise()? {
            println!("\n{}", report);
        }
        Ok(())
    }
}
