//! qpcheck: cross-validation harness for QP solver backends.
//!
//! Builds convex quadratic programs of the form
//!
//! ```text
//! minimize    (1/2) x^T P x + q^T x
//! subject to  l <= A x <= u
//! ```
//!
//! from literal test cases, seeded random draws, or MAT benchmark files,
//! submits each problem to independent solver backends through a uniform
//! adapter contract, and quantifies the disagreement between their answers.
//!
//! # Example
//!
//! ```ignore
//! use qpcheck_core::{generators, ClarabelBackend, CrossCheck, OsqpBackend, SolverOptions};
//!
//! let problem = generators::small_qp()?;
//! let osqp_opts = SolverOptions::new().with("eps_abs", 1e-8).with("eps_rel", 1e-8);
//!
//! let check = CrossCheck::run(
//!     &problem,
//!     &[
//!         (&ClarabelBackend, &SolverOptions::new()),
//!         (&OsqpBackend, &osqp_opts),
//!     ],
//! )?;
//! check.print_summary();
//! check.print_reports()?;
//! ```
//!
//! Backends are opaque: the harness never looks inside a solver, it only
//! normalizes inputs, statuses, and duals so the answers are comparable.

#![warn(clippy::all)]

pub mod backends;
pub mod comparison;
pub mod error;
pub mod generators;
pub mod linalg;
pub mod matparser;
pub mod options;
pub mod problem;

// Re-export main types
pub use backends::{ClarabelBackend, OsqpBackend, SolveStatus, SolverBackend, SolverResult};
pub use comparison::{compare, CrossCheck, CrossCheckReport, DiscrepancyReport, Metric};
pub use error::{HarnessError, HarnessResult};
pub use matparser::{parse_mat, MatQpData};
pub use options::{OptValue, SolverOptions};
pub use problem::QpProblem;
