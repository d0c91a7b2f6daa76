//! Cross-check CLI: build one QP, run it through the selected backends,
//! and report per-backend results plus pairwise discrepancies.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use qpcheck_core::{
    generators, parse_mat, ClarabelBackend, CrossCheck, OsqpBackend, QpProblem, SolverBackend,
    SolverOptions,
};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Example {
    /// Small strictly convex QP with an equality row and box bounds
    Small1,
    /// Semidefinite QP with one-sided inequality rows
    Small2,
    /// Random dense QP (seeded)
    Random,
    /// Random LP with box-bound rows (seeded)
    Lp,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BackendChoice {
    Clarabel,
    Osqp,
    All,
}

#[derive(Parser, Debug)]
#[command(
    name = "qpcheck-bench",
    about = "Cross-check QP solver backends on one problem"
)]
struct Args {
    /// Built-in example problem
    #[arg(long, value_enum, default_value = "small1")]
    example: Example,

    /// Load a MAT benchmark file instead of a built-in example
    #[arg(long)]
    mat: Option<PathBuf>,

    /// Backends to run
    #[arg(long, value_enum, default_value = "all")]
    solver: BackendChoice,

    /// Seed for the randomized examples
    #[arg(long, default_value_t = 2)]
    seed: u64,

    /// Variables in the randomized examples
    #[arg(long, default_value_t = 5)]
    n: usize,

    /// General constraint rows in the randomized examples
    #[arg(long, default_value_t = 6)]
    m: usize,

    /// Iteration cap passed to every backend
    #[arg(long)]
    max_iter: Option<u64>,

    /// OSQP absolute tolerance
    #[arg(long, default_value_t = 1e-8)]
    eps_abs: f64,

    /// OSQP relative tolerance
    #[arg(long, default_value_t = 1e-8)]
    eps_rel: f64,

    /// Let the backends print their own iteration logs
    #[arg(long)]
    verbose: bool,

    /// Emit machine-readable JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn build_problem(args: &Args) -> Result<QpProblem> {
    if let Some(path) = &args.mat {
        let data = parse_mat(path).with_context(|| format!("loading {}", path.display()))?;
        eprintln!(
            "Loaded {}: {} general rows over {} variables",
            data.name, data.m0, data.n
        );
        return data
            .into_problem()
            .context("converting benchmark problem");
    }

    let problem = match args.example {
        Example::Small1 => generators::small_qp()?,
        Example::Small2 => generators::one_sided_qp()?,
        Example::Random => {
            let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
            generators::random_qp(args.n, args.m, &mut rng)?
        }
        Example::Lp => {
            let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
            generators::random_lp(args.n, args.m, &mut rng)?
        }
    };
    Ok(problem)
}

fn clarabel_options(args: &Args) -> SolverOptions {
    let mut opts = SolverOptions::new();
    if let Some(cap) = args.max_iter {
        opts.set("max_iter", cap);
    }
    if args.verbose {
        opts.set("verbose", true);
    }
    opts
}

fn osqp_options(args: &Args) -> SolverOptions {
    let mut opts = SolverOptions::new()
        .with("eps_abs", args.eps_abs)
        .with("eps_rel", args.eps_rel)
        .with("polish", true);
    if let Some(cap) = args.max_iter {
        opts.set("max_iter", cap);
    }
    if args.verbose {
        opts.set("verbose", true);
    }
    opts
}

fn main() -> Result<()> {
    let args = Args::parse();

    let problem = build_problem(&args)?;
    if !args.json {
        println!(
            "Problem: n = {}, m = {}, A nonzeros = {}",
            problem.n(),
            problem.m(),
            problem.a().nnz()
        );
    }

    let clarabel = ClarabelBackend;
    let osqp = OsqpBackend;
    let clarabel_opts = clarabel_options(&args);
    let osqp_opts = osqp_options(&args);

    let mut runs: Vec<(&dyn SolverBackend, &SolverOptions)> = Vec::new();
    match args.solver {
        BackendChoice::Clarabel => runs.push((&clarabel, &clarabel_opts)),
        BackendChoice::Osqp => runs.push((&osqp, &osqp_opts)),
        BackendChoice::All => {
            runs.push((&clarabel, &clarabel_opts));
            runs.push((&osqp, &osqp_opts));
        }
    }

    let check = CrossCheck::run(&problem, &runs).context("running cross-check")?;

    if args.json {
        println!("{}", check.report()?.to_json()?);
    } else {
        check.print_summary();
        check.print_reports()?;
    }

    Ok(())
}
