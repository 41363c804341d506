use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

use symnmf::cli::{self, DEFAULT_SEED, ERROR_MESSAGE};
use symnmf::{graph, io as points_io};

// 出力する行列の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Goal {
    /// Final factor matrix H
    Symnmf,
    /// Similarity matrix
    Sym,
    /// Diagonal degree matrix
    Ddg,
    /// Normalized similarity matrix
    Norm,
}

/// SymNMF clustering: similarity graph construction and symmetric NMF
#[derive(Debug, Parser)]
#[command(name = "symnmf", version)]
struct Args {
    /// Number of clusters
    k: usize,

    /// Matrix to compute and print
    #[arg(value_enum)]
    goal: Goal,

    /// Input points (CSV, or whitespace rows with an optional "n d" header line)
    file: PathBuf,

    /// JSON file with max_iterations / epsilon / beta
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of update iterations
    #[arg(long = "max-iter")]
    max_iter: Option<usize>,

    /// Convergence threshold on the squared Frobenius delta
    #[arg(long)]
    epsilon: Option<f64>,

    /// Blend factor of the multiplicative update
    #[arg(long)]
    beta: Option<f64>,

    /// Seed for the initial H
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = cli::resolve_config(args.config.as_deref(), args.max_iter, args.epsilon, args.beta)?;
    let points = points_io::load_points(&args.file)?;
    cli::check_cluster_count(args.k, points.n())?;

    let a = graph::build_affinity(&points)?;
    let result = match args.goal {
        Goal::Sym => a,
        Goal::Ddg => graph::build_degree(a.view())?,
        Goal::Norm => {
            let d = graph::build_degree(a.view())?;
            graph::build_normalized(a.view(), d.view())?
        }
        Goal::Symnmf => {
            let d = graph::build_degree(a.view())?;
            let w = graph::build_normalized(a.view(), d.view())?;
            let h = cli::initialize_h(w.view(), args.k, args.seed)?;
            let factorization = symnmf::symnmf::factorize(w.view(), h, &config)?;
            info!(
                iterations = factorization.iterations,
                termination = ?factorization.termination,
                "factorization finished"
            );
            factorization.into_factor()
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    points_io::write_matrix(&mut out, result.view())?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    cli::init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "symnmf failed");
            println!("{ERROR_MESSAGE}");
            ExitCode::FAILURE
        }
    }
}
