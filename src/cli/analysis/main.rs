use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use symnmf::cli::{self, DEFAULT_SEED, ERROR_MESSAGE};
use symnmf::cluster::{self, DEFAULT_KMEANS_ITERATIONS};
use symnmf::symnmf::{factorize, SymNmfConfig};
use symnmf::{graph, io};

/// Compare SymNMF and k-means clusterings by silhouette score
#[derive(Debug, Parser)]
#[command(name = "analysis", version)]
struct Args {
    /// Number of clusters
    k: usize,

    /// Input points (CSV, or whitespace rows with an optional "n d" header line)
    file: PathBuf,

    /// Seed for the initial H
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Args) -> anyhow::Result<(f64, f64)> {
    let points = io::load_points(&args.file)?;
    cli::check_cluster_count(args.k, points.n())?;

    // SymNMF: H の各行の最大の列をクラスタとする
    let w = graph::normalized_affinity(&points)?;
    let h = cli::initialize_h(w.view(), args.k, args.seed)?;
    let factorization = factorize(w.view(), h, &SymNmfConfig::default())?;
    info!(iterations = factorization.iterations, "symnmf finished");
    let nmf_labels = cluster::hard_assignments(factorization.h.view());
    let nmf_score = cluster::silhouette_score(&points, &nmf_labels)?;

    // k-means
    let kmeans = cluster::kmeans(&points, args.k, DEFAULT_KMEANS_ITERATIONS)?;
    let kmeans_score = cluster::silhouette_score(&points, &kmeans.labels)?;

    Ok((nmf_score, kmeans_score))
}

fn main() -> ExitCode {
    let args = Args::parse();
    cli::init_logging(args.verbose);

    match run(&args) {
        Ok((nmf, kmeans)) => {
            println!("nmf: {nmf:.4}");
            println!("kmeans: {kmeans:.4}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "analysis failed");
            println!("{ERROR_MESSAGE}");
            ExitCode::FAILURE
        }
    }
}
