//! ZkHire CLI: Command-line client for a ZkHire node.
//!
//! Subcommands: prove, verify, region-proof, score.

mod commands;

use clap::{Parser, Subcommand};

/// ZkHire: Privacy-preserving job eligibility proofs.
#[derive(Parser, Debug)]
#[command(name = "zkhire", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an eligibility proof for an applicant.
    Prove(commands::prove::ProveArgs),
    /// Verify an eligibility proof against a job.
    Verify(commands::verify::VerifyArgs),
    /// Build a region membership proof.
    RegionProof(commands::region_proof::RegionProofArgs),
    /// Compute a privacy score from disclosure percentages.
    Score(commands::score::ScoreArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Prove(args) => commands::prove::run(args).await,
        Commands::Verify(args) => commands::verify::run(args).await,
        Commands::RegionProof(args) => commands::region_proof::run(args).await,
        Commands::Score(args) => commands::score::run(args).await,
    }
}
