//! `zkhire score`: Compute a privacy score.

use clap::Args;
use serde::Deserialize;

use zkhire_core::PrivacyMetrics;

use super::{api_url, fail, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Percentage of skill information revealed.
    #[arg(long, default_value_t = 0.0)]
    pub skills: f64,

    /// Percentage of location information revealed.
    #[arg(long, default_value_t = 0.0)]
    pub location: f64,

    /// Percentage of salary information revealed.
    #[arg(long, default_value_t = 0.0)]
    pub salary: f64,

    /// Whether a nullifier protects the flow against replay.
    #[arg(long)]
    pub nullifier: bool,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct ScoreResponse {
    score: u8,
}

pub async fn run(args: &ScoreArgs) -> anyhow::Result<()> {
    let body = PrivacyMetrics {
        skills_revealed_pct: args.skills,
        location_revealed_pct: args.location,
        salary_revealed_pct: args.salary,
        has_nullifier: args.nullifier,
    };

    let client = reqwest::Client::new();
    let resp = client
        .post(api_url(&args.endpoint, "privacy/score"))
        .json(&body)
        .send()
        .await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: ScoreResponse = r.json().await?;
            println!("Privacy score: {}/100", data.score);
        }
        Ok(r) => fail("privacy scoring", r).await?,
        Err(e) => {
            println!("Could not reach node at {}", args.endpoint);
            println!("  Error: {}", e);
        }
    }

    Ok(())
}
