//! `zkhire prove`: Generate an eligibility proof.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use zkhire_core::EligibilityInput;

use super::{api_url, fail, read_json_arg, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Applicant identifier.
    #[arg(short, long)]
    pub applicant_id: String,

    /// Eligibility input JSON (as string or path to file).
    #[arg(short, long)]
    pub input: String,

    /// Unix timestamp to bind into the proof (defaults to now on the node).
    #[arg(long)]
    pub timestamp: Option<i64>,

    /// Write the full response JSON to this file.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct ProveRequest {
    applicant_id: String,
    input: EligibilityInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
}

pub async fn run(args: &ProveArgs) -> anyhow::Result<()> {
    let input: EligibilityInput = serde_json::from_value(read_json_arg(&args.input)?)
        .map_err(|e| anyhow::anyhow!("invalid eligibility input: {}", e))?;

    let body = ProveRequest {
        applicant_id: args.applicant_id.clone(),
        input,
        timestamp: args.timestamp,
    };

    let client = reqwest::Client::new();
    let resp = client
        .post(api_url(&args.endpoint, "proofs/generate"))
        .json(&body)
        .send()
        .await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: serde_json::Value = r.json().await?;
            let kind = data["kind"].as_str().unwrap_or("unknown");
            println!("Proof generated!");
            println!("  Kind:          {}", kind);
            println!("  Circuit:       {}", data["artifact"]["circuit_id"]);
            println!("  Proof hash:    {}", data["artifact"]["proof_hash"]);
            println!("  Privacy score: {}", data["privacy_score"]);
            println!("  Public signals:");
            if let Some(signals) = data["artifact"]["public_signals"].as_array() {
                for signal in signals {
                    println!("    {}", signal);
                }
            }
            if kind == "fallback" {
                println!();
                println!("  NOTE: fallback proofs are not cryptographically sound.");
            }
            if let Some(ref out) = args.out {
                std::fs::write(out, serde_json::to_string_pretty(&data)?)?;
                println!();
                println!("  Saved to {}", out.display());
            }
        }
        Ok(r) => fail("proof generation", r).await?,
        Err(e) => {
            println!("Could not reach node at {}", args.endpoint);
            println!("  Error: {}", e);
        }
    }

    Ok(())
}
