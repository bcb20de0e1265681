//! `zkhire verify`: Verify an eligibility proof.

use clap::Args;

use zkhire_core::{JobPublicParameters, VerificationOutcome, VerificationRequest};

use super::{api_url, fail, read_json_arg, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Proof artifact JSON, or a saved `prove` response (as string or path to file).
    #[arg(short, long)]
    pub artifact: String,

    /// Job the proof must be bound to.
    #[arg(short, long)]
    pub job_id: String,

    /// Region Merkle root published with the job.
    #[arg(long)]
    pub region_root: Option<String>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

/// Build a submission from either a bare artifact or a full `prove` response.
fn build_request(
    value: serde_json::Value,
    job: JobPublicParameters,
) -> anyhow::Result<VerificationRequest> {
    let artifact = match value.get("artifact") {
        Some(inner) => inner.clone(),
        None => value,
    };

    let public_signals: Vec<String> = match artifact.get("public_signals") {
        Some(signals) => serde_json::from_value(signals.clone())
            .map_err(|e| anyhow::anyhow!("public_signals must be a list of strings: {}", e))?,
        None => anyhow::bail!("artifact has no public_signals"),
    };

    Ok(VerificationRequest {
        proof: artifact.get("proof").cloned().unwrap_or(serde_json::Value::Null),
        public_signals,
        job,
    })
}

pub async fn run(args: &VerifyArgs) -> anyhow::Result<()> {
    let job = JobPublicParameters {
        job_id: args.job_id.clone(),
        region_merkle_root: args.region_root.clone(),
    };
    let body = build_request(read_json_arg(&args.artifact)?, job)?;

    let client = reqwest::Client::new();
    let resp = client
        .post(api_url(&args.endpoint, "proofs/verify"))
        .json(&body)
        .send()
        .await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let outcome: VerificationOutcome = r.json().await?;
            if outcome.valid {
                println!("Proof is VALID");
            } else {
                println!("Proof is INVALID");
            }
            println!();
            println!("  Path:     {:?}", outcome.path);
            println!("  Eligible: {}", outcome.eligible);
            if let Some(ref tx) = outcome.transaction_hash {
                println!("  Tx hash:  {}", tx);
            }
            if let Some(ref error) = outcome.error {
                println!("  Reason:   {}", error);
            }
        }
        Ok(r) => fail("verification", r).await?,
        Err(e) => {
            println!("Could not reach node at {}", args.endpoint);
            println!("  Error: {}", e);
        }
    }

    Ok(())
}
