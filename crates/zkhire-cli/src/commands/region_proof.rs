//! `zkhire region-proof`: Build a region membership proof.

use clap::Args;
use serde::{Deserialize, Serialize};

use super::{api_url, fail, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct RegionProofArgs {
    /// Region to prove membership for.
    #[arg(short, long)]
    pub region: String,

    /// Allowed regions, comma-separated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub regions: Vec<String>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct RegionProofRequest<'a> {
    region: &'a str,
    regions: &'a [String],
}

#[derive(Deserialize)]
struct MerkleProofResponse {
    sibling_hashes: Vec<String>,
    leaf_index: usize,
    root: String,
    valid: bool,
}

pub async fn run(args: &RegionProofArgs) -> anyhow::Result<()> {
    let body = RegionProofRequest {
        region: &args.region,
        regions: &args.regions,
    };

    let client = reqwest::Client::new();
    let resp = client
        .post(api_url(&args.endpoint, "regions/proof"))
        .json(&body)
        .send()
        .await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: MerkleProofResponse = r.json().await?;
            if data.valid {
                println!("Region {} is in the allowed set", args.region);
            } else {
                println!("Region {} is NOT in the allowed set", args.region);
            }
            println!("  Root:       {}", data.root);
            if data.valid {
                println!("  Leaf index: {}", data.leaf_index);
                println!("  Siblings:");
                for sibling in &data.sibling_hashes {
                    println!("    {}", sibling);
                }
            }
        }
        Ok(r) => fail("region proof", r).await?,
        Err(e) => {
            println!("Could not reach node at {}", args.endpoint);
            println!("  Error: {}", e);
        }
    }

    Ok(())
}
