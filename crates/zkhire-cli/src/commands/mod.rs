pub mod prove;
pub mod region_proof;
pub mod score;
pub mod verify;

use serde::Deserialize;

/// Default API endpoint of a local node.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9101";

#[derive(Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Read JSON from a file path, or treat the argument as inline JSON.
pub fn read_json_arg(arg: &str) -> anyhow::Result<serde_json::Value> {
    let json_str = if std::path::Path::new(arg).exists() {
        std::fs::read_to_string(arg)?
    } else {
        arg.to_string()
    };
    serde_json::from_str(&json_str).map_err(|e| anyhow::anyhow!("invalid JSON: {}", e))
}

/// Turn a non-success response into an error carrying the node's message.
pub async fn fail(action: &str, resp: reqwest::Response) -> anyhow::Result<()> {
    let status = resp.status();
    if let Ok(err) = resp.json::<ErrorResponse>().await {
        anyhow::bail!("{} failed (HTTP {}): {}", action, status, err.error);
    } else {
        anyhow::bail!("{} failed (HTTP {})", action, status);
    }
}

pub fn api_url(endpoint: &str, path: &str) -> String {
    format!("{}/api/v1/{}", endpoint.trim_end_matches('/'), path)
}
