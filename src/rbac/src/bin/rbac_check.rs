//! # rbac-check
//!
//! Decision tool for RBAC configurations. Reads one request per line from
//! stdin and writes one decision per line to stdout.
//!
//! ```text
//! $ echo '{"operation":"create","model":"user","args":{"data":{}}}' | rbac-check
//! {"allowed":true,"decision":"granted"}
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RBAC_CONFIG` - Path of the JSON options file (default: rbac.json)
//! - `RUST_LOG` - Log level (default: info), logs go to stderr

use anyhow::Context;
use querygate_rbac::{Decision, RbacEngine, RbacError, RbacOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// One line of input
#[derive(Debug, Deserialize)]
struct CheckRequest {
    operation: String,
    model: String,
    #[serde(default)]
    args: Value,
}

/// Successful decision line
#[derive(Debug, Serialize)]
struct Allowed {
    allowed: bool,
    decision: Decision,
}

fn check(engine: &RbacEngine, line: &str) -> anyhow::Result<Value> {
    let request: CheckRequest = serde_json::from_str(line).context("invalid request line")?;

    let outcome = match engine.decide(&request.operation, &request.model, Some(&request.args)) {
        Ok(decision) => serde_json::to_value(Allowed {
            allowed: true,
            decision,
        })?,
        Err(RbacError::Denied(denied)) => {
            info!(
                "Denied {} on '{}'",
                denied.operation(),
                denied.resource()
            );
            serde_json::to_value(denied.payload())?
        }
        Err(e) => return Err(e.into()),
    };

    Ok(outcome)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting rbac-check v{}", querygate_rbac::VERSION);

    let config_path = std::env::var("RBAC_CONFIG").unwrap_or_else(|_| "rbac.json".to_string());
    info!("Loading options from {}", config_path);

    let options = RbacOptions::from_file(&config_path)
        .with_context(|| format!("failed to load {}", config_path))?;
    let engine = RbacEngine::builder(options)
        .mismatch_handler(|missing, redundant| {
            warn!(
                "Configuration mismatch: missing={:?}, redundant={:?}",
                missing, redundant
            );
        })
        .build();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let output = match check(&engine, &line) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to check request: {:#}", e);
                serde_json::json!({ "error": format!("{:#}", e) })
            }
        };

        let mut encoded = serde_json::to_vec(&output)?;
        encoded.push(b'\n');
        stdout.write_all(&encoded).await?;
        stdout.flush().await?;
    }

    Ok(())
}
