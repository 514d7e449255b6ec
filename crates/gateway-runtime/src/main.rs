//! # Interaction Gateway Runtime
//!
//! Entry point for the signed interaction webhook.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logs, metrics, optional OTLP export)
//! 2. Load gateway configuration from the environment
//! 3. Validate it; problems are logged and requests fail closed
//! 4. Select the worker gateway and build the service
//! 5. Serve HTTP until Ctrl+C

use std::sync::Arc;

use anyhow::{Context, Result};
use gateway_runtime::GatewayRuntime;
use gateway_telemetry::{init_telemetry, TelemetryConfig};
use interaction_gateway::GatewayConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .await
        .context("Failed to initialize telemetry")?;

    let config = GatewayConfig::from_env();
    let runtime = Arc::new(GatewayRuntime::new(config)?);

    let mut server = {
        let runtime = Arc::clone(&runtime);
        tokio::spawn(async move { runtime.run().await })
    };

    info!("Gateway is running. Press Ctrl+C to stop.");

    tokio::select! {
        result = &mut server => {
            return result.context("HTTP server task panicked")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
        }
    }

    runtime.shutdown();
    server.await.context("HTTP server task panicked")??;

    info!("Shutdown complete");
    Ok(())
}
