//! # Gateway Runtime Library
//!
//! Wires configuration, worker gateway, service and HTTP server together.
//! The main entry point is the `main.rs` binary.

use std::sync::Arc;

use anyhow::{Context, Result};
use interaction_gateway::{
    build_router, serve, GatewayConfig, GatewayMode, HttpWorkerGateway, InteractionService,
    TracingObserver, UnconfiguredWorkerGateway, WorkerGateway,
};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Select the worker gateway for the configured mode.
///
/// Forward mode without a target gets an [`UnconfiguredWorkerGateway`]: the
/// trigger is still acknowledged and every submission is logged as failed.
pub fn build_worker_gateway(config: &GatewayConfig) -> Result<Arc<dyn WorkerGateway>> {
    match (&config.mode, &config.worker_target) {
        (GatewayMode::Forward, Some(target)) => {
            let gateway = HttpWorkerGateway::new(target.clone(), config.worker.timeout)
                .context("Failed to build worker HTTP client")?;
            Ok(Arc::new(gateway))
        }
        (GatewayMode::Forward, None) => {
            warn!("No worker target configured; trigger commands will not be forwarded");
            Ok(Arc::new(UnconfiguredWorkerGateway))
        }
        (GatewayMode::VerifyOnly, _) => Ok(Arc::new(UnconfiguredWorkerGateway)),
    }
}

/// The gateway process.
pub struct GatewayRuntime {
    config: GatewayConfig,
    service: Arc<InteractionService>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl GatewayRuntime {
    /// Create the runtime.
    ///
    /// Invalid configuration is logged but does not stop startup; requests
    /// then fail closed.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if let Err(e) = config.validate() {
            error!(error = %e, "Gateway configuration is incomplete");
        }

        let gateway = build_worker_gateway(&config)?;
        info!(
            mode = config.dispatch_mode().label(),
            target = %gateway.target(),
            trigger = %config.trigger_command,
            "Creating interaction gateway runtime"
        );

        let service = InteractionService::from_config(
            &config,
            gateway,
            Arc::new(TracingObserver::new(config.verbose)),
        );
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            service: Arc::new(service),
            shutdown_tx,
            shutdown_rx,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Serve until [`GatewayRuntime::shutdown`] is called.
    pub async fn run(&self) -> Result<()> {
        let router = build_router(self.service.clone(), self.config.http.max_body_bytes);

        let mut shutdown_rx = self.shutdown_rx.clone();
        let shutdown = async move {
            while !*shutdown_rx.borrow() {
                if shutdown_rx.changed().await.is_err() {
                    break;
                }
            }
        };

        serve(self.config.http.bind_addr, router, shutdown)
            .await
            .with_context(|| format!("HTTP server failed on {}", self.config.http.bind_addr))?;

        info!("Gateway stopped");
        Ok(())
    }

    /// Signal the server to stop accepting requests.
    pub fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(pairs: &[(&str, &str)]) -> GatewayConfig {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(move |key| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn test_forward_with_target_uses_http() {
        let gateway =
            build_worker_gateway(&config(&[("WORKER_TARGET", "http://worker.local/jobs")]))
                .unwrap();
        assert_eq!(gateway.target(), "http://worker.local/jobs");
    }

    #[test]
    fn test_forward_without_target_is_unconfigured() {
        let gateway = build_worker_gateway(&config(&[])).unwrap();
        assert_eq!(gateway.target(), "unconfigured");
    }

    #[test]
    fn test_verify_only_ignores_target() {
        let gateway = build_worker_gateway(&config(&[
            ("GATEWAY_MODE", "verify-only"),
            ("WORKER_TARGET", "http://worker.local/jobs"),
        ]))
        .unwrap();
        assert_eq!(gateway.target(), "unconfigured");
    }

    #[tokio::test]
    async fn test_runtime_starts_without_key_and_stops() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let addr = format!("127.0.0.1:{}", port);
        let runtime =
            Arc::new(GatewayRuntime::new(config(&[("GATEWAY_BIND_ADDR", addr.as_str())])).unwrap());

        let server = {
            let runtime = Arc::clone(&runtime);
            tokio::spawn(async move { runtime.run().await })
        };

        let url = format!("http://127.0.0.1:{}/health", port);
        let mut healthy = false;
        for _ in 0..50 {
            if let Ok(response) = reqwest::get(&url).await {
                healthy = response.status().is_success();
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(healthy);

        let response = reqwest::Client::new()
            .post(format!("http://127.0.0.1:{}/interactions", port))
            .body(r#"{"type":1}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 401);

        runtime.shutdown();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
