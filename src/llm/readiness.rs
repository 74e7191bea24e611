// ABOUTME: Best-effort provider readiness probe run once in the background at startup
// ABOUTME: Polls the router's availability check a few times and logs the outcome without gating requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! Startup readiness
//!
//! The probe only reports. Requests are served whether or not it succeeds,
//! and a provider that is down surfaces per request as a failed generation.
//! Launching a local provider process is left to whoever runs the service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mindwell_core::constants::timeouts;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use super::ProviderRouter;

/// Something that can say whether a dependency is ready
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Name used in log lines
    fn name(&self) -> &str;

    /// Single readiness check
    async fn check(&self) -> bool;

    /// Check up to `attempts` times, sleeping `interval` between tries
    async fn wait_ready(&self, attempts: u32, interval: Duration) -> bool {
        for attempt in 1..=attempts.max(1) {
            if self.check().await {
                info!(probe = self.name(), attempt, "Dependency is ready");
                return true;
            }
            if attempt < attempts {
                sleep(interval).await;
            }
        }
        warn!(
            probe = self.name(),
            attempts,
            "Dependency not ready; requests will report failures until it is"
        );
        false
    }
}

/// Readiness of the configured text-generation provider
pub struct ProviderReadinessProbe {
    router: Arc<ProviderRouter>,
    name: String,
}

impl ProviderReadinessProbe {
    /// Probe the router's configured provider
    #[must_use]
    pub fn new(router: Arc<ProviderRouter>) -> Self {
        let name = format!("llm:{}", router.config().provider);
        Self { router, name }
    }
}

#[async_trait]
impl ReadinessProbe for ProviderReadinessProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> bool {
        self.router.is_available().await
    }
}

/// Run the provider probe once on a detached task
///
/// The handle resolves to whether the provider became ready; dropping it
/// leaves the probe running to completion.
#[must_use]
pub fn spawn_startup_probe(router: Arc<ProviderRouter>) -> JoinHandle<bool> {
    let probe = ProviderReadinessProbe::new(router);
    tokio::spawn(async move {
        probe
            .wait_ready(
                timeouts::READINESS_ATTEMPTS,
                Duration::from_secs(timeouts::READINESS_INTERVAL_SECS),
            )
            .await
    })
}
