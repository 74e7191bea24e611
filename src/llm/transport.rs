// ABOUTME: HTTP plumbing shared by the provider adapters
// ABOUTME: Builds clients, maps reqwest failures onto error kinds, and decodes JSON bodies by status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::config::ProviderEndpoint;
use crate::errors::{AppError, AppResult};
use mindwell_core::constants::timeouts;

/// Build a client whose request deadline matches the generation deadline
pub(super) fn build_client(request_timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts::CONNECT_SECS).min(request_timeout))
        .timeout(request_timeout)
        .build()
        .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")).with_source(e))
}

/// Map a failed send onto timeout, connection, or provider errors
///
/// The URL is stripped first since some backends carry the key in the query.
pub(super) fn map_send_error(service: &str, error: reqwest::Error, deadline: Duration) -> AppError {
    let error = error.without_url();
    error!("Failed to send request to {service}: {error}");
    if error.is_timeout() {
        AppError::timeout(service, deadline.as_secs()).with_source(error)
    } else if error.is_connect() {
        AppError::connection(service, format!("Cannot connect: {error}")).with_source(error)
    } else {
        AppError::external_service(service, format!("Request failed: {error}")).with_source(error)
    }
}

/// Read the body, reject non-success statuses, and decode the expected shape
pub(super) async fn read_json<T: DeserializeOwned>(
    service: &str,
    response: Response,
    deadline: Duration,
) -> AppResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| map_send_error(service, e, deadline))?;

    if !status.is_success() {
        warn!("{service} returned {status}");
        return Err(AppError::provider_status(service, status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| {
        debug!(
            "Unexpected {service} body: {}",
            body.chars().take(200).collect::<String>()
        );
        AppError::parse_failure(service, format!("Failed to parse response: {e}"))
    })
}

/// Credential of a key-based backend, or a configuration error without any network call
pub(super) fn require_key<'a>(endpoint: &'a ProviderEndpoint, env_var: &str) -> AppResult<&'a str> {
    endpoint
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| AppError::config_missing(env_var))
}

/// Syntactic credential check; says nothing about whether the key works
pub(super) fn key_shape_ok(api_key: Option<&str>, prefix: &str, min_len: usize) -> bool {
    api_key
        .map(str::trim)
        .is_some_and(|key| key.starts_with(prefix) && key.len() >= min_len)
}

/// Reply text, treating a blank reply as an unexpected body
pub(super) fn non_empty(service: &str, text: Option<String>) -> AppResult<String> {
    text.map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::parse_failure(service, "Response contained no reply text"))
}
