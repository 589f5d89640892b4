//! # Authentication Endpoints
//!
//! `POST /login` and `POST /register` on the auth API.

use shared::{message_from_body, LoginRequest, RegisterRequest};

use super::client::ApiClient;
use crate::core::error::ApiError;

/// Log in with email and password.
#[tracing::instrument(skip(client, request), fields(email = %request.email))]
pub async fn login(client: &ApiClient, request: LoginRequest) -> Result<(), ApiError> {
    tracing::info!("Attempting login");
    let start = std::time::Instant::now();

    let response = client
        .client
        .post(client.auth_url("/login"))
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Login network error");
            ApiError::from(e)
        })?;

    let status = response.status();
    let duration = start.elapsed();

    if status.is_success() {
        tracing::info!(duration_ms = duration.as_millis(), "Login successful");
        return Ok(());
    }

    let message = read_message(response).await;
    tracing::warn!(
        status = status.as_u16(),
        error = ?message,
        duration_ms = duration.as_millis(),
        "Login rejected"
    );
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// Register a new account.
#[tracing::instrument(skip(client, request), fields(email = %request.email))]
pub async fn register(client: &ApiClient, request: RegisterRequest) -> Result<(), ApiError> {
    let response = client
        .client
        .post(client.auth_url("/register"))
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Register network error");
            ApiError::from(e)
        })?;

    let status = response.status();
    if status.is_success() {
        tracing::info!("Registration successful");
        return Ok(());
    }

    let message = read_message(response).await;
    tracing::warn!(status = status.as_u16(), error = ?message, "Registration rejected");
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn read_message(response: reqwest::Response) -> Option<String> {
    match response.text().await {
        Ok(body) => message_from_body(&body),
        Err(e) => {
            tracing::debug!(error = %e, "Could not read error body");
            None
        }
    }
}
