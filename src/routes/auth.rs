// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email login routes.
//!
//! `/auth/login` behavior depends on the configured [`LoginMode`]: magic-link
//! deployments mail a one-time token and `/auth/verify` exchanges it for a
//! session; direct deployments hand back the session immediately.

use crate::config::LoginMode;
use crate::error::Result;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify", post(verify))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Login response. Magic-link mode sends `message`; direct mode sends the
/// session `token` straight away.
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub email: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    match state.config.login_mode {
        LoginMode::MagicLink => {
            state.identity.request_login(&request.email).await?;
            Ok(Json(LoginResponse {
                message: Some("Login link sent to email".to_string()),
                token: None,
                email: request.email,
            }))
        }
        LoginMode::Direct => {
            let session = state.identity.direct_login(&request.email).await?;
            Ok(Json(LoginResponse {
                message: None,
                token: Some(session.token),
                email: session.email,
            }))
        }
    }
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    /// Session credential (JWT)
    pub token: String,
    pub email: String,
}

async fn verify(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    let session = state.identity.verify(&request.token).await?;
    Ok(Json(VerifyResponse {
        token: session.token,
        email: session.email,
    }))
}
