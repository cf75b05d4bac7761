// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Outbound email via an HTTP mail API.
//!
//! The transport is a plain JSON POST (Resend-style `/emails` endpoint), so
//! it rides the same reqwest stack as every other provider and can be mocked
//! behind the [`Mailer`] trait in tests.

use crate::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

/// Mail send timeout. Login cannot hang on a slow transport.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Email transport capability.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single HTML email. Errors surface as `ServiceUnavailable`
    /// (misconfigured) or `Provider` (transport rejected the send).
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), AppError>;
}

/// HTTP mail-API client.
pub struct HttpMailer {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), AppError> {
        if self.api_url.is_empty() || self.api_key.is_empty() {
            return Err(AppError::ServiceUnavailable(
                "email service not configured".to_string(),
            ));
        }

        let body = serde_json::json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "html": html,
        });

        let response = self
            .http
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .timeout(SEND_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ServiceUnavailable(format!("mail transport: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "mail API returned {}: {}",
                status, text
            )));
        }

        tracing::info!(to = %to, "Email dispatched");
        Ok(())
    }
}
