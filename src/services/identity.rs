// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity and token issuance.
//!
//! Two configuration-selectable login strategies share this service:
//! - magic-link: `request_login` mails a one-time token, `verify` exchanges
//!   it for a session JWT (proves email possession)
//! - direct: `direct_login` issues the session JWT immediately (no proof;
//!   zero-friction deployments only)

use crate::db::Store;
use crate::error::AppError;
use crate::middleware::auth::create_session_token;
use crate::models::{LoginToken, User};
use crate::services::mailer::Mailer;
use rand::RngCore;
use std::sync::Arc;

/// Login tokens are valid for 15 minutes.
const LOGIN_TOKEN_TTL_SECS: i64 = 15 * 60;

/// A session credential plus the email it was issued for.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub email: String,
}

pub struct IdentityService {
    store: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
    jwt_signing_key: Vec<u8>,
    frontend_url: String,
}

impl IdentityService {
    pub fn new(
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
        jwt_signing_key: Vec<u8>,
        frontend_url: String,
    ) -> Self {
        Self {
            store,
            mailer,
            jwt_signing_key,
            frontend_url,
        }
    }

    /// Magic-link login: record a one-time token and mail a verification
    /// link. The syntactic email check is deliberately minimal.
    pub async fn request_login(&self, email: &str) -> Result<(), AppError> {
        if !email.contains('@') {
            return Err(AppError::BadRequest("valid email required".to_string()));
        }

        let token = new_login_token();
        let login_token = LoginToken {
            token: token.clone(),
            email: email.to_string(),
            expires_at: chrono::Utc::now().timestamp() + LOGIN_TOKEN_TTL_SECS,
        };
        self.store.put_login_token(&login_token).await?;

        let login_link = format!("{}/verify?token={}", self.frontend_url, token);
        let html = login_email_html(&login_link);
        self.mailer
            .send(email, "Your Pet Portrait Login Link", &html)
            .await?;

        tracing::info!(email = %email, "Login link dispatched");
        Ok(())
    }

    /// Direct login: issue a session with no email round-trip.
    pub async fn direct_login(&self, email: &str) -> Result<IssuedSession, AppError> {
        if !email.contains('@') {
            return Err(AppError::BadRequest("valid email required".to_string()));
        }

        self.ensure_user(email).await?;
        self.issue_session(email)
    }

    /// Exchange a one-time login token for a session credential.
    ///
    /// The token is consumed atomically on lookup, so a second verify with
    /// the same token always fails. Expired tokens are dropped here (lazy
    /// deletion) and reported distinctly.
    pub async fn verify(&self, token: &str) -> Result<IssuedSession, AppError> {
        let login_token = self
            .store
            .take_login_token(token)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if login_token.is_expired(chrono::Utc::now().timestamp()) {
            // Already removed by the take above
            return Err(AppError::TokenExpired);
        }

        self.ensure_user(&login_token.email).await?;
        self.issue_session(&login_token.email)
    }

    /// Lazily create the user on first successful verification.
    async fn ensure_user(&self, email: &str) -> Result<(), AppError> {
        if self.store.get_user(email).await?.is_none() {
            let user = User {
                email: email.to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
            };
            self.store.upsert_user(&user).await?;
            tracing::info!(email = %email, "New user created");
        }
        Ok(())
    }

    fn issue_session(&self, email: &str) -> Result<IssuedSession, AppError> {
        let token = create_session_token(email, &self.jwt_signing_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("session issuance failed: {}", e)))?;
        Ok(IssuedSession {
            token,
            email: email.to_string(),
        })
    }
}

/// Generate a 256-bit random login token, hex-encoded.
fn new_login_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Login email body with the clickable verification link.
fn login_email_html(login_link: &str) -> String {
    format!(
        "<h2>Your Login Link</h2>\
         <p>Click the link below to access your pet portrait app:</p>\
         <a href=\"{}\" style=\"padding: 10px 20px; background: #8b5cf6; \
         color: white; text-decoration: none; border-radius: 5px;\">\
         Login to Pet Portrait</a>\
         <p>This link expires in 15 minutes.</p>",
        login_link
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CapturingMailer {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Mailer for CapturingMailer {
        async fn send(&self, to: &str, _subject: &str, html: &str) -> Result<(), AppError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), html.to_string()));
            Ok(())
        }
    }

    fn service() -> (IdentityService, Arc<MemoryStore>, Arc<CapturingMailer>) {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(CapturingMailer {
            sent: Mutex::new(Vec::new()),
        });
        let identity = IdentityService::new(
            store.clone(),
            mailer.clone(),
            b"test_signing_key_32_bytes_long!!".to_vec(),
            "http://localhost:5173".to_string(),
        );
        (identity, store, mailer)
    }

    fn token_from_html(html: &str) -> String {
        let start = html.find("token=").unwrap() + "token=".len();
        html[start..start + 64].to_string()
    }

    #[tokio::test]
    async fn test_login_then_verify_yields_session_for_same_email() {
        let (identity, _store, mailer) = service();

        identity.request_login("a@x.com").await.unwrap();

        let html = mailer.sent.lock().unwrap()[0].1.clone();
        let token = token_from_html(&html);

        let session = identity.verify(&token).await.unwrap();
        assert_eq!(session.email, "a@x.com");
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn test_verify_consumes_token() {
        let (identity, _store, mailer) = service();
        identity.request_login("a@x.com").await.unwrap();
        let token = token_from_html(&mailer.sent.lock().unwrap()[0].1);

        identity.verify(&token).await.unwrap();
        let second = identity.verify(&token).await;
        assert!(matches!(second, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let (identity, store, _mailer) = service();

        let stale = LoginToken {
            token: "f".repeat(64),
            email: "a@x.com".to_string(),
            expires_at: chrono::Utc::now().timestamp() - 1,
        };
        store.put_login_token(&stale).await.unwrap();

        let result = identity.verify(&stale.token).await;
        assert!(matches!(result, Err(AppError::TokenExpired)));

        // Lazy deletion: the token is gone after the failed verify
        assert!(store
            .take_login_token(&stale.token)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_malformed_email_creates_no_token_and_sends_nothing() {
        let (identity, _store, mailer) = service();

        let result = identity.request_login("not-an-email").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_tokens_are_unique() {
        let (identity, _store, mailer) = service();
        identity.request_login("a@x.com").await.unwrap();
        identity.request_login("a@x.com").await.unwrap();

        let sent = mailer.sent.lock().unwrap();
        let first = token_from_html(&sent[0].1);
        let second = token_from_html(&sent[1].1);
        assert_ne!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[tokio::test]
    async fn test_direct_login_issues_session_without_mail() {
        let (identity, store, mailer) = service();

        let session = identity.direct_login("a@x.com").await.unwrap();
        assert_eq!(session.email, "a@x.com");
        assert!(mailer.sent.lock().unwrap().is_empty());
        assert!(store.get_user("a@x.com").await.unwrap().is_some());
    }
}
