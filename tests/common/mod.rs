// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test harness: app factory with an in-memory store and in-process
//! provider mocks.

use async_trait::async_trait;
use pet_portrait_api::config::{Config, LoginMode};
use pet_portrait_api::db::MemoryStore;
use pet_portrait_api::error::AppError;
use pet_portrait_api::routes::create_router;
use pet_portrait_api::services::{
    CaptureResult, CheckoutApproval, CheckoutItem, CreatedProduct, Fulfiller, GenerationLedger,
    IdentityService, ImageGenerator, Mailer, OrderLedger, PaymentProvider, ProductPayload,
};
use pet_portrait_api::AppState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// One captured outbound email.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Mailer that records sends instead of talking to a transport.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

impl RecordingMailer {
    /// Pull the login token out of the most recent magic-link email.
    pub fn last_login_token(&self) -> String {
        let sent = self.sent.lock().unwrap();
        let html = &sent.last().expect("no email was sent").html;
        let start = html.find("token=").expect("no token link in email") + "token=".len();
        html[start..start + 64].to_string()
    }
}

/// Image generator that renders nothing and returns a fixed URL.
pub struct MockImageGenerator;

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, AppError> {
        Ok("https://images.test/portrait-1024.png".to_string())
    }

    async fn download(&self, _url: &str) -> Result<Vec<u8>, AppError> {
        Ok(vec![0x89, 0x50, 0x4e, 0x47]) // PNG magic, close enough
    }
}

/// Payment provider handing out sequential order IDs and completing every
/// capture.
#[derive(Default)]
pub struct MockPaymentProvider {
    counter: AtomicU64,
    pub captures: AtomicU64,
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_order(
        &self,
        _item: &CheckoutItem,
        _return_url: &str,
        _cancel_url: &str,
    ) -> Result<CheckoutApproval, AppError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(CheckoutApproval {
            order_id: format!("PAYPAL-{}", n),
            approval_url: format!("https://paypal.test/approve/PAYPAL-{}", n),
        })
    }

    async fn capture_order(&self, _provider_order_id: &str) -> Result<CaptureResult, AppError> {
        let n = self.captures.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(CaptureResult {
            status: "COMPLETED".to_string(),
            amount: None,
            capture_id: Some(format!("CAP-{}", n)),
        })
    }
}

/// Fulfiller that always succeeds with a fixed product ID.
pub struct MockFulfiller;

#[async_trait]
impl Fulfiller for MockFulfiller {
    async fn create_product(&self, payload: &ProductPayload) -> Result<CreatedProduct, AppError> {
        Ok(CreatedProduct {
            id: "prod-test-1".to_string(),
            payload: payload.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
            shop_id: "shop-test".to_string(),
        })
    }
}

/// Everything a test needs to poke the app.
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub mailer: Arc<RecordingMailer>,
    pub payments: Arc<MockPaymentProvider>,
}

/// Create a test app with mocked providers and an in-memory store.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with_mode(LoginMode::MagicLink)
}

#[allow(dead_code)]
pub fn create_test_app_with_mode(login_mode: LoginMode) -> TestApp {
    let mut config = Config::test_default();
    config.login_mode = login_mode;
    // Isolate each app's uploads
    config.upload_dir = std::env::temp_dir()
        .join(format!("pet-portrait-test-{}", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();

    let store: Arc<dyn pet_portrait_api::db::Store> = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());
    let payments = Arc::new(MockPaymentProvider::default());

    let identity = IdentityService::new(
        store.clone(),
        mailer.clone(),
        config.jwt_signing_key.clone(),
        config.frontend_url.clone(),
    );

    let state = Arc::new(AppState {
        orders: OrderLedger::new(store.clone()),
        generations: GenerationLedger::new(store.clone()),
        identity,
        store,
        images: Arc::new(MockImageGenerator),
        payments: payments.clone(),
        fulfiller: Arc::new(MockFulfiller),
        mailer: mailer.clone(),
        config,
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        mailer,
        payments,
    }
}

/// Create a session JWT the way the identity service does.
#[allow(dead_code)]
pub fn make_session_token(email: &str, signing_key: &[u8]) -> String {
    pet_portrait_api::middleware::auth::create_session_token(email, signing_key)
        .expect("Failed to create session token")
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body was not JSON")
}
