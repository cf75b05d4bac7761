// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pet Portrait API Server
//!
//! Backend for the pet-portrait commerce flow: email login, portrait
//! generation, print-product catalog, checkout and order tracking.

use pet_portrait_api::{
    config::Config,
    db::MemoryStore,
    services::{
        GenerationLedger, HttpMailer, IdentityService, OpenAiImageClient, OrderLedger,
        PayPalClient, PrintifyClient,
    },
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, mode = ?config.login_mode, "Starting Pet Portrait API");

    // Make sure the upload directory exists before the first request
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // Storage: in-memory store behind the Store trait
    let store: Arc<dyn pet_portrait_api::db::Store> = Arc::new(MemoryStore::new());

    // Provider clients
    let mailer = Arc::new(HttpMailer::new(
        config.mail_api_url.clone(),
        config.mail_api_key.clone(),
        config.mail_from.clone(),
    ));
    let images = Arc::new(OpenAiImageClient::new(
        config.openai_api_url.clone(),
        config.openai_api_key.clone(),
    ));
    let payments = Arc::new(PayPalClient::new(
        config.paypal_api_url.clone(),
        config.paypal_client_id.clone(),
        config.paypal_client_secret.clone(),
    ));
    let fulfiller = Arc::new(PrintifyClient::new(
        config.printify_api_url.clone(),
        config.printify_api_key.clone(),
        config.printify_shop_id.clone(),
    ));

    let identity = IdentityService::new(
        store.clone(),
        mailer.clone(),
        config.jwt_signing_key.clone(),
        config.frontend_url.clone(),
    );

    // Build shared state
    let state = Arc::new(AppState {
        orders: OrderLedger::new(store.clone()),
        generations: GenerationLedger::new(store.clone()),
        identity,
        store,
        images,
        payments,
        fulfiller,
        mailer,
        config: config.clone(),
    });

    // Build router
    let app = pet_portrait_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pet_portrait_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
