// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Printify product creation.
//!
//! When no API key is configured the client simulates creation with a local
//! product ID, which keeps local development independent of a real shop.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Product creation payload sent to the fulfillment provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPayload {
    pub title: String,
    pub description: String,
    pub images: Vec<ProductImage>,
    pub variants: Vec<PayloadVariant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductImage {
    pub src: String,
    pub position: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayloadVariant {
    pub title: String,
    pub sku: String,
    /// Retail price in cents
    pub price: u32,
    /// Print cost in cents
    pub cost: u32,
}

/// Provider's record of a created product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProduct {
    pub id: String,
    #[serde(flatten)]
    pub payload: ProductPayload,
    pub created_at: String,
    pub shop_id: String,
}

/// Print-on-demand fulfillment capability.
#[async_trait::async_trait]
pub trait Fulfiller: Send + Sync {
    async fn create_product(&self, payload: &ProductPayload) -> Result<CreatedProduct, AppError>;
}

/// Printify REST client.
pub struct PrintifyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    shop_id: String,
}

#[derive(Deserialize)]
struct PrintifyProductResponse {
    id: String,
}

impl PrintifyClient {
    pub fn new(base_url: String, api_key: String, shop_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            shop_id,
        }
    }
}

#[async_trait::async_trait]
impl Fulfiller for PrintifyClient {
    async fn create_product(&self, payload: &ProductPayload) -> Result<CreatedProduct, AppError> {
        let product_id = if self.api_key.is_empty() {
            // Simulated creation for local development
            tracing::info!(title = %payload.title, "Simulating Printify product creation");
            format!("prod-{}", uuid::Uuid::new_v4())
        } else {
            let response = self
                .http
                .post(format!(
                    "{}/shops/{}/products.json",
                    self.base_url, self.shop_id
                ))
                .bearer_auth(&self.api_key)
                .timeout(REQUEST_TIMEOUT)
                .json(payload)
                .send()
                .await
                .map_err(|e| AppError::Provider(format!("Printify request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                return Err(AppError::Provider(format!(
                    "Printify returned {}: {}",
                    status, text
                )));
            }

            let created: PrintifyProductResponse = response
                .json()
                .await
                .map_err(|e| AppError::Provider(format!("invalid Printify response: {}", e)))?;
            created.id
        };

        Ok(CreatedProduct {
            id: product_id,
            payload: payload.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
            shop_id: self.shop_id.clone(),
        })
    }
}
