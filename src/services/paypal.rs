// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PayPal checkout client.
//!
//! Handles:
//! - OAuth client-credentials token fetch (per call; PayPal tokens are cheap
//!   and this avoids refresh bookkeeping)
//! - Order creation with a single purchase unit
//! - Order capture

use crate::error::AppError;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One line item to charge for.
#[derive(Debug, Clone)]
pub struct CheckoutItem {
    /// Item display name, e.g. "Rex - canvas-print"
    pub name: String,
    pub description: String,
    pub sku: String,
    /// Unit price as a decimal string, e.g. "29.99"
    pub unit_amount: String,
    pub quantity: u32,
    /// Total for the purchase unit (unit price x quantity)
    pub total_amount: String,
    /// Correlation ID carried on the purchase unit (the generation ID)
    pub custom_id: String,
}

/// Provider order created at checkout.
#[derive(Debug, Clone)]
pub struct CheckoutApproval {
    /// Provider order ID; the ledger key for the order's whole lifecycle
    pub order_id: String,
    /// Where to send the buyer to approve payment
    pub approval_url: String,
}

/// Outcome of a capture call.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// Provider capture status, "COMPLETED" on success
    pub status: String,
    /// Settled amount, if the provider reported one
    pub amount: Option<String>,
    /// Provider capture (transaction) ID
    pub capture_id: Option<String>,
}

impl CaptureResult {
    pub fn is_completed(&self) -> bool {
        self.status == "COMPLETED"
    }
}

/// Payment capability: create an order for approval, then capture it.
#[async_trait::async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_order(
        &self,
        item: &CheckoutItem,
        return_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutApproval, AppError>;

    async fn capture_order(&self, provider_order_id: &str) -> Result<CaptureResult, AppError>;
}

/// PayPal REST client.
pub struct PayPalClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Deserialize)]
struct Link {
    rel: String,
    href: String,
}

#[derive(Deserialize)]
struct CaptureResponse {
    status: String,
    #[serde(default)]
    purchase_units: Vec<CapturePurchaseUnit>,
}

#[derive(Deserialize)]
struct CapturePurchaseUnit {
    payments: Option<CapturePayments>,
}

#[derive(Deserialize)]
struct CapturePayments {
    #[serde(default)]
    captures: Vec<Capture>,
}

#[derive(Deserialize)]
struct Capture {
    id: String,
    amount: Option<CaptureAmount>,
}

#[derive(Deserialize)]
struct CaptureAmount {
    value: String,
}

impl PayPalClient {
    pub fn new(base_url: String, client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            client_id,
            client_secret,
        }
    }

    /// Fetch an OAuth access token via client credentials.
    async fn access_token(&self) -> Result<String, AppError> {
        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.base_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .timeout(REQUEST_TIMEOUT)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("PayPal token request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Provider(format!(
                "PayPal token request returned {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("invalid PayPal token response: {}", e)))?;
        Ok(token.access_token)
    }

    async fn check_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "PayPal returned {}: {}",
                status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("invalid PayPal response: {}", e)))
    }
}

#[async_trait::async_trait]
impl PaymentProvider for PayPalClient {
    async fn create_order(
        &self,
        item: &CheckoutItem,
        return_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutApproval, AppError> {
        let access_token = self.access_token().await?;

        let body = serde_json::json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "currency_code": "USD",
                    "value": item.total_amount,
                    "breakdown": {
                        "item_total": { "currency_code": "USD", "value": item.total_amount }
                    }
                },
                "items": [{
                    "name": item.name,
                    "description": item.description,
                    "sku": item.sku,
                    "unit_amount": { "currency_code": "USD", "value": item.unit_amount },
                    "quantity": item.quantity.to_string(),
                    "category": "PHYSICAL_GOODS"
                }],
                "custom_id": item.custom_id,
                "description": item.description,
            }],
            "application_context": {
                "brand_name": "Pet Portrait Studio",
                "locale": "en-US",
                "landing_page": "BILLING",
                "user_action": "PAY_NOW",
                "return_url": return_url,
                "cancel_url": cancel_url,
            }
        });

        let response = self
            .http
            .post(format!("{}/v2/checkout/orders", self.base_url))
            .bearer_auth(&access_token)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("PayPal order create failed: {}", e)))?;

        let order: OrderResponse = self.check_json(response).await?;

        let approval_url = order
            .links
            .into_iter()
            .find(|link| link.rel == "approve")
            .map(|link| link.href)
            .ok_or_else(|| {
                AppError::Provider("PayPal order response missing approval link".to_string())
            })?;

        Ok(CheckoutApproval {
            order_id: order.id,
            approval_url,
        })
    }

    async fn capture_order(&self, provider_order_id: &str) -> Result<CaptureResult, AppError> {
        let access_token = self.access_token().await?;

        let response = self
            .http
            .post(format!(
                "{}/v2/checkout/orders/{}/capture",
                self.base_url, provider_order_id
            ))
            .bearer_auth(&access_token)
            .timeout(REQUEST_TIMEOUT)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("PayPal capture failed: {}", e)))?;

        let captured: CaptureResponse = self.check_json(response).await?;

        let capture = captured
            .purchase_units
            .into_iter()
            .next()
            .and_then(|unit| unit.payments)
            .and_then(|payments| payments.captures.into_iter().next());

        Ok(CaptureResult {
            status: captured.status,
            amount: capture
                .as_ref()
                .and_then(|c| c.amount.as_ref().map(|a| a.value.clone())),
            capture_id: capture.map(|c| c.id),
        })
    }
}
