// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Checkout and order routes.
//!
//! An order is keyed by the payment provider's order ID from creation
//! onward, so the capture callback can look it up with the ID the provider
//! echoes back. Capture transitions the pending record in place and is safe
//! to repeat.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::product::{ProductType, UNIT_PRICE};
use crate::models::{Order, OrderMetadata};
use crate::services::ledger::CaptureState;
use crate::services::paypal::CheckoutItem;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/payment/checkout", post(checkout))
        .route("/payment/capture/{order_id}", post(capture))
        .route("/payment/orders/{order_id}", get(get_order))
        .route("/payment/orders", get(list_orders))
}

fn default_quantity() -> u32 {
    1
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[validate(length(min = 1))]
    pub generation_id: String,
    #[validate(length(min = 1, max = 100))]
    pub pet_name: String,
    pub product_type: String,
    #[validate(length(min = 1, max = 50))]
    pub variant: String,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = 10))]
    pub quantity: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: String,
    pub approval_url: String,
}

/// Create a provider order and record it as pending.
async fn checkout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let product = ProductType::parse(&request.product_type)
        .ok_or_else(|| AppError::BadRequest("invalid product type".to_string()))?;

    // The caller must own the generation being printed
    state
        .generations
        .get(&request.generation_id, &user.email)
        .await?;

    let total = total_amount(request.quantity);
    let item = CheckoutItem {
        name: format!("{} - {}", request.pet_name, product.as_str()),
        description: format!("{} - Renaissance-style pet portrait", request.variant),
        sku: format!("portrait-{}-{}", product.as_str(), request.variant),
        unit_amount: UNIT_PRICE.to_string(),
        quantity: request.quantity,
        total_amount: total,
        custom_id: request.generation_id.clone(),
    };

    let return_url = format!("{}/order-success", state.config.frontend_url);
    let cancel_url = format!("{}/products", state.config.frontend_url);

    let approval = state
        .payments
        .create_order(&item, &return_url, &cancel_url)
        .await?;

    // Ledger key is the provider's order ID, not a locally generated one
    state
        .orders
        .create_pending(
            &user.email,
            &approval.order_id,
            OrderMetadata {
                generation_id: request.generation_id,
                pet_name: request.pet_name,
                product_type: product,
                variant: request.variant,
                quantity: request.quantity,
            },
        )
        .await?;

    Ok(Json(CheckoutResponse {
        order_id: approval.order_id,
        approval_url: approval.approval_url,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    pub success: bool,
    pub order_id: String,
    pub message: String,
}

/// Capture an approved order.
async fn capture(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(order_id): Path<String>,
) -> Result<Json<CaptureResponse>> {
    // Ownership and idempotency checks come before any provider call
    let pending = match state.orders.begin_capture(&order_id, &user.email).await? {
        CaptureState::AlreadyPaid(order) => {
            return Ok(Json(CaptureResponse {
                success: true,
                order_id: order.id,
                message: "Payment already captured".to_string(),
            }));
        }
        CaptureState::Pending(order) => order,
    };

    let result = state.payments.capture_order(&order_id).await?;
    if !result.is_completed() {
        return Err(AppError::Provider(format!(
            "order capture failed with status: {}",
            result.status
        )));
    }

    let amount = result
        .amount
        .unwrap_or_else(|| total_amount(pending.metadata.quantity));
    let order = state
        .orders
        .mark_paid(&order_id, &user.email, Some(amount), result.capture_id)
        .await?;

    // Confirmation email is best effort; the payment already settled
    if let Err(e) = send_confirmation(&state, &order).await {
        tracing::warn!(error = %e, order_id = %order.id, "Failed to send confirmation email");
    }

    Ok(Json(CaptureResponse {
        success: true,
        order_id: order.id,
        message: "Payment captured successfully".to_string(),
    }))
}

async fn send_confirmation(state: &Arc<AppState>, order: &Order) -> Result<()> {
    let amount = order.amount.as_deref().unwrap_or(UNIT_PRICE);
    let html = format!(
        "<h2>Order Confirmed!</h2>\
         <p>Your pet portrait {product} order has been received and paid.</p>\
         <p><strong>Order ID:</strong> {id}</p>\
         <p><strong>Pet Name:</strong> {pet}</p>\
         <p><strong>Amount:</strong> ${amount}</p>\
         <p>We'll print and ship your Renaissance-style portrait soon!</p>\
         <p>Track your order: {frontend}/orders/{id}</p>",
        product = order.metadata.product_type.as_str(),
        id = order.id,
        pet = order.metadata.pet_name,
        amount = amount,
        frontend = state.config.frontend_url,
    );
    state
        .mailer
        .send(&order.email, "Order Confirmation - Pet Portrait", &html)
        .await
}

/// Get one order (ownership-scoped).
async fn get_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(order_id): Path<String>,
) -> Result<Json<Order>> {
    let order = state.orders.get(&order_id, &user.email).await?;
    Ok(Json(order))
}

/// List the caller's orders, newest first.
async fn list_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Order>>> {
    let orders = state.orders.list(&user.email).await?;
    Ok(Json(orders))
}

/// Flat $29.99 per item.
fn total_amount(quantity: u32) -> String {
    format!("{:.2}", 29.99 * quantity as f64)
}
