// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Print-product catalog and Printify pass-through routes.

use crate::error::{AppError, Result};
use crate::models::product::{
    ProductTemplate, ProductType, ProductVariant, UNIT_COST_CENTS, UNIT_PRICE_CENTS,
};
use crate::services::printify::{CreatedProduct, PayloadVariant, ProductImage, ProductPayload};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::middleware::auth::AuthUser;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/printify/products", get(list_products))
        .route("/printify/product/{product_type}", get(get_product))
        .route("/printify/create-product", post(create_product))
}

#[derive(Serialize)]
pub struct ProductListing {
    pub id: &'static str,
    #[serde(flatten)]
    pub template: ProductTemplate,
}

/// Available product types.
async fn list_products() -> Json<Vec<ProductListing>> {
    let products = ProductType::ALL
        .iter()
        .map(|product| ProductListing {
            id: product.as_str(),
            template: product.template(),
        })
        .collect();
    Json(products)
}

#[derive(Serialize)]
pub struct PricedVariant {
    #[serde(flatten)]
    pub variant: ProductVariant,
    pub price: &'static str,
    #[serde(rename = "shippingEstimate")]
    pub shipping_estimate: &'static str,
}

#[derive(Serialize)]
pub struct ProductDetails {
    #[serde(rename = "type")]
    pub product_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub variants: Vec<PricedVariant>,
}

/// Variants with display pricing for one product type.
async fn get_product(Path(product_type): Path<String>) -> Result<Json<ProductDetails>> {
    let product = ProductType::parse(&product_type)
        .ok_or_else(|| AppError::NotFound(format!("product type {} not found", product_type)))?;
    let template = product.template();

    Ok(Json(ProductDetails {
        product_type: product.as_str(),
        name: template.name,
        description: template.description,
        variants: template
            .variants
            .into_iter()
            .map(|variant| PricedVariant {
                variant,
                price: "$29.99",
                shipping_estimate: "5-7 business days",
            })
            .collect(),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[allow(dead_code)]
    pub generation_id: Option<String>,
    pub portrait_url: String,
    pub product_type: String,
    pub pet_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductResponse {
    pub success: bool,
    pub product_id: String,
    pub product: CreatedProduct,
}

/// Create a print product for a rendered portrait.
async fn create_product(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<CreateProductResponse>> {
    let product = ProductType::parse(&request.product_type)
        .ok_or_else(|| AppError::BadRequest("invalid product type".to_string()))?;
    let template = product.template();

    let payload = ProductPayload {
        title: format!(
            "{} - Renaissance Portrait ({})",
            request.pet_name, template.name
        ),
        description: template.description.to_string(),
        images: vec![ProductImage {
            src: request.portrait_url,
            position: "front".to_string(),
        }],
        variants: template
            .variants
            .iter()
            .map(|variant| PayloadVariant {
                title: variant.title.to_string(),
                sku: variant.sku.to_string(),
                price: UNIT_PRICE_CENTS,
                cost: UNIT_COST_CENTS,
            })
            .collect(),
    };

    let created = state.fulfiller.create_product(&payload).await?;

    Ok(Json(CreateProductResponse {
        success: true,
        product_id: created.id.clone(),
        product: created,
    }))
}
