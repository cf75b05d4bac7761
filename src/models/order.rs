//! Order records for the payment ledger.

use crate::models::product::ProductType;
use serde::{Deserialize, Serialize};

/// Two-state order lifecycle: checkout creates `Pending`, capture moves the
/// same record to `Paid`. Nothing further is modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
}

/// Checkout details carried on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMetadata {
    pub generation_id: String,
    pub pet_name: String,
    pub product_type: ProductType,
    pub variant: String,
    pub quantity: u32,
}

/// A purchase order.
///
/// Keyed by the payment provider's order ID for its entire lifecycle, so the
/// capture callback can look it up directly with the ID the provider echoes
/// back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Provider order ID (also the document ID)
    pub id: String,
    /// Owner email; the only identity allowed to read or capture this order
    pub email: String,
    pub metadata: OrderMetadata,
    pub status: OrderStatus,
    /// Settled amount, recorded at capture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Provider capture (transaction) ID, recorded at capture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_id: Option<String>,
    /// Creation instant (RFC 3339)
    pub created_at: String,
    /// Fulfillment placeholder, set to "pending" at capture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_status: Option<String>,
}
