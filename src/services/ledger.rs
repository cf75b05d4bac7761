// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Order and generation ledgers.
//!
//! Ownership-scoped record keeping over the [`Store`] abstraction. Orders are
//! keyed by the payment provider's order ID for their entire lifecycle, and
//! capture transitions the pending record in place; no second record is ever
//! allocated for a paid order.

use crate::db::Store;
use crate::error::AppError;
use crate::models::{Generation, Order, OrderMetadata, OrderStatus, PetType};
use std::sync::Arc;

/// Outcome of a capture attempt against the ledger.
pub enum CaptureState {
    /// Order was pending; caller should settle with the provider and then
    /// call [`OrderLedger::mark_paid`].
    Pending(Order),
    /// Order was already paid; the stored record is returned unchanged so
    /// repeated captures are safe.
    AlreadyPaid(Order),
}

#[derive(Clone)]
pub struct OrderLedger {
    store: Arc<dyn Store>,
}

impl OrderLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Record a pending order under the provider's order ID.
    pub async fn create_pending(
        &self,
        owner_email: &str,
        provider_order_id: &str,
        metadata: OrderMetadata,
    ) -> Result<Order, AppError> {
        let order = Order {
            id: provider_order_id.to_string(),
            email: owner_email.to_string(),
            metadata,
            status: OrderStatus::Pending,
            amount: None,
            capture_id: None,
            created_at: chrono::Utc::now().to_rfc3339(),
            fulfillment_status: None,
        };
        self.store.put_order(&order).await?;
        Ok(order)
    }

    /// Ownership-checked lookup for a capture attempt.
    ///
    /// Callers must consult the returned state before talking to the payment
    /// provider: an `AlreadyPaid` order must not be charged again.
    pub async fn begin_capture(
        &self,
        provider_order_id: &str,
        caller_email: &str,
    ) -> Result<CaptureState, AppError> {
        let order = self.get(provider_order_id, caller_email).await?;
        Ok(match order.status {
            OrderStatus::Paid => CaptureState::AlreadyPaid(order),
            OrderStatus::Pending => CaptureState::Pending(order),
        })
    }

    /// Transition a pending order to paid, in place.
    ///
    /// Idempotent: if the order is already paid (for example a concurrent
    /// capture won the race), the stored record is returned unchanged.
    pub async fn mark_paid(
        &self,
        provider_order_id: &str,
        caller_email: &str,
        amount: Option<String>,
        capture_id: Option<String>,
    ) -> Result<Order, AppError> {
        let mut order = self.get(provider_order_id, caller_email).await?;

        if order.status == OrderStatus::Paid {
            return Ok(order);
        }

        order.status = OrderStatus::Paid;
        order.amount = amount;
        order.capture_id = capture_id;
        order.fulfillment_status = Some("pending".to_string());
        self.store.put_order(&order).await?;

        tracing::info!(order_id = %order.id, "Order captured");
        Ok(order)
    }

    /// Ownership-scoped fetch.
    pub async fn get(&self, order_id: &str, caller_email: &str) -> Result<Order, AppError> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("order {} not found", order_id)))?;

        if order.email != caller_email {
            return Err(AppError::Forbidden);
        }
        Ok(order)
    }

    /// All of the caller's orders, newest first.
    pub async fn list(&self, caller_email: &str) -> Result<Vec<Order>, AppError> {
        let mut orders = self.store.list_orders_by_owner(caller_email).await?;
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(orders)
    }
}

/// Attributes for a new generation record.
pub struct NewGeneration {
    pub pet_name: String,
    pub pet_type: PetType,
    pub style: String,
    pub uploaded_image_path: String,
    pub portrait_url: String,
    pub portrait_path: String,
}

#[derive(Clone)]
pub struct GenerationLedger {
    store: Arc<dyn Store>,
}

impl GenerationLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Record a completed generation under a fresh opaque ID.
    pub async fn record(
        &self,
        owner_email: &str,
        attributes: NewGeneration,
    ) -> Result<Generation, AppError> {
        let generation = Generation {
            id: format!("gen-{}", uuid::Uuid::new_v4()),
            email: owner_email.to_string(),
            pet_name: attributes.pet_name,
            pet_type: attributes.pet_type,
            style: attributes.style,
            uploaded_image_path: attributes.uploaded_image_path,
            portrait_url: attributes.portrait_url,
            portrait_path: attributes.portrait_path,
            created_at: chrono::Utc::now().to_rfc3339(),
            status: "ready".to_string(),
        };
        self.store.put_generation(&generation).await?;
        Ok(generation)
    }

    /// Ownership-scoped fetch.
    pub async fn get(&self, id: &str, caller_email: &str) -> Result<Generation, AppError> {
        let generation = self
            .store
            .get_generation(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("generation {} not found", id)))?;

        if generation.email != caller_email {
            return Err(AppError::Forbidden);
        }
        Ok(generation)
    }

    /// All of the caller's generations, newest first.
    pub async fn list(&self, caller_email: &str) -> Result<Vec<Generation>, AppError> {
        let mut generations = self.store.list_generations_by_owner(caller_email).await?;
        generations.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(generations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::ProductType;

    fn metadata() -> OrderMetadata {
        OrderMetadata {
            generation_id: "gen-1".to_string(),
            pet_name: "Rex".to_string(),
            product_type: ProductType::Mug,
            variant: "11oz".to_string(),
            quantity: 1,
        }
    }

    fn ledgers() -> (OrderLedger, GenerationLedger, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (
            OrderLedger::new(store.clone()),
            GenerationLedger::new(store.clone()),
            store,
        )
    }

    #[tokio::test]
    async fn test_capture_transitions_pending_record_in_place() {
        let (orders, _, _) = ledgers();
        orders
            .create_pending("a@x.com", "PAYPAL-1", metadata())
            .await
            .unwrap();

        let paid = orders
            .mark_paid(
                "PAYPAL-1",
                "a@x.com",
                Some("29.99".to_string()),
                Some("CAP-1".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(paid.id, "PAYPAL-1");
        assert_eq!(paid.status, OrderStatus::Paid);
        assert_eq!(paid.amount.as_deref(), Some("29.99"));
        assert_eq!(paid.fulfillment_status.as_deref(), Some("pending"));
    }

    #[tokio::test]
    async fn test_capture_is_idempotent() {
        let (orders, _, _) = ledgers();
        orders
            .create_pending("a@x.com", "PAYPAL-1", metadata())
            .await
            .unwrap();

        let first = orders
            .mark_paid(
                "PAYPAL-1",
                "a@x.com",
                Some("29.99".to_string()),
                Some("CAP-1".to_string()),
            )
            .await
            .unwrap();

        // Second capture attempt short-circuits before any provider call
        match orders.begin_capture("PAYPAL-1", "a@x.com").await.unwrap() {
            CaptureState::AlreadyPaid(order) => {
                assert_eq!(order.capture_id, first.capture_id);
                assert_eq!(order.amount, first.amount);
            }
            CaptureState::Pending(_) => panic!("order should already be paid"),
        }

        // And mark_paid on a paid order never overwrites the settled values
        let second = orders
            .mark_paid(
                "PAYPAL-1",
                "a@x.com",
                Some("59.98".to_string()),
                Some("CAP-2".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(second.capture_id.as_deref(), Some("CAP-1"));

        // Still exactly one record
        assert_eq!(orders.list("a@x.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_capture_by_non_owner_is_forbidden() {
        let (orders, _, _) = ledgers();
        orders
            .create_pending("a@x.com", "PAYPAL-1", metadata())
            .await
            .unwrap();

        let result = orders.begin_capture("PAYPAL-1", "b@y.com").await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let (orders, _, _) = ledgers();
        let result = orders.get("PAYPAL-404", "a@x.com").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_lists_are_newest_first() {
        let (orders, generations, store) = ledgers();

        for (id, created_at) in [
            ("PAYPAL-1", "2026-08-01T10:00:00+00:00"),
            ("PAYPAL-2", "2026-08-03T10:00:00+00:00"),
            ("PAYPAL-3", "2026-08-02T10:00:00+00:00"),
        ] {
            let mut order = orders
                .create_pending("a@x.com", id, metadata())
                .await
                .unwrap();
            order.created_at = created_at.to_string();
            store.put_order(&order).await.unwrap();
        }

        let listed = orders.list("a@x.com").await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["PAYPAL-2", "PAYPAL-3", "PAYPAL-1"]);

        for (name, created_at) in [
            ("first", "2026-08-01T10:00:00+00:00"),
            ("second", "2026-08-05T10:00:00+00:00"),
        ] {
            let mut generation = generations
                .record(
                    "a@x.com",
                    NewGeneration {
                        pet_name: name.to_string(),
                        pet_type: PetType::Cat,
                        style: "renaissance".to_string(),
                        uploaded_image_path: String::new(),
                        portrait_url: String::new(),
                        portrait_path: String::new(),
                    },
                )
                .await
                .unwrap();
            generation.created_at = created_at.to_string();
            store.put_generation(&generation).await.unwrap();
        }

        let listed = generations.list("a@x.com").await.unwrap();
        assert_eq!(listed[0].pet_name, "second");
        assert_eq!(listed[1].pet_name, "first");
    }

    #[tokio::test]
    async fn test_generation_ownership() {
        let (_, generations, _) = ledgers();
        let generation = generations
            .record(
                "a@x.com",
                NewGeneration {
                    pet_name: "Rex".to_string(),
                    pet_type: PetType::Dog,
                    style: "renaissance".to_string(),
                    uploaded_image_path: String::new(),
                    portrait_url: String::new(),
                    portrait_path: String::new(),
                },
            )
            .await
            .unwrap();

        assert!(generations.get(&generation.id, "a@x.com").await.is_ok());
        assert!(matches!(
            generations.get(&generation.id, "b@y.com").await,
            Err(AppError::Forbidden)
        ));
    }
}
