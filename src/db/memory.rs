// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory [`Store`] backend.
//!
//! One `DashMap` per collection, keyed the same way a durable backend would
//! be: token ID, email, generation ID, provider order ID. Per-key operations
//! are atomic, which is all the ledgers require.

use crate::db::Store;
use crate::error::AppError;
use crate::models::{Generation, LoginToken, Order, User};
use async_trait::async_trait;
use dashmap::DashMap;

/// DashMap-backed store. Cheap to clone via `Arc` at the call sites; state
/// lives for the process lifetime only.
#[derive(Default)]
pub struct MemoryStore {
    login_tokens: DashMap<String, LoginToken>,
    users: DashMap<String, User>,
    generations: DashMap<String, Generation>,
    orders: DashMap<String, Order>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn put_login_token(&self, token: &LoginToken) -> Result<(), AppError> {
        self.login_tokens
            .insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn take_login_token(&self, token: &str) -> Result<Option<LoginToken>, AppError> {
        Ok(self.login_tokens.remove(token).map(|(_, value)| value))
    }

    async fn get_user(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn put_generation(&self, generation: &Generation) -> Result<(), AppError> {
        self.generations
            .insert(generation.id.clone(), generation.clone());
        Ok(())
    }

    async fn get_generation(&self, id: &str) -> Result<Option<Generation>, AppError> {
        Ok(self.generations.get(id).map(|entry| entry.value().clone()))
    }

    async fn list_generations_by_owner(&self, email: &str) -> Result<Vec<Generation>, AppError> {
        Ok(self
            .generations
            .iter()
            .filter(|entry| entry.email == email)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn put_order(&self, order: &Order) -> Result<(), AppError> {
        self.orders.insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn get_order(&self, id: &str) -> Result<Option<Order>, AppError> {
        Ok(self.orders.get(id).map(|entry| entry.value().clone()))
    }

    async fn list_orders_by_owner(&self, email: &str) -> Result<Vec<Order>, AppError> {
        Ok(self
            .orders
            .iter()
            .filter(|entry| entry.email == email)
            .map(|entry| entry.value().clone())
            .collect())
    }
}
