// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Pet Portrait API: backend for the pet-portrait commerce flow.
//!
//! This crate provides the backend API for portrait generation, print-product
//! catalog, checkout and order tracking, behind email-based login.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Store;
use services::{
    Fulfiller, GenerationLedger, IdentityService, ImageGenerator, Mailer, OrderLedger,
    PaymentProvider,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub identity: IdentityService,
    pub orders: OrderLedger,
    pub generations: GenerationLedger,
    pub images: Arc<dyn ImageGenerator>,
    pub payments: Arc<dyn PaymentProvider>,
    pub fulfiller: Arc<dyn Fulfiller>,
    pub mailer: Arc<dyn Mailer>,
}
