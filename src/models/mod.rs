// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod generation;
pub mod order;
pub mod product;
pub mod user;

pub use generation::{Generation, PetType};
pub use order::{Order, OrderMetadata, OrderStatus};
pub use product::ProductType;
pub use user::{LoginToken, User};
