// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic and provider clients.

pub mod identity;
pub mod ledger;
pub mod mailer;
pub mod paypal;
pub mod portrait;
pub mod printify;

pub use identity::{IdentityService, IssuedSession};
pub use ledger::{CaptureState, GenerationLedger, NewGeneration, OrderLedger};
pub use mailer::{HttpMailer, Mailer};
pub use paypal::{CaptureResult, CheckoutApproval, CheckoutItem, PayPalClient, PaymentProvider};
pub use portrait::{ImageGenerator, OpenAiImageClient};
pub use printify::{CreatedProduct, Fulfiller, PrintifyClient, ProductPayload};
