//! Storage layer.
//!
//! Route logic talks to the [`Store`] trait only; the shipped backend is the
//! DashMap-based [`MemoryStore`]. A durable backend slots in behind the same
//! trait without touching handlers.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{Generation, LoginToken, Order, User};
use async_trait::async_trait;

/// Typed storage operations, one group per entity.
///
/// All operations must be safe under concurrent access from multiple
/// simultaneous requests; per-key reads and writes are atomic, no multi-key
/// transaction is required.
#[async_trait]
pub trait Store: Send + Sync {
    // ─── Login Tokens ────────────────────────────────────────────

    /// Store a pending login token.
    async fn put_login_token(&self, token: &LoginToken) -> Result<(), AppError>;

    /// Remove and return a pending login token. Single atomic take, so a
    /// token can only ever be consumed once.
    async fn take_login_token(&self, token: &str) -> Result<Option<LoginToken>, AppError>;

    // ─── Users ───────────────────────────────────────────────────

    /// Get a user by email.
    async fn get_user(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Create or update a user.
    async fn upsert_user(&self, user: &User) -> Result<(), AppError>;

    // ─── Generations ─────────────────────────────────────────────

    /// Store a generation record (insert or overwrite by ID).
    async fn put_generation(&self, generation: &Generation) -> Result<(), AppError>;

    /// Get a generation by ID.
    async fn get_generation(&self, id: &str) -> Result<Option<Generation>, AppError>;

    /// All generations owned by an email, in unspecified order.
    async fn list_generations_by_owner(&self, email: &str) -> Result<Vec<Generation>, AppError>;

    // ─── Orders ──────────────────────────────────────────────────

    /// Store an order (insert or overwrite by ID).
    async fn put_order(&self, order: &Order) -> Result<(), AppError>;

    /// Get an order by its provider order ID.
    async fn get_order(&self, id: &str) -> Result<Option<Order>, AppError>;

    /// All orders owned by an email, in unspecified order.
    async fn list_orders_by_owner(&self, email: &str) -> Result<Vec<Order>, AppError>;
}

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const LOGIN_TOKENS: &str = "login_tokens";
    pub const GENERATIONS: &str = "generations";
    pub const ORDERS: &str = "orders";
}
