pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::phone_number::PhoneNumber;
use crate::domain::subscriber::Subscriber;
use crate::error::error_chain_fmt;

pub use memory::InMemorySubscriberStore;
pub use postgres::PostgresSubscriberStore;

/// Subscribers keyed by phone number. Every write is a single statement, so
/// concurrent callers never observe a half-applied change.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn find(&self, phone_number: &PhoneNumber) -> Result<Option<Subscriber>, StoreError>;

    /// Inserts an unsubscribed record. Returns `false`, writing nothing, when
    /// the number is already present.
    async fn insert_if_absent(&self, new_subscriber: &NewSubscriber) -> Result<bool, StoreError>;

    /// Inserts or overwrites name and subscription flag.
    async fn upsert(
        &self,
        new_subscriber: &NewSubscriber,
        subscribed: bool,
    ) -> Result<(), StoreError>;

    /// Updates an existing record. Returns `false` when there is none.
    async fn set_subscribed(
        &self,
        phone_number: &PhoneNumber,
        subscribed: bool,
    ) -> Result<bool, StoreError>;

    /// Updates the flag, creating a nameless record when needed.
    async fn upsert_subscribed(
        &self,
        phone_number: &PhoneNumber,
        subscribed: bool,
    ) -> Result<(), StoreError>;

    async fn list_subscribed(&self) -> Result<Vec<Subscriber>, StoreError>;
}

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("Failed to execute the subscribers query.")]
    Database(#[from] sqlx::Error),
    #[error("Stored subscriber is invalid: {0}")]
    Corrupted(String),
    #[error("Subscriber store is unavailable.")]
    Unavailable,
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
