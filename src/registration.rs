use std::sync::Arc;

use crate::domain::new_subscriber::{NewSubscriber, NewSubscriberForm, ValidationError};
use crate::domain::phone_number::PhoneNumber;
use crate::domain::variant::Variant;
use crate::error::error_chain_fmt;
use crate::store::{StoreError, SubscriberStore};

/// Registers subscribers. It never sends messages: inviting a registered
/// number is a separate step so that delivery can be retried on its own.
pub struct Registrar {
    store: Arc<dyn SubscriberStore>,
    variant: Variant,
}

#[derive(thiserror::Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("User with phone number {0} is already registered")]
    DuplicateSubscriber(PhoneNumber),
    #[error("Failed to register user.")]
    Store(#[from] StoreError),
}

impl std::fmt::Debug for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl Registrar {
    pub fn new(store: Arc<dyn SubscriberStore>, variant: Variant) -> Self {
        Self { store, variant }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[tracing::instrument(
        name = "Registering a new subscriber",
        skip(self, form),
        fields(variant = self.variant.as_str())
    )]
    pub async fn register(
        &self,
        form: NewSubscriberForm,
    ) -> Result<PhoneNumber, RegistrationError> {
        let new_subscriber = NewSubscriber::try_from(form)?;

        if self.variant.rejects_duplicates() {
            let inserted = self.store.insert_if_absent(&new_subscriber).await?;

            if !inserted {
                return Err(RegistrationError::DuplicateSubscriber(
                    new_subscriber.phone_number,
                ));
            }
        } else {
            self.store.upsert(&new_subscriber, true).await?;
        }

        tracing::info!("User {} registered", new_subscriber.phone_number);

        Ok(new_subscriber.phone_number)
    }
}
