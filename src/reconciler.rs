use std::sync::Arc;

use crate::domain::inbound_event::{InboundEvent, PayloadCode};
use crate::domain::phone_number::PhoneNumber;
use crate::domain::variant::Variant;
use crate::error::error_chain_fmt;
use crate::gateway::MessagingGateway;
use crate::store::{StoreError, SubscriberStore};

/// Applies inbound button presses to the store and answers through the
/// gateway. Re-running an event leaves the same final state, so the
/// provider's redeliveries are harmless.
pub struct Reconciler {
    store: Arc<dyn SubscriberStore>,
    gateway: Arc<dyn MessagingGateway>,
    variant: Variant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    InviteSent { delivered: bool },
    OptedIn { delivered: bool },
    OptedOut { delivered: bool },
    Ignored,
}

#[derive(thiserror::Error)]
pub enum ReconcileError {
    #[error("Failed to update subscription status.")]
    Store(#[from] StoreError),
}

impl std::fmt::Debug for ReconcileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn SubscriberStore>,
        gateway: Arc<dyn MessagingGateway>,
        variant: Variant,
    ) -> Self {
        Self {
            store,
            gateway,
            variant,
        }
    }

    #[tracing::instrument(
        name = "Reconciling an inbound event",
        skip(self, event),
        fields(
            payload = %event.code.as_ref(),
            from = %event.from
        )
    )]
    pub async fn reconcile(&self, event: InboundEvent) -> Result<Reconciliation, ReconcileError> {
        match &event.code {
            PayloadCode::ArxivRequest if self.variant.accepts_invite_requests() => {}
            PayloadCode::OptIn | PayloadCode::OptOut => {}
            code => {
                tracing::warn!("Ignoring unrecognized payload {}", code.as_ref());

                return Ok(Reconciliation::Ignored);
            }
        }

        let phone_number = match PhoneNumber::parse(event.from.clone()) {
            Ok(phone_number) => phone_number,
            Err(_) => {
                tracing::warn!(
                    "Ignoring {} from unsupported number {}",
                    event.code.as_ref(),
                    event.from
                );

                return Ok(Reconciliation::Ignored);
            }
        };

        match event.code {
            PayloadCode::ArxivRequest => {
                let delivered = self.gateway.send_opt_in_invite(&phone_number).await;

                Ok(Reconciliation::InviteSent { delivered })
            }
            PayloadCode::OptIn => {
                self.apply(&phone_number, true).await?;
                let delivered = self.gateway.send_verification(&phone_number).await;

                Ok(Reconciliation::OptedIn { delivered })
            }
            PayloadCode::OptOut => {
                self.apply(&phone_number, false).await?;
                let delivered = self
                    .gateway
                    .send_unsubscribe_confirmation(&phone_number)
                    .await;

                Ok(Reconciliation::OptedOut { delivered })
            }
            PayloadCode::Unrecognized(_) => Ok(Reconciliation::Ignored),
        }
    }

    async fn apply(&self, phone_number: &PhoneNumber, subscribed: bool) -> Result<(), StoreError> {
        if self.variant.upserts_on_webhook() {
            self.store
                .upsert_subscribed(phone_number, subscribed)
                .await?;
        } else if !self.store.set_subscribed(phone_number, subscribed).await? {
            tracing::warn!("No subscriber registered with number {}", phone_number);
            return Ok(());
        }

        tracing::info!(
            "User {} successfully {}",
            phone_number,
            if subscribed { "subscribed" } else { "unsubscribed" }
        );

        Ok(())
    }
}
