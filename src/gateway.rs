use async_trait::async_trait;

use crate::domain::inbound_event::PayloadCode;
use crate::domain::phone_number::PhoneNumber;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

/// A button rendered under the cards. Tapping it makes the provider call the
/// webhook with `payload`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct QuickReply {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub payload: String,
}

impl QuickReply {
    pub fn trigger(title: &str, payload: PayloadCode) -> Self {
        Self {
            title: title.to_string(),
            kind: "trigger",
            payload: payload.as_ref().to_string(),
        }
    }
}

/// Outbound side of the subscription lifecycle. Sends never fail past this
/// boundary: `false` means delivery was not confirmed, and nobody retries.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send_opt_in_invite(&self, to: &PhoneNumber) -> bool;

    async fn send_verification(&self, to: &PhoneNumber) -> bool;

    async fn send_unsubscribe_confirmation(&self, to: &PhoneNumber) -> bool;

    async fn send_cards(&self, to: &PhoneNumber, cards: &[Card]) -> bool;
}
