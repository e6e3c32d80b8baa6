use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::domain::inbound_event::PayloadCode;
use crate::domain::phone_number::PhoneNumber;
use crate::domain::variant::Variant;
use crate::gateway::{Card, MessagingGateway, QuickReply};

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);
const API_KEY_HEADER: &str = "PINNACLE-API-KEY";

const ROSIE_THE_RACCOON: &str = "https://i.ibb.co/YcBFH32/IMG-3410.jpg";
const SAD_ROSIE_THE_RACCOON: &str = "https://i.ibb.co/nQxWmS1/raccoon.jpg";

/// HTTP client for the RCS provider's `POST /send/rcs` endpoint.
pub struct RcsClient {
    http_client: Client,
    base_url: String,
    sender: String,
    api_key: Secret<String>,
    variant: Variant,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRcsBody<'a> {
    from: &'a str,
    to: &'a str,
    cards: &'a [Card],
    quick_replies: Vec<QuickReply>,
}

impl RcsClient {
    pub fn new(
        base_url: String,
        sender: String,
        api_key: Secret<String>,
        variant: Variant,
        timeout: Option<time::Duration>,
    ) -> Result<RcsClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(RcsClient {
            http_client,
            base_url,
            sender,
            api_key,
            variant,
        })
    }

    pub async fn send_rcs(
        &self,
        recipient: &PhoneNumber,
        cards: &[Card],
        quick_replies: Vec<QuickReply>,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/send/rcs", self.base_url);
        let body = SendRcsBody {
            from: &self.sender,
            to: recipient.as_ref(),
            cards,
            quick_replies,
        };

        self.http_client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?; // return an error when server response status code is 4xx or 5xx

        Ok(())
    }

    async fn deliver(
        &self,
        kind: &str,
        recipient: &PhoneNumber,
        cards: &[Card],
        quick_replies: Vec<QuickReply>,
    ) -> bool {
        match self.send_rcs(recipient, cards, quick_replies).await {
            Ok(()) => {
                tracing::info!("RCS {} sent to {}", kind, recipient);
                true
            }
            Err(err) => {
                tracing::error!("Failed to send RCS {} to {}: {:?}", kind, recipient, err);
                false
            }
        }
    }
}

#[async_trait]
impl MessagingGateway for RcsClient {
    #[tracing::instrument(name = "Send an opt-in invite", skip(self), fields(to = %to))]
    async fn send_opt_in_invite(&self, to: &PhoneNumber) -> bool {
        let cards = [Card {
            title: self.variant.invite_title().to_string(),
            subtitle: Some("It'll be great--I promise ❤️".to_string()),
            media_url: Some(ROSIE_THE_RACCOON.to_string()),
        }];
        let quick_replies = vec![
            QuickReply::trigger("Yes, sign me up!", PayloadCode::OptIn),
            QuickReply::trigger("No, thanks", PayloadCode::OptOut),
        ];

        self.deliver("opt-in invite", to, &cards, quick_replies)
            .await
    }

    #[tracing::instrument(name = "Send a verification message", skip(self), fields(to = %to))]
    async fn send_verification(&self, to: &PhoneNumber) -> bool {
        let cards = [Card {
            title: "You're all set!".to_string(),
            subtitle: Some("You'll receive daily updates".to_string()),
            media_url: None,
        }];
        let quick_replies = vec![QuickReply::trigger("Opt out", PayloadCode::OptOut)];

        self.deliver("verification message", to, &cards, quick_replies)
            .await
    }

    #[tracing::instrument(name = "Send an unsubscribe confirmation", skip(self), fields(to = %to))]
    async fn send_unsubscribe_confirmation(&self, to: &PhoneNumber) -> bool {
        let cards = [Card {
            title: self.variant.unsubscribe_title().to_string(),
            subtitle: Some(
                "We're sorry to see you go! You can always resubscribe later.".to_string(),
            ),
            media_url: Some(SAD_ROSIE_THE_RACCOON.to_string()),
        }];
        let quick_replies = vec![QuickReply::trigger("Resubscribe", PayloadCode::OptIn)];

        self.deliver("unsubscribe confirmation", to, &cards, quick_replies)
            .await
    }

    #[tracing::instrument(name = "Send digest cards", skip(self, cards), fields(to = %to))]
    async fn send_cards(&self, to: &PhoneNumber, cards: &[Card]) -> bool {
        let quick_replies = vec![QuickReply::trigger("Opt out", PayloadCode::OptOut)];

        self.deliver("digest", to, cards, quick_replies).await
    }
}
