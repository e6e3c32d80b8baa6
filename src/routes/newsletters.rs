use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::error::error_chain_fmt;
use crate::gateway::{Card, MessagingGateway};
use crate::store::{StoreError, SubscriberStore};

#[derive(Deserialize, Debug)]
pub struct NewNewsletter {
    pub cards: Vec<NewsletterCard>,
}

#[derive(Deserialize, Debug)]
pub struct NewsletterCard {
    pub title: String,
    pub subtitle: String,
    pub media_url: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct PublishReport {
    pub delivered: usize,
    pub failed: usize,
}

#[tracing::instrument(
    name = "Publishing a newsletter to all subscribers",
    skip(body, store, gateway),
    fields(cards = body.cards.len())
)]
pub async fn publish_newsletter(
    body: web::Json<NewNewsletter>,
    store: web::Data<dyn SubscriberStore>,
    gateway: web::Data<dyn MessagingGateway>,
) -> Result<HttpResponse, PublishNewsletterError> {
    if body.cards.is_empty() {
        return Err(PublishNewsletterError::EmptyNewsletter);
    }

    let cards: Vec<Card> = body
        .into_inner()
        .cards
        .into_iter()
        .map(|card| Card {
            title: card.title,
            subtitle: Some(card.subtitle),
            media_url: card.media_url,
        })
        .collect();
    let subscribers = store
        .list_subscribed()
        .await
        .map_err(PublishNewsletterError::GetSubscribersError)?;

    // Each send is fire-and-forget; failures are only counted
    let outcomes = futures::future::join_all(
        subscribers
            .iter()
            .map(|subscriber| gateway.send_cards(&subscriber.phone_number, &cards)),
    )
    .await;
    let delivered = outcomes.iter().filter(|delivered| **delivered).count();
    let report = PublishReport {
        delivered,
        failed: outcomes.len() - delivered,
    };

    tracing::info!("Newsletter published: {:?}", report);

    Ok(HttpResponse::Ok().json(report))
}

#[derive(thiserror::Error)]
pub enum PublishNewsletterError {
    #[error("A newsletter needs at least one card.")]
    EmptyNewsletter,
    #[error("Failed to get subscribers from the database.")]
    GetSubscribersError(#[source] StoreError),
}

impl std::fmt::Debug for PublishNewsletterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for PublishNewsletterError {
    fn status_code(&self) -> StatusCode {
        match self {
            PublishNewsletterError::EmptyNewsletter => StatusCode::BAD_REQUEST,
            PublishNewsletterError::GetSubscribersError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
