use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};

use crate::domain::inbound_event::{InboundEvent, InboundEventError, InboundMessage};
use crate::error::error_chain_fmt;
use crate::reconciler::{ReconcileError, Reconciler};
use crate::routes::StatusBody;

/// Provider callback for button presses. Unrecognized payloads are still
/// acknowledged with 200 so the provider does not keep redelivering them.
#[tracing::instrument(name = "Handling an RCS webhook", skip(body, reconciler))]
pub async fn handle_rcs_webhook(
    body: web::Bytes,
    reconciler: web::Data<Reconciler>,
) -> Result<HttpResponse, WebhookError> {
    let message: InboundMessage = serde_json::from_slice(&body)?;
    let event: InboundEvent = message.try_into()?;

    tracing::info!("Received postback: {:?}", event);

    reconciler.reconcile(event).await?;

    Ok(HttpResponse::Ok().json(StatusBody::success("Postback received and processed")))
}

#[derive(thiserror::Error)]
pub enum WebhookError {
    #[error("Invalid webhook payload")]
    MalformedPayload(#[from] serde_json::Error),
    #[error(transparent)]
    Rejected(#[from] InboundEventError),
    #[error("Internal server error")]
    Reconcile(#[from] ReconcileError),
}

impl std::fmt::Debug for WebhookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            WebhookError::Rejected(_) => StatusCode::BAD_REQUEST,
            WebhookError::Reconcile(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!("Error processing request: {:?}", self);

        HttpResponse::build(self.status_code()).json(StatusBody::failure(self.to_string()))
    }
}
