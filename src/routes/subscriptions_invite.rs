use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::domain::phone_number::PhoneNumber;
use crate::gateway::MessagingGateway;
use crate::routes::StatusBody;

#[derive(Deserialize, Debug)]
pub struct InviteForm {
    pub number: String,
}

/// Sends (or re-sends) the opt-in card to a number. Independent from
/// registration so the page can offer "resend" after a failed delivery or a
/// duplicate signup.
#[tracing::instrument(
    name = "Sending an opt-in invite handler",
    skip(form, gateway),
    fields(number = %form.number)
)]
pub async fn handle_send_invite(
    form: web::Form<InviteForm>,
    gateway: web::Data<dyn MessagingGateway>,
) -> HttpResponse {
    let phone_number = match PhoneNumber::parse(form.into_inner().number) {
        Ok(phone_number) => phone_number,
        Err(err) => {
            tracing::error!("Validation error: {:?}", err);
            return HttpResponse::BadRequest().json(StatusBody::failure(err));
        }
    };

    if gateway.send_opt_in_invite(&phone_number).await {
        HttpResponse::Ok().json(StatusBody::success(format!(
            "Invite sent to {}",
            phone_number
        )))
    } else {
        HttpResponse::BadGateway().json(StatusBody::failure(format!(
            "Failed to send an invite to {}",
            phone_number
        )))
    }
}
