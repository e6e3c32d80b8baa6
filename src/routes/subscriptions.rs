use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    domain::new_subscriber::NewSubscriberForm,
    registration::{Registrar, RegistrationError},
};

/// State the signup form renders after a submission.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberState {
    pub message: Option<String>,
    pub is_registered: bool,
    pub error: Option<Vec<String>>,
}

#[tracing::instrument(
    name = "Creating a new subscriber handler",
    skip(form, registrar),
    fields(
        subscriber_number = %form.number,
        subscriber_name = %form.name
    )
)]
pub async fn handle_create_subscription(
    form: web::Form<NewSubscriberForm>,
    registrar: web::Data<Registrar>,
) -> HttpResponse {
    match registrar.register(form.into_inner()).await {
        Ok(phone_number) => HttpResponse::Ok().json(SubscriberState {
            message: Some(
                registrar
                    .variant()
                    .registration_message(phone_number.as_ref()),
            ),
            is_registered: true,
            error: None,
        }),
        Err(err) => {
            tracing::error!("Registration failed: {:?}", err);
            registration_failed(err)
        }
    }
}

fn registration_failed(err: RegistrationError) -> HttpResponse {
    let status = match err {
        RegistrationError::Validation(_) => StatusCode::BAD_REQUEST,
        RegistrationError::DuplicateSubscriber(_) => StatusCode::CONFLICT,
        RegistrationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    // Store errors only expose their top-level message, never the cause
    HttpResponse::build(status).json(SubscriberState {
        message: None,
        is_registered: false,
        error: Some(vec![err.to_string()]),
    })
}
