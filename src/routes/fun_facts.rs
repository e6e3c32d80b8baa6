use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::content_client::{ContentClient, FunFact};

const DEFAULT_COUNT: usize = 3;
const MAX_COUNT: usize = 10;

#[derive(Deserialize, Debug)]
pub struct FunFactsParameters {
    pub count: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiContentState {
    pub fun_facts: Vec<FunFact>,
    pub error: Option<Vec<String>>,
}

impl AiContentState {
    fn failure(message: String) -> Self {
        Self {
            fun_facts: vec![],
            error: Some(vec![message]),
        }
    }
}

#[tracing::instrument(name = "Generating fun facts handler", skip(content_client))]
pub async fn handle_get_fun_facts(
    parameters: web::Query<FunFactsParameters>,
    content_client: web::Data<ContentClient>,
) -> HttpResponse {
    let count = parameters.count.unwrap_or(DEFAULT_COUNT);

    if !(1..=MAX_COUNT).contains(&count) {
        return HttpResponse::BadRequest().json(AiContentState::failure(format!(
            "count must be between 1 and {}",
            MAX_COUNT
        )));
    }

    match content_client.generate_fun_facts(count).await {
        Ok(fun_facts) => HttpResponse::Ok().json(AiContentState {
            fun_facts,
            error: None,
        }),
        Err(err) => {
            tracing::error!("Failed to generate fun facts: {:?}", err);
            HttpResponse::InternalServerError()
                .json(AiContentState::failure(err.to_string()))
        }
    }
}
