use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde_json::json;
use std::time;

use crate::error::error_chain_fmt;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(60);
const IMAGE_SIZE: &str = "1024x1024";
const CATEGORIES_PER_PROMPT: usize = 3;

const RANDOM_CATEGORIES: [&str; 20] = [
    "animals",
    "astronomy",
    "architecture",
    "biology",
    "chemistry",
    "culinary history",
    "deep sea life",
    "dinosaurs",
    "geography",
    "geology",
    "human body",
    "inventions",
    "languages",
    "mathematics",
    "music",
    "oceans",
    "physics",
    "plants",
    "sports history",
    "weather",
];

/// Client for an OpenAI-compatible API producing fun facts and one
/// illustration per fact.
pub struct ContentClient {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
    chat_model: String,
    image_model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunFact {
    pub fact: String,
    pub img_src: Option<String>,
}

#[derive(thiserror::Error)]
pub enum ContentError {
    #[error("Failed to reach the content generation API.")]
    Request(#[from] reqwest::Error),
    #[error("Content generation API returned an unexpected response: {0}")]
    MalformedResponse(String),
}

impl std::fmt::Debug for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(serde::Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(serde::Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(serde::Deserialize)]
struct FunFactsContent {
    fun_facts: Vec<String>,
}

#[derive(serde::Deserialize)]
struct ImageGeneration {
    data: Vec<GeneratedImage>,
}

#[derive(serde::Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

impl ContentClient {
    pub fn new(
        base_url: String,
        api_key: Secret<String>,
        chat_model: String,
        image_model: String,
        timeout: Option<time::Duration>,
    ) -> Result<ContentClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(ContentClient {
            http_client,
            base_url,
            api_key,
            chat_model,
            image_model,
        })
    }

    #[tracing::instrument(name = "Generating fun facts", skip(self))]
    pub async fn generate_fun_facts(&self, count: usize) -> Result<Vec<FunFact>, ContentError> {
        let facts = self.generate_facts(count).await?;
        let images =
            futures::future::try_join_all(facts.iter().map(|fact| self.generate_image(fact)))
                .await?;

        Ok(facts
            .into_iter()
            .zip(images)
            .map(|(fact, img_src)| FunFact { fact, img_src })
            .collect())
    }

    async fn generate_facts(&self, count: usize) -> Result<Vec<String>, ContentError> {
        let (system_prompt, user_prompt) = prompts(count);
        let body = json!({
            "model": self.chat_model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ],
            "temperature": 1,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "fun_facts_schema",
                    "description": format!("A list of {} fun facts", count),
                    "schema": {
                        "type": "object",
                        "properties": {
                            "fun_facts": {
                                "type": "array",
                                "items": { "type": "string" },
                                "minItems": count,
                                "maxItems": count
                            }
                        },
                        "additionalProperties": false
                    }
                }
            }
        });

        let completion: ChatCompletion = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ContentError::MalformedResponse("no completion choices".into()))?;
        let parsed: FunFactsContent = serde_json::from_str(&content)
            .map_err(|err| ContentError::MalformedResponse(err.to_string()))?;

        if parsed.fun_facts.len() != count {
            return Err(ContentError::MalformedResponse(format!(
                "expected {} fun facts, got {}",
                count,
                parsed.fun_facts.len()
            )));
        }

        Ok(parsed.fun_facts)
    }

    async fn generate_image(&self, fact: &str) -> Result<Option<String>, ContentError> {
        let body = json!({
            "model": self.image_model,
            "prompt": format!(
                "Design an educational and realistic image for the following fun fact. Do not include text. Here is the fun fact: {}",
                fact
            ),
            "n": 1,
            "size": IMAGE_SIZE
        });

        let generation: ImageGeneration = self
            .http_client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(generation.data.into_iter().next().and_then(|image| image.url))
    }
}

fn prompts(count: usize) -> (String, String) {
    let mut rng = rand::thread_rng();
    let seed: f64 = rng.gen();
    let categories: Vec<&str> = RANDOM_CATEGORIES
        .choose_multiple(&mut rng, CATEGORIES_PER_PROMPT)
        .copied()
        .collect();

    let system_prompt = format!(
        "You will provide me with {} great fun facts in JSON format. I want you to provide me with fun facts that are educational and interesting and different from one another. Make sure to provide different fun facts every day based on the date and a random seed. Here are the random fun facts for {} with random seed {}:",
        count,
        Utc::now().format("%Y-%m-%d"),
        seed
    );
    let user_prompt = format!("Provide fun facts about {}", categories.join(", "));

    (system_prompt, user_prompt)
}
