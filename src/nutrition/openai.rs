use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use super::{EstimatorError, MacroEstimate, NutritionEstimator};
use crate::config::OpenAiConfig;

const SYSTEM_PROMPT: &str = "You are a nutrition assistant. Given a food description, \
analyze the food item and return valid JSON with keys: calories (number), protein (g), \
carbs (g), fats (g). Use reasoning to estimate accurate nutrition values based on typical \
serving sizes and food composition. Always return valid JSON format.";

/// Low temperature so repeated estimates for the same description stay close.
const TEMPERATURE: f64 = 0.1;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Schema the model is constrained to; exactly the four macro fields, all
/// required and non-negative.
fn estimate_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "calories": { "type": "number", "minimum": 0 },
            "protein": { "type": "number", "minimum": 0 },
            "carbs": { "type": "number", "minimum": 0 },
            "fats": { "type": "number", "minimum": 0 }
        },
        "required": ["calories", "protein", "carbs", "fats"],
        "additionalProperties": false
    })
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    strict: bool,
    schema: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

fn build_request(model: &str, description: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: format!("Nutrition facts for: \"{description}\""),
            },
        ],
        temperature: TEMPERATURE,
        response_format: ResponseFormat {
            kind: "json_schema",
            json_schema: JsonSchemaFormat {
                name: "nutrition_estimate",
                strict: true,
                schema: estimate_schema(),
            },
        },
    }
}

fn parse_estimate(content: &str) -> Result<MacroEstimate, EstimatorError> {
    let estimate: MacroEstimate = serde_json::from_str(content.trim())
        .map_err(|e| EstimatorError::Malformed(format!("invalid JSON: {e}")))?;
    for (name, value) in [
        ("calories", estimate.calories),
        ("protein", estimate.protein),
        ("carbs", estimate.carbs),
        ("fats", estimate.fats),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(EstimatorError::Malformed(format!(
                "field `{name}` is not a non-negative number"
            )));
        }
    }
    Ok(estimate)
}

#[derive(Clone)]
pub struct OpenAiEstimator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiEstimator {
    pub fn new(config: &OpenAiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl NutritionEstimator for OpenAiEstimator {
    async fn estimate(&self, description: &str) -> Result<MacroEstimate, EstimatorError> {
        let request = build_request(&self.model, description);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "nutrition model returned an error");
            return Err(EstimatorError::Api { status, body });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| {
                EstimatorError::Malformed("response contained no message content".to_string())
            })?;
        debug!(content = %content, "nutrition model response");

        parse_estimate(content)
    }
}
