mod openai;

pub use openai::OpenAiEstimator;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Macro fields estimated for one food description. Values are passed through
/// to storage unrounded; display rounding is the client's concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroEstimate {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("nutrition model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("nutrition model returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("nutrition model returned an unusable response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait NutritionEstimator: Send + Sync {
    async fn estimate(&self, description: &str) -> Result<MacroEstimate, EstimatorError>;
}
