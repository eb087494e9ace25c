use serde::{Deserialize, Serialize};

/// Body of POST /api/logFood. Fields are optional so that a missing one can
/// be answered with the exact message naming it rather than a decode error.
#[derive(Debug, Deserialize)]
pub struct LogFoodRequest {
    pub food: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}
