use anyhow::{bail, ensure, Context};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::entries::dto::DeleteResponse;
use crate::entries::repo::FoodEntry;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the three `/logFood` verbs. Non-2xx responses surface the
/// body's `error` string so the controller can show it inline.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/logFood", self.base_url)
    }

    pub async fn log_food(
        &self,
        food: &str,
        user_id: &str,
        date: Option<&str>,
    ) -> anyhow::Result<FoodEntry> {
        let mut body = json!({ "food": food, "userId": user_id });
        if let Some(date) = date {
            body["date"] = json!(date);
        }
        let response = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .context("send logFood request")?;
        decode(response).await
    }

    pub async fn list_entries(&self, user_id: &str, date: &str) -> anyhow::Result<Vec<FoodEntry>> {
        let response = self
            .http
            .get(self.endpoint())
            .query(&[("userId", user_id), ("date", date)])
            .send()
            .await
            .context("send list request")?;
        decode(response).await
    }

    pub async fn delete_entry(&self, id: Uuid, user_id: &str) -> anyhow::Result<()> {
        let id = id.to_string();
        let response = self
            .http
            .delete(self.endpoint())
            .query(&[("id", id.as_str()), ("userId", user_id)])
            .send()
            .await
            .context("send delete request")?;
        let result: DeleteResponse = decode(response).await?;
        ensure!(result.success, "server reported an unsuccessful delete");
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> anyhow::Result<T> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.context("decode response body");
    }
    match response.json::<ErrorBody>().await {
        Ok(body) => bail!(body.error),
        Err(_) => bail!("request failed with status {status}"),
    }
}
