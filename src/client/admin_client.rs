use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::client::error::{ClientError, ClientResult};
use crate::client::model::Category;
use crate::shared::constants::CATEGORY_BASE_PATH;

/// Typed client for the category admin API.
///
/// Holds only the base URL and a pooled `reqwest::Client`, so one instance
/// can be shared across tasks.
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}{}/", self.base_url, CATEGORY_BASE_PATH)
    }

    fn item_url(&self, id: i32) -> String {
        format!("{}{}/{}", self.base_url, CATEGORY_BASE_PATH, id)
    }

    /// `None` when the provider answers with an empty body (204 for an
    /// unknown id)
    pub async fn get_category(&self, id: i32) -> ClientResult<Option<Category>> {
        let url = self.item_url(id);
        tracing::debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;
        read_json(response).await
    }

    pub async fn all_categories(&self) -> ClientResult<Option<Vec<Category>>> {
        let url = self.collection_url();
        tracing::debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;
        read_json(response).await
    }

    pub async fn add_category(&self, category: &Category) -> ClientResult<Category> {
        let url = self.collection_url();
        tracing::debug!("POST {} ({:?})", url, category.name);

        let response = self.http_client.post(&url).json(category).send().await?;
        let status = response.status();
        read_json(response)
            .await?
            .ok_or(ClientError::EmptyBody(status))
    }

    pub async fn update_category(&self, id: i32, category: &Category) -> ClientResult<Category> {
        let url = self.item_url(id);
        tracing::debug!("PUT {} ({:?})", url, category.name);

        let response = self.http_client.put(&url).json(category).send().await?;
        let status = response.status();
        read_json(response)
            .await?
            .ok_or(ClientError::EmptyBody(status))
    }

    pub async fn delete_category(&self, id: i32) -> ClientResult<()> {
        let url = self.item_url(id);
        tracing::debug!("DELETE {}", url);

        let response = self.http_client.delete(&url).send().await?;
        read_body(response).await.map(|_| ())
    }
}

/// Fails on non-2xx; otherwise the body text, `None` when blank
async fn read_body(response: Response) -> ClientResult<Option<String>> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ClientError::Status { status, body });
    }
    if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<Option<T>> {
    match read_body(response).await? {
        Some(body) => Ok(Some(serde_json::from_str(&body)?)),
        None => Ok(None),
    }
}
