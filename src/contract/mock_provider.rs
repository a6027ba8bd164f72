use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::contract::interactions::Interaction;
use crate::shared::constants::CATEGORY_BASE_PATH;

/// Stand-in provider that answers with the recorded responses of a contract.
///
/// A request matches an interaction when method and path are equal and, if
/// the interaction records a request body, the JSON bodies are equal.
/// Unmatched requests get a 500.
#[derive(Clone)]
pub struct MockProvider {
    interactions: Arc<Vec<Interaction>>,
    exercised: Arc<Mutex<Vec<bool>>>,
}

impl MockProvider {
    pub fn new(interactions: Vec<Interaction>) -> Self {
        let exercised = vec![false; interactions.len()];
        Self {
            interactions: Arc::new(interactions),
            exercised: Arc::new(Mutex::new(exercised)),
        }
    }

    pub fn router(&self) -> Router {
        Router::new().fallback(replay).with_state(self.clone())
    }

    /// Descriptions of the interactions no request has matched yet
    pub async fn unexercised(&self) -> Vec<String> {
        let exercised = self.exercised.lock().await;
        self.interactions
            .iter()
            .zip(exercised.iter())
            .filter(|(_, hit)| !**hit)
            .map(|(interaction, _)| interaction.description.clone())
            .collect()
    }

    fn find(&self, method: &Method, path: &str, body: Option<&Value>) -> Option<usize> {
        self.interactions.iter().position(|interaction| {
            let request = &interaction.request;
            request.method == *method
                && request.path == path
                && match &request.body {
                    Some(expected) => Some(expected) == body,
                    None => true,
                }
        })
    }
}

async fn replay(
    State(provider): State<MockProvider>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let actual: Option<Value> = serde_json::from_slice(&body).ok();

    let Some(index) = provider.find(&method, uri.path(), actual.as_ref()) else {
        tracing::warn!("No interaction matches {} {}", method, uri.path());
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("no interaction matches {} {}", method, uri.path()),
        )
            .into_response();
    };

    provider.exercised.lock().await[index] = true;
    let interaction = &provider.interactions[index];
    tracing::debug!("Replaying interaction '{}'", interaction.description);

    let status = StatusCode::from_u16(interaction.response.status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match &interaction.response.body {
        Some(body) if interaction.response.expects_location => {
            let location = format!("{}/{}", CATEGORY_BASE_PATH, body["id"]);
            (status, [(header::LOCATION, location)], Json(body.clone())).into_response()
        }
        Some(body) => (status, Json(body.clone())).into_response(),
        None => status.into_response(),
    }
}
