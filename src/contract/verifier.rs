use reqwest::header::LOCATION;
use serde_json::Value;

use crate::client::ClientResult;
use crate::contract::interactions::{Contract, Interaction};
use crate::contract::matcher::matches_shape;

/// Result of replaying one interaction
#[derive(Debug, Clone)]
pub struct InteractionOutcome {
    pub description: String,
    pub failures: Vec<String>,
}

impl InteractionOutcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub consumer: String,
    pub provider: String,
    pub outcomes: Vec<InteractionOutcome>,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(InteractionOutcome::passed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &InteractionOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

/// Replays `contract` in order against the provider at `base_url`.
///
/// The provider must start from the seeded vehicles catalog. Mismatches
/// are collected in the report; only transport failures abort.
pub async fn verify_provider(base_url: &str, contract: &Contract) -> ClientResult<VerificationReport> {
    let base_url = base_url.trim_end_matches('/');
    let http_client = reqwest::Client::new();

    let mut outcomes = Vec::with_capacity(contract.interactions.len());
    for interaction in &contract.interactions {
        let outcome = replay(&http_client, base_url, interaction).await?;
        if outcome.passed() {
            tracing::debug!("Interaction '{}' verified", outcome.description);
        } else {
            tracing::warn!(
                "Interaction '{}' failed: {}",
                outcome.description,
                outcome.failures.join("; ")
            );
        }
        outcomes.push(outcome);
    }

    Ok(VerificationReport {
        consumer: contract.consumer.clone(),
        provider: contract.provider.clone(),
        outcomes,
    })
}

async fn replay(
    http_client: &reqwest::Client,
    base_url: &str,
    interaction: &Interaction,
) -> ClientResult<InteractionOutcome> {
    let expected = &interaction.response;
    let url = format!("{}{}", base_url, interaction.request.path);

    let mut request = http_client.request(interaction.request.method.clone(), &url);
    if let Some(body) = &interaction.request.body {
        request = request.json(body);
    }
    let response = request.send().await?;

    let status = response.status();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = response.text().await?;

    let mut failures = Vec::new();
    if status.as_u16() != expected.status {
        failures.push(format!("expected status {}, got {}", expected.status, status));
    }

    match &expected.body {
        Some(expected_body) => match serde_json::from_str::<Value>(&text) {
            Ok(actual) => {
                if let Err(mismatch) = matches_shape(expected_body, &actual) {
                    failures.push(format!("body mismatch at {}", mismatch));
                }
                if expected.expects_location {
                    check_location(location.as_deref(), &actual, &mut failures);
                }
            }
            Err(e) => failures.push(format!("body is not JSON ({}): {:?}", e, text)),
        },
        None if !text.trim().is_empty() => {
            failures.push(format!("expected an empty body, got {:?}", text));
        }
        None => {}
    }

    Ok(InteractionOutcome {
        description: interaction.description.clone(),
        failures,
    })
}

fn check_location(location: Option<&str>, body: &Value, failures: &mut Vec<String>) {
    let Some(location) = location else {
        failures.push("missing Location header".to_string());
        return;
    };

    let last_segment = location.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    if last_segment != body["id"].to_string() {
        failures.push(format!(
            "Location {} does not end in the created id {}",
            location, body["id"]
        ));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::contract::{admin_client_contract, MockProvider};
    use crate::shared::test_helpers::{empty_service, seeded_service, spawn_app, test_app};

    #[tokio::test]
    async fn test_seeded_provider_honours_the_contract() {
        let base_url = spawn_app(test_app(seeded_service())).await;
        let contract = admin_client_contract().unwrap();

        let report = verify_provider(&base_url, &contract).await.unwrap();

        let failed: Vec<_> = report.failed().collect();
        assert!(failed.is_empty(), "failed interactions: {failed:?}");
        assert_eq!(report.outcomes.len(), 6);
        assert_eq!(report.provider, "admin_service_provider");
    }

    #[tokio::test]
    async fn test_empty_provider_breaks_the_contract() {
        let base_url = spawn_app(test_app(empty_service())).await;
        let contract = admin_client_contract().unwrap();

        let report = verify_provider(&base_url, &contract).await.unwrap();

        assert!(!report.passed());
        let first = &report.outcomes[0];
        assert_eq!(first.description, "Retrieve a category");
        assert!(first.failures[0].contains("expected status 200"));
    }

    #[tokio::test]
    async fn test_mock_provider_satisfies_its_own_contract() {
        let contract = admin_client_contract().unwrap();
        let mock = MockProvider::new(contract.interactions.clone());
        let base_url = spawn_app(mock.router()).await;

        let report = verify_provider(&base_url, &contract).await.unwrap();

        assert!(report.passed());
        assert!(mock.unexercised().await.is_empty());
    }

    #[test]
    fn test_location_must_end_in_created_id() {
        let mut failures = Vec::new();
        check_location(Some("/admin/category/1020"), &json!({"id": 1020}), &mut failures);
        assert!(failures.is_empty());

        check_location(Some("/admin/category/7"), &json!({"id": 1020}), &mut failures);
        check_location(None, &json!({"id": 1020}), &mut failures);
        assert_eq!(failures.len(), 2);
    }
}
