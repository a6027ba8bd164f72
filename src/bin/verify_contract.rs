//! Replays the admin client's contract against a running provider.
//!
//! The provider at `PROVIDER_URL` (default `http://127.0.0.1:8080`) must be
//! freshly started with `SEED_CATALOG=true`.

use category_admin::contract::{admin_client_contract, verify_provider};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PROVIDER_URL: &str = "http://127.0.0.1:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let provider_url =
        std::env::var("PROVIDER_URL").unwrap_or_else(|_| DEFAULT_PROVIDER_URL.to_string());
    let contract = admin_client_contract()?;

    tracing::info!(
        "Verifying {} against {} at {}",
        contract.consumer,
        contract.provider,
        provider_url
    );

    let report = verify_provider(&provider_url, &contract).await?;

    for outcome in &report.outcomes {
        if outcome.passed() {
            tracing::info!("PASS {}", outcome.description);
        } else {
            tracing::error!("FAIL {}: {}", outcome.description, outcome.failures.join("; "));
        }
    }

    let failed = report.failed().count();
    if failed > 0 {
        anyhow::bail!("{} of {} interactions failed", failed, report.outcomes.len());
    }

    tracing::info!("All {} interactions verified", report.outcomes.len());
    Ok(())
}
