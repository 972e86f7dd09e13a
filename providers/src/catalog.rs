//! Model catalog retrieval.

use std::time::Duration;

use pollen_types::ModelDescriptor;
use thiserror::Error;

use crate::ProviderClient;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The deadline passed before the listing arrived.
    #[error("model catalog did not load within {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("model catalog request failed: {0}")]
    Network(String),
}

impl CatalogError {
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, CatalogError::Timeout(_))
    }
}

/// `GET {base}/models` without any deadline.
pub async fn fetch_models(client: &ProviderClient) -> Result<Vec<ModelDescriptor>, CatalogError> {
    let url = client.endpoint("models");
    tracing::debug!(%url, "Fetching model catalog");

    let response = client
        .http()
        .get(&url)
        .send()
        .await
        .map_err(|e| CatalogError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Network(format!("HTTP {status}")));
    }

    response
        .json::<Vec<ModelDescriptor>>()
        .await
        .map_err(|e| CatalogError::Network(format!("invalid catalog body: {e}")))
}

/// Race [`fetch_models`] against `deadline`.
///
/// When the deadline wins the in-flight request is dropped, so a late
/// response can never overwrite a fallback the caller already applied.
pub async fn load_catalog(
    client: &ProviderClient,
    deadline: Duration,
) -> Result<Vec<ModelDescriptor>, CatalogError> {
    match tokio::time::timeout(deadline, fetch_models(client)).await {
        Ok(Ok(models)) => {
            tracing::info!(count = models.len(), "Model catalog loaded");
            Ok(models)
        }
        Ok(Err(e)) => {
            tracing::warn!(%e, "Model catalog request failed");
            Err(e)
        }
        Err(_) => {
            tracing::warn!(?deadline, "Model catalog timed out");
            Err(CatalogError::Timeout(deadline))
        }
    }
}
