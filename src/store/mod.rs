//! The request store contract.
//!
//! This module defines the `RequestStore` trait, the single source of truth
//! every view reads requests and evaluations from, and `AnyStore`, which picks
//! an implementation from [`StoreConfig`].

use async_trait::async_trait;

use crate::error::Result;
use crate::http::ReqwestHttpClient;
use crate::request::{
    Evaluation, EvaluationInput, Request, RequestFilter, RequestId, RequestInput, Requester,
    StatusUpdate,
};

pub mod config;
pub mod memory;
pub mod remote;
mod sample;

pub use config::{BackendConfig, LatencyConfig, RemoteConfig, StoreConfig};
pub use memory::InMemoryRequestStore;
pub use remote::RemoteRequestStore;

/// Storage trait for persisting and querying requests.
///
/// Implementations apply what they are asked to and nothing more: status
/// changes are not checked against the lifecycle, a rejection may lack a
/// reason, and attaching a second evaluation replaces the first. The rules
/// live in [`crate::domain::request::transitions`].
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// All requests in insertion order.
    ///
    /// The returned collection is a snapshot; changing it does not affect the
    /// store.
    async fn list(&self) -> Result<Vec<Request>>;

    /// Get a request by ID. A missing request is `Ok(None)`, not an error.
    async fn get(&self, id: &RequestId) -> Result<Option<Request>>;

    /// Create a request in the initial status, stamped with the current time
    /// and attributed to `requester`.
    async fn create(&self, input: RequestInput, requester: Requester) -> Result<Request>;

    /// Apply a status update. Returns `Ok(None)` if the request does not exist.
    async fn update_status(&self, id: &RequestId, update: StatusUpdate)
    -> Result<Option<Request>>;

    /// Delete a request regardless of its status.
    ///
    /// Returns `Ok(false)` if the request does not exist.
    async fn delete(&self, id: &RequestId) -> Result<bool>;

    /// Create an evaluation and attach it to the request, replacing any
    /// previous one.
    ///
    /// # Errors
    /// [`crate::CommdeskError::RequestNotFound`] if the request does not exist.
    async fn attach_evaluation(
        &self,
        request_id: &RequestId,
        input: EvaluationInput,
    ) -> Result<Evaluation>;

    /// Every evaluation currently attached to a request.
    async fn list_evaluations(&self) -> Result<Vec<Evaluation>>;

    /// List requests matching a filter (triage queue, "my requests",
    /// evaluated requests by kind).
    #[tracing::instrument(skip(self, filter))]
    async fn list_filtered(&self, filter: &RequestFilter) -> Result<Vec<Request>> {
        let requests = self.list().await?;
        let total = requests.len();
        let matching: Vec<Request> = requests
            .into_iter()
            .filter(|request| filter.matches(request))
            .collect();
        tracing::debug!(total, matching = matching.len(), "Filtered requests");
        Ok(matching)
    }
}

/// A store built from configuration.
pub enum AnyStore {
    InMemory(InMemoryRequestStore),
    Remote(RemoteRequestStore<ReqwestHttpClient>),
}

impl AnyStore {
    /// Build the store the configuration selects.
    pub fn from_config(config: &StoreConfig) -> Self {
        match &config.backend {
            BackendConfig::InMemory {
                latency,
                sample_data,
            } => {
                tracing::info!(sample_data, "Using in-memory request store");
                let store = if *sample_data {
                    InMemoryRequestStore::with_sample_data(*latency)
                } else {
                    InMemoryRequestStore::new(*latency)
                };
                AnyStore::InMemory(store)
            }
            BackendConfig::Remote(remote) => {
                tracing::info!(base_url = %remote.base_url, "Using remote request store");
                AnyStore::Remote(RemoteRequestStore::new(remote))
            }
        }
    }

    fn inner(&self) -> &dyn RequestStore {
        match self {
            AnyStore::InMemory(store) => store,
            AnyStore::Remote(store) => store,
        }
    }
}

#[async_trait]
impl RequestStore for AnyStore {
    async fn list(&self) -> Result<Vec<Request>> {
        self.inner().list().await
    }

    async fn get(&self, id: &RequestId) -> Result<Option<Request>> {
        self.inner().get(id).await
    }

    async fn create(&self, input: RequestInput, requester: Requester) -> Result<Request> {
        self.inner().create(input, requester).await
    }

    async fn update_status(
        &self,
        id: &RequestId,
        update: StatusUpdate,
    ) -> Result<Option<Request>> {
        self.inner().update_status(id, update).await
    }

    async fn delete(&self, id: &RequestId) -> Result<bool> {
        self.inner().delete(id).await
    }

    async fn attach_evaluation(
        &self,
        request_id: &RequestId,
        input: EvaluationInput,
    ) -> Result<Evaluation> {
        self.inner().attach_evaluation(request_id, input).await
    }

    async fn list_evaluations(&self) -> Result<Vec<Evaluation>> {
        self.inner().list_evaluations().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{RequestKind, RequestStatus};

    fn requester() -> Requester {
        Requester {
            id: "123".to_string(),
            name: "USUÁRIO 464578".to_string(),
            email: "usuario@example.org".to_string(),
        }
    }

    #[tokio::test]
    async fn test_from_config_builds_in_memory_store() {
        let config = StoreConfig {
            backend: BackendConfig::InMemory {
                latency: LatencyConfig::none(),
                sample_data: true,
            },
        };
        let store = AnyStore::from_config(&config);
        assert!(matches!(store, AnyStore::InMemory(_)));
        assert_eq!(store.list().await.unwrap().len(), 5);
    }

    #[test]
    fn test_from_config_builds_remote_store() {
        let config = StoreConfig {
            backend: BackendConfig::Remote(RemoteConfig::default()),
        };
        assert!(matches!(AnyStore::from_config(&config), AnyStore::Remote(_)));
    }

    #[tokio::test]
    async fn test_list_filtered() {
        let store = AnyStore::from_config(&StoreConfig {
            backend: BackendConfig::InMemory {
                latency: LatencyConfig::none(),
                sample_data: true,
            },
        });
        let created = store
            .create(RequestInput::new(RequestKind::Coverage, "6299998888"), requester())
            .await
            .unwrap();

        let awaiting = store
            .list_filtered(&RequestFilter {
                status: Some(RequestStatus::AwaitingService),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(awaiting.len(), 3);

        let coverage = store
            .list_filtered(&RequestFilter {
                kind: Some(RequestKind::Coverage),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(coverage.len(), 1);
        assert_eq!(coverage[0].id, created.id);
    }
}
