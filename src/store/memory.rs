//! In-memory implementation of [`RequestStore`].
//!
//! Requests live in a vector owned by the store and vanish with it. Every
//! operation first sleeps for its configured latency and only then takes the
//! lock, so concurrent calls interleave at the sleep and the last write wins.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::time::Duration;

use super::RequestStore;
use super::config::LatencyConfig;
use super::sample::sample_requests;
use crate::error::{CommdeskError, Result};
use crate::request::{
    Evaluation, EvaluationInput, Request, RequestId, RequestInput, Requester, StatusUpdate,
};

/// Process-local request store with simulated network latency.
///
/// # Example
/// ```ignore
/// let store = Arc::new(InMemoryRequestStore::new(LatencyConfig::default()));
/// let request = store.create(input, requester).await?;
/// ```
pub struct InMemoryRequestStore {
    requests: RwLock<Vec<Request>>,
    latency: LatencyConfig,
}

impl InMemoryRequestStore {
    /// Create an empty store.
    pub fn new(latency: LatencyConfig) -> Self {
        Self::with_requests(latency, Vec::new())
    }

    /// Create a store holding `requests`, in order.
    pub fn with_requests(latency: LatencyConfig, requests: Vec<Request>) -> Self {
        Self {
            requests: RwLock::new(requests),
            latency,
        }
    }

    /// Create a store preloaded with the demonstration requests.
    pub fn with_sample_data(latency: LatencyConfig) -> Self {
        Self::with_requests(latency, sample_requests())
    }

    /// Number of stored requests, without simulated latency.
    pub fn len(&self) -> usize {
        self.requests.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.read().is_empty()
    }

    async fn simulate_latency(&self, ms: u64) {
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Request>> {
        self.simulate_latency(self.latency.list_ms).await;
        let requests = self.requests.read().clone();
        tracing::debug!(count = requests.len(), "Listed requests");
        Ok(requests)
    }

    #[tracing::instrument(skip(self), fields(request_id = %id))]
    async fn get(&self, id: &RequestId) -> Result<Option<Request>> {
        self.simulate_latency(self.latency.get_ms).await;
        let found = self.requests.read().iter().find(|r| &r.id == id).cloned();
        if found.is_none() {
            tracing::debug!("Request not found");
        }
        Ok(found)
    }

    #[tracing::instrument(skip(self, input, requester), fields(kind = %input.kind))]
    async fn create(&self, input: RequestInput, requester: Requester) -> Result<Request> {
        self.simulate_latency(self.latency.create_ms).await;
        let request = Request::from_input(input, requester);
        self.requests.write().push(request.clone());
        tracing::info!(request_id = %request.id, "Request created");
        Ok(request)
    }

    #[tracing::instrument(skip(self, update), fields(request_id = %id, status = %update.target()))]
    async fn update_status(
        &self,
        id: &RequestId,
        update: StatusUpdate,
    ) -> Result<Option<Request>> {
        self.simulate_latency(self.latency.update_ms).await;
        let mut requests = self.requests.write();
        let Some(request) = requests.iter_mut().find(|r| &r.id == id) else {
            tracing::warn!("Status update for unknown request");
            return Ok(None);
        };
        update.apply_to(request);
        tracing::info!("Request status updated");
        Ok(Some(request.clone()))
    }

    #[tracing::instrument(skip(self), fields(request_id = %id))]
    async fn delete(&self, id: &RequestId) -> Result<bool> {
        self.simulate_latency(self.latency.delete_ms).await;
        let mut requests = self.requests.write();
        let Some(index) = requests.iter().position(|r| &r.id == id) else {
            tracing::warn!("Delete for unknown request");
            return Ok(false);
        };
        requests.remove(index);
        tracing::info!("Request deleted");
        Ok(true)
    }

    #[tracing::instrument(skip(self, input), fields(request_id = %request_id))]
    async fn attach_evaluation(
        &self,
        request_id: &RequestId,
        input: EvaluationInput,
    ) -> Result<Evaluation> {
        self.simulate_latency(self.latency.evaluation_ms).await;
        let mut requests = self.requests.write();
        let request = requests
            .iter_mut()
            .find(|r| &r.id == request_id)
            .ok_or_else(|| CommdeskError::RequestNotFound(request_id.clone()))?;

        let evaluation = Evaluation::from_input(request_id.clone(), input);
        if request.evaluation.is_some() {
            tracing::warn!("Replacing existing evaluation");
        }
        request.evaluation = Some(evaluation.clone());
        tracing::info!(evaluation_id = %evaluation.id, "Evaluation attached");
        Ok(evaluation)
    }

    #[tracing::instrument(skip(self))]
    async fn list_evaluations(&self) -> Result<Vec<Evaluation>> {
        self.simulate_latency(self.latency.list_ms).await;
        let evaluations: Vec<Evaluation> = self
            .requests
            .read()
            .iter()
            .filter_map(|r| r.evaluation.clone())
            .collect();
        Ok(evaluations)
    }
}
