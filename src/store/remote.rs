//! Remote implementation of [`RequestStore`] speaking JSON over HTTP.
//!
//! | Operation           | Call                                    |
//! |---------------------|-----------------------------------------|
//! | `list`              | `GET /solicitacoes`                     |
//! | `create`            | `POST /solicitacoes`                    |
//! | `get`               | `GET /solicitacoes/{id}`                |
//! | `update_status`     | `PUT /solicitacoes/{id}/status`         |
//! | `delete`            | `DELETE /solicitacoes/{id}`             |
//! | `attach_evaluation` | `POST /solicitacoes/{id}/avaliacao`     |
//! | `list_evaluations`  | `GET /avaliacoes`                       |
//!
//! A 404 on an addressed request maps to the "missing" result of the
//! operation. Every other non-2xx status becomes [`CommdeskError::Server`]
//! carrying the backend's `message` when it sends one.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::RequestStore;
use super::config::RemoteConfig;
use crate::error::{CommdeskError, Result, server_errors};
use crate::http::{ApiCall, Endpoint, HttpClient, HttpResponse, ReqwestHttpClient};
use crate::request::{
    Evaluation, EvaluationInput, Request, RequestId, RequestInput, Requester, StatusUpdate,
};

const NOT_FOUND: u16 = 404;

/// Body of `POST /solicitacoes`: the form fields plus the requester.
#[derive(Serialize)]
struct CreateBody<'a> {
    #[serde(flatten)]
    input: &'a RequestInput,
    #[serde(rename = "solicitante")]
    requester: &'a Requester,
}

/// Request store backed by the HTTP API.
pub struct RemoteRequestStore<H: HttpClient> {
    http: Arc<H>,
    endpoint: Endpoint,
}

impl RemoteRequestStore<ReqwestHttpClient> {
    /// Create a store using the production reqwest client.
    pub fn new(config: &RemoteConfig) -> Self {
        Self::with_client(config, Arc::new(ReqwestHttpClient::new()))
    }
}

impl<H: HttpClient> RemoteRequestStore<H> {
    /// Create a store using a custom HTTP client.
    pub fn with_client(config: &RemoteConfig, http: Arc<H>) -> Self {
        Self {
            http,
            endpoint: Endpoint::from(config),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn send(&self, call: ApiCall) -> Result<HttpResponse> {
        self.http.send(&self.endpoint, &call).await
    }

    /// Send a call addressing one request; `Ok(None)` when the backend does
    /// not know it.
    async fn send_addressed(&self, call: ApiCall) -> Result<Option<HttpResponse>> {
        let response = self.send(call).await?;
        if response.status == NOT_FOUND {
            return Ok(None);
        }
        check(response).map(Some)
    }
}

/// Turn a non-2xx response into a server error.
fn check(response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }
    let message = server_errors::server_message(response.status, &response.body);
    tracing::warn!(status = response.status, %message, "Backend returned an error");
    Err(CommdeskError::Server {
        status: response.status,
        message,
    })
}

fn parse<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    Ok(serde_json::from_str(&response.body)?)
}

fn request_path(id: &RequestId) -> String {
    format!("/solicitacoes/{}", id.as_str())
}

#[async_trait]
impl<H: HttpClient + 'static> RequestStore for RemoteRequestStore<H> {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Request>> {
        let response = check(self.send(ApiCall::get("/solicitacoes")).await?)?;
        let requests: Vec<Request> = parse(&response)?;
        tracing::debug!(count = requests.len(), "Fetched requests");
        Ok(requests)
    }

    #[tracing::instrument(skip(self), fields(request_id = %id))]
    async fn get(&self, id: &RequestId) -> Result<Option<Request>> {
        match self.send_addressed(ApiCall::get(request_path(id))).await? {
            Some(response) => Ok(Some(parse(&response)?)),
            None => {
                tracing::debug!("Request not found");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(skip(self, input, requester), fields(kind = %input.kind))]
    async fn create(&self, input: RequestInput, requester: Requester) -> Result<Request> {
        let body = serde_json::to_value(CreateBody {
            input: &input,
            requester: &requester,
        })?;
        let response = check(self.send(ApiCall::post("/solicitacoes", body)).await?)?;
        let request: Request = parse(&response)?;
        tracing::info!(request_id = %request.id, "Request created");
        Ok(request)
    }

    #[tracing::instrument(skip(self, update), fields(request_id = %id, status = %update.target()))]
    async fn update_status(
        &self,
        id: &RequestId,
        update: StatusUpdate,
    ) -> Result<Option<Request>> {
        let call = ApiCall::put(
            format!("{}/status", request_path(id)),
            serde_json::to_value(&update)?,
        );
        let Some(response) = self.send_addressed(call).await? else {
            tracing::warn!("Status update for unknown request");
            return Ok(None);
        };
        tracing::info!("Request status updated");
        Ok(Some(parse(&response)?))
    }

    #[tracing::instrument(skip(self), fields(request_id = %id))]
    async fn delete(&self, id: &RequestId) -> Result<bool> {
        let deleted = self
            .send_addressed(ApiCall::delete(request_path(id)))
            .await?
            .is_some();
        if deleted {
            tracing::info!("Request deleted");
        } else {
            tracing::warn!("Delete for unknown request");
        }
        Ok(deleted)
    }

    #[tracing::instrument(skip(self, input), fields(request_id = %request_id))]
    async fn attach_evaluation(
        &self,
        request_id: &RequestId,
        input: EvaluationInput,
    ) -> Result<Evaluation> {
        let call = ApiCall::post(
            format!("{}/avaliacao", request_path(request_id)),
            serde_json::to_value(&input)?,
        );
        let response = self
            .send_addressed(call)
            .await?
            .ok_or_else(|| CommdeskError::RequestNotFound(request_id.clone()))?;
        let evaluation: Evaluation = parse(&response)?;
        tracing::info!(evaluation_id = %evaluation.id, "Evaluation attached");
        Ok(evaluation)
    }

    #[tracing::instrument(skip(self))]
    async fn list_evaluations(&self) -> Result<Vec<Evaluation>> {
        let response = check(self.send(ApiCall::get("/avaliacoes")).await?)?;
        parse(&response)
    }
}
