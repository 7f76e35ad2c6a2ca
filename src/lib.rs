//! Request tracking for a communications office.
//!
//! Staff submit publicity, artwork and event-coverage requests; admins triage
//! them through a small status lifecycle; requesters rate completed work with
//! a satisfaction survey. Everything persists through a [`RequestStore`],
//! which is either an in-memory collection with simulated latency or a remote
//! JSON backend.
//!
//! Lifecycle rules (scheduling window, rejection reason, withdraw-only-while-
//! waiting, evaluate-once-after-completion) live on the domain types in
//! [`domain::request::transitions`]; the stores themselves are permissive.

pub mod domain;
pub mod error;
pub mod http;
pub mod request;
pub mod store;

// Re-export commonly used types
pub use error::{CommdeskError, Result};
pub use http::{
    ApiCall, Endpoint, HttpClient, HttpResponse, Method, MockHttpClient, ReqwestHttpClient,
};
pub use request::*;
pub use store::{
    AnyStore, BackendConfig, InMemoryRequestStore, LatencyConfig, RemoteConfig,
    RemoteRequestStore, RequestStore, StoreConfig,
};
