//! Core request types.
//!
//! A request is created in [`RequestStatus::AwaitingService`] and moved between
//! statuses by admins through [`StatusUpdate`]. Each update variant carries only
//! the fields its target status allows, so a rejection reason can never be
//! attached to a completed request and vice versa.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::attachment::Attachment;
use crate::domain::evaluation::Evaluation;
use crate::domain::timestamps::{local_datetime_opt, utc_timestamp};

/// Unique identifier for a request in the system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        RequestId(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display only first 8 characters for readability in logs
        write!(f, "{}", self.0.chars().take(8).collect::<String>())
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId(id.to_string())
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        RequestId(id)
    }
}

impl std::ops::Deref for RequestId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// What the communications office is asked to do. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// Press release / publication
    #[serde(rename = "Divulgação")]
    Publicity,
    /// Graphic design piece
    #[serde(rename = "Arte/Material Gráfico")]
    Artwork,
    /// Event coverage
    #[serde(rename = "Cobertura")]
    Coverage,
}

impl RequestKind {
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Publicity => "Divulgação",
            RequestKind::Artwork => "Arte/Material Gráfico",
            RequestKind::Coverage => "Cobertura",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Divulgação" => Ok(RequestKind::Publicity),
            "Arte/Material Gráfico" => Ok(RequestKind::Artwork),
            "Cobertura" => Ok(RequestKind::Coverage),
            _ => Err(format!("Invalid request kind: {}", s)),
        }
    }
}

/// Where a request is in triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Initial status; the only one in which the requester may withdraw
    #[serde(rename = "Aguardando Atendimento")]
    AwaitingService,
    #[serde(rename = "Em Andamento")]
    InProgress,
    /// Terminal for requester actions; the only status that can be evaluated
    #[serde(rename = "Concluída")]
    Completed,
    /// Terminal for requester actions
    #[serde(rename = "Rejeitada")]
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::AwaitingService,
        RequestStatus::InProgress,
        RequestStatus::Completed,
        RequestStatus::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::AwaitingService => "Aguardando Atendimento",
            RequestStatus::InProgress => "Em Andamento",
            RequestStatus::Completed => "Concluída",
            RequestStatus::Rejected => "Rejeitada",
        }
    }

    /// Check if the requester can no longer act on the request (Completed or Rejected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Aguardando Atendimento" => Ok(RequestStatus::AwaitingService),
            "Em Andamento" => Ok(RequestStatus::InProgress),
            "Concluída" => Ok(RequestStatus::Completed),
            "Rejeitada" => Ok(RequestStatus::Rejected),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

/// The staff member who submitted a request, taken from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
}

/// Fields supplied on the submission forms.
///
/// Which of the optional fields matter depends on `kind`; see
/// [`crate::domain::schedule::validate_submission`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInput {
    #[serde(rename = "tipo")]
    pub kind: RequestKind,
    /// Extension or WhatsApp number for contact
    #[serde(rename = "ramal", default)]
    pub phone_or_chat: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "dataPublicacao",
        default,
        with = "local_datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub publication_date: Option<NaiveDateTime>,
    #[serde(
        rename = "dataExpectativa",
        default,
        with = "local_datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_handling_date: Option<NaiveDateTime>,
    #[serde(
        rename = "dataEvento",
        default,
        with = "local_datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_date: Option<NaiveDateTime>,
    #[serde(rename = "mensagem", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "tipoMaterial", default, skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,
    #[serde(rename = "publicoAlvo", default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(rename = "detalhamento", default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "descricaoEvento", default, skip_serializing_if = "Option::is_none")]
    pub event_description: Option<String>,
    #[serde(rename = "localEvento", default, skip_serializing_if = "Option::is_none")]
    pub event_location: Option<String>,
    #[serde(
        rename = "numeroParticipantes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub participant_count: Option<String>,
    #[serde(rename = "membrosPresentes", default, skip_serializing_if = "Option::is_none")]
    pub members_present: Option<String>,
    /// `None` until the requester answers the manager-approval question
    #[serde(rename = "aprovadoGestor", default, skip_serializing_if = "Option::is_none")]
    pub manager_approved: Option<bool>,
    #[serde(rename = "anexos", default)]
    pub attachments: Vec<Attachment>,
}

impl RequestInput {
    /// An otherwise empty input of the given kind.
    pub fn new(kind: RequestKind, phone_or_chat: impl Into<String>) -> Self {
        Self {
            kind,
            phone_or_chat: phone_or_chat.into(),
            email: None,
            publication_date: None,
            expected_handling_date: None,
            event_date: None,
            message: None,
            material_type: None,
            target_audience: None,
            detail: None,
            event_description: None,
            event_location: None,
            participant_count: None,
            members_present: None,
            manager_approved: None,
            attachments: Vec::new(),
        }
    }

    /// The date the scheduling rule applies to, if this kind has one.
    ///
    /// Coverage is scheduled by its event date and artwork by the expected
    /// handling date; publicity requests are not subject to the rule.
    pub fn scheduled_for(&self) -> Option<NaiveDateTime> {
        match self.kind {
            RequestKind::Coverage => self.event_date,
            RequestKind::Artwork => self.expected_handling_date,
            RequestKind::Publicity => None,
        }
    }
}

/// One submitted work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    #[serde(rename = "tipo")]
    pub kind: RequestKind,
    pub status: RequestStatus,
    #[serde(rename = "dataSolicitacao", with = "utc_timestamp")]
    pub submitted_at: DateTime<Utc>,
    #[serde(rename = "solicitante")]
    pub requester: Requester,
    #[serde(rename = "ramal", default)]
    pub phone_or_chat: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "dataPublicacao",
        default,
        with = "local_datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub publication_date: Option<NaiveDateTime>,
    #[serde(
        rename = "dataExpectativa",
        default,
        with = "local_datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_handling_date: Option<NaiveDateTime>,
    #[serde(
        rename = "dataEvento",
        default,
        with = "local_datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_date: Option<NaiveDateTime>,
    #[serde(rename = "mensagem", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "tipoMaterial", default, skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,
    #[serde(rename = "publicoAlvo", default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(rename = "detalhamento", default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "descricaoEvento", default, skip_serializing_if = "Option::is_none")]
    pub event_description: Option<String>,
    #[serde(rename = "localEvento", default, skip_serializing_if = "Option::is_none")]
    pub event_location: Option<String>,
    #[serde(
        rename = "numeroParticipantes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub participant_count: Option<String>,
    #[serde(rename = "membrosPresentes", default, skip_serializing_if = "Option::is_none")]
    pub members_present: Option<String>,
    #[serde(rename = "aprovadoGestor", default)]
    pub manager_approved: bool,
    #[serde(rename = "anexos", default)]
    pub attachments: Vec<Attachment>,
    #[serde(rename = "anexosConclusao", default, skip_serializing_if = "Option::is_none")]
    pub resolution_attachments: Option<Vec<Attachment>>,
    /// Present only while the status is Rejected
    #[serde(rename = "motivoRejeicao", default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Present only while the status is Completed
    #[serde(rename = "linkConclusao", default, skip_serializing_if = "Option::is_none")]
    pub completion_link: Option<String>,
    #[serde(rename = "avaliacao", default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

impl Request {
    /// Build a freshly submitted request: new id, initial status, stamped now.
    pub fn from_input(input: RequestInput, requester: Requester) -> Self {
        Self {
            id: RequestId::new(),
            kind: input.kind,
            status: RequestStatus::AwaitingService,
            submitted_at: Utc::now(),
            requester,
            phone_or_chat: input.phone_or_chat,
            email: input.email,
            publication_date: input.publication_date,
            expected_handling_date: input.expected_handling_date,
            event_date: input.event_date,
            message: input.message,
            material_type: input.material_type,
            target_audience: input.target_audience,
            detail: input.detail,
            event_description: input.event_description,
            event_location: input.event_location,
            participant_count: input.participant_count,
            members_present: input.members_present,
            manager_approved: input.manager_approved.unwrap_or(false),
            attachments: input.attachments,
            resolution_attachments: None,
            rejection_reason: None,
            completion_link: None,
            evaluation: None,
        }
    }

    /// Check if the requester may still withdraw (delete) this request.
    pub fn is_withdrawable(&self) -> bool {
        self.status == RequestStatus::AwaitingService
    }

    /// Check if the request is completed and still waiting for its survey.
    pub fn awaits_evaluation(&self) -> bool {
        self.status == RequestStatus::Completed && self.evaluation.is_none()
    }
}

/// Admin status change, one variant per target status.
///
/// Serializes to the body of `PUT /solicitacoes/{id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum StatusUpdate {
    #[serde(rename = "Aguardando Atendimento")]
    AwaitingService,
    #[serde(rename = "Em Andamento")]
    InProgress,
    #[serde(rename = "Concluída")]
    Completed {
        #[serde(rename = "linkConclusao", default, skip_serializing_if = "Option::is_none")]
        completion_link: Option<String>,
        #[serde(rename = "anexosConclusao", default, skip_serializing_if = "Vec::is_empty")]
        resolution_attachments: Vec<Attachment>,
    },
    /// The store accepts a missing reason; [`Request::resolve`] does not.
    #[serde(rename = "Rejeitada")]
    Rejected {
        #[serde(rename = "motivoRejeicao", default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl StatusUpdate {
    /// The status this update moves a request to.
    pub fn target(&self) -> RequestStatus {
        match self {
            StatusUpdate::AwaitingService => RequestStatus::AwaitingService,
            StatusUpdate::InProgress => RequestStatus::InProgress,
            StatusUpdate::Completed { .. } => RequestStatus::Completed,
            StatusUpdate::Rejected { .. } => RequestStatus::Rejected,
        }
    }

    /// Merge this update into a stored request.
    ///
    /// Fields of the previous status (rejection reason, completion link,
    /// resolution attachments) are cleared; only the ones this update
    /// carries are set again. An empty attachment list counts as none.
    pub fn apply_to(self, request: &mut Request) {
        request.status = self.target();
        request.rejection_reason = None;
        request.completion_link = None;
        request.resolution_attachments = None;

        match self {
            StatusUpdate::AwaitingService | StatusUpdate::InProgress => {}
            StatusUpdate::Completed {
                completion_link,
                resolution_attachments,
            } => {
                request.completion_link = completion_link;
                request.resolution_attachments =
                    Some(resolution_attachments).filter(|list| !list.is_empty());
            }
            StatusUpdate::Rejected { reason } => {
                request.rejection_reason = reason;
            }
        }
    }
}

/// Filter parameters for triage and evaluation listings.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    /// Filter by status
    pub status: Option<RequestStatus>,
    /// Filter by request kind
    pub kind: Option<RequestKind>,
    /// Filter by requester id ("my requests")
    pub requester_id: Option<String>,
    /// Keep only requests that do (true) or do not (false) carry an evaluation
    pub evaluated: Option<bool>,
}

impl RequestFilter {
    pub fn matches(&self, request: &Request) -> bool {
        if let Some(status) = self.status
            && request.status != status
        {
            return false;
        }
        if let Some(kind) = self.kind
            && request.kind != kind
        {
            return false;
        }
        if let Some(requester_id) = &self.requester_id
            && &request.requester.id != requester_id
        {
            return false;
        }
        if let Some(evaluated) = self.evaluated
            && request.evaluation.is_some() != evaluated
        {
            return false;
        }
        true
    }
}
