//! Caller-side lifecycle rules for requests.
//!
//! The store applies whatever it is told: any status can be set from any
//! other, a rejection may come without a reason, a survey may be attached to
//! a request that is still in progress, or attached twice. The methods here
//! hold the rules the office actually works by, and only then call into the
//! store:
//!
//! ```text
//! RequestInput ──submit()──> Request [Aguardando Atendimento] ──withdraw()──> (deleted)
//!                                   │
//!                                   └──resolve()──> [Em Andamento | Concluída | Rejeitada]
//!                                                          │
//!                         [Concluída, not yet evaluated] ──evaluate()──> Evaluation
//! ```
//!
//! - `submit` runs the scheduling rule and the form checks before creating.
//! - `resolve` insists on a rejection reason and on the attachment size limit,
//!   and keeps an evaluated request in Concluída.
//! - `withdraw` is only possible while the request awaits service.
//! - `evaluate` is only possible once, on a completed request.

use chrono::NaiveDateTime;
use metrics::counter;

use crate::domain::attachment::MAX_RESOLUTION_ATTACHMENT_BYTES;
use crate::domain::evaluation::{Evaluation, EvaluationInput};
use crate::domain::schedule::{ScheduleRule, validate_submission};
use crate::error::{CommdeskError, Result};
use crate::store::RequestStore;

use super::state::{Request, RequestInput, RequestStatus, Requester, StatusUpdate};

impl RequestInput {
    /// Validate the submission as of `now` and create the request.
    pub async fn submit<S: RequestStore + ?Sized>(
        self,
        requester: Requester,
        now: NaiveDateTime,
        rule: &ScheduleRule,
        store: &S,
    ) -> Result<Request> {
        if let Err(e) = validate_submission(&self, now, rule) {
            counter!("commdesk_submissions_refused_total", "kind" => self.kind.label())
                .increment(1);
            tracing::info!(kind = %self.kind, error = %e, "Submission refused");
            return Err(e);
        }

        let kind = self.kind;
        let request = store.create(self, requester).await?;
        counter!("commdesk_submissions_total", "kind" => kind.label()).increment(1);
        Ok(request)
    }
}

impl Request {
    /// Move the request to a new status on behalf of an admin.
    ///
    /// Rejections need a non-blank reason and resolution attachments must
    /// stay within [`MAX_RESOLUTION_ATTACHMENT_BYTES`]. Once evaluated, a
    /// request can no longer leave [`RequestStatus::Completed`].
    pub async fn resolve<S: RequestStore + ?Sized>(
        self,
        update: StatusUpdate,
        store: &S,
    ) -> Result<Request> {
        let target = update.target();
        if self.evaluation.is_some() && target != RequestStatus::Completed {
            counter!("commdesk_transitions_denied_total", "action" => "resolve").increment(1);
            tracing::warn!(request_id = %self.id, to = %target, "Evaluated request cannot leave Concluída");
            return Err(CommdeskError::InvalidState(
                self.id,
                "evaluated".to_string(),
                RequestStatus::Completed.to_string(),
            ));
        }

        match &update {
            StatusUpdate::Rejected { reason } => {
                let has_reason = reason.as_deref().is_some_and(|r| !r.trim().is_empty());
                if !has_reason {
                    return Err(CommdeskError::ValidationError(
                        "A rejection reason is required when rejecting a request".to_string(),
                    ));
                }
            }
            StatusUpdate::Completed {
                resolution_attachments,
                ..
            } => {
                if let Some(too_large) = resolution_attachments
                    .iter()
                    .find(|a| a.size > MAX_RESOLUTION_ATTACHMENT_BYTES)
                {
                    return Err(CommdeskError::ValidationError(format!(
                        "Attachment '{}' is larger than the 100 MB limit",
                        too_large.name
                    )));
                }
            }
            StatusUpdate::AwaitingService | StatusUpdate::InProgress => {}
        }

        let updated = store
            .update_status(&self.id, update)
            .await?
            .ok_or_else(|| CommdeskError::RequestNotFound(self.id.clone()))?;

        counter!("commdesk_resolutions_total", "status" => target.label()).increment(1);
        tracing::info!(
            request_id = %self.id,
            from = %self.status,
            to = %target,
            "Request resolved"
        );
        Ok(updated)
    }

    /// Delete the request on behalf of its requester.
    pub async fn withdraw<S: RequestStore + ?Sized>(self, store: &S) -> Result<()> {
        if !self.is_withdrawable() {
            counter!("commdesk_transitions_denied_total", "action" => "withdraw").increment(1);
            tracing::warn!(request_id = %self.id, status = %self.status, "Withdrawal denied");
            return Err(CommdeskError::InvalidState(
                self.id,
                self.status.to_string(),
                RequestStatus::AwaitingService.to_string(),
            ));
        }

        if !store.delete(&self.id).await? {
            return Err(CommdeskError::RequestNotFound(self.id));
        }

        counter!("commdesk_withdrawals_total").increment(1);
        Ok(())
    }

    /// Attach the requester's satisfaction survey.
    ///
    /// Only completed requests can be evaluated, and only once.
    pub async fn evaluate<S: RequestStore + ?Sized>(
        self,
        input: EvaluationInput,
        store: &S,
    ) -> Result<Evaluation> {
        if self.status != RequestStatus::Completed {
            counter!("commdesk_transitions_denied_total", "action" => "evaluate").increment(1);
            tracing::warn!(request_id = %self.id, status = %self.status, "Evaluation denied");
            return Err(CommdeskError::InvalidState(
                self.id,
                self.status.to_string(),
                RequestStatus::Completed.to_string(),
            ));
        }
        if self.evaluation.is_some() {
            counter!("commdesk_transitions_denied_total", "action" => "evaluate").increment(1);
            tracing::warn!(request_id = %self.id, "Request already evaluated");
            return Err(CommdeskError::InvalidState(
                self.id,
                "evaluated".to_string(),
                "not yet evaluated".to_string(),
            ));
        }

        let input = input.normalized();
        input.validate()?;

        let evaluation = store.attach_evaluation(&self.id, input).await?;
        counter!(
            "commdesk_evaluations_total",
            "satisfaction" => evaluation.satisfaction.label()
        )
        .increment(1);
        Ok(evaluation)
    }
}
