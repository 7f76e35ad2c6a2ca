//! Request aggregate and its satellites.
//!
//! This module re-exports types from `domain`.
//! See those modules for the actual implementations.

pub use crate::domain::attachment::{Attachment, AttachmentId, MAX_RESOLUTION_ATTACHMENT_BYTES};
pub use crate::domain::evaluation::{
    Characteristic, Evaluation, EvaluationId, EvaluationInput, SatisfactionLevel,
};
pub use crate::domain::request::state::*;
pub use crate::domain::schedule::{
    BusinessWindow, ScheduleRule, ScheduleViolation, local_now, validate_submission,
};
