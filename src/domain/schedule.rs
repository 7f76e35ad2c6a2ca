//! Submission rules checked before a request reaches the store.
//!
//! Coverage and artwork requests name a date the office has to work on. That
//! date must fall on a weekday, inside business hours, and far enough ahead
//! of the moment of submission. All datetimes here are local wall-clock times.

use chrono::{Datelike, NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::request::{RequestInput, RequestKind};
use crate::error::{CommdeskError, Result};

/// A half-open `[start, end)` span of the working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl BusinessWindow {
    /// Window from `start_hour:00` up to, but excluding, `end_hour:00`.
    ///
    /// Returns `None` if either hour is not in `0..24`.
    pub fn hours(start_hour: u32, end_hour: u32) -> Option<Self> {
        Some(Self {
            start: NaiveTime::from_hms_opt(start_hour, 0, 0)?,
            end: NaiveTime::from_hms_opt(end_hour, 0, 0)?,
        })
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }
}

/// Configuration for the scheduling rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRule {
    /// Time-of-day spans in which work can be scheduled
    pub windows: Vec<BusinessWindow>,

    /// Minimum wall-clock hours between submission and the scheduled date.
    /// Nights and weekends count towards it.
    pub min_lead_hours: i64,
}

const fn on_the_hour(hour: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(time) => time,
        None => panic!("hour must be in 0..24"),
    }
}

/// 08:00 to 12:00
pub const MORNING: BusinessWindow = BusinessWindow {
    start: on_the_hour(8),
    end: on_the_hour(12),
};

/// 14:00 to 18:00
pub const AFTERNOON: BusinessWindow = BusinessWindow {
    start: on_the_hour(14),
    end: on_the_hour(18),
};

impl Default for ScheduleRule {
    fn default() -> Self {
        Self {
            windows: vec![MORNING, AFTERNOON],
            min_lead_hours: 12,
        }
    }
}

/// Why a scheduled date was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleViolation {
    #[error("{0} falls on a weekend; pick a business day (Monday to Friday)")]
    Weekend(Weekday),

    #[error("{time} is outside business hours ({windows})")]
    OutsideBusinessHours { time: NaiveTime, windows: String },

    #[error("requests must be made at least {required} hours in advance")]
    InsufficientLeadTime { required: i64 },
}

impl ScheduleRule {
    /// Check a scheduled datetime against the rule, as of `now`.
    ///
    /// Checks run in order (weekday, hours, lead time) and the first failure
    /// is returned.
    pub fn check(
        &self,
        target: NaiveDateTime,
        now: NaiveDateTime,
    ) -> std::result::Result<(), ScheduleViolation> {
        let weekday = target.weekday();
        if matches!(weekday, Weekday::Sat | Weekday::Sun) {
            return Err(ScheduleViolation::Weekend(weekday));
        }

        let time = target.time();
        if !self.windows.iter().any(|window| window.contains(time)) {
            return Err(ScheduleViolation::OutsideBusinessHours {
                time,
                windows: self.describe_windows(),
            });
        }

        // A lead time too large to represent can never be met
        let too_soon = TimeDelta::try_hours(self.min_lead_hours)
            .is_none_or(|required| target - now < required);
        if too_soon {
            return Err(ScheduleViolation::InsufficientLeadTime {
                required: self.min_lead_hours,
            });
        }

        Ok(())
    }

    /// Windows formatted for messages, e.g. `08:00 - 12:00 / 14:00 - 18:00`.
    pub fn describe_windows(&self) -> String {
        self.windows
            .iter()
            .map(|w| format!("{} - {}", w.start.format("%H:%M"), w.end.format("%H:%M")))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Current local wall-clock time, the "now" the forms validate against.
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Validate a submission the way the request forms do before sending it.
///
/// Returns the first problem found as a [`CommdeskError::ValidationError`]
/// carrying a single user-facing message.
pub fn validate_submission(
    input: &RequestInput,
    now: NaiveDateTime,
    rule: &ScheduleRule,
) -> Result<()> {
    if input.phone_or_chat.trim().is_empty() {
        return Err(CommdeskError::ValidationError(
            "Provide an extension or WhatsApp number for contact".to_string(),
        ));
    }

    if input.manager_approved.is_none() {
        return Err(CommdeskError::ValidationError(
            "Indicate whether the request is approved by the immediate manager".to_string(),
        ));
    }

    let (label, date) = match input.kind {
        RequestKind::Coverage => ("Event date", input.event_date),
        RequestKind::Artwork => ("Expected handling date", input.expected_handling_date),
        RequestKind::Publicity => ("Publication date", input.publication_date),
    };
    let Some(date) = date else {
        return Err(CommdeskError::ValidationError(format!(
            "{} is required for {} requests",
            label, input.kind
        )));
    };

    if input.scheduled_for().is_some()
        && let Err(violation) = rule.check(date, now)
    {
        tracing::debug!(kind = %input.kind, %date, %violation, "Submission refused by scheduling rule");
        return Err(CommdeskError::ValidationError(format!(
            "{}: {}",
            label, violation
        )));
    }

    Ok(())
}
