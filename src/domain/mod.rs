//! Core domain types for the request tracker.
//!
//! This module contains pure domain types with no transport dependencies:
//! - Requests, statuses and lifecycle rules
//! - File descriptors for attachments
//! - Satisfaction surveys
//! - The scheduling rule applied on submission

pub mod attachment;
pub mod evaluation;
pub mod request;
pub mod schedule;
pub mod timestamps;
