//! The request aggregate.
//!
//! [`state`] holds the data: requests, statuses, the tagged status update and
//! listing filters. [`transitions`] holds the rules callers go through to move
//! a request along (submit, resolve, withdraw, evaluate).

pub mod state;
pub mod transitions;

pub use state::*;
