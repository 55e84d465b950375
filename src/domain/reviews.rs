//! Review workflow contract and open-review resolution
//!
//! Reviews are owned by an external workflow; the domain only consumes their
//! status, creation time and self-serialization. The workflow keeps at most
//! one review open per violation at any consistent point in time; the
//! resolver does not re-check that invariant.

use chrono::{DateTime, FixedOffset};
use serde_json::Value as JsonValue;
use std::fmt;

/// Status value marking a review as still awaiting resolution
pub const OPEN_STATUS: &str = "open";

/// Contract exposed by the external review workflow
pub trait Review: fmt::Debug {
    /// Current workflow status, `"open"` while awaiting resolution
    fn status(&self) -> &str;

    /// When the review was created
    fn created_at(&self) -> DateTime<FixedOffset>;

    /// Self-serialization to a JSON-shaped fragment
    ///
    /// `include_violation` asks for the parent violation's details to be
    /// re-embedded; callers rendering a violation pass `false` to get the
    /// review's self-contained representation.
    fn to_json_fragment(&self, include_violation: bool) -> JsonValue;
}

/// Find the review currently open for a violation
///
/// Scans in the given order (ascending creation time) and returns the first
/// review whose status is `"open"`. If the workflow ever produced two open
/// reviews at once, the earliest-created one is authoritative for display;
/// this is deliberately first-match, not latest-match.
pub fn find_open_review(reviews: &[Box<dyn Review>]) -> Option<&dyn Review> {
    reviews.iter().find(|r| r.status() == OPEN_STATUS).map(|r| r.as_ref())
}
