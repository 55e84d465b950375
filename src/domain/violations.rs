//! Violation records: detected rule failures with their review context
//!
//! Architecture: Rich Domain Models - a ViolationRecord is an entity with behavior, not just data
//! - Construction validates the required reference chain (rule, snapshot, project)
//! - The record resolves its own open review by delegating to the review resolver
//! - Rendering lives in the report layer; the record only exposes read access

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::reviews::{find_open_review, Review};
use super::rules::RuleRef;
use super::{QualityError, QualityResult};

/// Ordinal severity of a violation, least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Info,
    Minor,
    Major,
    Critical,
    Blocker,
}

impl Priority {
    /// Uppercase symbolic name, the encoding both output formats use
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Minor => "MINOR",
            Self::Major => "MAJOR",
            Self::Critical => "CRITICAL",
            Self::Blocker => "BLOCKER",
        }
    }
}

/// The project a snapshot was captured from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
    pub scope: String,
    pub qualifier: String,
    pub language: String,
}

/// A captured analysis context for one project at one point in time
///
/// The project link is optional at load time; a well-formed violation record
/// requires it to be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    project: Option<Project>,
}

impl Snapshot {
    /// Snapshot with its project chain eagerly loaded
    pub fn of(project: Project) -> Self {
        Self { project: Some(project) }
    }

    /// Snapshot whose project link failed to load
    pub fn detached() -> Self {
        Self { project: None }
    }

    /// The project this snapshot was captured from, if loaded
    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }
}

/// Raw detection event, as handed over by the persistence collaborator
///
/// Optional where the backing store can be incomplete; turning a detection
/// into a [`ViolationRecord`] validates the required reference chain.
#[derive(Debug, Clone)]
pub struct Detection {
    pub message: String,
    pub priority: Priority,
    pub line: Option<u32>,
    pub switched_off: Option<bool>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub rule: Option<RuleRef>,
    pub snapshot: Option<Snapshot>,
}

impl Detection {
    /// Detection with the given message and severity, everything else unset
    pub fn new(message: impl Into<String>, priority: Priority) -> Self {
        Self {
            message: message.into(),
            priority,
            line: None,
            switched_off: None,
            created_at: None,
            rule: None,
            snapshot: None,
        }
    }

    /// Set the line the violation was detected on
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Mark the violation as switched off
    pub fn with_switched_off(mut self, switched_off: bool) -> Self {
        self.switched_off = Some(switched_off);
        self
    }

    /// Set the detection time
    pub fn with_created_at(mut self, created_at: DateTime<FixedOffset>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set the broken rule
    pub fn with_rule(mut self, rule: RuleRef) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Set the analysis snapshot
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

/// One detected rule failure plus its contextual references and reviews
///
/// Reviews share the record's permanent id, which links them to the same
/// logical violation across repeated detections.
#[derive(Debug)]
pub struct ViolationRecord {
    message: String,
    line: Option<u32>,
    priority: Priority,
    switched_off: bool,
    created_at: Option<DateTime<FixedOffset>>,
    rule: RuleRef,
    snapshot: Snapshot,
    permanent_id: u64,
    reviews: Vec<Box<dyn Review>>,
}

impl ViolationRecord {
    /// Build a record from a detection event and its review history
    ///
    /// Fails with an integrity error when the rule, the snapshot, or the
    /// snapshot's project is missing; a record that passed construction is
    /// well formed and safe to hand to the serializer. Reviews are kept in
    /// ascending creation order regardless of the order they arrive in.
    pub fn from_detection(
        detection: Detection,
        permanent_id: u64,
        mut reviews: Vec<Box<dyn Review>>,
    ) -> QualityResult<Self> {
        let rule = detection
            .rule
            .ok_or_else(|| QualityError::integrity("violation record has no rule reference"))?;
        let snapshot = detection
            .snapshot
            .ok_or_else(|| QualityError::integrity("violation record has no snapshot"))?;
        if snapshot.project().is_none() {
            return Err(QualityError::integrity("violation snapshot has no project"));
        }

        reviews.sort_by_key(|r| r.created_at());

        Ok(Self {
            message: detection.message,
            line: detection.line,
            priority: detection.priority,
            switched_off: detection.switched_off.unwrap_or(false),
            created_at: detection.created_at,
            rule,
            snapshot,
            permanent_id,
            reviews,
        })
    }

    /// Human-readable description of the failure
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Line the violation was detected on; absent means not line-scoped
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// Severity of the failure
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Whether the violation has been switched off by a reviewer
    pub fn switched_off(&self) -> bool {
        self.switched_off
    }

    /// Detection time, if recorded
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.created_at
    }

    /// The rule that was broken
    pub fn rule(&self) -> &RuleRef {
        &self.rule
    }

    /// The analysis snapshot the violation was detected in
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The project the snapshot was captured from
    pub fn project(&self) -> QualityResult<&Project> {
        self.snapshot
            .project()
            .ok_or_else(|| QualityError::integrity("violation snapshot has no project"))
    }

    /// Stable id linking this violation to its reviews across re-detections
    pub fn permanent_id(&self) -> u64 {
        self.permanent_id
    }

    /// Reviews tied to this violation, ascending by creation time
    pub fn reviews(&self) -> &[Box<dyn Review>] {
        &self.reviews
    }

    /// The review currently awaiting resolution, if any
    pub fn open_review(&self) -> Option<&dyn Review> {
        find_open_review(&self.reviews)
    }
}
