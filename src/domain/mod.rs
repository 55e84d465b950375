//! Domain layer for Quality Catalog
//!
//! CDD Principle: Domain Model - Pure business logic for the quality-assessment domain
//! - Contains all core entities, value objects, and domain services
//! - Independent of infrastructure concerns like databases, file systems, or external APIs
//! - Expresses the ubiquitous language of quality models, characteristics and violations

pub mod model;
pub mod reviews;
pub mod rules;
pub mod violations;

// Re-export main domain types for convenience
pub use model::{Characteristic, CharacteristicGraph, CharacteristicId, QualityModel};
pub use reviews::{find_open_review, Review};
pub use rules::RuleRef;
pub use violations::{Detection, Priority, Project, Snapshot, ViolationRecord};

/// Error types that can occur across the quality-catalog domain
#[derive(Debug, thiserror::Error)]
pub enum QualityError {
    /// A naming or graph-shape contract was breached by the caller
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A violation record is missing a required reference
    #[error("Integrity error: {message}")]
    Integrity { message: String },

    /// Writing a rendered record to an output sink failed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl QualityError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    /// Create an integrity error
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity { message: message.into() }
    }
}

/// Result type for quality-catalog operations
pub type QualityResult<T> = Result<T, QualityError>;
