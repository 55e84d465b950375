//! Quality Catalog - quality models, violation records and dual-format rendering
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure domain logic separated from infrastructure concerns
//! - The catalog stands in for the persistence collaborator and enforces
//!   catalog-wide invariants; everything else is a synchronous, side-effect
//!   free computation over already-loaded object graphs
//! - Report adapters render one violation record into two structurally
//!   equivalent representations

pub mod catalog;
pub mod domain;
pub mod report;

// Re-export main types for convenient access
pub use domain::{
    Characteristic, CharacteristicGraph, CharacteristicId, Detection, Priority, Project,
    QualityError, QualityModel, QualityResult, Review, RuleRef, Snapshot, ViolationRecord,
};

pub use catalog::{ModelCatalog, ModelId};

pub use report::{OutputFormat, ViolationFormatter};

/// Convenience function to render a violation record in one format
pub fn format_violation(record: &ViolationRecord, format: OutputFormat) -> QualityResult<String> {
    ViolationFormatter::new().format_record(record, format)
}

/// Convenience function to render both representations of one record
///
/// Returns the JSON-shaped and XML-shaped outputs as a pair; both are built
/// from the same canonical field extraction, so they carry the same fields.
pub fn format_violation_both(record: &ViolationRecord) -> QualityResult<(String, String)> {
    let formatter = ViolationFormatter::new();
    let json = formatter.format_record(record, OutputFormat::Json)?;
    let xml = formatter.format_record(record, OutputFormat::Xml)?;
    Ok((json, xml))
}
