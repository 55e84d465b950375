//! In-memory catalog of quality models
//!
//! CDD Principle: Anti-Corruption Layer - the catalog stands in for the persistence collaborator
//! - Enforces catalog-wide name uniqueness at create and rename time
//! - Deleting a model drops its whole characteristic arena with it, so the
//!   cascade is structural rather than bookkept
//! - Mutations take `&mut self`, which serializes create/rename requests the
//!   way the storage collaborator is expected to

use std::collections::HashMap;

use crate::domain::model::validate_model_name;
use crate::domain::{QualityError, QualityModel, QualityResult};

/// Identifier of a quality model within the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(u64);

/// Catalog holding every quality model in the system
#[derive(Debug, Default)]
pub struct ModelCatalog {
    models: HashMap<u64, QualityModel>,
    next_id: u64,
}

impl ModelCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quality model with the given name
    ///
    /// Fails with a validation error on an empty name, a name longer than
    /// 100 characters, or a name already used by another model. The match is
    /// case-sensitive and exact.
    pub fn create_model(&mut self, name: &str) -> QualityResult<ModelId> {
        self.check_name_free(name, None)?;
        let model = QualityModel::new(name)?;

        let id = self.next_id;
        self.next_id += 1;
        self.models.insert(id, model);
        tracing::debug!("created quality model '{}' (id {})", name, id);
        Ok(ModelId(id))
    }

    /// Rename an existing model, applying the same naming rules as creation
    pub fn rename_model(&mut self, id: ModelId, name: &str) -> QualityResult<()> {
        self.check_name_free(name, Some(id))?;
        let model = self
            .models
            .get_mut(&id.0)
            .ok_or_else(|| QualityError::validation(format!("unknown model id {}", id.0)))?;
        let old = model.name().to_string();
        model.set_name(name.to_string())?;
        tracing::debug!("renamed quality model '{}' to '{}'", old, name);
        Ok(())
    }

    /// Delete a model together with all of its characteristics
    pub fn delete_model(&mut self, id: ModelId) -> QualityResult<()> {
        let model = self
            .models
            .remove(&id.0)
            .ok_or_else(|| QualityError::validation(format!("unknown model id {}", id.0)))?;
        tracing::debug!(
            "deleted quality model '{}' and its {} characteristics",
            model.name(),
            model.graph().len()
        );
        Ok(())
    }

    /// Look up a model by id
    pub fn model(&self, id: ModelId) -> Option<&QualityModel> {
        self.models.get(&id.0)
    }

    /// Mutable access to a model, for characteristic edits
    pub fn model_mut(&mut self, id: ModelId) -> Option<&mut QualityModel> {
        self.models.get_mut(&id.0)
    }

    /// Look up a model by exact name
    pub fn model_by_name(&self, name: &str) -> Option<&QualityModel> {
        self.models.values().find(|m| m.name() == name)
    }

    /// Number of models in the catalog
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn check_name_free(&self, name: &str, exclude: Option<ModelId>) -> QualityResult<()> {
        validate_model_name(name)?;
        let taken = self
            .models
            .iter()
            .any(|(&id, m)| m.name() == name && exclude.map_or(true, |e| e.0 != id));
        if taken {
            return Err(QualityError::validation(format!(
                "a quality model named '{}' already exists",
                name
            )));
        }
        Ok(())
    }
}
