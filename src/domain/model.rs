//! Quality models and their characteristic hierarchies
//!
//! Architecture: Rich Domain Models - a QualityModel owns every characteristic it contains
//! - Characteristics live in an arena owned by the model; edges are id pairs
//! - A characteristic may have several parents, so the hierarchy is a DAG, not a tree
//! - Root and rule-bound views are recomputed per call from live edge state,
//!   never cached, so structural edits can not leave a stale view behind

use serde::{Deserialize, Serialize};

use super::rules::RuleRef;
use super::{QualityError, QualityResult};

/// Maximum length of a quality model name, in characters
pub const MAX_MODEL_NAME_LEN: usize = 100;

/// Opaque identifier of a characteristic, unique within its owning model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacteristicId(u32);

impl CharacteristicId {
    /// Raw index value, for diagnostics only
    pub fn index(self) -> u32 {
        self.0
    }
}

/// A node in a quality model's taxonomy graph
///
/// A characteristic bound to a rule is a leaf-level, directly enforceable
/// node; one with an empty parent list is a root of the taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Characteristic {
    id: CharacteristicId,
    key: String,
    name: String,
    description: Option<String>,
    parents: Vec<CharacteristicId>,
    rule: Option<RuleRef>,
}

impl Characteristic {
    fn new(id: CharacteristicId, name: &str) -> Self {
        let name = name.trim().to_string();
        // Key derived from the name: upper-cased, spaces become underscores
        let key = name.to_uppercase().replace(' ', "_");
        Self { id, key, name, description: None, parents: Vec::new(), rule: None }
    }

    /// Identifier of this characteristic within its model
    pub fn id(&self) -> CharacteristicId {
        self.id
    }

    /// Stable key derived from the name at creation time
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional free-form description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Identifiers of this characteristic's parents
    pub fn parents(&self) -> &[CharacteristicId] {
        &self.parents
    }

    /// The rule this characteristic enforces, if any
    pub fn rule(&self) -> Option<&RuleRef> {
        self.rule.as_ref()
    }

    /// Whether this characteristic sits at the top of the taxonomy
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Whether this characteristic is bound to a concrete rule
    pub fn has_rule(&self) -> bool {
        self.rule.is_some()
    }
}

/// Arena of characteristics plus their parent edges, owned by one model
///
/// Removed nodes leave a tombstone slot behind so identifiers of surviving
/// nodes stay valid for the lifetime of the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacteristicGraph {
    nodes: Vec<Option<Characteristic>>,
}

impl CharacteristicGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a characteristic with the given name, returning its identifier
    pub fn add_node(&mut self, name: &str) -> CharacteristicId {
        let id = CharacteristicId(self.nodes.len() as u32);
        self.nodes.push(Some(Characteristic::new(id, name)));
        id
    }

    /// Look up a characteristic by id
    pub fn get(&self, id: CharacteristicId) -> Option<&Characteristic> {
        self.nodes.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    fn get_mut(&mut self, id: CharacteristicId) -> Option<&mut Characteristic> {
        self.nodes.get_mut(id.0 as usize).and_then(|slot| slot.as_mut())
    }

    fn require(&self, id: CharacteristicId) -> QualityResult<&Characteristic> {
        self.get(id)
            .ok_or_else(|| QualityError::validation(format!("unknown characteristic id {}", id.0)))
    }

    /// Number of live characteristics
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether the graph holds no live characteristics
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Iterate over live characteristics in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Characteristic> {
        self.nodes.iter().filter_map(|slot| slot.as_ref())
    }

    /// Record `parent` as a parent of `child`
    ///
    /// Self-links are rejected; linking the same pair twice is a no-op.
    pub fn link(&mut self, parent: CharacteristicId, child: CharacteristicId) -> QualityResult<()> {
        if parent == child {
            return Err(QualityError::validation(format!(
                "characteristic {} can not be its own parent",
                parent.0
            )));
        }
        self.require(parent)?;
        self.require(child)?;

        let node = self.get_mut(child).ok_or_else(|| {
            QualityError::validation(format!("unknown characteristic id {}", child.0))
        })?;
        if !node.parents.contains(&parent) {
            node.parents.push(parent);
        }
        Ok(())
    }

    /// Remove the parent edge between `parent` and `child`, if present
    pub fn unlink(
        &mut self,
        parent: CharacteristicId,
        child: CharacteristicId,
    ) -> QualityResult<()> {
        self.require(parent)?;
        let node = self.get_mut(child).ok_or_else(|| {
            QualityError::validation(format!("unknown characteristic id {}", child.0))
        })?;
        node.parents.retain(|&p| p != parent);
        Ok(())
    }

    /// Bind `rule` to a characteristic, or clear the binding with `None`
    pub fn set_rule(&mut self, id: CharacteristicId, rule: Option<RuleRef>) -> QualityResult<()> {
        let node = self
            .get_mut(id)
            .ok_or_else(|| QualityError::validation(format!("unknown characteristic id {}", id.0)))?;
        node.rule = rule;
        Ok(())
    }

    /// Set a characteristic's description
    pub fn set_description(
        &mut self,
        id: CharacteristicId,
        description: impl Into<String>,
    ) -> QualityResult<()> {
        let node = self
            .get_mut(id)
            .ok_or_else(|| QualityError::validation(format!("unknown characteristic id {}", id.0)))?;
        node.description = Some(description.into());
        Ok(())
    }

    /// Remove a characteristic and every edge that referenced it
    ///
    /// No orphan references survive: surviving nodes lose the removed id
    /// from their parent lists.
    pub fn remove_node(&mut self, id: CharacteristicId) -> QualityResult<()> {
        self.require(id)?;
        self.nodes[id.0 as usize] = None;
        for slot in &mut self.nodes {
            if let Some(node) = slot {
                node.parents.retain(|&p| p != id);
            }
        }
        Ok(())
    }

    /// Every characteristic whose parent list is empty, in insertion order
    pub fn roots(&self) -> Vec<&Characteristic> {
        self.iter().filter(|c| c.is_root()).collect()
    }

    /// Every characteristic bound to a rule, in insertion order
    pub fn rule_bound(&self) -> Vec<&Characteristic> {
        self.iter().filter(|c| c.has_rule()).collect()
    }

    /// Characteristics that list `id` as a parent, in insertion order
    pub fn children(&self, id: CharacteristicId) -> Vec<&Characteristic> {
        self.iter().filter(|c| c.parents.contains(&id)).collect()
    }

    /// First parent of `id` carrying the given name
    pub fn parent_named(&self, id: CharacteristicId, name: &str) -> Option<&Characteristic> {
        let node = self.get(id)?;
        node.parents.iter().filter_map(|&p| self.get(p)).find(|c| c.name == name)
    }

    /// First child of `id` carrying the given name
    pub fn child_named(&self, id: CharacteristicId, name: &str) -> Option<&Characteristic> {
        self.children(id).into_iter().find(|c| c.name == name)
    }
}

/// A named catalog entry owning a taxonomy of characteristics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityModel {
    name: String,
    graph: CharacteristicGraph,
}

impl QualityModel {
    /// Create a model with the given name
    ///
    /// Fails with a validation error if the name is empty or longer than
    /// [`MAX_MODEL_NAME_LEN`] characters. Catalog-wide name uniqueness is the
    /// catalog's concern, not the model's.
    pub fn new(name: impl Into<String>) -> QualityResult<Self> {
        let name = name.into();
        validate_model_name(&name)?;
        Ok(Self { name, graph: CharacteristicGraph::new() })
    }

    /// The model's name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) -> QualityResult<()> {
        validate_model_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// The characteristic graph owned by this model
    pub fn graph(&self) -> &CharacteristicGraph {
        &self.graph
    }

    /// Mutable access to the characteristic graph
    pub fn graph_mut(&mut self) -> &mut CharacteristicGraph {
        &mut self.graph
    }

    /// Add a characteristic to this model
    pub fn add_characteristic(&mut self, name: &str) -> CharacteristicId {
        self.graph.add_node(name)
    }

    /// Look up a characteristic by id
    pub fn characteristic(&self, id: CharacteristicId) -> Option<&Characteristic> {
        self.graph.get(id)
    }

    /// Every characteristic with no parents
    pub fn root_characteristics(&self) -> Vec<&Characteristic> {
        self.graph.roots()
    }

    /// Every characteristic bound to a rule
    pub fn characteristics_with_rule(&self) -> Vec<&Characteristic> {
        self.graph.rule_bound()
    }
}

/// Check a model name against the 1..=100 character contract
pub fn validate_model_name(name: &str) -> QualityResult<()> {
    let len = name.chars().count();
    if len == 0 {
        return Err(QualityError::validation("model name must not be empty"));
    }
    if len > MAX_MODEL_NAME_LEN {
        return Err(QualityError::validation(format!(
            "model name exceeds {} characters ({})",
            MAX_MODEL_NAME_LEN, len
        )));
    }
    Ok(())
}
