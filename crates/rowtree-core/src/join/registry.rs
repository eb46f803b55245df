//! Child join registry with exact and canonical lookup.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use super::name::canonical_name;
use super::JoinNode;
use crate::config::JoinMatching;
use crate::error::{Error, Result};

/// Ordered registry of a node's child joins.
///
/// Registration order is the only iteration order for children. A canonical
/// index is maintained alongside so fuzzy lookups stay O(1) and collisions
/// are detected when a join is registered rather than when it is looked up.
#[derive(Debug, Clone, Default)]
pub struct JoinRegistry {
    joins: IndexMap<String, Arc<JoinNode>>,
    canonical: HashMap<String, Vec<String>>,
    matching: JoinMatching,
}

impl JoinRegistry {
    /// Create an empty registry.
    pub fn new(matching: JoinMatching) -> Self {
        Self {
            joins: IndexMap::new(),
            canonical: HashMap::new(),
            matching,
        }
    }

    /// Current matching mode.
    pub fn matching(&self) -> JoinMatching {
        self.matching
    }

    /// Register a child join.
    ///
    /// Under fuzzy matching a join ID whose canonical form is already taken
    /// is rejected as ambiguous.
    pub fn register(&mut self, table: &str, join_id: String, node: Arc<JoinNode>) -> Result<()> {
        if self.joins.contains_key(&join_id) {
            return Err(Error::DuplicateJoin {
                join_id,
                table: table.to_string(),
            });
        }

        let canonical = canonical_name(&join_id);
        if self.matching == JoinMatching::Fuzzy {
            if let Some(existing) = self.canonical.get(&canonical) {
                let mut candidates = existing.clone();
                candidates.push(join_id.clone());
                return Err(Error::AmbiguousJoin {
                    name: join_id,
                    candidates,
                });
            }
        }

        self.canonical
            .entry(canonical)
            .or_default()
            .push(join_id.clone());
        self.joins.insert(join_id, node);
        Ok(())
    }

    /// Change the matching mode, re-checking for canonical collisions when
    /// switching to fuzzy matching.
    pub fn set_matching(&mut self, matching: JoinMatching) -> Result<()> {
        if matching == JoinMatching::Fuzzy {
            if let Some((canonical, ids)) = self.canonical.iter().find(|(_, ids)| ids.len() > 1) {
                return Err(Error::AmbiguousJoin {
                    name: canonical.clone(),
                    candidates: ids.clone(),
                });
            }
        }
        self.matching = matching;
        Ok(())
    }

    /// Resolve a requested name to a registered join ID.
    ///
    /// An exact match always wins. Otherwise, under fuzzy matching, the
    /// canonical form of `name` selects the join.
    pub fn resolve(&self, table: &str, name: &str) -> Result<&str> {
        if let Some((join_id, _)) = self.joins.get_key_value(name) {
            return Ok(join_id.as_str());
        }

        if self.matching == JoinMatching::Fuzzy {
            // Fuzzy registries hold at most one join per canonical form.
            if let Some(join_id) = self
                .canonical
                .get(&canonical_name(name))
                .and_then(|ids| ids.first())
            {
                return Ok(join_id.as_str());
            }
        }

        Err(Error::JoinNotFound {
            name: name.to_string(),
            table: table.to_string(),
        })
    }

    /// Get a child join by its exact ID.
    pub fn get(&self, join_id: &str) -> Option<&Arc<JoinNode>> {
        self.joins.get(join_id)
    }

    /// Iterate over `(join_id, node)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<JoinNode>)> {
        self.joins.iter().map(|(id, node)| (id.as_str(), node))
    }

    /// Registered join IDs in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.joins.keys().map(String::as_str)
    }

    /// Number of registered joins.
    pub fn len(&self) -> usize {
        self.joins.len()
    }

    /// Check if no joins are registered.
    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }
}
