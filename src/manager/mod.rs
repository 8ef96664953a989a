// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`AccessManager`] struct: its state, constructor, and the mutation
//! operations over users, groups and entity types/entities (`spec.md` §4.1).
//!
//! Edges, component mappings and entity mappings live in [`super::edges`];
//! the three authorization queries live in [`super::query`].

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use crate::error::AccessManagerError;

mod edges;
mod query;

/// Bound shared by every type parameter of [`AccessManager`].
///
/// `spec.md` §9 requires only equality and hashing; this crate additionally
/// requires `Display` so error messages can embed the offending value (see
/// `DESIGN.md`) and `Clone` because the six stores below own their elements
/// and the traversal engine needs to track visited groups independently of
/// the caller's borrows.
pub trait Identity: Clone + Eq + Hash + Display {}
impl<T> Identity for T where T: Clone + Eq + Hash + Display {}

/// An in-memory, acyclic-graph-structured authorization model.
///
/// Answers "may principal `P` perform operation `O` on resource `R`?" by
/// maintaining users and groups in a directed acyclic group hierarchy, and
/// two families of mappings from that graph onto application components
/// paired with access levels, and onto typed entities.
///
/// `U`, `G`, `C`, `A` are the caller's identity types for users, groups,
/// application components and access levels respectively. Entity types and
/// entities are always plain `String`s, matching the original
/// `AccessManager` this crate's behaviour is grounded on.
///
/// All operations are synchronous and run against process-local memory; see
/// `spec.md` §5 for the full concurrency and resource model.
#[derive(Debug)]
pub struct AccessManager<U, G, C, A>
where
    U: Identity,
    G: Identity,
    C: Identity,
    A: Identity,
{
    pub(crate) users: HashSet<U>,
    pub(crate) groups: HashSet<G>,
    pub(crate) user_group_edges: HashMap<U, HashSet<G>>,
    pub(crate) group_group_edges: HashMap<G, HashSet<G>>,
    pub(crate) user_component_map: HashMap<U, HashSet<(C, A)>>,
    pub(crate) group_component_map: HashMap<G, HashSet<(C, A)>>,
    pub(crate) entity_types: HashMap<String, HashSet<String>>,
    pub(crate) user_entity_map: HashMap<U, HashMap<String, HashSet<String>>>,
    pub(crate) group_entity_map: HashMap<G, HashMap<String, HashSet<String>>>,
}

impl<U, G, C, A> Default for AccessManager<U, G, C, A>
where
    U: Identity,
    G: Identity,
    C: Identity,
    A: Identity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<U, G, C, A> AccessManager<U, G, C, A>
where
    U: Identity,
    G: Identity,
    C: Identity,
    A: Identity,
{
    /// Creates an empty access manager. All six stores start empty and stay
    /// that way until a caller mutates them — there is no background
    /// activity (`spec.md` §3, "Lifecycle").
    pub fn new() -> Self {
        Self {
            users: HashSet::new(),
            groups: HashSet::new(),
            user_group_edges: HashMap::new(),
            group_group_edges: HashMap::new(),
            user_component_map: HashMap::new(),
            group_component_map: HashMap::new(),
            entity_types: HashMap::new(),
            user_entity_map: HashMap::new(),
            group_entity_map: HashMap::new(),
        }
    }

    /// Returns every user currently in the manager.
    pub fn users(&self) -> impl Iterator<Item = &U> {
        self.users.iter()
    }

    /// Returns every group currently in the manager.
    pub fn groups(&self) -> impl Iterator<Item = &G> {
        self.groups.iter()
    }

    /// Returns every declared entity type name.
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.entity_types.keys().map(String::as_str)
    }

    /// Adds a user.
    ///
    /// Fails with [`AccessManagerError::UserAlreadyExists`] if `user` is
    /// already present.
    pub fn add_user(&mut self, user: U) -> Result<(), AccessManagerError<U, G, C, A>> {
        if self.users.contains(&user) {
            tracing::warn!(%user, "add_user rejected: already exists");
            return Err(AccessManagerError::UserAlreadyExists { user });
        }
        self.users.insert(user.clone());
        tracing::debug!(%user, "user added");
        Ok(())
    }

    /// Returns `true` if `user` exists.
    pub fn contains_user(&self, user: &U) -> bool {
        self.users.contains(user)
    }

    /// Removes a user, cascading the removal to every store that references
    /// it: `UserComponentMap[u]`, `UserEntityMap[u]`, and `UserGroupEdges[u]`.
    ///
    /// Fails with [`AccessManagerError::UserNotFound`] if `user` does not
    /// exist; no state is changed in that case.
    pub fn remove_user(&mut self, user: &U) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.users.contains(user) {
            tracing::warn!(%user, "remove_user rejected: not found");
            return Err(AccessManagerError::UserNotFound {
                user: user.clone(),
                parameter: "user",
            });
        }
        self.user_component_map.remove(user);
        self.user_entity_map.remove(user);
        self.user_group_edges.remove(user);
        self.users.remove(user);
        tracing::debug!(%user, "user removed");
        Ok(())
    }

    /// Adds a group.
    ///
    /// Fails with [`AccessManagerError::GroupAlreadyExists`] if `group` is
    /// already present.
    pub fn add_group(&mut self, group: G) -> Result<(), AccessManagerError<U, G, C, A>> {
        if self.groups.contains(&group) {
            tracing::warn!(%group, "add_group rejected: already exists");
            return Err(AccessManagerError::GroupAlreadyExists { group });
        }
        self.groups.insert(group.clone());
        tracing::debug!(%group, "group added");
        Ok(())
    }

    /// Returns `true` if `group` exists.
    pub fn contains_group(&self, group: &G) -> bool {
        self.groups.contains(group)
    }

    /// Removes a group, cascading to `GroupComponentMap[g]`,
    /// `GroupEntityMap[g]` and its outbound `GroupGroupEdges[g]`.
    ///
    /// Also purges `g` from every *other* group's outbound edge set, so that
    /// no dangling inbound reference survives — `spec.md` §9 flags the
    /// source implementation as inconsistent here and recommends this fix.
    ///
    /// Fails with [`AccessManagerError::GroupNotFound`] if `group` does not
    /// exist; no state is changed in that case.
    pub fn remove_group(&mut self, group: &G) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.groups.contains(group) {
            tracing::warn!(%group, "remove_group rejected: not found");
            return Err(AccessManagerError::GroupNotFound {
                group: group.clone(),
                parameter: "group",
            });
        }
        self.group_component_map.remove(group);
        self.group_entity_map.remove(group);
        self.group_group_edges.remove(group);
        for outbound in self.group_group_edges.values_mut() {
            outbound.remove(group);
        }
        self.groups.remove(group);
        tracing::debug!(%group, "group removed");
        Ok(())
    }

    /// Adds an entity type.
    ///
    /// Fails with [`AccessManagerError::EntityTypeAlreadyExists`] if already
    /// present, or [`AccessManagerError::InvalidEntityTypeName`] if `name` is
    /// empty or all-whitespace. Existence is checked before the name-validity
    /// check, matching the original implementation this is grounded on.
    pub fn add_entity_type(
        &mut self,
        entity_type: impl Into<String>,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        let entity_type = entity_type.into();
        if self.entity_types.contains_key(&entity_type) {
            tracing::warn!(entity_type, "add_entity_type rejected: already exists");
            return Err(AccessManagerError::EntityTypeAlreadyExists { entity_type });
        }
        if is_invalid_name(&entity_type) {
            tracing::warn!(entity_type, "add_entity_type rejected: invalid name");
            return Err(AccessManagerError::InvalidEntityTypeName { entity_type });
        }
        self.entity_types.insert(entity_type.clone(), HashSet::new());
        tracing::debug!(entity_type, "entity type added");
        Ok(())
    }

    /// Returns `true` if `entity_type` exists.
    pub fn contains_entity_type(&self, entity_type: &str) -> bool {
        self.entity_types.contains_key(entity_type)
    }

    /// Removes an entity type, purging it from every `UserEntityMap`/
    /// `GroupEntityMap` row first.
    ///
    /// Fails with [`AccessManagerError::EntityTypeNotFound`] if it does not
    /// exist.
    pub fn remove_entity_type(
        &mut self,
        entity_type: &str,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.entity_types.contains_key(entity_type) {
            tracing::warn!(entity_type, "remove_entity_type rejected: not found");
            return Err(AccessManagerError::EntityTypeNotFound {
                entity_type: entity_type.to_string(),
                parameter: "entity_type",
            });
        }
        for by_type in self.user_entity_map.values_mut() {
            by_type.remove(entity_type);
        }
        for by_type in self.group_entity_map.values_mut() {
            by_type.remove(entity_type);
        }
        self.entity_types.remove(entity_type);
        tracing::debug!(entity_type, "entity type removed");
        Ok(())
    }

    /// Adds an entity of type `entity_type`.
    ///
    /// Validation order matches the original: entity-type existence, then
    /// entity uniqueness, then name validity.
    pub fn add_entity(
        &mut self,
        entity_type: &str,
        entity: impl Into<String>,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        let entities = self
            .entity_types
            .get_mut(entity_type)
            .ok_or_else(|| AccessManagerError::EntityTypeNotFound {
                entity_type: entity_type.to_string(),
                parameter: "entity_type",
            })?;
        let entity = entity.into();
        if entities.contains(&entity) {
            tracing::warn!(entity_type, entity, "add_entity rejected: already exists");
            return Err(AccessManagerError::EntityAlreadyExists { entity });
        }
        if is_invalid_name(&entity) {
            tracing::warn!(entity_type, entity, "add_entity rejected: invalid name");
            return Err(AccessManagerError::InvalidEntityName { entity });
        }
        entities.insert(entity.clone());
        tracing::debug!(entity_type, entity, "entity added");
        Ok(())
    }

    /// Returns `true` if `entity` exists under `entity_type`.
    pub fn contains_entity(&self, entity_type: &str, entity: &str) -> bool {
        self.entity_types
            .get(entity_type)
            .is_some_and(|entities| entities.contains(entity))
    }

    /// Returns every entity declared under `entity_type`.
    ///
    /// Fails with [`AccessManagerError::EntityTypeNotFound`] if the type does
    /// not exist.
    pub fn get_entities(
        &self,
        entity_type: &str,
    ) -> Result<impl Iterator<Item = &str>, AccessManagerError<U, G, C, A>> {
        self.entity_types
            .get(entity_type)
            .map(|entities| entities.iter().map(String::as_str))
            .ok_or_else(|| AccessManagerError::EntityTypeNotFound {
                entity_type: entity_type.to_string(),
                parameter: "entity_type",
            })
    }

    /// Removes `entity` from `entity_type`, purging it from every
    /// `User`/`GroupEntityMap` row under that type first.
    ///
    /// Fails with [`AccessManagerError::EntityTypeNotFound`] or
    /// [`AccessManagerError::EntityNotFound`].
    pub fn remove_entity(
        &mut self,
        entity_type: &str,
        entity: &str,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        let entities =
            self.entity_types
                .get(entity_type)
                .ok_or_else(|| AccessManagerError::EntityTypeNotFound {
                    entity_type: entity_type.to_string(),
                    parameter: "entity_type",
                })?;
        if !entities.contains(entity) {
            tracing::warn!(entity_type, entity, "remove_entity rejected: not found");
            return Err(AccessManagerError::EntityNotFound {
                entity: entity.to_string(),
                parameter: "entity",
            });
        }

        for by_type in self.user_entity_map.values_mut() {
            if let Some(entities) = by_type.get_mut(entity_type) {
                entities.remove(entity);
            }
        }
        for by_type in self.group_entity_map.values_mut() {
            if let Some(entities) = by_type.get_mut(entity_type) {
                entities.remove(entity);
            }
        }
        self.entity_types
            .get_mut(entity_type)
            .expect("checked above")
            .remove(entity);
        tracing::debug!(entity_type, entity, "entity removed");
        Ok(())
    }
}

/// An entity type/entity name is invalid if it is empty or contains only
/// whitespace (`spec.md` §4.1).
fn is_invalid_name(name: &str) -> bool {
    name.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestManager = AccessManager<&'static str, &'static str, &'static str, &'static str>;

    #[test]
    fn add_and_remove_user_round_trips() {
        let mut manager = TestManager::new();
        manager.add_user("Per1").unwrap();
        assert!(manager.contains_user(&"Per1"));
        manager.remove_user(&"Per1").unwrap();
        assert!(!manager.contains_user(&"Per1"));
    }

    #[test]
    fn add_user_twice_fails() {
        let mut manager = TestManager::new();
        manager.add_user("Per1").unwrap();
        let err = manager.add_user("Per1").unwrap_err();
        assert_eq!(err.to_string(), "User 'Per1' in argument 'user' already exists.");
        // Failed operation did not duplicate state.
        assert_eq!(manager.users().count(), 1);
    }

    #[test]
    fn remove_unknown_user_fails() {
        let mut manager = TestManager::new();
        let err = manager.remove_user(&"ghost").unwrap_err();
        assert_eq!(
            err.to_string(),
            "User 'ghost' in argument 'user' does not exist."
        );
    }

    #[test]
    fn remove_group_purges_inbound_edges() {
        let mut manager = TestManager::new();
        for g in ["g1", "g2"] {
            manager.add_group(g).unwrap();
        }
        manager.add_group_to_group_mapping("g1", "g2").unwrap();
        manager.remove_group(&"g2").unwrap();
        assert_eq!(
            manager.get_group_to_group_mappings(&"g1").unwrap().count(),
            0
        );
    }

    #[test]
    fn entity_type_name_must_not_be_blank() {
        let mut manager = TestManager::new();
        let err = manager.add_entity_type("   ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Entity type '   ' in argument 'entity_type' must contain a valid character."
        );
    }

    #[test]
    fn remove_entity_type_purges_mappings() {
        let mut manager = TestManager::new();
        manager.add_user("u1").unwrap();
        manager.add_entity_type("ClientAccount").unwrap();
        manager.add_entity("ClientAccount", "CompanyA").unwrap();
        manager
            .add_user_to_entity_mapping("u1", "ClientAccount", "CompanyA")
            .unwrap();

        manager.remove_entity_type("ClientAccount").unwrap();

        assert!(!manager.contains_entity_type("ClientAccount"));
        assert_eq!(
            manager
                .get_user_to_entity_mappings_for_user("u1")
                .unwrap()
                .count(),
            0
        );
    }

    #[test]
    fn cascade_on_remove_user_scenario_s5() {
        let mut manager = TestManager::new();
        manager.add_user("u1").unwrap();
        manager.add_group("g1").unwrap();
        manager.add_entity_type("ClientAccount").unwrap();
        manager.add_entity("ClientAccount", "CompanyA").unwrap();

        manager.add_user_to_group_mapping("u1", "g1").unwrap();
        manager
            .add_user_to_application_component_and_access_level_mapping("u1", "ORDER", "VIEW")
            .unwrap();
        manager
            .add_user_to_entity_mapping("u1", "ClientAccount", "CompanyA")
            .unwrap();

        manager.remove_user(&"u1").unwrap();

        assert!(!manager.contains_user(&"u1"));
        assert!(manager.get_user_to_group_mappings(&"u1").is_err());
        assert!(
            manager
                .get_user_to_application_component_and_access_level_mappings(&"u1")
                .is_err()
        );
        assert!(manager.get_user_to_entity_mappings_for_user("u1").is_err());
    }
}
