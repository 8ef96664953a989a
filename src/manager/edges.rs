// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mutation and read operations over `UserGroupEdges`, `GroupGroupEdges`,
//! the two `*ComponentMap`s and the two `*EntityMap`s (`spec.md` §4.2).

use std::collections::HashSet;

use super::{AccessManager, Identity};
use crate::error::AccessManagerError;
use crate::traversal::{CycleCheckTraverser, traverse_group_subtree};

impl<U, G, C, A> AccessManager<U, G, C, A>
where
    U: Identity,
    G: Identity,
    C: Identity,
    A: Identity,
{
    /// Joins `user` to `group`.
    ///
    /// Fails with [`AccessManagerError::UserNotFound`],
    /// [`AccessManagerError::GroupNotFound`] or
    /// [`AccessManagerError::UserGroupMappingAlreadyExists`].
    pub fn add_user_to_group_mapping(
        &mut self,
        user: U,
        group: G,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.users.contains(&user) {
            return Err(AccessManagerError::UserNotFound {
                user,
                parameter: "user",
            });
        }
        if !self.groups.contains(&group) {
            return Err(AccessManagerError::GroupNotFound {
                group,
                parameter: "group",
            });
        }
        let row = self.user_group_edges.entry(user.clone()).or_default();
        if !row.insert(group.clone()) {
            tracing::warn!(%user, %group, "add_user_to_group_mapping rejected: already exists");
            return Err(AccessManagerError::UserGroupMappingAlreadyExists { user, group });
        }
        tracing::debug!(%user, %group, "user joined group");
        Ok(())
    }

    /// Removes the mapping between `user` and `group`.
    pub fn remove_user_to_group_mapping(
        &mut self,
        user: &U,
        group: &G,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.users.contains(user) {
            return Err(AccessManagerError::UserNotFound {
                user: user.clone(),
                parameter: "user",
            });
        }
        if !self.groups.contains(group) {
            return Err(AccessManagerError::GroupNotFound {
                group: group.clone(),
                parameter: "group",
            });
        }
        let removed = self
            .user_group_edges
            .get_mut(user)
            .is_some_and(|row| row.remove(group));
        if !removed {
            return Err(AccessManagerError::UserGroupMappingNotFound {
                user: user.clone(),
                group: group.clone(),
            });
        }
        if self.user_group_edges.get(user).is_some_and(HashSet::is_empty) {
            self.user_group_edges.remove(user);
        }
        tracing::debug!(%user, %group, "user left group");
        Ok(())
    }

    /// Returns the groups `user` is directly joined to. Direct edges only —
    /// no transitive closure.
    pub fn get_user_to_group_mappings(
        &self,
        user: &U,
    ) -> Result<impl Iterator<Item = &G>, AccessManagerError<U, G, C, A>> {
        if !self.users.contains(user) {
            return Err(AccessManagerError::UserNotFound {
                user: user.clone(),
                parameter: "user",
            });
        }
        Ok(self
            .user_group_edges
            .get(user)
            .into_iter()
            .flat_map(HashSet::iter))
    }

    /// Adds a directed edge `from_group -> to_group` to the group hierarchy.
    ///
    /// Validation order: `from_group` exists, `to_group` exists,
    /// `from_group != to_group`, the edge is not already present, and
    /// finally a cycle check — a traversal starting at `to_group` must not
    /// reach `from_group`. Only if all five checks pass is the edge
    /// inserted (`spec.md` §4.2, §5 "Mutation atomicity").
    pub fn add_group_to_group_mapping(
        &mut self,
        from_group: G,
        to_group: G,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.groups.contains(&from_group) {
            return Err(AccessManagerError::GroupNotFound {
                group: from_group,
                parameter: "from_group",
            });
        }
        if !self.groups.contains(&to_group) {
            return Err(AccessManagerError::GroupNotFound {
                group: to_group,
                parameter: "to_group",
            });
        }
        if from_group == to_group {
            return Err(AccessManagerError::SameGroup);
        }
        if self
            .group_group_edges
            .get(&from_group)
            .is_some_and(|row| row.contains(&to_group))
        {
            return Err(AccessManagerError::GroupGroupMappingAlreadyExists {
                from: from_group,
                to: to_group,
            });
        }

        let mut cycle_check = CycleCheckTraverser::new(&from_group);
        traverse_group_subtree(&to_group, &self.group_group_edges, &mut cycle_check);
        if cycle_check.would_cycle() {
            tracing::warn!(
                from = %from_group,
                to = %to_group,
                "add_group_to_group_mapping rejected: would create a cycle"
            );
            return Err(AccessManagerError::CircularReference {
                from: from_group,
                to: to_group,
            });
        }

        self.group_group_edges
            .entry(from_group.clone())
            .or_default()
            .insert(to_group.clone());
        tracing::debug!(from = %from_group, to = %to_group, "group-to-group mapping added");
        Ok(())
    }

    /// Removes the mapping between `from_group` and `to_group`.
    pub fn remove_group_to_group_mapping(
        &mut self,
        from_group: &G,
        to_group: &G,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.groups.contains(from_group) {
            return Err(AccessManagerError::GroupNotFound {
                group: from_group.clone(),
                parameter: "from_group",
            });
        }
        if !self.groups.contains(to_group) {
            return Err(AccessManagerError::GroupNotFound {
                group: to_group.clone(),
                parameter: "to_group",
            });
        }
        let removed = self
            .group_group_edges
            .get_mut(from_group)
            .is_some_and(|row| row.remove(to_group));
        if !removed {
            return Err(AccessManagerError::GroupGroupMappingNotFound {
                from: from_group.clone(),
                to: to_group.clone(),
            });
        }
        if self
            .group_group_edges
            .get(from_group)
            .is_some_and(HashSet::is_empty)
        {
            self.group_group_edges.remove(from_group);
        }
        tracing::debug!(from = %from_group, to = %to_group, "group-to-group mapping removed");
        Ok(())
    }

    /// Returns the groups `group` is directly mapped to. Direct edges only.
    pub fn get_group_to_group_mappings(
        &self,
        group: &G,
    ) -> Result<impl Iterator<Item = &G>, AccessManagerError<U, G, C, A>> {
        if !self.groups.contains(group) {
            return Err(AccessManagerError::GroupNotFound {
                group: group.clone(),
                parameter: "group",
            });
        }
        Ok(self
            .group_group_edges
            .get(group)
            .into_iter()
            .flat_map(HashSet::iter))
    }

    /// Grants `user` direct `(component, access_level)` access.
    pub fn add_user_to_application_component_and_access_level_mapping(
        &mut self,
        user: U,
        component: C,
        access_level: A,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.users.contains(&user) {
            return Err(AccessManagerError::UserNotFound {
                user,
                parameter: "user",
            });
        }
        let row = self.user_component_map.entry(user.clone()).or_default();
        if !row.insert((component.clone(), access_level.clone())) {
            return Err(AccessManagerError::UserComponentMappingAlreadyExists {
                user,
                component,
                access_level,
            });
        }
        tracing::debug!(%user, %component, %access_level, "user component mapping added");
        Ok(())
    }

    /// Revokes `user`'s direct `(component, access_level)` access.
    pub fn remove_user_to_application_component_and_access_level_mapping(
        &mut self,
        user: &U,
        component: &C,
        access_level: &A,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.users.contains(user) {
            return Err(AccessManagerError::UserNotFound {
                user: user.clone(),
                parameter: "user",
            });
        }
        let removed = self
            .user_component_map
            .get_mut(user)
            .is_some_and(|row| row.remove(&(component.clone(), access_level.clone())));
        if !removed {
            return Err(AccessManagerError::UserComponentMappingNotFound {
                user: user.clone(),
                component: component.clone(),
                access_level: access_level.clone(),
            });
        }
        if self
            .user_component_map
            .get(user)
            .is_some_and(HashSet::is_empty)
        {
            self.user_component_map.remove(user);
        }
        tracing::debug!(%user, %component, %access_level, "user component mapping removed");
        Ok(())
    }

    /// Returns the `(component, access_level)` pairs `user` is directly
    /// mapped to.
    pub fn get_user_to_application_component_and_access_level_mappings(
        &self,
        user: &U,
    ) -> Result<impl Iterator<Item = &(C, A)>, AccessManagerError<U, G, C, A>> {
        if !self.users.contains(user) {
            return Err(AccessManagerError::UserNotFound {
                user: user.clone(),
                parameter: "user",
            });
        }
        Ok(self
            .user_component_map
            .get(user)
            .into_iter()
            .flat_map(HashSet::iter))
    }

    /// Grants `group` direct `(component, access_level)` access.
    pub fn add_group_to_application_component_and_access_level_mapping(
        &mut self,
        group: G,
        component: C,
        access_level: A,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.groups.contains(&group) {
            return Err(AccessManagerError::GroupNotFound {
                group,
                parameter: "group",
            });
        }
        let row = self.group_component_map.entry(group.clone()).or_default();
        if !row.insert((component.clone(), access_level.clone())) {
            return Err(AccessManagerError::GroupComponentMappingAlreadyExists {
                group,
                component,
                access_level,
            });
        }
        tracing::debug!(%group, %component, %access_level, "group component mapping added");
        Ok(())
    }

    /// Revokes `group`'s direct `(component, access_level)` access.
    pub fn remove_group_to_application_component_and_access_level_mapping(
        &mut self,
        group: &G,
        component: &C,
        access_level: &A,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.groups.contains(group) {
            return Err(AccessManagerError::GroupNotFound {
                group: group.clone(),
                parameter: "group",
            });
        }
        let removed = self
            .group_component_map
            .get_mut(group)
            .is_some_and(|row| row.remove(&(component.clone(), access_level.clone())));
        if !removed {
            return Err(AccessManagerError::GroupComponentMappingNotFound {
                group: group.clone(),
                component: component.clone(),
                access_level: access_level.clone(),
            });
        }
        if self
            .group_component_map
            .get(group)
            .is_some_and(HashSet::is_empty)
        {
            self.group_component_map.remove(group);
        }
        tracing::debug!(%group, %component, %access_level, "group component mapping removed");
        Ok(())
    }

    /// Returns the `(component, access_level)` pairs `group` is directly
    /// mapped to.
    pub fn get_group_to_application_component_and_access_level_mappings(
        &self,
        group: &G,
    ) -> Result<impl Iterator<Item = &(C, A)>, AccessManagerError<U, G, C, A>> {
        if !self.groups.contains(group) {
            return Err(AccessManagerError::GroupNotFound {
                group: group.clone(),
                parameter: "group",
            });
        }
        Ok(self
            .group_component_map
            .get(group)
            .into_iter()
            .flat_map(HashSet::iter))
    }

    /// Maps `user` directly onto `entity` of type `entity_type`.
    ///
    /// Validation order: user exists, entity type exists, entity exists
    /// under that type, mapping not already present.
    pub fn add_user_to_entity_mapping(
        &mut self,
        user: U,
        entity_type: &str,
        entity: &str,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.users.contains(&user) {
            return Err(AccessManagerError::UserNotFound {
                user,
                parameter: "user",
            });
        }
        let known_entities =
            self.entity_types
                .get(entity_type)
                .ok_or_else(|| AccessManagerError::EntityTypeNotFound {
                    entity_type: entity_type.to_string(),
                    parameter: "entity_type",
                })?;
        if !known_entities.contains(entity) {
            return Err(AccessManagerError::EntityNotFound {
                entity: entity.to_string(),
                parameter: "entity",
            });
        }
        let by_type = self.user_entity_map.entry(user.clone()).or_default();
        let row = by_type.entry(entity_type.to_string()).or_default();
        if !row.insert(entity.to_string()) {
            return Err(AccessManagerError::UserEntityMappingAlreadyExists {
                user,
                entity_type: entity_type.to_string(),
                entity: entity.to_string(),
            });
        }
        tracing::debug!(%user, entity_type, entity, "user entity mapping added");
        Ok(())
    }

    /// Removes the mapping between `user` and `entity` of type
    /// `entity_type`.
    ///
    /// Validation order: user exists, entity type exists, entity exists
    /// under that type, then mapping exists (`SPEC_FULL.md` §4, resolving
    /// `spec.md` §9 Open Question 1 by following the original implementation
    /// for both the user and group variants).
    pub fn remove_user_to_entity_mapping(
        &mut self,
        user: &U,
        entity_type: &str,
        entity: &str,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.users.contains(user) {
            return Err(AccessManagerError::UserNotFound {
                user: user.clone(),
                parameter: "user",
            });
        }
        let known_entities =
            self.entity_types
                .get(entity_type)
                .ok_or_else(|| AccessManagerError::EntityTypeNotFound {
                    entity_type: entity_type.to_string(),
                    parameter: "entity_type",
                })?;
        if !known_entities.contains(entity) {
            return Err(AccessManagerError::EntityNotFound {
                entity: entity.to_string(),
                parameter: "entity",
            });
        }
        let removed = self
            .user_entity_map
            .get_mut(user)
            .and_then(|by_type| by_type.get_mut(entity_type))
            .is_some_and(|row| row.remove(entity));
        if !removed {
            return Err(AccessManagerError::UserEntityMappingNotFound {
                user: user.clone(),
                entity_type: entity_type.to_string(),
                entity: entity.to_string(),
            });
        }
        tracing::debug!(%user, entity_type, entity, "user entity mapping removed");
        Ok(())
    }

    /// Returns every `(entity_type, entity)` pair `user` is directly mapped
    /// to.
    pub fn get_user_to_entity_mappings_for_user(
        &self,
        user: &U,
    ) -> Result<impl Iterator<Item = (&str, &str)>, AccessManagerError<U, G, C, A>> {
        if !self.users.contains(user) {
            return Err(AccessManagerError::UserNotFound {
                user: user.clone(),
                parameter: "user",
            });
        }
        Ok(self.user_entity_map.get(user).into_iter().flat_map(
            |by_type| {
                by_type.iter().flat_map(|(entity_type, entities)| {
                    entities
                        .iter()
                        .map(move |entity| (entity_type.as_str(), entity.as_str()))
                })
            },
        ))
    }

    /// Returns every entity of type `entity_type` that `user` is directly
    /// mapped to.
    pub fn get_user_to_entity_mappings_for_user_and_entity_type(
        &self,
        user: &U,
        entity_type: &str,
    ) -> Result<impl Iterator<Item = &str>, AccessManagerError<U, G, C, A>> {
        if !self.users.contains(user) {
            return Err(AccessManagerError::UserNotFound {
                user: user.clone(),
                parameter: "user",
            });
        }
        if !self.entity_types.contains_key(entity_type) {
            return Err(AccessManagerError::EntityTypeNotFound {
                entity_type: entity_type.to_string(),
                parameter: "entity_type",
            });
        }
        Ok(self
            .user_entity_map
            .get(user)
            .and_then(|by_type| by_type.get(entity_type))
            .into_iter()
            .flat_map(|entities| entities.iter().map(String::as_str)))
    }

    /// Maps `group` directly onto `entity` of type `entity_type`.
    pub fn add_group_to_entity_mapping(
        &mut self,
        group: G,
        entity_type: &str,
        entity: &str,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.groups.contains(&group) {
            return Err(AccessManagerError::GroupNotFound {
                group,
                parameter: "group",
            });
        }
        let known_entities =
            self.entity_types
                .get(entity_type)
                .ok_or_else(|| AccessManagerError::EntityTypeNotFound {
                    entity_type: entity_type.to_string(),
                    parameter: "entity_type",
                })?;
        if !known_entities.contains(entity) {
            return Err(AccessManagerError::EntityNotFound {
                entity: entity.to_string(),
                parameter: "entity",
            });
        }
        let by_type = self.group_entity_map.entry(group.clone()).or_default();
        let row = by_type.entry(entity_type.to_string()).or_default();
        if !row.insert(entity.to_string()) {
            return Err(AccessManagerError::GroupEntityMappingAlreadyExists {
                group,
                entity_type: entity_type.to_string(),
                entity: entity.to_string(),
            });
        }
        tracing::debug!(%group, entity_type, entity, "group entity mapping added");
        Ok(())
    }

    /// Removes the mapping between `group` and `entity` of type
    /// `entity_type`. Checks entity existence before mapping existence, for
    /// the same reason as [`Self::remove_user_to_entity_mapping`].
    pub fn remove_group_to_entity_mapping(
        &mut self,
        group: &G,
        entity_type: &str,
        entity: &str,
    ) -> Result<(), AccessManagerError<U, G, C, A>> {
        if !self.groups.contains(group) {
            return Err(AccessManagerError::GroupNotFound {
                group: group.clone(),
                parameter: "group",
            });
        }
        let known_entities =
            self.entity_types
                .get(entity_type)
                .ok_or_else(|| AccessManagerError::EntityTypeNotFound {
                    entity_type: entity_type.to_string(),
                    parameter: "entity_type",
                })?;
        if !known_entities.contains(entity) {
            return Err(AccessManagerError::EntityNotFound {
                entity: entity.to_string(),
                parameter: "entity",
            });
        }
        let removed = self
            .group_entity_map
            .get_mut(group)
            .and_then(|by_type| by_type.get_mut(entity_type))
            .is_some_and(|row| row.remove(entity));
        if !removed {
            return Err(AccessManagerError::GroupEntityMappingNotFound {
                group: group.clone(),
                entity_type: entity_type.to_string(),
                entity: entity.to_string(),
            });
        }
        tracing::debug!(%group, entity_type, entity, "group entity mapping removed");
        Ok(())
    }

    /// Returns every `(entity_type, entity)` pair `group` is directly mapped
    /// to.
    pub fn get_group_to_entity_mappings_for_group(
        &self,
        group: &G,
    ) -> Result<impl Iterator<Item = (&str, &str)>, AccessManagerError<U, G, C, A>> {
        if !self.groups.contains(group) {
            return Err(AccessManagerError::GroupNotFound {
                group: group.clone(),
                parameter: "group",
            });
        }
        Ok(self.group_entity_map.get(group).into_iter().flat_map(
            |by_type| {
                by_type.iter().flat_map(|(entity_type, entities)| {
                    entities
                        .iter()
                        .map(move |entity| (entity_type.as_str(), entity.as_str()))
                })
            },
        ))
    }

    /// Returns every entity of type `entity_type` that `group` is directly
    /// mapped to.
    pub fn get_group_to_entity_mappings_for_group_and_entity_type(
        &self,
        group: &G,
        entity_type: &str,
    ) -> Result<impl Iterator<Item = &str>, AccessManagerError<U, G, C, A>> {
        if !self.groups.contains(group) {
            return Err(AccessManagerError::GroupNotFound {
                group: group.clone(),
                parameter: "group",
            });
        }
        if !self.entity_types.contains_key(entity_type) {
            return Err(AccessManagerError::EntityTypeNotFound {
                entity_type: entity_type.to_string(),
                parameter: "entity_type",
            });
        }
        Ok(self
            .group_entity_map
            .get(group)
            .and_then(|by_type| by_type.get(entity_type))
            .into_iter()
            .flat_map(|entities| entities.iter().map(String::as_str)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestManager = AccessManager<&'static str, &'static str, &'static str, &'static str>;

    fn manager_with_groups(groups: &[&'static str]) -> TestManager {
        let mut manager = TestManager::new();
        for g in groups {
            manager.add_group(*g).unwrap();
        }
        manager
    }

    /// Scenario S1 — basic group inheritance.
    #[test]
    fn scenario_s1_group_inheritance() {
        let mut manager = TestManager::new();
        for u in ["Per1", "Per2", "Per3", "Per4", "Per5", "Per6", "Per7"] {
            manager.add_user(u).unwrap();
        }
        for g in ["Grp1", "Grp2", "Grp3", "Grp4"] {
            manager.add_group(g).unwrap();
        }
        for (u, g) in [
            ("Per1", "Grp1"),
            ("Per2", "Grp1"),
            ("Per3", "Grp1"),
            ("Per3", "Grp2"),
            ("Per4", "Grp2"),
            ("Per5", "Grp2"),
            ("Per6", "Grp2"),
            ("Per7", "Grp3"),
        ] {
            manager.add_user_to_group_mapping(u, g).unwrap();
        }
        for (from, to) in [("Grp1", "Grp4"), ("Grp1", "Grp3"), ("Grp2", "Grp3")] {
            manager.add_group_to_group_mapping(from, to).unwrap();
        }

        let per3_groups: HashSet<_> = manager.get_user_to_group_mappings(&"Per3").unwrap().copied().collect();
        assert_eq!(per3_groups, HashSet::from(["Grp1", "Grp2"]));

        let grp1_groups: HashSet<_> = manager
            .get_group_to_group_mappings(&"Grp1")
            .unwrap()
            .copied()
            .collect();
        assert_eq!(grp1_groups, HashSet::from(["Grp4", "Grp3"]));

        assert_eq!(manager.get_group_to_group_mappings(&"Grp3").unwrap().count(), 0);
    }

    /// Scenario S2 — cycle rejection.
    #[test]
    fn scenario_s2_cycle_rejection() {
        let mut manager = manager_with_groups(&["g1", "g2", "g3", "g4"]);
        manager.add_group_to_group_mapping("g1", "g2").unwrap();
        manager.add_group_to_group_mapping("g2", "g3").unwrap();
        manager.add_group_to_group_mapping("g3", "g4").unwrap();

        let err = manager.add_group_to_group_mapping("g3", "g1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "A mapping between groups 'g3' and 'g1' cannot be created as it would cause a circular reference."
        );

        // Rejected operation must not have mutated the edge set.
        let g3_edges: HashSet<_> = manager.get_group_to_group_mappings(&"g3").unwrap().copied().collect();
        assert_eq!(g3_edges, HashSet::from(["g4"]));
    }

    #[test]
    fn same_group_edge_is_rejected() {
        let mut manager = manager_with_groups(&["g1"]);
        let err = manager.add_group_to_group_mapping("g1", "g1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Arguments 'from_group' and 'to_group' cannot contain the same group."
        );
    }

    #[test]
    fn duplicate_user_group_mapping_is_rejected() {
        let mut manager = TestManager::new();
        manager.add_user("u1").unwrap();
        manager.add_group("g1").unwrap();
        manager.add_user_to_group_mapping("u1", "g1").unwrap();
        let err = manager.add_user_to_group_mapping("u1", "g1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "A mapping between user 'u1' and group 'g1' already exists."
        );
    }

    #[test]
    fn component_mapping_round_trips_and_drops_empty_row() {
        let mut manager = TestManager::new();
        manager.add_user("u1").unwrap();
        manager
            .add_user_to_application_component_and_access_level_mapping("u1", "ORDER", "VIEW")
            .unwrap();
        assert_eq!(
            manager
                .get_user_to_application_component_and_access_level_mappings(&"u1")
                .unwrap()
                .count(),
            1
        );
        manager
            .remove_user_to_application_component_and_access_level_mapping(&"u1", &"ORDER", &"VIEW")
            .unwrap();
        assert_eq!(
            manager
                .get_user_to_application_component_and_access_level_mappings(&"u1")
                .unwrap()
                .count(),
            0
        );
    }

    /// Scenario S6 — cascade on remove_entity.
    #[test]
    fn scenario_s6_cascade_on_remove_entity() {
        let mut manager = TestManager::new();
        manager.add_user("user1").unwrap();
        manager.add_user("user2").unwrap();
        manager.add_group("group1").unwrap();
        manager.add_entity_type("ClientAccount").unwrap();
        manager.add_entity("ClientAccount", "CompanyB").unwrap();
        manager.add_entity("ClientAccount", "CompanyC").unwrap();

        manager
            .add_user_to_entity_mapping("user1", "ClientAccount", "CompanyB")
            .unwrap();
        manager
            .add_user_to_entity_mapping("user2", "ClientAccount", "CompanyB")
            .unwrap();
        manager
            .add_group_to_entity_mapping("group1", "ClientAccount", "CompanyB")
            .unwrap();
        manager
            .add_group_to_entity_mapping("group1", "ClientAccount", "CompanyC")
            .unwrap();

        manager.remove_entity("ClientAccount", "CompanyB").unwrap();

        let user1_entities: HashSet<_> = manager
            .get_user_to_entity_mappings_for_user("user1")
            .unwrap()
            .collect();
        assert!(!user1_entities.contains(&("ClientAccount", "CompanyB")));

        let user2_entities: HashSet<_> = manager
            .get_user_to_entity_mappings_for_user("user2")
            .unwrap()
            .collect();
        assert!(!user2_entities.contains(&("ClientAccount", "CompanyB")));

        let group1_entities: HashSet<_> = manager
            .get_group_to_entity_mappings_for_group("group1")
            .unwrap()
            .collect();
        assert!(!group1_entities.contains(&("ClientAccount", "CompanyB")));
        assert!(group1_entities.contains(&("ClientAccount", "CompanyC")));
    }

    #[test]
    fn remove_user_to_entity_mapping_checks_entity_before_mapping() {
        let mut manager = TestManager::new();
        manager.add_user("u1").unwrap();
        manager.add_entity_type("ClientAccount").unwrap();
        manager.add_entity("ClientAccount", "CompanyA").unwrap();

        // Entity exists but was never mapped to the user: mapping-not-found,
        // not entity-not-found.
        let err = manager
            .remove_user_to_entity_mapping(&"u1", "ClientAccount", "CompanyA")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "A mapping between user 'u1' and entity 'CompanyA' with type 'ClientAccount' doesn't exist."
        );

        // Entity itself does not exist under the type: entity-not-found takes
        // precedence over the mapping check.
        let err = manager
            .remove_user_to_entity_mapping(&"u1", "ClientAccount", "CompanyZ")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Entity 'CompanyZ' in argument 'entity' does not exist."
        );
    }
}
