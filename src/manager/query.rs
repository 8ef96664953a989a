// SPDX-License-Identifier: MIT OR Apache-2.0

//! The three authorization queries (`spec.md` §4.3): `has_access_to_...`
//! checks halt on the first hit, `get_accessible_entities` collects the
//! union over every reachable group.

use std::collections::HashSet;

use super::{AccessManager, Identity};
use crate::error::AccessManagerError;
use crate::traversal::{AccessTraverser, CollectEntitiesTraverser, EntityMappingTraverser, traverse_from_user};

impl<U, G, C, A> AccessManager<U, G, C, A>
where
    U: Identity,
    G: Identity,
    C: Identity,
    A: Identity,
{
    /// Returns `true` if `user` has `(component, access_level)` access,
    /// either directly via `UserComponentMap` or transitively through any
    /// group reachable from `user`'s direct group memberships.
    ///
    /// Returns `Ok(false)`, not an error, if `user` does not exist — this
    /// query is total over the user domain (`spec.md` §4.3).
    ///
    /// The group hierarchy is searched depth-first and halts at the first
    /// group carrying the mapping; the direct `UserComponentMap` check runs
    /// first since it never requires a traversal.
    pub fn has_access_to_application_component(
        &self,
        user: &U,
        component: &C,
        access_level: &A,
    ) -> Result<bool, AccessManagerError<U, G, C, A>> {
        if !self.users.contains(user) {
            return Ok(false);
        }

        let direct = self
            .user_component_map
            .get(user)
            .is_some_and(|pairs| pairs.contains(&(component.clone(), access_level.clone())));
        if direct {
            return Ok(true);
        }

        let Some(direct_groups) = self.user_group_edges.get(user) else {
            return Ok(false);
        };
        let mut traverser = AccessTraverser::new(component, access_level, &self.group_component_map);
        traverse_from_user(direct_groups.iter(), &self.group_group_edges, &mut traverser);
        Ok(traverser.has_access())
    }

    /// Returns `true` if `user` has access to `entity` of type
    /// `entity_type`, either directly via `UserEntityMap` or transitively
    /// through any group reachable from `user`'s direct group memberships.
    ///
    /// Fails with [`AccessManagerError::EntityTypeNotFound`] or
    /// [`AccessManagerError::EntityNotFound`] if `entity_type`/`entity` are
    /// not a valid type/entity pair — checked before user existence, since
    /// those are structural preconditions on the query itself. A missing
    /// `user` then yields `Ok(false)` rather than an error, matching
    /// `has_access_to_application_component` (`spec.md` §4.3).
    pub fn has_access_to_entity(
        &self,
        user: &U,
        entity_type: &str,
        entity: &str,
    ) -> Result<bool, AccessManagerError<U, G, C, A>> {
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

        if !self.users.contains(user) {
            return Ok(false);
        }

        let direct = self
            .user_entity_map
            .get(user)
            .and_then(|by_type| by_type.get(entity_type))
            .is_some_and(|entities| entities.contains(entity));
        if direct {
            return Ok(true);
        }

        let Some(direct_groups) = self.user_group_edges.get(user) else {
            return Ok(false);
        };
        let mut traverser = EntityMappingTraverser::new(entity_type, entity, &self.group_entity_map);
        traverse_from_user(direct_groups.iter(), &self.group_group_edges, &mut traverser);
        Ok(traverser.has_access())
    }

    /// Returns every entity of type `entity_type` that `user` can access,
    /// either directly via `UserEntityMap` or transitively through any group
    /// reachable from `user`'s direct group memberships.
    ///
    /// Unlike the `has_access_to_*` queries this never halts early: every
    /// reachable group is visited so the full union can be collected.
    pub fn get_accessible_entities(
        &self,
        user: &U,
        entity_type: &str,
    ) -> Result<HashSet<String>, AccessManagerError<U, G, C, A>> {
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

        let mut accessible: HashSet<String> = self
            .user_entity_map
            .get(user)
            .and_then(|by_type| by_type.get(entity_type))
            .into_iter()
            .flatten()
            .cloned()
            .collect();

        if let Some(direct_groups) = self.user_group_edges.get(user) {
            let mut traverser = CollectEntitiesTraverser::new(entity_type, &self.group_entity_map);
            traverse_from_user(direct_groups.iter(), &self.group_group_edges, &mut traverser);
            accessible.extend(traverser.into_collected());
        }

        Ok(accessible)
    }
}
