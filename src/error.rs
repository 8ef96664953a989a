// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use thiserror::Error;

/// Errors returned by [`AccessManager`](crate::AccessManager) operations.
///
/// Every variant is produced by a precondition check performed *before* any
/// state is mutated: a failed operation never leaves the manager's stores
/// partially updated (`spec.md` §5, "Mutation atomicity").
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessManagerError<U, G, C, A>
where
    U: Display,
    G: Display,
    C: Display,
    A: Display,
{
    /// A user referenced by `parameter` does not exist.
    #[error("User '{user}' in argument '{parameter}' does not exist.")]
    UserNotFound { user: U, parameter: &'static str },

    /// A user was added but already exists.
    #[error("User '{user}' in argument 'user' already exists.")]
    UserAlreadyExists { user: U },

    /// A group referenced by `parameter` does not exist.
    #[error("Group '{group}' in argument '{parameter}' does not exist.")]
    GroupNotFound { group: G, parameter: &'static str },

    /// A group was added but already exists.
    #[error("Group '{group}' in argument 'group' already exists.")]
    GroupAlreadyExists { group: G },

    /// A user-to-group mapping was added but already exists.
    #[error("A mapping between user '{user}' and group '{group}' already exists.")]
    UserGroupMappingAlreadyExists { user: U, group: G },

    /// A user-to-group mapping was referenced but does not exist.
    #[error("A mapping between user '{user}' and group '{group}' does not exist.")]
    UserGroupMappingNotFound { user: U, group: G },

    /// A group-to-group mapping was added but already exists.
    #[error("A mapping between group '{from}' and group '{to}' already exists.")]
    GroupGroupMappingAlreadyExists { from: G, to: G },

    /// A group-to-group mapping was referenced but does not exist.
    #[error("A mapping between groups '{from}' and '{to}' does not exist.")]
    GroupGroupMappingNotFound { from: G, to: G },

    /// `add_group_to_group_mapping` was called with `from_group == to_group`.
    #[error("Arguments 'from_group' and 'to_group' cannot contain the same group.")]
    SameGroup,

    /// Adding a group-to-group mapping would close a cycle in `GroupGroupEdges`.
    #[error(
        "A mapping between groups '{from}' and '{to}' cannot be created as it would cause a circular reference."
    )]
    CircularReference { from: G, to: G },

    /// A user/component/access-level mapping was added but already exists.
    #[error(
        "A mapping between user '{user}' application component '{component}' and access level '{access_level}' already exists."
    )]
    UserComponentMappingAlreadyExists {
        user: U,
        component: C,
        access_level: A,
    },

    /// A user/component/access-level mapping was referenced but does not exist.
    #[error(
        "A mapping between user '{user}' application component '{component}' and access level '{access_level}' doesn't exist."
    )]
    UserComponentMappingNotFound {
        user: U,
        component: C,
        access_level: A,
    },

    /// A group/component/access-level mapping was added but already exists.
    #[error(
        "A mapping between group '{group}' application component '{component}' and access level '{access_level}' already exists."
    )]
    GroupComponentMappingAlreadyExists {
        group: G,
        component: C,
        access_level: A,
    },

    /// A group/component/access-level mapping was referenced but does not exist.
    #[error(
        "A mapping between group '{group}' application component '{component}' and access level '{access_level}' doesn't exist."
    )]
    GroupComponentMappingNotFound {
        group: G,
        component: C,
        access_level: A,
    },

    /// An entity type referenced by `parameter` does not exist.
    #[error("Entity type '{entity_type}' in argument '{parameter}' does not exist.")]
    EntityTypeNotFound {
        entity_type: String,
        parameter: &'static str,
    },

    /// An entity type was added but already exists.
    #[error("Entity type '{entity_type}' in argument 'entity_type' already exists.")]
    EntityTypeAlreadyExists { entity_type: String },

    /// An entity type name was empty or all-whitespace.
    #[error(
        "Entity type '{entity_type}' in argument 'entity_type' must contain a valid character."
    )]
    InvalidEntityTypeName { entity_type: String },

    /// An entity referenced by `parameter` does not exist.
    #[error("Entity '{entity}' in argument '{parameter}' does not exist.")]
    EntityNotFound {
        entity: String,
        parameter: &'static str,
    },

    /// An entity was added but already exists.
    #[error("Entity '{entity}' in argument 'entity' already exists.")]
    EntityAlreadyExists { entity: String },

    /// An entity name was empty or all-whitespace.
    #[error("Entity '{entity}' in argument 'entity' must contain a valid character.")]
    InvalidEntityName { entity: String },

    /// A user-to-entity mapping was added but already exists.
    #[error(
        "A mapping between user '{user}' and entity '{entity}' with type '{entity_type}' already exists."
    )]
    UserEntityMappingAlreadyExists {
        user: U,
        entity_type: String,
        entity: String,
    },

    /// A user-to-entity mapping was referenced but does not exist.
    #[error(
        "A mapping between user '{user}' and entity '{entity}' with type '{entity_type}' doesn't exist."
    )]
    UserEntityMappingNotFound {
        user: U,
        entity_type: String,
        entity: String,
    },

    /// A group-to-entity mapping was added but already exists.
    #[error(
        "A mapping between group '{group}' and entity '{entity}' with type '{entity_type}' already exists."
    )]
    GroupEntityMappingAlreadyExists {
        group: G,
        entity_type: String,
        entity: String,
    },

    /// A group-to-entity mapping was referenced but does not exist.
    #[error(
        "A mapping between group '{group}' and entity '{entity}' with type '{entity_type}' doesn't exist."
    )]
    GroupEntityMappingNotFound {
        group: G,
        entity_type: String,
        entity: String,
    },
}

#[cfg(test)]
mod tests {
    use super::AccessManagerError;

    #[test]
    fn user_not_found_message() {
        let err: AccessManagerError<&str, &str, &str, &str> = AccessManagerError::UserNotFound {
            user: "Per1",
            parameter: "user",
        };
        assert_eq!(
            err.to_string(),
            "User 'Per1' in argument 'user' does not exist."
        );
    }

    #[test]
    fn circular_reference_message() {
        let err: AccessManagerError<&str, &str, &str, &str> = AccessManagerError::CircularReference {
            from: "Grp3",
            to: "Grp1",
        };
        assert_eq!(
            err.to_string(),
            "A mapping between groups 'Grp3' and 'Grp1' cannot be created as it would cause a circular reference."
        );
    }

    #[test]
    fn same_group_message() {
        let err: AccessManagerError<&str, &str, &str, &str> = AccessManagerError::SameGroup;
        assert_eq!(
            err.to_string(),
            "Arguments 'from_group' and 'to_group' cannot contain the same group."
        );
    }

    #[test]
    fn invalid_entity_type_name_message() {
        let err: AccessManagerError<&str, &str, &str, &str> =
            AccessManagerError::InvalidEntityTypeName {
                entity_type: "   ".to_string(),
            };
        assert_eq!(
            err.to_string(),
            "Entity type '   ' in argument 'entity_type' must contain a valid character."
        );
    }
}
