// SPDX-License-Identifier: MIT OR Apache-2.0

//! An in-memory, graph-structured access control model.
//!
//! [`AccessManager`] tracks users and groups in a directed acyclic group
//! hierarchy, maps users and groups onto `(application component, access
//! level)` pairs, and maps users and groups onto typed entities (e.g. "which
//! `ClientAccount`s can this user see"). A user's effective access is the
//! union of what is mapped directly to them and what is mapped to any group
//! reachable from their direct group memberships.
//!
//! ```
//! use access_manager::AccessManager;
//!
//! let mut manager: AccessManager<&str, &str, &str, &str> = AccessManager::new();
//! manager.add_user("alice").unwrap();
//! manager.add_group("engineers").unwrap();
//! manager.add_user_to_group_mapping("alice", "engineers").unwrap();
//! manager
//!     .add_group_to_application_component_and_access_level_mapping(
//!         "engineers",
//!         "deploy-pipeline",
//!         "TRIGGER",
//!     )
//!     .unwrap();
//!
//! assert!(manager
//!     .has_access_to_application_component(&"alice", &"deploy-pipeline", &"TRIGGER")
//!     .unwrap());
//! ```
//!
//! All operations run synchronously against process-local memory; there is
//! no persistence or networking layer. See `SPEC_FULL.md` for the full
//! design, including the concurrency model (this crate is not internally
//! synchronized — wrap an [`AccessManager`] in a `RwLock` or similar for
//! shared access) and the exact validation order of every mutation.

mod error;
mod manager;
mod traversal;

pub use error::AccessManagerError;
pub use manager::{AccessManager, Identity};
