// SPDX-License-Identifier: MIT OR Apache-2.0

//! The depth-first traversal engine shared by every authorization query and by
//! the group-to-group cycle check.
//!
//! A single recursive routine walks the user→group→…→group chain, invoking a
//! [`Visitor`] at each group and honouring its early-termination signal. Four
//! visitors are defined against this engine in this module; only the visitor
//! differs between `has_access_to_application_component`,
//! `has_access_to_entity`, `get_accessible_entities` and the cycle check
//! performed by `add_group_to_group_mapping`.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Receives one callback per group visited during a traversal.
///
/// Returning `false` requests early termination: the engine stops exploring
/// further siblings of the group that returned `false`, though — matching the
/// source algorithm this crate is grounded on — a branch already in flight
/// when `false` is returned completes before the signal takes effect (see
/// `spec.md` §9, "likely source bugs" note 4).
pub(crate) trait Visitor<G> {
    fn visit(&mut self, group: &G) -> bool;
}

/// Runs `visitor` over every group reachable from `direct_groups`, via zero or
/// more `GroupGroupEdges` hops, visiting each group at most once.
///
/// `direct_groups` are the groups a user is directly joined to
/// (`UserGroupEdges[u]`); `edges` is the `GroupGroupEdges` adjacency map.
pub(crate) fn traverse_from_user<'a, G, I>(
    direct_groups: I,
    edges: &HashMap<G, HashSet<G>>,
    visitor: &mut dyn Visitor<G>,
) where
    G: Eq + Hash + Clone + 'a,
    I: IntoIterator<Item = &'a G>,
{
    let mut visited: HashSet<G> = HashSet::new();
    for group in direct_groups {
        if visited.insert(group.clone()) {
            traverse_from_group(group, edges, &mut visited, visitor);
        }
    }
}

/// Runs `visitor` over `start` and everything reachable from it via
/// `GroupGroupEdges`, visiting each group at most once.
///
/// Unlike [`traverse_from_user`], the traversal begins *at* `start` itself
/// rather than at its neighbors. Used by the group-to-group cycle check,
/// which must ask "does `to_group` (or anything below it) reach
/// `from_group`?", including `to_group` itself.
pub(crate) fn traverse_group_subtree<G>(
    start: &G,
    edges: &HashMap<G, HashSet<G>>,
    visitor: &mut dyn Visitor<G>,
) where
    G: Eq + Hash + Clone,
{
    let mut visited: HashSet<G> = HashSet::new();
    visited.insert(start.clone());
    traverse_from_group(start, edges, &mut visited, visitor);
}

/// Recurses into `group`, invoking `visitor` and then its unvisited
/// `GroupGroupEdges` neighbors, returning the traversal's continue/halt
/// signal to the caller.
fn traverse_from_group<G>(
    group: &G,
    edges: &HashMap<G, HashSet<G>>,
    visited: &mut HashSet<G>,
    visitor: &mut dyn Visitor<G>,
) -> bool
where
    G: Eq + Hash + Clone,
{
    let mut keep_going = visitor.visit(group);

    if let Some(neighbors) = edges.get(group) {
        for neighbor in neighbors {
            if visited.insert(neighbor.clone()) {
                keep_going = traverse_from_group(neighbor, edges, visited, visitor);
            }
            if !keep_going {
                break;
            }
        }
    }

    keep_going
}

/// Halts on the first visited group whose `GroupComponentMap` contains
/// `(component, access_level)`.
pub(crate) struct AccessTraverser<'a, G, C, A> {
    component: &'a C,
    access_level: &'a A,
    group_component_map: &'a HashMap<G, HashSet<(C, A)>>,
    has_access: bool,
}

impl<'a, G, C, A> AccessTraverser<'a, G, C, A> {
    pub(crate) fn new(
        component: &'a C,
        access_level: &'a A,
        group_component_map: &'a HashMap<G, HashSet<(C, A)>>,
    ) -> Self {
        Self {
            component,
            access_level,
            group_component_map,
            has_access: false,
        }
    }

    pub(crate) fn has_access(&self) -> bool {
        self.has_access
    }
}

impl<'a, G, C, A> Visitor<G> for AccessTraverser<'a, G, C, A>
where
    G: Eq + Hash,
    C: Eq + Hash + Clone,
    A: Eq + Hash + Clone,
{
    fn visit(&mut self, group: &G) -> bool {
        let found = self.group_component_map.get(group).is_some_and(|pairs| {
            pairs.contains(&(self.component.clone(), self.access_level.clone()))
        });
        if found {
            self.has_access = true;
            false
        } else {
            true
        }
    }
}

/// Halts on the first visited group whose `GroupEntityMap[g][entity_type]`
/// contains `entity`.
pub(crate) struct EntityMappingTraverser<'a, G> {
    entity_type: &'a str,
    entity: &'a str,
    group_entity_map: &'a HashMap<G, HashMap<String, HashSet<String>>>,
    has_access: bool,
}

impl<'a, G> EntityMappingTraverser<'a, G> {
    pub(crate) fn new(
        entity_type: &'a str,
        entity: &'a str,
        group_entity_map: &'a HashMap<G, HashMap<String, HashSet<String>>>,
    ) -> Self {
        Self {
            entity_type,
            entity,
            group_entity_map,
            has_access: false,
        }
    }

    pub(crate) fn has_access(&self) -> bool {
        self.has_access
    }
}

impl<'a, G> Visitor<G> for EntityMappingTraverser<'a, G>
where
    G: Eq + Hash,
{
    fn visit(&mut self, group: &G) -> bool {
        let found = self
            .group_entity_map
            .get(group)
            .and_then(|by_type| by_type.get(self.entity_type))
            .is_some_and(|entities| entities.contains(self.entity));
        if found {
            self.has_access = true;
            false
        } else {
            true
        }
    }
}

/// Visits every reachable group, accumulating the union of
/// `GroupEntityMap[g][entity_type]`.
pub(crate) struct CollectEntitiesTraverser<'a, G> {
    entity_type: &'a str,
    group_entity_map: &'a HashMap<G, HashMap<String, HashSet<String>>>,
    collected: HashSet<String>,
}

impl<'a, G> CollectEntitiesTraverser<'a, G> {
    pub(crate) fn new(
        entity_type: &'a str,
        group_entity_map: &'a HashMap<G, HashMap<String, HashSet<String>>>,
    ) -> Self {
        Self {
            entity_type,
            group_entity_map,
            collected: HashSet::new(),
        }
    }

    pub(crate) fn into_collected(self) -> HashSet<String> {
        self.collected
    }
}

impl<'a, G> Visitor<G> for CollectEntitiesTraverser<'a, G>
where
    G: Eq + Hash,
{
    fn visit(&mut self, group: &G) -> bool {
        if let Some(entities) = self
            .group_entity_map
            .get(group)
            .and_then(|by_type| by_type.get(self.entity_type))
        {
            self.collected.extend(entities.iter().cloned());
        }
        true
    }
}

/// Visits every reachable group until `target` is encountered, at which point
/// it records that a cycle would result and halts.
///
/// Used by `add_group_to_group_mapping(from_group, to_group)`: a traversal
/// starting at `to_group` that reaches `from_group` means the new edge would
/// close a cycle.
pub(crate) struct CycleCheckTraverser<'a, G> {
    target: &'a G,
    would_cycle: bool,
}

impl<'a, G> CycleCheckTraverser<'a, G> {
    pub(crate) fn new(target: &'a G) -> Self {
        Self {
            target,
            would_cycle: false,
        }
    }

    pub(crate) fn would_cycle(&self) -> bool {
        self.would_cycle
    }
}

impl<'a, G> Visitor<G> for CycleCheckTraverser<'a, G>
where
    G: PartialEq,
{
    fn visit(&mut self, group: &G) -> bool {
        if group == self.target {
            self.would_cycle = true;
            false
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingVisitor {
        order: Vec<&'static str>,
        halt_at: Option<&'static str>,
    }

    impl Visitor<&'static str> for RecordingVisitor {
        fn visit(&mut self, group: &&'static str) -> bool {
            self.order.push(group);
            self.halt_at != Some(*group)
        }
    }

    fn diamond_edges() -> HashMap<&'static str, HashSet<&'static str>> {
        let mut edges = HashMap::new();
        edges.insert("g1", HashSet::from(["g3", "g4"]));
        edges.insert("g2", HashSet::from(["g4"]));
        edges
    }

    #[test]
    fn visits_each_group_at_most_once() {
        let edges = diamond_edges();
        let direct = vec!["g1", "g2"];
        let mut visitor = RecordingVisitor {
            order: Vec::new(),
            halt_at: None,
        };
        traverse_from_user(direct.iter(), &edges, &mut visitor);

        // g4 is reachable via both g1 and g2 but must only be visited once.
        let g4_visits = visitor.order.iter().filter(|g| **g == "g4").count();
        assert_eq!(g4_visits, 1);
        assert_eq!(visitor.order.len(), 4);
    }

    #[test]
    fn no_outbound_edges_visits_only_direct_groups() {
        let edges: HashMap<&str, HashSet<&str>> = HashMap::new();
        let direct = vec!["g1", "g2"];
        let mut visitor = RecordingVisitor {
            order: Vec::new(),
            halt_at: None,
        };
        traverse_from_user(direct.iter(), &edges, &mut visitor);
        assert_eq!(visitor.order.len(), 2);
    }

    #[test]
    fn access_traverser_halts_on_first_hit() {
        let mut group_component_map = HashMap::new();
        group_component_map.insert("g3", HashSet::from([("ORDER", "VIEW")]));
        let mut edges = HashMap::new();
        edges.insert("g2", HashSet::from(["g3"]));

        let component = "ORDER";
        let access_level = "VIEW";
        let mut visitor = AccessTraverser::new(&component, &access_level, &group_component_map);
        traverse_from_user(["g2"].iter(), &edges, &mut visitor);
        assert!(visitor.has_access());
    }

    #[test]
    fn cycle_check_detects_target() {
        let edges = diamond_edges();
        let target = "g1";
        let mut visitor = CycleCheckTraverser::new(&target);
        traverse_from_user(["g2"].iter(), &edges, &mut visitor);
        // g2 cannot reach g1 in this graph.
        assert!(!visitor.would_cycle());

        let mut reaching_edges = HashMap::new();
        reaching_edges.insert("g4", HashSet::from(["g1"]));
        let mut visitor = CycleCheckTraverser::new(&target);
        traverse_from_user(["g4"].iter(), &reaching_edges, &mut visitor);
        assert!(visitor.would_cycle());
    }

    #[test]
    fn collect_entities_unions_across_branches() {
        let mut group_entity_map: HashMap<&str, HashMap<String, HashSet<String>>> =
            HashMap::new();
        group_entity_map.insert(
            "g2",
            HashMap::from([(
                "ClientAccount".to_string(),
                HashSet::from(["CompanyA".to_string()]),
            )]),
        );
        group_entity_map.insert(
            "g3",
            HashMap::from([(
                "ClientAccount".to_string(),
                HashSet::from(["CompanyB".to_string()]),
            )]),
        );
        let mut edges = HashMap::new();
        edges.insert("g1", HashSet::from(["g2", "g3"]));

        let mut visitor = CollectEntitiesTraverser::new("ClientAccount", &group_entity_map);
        traverse_from_user(["g1"].iter(), &edges, &mut visitor);
        let collected = visitor.into_collected();
        assert_eq!(
            collected,
            HashSet::from(["CompanyA".to_string(), "CompanyB".to_string()])
        );
    }
}
