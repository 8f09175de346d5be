//! Left/right child resolution from a flat edge list.
//!
//! Edges with an explicit role claim their slot first. Remaining slots are
//! filled from unroled edges in insertion order: `left` takes the first
//! outgoing edge, `right` the first outgoing edge whose target differs from
//! `left`. Anything else leaving the node is ignored and reported.

use tracing::{instrument, trace};

use crate::domain::graph::{EdgeRole, GraphEdge};

/// Resolved children of one node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChildEdges<'g> {
    pub left: Option<&'g str>,
    pub right: Option<&'g str>,
    /// Outgoing edges that did not claim a slot
    pub ignored: Vec<&'g GraphEdge>,
}

impl<'g> ChildEdges<'g> {
    pub fn has_children(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }
}

/// Picks at most one left and one right child per node.
#[derive(Debug, Clone, Copy)]
pub struct EdgeResolver<'g> {
    edges: &'g [GraphEdge],
}

impl<'g> EdgeResolver<'g> {
    pub fn new(edges: &'g [GraphEdge]) -> Self {
        Self { edges }
    }

    /// Resolve the children of `id`. Linear in the number of edges.
    #[instrument(level = "trace", skip(self))]
    pub fn resolve(&self, id: &str) -> ChildEdges<'g> {
        let outgoing: Vec<(usize, &'g GraphEdge)> = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.source == id)
            .collect();

        let mut left: Option<(usize, &'g str)> = None;
        let mut right: Option<(usize, &'g str)> = None;

        for &(i, edge) in &outgoing {
            match edge.role {
                Some(EdgeRole::Left) if left.is_none() => left = Some((i, edge.target.as_str())),
                Some(EdgeRole::Right) if right.is_none() => {
                    right = Some((i, edge.target.as_str()))
                }
                _ => {}
            }
        }

        let unroled = || outgoing.iter().filter(|(_, e)| e.role.is_none());
        if left.is_none() {
            let taken = right.map(|(_, t)| t);
            left = unroled()
                .find(|(_, e)| Some(e.target.as_str()) != taken)
                .map(|&(i, e)| (i, e.target.as_str()));
        }
        if right.is_none() {
            let taken = left.map(|(_, t)| t);
            right = unroled()
                .find(|(_, e)| Some(e.target.as_str()) != taken)
                .map(|&(i, e)| (i, e.target.as_str()));
        }

        let used = [left.map(|(i, _)| i), right.map(|(i, _)| i)];
        let ignored = outgoing
            .iter()
            .filter(|(i, _)| !used.contains(&Some(*i)))
            .map(|&(_, e)| e)
            .collect();

        let children = ChildEdges {
            left: left.map(|(_, t)| t),
            right: right.map(|(_, t)| t),
            ignored,
        };
        trace!("resolve: {} -> {:?}", id, children);
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn edges(pairs: &[(&str, &str)]) -> Vec<GraphEdge> {
        pairs.iter().map(|(s, t)| GraphEdge::new(*s, *t)).collect()
    }

    #[rstest]
    #[case(&[], None, None)]
    #[case(&[("1", "2")], Some("2"), None)]
    #[case(&[("1", "2"), ("1", "3")], Some("2"), Some("3"))]
    #[case(&[("1", "2"), ("1", "2"), ("1", "3")], Some("2"), Some("3"))]
    #[case(&[("2", "3"), ("1", "4"), ("1", "5"), ("1", "6")], Some("4"), Some("5"))]
    #[case(&[("1", "2"), ("1", "2")], Some("2"), None)]
    fn given_unroled_edges_when_resolving_then_follows_insertion_order(
        #[case] pairs: &[(&str, &str)],
        #[case] left: Option<&str>,
        #[case] right: Option<&str>,
    ) {
        let edges = edges(pairs);
        let children = EdgeResolver::new(&edges).resolve("1");
        assert_eq!(children.left, left);
        assert_eq!(children.right, right);
    }

    #[test]
    fn given_three_distinct_targets_when_resolving_then_third_is_ignored() {
        let edges = edges(&[("1", "2"), ("1", "3"), ("1", "4")]);
        let children = EdgeResolver::new(&edges).resolve("1");
        assert_eq!(children.ignored, vec![&edges[2]]);
    }

    #[test]
    fn given_explicit_right_only_when_resolving_then_left_stays_empty() {
        let edges = vec![GraphEdge::new("1", "2").with_role(EdgeRole::Right)];
        let children = EdgeResolver::new(&edges).resolve("1");
        assert_eq!(children.left, None);
        assert_eq!(children.right, Some("2"));
        assert!(children.ignored.is_empty());
    }

    #[test]
    fn given_explicit_roles_when_resolving_then_roles_override_order() {
        let edges = vec![
            GraphEdge::new("1", "2").with_role(EdgeRole::Right),
            GraphEdge::new("1", "3").with_role(EdgeRole::Left),
        ];
        let children = EdgeResolver::new(&edges).resolve("1");
        assert_eq!(children.left, Some("3"));
        assert_eq!(children.right, Some("2"));
    }

    #[test]
    fn given_mixed_roles_when_resolving_then_unroled_fills_free_slot() {
        let edges = vec![
            GraphEdge::new("1", "2"),
            GraphEdge::new("1", "3").with_role(EdgeRole::Left),
        ];
        let children = EdgeResolver::new(&edges).resolve("1");
        assert_eq!(children.left, Some("3"));
        assert_eq!(children.right, Some("2"));
    }

    #[test]
    fn given_unroled_duplicate_of_explicit_target_when_resolving_then_not_reused() {
        let edges = vec![
            GraphEdge::new("1", "2").with_role(EdgeRole::Right),
            GraphEdge::new("1", "2"),
        ];
        let children = EdgeResolver::new(&edges).resolve("1");
        assert_eq!(children.left, None);
        assert_eq!(children.right, Some("2"));
        assert_eq!(children.ignored.len(), 1);
    }
}
