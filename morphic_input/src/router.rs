// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Given the node a pointer event resolved to, the router produces the
//! delivery sequence: the target first, then each ancestor up to the root.
//! A higher layer walks the sequence and stops at the first handler that
//! reports [`Outcome::Stop`], which is how a morph without a handler for an
//! event lets its container react instead.
//!
//! ## Pointer capture
//!
//! While a node is captured (typically the node that received a button
//! press), every route goes to it regardless of the fresh target, so a press
//! that wanders off its target keeps talking to the same handler.

use alloc::vec::Vec;

/// Delivery phase of one [`Dispatch`] entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// The resolved (or captured) node.
    Target,
    /// An ancestor of the target, nearest first.
    Bubble,
}

/// Handler outcome controlling propagation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Not handled here; offer the event to the next node.
    Continue,
    /// Handled; stop propagation.
    Stop,
}

/// Look up the parent of a node to reconstruct the bubble chain.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// A no-op parent provider: every route is a single target entry.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    #[inline]
    fn parent_of(&self, _node: &K) -> Option<K> {
        None
    }
}

/// A single dispatch item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Propagation phase for this step.
    pub phase: Phase,
    /// Node to offer the event to.
    pub node: K,
}

/// Target → bubble router with pointer capture.
#[derive(Clone, Debug)]
pub struct Router<K> {
    capture: Option<K>,
}

impl<K> Default for Router<K> {
    fn default() -> Self {
        Self { capture: None }
    }
}

impl<K: Copy + Eq> Router<K> {
    /// Create a router without capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture routing to `node`, or release with `None`.
    pub fn capture(&mut self, node: Option<K>) {
        self.capture = node;
    }

    /// The captured node, if any.
    pub fn captured(&self) -> Option<K> {
        self.capture
    }

    /// Build the delivery sequence for `target` (or the captured node).
    ///
    /// Returns an empty sequence when there is neither a target nor a capture.
    pub fn route(&self, target: Option<K>, parents: &impl ParentLookup<K>) -> Vec<Dispatch<K>> {
        let mut out = Vec::new();
        let Some(target) = self.capture.or(target) else {
            return out;
        };
        out.push(Dispatch {
            phase: Phase::Target,
            node: target,
        });
        let mut cur = target;
        // Walking up terminates: callers ensure acyclic ancestry.
        while let Some(p) = parents.parent_of(&cur) {
            out.push(Dispatch {
                phase: Phase::Bubble,
                node: p,
            });
            cur = p;
        }
        out
    }
}

/// Offer an event along `seq` until a handler stops it.
///
/// Returns the node that handled the event, or `None` if every handler
/// passed.
pub fn deliver<K: Copy>(
    seq: &[Dispatch<K>],
    mut handler: impl FnMut(&Dispatch<K>) -> Outcome,
) -> Option<K> {
    seq.iter()
        .find(|d| handler(d) == Outcome::Stop)
        .map(|d| d.node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    struct Node(u32);

    struct Parents;
    impl ParentLookup<Node> for Parents {
        fn parent_of(&self, node: &Node) -> Option<Node> {
            match node.0 {
                3 => Some(Node(2)),
                2 => Some(Node(1)),
                _ => None,
            }
        }
    }

    #[test]
    fn route_target_then_ancestors() {
        let router = Router::new();
        let seq = router.route(Some(Node(3)), &Parents);
        let phases: Vec<(Phase, u32)> = seq.iter().map(|d| (d.phase, d.node.0)).collect();
        assert_eq!(
            phases,
            vec![(Phase::Target, 3), (Phase::Bubble, 2), (Phase::Bubble, 1)]
        );
    }

    #[test]
    fn capture_overrides_fresh_target() {
        let mut router = Router::new();
        router.capture(Some(Node(2)));
        let seq = router.route(Some(Node(9)), &Parents);
        assert_eq!(seq[0].node, Node(2));
        assert_eq!(seq.len(), 2);
        router.capture(None);
        let seq = router.route(Some(Node(9)), &Parents);
        assert_eq!(seq, vec![Dispatch {
            phase: Phase::Target,
            node: Node(9)
        }]);
    }

    #[test]
    fn no_target_no_route() {
        let router: Router<Node> = Router::new();
        assert!(router.route(None, &NoParent).is_empty());
    }

    #[test]
    fn deliver_stops_at_first_handler() {
        let router = Router::new();
        let seq = router.route(Some(Node(3)), &Parents);
        let mut offered = Vec::new();
        let handled = deliver(&seq, |d| {
            offered.push(d.node.0);
            if d.node.0 == 2 {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        assert_eq!(handled, Some(Node(2)));
        assert_eq!(offered, vec![3, 2], "root must not see a handled event");
        assert_eq!(deliver(&seq, |_| Outcome::Continue), None);
    }
}
