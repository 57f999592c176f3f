// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, geometry, queries.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use kurbo::{Insets, Point, Rect, Vec2};

use crate::error::TreeError;
use crate::types::{NodeFlags, NodeGeometry, NodeId, has_area, normalize_rect};

/// Arena of nodes carrying a payload `T`.
///
/// Children are ordered back to front: index 0 paints first and is hit last.
/// Structure only changes through [`Tree::add_child`], [`Tree::add_child_first`],
/// [`Tree::add_child_at`], [`Tree::remove_child`], [`Tree::detach`] and
/// [`Tree::remove`], which keep the parent link and the child list in sync.
/// None of them record damage; that is the caller's business.
pub struct Tree<T> {
    nodes: Vec<Option<Node<T>>>, // slots
    generations: Vec<u32>,       // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

/// Result of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The node claiming the point.
    pub node: NodeId,
    /// Path from the queried root to the node (inclusive).
    pub path: Vec<NodeId>,
}

/// One entry of a paint list produced by [`Tree::paint_list`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintItem {
    /// Node to draw.
    pub node: NodeId,
    /// Region of the node to draw: its painted bounds clipped to the damage rectangle.
    pub clip: Rect,
}

struct Node<T> {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    geometry: NodeGeometry,
    payload: T,
}

impl<T> Tree<T> {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// True if the tree holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a detached node.
    pub fn insert(&mut self, geometry: NodeGeometry, payload: T) -> NodeId {
        let mut geometry = geometry;
        geometry.bounds = normalize_rect(geometry.bounds);
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        self.nodes[idx] = Some(Node {
            generation,
            parent: None,
            children: Vec::new(),
            geometry,
            payload,
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId indices are 32-bit."
        )]
        NodeId::new(idx as u32, generation)
    }

    /// Remove a node and its whole subtree, returning the freed payloads.
    ///
    /// The node is unlinked from its parent first. Payloads are returned
    /// children first, so callers can tear down leaves before their containers.
    /// Removing a stale id returns an empty list.
    pub fn remove(&mut self, id: NodeId) -> Vec<(NodeId, T)> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        self.detach(id);
        // Reverse pre-order puts every node after all of its descendants.
        for gone in self.descendants(id).into_iter().rev() {
            if let Some(node) = self.nodes[gone.idx()].take() {
                self.free_list.push(gone.idx());
                out.push((gone, node.payload));
            }
        }
        out
    }

    /// Append `child` as the topmost child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let len = self.node(parent)?.children.len();
        self.add_child_at(parent, child, len)
    }

    /// Insert `child` as the bottom-most child of `parent`.
    pub fn add_child_first(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.add_child_at(parent, child, 0)
    }

    /// Insert `child` at z-position `index` among the children of `parent`.
    ///
    /// `index` is clamped to the number of children. If `child` already has a
    /// parent it is removed from it first; the relative order of every other
    /// node is preserved.
    pub fn add_child_at(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<(), TreeError> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_ancestor_of(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }
        self.detach(child);
        let siblings = &mut self.node_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Remove `child` from `parent`, leaving it detached but alive.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.node(child)?.parent != Some(parent) {
            return Err(TreeError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    /// Unlink `id` from its parent, if any.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Ok(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Ok(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    /// Move `id` to the topmost position among its siblings.
    pub fn come_to_front(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            let _ = self.add_child(parent, id);
        }
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Payload of a live node.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).ok().map(|n| &n.payload)
    }

    /// Mutable payload of a live node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).ok().map(|n| &mut n.payload)
    }

    /// Geometry of a live node.
    pub fn geometry(&self, id: NodeId) -> Option<&NodeGeometry> {
        self.node(id).ok().map(|n| &n.geometry)
    }

    /// Bounds of a live node.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.geometry(id).map(|g| g.bounds)
    }

    /// Flags of a live node.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.geometry(id).map(|g| g.flags)
    }

    /// Parent of a live node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    /// Children of a node, bottom-most first. Empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Z-position of `id` among its siblings.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Set bounds, clamping negative extents to zero area.
    ///
    /// Non-finite bounds are refused and the previous bounds are kept.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) -> Result<(), TreeError> {
        if !bounds.is_finite() {
            return Err(TreeError::NonFiniteBounds(id));
        }
        self.node_mut(id)?.geometry.bounds = normalize_rect(bounds);
        Ok(())
    }

    /// Set the decoration outset.
    pub fn set_outset(&mut self, id: NodeId, outset: Insets) -> Result<(), TreeError> {
        self.node_mut(id)?.geometry.outset = outset;
        Ok(())
    }

    /// Replace the flags of a node.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) -> Result<(), TreeError> {
        self.node_mut(id)?.geometry.flags = flags;
        Ok(())
    }

    /// Translate `id` and its whole subtree.
    pub fn move_by(&mut self, id: NodeId, delta: Vec2) -> Result<(), TreeError> {
        if !delta.is_finite() {
            return Err(TreeError::NonFiniteBounds(id));
        }
        self.node(id)?;
        for n in self.descendants(id) {
            let node = self.node_mut(n)?;
            node.geometry.bounds = node.geometry.bounds + delta;
        }
        Ok(())
    }

    /// Topmost ancestor of `id` (itself if detached).
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.node(id).ok().map(|_| id)?;
        while let Some(p) = self.parent(cur) {
            cur = p;
        }
        Some(cur)
    }

    /// True if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    /// Path from the root of `id`'s tree down to `id` (inclusive). Empty for stale ids.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut cur = Some(id);
        while let Some(c) = cur {
            out.push(c);
            cur = self.parent(c);
        }
        out.reverse();
        out
    }

    /// Depth-first pre-order snapshot of `id` and its descendants.
    ///
    /// The snapshot is detached from the tree, so callers may mutate the tree
    /// while walking it; check [`Tree::is_alive`] before touching each entry.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut stack = alloc::vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            // Push in reverse so the bottom-most child is visited first.
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Own painted bounds merged with the full bounds of every visible child.
    pub fn full_bounds(&self, id: NodeId) -> Option<Rect> {
        self.full_bounds_table(id).get(&id.idx()).copied()
    }

    /// Full bounds of `root` and of every visible node below it, keyed by slot.
    ///
    /// Computed bottom-up in one pass, so queries over a subtree stay linear
    /// in its size whatever its depth.
    fn full_bounds_table(&self, root: NodeId) -> BTreeMap<usize, Rect> {
        let mut table = BTreeMap::new();
        if !self.is_alive(root) {
            return table;
        }
        let mut order = Vec::new();
        let mut stack = alloc::vec![root];
        while let Some(id) = stack.pop() {
            let Ok(node) = self.node(id) else {
                continue;
            };
            order.push(id);
            stack.extend(node.children.iter().copied().filter(|&c| {
                self.flags(c)
                    .is_some_and(|f| f.contains(NodeFlags::VISIBLE))
            }));
        }
        for &id in order.iter().rev() {
            let Ok(node) = self.node(id) else {
                continue;
            };
            let mut result = node.geometry.painted_bounds();
            for c in &node.children {
                if let Some(r) = table.get(&c.idx()) {
                    result = result.union(*r);
                }
            }
            table.insert(id.idx(), result);
        }
        table
    }

    /// Find the topmost node under `pt` in the subtree rooted at `root`.
    ///
    /// A node is skipped with its subtree when it is invisible, not pickable,
    /// or its full bounds do not contain `pt`. Children are tried topmost
    /// first, so a child sticking out of its parent stays reachable. When no
    /// child claims the point the node claims it if `pt` lies inside its own
    /// bounds, unless it lacks
    /// [`NodeFlags::NOTICES_TRANSPARENT_CLICK`] and `is_transparent` reports
    /// its own pixel at `pt` as transparent; then the search continues with
    /// whatever lies underneath.
    pub fn hit_test<F>(&self, root: NodeId, pt: Point, mut is_transparent: F) -> Option<Hit>
    where
        F: FnMut(NodeId, &T, Point) -> bool,
    {
        enum Visit {
            Enter(NodeId),
            Claim(NodeId),
        }
        let full = self.full_bounds_table(root);
        let mut stack = alloc::vec![Visit::Enter(root)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(id) => {
                    let Ok(node) = self.node(id) else {
                        continue;
                    };
                    let enters = node
                        .geometry
                        .flags
                        .contains(NodeFlags::VISIBLE | NodeFlags::PICKABLE)
                        && full.get(&id.idx()).is_some_and(|fb| fb.contains(pt));
                    if !enters {
                        continue;
                    }
                    // The node itself is tried after all of its children.
                    stack.push(Visit::Claim(id));
                    stack.extend(node.children.iter().map(|&c| Visit::Enter(c)));
                }
                Visit::Claim(id) => {
                    let Ok(node) = self.node(id) else {
                        continue;
                    };
                    if !node.geometry.bounds.contains(pt) {
                        continue;
                    }
                    if !node
                        .geometry
                        .flags
                        .contains(NodeFlags::NOTICES_TRANSPARENT_CLICK)
                        && is_transparent(id, &node.payload, pt)
                    {
                        continue;
                    }
                    let mut path = alloc::vec![id];
                    let mut cur = id;
                    while cur != root {
                        let Some(p) = self.parent(cur) else {
                            break;
                        };
                        path.push(p);
                        cur = p;
                    }
                    path.reverse();
                    return Some(Hit { node: id, path });
                }
            }
        }
        None
    }

    /// Nodes of the subtree at `root` that must repaint to refresh `rect`, in paint order.
    ///
    /// Parents come before their children and siblings follow z-order, so
    /// drawing the list front to back reproduces the scene inside `rect`.
    /// Invisible subtrees are skipped, as are nodes whose own painted bounds do
    /// not overlap `rect` with positive area (their children may still appear).
    pub fn paint_list(&self, root: NodeId, rect: Rect) -> Vec<PaintItem> {
        let mut out = Vec::new();
        if !has_area(rect) {
            return out;
        }
        let full = self.full_bounds_table(root);
        let mut stack = alloc::vec![root];
        while let Some(id) = stack.pop() {
            let Ok(node) = self.node(id) else {
                continue;
            };
            if !node.geometry.flags.contains(NodeFlags::VISIBLE) {
                continue;
            }
            let reaches = full
                .get(&id.idx())
                .is_some_and(|fb| has_area(fb.intersect(rect)));
            if !reaches {
                continue;
            }
            let clip = node.geometry.painted_bounds().intersect(rect);
            if has_area(clip) {
                out.push(PaintItem { node: id, clip });
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> Result<&Node<T>, TreeError> {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .filter(|n| n.generation == id.1)
            .ok_or(TreeError::Stale(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<T>, TreeError> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|n| n.as_mut())
            .filter(|n| n.generation == id.1)
            .ok_or(TreeError::Stale(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn rect_node(tree: &mut Tree<u32>, tag: u32, r: Rect) -> NodeId {
        tree.insert(NodeGeometry::with_bounds(r), tag)
    }

    #[test]
    fn add_child_links_both_sides() {
        let mut tree = Tree::new();
        let root = rect_node(&mut tree, 0, Rect::new(0.0, 0.0, 100.0, 100.0));
        let a = rect_node(&mut tree, 1, Rect::new(0.0, 0.0, 10.0, 10.0));
        tree.add_child(root, a).unwrap();
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.children(root), &[a]);
    }

    #[test]
    fn reparent_removes_from_old_parent() {
        let mut tree = Tree::new();
        let root = rect_node(&mut tree, 0, Rect::new(0.0, 0.0, 100.0, 100.0));
        let a = rect_node(&mut tree, 1, Rect::ZERO);
        let b = rect_node(&mut tree, 2, Rect::ZERO);
        let c = rect_node(&mut tree, 3, Rect::ZERO);
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        tree.add_child(root, c).unwrap();
        tree.add_child(a, b).unwrap();
        assert_eq!(tree.children(root), &[a, c], "sibling order must be preserved");
        assert_eq!(tree.children(a), &[b]);
        assert_eq!(tree.parent(b), Some(a));
    }

    #[test]
    fn cycles_are_refused() {
        let mut tree = Tree::new();
        let a = rect_node(&mut tree, 1, Rect::ZERO);
        let b = rect_node(&mut tree, 2, Rect::ZERO);
        let c = rect_node(&mut tree, 3, Rect::ZERO);
        tree.add_child(a, b).unwrap();
        tree.add_child(b, c).unwrap();
        assert_eq!(
            tree.add_child(c, a),
            Err(TreeError::Cycle {
                parent: c,
                child: a
            })
        );
        assert_eq!(
            tree.add_child(a, a),
            Err(TreeError::Cycle {
                parent: a,
                child: a
            })
        );
        assert_eq!(tree.parent(a), None, "refused op must leave the tree untouched");
        assert_eq!(tree.children(c), &[] as &[NodeId]);
    }

    #[test]
    fn random_mutations_stay_acyclic() {
        // Deterministic xorshift sequence of add/remove operations.
        let mut tree = Tree::new();
        let ids: Vec<NodeId> = (0..12)
            .map(|i| rect_node(&mut tree, i, Rect::ZERO))
            .collect();
        let mut s: u64 = 0x9E37_79B9_7F4A_7C15;
        for _ in 0..2000 {
            s ^= s << 13;
            s ^= s >> 7;
            s ^= s << 17;
            let a = ids[(s % 12) as usize];
            let b = ids[((s >> 8) % 12) as usize];
            if s & 0x1_0000 == 0 {
                let _ = tree.add_child(a, b);
            } else {
                let _ = tree.remove_child(a, b);
            }
            for &id in &ids {
                // Walking to the root terminates and every parent lists the child once.
                let path = tree.path_to_root(id);
                assert!(path.len() <= ids.len(), "cycle detected");
                if let Some(p) = tree.parent(id) {
                    let count = tree.children(p).iter().filter(|c| **c == id).count();
                    assert_eq!(count, 1, "child listed exactly once");
                }
            }
        }
    }

    #[test]
    fn remove_child_requires_membership() {
        let mut tree = Tree::new();
        let a = rect_node(&mut tree, 1, Rect::ZERO);
        let b = rect_node(&mut tree, 2, Rect::ZERO);
        assert_eq!(
            tree.remove_child(a, b),
            Err(TreeError::NotAChild {
                parent: a,
                child: b
            })
        );
    }

    #[test]
    fn add_child_first_goes_to_bottom() {
        let mut tree = Tree::new();
        let root = rect_node(&mut tree, 0, Rect::ZERO);
        let a = rect_node(&mut tree, 1, Rect::ZERO);
        let b = rect_node(&mut tree, 2, Rect::ZERO);
        tree.add_child(root, a).unwrap();
        tree.add_child_first(root, b).unwrap();
        assert_eq!(tree.children(root), &[b, a]);
        tree.come_to_front(b);
        assert_eq!(tree.children(root), &[a, b]);
    }

    #[test]
    fn remove_frees_subtree_leaves_first() {
        let mut tree = Tree::new();
        let root = rect_node(&mut tree, 0, Rect::ZERO);
        let a = rect_node(&mut tree, 1, Rect::ZERO);
        let b = rect_node(&mut tree, 2, Rect::ZERO);
        tree.add_child(root, a).unwrap();
        tree.add_child(a, b).unwrap();
        let removed: Vec<u32> = tree.remove(a).into_iter().map(|(_, t)| t).collect();
        assert_eq!(removed, vec![2, 1]);
        assert!(!tree.is_alive(a));
        assert!(!tree.is_alive(b));
        assert!(tree.children(root).is_empty());
        assert!(tree.remove(a).is_empty(), "second remove is a no-op");
    }

    #[test]
    fn stale_ids_never_alias() {
        let mut tree = Tree::new();
        let a = rect_node(&mut tree, 1, Rect::ZERO);
        tree.remove(a);
        let b = rect_node(&mut tree, 2, Rect::ZERO);
        assert_eq!(a.slot(), b.slot(), "slot is reused");
        assert!(b.generation() > a.generation(), "generation must increase on reuse");
        assert_eq!(tree.get(a), None);
        assert_eq!(tree.get(b), Some(&2));
    }

    #[test]
    fn topmost_sibling_wins_hit_test() {
        let mut tree = Tree::new();
        let root = rect_node(&mut tree, 0, Rect::new(0.0, 0.0, 200.0, 200.0));
        let a = rect_node(&mut tree, 1, Rect::new(10.0, 10.0, 60.0, 60.0));
        let b = rect_node(&mut tree, 2, Rect::new(0.0, 0.0, 100.0, 100.0));
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        let hit = tree
            .hit_test(root, Point::new(30.0, 30.0), |_, _, _| false)
            .unwrap();
        assert_eq!(hit.node, b, "later sibling is on top");
        assert_eq!(hit.path, vec![root, b]);
    }

    #[test]
    fn transparent_nodes_let_clicks_through() {
        let mut tree = Tree::new();
        let root = rect_node(&mut tree, 0, Rect::new(0.0, 0.0, 200.0, 200.0));
        let under = rect_node(&mut tree, 1, Rect::new(0.0, 0.0, 100.0, 100.0));
        let over = rect_node(&mut tree, 2, Rect::new(0.0, 0.0, 100.0, 100.0));
        tree.add_child(root, under).unwrap();
        tree.add_child(root, over).unwrap();

        // `over` claims its area while it notices transparent clicks.
        let hit = tree.hit_test(root, Point::new(5.0, 5.0), |_, tag, _| *tag == 2);
        assert_eq!(hit.unwrap().node, over);

        let flags = tree.flags(over).unwrap() - NodeFlags::NOTICES_TRANSPARENT_CLICK;
        tree.set_flags(over, flags).unwrap();
        let hit = tree.hit_test(root, Point::new(5.0, 5.0), |_, tag, _| *tag == 2);
        assert_eq!(hit.unwrap().node, under);
    }

    #[test]
    fn invisible_and_unpickable_subtrees_are_skipped() {
        let mut tree = Tree::new();
        let root = rect_node(&mut tree, 0, Rect::new(0.0, 0.0, 100.0, 100.0));
        let a = rect_node(&mut tree, 1, Rect::new(0.0, 0.0, 50.0, 50.0));
        tree.add_child(root, a).unwrap();
        tree.set_flags(a, NodeFlags::PICKABLE).unwrap();
        let hit = tree.hit_test(root, Point::new(5.0, 5.0), |_, _, _| false);
        assert_eq!(hit.unwrap().node, root);
        tree.set_flags(a, NodeFlags::VISIBLE).unwrap();
        let hit = tree.hit_test(root, Point::new(5.0, 5.0), |_, _, _| false);
        assert_eq!(hit.unwrap().node, root);
        assert!(
            tree.hit_test(root, Point::new(500.0, 5.0), |_, _, _| false)
                .is_none()
        );
    }

    #[test]
    fn children_outside_parent_bounds_are_reachable() {
        let mut tree = Tree::new();
        let root = rect_node(&mut tree, 0, Rect::new(0.0, 0.0, 100.0, 100.0));
        let menu = rect_node(&mut tree, 1, Rect::new(10.0, 10.0, 40.0, 40.0));
        let sub = rect_node(&mut tree, 2, Rect::new(40.0, 10.0, 70.0, 30.0));
        tree.add_child(root, menu).unwrap();
        tree.add_child(menu, sub).unwrap();
        let hit = tree
            .hit_test(root, Point::new(50.0, 20.0), |_, _, _| false)
            .unwrap();
        assert_eq!(hit.path, vec![root, menu, sub]);
        // Inside the menu's full bounds but outside every own box below it: root claims.
        let hit = tree
            .hit_test(root, Point::new(50.0, 35.0), |_, _, _| false)
            .unwrap();
        assert_eq!(hit.node, root);
    }

    #[test]
    fn full_bounds_merge_visible_children_and_outset() {
        let mut tree = Tree::new();
        let root = rect_node(&mut tree, 0, Rect::new(0.0, 0.0, 10.0, 10.0));
        let a = rect_node(&mut tree, 1, Rect::new(20.0, 20.0, 30.0, 30.0));
        let hidden = rect_node(&mut tree, 2, Rect::new(100.0, 100.0, 110.0, 110.0));
        tree.add_child(root, a).unwrap();
        tree.add_child(root, hidden).unwrap();
        tree.set_flags(hidden, NodeFlags::PICKABLE).unwrap();
        tree.set_outset(a, Insets::new(0.0, 0.0, 5.0, 5.0)).unwrap();
        assert_eq!(
            tree.full_bounds(root),
            Some(Rect::new(0.0, 0.0, 35.0, 35.0))
        );
    }

    #[test]
    fn move_by_translates_subtree() {
        let mut tree = Tree::new();
        let a = rect_node(&mut tree, 1, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = rect_node(&mut tree, 2, Rect::new(2.0, 2.0, 4.0, 4.0));
        tree.add_child(a, b).unwrap();
        tree.move_by(a, Vec2::new(5.0, 1.0)).unwrap();
        assert_eq!(tree.bounds(a), Some(Rect::new(5.0, 1.0, 15.0, 11.0)));
        assert_eq!(tree.bounds(b), Some(Rect::new(7.0, 3.0, 9.0, 5.0)));
    }

    #[test]
    fn non_finite_bounds_keep_previous() {
        let mut tree = Tree::new();
        let a = rect_node(&mut tree, 1, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(
            tree.set_bounds(a, Rect::new(0.0, 0.0, f64::INFINITY, 1.0)),
            Err(TreeError::NonFiniteBounds(a))
        );
        assert_eq!(tree.bounds(a), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn paint_list_is_parent_first_in_z_order() {
        let mut tree = Tree::new();
        let root = rect_node(&mut tree, 0, Rect::new(0.0, 0.0, 100.0, 100.0));
        let a = rect_node(&mut tree, 1, Rect::new(0.0, 0.0, 50.0, 50.0));
        let b = rect_node(&mut tree, 2, Rect::new(25.0, 25.0, 75.0, 75.0));
        let far = rect_node(&mut tree, 3, Rect::new(90.0, 90.0, 100.0, 100.0));
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        tree.add_child(root, far).unwrap();
        let list = tree.paint_list(root, Rect::new(20.0, 20.0, 40.0, 40.0));
        let nodes: Vec<NodeId> = list.iter().map(|p| p.node).collect();
        assert_eq!(nodes, vec![root, a, b]);
        assert_eq!(list[2].clip, Rect::new(25.0, 25.0, 40.0, 40.0));
        assert!(
            tree.paint_list(root, Rect::new(5.0, 5.0, 5.0, 50.0))
                .is_empty()
        );
    }

    #[test]
    fn deep_chains_do_not_exhaust_the_stack() {
        const DEPTH: u32 = 100_000;
        let mut tree = Tree::new();
        // Built leaf first so every link checks a detached parent.
        let last = rect_node(&mut tree, 0, Rect::new(50.0, 50.0, 60.0, 60.0));
        let mut root = last;
        for i in 1..DEPTH {
            let n = rect_node(&mut tree, i, Rect::new(0.0, 0.0, 10.0, 10.0));
            tree.add_child(n, root).unwrap();
            root = n;
        }
        assert_eq!(
            tree.full_bounds(root),
            Some(Rect::new(0.0, 0.0, 60.0, 60.0))
        );
        let hit = tree
            .hit_test(root, Point::new(55.0, 55.0), |_, _, _| false)
            .unwrap();
        assert_eq!(hit.node, last);
        assert_eq!(hit.path.len(), DEPTH as usize);
        assert_eq!(hit.path[0], root);
        assert_eq!(
            tree.paint_list(root, Rect::new(0.0, 0.0, 60.0, 60.0)).len(),
            DEPTH as usize
        );
        let removed = tree.remove(root);
        assert_eq!(removed.len(), DEPTH as usize);
        assert_eq!(removed.last().map(|(id, _)| *id), Some(root));
        assert!(tree.is_empty());
    }
}
