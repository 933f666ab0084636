// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracking: which element each pointer is over, and the enter/leave
//! events raised when that changes.
//!
//! ## Model
//!
//! A [`HoverTracker`] belongs to one input root. For every pointer it stores
//! the root→leaf path of the hovered element, plus the details of the last
//! event that refreshed it (so leaves raised later, on window exit or
//! removal, carry the last known position).
//!
//! ## Ordering
//!
//! When the hovered element changes from `old` to `new`, only the parts of the
//! two ancestor chains below their nearest common ancestor change state:
//!
//! - Leave is raised on the old chain, leaf first, up to (excluding) the common
//!   ancestor.
//! - Enter is then raised on the new chain, leaf first as well, up to
//!   (excluding) the common ancestor.
//!
//! Both phases are leaf→root, like bubbling. Each element receives its own
//! event, so an element handling its enter does not hide it from ancestors.
//!
//! ```
//! use understory_pointer::hover::{HoverEvent, HoverTracker};
//! use understory_pointer::pointer::PointerIds;
//! use understory_pointer::types::{PointerDetails, PointerInfo, PointerKind};
//! use kurbo::Point;
//!
//! let id = PointerIds::new().allocate();
//! let pointer = PointerInfo { id, kind: PointerKind::Mouse, is_primary: true };
//! let details = PointerDetails::at(Point::ZERO, 0);
//! let mut h: HoverTracker<u32> = HoverTracker::new();
//!
//! assert_eq!(
//!     h.update_path(pointer, &details, &[1, 2]),
//!     vec![HoverEvent::Enter(2), HoverEvent::Enter(1)]
//! );
//! assert_eq!(
//!     h.update_path(pointer, &details, &[1, 3]),
//!     vec![HoverEvent::Leave(2), HoverEvent::Enter(3)]
//! );
//! ```
//!
//! ## Re-entrancy
//!
//! The new path is committed before any event is delivered. A handler that
//! triggers more pointer processing therefore sees the final hover state,
//! never a half-applied one.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::dispatcher;
use crate::types::{
    InputRoot, ParentLookup, PointerDetails, PointerEvent, PointerEventKind, PointerId,
    PointerInfo,
};

/// A root→leaf element path.
pub type HoverPath<K> = SmallVec<[K; 8]>;

/// A hover transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer now hovers the element.
    Enter(K),
    /// The pointer no longer hovers the element.
    Leave(K),
}

#[derive(Clone, Debug)]
struct HoverEntry<K> {
    pointer: PointerInfo,
    details: PointerDetails,
    path: HoverPath<K>,
}

/// Per-root, per-pointer hover state.
#[derive(Clone, Debug)]
pub struct HoverTracker<K> {
    entries: HashMap<PointerId, HoverEntry<K>>,
}

impl<K> Default for HoverTracker<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Debug> HoverTracker<K> {
    /// Create a tracker with nothing hovered.
    pub fn new() -> Self {
        Self::default()
    }

    /// The element `pointer` is over.
    pub fn over(&self, pointer: PointerId) -> Option<K> {
        self.entries
            .get(&pointer)
            .and_then(|e| e.path.last().copied())
    }

    /// The root→leaf path `pointer` is over; empty if nothing is hovered.
    pub fn path(&self, pointer: PointerId) -> &[K] {
        match self.entries.get(&pointer) {
            Some(e) => &e.path,
            None => &[],
        }
    }

    /// Details of the last event that refreshed `pointer`'s hover.
    pub fn details(&self, pointer: PointerId) -> Option<&PointerDetails> {
        self.entries.get(&pointer).map(|e| &e.details)
    }

    /// Whether any pointer is over `node` or one of its descendants.
    pub fn is_pointer_over(&self, node: K) -> bool {
        self.entries.values().any(|e| e.path.contains(&node))
    }

    /// Whether no pointer hovers anything.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Make `target` the element `pointer` is over, raising leave/enter events.
    ///
    /// Returns the previously hovered element. If `target` is already hovered
    /// only the stored details are refreshed and no event is raised.
    pub fn set_over<R>(
        &mut self,
        root: &mut R,
        pointer: PointerInfo,
        details: &PointerDetails,
        target: Option<K>,
    ) -> Option<K>
    where
        R: InputRoot<K> + ?Sized,
    {
        let previous = self.over(pointer.id);
        if previous == target {
            if let Some(entry) = self.entries.get_mut(&pointer.id) {
                entry.details = *details;
            }
            return previous;
        }

        let path = match target {
            Some(t) => path_from_root(&*root, t),
            None => HoverPath::new(),
        };
        let transitions = self.update_path(pointer, details, &path);
        raise(root, pointer, details, &transitions);
        previous
    }

    /// Stop hovering for `pointer`, raising leave for its whole path.
    pub fn clear<R>(&mut self, root: &mut R, pointer: PointerId, details: &PointerDetails)
    where
        R: InputRoot<K> + ?Sized,
    {
        let Some(entry) = self.entries.remove(&pointer) else {
            return;
        };
        raise_leaves(root, entry.pointer, details, &entry.path);
    }

    /// Stop hovering for every pointer, for example when the root closes.
    ///
    /// Leave events carry each pointer's last known details. Pointers are
    /// processed in ascending id order.
    pub fn clear_all<R>(&mut self, root: &mut R)
    where
        R: InputRoot<K> + ?Sized,
    {
        let mut ids: Vec<PointerId> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        self.evict(root, &ids);
    }

    /// React to `element` leaving the tree.
    ///
    /// Every pointer hovering `element` or one of its descendants stops
    /// hovering immediately; leave is raised for its whole stored path. Returns
    /// the number of pointers affected.
    pub fn element_detached<R>(&mut self, root: &mut R, element: K) -> usize
    where
        R: InputRoot<K> + ?Sized,
    {
        let mut ids: Vec<PointerId> = self
            .entries
            .iter()
            .filter(|(_, e)| e.path.contains(&element))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        self.evict(root, &ids);
        ids.len()
    }

    /// Replace `pointer`'s hover path and return the transitions, without
    /// delivering them.
    ///
    /// An empty `new_path` removes the pointer's entry.
    pub fn update_path(
        &mut self,
        pointer: PointerInfo,
        details: &PointerDetails,
        new_path: &[K],
    ) -> Vec<HoverEvent<K>> {
        let old = if new_path.is_empty() {
            self.entries
                .remove(&pointer.id)
                .map(|e| e.path)
                .unwrap_or_default()
        } else {
            let entry = HoverEntry {
                pointer,
                details: *details,
                path: new_path.iter().copied().collect(),
            };
            self.entries
                .insert(pointer.id, entry)
                .map(|e| e.path)
                .unwrap_or_default()
        };

        // Length of the shared ancestry; the last shared element is the
        // nearest common ancestor.
        let lca = old.iter().zip(new_path).take_while(|(a, b)| a == b).count();

        let leaves = old[lca..].iter().rev().map(|&k| HoverEvent::Leave(k));
        let enters = new_path[lca..].iter().rev().map(|&k| HoverEvent::Enter(k));
        leaves.chain(enters).collect()
    }

    fn evict<R>(&mut self, root: &mut R, ids: &[PointerId])
    where
        R: InputRoot<K> + ?Sized,
    {
        for id in ids {
            if let Some(entry) = self.entries.remove(id) {
                raise_leaves(root, entry.pointer, &entry.details, &entry.path);
            }
        }
    }
}

/// Reconstruct the root→`target` path through `parents`.
pub fn path_from_root<K, P>(parents: &P, target: K) -> HoverPath<K>
where
    K: Copy,
    P: ParentLookup<K> + ?Sized,
{
    let mut out = HoverPath::new();
    let mut cur = Some(target);
    // Collect to root; caller ensures acyclic ancestry.
    while let Some(n) = cur {
        out.push(n);
        cur = parents.parent_of(&n);
    }
    out.reverse();
    out
}

fn raise<K, R>(
    root: &mut R,
    pointer: PointerInfo,
    details: &PointerDetails,
    events: &[HoverEvent<K>],
) where
    K: Copy + Debug,
    R: InputRoot<K> + ?Sized,
{
    let root_id = root.id();
    for ev in events {
        let (kind, node) = match *ev {
            HoverEvent::Enter(k) => (PointerEventKind::Enter, k),
            HoverEvent::Leave(k) => (PointerEventKind::Leave, k),
        };
        trace!(pointer = pointer.id.get(), ?node, ?kind, "hover");
        let event = PointerEvent::new(kind, node, pointer, root_id, details);
        dispatcher::deliver(root, &event);
    }
}

fn raise_leaves<K, R>(root: &mut R, pointer: PointerInfo, details: &PointerDetails, path: &[K])
where
    K: Copy + Debug,
    R: InputRoot<K> + ?Sized,
{
    let leaves: Vec<HoverEvent<K>> = path.iter().rev().map(|&k| HoverEvent::Leave(k)).collect();
    raise(root, pointer, details, &leaves);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        BORDER, CANVAS, DECORATOR, Node, PANEL, ROOT, TestRoot, details_at, mouse_info,
        touch_info,
    };
    use crate::types::{Outcome, RoutedEvent};
    use alloc::vec;
    use kurbo::Point;

    fn tracker() -> HoverTracker<Node> {
        HoverTracker::new()
    }

    #[test]
    fn update_path_enters_fresh_path_leaf_first() {
        let mut h = tracker();
        let d = details_at(0.0, 0.0);
        let ev = h.update_path(mouse_info(), &d, &[ROOT, PANEL, CANVAS]);
        assert_eq!(
            ev,
            vec![
                HoverEvent::Enter(CANVAS),
                HoverEvent::Enter(PANEL),
                HoverEvent::Enter(ROOT)
            ]
        );
        assert_eq!(h.path(mouse_info().id), &[ROOT, PANEL, CANVAS]);
    }

    #[test]
    fn update_path_to_empty_leaves_everything() {
        let mut h = tracker();
        let d = details_at(0.0, 0.0);
        let _ = h.update_path(mouse_info(), &d, &[ROOT, PANEL]);
        let ev = h.update_path(mouse_info(), &d, &[]);
        assert_eq!(ev, vec![HoverEvent::Leave(PANEL), HoverEvent::Leave(ROOT)]);
        assert!(h.is_empty());
    }

    #[test]
    fn update_path_disjoint_paths() {
        let mut h = tracker();
        let d = details_at(0.0, 0.0);
        let a = [Node(10), Node(11)];
        let b = [Node(20), Node(21)];
        let _ = h.update_path(mouse_info(), &d, &a);
        let ev = h.update_path(mouse_info(), &d, &b);
        assert_eq!(
            ev,
            vec![
                HoverEvent::Leave(Node(11)),
                HoverEvent::Leave(Node(10)),
                HoverEvent::Enter(Node(21)),
                HoverEvent::Enter(Node(20)),
            ]
        );
    }

    #[test]
    fn moving_between_siblings_leaves_then_enters_leaf_first() {
        let mut root = TestRoot::window();
        let mut h = tracker();
        let d = details_at(5.0, 5.0);
        h.set_over(&mut root, mouse_info(), &d, Some(CANVAS));
        root.clear_log();

        let previous = h.set_over(&mut root, mouse_info(), &d, Some(DECORATOR));
        assert_eq!(previous, Some(CANVAS));
        assert_eq!(
            root.delivered(),
            vec![
                (RoutedEvent::Leave, CANVAS),
                (RoutedEvent::Enter, DECORATOR),
                (RoutedEvent::Enter, BORDER),
            ]
        );
        assert!(h.is_pointer_over(DECORATOR));
        assert!(h.is_pointer_over(BORDER));
        assert!(!h.is_pointer_over(CANVAS));
        assert!(h.is_pointer_over(ROOT));
    }

    #[test]
    fn moving_to_parent_leaves_only_the_child() {
        let mut root = TestRoot::window();
        let mut h = tracker();
        let d = details_at(5.0, 5.0);
        h.set_over(&mut root, mouse_info(), &d, Some(DECORATOR));
        root.clear_log();

        h.set_over(&mut root, mouse_info(), &d, Some(BORDER));
        assert_eq!(root.delivered(), vec![(RoutedEvent::Leave, DECORATOR)]);
        assert_eq!(h.over(mouse_info().id), Some(BORDER));
    }

    #[test]
    fn same_target_is_idempotent_but_refreshes_details() {
        let mut root = TestRoot::window();
        let mut h = tracker();
        let d = details_at(1.0, 1.0);
        h.set_over(&mut root, mouse_info(), &d, Some(CANVAS));
        root.clear_log();

        for x in 2..6 {
            let d = details_at(f64::from(x), 1.0);
            let previous = h.set_over(&mut root, mouse_info(), &d, Some(CANVAS));
            assert_eq!(previous, Some(CANVAS));
        }
        assert!(root.delivered().is_empty());
        assert_eq!(
            h.details(mouse_info().id).map(|d| d.position),
            Some(Point::new(5.0, 1.0))
        );
    }

    #[test]
    fn handled_enter_does_not_suppress_ancestors() {
        let mut root = TestRoot::window();
        root.handle(DECORATOR, RoutedEvent::Enter);
        let mut h = tracker();
        let d = details_at(0.0, 0.0);
        h.set_over(&mut root, mouse_info(), &d, Some(DECORATOR));
        assert_eq!(
            root.delivered(),
            vec![
                (RoutedEvent::Enter, DECORATOR),
                (RoutedEvent::Enter, BORDER),
                (RoutedEvent::Enter, PANEL),
                (RoutedEvent::Enter, ROOT),
            ]
        );
        assert!(root.outcomes().contains(&Outcome::Handled));
    }

    #[test]
    fn clear_leaves_whole_chain_with_given_details() {
        let mut root = TestRoot::window();
        let mut h = tracker();
        let d = details_at(1.0, 5.0);
        h.set_over(&mut root, mouse_info(), &d, Some(CANVAS));
        root.clear_log();

        h.clear(&mut root, mouse_info().id, &d);
        assert_eq!(
            root.delivered(),
            vec![
                (RoutedEvent::Leave, CANVAS),
                (RoutedEvent::Leave, PANEL),
                (RoutedEvent::Leave, ROOT),
            ]
        );
        assert!(root.events().iter().all(|e| e.position == d.position));
        assert_eq!(h.over(mouse_info().id), None);
    }

    #[test]
    fn detaching_hovered_element_raises_leaves() {
        let mut root = TestRoot::window();
        let mut h = tracker();
        let d = details_at(3.0, 3.0);
        h.set_over(&mut root, mouse_info(), &d, Some(DECORATOR));
        root.clear_log();

        root.detach(BORDER);
        assert_eq!(h.element_detached(&mut root, BORDER), 1);
        assert_eq!(
            root.delivered(),
            vec![
                (RoutedEvent::Leave, DECORATOR),
                (RoutedEvent::Leave, BORDER),
                (RoutedEvent::Leave, PANEL),
                (RoutedEvent::Leave, ROOT),
            ]
        );
        assert_eq!(h.over(mouse_info().id), None);
        assert!(!h.is_pointer_over(PANEL));
    }

    #[test]
    fn detaching_unrelated_element_keeps_hover() {
        let mut root = TestRoot::window();
        let mut h = tracker();
        let d = details_at(3.0, 3.0);
        h.set_over(&mut root, mouse_info(), &d, Some(DECORATOR));
        root.clear_log();

        root.detach(CANVAS);
        assert_eq!(h.element_detached(&mut root, CANVAS), 0);
        assert!(root.delivered().is_empty());
        assert_eq!(h.over(mouse_info().id), Some(DECORATOR));
    }

    #[test]
    fn pointers_are_tracked_independently() {
        let mut root = TestRoot::window();
        let mut h = tracker();
        let d = details_at(0.0, 0.0);
        h.set_over(&mut root, mouse_info(), &d, Some(CANVAS));
        h.set_over(&mut root, touch_info(), &d, Some(DECORATOR));
        root.clear_log();

        h.clear(&mut root, mouse_info().id, &d);
        assert!(h.is_pointer_over(PANEL));
        assert_eq!(h.over(touch_info().id), Some(DECORATOR));
        assert_eq!(h.over(mouse_info().id), None);
    }

    #[test]
    fn clear_all_processes_pointers_in_id_order() {
        let mut root = TestRoot::window();
        let mut h = tracker();
        let d = details_at(0.0, 0.0);
        h.set_over(&mut root, touch_info(), &d, Some(DECORATOR));
        h.set_over(&mut root, mouse_info(), &d, Some(CANVAS));
        root.clear_log();

        h.clear_all(&mut root);
        let pointers: Vec<u64> = root.events().iter().map(|e| e.pointer.id.get()).collect();
        assert_eq!(pointers, vec![1, 1, 1, 2, 2, 2, 2]);
        assert!(h.is_empty());
    }

    #[test]
    fn path_from_root_walks_parents() {
        let root = TestRoot::window();
        let path = path_from_root(&root, DECORATOR);
        assert_eq!(path.as_slice(), &[ROOT, PANEL, BORDER, DECORATOR]);
    }
}
