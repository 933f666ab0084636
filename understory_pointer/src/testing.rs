// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small recording tree shared by the unit tests.
//!
//! ```text
//! ROOT
//! └── PANEL
//!     ├── CANVAS
//!     └── BORDER
//!         └── DECORATOR
//! ```

use alloc::vec::Vec;
use core::num::NonZeroU64;

use hashbrown::HashMap;
use kurbo::Point;
use smallvec::SmallVec;

use crate::types::{
    DeviceId, InputRoot, Outcome, ParentLookup, PointerDetails, PointerEvent, PointerEventKind,
    PointerInfo, PointerKind, RawEventKind, RawPointerEvent, RootId, RoutedEvent,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Node(pub(crate) u32);

pub(crate) const ROOT: Node = Node(0);
pub(crate) const PANEL: Node = Node(1);
pub(crate) const CANVAS: Node = Node(2);
pub(crate) const BORDER: Node = Node(3);
pub(crate) const DECORATOR: Node = Node(4);

pub(crate) const WINDOW: RootId = RootId(1);

const LINKS: [(Node, Node); 4] = [
    (PANEL, ROOT),
    (CANVAS, PANEL),
    (BORDER, PANEL),
    (DECORATOR, BORDER),
];

/// Records every delivery and answers hit tests with [`TestRoot::hit`].
#[derive(Debug)]
pub(crate) struct TestRoot {
    id: RootId,
    parents: HashMap<Node, Node>,
    handles: Vec<(Node, RoutedEvent)>,
    log: Vec<(RoutedEvent, Node, Outcome)>,
    events: Vec<PointerEvent<Node>>,
    pub(crate) hit: Option<Node>,
}

impl TestRoot {
    pub(crate) fn window() -> Self {
        Self::with_id(WINDOW)
    }

    /// The same tree under another root id.
    pub(crate) fn with_id(id: RootId) -> Self {
        Self {
            id,
            parents: LINKS.into_iter().collect(),
            handles: Vec::new(),
            log: Vec::new(),
            events: Vec::new(),
            hit: None,
        }
    }

    /// Make `node` report [`Outcome::Handled`] for `kind`.
    pub(crate) fn handle(&mut self, node: Node, kind: RoutedEvent) {
        self.handles.push((node, kind));
    }

    /// Unlink `node` from its parent and return the former parent.
    pub(crate) fn detach(&mut self, node: Node) -> Option<Node> {
        self.parents.remove(&node)
    }

    pub(crate) fn clear_log(&mut self) {
        self.log.clear();
        self.events.clear();
    }

    /// Every (kind, element) pair delivered, bubbling steps included.
    pub(crate) fn delivered(&self) -> Vec<(RoutedEvent, Node)> {
        self.log.iter().map(|&(k, n, _)| (k, n)).collect()
    }

    pub(crate) fn outcomes(&self) -> Vec<Outcome> {
        self.log.iter().map(|&(_, _, o)| o).collect()
    }

    /// One entry per routed event, as seen by its target.
    pub(crate) fn events(&self) -> &[PointerEvent<Node>] {
        &self.events
    }
}

impl ParentLookup<Node> for TestRoot {
    fn parent_of(&self, node: &Node) -> Option<Node> {
        self.parents.get(node).copied()
    }
}

impl InputRoot<Node> for TestRoot {
    fn id(&self) -> RootId {
        self.id
    }

    fn hit_test(&self, _point: Point) -> Option<Node> {
        self.hit
    }

    fn deliver(&mut self, node: Node, event: &PointerEvent<Node>) -> Outcome {
        let kind = event.kind.routed();
        let outcome = if self.handles.contains(&(node, kind)) {
            Outcome::Handled
        } else {
            Outcome::Continue
        };
        self.log.push((kind, node, outcome));
        if node == event.target {
            self.events.push(event.clone());
        }
        outcome
    }
}

pub(crate) fn mouse_info() -> PointerInfo {
    PointerInfo {
        id: NonZeroU64::MIN,
        kind: PointerKind::Mouse,
        is_primary: true,
    }
}

pub(crate) fn touch_info() -> PointerInfo {
    PointerInfo {
        id: NonZeroU64::MIN.saturating_add(1),
        kind: PointerKind::Touch,
        is_primary: true,
    }
}

pub(crate) fn details_at(x: f64, y: f64) -> PointerDetails {
    PointerDetails::at(Point::new(x, y), 0)
}

pub(crate) fn moved_event(target: Node) -> PointerEvent<Node> {
    let kind = PointerEventKind::Moved {
        intermediate_points: SmallVec::new(),
    };
    PointerEvent::new(kind, target, mouse_info(), WINDOW, &details_at(0.0, 0.0))
}

pub(crate) fn raw(kind: RawEventKind, timestamp: u64, x: f64, y: f64) -> RawPointerEvent {
    RawPointerEvent::new(kind, DeviceId(1), WINDOW, timestamp, Point::new(x, y))
}
