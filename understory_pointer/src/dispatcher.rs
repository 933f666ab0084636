// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helpers: deliver routed events through an [`InputRoot`].
//!
//! Two delivery shapes are used by the pointer core:
//!
//! - [`bubble`]: target first, then each ancestor, until an element reports
//!   [`Outcome::Handled`] or the root has been visited. Used for presses,
//!   releases, moves, wheel and gesture events.
//! - [`deliver`]: the target only. Used for enter/leave, which are raised once
//!   per element of the changed part of the hover path.
//!
//! Whether the event was handled is the return value; events carry no
//! mutable flag.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_pointer::dispatcher;
//! use understory_pointer::types::*;
//! # use understory_pointer::pointer::PointerIds;
//!
//! // A three-element chain 1 → 2 → 3 where only 2 handles events.
//! struct Chain(Vec<u32>);
//! impl ParentLookup<u32> for Chain {
//!     fn parent_of(&self, n: &u32) -> Option<u32> { (*n > 1).then(|| n - 1) }
//! }
//! impl InputRoot<u32> for Chain {
//!     fn id(&self) -> RootId { RootId(0) }
//!     fn hit_test(&self, _: Point) -> Option<u32> { Some(3) }
//!     fn deliver(&mut self, node: u32, _: &PointerEvent<u32>) -> Outcome {
//!         self.0.push(node);
//!         if node == 2 { Outcome::Handled } else { Outcome::Continue }
//!     }
//! }
//!
//! # let id = PointerIds::new().allocate();
//! let pointer = PointerInfo { id, kind: PointerKind::Mouse, is_primary: true };
//! let details = PointerDetails::at(Point::ZERO, 0);
//! let moved = PointerEventKind::Moved { intermediate_points: Default::default() };
//! let event = PointerEvent::new(moved, 3, pointer, RootId(0), &details);
//!
//! let mut root = Chain(Vec::new());
//! assert!(dispatcher::bubble(&mut root, &event));
//! assert_eq!(root.0, vec![3, 2]);
//! ```

use crate::types::{InputRoot, Outcome, PointerEvent};

/// Bubble `event` from its target towards the root.
///
/// Returns `true` if some element reported [`Outcome::Handled`]; ancestors of
/// that element are not visited.
pub fn bubble<K, R>(root: &mut R, event: &PointerEvent<K>) -> bool
where
    K: Copy,
    R: InputRoot<K> + ?Sized,
{
    let mut node = Some(event.target);
    // Caller ensures acyclic ancestry.
    while let Some(n) = node {
        if root.deliver(n, event) == Outcome::Handled {
            return true;
        }
        node = root.parent_of(&n);
    }
    false
}

/// Deliver `event` to its target only.
///
/// Returns `true` if the target reported [`Outcome::Handled`].
pub fn deliver<K, R>(root: &mut R, event: &PointerEvent<K>) -> bool
where
    K: Copy,
    R: InputRoot<K> + ?Sized,
{
    root.deliver(event.target, event) == Outcome::Handled
}
