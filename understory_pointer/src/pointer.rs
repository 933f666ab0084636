// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer identity and capture.
//!
//! A [`Pointer`] is one physical pointer: a mouse, a pen, or one touch contact.
//! Besides its identity it owns a single capture slot. While captured, events
//! from the pointer are routed to the capturing element regardless of where
//! the pointer is (see [`PointerDevice`](crate::device::PointerDevice) for the
//! one exception, a fresh single-button press).
//!
//! Capture is last-caller-wins and is never released implicitly by the
//! pointer itself. When the captured element (or one of its ancestors) leaves
//! the tree, [`Pointer::element_detached`] moves capture to the element's
//! former parent.
//!
//! ```
//! use understory_pointer::pointer::{Pointer, PointerIds};
//! use understory_pointer::types::PointerKind;
//!
//! let mut ids = PointerIds::new();
//! let mut pointer: Pointer<u32> = Pointer::new(ids.allocate(), PointerKind::Mouse, true);
//!
//! pointer.capture(Some(7));
//! assert_eq!(pointer.capture(Some(9)), Some(7));
//! assert_eq!(pointer.captured(), Some(9));
//!
//! pointer.dispose();
//! assert_eq!(pointer.captured(), None);
//! pointer.capture(Some(7));
//! assert_eq!(pointer.captured(), None);
//! ```

use core::fmt::Debug;
use core::num::NonZeroU64;

use tracing::debug;

use crate::types::{ParentLookup, PointerId, PointerInfo, PointerKind};

/// One physical pointer and its capture slot.
#[derive(Clone, Debug)]
pub struct Pointer<K> {
    info: PointerInfo,
    captured: Option<K>,
    disposed: bool,
}

impl<K: Copy + Eq + Debug> Pointer<K> {
    /// Create an uncaptured pointer.
    pub fn new(id: PointerId, kind: PointerKind, is_primary: bool) -> Self {
        Self {
            info: PointerInfo {
                id,
                kind,
                is_primary,
            },
            captured: None,
            disposed: false,
        }
    }

    /// Identity as carried on routed events.
    pub fn info(&self) -> PointerInfo {
        self.info
    }

    /// Pointer identifier.
    pub fn id(&self) -> PointerId {
        self.info.id
    }

    /// Kind of pointer.
    pub fn kind(&self) -> PointerKind {
        self.info.kind
    }

    /// Whether this is the primary pointer of its kind.
    pub fn is_primary(&self) -> bool {
        self.info.is_primary
    }

    /// The element that currently owns the pointer, if any.
    pub fn captured(&self) -> Option<K> {
        self.captured
    }

    /// Set or clear the capturing element and return the previous one.
    ///
    /// Ignored once the pointer is disposed.
    pub fn capture(&mut self, target: Option<K>) -> Option<K> {
        if self.disposed {
            return None;
        }
        if self.captured != target {
            let pointer = self.info.id.get();
            debug!(pointer, from = ?self.captured, to = ?target, "capture changed");
        }
        core::mem::replace(&mut self.captured, target)
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release capture and make the pointer inert.
    pub fn dispose(&mut self) {
        self.capture(None);
        self.disposed = true;
    }

    /// React to `element` leaving the tree.
    ///
    /// If the captured element is `element` or lies in its subtree, capture
    /// moves to `former_parent`, the element's parent before removal. The
    /// subtree below `element` is expected to still be linked when this is
    /// called. Returns `true` if capture changed.
    pub fn element_detached<P>(
        &mut self,
        element: K,
        former_parent: Option<K>,
        parents: &P,
    ) -> bool
    where
        P: ParentLookup<K> + ?Sized,
    {
        let Some(captured) = self.captured else {
            return false;
        };
        if !is_self_or_descendant(parents, captured, element) {
            return false;
        }
        self.capture(former_parent);
        true
    }
}

fn is_self_or_descendant<K, P>(parents: &P, node: K, ancestor: K) -> bool
where
    K: Copy + Eq,
    P: ParentLookup<K> + ?Sized,
{
    let mut cur = Some(node);
    while let Some(n) = cur {
        if n == ancestor {
            return true;
        }
        cur = parents.parent_of(&n);
    }
    false
}

/// Hands out pointer identifiers for one session.
///
/// Identifiers start at 1 and are never reused.
#[derive(Clone, Debug, Default)]
pub struct PointerIds {
    issued: u64,
}

impl PointerIds {
    /// Create an allocator that has issued nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next free identifier.
    pub fn allocate(&mut self) -> PointerId {
        let id = NonZeroU64::MIN.saturating_add(self.issued);
        self.issued = self.issued.saturating_add(1);
        id
    }
}
