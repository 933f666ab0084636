// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer device: turns raw pointer events into routed events.
//!
//! ## Overview
//!
//! A [`PointerDevice`] owns one [`Pointer`], its [`ClickTracker`] and the last
//! known pointer position, tagged with the root it was reported in.
//! [`PointerDevice::process`] consumes a [`RawPointerEvent`], resolves a target
//! in the given [`InputRoot`], bubbles a [`PointerEvent`] there, and updates
//! capture, click and hover state.
//!
//! ## Target resolution
//!
//! The target is the capturing element if the pointer is captured, otherwise
//! the hit-test result at the event position. A fresh single-button press is
//! the one exception: it always hit-tests, then captures what it hit.
//!
//! ## Transitions
//!
//! | Raw event | Condition | Routed |
//! |---|---|---|
//! | `ButtonDown` | more than one button held | `Moved` (chord; no click counting) |
//! | `ButtonDown` | otherwise | `Pressed` with click count; target captured |
//! | `ButtonUp` | buttons still held | `Moved` |
//! | `ButtonUp` | no buttons held | `Released`; capture released afterwards |
//! | `Move` | | `Moved` with intermediate points |
//! | `Wheel` | | `Wheel`; Shift-only vertical scroll becomes horizontal |
//! | `Magnify` / `Rotate` / `Swipe` | | matching gesture event |
//! | `LeaveWindow` / `NonClientButtonDown` | | nothing routed; position and hover cleared |
//!
//! After every `Moved`, hover is set to the plain hit-test result. Hover does
//! not follow capture, and touch contacts never hover.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::{PointerButton, PointerButtons};
//! use understory_pointer::device::PointerDevice;
//! use understory_pointer::hover::HoverTracker;
//! use understory_pointer::pointer::PointerIds;
//! use understory_pointer::types::*;
//!
//! // A root with a single element, 1, covering everything.
//! struct Flat;
//! impl ParentLookup<u32> for Flat {
//!     fn parent_of(&self, _: &u32) -> Option<u32> { None }
//! }
//! impl InputRoot<u32> for Flat {
//!     fn id(&self) -> RootId { RootId(1) }
//!     fn hit_test(&self, _: Point) -> Option<u32> { Some(1) }
//!     fn deliver(&mut self, _: u32, _: &PointerEvent<u32>) -> Outcome { Outcome::Handled }
//! }
//!
//! let mut ids = PointerIds::new();
//! let mut mouse = PointerDevice::mouse(DeviceId(0), ids.allocate());
//! let mut hover = HoverTracker::new();
//!
//! let down = RawPointerEvent::new(
//!     RawEventKind::ButtonDown(PointerButton::Left),
//!     DeviceId(0),
//!     RootId(1),
//!     1_000,
//!     Point::new(4.0, 4.0),
//! )
//! .with_buttons(PointerButtons::LEFT);
//!
//! let outcome = mouse.process(&mut Flat, &mut hover, &down);
//! assert_eq!(outcome.kind(), Some(RoutedEvent::Pressed));
//! assert_eq!(outcome.target(), Some(1));
//! assert!(outcome.handled());
//! assert_eq!(mouse.pointer().captured(), Some(1));
//! ```

use core::fmt::Debug;

use kurbo::{Point, Rect, Vec2};
use tracing::{debug, trace};
use understory_event_state::{ClickSettings, ClickTracker, PointerButton};

use crate::dispatcher;
use crate::hover::HoverTracker;
use crate::pointer::Pointer;
use crate::types::{
    DeviceId, InputRoot, Modifiers, ParentLookup, PointerDetails, PointerEvent, PointerEventKind,
    PointerId, PointerKind, RawEventKind, RawPointerEvent, RootId, RoutedEvent,
};

/// What [`PointerDevice::process`] did with a raw event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProcessOutcome<K> {
    /// An event was routed to `target` and bubbled.
    Routed {
        /// Kind of the routed event.
        kind: RoutedEvent,
        /// Element the event was routed to.
        target: K,
        /// Whether some element handled it.
        handled: bool,
    },
    /// Neither capture nor hit testing produced a target; nothing was routed.
    NoTarget,
    /// The pointer left the surface; its position was forgotten.
    Left,
    /// The device is disposed; the event was ignored.
    Stale,
}

impl<K: Copy> ProcessOutcome<K> {
    /// Whether the platform should skip its default handling of the raw event.
    pub fn handled(&self) -> bool {
        matches!(self, Self::Routed { handled: true, .. })
    }

    /// Whether the device was alive to process the event.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }

    /// Kind of the routed event, if one was routed.
    pub fn kind(&self) -> Option<RoutedEvent> {
        match self {
            Self::Routed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Element the event was routed to, if one was routed.
    pub fn target(&self) -> Option<K> {
        match self {
            Self::Routed { target, .. } => Some(*target),
            _ => None,
        }
    }
}

/// A physical pointer input source: a mouse, a pen, or one touch contact.
#[derive(Clone, Debug)]
pub struct PointerDevice<K> {
    id: DeviceId,
    pointer: Pointer<K>,
    last_position: Option<(RootId, Point)>,
    clicks: ClickTracker,
    settings: ClickSettings,
    disposed: bool,
}

impl<K: Copy + Eq + Debug> PointerDevice<K> {
    /// Create a device for `pointer` with default click settings.
    pub fn new(id: DeviceId, pointer: Pointer<K>) -> Self {
        Self {
            id,
            pointer,
            last_position: None,
            clicks: ClickTracker::new(),
            settings: ClickSettings::default(),
            disposed: false,
        }
    }

    /// Create a device for a primary mouse pointer.
    pub fn mouse(id: DeviceId, pointer: PointerId) -> Self {
        Self::new(id, Pointer::new(pointer, PointerKind::Mouse, true))
    }

    /// Use the platform's double-click settings.
    pub fn with_settings(mut self, settings: ClickSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the double-click settings, for example after a platform change.
    pub fn set_settings(&mut self, settings: ClickSettings) {
        self.settings = settings;
    }

    /// Device identifier.
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// The device's pointer.
    pub fn pointer(&self) -> &Pointer<K> {
        &self.pointer
    }

    /// The device's pointer, for explicit capture.
    ///
    /// Handlers run inside [`process`](Self::process) and cannot reach the
    /// device. A host that lets handlers request capture queues the request and
    /// applies it here once `process` returns. Queued requests therefore land
    /// after the device's own capture changes for that event: the capture taken
    /// by a press, and the release that follows a `Released` delivery.
    pub fn pointer_mut(&mut self) -> &mut Pointer<K> {
        &mut self.pointer
    }

    /// Root and position of the last event, or `None` if the pointer is not
    /// over any surface.
    pub fn last_position(&self) -> Option<(RootId, Point)> {
        self.last_position
    }

    /// Click state.
    pub fn clicks(&self) -> &ClickTracker {
        &self.clicks
    }

    /// Double-click settings in use.
    pub fn settings(&self) -> &ClickSettings {
        &self.settings
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Tear the device down: release capture and ignore further events.
    pub fn dispose(&mut self) {
        if !self.disposed {
            debug!(device = self.id.0, "pointer device disposed");
        }
        self.disposed = true;
        self.pointer.dispose();
    }

    /// Process one raw event against `root`, whose hover state is `hover`.
    pub fn process<R>(
        &mut self,
        root: &mut R,
        hover: &mut HoverTracker<K>,
        raw: &RawPointerEvent,
    ) -> ProcessOutcome<K>
    where
        R: InputRoot<K> + ?Sized,
    {
        if self.disposed {
            trace!(device = self.id.0, "raw event for disposed device ignored");
            return ProcessOutcome::Stale;
        }
        debug_assert_eq!(
            root.id(),
            raw.root,
            "raw event processed against another root"
        );

        let previous = self.last_position.replace((raw.root, raw.position));
        let held = raw.buttons.count();
        match raw.kind {
            RawEventKind::LeaveWindow | RawEventKind::NonClientButtonDown => {
                self.leave_window(root, hover, raw, previous)
            }
            RawEventKind::ButtonDown(_) if held > 1 => self.moved(root, hover, raw),
            RawEventKind::ButtonDown(button) => self.pressed(root, raw, button),
            RawEventKind::ButtonUp(_) if held != 0 => self.moved(root, hover, raw),
            RawEventKind::ButtonUp(button) => self.released(root, raw, button),
            RawEventKind::Move => self.moved(root, hover, raw),
            RawEventKind::Wheel(delta) => {
                let delta = horizontal_scroll(delta, raw.modifiers);
                self.route(root, raw, PointerEventKind::Wheel { delta })
            }
            RawEventKind::Magnify(delta) => {
                self.route(root, raw, PointerEventKind::Magnify { delta })
            }
            RawEventKind::Rotate(delta) => {
                self.route(root, raw, PointerEventKind::Rotate { delta })
            }
            RawEventKind::Swipe(delta) => self.route(root, raw, PointerEventKind::Swipe { delta }),
        }
    }

    /// Re-derive hover after the scene under the pointer changed.
    ///
    /// Only acts if the last event came from `root` and its position lies
    /// inside `rect`. Returns `true` if the hovered element changed.
    pub fn scene_invalidated<R>(
        &mut self,
        root: &mut R,
        hover: &mut HoverTracker<K>,
        rect: Rect,
    ) -> bool
    where
        R: InputRoot<K> + ?Sized,
    {
        if self.disposed || self.pointer.kind() == PointerKind::Touch {
            return false;
        }
        let Some((last_root, position)) = self.last_position else {
            return false;
        };
        // Positions are root-local; another root's position means nothing here.
        if last_root != root.id() || !contains_inclusive(rect, position) {
            return false;
        }

        let details = match hover.details(self.pointer.id()) {
            Some(d) => PointerDetails { position, ..*d },
            None => PointerDetails::at(position, 0),
        };
        let hit = root.hit_test(position);
        let previous = hover.set_over(root, self.pointer.info(), &details, hit);
        trace!(
            device = self.id.0,
            ?previous,
            current = ?hit,
            "hover re-derived after scene change"
        );
        previous != hit
    }

    /// React to `element` leaving the tree; see [`Pointer::element_detached`].
    pub fn element_detached<P>(
        &mut self,
        element: K,
        former_parent: Option<K>,
        parents: &P,
    ) -> bool
    where
        P: ParentLookup<K> + ?Sized,
    {
        self.pointer
            .element_detached(element, former_parent, parents)
    }

    fn pressed<R>(
        &mut self,
        root: &mut R,
        raw: &RawPointerEvent,
        button: PointerButton,
    ) -> ProcessOutcome<K>
    where
        R: InputRoot<K> + ?Sized,
    {
        // A fresh press re-hit-tests even while captured.
        let Some(hit) = root.hit_test(raw.position) else {
            trace!(device = self.id.0, "press over nothing");
            return ProcessOutcome::NoTarget;
        };
        self.pointer.capture(Some(hit));
        let settings = &self.settings;
        let (at, position) = (raw.timestamp, raw.position);
        let click_count = self.clicks.register_down(at, position, button, settings);
        let kind = PointerEventKind::Pressed {
            button,
            click_count,
        };
        self.dispatch(root, raw, hit, kind)
    }

    fn released<R>(
        &mut self,
        root: &mut R,
        raw: &RawPointerEvent,
        button: PointerButton,
    ) -> ProcessOutcome<K>
    where
        R: InputRoot<K> + ?Sized,
    {
        let button = self.clicks.last_button().unwrap_or(button);
        let outcome = self.route(root, raw, PointerEventKind::Released { button });
        self.pointer.capture(None);
        outcome
    }

    fn moved<R>(
        &mut self,
        root: &mut R,
        hover: &mut HoverTracker<K>,
        raw: &RawPointerEvent,
    ) -> ProcessOutcome<K>
    where
        R: InputRoot<K> + ?Sized,
    {
        let hit = root.hit_test(raw.position);
        let kind = PointerEventKind::Moved {
            intermediate_points: raw.intermediate_points.clone(),
        };
        let outcome = match self.pointer.captured().or(hit) {
            Some(target) => self.dispatch(root, raw, target, kind),
            None => ProcessOutcome::NoTarget,
        };

        if self.pointer.kind() != PointerKind::Touch {
            let details = PointerDetails::from_raw(raw);
            hover.set_over(root, self.pointer.info(), &details, hit);
        }
        outcome
    }

    fn leave_window<R>(
        &mut self,
        root: &mut R,
        hover: &mut HoverTracker<K>,
        raw: &RawPointerEvent,
        previous: Option<(RootId, Point)>,
    ) -> ProcessOutcome<K>
    where
        R: InputRoot<K> + ?Sized,
    {
        self.last_position = None;
        let position = match previous {
            Some((last_root, p)) if last_root == raw.root => p,
            _ => raw.position,
        };
        let details = PointerDetails {
            position,
            ..PointerDetails::from_raw(raw)
        };
        hover.clear(root, self.pointer.id(), &details);
        trace!(device = self.id.0, "pointer left the surface");
        ProcessOutcome::Left
    }

    /// Route to the capturing element, or else whatever is under the pointer.
    fn route<R>(
        &mut self,
        root: &mut R,
        raw: &RawPointerEvent,
        kind: PointerEventKind,
    ) -> ProcessOutcome<K>
    where
        R: InputRoot<K> + ?Sized,
    {
        match self
            .pointer
            .captured()
            .or_else(|| root.hit_test(raw.position))
        {
            Some(target) => self.dispatch(root, raw, target, kind),
            None => ProcessOutcome::NoTarget,
        }
    }

    fn dispatch<R>(
        &self,
        root: &mut R,
        raw: &RawPointerEvent,
        target: K,
        kind: PointerEventKind,
    ) -> ProcessOutcome<K>
    where
        R: InputRoot<K> + ?Sized,
    {
        let routed = kind.routed();
        let event = PointerEvent::new(
            kind,
            target,
            self.pointer.info(),
            root.id(),
            &PointerDetails::from_raw(raw),
        );
        let handled = dispatcher::bubble(root, &event);
        trace!(device = self.id.0, kind = ?routed, ?target, handled, "routed");
        ProcessOutcome::Routed {
            kind: routed,
            target,
            handled,
        }
    }
}

/// Shift-scrolling with a vertical-only wheel means horizontal scrolling.
fn horizontal_scroll(delta: Vec2, modifiers: Modifiers) -> Vec2 {
    if modifiers == Modifiers::SHIFT && is_zero(delta.x) {
        Vec2::new(delta.y, delta.x)
    } else {
        delta
    }
}

fn is_zero(v: f64) -> bool {
    v.abs() < 10.0 * f64::EPSILON
}

// Invalidation rects include their far edges.
fn contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}
