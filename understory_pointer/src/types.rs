// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: identifiers, raw and routed events, outcomes, and the tree seams.
//!
//! ## Overview
//!
//! Raw events ([`RawPointerEvent`]) come from the windowing layer and are consumed
//! once by a [`PointerDevice`](crate::device::PointerDevice). Routed events
//! ([`PointerEvent`]) are built per delivery and handed to an [`InputRoot`].
//!
//! The element key `K` is a small, non-owning handle (an index, a generational
//! id, …). Nothing in this crate keeps elements alive; the host reports
//! removals through the `element_detached` entry points instead.

use core::num::NonZeroU64;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;
use understory_event_state::{PointerButton, PointerButtons};

/// Pointer identifier, unique within a session.
///
/// Use [`PointerIds`](crate::pointer::PointerIds) to hand them out.
pub type PointerId = NonZeroU64;

/// Identifier of the platform input source a raw event came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u64);

/// Identifier of an input root (a top-level window or surface).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootId(pub u64);

/// Kind of physical pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse or trackpad.
    Mouse,
    /// Touch contact. Touch contacts never hover.
    Touch,
    /// Stylus.
    Pen,
}

/// Identity of a pointer as carried on routed events.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointerInfo {
    /// Pointer identifier.
    pub id: PointerId,
    /// Kind of pointer.
    pub kind: PointerKind,
    /// Whether this is the primary pointer of its kind.
    pub is_primary: bool,
}

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT   = 0b0000_0001;
        /// Control key.
        const CONTROL = 0b0000_0010;
        /// Alt / Option key.
        const ALT     = 0b0000_0100;
        /// Meta / Command / Windows key.
        const META    = 0b0000_1000;
    }
}

/// What a raw pointer event reports.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RawEventKind {
    /// A button went down.
    ButtonDown(PointerButton),
    /// A button went up.
    ButtonUp(PointerButton),
    /// The pointer moved.
    Move,
    /// Wheel scroll by the given delta.
    Wheel(Vec2),
    /// Trackpad pinch by the given delta.
    Magnify(Vec2),
    /// Trackpad rotation by the given delta.
    Rotate(Vec2),
    /// Trackpad swipe by the given delta.
    Swipe(Vec2),
    /// The pointer left the root's surface.
    LeaveWindow,
    /// A button went down on the window frame (title bar, borders).
    NonClientButtonDown,
}

/// Intermediate samples coalesced into a single move.
pub type IntermediatePoints = SmallVec<[Point; 4]>;

/// A device-level pointer notification from the windowing layer.
#[derive(Clone, Debug, PartialEq)]
pub struct RawPointerEvent {
    /// What happened.
    pub kind: RawEventKind,
    /// Monotonic timestamp in the unit of
    /// [`ClickSettings::double_click_time`].
    ///
    /// [`ClickSettings::double_click_time`]: understory_event_state::ClickSettings::double_click_time
    pub timestamp: u64,
    /// Position in root coordinates.
    pub position: Point,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Buttons held after this event.
    pub buttons: PointerButtons,
    /// Input source that produced the event.
    pub device: DeviceId,
    /// Root the event was delivered to.
    pub root: RootId,
    /// Samples between the previous move and this one, for high-frequency samplers.
    pub intermediate_points: IntermediatePoints,
}

impl RawPointerEvent {
    /// Create a raw event with no modifiers, no held buttons and no intermediate points.
    pub fn new(
        kind: RawEventKind,
        device: DeviceId,
        root: RootId,
        timestamp: u64,
        position: Point,
    ) -> Self {
        Self {
            kind,
            timestamp,
            position,
            modifiers: Modifiers::empty(),
            buttons: PointerButtons::empty(),
            device,
            root,
            intermediate_points: IntermediatePoints::new(),
        }
    }

    /// Set the keyboard modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the buttons held after this event.
    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Set the coalesced intermediate samples.
    pub fn with_intermediate_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.intermediate_points = points.into_iter().collect();
        self
    }
}

/// Which button transition, if any, a routed event reflects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerUpdateKind {
    /// The button went down.
    Pressed(PointerButton),
    /// The button went up.
    Released(PointerButton),
    /// No button transition.
    Other,
}

/// Pointer state attached to every routed event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointerProperties {
    /// Buttons held after the raw event.
    pub buttons: PointerButtons,
    /// The button transition the raw event reported.
    pub update: PointerUpdateKind,
}

impl PointerProperties {
    /// Properties with no held buttons and no transition.
    pub const NONE: Self = Self {
        buttons: PointerButtons::empty(),
        update: PointerUpdateKind::Other,
    };

    /// Derive properties from a raw event.
    pub fn from_raw(raw: &RawPointerEvent) -> Self {
        let update = match raw.kind {
            RawEventKind::ButtonDown(b) => PointerUpdateKind::Pressed(b),
            RawEventKind::ButtonUp(b) => PointerUpdateKind::Released(b),
            _ => PointerUpdateKind::Other,
        };
        Self {
            buttons: raw.buttons,
            update,
        }
    }
}

impl Default for PointerProperties {
    fn default() -> Self {
        Self::NONE
    }
}

/// The details of the event that triggered a hover change.
///
/// Hover transitions are side effects of other events (a move, the pointer
/// leaving the window, a scene change); their enter/leave events carry the
/// details of that trigger.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerDetails {
    /// Position in root coordinates.
    pub position: Point,
    /// Timestamp of the trigger.
    pub timestamp: u64,
    /// Pointer state at the trigger.
    pub properties: PointerProperties,
    /// Keyboard modifiers at the trigger.
    pub modifiers: Modifiers,
}

impl PointerDetails {
    /// Details at `position` with no buttons or modifiers.
    pub fn at(position: Point, timestamp: u64) -> Self {
        Self {
            position,
            timestamp,
            properties: PointerProperties::NONE,
            modifiers: Modifiers::empty(),
        }
    }

    /// Details of a raw event.
    pub fn from_raw(raw: &RawPointerEvent) -> Self {
        Self {
            position: raw.position,
            timestamp: raw.timestamp,
            properties: PointerProperties::from_raw(raw),
            modifiers: raw.modifiers,
        }
    }
}

/// Routed event kinds, without payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoutedEvent {
    /// A button was pressed.
    Pressed,
    /// A button was released.
    Released,
    /// The pointer moved.
    Moved,
    /// Wheel scroll.
    Wheel,
    /// Trackpad pinch.
    Magnify,
    /// Trackpad rotation.
    Rotate,
    /// Trackpad swipe.
    Swipe,
    /// The pointer started hovering the element.
    Enter,
    /// The pointer stopped hovering the element.
    Leave,
}

/// Routed event kinds with their payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEventKind {
    /// A button was pressed.
    Pressed {
        /// The pressed button.
        button: PointerButton,
        /// 1 for a single click, 2 for a double click, and so on.
        click_count: u32,
    },
    /// The last held button was released.
    Released {
        /// The button of the press this release ends.
        button: PointerButton,
    },
    /// The pointer moved (or a chord changed).
    Moved {
        /// Coalesced samples since the previous move.
        intermediate_points: IntermediatePoints,
    },
    /// Wheel scroll.
    Wheel {
        /// Scroll delta, with Shift-scroll already mapped to the horizontal axis.
        delta: Vec2,
    },
    /// Trackpad pinch.
    Magnify {
        /// Gesture delta.
        delta: Vec2,
    },
    /// Trackpad rotation.
    Rotate {
        /// Gesture delta.
        delta: Vec2,
    },
    /// Trackpad swipe.
    Swipe {
        /// Gesture delta.
        delta: Vec2,
    },
    /// The pointer started hovering the element. Delivered to one element only.
    Enter,
    /// The pointer stopped hovering the element. Delivered to one element only.
    Leave,
}

impl PointerEventKind {
    /// The payload-free kind.
    pub fn routed(&self) -> RoutedEvent {
        match self {
            Self::Pressed { .. } => RoutedEvent::Pressed,
            Self::Released { .. } => RoutedEvent::Released,
            Self::Moved { .. } => RoutedEvent::Moved,
            Self::Wheel { .. } => RoutedEvent::Wheel,
            Self::Magnify { .. } => RoutedEvent::Magnify,
            Self::Rotate { .. } => RoutedEvent::Rotate,
            Self::Swipe { .. } => RoutedEvent::Swipe,
            Self::Enter => RoutedEvent::Enter,
            Self::Leave => RoutedEvent::Leave,
        }
    }
}

/// A routed pointer event.
///
/// Built once per delivery. Whether it was handled is not stored here; it is
/// what [`InputRoot::deliver`] returns.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent<K> {
    /// Kind and payload.
    pub kind: PointerEventKind,
    /// The element the event was routed to.
    pub target: K,
    /// The pointer that produced it.
    pub pointer: PointerInfo,
    /// The root it was routed in.
    pub root: RootId,
    /// Position in root coordinates.
    pub position: Point,
    /// Timestamp of the raw event.
    pub timestamp: u64,
    /// Pointer state.
    pub properties: PointerProperties,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
}

impl<K> PointerEvent<K> {
    /// Build an event for `target` from the details of its trigger.
    pub fn new(
        kind: PointerEventKind,
        target: K,
        pointer: PointerInfo,
        root: RootId,
        details: &PointerDetails,
    ) -> Self {
        Self {
            kind,
            target,
            pointer,
            root,
            position: details.position,
            timestamp: details.timestamp,
            properties: details.properties,
            modifiers: details.modifiers,
        }
    }
}

/// Per-element handler outcome.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Keep propagating.
    Continue,
    /// The event is handled; stop bubbling.
    Handled,
}

/// Look up the parent of an element.
///
/// Paths for hover and bubbling are reconstructed through this. Implementations
/// must describe an acyclic tree.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// The visual tree and renderer of one input root, as seen by the pointer core.
///
/// The core only reads the tree (parents, hit tests) and asks it to run
/// handlers; it never mutates it.
pub trait InputRoot<K>: ParentLookup<K> {
    /// Identifier of this root.
    fn id(&self) -> RootId;

    /// Topmost interactive element under `point`, if any.
    fn hit_test(&self, point: Point) -> Option<K>;

    /// Run the handlers of `node` for `event`.
    ///
    /// Called once per element; bubbling is driven by
    /// [`dispatcher::bubble`](crate::dispatcher::bubble).
    ///
    /// The device is borrowed for the whole call, so a handler cannot change
    /// capture from here. Queue the request and apply it through
    /// [`PointerDevice::pointer_mut`](crate::device::PointerDevice::pointer_mut)
    /// after [`process`](crate::device::PointerDevice::process) returns.
    fn deliver(&mut self, node: K, event: &PointerEvent<K>) -> Outcome;
}
