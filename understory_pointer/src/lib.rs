// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pointer --heading-base-level=0

//! Understory Pointer: a deterministic, `no_std` pointer router for UI trees.
//!
//! ## Overview
//!
//! This crate turns device-level pointer notifications (buttons, moves, wheel,
//! trackpad gestures, touch contacts) into events delivered to elements of a
//! visual tree, while keeping capture, hover and multi-click state.
//!
//! It owns no tree and does no hit testing of its own. The host implements
//! [`InputRoot`](types::InputRoot) for each top-level surface: parent lookup,
//! a hit test, and per-element delivery.
//!
//! ## Pieces
//!
//! - [`Pointer`](pointer::Pointer): identity of one physical pointer plus its
//!   capture slot. Identifiers come from [`PointerIds`](pointer::PointerIds).
//! - [`HoverTracker`](hover::HoverTracker): per root, which element each
//!   pointer is over. Changes raise leave then enter, leaf first, below the
//!   nearest common ancestor only.
//! - [`PointerDevice`](device::PointerDevice): consumes
//!   [`RawPointerEvent`](types::RawPointerEvent)s, resolves the target
//!   (capture, else hit test), counts clicks, bubbles the routed event, and
//!   drives hover.
//! - [`DeviceRegistry`](registry::DeviceRegistry): per root, the device that
//!   last produced an event, so a repaint re-derives hover only once.
//! - [`dispatcher`]: bubble and single-target delivery over an `InputRoot`.
//!
//! Button sets and click counting live in [`understory_event_state`].
//!
//! ## Workflow
//!
//! 1) On each raw event, call [`PointerDevice::process`](device::PointerDevice::process)
//!    with the root it arrived in and that root's hover tracker. The returned
//!    [`ProcessOutcome`](device::ProcessOutcome) says whether some element
//!    handled it.
//! 2) Feed the outcome to
//!    [`DeviceRegistry::note_processed`](registry::DeviceRegistry::note_processed).
//! 3) When the renderer invalidates part of a root, ask the registry for the
//!    active device and call its
//!    [`scene_invalidated`](device::PointerDevice::scene_invalidated).
//! 4) When an element leaves the tree, notify both the hover tracker and every
//!    device so no hover or capture reference outlives it.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_pointer::device::PointerDevice;
//! use understory_pointer::hover::HoverTracker;
//! use understory_pointer::pointer::PointerIds;
//! use understory_pointer::registry::DeviceRegistry;
//! use understory_pointer::types::*;
//!
//! // Two side-by-side buttons, 1 and 2, inside a panel 0.
//! struct Panel(Vec<(RoutedEvent, u32)>);
//! impl ParentLookup<u32> for Panel {
//!     fn parent_of(&self, n: &u32) -> Option<u32> { (*n != 0).then_some(0) }
//! }
//! impl InputRoot<u32> for Panel {
//!     fn id(&self) -> RootId { RootId(7) }
//!     fn hit_test(&self, p: Point) -> Option<u32> {
//!         if Rect::new(0.0, 0.0, 50.0, 20.0).contains(p) { Some(1) }
//!         else if Rect::new(50.0, 0.0, 100.0, 20.0).contains(p) { Some(2) }
//!         else { None }
//!     }
//!     fn deliver(&mut self, node: u32, event: &PointerEvent<u32>) -> Outcome {
//!         self.0.push((event.kind.routed(), node));
//!         Outcome::Continue
//!     }
//! }
//!
//! let mut panel = Panel(Vec::new());
//! let mut hover = HoverTracker::new();
//! let mut registry = DeviceRegistry::new();
//! let mut mouse = PointerDevice::mouse(DeviceId(0), PointerIds::new().allocate());
//!
//! let mv = |x: f64| {
//!     let at = Point::new(x, 10.0);
//!     RawPointerEvent::new(RawEventKind::Move, DeviceId(0), RootId(7), 0, at)
//! };
//! for raw in [mv(10.0), mv(60.0)] {
//!     let outcome = mouse.process(&mut panel, &mut hover, &raw);
//!     registry.note_processed(&raw, &outcome);
//! }
//!
//! assert_eq!(hover.over(mouse.pointer().id()), Some(2));
//! assert_eq!(registry.scene_invalidated(RootId(7)), Some(DeviceId(0)));
//! // Moving from 1 to 2 leaves 1 and enters 2; the shared panel is untouched.
//! let tail = panel.0[panel.0.len() - 2..].to_vec();
//! assert_eq!(tail, vec![(RoutedEvent::Leave, 1), (RoutedEvent::Enter, 2)]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod device;
pub mod dispatcher;
pub mod hover;
pub mod pointer;
pub mod registry;
pub mod types;

#[cfg(test)]
mod testing;
