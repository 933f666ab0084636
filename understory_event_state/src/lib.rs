// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: small, pure state machines for pointer input.
//!
//! ## Overview
//!
//! This crate holds the per-device bookkeeping a pointer router needs but that
//! does not depend on any tree or renderer:
//!
//! - [`button`]: the fixed set of pointer buttons ([`PointerButton`]) and a
//!   bit set of the buttons currently held ([`PointerButtons`]). Counting the
//!   held buttons is how chords are told apart from fresh presses.
//! - [`click`]: multi-click disambiguation ([`ClickTracker`]) driven by the
//!   platform's double-click time and size ([`ClickSettings`]).
//!
//! Everything here is a function of prior state plus the new sample. There are
//! no timers; timestamps come from the raw events.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::{ClickSettings, ClickTracker, PointerButton};
//!
//! let settings = ClickSettings::default();
//! let mut clicks = ClickTracker::new();
//!
//! let p = Point::new(10.0, 10.0);
//! assert_eq!(clicks.register_down(1_000, p, PointerButton::Left, &settings), 1);
//! assert_eq!(clicks.register_down(1_150, p, PointerButton::Left, &settings), 2);
//! ```
//!
//! This crate is `no_std` and does not allocate.

#![no_std]

pub mod button;
pub mod click;

pub use button::{PointerButton, PointerButtons};
pub use click::{ClickSettings, ClickTracker};
