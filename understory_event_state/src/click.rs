// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-click disambiguation for a single pointer device.
//!
//! A press is part of a multi-click (double, triple, …) when it lands close
//! enough to the previous press, both in time and in space. "Close enough" is
//! a platform setting: [`ClickSettings::double_click_time`] bounds the gap
//! between presses and [`ClickSettings::double_click_size`] is the size of the
//! rectangle, centered on the previous press, the next one must land in.
//!
//! ## Rules
//!
//! For every press registered with [`ClickTracker::register_down`]:
//!
//! 1. If the press lies outside the rectangle around the previous press, or
//!    more than `double_click_time` has elapsed since it, the count resets.
//! 2. The count is then incremented, so it is always at least 1.
//! 3. The press becomes the new reference for the next one.
//!
//! The button is recorded but does not take part in the decision: pressing
//! right after left at the same spot still counts as a double click. Callers
//! that care can compare [`ClickTracker::last_button`] themselves.
//!
//! ## Usage
//!
//! ```
//! use kurbo::{Point, Size};
//! use understory_event_state::click::{ClickSettings, ClickTracker};
//! use understory_event_state::PointerButton;
//!
//! let settings = ClickSettings {
//!     double_click_time: 500,
//!     double_click_size: Size::new(4.0, 4.0),
//! };
//! let mut clicks = ClickTracker::new();
//!
//! let at = Point::new(50.0, 50.0);
//! assert_eq!(clicks.register_down(0, at, PointerButton::Left, &settings), 1);
//! assert_eq!(clicks.register_down(100, at, PointerButton::Left, &settings), 2);
//!
//! // Too far away from the previous press: a fresh single click.
//! let far = Point::new(70.0, 50.0);
//! assert_eq!(clicks.register_down(200, far, PointerButton::Left, &settings), 1);
//! ```

use kurbo::{Point, Rect, Size};

use crate::button::PointerButton;

/// Platform double-click settings.
///
/// Timestamps and [`double_click_time`](Self::double_click_time) share a unit;
/// hosts usually feed milliseconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClickSettings {
    /// Largest gap between two presses that still continues a multi-click.
    pub double_click_time: u64,
    /// Size of the rectangle, centered on the previous press, that the next
    /// press must land in to continue a multi-click.
    pub double_click_size: Size,
}

impl ClickSettings {
    /// Default double-click time (500ms) when the platform supplies none.
    pub const DEFAULT_TIME: u64 = 500;
    /// Default double-click size (4×4) when the platform supplies none.
    pub const DEFAULT_SIZE: Size = Size::new(4.0, 4.0);
}

impl Default for ClickSettings {
    fn default() -> Self {
        Self {
            double_click_time: Self::DEFAULT_TIME,
            double_click_size: Self::DEFAULT_SIZE,
        }
    }
}

/// Click counter for one pointer device.
///
/// Only button-down events touch this state. See the [module docs](self) for
/// the counting rules.
#[derive(Clone, Debug, Default)]
pub struct ClickTracker {
    count: u32,
    last_timestamp: u64,
    last_rect: Rect,
    last_button: Option<PointerButton>,
}

impl ClickTracker {
    /// Create a tracker with no press history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a button press and return its click count.
    ///
    /// The count is 1 for a single click, 2 for a double click and so on.
    pub fn register_down(
        &mut self,
        timestamp: u64,
        position: Point,
        button: PointerButton,
        settings: &ClickSettings,
    ) -> u32 {
        let elapsed = timestamp.saturating_sub(self.last_timestamp);
        if !contains_inclusive(self.last_rect, position) || elapsed > settings.double_click_time {
            self.count = 0;
        }

        self.count = self.count.saturating_add(1);
        self.last_timestamp = timestamp;
        self.last_rect = Rect::from_center_size(position, settings.double_click_size);
        self.last_button = Some(button);
        self.count
    }

    /// Click count of the last registered press, or 0 if there was none.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Button of the last registered press.
    pub fn last_button(&self) -> Option<PointerButton> {
        self.last_button
    }

    /// Rectangle the next press must land in to continue the current run.
    pub fn last_rect(&self) -> Rect {
        self.last_rect
    }

    /// Forget the press history; the next press is a single click.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// `Rect::contains` is half-open; the double-click area includes its far edges.
fn contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}
