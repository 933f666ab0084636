// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Which device last drove each input root.
//!
//! When the renderer reports that part of a root changed, hover has to be
//! re-derived by hit testing at the pointer position. Several devices can share
//! a root, but only the one that most recently produced an event there has a
//! position worth re-testing; the others are stale. [`DeviceRegistry`] keeps
//! that one device per root.
//!
//! ```
//! use understory_pointer::registry::DeviceRegistry;
//! use understory_pointer::types::{DeviceId, RootId};
//!
//! let mut reg = DeviceRegistry::new();
//! reg.record(RootId(1), DeviceId(10));
//! reg.record(RootId(1), DeviceId(11));
//! assert_eq!(reg.scene_invalidated(RootId(1)), Some(DeviceId(11)));
//!
//! reg.remove_device(DeviceId(11));
//! assert_eq!(reg.scene_invalidated(RootId(1)), None);
//! ```

use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::device::ProcessOutcome;
use crate::types::{DeviceId, RawPointerEvent, RootId};

/// Per-root record of the most recently active device.
#[derive(Clone, Debug, Default)]
pub struct DeviceRegistry {
    last: HashMap<RootId, DeviceId>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `device` just processed an event in `root`.
    pub fn record(&mut self, root: RootId, device: DeviceId) {
        if self.last.insert(root, device) != Some(device) {
            trace!(root = root.0, device = device.0, "active device changed");
        }
    }

    /// Record the device of `raw` unless processing found it stale.
    pub fn note_processed<K: Copy>(&mut self, raw: &RawPointerEvent, outcome: &ProcessOutcome<K>) {
        if !outcome.is_stale() {
            self.record(raw.root, raw.device);
        }
    }

    /// The device that most recently processed an event in `root`.
    pub fn last_device(&self, root: RootId) -> Option<DeviceId> {
        self.last.get(&root).copied()
    }

    /// The one device that should re-derive hover after `root` was repainted.
    pub fn scene_invalidated(&self, root: RootId) -> Option<DeviceId> {
        let device = self.last_device(root);
        trace!(root = root.0, ?device, "scene invalidated");
        device
    }

    /// Forget `device` everywhere, for example when it is disposed.
    pub fn remove_device(&mut self, device: DeviceId) {
        self.last.retain(|_, d| *d != device);
        debug!(device = device.0, "device removed from registry");
    }

    /// Forget `root`, for example when its window closes.
    pub fn remove_root(&mut self, root: RootId) {
        if self.last.remove(&root).is_some() {
            debug!(root = root.0, "root removed from registry");
        }
    }

    /// Whether no root has an active device.
    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::PointerDevice;
    use crate::hover::HoverTracker;
    use crate::testing::{CANVAS, DECORATOR, Node, TestRoot, WINDOW, mouse_info, raw};
    use crate::types::RawEventKind;
    use kurbo::Rect;

    #[test]
    fn last_device_wins_per_root() {
        let mut reg = DeviceRegistry::new();
        reg.record(RootId(1), DeviceId(1));
        reg.record(RootId(2), DeviceId(2));
        reg.record(RootId(1), DeviceId(3));
        assert_eq!(reg.last_device(RootId(1)), Some(DeviceId(3)));
        assert_eq!(reg.last_device(RootId(2)), Some(DeviceId(2)));
        assert_eq!(reg.last_device(RootId(3)), None);
    }

    #[test]
    fn stale_outcomes_are_not_recorded() {
        let mut reg = DeviceRegistry::new();
        let event = raw(RawEventKind::Move, 0, 0.0, 0.0);
        reg.note_processed(&event, &ProcessOutcome::<Node>::Stale);
        assert!(reg.is_empty());

        reg.note_processed(&event, &ProcessOutcome::<Node>::NoTarget);
        assert_eq!(reg.last_device(WINDOW), Some(event.device));
    }

    #[test]
    fn removing_a_device_only_forgets_its_roots() {
        let mut reg = DeviceRegistry::new();
        reg.record(RootId(1), DeviceId(1));
        reg.record(RootId(2), DeviceId(2));
        reg.remove_device(DeviceId(1));
        assert_eq!(reg.last_device(RootId(1)), None);
        assert_eq!(reg.last_device(RootId(2)), Some(DeviceId(2)));

        reg.remove_root(RootId(2));
        assert!(reg.is_empty());
    }

    #[test]
    fn only_the_active_device_rederives_hover() {
        let mut root = TestRoot::window();
        let mut hover = HoverTracker::new();
        let mut reg = DeviceRegistry::new();
        let mut mouse = PointerDevice::<Node>::mouse(DeviceId(1), mouse_info().id);

        root.hit = Some(CANVAS);
        let event = raw(RawEventKind::Move, 0, 5.0, 5.0);
        let outcome = mouse.process(&mut root, &mut hover, &event);
        reg.note_processed(&event, &outcome);

        root.hit = Some(DECORATOR);
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        if reg.scene_invalidated(WINDOW) == Some(mouse.id()) {
            mouse.scene_invalidated(&mut root, &mut hover, rect);
        }
        assert_eq!(hover.over(mouse_info().id), Some(DECORATOR));
    }
}
