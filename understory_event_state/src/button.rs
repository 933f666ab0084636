// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer buttons and the set of buttons currently held.

/// A physical pointer button.
///
/// The set is fixed: the primary three buttons plus the two "extra" buttons
/// found on most mice (usually mapped to back/forward).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button (usually left).
    Left,
    /// Middle button or wheel press.
    Middle,
    /// Secondary button (usually right).
    Right,
    /// First extra button.
    X1,
    /// Second extra button.
    X2,
}

impl PointerButton {
    /// Every button, in declaration order.
    pub const ALL: [Self; 5] = [Self::Left, Self::Middle, Self::Right, Self::X1, Self::X2];

    /// The flag for this button in a [`PointerButtons`] set.
    pub const fn flag(self) -> PointerButtons {
        match self {
            Self::Left => PointerButtons::LEFT,
            Self::Middle => PointerButtons::MIDDLE,
            Self::Right => PointerButtons::RIGHT,
            Self::X1 => PointerButtons::X1,
            Self::X2 => PointerButtons::X2,
        }
    }
}

bitflags::bitflags! {
    /// Buttons held down on a pointer.
    ///
    /// Platforms report this set as it stands *after* the transition the raw
    /// event describes, so a single fresh press has exactly one bit set and the
    /// release of the last held button has none.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// Primary button.
        const LEFT   = 0b0000_0001;
        /// Middle button.
        const MIDDLE = 0b0000_0010;
        /// Secondary button.
        const RIGHT  = 0b0000_0100;
        /// First extra button.
        const X1     = 0b0000_1000;
        /// Second extra button.
        const X2     = 0b0001_0000;
    }
}

impl PointerButtons {
    /// Number of buttons held.
    ///
    /// More than one means the pointer is in a chord.
    pub const fn count(self) -> u32 {
        self.bits().count_ones()
    }

    /// Whether `button` is held.
    pub const fn is_pressed(self, button: PointerButton) -> bool {
        self.contains(button.flag())
    }

    /// Iterate the held buttons in [`PointerButton::ALL`] order.
    pub fn pressed(self) -> impl Iterator<Item = PointerButton> {
        PointerButton::ALL
            .into_iter()
            .filter(move |b| self.is_pressed(*b))
    }
}

impl From<PointerButton> for PointerButtons {
    fn from(button: PointerButton) -> Self {
        button.flag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_tracks_held_buttons() {
        assert_eq!(PointerButtons::empty().count(), 0);
        assert_eq!(PointerButtons::LEFT.count(), 1);
        assert_eq!((PointerButtons::LEFT | PointerButtons::RIGHT).count(), 2);
        assert_eq!(PointerButtons::all().count(), 5);
    }

    #[test]
    fn every_button_has_a_distinct_flag() {
        let mut seen = PointerButtons::empty();
        for b in PointerButton::ALL {
            assert!(!seen.contains(b.flag()), "{b:?} shares a flag");
            seen |= b.into();
        }
        assert_eq!(seen, PointerButtons::all());
    }

    #[test]
    fn pressed_iterates_in_declaration_order() {
        let held = PointerButtons::X2 | PointerButtons::LEFT | PointerButtons::MIDDLE;
        let mut it = held.pressed();
        assert_eq!(it.next(), Some(PointerButton::Left));
        assert_eq!(it.next(), Some(PointerButton::Middle));
        assert_eq!(it.next(), Some(PointerButton::X2));
        assert_eq!(it.next(), None);
    }
}
