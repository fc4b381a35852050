//! # Button Mask Module
//!
//! Packs the active-low button lines into the report's button byte.
//!
//! | Bit | Button |
//! |-----|--------|
//! | 0 | Joystick (stick click) |
//! | 1 | Auxiliary 1 |
//! | 2 | Auxiliary 2 |
//! | 3 | Auxiliary 3 |
//! | 4 | Auxiliary 4 |
//! | 5-7 | unused, always 0 |
//!
//! No debouncing or edge detection happens here; the host driver handles it.

use crate::input::DigitalLine;

/// Number of physical buttons.
pub const BUTTON_COUNT: usize = 5;

/// Physical buttons in bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Joystick,
    Aux1,
    Aux2,
    Aux3,
    Aux4,
}

impl Button {
    /// All buttons, in bit order.
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::Joystick,
        Button::Aux1,
        Button::Aux2,
        Button::Aux3,
        Button::Aux4,
    ];

    /// Bit position in the mask.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Button::Joystick => 0,
            Button::Aux1 => 1,
            Button::Aux2 => 2,
            Button::Aux3 => 3,
            Button::Aux4 => 4,
        }
    }

    /// Input line the button is wired to.
    #[must_use]
    pub const fn line(self) -> DigitalLine {
        match self {
            Button::Joystick => DigitalLine::JoystickButton,
            Button::Aux1 => DigitalLine::Aux1,
            Button::Aux2 => DigitalLine::Aux2,
            Button::Aux3 => DigitalLine::Aux3,
            Button::Aux4 => DigitalLine::Aux4,
        }
    }
}

/// Bitmask of pressed buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ButtonMask(u8);

impl ButtonMask {
    /// Mask with no buttons pressed.
    pub const EMPTY: ButtonMask = ButtonMask(0);

    /// Builds a mask from raw line levels, given in [`Button::ALL`] order.
    ///
    /// Lines are pulled high, so a low level (`false`) is a press.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamepad_bridge::joystick::buttons::ButtonMask;
    ///
    /// // Only auxiliary button 3 held down
    /// let mask = ButtonMask::assemble([true, true, true, false, true]);
    /// assert_eq!(mask.bits(), 0b0000_1000);
    ///
    /// let mask = ButtonMask::assemble([true; 5]);
    /// assert_eq!(mask.bits(), 0);
    /// ```
    #[must_use]
    pub fn assemble(levels: [bool; BUTTON_COUNT]) -> Self {
        let bits = Button::ALL
            .iter()
            .zip(levels)
            .filter(|(_, level)| !level)
            .fold(0u8, |bits, (button, _)| bits | (1 << button.bit()));
        ButtonMask(bits)
    }

    /// Reinterprets a raw report byte. Bits 5-7 are discarded.
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        ButtonMask(bits & Self::valid_bits())
    }

    /// Raw byte for the report.
    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if the given button is pressed.
    #[must_use]
    pub fn is_pressed(self, button: Button) -> bool {
        self.0 & (1 << button.bit()) != 0
    }

    /// Returns true if any button is pressed.
    #[must_use]
    pub fn any_pressed(self) -> bool {
        self.0 != 0
    }

    fn valid_bits() -> u8 {
        Button::ALL.iter().fold(0, |bits, b| bits | (1 << b.bit()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASED: [bool; BUTTON_COUNT] = [true; BUTTON_COUNT];

    fn press(buttons: &[Button]) -> [bool; BUTTON_COUNT] {
        let mut levels = RELEASED;
        for button in buttons {
            levels[button.bit() as usize] = false;
        }
        levels
    }

    #[test]
    fn test_all_released_is_empty() {
        let mask = ButtonMask::assemble(RELEASED);
        assert_eq!(mask, ButtonMask::EMPTY);
        assert!(!mask.any_pressed());
    }

    #[test]
    fn test_only_aux3_pressed() {
        let mask = ButtonMask::assemble(press(&[Button::Aux3]));
        assert_eq!(mask.bits(), 0b0000_1000);
        assert!(mask.is_pressed(Button::Aux3));
        assert!(!mask.is_pressed(Button::Aux2));
    }

    #[test]
    fn test_joystick_button_is_bit_zero() {
        let mask = ButtonMask::assemble(press(&[Button::Joystick]));
        assert_eq!(mask.bits(), 0b0000_0001);
    }

    #[test]
    fn test_each_button_sets_its_own_bit() {
        for button in Button::ALL {
            let mask = ButtonMask::assemble(press(&[button]));
            assert_eq!(mask.bits(), 1 << button.bit(), "{:?}", button);
        }
    }

    #[test]
    fn test_all_pressed_leaves_high_bits_clear() {
        let mask = ButtonMask::assemble([false; BUTTON_COUNT]);
        assert_eq!(mask.bits(), 0b0001_1111);
        assert_eq!(mask.bits() & 0b1110_0000, 0);
    }

    #[test]
    fn test_combination() {
        let mask = ButtonMask::assemble(press(&[Button::Joystick, Button::Aux4]));
        assert_eq!(mask.bits(), 0b0001_0001);
    }

    #[test]
    fn test_from_bits_masks_unused() {
        assert_eq!(ButtonMask::from_bits(0xFF).bits(), 0b0001_1111);
        assert_eq!(ButtonMask::from_bits(0b0000_0100).bits(), 0b0000_0100);
    }

    #[test]
    fn test_button_lines_are_distinct() {
        let lines: std::collections::HashSet<_> = Button::ALL.iter().map(|b| b.line()).collect();
        assert_eq!(lines.len(), BUTTON_COUNT);
        assert!(!lines.contains(&DigitalLine::Handedness));
    }
}
