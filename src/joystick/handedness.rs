//! # Handedness Module
//!
//! Left/right-handed operation of the stick.
//!
//! The device is built for left-handed use. In right-handed mode the
//! horizontal and vertical axes are mirrored around their known bounds so the
//! same physical stick reads correctly when the enclosure is turned around.
//! The rotation axis is never mirrored.
//!
//! The mode switch is read every cycle, so the mode can be flipped while the
//! device is running.

use super::tracker::AxisTracker;

/// Stick orientation selected by the mode switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handedness {
    /// Switch pulled low: horizontal and vertical are mirrored.
    RightHanded,
    /// Switch high (idle): samples pass through unchanged.
    #[default]
    LeftHanded,
}

impl Handedness {
    /// Decodes the mode switch line level.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamepad_bridge::joystick::handedness::Handedness;
    ///
    /// assert_eq!(Handedness::from_switch_level(false), Handedness::RightHanded);
    /// assert_eq!(Handedness::from_switch_level(true), Handedness::LeftHanded);
    /// ```
    #[must_use]
    pub fn from_switch_level(level: bool) -> Self {
        if level {
            Handedness::LeftHanded
        } else {
            Handedness::RightHanded
        }
    }

    /// Mirrors the horizontal and vertical samples when right-handed.
    ///
    /// Both trackers must already have been updated with this cycle's samples:
    /// the mirror is taken around the bounds including the current sample.
    /// Mapping happens afterwards.
    pub fn apply(self, horizontal: &mut AxisTracker, vertical: &mut AxisTracker) {
        if self == Handedness::RightHanded {
            horizontal.reflect();
            vertical.reflect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joystick::tracker::Deadzone;

    #[test]
    fn test_default_is_left_handed() {
        assert_eq!(Handedness::default(), Handedness::LeftHanded);
    }

    #[test]
    fn test_left_handed_passes_through() {
        let mut h = AxisTracker::new(190, 810);
        let mut v = AxisTracker::new(190, 810);
        h.update(300);
        v.update(700);

        Handedness::LeftHanded.apply(&mut h, &mut v);

        assert_eq!(h.cur(), 300);
        assert_eq!(v.cur(), 700);
    }

    #[test]
    fn test_right_handed_mirrors_both_axes() {
        let mut h = AxisTracker::new(190, 810);
        let mut v = AxisTracker::new(190, 810);
        h.update(300);
        v.update(700);

        Handedness::RightHanded.apply(&mut h, &mut v);

        assert_eq!(h.cur(), 700);
        assert_eq!(v.cur(), 300);
        // Bounds are untouched by the mirror
        assert_eq!((h.min(), h.max()), (190, 810));
    }

    #[test]
    fn test_right_handed_twice_restores_sample() {
        let mut h = AxisTracker::new(190, 810);
        let mut v = AxisTracker::new(190, 810);
        h.update(250);
        v.update(777);

        Handedness::RightHanded.apply(&mut h, &mut v);
        Handedness::RightHanded.apply(&mut h, &mut v);

        assert_eq!(h.cur(), 250);
        assert_eq!(v.cur(), 777);
    }

    #[test]
    fn test_right_handed_inverts_output_sign() {
        let dz = Deadzone::default();
        let mut h = AxisTracker::new(190, 810);
        let mut v = AxisTracker::new(190, 810);
        h.update(810);
        v.update(190);

        Handedness::RightHanded.apply(&mut h, &mut v);

        assert_eq!(h.remap(&dz), -128);
        assert_eq!(v.remap(&dz), 127);
    }

    #[test]
    fn test_mirror_uses_bounds_widened_by_current_sample() {
        let mut h = AxisTracker::new(190, 810);
        let mut v = AxisTracker::new(190, 810);
        // Past the factory max: the mirror lands on the factory min
        h.update(1000);
        v.update(500);

        Handedness::RightHanded.apply(&mut h, &mut v);

        assert_eq!(h.max(), 1000);
        assert_eq!(h.cur(), 190);
        assert_eq!(v.cur(), 500);
    }
}
