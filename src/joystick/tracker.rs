//! # Axis Tracker Module
//!
//! Self-calibrating tracking and mapping for one potentiometer axis.
//!
//! ## Auto-calibration
//!
//! Every raw sample is compared against the known end-of-travel bounds. A
//! sample past either bound becomes the new bound. Bounds only ever widen,
//! so after the stick has been swept once the full output range is reachable.
//! Bounds start from a factory estimate rather than `0..=1023` so a fresh
//! device does not report wild values before it has been moved.
//!
//! ## Mapping
//!
//! The current sample is scaled linearly from `[min, max]` onto `-128..=127`:
//!
//! `mapped = OUTPUT_RANGE * (cur - min) / (max - min) + OUTPUT_MIN`
//!
//! evaluated in `f32` and truncated toward zero. Values inside the deadzone
//! band are then forced to exactly 0.
//!
//! ## Usage
//!
//! ```
//! use gamepad_bridge::joystick::tracker::{AxisTracker, Deadzone};
//!
//! let mut axis = AxisTracker::new(190, 810);
//! let deadzone = Deadzone::default();
//!
//! // Stick resting at center
//! axis.update(500);
//! assert_eq!(axis.remap(&deadzone), 0);
//!
//! // Stick pushed past the factory estimate widens the bounds
//! axis.update(900);
//! assert_eq!(axis.max(), 900);
//! assert_eq!(axis.remap(&deadzone), 127);
//! ```

use tracing::warn;

/// Highest raw sample of the 10-bit ADC.
pub const ADC_MAX: u16 = 1023;

/// Width of the signed output range (`127 - (-128)`).
pub const OUTPUT_RANGE: i16 = 255;

/// Lowest mapped output value.
pub const OUTPUT_MIN: i16 = -128;

/// Highest mapped output value.
pub const OUTPUT_MAX: i16 = 127;

/// Neutral (centered) output value.
pub const NEUTRAL: i8 = 0;

/// Lower edge of the center deadzone (inclusive).
pub const DEADZONE_FLOOR: i16 = -15;

/// Upper edge of the center deadzone (inclusive).
pub const DEADZONE_CEIL: i16 = 15;

/// Factory bounds estimate for the horizontal and vertical stick axes.
pub const STICK_DEFAULT_BOUNDS: (u16, u16) = (190, 810);

/// Factory bounds estimate for the rotation (twist) axis.
pub const ROTATION_DEFAULT_BOUNDS: (u16, u16) = (50, 950);

/// Symmetric band around neutral that is snapped to exactly 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadzone {
    floor: i16,
    ceil: i16,
}

impl Default for Deadzone {
    fn default() -> Self {
        Self {
            floor: DEADZONE_FLOOR,
            ceil: DEADZONE_CEIL,
        }
    }
}

impl Deadzone {
    /// Creates a deadzone covering `floor..=ceil`.
    ///
    /// `floor` is clamped to `OUTPUT_MIN..=0` and `ceil` to `0..=OUTPUT_MAX`,
    /// so the band always contains neutral.
    #[must_use]
    pub fn new(floor: i16, ceil: i16) -> Self {
        Self {
            floor: floor.clamp(OUTPUT_MIN, 0),
            ceil: ceil.clamp(0, OUTPUT_MAX),
        }
    }

    /// Lower edge of the band.
    #[must_use]
    pub fn floor(&self) -> i16 {
        self.floor
    }

    /// Upper edge of the band.
    #[must_use]
    pub fn ceil(&self) -> i16 {
        self.ceil
    }

    /// Snaps a mapped value inside the band to neutral.
    #[inline]
    #[must_use]
    pub fn apply(&self, mapped: i16) -> i16 {
        if mapped >= self.floor && mapped <= self.ceil {
            i16::from(NEUTRAL)
        } else {
            mapped
        }
    }
}

/// Maps a raw sample onto the signed output range, before the deadzone.
///
/// Returns `None` when the bounds do not span any travel (`max <= min`),
/// in which case the mapping is undefined.
///
/// The multiplication happens before the division so both endpoints land
/// exactly on `OUTPUT_MIN` and `OUTPUT_MAX`. The final narrowing truncates
/// toward zero: `-102.5` becomes `-102`, `-0.5` becomes `0`.
///
/// # Examples
///
/// ```
/// use gamepad_bridge::joystick::tracker::map_to_output;
///
/// assert_eq!(map_to_output(50, 50, 950), Some(-128));
/// assert_eq!(map_to_output(950, 50, 950), Some(127));
/// assert_eq!(map_to_output(500, 190, 810), Some(0));
/// assert_eq!(map_to_output(500, 500, 500), None);
/// ```
#[must_use]
pub fn map_to_output(cur: u16, min: u16, max: u16) -> Option<i16> {
    if max <= min {
        return None;
    }

    let span = f32::from(max - min);
    let offset = f32::from(cur) - f32::from(min);
    let mapped = f32::from(OUTPUT_RANGE) * offset / span + f32::from(OUTPUT_MIN);

    // Float-to-int `as` truncates toward zero and saturates
    Some(mapped as i16)
}

/// Narrows a mapped value into an `i8`, clamping anything out of range.
///
/// An out-of-range value means the bounds tracking upstream is broken; it is
/// logged and clamped instead of wrapping around.
#[must_use]
pub fn clamp_to_output(mapped: i16) -> i8 {
    if !(OUTPUT_MIN..=OUTPUT_MAX).contains(&mapped) {
        warn!(
            "Mapped axis value {} outside {}..={}, clamping",
            mapped, OUTPUT_MIN, OUTPUT_MAX
        );
    }
    // Lossless after the clamp
    mapped.clamp(OUTPUT_MIN, OUTPUT_MAX) as i8
}

/// Running calibration and output for one analog axis.
///
/// Holds the widest bounds seen so far, the current raw sample and the last
/// mapped output.
///
/// # Invariants
///
/// - `min <= cur <= max` after every [`AxisTracker::update`]
/// - `min` never increases and `max` never decreases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisTracker {
    min: u16,
    max: u16,
    cur: u16,
    mapped: i8,
}

impl AxisTracker {
    /// Creates a tracker starting from the given bounds estimate.
    ///
    /// The bounds are reordered if given backwards. The current sample starts
    /// at the midpoint and the output at neutral.
    #[must_use]
    pub fn new(min: u16, max: u16) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            cur: min + (max - min) / 2,
            mapped: NEUTRAL,
        }
    }

    /// Tracker for a horizontal or vertical stick axis with factory bounds.
    #[must_use]
    pub fn stick() -> Self {
        Self::new(STICK_DEFAULT_BOUNDS.0, STICK_DEFAULT_BOUNDS.1)
    }

    /// Tracker for the rotation axis with factory bounds.
    #[must_use]
    pub fn rotation() -> Self {
        Self::new(ROTATION_DEFAULT_BOUNDS.0, ROTATION_DEFAULT_BOUNDS.1)
    }

    /// Lowest raw sample seen (or the initial estimate).
    #[must_use]
    pub fn min(&self) -> u16 {
        self.min
    }

    /// Highest raw sample seen (or the initial estimate).
    #[must_use]
    pub fn max(&self) -> u16 {
        self.max
    }

    /// Current raw sample.
    #[must_use]
    pub fn cur(&self) -> u16 {
        self.cur
    }

    /// Output from the last [`AxisTracker::remap`].
    #[must_use]
    pub fn mapped(&self) -> i8 {
        self.mapped
    }

    /// Records a new raw sample, widening the bounds if it lies outside them.
    pub fn update(&mut self, sample: u16) {
        self.cur = sample;

        if sample > self.max {
            self.max = sample;
        } else if sample < self.min {
            self.min = sample;
        }
    }

    /// Replaces the current sample with its mirror image inside the bounds.
    ///
    /// Must run after [`AxisTracker::update`] for the same sample so the
    /// mirror uses bounds that already contain it.
    pub fn reflect(&mut self) {
        self.cur = reflect(self.cur, self.min, self.max);
    }

    /// Computes the deadzone-filtered output for the current sample.
    ///
    /// Degenerate bounds (`min == max`) give [`NEUTRAL`].
    #[must_use]
    pub fn mapped_value(&self, deadzone: &Deadzone) -> i8 {
        match map_to_output(self.cur, self.min, self.max) {
            Some(mapped) => clamp_to_output(deadzone.apply(mapped)),
            None => NEUTRAL,
        }
    }

    /// Recomputes and stores the output for the current sample.
    pub fn remap(&mut self, deadzone: &Deadzone) -> i8 {
        self.mapped = self.mapped_value(deadzone);
        self.mapped
    }
}

/// Mirrors a raw sample around the given bounds: `(max - sample) + min`.
///
/// `sample` is expected to lie within `min..=max`; anything else saturates
/// into the `u16` range rather than wrapping.
///
/// # Examples
///
/// ```
/// use gamepad_bridge::joystick::tracker::reflect;
///
/// assert_eq!(reflect(190, 190, 810), 810);
/// assert_eq!(reflect(300, 190, 810), 700);
/// assert_eq!(reflect(reflect(300, 190, 810), 190, 810), 300);
/// ```
#[must_use]
pub fn reflect(sample: u16, min: u16, max: u16) -> u16 {
    let mirrored = i32::from(max) - i32::from(sample) + i32::from(min);
    // Lossless after the clamp
    mirrored.clamp(0, i32::from(u16::MAX)) as u16
}
