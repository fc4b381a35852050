//! # Joystick Module
//!
//! Pure processing of one joystick sample: axis calibration and mapping,
//! handedness mirroring and button mask assembly.
//!
//! This module handles:
//! - Tracking end-of-travel bounds per axis (auto-calibration)
//! - Mapping raw 10-bit samples to signed 8-bit outputs with a deadzone
//! - Mirroring horizontal/vertical for right-handed use
//! - Packing active-low buttons into a bitmask

pub mod buttons;
pub mod handedness;
pub mod tracker;
