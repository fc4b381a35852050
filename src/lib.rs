//! # Gamepad Bridge Library
//!
//! Turns raw potentiometer and button readings into a 4-byte gamepad report.
//!
//! Three analog axes (horizontal, vertical, rotation) are tracked by
//! self-calibrating [`joystick::tracker::AxisTracker`]s that learn their end of
//! travel on first use. The acquisition loop maps each axis to `-128..=127`,
//! applies a center deadzone, optionally mirrors the stick for right-handed
//! use, packs five active-low buttons into a bitmask and publishes the frame
//! atomically for the host link to pick up.

pub mod acquisition;
pub mod config;
pub mod error;
pub mod input;
pub mod joystick;
pub mod report;
pub mod transport;
