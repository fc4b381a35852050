//! # Report Module
//!
//! The 4-byte gamepad report delivered to the host.
//!
//! This module handles:
//! - Report layout (horizontal, vertical, rotation, button mask)
//! - Encoding to and decoding from the wire frame
//! - Atomic publication of the latest report

pub mod encoder;
pub mod protocol;
pub mod slot;
