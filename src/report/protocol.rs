//! # Report Protocol Definitions
//!
//! Layout of the gamepad report and the host poll constants.

use crate::joystick::buttons::ButtonMask;

/// Size of a report frame in bytes.
pub const REPORT_LEN: usize = 4;

/// Byte offset of the horizontal axis.
pub const REPORT_OFFSET_HORIZONTAL: usize = 0;

/// Byte offset of the vertical axis.
pub const REPORT_OFFSET_VERTICAL: usize = 1;

/// Byte offset of the rotation axis.
pub const REPORT_OFFSET_ROTATION: usize = 2;

/// Byte offset of the button mask.
pub const REPORT_OFFSET_BUTTONS: usize = 3;

/// Control endpoint number. Requests on it are NACKed.
pub const CONTROL_ENDPOINT: u8 = 0;

/// USB NAK handshake PID, sent in place of data for control requests.
pub const NAK_PID: u8 = 0x5A;

/// Encoded report as sent to the host.
pub type ReportFrame = [u8; REPORT_LEN];

/// One gamepad report: three signed axes and the button mask.
///
/// Built once per acquisition cycle and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Report {
    pub horizontal: i8,
    pub vertical: i8,
    pub rotation: i8,
    pub buttons: ButtonMask,
}

impl Report {
    /// The report before any sample has been processed: centered, no buttons.
    pub const NEUTRAL: Report = Report {
        horizontal: 0,
        vertical: 0,
        rotation: 0,
        buttons: ButtonMask::EMPTY,
    };
}
