//! # Report Encoder
//!
//! Packs a [`Report`] into its 4-byte wire frame and back.

use super::protocol::*;
use crate::joystick::buttons::ButtonMask;

/// Encode a report into a frame
///
/// Byte order: horizontal, vertical, rotation, buttons. Axis values are
/// reinterpreted as two's-complement bytes with no clamping.
///
/// # Examples
///
/// ```
/// use gamepad_bridge::report::encoder::encode_report;
/// use gamepad_bridge::report::protocol::Report;
///
/// let report = Report { horizontal: 0, vertical: -1, rotation: 127, ..Report::NEUTRAL };
/// assert_eq!(encode_report(&report), [0x00, 0xFF, 0x7F, 0x00]);
/// ```
#[must_use]
pub fn encode_report(report: &Report) -> ReportFrame {
    let mut frame = [0u8; REPORT_LEN];
    frame[REPORT_OFFSET_HORIZONTAL] = report.horizontal as u8;
    frame[REPORT_OFFSET_VERTICAL] = report.vertical as u8;
    frame[REPORT_OFFSET_ROTATION] = report.rotation as u8;
    frame[REPORT_OFFSET_BUTTONS] = report.buttons.bits();
    frame
}

/// Decode a frame back into a report
///
/// Unused button bits are dropped.
#[must_use]
pub fn decode_report(frame: &ReportFrame) -> Report {
    Report {
        horizontal: frame[REPORT_OFFSET_HORIZONTAL] as i8,
        vertical: frame[REPORT_OFFSET_VERTICAL] as i8,
        rotation: frame[REPORT_OFFSET_ROTATION] as i8,
        buttons: ButtonMask::from_bits(frame[REPORT_OFFSET_BUTTONS]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_report_is_all_zero() {
        assert_eq!(encode_report(&Report::NEUTRAL), [0, 0, 0, 0]);
    }

    #[test]
    fn test_byte_order() {
        let report = Report {
            horizontal: 1,
            vertical: 2,
            rotation: 3,
            buttons: ButtonMask::from_bits(0b0000_0100),
        };
        assert_eq!(encode_report(&report), [1, 2, 3, 4]);
    }

    #[test]
    fn test_axis_extremes() {
        let report = Report {
            horizontal: -128,
            vertical: 127,
            rotation: -16,
            buttons: ButtonMask::EMPTY,
        };
        assert_eq!(encode_report(&report), [0x80, 0x7F, 0xF0, 0x00]);
    }

    #[test]
    fn test_decode_sign_extends_axes() {
        let report = decode_report(&[0x80, 0x7F, 0xFF, 0b0001_0001]);
        assert_eq!(report.horizontal, -128);
        assert_eq!(report.vertical, 127);
        assert_eq!(report.rotation, -1);
        assert_eq!(report.buttons.bits(), 0b0001_0001);
    }

    #[test]
    fn test_decode_drops_unused_button_bits() {
        let report = decode_report(&[0, 0, 0, 0xE1]);
        assert_eq!(report.buttons.bits(), 0x01);
    }
}
