//! # Report Slot
//!
//! Lock-free hand-off of the latest report from the acquisition loop to the
//! host link.
//!
//! The 4-byte frame is stored as a single `AtomicU32`. Publishing replaces the
//! whole word, so a reader always sees one complete frame from one cycle,
//! never axis bytes from one cycle mixed with buttons from the next.
//!
//! # Thread Safety
//!
//! One writer (the acquisition loop), any number of readers. `publish` uses
//! `Release` and reads use `Acquire`.

use std::sync::atomic::{AtomicU32, Ordering};

use super::encoder::{decode_report, encode_report};
use super::protocol::{Report, ReportFrame};

/// Latest published report.
#[derive(Debug)]
pub struct ReportSlot {
    word: AtomicU32,
}

impl Default for ReportSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSlot {
    /// Creates a slot holding the neutral report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            // Neutral report encodes to all zero bytes
            word: AtomicU32::new(0),
        }
    }

    /// Replaces the current report.
    pub fn publish(&self, report: &Report) {
        let word = u32::from_le_bytes(encode_report(report));
        self.word.store(word, Ordering::Release);
    }

    /// Encoded frame of the current report.
    #[must_use]
    pub fn latest_frame(&self) -> ReportFrame {
        self.word.load(Ordering::Acquire).to_le_bytes()
    }

    /// Current report.
    #[must_use]
    pub fn latest(&self) -> Report {
        decode_report(&self.latest_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joystick::buttons::ButtonMask;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_slot_is_neutral() {
        let slot = ReportSlot::new();
        assert_eq!(slot.latest(), Report::NEUTRAL);
        assert_eq!(slot.latest_frame(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_publish_replaces_report() {
        let slot = ReportSlot::new();
        let report = Report {
            horizontal: -40,
            vertical: 90,
            rotation: 127,
            buttons: ButtonMask::from_bits(0b0000_1000),
        };

        slot.publish(&report);

        assert_eq!(slot.latest(), report);
        assert_eq!(slot.latest_frame(), [0xD8, 0x5A, 0x7F, 0x08]);
    }

    #[test]
    fn test_readers_never_see_mixed_frames() {
        // The writer alternates between two reports whose every byte differs;
        // any frame combining bytes from both would be torn.
        let a = Report {
            horizontal: -128,
            vertical: -128,
            rotation: -128,
            buttons: ButtonMask::EMPTY,
        };
        let b = Report {
            horizontal: 127,
            vertical: 127,
            rotation: 127,
            buttons: ButtonMask::from_bits(0b0001_1111),
        };
        let frame_a = encode_report(&a);
        let frame_b = encode_report(&b);

        let slot = Arc::new(ReportSlot::new());
        slot.publish(&a);
        let done = Arc::new(AtomicBool::new(false));

        let reader = {
            let slot = Arc::clone(&slot);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut reads = 0u64;
                loop {
                    let frame = slot.latest_frame();
                    assert!(frame == frame_a || frame == frame_b, "torn frame {:?}", frame);
                    reads += 1;
                    if done.load(Ordering::Relaxed) {
                        break;
                    }
                }
                reads
            })
        };

        for i in 0..100_000 {
            slot.publish(if i % 2 == 0 { &b } else { &a });
        }
        done.store(true, Ordering::Relaxed);

        assert!(reader.join().unwrap() > 0);
    }
}
