//! # Acquisition Module
//!
//! The fixed-cadence loop that turns raw samples into published reports.
//!
//! ## Cycle
//!
//! Every tick (20 ms by default, 50 Hz) [`Joystick::step`] runs these stages
//! in this exact order:
//!
//! 1. Latch the source, read the button lines and the handedness switch
//! 2. Read the analog channels
//! 3. Update each axis tracker's bounds and current sample
//! 4. Mirror horizontal/vertical if right-handed
//! 5. Map every axis to `-128..=127` and apply the deadzone
//! 6. Assemble the button mask
//! 7. Publish the new report
//!
//! Stage 4 must follow stage 3: the mirror is taken around bounds that
//! already include this cycle's sample. Swapping them changes the output
//! whenever a sample widens the bounds.

use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::config::Config;
use crate::input::{AnalogChannel, DigitalLine, SampleSource};
use crate::joystick::buttons::{Button, ButtonMask};
use crate::joystick::handedness::Handedness;
use crate::joystick::tracker::{AxisTracker, Deadzone};
use crate::report::protocol::Report;
use crate::report::slot::ReportSlot;

/// Default time between acquisition cycles (50 Hz).
pub const POLL_INTERVAL_MS: u64 = 20;

/// Default number of cycles between status log messages (10 s at 50 Hz).
pub const LOG_INTERVAL_CYCLES: u64 = 500;

/// Complete joystick state carried from one cycle to the next.
#[derive(Debug, Clone)]
pub struct Joystick {
    horizontal: AxisTracker,
    vertical: AxisTracker,
    rotation: AxisTracker,
    buttons: ButtonMask,
    handedness: Handedness,
    deadzone: Deadzone,
}

impl Default for Joystick {
    /// Factory bounds and the default deadzone.
    fn default() -> Self {
        Self::new(
            AxisTracker::stick(),
            AxisTracker::stick(),
            AxisTracker::rotation(),
            Deadzone::default(),
        )
    }
}

impl Joystick {
    /// Creates a joystick from its three trackers and a deadzone.
    #[must_use]
    pub fn new(
        horizontal: AxisTracker,
        vertical: AxisTracker,
        rotation: AxisTracker,
        deadzone: Deadzone,
    ) -> Self {
        Self {
            horizontal,
            vertical,
            rotation,
            buttons: ButtonMask::EMPTY,
            handedness: Handedness::default(),
            deadzone,
        }
    }

    /// Creates a joystick with the configured initial bounds and deadzone.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.axes.horizontal.tracker(),
            config.axes.vertical.tracker(),
            config.axes.rotation.tracker(),
            config.mapping.deadzone(),
        )
    }

    /// Horizontal stick tracker.
    #[must_use]
    pub fn horizontal(&self) -> &AxisTracker {
        &self.horizontal
    }

    /// Vertical stick tracker.
    #[must_use]
    pub fn vertical(&self) -> &AxisTracker {
        &self.vertical
    }

    /// Rotation tracker.
    #[must_use]
    pub fn rotation(&self) -> &AxisTracker {
        &self.rotation
    }

    /// Handedness seen on the last cycle.
    #[must_use]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Report built from the last cycle.
    #[must_use]
    pub fn report(&self) -> Report {
        Report {
            horizontal: self.horizontal.mapped(),
            vertical: self.vertical.mapped(),
            rotation: self.rotation.mapped(),
            buttons: self.buttons,
        }
    }

    /// Runs one acquisition cycle against `source` and returns the new report.
    ///
    /// See the module docs for the stage order.
    pub fn step<S: SampleSource + ?Sized>(&mut self, source: &mut S) -> Report {
        source.latch();

        let levels = Button::ALL.map(|button| source.read_digital(button.line()));
        let handedness =
            Handedness::from_switch_level(source.read_digital(DigitalLine::Handedness));

        let rotation = source.read_analog(AnalogChannel::Rotation);
        let horizontal = source.read_analog(AnalogChannel::Horizontal);
        let vertical = source.read_analog(AnalogChannel::Vertical);

        track("rotation", &mut self.rotation, rotation);
        track("horizontal", &mut self.horizontal, horizontal);
        track("vertical", &mut self.vertical, vertical);

        if handedness != self.handedness {
            info!("Handedness switched to {:?}", handedness);
            self.handedness = handedness;
        }
        handedness.apply(&mut self.horizontal, &mut self.vertical);

        self.rotation.remap(&self.deadzone);
        self.horizontal.remap(&self.deadzone);
        self.vertical.remap(&self.deadzone);

        self.buttons = ButtonMask::assemble(levels);

        let report = self.report();
        trace!(
            "Report h={} v={} r={} buttons={:#010b}",
            report.horizontal,
            report.vertical,
            report.rotation,
            report.buttons.bits()
        );
        report
    }
}

/// Feeds one sample to a tracker, logging when its bounds widen.
fn track(name: &str, axis: &mut AxisTracker, sample: u16) {
    let before = (axis.min(), axis.max());
    axis.update(sample);
    let after = (axis.min(), axis.max());

    if before != after {
        debug!(
            "{} bounds widened [{}, {}] -> [{}, {}]",
            name, before.0, before.1, after.0, after.1
        );
    }
}

/// Runs the acquisition loop forever, publishing a report every `period`.
///
/// Logs a status line every `log_interval_cycles` cycles.
pub async fn run_acquisition<S: SampleSource + ?Sized>(
    joystick: &mut Joystick,
    source: &mut S,
    slot: &ReportSlot,
    period: Duration,
    log_interval_cycles: u64,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Starting acquisition loop every {:?}", period);

    let mut cycles: u64 = 0;

    loop {
        ticker.tick().await;

        let report = joystick.step(source);
        slot.publish(&report);
        cycles += 1;

        if log_interval_cycles > 0 && cycles % log_interval_cycles == 0 {
            info!(
                "{} cycles, {:?}, bounds h=[{}, {}] v=[{}, {}] r=[{}, {}]",
                cycles,
                joystick.handedness(),
                joystick.horizontal().min(),
                joystick.horizontal().max(),
                joystick.vertical().min(),
                joystick.vertical().max(),
                joystick.rotation().min(),
                joystick.rotation().max()
            );
        }
    }
}
