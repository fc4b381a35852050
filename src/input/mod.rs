//! # Input Module
//!
//! Raw sample acquisition.
//!
//! The joystick core reads its inputs through [`SampleSource`], an on-demand
//! view of the digital and analog lines with no buffering. On the device this
//! is GPIO and ADC reads; here the lines come from a serial bench feed (see
//! [`feed`]) published through a `tokio::sync::watch` channel.
//!
//! ## Lines
//!
//! | Line | Kind | Idle level |
//! |------|------|------------|
//! | Handedness switch | digital | high (left-handed) |
//! | Joystick button | digital | high (released) |
//! | Auxiliary 1-4 | digital | high (released) |
//! | Horizontal | analog | - |
//! | Vertical | analog | - |
//! | Rotation | analog | - |

use tokio::sync::watch;

pub mod feed;

/// Number of digital lines.
pub const DIGITAL_LINE_COUNT: usize = 6;

/// Number of analog channels.
pub const ANALOG_CHANNEL_COUNT: usize = 3;

/// Raw value reported for an analog channel before any sample arrives.
pub const ANALOG_IDLE: u16 = 512;

/// Digital input lines, all pulled high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigitalLine {
    /// Left/right-handed mode switch
    Handedness,
    /// Stick click
    JoystickButton,
    Aux1,
    Aux2,
    Aux3,
    Aux4,
}

impl DigitalLine {
    /// Position of the line in a [`SampleFrame`] and on a feed line.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            DigitalLine::Handedness => 0,
            DigitalLine::JoystickButton => 1,
            DigitalLine::Aux1 => 2,
            DigitalLine::Aux2 => 3,
            DigitalLine::Aux3 => 4,
            DigitalLine::Aux4 => 5,
        }
    }
}

/// Analog input channels (10-bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogChannel {
    Horizontal,
    Vertical,
    Rotation,
}

impl AnalogChannel {
    /// Position of the channel in a [`SampleFrame`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            AnalogChannel::Horizontal => 0,
            AnalogChannel::Vertical => 1,
            AnalogChannel::Rotation => 2,
        }
    }
}

/// Source of raw line readings.
///
/// Reads are on demand. [`SampleSource::latch`] is called once at the start of
/// every acquisition cycle so sources backed by a stream can pin one frame
/// for all reads of that cycle.
#[cfg_attr(test, mockall::automock)]
pub trait SampleSource {
    /// Marks the start of a cycle.
    fn latch(&mut self) {}

    /// Level of a digital line: `true` idle/open, `false` pressed/closed.
    fn read_digital(&mut self, line: DigitalLine) -> bool;

    /// Raw sample of an analog channel (`0..=1023`).
    fn read_analog(&mut self, channel: AnalogChannel) -> u16;
}

/// One instant of all input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFrame {
    pub digital: [bool; DIGITAL_LINE_COUNT],
    pub analog: [u16; ANALOG_CHANNEL_COUNT],
}

impl Default for SampleFrame {
    /// All lines idle: switch high, nothing pressed, axes mid-scale.
    fn default() -> Self {
        Self {
            digital: [true; DIGITAL_LINE_COUNT],
            analog: [ANALOG_IDLE; ANALOG_CHANNEL_COUNT],
        }
    }
}

impl SampleFrame {
    /// Level of a digital line in this frame.
    #[must_use]
    pub fn digital(&self, line: DigitalLine) -> bool {
        self.digital[line.index()]
    }

    /// Raw sample of an analog channel in this frame.
    #[must_use]
    pub fn analog(&self, channel: AnalogChannel) -> u16 {
        self.analog[channel.index()]
    }
}

/// Sample source reading the newest frame from a watch channel.
///
/// The frame is copied on [`SampleSource::latch`], so a frame arriving in the
/// middle of a cycle is only seen on the next one.
#[derive(Debug)]
pub struct WatchSampleSource {
    rx: watch::Receiver<SampleFrame>,
    current: SampleFrame,
}

impl WatchSampleSource {
    /// Creates a source that follows `rx`.
    #[must_use]
    pub fn new(rx: watch::Receiver<SampleFrame>) -> Self {
        let current = *rx.borrow();
        Self { rx, current }
    }

    /// Frame pinned by the last latch.
    #[must_use]
    pub fn current(&self) -> &SampleFrame {
        &self.current
    }
}

impl SampleSource for WatchSampleSource {
    fn latch(&mut self) {
        self.current = *self.rx.borrow_and_update();
    }

    fn read_digital(&mut self, line: DigitalLine) -> bool {
        self.current.digital(line)
    }

    fn read_analog(&mut self, channel: AnalogChannel) -> u16 {
        self.current.analog(channel)
    }
}
