//! # Bench Feed Module
//!
//! Reads raw samples streamed as text over a serial port.
//!
//! Each line carries one complete frame, fields separated by tabs or spaces:
//!
//! ```text
//! <handedness> <joystick> <aux1> <aux2> <aux3> <aux4> <horizontal> <vertical> <rotation>
//! ```
//!
//! Digital fields are line levels (`0` low, `1` high); analog fields are raw
//! 10-bit samples. Bad lines are logged and dropped, and the previous frame
//! stays current. Once the feed ends, for whatever reason, the idle frame
//! (buttons released, sticks centered) is published in place of the last one.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use super::{SampleFrame, ANALOG_CHANNEL_COUNT, DIGITAL_LINE_COUNT};
use crate::config::InputConfig;
use crate::error::{BridgeError, Result};
use crate::joystick::tracker::ADC_MAX;

/// Number of fields on a feed line.
pub const FIELDS_PER_LINE: usize = DIGITAL_LINE_COUNT + ANALOG_CHANNEL_COUNT;

/// Parses one feed line into a frame.
///
/// # Errors
///
/// Returns `SampleParse` if the field count is wrong, a digital field is not
/// `0`/`1`, or an analog field is not an integer in `0..=1023`.
///
/// # Examples
///
/// ```
/// use gamepad_bridge::input::feed::parse_sample_line;
/// use gamepad_bridge::input::{AnalogChannel, DigitalLine};
///
/// let frame = parse_sample_line("1\t1\t1\t1\t0\t1\t500\t510\t490").unwrap();
/// assert!(!frame.digital(DigitalLine::Aux3));
/// assert_eq!(frame.analog(AnalogChannel::Rotation), 490);
/// ```
pub fn parse_sample_line(line: &str) -> Result<SampleFrame> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != FIELDS_PER_LINE {
        return Err(BridgeError::SampleParse(format!(
            "expected {} fields, got {}",
            FIELDS_PER_LINE,
            fields.len()
        )));
    }

    let mut frame = SampleFrame::default();

    for (slot, field) in frame.digital.iter_mut().zip(&fields[..DIGITAL_LINE_COUNT]) {
        *slot = match *field {
            "0" => false,
            "1" => true,
            other => {
                return Err(BridgeError::SampleParse(format!(
                    "digital level must be 0 or 1, got '{}'",
                    other
                )))
            }
        };
    }

    for (slot, field) in frame.analog.iter_mut().zip(&fields[DIGITAL_LINE_COUNT..]) {
        let value: u16 = field.parse().map_err(|_| {
            BridgeError::SampleParse(format!("analog sample '{}' is not a number", field))
        })?;
        if value > ADC_MAX {
            return Err(BridgeError::SampleParse(format!(
                "analog sample {} exceeds {}",
                value, ADC_MAX
            )));
        }
        *slot = value;
    }

    Ok(frame)
}

/// Publishes every valid frame read from `reader` until end of stream.
///
/// Stops early once nobody is listening on `tx`. Returns the number of
/// frames published. On return the channel holds `SampleFrame::default()`.
///
/// # Errors
///
/// Returns `Io` if reading from the stream fails.
pub async fn feed_samples<R>(reader: R, tx: watch::Sender<SampleFrame>) -> Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let result = publish_lines(reader, &tx).await;

    // A dead feed must not hold the last deflection or button press
    tx.send_replace(SampleFrame::default());
    if let Err(e) = &result {
        warn!("Sample feed lost, input idled: {}", e);
    }

    result
}

async fn publish_lines<R>(reader: R, tx: &watch::Sender<SampleFrame>) -> Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut published: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_sample_line(line) {
            Ok(frame) => {
                if tx.send(frame).is_err() {
                    debug!("Sample consumer gone, stopping feed");
                    return Ok(published);
                }
                published += 1;
            }
            Err(e) => warn!("Dropping feed line: {}", e),
        }
    }

    info!("Sample feed ended after {} frames, input idled", published);
    Ok(published)
}

/// Opens the serial port carrying the bench feed (8N1, no flow control).
///
/// # Errors
///
/// Returns `Serial` if the port cannot be opened.
pub fn open_feed_port(config: &InputConfig) -> Result<tokio_serial::SerialStream> {
    let port = tokio_serial::new(&config.port, config.baud_rate)
        .data_bits(tokio_serial::DataBits::Eight)
        .parity(tokio_serial::Parity::None)
        .stop_bits(tokio_serial::StopBits::One)
        .flow_control(tokio_serial::FlowControl::None)
        .open_native_async()
        .map_err(|e| BridgeError::Serial(format!("Failed to open {}: {}", config.port, e)))?;

    info!("Opened sample feed at {} ({} baud)", config.port, config.baud_rate);
    Ok(port)
}
