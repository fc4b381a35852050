//! # Host Link Module
//!
//! Answers host polls with the latest gamepad report.
//!
//! This module handles:
//! - Opening the host link serial port (auto-detecting the device if needed)
//! - Reading poll requests (one byte: the endpoint number)
//! - Replying with the current 4-byte report, or a NAK for control requests
//!
//! The link never waits on the acquisition loop. Each poll reads whatever
//! report is in the [`ReportSlot`] at that moment.

use bytes::Bytes;
use std::io;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, trace, warn};

use crate::config::TransportConfig;
use crate::error::{BridgeError, Result};
use crate::report::protocol::{ReportFrame, CONTROL_ENDPOINT, NAK_PID};
use crate::report::slot::ReportSlot;

pub mod port_trait;

use port_trait::{SerialPortIO, TokioSerialPort};

/// Device paths to try (in order of preference) when no port is configured
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyACM0", // USB CDC devices
    "/dev/ttyUSB0", // USB-to-serial adapters
];

/// Reply to one host poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InResponse {
    /// Current report for the gamepad endpoint.
    Data(ReportFrame),
    /// Control requests get nothing from the joystick.
    Nack,
}

impl InResponse {
    /// Bytes to put on the wire.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        match self {
            InResponse::Data(frame) => Bytes::copy_from_slice(frame),
            InResponse::Nack => Bytes::from_static(&[NAK_PID]),
        }
    }
}

/// Decides the reply to a poll on `endpoint`.
///
/// Any non-control endpoint receives the latest published report.
///
/// # Examples
///
/// ```
/// use gamepad_bridge::report::slot::ReportSlot;
/// use gamepad_bridge::transport::{handle_in_request, InResponse};
///
/// let slot = ReportSlot::new();
/// assert_eq!(handle_in_request(1, &slot), InResponse::Data([0, 0, 0, 0]));
/// assert_eq!(handle_in_request(0, &slot), InResponse::Nack);
/// ```
#[must_use]
pub fn handle_in_request(endpoint: u8, slot: &ReportSlot) -> InResponse {
    if endpoint == CONTROL_ENDPOINT {
        InResponse::Nack
    } else {
        InResponse::Data(slot.latest_frame())
    }
}

/// Serial link to the host.
pub struct HostLink<P: SerialPortIO = TokioSerialPort> {
    port: P,
    device_path: String,
}

impl<P: SerialPortIO> std::fmt::Debug for HostLink<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostLink")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl HostLink<TokioSerialPort> {
    /// Open the host link described by `config`
    ///
    /// An empty `port` auto-detects by trying common device paths.
    ///
    /// # Errors
    ///
    /// Returns error if no device could be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gamepad_bridge::config::TransportConfig;
    /// use gamepad_bridge::transport::HostLink;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let link = HostLink::open(&TransportConfig::default())?;
    ///     println!("Host link on {}", link.device_path());
    ///     Ok(())
    /// }
    /// ```
    pub fn open(config: &TransportConfig) -> Result<Self> {
        if config.port.is_empty() {
            Self::open_with_paths(DEFAULT_DEVICE_PATHS, config.baud_rate)
        } else {
            Self::open_with_paths(&[config.port.as_str()], config.baud_rate)
        }
    }

    /// Open the host link on the first device in `paths` that works
    ///
    /// # Errors
    ///
    /// Returns `SerialPortNotFound` listing every path tried
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Trying to open host link: {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(port) => {
                    info!("Host link opened at {}", path);
                    return Ok(Self::with_port(TokioSerialPort::new(port), path));
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(BridgeError::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port (8N1, no flow control)
    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| BridgeError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }
}

impl<P: SerialPortIO> HostLink<P> {
    /// Wraps an already open port.
    pub fn with_port(port: P, device_path: &str) -> Self {
        Self {
            port,
            device_path: device_path.to_string(),
        }
    }

    /// Path of the underlying device
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Answer a single poll
    ///
    /// # Errors
    ///
    /// Returns `Serial` if writing the reply fails
    pub async fn answer(&mut self, endpoint: u8, slot: &ReportSlot) -> Result<InResponse> {
        let response = handle_in_request(endpoint, slot);
        let bytes = response.to_bytes();

        self.port.write_all(&bytes).await
            .map_err(|e| BridgeError::Serial(format!("Failed to write reply: {}", e)))?;

        self.port.flush().await
            .map_err(|e| BridgeError::Serial(format!("Failed to flush host link: {}", e)))?;

        trace!("Endpoint {} -> {:?}", endpoint, response);
        Ok(response)
    }

    /// Answer polls until the host closes the link
    ///
    /// Returns the number of report frames sent (NAKs not counted).
    ///
    /// # Errors
    ///
    /// Returns `Serial` on any read or write failure other than end of stream
    pub async fn serve(&mut self, slot: &ReportSlot) -> Result<u64> {
        let mut frames_sent: u64 = 0;

        loop {
            let endpoint = match self.port.read_byte().await {
                Ok(byte) => byte,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    info!("Host link {} closed after {} reports", self.device_path, frames_sent);
                    return Ok(frames_sent);
                }
                Err(e) => {
                    return Err(BridgeError::Serial(format!("Failed to read poll: {}", e)));
                }
            };

            if let InResponse::Data(_) = self.answer(endpoint, slot).await? {
                frames_sent += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::port_trait::mocks::MockSerialPort;
    use super::*;
    use crate::joystick::buttons::ButtonMask;
    use crate::report::protocol::{Report, REPORT_LEN};

    fn sample_report() -> Report {
        Report {
            horizontal: 0,
            vertical: -128,
            rotation: 127,
            buttons: ButtonMask::from_bits(0b0000_1000),
        }
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_DEVICE_PATHS, &["/dev/ttyACM0", "/dev/ttyUSB0"]);
        assert_eq!(NAK_PID, 0x5A);
        assert_eq!(CONTROL_ENDPOINT, 0);
    }

    #[test]
    fn test_gamepad_endpoint_gets_latest_report() {
        let slot = ReportSlot::new();
        slot.publish(&sample_report());

        assert_eq!(
            handle_in_request(1, &slot),
            InResponse::Data([0x00, 0x80, 0x7F, 0x08])
        );
    }

    #[test]
    fn test_any_nonzero_endpoint_gets_report() {
        let slot = ReportSlot::new();
        for endpoint in [1u8, 2, 0x81, 0xFF] {
            assert!(matches!(handle_in_request(endpoint, &slot), InResponse::Data(_)));
        }
    }

    #[test]
    fn test_control_endpoint_is_nacked() {
        let slot = ReportSlot::new();
        slot.publish(&sample_report());
        assert_eq!(handle_in_request(CONTROL_ENDPOINT, &slot), InResponse::Nack);
    }

    #[test]
    fn test_response_bytes() {
        assert_eq!(InResponse::Nack.to_bytes().as_ref(), &[0x5A]);
        let data = InResponse::Data([1, 2, 3, 4]).to_bytes();
        assert_eq!(data.len(), REPORT_LEN);
        assert_eq!(data.as_ref(), &[1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_serve_answers_each_poll() {
        let port = MockSerialPort::with_requests(&[1, 0, 1]);
        let observer = port.clone();
        let slot = ReportSlot::new();
        slot.publish(&sample_report());

        let mut link = HostLink::with_port(port, "mock");
        let sent = link.serve(&slot).await.unwrap();

        assert_eq!(sent, 2);
        assert_eq!(
            observer.get_written_data(),
            vec![
                vec![0x00, 0x80, 0x7F, 0x08],
                vec![NAK_PID],
                vec![0x00, 0x80, 0x7F, 0x08],
            ]
        );
    }

    #[tokio::test]
    async fn test_serve_sees_newly_published_report() {
        let port = MockSerialPort::with_requests(&[1]);
        let observer = port.clone();
        let slot = ReportSlot::new();
        let mut link = HostLink::with_port(port, "mock");

        link.answer(1, &slot).await.unwrap();
        slot.publish(&sample_report());
        link.serve(&slot).await.unwrap();

        let written = observer.get_written_data();
        assert_eq!(written[0], vec![0, 0, 0, 0]);
        assert_eq!(written[1], vec![0x00, 0x80, 0x7F, 0x08]);
    }

    #[tokio::test]
    async fn test_serve_with_no_requests_returns_zero() {
        let mut link = HostLink::with_port(MockSerialPort::new(), "mock");
        assert_eq!(link.serve(&ReportSlot::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_serve_read_error() {
        let port = MockSerialPort::with_requests(&[1]);
        port.set_read_error(io::ErrorKind::BrokenPipe);
        let mut link = HostLink::with_port(port, "mock");

        match link.serve(&ReportSlot::new()).await {
            Err(BridgeError::Serial(msg)) => assert!(msg.contains("Failed to read poll")),
            other => panic!("Expected Serial error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_answer_write_error() {
        let port = MockSerialPort::new();
        port.set_write_error(io::ErrorKind::TimedOut);
        let mut link = HostLink::with_port(port, "mock");

        match link.answer(1, &ReportSlot::new()).await {
            Err(BridgeError::Serial(msg)) => assert!(msg.contains("Failed to write reply")),
            other => panic!("Expected Serial error, got: {:?}", other),
        }
    }

    #[test]
    fn test_open_with_invalid_paths_returns_error() {
        let invalid_paths = &["/dev/nonexistent0", "/dev/nonexistent1"];

        match HostLink::open_with_paths(invalid_paths, 115_200) {
            Err(BridgeError::SerialPortNotFound(msg)) => {
                assert!(msg.contains("/dev/nonexistent0"));
                assert!(msg.contains("/dev/nonexistent1"));
            }
            Err(other) => panic!("Expected SerialPortNotFound error, got: {:?}", other),
            Ok(link) => panic!("Unexpectedly opened {}", link.device_path()),
        }
    }

    #[test]
    fn test_open_configured_port_only_tries_that_port() {
        let config = TransportConfig {
            port: "/dev/nonexistent_host_link_12345".to_string(),
            baud_rate: 115_200,
        };

        match HostLink::open(&config) {
            Err(BridgeError::SerialPortNotFound(msg)) => {
                assert_eq!(msg, "/dev/nonexistent_host_link_12345");
            }
            Err(other) => panic!("Expected SerialPortNotFound error, got: {:?}", other),
            Ok(link) => panic!("Unexpectedly opened {}", link.device_path()),
        }
    }

    #[test]
    fn test_open_port_with_invalid_path_returns_error() {
        match HostLink::open_port("/dev/nonexistent_serial_device_12345", 115_200) {
            Err(BridgeError::Serial(msg)) => {
                assert!(msg.contains("/dev/nonexistent_serial_device_12345"));
                assert!(msg.contains("Failed to open"));
            }
            Err(other) => panic!("Expected Serial error, got: {:?}", other),
            Ok(_) => panic!("Opening a nonexistent device should fail"),
        }
    }

    // Integration test - only runs if a host link device is connected
    #[test]
    #[ignore] // Run with: cargo test -- --ignored
    fn test_open_with_real_hardware() {
        match HostLink::open(&TransportConfig::default()) {
            Ok(link) => println!("Opened host link at: {}", link.device_path()),
            Err(e) => println!("No host link hardware detected: {}", e),
        }
    }
}
