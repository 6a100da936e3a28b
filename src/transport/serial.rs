//! Serial port transport over the `serialport` crate.

use crate::config::LinkSettings;
use crate::error::{ScopeError, ScopeResult};
use crate::transport::Transport;
use serialport::{ClearBuffer, SerialPort};
use std::io::Read;
use std::time::Duration;
use tracing::info;

/// Blocking serial transport.
///
/// Reads honor the configured port timeout; the port is closed when the
/// transport is dropped (which happens on the reader thread after `stop()`).
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the configured serial port.
    ///
    /// A connect failure is not fatal to the process: callers are expected to
    /// report it and continue disconnected.
    pub fn connect(settings: &LinkSettings) -> ScopeResult<Self> {
        info!(
            port = %settings.port,
            baud = settings.baud,
            "Trying to connect to serial link"
        );
        let port = serialport::new(&settings.port, settings.baud)
            .timeout(Duration::from_millis(settings.timeout_ms))
            .open()
            .map_err(|e| ScopeError::Connect {
                port: settings.port.clone(),
                message: e.to_string(),
            })?;
        info!(port = %settings.port, baud = settings.baud, "Connected");
        Ok(Self { port })
    }

    /// Wrap an already-open port (used by tests with pseudo-terminals).
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }
}

impl Transport for SerialTransport {
    fn read_byte(&mut self) -> ScopeResult<Option<u8>> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(1) => Ok(Some(buf[0])),
            Ok(_) => Err(ScopeError::Read(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "serial port returned EOF",
            ))),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(None),
            // Some platforms surface the timeout as WouldBlock instead.
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(ScopeError::Read(e)),
        }
    }

    fn reset_input_buffer(&mut self) -> ScopeResult<()> {
        self.port
            .clear(ClearBuffer::Input)
            .map_err(|e| ScopeError::Read(e.into()))
    }
}

/// List serial ports visible on this host.
pub fn available_ports() -> ScopeResult<Vec<serialport::SerialPortInfo>> {
    serialport::available_ports().map_err(|e| ScopeError::Io(e.into()))
}
