//! Byte-stream transport boundary.
//!
//! The core treats the serial device as an opaque byte source with three
//! primitives: a single-byte read with timeout, a read-until-sentinel, and an
//! input buffer reset. Everything above this seam is transport-agnostic, so
//! the pipeline runs identically over a real serial port
//! ([`serial::SerialTransport`]), a synthetic device ([`sim::SimTransport`]),
//! or a scripted byte sequence ([`memory::MemoryTransport`]) in tests.
//!
//! Reads are blocking with the transport's own configured timeout; a timeout
//! is reported as `Ok(None)`, never as an error. Transports close their
//! underlying resource on drop.

pub mod memory;
#[cfg(feature = "link_serial")]
pub mod serial;
pub mod sim;

use crate::error::ScopeResult;

/// Upper bound on bytes accepted while hunting for an end sentinel.
///
/// A stream that never produces the sentinel (framing loss, wrong baud rate)
/// would otherwise grow the accumulator without bound.
const MAX_READ_UNTIL_BYTES: usize = 4096;

/// A blocking byte-stream transport.
pub trait Transport: Send {
    /// Read one byte. `Ok(None)` means the read timed out.
    fn read_byte(&mut self) -> ScopeResult<Option<u8>>;

    /// Read bytes up to and including `sentinel`.
    ///
    /// Returns `Ok(None)` if the read times out before the sentinel arrives,
    /// or if [`MAX_READ_UNTIL_BYTES`] accumulate without it; the partial data
    /// is discarded in both cases.
    fn read_until(&mut self, sentinel: u8) -> ScopeResult<Option<Vec<u8>>> {
        let mut data = Vec::new();
        loop {
            match self.read_byte()? {
                Some(byte) => {
                    data.push(byte);
                    if byte == sentinel {
                        return Ok(Some(data));
                    }
                    if data.len() >= MAX_READ_UNTIL_BYTES {
                        return Ok(None);
                    }
                }
                None => return Ok(None),
            }
        }
    }

    /// Discard any bytes already buffered by the transport.
    fn reset_input_buffer(&mut self) -> ScopeResult<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read_byte(&mut self) -> ScopeResult<Option<u8>> {
        (**self).read_byte()
    }

    fn read_until(&mut self, sentinel: u8) -> ScopeResult<Option<Vec<u8>>> {
        (**self).read_until(sentinel)
    }

    fn reset_input_buffer(&mut self) -> ScopeResult<()> {
        (**self).reset_input_buffer()
    }
}

/// Boxed transport handed to the ingestion pipeline.
pub type BoxedTransport = Box<dyn Transport + Send>;
