//! Sentinel-based frame extraction.
//!
//! The wire format has no length field and no checksum: one start sentinel,
//! an opaque payload, one end sentinel. Resynchronization after garbage is
//! byte-by-byte; each call consumes exactly one leading byte and discards it
//! if it is not the start sentinel, so the reader slides forward until it
//! locks onto a frame boundary.

use crate::error::ScopeResult;
use crate::transport::Transport;
use tracing::debug;

/// Start-of-frame sentinel (`'S'`).
pub const START_SENTINEL: u8 = b'S';
/// End-of-frame sentinel (`'Z'`).
pub const END_SENTINEL: u8 = b'Z';

/// Extracts candidate payloads from a transport byte stream.
pub struct FrameReader<T: Transport> {
    transport: T,
}

impl<T: Transport> FrameReader<T> {
    /// Wrap a transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Access the underlying transport (input buffer reset at loop start).
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Read one frame payload, with both sentinels stripped.
    ///
    /// `Ok(None)` covers three retryable cases: a read timeout with no start
    /// byte, a discarded non-sentinel byte (resync step), and a timeout that
    /// struck mid-frame (the partial frame is abandoned). A transport read
    /// error is fatal and propagates to the caller.
    pub fn next_frame(&mut self) -> ScopeResult<Option<Vec<u8>>> {
        let byte = match self.transport.read_byte()? {
            Some(byte) => byte,
            None => return Ok(None),
        };
        if byte != START_SENTINEL {
            return Ok(None);
        }
        match self.transport.read_until(END_SENTINEL)? {
            Some(mut data) => {
                // read_until includes the end sentinel
                data.pop();
                Ok(Some(data))
            }
            None => {
                debug!("frame abandoned: end sentinel not seen before timeout");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::MemoryTransport;

    #[test]
    fn extracts_payload_between_sentinels() {
        let transport = MemoryTransport::new().push_frame(&[1, 2, 3, 4]);
        let mut reader = FrameReader::new(transport);
        assert_eq!(reader.next_frame().unwrap(), Some(vec![1, 2, 3, 4]));
    }

    #[test]
    fn discards_one_garbage_byte_per_call() {
        let transport = MemoryTransport::new()
            .push_bytes(&[0xFF, 0xAB])
            .push_frame(&[9]);
        let mut reader = FrameReader::new(transport);
        assert_eq!(reader.next_frame().unwrap(), None);
        assert_eq!(reader.next_frame().unwrap(), None);
        assert_eq!(reader.next_frame().unwrap(), Some(vec![9]));
    }

    #[test]
    fn timeout_with_no_start_byte_is_not_an_error() {
        let transport = MemoryTransport::new().push_timeout();
        let mut reader = FrameReader::new(transport);
        assert_eq!(reader.next_frame().unwrap(), None);
    }

    #[test]
    fn mid_frame_timeout_abandons_frame() {
        let transport = MemoryTransport::new()
            .push_bytes(&[START_SENTINEL, 1, 2])
            .push_timeout()
            .push_frame(&[7, 8]);
        let mut reader = FrameReader::new(transport);
        assert_eq!(reader.next_frame().unwrap(), None);
        assert_eq!(reader.next_frame().unwrap(), Some(vec![7, 8]));
    }

    #[test]
    fn empty_frame_yields_empty_payload() {
        let transport = MemoryTransport::new().push_bytes(&[START_SENTINEL, END_SENTINEL]);
        let mut reader = FrameReader::new(transport);
        assert_eq!(reader.next_frame().unwrap(), Some(vec![]));
    }

    #[test]
    fn read_error_propagates() {
        let transport = MemoryTransport::new().push_error();
        let mut reader = FrameReader::new(transport);
        assert!(reader.next_frame().is_err());
    }

    #[test]
    fn payload_containing_start_sentinel_is_passed_through() {
        // 'S' (0x53) is a legal payload byte; only 'Z' terminates.
        let transport = MemoryTransport::new().push_frame(&[START_SENTINEL, 1]);
        let mut reader = FrameReader::new(transport);
        assert_eq!(reader.next_frame().unwrap(), Some(vec![START_SENTINEL, 1]));
    }
}
