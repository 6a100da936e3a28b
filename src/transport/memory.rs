//! Scripted in-memory transport for tests.
//!
//! Plays back an explicit byte script, including timeout and hard-error
//! steps, so framing and pipeline behavior can be tested deterministically.
//! Once the script is exhausted the transport behaves like an idle link:
//! every read times out.

use crate::error::{ScopeError, ScopeResult};
use crate::telemetry::frame::{END_SENTINEL, START_SENTINEL};
use crate::transport::Transport;
use std::collections::VecDeque;
use std::time::Duration;

enum Step {
    Byte(u8),
    Timeout,
    Error,
}

/// Transport that replays a pre-built script of bytes, timeouts, and errors.
#[derive(Default)]
pub struct MemoryTransport {
    script: VecDeque<Step>,
    resets: usize,
}

impl MemoryTransport {
    /// Empty script; all reads time out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes to the script.
    pub fn push_bytes(mut self, bytes: &[u8]) -> Self {
        self.script.extend(bytes.iter().copied().map(Step::Byte));
        self
    }

    /// Append a complete sentinel-framed payload.
    pub fn push_frame(self, payload: &[u8]) -> Self {
        self.push_bytes(&[START_SENTINEL])
            .push_bytes(payload)
            .push_bytes(&[END_SENTINEL])
    }

    /// Append a single read timeout.
    pub fn push_timeout(mut self) -> Self {
        self.script.push_back(Step::Timeout);
        self
    }

    /// Append a fatal read error.
    pub fn push_error(mut self) -> Self {
        self.script.push_back(Step::Error);
        self
    }

    /// How many times `reset_input_buffer` was called.
    pub fn resets(&self) -> usize {
        self.resets
    }
}

impl Transport for MemoryTransport {
    fn read_byte(&mut self) -> ScopeResult<Option<u8>> {
        match self.script.pop_front() {
            Some(Step::Byte(b)) => Ok(Some(b)),
            Some(Step::Timeout) | None => {
                // Pace like a real link timeout so exhausted scripts do not
                // spin the reader thread hot.
                std::thread::sleep(Duration::from_millis(1));
                Ok(None)
            }
            Some(Step::Error) => Err(ScopeError::Read(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "scripted read error",
            ))),
        }
    }

    fn reset_input_buffer(&mut self) -> ScopeResult<()> {
        // The script models the device's future output, not bytes already
        // buffered on the host, so resets are recorded but discard nothing.
        self.resets += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_bytes_then_times_out() {
        let mut t = MemoryTransport::new().push_bytes(&[1, 2]);
        assert_eq!(t.read_byte().unwrap(), Some(1));
        assert_eq!(t.read_byte().unwrap(), Some(2));
        assert_eq!(t.read_byte().unwrap(), None);
    }

    #[test]
    fn read_until_returns_through_sentinel() {
        let mut t = MemoryTransport::new().push_bytes(&[10, 20, END_SENTINEL, 99]);
        let data = t.read_until(END_SENTINEL).unwrap().expect("sentinel found");
        assert_eq!(data, vec![10, 20, END_SENTINEL]);
        assert_eq!(t.read_byte().unwrap(), Some(99));
    }

    #[test]
    fn read_until_times_out_mid_frame() {
        let mut t = MemoryTransport::new().push_bytes(&[10, 20]).push_timeout();
        assert_eq!(t.read_until(END_SENTINEL).unwrap(), None);
    }

    #[test]
    fn scripted_error_propagates() {
        let mut t = MemoryTransport::new().push_error();
        assert!(matches!(t.read_byte(), Err(ScopeError::Read(_))));
    }

    #[test]
    fn resets_are_counted_without_consuming_the_script() {
        let mut t = MemoryTransport::new().push_bytes(&[42]);
        t.reset_input_buffer().unwrap();
        assert_eq!(t.resets(), 1);
        assert_eq!(t.read_byte().unwrap(), Some(42));
    }
}
