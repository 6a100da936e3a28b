//! Simulated telemetry transport.
//!
//! Generates sentinel-framed motor telemetry without hardware: a triangle
//! command input, a jittery sine speed, and position channels whose amplitude
//! slowly sweeps up and down so the adaptive display range gets exercised in
//! both directions. A configurable fraction of frames is emitted truncated to
//! exercise the decode-failure fallback path.

use crate::error::ScopeResult;
use crate::telemetry::frame::{END_SENTINEL, START_SENTINEL};
use crate::transport::Transport;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::Duration;

/// Simulated serial device emitting framed records.
pub struct SimTransport {
    field_count: usize,
    tick: u64,
    pending: VecDeque<u8>,
    frame_interval: Duration,
    corruption: f64,
    rng: StdRng,
}

impl SimTransport {
    /// Create a simulator for records of `field_count` i32 fields.
    pub fn new(field_count: usize) -> Self {
        Self {
            field_count,
            tick: 0,
            pending: VecDeque::new(),
            frame_interval: Duration::from_millis(2),
            corruption: 0.0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Probability in `[0, 1]` that a frame is emitted with a truncated payload.
    pub fn with_corruption(mut self, probability: f64) -> Self {
        self.corruption = probability.clamp(0.0, 1.0);
        self
    }

    /// Delay inserted before each synthesized frame (device cadence).
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Deterministic variant for tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn sample(&mut self, field: usize) -> i32 {
        let t = self.tick as f64;
        match field {
            // Command input: triangle wave, ±100
            0 => {
                let phase = (self.tick % 400) as i64;
                (if phase < 200 { phase - 100 } else { 299 - phase }) as i32
            }
            // Measured rate: sine ±250 with sensor jitter
            1 => {
                let jitter: i32 = self.rng.gen_range(-5..=5);
                (250.0 * (t / 50.0).sin()) as i32 + jitter
            }
            // Position-like channels: sine whose amplitude sweeps 500..16000
            // and back, forcing range expansion and later contraction.
            _ => {
                let sweep = (self.tick % 8000) as f64;
                let amplitude = if sweep < 4000.0 {
                    500.0 + sweep * 3.875
                } else {
                    500.0 + (8000.0 - sweep) * 3.875
                };
                let lag = (field as f64) * 0.3;
                (amplitude * ((t / 200.0) - lag).sin()) as i32
            }
        }
    }

    fn synthesize_frame(&mut self) {
        std::thread::sleep(self.frame_interval);
        self.tick += 1;

        let mut payload = Vec::with_capacity(self.field_count * 4);
        for field in 0..self.field_count {
            let value = self.sample(field);
            payload.extend_from_slice(&value.to_le_bytes());
        }
        if self.corruption > 0.0 && self.rng.gen_bool(self.corruption) {
            payload.truncate(payload.len().saturating_sub(4));
        }

        self.pending.push_back(START_SENTINEL);
        self.pending.extend(payload);
        self.pending.push_back(END_SENTINEL);
    }
}

impl Transport for SimTransport {
    fn read_byte(&mut self) -> ScopeResult<Option<u8>> {
        if self.pending.is_empty() {
            self.synthesize_frame();
        }
        Ok(self.pending.pop_front())
    }

    fn reset_input_buffer(&mut self) -> ScopeResult<()> {
        self.pending.clear();
        Ok(())
    }
}
