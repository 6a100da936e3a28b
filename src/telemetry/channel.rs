//! Bounded rolling history per channel.
//!
//! A fixed-capacity ring pre-filled with zeros, so `snapshot()` always has
//! exactly `capacity` elements even before any data arrives and the renderer
//! gets a stable-width window from the first tick. Pushing into a full ring
//! evicts the oldest sample; there is no explicit evict call and capacity
//! never changes during a run.

use std::collections::VecDeque;

/// Fixed-capacity sample ring for one telemetry channel.
#[derive(Debug, Clone)]
pub struct ChannelBuffer {
    samples: VecDeque<i32>,
    capacity: usize,
}

impl ChannelBuffer {
    /// Create a zero-filled ring of `capacity` samples.
    ///
    /// `capacity` must be non-zero; configuration validation enforces this.
    pub fn new(capacity: usize) -> Self {
        let mut samples = VecDeque::with_capacity(capacity);
        samples.extend(std::iter::repeat(0).take(capacity));
        Self { samples, capacity }
    }

    /// Append a sample, evicting the oldest.
    pub fn push(&mut self, value: i32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Most recently pushed sample (zero before any push).
    pub fn latest(&self) -> i32 {
        self.samples.back().copied().unwrap_or(0)
    }

    /// Full ordered window, oldest to newest, always `capacity` long.
    pub fn snapshot(&self) -> Vec<i32> {
        self.samples.iter().copied().collect()
    }

    /// Largest absolute value in the window.
    ///
    /// Widened to i64 so `i32::MIN` does not overflow on negation.
    pub fn max_abs(&self) -> i64 {
        self.samples
            .iter()
            .map(|v| (i64::from(*v)).abs())
            .max()
            .unwrap_or(0)
    }

    /// Zero the window (reset trigger).
    pub fn reset(&mut self) {
        for sample in self.samples.iter_mut() {
            *sample = 0;
        }
    }

    /// Configured window length.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_has_capacity_length_before_any_push() {
        let buf = ChannelBuffer::new(5);
        assert_eq!(buf.snapshot(), vec![0, 0, 0, 0, 0]);
        assert_eq!(buf.latest(), 0);
    }

    #[test]
    fn snapshot_length_is_invariant_under_pushes() {
        let mut buf = ChannelBuffer::new(4);
        for i in 0..100 {
            buf.push(i);
            assert_eq!(buf.snapshot().len(), 4);
        }
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let mut buf = ChannelBuffer::new(3);
        for v in [1, 2, 3, 4, 5] {
            buf.push(v);
        }
        // capacity + k pushes keep only the last `capacity` in order
        assert_eq!(buf.snapshot(), vec![3, 4, 5]);
        assert_eq!(buf.latest(), 5);
    }

    #[test]
    fn partial_fill_keeps_zero_padding_at_front() {
        let mut buf = ChannelBuffer::new(4);
        buf.push(7);
        buf.push(8);
        assert_eq!(buf.snapshot(), vec![0, 0, 7, 8]);
    }

    #[test]
    fn max_abs_handles_extreme_negative() {
        let mut buf = ChannelBuffer::new(2);
        buf.push(i32::MIN);
        assert_eq!(buf.max_abs(), i64::from(i32::MAX) + 1);
    }

    #[test]
    fn reset_restores_zero_fill() {
        let mut buf = ChannelBuffer::new(3);
        for v in [4, 5, 6] {
            buf.push(v);
        }
        buf.reset();
        assert_eq!(buf.snapshot(), vec![0, 0, 0]);
        assert_eq!(buf.max_abs(), 0);
    }
}
