//! Adaptive symmetric display ranges.
//!
//! Each range group keeps a symmetric interval `(-limit, limit)` whose limit
//! is always the base limit times a power of two: it only ever doubles or
//! halves, never jumps to an arbitrary value. Expansion reacts to an
//! instantaneous overflow of the just-pushed samples; contraction reacts to
//! sustained headroom across the whole visible window and stops at the base
//! limit. The half-limit contraction threshold plus the floor is the
//! hysteresis that keeps the axis from oscillating.

/// Symmetric display range for one channel group.
#[derive(Debug, Clone)]
pub struct RangeState {
    base: i64,
    limit: i64,
}

impl RangeState {
    /// Start at `base_limit`, which is also the contraction floor.
    pub fn new(base_limit: i64) -> Self {
        Self {
            base: base_limit,
            limit: base_limit,
        }
    }

    /// Current limit `L` of the interval `(-L, L)`.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// The interval endpoints, for axis-scale hints.
    pub fn span(&self) -> (i64, i64) {
        (-self.limit, self.limit)
    }

    /// Feed one observation: the just-pushed samples of the group's member
    /// channels, plus the maximum absolute value across their entire current
    /// windows. Returns the (possibly updated) limit.
    ///
    /// Expansion doubles until the overflowing value is covered, so a severe
    /// single-step jump is absorbed in one observation.
    pub fn observe(&mut self, latest: &[i32], window_max: i64) -> i64 {
        let peak = latest
            .iter()
            .map(|v| i64::from(*v).abs())
            .max()
            .unwrap_or(0);

        if peak > self.limit {
            while peak > self.limit {
                self.limit *= 2;
            }
        } else if window_max < self.limit / 2 && self.limit > self.base {
            self.limit /= 2;
        }
        self.limit
    }

    /// Back to the base limit (reset trigger).
    pub fn reset(&mut self) {
        self.limit = self.base;
    }
}
