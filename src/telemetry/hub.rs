//! Shared telemetry state between the ingestion thread and consumers.
//!
//! The hub owns every channel's ring buffer and every group's range state
//! behind one `RwLock`: the ingestion loop is the sole writer, consumers
//! (render tick, export) take read locks and receive whole-buffer copies, so
//! a consumer can never observe a torn, partially-updated window. There is no
//! back-pressure: if a consumer stalls, ring eviction silently drops old
//! samples, which is the accepted policy for a live scope.

use crate::config::Settings;
use crate::error::{ScopeError, ScopeResult};
use crate::telemetry::channel::ChannelBuffer;
use crate::telemetry::range::RangeState;
use crate::telemetry::record::Record;
use std::sync::RwLock;

struct ChannelState {
    name: String,
    buffer: ChannelBuffer,
}

struct GroupState {
    id: String,
    members: Vec<usize>,
    range: RangeState,
}

struct HubInner {
    channels: Vec<ChannelState>,
    groups: Vec<GroupState>,
}

/// One channel's exported view: name, latest value, full window.
#[derive(Debug, Clone)]
pub struct ChannelSnapshot {
    /// Channel role name.
    pub name: String,
    /// Most recent sample.
    pub latest: i32,
    /// Ordered window, oldest to newest, always `capacity` long.
    pub samples: Vec<i32>,
}

/// One range group's exported view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeHint {
    /// Group identifier.
    pub id: String,
    /// Symmetric interval endpoints `(-limit, limit)`.
    pub span: (i64, i64),
}

/// Shared channel buffers and range state.
pub struct TelemetryHub {
    inner: RwLock<HubInner>,
}

impl TelemetryHub {
    /// Build the hub from validated settings.
    pub fn from_settings(settings: &Settings) -> ScopeResult<Self> {
        let channels: Vec<ChannelState> = settings
            .stream
            .channels
            .iter()
            .map(|name| ChannelState {
                name: name.clone(),
                buffer: ChannelBuffer::new(settings.stream.capacity),
            })
            .collect();

        let mut groups = Vec::with_capacity(settings.range_groups.len());
        for group in &settings.range_groups {
            let mut members = Vec::with_capacity(group.channels.len());
            for member in &group.channels {
                let index = channels
                    .iter()
                    .position(|c| &c.name == member)
                    .ok_or_else(|| {
                        ScopeError::Configuration(format!(
                            "Range group '{}' references unknown channel '{member}'",
                            group.id
                        ))
                    })?;
                members.push(index);
            }
            groups.push(GroupState {
                id: group.id.clone(),
                members,
                range: RangeState::new(group.base_limit),
            });
        }

        Ok(Self {
            inner: RwLock::new(HubInner { channels, groups }),
        })
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HubInner> {
        // A poisoned lock means a pushing thread panicked mid-record; the
        // state itself is still structurally sound (fixed-size rings).
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HubInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Ingest a successfully decoded record: push every field into its
    /// channel and feed each range group its members' new samples.
    ///
    /// The record's field count must match the configured channel count;
    /// extra fields are ignored and missing ones leave channels untouched
    /// (the decoder guarantees neither happens in practice).
    pub fn ingest(&self, record: &Record) {
        let mut inner = self.write();
        for (channel, value) in inner.channels.iter_mut().zip(record.values()) {
            channel.buffer.push(*value);
        }

        let HubInner { channels, groups } = &mut *inner;
        for group in groups.iter_mut() {
            let latest: Vec<i32> = group
                .members
                .iter()
                .filter_map(|&i| record.values().get(i).copied())
                .collect();
            let window_max = group
                .members
                .iter()
                .filter_map(|&i| channels.get(i))
                .map(|c| c.buffer.max_abs())
                .max()
                .unwrap_or(0);
            group.range.observe(&latest, window_max);
        }
    }

    /// Ingest a repeated record after a decode failure: buffers advance with
    /// the stale values, range state is left alone.
    pub fn ingest_repeat(&self, record: &Record) {
        let mut inner = self.write();
        for (channel, value) in inner.channels.iter_mut().zip(record.values()) {
            channel.buffer.push(*value);
        }
    }

    /// Latest value per channel, in wire order.
    pub fn latest(&self) -> Vec<(String, i32)> {
        let inner = self.read();
        inner
            .channels
            .iter()
            .map(|c| (c.name.clone(), c.buffer.latest()))
            .collect()
    }

    /// Whole-window copies per channel, in wire order.
    pub fn snapshots(&self) -> Vec<ChannelSnapshot> {
        let inner = self.read();
        inner
            .channels
            .iter()
            .map(|c| ChannelSnapshot {
                name: c.name.clone(),
                latest: c.buffer.latest(),
                samples: c.buffer.snapshot(),
            })
            .collect()
    }

    /// Current axis-scale hints per range group.
    pub fn range_hints(&self) -> Vec<RangeHint> {
        let inner = self.read();
        inner
            .groups
            .iter()
            .map(|g| RangeHint {
                id: g.id.clone(),
                span: g.range.span(),
            })
            .collect()
    }

    /// Reset trigger: zero every buffer and return every range group to its
    /// base limit.
    pub fn reset(&self) {
        let mut inner = self.write();
        for channel in inner.channels.iter_mut() {
            channel.buffer.reset();
        }
        for group in inner.groups.iter_mut() {
            group.range.reset();
        }
    }

    /// Configured window length.
    pub fn capacity(&self) -> usize {
        let inner = self.read();
        inner
            .channels
            .first()
            .map(|c| c.buffer.capacity())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ApplicationSettings, LinkSettings, RangeGroupSettings, StorageSettings, StreamSettings,
    };
    use crate::telemetry::record;
    use std::path::PathBuf;

    fn settings(capacity: usize) -> Settings {
        Settings {
            application: ApplicationSettings {
                name: "test".to_string(),
                log_level: "info".to_string(),
            },
            link: LinkSettings {
                port: "/dev/null".to_string(),
                baud: 115_200,
                timeout_ms: 10,
            },
            stream: StreamSettings {
                capacity,
                channels: vec![
                    "setpoint".to_string(),
                    "speed".to_string(),
                    "abs_position".to_string(),
                ],
            },
            range_groups: vec![RangeGroupSettings {
                id: "position".to_string(),
                channels: vec!["abs_position".to_string()],
                base_limit: 1000,
            }],
            storage: StorageSettings {
                output_dir: PathBuf::from("data"),
            },
        }
    }

    fn rec(values: &[i32]) -> Record {
        let mut payload = Vec::new();
        for v in values {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        record::decode(&payload, values.len()).unwrap()
    }

    #[test]
    fn ingest_updates_buffers_and_ranges() {
        let hub = TelemetryHub::from_settings(&settings(4)).unwrap();
        hub.ingest(&rec(&[10, 20, 1500]));
        assert_eq!(
            hub.latest(),
            vec![
                ("setpoint".to_string(), 10),
                ("speed".to_string(), 20),
                ("abs_position".to_string(), 1500),
            ]
        );
        assert_eq!(hub.range_hints()[0].span, (-2000, 2000));
    }

    #[test]
    fn repeat_ingest_skips_range_update() {
        let hub = TelemetryHub::from_settings(&settings(4)).unwrap();
        hub.ingest(&rec(&[0, 0, 500]));
        hub.ingest_repeat(&rec(&[0, 0, 50_000]));
        // buffer moved, range did not
        assert_eq!(hub.latest()[2].1, 50_000);
        assert_eq!(hub.range_hints()[0].span, (-1000, 1000));
    }

    #[test]
    fn range_contracts_once_window_drains() {
        let hub = TelemetryHub::from_settings(&settings(4)).unwrap();
        hub.ingest(&rec(&[0, 0, 1500]));
        assert_eq!(hub.range_hints()[0].span, (-2000, 2000));
        // push small samples until the 1500 leaves the 4-sample window
        for _ in 0..4 {
            hub.ingest(&rec(&[0, 0, 100]));
        }
        assert_eq!(hub.range_hints()[0].span, (-1000, 1000));
        // floor: stays at base even as the window stays quiet
        hub.ingest(&rec(&[0, 0, 1]));
        assert_eq!(hub.range_hints()[0].span, (-1000, 1000));
    }

    #[test]
    fn reset_zeroes_buffers_and_ranges() {
        let hub = TelemetryHub::from_settings(&settings(3)).unwrap();
        hub.ingest(&rec(&[7, 8, 9000]));
        hub.reset();
        assert_eq!(hub.latest()[2].1, 0);
        assert_eq!(hub.range_hints()[0].span, (-1000, 1000));
        assert!(hub.snapshots()[0].samples.iter().all(|&v| v == 0));
    }

    #[test]
    fn snapshots_are_stable_width() {
        let hub = TelemetryHub::from_settings(&settings(5)).unwrap();
        for snap in hub.snapshots() {
            assert_eq!(snap.samples.len(), 5);
        }
        assert_eq!(hub.capacity(), 5);
    }
}
