//! Telemetry ingestion core.
//!
//! One-directional data flow, leaf modules first:
//!
//! - [`frame`]: finds sentinel-bounded frames in the raw byte stream.
//! - [`record`]: decodes a frame payload into N signed 32-bit fields.
//! - [`channel`]: bounded rolling history per channel.
//! - [`range`]: hysteretic symmetric display range per channel group.
//! - [`hub`]: shared single-writer/multi-reader view of buffers and ranges.
//! - [`pipeline`]: the background ingestion loop tying it all together.

pub mod channel;
pub mod frame;
pub mod hub;
pub mod pipeline;
pub mod range;
pub mod record;

pub use hub::TelemetryHub;
pub use pipeline::IngestionPipeline;
pub use record::Record;
