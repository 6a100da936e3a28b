//! # Motorscope Core Library
//!
//! This crate is the ingestion core of `motorscope`, a live telemetry scope
//! for motor control experiments. A microcontroller streams sentinel-framed
//! binary records over a serial link; this library finds the frames, decodes
//! the fixed-layout integer fields, maintains bounded rolling history per
//! channel, and keeps a hysteretic symmetric display range per position-like
//! channel group. Rendering and the physical device stay outside: the
//! renderer is a pure sink reading snapshots and range hints on its own
//! cadence, and the device is a byte-stream [`transport::Transport`].
//!
//! ## Crate Structure
//!
//! - **`config`**: figment-based settings (serial link, stream layout, range
//!   groups, storage). The 3- vs 4-field wire variants are configuration,
//!   not code forks.
//! - **`error`**: the `ScopeError` taxonomy for centralized error handling.
//! - **`logging`**: `tracing` subscriber setup.
//! - **`telemetry`**: the core pipeline: frame extraction, record decoding,
//!   channel ring buffers, range adaptation, and the background ingestion
//!   loop that ties them together.
//! - **`transport`**: the byte-stream boundary, with a real serial
//!   implementation, a simulated device, and a scripted test transport.
//! - **`data`**: export sinks (CSV, row per channel).

pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod telemetry;
pub mod transport;

pub use error::{ScopeError, ScopeResult};
