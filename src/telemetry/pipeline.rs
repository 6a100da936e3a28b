//! Background ingestion pipeline.
//!
//! One dedicated reader thread blocks on transport reads and drives the
//! frame → decode → buffer → range chain; consumers run on their own cadence
//! and only ever read the shared [`TelemetryHub`]. `start()` spawns the
//! thread and gates on the first successfully decoded record, so a caller
//! that reads buffers immediately after `start()` returns never sees a
//! completely empty fallback path. `stop()` clears the run flag and joins:
//! the loop checks the flag once per frame cycle, so shutdown waits for at
//! most one in-flight transport read.
//!
//! Error policy per iteration: frame timeouts retry indefinitely, decode
//! failures repeat the last good record into the buffers (and leave the
//! range state alone), transport read errors stop the pipeline.

use crate::error::{ScopeError, ScopeResult};
use crate::telemetry::frame::FrameReader;
use crate::telemetry::hub::TelemetryHub;
use crate::telemetry::record::{self, Record};
use crate::transport::BoxedTransport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info, warn};

/// Poll interval for the first-record gate.
const GATE_POLL: Duration = Duration::from_millis(10);

/// Run/receiving flags shared with the reader thread.
#[derive(Debug, Default)]
pub struct PipelineState {
    running: AtomicBool,
    receiving: AtomicBool,
}

impl PipelineState {
    /// Whether the reader loop should keep iterating.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Whether at least one record has been successfully ingested.
    pub fn is_receiving(&self) -> bool {
        self.receiving.load(Ordering::Acquire)
    }

    fn set_running(&self, value: bool) {
        self.running.store(value, Ordering::Release);
    }

    fn mark_receiving(&self) {
        self.receiving.store(true, Ordering::Release);
    }
}

/// Owns the reader thread and the transport it consumes.
pub struct IngestionPipeline {
    hub: Arc<TelemetryHub>,
    state: Arc<PipelineState>,
    field_count: usize,
    transport: Option<BoxedTransport>,
    handle: Option<JoinHandle<()>>,
}

impl IngestionPipeline {
    /// Create a pipeline; nothing runs until [`start`](Self::start).
    pub fn new(transport: BoxedTransport, hub: Arc<TelemetryHub>, field_count: usize) -> Self {
        Self {
            hub,
            state: Arc::new(PipelineState::default()),
            field_count,
            transport: Some(transport),
            handle: None,
        }
    }

    /// Shared run/receiving flags.
    pub fn state(&self) -> Arc<PipelineState> {
        Arc::clone(&self.state)
    }

    /// Spawn the reader thread and block until the first record arrives.
    ///
    /// Idempotent: calling `start` while the reader is already running is a
    /// no-op. Returns [`ScopeError::PipelineHalted`] if the reader exits
    /// (fatal transport error) before producing a single record, or if the
    /// pipeline was already stopped; a stopped pipeline cannot be restarted
    /// because its transport is gone.
    pub fn start(&mut self) -> ScopeResult<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        let transport = self.transport.take().ok_or(ScopeError::PipelineHalted)?;

        self.state.set_running(true);
        let state = Arc::clone(&self.state);
        let hub = Arc::clone(&self.hub);
        let field_count = self.field_count;
        let handle = std::thread::Builder::new()
            .name("motorscope-ingest".to_string())
            .spawn(move || read_loop(FrameReader::new(transport), hub, state, field_count))?;
        self.handle = Some(handle);

        // Block till we start receiving values.
        while !self.state.is_receiving() {
            if !self.state.is_running() {
                // Reader died before the first record; surface that instead
                // of blocking forever.
                if let Some(handle) = self.handle.take() {
                    let _ = handle.join();
                }
                return Err(ScopeError::PipelineHalted);
            }
            std::thread::sleep(GATE_POLL);
        }
        info!("ingestion pipeline receiving");
        Ok(())
    }

    /// Clear the run flag, join the reader thread, release the transport.
    pub fn stop(&mut self) -> ScopeResult<()> {
        self.state.set_running(false);
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| ScopeError::PipelineHalted)?;
        }
        info!("ingestion pipeline stopped");
        Ok(())
    }
}

impl Drop for IngestionPipeline {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

fn read_loop(
    mut reader: FrameReader<BoxedTransport>,
    hub: Arc<TelemetryHub>,
    state: Arc<PipelineState>,
    field_count: usize,
) {
    if let Err(e) = reader.transport_mut().reset_input_buffer() {
        error!(error = %e, "could not reset transport input buffer");
        state.set_running(false);
        return;
    }

    let mut last_good: Option<Record> = None;
    while state.is_running() {
        match reader.next_frame() {
            Ok(Some(payload)) => match record::decode(&payload, field_count) {
                Ok(record) => {
                    hub.ingest(&record);
                    last_good = Some(record);
                    state.mark_receiving();
                }
                Err(failure) => {
                    warn!(
                        payload = ?failure.payload(),
                        "decode failure, repeating last good record"
                    );
                    if let Some(prev) = &last_good {
                        hub.ingest_repeat(prev);
                    }
                }
            },
            // Timeout or resync step; try again while the run flag holds.
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "transport read failed, stopping ingestion");
                break;
            }
        }
    }
    state.set_running(false);
    // Transport is dropped (and closed) with the reader here.
}
