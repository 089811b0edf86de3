//! Tokio glue for `mdmend`.
//!
//! `mdmend` is synchronous and stateless. This crate helps async producers feed it:
//!
//! - Batch tiny deltas until the markdown itself says a re-render is worth it: a block was
//!   finished or a code fence closed. A delay and a byte cap keep progress when neither happens.
//! - Run an actor task that owns the accumulated text and emits prepared block snapshots.

use std::time::Duration;

use mdmend::{Pipeline, PreparedBlock, RenderMode, has_incomplete_code_fence, segment};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug)]
pub struct BatchOptions {
    /// Flush when the delta starts a new top-level block, which makes the previous one final.
    pub flush_on_block: bool,
    /// Upper bound on how long a delta may wait.
    pub max_delay: Duration,
    /// Flush once the pending delta reaches this many bytes.
    pub max_bytes: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            flush_on_block: true,
            max_delay: Duration::from_millis(60),
            max_bytes: 8 * 1024,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushReason {
    /// A new block started after the previous flush.
    BlockBoundary,
    /// A fence that was open got its closing line.
    FenceClosed,
    MaxDelay,
    MaxBytes,
    ChannelClosed,
}

/// Text received since the previous batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    pub delta: String,
    pub reason: FlushReason,
    /// Number of channel messages merged into `delta`.
    pub merged_messages: usize,
}

/// Start offset of the last block `segment` reports.
fn last_block_start(text: &str) -> usize {
    segment(text).last().map_or(0, |block| text.len() - block.len())
}

/// Wraps a delta channel and keeps the whole document, releasing batches at markdown boundaries.
pub struct BlockBatcher {
    rx: mpsc::Receiver<String>,
    opts: BatchOptions,
    text: String,
    /// Bytes of `text` already handed out.
    flushed: usize,
    /// Start of the last block as of the previous flush.
    block_start: usize,
    fence_open: bool,
    fence_closed: bool,
}

impl BlockBatcher {
    pub fn new(rx: mpsc::Receiver<String>, opts: BatchOptions) -> Self {
        Self {
            rx,
            opts,
            text: String::new(),
            flushed: 0,
            block_start: 0,
            fence_open: false,
            fence_closed: false,
        }
    }

    /// Everything received so far, flushed or not.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn pending(&self) -> &str {
        &self.text[self.flushed..]
    }

    /// Receive the next batch.
    ///
    /// Returns `None` once the channel is closed and nothing is pending. Pending text is always
    /// delivered before that.
    pub async fn recv(&mut self) -> Option<Batch> {
        let mut merged = 0usize;
        while self.pending().is_empty() {
            let delta = self.rx.recv().await?;
            self.push(&delta);
            merged += 1;
        }
        let deadline = Instant::now() + self.opts.max_delay;

        loop {
            if let Some(reason) = self.flush_reason() {
                return Some(self.take(reason, merged));
            }
            match tokio::time::timeout_at(deadline, self.rx.recv()).await {
                Ok(Some(delta)) => {
                    self.push(&delta);
                    merged += 1;
                }
                Ok(None) => return Some(self.take(FlushReason::ChannelClosed, merged)),
                Err(_) => return Some(self.take(FlushReason::MaxDelay, merged)),
            }
        }
    }

    fn push(&mut self, delta: &str) {
        self.text.push_str(delta);
        let was_open = self.fence_open;
        self.fence_open = has_incomplete_code_fence(&self.text);
        if was_open && !self.fence_open {
            self.fence_closed = true;
        }
    }

    fn flush_reason(&self) -> Option<FlushReason> {
        if self.pending().len() >= self.opts.max_bytes {
            return Some(FlushReason::MaxBytes);
        }
        if self.fence_closed {
            return Some(FlushReason::FenceClosed);
        }
        if self.opts.flush_on_block && last_block_start(&self.text) > self.block_start {
            return Some(FlushReason::BlockBoundary);
        }
        None
    }

    fn take(&mut self, reason: FlushReason, merged_messages: usize) -> Batch {
        let delta = self.pending().to_string();
        self.flushed = self.text.len();
        self.block_start = last_block_start(&self.text);
        self.fence_closed = false;
        trace!(?reason, bytes = delta.len(), merged_messages, "batch released");
        Batch {
            delta,
            reason,
            merged_messages,
        }
    }
}

/// Prepared blocks for the full text received so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub blocks: Vec<PreparedBlock>,
    /// The producer closed its channel; this is the final, static rendering.
    pub done: bool,
}

/// Spawn a task that accumulates deltas and emits a [`Snapshot`] per batch.
///
/// Snapshots are prepared in streaming mode. Once the producer closes its channel, one last
/// snapshot is prepared in static mode with `done` set.
pub fn spawn_render_actor(
    pipeline: Pipeline,
    rx: mpsc::Receiver<String>,
    opts: BatchOptions,
) -> mpsc::Receiver<Snapshot> {
    let (tx_out, rx_out) = mpsc::channel::<Snapshot>(64);

    tokio::spawn(async move {
        let mut batcher = BlockBatcher::new(rx, opts);
        while batcher.recv().await.is_some() {
            let snapshot = Snapshot {
                blocks: pipeline.prepare_as(batcher.text(), RenderMode::Streaming),
                done: false,
            };
            if tx_out.send(snapshot).await.is_err() {
                debug!("snapshot receiver dropped; stopping render actor");
                return;
            }
        }
        let last = Snapshot {
            blocks: pipeline.prepare_as(batcher.text(), RenderMode::Static),
            done: true,
        };
        if tx_out.send(last).await.is_err() {
            debug!("snapshot receiver dropped before the final snapshot");
        }
    });

    rx_out
}
