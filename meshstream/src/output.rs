//! Output pipeline: segmentation, unacked-block tracking, and
//! congestion-aware send selection.
//!
//! A write is split into blocks of at most `block_size` bytes, each keyed
//! by a strictly increasing block id starting at 1. Blocks stay in the
//! map until acknowledged; whether a block has ever been transmitted is a
//! type-level fact (`last_sent: Option<Duration>`), not a sentinel.
//!
//! Pacing is a hard rate cap, not a window: when the achieved byte rate
//! since stream creation exceeds the configured limit, nothing is sent
//! this round. Retransmission is timeout-based -- a block goes out again
//! only once its last send is older than `4 * blocks_per_ack * rtt`.

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;

use crate::config::StreamConfig;
use crate::error::{MeshStreamError, Result};
use crate::frame::BlockId;

/// One unacknowledged block.
#[derive(Debug, Clone)]
struct OutputBlock {
    payload: Bytes,
    /// Stream-relative time of the last transmission; `None` = never sent.
    last_sent: Option<Duration>,
}

/// Segmentation and retransmission state for the sending side.
#[derive(Debug)]
pub struct OutputPipeline {
    /// Unacknowledged blocks in id order.
    blocks: BTreeMap<BlockId, OutputBlock>,
    /// Last assigned block id; the first block of a stream gets id 1.
    last_block_id: BlockId,
    /// Sum of unacknowledged payload bytes.
    buffer_size: usize,
    bytes_sent: u64,
    bytes_acked: u64,
    bytes_resent: u64,
    blocks_sent: u64,
}

impl OutputPipeline {
    pub fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
            last_block_id: 0,
            buffer_size: 0,
            bytes_sent: 0,
            bytes_acked: 0,
            bytes_resent: 0,
            blocks_sent: 0,
        }
    }

    /// Enqueue `data`, split into blocks of at most `block_size` bytes.
    ///
    /// Rejected with `BufferOverflow` before any state is mutated when the
    /// write would push the unacked buffer past `max_buffer_size`.
    pub fn write(&mut self, data: Bytes, config: &StreamConfig) -> Result<()> {
        if self.buffer_size + data.len() > config.max_buffer_size {
            return Err(MeshStreamError::BufferOverflow {
                buffered: self.buffer_size,
                incoming: data.len(),
                max: config.max_buffer_size,
            });
        }
        let mut offset = 0;
        while offset < data.len() {
            let end = (offset + config.block_size).min(data.len());
            let piece = data.slice(offset..end);
            self.last_block_id += 1;
            self.buffer_size += piece.len();
            self.blocks.insert(
                self.last_block_id,
                OutputBlock {
                    payload: piece,
                    last_sent: None,
                },
            );
            offset = end;
        }
        Ok(())
    }

    /// Select the blocks due for (re)transmission at `now_rel`, marking
    /// each as sent. Returns an empty batch when the achieved send rate
    /// already exceeds the configured cap.
    pub fn take_sendable(
        &mut self,
        now_rel: Duration,
        rtt: Duration,
        config: &StreamConfig,
    ) -> Vec<(BlockId, Bytes)> {
        let elapsed = now_rel.as_secs_f64();
        if elapsed > 0.0 {
            let rate = self.bytes_sent as f64 / elapsed;
            if rate > config.send_rate_limit as f64 {
                return Vec::new();
            }
        }
        let resend_after = rtt * (4 * config.blocks_per_ack);
        let mut batch = Vec::new();
        for (id, block) in self.blocks.iter_mut() {
            let size = block.payload.len();
            if let Some(sent_at) = block.last_sent {
                if now_rel.saturating_sub(sent_at) <= resend_after {
                    continue;
                }
                self.bytes_resent += size as u64;
            }
            block.last_sent = Some(now_rel);
            self.bytes_sent += size as u64;
            self.blocks_sent += 1;
            batch.push((*id, block.payload.clone()));
        }
        batch
    }

    /// Acknowledge one block id.
    ///
    /// Returns the block's size and last-sent time, or `None` when the id
    /// is unknown (already acked, or never ours) -- acks are idempotent.
    pub fn ack(&mut self, block_id: BlockId) -> Option<(usize, Option<Duration>)> {
        let block = self.blocks.remove(&block_id)?;
        let size = block.payload.len();
        self.buffer_size -= size;
        self.bytes_acked += size as u64;
        Some((size, block.last_sent))
    }

    /// Drop every unacknowledged block (zero-ack abort). The dropped bytes
    /// are credited as acked so the sender's accounting still completes.
    /// Returns the number of bytes dropped.
    pub fn flush_all(&mut self) -> usize {
        let dropped = self.buffer_size;
        self.blocks.clear();
        self.buffer_size = 0;
        self.bytes_acked += dropped as u64;
        dropped
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.buffer_size = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn last_block_id(&self) -> BlockId {
        self.last_block_id
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    pub fn bytes_acked(&self) -> u64 {
        self.bytes_acked
    }

    pub fn bytes_resent(&self) -> u64 {
        self.bytes_resent
    }

    pub fn blocks_sent(&self) -> u64 {
        self.blocks_sent
    }
}

impl Default for OutputPipeline {
    fn default() -> Self {
        Self::new()
    }
}
