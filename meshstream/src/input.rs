//! Input pipeline: deduplication, pending acks, and contiguous reassembly.
//!
//! Incoming blocks are buffered by id until they form an unbroken prefix
//! starting at `delivered_block_id + 1`; a gap suspends delivery of
//! everything behind it. Duplicates (already buffered or already
//! delivered) are counted and re-marked for acknowledgment -- the peer is
//! resending because our earlier ack was lost -- but never reach the
//! reassembled stream twice.

use std::collections::{BTreeMap, BTreeSet};

use bytes::{Bytes, BytesMut};

use crate::frame::BlockId;

/// Reassembly state for the receiving side.
#[derive(Debug)]
pub struct InputPipeline {
    /// Blocks received but not yet contiguous, in id order.
    blocks: BTreeMap<BlockId, Bytes>,
    /// Highest id delivered contiguously to the consumer.
    delivered_block_id: BlockId,
    /// Ids awaiting acknowledgment, flushed in ascending order.
    pending_acks: BTreeSet<BlockId>,
    blocks_received: u64,
    bytes_received: u64,
    duplicate_blocks: u64,
    duplicate_bytes: u64,
}

impl InputPipeline {
    pub fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
            delivered_block_id: 0,
            pending_acks: BTreeSet::new(),
            blocks_received: 0,
            bytes_received: 0,
            duplicate_blocks: 0,
            duplicate_bytes: 0,
        }
    }

    /// Store one received block. Returns `true` if it was a duplicate.
    ///
    /// Duplicates are still marked pending-ack so the next ack frame
    /// repeats the id; blocks at or below the delivered watermark are
    /// dropped rather than buffered (they can never be popped again).
    pub fn store(&mut self, block_id: BlockId, payload: Bytes) -> bool {
        let size = payload.len();
        self.blocks_received += 1;
        self.bytes_received += size as u64;
        self.pending_acks.insert(block_id);

        let duplicate =
            block_id <= self.delivered_block_id || self.blocks.contains_key(&block_id);
        if duplicate {
            self.duplicate_blocks += 1;
            self.duplicate_bytes += size as u64;
        }
        if block_id > self.delivered_block_id {
            self.blocks.insert(block_id, payload);
        }
        duplicate
    }

    /// Pop the contiguous run starting at `delivered_block_id + 1`, if
    /// any, advancing the watermark and returning the concatenated bytes.
    pub fn pop_contiguous(&mut self) -> Option<Bytes> {
        self.blocks.get(&(self.delivered_block_id + 1))?;
        let mut assembled = BytesMut::new();
        while let Some(payload) = self.blocks.remove(&(self.delivered_block_id + 1)) {
            assembled.extend_from_slice(&payload);
            self.delivered_block_id += 1;
        }
        Some(assembled.freeze())
    }

    /// Take all ids awaiting acknowledgment, in ascending order.
    pub fn take_pending_acks(&mut self) -> Vec<BlockId> {
        std::mem::take(&mut self.pending_acks).into_iter().collect()
    }

    pub fn has_pending_acks(&self) -> bool {
        !self.pending_acks.is_empty()
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.pending_acks.clear();
    }

    pub fn delivered_block_id(&self) -> BlockId {
        self.delivered_block_id
    }

    pub fn blocks_received(&self) -> u64 {
        self.blocks_received
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    pub fn duplicate_blocks(&self) -> u64 {
        self.duplicate_blocks
    }

    pub fn duplicate_bytes(&self) -> u64 {
        self.duplicate_bytes
    }
}

impl Default for InputPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_order_blocks_pop_immediately() {
        let mut input = InputPipeline::new();
        assert!(!input.store(1, Bytes::from_static(b"ab")));
        assert_eq!(&input.pop_contiguous().unwrap()[..], b"ab");
        assert_eq!(input.delivered_block_id(), 1);

        input.store(2, Bytes::from_static(b"cd"));
        assert_eq!(&input.pop_contiguous().unwrap()[..], b"cd");
        assert_eq!(input.delivered_block_id(), 2);
    }

    #[test]
    fn gap_suspends_delivery() {
        let mut input = InputPipeline::new();
        input.store(2, Bytes::from_static(b"B"));
        input.store(3, Bytes::from_static(b"C"));
        assert!(input.pop_contiguous().is_none());

        input.store(1, Bytes::from_static(b"A"));
        assert_eq!(&input.pop_contiguous().unwrap()[..], b"ABC");
        assert_eq!(input.delivered_block_id(), 3);
    }

    #[test]
    fn duplicates_counted_and_reacked() {
        let mut input = InputPipeline::new();
        assert!(!input.store(1, Bytes::from_static(b"xy")));
        assert!(input.store(1, Bytes::from_static(b"xy")));
        assert_eq!(input.duplicate_blocks(), 1);
        assert_eq!(input.duplicate_bytes(), 2);

        // Still only one copy in the reassembled stream.
        assert_eq!(&input.pop_contiguous().unwrap()[..], b"xy");
        assert!(input.pop_contiguous().is_none());
    }

    #[test]
    fn duplicate_of_delivered_block_not_rebuffered() {
        let mut input = InputPipeline::new();
        input.store(1, Bytes::from_static(b"xy"));
        input.pop_contiguous().unwrap();
        input.take_pending_acks();

        assert!(input.store(1, Bytes::from_static(b"xy")));
        assert!(input.pop_contiguous().is_none());
        // The peer resent because our ack was lost; ack it again.
        assert_eq!(input.take_pending_acks(), vec![1]);
    }

    #[test]
    fn pending_acks_ascending_and_drained() {
        let mut input = InputPipeline::new();
        input.store(3, Bytes::from_static(b"C"));
        input.store(1, Bytes::from_static(b"A"));
        input.store(2, Bytes::from_static(b"B"));

        assert!(input.has_pending_acks());
        assert_eq!(input.take_pending_acks(), vec![1, 2, 3]);
        assert!(!input.has_pending_acks());
    }
}
