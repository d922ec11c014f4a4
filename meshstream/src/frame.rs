//! Wire frames carried inside an already-demultiplexed datagram.
//!
//! The session layer owns the outer header and tells us whether a payload
//! is a data frame or an ack frame, so the two are separate types rather
//! than a tagged enum. All integers are big-endian on the wire; block ids
//! are strictly positive and fit comfortably in a u32.
//!
//! Binary layout:
//!
//! ```text
//! Data:  block_id (4B BE) | payload (0..=BLOCK_SIZE bytes)
//! Ack:   block_id (4B BE) * N    -- N == 0 is the "zero-ack" abort signal
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::config::BLOCK_ID_SIZE;
use crate::error::{MeshStreamError, Result};

/// Per-stream block sequence id, assigned in send order starting at 1.
pub type BlockId = u32;

/// One block of stream data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFrame {
    pub block_id: BlockId,
    pub payload: Bytes,
}

impl DataFrame {
    /// Encode this frame into a byte buffer.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Encode into a pre-allocated `BytesMut`.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u32(self.block_id);
        buf.put_slice(&self.payload);
    }

    /// The total number of bytes this frame occupies when encoded.
    pub fn encoded_len(&self) -> usize {
        BLOCK_ID_SIZE + self.payload.len()
    }

    /// Decode a data frame from the payload of a data datagram.
    pub fn decode(mut data: &[u8]) -> Result<Self> {
        if data.len() < BLOCK_ID_SIZE {
            return Err(MeshStreamError::FrameTooShort {
                expected: BLOCK_ID_SIZE,
                actual: data.len(),
            });
        }
        let block_id = data.get_u32();
        let payload = Bytes::copy_from_slice(data);
        Ok(Self { block_id, payload })
    }
}

/// An acknowledgment frame listing received block ids.
///
/// An empty id list is the "zero-ack": the peer has abandoned the stream
/// and the sender must drop all outstanding blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckFrame {
    pub block_ids: Vec<BlockId>,
}

impl AckFrame {
    /// Whether this is the zero-ack abort signal.
    pub fn is_zero_ack(&self) -> bool {
        self.block_ids.is_empty()
    }

    /// Encode this frame into a byte buffer.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Encode into a pre-allocated `BytesMut`.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        for id in &self.block_ids {
            buf.put_u32(*id);
        }
    }

    /// The total number of bytes this frame occupies when encoded.
    pub fn encoded_len(&self) -> usize {
        self.block_ids.len() * BLOCK_ID_SIZE
    }

    /// Decode an ack frame from the payload of an ack datagram.
    pub fn decode(mut data: &[u8]) -> Result<Self> {
        if data.len() % BLOCK_ID_SIZE != 0 {
            return Err(MeshStreamError::AckFrameLength(data.len()));
        }
        let mut block_ids = Vec::with_capacity(data.len() / BLOCK_ID_SIZE);
        while data.has_remaining() {
            block_ids.push(data.get_u32());
        }
        Ok(Self { block_ids })
    }
}
