//! Tunable parameters for the stream engine.
//!
//! The wire budget is fixed by the datagram transport: 508 usable bytes
//! per datagram, of which the session layer owns a 14-byte outer header
//! (version, command, stream id, total size) and the stream frame spends
//! 4 bytes on the block id. Everything else is exposed as configuration
//! with defaults matching the transport's deployed values.

use std::time::Duration;

/// Usable payload of one datagram on the Mesh transport.
pub const UDP_DATAGRAM_SIZE: usize = 508;
/// Outer datagram header owned by the session layer.
pub const OUTER_HEADER_SIZE: usize = 14;
/// Size of the block id field inside a data frame.
pub const BLOCK_ID_SIZE: usize = 4;
/// Maximum payload bytes per block.
pub const BLOCK_SIZE: usize = UDP_DATAGRAM_SIZE - OUTER_HEADER_SIZE - BLOCK_ID_SIZE;

/// Receiver acknowledges in windows of this many blocks.
pub const BLOCKS_PER_ACK: u32 = 16;
/// Most block ids one ack frame can carry without overflowing the
/// datagram budget.
pub const MAX_ACK_IDS_PER_FRAME: usize =
    (UDP_DATAGRAM_SIZE - OUTER_HEADER_SIZE) / BLOCK_ID_SIZE;
/// Cap on unacknowledged outbound bytes per stream.
pub const MAX_BUFFER_SIZE: usize = 64 * 1024;

/// Floor for the smoothed RTT wherever it feeds a timer.
pub const RTT_MIN_LIMIT: Duration = Duration::from_millis(2);
/// Ceiling for the smoothed RTT wherever it feeds a timer.
pub const RTT_MAX_LIMIT: Duration = Duration::from_millis(500);

/// Default outbound rate cap: 1 Mbps = 125000 B/s.
pub const DEFAULT_SEND_RATE_LIMIT: u64 = 125_000;

/// Per-stream configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Maximum payload bytes per block.
    pub block_size: usize,
    /// Ack window size in blocks.
    pub blocks_per_ack: u32,
    /// Cap on unacknowledged outbound bytes.
    pub max_buffer_size: usize,
    /// Lower clamp for the smoothed RTT.
    pub rtt_min: Duration,
    /// Upper clamp for the smoothed RTT.
    pub rtt_max: Duration,
    /// Outbound rate cap in bytes per second.
    pub send_rate_limit: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE,
            blocks_per_ack: BLOCKS_PER_ACK,
            max_buffer_size: MAX_BUFFER_SIZE,
            rtt_min: RTT_MIN_LIMIT,
            rtt_max: RTT_MAX_LIMIT,
            send_rate_limit: DEFAULT_SEND_RATE_LIMIT,
        }
    }
}
