use thiserror::Error;

/// All errors produced by the MeshStream engine.
///
/// Only `BufferOverflow` is ever seen by a writer in steady state; frame
/// errors are caught at the session boundary, logged, and dropped, since
/// datagram corruption is an expected condition rather than a fault.
#[derive(Debug, Error)]
pub enum MeshStreamError {
    #[error("output buffer overflow: {buffered} buffered + {incoming} incoming exceeds {max}")]
    BufferOverflow {
        buffered: usize,
        incoming: usize,
        max: usize,
    },

    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort { expected: usize, actual: usize },

    #[error("ack frame length {0} is not a multiple of 4")]
    AckFrameLength(usize),

    #[error("stream {0} not found")]
    StreamNotFound(u32),

    #[error("stream {0} already exists")]
    StreamAlreadyExists(u32),

    #[error("stream {0} is detached")]
    StreamDetached(u32),
}

pub type Result<T> = std::result::Result<T, MeshStreamError>;
