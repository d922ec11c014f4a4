//! MeshStream -- reliable, ordered byte streams over unreliable datagrams.
//!
//! A Mesh node exchanges encrypted data blocks with its peers over
//! pluggable datagram transports that may drop, duplicate, or reorder
//! packets. MeshStream converts that into an in-order, duplicate-free,
//! lossless byte stream: a minimal TCP in user space, one logical stream
//! per [`Stream`] instance, multiplexed by a [`Session`].
//!
//! The engine is deliberately synchronous and timer-driven: every entry
//! point takes an explicit `Instant`, so the whole state machine is
//! unit-testable without a runtime. The [`driver`] module supplies real
//! time and tokio sleeping for production use.

pub mod config;
pub mod driver;
pub mod error;
pub mod frame;
pub mod input;
pub mod output;
pub mod rtt;
pub mod session;
pub mod stream;

// Re-export key public types at crate root.
pub use config::StreamConfig;
pub use driver::{PumpHandle, TickPump};
pub use error::{MeshStreamError, Result};
pub use frame::{AckFrame, BlockId, DataFrame};
pub use rtt::RttEstimator;
pub use session::Session;
pub use stream::{Stream, StreamConsumer, StreamId, StreamProducer, StreamStats};
