//! Session boundary: owns the stream table and demultiplexes inbound
//! frames.
//!
//! One `Session` per peer. It owns every `Stream` it opened (keyed by
//! stream id) and is the only caller of `block_received` /
//! `ack_received`; the datagram layer above it strips the outer header
//! and hands over `(stream_id, payload)` pairs. There is no process-wide
//! stream registry -- all routing state lives here.

use std::collections::HashMap;
use std::time::Instant;

use bytes::Bytes;

use crate::config::StreamConfig;
use crate::error::{MeshStreamError, Result};
use crate::stream::{Stream, StreamConsumer, StreamId, StreamProducer};

/// Owner of all streams multiplexed over one datagram session.
pub struct Session {
    streams: HashMap<StreamId, Stream>,
    config: StreamConfig,
}

impl Session {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            streams: HashMap::new(),
            config,
        }
    }

    /// Open a stream under an explicit id (ids are negotiated by the
    /// command layer during the session handshake).
    pub fn open_stream(
        &mut self,
        id: StreamId,
        consumer: Box<dyn StreamConsumer>,
        producer: Box<dyn StreamProducer>,
        now: Instant,
    ) -> Result<()> {
        if self.streams.contains_key(&id) {
            return Err(MeshStreamError::StreamAlreadyExists(id));
        }
        let stream = Stream::new(id, self.config.clone(), consumer, producer, now);
        self.streams.insert(id, stream);
        Ok(())
    }

    /// Enqueue `data` on the given stream for reliable delivery.
    pub fn write(&mut self, id: StreamId, data: Bytes, now: Instant) -> Result<()> {
        self.stream_entry(id)?.write(data, now)
    }

    /// Route an inbound data-frame payload to its stream.
    pub fn data_received(&mut self, id: StreamId, frame: &[u8], now: Instant) -> Result<()> {
        let result = self.stream_entry(id)?.block_received(frame, now);
        if let Err(err) = &result {
            tracing::warn!(stream_id = id, %err, "dropping data frame");
        }
        result
    }

    /// Route an inbound ack-frame payload to its stream.
    pub fn ack_received(&mut self, id: StreamId, frame: &[u8], now: Instant) -> Result<()> {
        let result = self.stream_entry(id)?.ack_received(frame, now);
        if let Err(err) = &result {
            tracing::warn!(stream_id = id, %err, "dropping ack frame");
        }
        result
    }

    /// Close and remove a stream: its tick is cancelled, buffers cleared,
    /// consumer/producer detached. Subsequent operations on the id fail
    /// with `StreamNotFound`.
    pub fn close_stream(&mut self, id: StreamId) -> Result<()> {
        let mut stream = self
            .streams
            .remove(&id)
            .ok_or(MeshStreamError::StreamNotFound(id))?;
        stream.close();
        Ok(())
    }

    /// Run every tick whose deadline has passed and return the earliest
    /// deadline still scheduled, for the driver to sleep until.
    pub fn poll(&mut self, now: Instant) -> Option<Instant> {
        for stream in self.streams.values_mut() {
            if matches!(stream.next_deadline(), Some(deadline) if deadline <= now) {
                stream.tick(now);
            }
        }
        self.streams
            .values()
            .filter_map(|s| s.next_deadline())
            .min()
    }

    pub fn stream(&self, id: StreamId) -> Option<&Stream> {
        self.streams.get(&id)
    }

    pub fn stream_mut(&mut self, id: StreamId) -> Option<&mut Stream> {
        self.streams.get_mut(&id)
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    fn stream_entry(&mut self, id: StreamId) -> Result<&mut Stream> {
        self.streams
            .get_mut(&id)
            .ok_or(MeshStreamError::StreamNotFound(id))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(StreamConfig::default())
    }
}
