//! Individual stream state and the reliability tick.
//!
//! A `Stream` is one logical reliable channel multiplexed over the
//! datagram transport. It owns its [`StreamConsumer`] (the data sink) and
//! [`StreamProducer`] (the transmission side) for its whole life; the
//! session layer that created it is the only caller of
//! `block_received` / `ack_received`.
//!
//! All outbound activity is driven by the reliability tick, a single
//! self-rescheduling logical timer per stream: its state is Idle (no
//! deadline) or Scheduled (exactly one deadline in `next_deadline()`).
//! The tick body is synchronous and takes an explicit `now`, so every
//! state transition here is testable without a runtime; `crate::driver`
//! turns the deadlines into real tokio sleeps.

use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::config::StreamConfig;
use crate::error::{MeshStreamError, Result};
use crate::frame::{AckFrame, BlockId, DataFrame};
use crate::input::InputPipeline;
use crate::output::OutputPipeline;
use crate::rtt::RttEstimator;

/// Stream identifier, assigned by the session layer.
pub type StreamId = u32;

/// Transmission side of the boundary: performs actual datagram sends.
///
/// Frames handed over here are the stream's own framing only; the
/// implementation prepends the outer datagram header.
pub trait StreamProducer: Send {
    /// Transmit a framed data block for the given stream.
    fn send_data(&mut self, stream_id: StreamId, frame: Bytes);
    /// Transmit a framed acknowledgment for the given stream.
    fn send_ack(&mut self, stream_id: StreamId, frame: Bytes);
    /// No block has arrived for too long while acks are owed: the peer is
    /// presumed gone for inbound traffic.
    fn on_timeout_receiving(&mut self, stream_id: StreamId);
}

/// Data sink side of the boundary: receives reassembled bytes and
/// lifecycle signals.
pub trait StreamConsumer: Send {
    /// Deliver reassembled, in-order bytes. Returns `true` when this
    /// delivery completes the stream (end of stream).
    fn on_received_raw_data(&mut self, data: Bytes) -> bool;
    /// `byte_count` outgoing bytes were acknowledged by the peer.
    fn on_sent_raw_data(&mut self, byte_count: usize);
    /// No ack has arrived for too long while blocks are in flight.
    fn on_timeout_sending(&mut self);
    /// The peer sent a zero-ack; `dropped_bytes` of unacknowledged output
    /// were abandoned.
    fn on_zero_ack(&mut self, dropped_bytes: usize);
    /// Total stream length declared by the application, used to detect
    /// end of stream on the sending side.
    fn size(&self) -> u64;
}

/// Snapshot of a stream's transfer counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamStats {
    pub blocks_sent: u64,
    pub blocks_received: u64,
    pub acks_sent: u64,
    pub acks_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub bytes_acked: u64,
    pub bytes_resent: u64,
    pub ack_bytes_sent: u64,
    pub duplicate_blocks: u64,
    pub duplicate_bytes: u64,
    pub output_buffer_size: usize,
    pub delivered_block_id: BlockId,
}

/// One reliable stream over the datagram transport.
pub struct Stream {
    id: StreamId,
    config: StreamConfig,
    /// Detached on close; every operation afterwards fails with
    /// `StreamDetached` instead of raising further.
    consumer: Option<Box<dyn StreamConsumer>>,
    producer: Option<Box<dyn StreamProducer>>,
    output: OutputPipeline,
    input: InputPipeline,
    rtt: RttEstimator,
    /// All times below are relative to this creation instant.
    created: Instant,
    /// When the pending-ack set was last flushed to the wire; `None`
    /// until the first flush, which makes the very first received block
    /// count as overdue and ack immediately.
    last_ack_flush: Option<Duration>,
    /// When a (non-empty) ack frame last arrived.
    last_ack_received: Duration,
    /// When a data block last arrived.
    last_block_received: Duration,
    /// Consecutive ticks that performed no work; drives backoff.
    inactivity: u32,
    /// Scheduled state of the reliability tick; `None` = idle.
    next_tick: Option<Instant>,
    acks_sent: u64,
    acks_received: u64,
    ack_bytes_sent: u64,
}

impl Stream {
    /// Create a stream bound to its consumer/producer pair. The tick
    /// starts idle; the first write or received block arms it.
    pub fn new(
        id: StreamId,
        config: StreamConfig,
        consumer: Box<dyn StreamConsumer>,
        producer: Box<dyn StreamProducer>,
        now: Instant,
    ) -> Self {
        let rtt = RttEstimator::new(config.rtt_min, config.rtt_max);
        Self {
            id,
            config,
            consumer: Some(consumer),
            producer: Some(producer),
            output: OutputPipeline::new(),
            input: InputPipeline::new(),
            rtt,
            created: now,
            last_ack_flush: None,
            last_ack_received: Duration::ZERO,
            last_block_received: Duration::ZERO,
            inactivity: 0,
            next_tick: None,
            acks_sent: 0,
            acks_received: 0,
            ack_bytes_sent: 0,
        }
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn stats(&self) -> StreamStats {
        StreamStats {
            blocks_sent: self.output.blocks_sent(),
            blocks_received: self.input.blocks_received(),
            acks_sent: self.acks_sent,
            acks_received: self.acks_received,
            bytes_sent: self.output.bytes_sent(),
            bytes_received: self.input.bytes_received(),
            bytes_acked: self.output.bytes_acked(),
            bytes_resent: self.output.bytes_resent(),
            ack_bytes_sent: self.ack_bytes_sent,
            duplicate_blocks: self.input.duplicate_blocks(),
            duplicate_bytes: self.input.duplicate_bytes(),
            output_buffer_size: self.output.buffer_size(),
            delivered_block_id: self.input.delivered_block_id(),
        }
    }

    /// The tick's scheduled deadline, or `None` when idle.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    pub fn is_scheduled(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn rtt(&self) -> &RttEstimator {
        &self.rtt
    }

    fn relative(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created)
    }

    /// Enqueue `data` for reliable delivery.
    ///
    /// Fails with `BufferOverflow` (no state mutated) when the write would
    /// push unacknowledged output past the buffer cap. On success the
    /// reliability tick runs immediately so sending starts without
    /// waiting for the next scheduled deadline.
    pub fn write(&mut self, data: Bytes, now: Instant) -> Result<()> {
        if self.consumer.is_none() {
            return Err(MeshStreamError::StreamDetached(self.id));
        }
        self.output.write(data, &self.config)?;
        self.tick(now);
        Ok(())
    }

    /// Handle an inbound data frame routed here by the session layer.
    pub fn block_received(&mut self, frame: &[u8], now: Instant) -> Result<()> {
        if self.consumer.is_none() {
            return Err(MeshStreamError::StreamDetached(self.id));
        }
        let frame = DataFrame::decode(frame)?;
        let rel = self.relative(now);
        let block_id = frame.block_id;
        if self.input.store(block_id, frame.payload) {
            tracing::debug!(stream_id = self.id, block_id, "duplicate block received");
        }
        self.last_block_received = rel;
        let mut eof = false;
        if let Some(assembled) = self.input.pop_contiguous() {
            if let Some(consumer) = self.consumer.as_mut() {
                eof = consumer.on_received_raw_data(assembled);
            }
        }
        // The first block of each ack window, a stale (or never-done) ack
        // flush, or end of stream all warrant acking right now instead of
        // next tick.
        let ack_stale = self
            .last_ack_flush
            .map_or(true, |flushed| rel.saturating_sub(flushed) > self.config.rtt_max);
        let window_start = block_id % self.config.blocks_per_ack == 1;
        if ack_stale || window_start || eof {
            self.tick(now);
        }
        Ok(())
    }

    /// Handle an inbound ack frame routed here by the session layer.
    ///
    /// A non-empty ack retires the listed blocks, feeds the RTT average,
    /// and re-arms the tick immediately. An empty frame is the zero-ack
    /// abort: retransmission stops and all outstanding output is dropped.
    pub fn ack_received(&mut self, frame: &[u8], now: Instant) -> Result<()> {
        if self.consumer.is_none() {
            return Err(MeshStreamError::StreamDetached(self.id));
        }
        let frame = AckFrame::decode(frame)?;
        let rel = self.relative(now);
        if frame.is_zero_ack() {
            self.stop();
            let dropped = self.output.flush_all();
            tracing::debug!(stream_id = self.id, dropped, "zero-ack received");
            if let Some(consumer) = self.consumer.as_mut() {
                consumer.on_zero_ack(dropped);
            }
            return Ok(());
        }
        for block_id in frame.block_ids {
            let Some((size, last_sent)) = self.output.ack(block_id) else {
                // Already acked or never ours; acks are idempotent.
                tracing::debug!(stream_id = self.id, block_id, "ack for unknown block");
                continue;
            };
            if let Some(sent_at) = last_sent {
                self.rtt.sample(rel.saturating_sub(sent_at));
            }
            if let Some(consumer) = self.consumer.as_mut() {
                consumer.on_sent_raw_data(size);
                if consumer.size() == self.output.bytes_acked() {
                    tracing::debug!(stream_id = self.id, "all outgoing bytes acknowledged");
                }
            }
        }
        self.acks_received += 1;
        self.last_ack_received = rel;
        self.tick(now);
        Ok(())
    }

    /// Transmit every block due at `now`: never-sent blocks always, sent
    /// blocks once their last transmission is older than
    /// `4 * blocks_per_ack * rtt`. Suppressed entirely while the achieved
    /// send rate exceeds the configured cap. Returns whether anything
    /// went out.
    pub fn send_blocks(&mut self, now: Instant) -> bool {
        if self.producer.is_none() {
            return false;
        }
        let rel = self.relative(now);
        let rtt = self.rtt.current();
        let batch = self.output.take_sendable(rel, rtt, &self.config);
        if batch.is_empty() {
            return false;
        }
        if let Some(producer) = self.producer.as_mut() {
            for (block_id, payload) in batch {
                let frame = DataFrame { block_id, payload };
                producer.send_data(self.id, frame.encode());
            }
        }
        true
    }

    /// Flush the pending-ack set to the wire, split into frames that fit
    /// the datagram budget. Returns whether anything was flushed; with
    /// nothing pending no frame goes out, since an empty ack frame is the
    /// zero-ack abort and must never be sent by accident.
    pub fn send_ack(&mut self, now: Instant) -> bool {
        let Some(producer) = self.producer.as_mut() else {
            return false;
        };
        let pending = self.input.take_pending_acks();
        if pending.is_empty() {
            return false;
        }
        for ids in pending.chunks(crate::config::MAX_ACK_IDS_PER_FRAME) {
            let frame = AckFrame {
                block_ids: ids.to_vec(),
            };
            producer.send_ack(self.id, frame.encode());
            self.acks_sent += 1;
            self.ack_bytes_sent += frame.encoded_len() as u64;
        }
        self.last_ack_flush = Some(self.relative(now));
        true
    }

    /// Run the reliability tick body once and reschedule.
    ///
    /// In order: flush acks if one is due, signal a receive-side timeout
    /// if blocks stopped arriving, (re)send due output blocks, signal a
    /// send-side timeout if acks stopped arriving. Real work resets the
    /// inactivity counter; otherwise it grows, backing the next deadline
    /// off exponentially (`rtt * inactivity * 2`).
    ///
    /// The timeout checks are scoped to the direction that is actually
    /// active, so an idle stream never signals spuriously.
    pub fn tick(&mut self, now: Instant) {
        if self.consumer.is_none() || self.producer.is_none() {
            self.next_tick = None;
            return;
        }
        let rel = self.relative(now);
        let rtt = self.rtt.current();
        let mut activity = false;
        if self.input.has_pending_acks() {
            let flush_due = self
                .last_ack_flush
                .map_or(true, |flushed| rel.saturating_sub(flushed) > rtt);
            if flush_due {
                activity |= self.send_ack(now);
            }
            if rel.saturating_sub(self.last_block_received) > self.config.rtt_max * 2 {
                if let Some(producer) = self.producer.as_mut() {
                    producer.on_timeout_receiving(self.id);
                }
            }
        }
        if !self.output.is_empty() {
            activity |= self.send_blocks(now);
            if rel.saturating_sub(self.last_ack_received) > self.config.rtt_max * 4 {
                if let Some(consumer) = self.consumer.as_mut() {
                    consumer.on_timeout_sending();
                }
            }
        }
        if activity {
            self.inactivity = 0;
        } else {
            self.inactivity += 1;
        }
        self.next_tick = Some(now + rtt * self.inactivity * 2);
    }

    /// Cancel the pending tick; the stream goes idle until the next
    /// write, block, or ack arms it again.
    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    /// Tear the stream down: cancel the tick, clear both pipelines, and
    /// detach the consumer/producer pair. Terminal.
    pub fn close(&mut self) {
        self.stop();
        let stats = self.stats();
        tracing::debug!(stream_id = self.id, ?stats, "stream closed");
        self.output.clear();
        self.input.clear();
        self.consumer = None;
        self.producer = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::Arc;

    use parking_lot::Mutex;

    #[derive(Debug, Default)]
    pub(crate) struct WireLog {
        pub data_frames: Vec<Bytes>,
        pub ack_frames: Vec<Bytes>,
        pub receive_timeouts: usize,
    }

    /// Producer that records every frame instead of touching a socket.
    #[derive(Clone, Default)]
    pub(crate) struct TestProducer(pub Arc<Mutex<WireLog>>);

    impl StreamProducer for TestProducer {
        fn send_data(&mut self, _stream_id: StreamId, frame: Bytes) {
            self.0.lock().data_frames.push(frame);
        }
        fn send_ack(&mut self, _stream_id: StreamId, frame: Bytes) {
            self.0.lock().ack_frames.push(frame);
        }
        fn on_timeout_receiving(&mut self, _stream_id: StreamId) {
            self.0.lock().receive_timeouts += 1;
        }
    }

    #[derive(Debug, Default)]
    pub(crate) struct SinkLog {
        pub received: Vec<Bytes>,
        pub acked_calls: Vec<usize>,
        pub send_timeouts: usize,
        pub zero_acks: Vec<usize>,
    }

    /// Consumer that records deliveries; reports end of stream once the
    /// declared size has arrived.
    #[derive(Clone)]
    pub(crate) struct TestConsumer {
        pub size: u64,
        pub log: Arc<Mutex<SinkLog>>,
    }

    impl TestConsumer {
        pub(crate) fn new(size: u64) -> Self {
            Self {
                size,
                log: Arc::default(),
            }
        }
    }

    impl StreamConsumer for TestConsumer {
        fn on_received_raw_data(&mut self, data: Bytes) -> bool {
            let mut log = self.log.lock();
            log.received.push(data);
            let total: usize = log.received.iter().map(|b| b.len()).sum();
            total as u64 >= self.size
        }
        fn on_sent_raw_data(&mut self, byte_count: usize) {
            self.log.lock().acked_calls.push(byte_count);
        }
        fn on_timeout_sending(&mut self) {
            self.log.lock().send_timeouts += 1;
        }
        fn on_zero_ack(&mut self, dropped_bytes: usize) {
            self.log.lock().zero_acks.push(dropped_bytes);
        }
        fn size(&self) -> u64 {
            self.size
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn make_stream(size: u64) -> (Stream, TestConsumer, TestProducer, Instant) {
        let consumer = TestConsumer::new(size);
        let producer = TestProducer::default();
        let t0 = Instant::now();
        let stream = Stream::new(
            1,
            StreamConfig::default(),
            Box::new(consumer.clone()),
            Box::new(producer.clone()),
            t0,
        );
        (stream, consumer, producer, t0)
    }

    #[test]
    fn write_sends_immediately() {
        let (mut stream, _consumer, producer, t0) = make_stream(1000);
        stream.write(Bytes::from(vec![b'x'; 1000]), t0).unwrap();

        let wire = producer.0.lock();
        assert_eq!(wire.data_frames.len(), 3);
        let first = DataFrame::decode(&wire.data_frames[0]).unwrap();
        assert_eq!(first.block_id, 1);
        assert_eq!(first.payload.len(), 494);
        // Busy tick reschedules without delay.
        assert_eq!(stream.next_deadline(), Some(t0));
    }

    #[test]
    fn idle_tick_backs_off_exponentially() {
        let (mut stream, _consumer, _producer, t0) = make_stream(0);
        stream.tick(t0);
        // rtt floor is 2ms; one idle tick -> deadline 2ms * 1 * 2 away.
        assert_eq!(stream.next_deadline(), Some(t0 + ms(4)));
        stream.tick(t0 + ms(4));
        assert_eq!(stream.next_deadline(), Some(t0 + ms(4) + ms(8)));
    }

    #[test]
    fn ack_retires_blocks_and_feeds_rtt() {
        let (mut stream, consumer, _producer, t0) = make_stream(1000);
        stream.write(Bytes::from(vec![b'x'; 1000]), t0).unwrap();

        let ack = AckFrame {
            block_ids: vec![1, 2, 3],
        };
        stream.ack_received(&ack.encode(), t0 + ms(50)).unwrap();

        assert_eq!(consumer.log.lock().acked_calls, vec![494, 494, 12]);
        assert_eq!(stream.stats().bytes_acked, 1000);
        assert_eq!(stream.stats().output_buffer_size, 0);
        // Three 50ms samples folded onto the 2ms seed: (2 + 150) / 4.
        assert_eq!(stream.rtt().current(), ms(38));
        assert!(stream.is_scheduled());
    }

    #[test]
    fn repeated_ack_is_noop() {
        let (mut stream, consumer, _producer, t0) = make_stream(1000);
        stream.write(Bytes::from(vec![b'x'; 1000]), t0).unwrap();

        let ack = AckFrame { block_ids: vec![1] }.encode();
        stream.ack_received(&ack, t0 + ms(10)).unwrap();
        stream.ack_received(&ack, t0 + ms(20)).unwrap();

        assert_eq!(consumer.log.lock().acked_calls, vec![494]);
        assert_eq!(stream.stats().bytes_acked, 494);
    }

    #[test]
    fn zero_ack_aborts_outstanding_output() {
        let (mut stream, consumer, _producer, t0) = make_stream(1000);
        stream.write(Bytes::from(vec![b'x'; 1000]), t0).unwrap();
        assert!(stream.is_scheduled());

        stream.ack_received(&[], t0 + ms(10)).unwrap();

        assert_eq!(consumer.log.lock().zero_acks, vec![1000]);
        assert_eq!(stream.stats().output_buffer_size, 0);
        assert_eq!(stream.stats().bytes_acked, 1000);
        assert!(!stream.is_scheduled());
    }

    #[test]
    fn first_window_block_acked_immediately() {
        let (mut stream, _consumer, producer, t0) = make_stream(494);
        let frame = DataFrame {
            block_id: 1,
            payload: Bytes::from(vec![b'y'; 494]),
        };
        stream.block_received(&frame.encode(), t0 + ms(10)).unwrap();

        let wire = producer.0.lock();
        assert_eq!(wire.ack_frames.len(), 1);
        let ack = AckFrame::decode(&wire.ack_frames[0]).unwrap();
        assert_eq!(ack.block_ids, vec![1]);
    }

    #[test]
    fn first_block_always_arms_tick_and_acks() {
        // Even a non-window-start first block (block 1 was lost) must
        // flush its ack and schedule the tick right away, or the sender
        // is left to retransmit the whole window blind.
        let (mut stream, _consumer, producer, t0) = make_stream(10_000);
        let frame = DataFrame {
            block_id: 2,
            payload: Bytes::from_static(b"zz"),
        };
        stream.block_received(&frame.encode(), t0 + ms(10)).unwrap();

        assert!(stream.next_deadline().is_some());
        let wire = producer.0.lock();
        assert_eq!(wire.ack_frames.len(), 1);
        assert_eq!(
            AckFrame::decode(&wire.ack_frames[0]).unwrap().block_ids,
            vec![2]
        );
    }

    #[test]
    fn mid_window_block_defers_ack() {
        let (mut stream, _consumer, producer, t0) = make_stream(10_000);
        let first = DataFrame {
            block_id: 1,
            payload: Bytes::from_static(b"aa"),
        };
        stream.block_received(&first.encode(), t0 + ms(10)).unwrap();
        assert_eq!(producer.0.lock().ack_frames.len(), 1);

        // A mid-window block shortly after a flush waits for the tick.
        let second = DataFrame {
            block_id: 2,
            payload: Bytes::from_static(b"zz"),
        };
        stream.block_received(&second.encode(), t0 + ms(11)).unwrap();
        assert_eq!(producer.0.lock().ack_frames.len(), 1);

        stream.tick(t0 + ms(20));
        let wire = producer.0.lock();
        assert_eq!(wire.ack_frames.len(), 2);
        assert_eq!(
            AckFrame::decode(&wire.ack_frames[1]).unwrap().block_ids,
            vec![2]
        );
    }

    #[test]
    fn receive_timeout_signals_producer() {
        let (mut stream, _consumer, producer, t0) = make_stream(10_000);
        let first = DataFrame {
            block_id: 2,
            payload: Bytes::from_static(b"zz"),
        };
        stream.block_received(&first.encode(), t0 + ms(10)).unwrap();
        // A second block keeps an ack owed past the flush above.
        let second = DataFrame {
            block_id: 3,
            payload: Bytes::from_static(b"ww"),
        };
        stream.block_received(&second.encode(), t0 + ms(20)).unwrap();

        // No further blocks for well over 2 * rtt_max.
        stream.tick(t0 + ms(2000));
        assert_eq!(producer.0.lock().receive_timeouts, 1);
    }

    #[test]
    fn flush_with_nothing_pending_sends_no_frame() {
        // An empty ack frame is the zero-ack abort; it must never leak
        // out of an ordinary flush.
        let (mut stream, _consumer, producer, t0) = make_stream(0);
        assert!(!stream.send_ack(t0));
        assert!(producer.0.lock().ack_frames.is_empty());
        assert_eq!(stream.stats().acks_sent, 0);
    }

    #[test]
    fn large_pending_set_flushed_in_datagram_sized_frames() {
        let (mut stream, _consumer, producer, t0) = make_stream(1_000_000);
        for id in 1..=130u32 {
            let frame = DataFrame {
                block_id: id,
                payload: Bytes::from_static(b"b"),
            };
            stream.block_received(&frame.encode(), t0 + ms(10)).unwrap();
        }
        // Block 1 was acked on arrival; the other 129 ids flush here and
        // must be split so no frame outgrows the datagram budget.
        stream.tick(t0 + ms(50));

        let wire = producer.0.lock();
        assert_eq!(wire.ack_frames.len(), 3);
        for frame in &wire.ack_frames {
            assert!(frame.len() <= crate::config::MAX_ACK_IDS_PER_FRAME * 4);
        }
        let second = AckFrame::decode(&wire.ack_frames[1]).unwrap();
        let third = AckFrame::decode(&wire.ack_frames[2]).unwrap();
        assert_eq!(second.block_ids, (2..=124).collect::<Vec<_>>());
        assert_eq!(third.block_ids, (125..=130).collect::<Vec<_>>());
        assert_eq!(stream.stats().acks_sent, 3);
    }

    #[test]
    fn send_timeout_signals_consumer() {
        let (mut stream, consumer, _producer, t0) = make_stream(1000);
        stream.write(Bytes::from(vec![b'x'; 1000]), t0).unwrap();

        // No ack for well over 4 * rtt_max.
        stream.tick(t0 + ms(3000));
        assert_eq!(consumer.log.lock().send_timeouts, 1);
    }

    #[test]
    fn malformed_frames_are_errors_not_panics() {
        let (mut stream, _consumer, _producer, t0) = make_stream(0);
        assert!(matches!(
            stream.block_received(&[1, 2], t0),
            Err(MeshStreamError::FrameTooShort { .. })
        ));
        assert!(matches!(
            stream.ack_received(&[1, 2, 3], t0),
            Err(MeshStreamError::AckFrameLength(3))
        ));
    }

    #[test]
    fn closed_stream_rejects_operations() {
        let (mut stream, _consumer, _producer, t0) = make_stream(0);
        stream.close();
        assert!(matches!(
            stream.write(Bytes::from_static(b"x"), t0),
            Err(MeshStreamError::StreamDetached(1))
        ));
        assert!(matches!(
            stream.block_received(&[0, 0, 0, 1], t0),
            Err(MeshStreamError::StreamDetached(1))
        ));
        assert!(!stream.is_scheduled());
    }
}
