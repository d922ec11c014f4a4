//! Tokio driver for the reliability ticks.
//!
//! The engine itself is synchronous; the only suspension point in the
//! whole design is the delay between one tick and the next. `TickPump`
//! supplies that delay: it polls the session's due ticks, then sleeps
//! until the earliest scheduled deadline (or an idle interval when no
//! stream has one). Everything stays on one task, so stream state is
//! never mutated concurrently.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::session::Session;

/// How long to sleep when no stream has a scheduled tick.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Drives a session's reliability ticks on a tokio runtime.
pub struct TickPump {
    session: Arc<Mutex<Session>>,
    shutdown: Arc<Notify>,
    wake: Arc<Notify>,
}

/// Handle for stopping or waking a running [`TickPump`].
#[derive(Clone)]
pub struct PumpHandle {
    shutdown: Arc<Notify>,
    wake: Arc<Notify>,
}

impl PumpHandle {
    /// Ask the pump to exit after its current iteration.
    pub fn stop(&self) {
        self.shutdown.notify_one();
    }

    /// Cut the pump's current sleep short so a freshly armed deadline is
    /// picked up. Call after writing to or dispatching frames into the
    /// session from another task; the sleep the pump computed before that
    /// state change may otherwise outlive the new deadline.
    pub fn wake(&self) {
        self.wake.notify_one();
    }
}

impl TickPump {
    pub fn new(session: Arc<Mutex<Session>>) -> Self {
        Self {
            session,
            shutdown: Arc::new(Notify::new()),
            wake: Arc::new(Notify::new()),
        }
    }

    pub fn handle(&self) -> PumpHandle {
        PumpHandle {
            shutdown: self.shutdown.clone(),
            wake: self.wake.clone(),
        }
    }

    /// Run until [`PumpHandle::stop`] is called.
    ///
    /// The session lock is held only while polling, never across a sleep,
    /// so writers and the datagram dispatcher are free to interleave;
    /// [`PumpHandle::wake`] re-polls immediately after such interleaving.
    pub async fn run(self) {
        loop {
            let now = Instant::now();
            let deadline = self.session.lock().poll(now);
            let delay = match deadline {
                Some(deadline) => deadline.saturating_duration_since(now),
                None => IDLE_POLL_INTERVAL,
            };
            tracing::trace!(?delay, "tick pump sleeping");
            tokio::select! {
                _ = self.shutdown.notified() => break,
                _ = self.wake.notified() => {}
                _ = tokio::time::sleep(delay) => {}
            }
        }
        tracing::debug!("tick pump stopped");
    }
}
