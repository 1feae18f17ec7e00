//! Transport contract and the paced network delivery thread.
//!
//! The pipeline never frames bytes itself; it hands immutable frame packets
//! to a [`Transport`] implementation owned by the host. The built-in network
//! thread consumes at most one snapshot per pacing slot, so a stalled
//! transport backs up into dropped frames rather than blocked UI ticks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use thiserror::Error;

use porthole_shared::ClientEvent;

use crate::channel::TripleReader;
use crate::pipeline::DrawSnapshot;

/// Delivery rate of the network thread, in frames per second.
pub const NET_FRAME_RATE: f64 = 30.0;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport endpoint closed")]
    Closed,
    #[error("transport i/o: {0}")]
    Io(String),
}

/// One outbound frame: the draw snapshot plus any clipboard text copied by
/// the UI since the previous frame (empty otherwise).
pub struct FramePacket {
    pub snapshot: DrawSnapshot,
    pub clipboard: String,
}

/// Host-owned transport endpoint. Implementations handle connection
/// accounting, event decoding and frame encoding; the pipeline only sees
/// this surface.
pub trait Transport: Send + Sync {
    /// Number of currently connected viewers. Zero skips UI frames entirely.
    fn connection_count(&self) -> usize;

    /// Take every event received since the last call, in arrival order.
    fn drain_events(&self) -> Vec<ClientEvent>;

    /// Deliver one frame to all connected viewers.
    fn publish_frame(&self, frame: &FramePacket) -> Result<(), TransportError>;
}

/// Fixed-rate sleeper for the network thread. Sleeps in 90% steps of the
/// remaining slot time so wakeup lands close to the boundary without a
/// busy-wait.
pub struct FramePacer {
    step: Duration,
    next: Instant,
    last: Instant,
}

impl FramePacer {
    pub fn new(rate: f64) -> Self {
        let now = Instant::now();
        Self {
            step: Duration::from_secs_f64(1.0 / rate),
            next: now + Duration::from_secs_f64(1.0 / rate),
            last: now,
        }
    }

    /// Sleep until the next slot boundary, then advance it. After a stall the
    /// missed slots are dropped, not replayed: the boundary re-anchors to the
    /// present instead of burning through the backlog at full speed.
    pub fn wait(&mut self) {
        loop {
            let now = Instant::now();
            let remaining = self.next.saturating_duration_since(now);
            if remaining <= Duration::from_micros(100) {
                break;
            }
            std::thread::sleep(remaining.mul_f64(0.9));
        }
        self.next += self.step;
        let now = Instant::now();
        if self.next < now {
            self.next = now + self.step;
        }
    }

    /// Seconds since the previous call.
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

/// Spawn the paced delivery thread. Each slot it forwards at most one fresh
/// snapshot (with any pending clipboard text) to the transport; idle slots
/// just sleep. Stops when `shutdown` is raised, dropping undelivered frames.
pub fn spawn_network_thread(
    transport: Arc<dyn Transport>,
    mut draw_rx: TripleReader<DrawSnapshot>,
    mut clip_rx: TripleReader<String>,
    shutdown: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("porthole-net".into())
        .spawn(move || {
            let mut pacer = FramePacer::new(NET_FRAME_RATE);
            while !shutdown.load(Ordering::Relaxed) {
                if let Some(snapshot) = draw_rx.take() {
                    let packet = FramePacket {
                        snapshot,
                        clipboard: clip_rx.take().unwrap_or_default(),
                    };
                    if let Err(err) = transport.publish_frame(&packet) {
                        log::warn!("frame delivery failed: {err}");
                    }
                }
                pacer.wait();
            }
            log::debug!("network thread stopped");
        })
        .expect("spawn porthole-net thread")
}
