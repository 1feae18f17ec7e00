//! Remote frame pipeline
//!
//! One [`RemotePipeline`] per serving process. Each host tick it drains
//! transport events into the session table, runs one egui frame with the
//! accepted input, and publishes the resulting draw snapshot through the
//! triple-buffer channel to the paced network thread. When nobody is
//! connected the whole frame is skipped.

mod input;
mod session;
mod snapshot;

pub use session::{ClientSession, DEFAULT_CONTROL_DWELL, Sessions};
pub use snapshot::DrawSnapshot;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::channel::{TripleReader, TripleWriter, triple_buffer};
use crate::net::{self, Transport};
use crate::panel::PanelRegistry;

/// Lifecycle of a pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Constructed, network thread not yet running.
    Uninitialized,
    /// Ticking and serving frames.
    Running,
    /// Shutdown requested, waiting for the network thread to exit.
    ShuttingDown,
    /// Fully stopped; the instance is inert.
    Destroyed,
}

type DrawDelegate = Box<dyn FnMut(&egui::Context, f32)>;

/// Owns the egui context and everything that feeds it: session arbitration,
/// registered panels, external draw delegates, and the snapshot channel.
pub struct RemotePipeline {
    ctx: egui::Context,
    state: PipelineState,
    sessions: Sessions,
    panels: PanelRegistry,
    transport: Arc<dyn Transport>,
    draw_tx: TripleWriter<DrawSnapshot>,
    clip_tx: TripleWriter<String>,
    readers: Option<(TripleReader<DrawSnapshot>, TripleReader<String>)>,
    shutdown: Arc<AtomicBool>,
    net_thread: Option<std::thread::JoinHandle<()>>,
    started: Instant,
    draw_delegates: Vec<DrawDelegate>,
}

impl RemotePipeline {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (draw_tx, draw_rx) = triple_buffer();
        let (clip_tx, clip_rx) = triple_buffer();
        Self {
            ctx: egui::Context::default(),
            state: PipelineState::Uninitialized,
            sessions: Sessions::new(),
            panels: PanelRegistry::new(),
            transport,
            draw_tx,
            clip_tx,
            readers: Some((draw_rx, clip_rx)),
            shutdown: Arc::new(AtomicBool::new(false)),
            net_thread: None,
            started: Instant::now(),
            draw_delegates: Vec::new(),
        }
    }

    /// Register host UI drawn every frame after the built-in menu and panels.
    pub fn add_draw_delegate(&mut self, delegate: impl FnMut(&egui::Context, f32) + 'static) {
        self.draw_delegates.push(Box::new(delegate));
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut Sessions {
        &mut self.sessions
    }

    pub fn panels_mut(&mut self) -> &mut PanelRegistry {
        &mut self.panels
    }

    /// The shared egui context, for host code that installs fonts or styles
    /// before the first frame.
    pub fn egui_ctx(&self) -> &egui::Context {
        &self.ctx
    }

    /// Take the snapshot/clipboard consumer ends instead of spawning the
    /// built-in network thread, for hosts that run their own delivery loop.
    /// Must be called before [`RemotePipeline::start`].
    pub fn take_readers(
        &mut self,
    ) -> Option<(TripleReader<DrawSnapshot>, TripleReader<String>)> {
        self.readers.take()
    }

    /// Transition to Running. Spawns the paced network thread unless the
    /// readers were taken by the host.
    pub fn start(&mut self) {
        if self.state != PipelineState::Uninitialized {
            return;
        }
        if let Some((draw_rx, clip_rx)) = self.readers.take() {
            self.net_thread = Some(net::spawn_network_thread(
                self.transport.clone(),
                draw_rx,
                clip_rx,
                self.shutdown.clone(),
            ));
        }
        self.state = PipelineState::Running;
        log::info!("remote pipeline running");
    }

    /// Run one frame: drain transport events, arbitrate control, feed egui,
    /// publish the snapshot. Skipped entirely while nobody is connected.
    pub fn tick(&mut self, dt: f32) {
        if self.state != PipelineState::Running {
            return;
        }
        if self.transport.connection_count() == 0 {
            return;
        }

        let now = self.started.elapsed().as_secs_f64();
        for event in self.transport.drain_events() {
            self.sessions.handle(event);
        }
        let handover = self.sessions.update(now);
        let events = self.sessions.take_events(handover);
        let viewport = self.sessions.viewport();

        let raw = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, viewport)),
            time: Some(now),
            predicted_dt: dt,
            modifiers: self.sessions.modifiers(),
            events,
            ..Default::default()
        };

        let ctx = self.ctx.clone();
        let full = ctx.run(raw, |ctx| {
            self.menu_bar(ctx, now);
            self.panels.draw(ctx, dt);
            for delegate in &mut self.draw_delegates {
                delegate(ctx, dt);
            }
        });

        for command in full.platform_output.commands {
            if let egui::OutputCommand::CopyText(text) = command {
                self.clip_tx.publish(text);
            }
        }

        let pointer = self.ctx.input(|i| i.pointer.latest_pos());
        self.draw_tx.publish(DrawSnapshot {
            shapes: full.shapes,
            textures_delta: full.textures_delta,
            pixels_per_point: full.pixels_per_point,
            cursor: full.platform_output.cursor_icon,
            control: self.sessions.control_id(),
            pointer,
            viewport,
        });
    }

    /// Stop serving: signal the network thread, join it, and go inert.
    /// Snapshots not yet delivered are dropped.
    pub fn shutdown(&mut self) {
        if matches!(self.state, PipelineState::Destroyed) {
            return;
        }
        self.state = PipelineState::ShuttingDown;
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.net_thread.take()
            && let Err(err) = handle.join()
        {
            log::error!("network thread panicked: {err:?}");
        }
        self.state = PipelineState::Destroyed;
        log::info!("remote pipeline stopped");
    }

    fn menu_bar(&mut self, ctx: &egui::Context, now: f64) {
        egui::TopBottomPanel::top("porthole_menu").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("Porthole", |ui| {
                    self.panels.menu_ui(ui);
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let count = self.sessions.client_count();
                    let label = ui.label(format!("Connections: {count}"));
                    let remaining = self.sessions.control_remaining(now);
                    label.on_hover_ui(|ui| {
                        for (id, session) in self.sessions.clients() {
                            if session.has_control {
                                ui.label(format!(
                                    "{id} : {} [control for {remaining:.1}s]",
                                    session.addr
                                ));
                            } else {
                                ui.label(format!("{id} : {}", session.addr));
                            }
                        }
                    });
                });
            });
        });
    }
}

impl Drop for RemotePipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use porthole_shared::{ClientEvent, ClientId};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeTransport {
        connections: std::sync::atomic::AtomicUsize,
        inbound: Mutex<Vec<ClientEvent>>,
        delivered: std::sync::atomic::AtomicUsize,
    }

    impl FakeTransport {
        fn connect(&self, id: u32) {
            self.connections.fetch_add(1, Ordering::Relaxed);
            self.inbound.lock().unwrap().push(ClientEvent::Connected {
                client: ClientId(id),
                addr: format!("10.0.0.{id}"),
            });
        }
    }

    impl Transport for FakeTransport {
        fn connection_count(&self) -> usize {
            self.connections.load(Ordering::Relaxed)
        }

        fn drain_events(&self) -> Vec<ClientEvent> {
            std::mem::take(&mut self.inbound.lock().unwrap())
        }

        fn publish_frame(&self, _frame: &crate::net::FramePacket) -> Result<(), crate::net::TransportError> {
            self.delivered.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    #[test]
    fn test_no_frame_without_connections() {
        let transport = Arc::new(FakeTransport::default());
        let mut pipeline = RemotePipeline::new(transport.clone());
        let (mut draw_rx, _clip_rx) = pipeline.take_readers().unwrap();
        pipeline.start();
        assert_eq!(pipeline.state(), PipelineState::Running);

        pipeline.tick(1.0 / 60.0);
        assert!(draw_rx.take().is_none());
    }

    #[test]
    fn test_tick_publishes_snapshot() {
        let transport = Arc::new(FakeTransport::default());
        let mut pipeline = RemotePipeline::new(transport.clone());
        let (mut draw_rx, _clip_rx) = pipeline.take_readers().unwrap();
        pipeline.start();

        transport.connect(1);
        pipeline.tick(1.0 / 60.0);

        let snapshot = draw_rx.take().expect("one frame published");
        assert_eq!(snapshot.control, Some(ClientId(1)));
        assert!(snapshot.pixels_per_point > 0.0);
        // One snapshot per tick, no redelivery.
        assert!(draw_rx.take().is_none());
    }

    #[test]
    fn test_uninitialized_pipeline_ignores_ticks() {
        let transport = Arc::new(FakeTransport::default());
        transport.connect(1);
        let mut pipeline = RemotePipeline::new(transport.clone());
        let (mut draw_rx, _clip_rx) = pipeline.take_readers().unwrap();

        pipeline.tick(1.0 / 60.0);
        assert_eq!(pipeline.state(), PipelineState::Uninitialized);
        assert!(draw_rx.take().is_none());
    }

    #[test]
    fn test_shutdown_reaches_destroyed() {
        let transport = Arc::new(FakeTransport::default());
        let mut pipeline = RemotePipeline::new(transport);
        pipeline.start();
        pipeline.shutdown();
        assert_eq!(pipeline.state(), PipelineState::Destroyed);
        // Idempotent.
        pipeline.shutdown();
        assert_eq!(pipeline.state(), PipelineState::Destroyed);
    }
}
