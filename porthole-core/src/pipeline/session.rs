//! Client sessions and control-token arbitration.
//!
//! Any number of remote viewers watch the same UI; exactly one holds the
//! control token and gets its input honored. The token rotates round-robin in
//! ascending client-id order, either when the dwell period expires or when the
//! holder disconnects. On every handover, synthetic release events are emitted
//! for whatever the previous holder still held down, so no key or button is
//! ever stuck pressed.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use porthole_shared::{ClientEvent, ClientId, keycode::web_key_name};

use super::input::{apply_modifier, web_button_to_egui, web_key_to_egui, web_modifier};

/// Dwell period before the token rotates to the next client, in seconds.
pub const DEFAULT_CONTROL_DWELL: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct ClientSession {
    pub addr: String,
    pub has_control: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum HeldInput {
    Key(egui::Key),
    Button(egui::PointerButton),
}

/// Connected-client table plus everything needed to fold the accepted input
/// of the current frame into egui events.
///
/// Time is injected by the caller so rotation is deterministic under test.
pub struct Sessions {
    clients: BTreeMap<ClientId, ClientSession>,
    control: Option<ClientId>,
    control_iteration: usize,
    dwell: f64,
    next_rotate_at: f64,
    pending: SmallVec<[ClientEvent; 16]>,
    held: SmallVec<[HeldInput; 16]>,
    last_pointer: egui::Pos2,
    modifiers: egui::Modifiers,
    viewport: egui::Vec2,
}

impl Sessions {
    pub fn new() -> Self {
        Self::with_dwell(DEFAULT_CONTROL_DWELL)
    }

    pub fn with_dwell(dwell: f64) -> Self {
        Self {
            clients: BTreeMap::new(),
            control: None,
            control_iteration: 0,
            dwell,
            next_rotate_at: 0.0,
            pending: SmallVec::new(),
            held: SmallVec::new(),
            last_pointer: egui::Pos2::ZERO,
            modifiers: egui::Modifiers::default(),
            viewport: egui::vec2(1280.0, 720.0),
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn clients(&self) -> impl Iterator<Item = (ClientId, &ClientSession)> {
        self.clients.iter().map(|(id, session)| (*id, session))
    }

    pub fn control_id(&self) -> Option<ClientId> {
        self.control
    }

    /// Seconds the current holder keeps the token, given the current time.
    pub fn control_remaining(&self, now: f64) -> f64 {
        (self.next_rotate_at - now).max(0.0)
    }

    pub fn viewport(&self) -> egui::Vec2 {
        self.viewport
    }

    pub fn modifiers(&self) -> egui::Modifiers {
        self.modifiers
    }

    /// Feed one inbound event. Lifecycle events always apply; input events
    /// are honored only when they come from the control-token holder.
    pub fn handle(&mut self, event: ClientEvent) {
        if let ClientEvent::Unknown { client, tag } = event {
            debug_assert!(false, "unknown event tag {tag} from client {client}");
            log::warn!("ignoring unknown event tag {tag} from client {client}");
            return;
        }
        if !event.is_lifecycle() && self.control != Some(event.client()) {
            log::trace!("dropping input from non-controlling client {}", event.client());
            return;
        }
        match event {
            ClientEvent::Connected { client, addr } => {
                log::info!("client {client} connected from {addr}");
                self.clients.insert(
                    client,
                    ClientSession {
                        addr,
                        has_control: false,
                    },
                );
            }
            ClientEvent::Disconnected { client } => {
                log::info!("client {client} disconnected");
                self.clients.remove(&client);
            }
            ClientEvent::Resize { width, height, .. } => {
                self.viewport = egui::vec2(width, height);
            }
            other => self.pending.push(other),
        }
    }

    /// Advance the rotation clock. Returns true when the token changed hands
    /// this call, which obliges the caller to collect the synthesized release
    /// events from [`Sessions::take_events`].
    pub fn update(&mut self, now: f64) -> bool {
        if self.clients.is_empty() {
            let lost = self.control.is_some();
            self.control = None;
            return lost;
        }

        let holder_gone = self
            .control
            .is_none_or(|id| !self.clients.contains_key(&id));
        if !holder_gone && now < self.next_rotate_at {
            return false;
        }

        if let Some(prev) = self.control
            && let Some(session) = self.clients.get_mut(&prev)
        {
            session.has_control = false;
        }

        self.control_iteration += 1;
        let index = self.control_iteration % self.clients.len();
        let (next_id, session) = self
            .clients
            .iter_mut()
            .nth(index)
            .unwrap_or_else(|| unreachable!("index is modulo the map length"));
        session.has_control = true;
        let next_id = *next_id;
        self.next_rotate_at = now + self.dwell;

        if self.control != Some(next_id) {
            log::debug!("control token -> client {next_id}");
            self.control = Some(next_id);
            true
        } else {
            false
        }
    }

    /// Drain this frame's accepted input as egui events. When `handover` is
    /// set, synthetic releases for everything the previous holder still held
    /// come first, so the new holder starts from a clean slate.
    pub fn take_events(&mut self, handover: bool) -> Vec<egui::Event> {
        let mut events = Vec::new();

        if handover {
            for held in std::mem::take(&mut self.held) {
                events.push(match held {
                    HeldInput::Key(key) => egui::Event::Key {
                        key,
                        physical_key: None,
                        pressed: false,
                        repeat: false,
                        modifiers: self.modifiers,
                    },
                    HeldInput::Button(button) => egui::Event::PointerButton {
                        pos: self.last_pointer,
                        button,
                        pressed: false,
                        modifiers: self.modifiers,
                    },
                });
            }
            self.modifiers = egui::Modifiers::default();
        }

        if self.control.is_none() {
            self.pending.clear();
            return events;
        }

        for event in std::mem::take(&mut self.pending) {
            self.translate(event, &mut events);
        }
        events
    }

    fn translate(&mut self, event: ClientEvent, out: &mut Vec<egui::Event>) {
        match event {
            ClientEvent::MouseMove { x, y, .. } => {
                self.last_pointer = egui::pos2(x, y);
                out.push(egui::Event::PointerMoved(self.last_pointer));
            }
            ClientEvent::MouseDown { x, y, button, .. } => {
                self.last_pointer = egui::pos2(x, y);
                if let Some(button) = web_button_to_egui(button) {
                    self.hold(HeldInput::Button(button));
                    out.push(egui::Event::PointerButton {
                        pos: self.last_pointer,
                        button,
                        pressed: true,
                        modifiers: self.modifiers,
                    });
                }
            }
            ClientEvent::MouseUp { x, y, button, .. } => {
                self.last_pointer = egui::pos2(x, y);
                if let Some(button) = web_button_to_egui(button) {
                    self.release(HeldInput::Button(button));
                    out.push(egui::Event::PointerButton {
                        pos: self.last_pointer,
                        button,
                        pressed: false,
                        modifiers: self.modifiers,
                    });
                }
            }
            ClientEvent::MouseWheel { dx, dy, .. } => {
                out.push(egui::Event::MouseWheel {
                    unit: egui::MouseWheelUnit::Point,
                    delta: egui::vec2(dx, dy),
                    modifiers: self.modifiers,
                });
            }
            ClientEvent::KeyDown { key_code, .. } => {
                if let Some(modifier) = web_modifier(key_code) {
                    apply_modifier(&mut self.modifiers, modifier, true);
                } else if let Some(key) = web_key_to_egui(key_code) {
                    self.hold(HeldInput::Key(key));
                    out.push(egui::Event::Key {
                        key,
                        physical_key: None,
                        pressed: true,
                        repeat: false,
                        modifiers: self.modifiers,
                    });
                } else {
                    log::trace!("unmapped key down: {}", web_key_name(key_code));
                }
            }
            ClientEvent::KeyUp { key_code, .. } => {
                if let Some(modifier) = web_modifier(key_code) {
                    apply_modifier(&mut self.modifiers, modifier, false);
                } else if let Some(key) = web_key_to_egui(key_code) {
                    self.release(HeldInput::Key(key));
                    out.push(egui::Event::Key {
                        key,
                        physical_key: None,
                        pressed: false,
                        repeat: false,
                        modifiers: self.modifiers,
                    });
                }
            }
            ClientEvent::KeyPress { codepoint, .. } => {
                if let Some(ch) = char::from_u32(codepoint)
                    && !ch.is_control()
                {
                    out.push(egui::Event::Text(ch.to_string()));
                }
            }
            ClientEvent::PasteClipboard { text, .. } => {
                out.push(egui::Event::Paste(text));
            }
            ClientEvent::Connected { .. }
            | ClientEvent::Disconnected { .. }
            | ClientEvent::Resize { .. }
            | ClientEvent::Unknown { .. } => {}
        }
    }

    fn hold(&mut self, input: HeldInput) {
        if !self.held.contains(&input) {
            self.held.push(input);
        }
    }

    fn release(&mut self, input: HeldInput) {
        self.held.retain(|h| *h != input);
    }
}

impl Default for Sessions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(sessions: &mut Sessions, id: u32) {
        sessions.handle(ClientEvent::Connected {
            client: ClientId(id),
            addr: format!("10.0.0.{id}"),
        });
    }

    #[test]
    fn test_first_client_gets_control() {
        let mut sessions = Sessions::with_dwell(10.0);
        connect(&mut sessions, 1);
        assert!(sessions.update(0.0));
        assert_eq!(sessions.control_id(), Some(ClientId(1)));
    }

    #[test]
    fn test_round_robin_covers_all_clients() {
        let mut sessions = Sessions::with_dwell(10.0);
        connect(&mut sessions, 1);
        connect(&mut sessions, 2);
        connect(&mut sessions, 3);

        sessions.update(0.0);
        let mut seen = vec![sessions.control_id().unwrap()];
        // No rotation before the dwell expires.
        assert!(!sessions.update(5.0));
        for step in 1..3 {
            assert!(sessions.update(10.0 * step as f64));
            seen.push(sessions.control_id().unwrap());
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen, vec![ClientId(1), ClientId(2), ClientId(3)]);
    }

    #[test]
    fn test_holder_disconnect_rotates_immediately() {
        let mut sessions = Sessions::with_dwell(10.0);
        connect(&mut sessions, 1);
        connect(&mut sessions, 2);
        sessions.update(0.0);
        let holder = sessions.control_id().unwrap();

        sessions.handle(ClientEvent::Disconnected { client: holder });
        assert!(sessions.update(1.0));
        let next = sessions.control_id().unwrap();
        assert_ne!(next, holder);
    }

    #[test]
    fn test_control_lost_when_all_disconnect() {
        let mut sessions = Sessions::with_dwell(10.0);
        connect(&mut sessions, 1);
        sessions.update(0.0);
        sessions.handle(ClientEvent::Disconnected { client: ClientId(1) });
        assert!(sessions.update(1.0));
        assert_eq!(sessions.control_id(), None);
    }

    #[test]
    fn test_input_gated_on_control() {
        let mut sessions = Sessions::with_dwell(10.0);
        connect(&mut sessions, 1);
        connect(&mut sessions, 2);
        sessions.update(0.0);
        let holder = sessions.control_id().unwrap();
        let bystander = if holder == ClientId(1) {
            ClientId(2)
        } else {
            ClientId(1)
        };

        sessions.handle(ClientEvent::MouseMove {
            client: bystander,
            x: 5.0,
            y: 5.0,
        });
        sessions.handle(ClientEvent::MouseMove {
            client: holder,
            x: 1.0,
            y: 2.0,
        });

        let events = sessions.take_events(false);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], egui::Event::PointerMoved(egui::pos2(1.0, 2.0)));
    }

    #[test]
    fn test_lifecycle_honored_from_any_client() {
        let mut sessions = Sessions::with_dwell(10.0);
        connect(&mut sessions, 1);
        connect(&mut sessions, 2);
        sessions.update(0.0);
        let holder = sessions.control_id().unwrap();
        let bystander = if holder == ClientId(1) {
            ClientId(2)
        } else {
            ClientId(1)
        };

        // Connects and disconnects apply without the control token.
        sessions.handle(ClientEvent::Disconnected { client: bystander });
        assert_eq!(sessions.client_count(), 1);
        connect(&mut sessions, 3);
        assert_eq!(sessions.client_count(), 2);
    }

    #[test]
    fn test_handover_synthesizes_releases_first() {
        let mut sessions = Sessions::with_dwell(10.0);
        connect(&mut sessions, 1);
        connect(&mut sessions, 2);
        sessions.update(0.0);
        let holder = sessions.control_id().unwrap();

        sessions.handle(ClientEvent::MouseDown {
            client: holder,
            x: 3.0,
            y: 4.0,
            button: 0,
        });
        sessions.handle(ClientEvent::KeyDown {
            client: holder,
            key_code: 65,
        });
        let _ = sessions.take_events(false);

        // Dwell expires, token moves; the new holder immediately moves the mouse.
        let handover = sessions.update(10.0);
        assert!(handover);
        let new_holder = sessions.control_id().unwrap();
        sessions.handle(ClientEvent::MouseMove {
            client: new_holder,
            x: 9.0,
            y: 9.0,
        });

        let events = sessions.take_events(handover);
        // Releases for the held button and key come before the new input.
        assert!(matches!(
            events[0],
            egui::Event::PointerButton {
                button: egui::PointerButton::Primary,
                pressed: false,
                ..
            }
        ));
        assert!(matches!(
            events[1],
            egui::Event::Key {
                key: egui::Key::A,
                pressed: false,
                ..
            }
        ));
        assert_eq!(
            *events.last().unwrap(),
            egui::Event::PointerMoved(egui::pos2(9.0, 9.0))
        );
    }

    #[test]
    fn test_clean_release_leaves_nothing_held() {
        let mut sessions = Sessions::with_dwell(10.0);
        connect(&mut sessions, 1);
        sessions.update(0.0);

        sessions.handle(ClientEvent::KeyDown {
            client: ClientId(1),
            key_code: 65,
        });
        sessions.handle(ClientEvent::KeyUp {
            client: ClientId(1),
            key_code: 65,
        });
        let _ = sessions.take_events(false);

        // A later handover has nothing to synthesize.
        let events = sessions.take_events(true);
        assert!(events.is_empty());
    }

    #[test]
    fn test_resize_from_holder_updates_viewport() {
        let mut sessions = Sessions::with_dwell(10.0);
        connect(&mut sessions, 1);
        connect(&mut sessions, 2);
        sessions.update(0.0);
        let holder = sessions.control_id().unwrap();
        let bystander = if holder == ClientId(1) {
            ClientId(2)
        } else {
            ClientId(1)
        };

        sessions.handle(ClientEvent::Resize {
            client: bystander,
            width: 640.0,
            height: 480.0,
        });
        assert_ne!(sessions.viewport(), egui::vec2(640.0, 480.0));

        sessions.handle(ClientEvent::Resize {
            client: holder,
            width: 1920.0,
            height: 1080.0,
        });
        assert_eq!(sessions.viewport(), egui::vec2(1920.0, 1080.0));
    }

    #[test]
    fn test_modifiers_reset_on_handover() {
        let mut sessions = Sessions::with_dwell(10.0);
        connect(&mut sessions, 1);
        sessions.update(0.0);

        sessions.handle(ClientEvent::KeyDown {
            client: ClientId(1),
            key_code: porthole_shared::keycode::web_key::CTRL,
        });
        let _ = sessions.take_events(false);
        assert!(sessions.modifiers().ctrl);

        let _ = sessions.take_events(true);
        assert!(!sessions.modifiers().ctrl);
    }
}
