//! Inbound client event stream
//!
//! Events produced by the transport layer for each remote viewer. Every event
//! carries the id of the client it originated from; the UI core decides which
//! events are honored based on control-token ownership.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the transport to each connected remote viewer.
///
/// Ids are stable for the lifetime of a connection and strictly increasing in
/// connection order, which is what the control-token round-robin iterates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(pub u32);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One inbound event from a remote viewer.
///
/// Mouse coordinates are in UI points, matching the viewport size reported by
/// [`ClientEvent::Resize`]. Key codes are JavaScript `keyCode` values (see
/// [`crate::keycode`]); mouse buttons use the web numbering (0 primary,
/// 1 middle, 2 secondary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientEvent {
    /// A new viewer connected.
    Connected { client: ClientId, addr: String },
    /// A viewer disconnected. If it held the control token, the token rotates.
    Disconnected { client: ClientId },
    MouseMove { client: ClientId, x: f32, y: f32 },
    MouseDown { client: ClientId, x: f32, y: f32, button: u8 },
    MouseUp { client: ClientId, x: f32, y: f32, button: u8 },
    MouseWheel { client: ClientId, dx: f32, dy: f32 },
    KeyDown { client: ClientId, key_code: u32 },
    KeyUp { client: ClientId, key_code: u32 },
    /// A printable character, already translated by the browser keyboard layout.
    KeyPress { client: ClientId, codepoint: u32 },
    PasteClipboard { client: ClientId, text: String },
    /// The viewer's canvas was resized; width/height in UI points.
    Resize { client: ClientId, width: f32, height: f32 },
    /// Escape hatch for a wire tag the decoder does not recognize.
    ///
    /// Receiving one is a programming-invariant violation on the transport
    /// side: the core asserts in debug builds and ignores it in release.
    Unknown { client: ClientId, tag: u16 },
}

impl ClientEvent {
    /// The client this event originated from.
    pub fn client(&self) -> ClientId {
        match *self {
            ClientEvent::Connected { client, .. }
            | ClientEvent::Disconnected { client }
            | ClientEvent::MouseMove { client, .. }
            | ClientEvent::MouseDown { client, .. }
            | ClientEvent::MouseUp { client, .. }
            | ClientEvent::MouseWheel { client, .. }
            | ClientEvent::KeyDown { client, .. }
            | ClientEvent::KeyUp { client, .. }
            | ClientEvent::KeyPress { client, .. }
            | ClientEvent::PasteClipboard { client, .. }
            | ClientEvent::Resize { client, .. }
            | ClientEvent::Unknown { client, .. } => client,
        }
    }

    /// Whether this is a connection-lifecycle event (always honored) rather
    /// than an input event (honored only from the control-token holder).
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            ClientEvent::Connected { .. } | ClientEvent::Disconnected { .. }
        )
    }
}
