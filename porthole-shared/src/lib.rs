//! Porthole Shared - Transport-facing types
//!
//! Plain data types exchanged between the UI core and the networking transport:
//! client identifiers, the inbound event stream, web key/button codes, and the
//! per-role serving port constants. The transport layer (WebSocket framing,
//! session I/O) lives outside this workspace and consumes these types as its
//! contract.

pub mod console;
pub mod event;
pub mod keycode;

pub use console::{DEFAULT_CLIENT_PORT, DEFAULT_EDITOR_PORT, DEFAULT_SERVER_PORT, ProcessRole};
pub use event::{ClientEvent, ClientId};
pub use keycode::{WEB_MOUSE_MIDDLE, WEB_MOUSE_PRIMARY, WEB_MOUSE_SECONDARY, web_key_name};
