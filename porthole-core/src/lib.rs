//! Porthole Core - Reflective property editing over a remote immediate-mode UI
//!
//! This crate provides the two cooperating subsystems behind a remotely-viewed
//! egui interface:
//!
//! - [`inspect`] - a generic property customization engine that walks reflected
//!   fields of one or more selected object instances (multi-edit) and renders
//!   uniform name/value/children rows for every field kind
//! - [`pipeline`] - a per-tick frame pipeline that owns the egui context, folds
//!   remote input into it under exclusive control-token arbitration, and
//!   publishes immutable draw snapshots through a lock-light channel to a
//!   network thread
//!
//! The host reflection metadata ([`reflect`]) and the transport endpoint
//! ([`net::Transport`]) are consumed contracts; WebSocket framing and engine
//! ticking live outside this crate.

pub mod channel;
pub mod config;
pub mod console;
pub mod inspect;
pub mod net;
pub mod panel;
pub mod pipeline;
pub mod reflect;

pub use channel::{TripleReader, TripleWriter, triple_buffer};
pub use config::{ConfigError, PortholeConfig};
pub use inspect::{
    CustomizerRegistry, InspectContext, PropertyCustomizer, show_class_details, show_field,
};
pub use net::{FramePacer, FramePacket, Transport, TransportError, spawn_network_thread};
pub use panel::{Panel, PanelRegistry};
pub use pipeline::{DrawSnapshot, PipelineState, RemotePipeline, Sessions};
pub use reflect::{
    AssetIndex, ClassId, EnumId, FieldDescriptor, FieldFlags, FieldKind, FieldKindTag,
    ObjectData, ObjectHandle, StructId, TypeRegistry, Value, World,
};

// Re-export the wire types consumers wire into their transport implementation
pub use porthole_shared::{ClientEvent, ClientId, ProcessRole};
