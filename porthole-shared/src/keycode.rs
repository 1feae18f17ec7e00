//! Web key and mouse button codes
//!
//! Remote viewers report keyboard input as JavaScript `keyCode` values and
//! mouse buttons in the web numbering. The constants here name the codes the
//! core cares about; the mapping to UI-side keys lives in the core crate so
//! this crate stays free of UI dependencies.

/// Web mouse button numbers (`MouseEvent.button`).
pub const WEB_MOUSE_PRIMARY: u8 = 0;
pub const WEB_MOUSE_MIDDLE: u8 = 1;
pub const WEB_MOUSE_SECONDARY: u8 = 2;

/// JavaScript `keyCode` values for non-printable keys.
pub mod web_key {
    pub const BACKSPACE: u32 = 8;
    pub const TAB: u32 = 9;
    pub const ENTER: u32 = 13;
    pub const SHIFT: u32 = 16;
    pub const CTRL: u32 = 17;
    pub const ALT: u32 = 18;
    pub const ESCAPE: u32 = 27;
    pub const SPACE: u32 = 32;
    pub const PAGE_UP: u32 = 33;
    pub const PAGE_DOWN: u32 = 34;
    pub const END: u32 = 35;
    pub const HOME: u32 = 36;
    pub const ARROW_LEFT: u32 = 37;
    pub const ARROW_UP: u32 = 38;
    pub const ARROW_RIGHT: u32 = 39;
    pub const ARROW_DOWN: u32 = 40;
    pub const INSERT: u32 = 45;
    pub const DELETE: u32 = 46;
    pub const META: u32 = 91;
    pub const F1: u32 = 112;
    pub const F12: u32 = 123;
}

/// Human-readable name for a web key code, for logging.
pub fn web_key_name(code: u32) -> &'static str {
    use web_key::*;
    match code {
        BACKSPACE => "Backspace",
        TAB => "Tab",
        ENTER => "Enter",
        SHIFT => "Shift",
        CTRL => "Ctrl",
        ALT => "Alt",
        ESCAPE => "Escape",
        SPACE => "Space",
        PAGE_UP => "PageUp",
        PAGE_DOWN => "PageDown",
        END => "End",
        HOME => "Home",
        ARROW_LEFT => "ArrowLeft",
        ARROW_UP => "ArrowUp",
        ARROW_RIGHT => "ArrowRight",
        ARROW_DOWN => "ArrowDown",
        INSERT => "Insert",
        DELETE => "Delete",
        META => "Meta",
        48..=57 => "Digit",
        65..=90 => "Letter",
        F1..=F12 => "Function",
        _ => "Unknown",
    }
}
