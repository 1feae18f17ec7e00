//! Translation from web input codes to egui input types.

use porthole_shared::keycode::{WEB_MOUSE_MIDDLE, WEB_MOUSE_PRIMARY, WEB_MOUSE_SECONDARY, web_key};

/// Map a web `MouseEvent.button` number to an egui pointer button.
pub fn web_button_to_egui(button: u8) -> Option<egui::PointerButton> {
    match button {
        WEB_MOUSE_PRIMARY => Some(egui::PointerButton::Primary),
        WEB_MOUSE_MIDDLE => Some(egui::PointerButton::Middle),
        WEB_MOUSE_SECONDARY => Some(egui::PointerButton::Secondary),
        3 => Some(egui::PointerButton::Extra1),
        4 => Some(egui::PointerButton::Extra2),
        _ => None,
    }
}

/// Modifier keys are not egui keys; they update the modifier state instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebModifier {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

pub fn web_modifier(code: u32) -> Option<WebModifier> {
    match code {
        web_key::SHIFT => Some(WebModifier::Shift),
        web_key::CTRL => Some(WebModifier::Ctrl),
        web_key::ALT => Some(WebModifier::Alt),
        web_key::META => Some(WebModifier::Meta),
        _ => None,
    }
}

pub fn apply_modifier(modifiers: &mut egui::Modifiers, modifier: WebModifier, down: bool) {
    match modifier {
        WebModifier::Shift => modifiers.shift = down,
        WebModifier::Ctrl => {
            modifiers.ctrl = down;
            modifiers.command = down;
        }
        WebModifier::Alt => modifiers.alt = down,
        WebModifier::Meta => modifiers.mac_cmd = down,
    }
}

/// Map a JavaScript `keyCode` to an egui key. Modifier keys and codes with no
/// egui counterpart translate to None.
pub fn web_key_to_egui(code: u32) -> Option<egui::Key> {
    use egui::Key;
    let key = match code {
        web_key::BACKSPACE => Key::Backspace,
        web_key::TAB => Key::Tab,
        web_key::ENTER => Key::Enter,
        web_key::ESCAPE => Key::Escape,
        web_key::SPACE => Key::Space,
        web_key::PAGE_UP => Key::PageUp,
        web_key::PAGE_DOWN => Key::PageDown,
        web_key::END => Key::End,
        web_key::HOME => Key::Home,
        web_key::ARROW_LEFT => Key::ArrowLeft,
        web_key::ARROW_UP => Key::ArrowUp,
        web_key::ARROW_RIGHT => Key::ArrowRight,
        web_key::ARROW_DOWN => Key::ArrowDown,
        web_key::INSERT => Key::Insert,
        web_key::DELETE => Key::Delete,
        48 => Key::Num0,
        49 => Key::Num1,
        50 => Key::Num2,
        51 => Key::Num3,
        52 => Key::Num4,
        53 => Key::Num5,
        54 => Key::Num6,
        55 => Key::Num7,
        56 => Key::Num8,
        57 => Key::Num9,
        65 => Key::A,
        66 => Key::B,
        67 => Key::C,
        68 => Key::D,
        69 => Key::E,
        70 => Key::F,
        71 => Key::G,
        72 => Key::H,
        73 => Key::I,
        74 => Key::J,
        75 => Key::K,
        76 => Key::L,
        77 => Key::M,
        78 => Key::N,
        79 => Key::O,
        80 => Key::P,
        81 => Key::Q,
        82 => Key::R,
        83 => Key::S,
        84 => Key::T,
        85 => Key::U,
        86 => Key::V,
        87 => Key::W,
        88 => Key::X,
        89 => Key::Y,
        90 => Key::Z,
        112 => Key::F1,
        113 => Key::F2,
        114 => Key::F3,
        115 => Key::F4,
        116 => Key::F5,
        117 => Key::F6,
        118 => Key::F7,
        119 => Key::F8,
        120 => Key::F9,
        121 => Key::F10,
        122 => Key::F11,
        123 => Key::F12,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_mapping() {
        assert_eq!(web_button_to_egui(0), Some(egui::PointerButton::Primary));
        assert_eq!(web_button_to_egui(1), Some(egui::PointerButton::Middle));
        assert_eq!(web_button_to_egui(2), Some(egui::PointerButton::Secondary));
        assert_eq!(web_button_to_egui(9), None);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(web_key_to_egui(65), Some(egui::Key::A));
        assert_eq!(web_key_to_egui(57), Some(egui::Key::Num9));
        assert_eq!(web_key_to_egui(123), Some(egui::Key::F12));
        // Modifier keys are not egui keys.
        assert_eq!(web_key_to_egui(web_key::SHIFT), None);
        assert!(web_modifier(web_key::SHIFT).is_some());
    }

    #[test]
    fn test_ctrl_drives_command() {
        let mut modifiers = egui::Modifiers::default();
        apply_modifier(&mut modifiers, WebModifier::Ctrl, true);
        assert!(modifiers.ctrl);
        assert!(modifiers.command);
        apply_modifier(&mut modifiers, WebModifier::Ctrl, false);
        assert!(!modifiers.command);
    }
}
