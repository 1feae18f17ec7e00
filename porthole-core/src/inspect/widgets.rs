//! Small building blocks shared by the field customizers: staged editors
//! that commit on deactivation rather than per keystroke, and the value-cell
//! width convention.

use std::hash::Hash;

/// Combo label shown when instances disagree on the current selection.
pub const MULTI_VALUES: &str = "Multi Values";

/// Hard cap on committed text, in bytes.
pub const TEXT_EDIT_CAP: usize = 512;

const VALUE_WIDTH: f32 = 220.0;

/// Fix the width of the value cell so rows line up, minus whatever the
/// customizer reserves for trailing buttons.
pub fn apply_value_width(ui: &mut egui::Ui, extra: f32) {
    let width = (VALUE_WIDTH - extra).max(40.0);
    ui.spacing_mut().text_edit_width = width;
    ui.spacing_mut().combo_width = width;
}

/// Single-line text editor with commit-on-deactivation semantics.
///
/// While unfocused it mirrors `current`, so external changes show through.
/// Once focused, keystrokes edit a staged buffer that only becomes a commit
/// when focus leaves (Enter or click-away) with the text actually changed.
/// Committed text is clamped to [`TEXT_EDIT_CAP`] bytes on a char boundary.
pub fn staged_text_edit(
    ui: &mut egui::Ui,
    id_salt: impl Hash,
    current: &str,
) -> Option<String> {
    let id = ui.make_persistent_id(id_salt);
    let buffer_id = id.with("staged");

    let staged: Option<String> = ui.data_mut(|d| d.get_temp(buffer_id));
    let mut text = staged.clone().unwrap_or_else(|| current.to_string());

    let response = ui.add(
        egui::TextEdit::singleline(&mut text)
            .id(id)
            .char_limit(TEXT_EDIT_CAP),
    );

    if response.lost_focus() {
        ui.data_mut(|d| d.remove_temp::<String>(buffer_id));
        if staged.is_some() && text != current {
            truncate_in_place(&mut text, TEXT_EDIT_CAP);
            return Some(text);
        }
    } else if response.has_focus() {
        ui.data_mut(|d| d.insert_temp(buffer_id, text));
    }
    None
}

/// Staged integer editor. Unparseable input is discarded on commit.
pub fn staged_i64_edit(ui: &mut egui::Ui, id_salt: impl Hash, current: i64) -> Option<i64> {
    staged_text_edit(ui, id_salt, &current.to_string())
        .and_then(|text| text.trim().parse().ok())
        .filter(|v| *v != current)
}

/// Staged float editor. Values round-trip through `f32` so what the user
/// sees is what gets stored.
pub fn staged_f64_edit(ui: &mut egui::Ui, id_salt: impl Hash, current: f64) -> Option<f64> {
    let shown = format!("{}", current as f32);
    staged_text_edit(ui, id_salt, &shown)
        .and_then(|text| text.trim().parse::<f32>().ok())
        .map(f64::from)
        .filter(|v| *v != current)
}

/// Truncate to at most `cap` bytes without splitting a char.
pub fn truncate_in_place(text: &mut String, cap: usize) {
    if text.len() <= cap {
        return;
    }
    let mut end = cap;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        let mut text = "hello".to_string();
        truncate_in_place(&mut text, 512);
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // 'é' is two bytes; a cap landing mid-char must back off.
        let mut text = "aé".to_string();
        truncate_in_place(&mut text, 2);
        assert_eq!(text, "a");

        let mut exact = "aé".to_string();
        truncate_in_place(&mut exact, 3);
        assert_eq!(exact, "aé");
    }

    #[test]
    fn test_truncate_caps_long_text() {
        let mut text = "x".repeat(600);
        truncate_in_place(&mut text, TEXT_EDIT_CAP);
        assert_eq!(text.len(), TEXT_EDIT_CAP);
    }
}
