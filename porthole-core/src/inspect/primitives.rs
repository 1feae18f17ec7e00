//! Customizers for the scalar field kinds.

use super::{InspectContext, PropertyCustomizer, widgets, write_all};
use crate::reflect::{EnumId, FieldDescriptor, FieldKind, Value, strip_enum_scope};

pub struct BoolCustomizer;

impl PropertyCustomizer for BoolCustomizer {
    fn value_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        _identical: bool,
        cx: &mut InspectContext,
    ) {
        let Value::Bool(first) = &*values[0] else {
            debug_assert!(false, "bool customizer on non-bool {}", desc.name);
            return;
        };
        let mut checked = *first;
        if ui.checkbox(&mut checked, "").changed() {
            write_all(values, Value::Bool(checked));
            cx.notify_changed(desc);
        }
    }
}

/// Integer and float fields. Integers backed by a declared enum render as
/// that enum's selection combo instead of a numeric editor.
pub struct NumericCustomizer;

impl PropertyCustomizer for NumericCustomizer {
    fn value_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        identical: bool,
        cx: &mut InspectContext,
    ) {
        match desc.kind {
            FieldKind::Int { enum_of: Some(id) } => {
                enum_combo(ui, cx, desc, values, id, identical);
            }
            FieldKind::Int { enum_of: None } => {
                let Value::Int(current) = &*values[0] else {
                    debug_assert!(false, "int customizer on non-int {}", desc.name);
                    return;
                };
                if let Some(v) = widgets::staged_i64_edit(ui, ("int", &desc.name), *current) {
                    write_all(values, Value::Int(v));
                    cx.notify_changed(desc);
                }
            }
            FieldKind::Float => {
                let Value::Float(current) = &*values[0] else {
                    debug_assert!(false, "float customizer on non-float {}", desc.name);
                    return;
                };
                if let Some(v) = widgets::staged_f64_edit(ui, ("float", &desc.name), *current) {
                    write_all(values, Value::Float(v));
                    cx.notify_changed(desc);
                }
            }
            _ => debug_assert!(false, "numeric customizer on {:?}", desc.kind.tag()),
        }
    }
}

pub struct EnumCustomizer;

impl PropertyCustomizer for EnumCustomizer {
    fn value_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        identical: bool,
        cx: &mut InspectContext,
    ) {
        let FieldKind::Enum { id } = desc.kind else {
            debug_assert!(false, "enum customizer on {:?}", desc.kind.tag());
            return;
        };
        enum_combo(ui, cx, desc, values, id, identical);
    }
}

/// Searchable entry list shared by enum fields and enum-backed integers.
/// Entry names display with their scope prefix stripped.
fn enum_combo(
    ui: &mut egui::Ui,
    cx: &mut InspectContext,
    desc: &FieldDescriptor,
    values: &mut [&mut Value],
    id: EnumId,
    identical: bool,
) {
    let Value::Int(current) = &*values[0] else {
        debug_assert!(false, "enum combo on non-int {}", desc.name);
        return;
    };
    let current = *current;
    let info = cx.types.enum_info(id);

    let label = if identical {
        info.display_name(current).to_string()
    } else {
        widgets::MULTI_VALUES.to_string()
    };

    let mut selected = None;
    egui::ComboBox::from_id_salt(("enum", &desc.name))
        .selected_text(label)
        .show_ui(ui, |ui| {
            let filter_id = ui.make_persistent_id("filter");
            let mut filter: String = ui.data_mut(|d| d.get_temp(filter_id)).unwrap_or_default();
            ui.add(egui::TextEdit::singleline(&mut filter).hint_text("filter"));
            ui.data_mut(|d| d.insert_temp(filter_id, filter.clone()));
            let filter = filter.to_lowercase();
            ui.separator();

            for (name, value) in &info.entries {
                let display = strip_enum_scope(name);
                if !filter.is_empty() && !display.to_lowercase().contains(&filter) {
                    continue;
                }
                let is_current = identical && *value == current;
                if ui.selectable_label(is_current, display).clicked() {
                    selected = Some(*value);
                }
            }
        });

    if let Some(value) = selected
        && !(identical && value == current)
    {
        write_all(values, Value::Int(value));
        cx.notify_changed(desc);
    }
}

/// Str, Name and Text fields share one staged editor and differ only in the
/// value variant they commit.
pub struct StringCustomizer {
    flavor: StringFlavor,
}

#[derive(Clone, Copy)]
enum StringFlavor {
    Str,
    Name,
    Text,
}

impl StringCustomizer {
    pub fn str() -> Self {
        Self { flavor: StringFlavor::Str }
    }

    pub fn name() -> Self {
        Self { flavor: StringFlavor::Name }
    }

    pub fn text() -> Self {
        Self { flavor: StringFlavor::Text }
    }
}

impl PropertyCustomizer for StringCustomizer {
    fn value_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        _identical: bool,
        cx: &mut InspectContext,
    ) {
        let current = match &*values[0] {
            Value::Str(s) | Value::Name(s) | Value::Text(s) => s.clone(),
            _ => {
                debug_assert!(false, "string customizer on non-string {}", desc.name);
                return;
            }
        };
        if let Some(text) = widgets::staged_text_edit(ui, ("text", &desc.name), &current) {
            let value = match self.flavor {
                StringFlavor::Str => Value::Str(text),
                StringFlavor::Name => Value::Name(text),
                StringFlavor::Text => Value::Text(text),
            };
            write_all(values, value);
            cx.notify_changed(desc);
        }
    }
}
