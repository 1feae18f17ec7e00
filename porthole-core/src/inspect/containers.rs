//! Customizers for arrays, sets, maps and the generic struct fallback, plus
//! the pure commit helpers they share. Structural edits run positionally in
//! lockstep across every instance in the set.

use smallvec::SmallVec;

use super::{InspectContext, PropertyCustomizer, is_identical, show_struct_fields, widgets};
use crate::reflect::{FieldDescriptor, FieldKind, TypeRegistry, Value};

/// Overwrite the field on every instance with the same committed value.
pub fn write_all(values: &mut [&mut Value], new: Value) {
    for value in values.iter_mut() {
        **value = new.clone();
    }
}

/// Append a default-initialized element to every instance's array.
pub fn array_add_default(values: &mut [&mut Value], element: &FieldDescriptor, types: &TypeRegistry) {
    for value in values.iter_mut() {
        let Value::Array(items) = &mut **value else {
            debug_assert!(false, "array op on non-array");
            continue;
        };
        items.push(Value::default_for(element, types));
    }
}

/// Insert a default-initialized element at `index` in every instance's array.
pub fn array_insert(
    values: &mut [&mut Value],
    element: &FieldDescriptor,
    types: &TypeRegistry,
    index: usize,
) {
    for value in values.iter_mut() {
        let Value::Array(items) = &mut **value else {
            debug_assert!(false, "array op on non-array");
            continue;
        };
        if index <= items.len() {
            items.insert(index, Value::default_for(element, types));
        }
    }
}

/// Remove the element at `index` from every instance's array.
pub fn array_remove(values: &mut [&mut Value], index: usize) {
    for value in values.iter_mut() {
        let Value::Array(items) = &mut **value else {
            debug_assert!(false, "array op on non-array");
            continue;
        };
        if index < items.len() {
            items.remove(index);
        }
    }
}

/// Empty every instance's container, whatever its kind.
pub fn container_clear(values: &mut [&mut Value]) {
    for value in values.iter_mut() {
        match &mut **value {
            Value::Array(items) | Value::Set(items) => items.clear(),
            Value::Map(entries) => entries.clear(),
            _ => debug_assert!(false, "clear on non-container"),
        }
    }
}

/// Add a default-initialized element to every instance's set, skipping
/// instances that already contain it.
pub fn set_add_default(values: &mut [&mut Value], element: &FieldDescriptor, types: &TypeRegistry) {
    let candidate = Value::default_for(element, types);
    for value in values.iter_mut() {
        let Value::Set(items) = &mut **value else {
            debug_assert!(false, "set op on non-set");
            continue;
        };
        if !items.contains(&candidate) {
            items.push(candidate.clone());
        }
    }
}

/// Remove the element at `index` from every instance's set.
pub fn set_remove(values: &mut [&mut Value], index: usize) {
    for value in values.iter_mut() {
        let Value::Set(items) = &mut **value else {
            debug_assert!(false, "set op on non-set");
            continue;
        };
        if index < items.len() {
            items.remove(index);
        }
    }
}

/// Add a default key/value entry to every instance's map, skipping instances
/// whose map already has the default key.
pub fn map_add_default(
    values: &mut [&mut Value],
    key: &FieldDescriptor,
    value_desc: &FieldDescriptor,
    types: &TypeRegistry,
) {
    let default_key = Value::default_for(key, types);
    for value in values.iter_mut() {
        let Value::Map(entries) = &mut **value else {
            debug_assert!(false, "map op on non-map");
            continue;
        };
        if !entries.iter().any(|(k, _)| *k == default_key) {
            entries.push((default_key.clone(), Value::default_for(value_desc, types)));
        }
    }
}

/// Remove the entry at `index` from every instance's map.
pub fn map_remove(values: &mut [&mut Value], index: usize) {
    for value in values.iter_mut() {
        let Value::Map(entries) = &mut **value else {
            debug_assert!(false, "map op on non-map");
            continue;
        };
        if index < entries.len() {
            entries.remove(index);
        }
    }
}

/// Whether every instance's container currently has the same element count.
/// Divergent counts suppress the expanded body, since positional lockstep
/// editing is meaningless across different shapes.
fn counts_agree(values: &[&mut Value]) -> Option<usize> {
    let first = values[0].container_len()?;
    values[1..]
        .iter()
        .all(|v| v.container_len() == Some(first))
        .then_some(first)
}

/// Structural edit deferred until the element borrows are released.
enum ElementOp {
    Insert(usize),
    Remove(usize),
}

/// Popup actions offered on a container element row.
#[derive(Clone, Copy, PartialEq)]
enum ElementActions {
    InsertAndDelete,
    DeleteOnly,
}

/// Count-plus-buttons value cell shared by all three container kinds.
/// Returns (add clicked, clear clicked). The add button only exists while
/// counts agree; clear is always offered.
fn container_value_cell(ui: &mut egui::Ui, values: &mut [&mut Value]) -> (bool, bool) {
    let mut add = false;
    let mut clear = false;
    match counts_agree(values) {
        Some(count) => {
            ui.label(format!("{count} elements"));
            if ui.small_button("+").on_hover_text("Add element").clicked() {
                add = true;
            }
        }
        None => {
            ui.label("Different elements *");
        }
    }
    if ui.small_button("✖").on_hover_text("Clear").clicked() {
        clear = true;
    }
    (add, clear)
}

/// One container element row: index label, the element's value widget, a
/// structural-edit popup and optional children. Returns a deferred op.
fn element_row(
    ui: &mut egui::Ui,
    cx: &mut InspectContext,
    element: &FieldDescriptor,
    values: &mut [&mut Value],
    index: usize,
    actions: ElementActions,
) -> Option<ElementOp> {
    let registry = cx.registry;
    let customizer = registry.find_for_field(element)?;
    let identical = is_identical(values);

    let saved_index = cx.container_index.replace(index);
    let mut op = None;
    ui.push_id(("element", index, cx.depth), |ui| {
        let has_children = customizer.has_children(element, values, identical, cx);
        let mut header = |ui: &mut egui::Ui,
                          values: &mut [&mut Value],
                          cx: &mut InspectContext,
                          op: &mut Option<ElementOp>| {
            element_label(ui, index, identical);
            widgets::apply_value_width(ui, 18.0);
            customizer.value_widget(ui, element, values, identical, cx);
            ui.menu_button("⋮", |ui| {
                if actions == ElementActions::InsertAndDelete && ui.button("Insert").clicked() {
                    *op = Some(ElementOp::Insert(index));
                    ui.close();
                }
                if ui.button("Delete").clicked() {
                    *op = Some(ElementOp::Remove(index));
                    ui.close();
                }
            });
        };
        if has_children {
            let id = ui.make_persistent_id("children");
            let state = egui::collapsing_header::CollapsingState::load_with_default_open(
                ui.ctx(),
                id,
                false,
            );
            let response = state.show_header(ui, |ui| header(ui, values, cx, &mut op));
            response.body(|ui| {
                customizer.children_widget(ui, element, values, identical, cx);
            });
        } else {
            ui.horizontal(|ui| header(ui, values, cx, &mut op));
        }
    });
    cx.container_index = saved_index;
    op
}

fn element_label(ui: &mut egui::Ui, index: usize, identical: bool) {
    if identical {
        ui.label(format!("{index}"));
    } else {
        ui.label(format!("{index} *"));
    }
}

/// Borrow the element at `slot` of every instance's sequence container.
/// Returns None when any instance has a different shape.
fn element_set<'v>(
    values: &'v mut [&mut Value],
    slot: usize,
) -> Option<SmallVec<[&'v mut Value; 8]>> {
    let mut set: SmallVec<[&mut Value; 8]> = SmallVec::new();
    for value in values.iter_mut() {
        match &mut **value {
            Value::Array(items) | Value::Set(items) if slot < items.len() => {
                set.push(&mut items[slot]);
            }
            _ => return None,
        }
    }
    Some(set)
}

pub struct ArrayCustomizer;

impl PropertyCustomizer for ArrayCustomizer {
    fn value_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        _identical: bool,
        cx: &mut InspectContext,
    ) {
        let FieldKind::Array(element) = &desc.kind else {
            debug_assert!(false, "array customizer on {:?}", desc.kind.tag());
            return;
        };
        let (add, clear) = container_value_cell(ui, values);
        if add {
            array_add_default(values, element, cx.types);
            cx.notify_changed(desc);
        }
        if clear {
            container_clear(values);
            cx.notify_changed(desc);
        }
    }

    fn has_children(
        &self,
        _desc: &FieldDescriptor,
        values: &[&mut Value],
        _identical: bool,
        _cx: &InspectContext,
    ) -> bool {
        counts_agree(values).is_some_and(|count| count > 0)
    }

    fn children_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        _identical: bool,
        cx: &mut InspectContext,
    ) {
        let FieldKind::Array(element) = &desc.kind else {
            return;
        };
        let Some(count) = counts_agree(values) else {
            return;
        };
        let mut op = None;
        for slot in 0..count {
            let Some(mut set) = element_set(values, slot) else {
                return;
            };
            if let Some(pending) =
                element_row(ui, cx, element, &mut set, slot, ElementActions::InsertAndDelete)
            {
                op = Some(pending);
            }
        }
        match op {
            Some(ElementOp::Insert(index)) => {
                array_insert(values, element, cx.types, index);
                cx.notify_changed(desc);
            }
            Some(ElementOp::Remove(index)) => {
                array_remove(values, index);
                cx.notify_changed(desc);
            }
            None => {}
        }
    }

    fn extra_value_width(&self) -> f32 {
        44.0
    }
}

pub struct SetCustomizer;

impl PropertyCustomizer for SetCustomizer {
    fn value_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        _identical: bool,
        cx: &mut InspectContext,
    ) {
        let FieldKind::Set(element) = &desc.kind else {
            debug_assert!(false, "set customizer on {:?}", desc.kind.tag());
            return;
        };
        let (add, clear) = container_value_cell(ui, values);
        if add {
            set_add_default(values, element, cx.types);
            cx.notify_changed(desc);
        }
        if clear {
            container_clear(values);
            cx.notify_changed(desc);
        }
    }

    fn has_children(
        &self,
        _desc: &FieldDescriptor,
        values: &[&mut Value],
        _identical: bool,
        _cx: &InspectContext,
    ) -> bool {
        counts_agree(values).is_some_and(|count| count > 0)
    }

    fn children_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        _identical: bool,
        cx: &mut InspectContext,
    ) {
        let FieldKind::Set(element) = &desc.kind else {
            return;
        };
        let Some(count) = counts_agree(values) else {
            return;
        };
        let mut op = None;
        for slot in 0..count {
            let Some(mut set) = element_set(values, slot) else {
                return;
            };
            if let Some(pending) =
                element_row(ui, cx, element, &mut set, slot, ElementActions::DeleteOnly)
            {
                op = Some(pending);
            }
        }
        if let Some(ElementOp::Remove(index)) = op {
            set_remove(values, index);
            cx.notify_changed(desc);
        }
    }

    fn extra_value_width(&self) -> f32 {
        44.0
    }
}

pub struct MapCustomizer;

impl PropertyCustomizer for MapCustomizer {
    fn value_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        _identical: bool,
        cx: &mut InspectContext,
    ) {
        let FieldKind::Map { key, value } = &desc.kind else {
            debug_assert!(false, "map customizer on {:?}", desc.kind.tag());
            return;
        };
        let (add, clear) = container_value_cell(ui, values);
        if add {
            map_add_default(values, key, value, cx.types);
            cx.notify_changed(desc);
        }
        if clear {
            container_clear(values);
            cx.notify_changed(desc);
        }
    }

    fn has_children(
        &self,
        _desc: &FieldDescriptor,
        values: &[&mut Value],
        _identical: bool,
        _cx: &InspectContext,
    ) -> bool {
        counts_agree(values).is_some_and(|count| count > 0)
    }

    fn children_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        _identical: bool,
        cx: &mut InspectContext,
    ) {
        let FieldKind::Map { key, value } = &desc.kind else {
            return;
        };
        let Some(count) = counts_agree(values) else {
            return;
        };
        let mut removed = None;
        for slot in 0..count {
            if map_entry_row(ui, cx, key, value, values, slot) {
                removed = Some(slot);
            }
        }
        if let Some(index) = removed {
            map_remove(values, index);
            cx.notify_changed(desc);
        }
    }

    fn extra_value_width(&self) -> f32 {
        44.0
    }
}

/// One map entry row: the key and value edit independently, each with its own
/// identical-value flag. Returns true if the delete action fired.
fn map_entry_row(
    ui: &mut egui::Ui,
    cx: &mut InspectContext,
    key_desc: &FieldDescriptor,
    value_desc: &FieldDescriptor,
    values: &mut [&mut Value],
    slot: usize,
) -> bool {
    let registry = cx.registry;
    let (Some(key_customizer), Some(value_customizer)) = (
        registry.find_for_field(key_desc),
        registry.find_for_field(value_desc),
    ) else {
        return false;
    };

    let mut keys: SmallVec<[&mut Value; 8]> = SmallVec::new();
    let mut entries: SmallVec<[&mut Value; 8]> = SmallVec::new();
    for value in values.iter_mut() {
        match &mut **value {
            Value::Map(pairs) if slot < pairs.len() => {
                let (k, v) = &mut pairs[slot];
                keys.push(k);
                entries.push(v);
            }
            _ => return false,
        }
    }
    let keys_identical = is_identical(&keys);
    let entries_identical = is_identical(&entries);

    let saved_index = cx.container_index.replace(slot);
    let mut delete = false;
    ui.push_id(("entry", slot, cx.depth), |ui| {
        let key_children = key_customizer.has_children(key_desc, &keys, keys_identical, cx);
        let value_children =
            value_customizer.has_children(value_desc, &entries, entries_identical, cx);
        let mut header = |ui: &mut egui::Ui,
                          keys: &mut [&mut Value],
                          entries: &mut [&mut Value],
                          cx: &mut InspectContext,
                          delete: &mut bool| {
            element_label(ui, slot, keys_identical && entries_identical);
            widgets::apply_value_width(ui, 110.0);
            key_customizer.value_widget(ui, key_desc, keys, keys_identical, cx);
            value_customizer.value_widget(ui, value_desc, entries, entries_identical, cx);
            ui.menu_button("⋮", |ui| {
                if ui.button("Delete").clicked() {
                    *delete = true;
                    ui.close();
                }
            });
        };
        if key_children || value_children {
            let id = ui.make_persistent_id("children");
            let state = egui::collapsing_header::CollapsingState::load_with_default_open(
                ui.ctx(),
                id,
                false,
            );
            let response =
                state.show_header(ui, |ui| header(ui, &mut keys, &mut entries, cx, &mut delete));
            response.body(|ui| {
                if key_children {
                    ui.label("Key");
                    key_customizer.children_widget(ui, key_desc, &mut keys, keys_identical, cx);
                }
                if value_children {
                    ui.label("Value");
                    value_customizer.children_widget(
                        ui,
                        value_desc,
                        &mut entries,
                        entries_identical,
                        cx,
                    );
                }
            });
        } else {
            ui.horizontal(|ui| header(ui, &mut keys, &mut entries, cx, &mut delete));
        }
    });
    cx.container_index = saved_index;
    delete
}

/// Fallback for structs with no specific registration: a field-count value
/// cell and one child row per struct field.
pub struct StructCustomizer;

impl PropertyCustomizer for StructCustomizer {
    fn value_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        _values: &mut [&mut Value],
        _identical: bool,
        cx: &mut InspectContext,
    ) {
        let FieldKind::Struct(id) = desc.kind else {
            debug_assert!(false, "struct customizer on {:?}", desc.kind.tag());
            return;
        };
        let visible = cx
            .types
            .strukt(id)
            .fields
            .iter()
            .filter(|f| f.is_visible())
            .count();
        ui.label(format!("{visible} elements"));
    }

    fn has_children(
        &self,
        desc: &FieldDescriptor,
        _values: &[&mut Value],
        _identical: bool,
        cx: &InspectContext,
    ) -> bool {
        let FieldKind::Struct(id) = desc.kind else {
            return false;
        };
        cx.types.strukt(id).fields.iter().any(|f| f.is_visible())
    }

    fn children_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        _identical: bool,
        cx: &mut InspectContext,
    ) {
        let FieldKind::Struct(id) = desc.kind else {
            return;
        };
        cx.depth += 1;
        show_struct_fields(ui, cx, id, values);
        cx.depth -= 1;
    }
}
