//! Property customization engine
//!
//! Walks reflected fields of one or more selected instances (multi-edit) and
//! renders one name/value/children row per field. Rendering alone never
//! mutates instance state: edits commit on explicit user action, write to
//! every instance in the set, and fire a single change notification per field.
//!
//! Everything the recursion needs travels in an explicit [`InspectContext`]
//! (depth, current owners, container index) instead of ambient globals, and is
//! restored on the way out of each nesting level.

mod containers;
mod customizer;
mod primitives;
mod references;
pub mod widgets;


pub use containers::{
    ArrayCustomizer, MapCustomizer, SetCustomizer, StructCustomizer, array_add_default,
    array_insert, array_remove, container_clear, map_add_default, map_remove, set_add_default,
    set_remove, write_all,
};
pub use customizer::{ClassDetailsCustomizer, CustomizerRegistry, PropertyCustomizer};
pub use primitives::{BoolCustomizer, EnumCustomizer, NumericCustomizer, StringCustomizer};
pub use references::{ClassRefCustomizer, ObjectCustomizer, SoftObjectCustomizer};

use smallvec::SmallVec;

use crate::reflect::{
    AssetIndex, FieldDescriptor, FieldFlags, ObjectHandle, StructId, TypeRegistry, Value, World,
};

/// Everything a render call can reach: reflection metadata, asset/world
/// queries, the customizer registry, and the call-scoped recursion state.
pub struct InspectContext<'a> {
    pub types: &'a TypeRegistry,
    pub assets: &'a AssetIndex,
    pub world: &'a World,
    pub registry: &'a CustomizerRegistry,
    /// Nesting depth, used to salt widget ids of identically-named rows.
    pub depth: usize,
    /// Paths of the owners of the instance set being rendered, parallel to
    /// it. Owned sub-object construction roots each new object's path at its
    /// instance's own owner. Paths, not handles, because the owners are
    /// mutably borrowed while their fields render.
    pub owners: Vec<String>,
    /// Index of the container element being rendered, if any.
    pub container_index: Option<usize>,
    changed_fields: Vec<String>,
}

impl<'a> InspectContext<'a> {
    pub fn new(
        types: &'a TypeRegistry,
        assets: &'a AssetIndex,
        world: &'a World,
        registry: &'a CustomizerRegistry,
    ) -> Self {
        Self {
            types,
            assets,
            world,
            registry,
            depth: 0,
            owners: Vec::new(),
            container_index: None,
            changed_fields: Vec::new(),
        }
    }

    /// Record the single post-change notification for an edited field.
    pub fn notify_changed(&mut self, desc: &FieldDescriptor) {
        log::debug!("property changed: {}", desc.name);
        self.changed_fields.push(desc.name.clone());
    }

    /// Drain the change notifications recorded since the last call.
    pub fn take_changed(&mut self) -> Vec<String> {
        std::mem::take(&mut self.changed_fields)
    }

    pub fn any_changed(&self) -> bool {
        !self.changed_fields.is_empty()
    }
}

/// Identical-value flag: do all instances currently agree on this value.
/// Derived every call, never stored.
pub fn is_identical(values: &[&mut Value]) -> bool {
    values[1..].iter().all(|v| **v == *values[0])
}

/// Render one field row (name cell, value cell, optional children) for an
/// instance set. `values` holds the same logical field of every instance.
///
/// Fields with no registered customizer render nothing; hidden fields are
/// skipped outright. Read-only fields render with disabled styling.
pub fn show_field(
    ui: &mut egui::Ui,
    cx: &mut InspectContext,
    desc: &FieldDescriptor,
    values: &mut [&mut Value],
) {
    debug_assert!(!values.is_empty(), "instance set must be non-empty");
    if !desc.is_visible() || values.is_empty() {
        return;
    }
    let registry = cx.registry;
    let Some(customizer) = registry.find_for_field(desc) else {
        // Unsupported kinds are invisible, not errors.
        return;
    };

    let identical = is_identical(values);
    let read_only = desc.flags.contains(FieldFlags::READ_ONLY);

    ui.push_id((desc.name.as_str(), cx.depth, cx.container_index), |ui| {
        let has_children = customizer.has_children(desc, values, identical, cx);
        if has_children {
            let id = ui.make_persistent_id("children");
            let state = egui::collapsing_header::CollapsingState::load_with_default_open(
                ui.ctx(),
                id,
                false,
            );
            let header = state.show_header(ui, |ui| {
                name_cell(ui, &desc.name, identical, read_only);
                ui.add_enabled_ui(!read_only, |ui| {
                    widgets::apply_value_width(ui, customizer.extra_value_width());
                    customizer.value_widget(ui, desc, values, identical, cx);
                });
            });
            header.body(|ui| {
                customizer.children_widget(ui, desc, values, identical, cx);
            });
        } else {
            ui.horizontal(|ui| {
                name_cell(ui, &desc.name, identical, read_only);
                ui.add_enabled_ui(!read_only, |ui| {
                    widgets::apply_value_width(ui, customizer.extra_value_width());
                    customizer.value_widget(ui, desc, values, identical, cx);
                });
            });
        }
    });
}

/// Render every visible field of a struct for an instance set of struct
/// values in lockstep.
pub fn show_struct_fields(
    ui: &mut egui::Ui,
    cx: &mut InspectContext,
    struct_id: StructId,
    values: &mut [&mut Value],
) {
    let types = cx.types;
    let fields = &types.strukt(struct_id).fields;
    for (slot, desc) in fields.iter().enumerate() {
        let mut children: SmallVec<[&mut Value; 8]> = SmallVec::new();
        for value in values.iter_mut() {
            match &mut **value {
                Value::Struct(fields) if slot < fields.len() => children.push(&mut fields[slot]),
                _ => {
                    debug_assert!(false, "struct layout mismatch for {}", desc.name);
                    return;
                }
            }
        }
        show_field(ui, cx, desc, &mut children);
    }
}

/// Render the full details of an object instance set: every visible field of
/// the most-derived class all instances share, honoring a per-class details
/// override when one is registered.
pub fn show_class_details(ui: &mut egui::Ui, cx: &mut InspectContext, instances: &[ObjectHandle]) {
    let types = cx.types;
    let Some(class) = types.common_class(instances) else {
        return;
    };
    let registry = cx.registry;
    if let Some(details) = registry.find_class_details(types, class) {
        details.class_details(ui, class, instances, cx);
        return;
    }
    show_default_class_details(ui, cx, class, instances);
}

/// The default details body: one row per field, base-most class first.
pub fn show_default_class_details(
    ui: &mut egui::Ui,
    cx: &mut InspectContext,
    class: crate::reflect::ClassId,
    instances: &[ObjectHandle],
) {
    let types = cx.types;
    let descriptors = types.class_fields(class);

    // Owners follow the instance set for the scope of this body.
    let owner_paths: Vec<String> = instances.iter().map(|o| o.borrow().path.clone()).collect();
    let saved_owners = std::mem::replace(&mut cx.owners, owner_paths);

    let mut borrows: SmallVec<[std::cell::RefMut<'_, crate::reflect::ObjectData>; 8]> =
        instances.iter().map(|o| o.borrow_mut()).collect();
    for (slot, desc) in descriptors.iter().enumerate() {
        let mut values: SmallVec<[&mut Value; 8]> = borrows
            .iter_mut()
            .map(|data| &mut data.fields[slot])
            .collect();
        show_field(ui, cx, desc, &mut values);
    }
    drop(borrows);

    cx.owners = saved_owners;
}

fn name_cell(ui: &mut egui::Ui, name: &str, identical: bool, read_only: bool) {
    let label = if identical {
        name.to_string()
    } else {
        format!("{name} *")
    };
    if read_only {
        ui.weak(label);
    } else {
        ui.label(label);
    }
}
