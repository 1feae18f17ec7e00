//! Customizers for the reference field kinds: object, soft-object, class and
//! soft-class. Each keeps a per-customizer candidate-list cache keyed by the
//! declared type, rebuilt only when a field with a different declared type
//! comes through.

use std::cell::RefCell;

use smallvec::SmallVec;

use super::{InspectContext, PropertyCustomizer, show_class_details, widgets, write_all};
use crate::reflect::{
    ClassFlags, ClassId, FieldDescriptor, FieldKind, ObjectData, ObjectHandle, Value,
};

#[derive(Default)]
struct ClassListCache {
    declared: Option<ClassId>,
    entries: Vec<ClassId>,
}

#[derive(Default)]
struct HandleListCache {
    declared: Option<ClassId>,
    entries: Vec<ObjectHandle>,
}

/// Hard object references.
///
/// Owned (instanced) references get a class picker that constructs a fresh
/// sub-object per instance inside that instance's owner, plus an expandable
/// body editing the sub-objects in lockstep. Plain references get an asset
/// picker whose selection is shared by handle across instances.
pub struct ObjectCustomizer {
    classes: RefCell<ClassListCache>,
    assets: RefCell<HandleListCache>,
}

impl ObjectCustomizer {
    pub fn new() -> Self {
        Self {
            classes: RefCell::new(ClassListCache::default()),
            assets: RefCell::new(HandleListCache::default()),
        }
    }
}

impl Default for ObjectCustomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyCustomizer for ObjectCustomizer {
    fn value_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        identical: bool,
        cx: &mut InspectContext,
    ) {
        let FieldKind::Object { class, instanced } = desc.kind else {
            debug_assert!(false, "object customizer on {:?}", desc.kind.tag());
            return;
        };
        if instanced {
            instanced_combo(ui, cx, desc, values, class, identical, &self.classes);
        } else {
            asset_combo(ui, cx, desc, values, class, identical, &self.assets);
        }
    }

    fn has_children(
        &self,
        desc: &FieldDescriptor,
        values: &[&mut Value],
        _identical: bool,
        _cx: &InspectContext,
    ) -> bool {
        // Only owned sub-objects expand, and only when every instance has one.
        let FieldKind::Object { instanced: true, .. } = desc.kind else {
            return false;
        };
        values
            .iter()
            .all(|v| matches!(&**v, Value::Object(Some(_))))
    }

    fn children_widget(
        &self,
        ui: &mut egui::Ui,
        _desc: &FieldDescriptor,
        values: &mut [&mut Value],
        _identical: bool,
        cx: &mut InspectContext,
    ) {
        let mut children: SmallVec<[ObjectHandle; 8]> = SmallVec::new();
        for value in values.iter() {
            match &**value {
                Value::Object(Some(handle)) => children.push(handle.clone()),
                _ => return,
            }
        }
        cx.depth += 1;
        show_class_details(ui, cx, &children);
        cx.depth -= 1;
    }
}

fn instanced_combo(
    ui: &mut egui::Ui,
    cx: &mut InspectContext,
    desc: &FieldDescriptor,
    values: &mut [&mut Value],
    declared: ClassId,
    identical: bool,
    cache: &RefCell<ClassListCache>,
) {
    let types = cx.types;
    {
        let mut cache = cache.borrow_mut();
        if cache.declared != Some(declared) {
            cache.declared = Some(declared);
            let mut entries: Vec<ClassId> = types
                .derived_classes(declared)
                .into_iter()
                .filter(|&id| {
                    let info = types.class(id);
                    info.flags.contains(ClassFlags::CREATABLE)
                        && !info.flags.contains(ClassFlags::ABSTRACT)
                        && !info.flags.contains(ClassFlags::DEPRECATED)
                })
                .collect();
            entries.sort_by(|a, b| types.class(*a).name.cmp(&types.class(*b).name));
            cache.entries = entries;
        }
    }

    let current_class = match &*values[0] {
        Value::Object(Some(handle)) => Some(handle.borrow().class),
        Value::Object(None) => None,
        _ => {
            debug_assert!(false, "object field holds non-object {}", desc.name);
            return;
        }
    };
    let label = selection_label(identical, &*values[0]);

    enum Pick {
        Clear,
        Class(ClassId),
    }
    let mut pick = None;
    let response = egui::ComboBox::from_id_salt(("instanced", &desc.name))
        .selected_text(label)
        .show_ui(ui, |ui| {
            if ui.selectable_label(false, "Clear").clicked() {
                pick = Some(Pick::Clear);
            }
            ui.separator();
            for &id in &cache.borrow().entries {
                let name = &types.class(id).name;
                let is_current = identical && current_class == Some(id);
                if ui.selectable_label(is_current, name).clicked() {
                    pick = Some(Pick::Class(id));
                }
            }
        })
        .response;
    hover_current_path(response, identical, &*values[0]);

    match pick {
        Some(Pick::Clear) => {
            write_all(values, Value::Object(None));
            cx.notify_changed(desc);
        }
        Some(Pick::Class(id)) => {
            if identical && current_class == Some(id) {
                return;
            }
            let class_name = types.class(id).name.clone();
            for (index, value) in values.iter_mut().enumerate() {
                let outer = cx.owners.get(index).map(String::as_str);
                let handle = ObjectData::new_instance(types, id, &class_name, outer);
                **value = Value::Object(Some(handle));
            }
            cx.notify_changed(desc);
        }
        None => {}
    }
}

fn asset_combo(
    ui: &mut egui::Ui,
    cx: &mut InspectContext,
    desc: &FieldDescriptor,
    values: &mut [&mut Value],
    declared: ClassId,
    identical: bool,
    cache: &RefCell<HandleListCache>,
) {
    let types = cx.types;
    {
        let mut cache = cache.borrow_mut();
        if cache.declared != Some(declared) {
            cache.declared = Some(declared);
            cache.entries = cx.assets.assets_of_class(types, declared);
        }
    }

    let label = selection_label(identical, &*values[0]);

    enum Pick {
        Clear,
        Asset(ObjectHandle),
    }
    let mut pick = None;
    let response = egui::ComboBox::from_id_salt(("asset", &desc.name))
        .selected_text(label)
        .show_ui(ui, |ui| {
            if ui.selectable_label(false, "Clear").clicked() {
                pick = Some(Pick::Clear);
            }
            ui.separator();
            for asset in &cache.borrow().entries {
                let is_current = identical
                    && matches!(&*values[0], Value::Object(Some(h)) if std::rc::Rc::ptr_eq(h, asset));
                let (name, path) = {
                    let data = asset.borrow();
                    (data.name.clone(), data.path.clone())
                };
                if ui.selectable_label(is_current, name).on_hover_text(path).clicked() {
                    pick = Some(Pick::Asset(asset.clone()));
                }
            }
        })
        .response;
    hover_current_path(response, identical, &*values[0]);

    match pick {
        Some(Pick::Clear) => {
            write_all(values, Value::Object(None));
            cx.notify_changed(desc);
        }
        Some(Pick::Asset(handle)) => {
            write_all(values, Value::Object(Some(handle)));
            cx.notify_changed(desc);
        }
        None => {}
    }
}

/// Soft object references store a target path instead of a handle. When the
/// declared class is an actor class the candidates come from the live world,
/// otherwise from the asset index.
pub struct SoftObjectCustomizer {
    candidates: RefCell<HandleListCache>,
}

impl SoftObjectCustomizer {
    pub fn new() -> Self {
        Self {
            candidates: RefCell::new(HandleListCache::default()),
        }
    }
}

impl Default for SoftObjectCustomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyCustomizer for SoftObjectCustomizer {
    fn value_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        identical: bool,
        cx: &mut InspectContext,
    ) {
        let FieldKind::SoftObject { class } = desc.kind else {
            debug_assert!(false, "soft object customizer on {:?}", desc.kind.tag());
            return;
        };
        let types = cx.types;
        {
            let mut cache = self.candidates.borrow_mut();
            if cache.declared != Some(class) {
                cache.declared = Some(class);
                cache.entries = if cx.world.is_actor_class(types, class) {
                    cx.world.actors_of_class(types, class)
                } else {
                    cx.assets.assets_of_class(types, class)
                };
            }
        }

        let current_path = match &*values[0] {
            Value::SoftObject(path) => path.clone(),
            _ => {
                debug_assert!(false, "soft object field holds non-path {}", desc.name);
                return;
            }
        };
        let label = if !identical {
            widgets::MULTI_VALUES.to_string()
        } else {
            match &current_path {
                Some(path) => display_name_of_path(path).to_string(),
                None => "Null".to_string(),
            }
        };

        enum Pick {
            Clear,
            Path(String),
        }
        let mut pick = None;
        let response = egui::ComboBox::from_id_salt(("soft", &desc.name))
            .selected_text(label)
            .show_ui(ui, |ui| {
                if ui.selectable_label(false, "Clear").clicked() {
                    pick = Some(Pick::Clear);
                }
                ui.separator();
                for candidate in &self.candidates.borrow().entries {
                    let (name, path) = {
                        let data = candidate.borrow();
                        (data.name.clone(), data.path.clone())
                    };
                    let is_current = identical && current_path.as_deref() == Some(path.as_str());
                    if ui
                        .selectable_label(is_current, name)
                        .on_hover_text(&path)
                        .clicked()
                    {
                        pick = Some(Pick::Path(path));
                    }
                }
            })
            .response;
        if identical && let Some(path) = &current_path {
            response.on_hover_text(path);
        }

        match pick {
            Some(Pick::Clear) => {
                write_all(values, Value::SoftObject(None));
                cx.notify_changed(desc);
            }
            Some(Pick::Path(path)) => {
                if identical && current_path.as_deref() == Some(path.as_str()) {
                    return;
                }
                write_all(values, Value::SoftObject(Some(path)));
                cx.notify_changed(desc);
            }
            None => {}
        }
    }
}

/// Class and soft-class references share one selector: every non-deprecated
/// class derived from the declared meta class, abstract ones included.
pub struct ClassRefCustomizer {
    classes: RefCell<ClassListCache>,
}

impl ClassRefCustomizer {
    pub fn new() -> Self {
        Self {
            classes: RefCell::new(ClassListCache::default()),
        }
    }
}

impl Default for ClassRefCustomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyCustomizer for ClassRefCustomizer {
    fn value_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        identical: bool,
        cx: &mut InspectContext,
    ) {
        let (meta, soft) = match desc.kind {
            FieldKind::Class { meta } => (meta, false),
            FieldKind::SoftClass { meta } => (meta, true),
            _ => {
                debug_assert!(false, "class customizer on {:?}", desc.kind.tag());
                return;
            }
        };
        let types = cx.types;
        {
            let mut cache = self.classes.borrow_mut();
            if cache.declared != Some(meta) {
                cache.declared = Some(meta);
                let mut entries: Vec<ClassId> = types
                    .derived_classes(meta)
                    .into_iter()
                    .filter(|&id| !types.class(id).flags.contains(ClassFlags::DEPRECATED))
                    .collect();
                entries.sort_by(|a, b| types.class(*a).name.cmp(&types.class(*b).name));
                cache.entries = entries;
            }
        }

        let current = match &*values[0] {
            Value::Class(id) | Value::SoftClass(id) => *id,
            _ => {
                debug_assert!(false, "class field holds non-class {}", desc.name);
                return;
            }
        };
        let label = if !identical {
            widgets::MULTI_VALUES.to_string()
        } else {
            match current {
                Some(id) => types.class(id).name.clone(),
                None => "Null".to_string(),
            }
        };

        enum Pick {
            Clear,
            Class(ClassId),
        }
        let mut pick = None;
        egui::ComboBox::from_id_salt(("class", &desc.name))
            .selected_text(label)
            .show_ui(ui, |ui| {
                if ui.selectable_label(false, "Clear").clicked() {
                    pick = Some(Pick::Clear);
                }
                ui.separator();
                for &id in &self.classes.borrow().entries {
                    let is_current = identical && current == Some(id);
                    if ui.selectable_label(is_current, &types.class(id).name).clicked() {
                        pick = Some(Pick::Class(id));
                    }
                }
            });

        let make = |id: Option<ClassId>| if soft { Value::SoftClass(id) } else { Value::Class(id) };
        match pick {
            Some(Pick::Clear) => {
                write_all(values, make(None));
                cx.notify_changed(desc);
            }
            Some(Pick::Class(id)) => {
                if identical && current == Some(id) {
                    return;
                }
                write_all(values, make(Some(id)));
                cx.notify_changed(desc);
            }
            None => {}
        }
    }
}

/// Combo label for object-valued fields.
fn selection_label(identical: bool, first: &Value) -> String {
    if !identical {
        return widgets::MULTI_VALUES.to_string();
    }
    match first {
        Value::Object(Some(handle)) => handle.borrow().name.clone(),
        _ => "Null".to_string(),
    }
}

/// Tooltip with the full object path of the current selection.
fn hover_current_path(response: egui::Response, identical: bool, first: &Value) {
    if identical && let Value::Object(Some(handle)) = first {
        let path = handle.borrow().path.clone();
        response.on_hover_text(path);
    }
}

/// Last path segment, for display next to the full path tooltip.
fn display_name_of_path(path: &str) -> &str {
    path.rsplit(['/', '.']).next().unwrap_or(path)
}
