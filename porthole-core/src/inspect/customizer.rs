use hashbrown::HashMap;

use super::{
    ArrayCustomizer, BoolCustomizer, ClassRefCustomizer, EnumCustomizer, InspectContext,
    MapCustomizer, NumericCustomizer, ObjectCustomizer, SetCustomizer, SoftObjectCustomizer,
    StringCustomizer, StructCustomizer,
};
use crate::reflect::{
    ClassId, FieldDescriptor, FieldKind, FieldKindTag, ObjectHandle, StructId, TypeRegistry, Value,
};

/// One field kind's rendering strategy. Implementations are stateless apart
/// from interior-mutability caches and are shared across every field of the
/// kind they are registered for.
pub trait PropertyCustomizer {
    /// Render the value cell. Commits write to every instance in `values`
    /// and fire exactly one change notification.
    fn value_widget(
        &self,
        ui: &mut egui::Ui,
        desc: &FieldDescriptor,
        values: &mut [&mut Value],
        identical: bool,
        cx: &mut InspectContext,
    );

    /// Whether this row gets an expander this frame.
    fn has_children(
        &self,
        _desc: &FieldDescriptor,
        _values: &[&mut Value],
        _identical: bool,
        _cx: &InspectContext,
    ) -> bool {
        false
    }

    /// Render the expanded body. Only called when [`Self::has_children`]
    /// returned true for the same frame.
    fn children_widget(
        &self,
        _ui: &mut egui::Ui,
        _desc: &FieldDescriptor,
        _values: &mut [&mut Value],
        _identical: bool,
        _cx: &mut InspectContext,
    ) {
    }

    /// Horizontal space the row reserves next to the value cell, e.g. for
    /// container add/clear buttons.
    fn extra_value_width(&self) -> f32 {
        0.0
    }
}

/// Replaces the whole default field-by-field details body for a class and
/// every class derived from it (unless a more derived override exists).
pub trait ClassDetailsCustomizer {
    fn class_details(
        &self,
        ui: &mut egui::Ui,
        class: ClassId,
        instances: &[ObjectHandle],
        cx: &mut InspectContext,
    );
}

/// Lookup table from field kinds (and specific struct/class types) to the
/// customizer that renders them. Struct registrations beat the generic
/// struct fallback; class details overrides dispatch on the most-derived
/// registered base.
#[derive(Default)]
pub struct CustomizerRegistry {
    by_kind: HashMap<FieldKindTag, Box<dyn PropertyCustomizer>>,
    by_struct: HashMap<StructId, Box<dyn PropertyCustomizer>>,
    by_class: HashMap<ClassId, Box<dyn ClassDetailsCustomizer>>,
}

impl CustomizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry covering every built-in field kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_kind(FieldKindTag::Bool, Box::new(BoolCustomizer));
        registry.register_kind(FieldKindTag::Int, Box::new(NumericCustomizer));
        registry.register_kind(FieldKindTag::Float, Box::new(NumericCustomizer));
        registry.register_kind(FieldKindTag::Enum, Box::new(EnumCustomizer));
        registry.register_kind(FieldKindTag::Str, Box::new(StringCustomizer::str()));
        registry.register_kind(FieldKindTag::Name, Box::new(StringCustomizer::name()));
        registry.register_kind(FieldKindTag::Text, Box::new(StringCustomizer::text()));
        registry.register_kind(FieldKindTag::Object, Box::new(ObjectCustomizer::new()));
        registry.register_kind(FieldKindTag::SoftObject, Box::new(SoftObjectCustomizer::new()));
        registry.register_kind(FieldKindTag::Class, Box::new(ClassRefCustomizer::new()));
        registry.register_kind(FieldKindTag::SoftClass, Box::new(ClassRefCustomizer::new()));
        registry.register_kind(FieldKindTag::Array, Box::new(ArrayCustomizer));
        registry.register_kind(FieldKindTag::Set, Box::new(SetCustomizer));
        registry.register_kind(FieldKindTag::Map, Box::new(MapCustomizer));
        registry.register_kind(FieldKindTag::Struct, Box::new(StructCustomizer));
        registry
    }

    pub fn register_kind(&mut self, tag: FieldKindTag, customizer: Box<dyn PropertyCustomizer>) {
        self.by_kind.insert(tag, customizer);
    }

    pub fn register_struct(&mut self, id: StructId, customizer: Box<dyn PropertyCustomizer>) {
        self.by_struct.insert(id, customizer);
    }

    pub fn register_class_details(
        &mut self,
        class: ClassId,
        customizer: Box<dyn ClassDetailsCustomizer>,
    ) {
        self.by_class.insert(class, customizer);
    }

    /// Struct-specific registration first, then the kind table.
    pub fn find_for_field(&self, desc: &FieldDescriptor) -> Option<&dyn PropertyCustomizer> {
        if let FieldKind::Struct(id) = desc.kind
            && let Some(customizer) = self.by_struct.get(&id)
        {
            return Some(customizer.as_ref());
        }
        self.by_kind.get(&desc.kind.tag()).map(|c| c.as_ref())
    }

    /// Walk from `class` toward the root and return the first registered
    /// details override, so the most-derived registration wins.
    pub fn find_class_details(
        &self,
        types: &TypeRegistry,
        class: ClassId,
    ) -> Option<&dyn ClassDetailsCustomizer> {
        let mut cursor = Some(class);
        while let Some(id) = cursor {
            if let Some(customizer) = self.by_class.get(&id) {
                return Some(customizer.as_ref());
            }
            cursor = types.class(id).base;
        }
        None
    }
}
