//! Reflection metadata consumed by the property engine
//!
//! The host object system exposes its types through this registry: classes
//! with inheritance and flags, plain structs, enums, and per-field descriptors
//! carrying a semantic kind plus edit-permission flags. The property engine
//! never mutates any of this; it only walks it.

mod assets;
mod value;

pub use assets::{AssetIndex, World};
pub use value::{ObjectData, ObjectHandle, Value};

use bitflags::bitflags;

/// Interned class identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

/// Interned struct identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructId(pub u32);

/// Interned enum identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumId(pub u32);

bitflags! {
    /// Per-field edit-permission flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldFlags: u8 {
        /// The field renders but cannot be edited.
        const READ_ONLY = 1 << 0;
        /// The field is not shown at all.
        const HIDDEN = 1 << 1;
    }
}

bitflags! {
    /// Per-class flags consulted by reference selectors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ClassFlags: u8 {
        const ABSTRACT = 1 << 0;
        const DEPRECATED = 1 << 1;
        /// May be constructed inline as an owned sub-object.
        const CREATABLE = 1 << 2;
    }
}

/// Semantic kind of a reflected field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Bool,
    /// Integer, optionally backed by a declared enum (rendered as a selector).
    Int { enum_of: Option<EnumId> },
    Float,
    Enum { id: EnumId },
    Str,
    Name,
    Text,
    /// Object reference. `instanced` references own their sub-object; others
    /// point at external assets from the asset index.
    Object { class: ClassId, instanced: bool },
    SoftObject { class: ClassId },
    Class { meta: ClassId },
    SoftClass { meta: ClassId },
    Array(Box<FieldDescriptor>),
    Set(Box<FieldDescriptor>),
    Map {
        key: Box<FieldDescriptor>,
        value: Box<FieldDescriptor>,
    },
    Struct(StructId),
}

/// Payload-free discriminant of [`FieldKind`], used for customizer dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKindTag {
    Bool,
    Int,
    Float,
    Enum,
    Str,
    Name,
    Text,
    Object,
    SoftObject,
    Class,
    SoftClass,
    Array,
    Set,
    Map,
    Struct,
}

impl FieldKind {
    pub fn tag(&self) -> FieldKindTag {
        match self {
            FieldKind::Bool => FieldKindTag::Bool,
            FieldKind::Int { .. } => FieldKindTag::Int,
            FieldKind::Float => FieldKindTag::Float,
            FieldKind::Enum { .. } => FieldKindTag::Enum,
            FieldKind::Str => FieldKindTag::Str,
            FieldKind::Name => FieldKindTag::Name,
            FieldKind::Text => FieldKindTag::Text,
            FieldKind::Object { .. } => FieldKindTag::Object,
            FieldKind::SoftObject { .. } => FieldKindTag::SoftObject,
            FieldKind::Class { .. } => FieldKindTag::Class,
            FieldKind::SoftClass { .. } => FieldKindTag::SoftClass,
            FieldKind::Array(_) => FieldKindTag::Array,
            FieldKind::Set(_) => FieldKindTag::Set,
            FieldKind::Map { .. } => FieldKindTag::Map,
            FieldKind::Struct(_) => FieldKindTag::Struct,
        }
    }
}

/// Opaque handle to one reflected field: kind, flags, display name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub flags: FieldFlags,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            flags: FieldFlags::empty(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.flags |= FieldFlags::READ_ONLY;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.flags |= FieldFlags::HIDDEN;
        self
    }

    /// Whether the field shows up in detail views.
    pub fn is_visible(&self) -> bool {
        !self.flags.contains(FieldFlags::HIDDEN)
    }

    /// Nameless descriptor for a container element.
    pub fn element(kind: FieldKind) -> Self {
        Self::new("", kind)
    }
}

/// A reflected class: named, optionally derived, with its own fields.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: String,
    pub base: Option<ClassId>,
    pub flags: ClassFlags,
    pub fields: Vec<FieldDescriptor>,
}

/// A reflected plain struct.
#[derive(Debug, Clone)]
pub struct StructInfo {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// A reflected enum: declared entries in declaration order.
#[derive(Debug, Clone)]
pub struct EnumInfo {
    pub name: String,
    pub entries: Vec<(String, i64)>,
}

impl EnumInfo {
    /// Display label for a value: the declared name stripped of any namespace
    /// qualifier before the last `::` separator.
    pub fn display_name(&self, value: i64) -> &str {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| strip_enum_scope(n))
            .unwrap_or("<invalid>")
    }

    /// First declared value, used for default initialization.
    pub fn first_value(&self) -> i64 {
        self.entries.first().map(|(_, v)| *v).unwrap_or(0)
    }
}

/// Strip everything up to and including the last `::` scope separator.
pub fn strip_enum_scope(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

/// Registry of every reflected class, struct and enum the host exposes.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    classes: Vec<ClassInfo>,
    structs: Vec<StructInfo>,
    enums: Vec<EnumInfo>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, info: ClassInfo) -> ClassId {
        self.classes.push(info);
        ClassId(self.classes.len() as u32 - 1)
    }

    pub fn add_struct(&mut self, info: StructInfo) -> StructId {
        self.structs.push(info);
        StructId(self.structs.len() as u32 - 1)
    }

    pub fn add_enum(&mut self, info: EnumInfo) -> EnumId {
        self.enums.push(info);
        EnumId(self.enums.len() as u32 - 1)
    }

    pub fn class(&self, id: ClassId) -> &ClassInfo {
        &self.classes[id.0 as usize]
    }

    pub fn strukt(&self, id: StructId) -> &StructInfo {
        &self.structs[id.0 as usize]
    }

    pub fn enum_info(&self, id: EnumId) -> &EnumInfo {
        &self.enums[id.0 as usize]
    }

    /// Whether `class` is `ancestor` or derives from it.
    pub fn is_subclass_of(&self, class: ClassId, ancestor: ClassId) -> bool {
        let mut current = Some(class);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.class(id).base;
        }
        false
    }

    /// The declared class plus every class deriving from it, in id order.
    pub fn derived_classes(&self, base: ClassId) -> Vec<ClassId> {
        (0..self.classes.len() as u32)
            .map(ClassId)
            .filter(|&id| self.is_subclass_of(id, base))
            .collect()
    }

    /// All fields of a class, base-most first (inherited fields render first).
    pub fn class_fields(&self, class: ClassId) -> Vec<&FieldDescriptor> {
        let mut chain = Vec::new();
        let mut current = Some(class);
        while let Some(id) = current {
            chain.push(id);
            current = self.class(id).base;
        }
        chain
            .iter()
            .rev()
            .flat_map(|&id| self.class(id).fields.iter())
            .collect()
    }

    /// Most-derived class that every instance in the set is an instance of.
    ///
    /// Multi-edit renders the fields of this class, so instances of sibling
    /// subclasses only expose their shared ancestry.
    pub fn common_class(&self, instances: &[ObjectHandle]) -> Option<ClassId> {
        let mut common = instances.first()?.borrow().class;
        for instance in &instances[1..] {
            let class = instance.borrow().class;
            while !self.is_subclass_of(class, common) {
                common = self.class(common).base?;
            }
        }
        Some(common)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_chain() -> (TypeRegistry, ClassId, ClassId, ClassId) {
        let mut types = TypeRegistry::new();
        let base = types.add_class(ClassInfo {
            name: "Component".into(),
            base: None,
            flags: ClassFlags::ABSTRACT,
            fields: vec![FieldDescriptor::new("enabled", FieldKind::Bool)],
        });
        let mid = types.add_class(ClassInfo {
            name: "LightComponent".into(),
            base: Some(base),
            flags: ClassFlags::CREATABLE,
            fields: vec![FieldDescriptor::new("intensity", FieldKind::Float)],
        });
        let leaf = types.add_class(ClassInfo {
            name: "SpotLightComponent".into(),
            base: Some(mid),
            flags: ClassFlags::CREATABLE,
            fields: vec![FieldDescriptor::new("angle", FieldKind::Float)],
        });
        (types, base, mid, leaf)
    }

    #[test]
    fn test_subclass_chain() {
        let (types, base, mid, leaf) = registry_with_chain();
        assert!(types.is_subclass_of(leaf, base));
        assert!(types.is_subclass_of(leaf, mid));
        assert!(types.is_subclass_of(mid, mid));
        assert!(!types.is_subclass_of(base, leaf));
    }

    #[test]
    fn test_derived_classes_includes_base() {
        let (types, base, mid, leaf) = registry_with_chain();
        assert_eq!(types.derived_classes(base), vec![base, mid, leaf]);
        assert_eq!(types.derived_classes(mid), vec![mid, leaf]);
    }

    #[test]
    fn test_class_fields_base_first() {
        let (types, _, _, leaf) = registry_with_chain();
        let names: Vec<_> = types.class_fields(leaf).iter().map(|f| &f.name).collect();
        assert_eq!(names, ["enabled", "intensity", "angle"]);
    }

    #[test]
    fn test_common_class_of_siblings() {
        let (mut types, _base, mid, leaf) = registry_with_chain();
        let other = types.add_class(ClassInfo {
            name: "PointLightComponent".into(),
            base: Some(mid),
            flags: ClassFlags::CREATABLE,
            fields: vec![],
        });
        let a = ObjectData::new_handle(&types, leaf, "a");
        let b = ObjectData::new_handle(&types, other, "b");
        assert_eq!(types.common_class(&[a.clone(), b]), Some(mid));
        assert_eq!(types.common_class(&[a.clone(), a.clone()]), Some(leaf));
        assert_eq!(types.common_class(&[]), None);
    }

    #[test]
    fn test_enum_scope_stripping() {
        assert_eq!(strip_enum_scope("ELightMode::Dynamic"), "Dynamic");
        assert_eq!(strip_enum_scope("Static"), "Static");
        assert_eq!(strip_enum_scope("a::b::C"), "C");
    }

    #[test]
    fn test_enum_display_name() {
        let info = EnumInfo {
            name: "ELightMode".into(),
            entries: vec![
                ("ELightMode::Static".into(), 0),
                ("ELightMode::Dynamic".into(), 2),
            ],
        };
        assert_eq!(info.display_name(2), "Dynamic");
        assert_eq!(info.display_name(1), "<invalid>");
        assert_eq!(info.first_value(), 0);
    }
}
