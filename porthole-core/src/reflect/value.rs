//! Runtime value tree
//!
//! Every reflected field value is represented as a [`Value`]. Object instances
//! are shared single-threaded handles; the engine multi-edits several of them
//! at once by borrowing each instance's field storage for the duration of one
//! render call.

use std::cell::RefCell;
use std::rc::Rc;

use super::{ClassId, FieldDescriptor, FieldKind, TypeRegistry};

/// Shared handle to an object instance. Rendering runs on one thread, so a
/// plain `Rc<RefCell<..>>` is the whole ownership story.
pub type ObjectHandle = Rc<RefCell<ObjectData>>;

/// One live object instance: identity, reflection class, field storage.
#[derive(Debug)]
pub struct ObjectData {
    pub name: String,
    /// Full path from the outermost owner, shown in hover tooltips.
    pub path: String,
    pub class: ClassId,
    /// One value per descriptor in [`TypeRegistry::class_fields`] order.
    pub fields: Vec<Value>,
}

impl ObjectData {
    /// Construct a default-initialized instance of `class` with no owner.
    pub fn new_handle(types: &TypeRegistry, class: ClassId, name: &str) -> ObjectHandle {
        Self::new_instance(types, class, name, None)
    }

    /// Construct a default-initialized instance of `class` inside the naming
    /// context of the owner at `outer_path`. Mirrors constructing an owned
    /// sub-object: the new object's path is rooted at its owner.
    pub fn new_instance(
        types: &TypeRegistry,
        class: ClassId,
        name: &str,
        outer_path: Option<&str>,
    ) -> ObjectHandle {
        let path = match outer_path {
            Some(owner) => format!("{owner}.{name}"),
            None => format!("/{name}"),
        };
        let fields = types
            .class_fields(class)
            .iter()
            .map(|desc| Value::default_for(desc, types))
            .collect();
        Rc::new(RefCell::new(ObjectData {
            name: name.to_string(),
            path,
            class,
            fields,
        }))
    }
}

/// A reflected field value.
///
/// Equality is semantic for plain data and identity-based for object
/// references, which is exactly what the identical-value flag needs: two
/// instances "agree" on an object field only when they reference the same
/// object.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    /// Integers are stored widened to 64 bits regardless of declared width.
    Int(i64),
    Float(f64),
    Str(String),
    Name(String),
    Text(String),
    Object(Option<ObjectHandle>),
    /// Soft references store the target path, resolved lazily by the host.
    SoftObject(Option<String>),
    Class(Option<ClassId>),
    SoftClass(Option<ClassId>),
    Array(Vec<Value>),
    /// Unordered; insertion keeps elements unique by semantic equality.
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Struct(Vec<Value>),
}

impl Value {
    /// Default-initialized value for a descriptor (containers empty, enums at
    /// their first declared entry, references null, structs recursively
    /// defaulted).
    pub fn default_for(desc: &FieldDescriptor, types: &TypeRegistry) -> Value {
        match &desc.kind {
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Int { enum_of: Some(id) } => {
                Value::Int(types.enum_info(*id).first_value())
            }
            FieldKind::Int { enum_of: None } => Value::Int(0),
            FieldKind::Float => Value::Float(0.0),
            FieldKind::Enum { id } => Value::Int(types.enum_info(*id).first_value()),
            FieldKind::Str => Value::Str(String::new()),
            FieldKind::Name => Value::Name(String::new()),
            FieldKind::Text => Value::Text(String::new()),
            FieldKind::Object { .. } => Value::Object(None),
            FieldKind::SoftObject { .. } => Value::SoftObject(None),
            FieldKind::Class { .. } => Value::Class(None),
            FieldKind::SoftClass { .. } => Value::SoftClass(None),
            FieldKind::Array(_) => Value::Array(Vec::new()),
            FieldKind::Set(_) => Value::Set(Vec::new()),
            FieldKind::Map { .. } => Value::Map(Vec::new()),
            FieldKind::Struct(id) => Value::Struct(
                types
                    .strukt(*id)
                    .fields
                    .iter()
                    .map(|f| Value::default_for(f, types))
                    .collect(),
            ),
        }
    }

    /// Element count for container values, `None` for scalars.
    pub fn container_len(&self) -> Option<usize> {
        match self {
            Value::Array(items) | Value::Set(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b))
            | (Value::Name(a), Value::Name(b))
            | (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                _ => false,
            },
            (Value::SoftObject(a), Value::SoftObject(b)) => a == b,
            (Value::Class(a), Value::Class(b)) | (Value::SoftClass(a), Value::SoftClass(b)) => {
                a == b
            }
            (Value::Array(a), Value::Array(b)) | (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{ClassFlags, ClassInfo, EnumInfo, StructInfo};

    #[test]
    fn test_object_equality_is_identity() {
        let mut types = TypeRegistry::new();
        let class = types.add_class(ClassInfo {
            name: "Thing".into(),
            base: None,
            flags: ClassFlags::CREATABLE,
            fields: vec![],
        });
        let a = ObjectData::new_handle(&types, class, "a");
        let b = ObjectData::new_handle(&types, class, "a");
        assert_eq!(Value::Object(Some(a.clone())), Value::Object(Some(a.clone())));
        // Same name and class, different identity.
        assert_ne!(Value::Object(Some(a)), Value::Object(Some(b)));
        assert_eq!(Value::Object(None), Value::Object(None));
    }

    #[test]
    fn test_default_values() {
        let mut types = TypeRegistry::new();
        let mode = types.add_enum(EnumInfo {
            name: "EMode".into(),
            entries: vec![("EMode::Fast".into(), 3), ("EMode::Slow".into(), 5)],
        });
        let inner = types.add_struct(StructInfo {
            name: "Inner".into(),
            fields: vec![
                FieldDescriptor::new("flag", FieldKind::Bool),
                FieldDescriptor::new("mode", FieldKind::Enum { id: mode }),
            ],
        });
        let desc = FieldDescriptor::new("nested", FieldKind::Struct(inner));
        let value = Value::default_for(&desc, &types);
        assert_eq!(
            value,
            Value::Struct(vec![Value::Bool(false), Value::Int(3)])
        );
    }

    #[test]
    fn test_instance_path_nesting() {
        let mut types = TypeRegistry::new();
        let class = types.add_class(ClassInfo {
            name: "Part".into(),
            base: None,
            flags: ClassFlags::CREATABLE,
            fields: vec![],
        });
        let outer = ObjectData::new_handle(&types, class, "root");
        let outer_path = outer.borrow().path.clone();
        let inner = ObjectData::new_instance(&types, class, "child", Some(&outer_path));
        assert_eq!(inner.borrow().path, "/root.child");
    }
}
