//! Asset index and world actor access
//!
//! Reference selectors query these instead of the full host services: the
//! asset index answers "which assets of this class exist" and the world
//! answers "which actors of this class are alive". Both are snapshots owned
//! by the host; the engine only reads them.

use super::{ClassId, ObjectHandle, TypeRegistry};

/// Flat index of loadable assets, queried by class with subclass recursion.
/// Assets are ordinary object instances; selecting one shares its handle.
#[derive(Debug, Default)]
pub struct AssetIndex {
    assets: Vec<ObjectHandle>,
}

impl AssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, asset: ObjectHandle) {
        self.assets.push(asset);
    }

    /// Assets whose class is `class` or derives from it, sorted by name.
    pub fn assets_of_class(&self, types: &TypeRegistry, class: ClassId) -> Vec<ObjectHandle> {
        let mut matches: Vec<ObjectHandle> = self
            .assets
            .iter()
            .filter(|a| types.is_subclass_of(a.borrow().class, class))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.borrow().name.cmp(&b.borrow().name));
        matches
    }
}

/// The live world: actors that soft references may target directly instead of
/// going through the asset index.
#[derive(Debug, Default)]
pub struct World {
    pub actors: Vec<ObjectHandle>,
    /// Root class for "is this an actor" checks by reference selectors.
    pub actor_class: Option<ClassId>,
}

impl World {
    pub fn new(actor_class: Option<ClassId>) -> Self {
        Self {
            actors: Vec::new(),
            actor_class,
        }
    }

    /// Whether `class` derives from the world's actor root class.
    pub fn is_actor_class(&self, types: &TypeRegistry, class: ClassId) -> bool {
        self.actor_class
            .is_some_and(|root| types.is_subclass_of(class, root))
    }

    /// Live actors that are instances of `class`, in spawn order.
    pub fn actors_of_class(&self, types: &TypeRegistry, class: ClassId) -> Vec<ObjectHandle> {
        self.actors
            .iter()
            .filter(|a| types.is_subclass_of(a.borrow().class, class))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{ClassFlags, ClassInfo, ObjectData};

    #[test]
    fn test_assets_filtered_and_sorted() {
        let mut types = TypeRegistry::new();
        let texture = types.add_class(ClassInfo {
            name: "Texture".into(),
            base: None,
            flags: ClassFlags::empty(),
            fields: vec![],
        });
        let cube = types.add_class(ClassInfo {
            name: "CubeTexture".into(),
            base: Some(texture),
            flags: ClassFlags::empty(),
            fields: vec![],
        });
        let sound = types.add_class(ClassInfo {
            name: "Sound".into(),
            base: None,
            flags: ClassFlags::empty(),
            fields: vec![],
        });

        let mut index = AssetIndex::new();
        index.add(ObjectData::new_handle(&types, texture, "zebra"));
        index.add(ObjectData::new_handle(&types, cube, "apple"));
        index.add(ObjectData::new_handle(&types, sound, "chime"));

        let found = index.assets_of_class(&types, texture);
        let names: Vec<_> = found.iter().map(|a| a.borrow().name.clone()).collect();
        assert_eq!(names, ["apple", "zebra"]);
    }

    #[test]
    fn test_world_actor_enumeration() {
        let mut types = TypeRegistry::new();
        let actor = types.add_class(ClassInfo {
            name: "Actor".into(),
            base: None,
            flags: ClassFlags::empty(),
            fields: vec![],
        });
        let pawn = types.add_class(ClassInfo {
            name: "Pawn".into(),
            base: Some(actor),
            flags: ClassFlags::empty(),
            fields: vec![],
        });
        let widget = types.add_class(ClassInfo {
            name: "Widget".into(),
            base: None,
            flags: ClassFlags::empty(),
            fields: vec![],
        });

        let mut world = World::new(Some(actor));
        world.actors.push(ObjectData::new_handle(&types, pawn, "p1"));
        world.actors.push(ObjectData::new_handle(&types, actor, "a1"));

        assert!(world.is_actor_class(&types, pawn));
        assert!(!world.is_actor_class(&types, widget));
        assert_eq!(world.actors_of_class(&types, pawn).len(), 1);
        assert_eq!(world.actors_of_class(&types, actor).len(), 2);
    }
}
