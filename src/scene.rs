use log::debug;

use crate::{algebra::Vec3, object::Object};

/// Stable handle to an object owned by a [`Scene`]. Ids are never reused, so
/// a stale handle resolves to `None` instead of a different object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

/// Ordered, owning collection of scene objects. Insertion order is the
/// iteration order; every query is a linear scan.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    objects: Vec<(ObjectId, Object)>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        debug!("scene: add {} '{}' as {:?}", object.shape.kind(), object.name, id);
        self.objects.push((id, object));
        id
    }

    /// Remove and hand back the object behind `id`.
    pub fn remove(&mut self, id: ObjectId) -> Option<Object> {
        let idx = self.objects.iter().position(|(oid, _)| *oid == id)?;
        Some(self.objects.remove(idx).1)
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.iter().find(|(oid, _)| *oid == id).map(|(_, o)| o)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.iter_mut().find(|(oid, _)| *oid == id).map(|(_, o)| o)
    }

    /// First object called `name`; names are not required to be unique.
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.iter().find(|(_, o)| o.name == name).map(|(id, _)| id)
    }

    /// First object (in insertion order) whose volume or surface holds `p`.
    pub fn find_at_point(&self, p: Vec3) -> Option<ObjectId> {
        self.iter().find(|(_, o)| o.contains_point(p)).map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> + '_ {
        self.objects.iter().map(|(id, o)| (*id, o))
    }

    /// Objects flagged as light sources, in scene order.
    pub fn lights(&self) -> Vec<(ObjectId, &Object)> {
        self.iter().filter(|(_, o)| o.is_light_source).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Ground plane, a few solids and three coloured sphere lights.
    pub fn demo() -> Self {
        let mut scene = Scene::new();
        scene.add(
            Object::plane("Ground", Vec3::Y)
                .with_position(Vec3::new(0.0, -2.0, 0.0))
                .with_color([60, 70, 90])
                .with_reflectivity(0.15),
        );
        scene.add(
            Object::sphere("Sphere (red)", 1.0)
                .with_position(Vec3::new(-2.2, -1.0, 0.0))
                .with_color([240, 90, 90])
                .with_reflectivity(0.05),
        );
        scene.add(
            Object::sphere("Sphere (glass-ish)", 0.9)
                .with_position(Vec3::new(1.0, -1.1, -1.8))
                .with_color([180, 220, 255])
                .with_refractive_index(1.45)
                .with_reflectivity(0.10),
        );
        scene.add(
            Object::prism("Prism", Vec3::splat(1.6))
                .with_position(Vec3::new(3.0, -1.2, 0.8))
                .with_color([120, 200, 255])
                .with_reflectivity(0.25),
        );
        scene.add(
            Object::pyramid("Pyramid", 2.2, 2.2)
                .with_position(Vec3::new(0.0, -0.9, 2.4))
                .with_color([255, 210, 120])
                .with_reflectivity(0.18),
        );
        scene.add(
            Object::disk("Disk", 1.6, Vec3::Z)
                .with_position(Vec3::new(-4.0, -0.7, 1.2))
                .with_color([170, 255, 170])
                .with_reflectivity(0.05),
        );
        for (name, pos, radius, color) in [
            ("Light (warm)", Vec3::new(4.5, 4.5, 4.0), 0.35, [255, 200, 170]),
            ("Light (red)", Vec3::new(-5.0, 3.5, 2.0), 0.30, [255, 90, 90]),
            ("Light (blue)", Vec3::new(0.0, 5.5, -6.0), 0.30, [90, 120, 255]),
        ] {
            scene.add(Object::sphere(name, radius).with_position(pos).with_color(color).as_light());
        }
        scene
    }
}
