use image::Rgb;

use crate::{
    aabb::Aabb,
    algebra::Vec3,
    disk::Disk,
    plane::{Plane, RectPlane},
    prism::Prism,
    pyramid::Pyramid,
    ray::{Hit, Ray},
    sphere::Sphere,
};

/// Geometry of an object; every variant is positioned by [`Object::position`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    RectPlane(RectPlane),
    Disk(Disk),
    Prism(Prism),
    Pyramid(Pyramid),
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sphere(_) => "sphere",
            Self::Plane(_) => "plane",
            Self::RectPlane(_) => "rect",
            Self::Disk(_) => "disk",
            Self::Prism(_) => "prism",
            Self::Pyramid(_) => "pyramid",
        }
    }
}

/// A scene primitive: shared surface attributes plus its [`Shape`].
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub name: String,
    pub position: Vec3,
    pub color: Rgb<u8>,
    /// Stored for editors; the shading model does not refract.
    pub refractive_index: f32,
    /// Stored for editors; the shading model does not reflect.
    pub reflectivity: f32,
    pub is_light_source: bool,
    pub shape: Shape,
}

impl Object {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            color: Rgb([255, 255, 255]),
            refractive_index: 1.0,
            reflectivity: 0.0,
            is_light_source: false,
            shape,
        }
    }

    pub fn sphere(name: impl Into<String>, radius: f32) -> Self {
        Self::new(name, Shape::Sphere(Sphere { radius }))
    }

    pub fn plane(name: impl Into<String>, normal: Vec3) -> Self {
        Self::new(name, Shape::Plane(Plane::new(normal)))
    }

    pub fn rect_plane(name: impl Into<String>, width: f32, height: f32, normal: Vec3) -> Self {
        Self::new(name, Shape::RectPlane(RectPlane::new(width, height, normal)))
    }

    pub fn disk(name: impl Into<String>, radius: f32, normal: Vec3) -> Self {
        Self::new(name, Shape::Disk(Disk::new(radius, normal)))
    }

    pub fn prism(name: impl Into<String>, size: Vec3) -> Self {
        Self::new(name, Shape::Prism(Prism::new(size)))
    }

    pub fn pyramid(name: impl Into<String>, base_size: f32, height: f32) -> Self {
        Self::new(name, Shape::Pyramid(Pyramid::new(base_size, height)))
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = Rgb(color);
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    pub fn with_refractive_index(mut self, refractive_index: f32) -> Self {
        self.refractive_index = refractive_index;
        self
    }

    pub fn as_light(mut self) -> Self {
        self.is_light_source = true;
        self
    }

    /// Nearest forward hit (`t > EPSILON`) of `ray` with this object.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let at = self.position;
        match &self.shape {
            Shape::Sphere(s) => s.hit(at, ray),
            Shape::Plane(p) => p.hit(at, ray),
            Shape::RectPlane(r) => r.hit(at, ray),
            Shape::Disk(d) => d.hit(at, ray),
            Shape::Prism(p) => p.hit(at, ray),
            Shape::Pyramid(p) => p.hit(at, ray),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        let at = self.position;
        match &self.shape {
            Shape::Sphere(s) => s.bounding_box(at),
            Shape::Plane(p) => p.bounding_box(at),
            Shape::RectPlane(r) => r.bounding_box(at),
            Shape::Disk(d) => d.bounding_box(at),
            Shape::Prism(p) => p.bounding_box(at),
            Shape::Pyramid(p) => p.bounding_box(at),
        }
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        let at = self.position;
        match &self.shape {
            Shape::Sphere(s) => s.contains(at, p),
            Shape::Plane(pl) => pl.contains(at, p),
            Shape::RectPlane(r) => r.contains(at, p),
            Shape::Disk(d) => d.contains(at, p),
            Shape::Prism(pr) => pr.contains(at, p),
            Shape::Pyramid(py) => py.contains(at, p),
        }
    }
}
