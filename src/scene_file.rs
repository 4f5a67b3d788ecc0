//! JSON scene descriptions.
//!
//! ```json
//! {
//!   "camera":  { "position": [0, 3, 12], "target": [0, 0, 0], "fov": 55 },
//!   "render":  { "width": 800, "height": 600 },
//!   "objects": [
//!     { "sphere": { "name": "Ball", "radius": 1.0, "color": [240, 90, 90] } },
//!     { "sphere": { "name": "Sun", "radius": 0.3, "position": [4, 4, 4], "light": true } }
//!   ]
//! }
//! ```

use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::{
    algebra::{option_vec3_from_array, vec3_from_array, Vec3},
    camera::Camera,
    error::SceneError,
    object::Object,
    renderer::DEFAULT_MAX_BOUNCES,
    scene::Scene,
};

fn default_up() -> Vec3 { Vec3::Y }
fn default_fov() -> f32 { 60.0 }
fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }
fn default_bounces() -> u32 { DEFAULT_MAX_BOUNCES }
fn default_normal() -> [f32; 3] { [0.0, 1.0, 0.0] }

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CameraJson {
    #[serde(deserialize_with = "vec3_from_array")]
    position: Vec3,
    #[serde(deserialize_with = "vec3_from_array")]
    target: Vec3,
    #[serde(default = "default_up", deserialize_with = "vec3_from_array")]
    up: Vec3,
    #[serde(default = "default_fov")]
    fov: f32,
}

/// Frame settings that travel with a scene file.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderSettings {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_bounces")]
    pub max_bounces: u32,
    /// Worker threads; 0 means one per hardware thread.
    #[serde(default)]
    pub threads: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            max_bounces: default_bounces(),
            threads: 0,
        }
    }
}

/// Attributes every object may carry.
#[derive(Deserialize)]
struct CommonDesc {
    name: String,
    #[serde(default, deserialize_with = "option_vec3_from_array")]
    position: Option<Vec3>,
    #[serde(default)]
    color: Option<[u8; 3]>,
    #[serde(default)]
    reflectivity: Option<f32>,
    #[serde(default)]
    refractive_index: Option<f32>,
    #[serde(default)]
    light: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum ObjectJson {
    Sphere {
        #[serde(flatten)]
        common: CommonDesc,
        radius: f32,
    },
    Plane {
        #[serde(flatten)]
        common: CommonDesc,
        #[serde(default = "default_normal")]
        normal: [f32; 3],
    },
    Rect {
        #[serde(flatten)]
        common: CommonDesc,
        width: f32,
        height: f32,
        #[serde(default = "default_normal")]
        normal: [f32; 3],
    },
    Disk {
        #[serde(flatten)]
        common: CommonDesc,
        radius: f32,
        #[serde(default = "default_normal")]
        normal: [f32; 3],
    },
    Prism {
        #[serde(flatten)]
        common: CommonDesc,
        size: [f32; 3],
    },
    Pyramid {
        #[serde(flatten)]
        common: CommonDesc,
        base_size: f32,
        height: f32,
    },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneJson {
    #[serde(default)]
    camera: Option<CameraJson>,
    #[serde(default)]
    render: RenderSettings,
    #[serde(default)]
    objects: Vec<ObjectJson>,
}

/// Public "loaded" scene
pub struct SceneFile {
    pub camera: Camera,
    pub render: RenderSettings,
    pub scene: Scene,
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> SceneError {
    SceneError::InvalidSetting { field: field.into(), reason: reason.into() }
}

fn positive(field: &str, name: &str, v: f32) -> Result<f32, SceneError> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(invalid(format!("{name}.{field}"), format!("must be positive, got {v}")))
    }
}

fn direction(field: &str, name: &str, v: [f32; 3]) -> Result<Vec3, SceneError> {
    let v = Vec3::from(v);
    if v.normalized() == Vec3::ZERO {
        return Err(invalid(format!("{name}.{field}"), "must not be a zero vector"));
    }
    Ok(v)
}

impl ObjectJson {
    fn into_object(self) -> Result<Object, SceneError> {
        let (common, mut object) = match self {
            ObjectJson::Sphere { common, radius } => {
                let o = Object::sphere(&common.name, positive("radius", &common.name, radius)?);
                (common, o)
            }
            ObjectJson::Plane { common, normal } => {
                let o = Object::plane(&common.name, direction("normal", &common.name, normal)?);
                (common, o)
            }
            ObjectJson::Rect { common, width, height, normal } => {
                let o = Object::rect_plane(
                    &common.name,
                    positive("width", &common.name, width)?,
                    positive("height", &common.name, height)?,
                    direction("normal", &common.name, normal)?,
                );
                (common, o)
            }
            ObjectJson::Disk { common, radius, normal } => {
                let o = Object::disk(
                    &common.name,
                    positive("radius", &common.name, radius)?,
                    direction("normal", &common.name, normal)?,
                );
                (common, o)
            }
            ObjectJson::Prism { common, size } => {
                for (axis, v) in ["size.x", "size.y", "size.z"].iter().zip(size) {
                    positive(axis, &common.name, v)?;
                }
                let o = Object::prism(&common.name, size.into());
                (common, o)
            }
            ObjectJson::Pyramid { common, base_size, height } => {
                let o = Object::pyramid(
                    &common.name,
                    positive("base_size", &common.name, base_size)?,
                    positive("height", &common.name, height)?,
                );
                (common, o)
            }
        };

        if let Some(p) = common.position { object = object.with_position(p); }
        if let Some(c) = common.color { object = object.with_color(c); }
        if let Some(r) = common.reflectivity { object = object.with_reflectivity(r); }
        if let Some(n) = common.refractive_index { object = object.with_refractive_index(n); }
        if common.light { object = object.as_light(); }
        Ok(object)
    }
}

pub fn parse(data: &str) -> Result<SceneFile, SceneError> {
    let file: SceneJson = serde_json::from_str(data)?;

    let mut camera = match file.camera {
        Some(c) => {
            if !(c.fov > 0.0 && c.fov < 180.0) {
                return Err(invalid("camera.fov", format!("must be in (0, 180) degrees, got {}", c.fov)));
            }
            Camera::new(c.position, c.target, c.up, c.fov)
        }
        None => Camera::demo(),
    };

    let mut scene = Scene::new();
    for o in file.objects {
        let object = o.into_object()?;
        if scene.find_by_name(&object.name).is_some() {
            warn!("duplicate object name '{}': lookups by name resolve to the first one", object.name);
        }
        scene.add(object);
    }

    if file.render.height > 0 {
        camera.aspect_ratio = file.render.width as f32 / file.render.height as f32;
    }

    Ok(SceneFile { camera, render: file.render, scene })
}

pub fn load(path: impl AsRef<Path>) -> Result<SceneFile, SceneError> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)?;
    let loaded = parse(&data)?;
    info!(
        "loaded scene {} ({} objects, {} lights)",
        path.display(),
        loaded.scene.len(),
        loaded.scene.lights().len()
    );
    Ok(loaded)
}
