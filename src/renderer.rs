use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use image::{Rgb, RgbImage};
use indicatif::ProgressBar;
use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{
    algebra::Vec3,
    camera::Camera,
    error::RenderError,
    object::Object,
    ray::{Hit, Ray, EPSILON},
    scene::{ObjectId, Scene},
};

/// Depth at which `trace` gives up. Shading never recurses, so only the
/// primary ray (depth 0) is ever traced.
pub const DEFAULT_MAX_BOUNCES: u32 = 3;

/// Rows handed to a worker per claim of the row cursor.
pub const CHUNK_ROWS: u32 = 8;

pub const SKY: Rgb<u8> = Rgb([20, 20, 30]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

const AMBIENT: f32 = 0.45;
const SUN_INTENSITY: f32 = 0.35;
const LIGHT_GAIN: f32 = 1.4;
const LIGHT_FALLOFF: f32 = 0.02;
/// Offset of shadow-ray origins along the surface normal.
const SHADOW_BIAS: f32 = 0.01;

fn sun_dir() -> Vec3 {
    Vec3::new(0.3, 0.8, 0.5).normalized()
}

fn to_vec(c: Rgb<u8>) -> Vec3 {
    Vec3::new(c[0] as f32, c[1] as f32, c[2] as f32)
}

/// Buffer offset and pixel count of row band `band`. Computed in `usize` so
/// frames beyond `u32::MAX` pixels index correctly.
fn band_span(band: u32, width: u32, height: u32) -> (usize, usize) {
    let y0 = band as usize * CHUNK_ROWS as usize;
    let y1 = (y0 + CHUNK_ROWS as usize).min(height as usize);
    (y0 * width as usize, (y1 - y0) * width as usize)
}

fn to_rgb(c: Vec3) -> Rgb<u8> {
    let ch = |v: f32| v.clamp(0.0, 255.0) as u8;
    Rgb([ch(c.x), ch(c.y), ch(c.z)])
}

/// A 2D surface the renderer can fill.
pub trait PixelSink {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgb<u8>);
}

impl PixelSink for RgbImage {
    fn width(&self) -> u32 { self.dimensions().0 }
    fn height(&self) -> u32 { self.dimensions().1 }
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgb<u8>) { self.put_pixel(x, y, color); }
}

/// Nearest intersection of a ray with the whole scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
    pub object: ObjectId,
}

/// Light sources of one frame, collected once before any pixel is traced.
pub type Lights<'a> = [(ObjectId, &'a Object)];

fn nearest<'a>(scene: &'a Scene, ray: &Ray) -> Option<(ObjectId, &'a Object, Hit)> {
    scene
        .iter()
        .filter_map(|(id, o)| o.intersect(ray).map(|h| (id, o, h)))
        .filter(|(_, _, h)| h.t > EPSILON)
        .min_by(|a, b| a.2.t.total_cmp(&b.2.t))
}

/// Closest hit along `ray`, or `None` when it escapes the scene.
pub fn closest_hit(scene: &Scene, ray: &Ray) -> Option<HitResult> {
    nearest(scene, ray).map(|(object, _, h)| HitResult { t: h.t, point: h.point, normal: h.normal, object })
}

/// True when a non-emitting object sits on `ray` before `max_t`.
fn occluded(scene: &Scene, ray: &Ray, max_t: f32) -> bool {
    scene
        .iter()
        .filter(|(_, o)| !o.is_light_source)
        .any(|(_, o)| o.intersect(ray).is_some_and(|h| h.t > EPSILON && h.t < max_t))
}

/// Direct-lighting ray tracer over a persistent worker pool.
pub struct Renderer {
    pool: ThreadPool,
    pub max_bounces: u32,
}

impl Renderer {
    /// One worker per hardware thread.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_threads(0)
    }

    /// `threads == 0` picks the hardware concurrency.
    pub fn with_threads(threads: usize) -> Result<Self, RenderError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("render-{i}"))
            .build()?;
        debug!("renderer: {} worker threads", pool.current_num_threads());
        Ok(Self { pool, max_bounces: DEFAULT_MAX_BOUNCES })
    }

    pub fn with_max_bounces(mut self, max_bounces: u32) -> Self {
        self.max_bounces = max_bounces;
        self
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Colour seen along `ray`. `depth` counts bounces already taken.
    pub fn trace(&self, scene: &Scene, lights: &Lights, ray: &Ray, depth: u32) -> Rgb<u8> {
        if depth >= self.max_bounces {
            return BLACK;
        }
        match nearest(scene, ray) {
            Some((_, object, hit)) => self.shade(scene, lights, object, hit.point, hit.normal),
            None => SKY,
        }
    }

    /// Ambient + fixed sun + shadowed point lights. Emitters render flat white.
    fn shade(&self, scene: &Scene, lights: &Lights, object: &Object, point: Vec3, normal: Vec3) -> Rgb<u8> {
        if object.is_light_source {
            return WHITE;
        }
        let base = to_vec(object.color);
        let mut color = base * AMBIENT;
        color += base * (SUN_INTENSITY * normal.dot(sun_dir()).max(0.0));

        let origin = point + normal * SHADOW_BIAS;
        for (_, light) in lights.iter() {
            let to_light = light.position - origin;
            let dist = to_light.length();
            let dir = to_light.normalized();
            let n_dot_l = normal.dot(dir);
            if n_dot_l <= 0.0 {
                continue;
            }
            if occluded(scene, &Ray::new(origin, dir), dist) {
                continue;
            }
            let attenuation = 1.0 / (1.0 + LIGHT_FALLOFF * dist);
            color += base * (n_dot_l * attenuation * LIGHT_GAIN);
        }
        to_rgb(color)
    }

    /// Render a `width × height` frame into a row-major buffer.
    ///
    /// Workers repeatedly claim the next [`CHUNK_ROWS`]-row band from a shared
    /// cursor, so fast threads pick up more bands. Every band is written by
    /// exactly one worker into its own buffer; bands are stitched together
    /// after all workers finish. The result does not depend on the thread count.
    pub fn render_buffer(
        &self,
        scene: &Scene,
        camera: &Camera,
        width: u32,
        height: u32,
        progress: Option<&ProgressBar>,
    ) -> Vec<Rgb<u8>> {
        if width == 0 || height == 0 {
            return Vec::new();
        }
        let started = Instant::now();
        let lights = scene.lights();
        let bands = height.div_ceil(CHUNK_ROWS);
        let workers = self.threads().min(height as usize);
        let cursor = AtomicU32::new(0);

        let finished: Vec<Vec<(u32, Vec<Rgb<u8>>)>> = self.pool.broadcast(|ctx| {
            let mut done = Vec::new();
            if ctx.index() >= workers {
                return done;
            }
            loop {
                let band = cursor.fetch_add(1, Ordering::Relaxed);
                if band >= bands {
                    break;
                }
                let y0 = band * CHUNK_ROWS;
                let y1 = (y0 + CHUNK_ROWS).min(height);
                let mut pixels = Vec::with_capacity(band_span(band, width, height).1);
                for y in y0..y1 {
                    for x in 0..width {
                        // Pixel-centre sampling.
                        let ray = camera.get_ray(x as f32 + 0.5, y as f32 + 0.5, width as f32, height as f32);
                        pixels.push(self.trace(scene, &lights, &ray, 0));
                    }
                    if let Some(pb) = progress {
                        pb.inc(1);
                    }
                }
                done.push((band, pixels));
            }
            done
        });

        let mut buffer = vec![SKY; width as usize * height as usize];
        for (band, pixels) in finished.into_iter().flatten() {
            let (start, len) = band_span(band, width, height);
            buffer[start..start + len].copy_from_slice(&pixels);
        }
        debug!(
            "rendered {width}x{height} ({} lights, {workers} workers) in {:.2?}",
            lights.len(),
            started.elapsed()
        );
        buffer
    }

    /// Fill every pixel of `sink`. The frame is traced in parallel, then
    /// written to the sink from the calling thread.
    pub fn render(&self, scene: &Scene, camera: &Camera, sink: &mut impl PixelSink) {
        self.render_with_progress(scene, camera, sink, None);
    }

    pub fn render_with_progress(
        &self,
        scene: &Scene,
        camera: &Camera,
        sink: &mut impl PixelSink,
        progress: Option<&ProgressBar>,
    ) {
        let (width, height) = (sink.width(), sink.height());
        let buffer = self.render_buffer(scene, camera, width, height, progress);
        for (i, color) in buffer.into_iter().enumerate() {
            let i = i as u32;
            sink.set_pixel(i % width, i / width, color);
        }
    }

    pub fn render_image(&self, scene: &Scene, camera: &Camera, width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::new(width, height);
        self.render(scene, camera, &mut img);
        img
    }

    /// Object under screen position `(x, y)` of a `w × h` viewport.
    pub fn pick(&self, scene: &Scene, camera: &Camera, x: f32, y: f32, w: f32, h: f32) -> Option<ObjectId> {
        if !(0.0..w).contains(&x) || !(0.0..h).contains(&y) {
            return None;
        }
        closest_hit(scene, &camera.get_ray(x, y, w, h)).map(|hit| hit.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> Renderer {
        Renderer::with_threads(2).unwrap()
    }

    /// Grey floor lit from straight above, viewed at an angle.
    fn floor_scene(gray: u8) -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let floor = scene.add(Object::plane("Floor", Vec3::Y).with_color([gray, gray, gray]));
        scene.add(Object::sphere("Lamp", 0.2).with_position(Vec3::new(0.0, 5.0, 0.0)).as_light());
        (scene, floor)
    }

    fn floor_ray() -> Ray {
        Ray::new(Vec3::new(3.0, 3.0, 0.0), Vec3::new(-3.0, -3.0, 0.0))
    }

    #[test]
    fn miss_returns_sky() {
        let scene = Scene::new();
        let r = renderer();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(r.trace(&scene, &[], &ray, 0), SKY);
    }

    #[test]
    fn light_sources_render_white() {
        let (scene, _) = floor_scene(100);
        let r = renderer();
        let lights = scene.lights();
        let up = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert_eq!(r.trace(&scene, &lights, &up, 0), WHITE);
    }

    #[test]
    fn shadow_removes_point_light_contribution() {
        let (mut scene, _) = floor_scene(100);
        let r = renderer();
        let ambient_and_sun = (100.0 * (AMBIENT + SUN_INTENSITY * sun_dir().y)) as u8;

        let lit = r.trace(&scene, &scene.lights(), &floor_ray(), 0);
        assert!(lit[0] > ambient_and_sun + 100);

        scene.add(Object::prism("Blocker", Vec3::splat(1.0)).with_position(Vec3::new(0.0, 2.0, 0.0)));
        let shadowed = r.trace(&scene, &scene.lights(), &floor_ray(), 0);
        assert_eq!(shadowed, Rgb([ambient_and_sun; 3]));
    }

    #[test]
    fn other_lights_do_not_cast_shadows() {
        // A dim emitter hangs straight between the lamp and the lit floor point.
        let (mut scene, _) = floor_scene(40);
        scene.add(Object::sphere("Dim lamp", 0.3).with_position(Vec3::new(0.0, 2.0, 0.0)).as_light());
        let r = renderer();
        let c = r.trace(&scene, &scene.lights(), &floor_ray(), 0);

        let base = 40.0;
        let origin = Vec3::new(0.0, SHADOW_BIAS, 0.0);
        let term = |y: f32| {
            let dist = (Vec3::new(0.0, y, 0.0) - origin).length();
            base * LIGHT_GAIN / (1.0 + LIGHT_FALLOFF * dist)
        };
        let ambient_and_sun = base * AMBIENT + base * SUN_INTENSITY * sun_dir().y;
        let both = ambient_and_sun + term(5.0) + term(2.0);
        let dim_only = ambient_and_sun + term(2.0);
        assert!(both < 255.0);
        assert!((c[0] as f32 - both).abs() <= 1.0, "got {}, expected {both}", c[0]);
        assert!((c[0] as f32 - dim_only).abs() > 10.0);
    }

    #[test]
    fn channels_saturate_at_255() {
        let mut scene = Scene::new();
        scene.add(Object::plane("Floor", Vec3::Y).with_color([250, 250, 250]));
        for i in 0..6 {
            let pos = Vec3::new(i as f32 * 0.1, 1.0, 0.0);
            scene.add(Object::sphere(format!("Lamp {i}"), 0.05).with_position(pos).as_light());
        }
        let r = renderer();
        let c = r.trace(&scene, &scene.lights(), &floor_ray(), 0);
        assert_eq!(c, WHITE);
    }

    #[test]
    fn light_colour_does_not_tint_the_surface() {
        let (mut scene, _) = floor_scene(100);
        let r = renderer();
        let white = r.trace(&scene, &scene.lights(), &floor_ray(), 0);
        let lamp = scene.find_by_name("Lamp").unwrap();
        scene.get_mut(lamp).unwrap().color = Rgb([255, 0, 0]);
        let red = r.trace(&scene, &scene.lights(), &floor_ray(), 0);
        assert_eq!(red, white);
        assert_eq!(red[0], red[2]);
    }

    #[test]
    fn depth_limit_returns_black() {
        let (scene, _) = floor_scene(100);
        let r = renderer().with_max_bounces(0);
        assert_eq!(r.trace(&scene, &scene.lights(), &floor_ray(), 0), BLACK);
        let r = renderer();
        assert_eq!(r.trace(&scene, &scene.lights(), &floor_ray(), DEFAULT_MAX_BOUNCES), BLACK);
    }

    #[test]
    fn closest_hit_picks_smallest_t() {
        let mut scene = Scene::new();
        let far = scene.add(Object::sphere("far", 1.0).with_position(Vec3::new(0.0, 0.0, -10.0)));
        let near = scene.add(Object::sphere("near", 1.0).with_position(Vec3::new(0.0, 0.0, -4.0)));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let hit = closest_hit(&scene, &ray).unwrap();
        assert_eq!(hit.object, near);
        assert!((hit.t - 3.0).abs() < 1e-5);
        scene.remove(near);
        assert_eq!(closest_hit(&scene, &ray).unwrap().object, far);
    }

    #[test]
    fn zero_sized_frames_are_a_no_op() {
        let scene = Scene::demo();
        let r = renderer();
        assert!(r.render_buffer(&scene, &Camera::demo(), 0, 10, None).is_empty());
        let img = r.render_image(&scene, &Camera::demo(), 16, 0);
        assert_eq!(img.dimensions(), (16, 0));
    }

    #[test]
    fn pick_selects_object_under_cursor() {
        let mut scene = Scene::new();
        let ball = scene.add(Object::sphere("Ball", 1.0));
        let mut camera = Camera::default();
        camera.aspect_ratio = 1.0;
        let r = renderer();
        assert_eq!(r.pick(&scene, &camera, 50.0, 50.0, 100.0, 100.0), Some(ball));
        assert_eq!(r.pick(&scene, &camera, 2.0, 2.0, 100.0, 100.0), None);
        assert_eq!(r.pick(&scene, &camera, -1.0, 50.0, 100.0, 100.0), None);
    }

    #[test]
    fn band_offsets_do_not_wrap_on_huge_frames() {
        let (w, h) = (70_000u32, 70_000u32);
        let last = h.div_ceil(CHUNK_ROWS) - 1;
        let (start, len) = band_span(last, w, h);
        assert_eq!(start, last as usize * 8 * 70_000);
        assert!(start > u32::MAX as usize);
        assert_eq!(start + len, w as usize * h as usize);
        assert_eq!(band_span(0, 13, 5), (0, 65));
    }

    #[test]
    fn band_count_covers_partial_last_band() {
        let scene = Scene::demo();
        let mut camera = Camera::demo();
        camera.aspect_ratio = 13.0 / 19.0;
        let r = renderer();
        let buf = r.render_buffer(&scene, &camera, 13, 19, None);
        assert_eq!(buf.len(), 13 * 19);
        let img = r.render_image(&scene, &camera, 13, 19);
        assert_eq!(img.get_pixel(12, 18), &buf[18 * 13 + 12]);
    }
}
