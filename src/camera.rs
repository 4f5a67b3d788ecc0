//! Pinhole camera: view state, primary-ray generation and the eased
//! movement integrators an interactive front end drives every tick.

use crate::{aabb::Aabb, algebra::Vec3, ray::{Ray, EPSILON}};

/// Pitch beyond which a rotation request is dropped (about 86°).
const PITCH_LIMIT: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Point the camera looks at; `forward = normalize(target - position)`.
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near_plane: f32,
    pub far_plane: f32,

    pub move_speed: f32,
    pub rotation_speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,

    pub current_move_speed: f32,
    pub current_rotation_speed: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y, 60.0)
    }
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, up: Vec3, fov: f32) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio: 16.0 / 9.0,
            near_plane: 0.1,
            far_plane: 100.0,
            move_speed: 5.0,
            rotation_speed: 2.0,
            max_speed: 20.0,
            acceleration: 10.0,
            current_move_speed: 0.0,
            current_rotation_speed: 0.0,
        }
    }

    /// Viewpoint of the built-in demo scene.
    pub fn demo() -> Self {
        Self::new(Vec3::new(0.0, 3.0, 12.0), Vec3::ZERO, Vec3::Y, 55.0)
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalized()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalized()
    }

    /// Up axis orthogonal to forward and right.
    pub fn true_up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalized()
    }

    fn tan_half_fov(&self) -> f32 {
        (self.fov.to_radians() * 0.5).tan()
    }

    /// Primary ray through screen position `(x, y)` of a `w × h` viewport.
    /// Screen y grows downwards, view y upwards.
    pub fn get_ray(&self, x: f32, y: f32, w: f32, h: f32) -> Ray {
        let ndc_x = 2.0 * x / w - 1.0;
        let ndc_y = 1.0 - 2.0 * y / h;

        let tan_half = self.tan_half_fov();
        let view_x = ndc_x * self.aspect_ratio * tan_half;
        let view_y = ndc_y * tan_half;

        let dir = self.forward() + self.right() * view_x + self.true_up() * view_y;
        Ray::new(self.position, dir)
    }

    /// Screen position of a world point, or `None` when it is not in front
    /// of the camera. Inverse of [`Camera::get_ray`].
    pub fn project(&self, point: Vec3, w: f32, h: f32) -> Option<(f32, f32)> {
        let to_point = point - self.position;
        let local_z = to_point.dot(self.forward());
        if local_z <= EPSILON {
            return None;
        }
        let tan_half = self.tan_half_fov();
        let ndc_x = to_point.dot(self.right()) / (local_z * tan_half * self.aspect_ratio);
        let ndc_y = to_point.dot(self.true_up()) / (local_z * tan_half);
        Some(((ndc_x + 1.0) * 0.5 * w, (1.0 - ndc_y) * 0.5 * h))
    }

    /// Screen rectangle `(min_x, min_y, max_x, max_y)` around the projected
    /// corners of `bounds` that land inside the viewport.
    pub fn screen_rect(&self, bounds: &Aabb, w: f32, h: f32) -> Option<(f32, f32, f32, f32)> {
        bounds
            .corners()
            .iter()
            .filter_map(|c| self.project(*c, w, h))
            .filter(|(x, y)| (0.0..=w).contains(x) && (0.0..=h).contains(y))
            .fold(None, |acc, (x, y)| match acc {
                None => Some((x, y, x, y)),
                Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
            })
    }

    /// Shift position and target together, keeping the look direction.
    fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.target += delta;
    }

    fn step(&self, dt: f32) -> f32 {
        self.current_move_speed * dt
    }

    pub fn move_forward(&mut self, dt: f32) { self.translate(self.forward() * self.step(dt)); }
    pub fn move_backward(&mut self, dt: f32) { self.translate(-self.forward() * self.step(dt)); }
    pub fn move_right(&mut self, dt: f32) { self.translate(self.right() * self.step(dt)); }
    pub fn move_left(&mut self, dt: f32) { self.translate(-self.right() * self.step(dt)); }
    pub fn move_up(&mut self, dt: f32) { self.translate(self.true_up() * self.step(dt)); }
    pub fn move_down(&mut self, dt: f32) { self.translate(-self.true_up() * self.step(dt)); }

    /// Turn the view by `angle` radians in the forward/right plane.
    pub fn rotate_yaw(&mut self, angle: f32) {
        let new_forward = self.forward() * angle.cos() + self.right() * angle.sin();
        self.target = self.position + new_forward;
    }

    /// Tilt the view by `angle` radians in the forward/up plane. Requests that
    /// would leave the view within a few degrees of straight up or down are
    /// ignored.
    pub fn rotate_pitch(&mut self, angle: f32) {
        let new_forward = self.forward() * angle.cos() + self.true_up() * angle.sin();
        let pitch = new_forward.y.clamp(-1.0, 1.0).asin();
        if !(-PITCH_LIMIT..=PITCH_LIMIT).contains(&pitch) {
            return;
        }
        self.target = self.position + new_forward;
    }

    /// Ramp the movement speed toward `max_speed` while moving, and back to
    /// zero at twice the rate once released.
    pub fn update_speed(&mut self, dt: f32, is_moving: bool) {
        self.current_move_speed = self.ramp(self.current_move_speed, dt, is_moving);
    }

    pub fn update_rotation_speed(&mut self, dt: f32, is_rotating: bool) {
        self.current_rotation_speed = self.ramp(self.current_rotation_speed, dt, is_rotating);
    }

    fn ramp(&self, speed: f32, dt: f32, active: bool) -> f32 {
        if active {
            (speed + self.acceleration * dt).min(self.max_speed)
        } else {
            (speed - self.acceleration * dt * 2.0).max(0.0)
        }
    }
}
