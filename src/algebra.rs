use serde::Deserialize;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Below this length a vector is treated as zero when normalizing.
const NORMALIZE_EPS: f32 = 1e-6;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self { Self { x, y, z } }
    pub const fn splat(v: f32) -> Self { Self::new(v, v, v) }

    pub fn scale(self, f: f32) -> Self { Self::new(self.x * f, self.y * f, self.z * f) }
    pub fn dot(self, v: Self) -> f32 { self.x * v.x + self.y * v.y + self.z * v.z }
    pub fn cross(self, v: Self) -> Self {
        Self::new(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x,
        )
    }
    pub fn length_squared(self) -> f32 { self.dot(self) }
    pub fn length(self) -> f32 { self.length_squared().sqrt() }
    pub fn abs(self) -> Self { Self::new(self.x.abs(), self.y.abs(), self.z.abs()) }
    pub fn min(self, v: Self) -> Self { Self::new(self.x.min(v.x), self.y.min(v.y), self.z.min(v.z)) }
    pub fn max(self, v: Self) -> Self { Self::new(self.x.max(v.x), self.y.max(v.y), self.z.max(v.z)) }

    /// Unit vector in the same direction, or the zero vector when the input
    /// is too short to normalize.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len < NORMALIZE_EPS {
            return Self::ZERO;
        }
        self / len
    }

    /// In-place variant of [`Vec3::normalized`]; degenerate input is left untouched.
    pub fn normalize(&mut self) {
        let len = self.length();
        if len > NORMALIZE_EPS {
            *self = *self / len;
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, v: Vec3) -> Vec3 { Vec3::new(self.x + v.x, self.y + v.y, self.z + v.z) }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, v: Vec3) { *self = *self + v; }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, v: Vec3) -> Vec3 { Vec3::new(self.x - v.x, self.y - v.y, self.z - v.z) }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, v: Vec3) { *self = *self - v; }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, f: f32) -> Vec3 { self.scale(f) }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 { v.scale(self) }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    fn div(self, f: f32) -> Vec3 { Vec3::new(self.x / f, self.y / f, self.z / f) }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 { Vec3::new(-self.x, -self.y, -self.z) }
}

impl From<[f32; 3]> for Vec3 {
    fn from(a: [f32; 3]) -> Self { Vec3::new(a[0], a[1], a[2]) }
}

/* Custom helper so Serde turns a JSON array into Vec3 */
pub fn vec3_from_array<'de, D>(d: D) -> Result<Vec3, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let arr = <[f32; 3]>::deserialize(d)?;
    Ok(arr.into())
}

pub fn option_vec3_from_array<'de, D>(d: D) -> Result<Option<Vec3>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let arr = <Option<[f32; 3]>>::deserialize(d)?;
    Ok(arr.map(Vec3::from))
}
