use crate::algebra::Vec3;

/// Axis aligned bounding box, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box spanning `center ± half`.
    pub fn around(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half, center + half)
    }

    /// Smallest box holding every point.
    pub fn enclosing(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::new(*first, *first), |b, p| {
            Self::new(b.min.min(*p), b.max.max(*p))
        }))
    }

    pub fn pad(self, by: Vec3) -> Self {
        let by = by.abs();
        Self::new(self.min - by, self.max + by)
    }

    pub fn contains(&self, p: Vec3) -> bool {
        self.contains_within(p, 0.0)
    }

    /// `contains` with every face pushed outwards by `tol`.
    pub fn contains_within(&self, p: Vec3, tol: f32) -> bool {
        let (lo, hi) = (self.min - Vec3::splat(tol), self.max + Vec3::splat(tol));
        (lo.x..=hi.x).contains(&p.x) && (lo.y..=hi.y).contains(&p.y) && (lo.z..=hi.z).contains(&p.z)
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }
}
