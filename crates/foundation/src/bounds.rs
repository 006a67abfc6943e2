use crate::math::Vec2;

/// Axis-aligned rectangle, `min` is the top-left corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb2 { min, max }
    }

    /// Rectangle anchored at the origin, e.g. the extent of a raster image.
    pub fn from_size(width: f64, height: f64) -> Self {
        Aabb2::new(Vec2::ZERO, Vec2::new(width, height))
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Aabb2::new(center - half, center + half)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    pub fn center(&self) -> Vec2 {
        self.min.lerp(self.max, 0.5)
    }

    /// Grows each side by `ratio` times the extent along that axis.
    pub fn pad(&self, ratio: f64) -> Self {
        let d = Vec2::new(self.width() * ratio, self.height() * ratio);
        Aabb2::new(self.min - d, self.max + d)
    }

    /// True if `other` lies inside `self`, allowing `eps` of slack on every side.
    pub fn contains_with_tolerance(&self, other: &Aabb2, eps: f64) -> bool {
        other.min.x >= self.min.x - eps
            && other.min.y >= self.min.y - eps
            && other.max.x <= self.max.x + eps
            && other.max.y <= self.max.y + eps
    }
}
