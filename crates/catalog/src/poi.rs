use std::borrow::Borrow;
use std::fmt;

use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Unique point-of-interest identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoiId(String);

impl PoiId {
    pub fn new(id: impl Into<String>) -> Self {
        PoiId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PoiId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PoiId {
    fn from(s: &str) -> Self {
        PoiId(s.to_string())
    }
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position in source-image pixels (origin top-left, y down).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: f64,
    pub y: f64,
}

impl PixelCoord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<PixelCoord> for Vec2 {
    fn from(c: PixelCoord) -> Self {
        Vec2::new(c.x, c.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: PoiId,
    pub name: String,
    pub category: Category,
    pub coord: PixelCoord,
    pub summary: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
}

impl Poi {
    pub fn position(&self) -> Vec2 {
        self.coord.into()
    }
}

/// The raster backdrop; its pixel extent defines the map bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapImage {
    pub src: String,
    pub width: f64,
    pub height: f64,
}

impl MapImage {
    pub fn bounds(&self) -> Aabb2 {
        Aabb2::from_size(self.width, self.height)
    }
}
