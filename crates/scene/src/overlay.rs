use catalog::{Category, Poi, PoiId};
use foundation::math::Vec2;
use serde::Serialize;

use crate::coords::ViewportState;
use crate::markers::Marker;

/// One row of the category filter control.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEntry {
    pub category: Category,
    pub label: String,
    pub color: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointView {
    pub id: PoiId,
    pub name: String,
    pub category: Category,
    pub summary: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
}

impl From<&Poi> for PointView {
    fn from(poi: &Poi) -> Self {
        Self {
            id: poi.id.clone(),
            name: poi.name.clone(),
            category: poi.category,
            summary: poi.summary.clone(),
            details: poi.details.clone(),
            hours: poi.hours.clone(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl From<Vec2> for ScreenPoint {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportView {
    pub center_x: f64,
    pub center_y: f64,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
    pub animating: bool,
}

impl ViewportView {
    pub fn new(state: &ViewportState, animating: bool) -> Self {
        Self {
            center_x: state.center.x,
            center_y: state.center.y,
            zoom: state.zoom,
            width: state.size.x,
            height: state.size.y,
            animating,
        }
    }
}

/// Marker as the renderer draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerView {
    pub id: PoiId,
    pub title: String,
    pub category: Category,
    pub x: f64,
    pub y: f64,
    pub fill: String,
    pub ring: String,
    pub scale: f64,
    pub diameter: f64,
    pub shadow_opacity: f64,
    pub z_offset: i32,
    pub active: bool,
}

impl From<&Marker> for MarkerView {
    fn from(m: &Marker) -> Self {
        Self {
            id: m.poi_id.clone(),
            title: m.title.clone(),
            category: m.category,
            x: m.anchor.x,
            y: m.anchor.y,
            fill: m.style.fill.clone(),
            ring: m.style.ring.to_string(),
            scale: m.style.scale,
            diameter: m.style.diameter_px(),
            shadow_opacity: m.style.shadow_opacity,
            z_offset: m.style.z_offset,
            active: m.active,
        }
    }
}

/// Everything the overlay renderer reads, captured at one instant.
///
/// Ordering contract:
/// - `filters` follows `Category::ALL`.
/// - `visible` follows catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySnapshot {
    pub filters: Vec<FilterEntry>,
    pub visible: Vec<PointView>,
    pub active: Option<PointView>,
    /// Screen position of the active point's tooltip for the current frame.
    pub tooltip: Option<ScreenPoint>,
    pub modal: Option<PointView>,
    pub viewport: Option<ViewportView>,
    pub sheet_expanded: bool,
    pub catalog_revision: String,
}
