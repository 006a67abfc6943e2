use catalog::CategoryStyle;

use crate::config::MapConfig;

/// Marker diameter in screen pixels at scale 1.
pub const MARKER_SIZE_PX: f64 = 22.0;

const FALLBACK_COLOR: &str = "#64748b";
const ACTIVE_RING: &str = "#ffffff";
const INACTIVE_RING: &str = "#f9fafb";

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub fill: String,
    pub ring: &'static str,
    pub scale: f64,
    pub shadow_opacity: f64,
    /// Stacking offset; active markers sit above their neighbours.
    pub z_offset: i32,
}

impl MarkerStyle {
    pub fn resolve(category: Option<&CategoryStyle>, active: bool, config: &MapConfig) -> Self {
        let fill = category
            .map(|s| s.color.clone())
            .unwrap_or_else(|| FALLBACK_COLOR.to_string());
        if active {
            Self {
                fill,
                ring: ACTIVE_RING,
                scale: config.active_marker_scale,
                shadow_opacity: 0.45,
                z_offset: config.active_z_offset,
            }
        } else {
            Self {
                fill,
                ring: INACTIVE_RING,
                scale: 1.0,
                shadow_opacity: 0.3,
                z_offset: 0,
            }
        }
    }

    /// Rendered diameter in screen pixels.
    pub fn diameter_px(&self) -> f64 {
        MARKER_SIZE_PX * self.scale
    }
}
