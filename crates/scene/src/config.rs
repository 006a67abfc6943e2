use serde::{Deserialize, Serialize};

/// Largest accepted `|min_zoom|` and `|max_zoom|`; keeps `2^zoom` a finite
/// positive scale.
pub const ZOOM_LIMIT: f64 = 64.0;

/// Tuning knobs for the map view. All zoom values are log2 scale factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// `focus` never leaves the camera below this zoom.
    pub focus_zoom: f64,
    /// Fraction of the image extent added on every side to form the pan limit.
    pub bounds_padding: f64,
    pub fly_duration_s: f64,
    /// Shape of the focus ease-out; smaller is more front-loaded.
    pub ease_linearity: f64,
    /// Zoom delta for one discrete zoom-in/zoom-out step.
    pub zoom_step: f64,
    /// Delay of the container re-measure after mount.
    pub remeasure_delay_s: f64,
    pub active_marker_scale: f64,
    pub active_z_offset: i32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            min_zoom: -2.0,
            max_zoom: 2.0,
            focus_zoom: 0.25,
            bounds_padding: 0.1,
            fly_duration_s: 0.6,
            ease_linearity: 0.3,
            zoom_step: 0.25,
            remeasure_delay_s: 0.12,
            active_marker_scale: 1.2,
            active_z_offset: 1_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    NonFinite(&'static str),
    InvertedZoomRange { min: f64, max: f64 },
    OutOfRange { field: &'static str, value: f64 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "map config parse error: {msg}"),
            ConfigError::NonFinite(field) => write!(f, "map config field {field} must be finite"),
            ConfigError::InvertedZoomRange { min, max } => {
                write!(f, "min_zoom ({min}) must not exceed max_zoom ({max})")
            }
            ConfigError::OutOfRange { field, value } => {
                write!(f, "map config field {field} is out of range: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl MapConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg = serde_json::from_str::<MapConfig>(json)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validated()
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("focus_zoom", self.focus_zoom),
            ("bounds_padding", self.bounds_padding),
            ("fly_duration_s", self.fly_duration_s),
            ("ease_linearity", self.ease_linearity),
            ("zoom_step", self.zoom_step),
            ("remeasure_delay_s", self.remeasure_delay_s),
            ("active_marker_scale", self.active_marker_scale),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite(*field));
        }
        for (field, value) in [("min_zoom", self.min_zoom), ("max_zoom", self.max_zoom)] {
            if value.abs() > ZOOM_LIMIT {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::InvertedZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if self.focus_zoom < self.min_zoom || self.focus_zoom > self.max_zoom {
            return Err(ConfigError::OutOfRange {
                field: "focus_zoom",
                value: self.focus_zoom,
            });
        }
        if self.ease_linearity <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "ease_linearity",
                value: self.ease_linearity,
            });
        }
        if self.active_marker_scale <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "active_marker_scale",
                value: self.active_marker_scale,
            });
        }
        for (field, value) in [
            ("bounds_padding", self.bounds_padding),
            ("fly_duration_s", self.fly_duration_s),
            ("zoom_step", self.zoom_step),
            ("remeasure_delay_s", self.remeasure_delay_s),
        ] {
            if value < 0.0 {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}
