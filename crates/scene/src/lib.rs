//! Viewport, marker and selection engine for the festival map.

pub mod animation;
pub mod config;
pub mod coords;
pub mod filter;
pub mod map_view;
pub mod markers;
pub mod overlay;
pub mod selection;
pub mod style;
pub mod viewport;

pub use config::{ConfigError, MapConfig};
pub use coords::{CoordinateSystem, ViewportState};
pub use filter::{CategoryFilter, VisibleSet};
pub use map_view::{MapView, Surface};
pub use markers::{Marker, MarkerRegistry, ReconcileReport};
pub use overlay::OverlaySnapshot;
pub use selection::{SelectionController, Tooltip};
pub use viewport::{ViewportChange, ViewportController, ViewportEvent, ViewportMode};
