use catalog::{Catalog, Poi, PoiId};
use foundation::math::Vec2;
use tracing::{debug, warn};

use crate::coords::{CoordinateSystem, ViewportState};
use crate::filter::VisibleSet;

/// Screen position of the active point's tooltip for one viewport frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub poi_id: PoiId,
    pub position: Vec2,
}

/// Tracks the active (tooltip) point and the modal (detail) point.
///
/// Both slots hold ids only. The tooltip is derived: it is rebuilt from the
/// active id and a viewport frame by [`SelectionController::recompute_tooltip`]
/// and never edited directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionController {
    active: Option<PoiId>,
    modal: Option<PoiId>,
    tooltip: Option<Tooltip>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&PoiId> {
        self.active.as_ref()
    }

    pub fn modal(&self) -> Option<&PoiId> {
        self.modal.as_ref()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn active_point<'a>(&self, catalog: &'a Catalog) -> Option<&'a Poi> {
        self.active.as_ref().and_then(|id| catalog.get(id.as_str()))
    }

    pub fn modal_point<'a>(&self, catalog: &'a Catalog) -> Option<&'a Poi> {
        self.modal.as_ref().and_then(|id| catalog.get(id.as_str()))
    }

    /// Makes `id` the active point. Unknown ids leave the selection alone.
    pub fn select(&mut self, catalog: &Catalog, id: &str) -> bool {
        let Some(poi) = catalog.get(id) else {
            warn!(poi_id = id, "select ignored: unknown point");
            return false;
        };
        debug!(poi_id = %poi.id, "point selected");
        self.active = Some(poi.id.clone());
        true
    }

    /// Returns `true` if a point was active.
    pub fn clear_active(&mut self) -> bool {
        self.tooltip = None;
        self.active.take().is_some()
    }

    pub fn open_detail(&mut self, catalog: &Catalog, id: &str) -> bool {
        let Some(poi) = catalog.get(id) else {
            warn!(poi_id = id, "open_detail ignored: unknown point");
            return false;
        };
        self.modal = Some(poi.id.clone());
        true
    }

    pub fn close_detail(&mut self) -> bool {
        self.modal.take().is_some()
    }

    /// Rebuilds the tooltip for the given frame. No frame (unmounted view)
    /// means no tooltip; an active id missing from the catalog is dropped.
    pub fn recompute_tooltip(
        &mut self,
        catalog: &Catalog,
        coords: &CoordinateSystem,
        state: Option<&ViewportState>,
    ) -> Option<&Tooltip> {
        self.tooltip = None;
        let id = self.active.as_ref()?;
        let Some(poi) = catalog.get(id.as_str()) else {
            warn!(poi_id = %id, "active point vanished from catalog");
            self.active = None;
            return None;
        };
        let state = state?;
        self.tooltip = Some(Tooltip {
            poi_id: poi.id.clone(),
            position: coords.to_screen(poi.position(), state),
        });
        self.tooltip.as_ref()
    }

    /// Clears the active point when it is not in `visible`. Returns `true`
    /// if it was cleared.
    pub fn retain_visible(&mut self, catalog: &Catalog, visible: &VisibleSet) -> bool {
        match &self.active {
            Some(id) if !visible.contains_id(catalog, id.as_str()) => {
                debug!(poi_id = %id, "active point filtered out");
                self.clear_active()
            }
            _ => false,
        }
    }

    /// Drops the modal point if it no longer exists in `catalog`. Filtering
    /// never closes the modal, only removal does.
    pub fn retain_catalog(&mut self, catalog: &Catalog) -> bool {
        match &self.modal {
            Some(id) if !catalog.contains(id.as_str()) => {
                debug!(poi_id = %id, "modal point removed from catalog");
                self.close_detail()
            }
            _ => false,
        }
    }

    pub fn hide_tooltip(&mut self) {
        self.tooltip = None;
    }
}
