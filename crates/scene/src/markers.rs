use std::collections::{BTreeSet, HashMap};

use catalog::{Catalog, Category, PoiId};
use foundation::arena::Arena;
use foundation::handles::Handle;
use foundation::math::Vec2;
use runtime::metrics::Metrics;
use tracing::trace;

use crate::config::MapConfig;
use crate::coords::{CoordinateSystem, ViewportState};
use crate::filter::VisibleSet;
use crate::style::MarkerStyle;

pub const METRIC_CREATED: &str = "markers.created";
pub const METRIC_UPDATED: &str = "markers.updated";
pub const METRIC_DESTROYED: &str = "markers.destroyed";
pub const GAUGE_LIVE: &str = "markers.live";

/// Renderable proxy of one visible point.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub poi_id: PoiId,
    pub title: String,
    pub category: Category,
    /// Catalog position in image pixels.
    pub position: Vec2,
    /// Current screen anchor (marker center).
    pub anchor: Vec2,
    pub style: MarkerStyle,
    pub active: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub added: Vec<PoiId>,
    /// Sorted by id.
    pub removed: Vec<PoiId>,
    pub updated: usize,
    /// The active point's marker was among the removed ones.
    pub active_removed: bool,
}

/// Live marker set, keyed by point id.
///
/// Invariant: after [`MarkerRegistry::reconcile`] the key set equals the
/// visible subset exactly, and markers that stayed visible keep their handle.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    arena: Arena<Marker>,
    by_id: HashMap<PoiId, Handle>,
    metrics: Metrics,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconcile(
        &mut self,
        catalog: &Catalog,
        visible: &VisibleSet,
        active: Option<&PoiId>,
        coords: &CoordinateSystem,
        state: &ViewportState,
        config: &MapConfig,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let mut stale: Vec<PoiId> = self
            .by_id
            .keys()
            .filter(|id| !visible.contains_id(catalog, id.as_str()))
            .cloned()
            .collect();
        stale.sort();
        for id in stale {
            if let Some(handle) = self.by_id.remove(&id) {
                self.arena.remove(handle);
            }
            if active == Some(&id) {
                report.active_removed = true;
            }
            report.removed.push(id);
        }

        for index in visible.iter_indices() {
            let Some(poi) = catalog.points().get(index as usize) else {
                continue;
            };
            let is_active = active == Some(&poi.id);
            let style = MarkerStyle::resolve(catalog.style(poi.category), is_active, config);
            let position = poi.position();
            let anchor = coords.to_screen(position, state);

            let existing = self
                .by_id
                .get(&poi.id)
                .copied()
                .and_then(|h| self.arena.get_mut(h));
            match existing {
                Some(marker) => {
                    marker.title.clone_from(&poi.name);
                    marker.category = poi.category;
                    marker.position = position;
                    marker.anchor = anchor;
                    marker.style = style;
                    marker.active = is_active;
                    report.updated += 1;
                }
                None => {
                    let handle = self.arena.alloc(Marker {
                        poi_id: poi.id.clone(),
                        title: poi.name.clone(),
                        category: poi.category,
                        position,
                        anchor,
                        style,
                        active: is_active,
                    });
                    self.by_id.insert(poi.id.clone(), handle);
                    report.added.push(poi.id.clone());
                }
            }
        }

        self.metrics.inc_counter(METRIC_CREATED, report.added.len() as u64);
        self.metrics.inc_counter(METRIC_UPDATED, report.updated as u64);
        self.metrics
            .inc_counter(METRIC_DESTROYED, report.removed.len() as u64);
        self.metrics.set_gauge(GAUGE_LIVE, self.arena.len() as i64);
        trace!(
            added = report.added.len(),
            updated = report.updated,
            removed = report.removed.len(),
            "markers reconciled"
        );
        report
    }

    /// Moves every marker anchor to the given viewport frame.
    pub fn reposition(&mut self, coords: &CoordinateSystem, state: &ViewportState) {
        for (_, marker) in self.arena.iter_mut() {
            marker.anchor = coords.to_screen(marker.position, state);
        }
    }

    /// Destroys every marker and returns how many existed.
    pub fn clear(&mut self) -> usize {
        self.by_id.clear();
        let dropped = self.arena.clear();
        self.metrics.inc_counter(METRIC_DESTROYED, dropped as u64);
        self.metrics.set_gauge(GAUGE_LIVE, 0);
        dropped
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Marker> {
        self.handle(id).and_then(|h| self.arena.get(h))
    }

    pub fn handle(&self, id: &str) -> Option<Handle> {
        self.by_id.get(id).copied()
    }

    pub fn ids(&self) -> BTreeSet<PoiId> {
        self.by_id.keys().cloned().collect()
    }

    /// Markers back to front: inactive first, the active one last.
    pub fn draw_order(&self) -> Vec<&Marker> {
        let mut out: Vec<&Marker> = self.arena.iter().map(|(_, m)| m).collect();
        out.sort_by(|a, b| {
            a.style
                .z_offset
                .cmp(&b.style.z_offset)
                .then_with(|| a.anchor.y.total_cmp(&b.anchor.y))
        });
        out
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerRegistry, METRIC_CREATED, METRIC_DESTROYED};
    use crate::config::MapConfig;
    use crate::coords::{CoordinateSystem, ViewportState};
    use crate::filter::{CategoryFilter, VisibleSet};
    use catalog::{Catalog, Category, PoiId};
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    struct Fixture {
        catalog: Catalog,
        coords: CoordinateSystem,
        state: ViewportState,
        config: MapConfig,
    }

    fn fixture() -> Fixture {
        let catalog = Catalog::festival().unwrap();
        let coords = CoordinateSystem::for_image(catalog.image());
        Fixture {
            catalog,
            coords,
            state: ViewportState {
                center: Vec2::new(540.0, 675.0),
                zoom: -1.0,
                size: Vec2::new(390.0, 700.0),
            },
            config: MapConfig::default(),
        }
    }

    fn reconcile(
        reg: &mut MarkerRegistry,
        fx: &Fixture,
        filter: &CategoryFilter,
        active: Option<&PoiId>,
    ) -> super::ReconcileReport {
        let visible = VisibleSet::collect(&fx.catalog, filter);
        reg.reconcile(&fx.catalog, &visible, active, &fx.coords, &fx.state, &fx.config)
    }

    fn expected_ids(fx: &Fixture, filter: &CategoryFilter) -> BTreeSet<PoiId> {
        fx.catalog
            .points()
            .iter()
            .filter(|p| filter.is_visible(p))
            .map(|p| p.id.clone())
            .collect()
    }

    #[test]
    fn key_set_tracks_filter_through_toggles() {
        let fx = fixture();
        let mut reg = MarkerRegistry::new();
        let mut filter = CategoryFilter::all();
        reconcile(&mut reg, &fx, &filter, None);
        assert_eq!(reg.ids(), expected_ids(&fx, &filter));

        for c in [
            Category::Pub,
            Category::Stage,
            Category::Pub,
            Category::Parking,
            Category::BusStop,
            Category::Stage,
        ] {
            filter.toggle(c);
            reconcile(&mut reg, &fx, &filter, None);
            assert_eq!(reg.ids(), expected_ids(&fx, &filter), "after toggling {c}");
            assert_eq!(reg.len(), reg.ids().len());
        }
    }

    #[test]
    fn surviving_markers_keep_their_handle() {
        let fx = fixture();
        let mut reg = MarkerRegistry::new();
        let mut filter = CategoryFilter::all();
        reconcile(&mut reg, &fx, &filter, None);
        let before = reg.handle("stage-main").unwrap();
        let created = reg.metrics().counter(METRIC_CREATED);

        filter.toggle(Category::Pub);
        let report = reconcile(&mut reg, &fx, &filter, None);
        assert_eq!(report.removed, vec![PoiId::from("pub-g1")]);
        assert!(report.added.is_empty());
        assert_eq!(reg.handle("stage-main"), Some(before));
        assert_eq!(reg.metrics().counter(METRIC_CREATED), created);
        assert_eq!(reg.metrics().counter(METRIC_DESTROYED), 1);
    }

    #[test]
    fn active_marker_is_restyled_and_reported_on_removal() {
        let fx = fixture();
        let mut reg = MarkerRegistry::new();
        let mut filter = CategoryFilter::all();
        let active = PoiId::from("pub-g1");
        reconcile(&mut reg, &fx, &filter, Some(&active));

        let m = reg.get("pub-g1").unwrap();
        assert!(m.active);
        assert_eq!(m.style.z_offset, fx.config.active_z_offset);
        assert!(!reg.get("stage-main").unwrap().active);
        assert_eq!(reg.draw_order().last().map(|m| m.poi_id.as_str()), Some("pub-g1"));

        filter.toggle(Category::Pub);
        let report = reconcile(&mut reg, &fx, &filter, Some(&active));
        assert!(report.active_removed);
        assert!(reg.get("pub-g1").is_none());
    }

    #[test]
    fn anchors_follow_viewport() {
        let mut fx = fixture();
        let mut reg = MarkerRegistry::new();
        reconcile(&mut reg, &fx, &CategoryFilter::all(), None);

        fx.state.zoom = 0.5;
        fx.state.center = Vec2::new(300.0, 300.0);
        reg.reposition(&fx.coords, &fx.state);
        for poi in fx.catalog.points() {
            let m = reg.get(poi.id.as_str()).unwrap();
            assert_eq!(m.anchor, fx.coords.to_screen(poi.position(), &fx.state));
        }
    }

    #[test]
    fn clear_destroys_everything_and_is_repeatable() {
        let fx = fixture();
        let mut reg = MarkerRegistry::new();
        reconcile(&mut reg, &fx, &CategoryFilter::all(), None);
        assert_eq!(reg.clear(), fx.catalog.len());
        assert_eq!(reg.clear(), 0);
        assert!(reg.is_empty());
        assert!(reg.ids().is_empty());
    }
}
