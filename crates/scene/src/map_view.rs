use std::fmt;
use std::sync::Arc;

use catalog::{Catalog, Category, Poi};
use foundation::math::Vec2;
use foundation::time::Time;
use runtime::event_bus::SubscriptionId;
use runtime::scheduler::Scheduler;
use tracing::{debug, warn};

use crate::config::{ConfigError, MapConfig};
use crate::coords::CoordinateSystem;
use crate::filter::{CategoryFilter, VisibleSet};
use crate::markers::MarkerRegistry;
use crate::overlay::{FilterEntry, MarkerView, OverlaySnapshot, PointView, ScreenPoint, ViewportView};
use crate::selection::{SelectionController, Tooltip};
use crate::viewport::{ViewportController, ViewportEvent, ViewportMode};

/// The element the map is drawn into. Only its laid-out size matters here.
pub trait Surface {
    /// Container size in screen pixels, or `None` while it is not laid out.
    fn measure(&self) -> Option<Vec2>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Deferred {
    Remeasure,
}

/// One mounted festival map: filter, markers, camera and selection wired
/// together over a shared read-only catalog.
///
/// All mutation goes through `&mut self` on the host's event/frame callbacks.
/// Every camera change is pumped through the viewport bus: markers and the
/// tooltip are brought up to date first, then subscribers are notified, so a
/// listener never observes a stale frame.
pub struct MapView {
    catalog: Arc<Catalog>,
    config: MapConfig,
    filter: CategoryFilter,
    visible: VisibleSet,
    markers: MarkerRegistry,
    viewport: ViewportController,
    selection: SelectionController,
    scheduler: Scheduler<Deferred>,
    surface: Option<Box<dyn Surface>>,
    sheet_expanded: bool,
}

impl fmt::Debug for MapView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapView")
            .field("catalog_revision", &self.catalog.revision())
            .field("filter", &self.filter)
            .field("markers", &self.markers.len())
            .field("viewport", &self.viewport.state())
            .field("selection", &self.selection)
            .field("mounted", &self.surface.is_some())
            .finish_non_exhaustive()
    }
}

impl MapView {
    pub fn new(catalog: Arc<Catalog>, config: MapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let coords = CoordinateSystem::for_image(catalog.image());
        let filter = CategoryFilter::all();
        let visible = VisibleSet::collect(&catalog, &filter);
        Ok(Self {
            viewport: ViewportController::new(coords, config.clone()),
            catalog,
            config,
            filter,
            visible,
            markers: MarkerRegistry::new(),
            selection: SelectionController::new(),
            scheduler: Scheduler::new(),
            surface: None,
            sheet_expanded: false,
        })
    }

    /// Attaches to `surface` and fits the image into it.
    ///
    /// A surface without a usable size leaves the view unmounted and is
    /// dropped; the caller retries with the next mount. Mounting an already
    /// mounted view tears the previous mount down first.
    pub fn mount(&mut self, surface: Box<dyn Surface>, now: Time) -> bool {
        if self.is_mounted() {
            self.teardown();
        }
        let Some(size) = surface.measure() else {
            warn!("map container not available; mount skipped");
            return false;
        };
        if !self.viewport.init(size, now) {
            return false;
        }
        self.surface = Some(surface);
        self.refresh_markers();
        self.scheduler
            .schedule_after(now, self.config.remeasure_delay_s, Deferred::Remeasure);
        debug!(
            markers = self.markers.len(),
            revision = self.catalog.revision(),
            "map view mounted"
        );
        self.pump();
        true
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some() && self.viewport.is_mounted()
    }

    /// Host frame callback: runs due deferred work, then advances any focus
    /// animation.
    pub fn tick(&mut self, now: Time) {
        for (_, task) in self.scheduler.take_due(now) {
            match task {
                Deferred::Remeasure => {
                    self.remeasure(now);
                }
            }
        }
        self.viewport.tick(now);
        self.pump();
    }

    /// Re-reads the container size (window resize, orientation change).
    pub fn resize(&mut self, now: Time) -> bool {
        let changed = self.remeasure(now);
        self.pump();
        changed
    }

    /// Releases markers, listeners, deferred work and the surface.
    /// Safe to call any number of times, mounted or not. Selection ids
    /// survive so a remount shows the same point.
    pub fn teardown(&mut self) {
        let was_mounted = self.surface.is_some();
        let deferred = self.scheduler.pending_count();
        self.scheduler.clear();
        let destroyed = self.markers.clear();
        self.selection.hide_tooltip();
        self.viewport.teardown();
        self.surface = None;
        if was_mounted {
            debug!(markers = destroyed, deferred, "map view torn down");
        }
    }

    /// Flips a category and resyncs markers; hides the tooltip if the
    /// active point was filtered out. Returns whether it is now enabled.
    pub fn toggle_category(&mut self, category: Category) -> bool {
        let enabled = self.filter.toggle(category);
        debug!(category = category.key(), enabled, "category toggled");
        self.refresh_visible();
        enabled
    }

    pub fn set_category(&mut self, category: Category, enabled: bool) {
        if self.filter.is_enabled(category) != enabled {
            self.toggle_category(category);
        }
    }

    /// Activates `id` and flies the camera to it.
    ///
    /// A point hidden by the filter is only focused; it does not become
    /// active because it has no marker to anchor a tooltip to. Returns
    /// whether `id` is now the active point.
    pub fn select(&mut self, id: &str, now: Time) -> bool {
        let Some(poi) = self.catalog.get(id) else {
            warn!(poi_id = id, "select ignored: unknown point");
            return false;
        };
        let target = poi.position();
        let poi_id = poi.id.clone();
        let activated = if self.visible.contains_id(&self.catalog, id) {
            self.selection.select(&self.catalog, id)
        } else {
            debug!(poi_id = id, "hidden point focused without activating it");
            false
        };
        self.refresh_markers();
        self.viewport.focus(target, Some(poi_id), now);
        self.pump();
        activated
    }

    pub fn marker_tap(&mut self, id: &str, now: Time) -> bool {
        self.select(id, now)
    }

    /// Flies to `id` without touching the selection.
    pub fn focus(&mut self, id: &str, now: Time) -> bool {
        let Some(poi) = self.catalog.get(id) else {
            warn!(poi_id = id, "focus ignored: unknown point");
            return false;
        };
        let started = self.viewport.focus(poi.position(), Some(poi.id.clone()), now);
        self.pump();
        started
    }

    pub fn clear_active(&mut self) -> bool {
        let cleared = self.selection.clear_active();
        if cleared {
            self.refresh_markers();
        }
        cleared
    }

    /// Tap on the map background.
    pub fn background_tap(&mut self) -> bool {
        self.clear_active()
    }

    pub fn open_detail(&mut self, id: &str) -> bool {
        self.selection.open_detail(&self.catalog, id)
    }

    pub fn close_detail(&mut self) -> bool {
        self.selection.close_detail()
    }

    /// Returns the new expanded state of the bottom list sheet.
    pub fn toggle_sheet(&mut self) -> bool {
        self.sheet_expanded = !self.sheet_expanded;
        self.sheet_expanded
    }

    /// Swaps in a new catalog. Markers for removed points are destroyed,
    /// the active point is cleared if it is no longer visible, and the
    /// detail view is closed if its point no longer exists. Returns `false`
    /// when the catalog is unchanged.
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>, now: Time) -> bool {
        if catalog.revision() == self.catalog.revision()
            && catalog.image() == self.catalog.image()
            && catalog.styles() == self.catalog.styles()
        {
            return false;
        }
        let image_changed = catalog.image() != self.catalog.image();
        debug!(
            from = self.catalog.revision(),
            to = catalog.revision(),
            image_changed,
            "catalog replaced"
        );
        self.catalog = catalog;
        if image_changed {
            self.viewport
                .rebind(CoordinateSystem::for_image(self.catalog.image()), now);
        }
        self.selection.retain_catalog(&self.catalog);
        self.refresh_visible();
        self.pump();
        true
    }

    pub fn pan_by(&mut self, delta: Vec2, now: Time) -> bool {
        let moved = self.viewport.pan_by(delta, now);
        self.pump();
        moved
    }

    pub fn zoom_at(&mut self, delta: f64, anchor: Vec2, now: Time) -> bool {
        let moved = self.viewport.zoom_at(delta, anchor, now);
        self.pump();
        moved
    }

    pub fn zoom_in(&mut self, now: Time) -> bool {
        let moved = self.viewport.zoom_by(self.config.zoom_step, now);
        self.pump();
        moved
    }

    pub fn zoom_out(&mut self, now: Time) -> bool {
        let moved = self.viewport.zoom_by(-self.config.zoom_step, now);
        self.pump();
        moved
    }

    pub fn set_view(&mut self, center: Vec2, zoom: f64, now: Time) -> bool {
        let moved = self.viewport.set_view(center, zoom, now);
        self.pump();
        moved
    }

    /// Registers a "viewport changed" listener. Listeners are dropped on
    /// teardown.
    pub fn subscribe(&mut self, listener: impl FnMut(&ViewportEvent) + 'static) -> SubscriptionId {
        self.viewport.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.viewport.unsubscribe(id)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn mode(&self) -> ViewportMode {
        self.viewport.mode()
    }

    /// Visible points in catalog order.
    pub fn visible_points(&self) -> Vec<&Poi> {
        self.visible.points(&self.catalog).collect()
    }

    pub fn active_point(&self) -> Option<&Poi> {
        self.selection.active_point(&self.catalog)
    }

    pub fn modal_point(&self) -> Option<&Poi> {
        self.selection.modal_point(&self.catalog)
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.selection.tooltip()
    }

    pub fn is_sheet_expanded(&self) -> bool {
        self.sheet_expanded
    }

    /// Inverse of the marker transform for the current frame.
    pub fn screen_to_pixel(&self, screen: Vec2) -> Option<Vec2> {
        let state = self.viewport.state()?;
        Some(self.viewport.coords().to_pixel(screen, state))
    }

    /// Markers back to front.
    pub fn marker_views(&self) -> Vec<MarkerView> {
        self.markers
            .draw_order()
            .into_iter()
            .map(MarkerView::from)
            .collect()
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        let filters = Category::ALL
            .into_iter()
            .map(|category| {
                let style = self.catalog.style(category);
                FilterEntry {
                    category,
                    label: style.map_or_else(|| category.key().to_string(), |s| s.label.clone()),
                    color: style.map(|s| s.color.clone()).unwrap_or_default(),
                    checked: self.filter.is_enabled(category),
                }
            })
            .collect();
        OverlaySnapshot {
            filters,
            visible: self.visible.points(&self.catalog).map(PointView::from).collect(),
            active: self.active_point().map(PointView::from),
            tooltip: self.selection.tooltip().map(|t| ScreenPoint::from(t.position)),
            modal: self.modal_point().map(PointView::from),
            viewport: self
                .viewport
                .state()
                .map(|s| ViewportView::new(s, self.viewport.mode() == ViewportMode::Animating)),
            sheet_expanded: self.sheet_expanded,
            catalog_revision: self.catalog.revision().to_string(),
        }
    }

    fn remeasure(&mut self, now: Time) -> bool {
        let Some(size) = self.surface.as_ref().and_then(|s| s.measure()) else {
            return false;
        };
        self.viewport.resize(size, now)
    }

    fn refresh_visible(&mut self) {
        self.visible = VisibleSet::collect(&self.catalog, &self.filter);
        self.selection.retain_visible(&self.catalog, &self.visible);
        self.refresh_markers();
    }

    fn refresh_markers(&mut self) {
        if let Some(state) = self.viewport.state().copied() {
            let report = self.markers.reconcile(
                &self.catalog,
                &self.visible,
                self.selection.active(),
                self.viewport.coords(),
                &state,
                &self.config,
            );
            if report.active_removed {
                self.selection.clear_active();
            }
        }
        self.selection
            .recompute_tooltip(&self.catalog, self.viewport.coords(), self.viewport.state());
    }

    fn pump(&mut self) {
        let events = self.viewport.drain_events();
        if events.is_empty() {
            return;
        }
        if let Some(state) = self.viewport.state().copied() {
            self.markers.reposition(self.viewport.coords(), &state);
        }
        self.selection
            .recompute_tooltip(&self.catalog, self.viewport.coords(), self.viewport.state());
        self.viewport.notify(&events);
    }
}

#[cfg(test)]
mod tests {
    use super::{MapView, Surface};
    use crate::config::MapConfig;
    use crate::viewport::{ViewportChange, ViewportMode};
    use catalog::{Catalog, Category, PoiId};
    use foundation::math::Vec2;
    use foundation::time::Time;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeSet;
    use std::rc::Rc;
    use std::sync::Arc;

    const EPS: f64 = 1e-6;

    #[derive(Clone)]
    struct FakeSurface(Rc<Cell<Option<Vec2>>>);

    impl FakeSurface {
        fn sized(w: f64, h: f64) -> Self {
            Self(Rc::new(Cell::new(Some(Vec2::new(w, h)))))
        }

        fn detached() -> Self {
            Self(Rc::new(Cell::new(None)))
        }

        fn set(&self, w: f64, h: f64) {
            self.0.set(Some(Vec2::new(w, h)));
        }
    }

    impl Surface for FakeSurface {
        fn measure(&self) -> Option<Vec2> {
            self.0.get()
        }
    }

    /// Two points: `A` on a stage, `B` at a pub.
    fn two_point_catalog() -> Arc<Catalog> {
        let festival = Catalog::festival().unwrap();
        let json = r#"[
            {"id":"A","name":"Main stage","category":"stage","coord":{"x":300,"y":300},"summary":"s","details":"d"},
            {"id":"B","name":"Pub row","category":"pub","coord":{"x":800,"y":1000},"summary":"s","details":"d","hours":"18:00 - 24:00"}
        ]"#;
        Arc::new(
            Catalog::points_from_json(json, festival.image().clone(), festival.styles().clone())
                .unwrap(),
        )
    }

    fn mounted(catalog: Arc<Catalog>) -> (MapView, FakeSurface) {
        let mut view = MapView::new(catalog, MapConfig::default()).unwrap();
        let surface = FakeSurface::sized(390.0, 700.0);
        assert!(view.mount(Box::new(surface.clone()), Time(0.0)));
        (view, surface)
    }

    fn ids(list: &[&str]) -> BTreeSet<PoiId> {
        list.iter().map(|s| PoiId::from(*s)).collect()
    }

    fn visible_ids(view: &MapView) -> BTreeSet<PoiId> {
        view.visible_points().iter().map(|p| p.id.clone()).collect()
    }

    fn assert_tooltip_consistent(view: &MapView) {
        match (view.active_point(), view.viewport().state()) {
            (Some(poi), Some(state)) => {
                let expected = view.viewport().coords().to_screen(poi.position(), state);
                let tip = view.tooltip().expect("active point has a tooltip");
                assert!(tip.position.distance(expected) < EPS);
            }
            _ => assert!(view.tooltip().is_none()),
        }
    }

    #[test]
    fn scenario_filter_select_clear() {
        let (mut view, _surface) = mounted(two_point_catalog());
        assert_eq!(view.markers().ids(), ids(&["A", "B"]));

        assert!(view.select("B", Time(0.5)));
        assert!(!view.toggle_category(Category::Pub));
        assert_eq!(view.markers().ids(), ids(&["A"]));
        assert_eq!(view.selection().active(), None);
        assert!(view.tooltip().is_none());

        let zoom_before = view.viewport().state().unwrap().zoom;
        assert!(view.select("A", Time(1.0)));
        assert_eq!(view.selection().active(), Some(&PoiId::from("A")));
        assert_eq!(view.mode(), ViewportMode::Animating);
        let (center, zoom) = view.viewport().animation().unwrap().destination();
        assert_eq!(zoom, zoom_before.max(0.25));
        assert!(center.distance(Vec2::new(300.0, 300.0)) < EPS);

        assert!(view.open_detail("A"));
        assert!(view.clear_active());
        assert_eq!(view.selection().active(), None);
        assert!(view.tooltip().is_none());
        assert_eq!(view.selection().modal(), Some(&PoiId::from("A")));
    }

    #[test]
    fn markers_track_visible_subset_through_toggles() {
        let (mut view, _surface) = mounted(Arc::new(Catalog::festival().unwrap()));
        let sequence = [
            Category::Pub,
            Category::Stage,
            Category::Pub,
            Category::Parking,
            Category::Photo,
            Category::BusStop,
            Category::Stage,
            Category::Activity,
            Category::FoodTruck,
            Category::Parking,
        ];
        for category in sequence {
            view.toggle_category(category);
            assert_eq!(view.markers().ids(), visible_ids(&view));
        }
        for category in Category::ALL {
            view.set_category(category, false);
        }
        assert!(view.markers().is_empty());
        assert!(view.visible_points().is_empty());
    }

    #[test]
    fn unrelated_toggle_keeps_marker_handles() {
        let (mut view, _surface) = mounted(two_point_catalog());
        let handle = view.markers().handle("A").unwrap();
        let created = view.markers().metrics().counter(crate::markers::METRIC_CREATED);

        view.toggle_category(Category::Pub);
        view.toggle_category(Category::Pub);
        assert_eq!(view.markers().handle("A"), Some(handle));
        assert_eq!(
            view.markers().metrics().counter(crate::markers::METRIC_CREATED),
            created + 1
        );
    }

    #[test]
    fn active_marker_is_restyled_and_stacked_last() {
        let (mut view, _surface) = mounted(two_point_catalog());
        view.select("A", Time(0.1));
        let order = view.marker_views();
        assert_eq!(order.last().unwrap().id, PoiId::from("A"));
        assert!(order.last().unwrap().active);
        assert_eq!(order.last().unwrap().ring, "#ffffff");

        view.clear_active();
        assert!(view.marker_views().iter().all(|m| !m.active && m.scale == 1.0));
    }

    #[test]
    fn tooltip_stays_glued_through_animation_and_gestures() {
        let (mut view, _surface) = mounted(Arc::new(Catalog::festival().unwrap()));
        view.select("busStop-lake", Time(1.0));
        for i in 1..=12 {
            view.tick(Time(1.0 + i as f64 * 0.055));
            assert_tooltip_consistent(&view);
        }
        assert_eq!(view.mode(), ViewportMode::Idle);

        view.pan_by(Vec2::new(-40.0, 25.0), Time(2.0));
        assert_tooltip_consistent(&view);
        view.zoom_at(0.75, Vec2::new(100.0, 500.0), Time(2.1));
        assert_tooltip_consistent(&view);
        view.zoom_out(Time(2.2));
        assert_tooltip_consistent(&view);

        let tip = view.tooltip().unwrap().position;
        let marker = view.markers().get("busStop-lake").unwrap();
        assert!(marker.anchor.distance(tip) < EPS);
    }

    #[test]
    fn selecting_hidden_point_focuses_without_tooltip() {
        let (mut view, _surface) = mounted(two_point_catalog());
        view.toggle_category(Category::Pub);
        assert!(!view.select("B", Time(0.2)));
        assert_eq!(view.selection().active(), None);
        assert_eq!(view.mode(), ViewportMode::Animating);
        assert_eq!(
            view.viewport().animation().unwrap().target,
            Some(PoiId::from("B"))
        );
        assert!(!view.select("missing", Time(0.3)));
    }

    #[test]
    fn listeners_see_settled_state() {
        let (mut view, _surface) = mounted(two_point_catalog());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        view.subscribe(move |e| sink.borrow_mut().push((e.change, e.state)));

        view.pan_by(Vec2::new(12.0, -8.0), Time(0.1));
        view.focus("B", Time(0.2));
        view.tick(Time(0.5));
        view.tick(Time(1.0));

        let seen = seen.borrow();
        let changes: Vec<_> = seen.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            changes,
            vec![
                ViewportChange::Gesture,
                ViewportChange::Animation,
                ViewportChange::Settled
            ]
        );
        assert_eq!(seen.last().unwrap().1, *view.viewport().state().unwrap());
    }

    #[test]
    fn deferred_remeasure_picks_up_late_layout() {
        let (mut view, surface) = mounted(two_point_catalog());
        surface.set(430.0, 820.0);
        view.tick(Time(0.05));
        assert_eq!(view.viewport().state().unwrap().size, Vec2::new(390.0, 700.0));
        view.tick(Time(0.2));
        assert_eq!(view.viewport().state().unwrap().size, Vec2::new(430.0, 820.0));

        surface.set(500.0, 820.0);
        assert!(view.resize(Time(0.3)));
        assert!(!view.resize(Time(0.4)));
    }

    #[test]
    fn mount_without_container_is_a_noop_and_retries() {
        let mut view = MapView::new(two_point_catalog(), MapConfig::default()).unwrap();
        assert!(!view.mount(Box::new(FakeSurface::detached()), Time(0.0)));
        assert!(!view.mount(Box::new(FakeSurface::sized(0.0, 700.0)), Time(0.0)));
        assert!(!view.is_mounted());
        assert!(view.markers().is_empty());
        assert!(!view.pan_by(Vec2::new(1.0, 1.0), Time(0.1)));
        view.teardown();

        assert!(view.mount(Box::new(FakeSurface::sized(390.0, 700.0)), Time(1.0)));
        assert_eq!(view.markers().len(), 2);
    }

    #[test]
    fn teardown_is_idempotent() {
        let (mut view, _surface) = mounted(two_point_catalog());
        view.subscribe(|_| {});
        view.select("A", Time(0.1));
        view.teardown();
        view.teardown();

        assert!(!view.is_mounted());
        assert!(view.markers().is_empty());
        assert_eq!(view.viewport().listener_count(), 0);
        assert!(view.tooltip().is_none());
        assert_eq!(view.snapshot().viewport, None);
        view.tick(Time(2.0));
        assert!(view.markers().is_empty());

        assert!(view.mount(Box::new(FakeSurface::sized(390.0, 700.0)), Time(3.0)));
        assert_tooltip_consistent(&view);
        assert!(view.tooltip().is_some());
    }

    #[test]
    fn catalog_swap_drops_removed_points() {
        let (mut view, _surface) = mounted(two_point_catalog());
        view.select("B", Time(0.1));
        view.open_detail("B");

        let mut doc = view.catalog().to_document();
        assert!(!view.replace_catalog(Arc::new(Catalog::from_document(doc.clone()).unwrap()), Time(0.2)));

        doc.points.retain(|p| p.id.as_str() != "B");
        assert!(view.replace_catalog(Arc::new(Catalog::from_document(doc).unwrap()), Time(0.3)));
        assert_eq!(view.markers().ids(), ids(&["A"]));
        assert_eq!(view.selection().active(), None);
        assert_eq!(view.selection().modal(), None);
        assert!(view.tooltip().is_none());
    }

    #[test]
    fn filtering_keeps_modal_open() {
        let (mut view, _surface) = mounted(two_point_catalog());
        view.open_detail("B");
        view.toggle_category(Category::Pub);
        assert_eq!(view.modal_point().map(|p| p.name.as_str()), Some("Pub row"));
    }

    #[test]
    fn screen_to_pixel_inverts_marker_anchor() {
        let (mut view, _surface) = mounted(two_point_catalog());
        view.set_view(Vec2::new(500.0, 600.0), 0.8, Time(0.1));
        let anchor = view.markers().get("A").unwrap().anchor;
        let back = view.screen_to_pixel(anchor).unwrap();
        assert!(back.distance(Vec2::new(300.0, 300.0)) < EPS);
    }

    #[test]
    fn snapshot_reflects_overlay_state() {
        let (mut view, _surface) = mounted(two_point_catalog());
        view.toggle_category(Category::Pub);
        view.select("A", Time(0.1));
        view.open_detail("A");
        assert!(view.toggle_sheet());

        let snap = view.snapshot();
        assert_eq!(snap.filters.len(), Category::ALL.len());
        let pub_row = snap.filters.iter().find(|f| f.category == Category::Pub).unwrap();
        assert!(!pub_row.checked);
        assert_eq!(pub_row.color, "#f97316");
        assert_eq!(
            snap.visible.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            vec!["A"]
        );
        assert_eq!(snap.active.as_ref().map(|p| p.id.as_str()), Some("A"));
        assert!(snap.tooltip.is_some());
        assert!(snap.viewport.unwrap().animating);
        assert!(snap.sheet_expanded);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["active"]["id"], "A");
        assert_eq!(json["sheetExpanded"], true);
        assert_eq!(json["filters"][0]["category"], "stage");
    }
}
