use catalog::PoiId;
use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use foundation::time::Time;
use runtime::event_bus::{EventBus, SubscriptionId};
use runtime::frame::Frame;
use tracing::{debug, trace, warn};

use crate::animation::{Easing, FlyTo};
use crate::config::MapConfig;
use crate::coords::{CoordinateSystem, ViewportState};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViewportMode {
    Idle,
    Animating,
}

/// What moved the camera.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViewportChange {
    /// Initial fit, or a refit after the image changed.
    Fit,
    Gesture,
    Animation,
    /// Last tick of a focus animation.
    Settled,
    Resize,
}

/// The "viewport changed" event. Carries the full state so consumers never
/// read a stale transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportEvent {
    pub frame_index: u64,
    pub change: ViewportChange,
    pub state: ViewportState,
}

/// Owns the camera: pan/zoom state, bounds constraints and focus animations.
///
/// Unmounted (no measured container) until [`ViewportController::init`]
/// succeeds; every operation is a no-op while unmounted.
#[derive(Debug)]
pub struct ViewportController {
    config: MapConfig,
    coords: CoordinateSystem,
    max_bounds: Aabb2,
    state: Option<ViewportState>,
    animation: Option<FlyTo>,
    frame: Option<Frame>,
    bus: EventBus<ViewportEvent>,
}

impl ViewportController {
    pub fn new(coords: CoordinateSystem, config: MapConfig) -> Self {
        let max_bounds = coords.bounds().pad(config.bounds_padding);
        Self {
            config,
            coords,
            max_bounds,
            state: None,
            animation: None,
            frame: None,
            bus: EventBus::new(),
        }
    }

    pub fn coords(&self) -> &CoordinateSystem {
        &self.coords
    }

    /// Image bounds grown by the configured padding; the pan limit.
    pub fn max_bounds(&self) -> Aabb2 {
        self.max_bounds
    }

    pub fn state(&self) -> Option<&ViewportState> {
        self.state.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    pub fn mode(&self) -> ViewportMode {
        if self.animation.is_some() {
            ViewportMode::Animating
        } else {
            ViewportMode::Idle
        }
    }

    pub fn animation(&self) -> Option<&FlyTo> {
        self.animation.as_ref()
    }

    /// Measures in: fits the whole image into `size`. Returns `false` and
    /// stays unmounted when the size is unusable.
    pub fn init(&mut self, size: Vec2, now: Time) -> bool {
        if !usable_size(size) {
            warn!(width = size.x, height = size.y, "viewport container has no usable size");
            return false;
        }
        self.animation = None;
        let state = self.fit(size);
        debug!(zoom = state.zoom, width = size.x, height = size.y, "viewport mounted");
        self.commit(state, ViewportChange::Fit, now);
        true
    }

    /// Swaps the coordinate system (new backdrop image) and refits.
    pub fn rebind(&mut self, coords: CoordinateSystem, now: Time) {
        self.coords = coords;
        self.max_bounds = coords.bounds().pad(self.config.bounds_padding);
        self.animation = None;
        if let Some(size) = self.state.map(|s| s.size) {
            let state = self.fit(size);
            self.commit(state, ViewportChange::Fit, now);
        }
    }

    pub fn resize(&mut self, size: Vec2, now: Time) -> bool {
        let Some(current) = self.state else {
            return false;
        };
        if !usable_size(size) {
            warn!(width = size.x, height = size.y, "ignoring degenerate resize");
            return false;
        }
        if current.size == size {
            return false;
        }
        let next = self.clamped(ViewportState { size, ..current });
        self.commit(next, ViewportChange::Resize, now);
        true
    }

    /// Drag by `delta` screen pixels; content follows the pointer.
    pub fn pan_by(&mut self, delta: Vec2, now: Time) -> bool {
        let Some(current) = self.state else {
            return false;
        };
        if !delta.is_finite() {
            return false;
        }
        self.cancel_animation();
        let center = current.center - delta / current.scale();
        let next = self.clamped(ViewportState { center, ..current });
        self.commit(next, ViewportChange::Gesture, now);
        true
    }

    /// Zoom by `delta` levels keeping the image point under `anchor` fixed.
    pub fn zoom_at(&mut self, delta: f64, anchor: Vec2, now: Time) -> bool {
        let Some(current) = self.state else {
            return false;
        };
        if !delta.is_finite() || !anchor.is_finite() {
            return false;
        }
        self.cancel_animation();
        let pinned = self.coords.to_pixel(anchor, &current);
        let zoom = self.clamp_zoom(current.zoom + delta);
        let center = pinned - (anchor - current.size * 0.5) / zoom.exp2();
        let next = self.clamped(ViewportState {
            center,
            zoom,
            ..current
        });
        self.commit(next, ViewportChange::Gesture, now);
        true
    }

    pub fn zoom_by(&mut self, delta: f64, now: Time) -> bool {
        let Some(current) = self.state else {
            return false;
        };
        self.zoom_at(delta, current.size * 0.5, now)
    }

    pub fn set_view(&mut self, center: Vec2, zoom: f64, now: Time) -> bool {
        let Some(current) = self.state else {
            return false;
        };
        if !center.is_finite() || !zoom.is_finite() {
            return false;
        }
        self.cancel_animation();
        let next = self.clamped(ViewportState {
            center,
            zoom,
            ..current
        });
        self.commit(next, ViewportChange::Gesture, now);
        true
    }

    /// Starts an eased move to `target`, replacing any move in flight.
    ///
    /// The destination zoom is `max(current, focus_zoom)`, so focusing never
    /// zooms out.
    pub fn focus(&mut self, target: Vec2, poi: Option<PoiId>, now: Time) -> bool {
        let Some(current) = self.state else {
            return false;
        };
        if !target.is_finite() {
            return false;
        }
        self.cancel_animation();
        let to_zoom = self.clamp_zoom(current.zoom.max(self.config.focus_zoom));
        let to_center = self.clamp_center(target, to_zoom, current.size);
        let mut fly = FlyTo::new(
            (current.center, current.zoom),
            (to_center, to_zoom),
            now,
            self.config.fly_duration_s,
            Easing::ease_out(self.config.ease_linearity),
        );
        if let Some(id) = poi {
            fly = fly.toward(id);
        }
        debug!(
            poi = ?fly.target,
            from_zoom = current.zoom,
            to_zoom,
            "focus animation started"
        );
        self.animation = Some(fly);
        true
    }

    /// Advances the focus animation; emits one event per tick while animating.
    pub fn tick(&mut self, now: Time) -> bool {
        let (Some(current), Some(fly)) = (self.state, self.animation.as_ref()) else {
            return false;
        };
        let sample = fly.sample(now);
        let next = self.clamped(ViewportState {
            center: sample.center,
            zoom: sample.zoom,
            ..current
        });
        let change = if sample.finished {
            debug!(poi = ?fly.target, "focus animation settled");
            self.animation = None;
            ViewportChange::Settled
        } else {
            ViewportChange::Animation
        };
        self.commit(next, change, now);
        true
    }

    /// Returns `true` if an animation was in flight.
    pub fn cancel_animation(&mut self) -> bool {
        let cancelled = self.animation.take();
        if let Some(fly) = &cancelled {
            trace!(poi = ?fly.target, "focus animation cancelled");
        }
        cancelled.is_some()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ViewportEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }

    /// Takes pending events without notifying listeners.
    pub fn drain_events(&mut self) -> Vec<ViewportEvent> {
        self.bus.drain()
    }

    pub fn notify(&mut self, events: &[ViewportEvent]) {
        self.bus.notify(events);
    }

    /// Releases the camera, animation and every listener. Safe to repeat.
    pub fn teardown(&mut self) {
        if self.state.is_some() || self.bus.listener_count() > 0 {
            debug!(listeners = self.bus.listener_count(), "viewport torn down");
        }
        self.state = None;
        self.animation = None;
        self.frame = None;
        self.bus.clear();
    }

    fn commit(&mut self, state: ViewportState, change: ViewportChange, now: Time) {
        let frame = match self.frame {
            Some(f) => f.next_at(now),
            None => Frame::first(now),
        };
        self.frame = Some(frame);
        self.state = Some(state);
        trace!(
            frame = frame.index,
            ?change,
            zoom = state.zoom,
            x = state.center.x,
            y = state.center.y,
            "viewport changed"
        );
        self.bus.emit(ViewportEvent {
            frame_index: frame.index,
            change,
            state,
        });
    }

    fn fit(&self, size: Vec2) -> ViewportState {
        let image = self.coords.bounds();
        let ratio = (size.x / image.width()).min(size.y / image.height());
        let zoom = self.clamp_zoom(ratio.log2());
        self.clamped(ViewportState {
            center: image.center(),
            zoom,
            size,
        })
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.config.min_zoom, self.config.max_zoom)
    }

    fn clamped(&self, state: ViewportState) -> ViewportState {
        let zoom = self.clamp_zoom(state.zoom);
        ViewportState {
            center: self.clamp_center(state.center, zoom, state.size),
            zoom,
            size: state.size,
        }
    }

    /// Keeps the visible rectangle inside the padded bounds; on an axis where
    /// the view is larger than the bounds, centers on them instead.
    fn clamp_center(&self, center: Vec2, zoom: f64, size: Vec2) -> Vec2 {
        let half = size / (2.0 * zoom.exp2());
        let b = self.max_bounds;
        Vec2::new(
            clamp_axis(center.x, half.x, b.min.x, b.max.x),
            clamp_axis(center.y, half.y, b.min.y, b.max.y),
        )
    }
}

fn clamp_axis(c: f64, half: f64, lo: f64, hi: f64) -> f64 {
    let (min_c, max_c) = (lo + half, hi - half);
    if min_c > max_c {
        (lo + hi) * 0.5
    } else {
        c.clamp(min_c, max_c)
    }
}

fn usable_size(size: Vec2) -> bool {
    size.is_finite() && size.x > 0.0 && size.y > 0.0
}
