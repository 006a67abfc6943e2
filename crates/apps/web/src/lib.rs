use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;

use catalog::{Catalog, Category};
use console_error_panic_hook::set_once;
use foundation::math::Vec2;
use foundation::time::Time;
use runtime::event_bus::SubscriptionId;
use scene::{MapConfig, MapView, Surface, ViewportChange, ViewportEvent};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::prelude::*;
use web_sys::Element;

#[wasm_bindgen(start)]
pub fn start() {
    set_once();
    init_tracing();
}

/// Routes engine `tracing` events to the browser console.
fn init_tracing() {
    let _ = tracing::subscriber::set_global_default(console_subscriber(ConsoleWriter::default));
}

fn console_subscriber<W>(make_writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(make_writer)
        .without_time()
        .with_ansi(false)
        .with_max_level(Level::DEBUG)
        .finish()
}

/// Buffers one formatted event and prints it when dropped.
#[derive(Default)]
struct ConsoleWriter(Vec<u8>);

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(line) = console_line(&self.0) {
            log(&line);
        }
    }
}

fn console_line(buf: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(buf);
    let line = line.trim_end();
    (!line.is_empty()).then(|| line.to_string())
}

/// The map container element, measured on demand.
struct DomSurface {
    element: Element,
}

impl Surface for DomSurface {
    fn measure(&self) -> Option<Vec2> {
        container_size(self.element.client_width(), self.element.client_height())
    }
}

fn container_size(width: i32, height: i32) -> Option<Vec2> {
    (width > 0 && height > 0).then(|| Vec2::new(f64::from(width), f64::from(height)))
}

fn find_element(id: &str) -> Option<Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

fn change_name(change: ViewportChange) -> &'static str {
    match change {
        ViewportChange::Fit => "fit",
        ViewportChange::Gesture => "gesture",
        ViewportChange::Animation => "animation",
        ViewportChange::Settled => "settled",
        ViewportChange::Resize => "resize",
    }
}

fn parse_category(key: &str) -> Result<Category, String> {
    Category::from_key(key).ok_or_else(|| format!("unknown category: {key}"))
}

fn finite(name: &str, values: &[f64]) -> Result<(), JsValue> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(JsValue::from_str(&format!("{name} args must be finite")))
    }
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn event_object(event: &ViewportEvent) -> Result<JsValue, JsValue> {
    let out = js_sys::Object::new();
    let s = &event.state;
    js_sys::Reflect::set(
        &out,
        &JsValue::from_str("frame"),
        &JsValue::from_f64(event.frame_index as f64),
    )?;
    js_sys::Reflect::set(
        &out,
        &JsValue::from_str("change"),
        &JsValue::from_str(change_name(event.change)),
    )?;
    js_sys::Reflect::set(&out, &JsValue::from_str("centerX"), &JsValue::from_f64(s.center.x))?;
    js_sys::Reflect::set(&out, &JsValue::from_str("centerY"), &JsValue::from_f64(s.center.y))?;
    js_sys::Reflect::set(&out, &JsValue::from_str("zoom"), &JsValue::from_f64(s.zoom))?;
    js_sys::Reflect::set(&out, &JsValue::from_str("width"), &JsValue::from_f64(s.size.x))?;
    js_sys::Reflect::set(&out, &JsValue::from_str("height"), &JsValue::from_f64(s.size.y))?;
    Ok(out.into())
}

/// Festival map handle for the page.
///
/// Viewport events are collected by a Rust listener into an outbox and
/// handed to JS callbacks after each call returns, so a callback may call
/// back into the map without re-entering it.
#[wasm_bindgen]
pub struct FestivalMap {
    view: MapView,
    outbox: Rc<RefCell<Vec<ViewportEvent>>>,
    bridge: Option<SubscriptionId>,
    callbacks: Vec<(u32, js_sys::Function)>,
    next_callback: u32,
}

#[wasm_bindgen]
impl FestivalMap {
    /// Builds a map over `catalog_json` (the built-in festival catalog when
    /// absent) with an optional `MapConfig` JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(
        catalog_json: Option<String>,
        config_json: Option<String>,
    ) -> Result<FestivalMap, JsValue> {
        let catalog = match catalog_json.as_deref() {
            Some(json) => Catalog::from_json(json),
            None => Catalog::festival(),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let config = match config_json.as_deref() {
            Some(json) => MapConfig::from_json(json),
            None => Ok(MapConfig::default()),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let view = MapView::new(Arc::new(catalog), config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            view,
            outbox: Rc::new(RefCell::new(Vec::new())),
            bridge: None,
            callbacks: Vec::new(),
            next_callback: 0,
        })
    }

    /// Mounts into the element with `container_id`. A missing or collapsed
    /// element leaves the map unmounted; call again once it is laid out.
    pub fn mount(&mut self, container_id: &str, now_ms: f64) -> Result<bool, JsValue> {
        finite("mount", &[now_ms])?;
        let Some(element) = find_element(container_id) else {
            log(&format!("map container #{container_id} not found"));
            return Ok(false);
        };
        self.release_bridge();
        self.view.teardown();
        let outbox = self.outbox.clone();
        self.bridge = Some(self.view.subscribe(move |e| outbox.borrow_mut().push(*e)));
        let mounted = self
            .view
            .mount(Box::new(DomSurface { element }), Time::from_millis(now_ms));
        if !mounted {
            log(&format!("map container #{container_id} has no size yet"));
        }
        self.flush();
        Ok(mounted)
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.view.is_mounted()
    }

    /// Animation-frame callback.
    pub fn tick(&mut self, now_ms: f64) -> Result<(), JsValue> {
        finite("tick", &[now_ms])?;
        self.view.tick(Time::from_millis(now_ms));
        self.flush();
        Ok(())
    }

    pub fn resize(&mut self, now_ms: f64) -> Result<bool, JsValue> {
        finite("resize", &[now_ms])?;
        let changed = self.view.resize(Time::from_millis(now_ms));
        self.flush();
        Ok(changed)
    }

    pub fn pan_by(&mut self, dx_px: f64, dy_px: f64, now_ms: f64) -> Result<bool, JsValue> {
        finite("pan_by", &[dx_px, dy_px, now_ms])?;
        let moved = self
            .view
            .pan_by(Vec2::new(dx_px, dy_px), Time::from_millis(now_ms));
        self.flush();
        Ok(moved)
    }

    pub fn zoom_at(&mut self, delta: f64, x_px: f64, y_px: f64, now_ms: f64) -> Result<bool, JsValue> {
        finite("zoom_at", &[delta, x_px, y_px, now_ms])?;
        let moved = self
            .view
            .zoom_at(delta, Vec2::new(x_px, y_px), Time::from_millis(now_ms));
        self.flush();
        Ok(moved)
    }

    pub fn zoom_in(&mut self, now_ms: f64) -> Result<bool, JsValue> {
        finite("zoom_in", &[now_ms])?;
        let moved = self.view.zoom_in(Time::from_millis(now_ms));
        self.flush();
        Ok(moved)
    }

    pub fn zoom_out(&mut self, now_ms: f64) -> Result<bool, JsValue> {
        finite("zoom_out", &[now_ms])?;
        let moved = self.view.zoom_out(Time::from_millis(now_ms));
        self.flush();
        Ok(moved)
    }

    /// Returns whether the category is now shown.
    pub fn toggle_category(&mut self, key: &str) -> Result<bool, JsValue> {
        let category = parse_category(key).map_err(|e| JsValue::from_str(&e))?;
        Ok(self.view.toggle_category(category))
    }

    pub fn select(&mut self, id: &str, now_ms: f64) -> Result<bool, JsValue> {
        finite("select", &[now_ms])?;
        let active = self.view.select(id, Time::from_millis(now_ms));
        self.flush();
        Ok(active)
    }

    pub fn clear_active(&mut self) -> bool {
        self.view.background_tap()
    }

    pub fn open_detail(&mut self, id: &str) -> bool {
        self.view.open_detail(id)
    }

    pub fn close_detail(&mut self) -> bool {
        self.view.close_detail()
    }

    pub fn toggle_sheet(&mut self) -> bool {
        self.view.toggle_sheet()
    }

    pub fn replace_catalog(&mut self, catalog_json: &str, now_ms: f64) -> Result<bool, JsValue> {
        finite("replace_catalog", &[now_ms])?;
        let catalog =
            Catalog::from_json(catalog_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let changed = self
            .view
            .replace_catalog(Arc::new(catalog), Time::from_millis(now_ms));
        self.flush();
        Ok(changed)
    }

    /// Overlay state as a JSON string.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.view.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Markers back to front as a JSON array.
    pub fn markers(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.view.marker_views())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Registers `callback(event)` for every viewport change. Returns an id
    /// for [`FestivalMap::off_viewport_change`].
    pub fn on_viewport_change(&mut self, callback: js_sys::Function) -> u32 {
        let id = self.next_callback;
        self.next_callback = self.next_callback.wrapping_add(1);
        self.callbacks.push((id, callback));
        id
    }

    pub fn off_viewport_change(&mut self, id: u32) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cid, _)| *cid != id);
        self.callbacks.len() != before
    }

    /// Releases the container, markers and every callback. Safe to repeat.
    pub fn teardown(&mut self) {
        self.release_bridge();
        self.view.teardown();
        self.callbacks.clear();
        self.outbox.borrow_mut().clear();
    }
}

impl FestivalMap {
    fn release_bridge(&mut self) {
        if let Some(id) = self.bridge.take() {
            self.view.unsubscribe(id);
        }
    }

    fn flush(&mut self) {
        let events: Vec<ViewportEvent> = self.outbox.borrow_mut().drain(..).collect();
        if events.is_empty() || self.callbacks.is_empty() {
            return;
        }
        for event in &events {
            let payload = match event_object(event) {
                Ok(v) => v,
                Err(err) => {
                    log(&format!("viewport event encode error: {:?}", err));
                    continue;
                }
            };
            for (_, callback) in &self.callbacks {
                if let Err(err) = callback.call1(&JsValue::NULL, &payload) {
                    log(&format!("viewport callback error: {:?}", err));
                }
            }
        }
    }
}
