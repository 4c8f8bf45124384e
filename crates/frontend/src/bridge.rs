//! Rust side of the Leaflet bridge (`assets/map_bridge.js`).
//!
//! Calls go out through the global functions the bridge installs on
//! `window`; map events come back as `CustomEvent`s whose `detail` is a JSON
//! string.

use dioxus::prelude::*;
use futures::channel::mpsc::UnboundedSender;
use satfinder_shared::geo::{
    OverlayStyle, AOI_COLOR, MAP_CENTER_LAT, MAP_CENTER_LNG, MAP_ZOOM, RESULT_STYLE,
    TILE_ATTRIBUTION, TILE_MAX_ZOOM, TILE_URL,
};
use satfinder_shared::models::{display_number, Geometry};
use satfinder_shared::page::{MapCommand, SearchPage};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::{wasm_bindgen, Closure, JsValue};
use wasm_bindgen::JsCast;

pub const MAP_CONTAINER_ID: &str = "map";

pub const EVENT_AOI_DRAWN: &str = "satfinder:aoi-drawn";
pub const EVENT_AOI_EDITED: &str = "satfinder:aoi-edited";
pub const EVENT_AOI_DELETED: &str = "satfinder:aoi-deleted";
pub const EVENT_RESULT_CLICKED: &str = "satfinder:result-clicked";

const EVENTS: [&str; 4] = [
    EVENT_AOI_DRAWN,
    EVENT_AOI_EDITED,
    EVENT_AOI_DELETED,
    EVENT_RESULT_CLICKED,
];

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = initSearchMap)]
    fn init_search_map(container_id: &str, options_json: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_name = setDrawControl)]
    fn set_draw_control(active: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_name = clearDrawnShapes)]
    fn clear_drawn_shapes() -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_name = clearResultOverlays)]
    fn clear_result_overlays() -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_name = addResultOverlays)]
    fn add_result_overlays(overlays_json: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_name = fitResultBounds)]
    fn fit_result_bounds(south: f64, west: f64, north: f64, east: f64) -> Result<(), JsValue>;
}

/// Everything `initSearchMap` needs to build the map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub center: [f64; 2],
    pub zoom: u8,
    pub tile_url: &'static str,
    pub max_zoom: u8,
    pub attribution: &'static str,
    pub aoi_color: &'static str,
    pub result_style: OverlayStyle,
}

impl Default for MapOptions {
    fn default() -> Self {
        MapOptions {
            center: [MAP_CENTER_LAT, MAP_CENTER_LNG],
            zoom: MAP_ZOOM,
            tile_url: TILE_URL,
            max_zoom: TILE_MAX_ZOOM,
            attribution: TILE_ATTRIBUTION,
            aoi_color: AOI_COLOR,
            result_style: RESULT_STYLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    AoiDrawn(Geometry),
    AoiEdited(Geometry),
    AoiDeleted { remaining: usize },
    ResultClicked(String),
}

#[derive(Deserialize)]
struct GeometryDetail {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct DeletedDetail {
    remaining: usize,
}

#[derive(Deserialize)]
struct ClickedDetail {
    id: serde_json::Value,
}

/// Decode a bridge event from its name and JSON `detail`.
pub fn parse_event(name: &str, detail: &str) -> Result<BridgeEvent, String> {
    let err = |e: serde_json::Error| format!("bad {} detail: {}", name, e);
    match name {
        EVENT_AOI_DRAWN => serde_json::from_str::<GeometryDetail>(detail)
            .map(|d| BridgeEvent::AoiDrawn(d.geometry))
            .map_err(err),
        EVENT_AOI_EDITED => serde_json::from_str::<GeometryDetail>(detail)
            .map(|d| BridgeEvent::AoiEdited(d.geometry))
            .map_err(err),
        EVENT_AOI_DELETED => serde_json::from_str::<DeletedDetail>(detail)
            .map(|d| BridgeEvent::AoiDeleted {
                remaining: d.remaining,
            })
            .map_err(err),
        EVENT_RESULT_CLICKED => {
            let d = serde_json::from_str::<ClickedDetail>(detail).map_err(err)?;
            match d.id {
                serde_json::Value::String(s) => Ok(BridgeEvent::ResultClicked(s)),
                serde_json::Value::Number(n) => {
                    Ok(BridgeEvent::ResultClicked(display_number(&n)))
                }
                other => Err(format!("bad {} id: {}", name, other)),
            }
        }
        _ => Err(format!("unknown bridge event {}", name)),
    }
}

/// Build the map. Fails while Leaflet is still loading.
pub fn init_map() -> Result<(), String> {
    let options = serde_json::to_string(&MapOptions::default()).map_err(|e| e.to_string())?;
    init_search_map(MAP_CONTAINER_ID, &options).map_err(js_error)
}

/// Forward every bridge event into `tx` for the rest of the page's life.
pub fn listen(tx: UnboundedSender<BridgeEvent>) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window")?;
    for name in EVENTS {
        let tx = tx.clone();
        let callback = Closure::<dyn FnMut(web_sys::CustomEvent)>::new(
            move |event: web_sys::CustomEvent| {
                let detail = event.detail().as_string().unwrap_or_default();
                match parse_event(name, &detail) {
                    Ok(ev) => {
                        let _ = tx.unbounded_send(ev);
                    }
                    Err(e) => tracing::warn!(error = %e, "Dropping map event"),
                }
            },
        );
        window
            .add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
            .map_err(js_error)?;
        callback.forget();
    }
    Ok(())
}

/// Replay the page's queued map commands, once the map exists.
pub fn flush(mut page: Signal<SearchPage>, map_ready: Signal<bool>) {
    if !*map_ready.peek() {
        return;
    }
    let commands = page.write().take_map_commands();
    for command in commands {
        if let Err(e) = apply(&command) {
            tracing::error!(error = %e, ?command, "Map command failed");
        }
    }
}

fn apply(command: &MapCommand) -> Result<(), String> {
    let result = match command {
        MapCommand::ShowDrawControl => set_draw_control(true),
        MapCommand::HideDrawControl => set_draw_control(false),
        MapCommand::ClearDrawnShapes => clear_drawn_shapes(),
        MapCommand::ClearResultOverlays => clear_result_overlays(),
        MapCommand::AddResultOverlays(overlays) => {
            let json = serde_json::to_string(overlays).map_err(|e| e.to_string())?;
            add_result_overlays(&json)
        }
        MapCommand::FitBounds(b) => fit_result_bounds(b.south, b.west, b.north, b.east),
    };
    result.map_err(js_error)
}

/// Smooth-scroll a list entry into view.
pub fn scroll_into_view(dom_id: &str) {
    let Some(element) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(dom_id))
    else {
        tracing::warn!(dom_id, "List item not in document");
        return;
    };
    let options = web_sys::ScrollIntoViewOptions::new();
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    options.set_block(web_sys::ScrollLogicalPosition::Nearest);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

fn js_error(value: JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
