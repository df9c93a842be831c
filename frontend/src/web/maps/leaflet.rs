//! Leaflet + OpenStreetMap 瓦片

use super::{MapBackend, MapError, MapEvents, global_exists, load_script, load_stylesheet};
use crate::serde_helper;
use podtrack_shared::map::{DEFAULT_ZOOM, LatLng};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors";

#[wasm_bindgen]
extern "C" {
    type LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    fn create_map(container: &HtmlElement) -> LeafletMap;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &JsValue, zoom: u8);

    #[wasm_bindgen(method, js_name = panTo)]
    fn pan_to(this: &LeafletMap, center: &JsValue);

    #[wasm_bindgen(method)]
    fn on(this: &LeafletMap, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn off(this: &LeafletMap);

    #[wasm_bindgen(method)]
    fn remove(this: &LeafletMap);

    type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &TileLayer, map: &LeafletMap);

    type Marker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn create_marker(position: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Marker, map: &LeafletMap);

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &Marker, position: &JsValue);

    #[wasm_bindgen(method)]
    fn remove(this: &Marker);
}

#[derive(Serialize)]
struct TileOptions {
    attribution: &'static str,
    #[serde(rename = "maxZoom")]
    max_zoom: u8,
}

/// 点击事件中只关心 `latlng`
#[derive(Deserialize)]
struct ClickEvent {
    latlng: LatLng,
}

/// Leaflet 接受 `[lat, lng]`
fn to_js(point: LatLng) -> JsValue {
    serde_helper::to_value(&[point.lat, point.lng]).unwrap_or(JsValue::NULL)
}

pub struct LeafletBackend {
    map: LeafletMap,
    marker: RefCell<Option<Marker>>,
    _on_click: Closure<dyn FnMut(JsValue)>,
}

impl LeafletBackend {
    pub async fn mount(
        container: HtmlElement,
        center: LatLng,
        events: MapEvents,
    ) -> Result<Self, MapError> {
        load_stylesheet("leaflet-css", LEAFLET_CSS)?;
        if !global_exists("L") {
            load_script("leaflet-js", LEAFLET_JS).await?;
        }

        let map = create_map(&container);
        map.set_view(&to_js(center), DEFAULT_ZOOM);

        let options = serde_helper::to_value(&TileOptions {
            attribution: ATTRIBUTION,
            max_zoom: 19,
        })
        .map_err(|e| MapError::Load(e.to_string()))?;
        tile_layer(TILE_URL, &options).add_to(&map);

        let on_click_cb = events.on_click;
        let on_click = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            match serde_helper::from_value::<ClickEvent>(event) {
                Ok(click) => on_click_cb(click.latlng),
                Err(e) => log::warn!("unexpected leaflet click event: {}", e),
            }
        });
        map.on("click", on_click.as_ref().unchecked_ref());

        Ok(Self {
            map,
            marker: RefCell::new(None),
            _on_click: on_click,
        })
    }
}

impl MapBackend for LeafletBackend {
    fn show_marker(&self, point: LatLng) {
        let mut marker = self.marker.borrow_mut();
        match marker.as_ref() {
            Some(existing) => existing.set_lat_lng(&to_js(point)),
            None => {
                let created = create_marker(&to_js(point));
                created.add_to(&self.map);
                *marker = Some(created);
            }
        }
    }

    fn clear_marker(&self) {
        if let Some(marker) = self.marker.borrow_mut().take() {
            marker.remove();
        }
    }

    fn pan_to(&self, point: LatLng) {
        self.map.pan_to(&to_js(point));
    }

    fn destroy(&self) {
        self.clear_marker();
        self.map.off();
        self.map.remove();
    }
}
