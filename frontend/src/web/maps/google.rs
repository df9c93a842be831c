//! Google Maps JavaScript API + Places Autocomplete

use super::{MapBackend, MapError, MapEvents, global_exists, load_script};
use crate::serde_helper;
use podtrack_shared::map::{DEFAULT_ZOOM, LatLng};
use serde::Serialize;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, HtmlInputElement};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = Map)]
    type GoogleMap;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "Map")]
    fn new(container: &HtmlElement, options: &JsValue) -> GoogleMap;

    #[wasm_bindgen(method, js_name = panTo)]
    fn pan_to(this: &GoogleMap, position: &JsValue);

    #[wasm_bindgen(method, js_name = addListener)]
    fn add_listener(this: &GoogleMap, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = Marker)]
    type GoogleMarker;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "Marker")]
    fn new(options: &JsValue) -> GoogleMarker;

    #[wasm_bindgen(method, js_name = setPosition)]
    fn set_position(this: &GoogleMarker, position: &JsValue);

    #[wasm_bindgen(method, js_name = setMap)]
    fn set_map(this: &GoogleMarker, map: Option<&GoogleMap>);

    #[wasm_bindgen(js_namespace = ["google", "maps", "places"], js_name = Autocomplete)]
    type Autocomplete;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps", "places"], js_class = "Autocomplete")]
    fn new(input: &HtmlInputElement) -> Autocomplete;

    #[wasm_bindgen(method, js_name = addListener)]
    fn add_listener(this: &Autocomplete, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = getPlace)]
    fn get_place(this: &Autocomplete) -> JsValue;

    /// `google.maps.LatLng`：坐标通过方法读取
    type GoogleLatLng;

    #[wasm_bindgen(method)]
    fn lat(this: &GoogleLatLng) -> f64;

    #[wasm_bindgen(method)]
    fn lng(this: &GoogleLatLng) -> f64;

    #[wasm_bindgen(js_namespace = ["google", "maps", "event"], js_name = clearInstanceListeners)]
    fn clear_instance_listeners(instance: &JsValue);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions {
    center: LatLng,
    zoom: u8,
    street_view_control: bool,
    map_type_control: bool,
}

fn to_js(point: LatLng) -> JsValue {
    serde_helper::to_value(&point).unwrap_or(JsValue::NULL)
}

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn read_lat_lng(value: &JsValue) -> LatLng {
    let point = value.unchecked_ref::<GoogleLatLng>();
    LatLng::new(point.lat(), point.lng())
}

/// `place.geometry.location` 与 `formatted_address`（缺省时取 `name`）
fn read_place(place: &JsValue) -> Option<(LatLng, Option<String>)> {
    let location = get(place, "geometry").and_then(|g| get(&g, "location"))?;
    let address = get(place, "formatted_address")
        .or_else(|| get(place, "name"))
        .and_then(|v| v.as_string());
    Some((read_lat_lng(&location), address))
}

pub struct GoogleBackend {
    map: GoogleMap,
    marker: RefCell<Option<GoogleMarker>>,
    autocomplete: Option<Autocomplete>,
    _on_click: Closure<dyn FnMut(JsValue)>,
    _on_place: Option<Closure<dyn FnMut()>>,
}

impl GoogleBackend {
    pub async fn mount(
        api_key: &str,
        container: HtmlElement,
        search: Option<HtmlInputElement>,
        center: LatLng,
        events: MapEvents,
    ) -> Result<Self, MapError> {
        if !global_exists("google") {
            let src = format!(
                "https://maps.googleapis.com/maps/api/js?key={}&libraries=places",
                String::from(js_sys::encode_uri_component(api_key))
            );
            load_script("google-maps-js", &src).await?;
        }

        let options = serde_helper::to_value(&MapOptions {
            center,
            zoom: DEFAULT_ZOOM,
            street_view_control: false,
            map_type_control: false,
        })
        .map_err(|e| MapError::Load(e.to_string()))?;
        let map = GoogleMap::new(&container, &options);

        let on_click_cb = events.on_click;
        let on_click = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            match get(&event, "latLng") {
                Some(lat_lng) => on_click_cb(read_lat_lng(&lat_lng)),
                None => log::warn!("map click without coordinates"),
            }
        });
        map.add_listener("click", on_click.as_ref().unchecked_ref());

        let (autocomplete, on_place) = match search {
            Some(input) => {
                let autocomplete = Autocomplete::new(&input);
                let handle: JsValue = autocomplete.clone().into();
                let on_place_cb = events.on_place;
                let on_place = Closure::<dyn FnMut()>::new(move || {
                    let place = handle.unchecked_ref::<Autocomplete>().get_place();
                    match read_place(&place) {
                        Some((point, address)) => on_place_cb(point, address),
                        None => log::info!("selected place has no geometry"),
                    }
                });
                autocomplete.add_listener("place_changed", on_place.as_ref().unchecked_ref());
                (Some(autocomplete), Some(on_place))
            }
            None => (None, None),
        };

        Ok(Self {
            map,
            marker: RefCell::new(None),
            autocomplete,
            _on_click: on_click,
            _on_place: on_place,
        })
    }
}

impl MapBackend for GoogleBackend {
    fn show_marker(&self, point: LatLng) {
        let mut marker = self.marker.borrow_mut();
        match marker.as_ref() {
            Some(existing) => existing.set_position(&to_js(point)),
            None => {
                #[derive(Serialize)]
                struct MarkerOptions {
                    position: LatLng,
                }
                let options = serde_helper::to_value(&MarkerOptions { position: point })
                    .unwrap_or(JsValue::NULL);
                let created = GoogleMarker::new(&options);
                created.set_map(Some(&self.map));
                *marker = Some(created);
            }
        }
    }

    fn clear_marker(&self) {
        if let Some(marker) = self.marker.borrow_mut().take() {
            marker.set_map(None);
        }
    }

    fn pan_to(&self, point: LatLng) {
        self.map.pan_to(&to_js(point));
    }

    fn destroy(&self) {
        self.clear_marker();
        clear_instance_listeners(self.map.as_ref());
        if let Some(autocomplete) = &self.autocomplete {
            clear_instance_listeners(autocomplete.as_ref());
        }
    }
}
