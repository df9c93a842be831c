//! 地图后端
//!
//! 两种实现（Leaflet + OpenStreetMap 瓦片 / Google Maps + Places）满足同一个 `MapBackend`；
//! 选点组件只依赖这个 trait，状态本身由 `podtrack_shared::map::MapSelection` 持有。

mod google;
mod leaflet;

use crate::config::{AppConfig, MapProvider};
use futures::channel::oneshot;
use podtrack_shared::map::LatLng;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, HtmlInputElement};

pub use google::GoogleBackend;
pub use leaflet::LeafletBackend;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("Error loading map: {0}")]
    Load(String),
    #[error("Google Maps API key is not configured")]
    MissingKey,
}

/// 地图交互回调
pub struct MapEvents {
    /// 地图点击
    pub on_click: Box<dyn Fn(LatLng)>,
    /// 地点搜索选中：坐标与格式化地址
    pub on_place: Box<dyn Fn(LatLng, Option<String>)>,
}

pub trait MapBackend {
    /// 放置或移动唯一的标记
    fn show_marker(&self, point: LatLng);
    fn clear_marker(&self);
    fn pan_to(&self, point: LatLng);
    /// 释放地图实例与事件监听
    fn destroy(&self);
}

impl MapProvider {
    /// 选点坐标展示精度
    pub fn coords_precision(&self) -> usize {
        match self {
            MapProvider::Leaflet => 5,
            MapProvider::Google => 6,
        }
    }

    pub fn supports_search(&self) -> bool {
        matches!(self, MapProvider::Google)
    }
}

/// 按配置挂载地图到容器上
pub async fn mount(
    config: &AppConfig,
    container: HtmlElement,
    search: Option<HtmlInputElement>,
    center: LatLng,
    selected: Option<LatLng>,
    events: MapEvents,
) -> Result<Box<dyn MapBackend>, MapError> {
    let backend: Box<dyn MapBackend> = match config.map_provider {
        MapProvider::Leaflet => Box::new(LeafletBackend::mount(container, center, events).await?),
        MapProvider::Google => {
            let key = config.google_maps_key.as_deref().ok_or(MapError::MissingKey)?;
            Box::new(GoogleBackend::mount(key, container, search, center, events).await?)
        }
    };
    if let Some(point) = selected {
        backend.show_marker(point);
    }
    Ok(backend)
}

// =========================================================
// 脚本加载
// =========================================================

fn document() -> Result<web_sys::Document, MapError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| MapError::Load("document unavailable".to_string()))
}

/// 全局对象是否已存在（脚本已加载）
fn global_exists(name: &str) -> bool {
    web_sys::window()
        .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str(name)).unwrap_or(false))
        .unwrap_or(false)
}

/// 注入样式表（重复调用无副作用）
fn load_stylesheet(id: &str, href: &str) -> Result<(), MapError> {
    let document = document()?;
    if document.get_element_by_id(id).is_some() {
        return Ok(());
    }
    let link = document
        .create_element("link")
        .map_err(|e| MapError::Load(format!("{:?}", e)))?;
    let _ = link.set_attribute("id", id);
    let _ = link.set_attribute("rel", "stylesheet");
    let _ = link.set_attribute("href", href);
    let head = document
        .head()
        .ok_or_else(|| MapError::Load("document has no <head>".to_string()))?;
    head.append_child(&link)
        .map_err(|e| MapError::Load(format!("{:?}", e)))?;
    Ok(())
}

/// 注入脚本并等待加载完成
async fn load_script(id: &str, src: &str) -> Result<(), MapError> {
    let document = document()?;
    if document.get_element_by_id(id).is_some() {
        // 已注入但可能尚未加载完成，由调用方轮询全局对象
        return wait_for_global_script(id).await;
    }

    let script = document
        .create_element("script")
        .map_err(|e| MapError::Load(format!("{:?}", e)))?
        .dyn_into::<web_sys::HtmlScriptElement>()
        .map_err(|_| MapError::Load("not a script element".to_string()))?;
    script.set_id(id);
    script.set_src(src);
    script.set_async(true);

    let (tx, rx) = oneshot::channel::<Result<(), String>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_load = {
        let tx = tx.clone();
        Closure::once(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        })
    };
    let on_error = {
        let tx = tx.clone();
        let src = src.to_string();
        Closure::once(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(format!("failed to load {}", src)));
            }
        })
    };
    script.set_onload(Some(on_load.as_ref().unchecked_ref()));
    script.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    let head = document
        .head()
        .ok_or_else(|| MapError::Load("document has no <head>".to_string()))?;
    head.append_child(&script)
        .map_err(|e| MapError::Load(format!("{:?}", e)))?;

    let result = rx
        .await
        .map_err(|_| MapError::Load("script loader dropped".to_string()))?;
    script.set_onload(None);
    script.set_onerror(None);
    drop(on_load);
    drop(on_error);

    if let Err(e) = result {
        // 移除失败的脚本，下次打开时重新注入
        script.remove();
        return Err(MapError::Load(e));
    }
    log::info!("map script loaded: {}", src);
    Ok(())
}

/// 等待已注入的脚本触发 load
async fn wait_for_global_script(id: &str) -> Result<(), MapError> {
    let document = document()?;
    let Some(script) = document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<web_sys::HtmlScriptElement>().ok())
    else {
        return Ok(());
    };

    let (tx, rx) = oneshot::channel::<()>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let on_load = {
        let tx = tx.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(());
            }
        })
    };
    let _ = script.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref());
    let _ = script.add_event_listener_with_callback("error", on_load.as_ref().unchecked_ref());
    let _ = rx.await;
    let _ = script.remove_event_listener_with_callback("load", on_load.as_ref().unchecked_ref());
    let _ = script.remove_event_listener_with_callback("error", on_load.as_ref().unchecked_ref());
    Ok(())
}
