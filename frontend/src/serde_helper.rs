//! Rust 数据与 JS 对象之间的转换
//!
//! 用于向浏览器 API（getUserMedia 约束、地图选项）传递选项对象，
//! 以及从地图事件中读取坐标。

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
#[error("Serde WASM Bindgen Error: {0}")]
pub struct Error(#[from] serde_wasm_bindgen::Error);

/// Serialize a Rust data structure into a plain JS object
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, Error> {
    // 结构体序列化为普通对象而不是 Map
    let serializer = serde_wasm_bindgen::Serializer::new()
        .serialize_maps_as_objects(true)
        .serialize_large_number_types_as_bigints(false);
    Ok(value.serialize(&serializer)?)
}

/// Deserialize a JsValue into a Rust data structure
pub fn from_value<T: DeserializeOwned>(value: JsValue) -> Result<T, Error> {
    Ok(serde_wasm_bindgen::from_value(value)?)
}
