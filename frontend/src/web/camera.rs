//! 摄像头
//!
//! 通过 `getUserMedia` 获取后置摄像头，并从 `<video>` 截取 JPEG 帧。

use crate::serde_helper;
use podtrack_shared::ValidationError;
use podtrack_shared::capture::{CameraStream, EncodedImage};
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

/// 视频帧尺寸不可用时的回退值
const FALLBACK_WIDTH: u32 = 640;
const FALLBACK_HEIGHT: u32 = 480;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("Camera is not available in this browser")]
    Unsupported,
    #[error("Could not access camera. Please check permissions.")]
    Denied(String),
    #[error("Failed to capture photo: {0}")]
    Capture(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

#[derive(Serialize)]
struct VideoConstraints {
    #[serde(rename = "facingMode")]
    facing_mode: &'static str,
}

// =========================================================
// 媒体流
// =========================================================

pub struct BrowserStream {
    stream: MediaStream,
    stopped: bool,
}

impl BrowserStream {
    pub fn media(&self) -> &MediaStream {
        &self.stream
    }
}

impl CameraStream for BrowserStream {
    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        self.stopped = true;
        log::info!("camera stream stopped");
    }
}

impl Drop for BrowserStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// 请求摄像头权限（优先后置摄像头）
pub async fn request_camera() -> Result<BrowserStream, CameraError> {
    let window = web_sys::window().ok_or(CameraError::Unsupported)?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| CameraError::Unsupported)?;

    let video = serde_helper::to_value(&VideoConstraints {
        facing_mode: "environment",
    })
    .map_err(|e| CameraError::Capture(e.to_string()))?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| CameraError::Denied(js_message(&e)))?;
    let stream = JsFuture::from(promise)
        .await
        .map_err(|e| CameraError::Denied(js_message(&e)))?
        .dyn_into::<MediaStream>()
        .map_err(|e| CameraError::Denied(js_message(&e)))?;

    log::info!("camera stream acquired");
    Ok(BrowserStream {
        stream,
        stopped: false,
    })
}

/// 将媒体流挂到预览 `<video>` 上；传 None 解除
pub fn attach(video: &HtmlVideoElement, stream: Option<&BrowserStream>) {
    video.set_src_object(stream.map(BrowserStream::media));
    if stream.is_some() {
        // autoplay 属性在部分移动端浏览器上无效
        let _ = video.play();
    }
}

/// 截取当前帧为 JPEG data URL
pub fn capture_frame(video: &HtmlVideoElement) -> Result<EncodedImage, CameraError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(CameraError::Unsupported)?;

    let canvas = document
        .create_element("canvas")
        .map_err(|e| CameraError::Capture(js_message(&e)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|e| CameraError::Capture(js_message(&e)))?;

    let width = match video.video_width() {
        0 => FALLBACK_WIDTH,
        w => w,
    };
    let height = match video.video_height() {
        0 => FALLBACK_HEIGHT,
        h => h,
    };
    canvas.set_width(width);
    canvas.set_height(height);

    let context = canvas
        .get_context("2d")
        .map_err(|e| CameraError::Capture(js_message(&e)))?
        .ok_or_else(|| CameraError::Capture("2d context unavailable".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|e| CameraError::Capture(js_message(&e)))?;

    context
        .draw_image_with_html_video_element_and_dw_and_dh(
            video,
            0.0,
            0.0,
            width as f64,
            height as f64,
        )
        .map_err(|e| CameraError::Capture(js_message(&e)))?;

    let data_url = canvas
        .to_data_url_with_type("image/jpeg")
        .map_err(|e| CameraError::Capture(js_message(&e)))?;

    Ok(EncodedImage::from_data_url(data_url)?)
}
