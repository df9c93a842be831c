//! 取证拍照状态机 (Proof Capture)
//!
//! ```text
//! Idle ──camera_started──▶ CameraActive ──capture──▶ Captured ──begin_submit──▶ Submitting
//!  ▲  ╰───────────────file_selected─────────────────▶    │                          │
//!  ╰──────────────discard / close / submit_succeeded─────┴──────────────────────────╯
//! ```
//!
//! 摄像头流只存在于 `CameraActive` 中；离开该状态的每条路径都会停止它，
//! `Drop` 兜底处理页面卸载。

use crate::MAX_PROOF_BYTES;
use crate::error::ValidationError;
use crate::protocol::UploadProofRequest;
use thiserror::Error;

/// 可停止的实时媒体流，浏览器中为 MediaStream
pub trait CameraStream {
    /// 停止所有轨道，可重复调用
    fn stop(&mut self);
}

// =========================================================
// 编码图片
// =========================================================

/// `data:image/...;base64,...` 形式的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data_url: String,
}

impl EncodedImage {
    pub fn from_data_url(data_url: impl Into<String>) -> Result<Self, ValidationError> {
        let data_url = data_url.into();
        let Some(rest) = data_url.strip_prefix("data:image/") else {
            return Err(ValidationError::NotAnImage);
        };
        let Some((_, payload)) = rest.split_once(";base64,") else {
            return Err(ValidationError::NotAnImage);
        };
        if payload.is_empty() {
            return Err(ValidationError::NotAnImage);
        }

        let size = decoded_len(payload);
        if size > MAX_PROOF_BYTES {
            return Err(ValidationError::ImageTooLarge {
                size,
                max: MAX_PROOF_BYTES,
            });
        }

        Ok(Self { data_url })
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn into_data_url(self) -> String {
        self.data_url
    }

    /// 解码后的字节数
    pub fn byte_len(&self) -> usize {
        self.data_url
            .split_once(";base64,")
            .map(|(_, payload)| decoded_len(payload))
            .unwrap_or(0)
    }
}

fn decoded_len(base64: &str) -> usize {
    let padding = base64.bytes().rev().take_while(|b| *b == b'=').count();
    (base64.len() / 4 * 3).saturating_sub(padding)
}

// =========================================================
// 状态
// =========================================================

pub enum CapturePhase<S> {
    Idle,
    CameraActive(S),
    Captured(EncodedImage),
    Submitting(EncodedImage),
}

impl<S> CapturePhase<S> {
    pub fn name(&self) -> &'static str {
        match self {
            CapturePhase::Idle => "idle",
            CapturePhase::CameraActive(_) => "camera-active",
            CapturePhase::Captured(_) => "captured",
            CapturePhase::Submitting(_) => "submitting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("A submission is already in progress")]
    AlreadySubmitting,
}

/// 一次上传所需的全部数据；delivery id 取自打开流程时的配送
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofSubmission {
    pub delivery_id: String,
    pub image: EncodedImage,
}

impl From<ProofSubmission> for UploadProofRequest {
    fn from(submission: ProofSubmission) -> Self {
        UploadProofRequest {
            delivery_id: submission.delivery_id,
            image_data: submission.image.into_data_url(),
        }
    }
}

pub struct ProofCapture<S: CameraStream> {
    delivery_id: String,
    phase: CapturePhase<S>,
    error: Option<String>,
}

impl<S: CameraStream> ProofCapture<S> {
    /// 未绑定配送的流程（独立上传页，id 由用户输入）
    pub fn new() -> Self {
        Self::for_delivery("")
    }

    pub fn for_delivery(delivery_id: impl Into<String>) -> Self {
        Self {
            delivery_id: delivery_id.into(),
            phase: CapturePhase::Idle,
            error: None,
        }
    }

    pub fn delivery_id(&self) -> &str {
        &self.delivery_id
    }

    /// 上传期间目标配送保持不变
    pub fn set_delivery_id(&mut self, delivery_id: impl Into<String>) {
        if self.is_submitting() {
            return;
        }
        self.delivery_id = delivery_id.into();
    }

    pub fn phase(&self) -> &CapturePhase<S> {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 切换状态；旧状态若持有摄像头流则先停止
    fn transition(&mut self, next: CapturePhase<S>) {
        let prev = std::mem::replace(&mut self.phase, next);
        if let CapturePhase::CameraActive(mut stream) = prev {
            stream.stop();
            log::debug!("camera stream released");
        }
    }

    // =========================================================
    // 摄像头
    // =========================================================

    /// 摄像头授权成功
    pub fn camera_started(&mut self, mut stream: S) {
        if self.is_submitting() {
            // 上传期间不接管新流
            stream.stop();
            return;
        }
        self.error = None;
        self.transition(CapturePhase::CameraActive(stream));
    }

    /// 授权被拒或设备不可用；流程保持可用（仍可选择文件）
    pub fn camera_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("camera unavailable: {}", message);
        self.error = Some(message);
    }

    /// 从实时画面截取一帧；仅在 `CameraActive` 下有效
    pub fn capture(&mut self, image: EncodedImage) -> bool {
        if !self.is_camera_active() {
            return false;
        }
        self.error = None;
        self.transition(CapturePhase::Captured(image));
        true
    }

    pub fn file_selected(&mut self, image: EncodedImage) {
        if self.is_submitting() {
            return;
        }
        self.error = None;
        self.transition(CapturePhase::Captured(image));
    }

    /// 放弃已拍摄的照片
    pub fn discard(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.transition(CapturePhase::Idle);
    }

    // =========================================================
    // 提交
    // =========================================================

    /// 取证门槛：有照片且目标配送已确定，且不在上传中
    pub fn can_submit(&self) -> bool {
        matches!(self.phase, CapturePhase::Captured(_)) && !self.delivery_id.trim().is_empty()
    }

    pub fn begin_submit(&mut self) -> Result<ProofSubmission, CaptureError> {
        let image = match &self.phase {
            CapturePhase::Submitting(_) => return Err(CaptureError::AlreadySubmitting),
            CapturePhase::Captured(image) => image.clone(),
            _ => return Err(ValidationError::MissingProofImage.into()),
        };

        let delivery_id = self.delivery_id.trim().to_string();
        if delivery_id.is_empty() {
            return Err(ValidationError::MissingDeliveryId.into());
        }

        self.error = None;
        self.transition(CapturePhase::Submitting(image.clone()));
        Ok(ProofSubmission { delivery_id, image })
    }

    /// 上传成功，配送已在服务端标记为送达
    pub fn submit_succeeded(&mut self) {
        self.error = None;
        self.transition(CapturePhase::Idle);
    }

    /// 上传失败：保留照片以便重试
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        let phase = std::mem::replace(&mut self.phase, CapturePhase::Idle);
        self.phase = match phase {
            CapturePhase::Submitting(image) => CapturePhase::Captured(image),
            other => other,
        };
        self.error = Some(message.into());
    }

    /// 关闭流程（模态框关闭 / 页面离开）
    ///
    /// 上传中不生效：照片要保留到请求返回，失败时才能重试。
    pub fn close(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.error = None;
        self.transition(CapturePhase::Idle);
    }

    // =========================================================
    // 查询
    // =========================================================

    pub fn preview(&self) -> Option<&EncodedImage> {
        match &self.phase {
            CapturePhase::Captured(image) | CapturePhase::Submitting(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, CapturePhase::Submitting(_))
    }

    pub fn is_camera_active(&self) -> bool {
        matches!(self.phase, CapturePhase::CameraActive(_))
    }

    pub fn camera_stream(&self) -> Option<&S> {
        match &self.phase {
            CapturePhase::CameraActive(stream) => Some(stream),
            _ => None,
        }
    }
}

impl<S: CameraStream> Default for ProofCapture<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CameraStream> Drop for ProofCapture<S> {
    fn drop(&mut self) {
        if let CapturePhase::CameraActive(stream) = &mut self.phase {
            stream.stop();
        }
    }
}

#[cfg(test)]
mod tests;
