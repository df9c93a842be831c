//! PODTrack 共享层
//!
//! 与运行目标无关的纯逻辑，前端（WASM）与宿主机测试共用：
//! - `models` / `protocol`: 领域模型与 REST 协议定义
//! - `client`: 基于抽象传输层的 API 客户端
//! - 其余模块: 排序、筛选、选择、拍照取证状态机、地图选点等客户端逻辑

pub mod access;
pub mod capture;
pub mod client;
pub mod date;
pub mod error;
pub mod filter;
pub mod forms;
pub mod map;
pub mod models;
pub mod protocol;
pub mod selection;
pub mod sequence_guard;
pub mod sequencing;

pub use client::{ApiClient, HttpClient, HttpRequest, HttpResponse};
pub use error::{ApiError, ApiErrorKind, ValidationError};
pub use models::*;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 上传证明照片的大小上限（5 MB）
pub const MAX_PROOF_BYTES: usize = 5 * 1024 * 1024;

/// 配送路线自动刷新周期（秒）
pub const DEFAULT_REFRESH_SECS: u32 = 30;
