use serde::{Deserialize, Serialize};
use thiserror::Error;

// =========================================================
// 错误状态枚举
// =========================================================

/// API 错误类别，由 HTTP 状态码或传输失败推导
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiErrorKind {
    /// 网络不可达、请求未发出
    Network,
    /// 400: 请求参数校验失败
    InvalidInput,
    /// 401: 未登录或令牌失效
    Unauthorized,
    /// 403: 角色无权访问
    Forbidden,
    /// 404: 资源未找到
    NotFound,
    /// 409: 资源冲突
    Conflict,
    /// 5xx 及其它未归类状态
    Server,
    /// 响应体无法解析
    Decode,
}

impl ApiErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ApiErrorKind::InvalidInput,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Conflict,
            _ => ApiErrorKind::Server,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorKind::Network => "NETWORK_ERROR",
            ApiErrorKind::InvalidInput => "INVALID_INPUT",
            ApiErrorKind::Unauthorized => "UNAUTHORIZED",
            ApiErrorKind::Forbidden => "FORBIDDEN",
            ApiErrorKind::NotFound => "RESOURCE_NOT_FOUND",
            ApiErrorKind::Conflict => "RESOURCE_CONFLICT",
            ApiErrorKind::Server => "SERVER_ERROR",
            ApiErrorKind::Decode => "RESPONSE_PARSE_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 服务端错误响应体，如 `{"error": "Bill not found"}`
#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// API 调用失败
///
/// `server_message` 保存服务端返回的可读信息；页面优先展示它。
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[{}] {message}", kind.error_code())]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
    server_message: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            server_message: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }

    /// 由非 2xx 响应构造，尽量提取服务端给出的错误信息
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let server_message = parsed
            .error
            .or(parsed.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        Self {
            kind: ApiErrorKind::from_status(status),
            status: Some(status),
            message: format!("Request failed with status code {}", status),
            server_message,
        }
    }

    /// 展示给用户的信息：服务端信息优先，否则为通用描述
    pub fn user_message(&self) -> &str {
        self.server_message.as_deref().unwrap_or(&self.message)
    }

    pub fn server_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }

    /// 会话失效，需要重新登录
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// =========================================================
// 客户端校验错误
// =========================================================

/// 提交前在浏览器端拦截的输入错误，不会触发任何请求
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a failure reason")]
    MissingFailureReason,
    #[error("Please capture or upload a photo first")]
    MissingProofImage,
    #[error("Please select a delivery and capture/upload a photo")]
    MissingDeliveryId,
    #[error("Please select a messenger and at least one bill")]
    IncompleteAssignment,
    #[error("Please select a messenger")]
    MissingMessenger,
    #[error("{0} must be a number")]
    InvalidNumber(&'static str),
    #[error("Latitude and longitude must be provided together")]
    PartialCoordinates,
    #[error("Selected file is not an image")]
    NotAnImage,
    #[error("Image is too large ({size} bytes, maximum is {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_preferred() {
        let err = ApiError::from_response(400, r#"{"error":"Account number already exists"}"#);
        assert_eq!(err.kind, ApiErrorKind::InvalidInput);
        assert_eq!(err.status, Some(400));
        assert_eq!(err.user_message(), "Account number already exists");
    }

    #[test]
    fn test_message_field_fallback() {
        let err = ApiError::from_response(500, r#"{"message":"Database unavailable"}"#);
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(err.user_message(), "Database unavailable");
    }

    #[test]
    fn test_non_json_body_uses_generic_message() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_message(), "Request failed with status code 502");
        assert_eq!(
            err.to_string(),
            "[SERVER_ERROR] Request failed with status code 502"
        );
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = ApiError::from_response(401, "");
        assert!(err.is_unauthorized());
        assert!(!ApiError::network("offline").is_unauthorized());
    }
}
