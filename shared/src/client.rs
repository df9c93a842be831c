//! API 客户端
//!
//! `ApiClient` 负责拼接 URL、附加 Bearer 令牌、序列化请求体与映射错误；
//! 真正的网络发送由实现了 `HttpClient` 的传输层完成（浏览器中为 fetch，测试中为 Mock）。

use crate::error::{ApiError, ApiResult};
use crate::protocol::{ApiRequest, HttpMethod};
use crate::{CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// 业务客户端
// =========================================================

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient<C> {
    client: C,
    base_url: String,
    token: Option<String>,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// 附加会话令牌；空字符串视为无令牌
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: Option<String>) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        if let Some(query) = query {
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    fn build<R: ApiRequest>(&self, req: &R) -> ApiResult<HttpRequest> {
        let method = req.method();
        let mut http = HttpRequest::new(&self.url(&req.path(), req.query()), method);

        if let Some(token) = &self.token {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        if method.has_body() {
            let body = serde_json::to_string(req)
                .map_err(|e| ApiError::decode(format!("Failed to encode request: {}", e)))?;
            http = http
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_body(body);
        }

        Ok(http)
    }

    /// 发送类型化请求并解析响应
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let http = self.build(req)?;
        let method = http.method;
        let url = http.url.clone();
        log::debug!("{} {}", method.as_str(), url);

        let resp = self.client.send(http).await.map_err(|e| {
            log::warn!("{} {} failed: {}", method.as_str(), url, e);
            e
        })?;

        if !resp.is_success() {
            let err = ApiError::from_response(resp.status, &resp.body);
            log::warn!("{} {} -> {}", method.as_str(), url, err);
            return Err(err);
        }

        // 空响应体（如 204）按 JSON null 解析
        let body = if resp.body.trim().is_empty() {
            "null"
        } else {
            resp.body.as_str()
        };

        serde_json::from_str::<R::Response>(body).map_err(|e| {
            log::error!("{} {} returned an unexpected body: {}", method.as_str(), url, e);
            ApiError::decode(e.to_string())
        })
    }
}

#[cfg(test)]
pub mod mock;

#[cfg(test)]
mod tests;
