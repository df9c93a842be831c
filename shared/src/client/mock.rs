// =========================================================
// 测试工具: MockHttpClient
// =========================================================

use super::{HttpClient, HttpRequest, HttpResponse};
use crate::error::{ApiError, ApiResult};
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockHttpClient {
    // (Method URL, (Status, Response Body))
    responses: RefCell<HashMap<String, (u16, String)>>,
    // 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
    offline: bool,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            offline: false,
        }
    }

    /// 所有请求都以网络错误失败
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::new()
        }
    }

    pub fn mock_response(&self, method: &str, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw(method, url, status, &body.to_string());
    }

    pub fn mock_raw(&self, method: &str, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .insert(format!("{} {}", method, url), (status, body.to_string()));
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.borrow_mut().push(req.clone());

        if self.offline {
            return Err(ApiError::network("Network Error"));
        }

        let key = format!("{} {}", req.method.as_str(), req.url);
        let responses = self.responses.borrow();
        if let Some((status, body)) = responses.get(&key) {
            Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            })
        } else {
            Ok(HttpResponse {
                status: 404,
                body: r#"{"error":"Not Found"}"#.to_string(),
            })
        }
    }
}
