//! HTTP 传输层
//!
//! 基于 `gloo-net` 的 fetch 实现，供 `ApiClient` 使用。

use gloo_net::http::{Request, RequestBuilder};
use podtrack_shared::error::{ApiError, ApiResult};
use podtrack_shared::protocol::HttpMethod;
use podtrack_shared::{HttpClient, HttpRequest, HttpResponse};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchClient;

impl FetchClient {
    fn builder(req: &HttpRequest) -> RequestBuilder {
        let builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
            HttpMethod::Put => Request::put(&req.url),
            HttpMethod::Delete => Request::delete(&req.url),
        };
        req.headers
            .iter()
            .fold(builder, |b, (key, value)| b.header(key, value))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let builder = Self::builder(&req);

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::network(e.to_string()))?;

        // fetch 只在网络层失败时 reject
        let resp = request
            .send()
            .await
            .map_err(|_| ApiError::network("Network Error"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::decode(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
