//! 页面使用的 API 句柄
//!
//! 每次请求都以当前会话令牌构造 `ApiClient`；
//! 任何 401 响应都会结束会话并由路由守卫带回登录页。

use crate::auth::{AuthContext, logout, use_auth};
use crate::config::use_config;
use crate::web::dialog;
use crate::web::http::FetchClient;
use leptos::prelude::*;
use podtrack_shared::ApiClient;
use podtrack_shared::error::{ApiError, ApiResult};
use podtrack_shared::protocol::ApiRequest;

pub type PodApi = ApiClient<FetchClient>;

#[derive(Clone, Copy)]
pub struct Api {
    auth: AuthContext,
    base_url: StoredValue<String>,
}

impl Api {
    pub fn client(&self) -> PodApi {
        ApiClient::new(FetchClient, &self.base_url.get_value())
            .with_token(self.auth.token_untracked())
    }

    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let result = self.client().send(req).await;
        if let Err(e) = &result {
            if e.is_unauthorized() && self.auth.token_untracked().is_some() {
                log::warn!("session rejected by server, signing out");
                logout(&self.auth);
            }
        }
        result
    }

    /// 阻塞式错误提示；401 已触发登出，不再弹窗
    pub fn alert_error(&self, action: &str, err: &ApiError) {
        if err.is_unauthorized() {
            return;
        }
        log::error!("{}: {}", action, err);
        dialog::alert(&format!("{}: {}", action, err.user_message()));
    }
}

pub fn use_api() -> Api {
    Api {
        auth: use_auth(),
        base_url: StoredValue::new(use_config().api_url),
    }
}
