//! 认证模块
//!
//! 管理会话状态（令牌 + 当前用户），与路由系统解耦：
//! 路由服务只通过注入的角色信号观察会话。

use crate::config::AppConfig;
use crate::web::http::FetchClient;
use crate::web::storage::{SessionStore, StoredSession};
use leptos::prelude::*;
use podtrack_shared::error::ApiResult;
use podtrack_shared::protocol::{LoginRequest, RegisterRequest};
use podtrack_shared::{ApiClient, AuthResponse, Role, User};

/// 已登录会话
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Self {
            token: stored.token,
            user: stored.user,
        }
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 当前会话（只读），未登录时为 None
    pub session: ReadSignal<Option<Session>>,
    set_session: WriteSignal<Option<Session>>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (session, set_session) = signal(None);
        Self {
            session,
            set_session,
        }
    }

    /// 当前角色信号（用于路由服务注入）
    pub fn role_signal(&self) -> Signal<Option<Role>> {
        let session = self.session;
        Signal::derive(move || session.with(|s| s.as_ref().map(|s| s.user.role)))
    }

    pub fn user(&self) -> Option<User> {
        self.session.with(|s| s.as_ref().map(|s| s.user.clone()))
    }

    pub fn token_untracked(&self) -> Option<String> {
        self.session
            .with_untracked(|s| s.as_ref().map(|s| s.token.clone()))
    }

    fn establish(&self, response: AuthResponse) {
        SessionStore::save(&response.token, &response.user);
        log::info!(
            "signed in as {} ({})",
            response.user.email,
            response.user.role
        );
        self.set_session.set(Some(Session {
            token: response.token,
            user: response.user,
        }));
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态：从 LocalStorage 恢复上次的会话
///
/// 不做联网校验；令牌失效时第一个返回 401 的请求会触发登出。
pub fn init_auth(ctx: &AuthContext) {
    if let Some(stored) = SessionStore::load() {
        log::info!("restored session for {}", stored.user.email);
        ctx.set_session.set(Some(stored.into()));
    }
}

fn anonymous_client(config: &AppConfig) -> ApiClient<FetchClient> {
    ApiClient::new(FetchClient, &config.api_url)
}

/// 登录并保存会话
pub async fn login(ctx: &AuthContext, config: &AppConfig, req: LoginRequest) -> ApiResult<()> {
    let response = anonymous_client(config).send(&req).await?;
    ctx.establish(response);
    Ok(())
}

/// 注册即登录
pub async fn register(
    ctx: &AuthContext,
    config: &AppConfig,
    req: RegisterRequest,
) -> ApiResult<()> {
    let response = anonymous_client(config).send(&req).await?;
    ctx.establish(response);
    Ok(())
}

/// 注销并清除状态
///
/// 导航由路由服务的会话监听自动处理。
pub fn logout(ctx: &AuthContext) {
    SessionStore::clear();
    ctx.set_session.set(None);
    log::info!("signed out");
}
