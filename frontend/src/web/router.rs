//! 路由服务模块 - 核心引擎
//!
//! 封装 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程；
//! 守卫在导航、浏览器前进后退以及会话变化时都会重新执行。

use leptos::prelude::*;
use podtrack_shared::Role;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 通过注入会话角色信号实现与认证系统的解耦：
/// `None` 表示未登录。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    session_role: Signal<Option<Role>>,
}

impl RouterService {
    fn new(session_role: Signal<Option<Role>>) -> Self {
        // 初始路由同样经过守卫；地址栏被替换为最终路由
        let path = current_path();
        let initial_route = AppRoute::resolve(&path, session_role.get_untracked());
        if initial_route.to_path() != path {
            log::info!("[Router] {} -> {}", path, initial_route);
            replace_history_state(initial_route.to_path());
        }
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            session_role,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        let role = self.session_role.get_untracked();
        let target = AppRoute::resolve(path, role);
        if target.to_path() != path {
            log::info!("[Router] guard redirected {} -> {}", path, target);
        }
        push_history_state(target.to_path());
        self.set_route.set(target);
    }

    pub fn navigate_to(&self, route: AppRoute) {
        self.navigate(route.to_path());
    }

    /// 浏览器后退 / 前进
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let session_role = self.session_role;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            let target = AppRoute::resolve(&path, session_role.get_untracked());
            if target.to_path() != path {
                log::info!("[Router] popstate redirected {} -> {}", path, target);
                replace_history_state(target.to_path());
            }
            set_route.set(target);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 监听器与应用同生命周期
        closure.forget();
    }

    /// 会话变化（登录 / 登出 / 令牌失效）时重新执行守卫
    fn setup_session_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let session_role = self.session_role;

        Effect::new(move |_| {
            let role = session_role.get();
            let route = current_route.get_untracked();
            let target = AppRoute::resolve_route(route, role);

            if target != route {
                log::info!(
                    "[Router] session changed ({}), redirecting {} -> {}",
                    role.map(|r| r.as_str()).unwrap_or("anonymous"),
                    route,
                    target
                );
                push_history_state(target.to_path());
                set_route.set(target);
            }
        });
    }
}

fn provide_router(session_role: Signal<Option<Role>>) -> RouterService {
    let router = RouterService::new(session_role);

    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 当前会话角色
    session_role: Signal<Option<Role>>,
    children: Children,
) -> impl IntoView {
    provide_router(session_role);

    children()
}

/// 路由出口组件
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，点击时走路由服务而不是整页跳转
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
