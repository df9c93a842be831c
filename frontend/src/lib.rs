//! PODTrack 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `api`: 携带会话令牌的 API 句柄
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod bills;
    pub mod dashboard;
    pub mod header;
    mod icons;
    pub mod login;
    mod map_picker;
    pub mod messenger_deliveries;
    pub mod messenger_routes;
    pub mod messengers;
    pub mod notification;
    mod proof_panel;
    pub mod proof_capture;
    pub mod register;
    pub mod reports;
    pub mod tracking;
    pub mod verification;
    mod widgets;
}
mod config;
mod serde_helper;

use crate::auth::{AuthContext, init_auth};
use crate::components::bills::BillsPage;
use crate::components::dashboard::DashboardPage;
use crate::components::header::Header;
use crate::components::login::LoginPage;
use crate::components::messenger_deliveries::MessengerDeliveriesPage;
use crate::components::messenger_routes::MessengerRoutesPage;
use crate::components::messengers::MessengersPage;
use crate::components::notification::{NotificationToast, provide_notifier};
use crate::components::proof_capture::ProofCapturePage;
use crate::components::register::RegisterPage;
use crate::components::reports::ReportsPage;
use crate::components::tracking::TrackingPage;
use crate::components::verification::VerificationPage;
use crate::config::provide_config;

use leptos::prelude::*;

// 浏览器 API 适配层
pub(crate) mod web {
    pub mod camera;
    pub mod dialog;
    pub mod file;
    pub mod http;
    pub mod maps;
    pub mod poll;
    pub mod route;
    pub mod router;
    pub mod storage;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::MessengerRoutes => view! { <MessengerRoutesPage /> }.into_any(),
        AppRoute::MessengerDeliveries => view! { <MessengerDeliveriesPage /> }.into_any(),
        AppRoute::MessengerProof => view! { <ProofCapturePage /> }.into_any(),
        AppRoute::CoordinatorMessengers => view! { <MessengersPage /> }.into_any(),
        AppRoute::CoordinatorBills => view! { <BillsPage /> }.into_any(),
        AppRoute::CoordinatorTracking => view! { <TrackingPage /> }.into_any(),
        AppRoute::CoordinatorVerification => view! { <VerificationPage /> }.into_any(),
        AppRoute::CoordinatorReports => view! { <ReportsPage /> }.into_any(),
        AppRoute::Unauthorized => view! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"403"</h1>
                    <p class="text-xl">"You do not have access to this page."</p>
                    <Link to=AppRoute::Dashboard class="btn btn-primary">"Back to Dashboard"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 运行配置
    provide_config();

    // 2. 创建认证上下文并从 LocalStorage 恢复会话
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    init_auth(&auth_ctx);

    // 3. 全局提示
    provide_notifier();

    // 4. 角色信号注入路由服务，由路由守卫决定跳转
    let session_role = auth_ctx.role_signal();

    view! {
        <Router session_role=session_role>
            <div class="min-h-screen bg-base-200">
                <Header />
                <main>
                    <RouterOutlet matcher=route_matcher />
                </main>
                <NotificationToast />
            </div>
        </Router>
    }
}
