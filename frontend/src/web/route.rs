//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义应用的所有路由、访问要求以及守卫的重定向决策。

use podtrack_shared::Role;
use podtrack_shared::access::{Access, AccessDecision, check_access};
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    Login,
    Register,
    /// 首页 (`/` 与 `/dashboard`)
    #[default]
    Dashboard,
    MessengerRoutes,
    MessengerDeliveries,
    MessengerProof,
    CoordinatorMessengers,
    CoordinatorBills,
    CoordinatorTracking,
    CoordinatorVerification,
    CoordinatorReports,
    Unauthorized,
}

impl AppRoute {
    /// 将 URL path 解析为路由；未知路径返回 None
    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        let route = match path {
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/" | "/dashboard" => Self::Dashboard,
            "/messenger/routes" => Self::MessengerRoutes,
            "/messenger/deliveries" => Self::MessengerDeliveries,
            "/messenger/proof" => Self::MessengerProof,
            "/coordinator/messengers" => Self::CoordinatorMessengers,
            "/coordinator/bills" => Self::CoordinatorBills,
            "/coordinator/tracking" => Self::CoordinatorTracking,
            "/coordinator/verification" => Self::CoordinatorVerification,
            "/coordinator/reports" => Self::CoordinatorReports,
            "/unauthorized" => Self::Unauthorized,
            _ => return None,
        };
        Some(route)
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::MessengerRoutes => "/messenger/routes",
            Self::MessengerDeliveries => "/messenger/deliveries",
            Self::MessengerProof => "/messenger/proof",
            Self::CoordinatorMessengers => "/coordinator/messengers",
            Self::CoordinatorBills => "/coordinator/bills",
            Self::CoordinatorTracking => "/coordinator/tracking",
            Self::CoordinatorVerification => "/coordinator/verification",
            Self::CoordinatorReports => "/coordinator/reports",
            Self::Unauthorized => "/unauthorized",
        }
    }

    /// **核心守卫逻辑：该路由的访问要求**
    pub fn access(&self) -> Access {
        match self {
            Self::Login | Self::Register => Access::Public,
            Self::Dashboard | Self::Unauthorized => Access::Authenticated,
            Self::MessengerRoutes | Self::MessengerDeliveries | Self::MessengerProof => {
                Access::Role(Role::Messenger)
            }
            Self::CoordinatorMessengers
            | Self::CoordinatorBills
            | Self::CoordinatorTracking
            | Self::CoordinatorVerification
            | Self::CoordinatorReports => Access::Role(Role::Coordinator),
        }
    }

    /// 已登录用户访问登录 / 注册页时应离开
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 守卫决策：返回最终应渲染的路由
    ///
    /// - 未知路径 → `/`
    /// - 未登录访问受保护页面 → `/login`
    /// - 角色不符 → `/unauthorized`
    /// - 已登录访问登录 / 注册页 → `/dashboard`
    pub fn resolve(path: &str, role: Option<Role>) -> Self {
        let Some(target) = Self::from_path(path) else {
            return Self::resolve_route(Self::Dashboard, role);
        };
        Self::resolve_route(target, role)
    }

    pub fn resolve_route(target: Self, role: Option<Role>) -> Self {
        if role.is_some() && target.should_redirect_when_authenticated() {
            return Self::Dashboard;
        }
        match check_access(target.access(), role) {
            AccessDecision::Allow => target,
            AccessDecision::RequireLogin => Self::Login,
            AccessDecision::Unauthorized => Self::Unauthorized,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_round_trip() {
        for route in [
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Dashboard,
            AppRoute::MessengerRoutes,
            AppRoute::MessengerDeliveries,
            AppRoute::MessengerProof,
            AppRoute::CoordinatorMessengers,
            AppRoute::CoordinatorBills,
            AppRoute::CoordinatorTracking,
            AppRoute::CoordinatorVerification,
            AppRoute::CoordinatorReports,
            AppRoute::Unauthorized,
        ] {
            assert_eq!(AppRoute::from_path(route.to_path()), Some(route));
        }
        assert_eq!(AppRoute::from_path("/"), Some(AppRoute::Dashboard));
        assert_eq!(AppRoute::from_path("/coordinator/bills/"), Some(AppRoute::CoordinatorBills));
    }

    #[test]
    fn test_unknown_path_goes_home() {
        assert_eq!(AppRoute::from_path("/nope"), None);
        assert_eq!(
            AppRoute::resolve("/nope", Some(Role::Messenger)),
            AppRoute::Dashboard
        );
        assert_eq!(AppRoute::resolve("/nope", None), AppRoute::Login);
    }

    #[test]
    fn test_messenger_on_coordinator_route() {
        assert_eq!(
            AppRoute::resolve("/coordinator/bills", Some(Role::Messenger)),
            AppRoute::Unauthorized
        );
        assert_eq!(
            AppRoute::resolve("/messenger/routes", Some(Role::Coordinator)),
            AppRoute::Unauthorized
        );
    }

    #[test]
    fn test_admin_reaches_every_route() {
        for path in ["/messenger/routes", "/messenger/proof", "/coordinator/reports"] {
            assert_eq!(
                AppRoute::resolve(path, Some(Role::Admin)).to_path(),
                path
            );
        }
    }

    #[test]
    fn test_anonymous_redirected_to_login() {
        assert_eq!(AppRoute::resolve("/dashboard", None), AppRoute::Login);
        assert_eq!(AppRoute::resolve("/register", None), AppRoute::Register);
    }

    #[test]
    fn test_logged_in_user_leaves_login_page() {
        assert_eq!(
            AppRoute::resolve("/login", Some(Role::Coordinator)),
            AppRoute::Dashboard
        );
    }
}
