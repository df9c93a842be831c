//! 路由访问策略

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 登录 / 注册
    Public,
    /// 任意已登录用户
    Authenticated,
    /// 需要指定角色（admin 例外）
    Role(Role),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    /// 未登录，跳转 `/login`
    RequireLogin,
    /// 角色不符，跳转 `/unauthorized`
    Unauthorized,
}

/// `role` 为当前会话的角色，未登录时为 None
pub fn check_access(access: Access, role: Option<Role>) -> AccessDecision {
    match (access, role) {
        (Access::Public, _) => AccessDecision::Allow,
        (_, None) => AccessDecision::RequireLogin,
        (Access::Authenticated, Some(_)) => AccessDecision::Allow,
        (Access::Role(required), Some(role)) if role.satisfies(required) => AccessDecision::Allow,
        (Access::Role(_), Some(_)) => AccessDecision::Unauthorized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_always_allowed() {
        assert_eq!(check_access(Access::Public, None), AccessDecision::Allow);
        assert_eq!(
            check_access(Access::Public, Some(Role::Messenger)),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_anonymous_must_login() {
        assert_eq!(
            check_access(Access::Authenticated, None),
            AccessDecision::RequireLogin
        );
        assert_eq!(
            check_access(Access::Role(Role::Coordinator), None),
            AccessDecision::RequireLogin
        );
    }

    #[test]
    fn test_messenger_on_coordinator_route() {
        assert_eq!(
            check_access(Access::Role(Role::Coordinator), Some(Role::Messenger)),
            AccessDecision::Unauthorized
        );
    }

    #[test]
    fn test_admin_never_redirected_by_role() {
        for required in [Role::Messenger, Role::Coordinator, Role::Admin] {
            assert_eq!(
                check_access(Access::Role(required), Some(Role::Admin)),
                AccessDecision::Allow
            );
        }
    }
}
