//! 会话持久化
//!
//! 令牌与用户信息保存在 LocalStorage，刷新页面后恢复登录状态。

use gloo_storage::{LocalStorage, Storage};
use podtrack_shared::User;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// 持久化的会话
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

pub struct SessionStore;

impl SessionStore {
    /// 读取会话；令牌或用户任一缺失 / 损坏时视为未登录
    pub fn load() -> Option<StoredSession> {
        let token: String = LocalStorage::get(TOKEN_KEY).ok()?;
        if token.is_empty() {
            return None;
        }
        match LocalStorage::get::<User>(USER_KEY) {
            Ok(user) => Some(StoredSession { token, user }),
            Err(e) => {
                log::warn!("stored user is unreadable, discarding session: {}", e);
                Self::clear();
                None
            }
        }
    }

    pub fn save(token: &str, user: &User) {
        if let Err(e) = LocalStorage::set(TOKEN_KEY, token) {
            log::error!("failed to persist token: {}", e);
        }
        if let Err(e) = LocalStorage::set(USER_KEY, user) {
            log::error!("failed to persist user: {}", e);
        }
    }

    pub fn clear() {
        LocalStorage::delete(TOKEN_KEY);
        LocalStorage::delete(USER_KEY);
    }
}
