//! 周期刷新
//!
//! 封装 `gloo-timers` 的 Interval。`RefreshLoop` 被 drop 时定时器随之清除。

use gloo_timers::callback::Interval;

pub struct RefreshLoop {
    _interval: Interval,
}

impl RefreshLoop {
    /// 每 `secs` 秒触发一次；首次触发在一个周期之后
    pub fn start<F>(secs: u32, tick: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let millis = secs.max(1).saturating_mul(1000);
        log::debug!("refresh loop started ({}s)", secs);
        Self {
            _interval: Interval::new(millis, tick),
        }
    }
}

impl Drop for RefreshLoop {
    fn drop(&mut self) {
        log::debug!("refresh loop stopped");
    }
}
