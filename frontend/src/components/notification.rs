//! 成功提示（toast）
//!
//! 错误使用阻塞式 alert；成功消息在右上角短暂显示。

use leptos::prelude::*;
use std::time::Duration;

#[derive(Clone, Copy)]
pub struct Notifier {
    message: RwSignal<Option<String>>,
}

impl Notifier {
    pub fn success(&self, message: impl Into<String>) {
        self.message.set(Some(message.into()));
    }
}

pub fn provide_notifier() -> Notifier {
    let notifier = Notifier {
        message: RwSignal::new(None),
    };
    provide_context(notifier);
    notifier
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier should be provided")
}

#[component]
pub fn NotificationToast() -> impl IntoView {
    let notifier = use_notifier();
    let message = notifier.message;

    // 3秒后清除通知
    Effect::new(move |_| {
        if message.get().is_some() {
            set_timeout(move || message.set(None), Duration::from_secs(3));
        }
    });

    view! {
        <Show when=move || message.get().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class="alert alert-success shadow-lg">
                    <span>{move || message.get().unwrap_or_default()}</span>
                </div>
            </div>
        </Show>
    }
}
