//! 页面间共用的小组件：筛选标签、统计块、状态徽章、模态框

use leptos::prelude::*;
use podtrack_shared::filter::{FilterTab, StatusFilter};
use podtrack_shared::{BillStatus, DeliveryStatus, VerificationStatus};

/// 状态筛选标签
///
/// `count` 存在且标签要求计数时显示 `Label (n)`。
#[component]
pub fn FilterTabs<S>(
    tabs: &'static [FilterTab<S>],
    active: RwSignal<StatusFilter<S>>,
    #[prop(optional, into)] count: Option<Callback<StatusFilter<S>, usize>>,
) -> impl IntoView
where
    S: Copy + PartialEq + Send + Sync + 'static,
{
    view! {
        <div role="tablist" class="tabs tabs-boxed bg-base-100 shadow w-fit">
            {tabs
                .iter()
                .map(|tab| {
                    let tab = *tab;
                    let label = move || match count {
                        Some(count) if tab.counted => {
                            format!("{} ({})", tab.label, count.run(tab.filter))
                        }
                        _ => tab.label.to_string(),
                    };
                    view! {
                        <a
                            role="tab"
                            class=move || {
                                if active.get() == tab.filter { "tab tab-active" } else { "tab" }
                            }
                            on:click=move |_| active.set(tab.filter)
                        >
                            {label}
                        </a>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// 统计块（daisyUI stat）
#[component]
pub fn StatBox(
    title: &'static str,
    #[prop(into)] value: Signal<String>,
    #[prop(default = "text-primary")] tone: &'static str,
) -> impl IntoView {
    view! {
        <div class="stat">
            <div class="stat-title">{title}</div>
            <div class=format!("stat-value {}", tone)>{move || value.get()}</div>
        </div>
    }
}

pub fn delivery_tone(status: DeliveryStatus) -> &'static str {
    match status {
        DeliveryStatus::Pending => "badge-warning",
        DeliveryStatus::Assigned => "badge-info",
        DeliveryStatus::Delivered => "badge-success",
        DeliveryStatus::Failed => "badge-error",
    }
}

pub fn bill_tone(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Unassigned => "badge-ghost",
        BillStatus::Assigned => "badge-info",
        BillStatus::Delivered => "badge-success",
    }
}

pub fn verification_tone(status: VerificationStatus) -> &'static str {
    match status {
        VerificationStatus::Pending => "badge-warning",
        VerificationStatus::Verified => "badge-success",
        VerificationStatus::Rejected => "badge-error",
    }
}

/// 模态框
///
/// `open` 控制 `<dialog>` 的显示；按 Esc 关闭时同步回信号。
#[component]
pub fn Modal(
    open: RwSignal<bool>,
    title: &'static str,
    #[prop(optional)] wide: bool,
    children: Children,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class=if wide { "modal-box w-11/12 max-w-4xl" } else { "modal-box" }>
                <h3 class="font-bold text-lg mb-4">{title}</h3>
                {children()}
            </div>
        </dialog>
    }
}

/// 加载中占位
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex justify-center py-12">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 空列表占位
#[component]
pub fn EmptyState(message: &'static str) -> impl IntoView {
    view! { <div class="text-center py-12 text-base-content/50">{message}</div> }
}

/// 带标签的文本输入
#[component]
pub fn TextField(
    id: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] placeholder: &'static str,
    #[prop(optional, into)] required: MaybeProp<bool>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label for=id class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=input_type
                placeholder=placeholder
                required=move || required.get().unwrap_or(false)
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
                class="input input-bordered w-full"
            />
        </div>
    }
}
