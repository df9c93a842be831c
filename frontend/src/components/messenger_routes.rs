//! 信使：今日路线
//!
//! 卡片按派送顺序排列，每 30 秒自动刷新；
//! 标记送达必须先上传照片，标记失败必须填写原因。

use crate::api::use_api;
use crate::components::icons::{MapPin, RefreshCw};
use crate::components::notification::use_notifier;
use crate::components::proof_panel::{ProofPanel, new_capture_state};
use crate::components::widgets::{EmptyState, FilterTabs, Loading, Modal, StatBox, delivery_tone};
use crate::config::use_config;
use crate::web::dialog;
use crate::web::poll::RefreshLoop;
use leptos::prelude::*;
use leptos::task::spawn_local;
use podtrack_shared::filter::{ROUTE_TABS, StatusFilter};
use podtrack_shared::forms::failure_request;
use podtrack_shared::protocol::MessengerRoutesRequest;
use podtrack_shared::sequence_guard::RequestSequencer;
use podtrack_shared::sequencing::{route_label, sequenced};
use podtrack_shared::{Delivery, DeliveryStats, DeliveryStatus};

/// 卡片的渲染键；状态或失败原因变化时重建卡片
fn route_card_key(delivery: &Delivery) -> (String, DeliveryStatus, Option<String>) {
    (
        delivery.id.clone(),
        delivery.status,
        delivery.failure_reason.clone(),
    )
}

#[component]
pub fn MessengerRoutesPage() -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();
    let refresh_secs = use_config().refresh_secs;

    let deliveries = RwSignal::new(Vec::<Delivery>::new());
    let stats = RwSignal::new(Option::<DeliveryStats>::None);
    let assigned_route = RwSignal::new(Option::<String>::None);
    let (loading, set_loading) = signal(true);
    let filter = RwSignal::new(StatusFilter::<DeliveryStatus>::All);
    let sequencer = StoredValue::new(RequestSequencer::new());

    // ====== 加载 ======
    let fetch_routes = move || {
        let Some(ticket) = sequencer.try_update_value(|s| s.begin()) else {
            return;
        };
        set_loading.set(true);
        spawn_local(async move {
            let result = api.send(&MessengerRoutesRequest).await;
            if !sequencer.try_with_value(|s| s.is_current(ticket)).unwrap_or(false) {
                log::debug!("discarding superseded routes response");
                return;
            }
            match result {
                Ok(board) => {
                    assigned_route.set(route_label(&board.deliveries));
                    deliveries.set(sequenced(board.deliveries));
                    stats.set(board.stats);
                }
                Err(e) => log::error!("Error fetching routes: {}", e),
            }
            set_loading.set(false);
        });
    };

    fetch_routes();
    let refresh = StoredValue::new_local(Some(RefreshLoop::start(refresh_secs, fetch_routes)));
    on_cleanup(move || {
        sequencer.try_update_value(|s| s.invalidate());
        refresh.try_update_value(|r| r.take());
    });

    let visible = move || {
        let filter = filter.get();
        deliveries.with(|list| filter.apply(list).into_iter().cloned().collect::<Vec<_>>())
    };

    // ====== 标记失败 ======
    let failure_open = RwSignal::new(false);
    let failure_id = RwSignal::new(String::new());
    let failure_reason = RwSignal::new(String::new());
    let (failure_busy, set_failure_busy) = signal(false);

    let open_failure = move |id: String| {
        failure_id.set(id);
        failure_reason.set(String::new());
        failure_open.set(true);
    };

    let submit_failure = move |_| {
        if failure_busy.get_untracked() {
            return;
        }
        let req = match failure_request(&failure_id.get_untracked(), &failure_reason.get_untracked()) {
            Ok(req) => req,
            Err(e) => {
                dialog::alert(&e.to_string());
                return;
            }
        };
        set_failure_busy.set(true);
        spawn_local(async move {
            match api.send(&req).await {
                Ok(_) => {
                    failure_open.set(false);
                    failure_reason.set(String::new());
                    notifier.success("Delivery marked as failed");
                    fetch_routes();
                }
                Err(e) => api.alert_error("Error updating delivery status", &e),
            }
            set_failure_busy.set(false);
        });
    };

    // ====== 上传照片并标记送达 ======
    let proof_open = RwSignal::new(false);
    let capture = new_capture_state();

    let proof_submitting = move || capture.with(|c| c.is_submitting());

    let open_proof = move |id: String| {
        // 上一次上传尚未返回时只重新打开弹窗
        if capture.with_untracked(|c| c.is_submitting()) {
            proof_open.set(true);
            return;
        }
        capture.update(|c| {
            c.close();
            c.set_delivery_id(id);
        });
        proof_open.set(true);
    };

    view! {
        <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex items-start justify-between gap-4">
                <div>
                    <h1 class="text-3xl font-bold">"My Routes & Tasks"</h1>
                    <p class="text-base-content/70">"Track your daily deliveries and update status"</p>
                    {move || assigned_route.get().map(|route| view! {
                        <div class="badge badge-primary badge-lg gap-1 mt-2">
                            <MapPin attr:class="h-4 w-4" /> {route}
                        </div>
                    })}
                </div>
                <button class="btn btn-ghost btn-circle" on:click=move |_| fetch_routes() disabled=move || loading.get()>
                    <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                </button>
            </div>

            {move || stats.get().map(|s| view! {
                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <StatBox title="Total Tasks" value=s.total.to_string() />
                    <StatBox title="Delivered" value=s.delivered.to_string() tone="text-success" />
                    <StatBox title="Pending" value=s.pending.to_string() tone="text-warning" />
                    <StatBox title="Failed" value=s.failed.to_string() tone="text-error" />
                </div>
            })}

            <FilterTabs tabs=ROUTE_TABS active=filter />

            <div class="text-sm text-base-content/60">
                "Deliveries are optimized by status and address sequence"
            </div>

            <Show
                when=move || !(loading.get() && deliveries.with(Vec::is_empty))
                fallback=|| view! { <Loading /> }
            >
                <div class="space-y-4">
                    <For
                        each=visible
                        key=route_card_key
                        children=move |delivery| view! {
                            <RouteCard
                                delivery=delivery
                                on_delivered=Callback::new(open_proof)
                                on_failed=Callback::new(open_failure)
                            />
                        }
                    />
                </div>
                <Show when=move || visible().is_empty()>
                    <EmptyState message="No deliveries at the moment." />
                </Show>
            </Show>

            <Modal open=proof_open title="Upload Proof of Delivery">
                <p class="text-base-content/70 mb-4">
                    "Capture or upload photo evidence before marking delivered."
                </p>
                <ProofPanel
                    capture=capture
                    open=proof_open
                    submit_label="Upload & Mark Delivered"
                    success_message="Proof uploaded and delivery marked as delivered"
                    on_submitted=move |_| {
                        proof_open.set(false);
                        fetch_routes();
                    }
                />
                <div class="modal-action">
                    <button class="btn" disabled=proof_submitting on:click=move |_| proof_open.set(false)>
                        "Cancel"
                    </button>
                </div>
            </Modal>

            <Modal open=failure_open title="Mark Delivery as Failed">
                <p class="mb-2">"Please provide the reason for failure:"</p>
                <textarea
                    class="textarea textarea-bordered w-full h-28"
                    placeholder="Enter reason (e.g., Customer not home, Address not found, etc.)"
                    prop:value=move || failure_reason.get()
                    on:input=move |ev| failure_reason.set(event_target_value(&ev))
                ></textarea>
                <div class="modal-action">
                    <button class="btn" on:click=move |_| failure_open.set(false)>"Cancel"</button>
                    <button class="btn btn-error" on:click=submit_failure disabled=move || failure_busy.get()>
                        "Confirm Failed"
                    </button>
                </div>
            </Modal>
        </div>
    }
}

#[component]
fn RouteCard(
    delivery: Delivery,
    on_delivered: Callback<String>,
    on_failed: Callback<String>,
) -> impl IntoView {
    let status = delivery.status;
    let id = StoredValue::new(delivery.id.clone());
    let status_label = status.as_str().to_uppercase();

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body gap-3">
                <div class="flex items-start justify-between gap-2">
                    <div>
                        <h3 class="card-title">{delivery.customer_name().to_string()}</h3>
                        <p class="text-sm text-base-content/60">
                            "Account: " {delivery.account_number().to_string()}
                        </p>
                    </div>
                    <span class=format!("badge {}", delivery_tone(status))>{status_label}</span>
                </div>

                <div class="text-sm space-y-1">
                    <div><span class="font-semibold">"Address: "</span>{delivery.address().to_string()}</div>
                    <div><span class="font-semibold">"Bill Type: "</span>{delivery.bill_type().label()}</div>
                </div>

                <div class="card-actions">
                    {if status.is_open() {
                        view! {
                            <button class="btn btn-success btn-sm" on:click=move |_| on_delivered.run(id.get_value())>
                                "Mark Delivered"
                            </button>
                            <button class="btn btn-warning btn-sm" on:click=move |_| on_failed.run(id.get_value())>
                                "Mark Failed"
                            </button>
                        }
                            .into_any()
                    } else if status == DeliveryStatus::Delivered {
                        view! { <span class="badge badge-success badge-outline">"Completed"</span> }.into_any()
                    } else {
                        view! { <span class="badge badge-error badge-outline">"Failed"</span> }.into_any()
                    }}
                </div>

                {delivery.failure_reason.clone().map(|reason| view! {
                    <div class="alert alert-error text-sm py-2">
                        <strong>"Reason: "</strong> {reason}
                    </div>
                })}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn delivery(status: &str, reason: Option<&str>) -> Delivery {
        serde_json::from_value(json!({
            "_id": "d1",
            "status": status,
            "failureReason": reason,
        }))
        .unwrap()
    }

    #[test]
    fn test_refetched_status_changes_card_key() {
        let before = delivery("pending", None);
        let after = delivery("failed", Some("Customer not home"));
        assert_ne!(route_card_key(&before), route_card_key(&after));
        assert_ne!(
            route_card_key(&delivery("pending", None)),
            route_card_key(&delivery("delivered", None))
        );
        assert_eq!(route_card_key(&before), route_card_key(&before.clone()));
    }
}
