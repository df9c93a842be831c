//! 协调员：实时配送跟踪
//!
//! 展示所有配送与汇总统计，可将单个配送改派给其他信使。

use crate::api::use_api;
use crate::components::notification::use_notifier;
use crate::components::widgets::{
    EmptyState, FilterTabs, Loading, Modal, StatBox, delivery_tone, verification_tone,
};
use crate::web::dialog;
use leptos::prelude::*;
use leptos::task::spawn_local;
use podtrack_shared::error::ValidationError;
use podtrack_shared::filter::{StatusFilter, TRACKING_TABS};
use podtrack_shared::protocol::{ListMessengersRequest, ReassignDeliveryRequest, TrackingRequest};
use podtrack_shared::{Delivery, DeliveryStats, DeliveryStatus, Messenger};

/// 改派弹窗的目标
#[derive(Debug, Clone, PartialEq)]
struct ReassignTarget {
    delivery_id: String,
    bill_label: String,
    current_messenger: String,
}

impl ReassignTarget {
    fn from_delivery(delivery: &Delivery) -> Self {
        Self {
            delivery_id: delivery.id.clone(),
            bill_label: format!("{} - {}", delivery.account_number(), delivery.customer_name()),
            current_messenger: delivery.messenger_name().to_string(),
        }
    }
}

/// 默认选中当前信使
fn preselected_messenger(delivery: &Delivery) -> String {
    delivery.messenger().map(|m| m.id.clone()).unwrap_or_default()
}

fn reassign_request(
    target: Option<&ReassignTarget>,
    messenger_id: &str,
) -> Result<ReassignDeliveryRequest, ValidationError> {
    match target {
        Some(target) if !messenger_id.is_empty() => Ok(ReassignDeliveryRequest {
            delivery_id: target.delivery_id.clone(),
            new_messenger_id: messenger_id.to_string(),
        }),
        _ => Err(ValidationError::MissingMessenger),
    }
}

#[component]
pub fn TrackingPage() -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();

    let deliveries = RwSignal::new(Vec::<Delivery>::new());
    let stats = RwSignal::new(Option::<DeliveryStats>::None);
    let messengers = RwSignal::new(Vec::<Messenger>::new());
    let (loading, set_loading) = signal(true);
    let filter = RwSignal::new(StatusFilter::<DeliveryStatus>::All);

    let fetch_tracking = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api.send(&TrackingRequest).await {
                Ok(board) => {
                    deliveries.set(board.deliveries);
                    stats.set(board.stats);
                }
                Err(e) => log::error!("Error fetching tracking: {}", e),
            }
            set_loading.set(false);
        });
    };

    fetch_tracking();
    spawn_local(async move {
        match api.send(&ListMessengersRequest).await {
            Ok(list) => messengers.set(list),
            Err(e) => log::error!("Error fetching messengers: {}", e),
        }
    });

    let visible = move || {
        let filter = filter.get();
        deliveries.with(|list| filter.apply(list).into_iter().cloned().collect::<Vec<_>>())
    };

    // ====== 改派 ======
    let reassign_open = RwSignal::new(false);
    let target = RwSignal::new(Option::<ReassignTarget>::None);
    let selected_messenger = RwSignal::new(String::new());
    let (reassigning, set_reassigning) = signal(false);

    let open_reassign = move |delivery: Delivery| {
        selected_messenger.set(preselected_messenger(&delivery));
        target.set(Some(ReassignTarget::from_delivery(&delivery)));
        reassign_open.set(true);
    };

    let close_reassign = move || {
        reassign_open.set(false);
        target.set(None);
        selected_messenger.set(String::new());
    };

    // Esc 关闭时同样清空
    Effect::new(move |_| {
        if !reassign_open.get() && target.with_untracked(Option::is_some) {
            target.set(None);
            selected_messenger.set(String::new());
        }
    });

    let on_reassign = move |_| {
        if reassigning.get_untracked() {
            return;
        }
        let req = match target.with_untracked(|t| {
            reassign_request(t.as_ref(), &selected_messenger.get_untracked())
        }) {
            Ok(req) => req,
            Err(e) => {
                dialog::alert(&e.to_string());
                return;
            }
        };
        set_reassigning.set(true);
        spawn_local(async move {
            match api.send(&req).await {
                Ok(_) => {
                    notifier.success("Delivery reassigned successfully!");
                    close_reassign();
                    fetch_tracking();
                }
                Err(e) => api.alert_error("Error reassigning delivery", &e),
            }
            set_reassigning.set(false);
        });
    };

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <div>
                <h1 class="text-3xl font-bold">"Real-Time Delivery Tracking"</h1>
                <p class="text-base-content/70">"Monitor all messenger deliveries in real-time"</p>
            </div>

            {move || stats.get().map(|s| view! {
                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <StatBox title="Total Tasks" value=s.total.to_string() />
                    <StatBox title="Delivered" value=s.delivered.to_string() tone="text-success" />
                    <StatBox title="Pending" value=s.pending.to_string() tone="text-warning" />
                    <StatBox title="Failed" value=s.failed.to_string() tone="text-error" />
                    <StatBox title="Verified" value=s.verified.unwrap_or(0).to_string() tone="text-info" />
                </div>
            })}

            <FilterTabs tabs=TRACKING_TABS active=filter />

            <Show when=move || !(loading.get() && deliveries.with(Vec::is_empty)) fallback=|| view! { <Loading /> }>
                <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Messenger"</th>
                                <th>"Customer"</th>
                                <th>"Account"</th>
                                <th>"Address"</th>
                                <th>"Type"</th>
                                <th>"Status"</th>
                                <th>"Verification"</th>
                                <th>"Action"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=visible
                                key=|d| (d.id.clone(), d.status, d.verification_status, d.messenger_name().to_string())
                                children=move |delivery| {
                                    let stored = StoredValue::new(delivery.clone());
                                    view! {
                                        <tr>
                                            <td class="font-medium">{delivery.messenger_name().to_string()}</td>
                                            <td>{delivery.customer_name().to_string()}</td>
                                            <td class="font-mono">{delivery.account_number().to_string()}</td>
                                            <td class="max-w-xs truncate">{delivery.address().to_string()}</td>
                                            <td>{delivery.bill_type().short_label()}</td>
                                            <td>
                                                <span class=format!("badge {}", delivery_tone(delivery.status))>
                                                    {delivery.status.as_str().to_uppercase()}
                                                </span>
                                            </td>
                                            <td>
                                                <span class=format!("badge badge-outline {}", verification_tone(delivery.verification_status))>
                                                    {delivery.verification_status.as_str().to_uppercase()}
                                                </span>
                                            </td>
                                            <td>
                                                <button
                                                    class="btn btn-xs btn-outline"
                                                    title="Reassign to different messenger"
                                                    on:click=move |_| open_reassign(stored.get_value())
                                                >
                                                    "Reassign"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
                <Show when=move || visible().is_empty()>
                    <EmptyState message="No deliveries found in this filter." />
                </Show>
            </Show>

            <Modal open=reassign_open title="Reassign Delivery">
                {move || target.get().map(|t| view! {
                    <p>"Bill: " {t.bill_label}</p>
                    <p class="mb-4">"Current Messenger: " {t.current_messenger}</p>
                })}
                <div class="form-control">
                    <label class="label" for="reassign_messenger">
                        <span class="label-text">"Select New Messenger"</span>
                    </label>
                    <select
                        id="reassign_messenger"
                        class="select select-bordered w-full"
                        prop:value=move || selected_messenger.get()
                        on:change=move |ev| selected_messenger.set(event_target_value(&ev))
                    >
                        <option value="">"-- Choose Messenger --"</option>
                        <For
                            each=move || messengers.get()
                            key=|m| m.id.clone()
                            children=move |m| {
                                let id = m.id.clone();
                                view! {
                                    <option value=m.id.clone() selected=move || selected_messenger.get() == id>
                                        {m.option_label()}
                                    </option>
                                }
                            }
                        />
                    </select>
                </div>
                <div class="modal-action">
                    <button class="btn btn-primary" on:click=on_reassign disabled=move || reassigning.get()>
                        "✓ Reassign"
                    </button>
                    <button class="btn" on:click=move |_| close_reassign()>"Cancel"</button>
                </div>
            </Modal>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn delivery() -> Delivery {
        serde_json::from_value(json!({
            "_id": "d1",
            "billId": { "_id": "b1", "accountNumber": "ACC-001", "customerName": "John Doe", "address": "12 Main St" },
            "messengerId": { "_id": "m1", "name": "John Smith" },
            "status": "pending"
        }))
        .unwrap()
    }

    #[test]
    fn test_reassign_preselects_current_messenger() {
        let d = delivery();
        assert_eq!(preselected_messenger(&d), "m1");

        let target = ReassignTarget::from_delivery(&d);
        assert_eq!(target.bill_label, "ACC-001 - John Doe");
        assert_eq!(target.current_messenger, "John Smith");
    }

    #[test]
    fn test_unpopulated_messenger_preselects_nothing() {
        let d: Delivery =
            serde_json::from_value(json!({ "_id": "d2", "messengerId": "m9", "status": "failed" }))
                .unwrap();
        assert_eq!(preselected_messenger(&d), "");
    }

    #[test]
    fn test_reassign_requires_messenger() {
        let target = ReassignTarget::from_delivery(&delivery());
        assert_eq!(
            reassign_request(Some(&target), ""),
            Err(ValidationError::MissingMessenger)
        );
        assert_eq!(reassign_request(None, "m2"), Err(ValidationError::MissingMessenger));

        let req = reassign_request(Some(&target), "m2").unwrap();
        assert_eq!(req.delivery_id, "d1");
        assert_eq!(req.new_messenger_id, "m2");
    }
}
