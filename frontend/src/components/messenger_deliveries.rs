use crate::api::use_api;
use crate::components::widgets::{EmptyState, FilterTabs, Loading, StatBox, delivery_tone};
use leptos::prelude::*;
use leptos::task::spawn_local;
use podtrack_shared::date::format_date_time;
use podtrack_shared::filter::{HISTORY_TABS, HistorySummary, StatusFilter};
use podtrack_shared::protocol::DeliveryHistoryRequest;
use podtrack_shared::sequence_guard::RequestSequencer;
use podtrack_shared::{Delivery, DeliveryStatus};

/// 信使配送历史；筛选由服务端 `?status=` 完成
#[component]
pub fn MessengerDeliveriesPage() -> impl IntoView {
    let api = use_api();

    let deliveries = RwSignal::new(Vec::<Delivery>::new());
    let (loading, set_loading) = signal(true);
    let filter = RwSignal::new(StatusFilter::<DeliveryStatus>::All);
    let sequencer = StoredValue::new(RequestSequencer::new());

    // 切换标签即重新请求；较早的响应被丢弃
    Effect::new(move |_| {
        let req = DeliveryHistoryRequest {
            status: filter.get().query_value(),
        };
        let Some(ticket) = sequencer.try_update_value(|s| s.begin()) else {
            return;
        };
        set_loading.set(true);
        spawn_local(async move {
            let result = api.send(&req).await;
            if !sequencer.try_with_value(|s| s.is_current(ticket)).unwrap_or(false) {
                return;
            }
            match result {
                Ok(list) => deliveries.set(list),
                Err(e) => log::error!("Error fetching deliveries: {}", e),
            }
            set_loading.set(false);
        });
    });

    on_cleanup(move || {
        sequencer.try_update_value(|s| s.invalidate());
    });

    let summary = Memo::new(move |_| deliveries.with(|d| HistorySummary::from_deliveries(d)));

    view! {
        <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-6">
            <div>
                <h1 class="text-3xl font-bold">"Delivery History"</h1>
                <p class="text-base-content/70">"View all your completed and pending deliveries"</p>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <StatBox title="Total" value=move || summary.get().total.to_string() />
                <StatBox title="Completed" value=move || summary.get().completed.to_string() tone="text-success" />
                <StatBox title="Pending" value=move || summary.get().pending.to_string() tone="text-warning" />
                <StatBox title="Failed" value=move || summary.get().failed.to_string() tone="text-error" />
            </div>

            <FilterTabs tabs=HISTORY_TABS active=filter />

            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <div class="space-y-4">
                    <For
                        each=move || deliveries.get()
                        key=|d| d.id.clone()
                        children=|delivery| view! { <HistoryCard delivery=delivery /> }
                    />
                </div>
                <Show when=move || deliveries.with(Vec::is_empty)>
                    <EmptyState message="No deliveries found." />
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn HistoryCard(delivery: Delivery) -> impl IntoView {
    let proofs = delivery.proof_images.len();

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
                    <span class=format!("badge {}", delivery_tone(delivery.status))>
                        {delivery.status.as_str().to_uppercase()}
                    </span>
                </div>

                <div class="text-sm space-y-1">
                    <div><span class="font-semibold">"Address: "</span>{delivery.address().to_string()}</div>
                    <div><span class="font-semibold">"Type: "</span>{delivery.bill_type().label()}</div>
                    {delivery.delivery_date.map(|date| view! {
                        <div><span class="font-semibold">"Delivered: "</span>{format_date_time(&date)}</div>
                    })}
                    {delivery.failure_reason.clone().map(|reason| view! {
                        <div class="text-error">
                            <span class="font-semibold">"Failure Reason: "</span>{reason}
                        </div>
                    })}
                    {(proofs > 0).then(|| view! {
                        <div><span class="font-semibold">"Proofs: "</span>{format!("{} image(s)", proofs)}</div>
                    })}
                </div>
            </div>
        </div>
    }
}
