//! 协调员：核验配送照片

use crate::api::use_api;
use crate::components::notification::use_notifier;
use crate::components::widgets::{EmptyState, FilterTabs, Loading, delivery_tone, verification_tone};
use leptos::prelude::*;
use leptos::task::spawn_local;
use podtrack_shared::date::{format_date, format_date_time};
use podtrack_shared::filter::{DEFAULT_VERIFICATION_FILTER, StatusFilter, VERIFICATION_TABS};
use podtrack_shared::forms::VerificationNotes;
use podtrack_shared::protocol::ListAllDeliveriesRequest;
use podtrack_shared::{Delivery, VerificationStatus};

#[component]
pub fn VerificationPage() -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();

    let deliveries = RwSignal::new(Vec::<Delivery>::new());
    let (loading, set_loading) = signal(true);
    let filter = RwSignal::new(DEFAULT_VERIFICATION_FILTER);
    let notes = RwSignal::new(VerificationNotes::default());
    // 正在提交的配送，防止重复点击
    let busy = RwSignal::new(Option::<String>::None);

    let fetch_deliveries = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api.send(&ListAllDeliveriesRequest).await {
                Ok(list) => deliveries.set(list),
                Err(e) => log::error!("Error fetching deliveries: {}", e),
            }
            set_loading.set(false);
        });
    };

    fetch_deliveries();

    let visible = move || {
        let filter = filter.get();
        deliveries.with(|list| filter.apply(list).into_iter().cloned().collect::<Vec<_>>())
    };
    let count = Callback::new(move |f: StatusFilter<VerificationStatus>| {
        deliveries.with(|list| f.count(list))
    });

    let verify = Callback::new(move |(delivery_id, status): (String, VerificationStatus)| {
        if busy.with_untracked(Option::is_some) {
            return;
        }
        let Some(req) = notes.try_update(|n| n.request(&delivery_id, status)) else {
            return;
        };
        busy.set(Some(delivery_id));
        spawn_local(async move {
            match api.send(&req).await {
                Ok(_) => {
                    notifier.success(format!("Delivery marked as {}", status.as_str()));
                    fetch_deliveries();
                }
                Err(e) => {
                    // 失败时恢复已填写的备注
                    notes.update(|n| n.set(&req.delivery_id, req.verification_notes.clone()));
                    api.alert_error("Error verifying delivery", &e);
                }
            }
            busy.set(None);
        });
    });

    view! {
        <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-6">
            <div>
                <h1 class="text-3xl font-bold">"Verify Deliveries"</h1>
                <p class="text-base-content/70">"Review and verify proof of delivery photos"</p>
            </div>

            <FilterTabs tabs=VERIFICATION_TABS active=filter count=count />

            <Show when=move || !(loading.get() && deliveries.with(Vec::is_empty)) fallback=|| view! { <Loading /> }>
                <div class="space-y-4">
                    <For
                        each=visible
                        key=|d| (d.id.clone(), d.verification_status)
                        children=move |delivery| view! {
                            <VerificationCard delivery=delivery notes=notes busy=busy on_verify=verify />
                        }
                    />
                </div>
                <Show when=move || visible().is_empty()>
                    <EmptyState message="No deliveries found for verification." />
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn VerificationCard(
    delivery: Delivery,
    notes: RwSignal<VerificationNotes>,
    busy: RwSignal<Option<String>>,
    on_verify: Callback<(String, VerificationStatus)>,
) -> impl IntoView {
    let id = StoredValue::new(delivery.id.clone());
    let pending = delivery.verification_status == VerificationStatus::Pending;
    let delivery_date = delivery
        .delivery_date
        .map(|d| format_date(&d))
        .unwrap_or_else(|| "N/A".to_string());
    let is_busy = move || id.with_value(|id| busy.with(|b| b.as_deref() == Some(id.as_str())));

    let images = delivery
        .proof_images
        .iter()
        .enumerate()
        .map(|(idx, img)| {
            view! {
                <figure class="space-y-1">
                    <a href=img.url.clone() target="_blank" rel="noopener">
                        <img
                            src=img.url.clone()
                            alt=format!("Proof {}", idx + 1)
                            class="rounded-lg w-full h-40 object-cover"
                        />
                    </a>
                    <figcaption class="text-xs text-base-content/60">
                        {format_date_time(&img.timestamp)}
                    </figcaption>
                </figure>
            }
        })
        .collect_view();

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body gap-3">
                <div class="flex items-start justify-between gap-4">
                    <div>
                        <h2 class="card-title">{delivery.customer_name().to_string()}</h2>
                        <p class="text-sm text-base-content/70">"Messenger: " {delivery.messenger_name().to_string()}</p>
                    </div>
                    <span class=format!("badge {}", verification_tone(delivery.verification_status))>
                        {delivery.verification_status.as_str().to_uppercase()}
                    </span>
                </div>

                <div class="grid grid-cols-1 md:grid-cols-3 gap-2 text-sm">
                    <div>
                        <span class="text-base-content/60">"Account: "</span>
                        <span class="font-mono">{delivery.account_number().to_string()}</span>
                    </div>
                    <div>
                        <span class="text-base-content/60">"Status: "</span>
                        <span class=format!("badge badge-sm {}", delivery_tone(delivery.status))>
                            {delivery.status.as_str()}
                        </span>
                    </div>
                    <div>
                        <span class="text-base-content/60">"Delivery Date: "</span>
                        {delivery_date}
                    </div>
                </div>

                {delivery.has_proof().then(|| view! {
                    <div>
                        <p class="font-semibold mb-2">"Proof Images:"</p>
                        <div class="grid grid-cols-2 md:grid-cols-3 gap-3">{images}</div>
                    </div>
                })}

                {pending.then(|| view! {
                    <div class="space-y-2">
                        <textarea
                            class="textarea textarea-bordered w-full"
                            placeholder="Add verification notes (optional)"
                            prop:value=move || id.with_value(|id| notes.with(|n| n.get(id).to_string()))
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                id.with_value(|id| notes.update(|n| n.set(id, value)));
                            }
                        ></textarea>
                        <div class="flex gap-2 justify-end">
                            <button
                                class="btn btn-success btn-sm"
                                disabled=is_busy
                                on:click=move |_| on_verify.run((id.get_value(), VerificationStatus::Verified))
                            >
                                "Approve"
                            </button>
                            <button
                                class="btn btn-error btn-sm"
                                disabled=is_busy
                                on:click=move |_| on_verify.run((id.get_value(), VerificationStatus::Rejected))
                            >
                                "Reject"
                            </button>
                        </div>
                    </div>
                })}

                {delivery.verification_notes.clone().filter(|n| !n.is_empty()).map(|text| view! {
                    <div class="alert">
                        <div>
                            <p class="font-semibold">"📝 Notes:"</p>
                            <p>{text}</p>
                        </div>
                    </div>
                })}
            </div>
        </div>
    }
}
