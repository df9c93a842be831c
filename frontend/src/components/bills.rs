//! 协调员：账单管理
//!
//! 新建账单（可在地图上选点）、按状态筛选、勾选未分配账单后批量分配给信使。

mod form_state;

use crate::api::use_api;
use crate::components::icons::{MapPin, Plus};
use crate::components::map_picker::MapPicker;
use crate::components::notification::use_notifier;
use crate::components::widgets::{EmptyState, FilterTabs, Loading, Modal, TextField, bill_tone};
use crate::web::dialog;
use form_state::BillFormState;
use leptos::prelude::*;
use leptos::task::spawn_local;
use podtrack_shared::date::format_date;
use podtrack_shared::filter::{BILL_TABS, StatusFilter};
use podtrack_shared::map::PickOutcome;
use podtrack_shared::protocol::{ListBillsRequest, ListMessengersRequest};
use podtrack_shared::selection::BillSelection;
use podtrack_shared::{Bill, BillStatus, BillType, Messenger};

#[component]
pub fn BillsPage() -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();

    let bills = RwSignal::new(Vec::<Bill>::new());
    let messengers = RwSignal::new(Vec::<Messenger>::new());
    let (loading, set_loading) = signal(true);
    let filter = RwSignal::new(StatusFilter::<BillStatus>::All);
    let selection = RwSignal::new(BillSelection::new());

    // ====== 加载 ======
    let fetch_bills = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api.send(&ListBillsRequest).await {
                Ok(list) => {
                    selection.update(|s| s.retain_selectable(&list));
                    bills.set(list);
                }
                Err(e) => log::error!("Error fetching bills: {}", e),
            }
            set_loading.set(false);
        });
    };

    let fetch_messengers = move || {
        spawn_local(async move {
            match api.send(&ListMessengersRequest).await {
                Ok(list) => messengers.set(list),
                Err(e) => log::error!("Error fetching messengers: {}", e),
            }
        });
    };

    fetch_bills();
    fetch_messengers();

    let visible = move || {
        let filter = filter.get();
        bills.with(|list| filter.apply(list).into_iter().cloned().collect::<Vec<_>>())
    };
    let count = Callback::new(move |f: StatusFilter<BillStatus>| bills.with(|list| f.count(list)));

    // ====== 新建账单 ======
    let show_form = RwSignal::new(false);
    let picker_open = RwSignal::new(false);
    let (saving, set_saving) = signal(false);
    let form = BillFormState::new();

    let on_add_bill = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let req = match form.to_form().to_request() {
            Ok(req) => req,
            Err(e) => {
                dialog::alert(&e.to_string());
                return;
            }
        };
        set_saving.set(true);
        spawn_local(async move {
            match api.send(&req).await {
                Ok(_) => {
                    notifier.success("Bill added successfully");
                    form.reset();
                    show_form.set(false);
                    fetch_bills();
                }
                Err(e) => api.alert_error("Error adding bill", &e),
            }
            set_saving.set(false);
        });
    };

    let on_pick = move |outcome: PickOutcome| {
        if let PickOutcome::Picked(picked) = outcome {
            form.apply_location(&picked);
        }
        picker_open.set(false);
    };

    // ====== 批量分配 ======
    let assign_open = RwSignal::new(false);
    let selected_messenger = RwSignal::new(String::new());
    let (assigning, set_assigning) = signal(false);

    let cancel_assign = move || {
        assign_open.set(false);
        selection.update(BillSelection::clear);
        selected_messenger.set(String::new());
    };

    let on_assign = move |_| {
        if assigning.get_untracked() {
            return;
        }
        let req = match selection
            .with_untracked(|s| s.to_assignment(&selected_messenger.get_untracked()))
        {
            Ok(req) => req,
            Err(e) => {
                dialog::alert(&e.to_string());
                return;
            }
        };
        set_assigning.set(true);
        spawn_local(async move {
            match api.send(&req).await {
                Ok(_) => {
                    notifier.success("Bills assigned successfully!");
                    cancel_assign();
                    fetch_bills();
                }
                Err(e) => api.alert_error("Error assigning bills", &e),
            }
            set_assigning.set(false);
        });
    };

    // 表头复选框
    let all_selected = move || {
        let filter = filter.get();
        bills.with(|list| selection.with(|s| s.is_all_selected(&filter.apply(list))))
    };
    let toggle_all = move |checked: bool| {
        let filter = filter.get_untracked();
        bills.with_untracked(|list| {
            let visible = filter.apply(list);
            selection.update(|s| if checked { s.select_all(&visible) } else { s.clear() });
        });
    };

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-4">
                <h1 class="text-3xl font-bold">"Bills Management"</h1>
                <div class="flex gap-2">
                    <button class="btn btn-primary gap-2" on:click=move |_| show_form.update(|v| *v = !*v)>
                        {move || if show_form.get() {
                            "✕ Cancel".into_any()
                        } else {
                            view! { <Plus attr:class="h-4 w-4" /> "Add New Bill" }.into_any()
                        }}
                    </button>
                    <Show when=move || !selection.with(BillSelection::is_empty)>
                        <button class="btn btn-secondary" on:click=move |_| assign_open.set(true)>
                            {move || format!("Assign Selected ({})", selection.with(BillSelection::len))}
                        </button>
                    </Show>
                </div>
            </div>

            <Show when=move || show_form.get()>
                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body" on:submit=on_add_bill>
                        <div class="grid md:grid-cols-2 gap-4">
                            <TextField id="account_number" label="Account Number" value=form.account_number required=true />
                            <TextField id="customer_name" label="Customer Name" value=form.customer_name required=true />
                            <div class="md:col-span-2">
                                <TextField id="address" label="Address" value=form.address required=true />
                                <div class="flex items-center gap-2 mt-2">
                                    <button type="button" class="btn btn-sm btn-outline gap-1" on:click=move |_| picker_open.set(true)>
                                        <MapPin attr:class="h-4 w-4" /> "Pick on Map"
                                    </button>
                                    <span class="text-sm text-base-content/70">
                                        {move || form.coords_hint().unwrap_or_default()}
                                    </span>
                                </div>
                            </div>
                            <div class="form-control">
                                <label class="label" for="bill_type"><span class="label-text">"Bill Type"</span></label>
                                <select
                                    id="bill_type"
                                    class="select select-bordered w-full"
                                    prop:value=move || form.bill_type.get().as_str()
                                    on:change=move |ev| {
                                        if let Some(bill_type) = BillType::parse(&event_target_value(&ev)) {
                                            form.bill_type.set(bill_type);
                                        }
                                    }
                                >
                                    <option value="regular_bill">"Regular Bill"</option>
                                    <option value="disconnection_notice">"Disconnection Notice"</option>
                                </select>
                            </div>
                            <TextField id="billing_month" label="Billing Month" value=form.billing_month input_type="date" />
                        </div>
                        <div class="card-actions justify-end mt-4">
                            <button type="submit" class="btn btn-primary" disabled=move || saving.get()>"Add Bill"</button>
                        </div>
                    </form>
                </div>
            </Show>

            <Show when=move || picker_open.get()>
                <MapPicker initial=form.position() on_pick=on_pick />
            </Show>

            <FilterTabs tabs=BILL_TABS active=filter count=count />

            <Show when=move || !(loading.get() && bills.with(Vec::is_empty)) fallback=|| view! { <Loading /> }>
                <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th class="w-10">
                                    <input
                                        type="checkbox"
                                        class="checkbox checkbox-sm"
                                        prop:checked=all_selected
                                        disabled=move || visible().is_empty()
                                        on:change=move |ev| toggle_all(event_target_checked(&ev))
                                    />
                                </th>
                                <th>"Account No."</th>
                                <th>"Customer Name"</th>
                                <th>"Address"</th>
                                <th>"Billing Month"</th>
                                <th>"Type"</th>
                                <th>"Status"</th>
                                <th>"Assigned To"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=visible
                                key=|b| (b.id.clone(), b.status)
                                children=move |bill| view! { <BillRow bill=bill selection=selection /> }
                            />
                        </tbody>
                    </table>
                </div>
                <Show when=move || visible().is_empty()>
                    <EmptyState message="No bills found in this filter." />
                </Show>
            </Show>

            <Modal open=assign_open title="Assign Bills to Messenger">
                <p class="mb-4">{move || format!("Selected {} bill(s)", selection.with(BillSelection::len))}</p>
                <div class="form-control">
                    <label class="label" for="assign_messenger"><span class="label-text">"Select Messenger"</span></label>
                    <select
                        id="assign_messenger"
                        class="select select-bordered w-full"
                        prop:value=move || selected_messenger.get()
                        on:change=move |ev| selected_messenger.set(event_target_value(&ev))
                    >
                        <option value="">"-- Choose Messenger --"</option>
                        <For
                            each=move || messengers.get()
                            key=|m| m.id.clone()
                            children=|m| view! { <option value=m.id.clone()>{m.option_label()}</option> }
                        />
                    </select>
                </div>
                <div class="modal-action">
                    <button class="btn btn-primary" on:click=on_assign disabled=move || assigning.get()>
                        "✓ Assign Bills"
                    </button>
                    <button class="btn" on:click=move |_| cancel_assign()>"Cancel"</button>
                </div>
            </Modal>
        </div>
    }
}

#[component]
fn BillRow(bill: Bill, selection: RwSignal<BillSelection>) -> impl IntoView {
    let selectable = bill.is_selectable();
    let id = StoredValue::new(bill.id.clone());
    let stored = StoredValue::new(bill.clone());
    let type_badge = if bill.bill_type == BillType::DisconnectionNotice {
        "badge badge-warning"
    } else {
        "badge badge-ghost"
    };
    let billing_month = bill
        .billing_month
        .map(|d| format_date(&d))
        .unwrap_or_else(|| "-".to_string());

    view! {
        <tr>
            <td>
                <input
                    type="checkbox"
                    class="checkbox checkbox-sm"
                    prop:checked=move || id.with_value(|id| selection.with(|s| s.contains(id)))
                    disabled=!selectable
                    on:change=move |_| stored.with_value(|b| selection.update(|s| s.toggle(b)))
                />
            </td>
            <td class="font-mono">{bill.account_number.clone()}</td>
            <td>{bill.customer_name.clone()}</td>
            <td>{bill.address.clone()}</td>
            <td>{billing_month}</td>
            <td>
                <span class=type_badge>
                    {bill.bill_type.short_label()}
                </span>
            </td>
            <td>
                <span class=format!("badge {}", bill_tone(bill.status))>{bill.status.as_str().to_uppercase()}</span>
            </td>
            <td>{bill.assignee_name().unwrap_or("-").to_string()}</td>
        </tr>
    }
}
