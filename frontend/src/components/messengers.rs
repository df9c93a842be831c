mod form_state;

use crate::api::use_api;
use crate::components::icons::{Pencil, Plus, Trash2};
use crate::components::notification::use_notifier;
use crate::components::widgets::{EmptyState, Loading, TextField};
use crate::web::dialog;
use form_state::MessengerFormState;
use leptos::prelude::*;
use leptos::task::spawn_local;
use podtrack_shared::Messenger;
use podtrack_shared::protocol::{DeleteMessengerRequest, ListMessengersRequest};

fn or_na(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or("N/A")
        .to_string()
}

/// 协调员：信使管理
/// 卡片的渲染键；编辑后任一展示字段变化都会重建卡片
type CardKey = (String, String, String, Option<String>, Option<String>, Option<String>, bool);

fn messenger_card_key(m: &Messenger) -> CardKey {
    (
        m.id.clone(),
        m.name.clone(),
        m.email.clone(),
        m.phone.clone(),
        m.area.clone(),
        m.employee_id.clone(),
        m.is_active,
    )
}

#[component]
pub fn MessengersPage() -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();

    let messengers = RwSignal::new(Vec::<Messenger>::new());
    let (loading, set_loading) = signal(true);
    let show_form = RwSignal::new(false);
    let (saving, set_saving) = signal(false);
    let form = MessengerFormState::new();

    let fetch_messengers = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api.send(&ListMessengersRequest).await {
                Ok(list) => messengers.set(list),
                Err(e) => log::error!("Error fetching messengers: {}", e),
            }
            set_loading.set(false);
        });
    };
    fetch_messengers();

    let close_form = move || {
        form.reset();
        show_form.set(false);
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let editing = form.editing_id.get_untracked();
        let req = match form.to_data().to_request(editing.as_deref()) {
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
                    notifier.success(if editing.is_some() {
                        "Messenger updated successfully"
                    } else {
                        "Messenger created successfully"
                    });
                    close_form();
                    fetch_messengers();
                }
                Err(e) => api.alert_error("Error", &e),
            }
            set_saving.set(false);
        });
    };

    let on_edit = move |messenger: Messenger| {
        form.edit(&messenger);
        show_form.set(true);
    };

    let on_delete = move |id: String| {
        if !dialog::confirm("Are you sure you want to delete this messenger?") {
            return;
        }
        spawn_local(async move {
            match api.send(&DeleteMessengerRequest { id }).await {
                Ok(_) => {
                    notifier.success("Messenger deleted successfully");
                    fetch_messengers();
                }
                Err(e) => api.alert_error("Error deleting messenger", &e),
            }
        });
    };

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Manage Messengers"</h1>
                <button
                    class="btn btn-primary gap-2"
                    on:click=move |_| if show_form.get_untracked() { close_form() } else { show_form.set(true) }
                >
                    {move || if show_form.get() {
                        "Cancel".into_any()
                    } else {
                        view! { <Plus attr:class="h-4 w-4" /> "Add New Messenger" }.into_any()
                    }}
                </button>
            </div>

            <Show when=move || show_form.get()>
                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body" on:submit=on_submit>
                        <h2 class="card-title">
                            {move || if form.is_editing() { "Edit Messenger" } else { "Add New Messenger" }}
                        </h2>
                        <div class="grid md:grid-cols-2 gap-4">
                            <TextField id="name" label="Full Name" value=form.name required=true />
                            <TextField id="email" label="Email" value=form.email input_type="email" required=true />
                            <TextField
                                id="password"
                                label="Password"
                                value=form.password
                                input_type="password"
                                required=Signal::derive(move || !form.is_editing())
                            />
                            <TextField id="employee_id" label="Employee ID" value=form.employee_id />
                            <TextField id="phone" label="Phone" value=form.phone input_type="tel" />
                            <TextField id="area" label="Area/Zone" value=form.area />
                        </div>
                        <Show when=move || form.is_editing()>
                            <p class="text-sm text-base-content/60">"Leave the password blank to keep the current one."</p>
                        </Show>
                        <div class="card-actions justify-end mt-4">
                            <Show when=move || form.is_editing()>
                                <button type="button" class="btn" on:click=move |_| close_form()>"Cancel"</button>
                            </Show>
                            <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                                {move || if form.is_editing() { "Update Messenger" } else { "Create Messenger" }}
                            </button>
                        </div>
                    </form>
                </div>
            </Show>

            <Show when=move || !(loading.get() && messengers.with(Vec::is_empty)) fallback=|| view! { <Loading /> }>
                <div class="grid gap-6 sm:grid-cols-2 lg:grid-cols-3">
                    <For
                        each=move || messengers.get()
                        key=messenger_card_key
                        children=move |messenger| {
                            let id = StoredValue::new(messenger.id.clone());
                            let stored = StoredValue::new(messenger.clone());
                            view! {
                                <div class="card bg-base-100 shadow">
                                    <div class="card-body gap-2">
                                        <div class="flex items-center justify-between">
                                            <h3 class="card-title">{messenger.name.clone()}</h3>
                                            {if messenger.is_active {
                                                view! { <span class="badge badge-success">"Active"</span> }.into_any()
                                            } else {
                                                view! { <span class="badge badge-ghost">"Inactive"</span> }.into_any()
                                            }}
                                        </div>
                                        <p class="text-sm"><strong>"Email: "</strong>{messenger.email.clone()}</p>
                                        <p class="text-sm"><strong>"Phone: "</strong>{or_na(&messenger.phone)}</p>
                                        <p class="text-sm"><strong>"Area: "</strong>{or_na(&messenger.area)}</p>
                                        <p class="text-sm"><strong>"Employee ID: "</strong>{or_na(&messenger.employee_id)}</p>
                                        <div class="card-actions justify-end mt-2">
                                            <button class="btn btn-sm btn-ghost gap-1" on:click=move |_| on_edit(stored.get_value())>
                                                <Pencil attr:class="h-4 w-4" /> "Edit"
                                            </button>
                                            <button class="btn btn-sm btn-error btn-outline gap-1" on:click=move |_| on_delete(id.get_value())>
                                                <Trash2 attr:class="h-4 w-4" /> "Remove"
                                            </button>
                                        </div>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
                <Show when=move || messengers.with(Vec::is_empty)>
                    <EmptyState message="No messengers yet. Add one to get started." />
                </Show>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_show_na() {
        assert_eq!(or_na(&None), "N/A");
        assert_eq!(or_na(&Some(String::new())), "N/A");
        assert_eq!(or_na(&Some("Zone A".to_string())), "Zone A");
    }

    #[test]
    fn test_edited_messenger_changes_card_key() {
        let before = Messenger {
            id: "2".to_string(),
            name: "Jane Doe".to_string(),
            email: "m2@test.com".to_string(),
            phone: None,
            area: Some("Zone B".to_string()),
            employee_id: Some("M002".to_string()),
            is_active: true,
        };
        let renamed = Messenger {
            name: "Jane Smith".to_string(),
            ..before.clone()
        };
        let moved = Messenger {
            area: Some("Zone C".to_string()),
            ..before.clone()
        };
        assert_ne!(messenger_card_key(&before), messenger_card_key(&renamed));
        assert_ne!(messenger_card_key(&before), messenger_card_key(&moved));
        assert_eq!(messenger_card_key(&before), messenger_card_key(&before.clone()));
    }
}
