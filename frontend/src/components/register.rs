use crate::auth::{register, use_auth};
use crate::components::login::{AuthShell, FormError};
use crate::config::use_config;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use podtrack_shared::Role;
use podtrack_shared::forms::RegisterForm;

fn parse_role(value: &str) -> Role {
    match value {
        "coordinator" => Role::Coordinator,
        _ => Role::Messenger,
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let config = StoredValue::new(use_config());

    let form = RwSignal::new(RegisterForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        let req = match form.with_untracked(RegisterForm::to_request) {
            Ok(req) => req,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            match register(&auth, &config.get_value(), req).await {
                Ok(()) => router.navigate_to(AppRoute::Dashboard),
                Err(e) => {
                    log::warn!("registration failed: {}", e);
                    set_error_msg.set(Some(
                        e.server_message().unwrap_or("Registration failed").to_string(),
                    ));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <AuthShell subtitle="Create Account">
            <form class="card-body" on:submit=on_submit>
                <FormError error=error_msg />

                <div class="form-control">
                    <label class="label" for="name"><span class="label-text">"Full Name"</span></label>
                    <input id="name" type="text" placeholder="John Doe" class="input input-bordered" required
                        on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                        prop:value=move || form.with(|f| f.name.clone())
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="email"><span class="label-text">"Email Address"</span></label>
                    <input id="email" type="email" placeholder="your@email.com" class="input input-bordered" required
                        on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                        prop:value=move || form.with(|f| f.email.clone())
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="password"><span class="label-text">"Password"</span></label>
                    <input id="password" type="password" placeholder="••••••••" class="input input-bordered" required
                        on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                        prop:value=move || form.with(|f| f.password.clone())
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="role"><span class="label-text">"Role"</span></label>
                    <select id="role" class="select select-bordered"
                        on:change=move |ev| form.update(|f| f.role = parse_role(&event_target_value(&ev)))
                        prop:value=move || form.with(|f| f.role.as_str())
                    >
                        <option value="messenger">"Messenger"</option>
                        <option value="coordinator">"Coordinator"</option>
                    </select>
                </div>
                <div class="form-control">
                    <label class="label" for="phone"><span class="label-text">"Phone Number"</span></label>
                    <input id="phone" type="tel" placeholder="+1 (555) 000-0000" class="input input-bordered"
                        on:input=move |ev| form.update(|f| f.phone = event_target_value(&ev))
                        prop:value=move || form.with(|f| f.phone.clone())
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="area"><span class="label-text">"Area/Zone"</span></label>
                    <input id="area" type="text" placeholder="Zone A, Area 1" class="input input-bordered"
                        on:input=move |ev| form.update(|f| f.area = event_target_value(&ev))
                        prop:value=move || form.with(|f| f.area.clone())
                    />
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                        } else {
                            "Register".into_any()
                        }}
                    </button>
                </div>
                <p class="text-center text-sm mt-2">
                    "Already have an account? "
                    <Link to=AppRoute::Login class="link link-primary">"Login here"</Link>
                </p>
            </form>
        </AuthShell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_defaults_to_messenger() {
        assert_eq!(parse_role("coordinator"), Role::Coordinator);
        assert_eq!(parse_role("messenger"), Role::Messenger);
        assert_eq!(parse_role("admin"), Role::Messenger);
    }
}
