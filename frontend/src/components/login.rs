use crate::auth::{login, use_auth};
use crate::components::icons::Truck;
use crate::config::use_config;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use podtrack_shared::forms::LoginForm;

/// 表单内联错误提示
#[component]
pub fn FormError(error: ReadSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some()>
            <div role="alert" class="alert alert-error text-sm py-2">
                <svg xmlns="http://www.w3.org/2000/svg" class="stroke-current shrink-0 h-6 w-6" fill="none" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M10 14l2-2m0 0l2-2m-2 2l-2-2m2 2l2 2m7-2a9 9 0 11-18 0 9 9 0 0118 0z" /></svg>
                <span>{move || error.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

/// 认证页公共外框
#[component]
pub fn AuthShell(subtitle: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Truck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"POD System"</h1>
                        <p class="text-base-content/70">{subtitle}</p>
                    </div>
                </div>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">{children()}</div>
            </div>
        </div>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let config = StoredValue::new(use_config());

    let form = RwSignal::new(LoginForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        let req = match form.with_untracked(LoginForm::to_request) {
            Ok(req) => req,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            match login(&auth, &config.get_value(), req).await {
                Ok(()) => router.navigate_to(AppRoute::Dashboard),
                Err(e) => {
                    log::warn!("login failed: {}", e);
                    set_error_msg.set(Some(e.server_message().unwrap_or("Login failed").to_string()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <AuthShell subtitle="Sign in to your account">
            <form class="card-body" on:submit=on_submit>
                <FormError error=error_msg />

                <div class="form-control">
                    <label class="label" for="email">
                        <span class="label-text">"Email Address"</span>
                    </label>
                    <input
                        id="email"
                        type="email"
                        placeholder="your@email.com"
                        on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                        prop:value=move || form.with(|f| f.email.clone())
                        class="input input-bordered"
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="password">
                        <span class="label-text">"Password"</span>
                    </label>
                    <input
                        id="password"
                        type="password"
                        placeholder="••••••••"
                        on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                        prop:value=move || form.with(|f| f.password.clone())
                        class="input input-bordered"
                        required
                    />
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                        } else {
                            "Login".into_any()
                        }}
                    </button>
                </div>
                <p class="text-center text-sm mt-2">
                    "Don't have an account? "
                    <Link to=AppRoute::Register class="link link-primary">"Register here"</Link>
                </p>
            </form>
        </AuthShell>
    }
}
