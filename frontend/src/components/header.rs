use crate::auth::{logout, use_auth};
use crate::components::icons::LogOut;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

/// 顶部导航栏：已登录时显示角色、姓名与注销按钮
#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth();

    // 注销后由路由守卫带回登录页
    let on_logout = move |_| logout(&auth);

    view! {
        <div class="navbar bg-base-100 shadow-md px-4">
            <div class="flex-1">
                <Link to=AppRoute::Dashboard class="btn btn-ghost text-xl">
                    "PODTrack"
                </Link>
            </div>
            {move || {
                auth.user()
                    .map(|user| {
                        view! {
                            <div class="flex-none gap-3 items-center">
                                <span class="badge badge-primary badge-outline uppercase">
                                    {user.role.as_str()}
                                </span>
                                <span class="font-semibold hidden sm:inline">{user.name}</span>
                                <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                                    <LogOut attr:class="h-4 w-4" />
                                    "Logout"
                                </button>
                            </div>
                        }
                    })
            }}
        </div>
    }
}
