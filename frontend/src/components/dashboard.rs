use crate::auth::use_auth;
use crate::components::icons::*;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use podtrack_shared::Role;

struct MenuItem {
    title: &'static str,
    description: &'static str,
    route: AppRoute,
}

const MESSENGER_MENU: &[MenuItem] = &[
    MenuItem {
        title: "My Routes",
        description: "View assigned routes and tasks",
        route: AppRoute::MessengerRoutes,
    },
    MenuItem {
        title: "Delivery History",
        description: "View completed and pending deliveries",
        route: AppRoute::MessengerDeliveries,
    },
    MenuItem {
        title: "Upload Proof",
        description: "Submit proof of delivery",
        route: AppRoute::MessengerProof,
    },
];

const COORDINATOR_MENU: &[MenuItem] = &[
    MenuItem {
        title: "Messengers",
        description: "Manage messenger accounts",
        route: AppRoute::CoordinatorMessengers,
    },
    MenuItem {
        title: "Bills",
        description: "Input and manage bills",
        route: AppRoute::CoordinatorBills,
    },
    MenuItem {
        title: "Tracking",
        description: "Real-time delivery tracking",
        route: AppRoute::CoordinatorTracking,
    },
    MenuItem {
        title: "Verification",
        description: "Verify delivery proofs",
        route: AppRoute::CoordinatorVerification,
    },
    MenuItem {
        title: "Reports",
        description: "Generate DSR and analytics",
        route: AppRoute::CoordinatorReports,
    },
];

/// 菜单按角色区分；管理员看到协调员菜单
fn menu_for(role: Option<Role>) -> &'static [MenuItem] {
    match role {
        Some(Role::Messenger) => MESSENGER_MENU,
        _ => COORDINATOR_MENU,
    }
}

fn menu_icon(route: AppRoute) -> AnyView {
    match route {
        AppRoute::MessengerRoutes => view! { <Truck attr:class="h-8 w-8" /> }.into_any(),
        AppRoute::MessengerDeliveries => view! { <History attr:class="h-8 w-8" /> }.into_any(),
        AppRoute::MessengerProof => view! { <Camera attr:class="h-8 w-8" /> }.into_any(),
        AppRoute::CoordinatorMessengers => view! { <Users attr:class="h-8 w-8" /> }.into_any(),
        AppRoute::CoordinatorBills => view! { <FileText attr:class="h-8 w-8" /> }.into_any(),
        AppRoute::CoordinatorTracking => view! { <MapPin attr:class="h-8 w-8" /> }.into_any(),
        AppRoute::CoordinatorVerification => {
            view! { <ClipboardCheck attr:class="h-8 w-8" /> }.into_any()
        }
        _ => view! { <BarChart attr:class="h-8 w-8" /> }.into_any(),
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let role = auth.role_signal();

    let name = move || auth.user().map(|u| u.name).unwrap_or_default();

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Welcome, " {name} "!"</h1>
                <p class="text-base-content/70">"Digital Proof-of-Delivery System"</p>
            </div>

            <div class="grid gap-6 sm:grid-cols-2 lg:grid-cols-3">
                {move || {
                    menu_for(role.get())
                        .iter()
                        .map(|item| {
                            let route = item.route;
                            view! {
                                <div
                                    class="card bg-base-100 shadow-xl cursor-pointer hover:shadow-2xl transition"
                                    on:click=move |_| router.navigate_to(route)
                                >
                                    <div class="card-body">
                                        <div class="text-primary">{menu_icon(route)}</div>
                                        <h3 class="card-title">{item.title}</h3>
                                        <p class="text-base-content/70">{item.description}</p>
                                        <div class="card-actions justify-end text-primary">"→"</div>
                                    </div>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_follows_role() {
        let routes = |role| menu_for(role).iter().map(|i| i.route).collect::<Vec<_>>();
        assert_eq!(
            routes(Some(Role::Messenger)),
            vec![
                AppRoute::MessengerRoutes,
                AppRoute::MessengerDeliveries,
                AppRoute::MessengerProof
            ]
        );
        assert_eq!(routes(Some(Role::Coordinator)).len(), 5);
        assert_eq!(routes(Some(Role::Admin)), routes(Some(Role::Coordinator)));
    }
}
