//! 地图选点模态框
//!
//! 只依赖 `MapBackend`：Leaflet 或 Google 由配置决定，选点状态在 `MapSelection` 中。
//! 结果通过 `on_pick` 回传 `Picked` 或 `Cancelled`。

use crate::components::icons::MapPin;
use crate::config::use_config;
use crate::web::maps::{self, MapBackend, MapEvents};
use leptos::prelude::*;
use leptos::task::spawn_local;
use podtrack_shared::map::{LatLng, MapSelection, PickOutcome};
use web_sys::HtmlElement;

#[component]
pub fn MapPicker(
    /// 初始坐标；缺省时以默认中心点打开
    initial: Option<LatLng>,
    #[prop(into)] on_pick: Callback<PickOutcome>,
) -> impl IntoView {
    let config = use_config();
    let provider = config.map_provider;
    let precision = provider.coords_precision();
    let config = StoredValue::new(config);

    let selection = RwSignal::new(MapSelection::new(initial));
    let backend = StoredValue::new_local(Option::<Box<dyn MapBackend>>::None);
    let (load_error, set_load_error) = signal(Option::<String>::None);
    let (loaded, set_loaded) = signal(false);
    let mounting = StoredValue::new(false);

    let container_ref = NodeRef::<leptos::html::Div>::new();
    let search_ref = NodeRef::<leptos::html::Input>::new();

    // ====== 挂载地图 ======
    Effect::new(move |_| {
        let Some(container) = container_ref.get() else {
            return;
        };
        if mounting.get_value() {
            return;
        }
        mounting.set_value(true);

        let search = search_ref.get_untracked();
        let (center, selected) = selection.with_untracked(|s| (s.center(), s.selected()));
        let events = MapEvents {
            on_click: Box::new(move |point| {
                selection.try_update(|s| s.select_point(point));
            }),
            on_place: Box::new(move |point, address| {
                selection.try_update(|s| s.select_place(point, address));
            }),
        };

        spawn_local(async move {
            let config = config.get_value();
            let container = HtmlElement::from(container);
            match maps::mount(&config, container, search, center, selected, events).await {
                Ok(map) => {
                    // 挂载完成前模态框已关闭
                    let mut slot = Some(map);
                    backend.try_update_value(|b| *b = slot.take());
                    if let Some(map) = slot {
                        map.destroy();
                        return;
                    }
                    set_loaded.set(true);
                }
                Err(e) => {
                    log::error!("{}", e);
                    set_load_error.try_set(Some(e.to_string()));
                }
            }
        });
    });

    // 标记跟随选中点
    Effect::new(move |_| {
        let selected = selection.with(|s| s.selected());
        if !loaded.get() {
            return;
        }
        backend.with_value(|b| {
            if let Some(map) = b {
                match selected {
                    Some(point) => map.show_marker(point),
                    None => map.clear_marker(),
                }
            }
        });
    });

    // 搜索选中地点后移动视野
    Effect::new(move |prev: Option<LatLng>| {
        let center = selection.with(|s| s.center());
        if loaded.get() && prev.is_some_and(|p| p != center) {
            backend.with_value(|b| {
                if let Some(map) = b {
                    map.pan_to(center);
                }
            });
        }
        center
    });

    on_cleanup(move || {
        backend.try_update_value(|b| {
            if let Some(map) = b.take() {
                map.destroy();
            }
        });
    });

    let choose = move |_| {
        if let Some(picked) = selection.with_untracked(MapSelection::confirm) {
            on_pick.run(PickOutcome::Picked(picked));
        }
    };
    let close = move |_| on_pick.run(PickOutcome::Cancelled);

    view! {
        <div class="modal modal-open">
            <div class="modal-box w-11/12 max-w-3xl space-y-4">
                <div class="flex items-center justify-between">
                    <h3 class="font-bold text-lg flex items-center gap-2">
                        <MapPin attr:class="h-5 w-5" />
                        {if provider.supports_search() { "Search or pick location" } else { "Pick Location on Map" }}
                    </h3>
                    <button class="btn btn-sm" on:click=close>"Close"</button>
                </div>

                {provider.supports_search().then(|| view! {
                    <input
                        node_ref=search_ref
                        class="input input-bordered w-full"
                        placeholder="Search places or addresses"
                    />
                })}

                <div class="relative">
                    <div node_ref=container_ref class="w-full h-[400px] rounded-box bg-base-200"></div>
                    <Show when=move || !loaded.get() && load_error.get().is_none()>
                        <div class="absolute inset-0 flex items-center justify-center">
                            <span class="loading loading-spinner loading-lg"></span>
                            <span class="ml-2">"Loading map..."</span>
                        </div>
                    </Show>
                    {move || load_error.get().map(|e| view! {
                        <div class="absolute inset-0 flex items-center justify-center">
                            <div role="alert" class="alert alert-error">{e}</div>
                        </div>
                    })}
                </div>

                <div class="flex flex-wrap items-center justify-between gap-2">
                    <div class="text-sm">
                        "Selected: "
                        {move || selection.with(|s| s.coords_label(precision)).unwrap_or_else(|| "None".to_string())}
                    </div>
                    <div class="flex gap-2">
                        <button class="btn btn-primary" on:click=choose
                            disabled=move || !selection.with(MapSelection::can_confirm)>
                            "Choose Location"
                        </button>
                        <button class="btn" on:click=move |_| selection.update(MapSelection::clear)>"Clear"</button>
                    </div>
                </div>
            </div>
        </div>
    }
}
