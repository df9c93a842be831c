//! 取证面板：摄像头 / 相册取图、预览、上传
//!
//! 状态全部在 `ProofCapture` 状态机里，面板只负责把浏览器事件喂给它。
//! 摄像头流在拍摄、关闭面板与组件销毁时都会释放。

use crate::api::use_api;
use crate::components::icons::{Camera, RefreshCw, Upload};
use crate::components::notification::use_notifier;
use crate::web::camera::{self, BrowserStream};
use crate::web::dialog;
use crate::web::file;
use leptos::prelude::*;
use leptos::task::spawn_local;
use podtrack_shared::capture::ProofCapture;
use podtrack_shared::protocol::UploadProofRequest;
use web_sys::HtmlInputElement;

pub type CaptureState = RwSignal<ProofCapture<BrowserStream>, LocalStorage>;

pub fn new_capture_state() -> CaptureState {
    RwSignal::new_local(ProofCapture::new())
}

#[component]
pub fn ProofPanel(
    capture: CaptureState,
    /// 面板是否可见；变为不可见时关闭流程
    #[prop(optional, into)]
    open: Option<Signal<bool>>,
    submit_label: &'static str,
    success_message: &'static str,
    #[prop(into)] on_submitted: Callback<()>,
) -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();
    let video_ref = NodeRef::<leptos::html::Video>::new();
    let file_ref = NodeRef::<leptos::html::Input>::new();

    let is_open = move || open.map(|o| o.get()).unwrap_or(true);
    let is_open_untracked = move || open.map(|o| o.get_untracked()).unwrap_or(true);

    let camera_active = Memo::new(move |_| capture.with(|c| c.is_camera_active()));
    let submitting = Memo::new(move |_| capture.with(|c| c.is_submitting()));
    let can_submit = Memo::new(move |_| capture.with(|c| c.can_submit()));
    let preview = Memo::new(move |_| {
        capture.with(|c| c.preview().map(|image| image.data_url().to_string()))
    });
    let error = Memo::new(move |_| capture.with(|c| c.error().map(str::to_string)));

    // 预览 <video> 跟随摄像头状态挂载 / 解除媒体流
    Effect::new(move |_| {
        let active = camera_active.get();
        if let Some(video) = video_ref.get() {
            capture.with_untracked(|c| {
                camera::attach(&video, if active { c.camera_stream() } else { None })
            });
        }
    });

    Effect::new(move |_| {
        if !is_open() {
            capture.update(|c| c.close());
        }
    });

    on_cleanup(move || {
        capture.try_update(|c| c.close());
    });

    let start_camera = move |_| {
        spawn_local(async move {
            match camera::request_camera().await {
                // 授权期间面板已关闭：流在 drop 时停止
                Ok(stream) if !is_open_untracked() => drop(stream),
                Ok(stream) => {
                    capture.try_update(|c| c.camera_started(stream));
                }
                Err(e) => {
                    capture.try_update(|c| c.camera_failed(e.to_string()));
                    dialog::alert(&e.to_string());
                }
            }
        });
    };

    let capture_photo = move |_| {
        let Some(video) = video_ref.get_untracked() else {
            return;
        };
        match camera::capture_frame(&video) {
            Ok(image) => {
                capture.update(|c| {
                    c.capture(image);
                });
            }
            Err(e) => dialog::alert(&e.to_string()),
        }
    };

    let on_file_change = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(selected) = file::selected_file(&input) else {
            return;
        };
        // 允许再次选择同一文件
        input.set_value("");
        spawn_local(async move {
            match file::read_image(selected).await {
                Ok(image) => {
                    capture.try_update(|c| c.file_selected(image));
                }
                Err(e) => dialog::alert(&e.to_string()),
            }
        });
    };

    let open_gallery = move |_| {
        if let Some(input) = file_ref.get_untracked() {
            input.click();
        }
    };

    let submit = move |_| {
        let Some(result) = capture.try_update(|c| c.begin_submit()) else {
            return;
        };
        let submission = match result {
            Ok(submission) => submission,
            Err(e) => {
                dialog::alert(&e.to_string());
                return;
            }
        };
        log::info!("uploading proof for delivery {}", submission.delivery_id);

        spawn_local(async move {
            let req = UploadProofRequest::from(submission);
            match api.send(&req).await {
                Ok(_) => {
                    capture.try_update(|c| c.submit_succeeded());
                    notifier.success(success_message);
                    on_submitted.run(());
                }
                Err(e) => {
                    capture.try_update(|c| c.submit_failed(e.user_message()));
                    api.alert_error("Error uploading proof", &e);
                }
            }
        });
    };

    view! {
        <div class="space-y-4">
            <div class="flex flex-wrap gap-2">
                <button class="btn btn-outline gap-2" on:click=start_camera disabled=move || submitting.get()>
                    <Camera attr:class="h-4 w-4" /> "Use Camera"
                </button>
                <button class="btn btn-outline gap-2" on:click=open_gallery disabled=move || submitting.get()>
                    <Upload attr:class="h-4 w-4" /> "Upload from Gallery"
                </button>
                <input type="file" accept="image/*" class="hidden" node_ref=file_ref on:change=on_file_change />
            </div>

            <div class:hidden=move || !camera_active.get() class="space-y-2">
                <video node_ref=video_ref autoplay playsinline muted class="w-full rounded-box bg-black"></video>
                <button class="btn btn-primary w-full gap-2" on:click=capture_photo>
                    <Camera attr:class="h-4 w-4" /> "Capture"
                </button>
            </div>

            {move || preview.get().map(|src| view! {
                <div class="space-y-2">
                    <img src=src alt="Proof" class="w-full rounded-box border border-base-300" />
                    <div class="flex items-center justify-between">
                        <span class="text-success text-sm">"✓ Photo ready for upload"</span>
                        <button class="btn btn-ghost btn-sm gap-1" disabled=move || submitting.get()
                            on:click=move |_| capture.update(|c| c.discard())>
                            <RefreshCw attr:class="h-4 w-4" /> "Retake"
                        </button>
                    </div>
                </div>
            })}

            {move || error.get().map(|message| view! {
                <div role="alert" class="alert alert-warning text-sm py-2">{message}</div>
            })}

            <button class="btn btn-success w-full" on:click=submit
                disabled=move || !can_submit.get() || submitting.get()>
                {move || if submitting.get() {
                    view! { <span class="loading loading-spinner"></span> "Uploading..." }.into_any()
                } else {
                    submit_label.into_any()
                }}
            </button>
        </div>
    }
}

/// 取证拍摄须知
#[component]
pub fn ProofGuidelines() -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h3 class="card-title text-base">"Guidelines for Proof Capture:"</h3>
                <ul class="list-disc list-inside text-sm text-base-content/70 space-y-1">
                    <li>"Capture a clear photo of the delivery location"</li>
                    <li>"Include house/building number if visible"</li>
                    <li>"Ensure good lighting for clarity"</li>
                    <li>"Photo will be timestamped automatically"</li>
                    <li>"Maximum file size: 5MB"</li>
                </ul>
            </div>
        </div>
    }
}
