use crate::components::proof_panel::{ProofGuidelines, ProofPanel, new_capture_state};
use leptos::prelude::*;

/// 独立取证上传页：手动输入配送 id
#[component]
pub fn ProofCapturePage() -> impl IntoView {
    let capture = new_capture_state();
    let delivery_id = RwSignal::new(String::new());

    view! {
        <div class="max-w-2xl mx-auto p-4 md:p-8 space-y-6">
            <div>
                <h1 class="text-3xl font-bold">"Upload Proof of Delivery"</h1>
                <p class="text-base-content/70">"Capture photo evidence of successful delivery"</p>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body space-y-4">
                    <div class="form-control">
                        <label class="label" for="delivery_id">
                            <span class="label-text">"Select Delivery:"</span>
                        </label>
                        <input
                            id="delivery_id"
                            type="text"
                            placeholder="Enter delivery ID or search"
                            class="input input-bordered"
                            prop:value=move || delivery_id.get()
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                capture.update(|c| c.set_delivery_id(value.clone()));
                                delivery_id.set(value);
                            }
                        />
                    </div>

                    <ProofPanel
                        capture=capture
                        submit_label="Upload Proof"
                        success_message="Proof uploaded successfully!"
                        on_submitted=move |_| {
                            delivery_id.set(String::new());
                            capture.update(|c| c.set_delivery_id(""));
                        }
                    />
                </div>
            </div>

            <ProofGuidelines />
        </div>
    }
}
