//! 协调员：日报 (DSR) 与绩效分析
//!
//! 报表由服务端计算，页面只负责按日期请求并原样展示。

use crate::api::use_api;
use crate::components::icons::FileText;
use crate::components::notification::use_notifier;
use crate::components::widgets::{EmptyState, StatBox};
use crate::web::dialog;
use leptos::prelude::*;
use leptos::task::spawn_local;
use podtrack_shared::date::{format_date_time, format_time, parse_input_date, to_input_value, today};
use podtrack_shared::protocol::GenerateReportRequest;
use podtrack_shared::{CriticalPath, MessengerPerformance, Report};

/// 进度条宽度，限制在 0..=100
fn score_width(score: f64) -> String {
    format!("width: {:.1}%", score.clamp(0.0, 100.0))
}

fn print_page() {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.print() {
            log::warn!("print failed: {:?}", e);
        }
    }
}

#[component]
pub fn ReportsPage() -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();

    let selected_date = RwSignal::new(to_input_value(today()));
    let report = RwSignal::new(Option::<Report>::None);
    let (generating, set_generating) = signal(false);

    let on_generate = move |_| {
        if generating.get_untracked() {
            return;
        }
        let Some(report_date) = parse_input_date(&selected_date.get_untracked()) else {
            dialog::alert("Please select a date for the report");
            return;
        };
        set_generating.set(true);
        spawn_local(async move {
            match api.send(&GenerateReportRequest { report_date }).await {
                Ok(resp) => {
                    report.set(Some(resp.report));
                    notifier.success("Daily Situation Report generated successfully!");
                }
                Err(e) => api.alert_error("Error generating report", &e),
            }
            set_generating.set(false);
        });
    };

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
            <div>
                <h1 class="text-3xl font-bold">"Reports & Analytics"</h1>
                <p class="text-base-content/70">"Generate DSR and performance metrics"</p>
            </div>

            <div class="card bg-base-100 shadow print:hidden">
                <div class="card-body flex-row flex-wrap items-end gap-4">
                    <div class="form-control">
                        <label class="label" for="report_date">
                            <span class="label-text">"Select Date for Report:"</span>
                        </label>
                        <input
                            id="report_date"
                            type="date"
                            class="input input-bordered"
                            prop:value=move || selected_date.get()
                            on:input=move |ev| selected_date.set(event_target_value(&ev))
                        />
                    </div>
                    <button class="btn btn-primary gap-2" on:click=on_generate disabled=move || generating.get()>
                        {move || if generating.get() {
                            view! { <span class="loading loading-spinner loading-sm"></span> "Generating..." }.into_any()
                        } else {
                            view! { <FileText attr:class="h-4 w-4" /> "Generate DSR" }.into_any()
                        }}
                    </button>
                </div>
            </div>

            {move || match report.get() {
                Some(report) => view! { <ReportView report=report /> }.into_any(),
                None => view! {
                    <EmptyState message="Select a date and generate a report to see performance metrics." />
                }.into_any(),
            }}
        </div>
    }
}

#[component]
fn ReportView(report: Report) -> impl IntoView {
    let data = report.data;

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body space-y-6">
                <div>
                    <h2 class="card-title text-2xl">"Daily Situation Report (DSR)"</h2>
                    <p class="text-sm text-base-content/60">
                        "Generated: " {format_date_time(&report.generated_at)}
                    </p>
                </div>

                <div class="stats stats-vertical lg:stats-horizontal shadow w-full">
                    <StatBox title="Total Bills Processed" value=data.total_bills_processed.to_string() />
                    <StatBox title="✓ Delivered" value=data.total_bills_delivered.to_string() tone="text-success" />
                    <StatBox title="Disconnection Notices" value=data.total_disconnection_notices.to_string() tone="text-warning" />
                    <StatBox title="Delivery Rate" value=format!("{:.1}%", data.delivery_rate) tone="text-info" />
                    <StatBox title="❌ Failed" value=data.failure_count.to_string() tone="text-error" />
                </div>

                <PerformanceTable rows=data.messenger_performance />
                <CriticalPathView path=report.critical_path />

                <div class="card-actions justify-end print:hidden">
                    <button class="btn btn-outline" on:click=|_| print_page()>"Print Report"</button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn PerformanceTable(rows: Vec<MessengerPerformance>) -> impl IntoView {
    view! {
        <section>
            <h3 class="text-lg font-semibold mb-2">"Messenger Performance"</h3>
            <div class="overflow-x-auto">
                <table class="table w-full">
                    <thead>
                        <tr>
                            <th>"Messenger"</th>
                            <th>"Assigned"</th>
                            <th>"Delivered"</th>
                            <th>"Failed"</th>
                            <th>"Performance"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {rows
                            .into_iter()
                            .map(|perf| view! {
                                <tr>
                                    <td>{perf.messenger_name}</td>
                                    <td>{perf.assigned}</td>
                                    <td class="text-success">{perf.delivered}</td>
                                    <td class="text-error">{perf.failed}</td>
                                    <td>
                                        <div class="flex items-center gap-2">
                                            <div class="w-32 h-2 rounded-full bg-base-300 overflow-hidden">
                                                <div class="h-full bg-primary" style=score_width(perf.performance_score)></div>
                                            </div>
                                            <span class="text-sm">{format!("{:.1}%", perf.performance_score)}</span>
                                        </div>
                                    </td>
                                </tr>
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </div>
        </section>
    }
}

#[component]
fn CriticalPathView(path: CriticalPath) -> impl IntoView {
    let last = path.stages.len().saturating_sub(1);

    view! {
        <section>
            <h3 class="text-lg font-semibold mb-2">"Critical Path Analysis"</h3>
            <div class="flex flex-wrap items-center gap-2">
                {path
                    .stages
                    .into_iter()
                    .enumerate()
                    .map(|(idx, stage)| view! {
                        <div class="flex items-center gap-2">
                            <div class="badge badge-primary badge-lg">{idx + 1}</div>
                            <div>
                                <p class="font-medium">{stage.stage}</p>
                                <p class="text-xs text-base-content/60">{format!("{} minutes", stage.duration)}</p>
                            </div>
                            {(idx < last).then(|| view! { <span class="text-xl text-base-content/40">"→"</span> })}
                        </div>
                    })
                    .collect_view()}
            </div>
            <p class="mt-4 text-sm">
                "Estimated Completion: " {format_time(&path.estimated_completion)}
            </p>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_width_is_clamped() {
        assert_eq!(score_width(87.5), "width: 87.5%");
        assert_eq!(score_width(140.0), "width: 100.0%");
        assert_eq!(score_width(-3.0), "width: 0.0%");
    }
}
