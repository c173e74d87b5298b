//! Dashboard overview page

use crate::components::{FilterPanel, RecordsTable, SiteMap, SummaryCards, TrendChart};
use crate::controller::use_controller;
use leptos::*;
use wm_core::{summarize, trend};

#[component]
pub fn Dashboard() -> impl IntoView {
    let controller = use_controller();

    // Fetch on mount
    create_effect(move |_| controller.load());

    let records = controller.records;
    let summary = create_memo(move |_| records.with(|r| summarize(r).map_err(|e| e.to_string())));
    let daily = create_memo(move |_| records.with(|r| trend(r).map_err(|e| e.to_string())));

    let heading = move || match controller.selection.get() {
        Some(marker) => format!("Dashboard: {}", marker.site_name),
        None => "Dashboard".to_string(),
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold text-gray-900">{heading}</h1>
                <Show when=move || controller.loading.get()>
                    <span class="text-sm text-gray-500">"Loading..."</span>
                </Show>
            </div>

            {move || controller.error.get().map(|e| view! {
                <div class="flex items-center justify-between bg-red-50 text-red-800 rounded p-4">
                    <span>{e}</span>
                    <button class="text-sm underline" on:click=move |_| controller.dismiss_error()>
                        "Dismiss"
                    </button>
                </div>
            })}

            <SummaryCards summary=summary/>

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                <div class="lg:col-span-2">
                    <SiteMap/>
                </div>
                <FilterPanel/>
            </div>

            <div class="bg-white rounded-lg shadow p-6">
                <h2 class="text-xl font-semibold mb-4">"Daily Volume"</h2>
                <TrendChart trend=daily/>
            </div>

            <div class="bg-white rounded-lg shadow p-6">
                <h2 class="text-xl font-semibold mb-4">"Recent Collections"</h2>
                <RecordsTable records=records/>
            </div>
        </div>
    }
}
