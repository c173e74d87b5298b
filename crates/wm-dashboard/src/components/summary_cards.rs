//! Headline numbers for the current record set

use leptos::*;
use wm_core::{Summary, WasteType};

#[component]
pub fn SummaryCards(#[prop(into)] summary: Signal<Result<Summary, String>>) -> impl IntoView {
    let value = move |pick: fn(&Summary) -> String| {
        move || match summary.get() {
            Ok(summary) => pick(&summary),
            Err(_) => "-".to_string(),
        }
    };

    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6">
            <StatCard
                title="Collections"
                value=value(|s| s.total_records.to_string())
                icon="#"
            />
            <StatCard
                title="Total Volume"
                value=value(|s| format!("{} t", s.total_volume))
                icon="t"
            />
            <StatCard
                title="Organic"
                value=value(|s| s.count(WasteType::Organic).to_string())
                icon="O"
            />
            <StatCard
                title="Inorganic / Mixed"
                value=value(|s| {
                    format!(
                        "{} / {}",
                        s.count(WasteType::Inorganic),
                        s.count(WasteType::Mixed)
                    )
                })
                icon="I"
            />
        </div>
        {move || summary.get().err().map(|e| view! {
            <p class="mt-2 text-sm text-red-700">"Totals unavailable: " {e}</p>
        })}
    }
}

#[component]
pub fn StatCard(
    title: &'static str,
    value: impl Fn() -> String + 'static,
    icon: &'static str,
) -> impl IntoView {
    view! {
        <div class="bg-white rounded-lg shadow p-6">
            <div class="flex items-center justify-between">
                <div>
                    <p class="text-sm text-gray-500">{title}</p>
                    <p class="text-2xl font-bold text-gray-900">{value}</p>
                </div>
                <div class="w-12 h-12 bg-green-100 rounded-full flex items-center justify-center">
                    <span class="text-green-700">{icon}</span>
                </div>
            </div>
        </div>
    }
}
