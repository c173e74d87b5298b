//! Landing page

use leptos::*;
use leptos_router::A;

#[component]
pub fn Home() -> impl IntoView {
    view! {
        <div class="space-y-12">
            <div class="text-center py-12">
                <h1 class="text-5xl font-bold text-green-900 mb-4">"CE4HOW Taka ni Mali"</h1>
                <p class="text-xl text-gray-700 mb-4">
                    "Geospatial waste management monitoring and evaluation"
                </p>
                <p class="text-lg text-gray-600 max-w-2xl mx-auto">
                    "Track and map waste collection across Kakamega Municipality."
                </p>
            </div>

            <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                <Feature title="Site map" text="Every dumpsite, receptacle and recovery centre with its status and directions"/>
                <Feature title="Analytics" text="Volumes by waste type and day for any combination of filters"/>
                <Feature title="Data collection" text="Collectors submit pickups with volumes and separation details"/>
            </div>

            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                <div class="bg-white rounded-lg shadow p-6">
                    <h2 class="text-xl font-semibold mb-2">"View dashboard"</h2>
                    <p class="text-sm text-gray-600 mb-4">"Aggregated collection data, the site map and trends."</p>
                    <A href="/dashboard" class="inline-block px-4 py-2 rounded bg-green-700 text-white hover:bg-green-800">
                        "Open dashboard"
                    </A>
                </div>
                <div class="bg-white rounded-lg shadow p-6">
                    <h2 class="text-xl font-semibold mb-2">"Submit data"</h2>
                    <p class="text-sm text-gray-600 mb-4">"Record a collection from the field."</p>
                    <A href="/collector" class="inline-block px-4 py-2 rounded bg-amber-700 text-white hover:bg-amber-800">
                        "Open collector"
                    </A>
                </div>
            </div>
        </div>
    }
}

#[component]
fn Feature(title: &'static str, text: &'static str) -> impl IntoView {
    view! {
        <div class="bg-white rounded-lg shadow p-6">
            <h3 class="text-lg font-semibold text-green-800 mb-2">{title}</h3>
            <p class="text-sm text-gray-600">{text}</p>
        </div>
    }
}
