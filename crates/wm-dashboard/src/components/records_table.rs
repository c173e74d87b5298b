//! Most recent collections in the current result set

use leptos::*;
use wm_core::pipeline::latest;
use wm_core::{CollectionRecord, WasteType};

const SHOWN: usize = 10;

#[component]
pub fn RecordsTable(#[prop(into)] records: Signal<Vec<CollectionRecord>>) -> impl IntoView {
    let rows = move || records.with(|records| latest(records, SHOWN));

    view! {
        <table class="min-w-full divide-y divide-gray-200">
            <thead>
                <tr>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Date"</th>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Site"</th>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Type"</th>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Volume (t)"</th>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Separated"</th>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Collections"</th>
                </tr>
            </thead>
            <tbody class="bg-white divide-y divide-gray-200">
                <For
                    each=rows
                    key=|record| record.id
                    children=move |record| {
                        view! {
                            <tr>
                                <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-500">
                                    {record.collection_day().format("%Y-%m-%d").to_string()}
                                </td>
                                <td class="px-6 py-4 whitespace-nowrap">{record.site_name.clone()}</td>
                                <td class="px-6 py-4 whitespace-nowrap">
                                    <WasteBadge waste_type=record.waste_type/>
                                </td>
                                <td class="px-6 py-4 whitespace-nowrap">{record.total_volume.clone()}</td>
                                <td class="px-6 py-4 whitespace-nowrap">
                                    {separation(&record)}
                                </td>
                                <td class="px-6 py-4 whitespace-nowrap">{record.collection_count}</td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
        <Show when=move || records.with(Vec::is_empty)>
            <p class="py-6 text-center text-gray-500">"No collections match the current filters."</p>
        </Show>
    }
}

fn separation(record: &CollectionRecord) -> String {
    if !record.waste_separated {
        return "No".to_string();
    }
    match (&record.organic_volume, &record.inorganic_volume) {
        (Some(organic), Some(inorganic)) => format!("{organic} / {inorganic}"),
        _ => "Yes".to_string(),
    }
}

#[component]
fn WasteBadge(waste_type: WasteType) -> impl IntoView {
    let (bg, text) = match waste_type {
        WasteType::Organic => ("bg-green-100", "text-green-800"),
        WasteType::Inorganic => ("bg-blue-100", "text-blue-800"),
        WasteType::Mixed => ("bg-yellow-100", "text-yellow-800"),
    };

    view! {
        <span class=format!("px-2 py-1 text-xs font-medium rounded-full {} {}", bg, text)>
            {waste_type.as_str()}
        </span>
    }
}
