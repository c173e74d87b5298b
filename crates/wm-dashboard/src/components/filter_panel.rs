//! Filter form bound to the dashboard controller

use crate::controller::use_controller;
use leptos::*;
use wm_core::{FilterField, WasteType};

#[component]
pub fn FilterPanel() -> impl IntoView {
    let controller = use_controller();
    let sites = controller.catalog();

    // Text inputs stay uncontrolled while the user types; the panel is
    // rebuilt only when criteria change from elsewhere.
    let fields = move || {
        controller.revision.get();
        let criteria = controller.criteria.get_untracked();
        let value = move |field: FilterField| field.display(&criteria);

        view! {
            <div class="grid grid-cols-1 md:grid-cols-4 gap-4">
                <Select
                    field=FilterField::WasteType
                    label="Waste type"
                    value=value(FilterField::WasteType)
                    options=waste_type_options()
                />
                <Input field=FilterField::StartDate label="From" kind="date" value=value(FilterField::StartDate)/>
                <Input field=FilterField::EndDate label="To" kind="date" value=value(FilterField::EndDate)/>
                <Select
                    field=FilterField::WasteSeparated
                    label="Separated"
                    value=value(FilterField::WasteSeparated)
                    options=vec![("any", "Any"), ("true", "Yes"), ("false", "No")]
                />
                <Input field=FilterField::MinVolume label="Min volume (t)" kind="number" value=value(FilterField::MinVolume)/>
                <Input field=FilterField::MaxVolume label="Max volume (t)" kind="number" value=value(FilterField::MaxVolume)/>
                <Input field=FilterField::MinCollections label="Min collections" kind="number" value=value(FilterField::MinCollections)/>
                <Input field=FilterField::MinOrganicVolume label="Min organic (t)" kind="number" value=value(FilterField::MinOrganicVolume)/>
            </div>
        }
    };

    view! {
        <div class="bg-white rounded-lg shadow p-6 space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-xl font-semibold">"Filters"</h2>
                <button
                    class="px-3 py-1 text-sm rounded bg-gray-100 hover:bg-gray-200"
                    on:click=move |_| controller.reset()
                >
                    "Reset"
                </button>
            </div>

            <label class="block">
                <span class="text-sm text-gray-600">"Site"</span>
                <select
                    class="mt-1 block w-full rounded border-gray-300"
                    on:change=move |ev| controller.update_filter(FilterField::SiteName, &event_target_value(&ev))
                >
                    <option value="" prop:selected=move || controller.criteria.with(|c| c.site_name.is_none())>
                        "All sites"
                    </option>
                    {sites
                        .sites()
                        .iter()
                        .map(|site| {
                            let name = site.name.clone();
                            let selected = {
                                let name = name.clone();
                                move || controller.criteria.with(|c| c.site_name.as_ref() == Some(&name))
                            };
                            view! { <option value=name.clone() prop:selected=selected>{name}</option> }
                        })
                        .collect_view()}
                </select>
            </label>

            {fields}
        </div>
    }
}

fn waste_type_options() -> Vec<(&'static str, &'static str)> {
    std::iter::once(("", "All types"))
        .chain(WasteType::ALL.iter().map(|t| (t.as_str(), t.as_str())))
        .collect()
}

#[component]
fn Input(
    field: FilterField,
    label: &'static str,
    kind: &'static str,
    value: String,
) -> impl IntoView {
    let controller = use_controller();

    view! {
        <label class="block">
            <span class="text-sm text-gray-600">{label}</span>
            <input
                type=kind
                name=field.name()
                step=(kind == "number").then_some("any")
                min=(kind == "number").then_some("0")
                class="mt-1 block w-full rounded border-gray-300"
                value=value
                on:input=move |ev| controller.update_filter(field, &event_target_value(&ev))
            />
        </label>
    }
}

#[component]
fn Select(
    field: FilterField,
    label: &'static str,
    value: String,
    options: Vec<(&'static str, &'static str)>,
) -> impl IntoView {
    let controller = use_controller();

    view! {
        <label class="block">
            <span class="text-sm text-gray-600">{label}</span>
            <select
                name=field.name()
                class="mt-1 block w-full rounded border-gray-300"
                on:change=move |ev| controller.update_filter(field, &event_target_value(&ev))
            >
                {options
                    .into_iter()
                    .map(|(option, text)| view! {
                        <option value=option selected=option == value>{text}</option>
                    })
                    .collect_view()}
            </select>
        </label>
    }
}
