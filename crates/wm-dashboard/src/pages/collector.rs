//! Collector data-entry page

use crate::api::{ApiClient, ApiClientError};
use leptos::*;
use std::time::Duration;
use wm_core::{CollectionForm, CoreError, FieldError, SiteCatalog, WasteType};

const SUCCESS_NOTICE: Duration = Duration::from_secs(5);

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[component]
pub fn Collector() -> impl IntoView {
    let catalog = expect_context::<SiteCatalog>();
    let client = expect_context::<ApiClient>();

    let form = create_rw_signal(CollectionForm::new(&catalog, today()));
    let field_errors = create_rw_signal(Vec::<FieldError>::new());
    let failure = create_rw_signal(None::<String>);
    let submitting = create_rw_signal(false);
    let success = create_rw_signal(false);

    let catalog = store_value(catalog);
    let client = store_value(client);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        failure.set(None);

        let input = match form.with(CollectionForm::parse) {
            Ok(input) => input,
            Err(CoreError::Validation(errors)) => {
                field_errors.set(errors);
                return;
            }
            Err(e) => {
                failure.set(Some(e.to_string()));
                return;
            }
        };
        field_errors.set(Vec::new());
        submitting.set(true);

        spawn_local(async move {
            let result = client.get_value().submit(&input).await;
            submitting.set(false);

            match result {
                Ok(record) => {
                    tracing::info!("Submitted collection {} for {}", record.id, record.site_name);
                    form.update(|f| catalog.with_value(|c| f.reset(c, today())));
                    success.set(true);
                    set_timeout(move || success.set(false), SUCCESS_NOTICE);
                }
                Err(ApiClientError::Validation(errors)) => field_errors.set(errors),
                Err(e) => failure.set(Some(e.to_string())),
            }
        });
    };

    let error_for = move |name: &'static str| {
        move || {
            field_errors.with(|errors| {
                errors
                    .iter()
                    .find(|e| e.field == name)
                    .map(|e| view! { <p class="mt-1 text-xs text-red-700">{e.message.clone()}</p> })
            })
        }
    };

    let site_names: Vec<String> = catalog.with_value(|c| c.sites().iter().map(|s| s.name.clone()).collect());

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            <h1 class="text-3xl font-bold text-gray-900">"Submit Collection"</h1>

            <Show when=move || success.get()>
                <div class="bg-green-100 text-green-800 rounded p-4">"Collection submitted successfully!"</div>
            </Show>
            {move || failure.get().map(|e| view! {
                <div class="bg-red-50 text-red-800 rounded p-4">{e}</div>
            })}

            <form class="bg-white rounded-lg shadow p-6 space-y-4" on:submit=on_submit>
                <label class="block">
                    <span class="text-sm font-medium text-gray-700">"Site"</span>
                    <select
                        class="mt-1 block w-full px-3 py-2 border rounded-md"
                        on:change=move |ev| {
                            let name = event_target_value(&ev);
                            form.update(|f| {
                                catalog.with_value(|c| f.select_site(c, &name));
                            });
                        }
                    >
                        {site_names
                            .into_iter()
                            .map(|name| {
                                let selected = {
                                    let name = name.clone();
                                    move || form.with(|f| f.site_name == name)
                                };
                                view! { <option value=name.clone() prop:selected=selected>{name}</option> }
                            })
                            .collect_view()}
                    </select>
                </label>

                <div class="grid grid-cols-2 gap-4">
                    <label class="block">
                        <span class="text-sm font-medium text-gray-700">"Waste type"</span>
                        <select
                            class="mt-1 block w-full px-3 py-2 border rounded-md"
                            on:change=move |ev| form.update(|f| f.waste_type = event_target_value(&ev))
                        >
                            {WasteType::ALL
                                .into_iter()
                                .map(|t| view! {
                                    <option
                                        value=t.as_str()
                                        prop:selected=move || form.with(|f| f.waste_type == t.as_str())
                                    >
                                        {t.as_str()}
                                    </option>
                                })
                                .collect_view()}
                        </select>
                        {error_for("wasteType")}
                    </label>
                    <TextField form=form label="Date" kind="date" error=error_for("collectionDate")
                        get=|f| f.collection_date.clone() set=|f, v| f.collection_date = v/>
                </div>

                <div class="grid grid-cols-2 gap-4">
                    <TextField form=form label="Total volume (t)" kind="number" error=error_for("totalVolume")
                        get=|f| f.total_volume.clone() set=|f, v| f.total_volume = v/>
                    <TextField form=form label="Number of collections" kind="number" error=error_for("collectionCount")
                        get=|f| f.collection_count.clone() set=|f, v| f.collection_count = v/>
                </div>

                <label class="flex items-center space-x-2">
                    <input
                        type="checkbox"
                        prop:checked=move || form.with(|f| f.waste_separated)
                        on:change=move |ev| form.update(|f| f.waste_separated = event_target_checked(&ev))
                    />
                    <span class="text-sm font-medium text-gray-700">"Waste was separated"</span>
                </label>

                <Show when=move || form.with(|f| f.waste_separated)>
                    <div class="grid grid-cols-2 gap-4">
                        <TextField form=form label="Organic volume (t)" kind="number" error=error_for("organicVolume")
                            get=|f| f.organic_volume.clone() set=|f, v| f.organic_volume = v/>
                        <TextField form=form label="Inorganic volume (t)" kind="number" error=error_for("inorganicVolume")
                            get=|f| f.inorganic_volume.clone() set=|f, v| f.inorganic_volume = v/>
                    </div>
                </Show>

                <div class="grid grid-cols-2 gap-4">
                    <TextField form=form label="Latitude" kind="number" error=error_for("latitude")
                        get=|f| f.latitude.clone() set=|f, v| f.latitude = v/>
                    <TextField form=form label="Longitude" kind="number" error=error_for("longitude")
                        get=|f| f.longitude.clone() set=|f, v| f.longitude = v/>
                </div>

                <label class="block">
                    <span class="text-sm font-medium text-gray-700">"Comments"</span>
                    <textarea
                        class="mt-1 block w-full px-3 py-2 border rounded-md"
                        rows="3"
                        prop:value=move || form.with(|f| f.comments.clone())
                        on:input=move |ev| form.update(|f| f.comments = event_target_value(&ev))
                    ></textarea>
                    {error_for("comments")}
                </label>

                <button
                    type="submit"
                    class="w-full px-4 py-2 rounded bg-green-700 text-white hover:bg-green-800 disabled:opacity-50"
                    prop:disabled=move || submitting.get()
                >
                    {move || if submitting.get() { "Submitting..." } else { "Submit collection" }}
                </button>
            </form>
        </div>
    }
}

#[component]
fn TextField<E, V>(
    form: RwSignal<CollectionForm>,
    label: &'static str,
    kind: &'static str,
    error: E,
    get: fn(&CollectionForm) -> String,
    set: fn(&mut CollectionForm, String),
) -> impl IntoView
where
    E: Fn() -> Option<V> + 'static,
    V: IntoView,
{
    view! {
        <label class="block">
            <span class="text-sm font-medium text-gray-700">{label}</span>
            <input
                type=kind
                step=(kind == "number").then_some("any")
                class="mt-1 block w-full px-3 py-2 border rounded-md"
                prop:value=move || form.with(get)
                on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
            />
            {error}
        </label>
    }
}
