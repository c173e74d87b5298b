//! Detail card for the marker whose popup is open

use crate::controller::use_controller;
use leptos::*;
use wm_core::markers::{DirectionsLink, SiteDetail};

#[component]
pub fn SitePopup() -> impl IntoView {
    let controller = use_controller();

    move || {
        let id = controller.open_popup.get()?;
        let detail = controller.detail(&id)?;
        let close = {
            let id = id.clone();
            move |_| controller.close_popup(&id)
        };

        Some(view! {
            <div class="absolute top-2 right-2 w-80 bg-white rounded-lg shadow-lg p-4 space-y-2">
                <div class="flex items-start justify-between">
                    <h3 class="text-lg font-semibold text-gray-900">{detail.name.clone()}</h3>
                    <button class="text-gray-400 hover:text-gray-700" on:click=close>"x"</button>
                </div>
                {detail.image.clone().map(|src| view! {
                    <img src=src alt=detail.name.clone() class="w-full h-32 object-cover rounded"/>
                })}
                <p class="text-xs uppercase text-gray-500">{detail.kind.label()} " - " {detail.category.clone()}</p>
                <p class="text-sm"><span class="font-medium">"Status: "</span>{detail.status.clone()}</p>
                <p class="text-sm text-gray-700">{detail.description.clone()}</p>
                <p class="text-sm text-gray-700"><span class="font-medium">"Challenges: "</span>{detail.challenges.clone()}</p>
                <DirectionsButton detail=detail.clone()/>
            </div>
        })
    }
}

#[component]
fn DirectionsButton(detail: SiteDetail) -> impl IntoView {
    let open = move |_| {
        detail.request_directions(&|link: &DirectionsLink| {
            if let Err(e) = window().open_with_url_and_target(&link.url, link.target()) {
                tracing::warn!("Could not open directions: {:?}", e);
            }
        });
    };

    view! {
        <button
            class="w-full px-3 py-2 text-sm font-medium text-white bg-green-700 rounded hover:bg-green-800"
            on:click=open
        >
            "Get directions"
        </button>
    }
}
