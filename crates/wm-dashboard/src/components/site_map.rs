//! Site map
//!
//! Sites are projected into a fixed SVG viewport. Panning is a CSS
//! transform on the marker layer, so the move animates without blocking
//! anything else on the page.

use super::SitePopup;
use crate::controller::{use_controller, MapFocus};
use leptos::*;
use wm_core::boundary::Boundary;
use wm_core::{GeoBounds, LatLng, MapMarker, SiteCatalog};

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 640.0;
const FOCUS_ZOOM: f64 = 2.0;
const DEFAULT_COLOUR: &str = "#7f8c8d";

#[derive(Clone, Copy, PartialEq)]
struct Viewport {
    bounds: GeoBounds,
}

impl Viewport {
    fn new(catalog: &SiteCatalog, boundary: Option<&Boundary>) -> Self {
        let points = catalog
            .sites()
            .iter()
            .map(|site| site.position())
            .chain(boundary.into_iter().flat_map(|b| b.rings.iter().flatten().copied()));
        let bounds = GeoBounds::from_points(points)
            .unwrap_or(GeoBounds {
                south: 0.0,
                west: 0.0,
                north: 0.0,
                east: 0.0,
            })
            .padded(0.1);
        Self { bounds }
    }

    fn point(&self, at: LatLng) -> (f64, f64) {
        let (x, y) = self.bounds.project(at);
        (x * WIDTH, y * HEIGHT)
    }

    fn transform(&self, focus: Option<MapFocus>) -> String {
        match focus {
            Some(focus) => {
                let (x, y) = self.point(focus.center);
                format!(
                    "transform: translate({}px, {}px) scale({}); transition: transform {}ms ease-in-out",
                    WIDTH / 2.0 - FOCUS_ZOOM * x,
                    HEIGHT / 2.0 - FOCUS_ZOOM * y,
                    FOCUS_ZOOM,
                    focus.duration.as_millis()
                )
            }
            None => "transform: none; transition: transform 300ms ease-in-out".to_string(),
        }
    }

    fn ring(&self, ring: &[LatLng]) -> String {
        ring.iter()
            .map(|p| {
                let (x, y) = self.point(*p);
                format!("{x:.1},{y:.1}")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[component]
pub fn SiteMap() -> impl IntoView {
    let controller = use_controller();
    let catalog = controller.catalog();

    let viewport = create_memo(move |_| {
        controller
            .boundary
            .with(|boundary| Viewport::new(&catalog, boundary.as_ref()))
    });

    let outline = move || {
        let viewport = viewport.get();
        controller.boundary.with(|boundary| {
            boundary
                .iter()
                .flat_map(|b| b.rings.iter())
                .map(|ring| {
                    view! {
                        <polygon
                            points=viewport.ring(ring)
                            fill="#e8f5e9"
                            stroke="#2e7d32"
                            stroke-width="1.5"
                        />
                    }
                })
                .collect_view()
        })
    };

    view! {
        <div class="relative bg-white rounded-lg shadow overflow-hidden">
            <svg viewBox=format!("0 0 {WIDTH} {HEIGHT}") class="w-full h-[28rem] bg-green-50">
                <g style=move || viewport.get().transform(controller.focus.get())>
                    {outline}
                    <For
                        each=move || controller.map_markers.get()
                        key=|marker| marker.id.clone()
                        children=move |marker| view! { <Pin marker=marker viewport=viewport/> }
                    />
                </g>
            </svg>
            <SitePopup/>
            <Legend/>
        </div>
    }
}

#[component]
fn Pin(marker: MapMarker, viewport: Memo<Viewport>) -> impl IntoView {
    let controller = use_controller();
    let colour = controller
        .catalog()
        .get(&marker.id)
        .map(|site| site.kind.colour())
        .unwrap_or(DEFAULT_COLOUR);

    let id = marker.id.clone();
    let selected = move || {
        controller
            .selection
            .with(|s| s.as_ref().map(|m| &m.id) == Some(&id))
    };
    let position = marker.position();
    let id = marker.id.clone();

    view! {
        <circle
            cx=move || viewport.get().point(position).0
            cy=move || viewport.get().point(position).1
            r=move || if selected() { 11 } else { 7 }
            fill=colour
            stroke="#ffffff"
            stroke-width="2"
            class="cursor-pointer"
            on:click=move |_| controller.click_marker(&id)
        >
            <title>{marker.site_name.clone()}</title>
        </circle>
    }
}

#[component]
fn Legend() -> impl IntoView {
    use wm_core::SiteKind;

    let kinds = [
        SiteKind::Formal,
        SiteKind::Informal,
        SiteKind::Processing,
        SiteKind::Plastic,
    ];

    view! {
        <div class="absolute bottom-2 left-2 bg-white/90 rounded shadow px-3 py-2 text-xs space-y-1">
            {kinds
                .into_iter()
                .map(|kind| view! {
                    <div class="flex items-center space-x-2">
                        <span class="inline-block w-3 h-3 rounded-full" style=format!("background: {}", kind.colour())></span>
                        <span>{kind.label()}</span>
                    </div>
                })
                .collect_view()}
        </div>
    }
}
