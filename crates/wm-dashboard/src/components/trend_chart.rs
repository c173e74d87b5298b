//! Daily volume bars

use leptos::*;
use rust_decimal::prelude::ToPrimitive;
use wm_core::Trend;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 180.0;
const LABEL_SPACE: f64 = 20.0;

#[component]
pub fn TrendChart(#[prop(into)] trend: Signal<Result<Trend, String>>) -> impl IntoView {
    move || match trend.get() {
        Err(e) => view! { <p class="text-sm text-red-700">"Trend unavailable: " {e}</p> }.into_view(),
        Ok(trend) if trend.is_empty() => {
            view! { <p class="text-sm text-gray-500">"No volume recorded for this selection."</p> }
                .into_view()
        }
        Ok(trend) => bars(&trend).into_view(),
    }
}

fn bars(trend: &Trend) -> impl IntoView {
    let max = trend
        .values()
        .filter_map(ToPrimitive::to_f64)
        .fold(0.0_f64, f64::max)
        .max(f64::EPSILON);
    let slot = WIDTH / trend.len() as f64;
    let plot = HEIGHT - LABEL_SPACE;

    let bars = trend
        .iter()
        .enumerate()
        .map(|(i, (day, volume))| {
            let value = volume.to_f64().unwrap_or(0.0);
            let height = value / max * plot;
            let x = i as f64 * slot + slot * 0.1;

            view! {
                <g>
                    <title>{format!("{day}: {volume} t")}</title>
                    <rect
                        x=x
                        y=plot - height
                        width=slot * 0.8
                        height=height
                        class="fill-green-600"
                    />
                    <text
                        x=x + slot * 0.4
                        y=HEIGHT - 4.0
                        text-anchor="middle"
                        class="fill-gray-500 text-xs"
                    >
                        {day.format("%m-%d").to_string()}
                    </text>
                </g>
            }
        })
        .collect_view();

    view! {
        <svg viewBox=format!("0 0 {WIDTH} {HEIGHT}") class="w-full h-48">
            {bars}
        </svg>
    }
}
