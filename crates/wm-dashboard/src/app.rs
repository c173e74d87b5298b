//! Main application component

use crate::api::ApiClient;
use crate::components::*;
use crate::controller::DashboardController;
use crate::pages::*;
use leptos::*;
use leptos_router::*;
use wm_core::{DashboardConfig, SiteCatalog};

#[component]
pub fn App() -> impl IntoView {
    let catalog = match SiteCatalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Site catalog unavailable: {}", e);
            return view! {
                <div class="p-8 text-red-700">"Site catalog unavailable: " {e.to_string()}</div>
            }
            .into_view();
        }
    };

    let config = DashboardConfig {
        boundary_url: option_env!("WM_BOUNDARY_URL").map(str::to_string),
        ..Default::default()
    };
    let client = ApiClient::from_build_env();

    provide_context(client.clone());
    provide_context(catalog.clone());
    provide_context(DashboardController::new(catalog, config, client));

    view! {
        <Router>
            <div class="min-h-screen bg-green-50">
                <Nav/>
                <main class="container mx-auto px-4 py-8">
                    <Routes>
                        <Route path="/" view=Home/>
                        <Route path="/dashboard" view=Dashboard/>
                        <Route path="/collector" view=Collector/>
                    </Routes>
                </main>
            </div>
        </Router>
    }
    .into_view()
}
