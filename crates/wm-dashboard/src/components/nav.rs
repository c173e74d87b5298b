//! Navigation component

use leptos::*;
use leptos_router::A;

#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <nav class="bg-white shadow">
            <div class="container mx-auto px-4">
                <div class="flex justify-between h-16">
                    <div class="flex items-center">
                        <A href="/" class="text-xl font-bold text-green-800">
                            "Taka ni Mali"
                        </A>
                        <div class="hidden md:flex ml-10 space-x-4">
                            <A href="/" exact=true class="text-gray-600 hover:text-gray-900 px-3 py-2">"Home"</A>
                            <A href="/dashboard" class="text-gray-600 hover:text-gray-900 px-3 py-2">"Dashboard"</A>
                            <A href="/collector" class="text-gray-600 hover:text-gray-900 px-3 py-2">"Collector"</A>
                        </div>
                    </div>
                    <div class="flex items-center">
                        <span class="text-gray-600">"Kakamega County"</span>
                    </div>
                </div>
            </div>
        </nav>
    }
}
