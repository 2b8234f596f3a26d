use leptos::*;

use crate::routing::RouteView;

/// Sidebar shell shared by every dashboard.
///
/// Nav entries are real links to the routed URL, so middle-click and copy
/// link work; a plain click goes through the route setter instead.
#[component]
pub fn DashboardLayout<V: RouteView>(
    title: &'static str,
    nav: &'static [(V, &'static str)],
    current: ReadSignal<V>,
    on_navigate: Callback<V>,
    on_logout: Callback<()>,
    children: Children,
) -> impl IntoView {
    let items = nav
        .iter()
        .map(|&(view, label)| {
            let class = move || {
                if current.get() == view {
                    "block px-4 py-2 rounded-md bg-blue-600 text-white"
                } else {
                    "block px-4 py-2 rounded-md text-slate-700 hover:bg-slate-100"
                }
            };
            view! {
                <a
                    href=view.url()
                    class=class
                    on:click=move |ev: ev::MouseEvent| {
                        ev.prevent_default();
                        on_navigate.call(view);
                    }
                >
                    {label}
                </a>
            }
        })
        .collect_view();

    view! {
        <div class="min-h-screen bg-slate-50">
            <aside class="fixed inset-y-0 w-64 bg-white border-r border-slate-200">
                <div class="px-4 py-6 text-xl font-bold text-slate-900">{title}</div>
                <nav class="px-2 space-y-1">{items}</nav>
                <button
                    type="button"
                    class="absolute bottom-6 left-4 text-sm text-slate-600 hover:text-slate-900"
                    on:click=move |_| on_logout.call(())
                >
                    "Sign out"
                </button>
            </aside>

            <div class="lg:pl-64">
                <main class="py-10">
                    <div class="px-4 sm:px-6 lg:px-8">
                        {children()}
                    </div>
                </main>
            </div>
        </div>
    }
}

#[component]
pub fn PageHeader(
    #[prop(into)] title: String,
    #[prop(optional, into)] description: Option<String>,
) -> impl IntoView {
    view! {
        <div class="border-b border-slate-200 pb-5">
            <h1 class="text-3xl font-bold leading-tight tracking-tight text-slate-900">
                {title}
            </h1>
            {description.map(|desc| view! {
                <p class="mt-2 text-sm text-slate-700">{desc}</p>
            })}
        </div>
    }
}

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="flex justify-center items-center py-8">
            <span class="text-slate-600">"Loading..."</span>
        </div>
    }
}
