// DestinyPal UI - donation and sponsorship platform client
use leptos::*;
use leptos_meta::*;

pub mod api;
pub mod auth;
pub mod components;
pub mod config;
pub mod logging;
pub mod pages;
pub mod routing;
pub mod types;

use api::{provide_api_client, AuthService};
use auth::{browser_location, provide_auth_context, restore_session, sign_out, AuthContext};
use config::Config;
use pages::{AdminDashboard, AuthRouter, InstitutionDashboard, SponsorDashboard, StudentDashboard};
use routing::{DashboardKind, DefaultHistory, History, HistoryState};
use types::UserRole;

/// Pushes `path` unless the browser is already there.
fn push_path(path: &str, view: &str) {
    let history = DefaultHistory::default();
    if history.pathname().as_deref() == Some(path) {
        return;
    }
    if let Err(err) = history.push(path, &HistoryState::new(view)) {
        tracing::warn!(error = %err, path, "failed to push history entry");
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = use_context::<Config>().unwrap_or_default();
    let client = provide_api_client(&config);
    let auth = provide_auth_context();
    let dashboard = create_rw_signal(None::<DashboardKind>);

    {
        let client = client.clone();
        create_effect(move |_| {
            let client = client.clone();
            spawn_local(async move {
                if let Err(err) = restore_session(auth, &client).await {
                    tracing::warn!(error = %err, "failed to restore session");
                }
            });
        });
    }

    let on_authenticated = Callback::new(move |role: UserRole| {
        let kind = DashboardKind::for_role(role);
        let current_path = browser_location().map(|(path, _)| path).unwrap_or_default();
        if let Some(path) = kind.landing_after_auth(&current_path) {
            push_path(&path, kind.home_view());
        }
        dashboard.set(Some(kind));
    });

    let on_logout = Callback::new(move |_: ()| {
        let client = client.clone();
        spawn_local(async move {
            if let Err(err) = client.logout().await {
                tracing::warn!(error = %err, "logout request failed");
            }
        });
        sign_out(auth);
        dashboard.set(None);
        push_path("/", "landing");
    });

    let auth_default = config.auth_default_view;
    let sponsor_default = config.sponsor_default_view;

    view! {
        <Stylesheet id="leptos" href="/pkg/destinypal-ui.css"/>
        <Title text="DestinyPal - Sponsor a Student"/>
        <Meta name="viewport" content="width=device-width, initial-scale=1"/>

        {move || match dashboard.get() {
            Some(kind) if auth.with(AuthContext::is_authenticated) => match kind {
                DashboardKind::Sponsor => view! {
                    <SponsorDashboard default_view=sponsor_default on_logout=on_logout/>
                }
                .into_view(),
                DashboardKind::Student => view! { <StudentDashboard on_logout=on_logout/> }.into_view(),
                DashboardKind::Institution => view! { <InstitutionDashboard on_logout=on_logout/> }.into_view(),
                DashboardKind::Admin => view! { <AdminDashboard on_logout=on_logout/> }.into_view(),
            },
            _ => view! {
                <AuthRouter on_authenticated=on_authenticated initial_view=auth_default/>
            }
            .into_view(),
        }}
    }
}

// Mount the app for client-side rendering
#[cfg(any(feature = "hydrate", feature = "csr"))]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    let config = Config::default();
    logging::init_logging(&config);
    leptos::mount_to_body(move || {
        provide_context(config.clone());
        view! { <App/> }
    });
}
