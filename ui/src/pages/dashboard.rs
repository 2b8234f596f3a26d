use leptos::*;

use crate::api::{use_api_client, DataApi};
use crate::components::layout::{DashboardLayout, LoadingSpinner, PageHeader};
use crate::routing::{use_route_state, AdminView, InstitutionView, RouteView, SponsorView, StudentView};
use crate::types::SponsorshipStatus;

const SPONSOR_NAV: &[(SponsorView, &str)] = &[
    (SponsorView::BrowseStudents, "Students in need"),
    (SponsorView::MySponsorships, "My sponsorships"),
    (SponsorView::Donations, "Donations"),
    (SponsorView::Impact, "Impact"),
    (SponsorView::Profile, "Profile"),
    (SponsorView::Settings, "Settings"),
];

const STUDENT_NAV: &[(StudentView, &str)] = &[
    (StudentView::Home, "Overview"),
    (StudentView::Profile, "Profile"),
    (StudentView::Documents, "Documents"),
    (StudentView::Sponsors, "My sponsors"),
    (StudentView::Settings, "Settings"),
    (StudentView::Help, "Help"),
];

const INSTITUTION_NAV: &[(InstitutionView, &str)] = &[
    (InstitutionView::Home, "Overview"),
    (InstitutionView::Students, "Students"),
    (InstitutionView::Reports, "Reports"),
    (InstitutionView::Settings, "Settings"),
];

const ADMIN_NAV: &[(AdminView, &str)] = &[
    (AdminView::Home, "Overview"),
    (AdminView::Users, "Users"),
    (AdminView::Institutions, "Institutions"),
    (AdminView::Sponsors, "Sponsors"),
    (AdminView::Students, "Students"),
    (AdminView::Settings, "Settings"),
];

/// Label of `view` in `nav`, falling back to its key.
fn nav_label<V: RouteView>(nav: &[(V, &'static str)], view: V) -> &'static str {
    nav.iter()
        .find(|(candidate, _)| *candidate == view)
        .map_or(view.key(), |(_, label)| *label)
}

pub fn format_amount(amount: f64, currency: &str) -> String {
    format!("{} {:.2}", currency, amount)
}

pub fn status_label(status: SponsorshipStatus) -> &'static str {
    match status {
        SponsorshipStatus::Active => "Active",
        SponsorshipStatus::Paused => "Paused",
        SponsorshipStatus::Completed => "Completed",
    }
}

#[component]
fn LoadError(message: String) -> impl IntoView {
    view! {
        <div class="rounded-md bg-red-50 p-4 mt-6">
            <p class="text-sm font-medium text-red-800">{message}</p>
        </div>
    }
}

#[component]
fn StudentsInNeed() -> impl IntoView {
    let client = use_api_client();
    let students = create_local_resource(
        || 1u32,
        move |page| {
            let client = client.clone();
            async move { client.list_students(page).await }
        },
    );

    view! {
        <Suspense fallback=move || view! { <LoadingSpinner/> }>
            {move || students.get().map(|result| match result {
                Ok(page) if page.items.is_empty() => view! {
                    <p class="mt-6 text-sm text-slate-600">"No students are waiting for a sponsor right now."</p>
                }
                .into_view(),
                Ok(page) => view! {
                    <ul class="mt-6 grid grid-cols-1 gap-4 sm:grid-cols-2">
                        {page.items.into_iter().map(|student| view! {
                            <li class="rounded-lg bg-white p-4 shadow">
                                <p class="font-semibold text-slate-900">{student.full_name}</p>
                                <p class="text-sm text-slate-600">
                                    {student.grade_level.unwrap_or_default()}
                                    " "
                                    {student.location.unwrap_or_default()}
                                </p>
                            </li>
                        }).collect_view()}
                    </ul>
                }
                .into_view(),
                Err(err) => view! { <LoadError message=err.to_string()/> }.into_view(),
            })}
        </Suspense>
    }
}

#[component]
fn MySponsorships() -> impl IntoView {
    let client = use_api_client();
    let sponsorships = create_local_resource(
        || (),
        move |_| {
            let client = client.clone();
            async move { client.my_sponsorships().await }
        },
    );

    view! {
        <Suspense fallback=move || view! { <LoadingSpinner/> }>
            {move || sponsorships.get().map(|result| match result {
                Ok(items) => view! {
                    <ul class="mt-6 divide-y divide-slate-200 bg-white shadow rounded-lg">
                        {items.into_iter().map(|item| view! {
                            <li class="flex justify-between px-4 py-3 text-sm">
                                <span class="text-slate-900">{item.student_name.unwrap_or_default()}</span>
                                <span class="text-slate-600">{status_label(item.status)}</span>
                                <span class="text-slate-900">{format_amount(item.amount, "KES")}</span>
                            </li>
                        }).collect_view()}
                    </ul>
                }
                .into_view(),
                Err(err) => view! { <LoadError message=err.to_string()/> }.into_view(),
            })}
        </Suspense>
    }
}

#[component]
fn DonationHistory() -> impl IntoView {
    let client = use_api_client();
    let donations = create_local_resource(
        || (),
        move |_| {
            let client = client.clone();
            async move { client.my_donations().await }
        },
    );

    view! {
        <Suspense fallback=move || view! { <LoadingSpinner/> }>
            {move || donations.get().map(|result| match result {
                Ok(page) => view! {
                    <ul class="mt-6 divide-y divide-slate-200 bg-white shadow rounded-lg">
                        {page.items.into_iter().map(|donation| view! {
                            <li class="flex justify-between px-4 py-3 text-sm">
                                <span class="text-slate-600">{donation.created_at.format("%Y-%m-%d").to_string()}</span>
                                <span class="text-slate-600">{donation.status}</span>
                                <span class="text-slate-900">{format_amount(donation.amount, &donation.currency)}</span>
                            </li>
                        }).collect_view()}
                    </ul>
                }
                .into_view(),
                Err(err) => view! { <LoadError message=err.to_string()/> }.into_view(),
            })}
        </Suspense>
    }
}

#[component]
pub fn SponsorDashboard(
    default_view: SponsorView,
    on_logout: Callback<()>,
) -> impl IntoView {
    let (current, set_view) = use_route_state(default_view);

    view! {
        <DashboardLayout title="DestinyPal" nav=SPONSOR_NAV current=current on_navigate=set_view on_logout=on_logout>
            {move || {
                let view = current.get();
                let panel = match view {
                    SponsorView::BrowseStudents => view! { <StudentsInNeed/> }.into_view(),
                    SponsorView::MySponsorships => view! { <MySponsorships/> }.into_view(),
                    SponsorView::Donations => view! { <DonationHistory/> }.into_view(),
                    _ => ().into_view(),
                };
                view! {
                    <PageHeader title=nav_label(SPONSOR_NAV, view)/>
                    {panel}
                }
            }}
        </DashboardLayout>
    }
}

#[component]
pub fn StudentDashboard(on_logout: Callback<()>) -> impl IntoView {
    let (current, set_view) = use_route_state(StudentView::Home);

    view! {
        <DashboardLayout title="Student" nav=STUDENT_NAV current=current on_navigate=set_view on_logout=on_logout>
            {move || {
                let view = current.get();
                view! { <PageHeader title=nav_label(STUDENT_NAV, view)/> }
            }}
        </DashboardLayout>
    }
}

#[component]
pub fn InstitutionDashboard(on_logout: Callback<()>) -> impl IntoView {
    let (current, set_view) = use_route_state(InstitutionView::Home);

    view! {
        <DashboardLayout title="Institution" nav=INSTITUTION_NAV current=current on_navigate=set_view on_logout=on_logout>
            {move || {
                let view = current.get();
                view! { <PageHeader title=nav_label(INSTITUTION_NAV, view)/> }
            }}
        </DashboardLayout>
    }
}

#[component]
pub fn AdminDashboard(on_logout: Callback<()>) -> impl IntoView {
    let (current, set_view) = use_route_state(AdminView::Home);

    view! {
        <DashboardLayout title="Admin" nav=ADMIN_NAV current=current on_navigate=set_view on_logout=on_logout>
            {move || {
                let view = current.get();
                view! { <PageHeader title=nav_label(ADMIN_NAV, view)/> }
            }}
        </DashboardLayout>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covers_all<V: RouteView>(nav: &[(V, &str)]) -> bool {
        V::ALL.iter().all(|view| nav.iter().any(|(item, _)| item == view))
    }

    #[test]
    fn test_nav_covers_every_dashboard_view() {
        assert!(covers_all(SPONSOR_NAV));
        assert!(covers_all(STUDENT_NAV));
        assert!(covers_all(INSTITUTION_NAV));
        assert!(covers_all(ADMIN_NAV));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1500.0, "KES"), "KES 1500.00");
        assert_eq!(format_amount(12.5, "USD"), "USD 12.50");
        assert_eq!(status_label(SponsorshipStatus::Paused), "Paused");
    }

    #[test]
    fn test_nav_label() {
        assert_eq!(nav_label(SPONSOR_NAV, SponsorView::Impact), "Impact");
        assert_eq!(nav_label(&SPONSOR_NAV[..1], SponsorView::Impact), "impact");
    }
}
