use std::collections::HashMap;

use destinypal_ui::routing::{
    url_for_view, view_for_url, AdminView, AuthView, History, HistoryState, InstitutionView,
    MemoryHistory, NoHistory, RouteState, RouteTable, RouteView, SponsorView, StudentView,
};

fn assert_set_is_routed<V: RouteView>() {
    let table = RouteTable::global();
    for view in V::ALL {
        assert!(table.contains_view(view.key()), "{:?} has no route", view);
    }
}

#[test]
fn test_every_view_has_a_route() {
    assert_set_is_routed::<AuthView>();
    assert_set_is_routed::<SponsorView>();
    assert_set_is_routed::<StudentView>();
    assert_set_is_routed::<InstitutionView>();
    assert_set_is_routed::<AdminView>();
}

#[test]
fn test_round_trip_for_unique_segments() {
    let table = RouteTable::global();
    let mut owners: HashMap<&str, usize> = HashMap::new();
    for &(_, segment) in table.entries() {
        *owners.entry(segment).or_default() += 1;
    }

    for &(view, segment) in table.entries() {
        if owners[segment] == 1 {
            assert_eq!(view_for_url(&url_for_view(view)), Some(view));
        }
    }
}

#[test]
fn test_idempotent_setter() {
    let history = MemoryHistory::new("/dashboard/sponsor/impact");
    let (state, _sub) = RouteState::mount(SponsorView::BrowseStudents, history.clone());
    assert_eq!(state.borrow().current(), SponsorView::Impact);

    state.borrow_mut().set_view(SponsorView::Impact);
    state.borrow_mut().set_view(SponsorView::Impact);
    assert_eq!(history.len(), 1);
}

#[test]
fn test_default_on_root() {
    let history = MemoryHistory::new("/");
    let (state, _sub) = RouteState::mount(StudentView::Documents, history);
    assert_eq!(state.borrow().current(), StudentView::Documents);
}

#[test]
fn test_unknown_path_falls_back_to_default() {
    let history = MemoryHistory::new("/not-a-real-route");
    let (state, _sub) = RouteState::mount(SponsorView::MySponsorships, history.clone());

    assert_eq!(state.borrow().current(), SponsorView::MySponsorships);
    // no forced redirect
    assert_eq!(history.pathname().as_deref(), Some("/not-a-real-route"));
    assert_eq!(history.len(), 1);
}

#[test]
fn test_back_and_forward() {
    let history = MemoryHistory::new("/login");
    let (state, _sub) = RouteState::mount(AuthView::Landing, history.clone());
    assert_eq!(state.borrow().current(), AuthView::Login);

    state.borrow_mut().set_view(AuthView::RegisterSelect);
    assert_eq!(history.pathname().as_deref(), Some("/register"));
    assert_eq!(history.len(), 2);

    assert!(history.back());
    assert_eq!(state.borrow().current(), AuthView::Login);
    assert_eq!(history.len(), 2);
    assert_eq!(history.index(), 0);

    assert!(history.forward());
    assert_eq!(state.borrow().current(), AuthView::RegisterSelect);
    assert_eq!(history.len(), 2);
}

#[test]
fn test_sponsor_dashboard_scenario() {
    let history = MemoryHistory::new("/");
    let (state, _sub) = RouteState::mount(SponsorView::BrowseStudents, history.clone());
    assert_eq!(state.borrow().current(), SponsorView::BrowseStudents);

    state.borrow_mut().set_view(SponsorView::Donations);
    assert_eq!(state.borrow().current(), SponsorView::Donations);
    assert_eq!(history.pathname().as_deref(), Some("/dashboard/sponsor/donations"));
    assert_eq!(history.len(), 2);
    assert_eq!(history.current().state, Some(HistoryState::new("donations")));

    state.borrow_mut().set_view(SponsorView::Donations);
    assert_eq!(state.borrow().current(), SponsorView::Donations);
    assert_eq!(history.len(), 2);
}

#[test]
fn test_independent_controllers_share_history() {
    let history = MemoryHistory::new("/");
    let (auth, _auth_sub) = RouteState::mount(AuthView::Landing, history.clone());
    let (sponsor, _sponsor_sub) = RouteState::mount(SponsorView::BrowseStudents, history.clone());

    sponsor.borrow_mut().set_view(SponsorView::Impact);
    auth.borrow_mut().set_view(AuthView::About);
    assert_eq!(history.len(), 3);

    history.back();
    // the sponsor URL means nothing to the auth flow
    assert_eq!(auth.borrow().current(), AuthView::About);
    assert_eq!(sponsor.borrow().current(), SponsorView::Impact);

    history.back();
    assert_eq!(auth.borrow().current(), AuthView::Landing);
    assert_eq!(sponsor.borrow().current(), SponsorView::BrowseStudents);
}

#[test]
fn test_without_browser_apis() {
    let (state, _sub) = RouteState::mount(AuthView::Login, NoHistory);
    state.borrow_mut().set_view(AuthView::Terms);
    assert_eq!(state.borrow().current(), AuthView::Terms);
}

#[test]
fn test_landing_wins_over_auth_default_at_root() {
    let history = MemoryHistory::new("/");
    let (state, _sub) = RouteState::mount(AuthView::Login, history.clone());
    assert_eq!(state.borrow().current(), AuthView::Landing);
    assert_eq!(history.len(), 1);

    let history = MemoryHistory::new("/no-such-page");
    let (state, _sub) = RouteState::mount(AuthView::Login, history);
    assert_eq!(state.borrow().current(), AuthView::Login);
}
