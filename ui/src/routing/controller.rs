// Route state controller
//
// Keeps one in-memory current view in sync with the shared browser history.
// The history is never treated as owned state: every decision re-reads the
// live path, and every write is preceded by a comparison.
use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use super::history::{History, HistoryState, Subscription};
use super::table::normalize_path;
use super::view::RouteView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePhase {
    /// Mounted, URL not yet consulted.
    Uninitialized,
    /// URL consulted once, reconciliation still pending.
    Initialized,
    /// Responding to setter calls and navigation events.
    Steady,
}

#[derive(Debug)]
pub struct RouteState<V: RouteView, H: History> {
    current: V,
    default: V,
    phase: RoutePhase,
    history: H,
}

impl<V: RouteView, H: History> RouteState<V, H> {
    pub fn new(default: V, history: H) -> Self {
        Self {
            current: default,
            default,
            phase: RoutePhase::Uninitialized,
            history,
        }
    }

    pub fn current(&self) -> V {
        self.current
    }

    pub fn default_view(&self) -> V {
        self.default
    }

    pub fn phase(&self) -> RoutePhase {
        self.phase
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Adopts the view of the current URL.
    ///
    /// Unmapped non-root paths keep the default in place; there is no
    /// redirect. Runs once, later calls are ignored.
    pub fn initialize(&mut self) -> V {
        if self.phase != RoutePhase::Uninitialized {
            return self.current;
        }

        if let Some(view) = self.view_for_live_path() {
            self.current = view;
        }
        self.phase = RoutePhase::Initialized;
        debug!(view = self.current.key(), "route state initialized");
        self.current
    }

    /// One-time fix-up of the address bar after initialization.
    ///
    /// When the app is still at `/` but the current view is not the default,
    /// the current entry is replaced so the URL matches without adding a
    /// back-stack entry.
    pub fn reconcile(&mut self) {
        if self.phase != RoutePhase::Initialized {
            return;
        }
        self.phase = RoutePhase::Steady;

        let Some(pathname) = self.history.pathname() else {
            return;
        };
        if !normalize_path(&pathname).is_empty() || self.current == self.default {
            return;
        }

        let target = self.current.url();
        if target == "/" {
            return;
        }

        let state = HistoryState::new(self.current.key());
        match self.history.replace(&target, &state) {
            Ok(()) => debug!(view = self.current.key(), path = %target, "replaced root entry"),
            Err(err) => warn!(error = %err, path = %target, "failed to replace history entry"),
        }
    }

    /// Sets the current view and pushes a history entry when the URL changes.
    pub fn set_view(&mut self, view: V) {
        self.current = view;

        if !self.history.is_available() {
            return;
        }

        let target = view.url();
        if self.history.pathname().as_deref() == Some(target.as_str()) {
            return;
        }

        let state = HistoryState::new(view.key());
        match self.history.push(&target, &state) {
            Ok(()) => debug!(view = view.key(), path = %target, "pushed history entry"),
            Err(err) => warn!(error = %err, path = %target, "failed to push history entry"),
        }
    }

    /// Re-derives the current view after browser back/forward navigation.
    ///
    /// Never writes history; the browser has already moved.
    pub fn handle_navigation(&mut self) -> V {
        if let Some(view) = self.view_for_live_path() {
            self.current = view;
            debug!(view = view.key(), "navigation synchronized");
        }
        self.current
    }

    /// View for the history's live path: the mapped view, the default for
    /// the root path, otherwise `None`.
    fn view_for_live_path(&self) -> Option<V> {
        let pathname = self.history.pathname()?;
        V::for_url(&pathname)
            .or_else(|| normalize_path(&pathname).is_empty().then_some(self.default))
    }
}

impl<V: RouteView, H: History + Clone + 'static> RouteState<V, H> {
    /// Initializes, reconciles and subscribes to navigation events.
    ///
    /// The returned subscription keeps the controller listening; drop it on
    /// unmount. The listener holds a weak reference to the controller.
    pub fn mount(default: V, history: H) -> (Rc<RefCell<Self>>, Subscription) {
        Self::mount_with(default, history, |_| {})
    }

    /// Like [`mount`](Self::mount), reporting the view after every
    /// navigation event to `on_navigate`.
    pub fn mount_with(
        default: V,
        history: H,
        on_navigate: impl Fn(V) + 'static,
    ) -> (Rc<RefCell<Self>>, Subscription) {
        let state = Rc::new(RefCell::new(Self::new(default, history.clone())));
        {
            let mut state = state.borrow_mut();
            state.initialize();
            state.reconcile();
        }

        let weak = Rc::downgrade(&state);
        let subscription = history.subscribe(Rc::new(move || {
            if let Some(state) = weak.upgrade() {
                let view = state.borrow_mut().handle_navigation();
                on_navigate(view);
            }
        }));

        (state, subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::history::{MemoryHistory, NoHistory};
    use crate::routing::view::{AuthView, SponsorView};

    #[test]
    fn test_initialize_from_mapped_path() {
        let history = MemoryHistory::new("/dashboard/sponsor/impact");
        let mut state = RouteState::new(SponsorView::BrowseStudents, history);
        assert_eq!(state.phase(), RoutePhase::Uninitialized);

        assert_eq!(state.initialize(), SponsorView::Impact);
        assert_eq!(state.phase(), RoutePhase::Initialized);
    }

    #[test]
    fn test_initialize_tolerates_trailing_slash() {
        let history = MemoryHistory::new("/dashboard/sponsor/donations/");
        let mut state = RouteState::new(SponsorView::BrowseStudents, history);
        assert_eq!(state.initialize(), SponsorView::Donations);
    }

    #[test]
    fn test_initialize_only_once() {
        let history = MemoryHistory::new("/dashboard/sponsor/impact");
        let mut state = RouteState::new(SponsorView::BrowseStudents, history);
        state.initialize();
        state.set_view(SponsorView::Donations);
        assert_eq!(state.initialize(), SponsorView::Donations);
    }

    #[test]
    fn test_initialize_ignores_other_view_sets() {
        let history = MemoryHistory::new("/dashboard/student/documents");
        let mut state = RouteState::new(SponsorView::MySponsorships, history);
        assert_eq!(state.initialize(), SponsorView::MySponsorships);
    }

    #[test]
    fn test_root_prefers_mapped_landing_over_default() {
        let history = MemoryHistory::new("/");
        let mut state = RouteState::new(AuthView::Login, history);
        assert_eq!(state.initialize(), AuthView::Landing);
    }

    #[test]
    fn test_reconcile_replaces_root_entry() {
        let history = MemoryHistory::new("/");
        let mut state = RouteState::new(SponsorView::BrowseStudents, history.clone());
        state.initialize();
        // view overridden before the first paint, without a URL write
        state.current = SponsorView::Donations;

        state.reconcile();
        assert_eq!(history.len(), 1);
        assert_eq!(history.pathname().as_deref(), Some("/dashboard/sponsor/donations"));
        assert_eq!(history.current().state, Some(HistoryState::new("donations")));
        assert_eq!(state.phase(), RoutePhase::Steady);
    }

    #[test]
    fn test_reconcile_fires_once() {
        let history = MemoryHistory::new("/");
        let mut state = RouteState::new(SponsorView::BrowseStudents, history.clone());
        state.initialize();
        state.reconcile();

        state.current = SponsorView::Impact;
        state.reconcile();
        assert_eq!(history.pathname().as_deref(), Some("/"));
    }

    #[test]
    fn test_reconcile_needs_initialization() {
        let history = MemoryHistory::new("/");
        let mut state = RouteState::new(SponsorView::BrowseStudents, history.clone());
        state.current = SponsorView::Impact;
        state.reconcile();
        assert_eq!(state.phase(), RoutePhase::Uninitialized);
        assert_eq!(history.pathname().as_deref(), Some("/"));
    }

    #[test]
    fn test_reconcile_skips_root_views() {
        let history = MemoryHistory::new("/");
        let mut state = RouteState::new(AuthView::Login, history.clone());
        state.initialize();
        state.reconcile();

        assert_eq!(state.current(), AuthView::Landing);
        assert_eq!(history.current().state, None);
    }

    #[test]
    fn test_set_view_reads_live_path() {
        let history = MemoryHistory::new("/");
        let mut state = RouteState::new(SponsorView::BrowseStudents, history.clone());
        state.initialize();
        state.set_view(SponsorView::Impact);

        // another writer moved the URL behind the controller's back
        history
            .replace("/dashboard/sponsor/donations", &HistoryState::new("donations"))
            .unwrap();
        state.set_view(SponsorView::Donations);

        assert_eq!(history.len(), 2);
        assert_eq!(state.current(), SponsorView::Donations);
    }

    #[test]
    fn test_navigation_to_unmapped_path_keeps_current() {
        let history = MemoryHistory::new("/not-a-real-route");
        let mut state = RouteState::new(SponsorView::BrowseStudents, history.clone());
        state.initialize();
        state.set_view(SponsorView::Impact);

        history.back();
        assert_eq!(state.handle_navigation(), SponsorView::Impact);
    }

    #[test]
    fn test_navigation_to_root_adopts_default() {
        let history = MemoryHistory::new("/");
        let mut state = RouteState::new(SponsorView::BrowseStudents, history.clone());
        state.initialize();
        state.set_view(SponsorView::Impact);

        history.back();
        assert_eq!(state.handle_navigation(), SponsorView::BrowseStudents);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_without_browser_keeps_memory_state() {
        let mut state = RouteState::new(AuthView::Landing, NoHistory);
        assert_eq!(state.initialize(), AuthView::Landing);
        state.reconcile();
        state.set_view(AuthView::Contact);
        assert_eq!(state.current(), AuthView::Contact);
        assert_eq!(state.handle_navigation(), AuthView::Contact);
    }

    #[test]
    fn test_mount_listens_until_dropped() {
        let history = MemoryHistory::new("/login");
        let (state, subscription) = RouteState::mount(AuthView::Landing, history.clone());
        assert_eq!(state.borrow().current(), AuthView::Login);
        assert_eq!(state.borrow().phase(), RoutePhase::Steady);

        state.borrow_mut().set_view(AuthView::ForgotPassword);
        history.back();
        assert_eq!(state.borrow().current(), AuthView::Login);

        drop(subscription);
        assert_eq!(history.listener_count(), 0);
        history.forward();
        assert_eq!(state.borrow().current(), AuthView::Login);
    }

    #[test]
    fn test_mount_with_reports_navigation() {
        let history = MemoryHistory::new("/dashboard/sponsor/impact");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (state, _subscription) = {
            let seen = Rc::clone(&seen);
            RouteState::mount_with(SponsorView::BrowseStudents, history.clone(), move |view| {
                seen.borrow_mut().push(view)
            })
        };

        state.borrow_mut().set_view(SponsorView::Donations);
        assert!(seen.borrow().is_empty());

        history.back();
        history.forward();
        assert_eq!(*seen.borrow(), vec![SponsorView::Impact, SponsorView::Donations]);
    }
}
