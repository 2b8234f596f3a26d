// Reactive binding of the route state controller
use leptos::*;

use super::controller::RouteState;
use super::history::{DefaultHistory, History};
use super::view::RouteView;

/// Current view signal plus a setter that keeps the URL in sync.
///
/// Uses the browser history on wasm targets and no history elsewhere, so a
/// server render simply shows `default`.
pub fn use_route_state<V: RouteView>(default: V) -> (ReadSignal<V>, Callback<V>) {
    use_route_state_with(default, DefaultHistory::default())
}

/// [`use_route_state`] over an explicit history.
///
/// The controller is mounted when the calling component is created and
/// unsubscribed when its owner is cleaned up.
pub fn use_route_state_with<V, H>(default: V, history: H) -> (ReadSignal<V>, Callback<V>)
where
    V: RouteView,
    H: History + Clone + 'static,
{
    let (current, set_current) = create_signal(default);
    let (controller, subscription) =
        RouteState::mount_with(default, history, move |view| set_current.set(view));
    set_current.set(controller.borrow().current());
    on_cleanup(move || drop(subscription));

    let set_view = Callback::new(move |view: V| {
        controller.borrow_mut().set_view(view);
        set_current.set(view);
    });

    (current, set_view)
}
