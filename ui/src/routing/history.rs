// Browser location/history capability
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State attached to every history entry written by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub view: String,
}

impl HistoryState {
    pub fn new(view: impl Into<String>) -> Self {
        Self { view: view.into() }
    }

    /// JSON object text, `{"view":"..."}`.
    pub fn to_json(&self) -> Result<String, HistoryError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("browser history is not available")]
    Unavailable,
    #[error("history update rejected: {0}")]
    Rejected(String),
    #[error("failed to encode history state: {0}")]
    State(#[from] serde_json::Error),
}

/// Unsubscribes a navigation listener when dropped.
#[must_use = "dropping a subscription removes the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn empty() -> Self {
        Self { cancel: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// The slice of the browser location and history API the router needs.
///
/// The history is shared, global and may change under the router at any
/// time, so implementations must always report the live path.
pub trait History {
    fn is_available(&self) -> bool;

    /// Current location path, `None` when no browser is present.
    fn pathname(&self) -> Option<String>;

    fn push(&self, path: &str, state: &HistoryState) -> Result<(), HistoryError>;

    fn replace(&self, path: &str, state: &HistoryState) -> Result<(), HistoryError>;

    /// Registers a listener for back/forward navigation.
    ///
    /// `push` and `replace` never notify listeners.
    fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription;
}

/// History for hosts without browser APIs, such as a server render pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl History for NoHistory {
    fn is_available(&self) -> bool {
        false
    }

    fn pathname(&self) -> Option<String> {
        None
    }

    fn push(&self, _path: &str, _state: &HistoryState) -> Result<(), HistoryError> {
        Err(HistoryError::Unavailable)
    }

    fn replace(&self, _path: &str, _state: &HistoryState) -> Result<(), HistoryError> {
        Err(HistoryError::Unavailable)
    }

    fn subscribe(&self, _listener: Rc<dyn Fn()>) -> Subscription {
        Subscription::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    pub path: String,
    pub state: Option<HistoryState>,
}

struct MemoryInner {
    entries: Vec<MemoryEntry>,
    index: usize,
    listeners: Vec<(u64, Rc<dyn Fn()>)>,
    next_listener: u64,
}

/// In-memory history stack with browser push/replace/back/forward semantics.
///
/// Clones share the same stack, so a test can keep a handle while the
/// controller owns another.
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryHistory {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryInner {
                entries: vec![MemoryEntry {
                    path: initial_path.into(),
                    state: None,
                }],
                index: 0,
                listeners: Vec::new(),
                next_listener: 0,
            })),
        }
    }

    /// Number of entries in the stack.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.inner.borrow().index
    }

    pub fn entries(&self) -> Vec<MemoryEntry> {
        self.inner.borrow().entries.clone()
    }

    pub fn current(&self) -> MemoryEntry {
        let inner = self.inner.borrow();
        inner.entries[inner.index].clone()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Moves through the stack like `history.go(delta)` and notifies
    /// listeners. Returns `false` without notifying when out of range.
    pub fn go(&self, delta: isize) -> bool {
        let listeners = {
            let mut inner = self.inner.borrow_mut();
            let target = inner.index as isize + delta;
            if delta == 0 || target < 0 || target as usize >= inner.entries.len() {
                return false;
            }
            inner.index = target as usize;
            inner
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect::<Vec<_>>()
        };

        for listener in listeners {
            listener();
        }
        true
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryHistory")
            .field("entries", &inner.entries)
            .field("index", &inner.index)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl History for MemoryHistory {
    fn is_available(&self) -> bool {
        true
    }

    fn pathname(&self) -> Option<String> {
        Some(self.current().path)
    }

    fn push(&self, path: &str, state: &HistoryState) -> Result<(), HistoryError> {
        let mut inner = self.inner.borrow_mut();
        let next = inner.index + 1;
        inner.entries.truncate(next);
        inner.entries.push(MemoryEntry {
            path: path.to_string(),
            state: Some(state.clone()),
        });
        inner.index = next;
        Ok(())
    }

    fn replace(&self, path: &str, state: &HistoryState) -> Result<(), HistoryError> {
        let mut inner = self.inner.borrow_mut();
        let index = inner.index;
        inner.entries[index] = MemoryEntry {
            path: path.to_string(),
            state: Some(state.clone()),
        };
        Ok(())
    }

    fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_listener;
            inner.next_listener += 1;
            inner.listeners.push((id, listener));
            id
        };

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(other, _)| *other != id);
            }
        })
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;

/// History used by the reactive hook on this target.
#[cfg(target_arch = "wasm32")]
pub type DefaultHistory = BrowserHistory;

#[cfg(not(target_arch = "wasm32"))]
pub type DefaultHistory = NoHistory;

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use super::{History, HistoryError, HistoryState, Subscription};

    /// `window.history` and `window.location`, looked up on every call.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct BrowserHistory;

    impl BrowserHistory {
        pub fn new() -> Self {
            Self
        }

        fn history() -> Result<web_sys::History, HistoryError> {
            web_sys::window()
                .ok_or(HistoryError::Unavailable)?
                .history()
                .map_err(rejected)
        }
    }

    fn rejected(value: JsValue) -> HistoryError {
        HistoryError::Rejected(format!("{value:?}"))
    }

    /// `state` as a plain object, so `history.state.view` reads back.
    fn encode(state: &HistoryState) -> Result<JsValue, HistoryError> {
        js_sys::JSON::parse(&state.to_json()?).map_err(rejected)
    }

    impl History for BrowserHistory {
        fn is_available(&self) -> bool {
            web_sys::window().is_some()
        }

        fn pathname(&self) -> Option<String> {
            web_sys::window()?.location().pathname().ok()
        }

        fn push(&self, path: &str, state: &HistoryState) -> Result<(), HistoryError> {
            Self::history()?
                .push_state_with_url(&encode(state)?, "", Some(path))
                .map_err(rejected)
        }

        fn replace(&self, path: &str, state: &HistoryState) -> Result<(), HistoryError> {
            Self::history()?
                .replace_state_with_url(&encode(state)?, "", Some(path))
                .map_err(rejected)
        }

        fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription {
            let Some(window) = web_sys::window() else {
                return Subscription::empty();
            };

            let closure = Closure::<dyn Fn()>::new(move || listener());
            if let Err(err) = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
            {
                tracing::warn!(error = ?err, "failed to subscribe to popstate");
                return Subscription::empty();
            }

            Subscription::new(move || {
                if let Err(err) = window
                    .remove_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
                {
                    tracing::warn!(error = ?err, "failed to unsubscribe from popstate");
                }
            })
        }
    }
}
