// Client-side view routing
pub mod controller;
pub mod dashboard;
pub mod history;
pub mod hook;
pub mod table;
pub mod view;

pub use controller::{RoutePhase, RouteState};
pub use dashboard::DashboardKind;
pub use history::{DefaultHistory, History, HistoryError, HistoryState, MemoryHistory, NoHistory, Subscription};
pub use hook::{use_route_state, use_route_state_with};
pub use table::{normalize_path, url_for_view, view_for_url, RouteTable, RouteTableError};
pub use view::{AdminView, AuthView, InstitutionView, RouteView, SponsorView, StudentView, UnknownView};

#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;
