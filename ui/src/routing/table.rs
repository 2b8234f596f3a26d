// Route table: view keys <-> URL path segments
use std::collections::HashMap;
use std::sync::OnceLock;

use thiserror::Error;

/// Forward route entries, view key to path segment (no leading slash).
///
/// The reverse direction is always derived from this list.
pub const ROUTES: &[(&str, &str)] = &[
    // Public routes
    ("landing", ""),
    ("login", "login"),
    ("forgot-password", "forgot-password"),
    ("reset-password", "reset-password"),
    ("register-select", "register"),
    ("register-sponsor", "register/sponsor"),
    ("register-institution", "register/institution"),
    ("register-student", "register/student"),
    ("register-student-highschool", "register/student/highschool"),
    ("register-student-university", "register/student/university"),
    ("verify-email", "verify-email"),
    ("verify-sms", "verify-sms"),
    ("2fa-setup", "2fa-setup"),
    ("2fa-verify", "2fa-verify"),
    ("oauth-callback", "auth/callback"),
    ("about", "about"),
    ("contact", "contact"),
    ("terms", "terms"),
    ("privacy", "privacy"),
    ("donate", "donate"),
    // Sponsor dashboard
    ("browse-students", "dashboard/sponsor/students"),
    ("my-sponsorships", "dashboard/sponsor/sponsorships"),
    ("donations", "dashboard/sponsor/donations"),
    ("impact", "dashboard/sponsor/impact"),
    ("sponsor-settings", "dashboard/sponsor/settings"),
    ("sponsor-profile", "dashboard/sponsor/profile"),
    // Student dashboard
    ("student-dashboard", "dashboard/student"),
    ("student-profile", "dashboard/student/profile"),
    ("student-documents", "dashboard/student/documents"),
    ("student-sponsors", "dashboard/student/sponsors"),
    ("student-settings", "dashboard/student/settings"),
    ("student-help", "dashboard/student/help"),
    // Institution dashboard
    ("institution-dashboard", "dashboard/institution"),
    ("institution-students", "dashboard/institution/students"),
    ("institution-reports", "dashboard/institution/reports"),
    ("institution-settings", "dashboard/institution/settings"),
    // Admin dashboard
    ("admin-dashboard", "dashboard/admin"),
    ("admin-users", "dashboard/admin/users"),
    ("admin-institutions", "dashboard/admin/institutions"),
    ("admin-sponsors", "dashboard/admin/sponsors"),
    ("admin-students", "dashboard/admin/students"),
    ("admin-settings", "dashboard/admin/settings"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error("view `{0}` is listed more than once")]
    DuplicateView(&'static str),
    #[error("path `/{segment}` is claimed by both `{first}` and `{second}`")]
    DuplicatePath {
        segment: &'static str,
        first: &'static str,
        second: &'static str,
    },
}

/// Bidirectional mapping between view keys and path segments.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<(&'static str, &'static str)>,
    forward: HashMap<&'static str, &'static str>,
    reverse: HashMap<&'static str, &'static str>,
}

impl RouteTable {
    /// Builds a table, rejecting duplicate view keys and duplicate segments.
    pub fn from_entries(
        entries: &[(&'static str, &'static str)],
    ) -> Result<Self, RouteTableError> {
        let mut forward = HashMap::with_capacity(entries.len());
        let mut reverse = HashMap::with_capacity(entries.len());

        for &(view, segment) in entries {
            if forward.insert(view, segment).is_some() {
                return Err(RouteTableError::DuplicateView(view));
            }
            if let Some(first) = reverse.insert(segment, view) {
                return Err(RouteTableError::DuplicatePath {
                    segment,
                    first,
                    second: view,
                });
            }
        }

        Ok(Self {
            entries: entries.to_vec(),
            forward,
            reverse,
        })
    }

    /// Builds a table where later entries win on collision.
    pub fn from_entries_lossy(entries: &[(&'static str, &'static str)]) -> Self {
        let forward: HashMap<_, _> = entries.iter().copied().collect();
        let reverse = entries
            .iter()
            .fold(HashMap::new(), |mut acc, &(view, segment)| {
                if let Some(previous) = acc.insert(segment, view) {
                    tracing::warn!(
                        segment,
                        previous,
                        winner = view,
                        "route segment mapped twice, last entry wins"
                    );
                }
                acc
            });

        Self {
            entries: entries.to_vec(),
            forward,
            reverse,
        }
    }

    /// The application route table, built on first use.
    pub fn global() -> &'static RouteTable {
        static TABLE: OnceLock<RouteTable> = OnceLock::new();
        TABLE.get_or_init(|| match RouteTable::from_entries(ROUTES) {
            Ok(table) => table,
            Err(err) => {
                if cfg!(debug_assertions) {
                    panic!("invalid route table: {err}");
                }
                tracing::error!(error = %err, "invalid route table, falling back to last-wins");
                RouteTable::from_entries_lossy(ROUTES)
            }
        })
    }

    pub fn url_for_view(&self, view: &str) -> String {
        match self.forward.get(view) {
            Some(segment) if !segment.is_empty() => format!("/{segment}"),
            _ => "/".to_string(),
        }
    }

    pub fn view_for_url(&self, path: &str) -> Option<&'static str> {
        self.reverse.get(normalize_path(path)).copied()
    }

    pub fn contains_view(&self, view: &str) -> bool {
        self.forward.contains_key(view)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[(&'static str, &'static str)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strips one leading and one trailing slash.
pub fn normalize_path(path: &str) -> &str {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.strip_suffix('/').unwrap_or(path)
}

/// Absolute URL for a view key. Unknown keys map to `/`.
pub fn url_for_view(view: &str) -> String {
    RouteTable::global().url_for_view(view)
}

/// View key for a URL path, if the path is routed.
pub fn view_for_url(path: &str) -> Option<&'static str> {
    RouteTable::global().view_for_url(path)
}
