// Dashboard selection by role
use crate::types::UserRole;

use super::table::url_for_view;
use super::view::{AdminView, InstitutionView, RouteView, SponsorView, StudentView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardKind {
    Sponsor,
    Student,
    Institution,
    Admin,
}

impl DashboardKind {
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::Sponsor => DashboardKind::Sponsor,
            UserRole::Student => DashboardKind::Student,
            UserRole::Institution => DashboardKind::Institution,
            UserRole::Admin => DashboardKind::Admin,
        }
    }

    /// Key of the view a freshly signed-in user lands on.
    pub fn home_view(self) -> &'static str {
        match self {
            DashboardKind::Sponsor => SponsorView::BrowseStudents.key(),
            DashboardKind::Student => StudentView::Home.key(),
            DashboardKind::Institution => InstitutionView::Home.key(),
            DashboardKind::Admin => AdminView::Home.key(),
        }
    }

    pub fn home_path(self) -> String {
        url_for_view(self.home_view())
    }

    /// Path to push after sign-in, or `None` when the browser is already
    /// where it should be.
    ///
    /// Sponsors keep any sponsor dashboard deep link; other roles land on
    /// their dashboard home.
    pub fn landing_after_auth(self, current_path: &str) -> Option<String> {
        let home = self.home_path();
        let stay = match self {
            DashboardKind::Sponsor => current_path.starts_with("/dashboard/sponsor"),
            _ => current_path == home,
        };
        (!stay).then_some(home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_path() {
        assert_eq!(DashboardKind::Sponsor.home_path(), "/dashboard/sponsor/students");
        assert_eq!(DashboardKind::Admin.home_path(), "/dashboard/admin");
        assert_eq!(DashboardKind::Institution.home_view(), "institution-dashboard");
    }

    #[test]
    fn test_landing_after_auth() {
        let sponsor = DashboardKind::for_role(UserRole::Sponsor);
        assert_eq!(sponsor.landing_after_auth("/dashboard/sponsor/donations"), None);
        assert_eq!(
            sponsor.landing_after_auth("/login"),
            Some("/dashboard/sponsor/students".to_string())
        );

        let student = DashboardKind::for_role(UserRole::Student);
        assert_eq!(student.landing_after_auth("/dashboard/student"), None);
        assert_eq!(
            student.landing_after_auth("/dashboard/student/profile"),
            Some("/dashboard/student".to_string())
        );
    }
}
