// View identifiers for each UI context
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::table::{url_for_view, view_for_url};

/// A closed set of view identifiers that can be routed.
///
/// Every variant carries a string key which is also its entry in the route
/// table. The controller in [`super::controller`] is generic over this trait,
/// so the auth flow and each dashboard get their own enum.
pub trait RouteView: Copy + Eq + std::fmt::Debug + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    fn key(self) -> &'static str;

    fn from_key(key: &str) -> Option<Self>;

    /// Absolute path for this view, `/` when it has no segment.
    fn url(self) -> String {
        url_for_view(self.key())
    }

    /// Reverse lookup restricted to this view set.
    ///
    /// A path that belongs to a view of another set is treated as unmapped.
    fn for_url(path: &str) -> Option<Self> {
        view_for_url(path).and_then(Self::from_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view `{0}`")]
pub struct UnknownView(pub String);

macro_rules! route_views {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $key:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $key)] $variant,)+
        }

        impl RouteView for $name {
            const ALL: &'static [Self] = &[$($name::$variant,)+];

            fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.key())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownView;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_key(s).ok_or_else(|| UnknownView(s.to_string()))
            }
        }
    };
}

route_views! {
    /// Public and authentication flow views.
    pub enum AuthView {
        Landing => "landing",
        Login => "login",
        ForgotPassword => "forgot-password",
        ResetPassword => "reset-password",
        RegisterSelect => "register-select",
        RegisterSponsor => "register-sponsor",
        RegisterInstitution => "register-institution",
        RegisterStudent => "register-student",
        RegisterStudentHighSchool => "register-student-highschool",
        RegisterStudentUniversity => "register-student-university",
        VerifyEmail => "verify-email",
        VerifySms => "verify-sms",
        TwoFactorSetup => "2fa-setup",
        TwoFactorVerify => "2fa-verify",
        OAuthCallback => "oauth-callback",
        About => "about",
        Contact => "contact",
        Terms => "terms",
        Privacy => "privacy",
        Donate => "donate",
    }
}

route_views! {
    /// Sponsor dashboard views.
    pub enum SponsorView {
        BrowseStudents => "browse-students",
        MySponsorships => "my-sponsorships",
        Donations => "donations",
        Impact => "impact",
        Settings => "sponsor-settings",
        Profile => "sponsor-profile",
    }
}

route_views! {
    /// Student dashboard views.
    pub enum StudentView {
        Home => "student-dashboard",
        Profile => "student-profile",
        Documents => "student-documents",
        Sponsors => "student-sponsors",
        Settings => "student-settings",
        Help => "student-help",
    }
}

route_views! {
    /// Institution dashboard views.
    pub enum InstitutionView {
        Home => "institution-dashboard",
        Students => "institution-students",
        Reports => "institution-reports",
        Settings => "institution-settings",
    }
}

route_views! {
    /// Admin dashboard views.
    pub enum AdminView {
        Home => "admin-dashboard",
        Users => "admin-users",
        Institutions => "admin-institutions",
        Sponsors => "admin-sponsors",
        Students => "admin-students",
        Settings => "admin-settings",
    }
}
