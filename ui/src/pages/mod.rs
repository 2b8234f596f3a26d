// Page components
pub mod auth;
pub mod dashboard;

pub use auth::AuthRouter;
pub use dashboard::{AdminDashboard, InstitutionDashboard, SponsorDashboard, StudentDashboard};
