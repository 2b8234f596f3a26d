// Shared type definitions for backend payloads
use serde::{Deserialize, Serialize};

pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;

// User types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Sponsor,
    Student,
    Institution,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub is_verified: bool,
    #[serde(default)]
    pub two_factor_enabled: bool,
    pub created_at: DateTime<Utc>,
}

// Auth payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TwoFactorMethod {
    Email,
    Sms,
}

/// Body of a successful `/auth/login`.
///
/// The session cookie is set either way; when a second factor is required
/// the user is not signed in until it is verified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub requires_two_factor: bool,
    #[serde(default)]
    pub two_factor_method: Option<TwoFactorMethod>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// Student types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub institution_id: Uuid,
    pub full_name: String,
    pub grade_level: Option<String>,
    pub location: Option<String>,
    pub photo_url: Option<String>,
    pub background_story: Option<String>,
    pub need_level: Option<u8>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

// Sponsorship types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SponsorshipStatus {
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SponsorshipDetail {
    pub id: Uuid,
    pub sponsor_id: Uuid,
    pub student_id: Uuid,
    pub commitment_type: String,
    pub amount: f64,
    pub status: SponsorshipStatus,
    pub start_date: String,
    pub end_date: Option<String>,
    pub student_name: Option<String>,
    pub institution_name: Option<String>,
    #[serde(default)]
    pub total_paid: f64,
    #[serde(default)]
    pub balance_due: f64,
}

// Donation types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub sponsor_id: Uuid,
    pub student_id: Option<Uuid>,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Pagination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub pages: u32,
}
