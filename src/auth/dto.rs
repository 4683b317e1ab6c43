use serde::{Deserialize, Serialize};
use time::Date;

use crate::auth::repo_types::User;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub city: String,
    pub dob: Date,
    pub phone: String,
    pub gender: String,
}

/// Request body for the password reset.
#[derive(Debug, Deserialize)]
pub struct ForgetPasswordRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after login or signup.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub msg: String,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub msg: String,
}

impl MessageResponse {
    pub fn ok(msg: impl Into<String>) -> Self {
        Self {
            success: true,
            msg: msg.into(),
        }
    }
}

/// User as returned to clients. Has no password field at all.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub city: String,
    pub dob: Date,
    pub phone: String,
    pub gender: String,
    pub admin: bool,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            city: u.city,
            dob: u.dob,
            phone: u.phone,
            gender: u.gender,
            admin: u.admin,
        }
    }
}
