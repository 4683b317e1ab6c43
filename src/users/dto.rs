use serde::{Deserialize, Serialize};
use time::Date;

use crate::auth::dto::PublicUser;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub city: Option<String>,
    pub dob: Option<Date>,
    pub phone: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetAdminRequest {
    pub admin: bool,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub msg: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<PublicUser>,
}
