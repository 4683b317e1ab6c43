use sqlx::FromRow;
use time::Date;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[sqlx(rename = "password")]
    pub password_hash: String, // Argon2 PHC string
    pub city: String,
    pub dob: Date,
    pub phone: String,
    pub gender: String,
    pub admin: bool,
}

/// Fields required to insert a user. `admin` always starts false.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub city: String,
    pub dob: Date,
    pub phone: String,
    pub gender: String,
}

/// Partial profile update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub city: Option<String>,
    pub dob: Option<Date>,
    pub phone: Option<String>,
    pub gender: Option<String>,
}
