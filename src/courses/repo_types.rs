use serde::Serialize;
use sqlx::FromRow;
use time::Date;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Course {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<i32>,
    pub publisher: String,
    pub last_update: Date,
    pub upload_date: Date,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<i32>,
    pub publisher: String,
    pub last_update: Date,
    pub upload_date: Date,
}

/// Partial course update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i32>,
    pub publisher: Option<String>,
    pub last_update: Option<Date>,
    pub upload_date: Option<Date>,
}
