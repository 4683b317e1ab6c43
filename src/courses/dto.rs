use serde::{Deserialize, Serialize};
use time::Date;

use crate::courses::repo_types::Course;

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<i32>,
    pub publisher: String,
    pub last_update: Option<Date>,
    pub upload_date: Date,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i32>,
    pub publisher: Option<String>,
    pub last_update: Option<Date>,
    pub upload_date: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub success: bool,
    pub msg: String,
    pub course: Course,
}

#[derive(Debug, Serialize)]
pub struct CoursesResponse {
    pub success: bool,
    pub courses: Vec<Course>,
}
