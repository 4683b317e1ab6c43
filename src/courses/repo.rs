use async_trait::async_trait;

use crate::courses::repo_types::{Course, CourseChanges, NewCourse};
use crate::db::{PgStore, StoreError};

const COURSE_COLUMNS: &str =
    "id, user_id, title, description, rating, publisher, last_update, upload_date";

/// Course store. Writes that name a missing owner fail with
/// `StoreError::MissingReference("user")`.
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Course>, StoreError>;
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Course>, StoreError>;
    async fn find(&self, id: i64) -> Result<Option<Course>, StoreError>;
    async fn create(&self, course: NewCourse) -> Result<Course, StoreError>;
    async fn update(&self, id: i64, changes: CourseChanges) -> Result<Option<Course>, StoreError>;
    async fn delete(&self, id: i64) -> Result<Option<Course>, StoreError>;
}

#[async_trait]
impl CourseStore for PgStore {
    async fn list_all(&self) -> Result<Vec<Course>, StoreError> {
        let rows = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Course>, StoreError> {
        let rows = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: i64) -> Result<Option<Course>, StoreError> {
        let row = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, course: NewCourse) -> Result<Course, StoreError> {
        let row = sqlx::query_as::<_, Course>(&format!(
            r#"
            INSERT INTO courses
                (user_id, title, description, rating, publisher, last_update, upload_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(course.user_id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.rating)
        .bind(&course.publisher)
        .bind(course.last_update)
        .bind(course.upload_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, changes: CourseChanges) -> Result<Option<Course>, StoreError> {
        let row = sqlx::query_as::<_, Course>(&format!(
            r#"
            UPDATE courses
               SET user_id     = COALESCE($2, user_id),
                   title       = COALESCE($3, title),
                   description = COALESCE($4, description),
                   rating      = COALESCE($5, rating),
                   publisher   = COALESCE($6, publisher),
                   last_update = COALESCE($7, last_update),
                   upload_date = COALESCE($8, upload_date),
                   updated_at  = now()
             WHERE id = $1
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.user_id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.rating)
        .bind(changes.publisher)
        .bind(changes.last_update)
        .bind(changes.upload_date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<Option<Course>, StoreError> {
        let row = sqlx::query_as::<_, Course>(&format!(
            "DELETE FROM courses WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
