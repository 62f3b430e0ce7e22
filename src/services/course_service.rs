use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Course, Lesson};

#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),
    #[error("Course not found: {0}")]
    CourseNotFound(Uuid),
    #[error("Lesson not found: {0}")]
    LessonNotFound(Uuid),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Discipleship courses and their lessons.
pub struct CourseService {
    pool: PgPool,
}

impl CourseService {
    pub async fn new() -> Result<Self, CourseError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self { pool })
    }

    pub async fn create_course(
        &self,
        church_id: Uuid,
        service_id: Uuid,
        title: &str,
        description: Option<&str>,
        position: i32,
    ) -> Result<Course, CourseError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CourseError::MissingField("title"));
        }

        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (church_id, service_id, title, description, position)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, church_id, service_id, title, description, position,
                      created_at, updated_at
            "#,
        )
        .bind(church_id)
        .bind(service_id)
        .bind(title)
        .bind(description)
        .bind(position)
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    pub async fn list_courses(&self, church_id: Uuid) -> Result<Vec<Course>, CourseError> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, church_id, service_id, title, description, position,
                   created_at, updated_at
            FROM courses
            WHERE church_id = $1
            ORDER BY position, title
            "#,
        )
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    pub async fn get_course(&self, id: Uuid) -> Result<Course, CourseError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, church_id, service_id, title, description, position,
                   created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        course.ok_or(CourseError::CourseNotFound(id))
    }

    pub async fn update_course(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        position: Option<i32>,
    ) -> Result<Course, CourseError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                position = COALESCE($4, position),
                updated_at = now()
            WHERE id = $1
            RETURNING id, church_id, service_id, title, description, position,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title.map(str::trim).filter(|t| !t.is_empty()))
        .bind(description)
        .bind(position)
        .fetch_optional(&self.pool)
        .await?;

        course.ok_or(CourseError::CourseNotFound(id))
    }

    pub async fn delete_course(&self, id: Uuid) -> Result<bool, CourseError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn create_lesson(
        &self,
        course_id: Uuid,
        title: &str,
        content: &str,
        position: i32,
    ) -> Result<Lesson, CourseError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CourseError::MissingField("title"));
        }

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons (course_id, title, content, position)
            VALUES ($1, $2, $3, $4)
            RETURNING id, course_id, title, content, position, created_at, updated_at
            "#,
        )
        .bind(course_id)
        .bind(title)
        .bind(content)
        .bind(position)
        .fetch_one(&self.pool)
        .await?;

        Ok(lesson)
    }

    pub async fn list_lessons(&self, course_id: Uuid) -> Result<Vec<Lesson>, CourseError> {
        let lessons = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, course_id, title, content, position, created_at, updated_at
            FROM lessons
            WHERE course_id = $1
            ORDER BY position, title
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }

    pub async fn get_lesson(&self, id: Uuid) -> Result<Lesson, CourseError> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, course_id, title, content, position, created_at, updated_at
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        lesson.ok_or(CourseError::LessonNotFound(id))
    }

    pub async fn update_lesson(
        &self,
        id: Uuid,
        title: Option<&str>,
        content: Option<&str>,
        position: Option<i32>,
    ) -> Result<Lesson, CourseError> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            UPDATE lessons
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                position = COALESCE($4, position),
                updated_at = now()
            WHERE id = $1
            RETURNING id, course_id, title, content, position, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title.map(str::trim).filter(|t| !t.is_empty()))
        .bind(content)
        .bind(position)
        .fetch_optional(&self.pool)
        .await?;

        lesson.ok_or(CourseError::LessonNotFound(id))
    }

    pub async fn delete_lesson(&self, id: Uuid) -> Result<bool, CourseError> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
