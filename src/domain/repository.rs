use crate::domain::course::{Course, CourseDetail, NewCourse};
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;

/// Email lookups and the uniqueness check are ASCII case-insensitive; the
/// address is stored as given.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DomainError::Validation` when the email is already taken.
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<CourseDetail>>;
    async fn find_course_detail(&self, id: i64) -> Result<Option<CourseDetail>>;
    async fn find_course(&self, id: i64) -> Result<Option<Course>>;
    async fn create_course(&self, course: NewCourse) -> Result<Course>;
    async fn update_course(&self, course: &Course) -> Result<()>;
    async fn delete_course(&self, id: i64) -> Result<bool>;
}
