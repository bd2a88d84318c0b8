use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::course::{Course, CourseDetail, NewCourse, OWNER_REQUIRED};
use crate::domain::error::DomainError;
use crate::domain::repository::{CourseRepository, UserRepository};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Course storage that resolves owners through a shared
/// [`InMemoryUserRepository`], the way a foreign key would.
#[derive(Clone)]
pub struct InMemoryCourseRepository {
    storage: Arc<RwLock<BTreeMap<i64, Course>>>,
    next_id: Arc<AtomicI64>,
    users: InMemoryUserRepository,
}

impl InMemoryCourseRepository {
    pub fn new(users: InMemoryUserRepository) -> Self {
        Self {
            storage: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            users,
        }
    }

    async fn with_owner(&self, course: Course) -> Result<CourseDetail> {
        let owner = self
            .users
            .find_user_by_id(course.user_id)
            .await?
            .ok_or_else(|| anyhow!("course {} references missing user {}", course.id, course.user_id))?;
        Ok(CourseDetail {
            course,
            owner: owner.summary(),
        })
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn list_courses(&self) -> Result<Vec<CourseDetail>> {
        let courses: Vec<Course> = self.storage.read().await.values().cloned().collect();
        let mut details = Vec::with_capacity(courses.len());
        for course in courses {
            details.push(self.with_owner(course).await?);
        }
        Ok(details)
    }

    async fn find_course_detail(&self, id: i64) -> Result<Option<CourseDetail>> {
        match self.find_course(id).await? {
            Some(course) => Ok(Some(self.with_owner(course).await?)),
            None => Ok(None),
        }
    }

    async fn find_course(&self, id: i64) -> Result<Option<Course>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&id).cloned())
    }

    #[instrument(skip(self, course), fields(owner_id = course.user_id))]
    async fn create_course(&self, course: NewCourse) -> Result<Course> {
        if self.users.find_user_by_id(course.user_id).await?.is_none() {
            return Err(DomainError::validation(OWNER_REQUIRED).into());
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let course = Course {
            id,
            title: course.title,
            description: course.description,
            estimated_time: course.estimated_time,
            materials_needed: course.materials_needed,
            user_id: course.user_id,
        };
        self.storage.write().await.insert(id, course.clone());
        debug!(course_id = id, "Course saved to memory storage");
        Ok(course)
    }

    async fn update_course(&self, course: &Course) -> Result<()> {
        let mut storage = self.storage.write().await;
        if let Some(existing) = storage.get_mut(&course.id) {
            *existing = course.clone();
        }
        Ok(())
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage.remove(&id).is_some())
    }
}
