use crate::domain::course::{Course, CourseDetail, CoursePayload};
use crate::domain::error::DomainError;
use crate::domain::ownership::{CourseMutation, course_not_found, guard_course_mutation};
use crate::domain::payload::RawBody;
use crate::domain::repository::CourseRepository;
use crate::domain::user::User;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const ID_NOT_FOUND: &str = "Id Not Found.";

pub struct CourseService {
    course_repository: Arc<dyn CourseRepository>,
}

impl CourseService {
    pub fn new(course_repository: Arc<dyn CourseRepository>) -> Self {
        Self { course_repository }
    }

    pub async fn list_courses(&self) -> Result<Vec<CourseDetail>> {
        self.course_repository.list_courses().await
    }

    /// `id` is the raw path segment; anything that is not an integer simply
    /// does not exist.
    pub async fn get_course(&self, id: &str) -> Result<CourseDetail> {
        let detail = match parse_id(id) {
            Some(id) => self.course_repository.find_course_detail(id).await?,
            None => None,
        };
        detail.ok_or_else(|| DomainError::NotFound(ID_NOT_FOUND.to_string()).into())
    }

    #[instrument(skip(self, owner, payload), fields(owner_id = owner.id))]
    pub async fn create_course(&self, owner: &User, payload: CoursePayload) -> Result<Course> {
        let new_course = payload.into_new_course(owner.id).map_err(|errors| {
            warn!(violations = errors.len(), "Course payload rejected");
            DomainError::Validation(errors)
        })?;

        let course = self.course_repository.create_course(new_course).await?;
        info!(course_id = course.id, "Course created");
        Ok(course)
    }

    /// The body is decoded only after the course is known to exist and to
    /// belong to `actor`.
    #[instrument(skip(self, actor, body), fields(actor_id = actor.id))]
    pub async fn update_course(&self, actor: &User, id: &str, body: &RawBody) -> Result<()> {
        let course = self.owned_course(actor, id, CourseMutation::Update).await?;

        let updated = body
            .decode::<CoursePayload>()
            .and_then(|payload| payload.apply_to(&course))
            .map_err(|errors| {
                warn!(violations = errors.len(), "Course update rejected");
                DomainError::Validation(errors)
            })?;
        self.course_repository.update_course(&updated).await?;

        info!(course_id = course.id, "Course updated");
        Ok(())
    }

    #[instrument(skip(self, actor), fields(actor_id = actor.id))]
    pub async fn delete_course(&self, actor: &User, id: &str) -> Result<()> {
        let course = self.owned_course(actor, id, CourseMutation::Delete).await?;

        if !self.course_repository.delete_course(course.id).await? {
            // Removed by a concurrent request between lookup and delete.
            return Err(course_not_found(id).into());
        }

        info!(course_id = course.id, "Course deleted");
        Ok(())
    }

    async fn owned_course(
        &self,
        actor: &User,
        id: &str,
        mutation: CourseMutation,
    ) -> Result<Course> {
        let course = match parse_id(id) {
            Some(course_id) => self.course_repository.find_course(course_id).await?,
            None => None,
        };

        let course = guard_course_mutation(course, id, actor, mutation).map_err(|e| {
            warn!(error = %e, ?mutation, "Course mutation refused");
            e
        })?;
        debug!(course_id = course.id, ?mutation, "Ownership confirmed");
        Ok(course)
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}
