use crate::domain::course::Course;
use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseMutation {
    Update,
    Delete,
}

impl CourseMutation {
    fn forbidden_message(self) -> &'static str {
        match self {
            CourseMutation::Update => "You can only update courses that belong to you.",
            CourseMutation::Delete => "You can only delete courses that belong to you.",
        }
    }
}

pub fn course_not_found(requested_id: &str) -> DomainError {
    DomainError::NotFound(format!(
        "The course with the id {} could not be found.",
        requested_id
    ))
}

/// Decides whether `actor` may apply `mutation` to the looked-up course.
///
/// Existence is checked before ownership, so a missing course is a 404 for
/// everyone and a foreign course is a 403 before anything is written.
pub fn guard_course_mutation(
    course: Option<Course>,
    requested_id: &str,
    actor: &User,
    mutation: CourseMutation,
) -> Result<Course, DomainError> {
    let course = course.ok_or_else(|| course_not_found(requested_id))?;

    if course.user_id != actor.id {
        return Err(DomainError::Forbidden(
            mutation.forbidden_message().to_string(),
        ));
    }

    Ok(course)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> User {
        User {
            id,
            first_name: "Joe".to_string(),
            last_name: "Smith".to_string(),
            email_address: format!("user{}@example.com", id),
            password_hash: "hash".to_string(),
        }
    }

    fn course_owned_by(owner: i64) -> Course {
        Course {
            id: 5,
            title: "Title".to_string(),
            description: "Description".to_string(),
            estimated_time: None,
            materials_needed: None,
            user_id: owner,
        }
    }

    #[test]
    fn test_owner_is_allowed() {
        let course = guard_course_mutation(
            Some(course_owned_by(1)),
            "5",
            &user(1),
            CourseMutation::Update,
        )
        .unwrap();
        assert_eq!(course.id, 5);
    }

    #[test]
    fn test_non_owner_is_forbidden_for_update() {
        let err = guard_course_mutation(
            Some(course_owned_by(1)),
            "5",
            &user(2),
            CourseMutation::Update,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Forbidden(ref msg) if msg == "You can only update courses that belong to you."
        ));
    }

    #[test]
    fn test_non_owner_is_forbidden_for_delete() {
        let err = guard_course_mutation(
            Some(course_owned_by(1)),
            "5",
            &user(2),
            CourseMutation::Delete,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Forbidden(ref msg) if msg == "You can only delete courses that belong to you."
        ));
    }

    #[test]
    fn test_missing_course_is_not_found_for_any_actor() {
        for actor in [user(1), user(2)] {
            let err = guard_course_mutation(None, "42", &actor, CourseMutation::Delete)
                .unwrap_err();
            assert!(matches!(
                err,
                DomainError::NotFound(ref msg) if msg == "The course with the id 42 could not be found."
            ));
        }
    }
}
