use crate::domain::course::CoursePayload;
use crate::domain::payload::RawBody;
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, http::header, web};
use tracing::{error, info, instrument};

#[instrument(skip(state))]
pub async fn list_courses(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let courses = state.course_service.list_courses().await.map_err(|e| {
        error!(error = %e, "Failed to list courses");
        e
    })?;
    info!(count = courses.len(), "Courses listed");
    Ok(HttpResponse::Ok().json(courses))
}

#[instrument(skip(state), fields(course_id = %path.as_str()))]
pub async fn get_course(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let course = state.course_service.get_course(&path).await?;
    Ok(HttpResponse::Ok().json(course))
}

#[instrument(skip(state, current, body), fields(user_id = current.user.id, course_id))]
pub async fn create_course(
    state: web::Data<AppState>,
    current: AuthenticatedUser,
    body: RawBody,
) -> Result<HttpResponse, ApiError> {
    let payload = body.decode::<CoursePayload>()?;
    let course = state
        .course_service
        .create_course(&current.user, payload)
        .await?;
    tracing::Span::current().record("course_id", course.id);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/courses/{}", course.id)))
        .finish())
}

#[instrument(skip(state, current, body), fields(user_id = current.user.id, course_id = %path.as_str()))]
pub async fn update_course(
    state: web::Data<AppState>,
    current: AuthenticatedUser,
    path: web::Path<String>,
    body: RawBody,
) -> Result<HttpResponse, ApiError> {
    state
        .course_service
        .update_course(&current.user, &path, &body)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state, current), fields(user_id = current.user.id, course_id = %path.as_str()))]
pub async fn delete_course(
    state: web::Data<AppState>,
    current: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state
        .course_service
        .delete_course(&current.user, &path)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
