use crate::domain::payload::RawBody;
use crate::domain::user::RegisterUser;
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, http::header, web};
use tracing::{info, instrument};

/// GET /api/users: the authenticated user's public summary.
#[instrument(skip(current), fields(user_id = current.user.id))]
pub async fn current_user(current: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(current.user.summary())
}

/// POST /api/users
#[instrument(skip(state, body))]
pub async fn register(
    state: web::Data<AppState>,
    body: RawBody,
) -> Result<HttpResponse, ApiError> {
    let req = body.decode::<RegisterUser>()?;
    let user = state.auth_service.register_user(req).await?;

    info!(user_id = user.id, "Registration request completed");
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, "/"))
        .finish())
}
