use crate::application::auth_service::AuthService;
use crate::application::course_service::CourseService;
use crate::domain::error::DomainError;
use crate::domain::payload::RawBody;
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError, web};
use serde_json::json;
use std::pin::Pin;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

// AppState holding the services
pub struct AppState {
    pub auth_service: AuthService,
    pub course_service: CourseService,
}

impl AppState {
    pub fn new(auth_service: AuthService, course_service: CourseService) -> Self {
        Self {
            auth_service,
            course_service,
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("Access Denied")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// Carries the full error chain for the server log; never sent to clients.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ApiError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => actix_web::http::StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => actix_web::http::StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            ApiError::Internal(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let body = match self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::Unauthorized => json!({ "message": "Access Denied" }),
            ApiError::Forbidden(msg) | ApiError::NotFound(msg) => json!({ "message": msg }),
            ApiError::Internal(_) => json!({ "message": GENERIC_ERROR_MESSAGE, "error": {} }),
        };

        // Log error based on severity
        match self {
            ApiError::Internal(_) => error!(status = %status, "Unhandled error"),
            _ => warn!(error = %self, status = %status, "Request rejected"),
        }

        HttpResponse::build(status).json(body)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(DomainError::Validation(errors)) => ApiError::Validation(errors),
            Ok(DomainError::NotFound(msg)) => ApiError::NotFound(msg),
            Ok(DomainError::Unauthorized) => ApiError::Unauthorized,
            Ok(DomainError::Forbidden(msg)) => ApiError::Forbidden(msg),
            Ok(DomainError::Internal(msg)) => ApiError::Internal(msg),
            Err(err) => ApiError::Internal(format!("{:?}", err)),
        }
    }
}

impl From<Vec<String>> for ApiError {
    fn from(errors: Vec<String>) -> Self {
        ApiError::Validation(errors)
    }
}

fn declares_json(req: &HttpRequest) -> bool {
    let content_type = req.content_type();
    content_type.eq_ignore_ascii_case("application/json") || content_type.ends_with("+json")
}

// RawBody extractor: reads the payload but leaves decoding to the handler
impl FromRequest for RawBody {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut actix_web::dev::Payload) -> Self::Future {
        let is_json = declares_json(req);
        let bytes = web::Bytes::from_request(req, payload);

        Box::pin(async move {
            let bytes = bytes.await?;
            if is_json {
                Ok(RawBody::json(bytes.to_vec()))
            } else {
                if !bytes.is_empty() {
                    debug!(len = bytes.len(), "Ignoring body without a JSON content type");
                }
                Ok(RawBody::default())
            }
        })
    }
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move { user.ok_or(ApiError::Unauthorized) })
    }
}

#[instrument]
pub async fn greeting() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Welcome to the REST API project!" }))
}

pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    warn!(method = %req.method(), path = %req.path(), "Route not found");
    HttpResponse::NotFound().json(json!({ "message": "Route Not Found" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_validation_lists_every_message() {
        let (status, body) =
            body_of(ApiError::Validation(vec!["a".to_string(), "b".to_string()])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "errors": ["a", "b"] }));
    }

    #[actix_web::test]
    async fn test_unauthorized_body() {
        let (status, body) = body_of(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "Access Denied" }));
    }

    #[actix_web::test]
    async fn test_internal_error_hides_detail() {
        let err = ApiError::from(anyhow::anyhow!("disk I/O error at /var/db"));
        assert!(matches!(err, ApiError::Internal(ref detail) if detail.contains("disk I/O")));

        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": GENERIC_ERROR_MESSAGE, "error": {} }));
    }

    #[actix_web::test]
    async fn test_raw_body_keeps_json_and_drops_other_content_types() {
        let (req, mut payload) = actix_web::test::TestRequest::post()
            .insert_header(("content-type", "application/json; charset=utf-8"))
            .set_payload(r#"{"title": "T"}"#)
            .to_http_parts();
        let body = RawBody::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(body, RawBody::json(r#"{"title": "T"}"#));

        let (req, mut payload) = actix_web::test::TestRequest::post()
            .insert_header(("content-type", "text/plain"))
            .set_payload(r#"{"title": "T"}"#)
            .to_http_parts();
        let body = RawBody::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(body, RawBody::default());
    }

    #[test]
    fn test_domain_errors_map_to_api_errors() {
        let forbidden = ApiError::from(anyhow::Error::from(DomainError::Forbidden("no".into())));
        assert!(matches!(forbidden, ApiError::Forbidden(ref m) if m == "no"));

        let not_found = ApiError::from(anyhow::Error::from(DomainError::NotFound("gone".into())));
        assert_eq!(not_found.status_code(), actix_web::http::StatusCode::NOT_FOUND);

        let unauthorized = ApiError::from(anyhow::Error::from(DomainError::Unauthorized));
        assert!(matches!(unauthorized, ApiError::Unauthorized));
    }
}
