pub mod auth_service;
pub mod course_service;
