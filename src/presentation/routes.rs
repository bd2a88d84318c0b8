use crate::presentation::courses::{
    create_course, delete_course, get_course, list_courses, update_course,
};
use crate::presentation::handlers::{greeting, route_not_found};
use crate::presentation::middleware::BasicAuthMiddleware;
use crate::presentation::users::{current_user, register};
use actix_web::{guard, web};

/// Registers every route of the API.
///
/// Resources are split by method guard so that [`BasicAuthMiddleware`] wraps
/// only the protected methods of a path. A request no resource accepts falls
/// through to the 404 default service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").guard(guard::Get()).to(greeting))
        .service(
            web::scope("/api")
                .service(
                    web::resource("/users")
                        .guard(guard::Get())
                        .to(current_user)
                        .wrap(BasicAuthMiddleware),
                )
                .service(web::resource("/users").guard(guard::Post()).to(register))
                .service(
                    web::resource("/courses")
                        .guard(guard::Get())
                        .to(list_courses),
                )
                .service(
                    web::resource("/courses")
                        .guard(guard::Post())
                        .to(create_course)
                        .wrap(BasicAuthMiddleware),
                )
                .service(
                    web::resource("/courses/{id}")
                        .guard(guard::Get())
                        .to(get_course),
                )
                .service(
                    web::resource("/courses/{id}")
                        .guard(guard::Any(guard::Put()).or(guard::Delete()))
                        .route(web::put().to(update_course))
                        .route(web::delete().to(delete_course))
                        .wrap(BasicAuthMiddleware),
                ),
        )
        .default_service(web::to(route_not_found));
}
