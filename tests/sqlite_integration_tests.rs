use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use course_catalog_api::application::auth_service::AuthService;
use course_catalog_api::application::course_service::CourseService;
use course_catalog_api::data::sqlite::{self, SqliteCourseRepository, SqliteUserRepository};
use course_catalog_api::domain::user::EMAIL_IN_USE;
use course_catalog_api::infrastructure::security::{HashingCost, PasswordSecurity};
use course_catalog_api::presentation::handlers::AppState;
use course_catalog_api::presentation::routes;
use serde_json::json;
use std::sync::Arc;

fn basic(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", email, password)))
}

macro_rules! setup_sqlite_test {
    () => {{
        let pool = sqlite::connect("sqlite::memory:").await.unwrap();
        sqlite::sync_schema(&pool).await.unwrap();

        let security = PasswordSecurity::new(HashingCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        let state = web::Data::new(AppState::new(
            AuthService::new(Arc::new(SqliteUserRepository::new(pool.clone())), security),
            CourseService::new(Arc::new(SqliteCourseRepository::new(pool))),
        ));

        test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(routes::configure),
        )
        .await
    }};
}

macro_rules! register {
    ($app:expr, $first:expr, $email:expr, $password:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({
                "firstName": $first,
                "lastName": "Tester",
                "emailAddress": $email,
                "password": $password
            }))
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_web::test]
async fn test_full_course_lifecycle() {
    let app = setup_sqlite_test!();

    let resp = register!(app, "Joe", "joe@smith.com", "joepassword");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = register!(app, "Sally", "sally@jones.com", "sallypassword");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header((header::AUTHORIZATION, basic("joe@smith.com", "joepassword")))
        .set_json(json!({ "title": "Learn How to Test", "description": "Write tests." }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/api/courses/1");

    let req = test::TestRequest::get().uri("/api/courses/1").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["title"], "Learn How to Test");
    assert!(body["estimatedTime"].is_null());
    assert_eq!(body["userId"], 1);
    assert_eq!(
        body["User"],
        json!({ "firstName": "Joe", "lastName": "Tester", "emailAddress": "joe@smith.com" })
    );

    let req = test::TestRequest::put()
        .uri("/api/courses/1")
        .insert_header((header::AUTHORIZATION, basic("sally@jones.com", "sallypassword")))
        .set_json(json!({ "title": "Taken over" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri("/api/courses/1")
        .insert_header((header::AUTHORIZATION, basic("JOE@smith.com", "joepassword")))
        .set_json(json!({ "estimatedTime": "3 hours" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/api/courses").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["estimatedTime"], "3 hours");
    assert_eq!(body[0]["title"], "Learn How to Test");

    let req = test::TestRequest::delete()
        .uri("/api/courses/1")
        .insert_header((header::AUTHORIZATION, basic("joe@smith.com", "joepassword")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/api/courses").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn test_duplicate_email_is_rejected_by_the_store() {
    let app = setup_sqlite_test!();

    let resp = register!(app, "Joe", "Joe@Smith.com", "joepassword");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = register!(app, "Joseph", "joe@smith.com", "other");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "errors": [EMAIL_IN_USE] }));

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header((header::AUTHORIZATION, basic("joe@smith.com", "joepassword")))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["firstName"], "Joe");
    assert_eq!(body["emailAddress"], "Joe@Smith.com");
}
