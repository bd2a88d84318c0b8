use actix_web::{App, HttpServer, web};
use anyhow::{Context, anyhow};
use course_catalog_api::application::auth_service::AuthService;
use course_catalog_api::application::course_service::CourseService;
use course_catalog_api::data::memory::InMemoryCourseRepository;
use course_catalog_api::data::sqlite::{self, SqliteCourseRepository, SqliteUserRepository};
use course_catalog_api::data::user_repository::InMemoryUserRepository;
use course_catalog_api::domain::repository::{CourseRepository, UserRepository};
use course_catalog_api::infrastructure::config::Config;
use course_catalog_api::infrastructure::logging::init_logging;
use course_catalog_api::infrastructure::security::PasswordSecurity;
use course_catalog_api::presentation::handlers::AppState;
use course_catalog_api::presentation::middleware::{
    ErrorLoggingMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use course_catalog_api::presentation::routes;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        host = %config.host,
        port = config.port,
        enable_global_error_logging = config.enable_global_error_logging,
        "Configuration loaded"
    );

    let password_security = PasswordSecurity::new(config.hashing)
        .map_err(|e| anyhow!("Invalid password hashing cost: {}", e))?;

    let mut pool = None;
    let user_repository: Arc<dyn UserRepository>;
    let course_repository: Arc<dyn CourseRepository>;
    if config.uses_memory_store() {
        info!("Using in-memory repositories");
        let users = InMemoryUserRepository::new();
        course_repository = Arc::new(InMemoryCourseRepository::new(users.clone()));
        user_repository = Arc::new(users);
    } else {
        let db = sqlite::connect(&config.database_url)
            .await
            .context("Failed to connect to the database")?;
        sqlite::sync_schema(&db)
            .await
            .context("Failed to sync the database schema")?;
        user_repository = Arc::new(SqliteUserRepository::new(db.clone()));
        course_repository = Arc::new(SqliteCourseRepository::new(db.clone()));
        pool = Some(db);
    }

    let state = web::Data::new(AppState::new(
        AuthService::new(user_repository, password_security),
        CourseService::new(course_repository),
    ));

    let enable_global_error_logging = config.enable_global_error_logging;
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(ErrorLoggingMiddleware::new(enable_global_error_logging))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    info!(host = %config.host, port = config.port, "HTTP server is listening");
    server.run().await?;

    if let Some(pool) = pool {
        pool.close().await;
        info!("Database connection closed");
    }

    Ok(())
}
