use crate::domain::course::{Course, CourseDetail, NewCourse, OWNER_REQUIRED};
use crate::domain::error::DomainError;
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::domain::user::{EMAIL_IN_USE, NewUser, User, UserSummary};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

// `email_address` uses NOCASE so both lookups and the UNIQUE index ignore
// ASCII case while the stored value keeps the case it was registered with.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email_address TEXT NOT NULL UNIQUE COLLATE NOCASE,
        password TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        estimated_time TEXT,
        materials_needed TEXT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
];

/// Opens the pool. An in-memory database lives and dies with its connection,
/// so those get exactly one connection that is never recycled.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;
    info!(database_url = %database_url, "Connection to the database successful");
    Ok(pool)
}

pub async fn sync_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(*statement).execute(pool).await?;
    }
    info!("Synced models with the database");
    Ok(())
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email_address: String,
    password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email_address: row.email_address,
            password_hash: row.password,
        }
    }
}

#[derive(Debug, FromRow)]
struct CourseRow {
    id: i64,
    title: String,
    description: String,
    estimated_time: Option<String>,
    materials_needed: Option<String>,
    user_id: i64,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: row.id,
            title: row.title,
            description: row.description,
            estimated_time: row.estimated_time,
            materials_needed: row.materials_needed,
            user_id: row.user_id,
        }
    }
}

#[derive(Debug, FromRow)]
struct CourseDetailRow {
    #[sqlx(flatten)]
    course: CourseRow,
    owner_first_name: String,
    owner_last_name: String,
    owner_email_address: String,
}

impl From<CourseDetailRow> for CourseDetail {
    fn from(row: CourseDetailRow) -> Self {
        CourseDetail {
            course: row.course.into(),
            owner: UserSummary {
                first_name: row.owner_first_name,
                last_name: row.owner_last_name,
                email_address: row.owner_email_address,
            },
        }
    }
}

const SELECT_COURSE_DETAIL: &str = r#"
    SELECT c.id, c.title, c.description, c.estimated_time, c.materials_needed, c.user_id,
           u.first_name AS owner_first_name,
           u.last_name AS owner_last_name,
           u.email_address AS owner_email_address
    FROM courses c
    JOIN users u ON u.id = c.user_id
"#;

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email_address))]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (first_name, last_name, email_address, password, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email_address)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_rowid();
                debug!(user_id = id, "User inserted");
                Ok(User {
                    id,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    email_address: user.email_address,
                    password_hash: user.password_hash,
                })
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                warn!("Email already registered");
                Err(DomainError::validation(EMAIL_IN_USE).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, email_address, password
            FROM users
            WHERE email_address = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, email_address, password
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }
}

#[derive(Clone)]
pub struct SqliteCourseRepository {
    pool: SqlitePool,
}

impl SqliteCourseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for SqliteCourseRepository {
    #[instrument(skip(self))]
    async fn list_courses(&self) -> Result<Vec<CourseDetail>> {
        let sql = format!("{SELECT_COURSE_DETAIL} ORDER BY c.id");
        let rows = sqlx::query_as::<_, CourseDetailRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CourseDetail::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_course_detail(&self, id: i64) -> Result<Option<CourseDetail>> {
        let sql = format!("{SELECT_COURSE_DETAIL} WHERE c.id = ?");
        let row = sqlx::query_as::<_, CourseDetailRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CourseDetail::from))
    }

    #[instrument(skip(self))]
    async fn find_course(&self, id: i64) -> Result<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, title, description, estimated_time, materials_needed, user_id
            FROM courses
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Course::from))
    }

    #[instrument(skip(self, course), fields(owner_id = course.user_id))]
    async fn create_course(&self, course: NewCourse) -> Result<Course> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO courses (title, description, estimated_time, materials_needed, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.estimated_time)
        .bind(&course.materials_needed)
        .bind(course.user_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(Course {
                id: done.last_insert_rowid(),
                title: course.title,
                description: course.description,
                estimated_time: course.estimated_time,
                materials_needed: course.materials_needed,
                user_id: course.user_id,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(DomainError::validation(OWNER_REQUIRED).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, course), fields(course_id = course.id))]
    async fn update_course(&self, course: &Course) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE courses
            SET title = ?, description = ?, estimated_time = ?, materials_needed = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.estimated_time)
        .bind(&course.materials_needed)
        .bind(Utc::now())
        .bind(course.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_course(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
