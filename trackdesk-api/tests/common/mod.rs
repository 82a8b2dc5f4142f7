/// Common test utilities for integration tests
///
/// Shared infrastructure for integration tests:
/// - Test database setup and migrations
/// - Test user and project creation
/// - JWT token generation
/// - Request helpers

use axum::body::Body;
use axum::http::{Request, Response};
use sqlx::PgPool;
use trackdesk_api::app::{build_router, AppState};
use trackdesk_api::config::Config;
use trackdesk_shared::auth::jwt::{create_token, Claims, TokenType};
use trackdesk_shared::models::project::{CreateProject, Project, ProjectCategory};
use trackdesk_shared::models::user::{CreateUser, Profile, User};
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a migrated database and one user
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../trackdesk-shared/migrations").run(&db).await?;

        let user = create_user(&db, "test").await?;
        let jwt_token = token_for(&config, user.id)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Returns authorization header value for the context's user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Returns authorization header value for another user
    pub fn auth_header_for(&self, user_id: Uuid) -> String {
        let token = token_for(&self.config, user_id).expect("token creation");
        format!("Bearer {}", token)
    }

    /// Cleans up test data created through this context
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

/// Creates a user with a unique username and a valid profile
///
/// The password hash is a placeholder; tests that exercise the login flow
/// hash a real password themselves.
pub async fn create_user(db: &PgPool, prefix: &str) -> anyhow::Result<User> {
    let user = User::signup(
        db,
        CreateUser {
            username: format!("{}-{}", prefix, Uuid::new_v4()),
            password_hash: "$argon2id$placeholder".to_string(),
            profile: Profile {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: format!("{}-{}@example.com", prefix, Uuid::new_v4()),
            },
        },
    )
    .await?;

    Ok(user)
}

/// Mints an access token for a user
pub fn token_for(config: &Config, user_id: Uuid) -> anyhow::Result<String> {
    let claims = Claims::new(user_id, TokenType::Access);
    Ok(create_token(&claims, &config.jwt.secret)?)
}

/// Creates a project owned by the given user
pub async fn create_project(db: &PgPool, owner_id: Uuid, title: &str) -> anyhow::Result<Project> {
    let project = Project::create_with_owner(
        db,
        CreateProject {
            title: title.to_string(),
            description: "test project".to_string(),
            category: ProjectCategory::Backend,
        },
        owner_id,
    )
    .await?;

    Ok(project)
}

/// Builds a JSON request with an authorization header
pub fn json_request(method: &str, uri: &str, auth: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", auth)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Builds a bodiless request with an authorization header
pub fn empty_request(method: &str, uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", auth)
        .body(Body::empty())
        .expect("request")
}

/// Reads a response body as JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
