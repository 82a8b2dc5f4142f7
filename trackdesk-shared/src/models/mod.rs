/// Database models for TrackDesk
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and signup
/// - `project`: Projects (the tenancy boundary)
/// - `membership`: User-project relationships with roles
/// - `issue`: Issues owned by a project
/// - `comment`: Comments owned by an issue
///
/// # Example
///
/// ```no_run
/// use trackdesk_shared::models::project::{CreateProject, Project, ProjectCategory};
/// use trackdesk_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(owner_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project = Project::create_with_owner(
///     &pool,
///     CreateProject {
///         title: "Apollo".to_string(),
///         description: "Mission control".to_string(),
///         category: ProjectCategory::Backend,
///     },
///     owner_id,
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod comment;
pub mod issue;
pub mod membership;
pub mod project;
pub mod user;
