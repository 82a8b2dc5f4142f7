/// Project model and database operations
///
/// Projects are the tenancy boundary of TrackDesk: memberships, issues, and
/// comments all hang off a project, and the authorization evaluator resolves
/// every decision against the acting user's relationship to one.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_category AS ENUM ('backend', 'frontend', 'ios', 'android');
///
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(256) NOT NULL,
///     description VARCHAR(4096) NOT NULL DEFAULT '',
///     category project_category NOT NULL DEFAULT 'backend',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Creation is atomic with the creator's owner membership: a reader can never
/// observe a project without exactly one owner-role membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::membership::{CreateMembership, Membership, ProjectRole};

/// Project categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    /// Back-end project
    Backend,

    /// Front-end project
    Frontend,

    /// iOS project
    Ios,

    /// Android project
    Android,
}

impl ProjectCategory {
    /// Converts category to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::Backend => "backend",
            ProjectCategory::Frontend => "frontend",
            ProjectCategory::Ios => "ios",
            ProjectCategory::Android => "android",
        }
    }
}

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Project title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Project category
    pub category: ProjectCategory,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Project category
    pub category: ProjectCategory,
}

/// Input for updating an existing project
///
/// All fields are optional; only non-None fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New category
    pub category: Option<ProjectCategory>,
}

impl Project {
    /// Creates a project and its owner membership atomically
    ///
    /// Both inserts run in a single transaction; if either fails, neither is
    /// applied. The creator becomes the project's sole owner-role member.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or the database is unavailable.
    pub async fn create_with_owner(
        pool: &PgPool,
        data: CreateProject,
        owner_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (title, description, category)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, category, created_at, updated_at
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.category)
        .fetch_one(&mut *tx)
        .await?;

        Membership::create(
            &mut *tx,
            CreateMembership {
                project_id: project.id,
                user_id: owner_id,
                role: ProjectRole::Owner,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    /// Finds a project by ID
    ///
    /// # Returns
    ///
    /// The project if found, None otherwise
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, category, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists the projects where a user holds a membership
    ///
    /// This is the query-level filter behind project listing: the result set
    /// itself is restricted to the user's projects rather than gating each
    /// row with a boolean check. Ordered by project creation time.
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.title, p.description, p.category, p.created_at, p.updated_at
            FROM projects p
            JOIN memberships m ON m.project_id = p.id
            WHERE m.user_id = $1
            ORDER BY p.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Updates an existing project
    ///
    /// Only non-None fields in `data` are written. `updated_at` is always
    /// refreshed.
    ///
    /// # Returns
    ///
    /// The updated project if found, None if the id doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the update dynamically from the fields that are present.
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.category.is_some() {
            bind_count += 1;
            query.push_str(&format!(", category = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, category, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }

        let project = q.fetch_optional(pool).await?;

        Ok(project)
    }

    /// Deletes a project by ID
    ///
    /// Memberships, issues, and comments cascade.
    ///
    /// # Returns
    ///
    /// True if a project was deleted, false if the id didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_as_str() {
        assert_eq!(ProjectCategory::Backend.as_str(), "backend");
        assert_eq!(ProjectCategory::Frontend.as_str(), "frontend");
        assert_eq!(ProjectCategory::Ios.as_str(), "ios");
        assert_eq!(ProjectCategory::Android.as_str(), "android");
    }

    #[test]
    fn test_update_project_default() {
        let update = UpdateProject::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.category.is_none());
    }

    #[test]
    fn test_category_serde_roundtrip() {
        let json = serde_json::to_string(&ProjectCategory::Ios).unwrap();
        assert_eq!(json, "\"ios\"");
        let back: ProjectCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProjectCategory::Ios);
    }

    // Integration tests for the create-with-owner transaction are in the api
    // crate's tests/ directory.
}
