/// Issue model and database operations
///
/// Issues belong to exactly one project and carry an author (the creator)
/// and an assignee. Any project member may create issues; only the author
/// may update or delete one.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE issue_tag AS ENUM ('bug', 'feature', 'task');
/// CREATE TYPE issue_status AS ENUM ('open', 'closed');
///
/// CREATE TABLE issues (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     assignee_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(256) NOT NULL,
///     description VARCHAR(4096) NOT NULL DEFAULT '',
///     tag issue_tag NOT NULL DEFAULT 'task',
///     priority INTEGER NOT NULL DEFAULT 0,
///     status issue_status NOT NULL DEFAULT 'open',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Issue classification tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "issue_tag", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IssueTag {
    /// Defect
    Bug,

    /// Feature request
    Feature,

    /// General task
    Task,
}

/// Issue lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "issue_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    /// Issue is open
    Open,

    /// Issue has been closed
    Closed,
}

/// Issue model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Issue {
    /// Unique issue ID (UUID v4)
    pub id: Uuid,

    /// Owning project
    pub project_id: Uuid,

    /// Creator; the only user who may update or delete the issue
    pub author_id: Uuid,

    /// Current assignee
    pub assignee_id: Uuid,

    /// Issue title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Classification tag
    pub tag: IssueTag,

    /// Numeric priority (higher = more urgent)
    pub priority: i32,

    /// Lifecycle status
    pub status: IssueStatus,

    /// When the issue was created
    pub created_at: DateTime<Utc>,

    /// When the issue was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIssue {
    /// Owning project
    pub project_id: Uuid,

    /// Creator
    pub author_id: Uuid,

    /// Assignee; defaults to the author when None
    pub assignee_id: Option<Uuid>,

    /// Issue title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Classification tag
    pub tag: IssueTag,

    /// Numeric priority
    pub priority: i32,
}

/// Input for updating an existing issue
///
/// All fields are optional; only non-None fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIssue {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New tag
    pub tag: Option<IssueTag>,

    /// New priority
    pub priority: Option<i32>,

    /// New status
    pub status: Option<IssueStatus>,

    /// New assignee
    pub assignee_id: Option<Uuid>,
}

impl Issue {
    /// Creates a new issue in a project
    ///
    /// The assignee defaults to the author when not given.
    pub async fn create(pool: &PgPool, data: CreateIssue) -> Result<Self, sqlx::Error> {
        let assignee_id = data.assignee_id.unwrap_or(data.author_id);

        let issue = sqlx::query_as::<_, Issue>(
            r#"
            INSERT INTO issues (project_id, author_id, assignee_id, title,
                                description, tag, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, project_id, author_id, assignee_id, title, description,
                      tag, priority, status, created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.author_id)
        .bind(assignee_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.tag)
        .bind(data.priority)
        .fetch_one(pool)
        .await?;

        Ok(issue)
    }

    /// Finds an issue by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let issue = sqlx::query_as::<_, Issue>(
            r#"
            SELECT id, project_id, author_id, assignee_id, title, description,
                   tag, priority, status, created_at, updated_at
            FROM issues
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(issue)
    }

    /// Finds an issue by ID, scoped to a project
    ///
    /// Returns None when the issue exists but belongs to another project, so
    /// nested-route handlers can 404 on mismatched parents.
    pub async fn find_in_project(
        pool: &PgPool,
        id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let issue = sqlx::query_as::<_, Issue>(
            r#"
            SELECT id, project_id, author_id, assignee_id, title, description,
                   tag, priority, status, created_at, updated_at
            FROM issues
            WHERE id = $1 AND project_id = $2
            "#,
        )
        .bind(id)
        .bind(project_id)
        .fetch_optional(pool)
        .await?;

        Ok(issue)
    }

    /// Lists all issues of a project, oldest first
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let issues = sqlx::query_as::<_, Issue>(
            r#"
            SELECT id, project_id, author_id, assignee_id, title, description,
                   tag, priority, status, created_at, updated_at
            FROM issues
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(issues)
    }

    /// Updates an existing issue
    ///
    /// Only non-None fields in `data` are written. `updated_at` is always
    /// refreshed.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateIssue,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE issues SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.tag.is_some() {
            bind_count += 1;
            query.push_str(&format!(", tag = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.assignee_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee_id = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, project_id, author_id, assignee_id, title, \
             description, tag, priority, status, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Issue>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(tag) = data.tag {
            q = q.bind(tag);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }

        let issue = q.fetch_optional(pool).await?;

        Ok(issue)
    }

    /// Deletes an issue by ID
    ///
    /// Comments cascade.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issues WHERE id = $1")
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
    fn test_tag_serde() {
        assert_eq!(serde_json::to_string(&IssueTag::Bug).unwrap(), "\"bug\"");
        assert_eq!(
            serde_json::from_str::<IssueTag>("\"feature\"").unwrap(),
            IssueTag::Feature
        );
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_string(&IssueStatus::Open).unwrap(), "\"open\"");
        assert_eq!(
            serde_json::from_str::<IssueStatus>("\"closed\"").unwrap(),
            IssueStatus::Closed
        );
    }

    #[test]
    fn test_update_issue_default() {
        let update = UpdateIssue::default();
        assert!(update.title.is_none());
        assert!(update.status.is_none());
        assert!(update.assignee_id.is_none());
    }
}
