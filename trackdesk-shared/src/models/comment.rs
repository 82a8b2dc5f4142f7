/// Comment model and database operations
///
/// Comments belong to exactly one issue. Any member of the issue's project
/// may read or create comments; editing and deleting require being both the
/// comment's author and still a member of the project.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     issue_id UUID NOT NULL REFERENCES issues(id) ON DELETE CASCADE,
///     author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     description VARCHAR(4096) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID (UUID v4)
    pub id: Uuid,

    /// Owning issue
    pub issue_id: Uuid,

    /// Creator
    pub author_id: Uuid,

    /// Comment body
    pub description: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,

    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    /// Owning issue
    pub issue_id: Uuid,

    /// Creator
    pub author_id: Uuid,

    /// Comment body
    pub description: String,
}

impl Comment {
    /// Creates a new comment on an issue
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (issue_id, author_id, description)
            VALUES ($1, $2, $3)
            RETURNING id, issue_id, author_id, description, created_at, updated_at
            "#,
        )
        .bind(data.issue_id)
        .bind(data.author_id)
        .bind(&data.description)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Finds a comment by ID, scoped to an issue
    ///
    /// Returns None when the comment exists but belongs to another issue, so
    /// nested-route handlers can 404 on mismatched parents.
    pub async fn find_in_issue(
        pool: &PgPool,
        id: Uuid,
        issue_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, issue_id, author_id, description, created_at, updated_at
            FROM comments
            WHERE id = $1 AND issue_id = $2
            "#,
        )
        .bind(id)
        .bind(issue_id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Lists all comments of an issue, oldest first
    pub async fn list_by_issue(pool: &PgPool, issue_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, issue_id, author_id, description, created_at, updated_at
            FROM comments
            WHERE issue_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(issue_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Updates a comment's body
    ///
    /// # Returns
    ///
    /// The updated comment if found, None if the id doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        description: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET description = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, issue_id, author_id, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(description)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Deletes a comment by ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
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
    fn test_create_comment_struct() {
        let issue_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let create = CreateComment {
            issue_id,
            author_id,
            description: "Looks good".to_string(),
        };

        assert_eq!(create.issue_id, issue_id);
        assert_eq!(create.description, "Looks good");
    }
}
