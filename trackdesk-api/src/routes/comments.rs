/// Comment endpoints, nested under an issue
///
/// - `GET    .../issues/:issue_id/comments` - List comments
/// - `POST   .../issues/:issue_id/comments` - Create a comment (members only)
/// - `GET    .../issues/:issue_id/comments/:comment_id` - Retrieve a comment
/// - `PUT    .../issues/:issue_id/comments/:comment_id` - Update (member author only)
/// - `DELETE .../issues/:issue_id/comments/:comment_id` - Delete (member author only)
///
/// Both parent ids are verified: an issue outside the path's project, or a
/// comment outside the path's issue, is treated as not found.

use crate::{app::AppState, error::{ApiError, ApiResult}};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use trackdesk_shared::{
    auth::{
        authorization::{authorize, Action, Resource, Target},
        middleware::AuthContext,
    },
    models::{
        comment::{Comment, CreateComment},
        issue::Issue,
        project::Project,
    },
};
use uuid::Uuid;

/// Create comment request
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    /// Comment body
    pub description: String,
}

/// Update comment request
#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    /// New comment body
    pub description: String,
}

async fn require_issue_chain(
    state: &AppState,
    project_id: Uuid,
    issue_id: Uuid,
) -> ApiResult<Issue> {
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Issue::find_in_project(&state.db, issue_id, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Issue not found".to_string()))
}

async fn require_comment(state: &AppState, comment_id: Uuid, issue_id: Uuid) -> ApiResult<Comment> {
    Comment::find_in_issue(&state.db, comment_id, issue_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))
}

/// Lists all comments of an issue, oldest first
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not a member
/// - `404 Not Found`: No such project or issue
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, issue_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<Comment>>> {
    require_issue_chain(&state, project_id, issue_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Comment,
        Action::List,
        &Target::project(project_id),
    )
    .await?;

    let comments = Comment::list_by_issue(&state.db, issue_id).await?;

    Ok(Json(comments))
}

/// Creates a comment on an issue
///
/// # Errors
///
/// - `400 Bad Request`: Empty body
/// - `403 Forbidden`: Requester is not a member
/// - `404 Not Found`: No such project or issue
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, issue_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    require_issue_chain(&state, project_id, issue_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Comment,
        Action::Create,
        &Target::project(project_id),
    )
    .await?;

    if req.description.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Description must not be empty".to_string(),
        ));
    }

    let comment = Comment::create(
        &state.db,
        CreateComment {
            issue_id,
            author_id: auth.user_id,
            description: req.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Retrieves a single comment
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not a member
/// - `404 Not Found`: No such project, issue, or comment
pub async fn get_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, issue_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<Json<Comment>> {
    require_issue_chain(&state, project_id, issue_id).await?;
    let comment = require_comment(&state, comment_id, issue_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Comment,
        Action::Retrieve,
        &Target::project(project_id),
    )
    .await?;

    Ok(Json(comment))
}

/// Updates a comment's body
///
/// Requires being both the comment's author and still a member of the
/// project.
///
/// # Errors
///
/// - `400 Bad Request`: Empty body
/// - `403 Forbidden`: Requester is not the author, or no longer a member
/// - `404 Not Found`: No such project, issue, or comment
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, issue_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<UpdateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    require_issue_chain(&state, project_id, issue_id).await?;
    let comment = require_comment(&state, comment_id, issue_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Comment,
        Action::Update,
        &Target::authored(project_id, comment.author_id),
    )
    .await?;

    if req.description.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Description must not be empty".to_string(),
        ));
    }

    let comment = Comment::update(&state.db, comment_id, &req.description)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    Ok(Json(comment))
}

/// Deletes a comment
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not the author, or no longer a member
/// - `404 Not Found`: No such project, issue, or comment
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, issue_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    require_issue_chain(&state, project_id, issue_id).await?;
    let comment = require_comment(&state, comment_id, issue_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Comment,
        Action::Destroy,
        &Target::authored(project_id, comment.author_id),
    )
    .await?;

    Comment::delete(&state.db, comment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
