/// Issue endpoints, nested under a project
///
/// - `GET    /projects/:project_id/issues` - List project issues
/// - `POST   /projects/:project_id/issues` - Create an issue (members only)
/// - `GET    /projects/:project_id/issues/:issue_id` - Retrieve an issue
/// - `PUT    /projects/:project_id/issues/:issue_id` - Update (author only)
/// - `DELETE /projects/:project_id/issues/:issue_id` - Delete (author only)
///
/// An issue id that exists but belongs to a different project than the path
/// names is treated as not found.

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
        issue::{CreateIssue, Issue, IssueStatus, IssueTag, UpdateIssue},
        membership::Membership,
        project::Project,
    },
};
use uuid::Uuid;

/// Create issue request
#[derive(Debug, Deserialize)]
pub struct CreateIssueRequest {
    /// Issue title
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Classification tag
    pub tag: IssueTag,

    /// Numeric priority
    #[serde(default)]
    pub priority: i32,

    /// Assignee; defaults to the author
    pub assignee_id: Option<Uuid>,
}

/// Update issue request
#[derive(Debug, Deserialize)]
pub struct UpdateIssueRequest {
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

async fn require_project(state: &AppState, project_id: Uuid) -> ApiResult<Project> {
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

async fn require_issue(state: &AppState, issue_id: Uuid, project_id: Uuid) -> ApiResult<Issue> {
    Issue::find_in_project(&state.db, issue_id, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Issue not found".to_string()))
}

/// Lists all issues of a project, oldest first
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not a member
/// - `404 Not Found`: No such project
pub async fn list_issues(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Issue>>> {
    require_project(&state, project_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Issue,
        Action::List,
        &Target::project(project_id),
    )
    .await?;

    let issues = Issue::list_by_project(&state.db, project_id).await?;

    Ok(Json(issues))
}

/// Creates an issue in a project
///
/// The requester becomes the author. The assignee defaults to the author
/// and, when given, must be a member of the project.
///
/// # Errors
///
/// - `400 Bad Request`: Empty title or non-member assignee
/// - `403 Forbidden`: Requester is not a member
/// - `404 Not Found`: No such project
pub async fn create_issue(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateIssueRequest>,
) -> ApiResult<(StatusCode, Json<Issue>)> {
    require_project(&state, project_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Issue,
        Action::Create,
        &Target::project(project_id),
    )
    .await?;

    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title must not be empty".to_string()));
    }

    if let Some(assignee_id) = req.assignee_id {
        let is_member = Membership::has_member(&state.db, project_id, assignee_id).await?;
        if !is_member {
            return Err(ApiError::BadRequest(
                "Assignee must be a member of the project".to_string(),
            ));
        }
    }

    let issue = Issue::create(
        &state.db,
        CreateIssue {
            project_id,
            author_id: auth.user_id,
            assignee_id: req.assignee_id,
            title: req.title,
            description: req.description,
            tag: req.tag,
            priority: req.priority,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(issue)))
}

/// Retrieves a single issue
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not a member
/// - `404 Not Found`: No such issue in this project
pub async fn get_issue(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, issue_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Issue>> {
    require_project(&state, project_id).await?;
    let issue = require_issue(&state, issue_id, project_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Issue,
        Action::Retrieve,
        &Target::project(project_id),
    )
    .await?;

    Ok(Json(issue))
}

/// Updates an issue
///
/// Only the issue's author may update it; authorship is kept even if the
/// author later loses project membership.
///
/// # Errors
///
/// - `400 Bad Request`: Non-member assignee
/// - `403 Forbidden`: Requester is not the author
/// - `404 Not Found`: No such issue in this project
pub async fn update_issue(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, issue_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateIssueRequest>,
) -> ApiResult<Json<Issue>> {
    require_project(&state, project_id).await?;
    let issue = require_issue(&state, issue_id, project_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Issue,
        Action::Update,
        &Target::authored(project_id, issue.author_id),
    )
    .await?;

    if let Some(assignee_id) = req.assignee_id {
        let is_member = Membership::has_member(&state.db, project_id, assignee_id).await?;
        if !is_member {
            return Err(ApiError::BadRequest(
                "Assignee must be a member of the project".to_string(),
            ));
        }
    }

    let issue = Issue::update(
        &state.db,
        issue_id,
        UpdateIssue {
            title: req.title,
            description: req.description,
            tag: req.tag,
            priority: req.priority,
            status: req.status,
            assignee_id: req.assignee_id,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Issue not found".to_string()))?;

    Ok(Json(issue))
}

/// Deletes an issue
///
/// Comments cascade.
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not the author
/// - `404 Not Found`: No such issue in this project
pub async fn delete_issue(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, issue_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    require_project(&state, project_id).await?;
    let issue = require_issue(&state, issue_id, project_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Issue,
        Action::Destroy,
        &Target::authored(project_id, issue.author_id),
    )
    .await?;

    Issue::delete(&state.db, issue_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
