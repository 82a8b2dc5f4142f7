/// Project endpoints
///
/// - `GET    /projects` - List projects the user is a member of
/// - `POST   /projects` - Create a project (creator becomes owner)
/// - `GET    /projects/:project_id` - Retrieve a project (members only)
/// - `PUT    /projects/:project_id` - Update a project (owner only)
/// - `DELETE /projects/:project_id` - Delete a project (owner only)

use crate::{app::AppState, error::{ApiError, ApiResult}};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use trackdesk_shared::{
    auth::{
        authorization::{authorize, Action, Resource, Target},
        middleware::AuthContext,
    },
    models::project::{CreateProject, Project, ProjectCategory, UpdateProject},
};
use uuid::Uuid;

/// Create project request
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// Project title
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Project category
    pub category: ProjectCategory,
}

/// Update project request
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateProjectRequest {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New category
    pub category: Option<ProjectCategory>,
}

/// Lists the projects the authenticated user belongs to
///
/// Restriction happens in the query itself: only projects where the user
/// holds a membership are returned, in creation order.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = Project::list_for_user(&state.db, auth.user_id).await?;

    Ok(Json(projects))
}

/// Creates a project
///
/// The creator is granted the owner role in the same transaction that
/// inserts the project.
///
/// # Errors
///
/// - `400 Bad Request`: Empty title
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title must not be empty".to_string()));
    }

    let project = Project::create_with_owner(
        &state.db,
        CreateProject {
            title: req.title,
            description: req.description,
            category: req.category,
        },
        auth.user_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Retrieves a single project
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not a member
/// - `404 Not Found`: No such project
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Project,
        Action::Retrieve,
        &Target::project(project_id),
    )
    .await?;

    Ok(Json(project))
}

/// Updates a project's metadata
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not an owner
/// - `404 Not Found`: No such project
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    // Existence first so members and strangers both see 404 on a bad id.
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Project,
        Action::Update,
        &Target::project(project_id),
    )
    .await?;

    let project = Project::update(
        &state.db,
        project_id,
        UpdateProject {
            title: req.title,
            description: req.description,
            category: req.category,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Deletes a project
///
/// Memberships, issues, and comments cascade.
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not an owner
/// - `404 Not Found`: No such project
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Project,
        Action::Destroy,
        &Target::project(project_id),
    )
    .await?;

    Project::delete(&state.db, project_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
