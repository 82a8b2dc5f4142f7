/// Collaborator (membership) endpoints
///
/// - `GET    /projects/:project_id/users` - List project members
/// - `POST   /projects/:project_id/users` - Add a collaborator (owner only)
/// - `DELETE /projects/:project_id/users/:user_id` - Remove a collaborator (owner only)

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
        membership::{CreateMembership, MemberRecord, Membership, ProjectRole},
        project::Project,
        user::User,
    },
};
use uuid::Uuid;

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: Uuid,

    /// Role to assign (defaults to contributor)
    pub role: Option<ProjectRole>,
}

async fn require_project(state: &AppState, project_id: Uuid) -> ApiResult<Project> {
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

/// Lists the members of a project
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not a member
/// - `404 Not Found`: No such project
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<MemberRecord>>> {
    require_project(&state, project_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Membership,
        Action::List,
        &Target::project(project_id),
    )
    .await?;

    let members = Membership::list_members(&state.db, project_id).await?;

    Ok(Json(members))
}

/// Adds a collaborator to a project
///
/// The owner role cannot be granted here; it exists only through project
/// creation, so every project keeps exactly one owner.
///
/// # Errors
///
/// - `400 Bad Request`: Requested role is owner
/// - `403 Forbidden`: Requester is not the project owner
/// - `404 Not Found`: No such project or user
/// - `409 Conflict`: User is already a member
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<Membership>)> {
    require_project(&state, project_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Membership,
        Action::Create,
        &Target::project(project_id),
    )
    .await?;

    let role = req.role.unwrap_or(ProjectRole::Contributor);
    if role == ProjectRole::Owner {
        return Err(ApiError::BadRequest(
            "The owner role is assigned at project creation and cannot be granted".to_string(),
        ));
    }

    User::find_by_id(&state.db, req.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // Duplicate memberships surface as a unique violation and map to 409.
    let membership = Membership::create(
        &state.db,
        CreateMembership {
            project_id,
            user_id: req.user_id,
            role,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(membership)))
}

/// Removes a collaborator from a project
///
/// The owner's own membership cannot be removed; delete the project instead.
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not the project owner
/// - `404 Not Found`: No such project or membership
/// - `409 Conflict`: Attempt to remove the owner membership
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    require_project(&state, project_id).await?;

    authorize(
        &state.db,
        auth.user_id,
        Resource::Membership,
        Action::Destroy,
        &Target::project(project_id),
    )
    .await?;

    let membership = Membership::find(&state.db, project_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Membership not found".to_string()))?;

    if membership.role == ProjectRole::Owner {
        return Err(ApiError::Conflict(
            "The project owner cannot be removed".to_string(),
        ));
    }

    Membership::delete(&state.db, project_id, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
