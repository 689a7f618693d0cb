// ============================================================================
// Groups API - User Group Handlers
// File: crates/groups-api/src/handlers/groups.rs
// ============================================================================
//! CRUD and membership endpoints for user groups

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use groups_core::{Group, GroupPatch, RelationshipKind};
use groups_shared::Paginated;

use crate::error::ApiError;
use crate::extract::CurrentActor;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Create group request payload
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
}

/// User group DTO for responses
#[derive(Debug, Serialize)]
pub struct GroupDto {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub version: i64,
    pub users: Vec<Uuid>,
    pub assistants: Vec<Uuid>,
    pub services: Vec<Uuid>,
    pub groups: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<&Group> for GroupDto {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            tenant_id: group.tenant_id,
            name: group.name.clone(),
            version: group.version,
            users: group.member_ids(RelationshipKind::Users),
            assistants: group.member_ids(RelationshipKind::Assistants),
            services: group.member_ids(RelationshipKind::Services),
            groups: group.member_ids(RelationshipKind::Groups),
            created_at: group.created_at,
            modified_at: group.modified_at,
        }
    }
}

type GroupResponse = Json<ApiResponse<GroupDto>>;

/// List groups - GET /api/v1/groups
pub async fn list_groups(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<ApiResponse<Paginated<GroupDto>>>, ApiError> {
    let groups = state.groups.list_groups(&actor).await?;
    let items: Vec<GroupDto> = groups.iter().map(GroupDto::from).collect();
    Ok(Json(ApiResponse::success(Paginated::new(items))))
}

/// Create group - POST /api/v1/groups
pub async fn create_group(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<(StatusCode, GroupResponse), ApiError> {
    let group = state.groups.create_group(&actor, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(GroupDto::from(&group)))))
}

/// Get group - GET /api/v1/groups/{id}
pub async fn get_group(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<GroupResponse, ApiError> {
    let group = state.groups.get_group(&actor, id).await?;
    Ok(Json(ApiResponse::success(GroupDto::from(&group))))
}

/// Update group - PATCH /api/v1/groups/{id}
pub async fn update_group(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
    Json(patch): Json<GroupPatch>,
) -> Result<GroupResponse, ApiError> {
    let group = state.groups.update_group(&actor, id, patch).await?;
    Ok(Json(ApiResponse::success(GroupDto::from(&group))))
}

/// Delete group - DELETE /api/v1/groups/{id}
pub async fn delete_group(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.groups.delete_group(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add member - POST /api/v1/groups/{id}/{kind}/{member_id}
pub async fn add_member(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path((id, kind, member_id)): Path<(Uuid, RelationshipKind, Uuid)>,
) -> Result<GroupResponse, ApiError> {
    let group = state.groups.add_member(&actor, id, kind, member_id).await?;
    Ok(Json(ApiResponse::success(GroupDto::from(&group))))
}

/// Remove member - DELETE /api/v1/groups/{id}/{kind}/{member_id}
pub async fn remove_member(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path((id, kind, member_id)): Path<(Uuid, RelationshipKind, Uuid)>,
) -> Result<GroupResponse, ApiError> {
    let group = state.groups.remove_member(&actor, id, kind, member_id).await?;
    Ok(Json(ApiResponse::success(GroupDto::from(&group))))
}
