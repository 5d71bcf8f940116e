use crate::{
    domain::models::access_control::{RoleItem, SubjectType},
    infrastructure::http::middleware::{ApiError, ApiResult, AppState, AuthenticatedUser},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct RoleListQuery {
    #[serde(default)]
    pub q: String,
}

const DEFAULT_SUGGESTION_LIMIT: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub input: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CacheKeyResponse {
    pub key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSubjectsRequest {
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
    /// Free-form list, e.g. `"alice, bob; carol"`.
    pub subjects: String,
}

pub async fn list_roles(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Path(organization): Path<String>,
    Query(query): Query<RoleListQuery>,
) -> ApiResult<Json<Vec<RoleItem>>> {
    let roles = state
        .access_control_service
        .list_roles(&auth_user.user, &organization, &query.q)
        .await?;
    Ok(Json(roles))
}

pub async fn get_roles_cache_key(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Path(organization): Path<String>,
) -> Json<CacheKeyResponse> {
    let key = state
        .access_control_service
        .roles_key(Some(&auth_user.user), &organization);
    Json(CacheKeyResponse { key })
}

pub async fn get_role(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Path((organization, role)): Path<(String, String)>,
) -> ApiResult<Json<RoleItem>> {
    let role = state
        .access_control_service
        .get_role(&auth_user.user, &organization, &role)
        .await?;
    Ok(Json(role))
}

pub async fn add_subjects(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Path((organization, role)): Path<(String, String)>,
    Json(request): Json<AddSubjectsRequest>,
) -> ApiResult<(StatusCode, Json<RoleItem>)> {
    let role = state
        .access_control_service
        .add_subjects(
            &auth_user.user,
            &organization,
            &role,
            request.subject_type,
            &request.subjects,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn remove_subject(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Path((organization, role, subject_type, subject)): Path<(String, String, String, String)>,
) -> ApiResult<StatusCode> {
    let subject_type = SubjectType::parse(&subject_type).ok_or_else(|| {
        ApiError::BadRequest(format!("Unknown subject type: {}", subject_type))
    })?;

    state
        .access_control_service
        .remove_subject(&auth_user.user, &organization, &role, subject_type, &subject)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_service_account_suggestions(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Path(organization): Path<String>,
    Query(query): Query<SuggestionQuery>,
) -> ApiResult<Json<Vec<String>>> {
    let suggestions = state
        .access_control_service
        .service_account_suggestions(
            &auth_user.user,
            &organization,
            &query.input,
            query.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT),
        )
        .await?;
    Ok(Json(suggestions))
}
