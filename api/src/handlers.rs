//! Route handlers
//!
//! Thin adapters: deserialize, call the service with the extracted
//! principal, project the result. No business logic lives here.

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::models::*;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use stackd_template::StackTemplate;

type ApiResult<T> = Result<T, ApiError>;

// Health

pub async fn ping() -> Json<&'static str> {
    Json("pong")
}

pub async fn healthcheck(State(state): State<AppState>) -> Json<HealthcheckResult> {
    Json(HealthcheckResult {
        healthy: state.stacks.ping().await,
    })
}

// Tokens

pub async fn create_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> ApiResult<Json<TokenResult>> {
    let token = state.identity.authenticate(&body.name, &body.password).await?;
    Ok(Json(TokenResult { token }))
}

/// Issue the one-time bootstrap token. Offered only while the credential
/// store is empty.
pub async fn create_bootstrap_token(
    State(state): State<AppState>,
) -> ApiResult<Json<TokenResult>> {
    if !state.identity.is_store_empty().await? {
        return Err(ApiError::bad_request("Bootstrap is only available before any user exists."));
    }
    let token = state.identity.issue_bootstrap_token()?;
    Ok(Json(TokenResult { token }))
}

// Users

pub async fn create_user(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    let user = state
        .identity
        .create_user(&actor, &body.name, &body.password, body.role)
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn update_user(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserView>> {
    let user = state
        .identity
        .update_user(&actor, &name, body.password.as_deref(), body.role)
        .await?;
    Ok(Json(user.into()))
}

pub async fn list_users(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserView>>> {
    let users = state.identity.list_users(&actor).await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

// Stacks

pub async fn list_stacks(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<stackd_stacks::Stack>>> {
    Ok(Json(state.stacks.list_stacks(&actor, None).await?))
}

pub async fn create_stack(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateStackRequest>,
) -> ApiResult<Json<StackCreationResult>> {
    let name = body.stack_name.as_deref();

    let stack_name = match (&body.template_name, &body.spec) {
        (Some(template), None) => {
            let path = state
                .templates
                .get_template_path_by_name(template)
                .await?
                .ok_or_else(|| {
                    ApiError::bad_request(format!("Template '{}' not found", template))
                })?;
            state
                .stacks
                .create_from_template_path(&actor, &path, name)
                .await?
        }
        (None, Some(spec)) => {
            state
                .stacks
                .create_from_template_data(&actor, spec, name)
                .await?
        }
        _ => {
            return Err(ApiError::bad_request(
                "Exactly one of templateName or spec is required",
            ))
        }
    };

    Ok(Json(StackCreationResult { stack_name }))
}

pub async fn get_stack(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<stackd_stacks::Stack>> {
    state
        .stacks
        .get_stack_by_name(&actor, &name)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::not_found(format!("Stack '{}' not found for user '{}'.", name, actor.name))
        })
}

pub async fn delete_stack(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<DeletionResult>> {
    let deleted = state.stacks.remove_stack_by_name(&actor, &name).await?;
    if !deleted {
        return Err(ApiError::not_found(format!(
            "Stack '{}' not found for user '{}'.",
            name, actor.name
        )));
    }
    Ok(Json(DeletionResult { success: true }))
}

// Engine administration

pub async fn list_engine_stacks(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<stackd_engine::CliStackRecord>>> {
    Ok(Json(state.stacks.list_engine_stacks(&actor).await?))
}

pub async fn prune(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> ApiResult<Json<DeletionResult>> {
    state.stacks.prune(&actor).await?;
    Ok(Json(DeletionResult { success: true }))
}

// Templates

pub async fn list_templates(
    CurrentUser(_actor): CurrentUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<StackTemplate>>> {
    Ok(Json(state.templates.get_templates().await?))
}

pub async fn get_template(
    CurrentUser(_actor): CurrentUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<StackTemplate>> {
    state
        .templates
        .get_template_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Template '{}' not found", name)))
}

pub async fn create_template(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateTemplateRequest>,
) -> ApiResult<(StatusCode, Json<StackTemplate>)> {
    let template = state
        .templates
        .create_template(&actor, &body.name, &body.data)
        .await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn update_template(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<UpdateTemplateRequest>,
) -> ApiResult<Json<StackTemplate>> {
    let template = state
        .templates
        .update_template(&actor, &name, &body.data)
        .await?;
    Ok(Json(template))
}

pub async fn delete_template(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<DeletionResult>> {
    let deleted = state.templates.delete_template(&actor, &name).await?;
    if !deleted {
        return Err(ApiError::not_found(format!("Template '{}' not found", name)));
    }
    Ok(Json(DeletionResult { success: true }))
}

// Config

pub async fn get_config(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.config.get_config(&actor).await?))
}

pub async fn update_config(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.config.update_config(&actor, body).await?))
}
