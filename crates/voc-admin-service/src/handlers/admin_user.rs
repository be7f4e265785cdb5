//! 用户与角色 API 处理器
//!
//! 后台用户列表与角色授予/回收。只维护记录本身，
//! 登录认证流程由外部身份系统负责，不在本服务范围内。

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{AddUserRoleRequest, AdminUserDto, ApiResponse, UserRoleDto},
    error::AdminError,
    state::AppState,
};

/// 用户列表（按创建时间倒序）
///
/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AdminUserDto>>>, AdminError> {
    let users = sqlx::query_as::<_, AdminUserDto>(
        r#"
        SELECT id, email, created_at, last_sign_in_at
        FROM dashboard_users
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success(users)))
}

/// 全部角色记录
///
/// GET /api/admin/user-roles
pub async fn list_roles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserRoleDto>>>, AdminError> {
    let roles = sqlx::query_as::<_, UserRoleDto>(
        r#"
        SELECT id, user_id, role, created_at
        FROM user_roles
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success(roles)))
}

/// 授予角色
///
/// POST /api/admin/user-roles
pub async fn add_role(
    State(state): State<AppState>,
    Json(req): Json<AddUserRoleRequest>,
) -> Result<Json<ApiResponse<UserRoleDto>>, AdminError> {
    req.validate()?;

    // 目标用户必须已存在于用户记录中
    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM dashboard_users WHERE id = $1")
        .bind(req.user_id)
        .fetch_optional(&state.pool)
        .await?;
    if exists.is_none() {
        return Err(AdminError::UserNotFound(req.user_id.to_string()));
    }

    let inserted = sqlx::query_as::<_, UserRoleDto>(
        r#"
        INSERT INTO user_roles (user_id, role)
        VALUES ($1, $2)
        ON CONFLICT (user_id, role) DO NOTHING
        RETURNING id, user_id, role, created_at
        "#,
    )
    .bind(req.user_id)
    .bind(&req.role)
    .fetch_optional(&state.pool)
    .await?;

    let Some(role) = inserted else {
        return Err(AdminError::RoleAlreadyGranted {
            user_id: req.user_id,
            role: req.role,
        });
    };

    info!(user_id = %role.user_id, role = %role.role, "User role granted");
    Ok(Json(ApiResponse::success(role)))
}

/// 回收角色
///
/// DELETE /api/admin/users/:user_id/roles/:role
pub async fn remove_role(
    State(state): State<AppState>,
    Path((user_id, role)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role = $2")
        .bind(user_id)
        .bind(&role)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AdminError::RoleNotFound { user_id, role });
    }

    info!(%user_id, %role, "User role revoked");
    Ok(Json(ApiResponse::<()>::success_empty()))
}
