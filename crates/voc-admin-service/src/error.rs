//! 管理后台错误类型定义
//!
//! 包含 admin service 特有的错误类型及其 HTTP 映射

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

/// 管理后台错误类型
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    // 验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),
    #[error("必填字段未填写: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),

    // 资源不存在
    #[error("编辑会话不存在: {0}")]
    SessionNotFound(Uuid),
    #[error("聊天会话不存在: {0}")]
    ChatSessionNotFound(String),
    #[error("用户不存在: {0}")]
    UserNotFound(String),
    #[error("角色记录不存在: user_id={user_id} role={role}")]
    RoleNotFound { user_id: Uuid, role: String },
    #[error("记录不存在: {0}")]
    RowNotFound(String),
    #[error("资源不存在: {0}")]
    NotFound(String),

    // 业务冲突
    #[error("角色已授予: user_id={user_id} role={role}")]
    RoleAlreadyGranted { user_id: Uuid, role: String },

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AdminError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MissingRequiredFields(_) => StatusCode::BAD_REQUEST,

            Self::SessionNotFound(_)
            | Self::ChatSessionNotFound(_)
            | Self::UserNotFound(_)
            | Self::RoleNotFound { .. }
            | Self::RowNotFound(_)
            | Self::NotFound(_) => StatusCode::NOT_FOUND,

            Self::RoleAlreadyGranted { .. } => StatusCode::CONFLICT,

            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::MissingRequiredFields(_) => "MISSING_REQUIRED_FIELDS",
            Self::SessionNotFound(_) => "SESSION_NOT_FOUND",
            Self::ChatSessionNotFound(_) => "CHAT_SESSION_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::RoleNotFound { .. } => "ROLE_NOT_FOUND",
            Self::RowNotFound(_) => "ROW_NOT_FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::RoleAlreadyGranted { .. } => "ROLE_ALREADY_GRANTED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for AdminError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 从 JSON 序列化错误转换
impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON 处理错误: {}", err))
    }
}

/// 从促销构建核心的错误转换
impl From<promo_builder::PromoError> for AdminError {
    fn from(err: promo_builder::PromoError) -> Self {
        match err {
            promo_builder::PromoError::MissingRequiredFields(fields) => {
                Self::MissingRequiredFields(fields)
            }
        }
    }
}

/// 从共享库错误转换
impl From<voc_shared::VocError> for AdminError {
    fn from(err: voc_shared::VocError) -> Self {
        match err {
            voc_shared::VocError::Database(e) => Self::Database(e),
            voc_shared::VocError::NotFound { entity, id } => {
                Self::NotFound(format!("{} {}", entity, id))
            }
            voc_shared::VocError::Validation(msg) => Self::Validation(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    // ---- 辅助函数 ----

    /// 构造所有可简单构造的错误变体及其期望的 (StatusCode, error_code) 映射。
    /// 使用表驱动方式避免逐个变体写重复断言，新增变体时只需在一处维护。
    fn all_error_variants() -> Vec<(AdminError, StatusCode, &'static str)> {
        let uid = Uuid::nil();
        vec![
            // 参数校验
            (
                AdminError::Validation("name is required".into()),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                AdminError::MissingRequiredFields(vec!["promo_name".into()]),
                StatusCode::BAD_REQUEST,
                "MISSING_REQUIRED_FIELDS",
            ),
            // 资源不存在类：前端依赖 404 做条件跳转，错误码用于区分具体缺失资源
            (
                AdminError::SessionNotFound(uid),
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
            ),
            (
                AdminError::ChatSessionNotFound("chat-1".into()),
                StatusCode::NOT_FOUND,
                "CHAT_SESSION_NOT_FOUND",
            ),
            (
                AdminError::UserNotFound("alice".into()),
                StatusCode::NOT_FOUND,
                "USER_NOT_FOUND",
            ),
            (
                AdminError::RoleNotFound {
                    user_id: uid,
                    role: "moderator".into(),
                },
                StatusCode::NOT_FOUND,
                "ROLE_NOT_FOUND",
            ),
            (
                AdminError::RowNotFound("tier-row".into()),
                StatusCode::NOT_FOUND,
                "ROW_NOT_FOUND",
            ),
            (
                AdminError::NotFound("some resource".into()),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            // 业务冲突类：409 表示请求合法但与当前状态冲突
            (
                AdminError::RoleAlreadyGranted {
                    user_id: uid,
                    role: "admin".into(),
                },
                StatusCode::CONFLICT,
                "ROLE_ALREADY_GRANTED",
            ),
            // 系统级错误：统一 500，防止内部实现细节泄露
            (
                AdminError::Internal("unexpected state".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ]
    }

    // ---- 表驱动：全量 status_code / error_code 覆盖 ----

    /// 状态码错误会导致前端误判请求结果，需要逐一验证。
    #[test]
    fn test_all_variants_status_code() {
        for (error, expected_status, label) in all_error_variants() {
            assert_eq!(
                error.status_code(),
                expected_status,
                "状态码不匹配: variant={label}"
            );
        }
    }

    /// 错误码是 API 契约的一部分，客户端用它做条件分支，必须逐一锁定。
    #[test]
    fn test_all_variants_error_code() {
        for (error, _status, expected_code) in all_error_variants() {
            assert_eq!(
                error.error_code(),
                expected_code,
                "错误码不匹配: expected={expected_code}"
            );
        }
    }

    /// Display 输出直接作为 API 响应的 message 返回，必须包含关键上下文。
    #[test]
    fn test_display_contains_context() {
        assert!(
            AdminError::MissingRequiredFields(vec!["promo_name".into(), "valid_from".into()])
                .to_string()
                .contains("promo_name")
        );
        assert!(
            AdminError::ChatSessionNotFound("chat-9".into())
                .to_string()
                .contains("chat-9")
        );
        assert!(
            AdminError::RoleNotFound {
                user_id: Uuid::nil(),
                role: "moderator".into()
            }
            .to_string()
            .contains("moderator")
        );
    }

    // ---- IntoResponse 测试 ----

    /// IntoResponse 是错误到 HTTP 响应的最终出口。
    /// 必须验证：状态码正确、响应体结构完整（success/code/message/data 四字段）。
    #[tokio::test]
    async fn test_into_response_body_structure() {
        for (error, expected_status, expected_code) in all_error_variants() {
            let label = format!("{:?}", error);
            let response = error.into_response();

            assert_eq!(
                response.status(),
                expected_status,
                "响应状态码不匹配: {label}"
            );

            let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("读取响应体失败");
            let body: serde_json::Value =
                serde_json::from_slice(&body_bytes).expect("响应体不是合法 JSON");

            assert_eq!(body["success"], json!(false), "success 应为 false: {label}");
            assert_eq!(body["code"], json!(expected_code), "code 不匹配: {label}");
            assert!(
                !body["message"].as_str().unwrap_or("").is_empty(),
                "message 不应为空: {label}"
            );
            assert!(body["data"].is_null(), "data 字段应为 null: {label}");
        }
    }

    /// 系统级错误的响应消息不应泄露内部细节，只返回通用提示。
    #[tokio::test]
    async fn test_system_errors_hide_internal_details() {
        let error = AdminError::Internal("stack overflow at module X".into());
        let response = error.into_response();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("读取响应体失败");
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        let message = body["message"].as_str().unwrap();

        assert!(!message.contains("stack overflow"));
        assert!(message.contains("服务内部错误"));
    }

    // ---- From 转换测试 ----

    #[test]
    fn test_from_promo_error() {
        let err: AdminError = promo_builder::PromoError::MissingRequiredFields(vec![
            "client_id".to_string(),
        ])
        .into();
        assert!(matches!(err, AdminError::MissingRequiredFields(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::{ValidationError, ValidationErrors};

        let mut errors = ValidationErrors::new();
        let mut field_error = ValidationError::new("length");
        field_error.message = Some("名称长度不能超过 50 个字符".into());
        errors.add("brandName", field_error);

        let admin_error: AdminError = errors.into();
        match &admin_error {
            AdminError::Validation(msg) => {
                assert!(msg.contains("brandName"), "转换后应保留字段名: {msg}");
            }
            other => panic!("期望 Validation 变体，实际: {:?}", other),
        }
        assert_eq!(admin_error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_from_shared_error_database_stays_database() {
        let err: AdminError = voc_shared::VocError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, AdminError::Database(_)));
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_from_sqlx_error() {
        let err = AdminError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AdminError::Database(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
