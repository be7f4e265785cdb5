//! 管理后台响应 DTO 定义
//!
//! 所有 REST API 的响应体结构。
//! 七类配置的 DTO 同时用作保存请求体：按属主整体覆盖保存，
//! 请求和响应的字段形状一致。

use chrono::{DateTime, Utc};
use promo_builder::PromoForm;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::livechat::{ChatEntry, ChatMessageRecord};

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 创建成功响应（无数据）
    pub fn success_empty() -> ApiResponse<()> {
        ApiResponse {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: None,
        }
    }

    /// 创建成功响应（自定义消息）
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

// ==================== 客服配置 ====================

/// 品牌档案
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfileDto {
    #[validate(length(max = 100, message = "品牌名称不能超过 100 个字符"))]
    pub brand_name: String,
    #[validate(length(max = 50, message = "简称不能超过 50 个字符"))]
    pub short_name: String,
    pub slogan: String,
    #[validate(length(max = 50, message = "客服名称不能超过 50 个字符"))]
    pub agent_name: String,
    pub agent_gender: String,
    pub tone_style: String,
    pub default_call_to_player: String,
    pub emoji_preference: String,
}

/// 沟通风格
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationStyleDto {
    #[validate(range(min = 1, max = 10, message = "正式程度取值 1-10"))]
    pub formality_level: i32,
    #[validate(range(min = 1, max = 10, message = "亲和程度取值 1-10"))]
    pub warmth_level: i32,
    pub humor_usage: String,
    pub emoji_style: String,
}

/// 升级转人工
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupportEscalationDto {
    pub admin_contact_method: String,
    pub admin_contact: String,
    pub pic_active_hours: String,
    pub escalation_threshold: Vec<String>,
    pub sop_style: String,
    pub default_escalation_message: String,
}

/// 安全与危机设置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SafetyCrisisDto {
    pub crisis_tone_style: String,
    pub bonus_preventif_allowed: bool,
    pub bonus_preventif_limit: String,
    #[validate(range(min = 0, max = 100, message = "风险偏好取值 0-100"))]
    pub risk_appetite: i32,
    pub forbidden_phrases: String,
    pub allowed_sensitive_terms: String,
    pub crisis_keywords: String,
    pub crisis_response_template: String,
}

/// 玩家行为设置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBehaviourDto {
    #[validate(range(min = 1, max = 10, message = "个性化程度取值 1-10"))]
    pub personalization_level: i32,
    pub sentimental_memory: bool,
    #[validate(range(min = 1, max = 10, message = "反猎手力度取值 1-10"))]
    pub anti_hunter_aggressiveness: i32,
    pub silent_sniper_style: Vec<String>,
    pub vip_threshold: String,
    pub vip_tone: Vec<String>,
}

/// 账号信息
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    #[validate(length(max = 100, message = "用户名不能超过 100 个字符"))]
    pub user_name: String,
    pub whatsapp_number: String,
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    pub position: String,
}

/// 外部 API 凭据
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApiDataDto {
    pub supabase_api: String,
    pub chat_gpt_api: String,
}

/// 七类配置的合并视图
///
/// 某类配置尚无记录时对应键为 null。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocConfigDto {
    pub brand_profile: Option<BrandProfileDto>,
    pub communication_style: Option<CommunicationStyleDto>,
    pub support_escalation: Option<SupportEscalationDto>,
    pub safety_crisis: Option<SafetyCrisisDto>,
    pub player_behaviour: Option<PlayerBehaviourDto>,
    pub account: Option<AccountDto>,
    pub api_data: Option<ApiDataDto>,
}

// ==================== 促销向导 ====================

/// 促销编辑会话视图
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoSessionDto {
    pub id: Uuid,
    pub step: u8,
    pub step_title: &'static str,
    pub total_steps: u8,
    /// 表单状态（字段名保持领域内的 snake_case）
    pub form: PromoForm,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&crate::state::PromoSession> for PromoSessionDto {
    fn from(session: &crate::state::PromoSession) -> Self {
        Self {
            id: session.id,
            step: session.step,
            step_title: session.step_title(),
            total_steps: crate::state::TOTAL_STEPS,
            form: session.form.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

// ==================== 实时会话 ====================

/// 聊天消息视图
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: String,
    pub sender: String,
    pub sender_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

impl From<&ChatMessageRecord> for ChatMessageDto {
    fn from(record: &ChatMessageRecord) -> Self {
        Self {
            id: record.id.clone(),
            sender: record.sender.clone(),
            sender_name: record.sender_name.clone().unwrap_or_default(),
            message: record.message.clone(),
            timestamp: record.timestamp,
            is_read: record.is_read.unwrap_or(false),
        }
    }
}

/// 聊天会话视图（含消息）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionDto {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub location: String,
    pub local_time: String,
    pub last_message: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub unread_count: i32,
    pub tags: Vec<String>,
    pub source: String,
    pub chat_duration: String,
    pub is_first_visit: bool,
    pub device: String,
    pub browser: String,
    pub groups: Vec<String>,
    pub messages: Vec<ChatMessageDto>,
}

impl From<&ChatEntry> for ChatSessionDto {
    fn from(entry: &ChatEntry) -> Self {
        let session = &entry.session;
        Self {
            id: session.id.clone(),
            user_id: session.user_id.clone(),
            user_name: session.user_name.clone(),
            user_email: session.user_email.clone().unwrap_or_default(),
            location: session.location.clone().unwrap_or_default(),
            local_time: session.local_time.clone().unwrap_or_default(),
            last_message: session.last_message.clone().unwrap_or_default(),
            timestamp: session.timestamp,
            status: session.status.clone(),
            unread_count: session.unread_count.unwrap_or(0),
            tags: session.tags.clone().unwrap_or_default(),
            source: session.source.clone().unwrap_or_default(),
            chat_duration: session.chat_duration.clone().unwrap_or_default(),
            is_first_visit: session.is_first_visit.unwrap_or(false),
            device: session.device.clone().unwrap_or_default(),
            browser: session.browser.clone().unwrap_or_default(),
            groups: session.groups.clone().unwrap_or_default(),
            messages: entry.messages.iter().map(ChatMessageDto::from).collect(),
        }
    }
}

// ==================== 用户与角色 ====================

/// 后台用户视图
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserDto {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

/// 用户角色视图
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRoleDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_response_success_shape() {
        let response = ApiResponse::success(vec![1, 2, 3]);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["code"], json!("SUCCESS"));
        assert_eq!(value["data"], json!([1, 2, 3]));
    }

    #[test]
    fn test_api_response_empty_omits_data() {
        let response = ApiResponse::<()>::success_empty();
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_config_dto_camel_case() {
        let dto = BrandProfileDto {
            brand_name: "Warganet77".to_string(),
            short_name: "WG77".to_string(),
            slogan: String::new(),
            agent_name: "Sasa".to_string(),
            agent_gender: "female".to_string(),
            tone_style: "santai".to_string(),
            default_call_to_player: "bos".to_string(),
            emoji_preference: "hemat".to_string(),
        };
        let value = serde_json::to_value(&dto).unwrap();
        assert!(value.get("brandName").is_some());
        assert!(value.get("defaultCallToPlayer").is_some());
        assert!(value.get("brand_name").is_none());
    }

    #[test]
    fn test_promo_session_dto_from_session() {
        let session = crate::state::PromoSession::new();
        let dto = PromoSessionDto::from(&session);
        assert_eq!(dto.step, 1);
        assert_eq!(dto.total_steps, 5);
        assert_eq!(dto.step_title, "Identitas Promo");
    }
}
