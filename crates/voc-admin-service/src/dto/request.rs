//! 管理后台请求 DTO 定义
//!
//! 所有 REST API 的请求参数和请求体结构。
//! 七类配置的保存请求直接复用 `response` 中的配置 DTO（整体覆盖保存，
//! 请求与响应形状一致），此处只定义促销向导和用户角色相关的请求。

use promo_builder::{
    CalculationMethod, ExpMode, LevelField, MissionField, OptionField, PointUnit, RewardMode,
    TierField,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// 促销表单字段的部分更新请求
///
/// 只有携带的字段会写入表单，未携带的字段保持不变。
/// 数值类字段以原始文本提交，解析推迟到文档生成阶段。
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromoFieldsRequest {
    // 标识与分类
    pub client_id: Option<String>,
    #[validate(length(max = 200, message = "促销名称不能超过 200 个字符"))]
    pub promo_name: Option<String>,
    pub promo_type: Option<String>,
    pub intent_category: Option<String>,
    pub target_segment: Option<String>,
    pub trigger_event: Option<String>,

    // 奖励模式
    pub reward_mode: Option<RewardMode>,
    pub reward_type: Option<String>,
    pub reward_amount: Option<String>,
    pub min_requirement: Option<String>,
    pub max_claim: Option<String>,
    pub turnover_rule: Option<String>,
    pub claim_frequency: Option<String>,
    pub conversion_formula: Option<String>,

    // 限制与有效期
    pub platform_access: Option<String>,
    pub game_restriction: Option<String>,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
    pub status: Option<String>,
    pub require_apk: Option<bool>,
    pub geo_restriction: Option<String>,
    pub time_restriction: Option<String>,

    // AI 话术模板
    pub response_template_offer: Option<String>,
    pub response_template_requirement: Option<String>,
    pub response_template_instruction: Option<String>,
    pub ai_guidelines: Option<String>,
    pub default_behavior: Option<String>,
    pub completion_steps: Option<String>,

    // Tier 子模型
    pub point_unit: Option<PointUnit>,
    pub exp_mode: Option<ExpMode>,
    pub calculation_method: Option<CalculationMethod>,
    pub lp_formula_input: Option<String>,
    pub lp_formula_output: Option<String>,
    pub lp_formula_input_lp: Option<String>,
    pub lp_formula_output_lp: Option<String>,
    pub exp_formula_input: Option<String>,
    pub exp_formula_output: Option<String>,
    pub custom_lp_formula: Option<String>,
    pub lp_conversion_value: Option<String>,
    pub lp_conversion_type: Option<String>,
    pub reward_distribution: Option<String>,
    pub level_up_rewards_enabled: Option<bool>,
    pub custom_terms: Option<String>,
}

/// VIP 倍率更新请求（Bronze 锁定为零，不可提交）
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VipMultiplierRequest {
    pub enabled: Option<bool>,
    pub min_daily_to: Option<String>,
    pub silver: Option<String>,
    pub gold: Option<String>,
    pub platinum: Option<String>,
    pub diamond: Option<String>,
}

/// 跳转到指定步骤
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetStepRequest {
    #[validate(range(min = 1, max = 5, message = "步骤取值 1-5"))]
    pub step: u8,
}

/// 奖励表行的单列更新
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierRowUpdateRequest {
    pub field: TierField,
    pub value: String,
}

/// Fast EXP 任务的单列更新
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionUpdateRequest {
    pub field: MissionField,
    pub value: String,
}

/// 升级奖励的单列更新
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpUpdateRequest {
    pub field: LevelField,
    pub value: String,
}

/// 追加自定义下拉选项
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCustomOptionRequest {
    pub field: OptionField,
    #[validate(length(min = 1, max = 100, message = "选项内容长度必须在 1-100 个字符之间"))]
    pub value: String,
}

/// 授予用户角色
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRoleRequest {
    pub user_id: Uuid,
    #[validate(custom(function = validate_role))]
    pub role: String,
}

/// 角色取值校验：admin | moderator | user
fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    match role {
        "admin" | "moderator" | "user" => Ok(()),
        _ => {
            let mut err = validator::ValidationError::new("role");
            err.message = Some("角色必须是 admin、moderator 或 user 之一".into());
            Err(err)
        }
    }
}
