//! 提交完整性校验
//!
//! 最终提交前的必填字段门槛：标识字段 + 平台/游戏/生效日期 + 话术模板。
//! 校验返回具体缺失的字段名集合，由调用方决定如何呈现。

use crate::error::{PromoError, Result};
use crate::model::PromoForm;

/// 提交必填字段（字段名与表单字段一致）
pub const REQUIRED_FIELDS: [&str; 10] = [
    "client_id",
    "promo_name",
    "promo_type",
    "intent_category",
    "target_segment",
    "trigger_event",
    "platform_access",
    "game_restriction",
    "valid_from",
    "response_template_offer",
];

/// 返回尚未填写的必填字段名
pub fn missing_required_fields(form: &PromoForm) -> Vec<&'static str> {
    let checks: [(&'static str, &str); 10] = [
        ("client_id", &form.client_id),
        ("promo_name", &form.promo_name),
        ("promo_type", &form.promo_type),
        ("intent_category", &form.intent_category),
        ("target_segment", &form.target_segment),
        ("trigger_event", &form.trigger_event),
        ("platform_access", &form.platform_access),
        ("game_restriction", &form.game_restriction),
        ("valid_from", &form.valid_from),
        ("response_template_offer", &form.response_template_offer),
    ];

    checks
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
}

/// 提交门槛：任一必填字段为空即拒绝，错误中携带具体缺失集合
pub fn check_completion(form: &PromoForm) -> Result<()> {
    let missing = missing_required_fields(form);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PromoError::MissingRequiredFields(
            missing.into_iter().map(String::from).collect(),
        ))
    }
}
