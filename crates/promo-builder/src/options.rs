//! 下拉选项目录
//!
//! 固定的下拉选项集合、计算方式/发放时机的展示标签表，
//! 以及支持运营人员在会话内追加自定义选项的目录。
//! 选项文案来自运营方使用的原始话术，导出文档直接引用其中的标签。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 等级名称（固定五级，顺序即预填顺序）
pub const LEVEL_TIER_NAMES: [&str; 5] = ["Bronze", "Silver", "Gold", "Platinum", "Diamond"];

/// 可追加自定义选项的下拉字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionField {
    PromoType,
    IntentCategory,
    TargetSegment,
    TriggerEvent,
    RewardType,
    TurnoverRule,
    ClaimFrequency,
    PlatformAccess,
    GameRestriction,
    Status,
    GeoRestriction,
    TierRewardType,
}

impl OptionField {
    /// 字段标识（与表单字段名一致）
    pub fn key(&self) -> &'static str {
        match self {
            Self::PromoType => "promo_type",
            Self::IntentCategory => "intent_category",
            Self::TargetSegment => "target_segment",
            Self::TriggerEvent => "trigger_event",
            Self::RewardType => "reward_type",
            Self::TurnoverRule => "turnover_rule",
            Self::ClaimFrequency => "claim_frequency",
            Self::PlatformAccess => "platform_access",
            Self::GameRestriction => "game_restriction",
            Self::Status => "status",
            Self::GeoRestriction => "geo_restriction",
            Self::TierRewardType => "tier_reward_type",
        }
    }

    /// 内置选项集合
    pub fn base_options(&self) -> &'static [&'static str] {
        match self {
            Self::PromoType => &[
                "Loyalty Points",
                "EXP / Leveling",
                "Freechip",
                "Bonus Deposit",
                "Cashback",
                "Mission",
            ],
            Self::IntentCategory => &["Acquisition", "Retention", "Reactivation", "VIP"],
            Self::TargetSegment => &["User Baru", "Existing", "VIP", "Dormant", "Semua"],
            Self::TriggerEvent => &[
                "First Deposit",
                "Daily Login",
                "Loss Streak",
                "APK Download",
                "TO",
                "Mission Completed",
            ],
            Self::RewardType => &[
                "LP",
                "EXP",
                "Freechip",
                "Credit Game",
                "Persentase %",
                "Cashback",
                "Custom",
            ],
            Self::TurnoverRule => &["0x", "1x", "5x", "8x", "Custom"],
            Self::ClaimFrequency => &["Sekali", "Harian", "Mingguan", "Unlimited"],
            Self::PlatformAccess => &["Web", "APK", "Mobile", "Semua"],
            Self::GameRestriction => &["Semua", "Slots", "Live Casino", "Sports"],
            Self::Status => &["Active", "Paused", "Draft", "Expired"],
            Self::GeoRestriction => &["Indonesia", "Jakarta", "Global"],
            Self::TierRewardType => &[
                "Credit Game",
                "Freechip",
                "Loyalty Points",
                "Cashback",
                "Bonus",
            ],
        }
    }
}

/// 发放时机（reward_distribution）的展示标签
///
/// 导出文档写入的是标签而非键；未知键原样透传。
pub fn reward_distribution_label(key: &str) -> &'static str {
    match key {
        "instant" => "Instant (langsung diberikan)",
        "after_requirement" => "After Requirement (setelah syarat terpenuhi)",
        "split" => "Split (sebagian depan, sebagian belakang)",
        "per_step" => "Per Step (untuk mission)",
        "custom" => "Custom",
        _ => "",
    }
}

/// 会话内选项目录
///
/// 在内置选项之上追加运营人员临时录入的自定义选项。
/// 自定义项只存在于当前编辑会话，不回写到内置目录。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionCatalog {
    custom: HashMap<String, Vec<String>>,
}

impl OptionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个自定义选项；空白输入被忽略
    ///
    /// 返回实际记录的选项值（去除首尾空白）。
    pub fn add_custom(&mut self, field: OptionField, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.custom
            .entry(field.key().to_string())
            .or_default()
            .push(trimmed.to_string());
        Some(trimmed.to_string())
    }

    /// 字段的全部可选项（内置 + 自定义，自定义排在后面）
    pub fn options_for(&self, field: OptionField) -> Vec<String> {
        let mut all: Vec<String> = field
            .base_options()
            .iter()
            .map(|s| s.to_string())
            .collect();
        if let Some(custom) = self.custom.get(field.key()) {
            all.extend(custom.iter().cloned());
        }
        all
    }

    /// 字段的自定义选项
    pub fn custom_for(&self, field: OptionField) -> &[String] {
        self.custom
            .get(field.key())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
