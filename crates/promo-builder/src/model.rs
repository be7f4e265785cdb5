//! 促销表单聚合模型
//!
//! 一次促销规则编辑会话的全部可变状态：标识字段、三种奖励模式的
//! 子配置、Tier 子模型（奖励表、任务、升级奖励、VIP 倍率）以及
//! 发放时机和自定义条款。三种奖励模式的子配置同时保留在状态中，
//! 切换模式或积分单位不会清除任何已录入的数据；哪些部分进入
//! 导出文档由可见性策略和文档生成器决定。
//!
//! 模型由单一编辑会话独占，"返回"、"新建促销"和提交成功后整体重置。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::options::LEVEL_TIER_NAMES;
use crate::visibility::{ExpMode, PointUnit};

/// 奖励模式：三选一，互斥生效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardMode {
    Fixed,
    Tier,
    Formula,
}

/// 奖励取值类型：固定数值或百分比
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardValueType {
    Fixed,
    Percentage,
}

impl RewardValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Percentage => "percentage",
        }
    }
}

/// LP/EXP 积分计算方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    Turnover,
    Spin,
    Winloss,
    Manual,
    Custom,
}

impl CalculationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Turnover => "turnover",
            Self::Spin => "spin",
            Self::Winloss => "winloss",
            Self::Manual => "manual",
            Self::Custom => "custom",
        }
    }

    /// 公式中的计量单位标签（"1000 TO = 1 LP" 中的 "TO"）
    ///
    /// custom 方式没有计量标签，公式整体来自自由文本。
    pub fn formula_label(&self) -> &'static str {
        match self {
            Self::Turnover => "TO",
            Self::Spin => "Spin",
            Self::Winloss => "Win/Loss",
            Self::Manual => "Manual",
            Self::Custom => "",
        }
    }

    /// 下拉框中的展示标签
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Turnover => "Turnover (TO)",
            Self::Spin => "Jumlah Spin",
            Self::Winloss => "Jumlah Win/Loss",
            Self::Manual => "Manual",
            Self::Custom => "Custom",
        }
    }
}

/// 奖励表行
///
/// 身份由生成的唯一 id 标识而非下标，行可增删而引用不失效。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierRow {
    pub id: Uuid,
    pub min_point: String,
    pub reward: String,
    /// 奖励种类（如 "Freechip"、"Credit Game"）
    #[serde(rename = "type")]
    pub kind: String,
    pub reward_value_type: RewardValueType,
}

impl TierRow {
    /// 创建一个空行
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            min_point: String::new(),
            reward: String::new(),
            kind: String::new(),
            reward_value_type: RewardValueType::Fixed,
        }
    }

    /// 三个必填列是否都已填写
    pub fn is_complete(&self) -> bool {
        !self.min_point.is_empty() && !self.reward.is_empty() && !self.kind.is_empty()
    }
}

/// 奖励表行的可更新列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierField {
    MinPoint,
    Reward,
    Type,
    RewardValueType,
}

/// Fast EXP 任务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastExpMission {
    pub id: Uuid,
    pub activity: String,
    pub bonus_exp: String,
}

impl FastExpMission {
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            activity: String::new(),
            bonus_exp: String::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.activity.is_empty() && !self.bonus_exp.is_empty()
    }
}

/// 任务的可更新列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionField {
    Activity,
    BonusExp,
}

/// 升级奖励（固定五条，每个等级一条）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelUpReward {
    pub id: Uuid,
    pub tier: String,
    pub min_exp: String,
    pub reward: String,
    pub reward_value_type: RewardValueType,
    /// 奖励种类（如 "Credit Game"）
    pub reward_type: String,
}

impl LevelUpReward {
    fn seeded(tier: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            tier: tier.to_string(),
            min_exp: String::new(),
            reward: String::new(),
            reward_value_type: RewardValueType::Fixed,
            reward_type: String::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.min_exp.is_empty() && !self.reward.is_empty() && !self.reward_type.is_empty()
    }
}

/// 升级奖励的可更新列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelField {
    MinExp,
    Reward,
    RewardValueType,
    RewardType,
}

/// VIP 倍率配置
///
/// Bronze 结构性锁定为零，不提供可编辑字段，也不会出现在导出文档中。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VipMultiplier {
    pub enabled: bool,
    pub min_daily_to: String,
    pub silver: String,
    pub gold: String,
    pub platinum: String,
    pub diamond: String,
}

/// 促销表单聚合
///
/// 所有数值字段以原始文本保存，解析在生成导出文档时才发生。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoForm {
    // ---- 标识与分类 ----
    pub client_id: String,
    pub promo_name: String,
    pub promo_type: String,
    pub intent_category: String,
    pub target_segment: String,
    pub trigger_event: String,

    // ---- 奖励模式 ----
    pub reward_mode: RewardMode,

    // fixed 模式
    pub reward_type: String,
    pub reward_amount: String,
    pub min_requirement: String,
    pub max_claim: String,
    pub turnover_rule: String,
    pub claim_frequency: String,

    // formula 模式（表达式为不透明文本，不做解析）
    pub conversion_formula: String,

    // tier 模式：奖励表的实时预览 JSON（派生侧字段）
    pub reward_tiers: String,

    // ---- 限制与有效期 ----
    pub platform_access: String,
    pub game_restriction: String,
    pub valid_from: String,
    pub valid_until: String,
    pub status: String,
    pub require_apk: bool,
    pub geo_restriction: String,
    pub time_restriction: String,

    // ---- AI 话术模板 ----
    pub response_template_offer: String,
    pub response_template_requirement: String,
    pub response_template_instruction: String,
    pub ai_guidelines: String,
    pub default_behavior: String,
    pub completion_steps: String,

    // ---- Tier 子模型 ----
    pub point_unit: PointUnit,
    pub exp_mode: ExpMode,
    pub calculation_method: CalculationMethod,
    pub lp_formula_input: String,
    pub lp_formula_output: String,
    /// hybrid 单位下 LP 公式使用的独立输入/输出对
    pub lp_formula_input_lp: String,
    pub lp_formula_output_lp: String,
    pub exp_formula_input: String,
    pub exp_formula_output: String,
    pub custom_lp_formula: String,
    pub lp_conversion_value: String,
    pub lp_conversion_type: String,
    /// 发放时机的选项键（空字符串 = 未选择）
    pub reward_distribution: String,
    pub tier_rows: Vec<TierRow>,
    pub fast_exp_missions: Vec<FastExpMission>,
    pub level_up_rewards_enabled: bool,
    pub level_up_rewards: Vec<LevelUpReward>,
    pub vip_multiplier: VipMultiplier,
    pub custom_terms: String,
}

impl Default for PromoForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PromoForm {
    /// 创建空表单：一个空奖励表行，升级奖励按五个等级预填，VIP 关闭
    pub fn new() -> Self {
        Self {
            client_id: String::new(),
            promo_name: String::new(),
            promo_type: String::new(),
            intent_category: String::new(),
            target_segment: String::new(),
            trigger_event: String::new(),
            reward_mode: RewardMode::Fixed,
            reward_type: String::new(),
            reward_amount: String::new(),
            min_requirement: String::new(),
            max_claim: String::new(),
            turnover_rule: String::new(),
            claim_frequency: String::new(),
            conversion_formula: String::new(),
            reward_tiers: String::new(),
            platform_access: String::new(),
            game_restriction: String::new(),
            valid_from: String::new(),
            valid_until: String::new(),
            status: "draft".to_string(),
            require_apk: false,
            geo_restriction: String::new(),
            time_restriction: String::new(),
            response_template_offer: String::new(),
            response_template_requirement: String::new(),
            response_template_instruction: String::new(),
            ai_guidelines: String::new(),
            default_behavior: String::new(),
            completion_steps: String::new(),
            point_unit: PointUnit::Lp,
            exp_mode: ExpMode::LevelUp,
            calculation_method: CalculationMethod::Turnover,
            lp_formula_input: String::new(),
            lp_formula_output: String::new(),
            lp_formula_input_lp: String::new(),
            lp_formula_output_lp: String::new(),
            exp_formula_input: String::new(),
            exp_formula_output: String::new(),
            custom_lp_formula: String::new(),
            lp_conversion_value: String::new(),
            lp_conversion_type: String::new(),
            reward_distribution: String::new(),
            tier_rows: vec![TierRow::empty()],
            fast_exp_missions: Vec::new(),
            level_up_rewards_enabled: false,
            level_up_rewards: LEVEL_TIER_NAMES
                .iter()
                .map(|tier| LevelUpReward::seeded(tier))
                .collect(),
            vip_multiplier: VipMultiplier::default(),
            custom_terms: String::new(),
        }
    }

    /// 整体重置为默认状态（"返回"、"新建促销"、提交成功后）
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // ==================== 奖励表行操作 ====================
    //
    // 每次变更后立即重算 reward_tiers 侧字段，供界面实时预览。

    /// 追加一个空行，返回新行 id
    pub fn add_tier_row(&mut self) -> Uuid {
        let row = TierRow::empty();
        let id = row.id;
        self.tier_rows.push(row);
        self.refresh_reward_tiers();
        id
    }

    /// 更新指定行的某一列；行不存在返回 false
    pub fn update_tier_row(&mut self, id: Uuid, field: TierField, value: &str) -> bool {
        let Some(row) = self.tier_rows.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        match field {
            TierField::MinPoint => row.min_point = value.to_string(),
            TierField::Reward => row.reward = value.to_string(),
            TierField::Type => row.kind = value.to_string(),
            TierField::RewardValueType => {
                row.reward_value_type = if value == "percentage" {
                    RewardValueType::Percentage
                } else {
                    RewardValueType::Fixed
                };
            }
        }
        self.refresh_reward_tiers();
        true
    }

    /// 删除指定行；奖励表始终保留至少一行（删空后补一个空行）
    pub fn remove_tier_row(&mut self, id: Uuid) -> bool {
        let before = self.tier_rows.len();
        self.tier_rows.retain(|r| r.id != id);
        let removed = self.tier_rows.len() != before;
        if self.tier_rows.is_empty() {
            self.tier_rows.push(TierRow::empty());
        }
        if removed {
            self.refresh_reward_tiers();
        }
        removed
    }

    /// 重算 reward_tiers 实时预览：完整行的派生 JSON 文本，无完整行时为空
    fn refresh_reward_tiers(&mut self) {
        let tiers = crate::document::derive_tiers(self);
        self.reward_tiers = if tiers.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&tiers).unwrap_or_default()
        };
    }

    // ==================== Fast EXP 任务操作 ====================

    pub fn add_fast_exp_mission(&mut self) -> Uuid {
        let mission = FastExpMission::empty();
        let id = mission.id;
        self.fast_exp_missions.push(mission);
        id
    }

    pub fn update_fast_exp_mission(&mut self, id: Uuid, field: MissionField, value: &str) -> bool {
        let Some(mission) = self.fast_exp_missions.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        match field {
            MissionField::Activity => mission.activity = value.to_string(),
            MissionField::BonusExp => mission.bonus_exp = value.to_string(),
        }
        true
    }

    pub fn remove_fast_exp_mission(&mut self, id: Uuid) -> bool {
        let before = self.fast_exp_missions.len();
        self.fast_exp_missions.retain(|m| m.id != id);
        self.fast_exp_missions.len() != before
    }

    // ==================== 升级奖励操作 ====================
    //
    // 五条固定记录只更新不增删。

    pub fn update_level_up_reward(&mut self, id: Uuid, field: LevelField, value: &str) -> bool {
        let Some(reward) = self.level_up_rewards.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        match field {
            LevelField::MinExp => reward.min_exp = value.to_string(),
            LevelField::Reward => reward.reward = value.to_string(),
            LevelField::RewardValueType => {
                reward.reward_value_type = if value == "percentage" {
                    RewardValueType::Percentage
                } else {
                    RewardValueType::Fixed
                };
            }
            LevelField::RewardType => reward.reward_type = value.to_string(),
        }
        true
    }
}
