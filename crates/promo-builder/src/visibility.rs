//! 区块可见性策略
//!
//! 促销表单的 C2–C5 配置区块是否出现在界面和导出文档中，
//! 完全由积分单位和 EXP 模式两个枚举决定。
//! 这里实现为两个输入的纯函数：隐藏一个区块永远不会触碰其底层数据，
//! 重新显示时先前录入的值原样恢复。

use serde::{Deserialize, Serialize};

/// 积分单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointUnit {
    #[serde(rename = "LP")]
    Lp,
    #[serde(rename = "EXP")]
    Exp,
    #[serde(rename = "hybrid")]
    Hybrid,
}

impl PointUnit {
    /// 导出文档中 promo_unit 字段的取值
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lp => "LP",
            Self::Exp => "EXP",
            Self::Hybrid => "hybrid",
        }
    }
}

/// EXP 模式（仅在 EXP/hybrid 单位下有意义）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpMode {
    LevelUp,
    ExpStore,
    Both,
}

impl ExpMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LevelUp => "level_up",
            Self::ExpStore => "exp_store",
            Self::Both => "both",
        }
    }
}

/// 区块可见性结果
///
/// C6（VIP 倍率）和 D（发放时机）始终可见，不参与计算。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockVisibility {
    /// LP 相关功能是否启用（LP 或 hybrid）
    pub lp_features: bool,
    /// EXP 相关功能是否启用（EXP 或 hybrid）
    pub exp_features: bool,
    /// C2：LP → 奖励兑换率
    pub conversion: bool,
    /// C3：Tier/Store 奖励表
    pub tier_store: bool,
    /// C4：Fast EXP 任务
    pub fast_exp: bool,
    /// C5：升级奖励
    pub level_up: bool,
}

/// 计算区块可见性
///
/// | 区块 | LP | EXP(level_up) | EXP(exp_store) | EXP(both) | hybrid |
/// |------|----|---------------|----------------|-----------|--------|
/// | C2   | ✓  |               |                |           | ✓      |
/// | C3   | ✓  |               | ✓              | ✓         | ✓      |
/// | C4   |    | ✓             | ✓              | ✓         | ✓      |
/// | C5   |    | ✓             |                | ✓         | ✓      |
///
/// 单位为 LP 时 exp_mode 被忽略。
pub fn block_visibility(unit: PointUnit, mode: ExpMode) -> BlockVisibility {
    let lp_features = unit == PointUnit::Lp || unit == PointUnit::Hybrid;
    let exp_features = unit == PointUnit::Exp || unit == PointUnit::Hybrid;

    BlockVisibility {
        lp_features,
        exp_features,
        conversion: lp_features,
        tier_store: unit == PointUnit::Lp
            || (exp_features && matches!(mode, ExpMode::ExpStore | ExpMode::Both)),
        fast_exp: exp_features,
        level_up: exp_features && matches!(mode, ExpMode::LevelUp | ExpMode::Both),
    }
}
