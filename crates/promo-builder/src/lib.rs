//! 促销知识库构建核心
//!
//! 提供促销规则的可复用建模能力，支持：
//! - 促销表单聚合模型和分步向导生命周期
//! - 基于积分单位/EXP 模式的区块可见性策略
//! - 按需生成的规范化导出文档（键序稳定的 JSON）
//! - 提交前必填字段校验
//! - CSV 模板导出

pub mod document;
pub mod error;
pub mod model;
pub mod options;
pub mod submit;
pub mod template;
pub mod visibility;

pub use document::{derive_document, derive_tiers, document_json_pretty};
pub use error::{PromoError, Result};
pub use model::{
    CalculationMethod, FastExpMission, LevelField, LevelUpReward, MissionField, PromoForm,
    RewardMode, RewardValueType, TierField, TierRow, VipMultiplier,
};
pub use options::{OptionCatalog, OptionField, reward_distribution_label};
pub use submit::{check_completion, missing_required_fields};
pub use visibility::{BlockVisibility, ExpMode, PointUnit, block_visibility};
