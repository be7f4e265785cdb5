//! 促销构建核心错误类型

use thiserror::Error;

/// 促销构建错误
#[derive(Debug, Error)]
pub enum PromoError {
    /// 提交时必填字段未填写，携带具体缺失的字段名列表
    #[error("必填字段未填写: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, PromoError>;
