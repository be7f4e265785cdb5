//! 客服运营管理后台服务
//!
//! 提供 AI 客服配置、促销知识库向导、实时会话列表和用户/角色记录的 REST API。
//!
//! ## 核心功能
//!
//! - **客服配置**：品牌档案、沟通风格、升级转人工、安全/危机、玩家行为、
//!   账号与 API 凭据七类配置的读取与按属主整体覆盖保存
//! - **促销构建**：分步向导会话，奖励表/任务/升级奖励/VIP 的编辑操作，
//!   导出文档预览与提交，CSV 模板下载
//! - **实时会话**：聊天会话列表的变更事件合并（按 id 原位替换/前插/删除）
//! - **用户记录**：后台用户列表与角色授予/回收
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型定义
//! - `handlers`: HTTP 请求处理器
//! - `livechat`: 会话列表模型与变更事件归并器
//! - `routes`: 路由配置
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据验证：validator
//! - 序列化：serde (camelCase)

pub mod dto;
pub mod error;
pub mod handlers;
pub mod livechat;
pub mod routes;
pub mod state;

// 重新导出核心类型
pub use dto::{ApiResponse, VocConfigDto};
pub use error::{AdminError, Result};
pub use livechat::{ChangeEvent, ChatFeed};
pub use state::{AppState, PromoSession};
