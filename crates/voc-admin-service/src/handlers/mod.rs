//! HTTP 请求处理器模块

pub mod admin_user;
pub mod agent_config;
pub mod chat;
pub mod promo;
