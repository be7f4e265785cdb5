//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use promo_builder::{OptionCatalog, PromoForm};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::livechat::ChatFeed;

/// 向导总步数
pub const TOTAL_STEPS: u8 = 5;

/// 向导各步标题
pub const STEP_TITLES: [&str; TOTAL_STEPS as usize] = [
    "Identitas Promo",
    "Konfigurasi Reward",
    "Batasan & Akses",
    "Template Pesan (AI)",
    "Review & Simpan",
];

/// 一次促销编辑会话
///
/// 表单状态由该会话独占，单会话内无并发修改。
#[derive(Debug, Clone)]
pub struct PromoSession {
    pub id: Uuid,
    /// 当前步骤（1..=5）
    pub step: u8,
    pub form: PromoForm,
    pub catalog: OptionCatalog,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PromoSession {
    /// 开始一次新的"Fill Form"编辑
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            step: 1,
            form: PromoForm::new(),
            catalog: OptionCatalog::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 当前步骤标题
    pub fn step_title(&self) -> &'static str {
        STEP_TITLES[(self.step as usize).clamp(1, TOTAL_STEPS as usize) - 1]
    }

    /// 标记一次修改
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for PromoSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Axum 应用共享状态
///
/// 包含数据库连接池、促销编辑会话表和实时会话列表，
/// 通过 Arc 在 handler 间共享
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL 连接池
    pub pool: PgPool,
    /// 促销向导会话（按会话 id 索引）
    pub promo_sessions: Arc<DashMap<Uuid, PromoSession>>,
    /// 实时聊天会话列表
    pub chat_feed: Arc<RwLock<ChatFeed>>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(pool: PgPool, chat_feed: ChatFeed) -> Self {
        Self {
            pool,
            promo_sessions: Arc::new(DashMap::new()),
            chat_feed: Arc::new(RwLock::new(chat_feed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_at_step_one() {
        let session = PromoSession::new();
        assert_eq!(session.step, 1);
        assert_eq!(session.step_title(), "Identitas Promo");
        assert_eq!(session.form.tier_rows.len(), 1);
    }

    #[test]
    fn test_step_titles_cover_all_steps() {
        let mut session = PromoSession::new();
        let expected = [
            "Identitas Promo",
            "Konfigurasi Reward",
            "Batasan & Akses",
            "Template Pesan (AI)",
            "Review & Simpan",
        ];
        for step in 1..=TOTAL_STEPS {
            session.step = step;
            assert_eq!(session.step_title(), expected[step as usize - 1]);
        }
    }
}
