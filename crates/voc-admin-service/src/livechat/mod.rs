//! 实时会话列表模块
//!
//! 聊天会话/消息的领域模型、数据库加载器，以及与传输方式无关的
//! 变更事件归并器。上游变更流（订阅推送或轮询）只负责投递事件，
//! 列表状态完全由归并器维护。

pub mod feed;

pub use feed::{ChangeEvent, ChatEntry, ChatFeed};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;

/// 聊天会话记录（不含消息）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionRecord {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: Option<String>,
    pub location: Option<String>,
    pub local_time: Option<String>,
    pub last_message: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// active | waiting | closed
    pub status: String,
    pub unread_count: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub source: Option<String>,
    pub chat_duration: Option<String>,
    pub is_first_visit: Option<bool>,
    pub device: Option<String>,
    pub browser: Option<String>,
    pub groups: Option<Vec<String>>,
}

/// 聊天消息记录
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRecord {
    pub id: String,
    pub session_id: String,
    /// user | agent
    pub sender: String,
    pub sender_name: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: Option<bool>,
}

/// 从数据库加载初始会话列表
///
/// 会话按时间倒序（最新的在最前），每个会话的消息按时间正序。
/// 消息一次性查出后按 session_id 分组，避免逐会话查询。
pub async fn load_feed(pool: &PgPool) -> Result<ChatFeed, sqlx::Error> {
    let sessions = sqlx::query_as::<_, ChatSessionRecord>(
        r#"
        SELECT id, user_id, user_name, user_email, location, local_time,
               last_message, timestamp, status, unread_count, tags, source,
               chat_duration, is_first_visit, device, browser, groups
        FROM livechat_sessions
        ORDER BY timestamp DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let messages = sqlx::query_as::<_, ChatMessageRecord>(
        r#"
        SELECT id, session_id, sender, sender_name, message, timestamp, is_read
        FROM livechat_messages
        ORDER BY timestamp ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut by_session: HashMap<String, Vec<ChatMessageRecord>> = HashMap::new();
    for message in messages {
        by_session
            .entry(message.session_id.clone())
            .or_default()
            .push(message);
    }

    let entries = sessions
        .into_iter()
        .map(|session| {
            let messages = by_session.remove(&session.id).unwrap_or_default();
            ChatEntry { session, messages }
        })
        .collect();

    Ok(ChatFeed::from_entries(entries))
}

/// 查询单个会话的消息（按时间正序）
pub async fn load_messages(
    pool: &PgPool,
    session_id: &str,
) -> Result<Vec<ChatMessageRecord>, sqlx::Error> {
    sqlx::query_as::<_, ChatMessageRecord>(
        r#"
        SELECT id, session_id, sender, sender_name, message, timestamp, is_read
        FROM livechat_messages
        WHERE session_id = $1
        ORDER BY timestamp ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
}
