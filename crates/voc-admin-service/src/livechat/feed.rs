//! 会话列表归并器
//!
//! 把上游变更事件归并进内存中的会话列表：按会话 id 匹配，
//! 同一 id 后到的事件覆盖先到的（last-write-wins），
//! 除事件投递顺序外不做其他排序保证。
//! 归并器本身不关心事件从哪种传输方式来。

use serde::{Deserialize, Serialize};

use super::{ChatMessageRecord, ChatSessionRecord};

/// 会话变更事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// 会话新增或整体更新（完整替换记录）
    SessionUpserted(ChatSessionRecord),
    /// 会话删除
    SessionDeleted { id: String },
    /// 新消息写入
    MessageInserted(ChatMessageRecord),
}

/// 列表中的一个会话及其消息
#[derive(Debug, Clone, Serialize)]
pub struct ChatEntry {
    pub session: ChatSessionRecord,
    pub messages: Vec<ChatMessageRecord>,
}

/// 内存中的会话列表
///
/// 启动时从数据库整体加载，此后只通过 `apply` 变更。
#[derive(Debug, Default)]
pub struct ChatFeed {
    entries: Vec<ChatEntry>,
}

impl ChatFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ChatEntry>) -> Self {
        Self { entries }
    }

    /// 归并一个变更事件，返回事件是否生效
    ///
    /// - 已存在的会话收到 Upsert：原位替换记录，位置和已加载的消息保留
    /// - 未知 id 的 Upsert：前插（最新会话排最前）
    /// - Delete：按 id 移除
    /// - MessageInserted：追加到对应会话并刷新 last_message；
    ///   会话未知时事件被丢弃
    pub fn apply(&mut self, event: ChangeEvent) -> bool {
        match event {
            ChangeEvent::SessionUpserted(record) => {
                if let Some(entry) = self.entries.iter_mut().find(|e| e.session.id == record.id) {
                    entry.session = record;
                } else {
                    self.entries.insert(
                        0,
                        ChatEntry {
                            session: record,
                            messages: Vec::new(),
                        },
                    );
                }
                true
            }
            ChangeEvent::SessionDeleted { id } => {
                let before = self.entries.len();
                self.entries.retain(|e| e.session.id != id);
                self.entries.len() != before
            }
            ChangeEvent::MessageInserted(message) => {
                let Some(entry) = self
                    .entries
                    .iter_mut()
                    .find(|e| e.session.id == message.session_id)
                else {
                    return false;
                };
                entry.session.last_message = Some(message.message.clone());
                entry.messages.push(message);
                true
            }
        }
    }

    /// 整体替换某个会话的消息（Upsert 后从数据库回填）
    pub fn set_messages(&mut self, session_id: &str, messages: Vec<ChatMessageRecord>) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.session.id == session_id) else {
            return false;
        };
        entry.messages = messages;
        true
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn get(&self, session_id: &str) -> Option<&ChatEntry> {
        self.entries.iter().find(|e| e.session.id == session_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session(id: &str, user_name: &str) -> ChatSessionRecord {
        ChatSessionRecord {
            id: id.to_string(),
            user_id: format!("user-{id}"),
            user_name: user_name.to_string(),
            user_email: None,
            location: None,
            local_time: None,
            last_message: None,
            timestamp: Utc::now(),
            status: "active".to_string(),
            unread_count: Some(0),
            tags: None,
            source: None,
            chat_duration: None,
            is_first_visit: Some(false),
            device: None,
            browser: None,
            groups: None,
        }
    }

    fn message(id: &str, session_id: &str, text: &str) -> ChatMessageRecord {
        ChatMessageRecord {
            id: id.to_string(),
            session_id: session_id.to_string(),
            sender: "user".to_string(),
            sender_name: Some("Budi".to_string()),
            message: text.to_string(),
            timestamp: Utc::now(),
            is_read: Some(false),
        }
    }

    #[test]
    fn test_new_session_is_prepended() {
        let mut feed = ChatFeed::new();
        feed.apply(ChangeEvent::SessionUpserted(session("a", "Budi")));
        feed.apply(ChangeEvent::SessionUpserted(session("b", "Siti")));

        assert_eq!(feed.len(), 2);
        // 最新会话排最前
        assert_eq!(feed.entries()[0].session.id, "b");
        assert_eq!(feed.entries()[1].session.id, "a");
    }

    #[test]
    fn test_upsert_existing_replaces_in_place() {
        let mut feed = ChatFeed::new();
        feed.apply(ChangeEvent::SessionUpserted(session("a", "Budi")));
        feed.apply(ChangeEvent::SessionUpserted(session("b", "Siti")));
        feed.apply(ChangeEvent::MessageInserted(message("m1", "a", "halo")));

        let mut updated = session("a", "Budi Santoso");
        updated.status = "waiting".to_string();
        feed.apply(ChangeEvent::SessionUpserted(updated));

        // 位置不变（仍在第二位），记录被整体替换，已加载的消息保留
        assert_eq!(feed.entries()[1].session.id, "a");
        assert_eq!(feed.entries()[1].session.user_name, "Budi Santoso");
        assert_eq!(feed.entries()[1].session.status, "waiting");
        assert_eq!(feed.entries()[1].messages.len(), 1);
    }

    #[test]
    fn test_last_write_wins_per_id() {
        let mut feed = ChatFeed::new();
        feed.apply(ChangeEvent::SessionUpserted(session("a", "v1")));
        feed.apply(ChangeEvent::SessionUpserted(session("a", "v2")));
        feed.apply(ChangeEvent::SessionUpserted(session("a", "v3")));

        assert_eq!(feed.len(), 1);
        assert_eq!(feed.entries()[0].session.user_name, "v3");
    }

    #[test]
    fn test_delete_removes_by_id() {
        let mut feed = ChatFeed::new();
        feed.apply(ChangeEvent::SessionUpserted(session("a", "Budi")));
        feed.apply(ChangeEvent::SessionUpserted(session("b", "Siti")));

        assert!(feed.apply(ChangeEvent::SessionDeleted {
            id: "a".to_string()
        }));
        assert_eq!(feed.len(), 1);
        assert!(feed.get("a").is_none());

        // 重复删除不生效
        assert!(!feed.apply(ChangeEvent::SessionDeleted {
            id: "a".to_string()
        }));
    }

    #[test]
    fn test_message_appends_and_refreshes_last_message() {
        let mut feed = ChatFeed::new();
        feed.apply(ChangeEvent::SessionUpserted(session("a", "Budi")));

        feed.apply(ChangeEvent::MessageInserted(message("m1", "a", "halo")));
        feed.apply(ChangeEvent::MessageInserted(message(
            "m2",
            "a",
            "mau tanya promo",
        )));

        let entry = feed.get("a").unwrap();
        assert_eq!(entry.messages.len(), 2);
        assert_eq!(entry.messages[1].message, "mau tanya promo");
        assert_eq!(
            entry.session.last_message.as_deref(),
            Some("mau tanya promo")
        );
    }

    #[test]
    fn test_message_for_unknown_session_is_dropped() {
        let mut feed = ChatFeed::new();
        assert!(!feed.apply(ChangeEvent::MessageInserted(message("m1", "ghost", "halo"))));
        assert!(feed.is_empty());
    }

    #[test]
    fn test_set_messages_replaces_whole_list() {
        let mut feed = ChatFeed::new();
        feed.apply(ChangeEvent::SessionUpserted(session("a", "Budi")));
        feed.apply(ChangeEvent::MessageInserted(message("m1", "a", "halo")));

        assert!(feed.set_messages("a", vec![message("m9", "a", "riwayat baru")]));
        let entry = feed.get("a").unwrap();
        assert_eq!(entry.messages.len(), 1);
        assert_eq!(entry.messages[0].id, "m9");

        assert!(!feed.set_messages("ghost", Vec::new()));
    }

    #[test]
    fn test_change_event_deserializes_from_tagged_json() {
        let json = r#"{
            "type": "session_deleted",
            "id": "chat-42"
        }"#;
        let event: ChangeEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event, ChangeEvent::SessionDeleted { id } if id == "chat-42"));
    }
}
