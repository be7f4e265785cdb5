//! 实时会话 API 处理器
//!
//! 会话列表/消息的读取端点，以及上游变更事件的接入端点。
//! 列表状态在启动时从数据库整体加载，此后只通过归并器变更；
//! 变更事件由上游变更流投递，传输方式（订阅推送或轮询）不在本层关心。

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{debug, info};

use crate::{
    dto::{ApiResponse, ChatMessageDto, ChatSessionDto},
    error::AdminError,
    livechat::{self, ChangeEvent},
    state::AppState,
};

/// 会话列表（含已加载的消息，按投递顺序）
///
/// GET /api/admin/chats
pub async fn list_chats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ChatSessionDto>>>, AdminError> {
    let feed = state.chat_feed.read();
    let chats: Vec<ChatSessionDto> = feed.entries().iter().map(ChatSessionDto::from).collect();
    Ok(Json(ApiResponse::success(chats)))
}

/// 单个会话详情
///
/// GET /api/admin/chats/:id
pub async fn get_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ChatSessionDto>>, AdminError> {
    let feed = state.chat_feed.read();
    let entry = feed
        .get(&id)
        .ok_or_else(|| AdminError::ChatSessionNotFound(id.clone()))?;
    Ok(Json(ApiResponse::success(ChatSessionDto::from(entry))))
}

/// 单个会话的消息（从数据库按时间正序读取）
///
/// GET /api/admin/chats/:id/messages
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessageDto>>>, AdminError> {
    let messages = livechat::load_messages(&state.pool, &id).await?;
    let dtos: Vec<ChatMessageDto> = messages.iter().map(ChatMessageDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// 接入一个上游变更事件
///
/// POST /api/admin/chats/events
///
/// 会话 Upsert 生效后从数据库回填该会话的最新消息
/// （上游事件只携带会话记录本身）。
pub async fn ingest_event(
    State(state): State<AppState>,
    Json(event): Json<ChangeEvent>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    // Upsert 需要回填消息的会话 id
    let hydrate_id = match &event {
        ChangeEvent::SessionUpserted(record) => Some(record.id.clone()),
        _ => None,
    };

    let applied = state.chat_feed.write().apply(event);

    if !applied {
        // 未知会话的消息、重复删除等：丢弃但不报错，事件流允许乱序与重放
        debug!("Chat change event had no effect");
        return Ok(Json(ApiResponse::<()>::success_empty()));
    }

    if let Some(session_id) = hydrate_id {
        let messages = livechat::load_messages(&state.pool, &session_id).await?;
        state.chat_feed.write().set_messages(&session_id, messages);
        info!(%session_id, "Chat session merged");
    }

    Ok(Json(ApiResponse::<()>::success_empty()))
}
