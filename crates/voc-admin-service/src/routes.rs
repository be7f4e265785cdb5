//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::{handlers, state::AppState};

/// 构建客服配置路由
///
/// 七类配置的合并读取与按属主覆盖保存
fn config_routes() -> Router<AppState> {
    Router::new()
        .route("/config/{user_id}", get(handlers::agent_config::get_config))
        .route(
            "/config/{user_id}/brand-profile",
            put(handlers::agent_config::save_brand_profile),
        )
        .route(
            "/config/{user_id}/communication-style",
            put(handlers::agent_config::save_communication_style),
        )
        .route(
            "/config/{user_id}/support-escalation",
            put(handlers::agent_config::save_support_escalation),
        )
        .route(
            "/config/{user_id}/safety-crisis",
            put(handlers::agent_config::save_safety_crisis),
        )
        .route(
            "/config/{user_id}/player-behaviour",
            put(handlers::agent_config::save_player_behaviour),
        )
        .route(
            "/config/{user_id}/account",
            put(handlers::agent_config::save_account),
        )
        .route(
            "/config/{user_id}/api-data",
            put(handlers::agent_config::save_api_data),
        )
}

/// 构建促销向导路由
///
/// 会话生命周期、表单编辑、文档预览/提交和模板下载
fn promo_routes() -> Router<AppState> {
    Router::new()
        .route("/promo/sessions", post(handlers::promo::create_session))
        .route("/promo/sessions/{id}", get(handlers::promo::get_session))
        .route(
            "/promo/sessions/{id}",
            delete(handlers::promo::discard_session),
        )
        .route(
            "/promo/sessions/{id}/fields",
            patch(handlers::promo::update_fields),
        )
        .route("/promo/sessions/{id}/draft", post(handlers::promo::save_draft))
        .route("/promo/sessions/{id}/step", patch(handlers::promo::set_step))
        .route(
            "/promo/sessions/{id}/step/next",
            post(handlers::promo::next_step),
        )
        .route(
            "/promo/sessions/{id}/step/prev",
            post(handlers::promo::prev_step),
        )
        // 奖励表行
        .route("/promo/sessions/{id}/tiers", post(handlers::promo::add_tier_row))
        .route(
            "/promo/sessions/{id}/tiers/{row_id}",
            patch(handlers::promo::update_tier_row),
        )
        .route(
            "/promo/sessions/{id}/tiers/{row_id}",
            delete(handlers::promo::remove_tier_row),
        )
        // Fast EXP 任务
        .route(
            "/promo/sessions/{id}/missions",
            post(handlers::promo::add_mission),
        )
        .route(
            "/promo/sessions/{id}/missions/{mission_id}",
            patch(handlers::promo::update_mission),
        )
        .route(
            "/promo/sessions/{id}/missions/{mission_id}",
            delete(handlers::promo::remove_mission),
        )
        // 升级奖励与 VIP
        .route(
            "/promo/sessions/{id}/level-rewards/{reward_id}",
            patch(handlers::promo::update_level_reward),
        )
        .route("/promo/sessions/{id}/vip", patch(handlers::promo::update_vip))
        // 自定义选项
        .route(
            "/promo/sessions/{id}/options",
            post(handlers::promo::add_custom_option),
        )
        // 文档与提交
        .route(
            "/promo/sessions/{id}/document",
            get(handlers::promo::get_document),
        )
        .route(
            "/promo/sessions/{id}/export",
            get(handlers::promo::export_document),
        )
        .route("/promo/sessions/{id}/submit", post(handlers::promo::submit))
        .route("/promo/template", get(handlers::promo::download_template))
}

/// 构建实时会话路由
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chats", get(handlers::chat::list_chats))
        .route("/chats/events", post(handlers::chat::ingest_event))
        .route("/chats/{id}", get(handlers::chat::get_chat))
        .route("/chats/{id}/messages", get(handlers::chat::list_messages))
}

/// 构建用户与角色路由
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::admin_user::list_users))
        .route("/user-roles", get(handlers::admin_user::list_roles))
        .route("/user-roles", post(handlers::admin_user::add_role))
        .route(
            "/users/{user_id}/roles/{role}",
            delete(handlers::admin_user::remove_role),
        )
}

/// 构建完整的 API 路由
///
/// 返回所有管理后台 API 路由（不含前缀，由调用方在 main.rs 中挂载）
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(config_routes())
        .merge(promo_routes())
        .merge(chat_routes())
        .merge(user_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_construction() {
        let _config = config_routes();
        let _promo = promo_routes();
        let _chat = chat_routes();
        let _user = user_routes();
        let _api = api_routes();
    }
}
