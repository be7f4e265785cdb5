//! 客服配置 API 处理器
//!
//! 七类配置记录的读取与保存：品牌档案、沟通风格、升级转人工、
//! 安全/危机、玩家行为、账号信息、API 凭据。
//! 每类配置每个属主至多一行，保存是按 user_id 的整体覆盖
//! （INSERT ... ON CONFLICT DO UPDATE）。
//! 保存失败只向调用方报告一次通用失败，不自动重试，内存状态由调用方保留。

use axum::{
    Json,
    extract::{Path, State},
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        AccountDto, ApiDataDto, ApiResponse, BrandProfileDto, CommunicationStyleDto,
        PlayerBehaviourDto, SafetyCrisisDto, SupportEscalationDto, VocConfigDto,
    },
    error::AdminError,
    state::AppState,
};

// ==================== 行结构 ====================

#[derive(sqlx::FromRow)]
struct BrandProfileRow {
    brand_name: Option<String>,
    short_name: Option<String>,
    slogan: Option<String>,
    agent_name: Option<String>,
    agent_gender: Option<String>,
    tone_style: Option<String>,
    default_call_to_player: Option<String>,
    emoji_preference: Option<String>,
}

#[derive(sqlx::FromRow)]
struct CommunicationStyleRow {
    formality_level: Option<i32>,
    warmth_level: Option<i32>,
    humor_usage: Option<String>,
    emoji_style: Option<String>,
}

#[derive(sqlx::FromRow)]
struct SupportEscalationRow {
    admin_contact_method: Option<String>,
    admin_contact: Option<String>,
    pic_active_hours: Option<String>,
    escalation_threshold: Option<Vec<String>>,
    sop_style: Option<String>,
    default_escalation_message: Option<String>,
}

#[derive(sqlx::FromRow)]
struct SafetyCrisisRow {
    crisis_tone_style: Option<String>,
    bonus_preventif_allowed: Option<bool>,
    bonus_preventif_limit: Option<String>,
    risk_appetite: Option<i32>,
    forbidden_phrases: Option<String>,
    allowed_sensitive_terms: Option<String>,
    crisis_keywords: Option<String>,
    crisis_response_template: Option<String>,
}

#[derive(sqlx::FromRow)]
struct PlayerBehaviourRow {
    personalization_level: Option<i32>,
    sentimental_memory: Option<bool>,
    anti_hunter_aggressiveness: Option<i32>,
    silent_sniper_style: Option<Vec<String>>,
    vip_threshold: Option<String>,
    vip_tone: Option<Vec<String>>,
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    user_name: Option<String>,
    whatsapp_number: Option<String>,
    email: Option<String>,
    position: Option<String>,
}

#[derive(sqlx::FromRow)]
struct ApiDataRow {
    supabase_api: Option<String>,
    chat_gpt_api: Option<String>,
}

// ==================== 读取 ====================

async fn fetch_brand_profile(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<BrandProfileDto>, sqlx::Error> {
    let row = sqlx::query_as::<_, BrandProfileRow>(
        r#"
        SELECT brand_name, short_name, slogan, agent_name, agent_gender,
               tone_style, default_call_to_player, emoji_preference
        FROM ai_brand_profile
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| BrandProfileDto {
        brand_name: r.brand_name.unwrap_or_default(),
        short_name: r.short_name.unwrap_or_default(),
        slogan: r.slogan.unwrap_or_default(),
        agent_name: r.agent_name.unwrap_or_default(),
        agent_gender: r.agent_gender.unwrap_or_default(),
        tone_style: r.tone_style.unwrap_or_default(),
        default_call_to_player: r.default_call_to_player.unwrap_or_default(),
        emoji_preference: r.emoji_preference.unwrap_or_default(),
    }))
}

async fn fetch_communication_style(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<CommunicationStyleDto>, sqlx::Error> {
    let row = sqlx::query_as::<_, CommunicationStyleRow>(
        r#"
        SELECT formality_level, warmth_level, humor_usage, emoji_style
        FROM ai_communication_style
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| CommunicationStyleDto {
        // 滑杆默认停在中间档
        formality_level: r.formality_level.unwrap_or(5),
        warmth_level: r.warmth_level.unwrap_or(5),
        humor_usage: r.humor_usage.unwrap_or_default(),
        emoji_style: r.emoji_style.unwrap_or_default(),
    }))
}

async fn fetch_support_escalation(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<SupportEscalationDto>, sqlx::Error> {
    let row = sqlx::query_as::<_, SupportEscalationRow>(
        r#"
        SELECT admin_contact_method, admin_contact, pic_active_hours,
               escalation_threshold, sop_style, default_escalation_message
        FROM ai_support_escalation
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SupportEscalationDto {
        admin_contact_method: r.admin_contact_method.unwrap_or_default(),
        admin_contact: r.admin_contact.unwrap_or_default(),
        pic_active_hours: r.pic_active_hours.unwrap_or_default(),
        escalation_threshold: r.escalation_threshold.unwrap_or_default(),
        sop_style: r.sop_style.unwrap_or_default(),
        default_escalation_message: r.default_escalation_message.unwrap_or_default(),
    }))
}

async fn fetch_safety_crisis(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<SafetyCrisisDto>, sqlx::Error> {
    let row = sqlx::query_as::<_, SafetyCrisisRow>(
        r#"
        SELECT crisis_tone_style, bonus_preventif_allowed, bonus_preventif_limit,
               risk_appetite, forbidden_phrases, allowed_sensitive_terms,
               crisis_keywords, crisis_response_template
        FROM ai_safety_crisis
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SafetyCrisisDto {
        crisis_tone_style: r.crisis_tone_style.unwrap_or_default(),
        bonus_preventif_allowed: r.bonus_preventif_allowed.unwrap_or(false),
        bonus_preventif_limit: r.bonus_preventif_limit.unwrap_or_default(),
        risk_appetite: r.risk_appetite.unwrap_or(50),
        forbidden_phrases: r.forbidden_phrases.unwrap_or_default(),
        allowed_sensitive_terms: r.allowed_sensitive_terms.unwrap_or_default(),
        crisis_keywords: r.crisis_keywords.unwrap_or_default(),
        crisis_response_template: r.crisis_response_template.unwrap_or_default(),
    }))
}

async fn fetch_player_behaviour(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<PlayerBehaviourDto>, sqlx::Error> {
    let row = sqlx::query_as::<_, PlayerBehaviourRow>(
        r#"
        SELECT personalization_level, sentimental_memory, anti_hunter_aggressiveness,
               silent_sniper_style, vip_threshold, vip_tone
        FROM ai_player_behaviour
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| PlayerBehaviourDto {
        personalization_level: r.personalization_level.unwrap_or(5),
        sentimental_memory: r.sentimental_memory.unwrap_or(false),
        anti_hunter_aggressiveness: r.anti_hunter_aggressiveness.unwrap_or(5),
        silent_sniper_style: r.silent_sniper_style.unwrap_or_default(),
        vip_threshold: r.vip_threshold.unwrap_or_default(),
        vip_tone: r.vip_tone.unwrap_or_default(),
    }))
}

async fn fetch_account(pool: &PgPool, user_id: Uuid) -> Result<Option<AccountDto>, sqlx::Error> {
    let row = sqlx::query_as::<_, AccountRow>(
        r#"
        SELECT user_name, whatsapp_number, email, position
        FROM client_account
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| AccountDto {
        user_name: r.user_name.unwrap_or_default(),
        whatsapp_number: r.whatsapp_number.unwrap_or_default(),
        email: r.email.unwrap_or_default(),
        position: r.position.unwrap_or_default(),
    }))
}

async fn fetch_api_data(pool: &PgPool, user_id: Uuid) -> Result<Option<ApiDataDto>, sqlx::Error> {
    let row = sqlx::query_as::<_, ApiDataRow>(
        r#"
        SELECT supabase_api, chat_gpt_api
        FROM client_api_data
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| ApiDataDto {
        supabase_api: r.supabase_api.unwrap_or_default(),
        chat_gpt_api: r.chat_gpt_api.unwrap_or_default(),
    }))
}

/// 读取某属主的全部配置
///
/// GET /api/admin/config/:user_id
pub async fn get_config(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<VocConfigDto>>, AdminError> {
    let (
        brand_profile,
        communication_style,
        support_escalation,
        safety_crisis,
        player_behaviour,
        account,
        api_data,
    ) = tokio::try_join!(
        fetch_brand_profile(&state.pool, user_id),
        fetch_communication_style(&state.pool, user_id),
        fetch_support_escalation(&state.pool, user_id),
        fetch_safety_crisis(&state.pool, user_id),
        fetch_player_behaviour(&state.pool, user_id),
        fetch_account(&state.pool, user_id),
        fetch_api_data(&state.pool, user_id),
    )?;

    Ok(Json(ApiResponse::success(VocConfigDto {
        brand_profile,
        communication_style,
        support_escalation,
        safety_crisis,
        player_behaviour,
        account,
        api_data,
    })))
}

// ==================== 保存 ====================

/// 保存品牌档案
///
/// PUT /api/admin/config/:user_id/brand-profile
pub async fn save_brand_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<BrandProfileDto>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    req.validate()?;

    sqlx::query(
        r#"
        INSERT INTO ai_brand_profile
            (user_id, brand_name, short_name, slogan, agent_name, agent_gender,
             tone_style, default_call_to_player, emoji_preference, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now())
        ON CONFLICT (user_id) DO UPDATE SET
            brand_name = EXCLUDED.brand_name,
            short_name = EXCLUDED.short_name,
            slogan = EXCLUDED.slogan,
            agent_name = EXCLUDED.agent_name,
            agent_gender = EXCLUDED.agent_gender,
            tone_style = EXCLUDED.tone_style,
            default_call_to_player = EXCLUDED.default_call_to_player,
            emoji_preference = EXCLUDED.emoji_preference,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(&req.brand_name)
    .bind(&req.short_name)
    .bind(&req.slogan)
    .bind(&req.agent_name)
    .bind(&req.agent_gender)
    .bind(&req.tone_style)
    .bind(&req.default_call_to_player)
    .bind(&req.emoji_preference)
    .execute(&state.pool)
    .await?;

    info!(%user_id, "Brand profile saved");

    Ok(Json(ApiResponse::<()>::success_with_message(
        (),
        "品牌档案保存成功",
    )))
}

/// 保存沟通风格
///
/// PUT /api/admin/config/:user_id/communication-style
pub async fn save_communication_style(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<CommunicationStyleDto>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    req.validate()?;

    sqlx::query(
        r#"
        INSERT INTO ai_communication_style
            (user_id, formality_level, warmth_level, humor_usage, emoji_style, updated_at)
        VALUES ($1, $2, $3, $4, $5, now())
        ON CONFLICT (user_id) DO UPDATE SET
            formality_level = EXCLUDED.formality_level,
            warmth_level = EXCLUDED.warmth_level,
            humor_usage = EXCLUDED.humor_usage,
            emoji_style = EXCLUDED.emoji_style,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(req.formality_level)
    .bind(req.warmth_level)
    .bind(&req.humor_usage)
    .bind(&req.emoji_style)
    .execute(&state.pool)
    .await?;

    info!(%user_id, "Communication style saved");

    Ok(Json(ApiResponse::<()>::success_with_message(
        (),
        "沟通风格保存成功",
    )))
}

/// 保存升级转人工配置
///
/// PUT /api/admin/config/:user_id/support-escalation
pub async fn save_support_escalation(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SupportEscalationDto>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    req.validate()?;

    sqlx::query(
        r#"
        INSERT INTO ai_support_escalation
            (user_id, admin_contact_method, admin_contact, pic_active_hours,
             escalation_threshold, sop_style, default_escalation_message, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, now())
        ON CONFLICT (user_id) DO UPDATE SET
            admin_contact_method = EXCLUDED.admin_contact_method,
            admin_contact = EXCLUDED.admin_contact,
            pic_active_hours = EXCLUDED.pic_active_hours,
            escalation_threshold = EXCLUDED.escalation_threshold,
            sop_style = EXCLUDED.sop_style,
            default_escalation_message = EXCLUDED.default_escalation_message,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(&req.admin_contact_method)
    .bind(&req.admin_contact)
    .bind(&req.pic_active_hours)
    .bind(&req.escalation_threshold)
    .bind(&req.sop_style)
    .bind(&req.default_escalation_message)
    .execute(&state.pool)
    .await?;

    info!(%user_id, "Support escalation saved");

    Ok(Json(ApiResponse::<()>::success_with_message(
        (),
        "升级转人工配置保存成功",
    )))
}

/// 保存安全与危机设置
///
/// PUT /api/admin/config/:user_id/safety-crisis
pub async fn save_safety_crisis(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SafetyCrisisDto>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    req.validate()?;

    sqlx::query(
        r#"
        INSERT INTO ai_safety_crisis
            (user_id, crisis_tone_style, bonus_preventif_allowed, bonus_preventif_limit,
             risk_appetite, forbidden_phrases, allowed_sensitive_terms,
             crisis_keywords, crisis_response_template, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now())
        ON CONFLICT (user_id) DO UPDATE SET
            crisis_tone_style = EXCLUDED.crisis_tone_style,
            bonus_preventif_allowed = EXCLUDED.bonus_preventif_allowed,
            bonus_preventif_limit = EXCLUDED.bonus_preventif_limit,
            risk_appetite = EXCLUDED.risk_appetite,
            forbidden_phrases = EXCLUDED.forbidden_phrases,
            allowed_sensitive_terms = EXCLUDED.allowed_sensitive_terms,
            crisis_keywords = EXCLUDED.crisis_keywords,
            crisis_response_template = EXCLUDED.crisis_response_template,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(&req.crisis_tone_style)
    .bind(req.bonus_preventif_allowed)
    .bind(&req.bonus_preventif_limit)
    .bind(req.risk_appetite)
    .bind(&req.forbidden_phrases)
    .bind(&req.allowed_sensitive_terms)
    .bind(&req.crisis_keywords)
    .bind(&req.crisis_response_template)
    .execute(&state.pool)
    .await?;

    info!(%user_id, "Safety & crisis settings saved");

    Ok(Json(ApiResponse::<()>::success_with_message(
        (),
        "安全与危机设置保存成功",
    )))
}

/// 保存玩家行为设置
///
/// PUT /api/admin/config/:user_id/player-behaviour
pub async fn save_player_behaviour(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<PlayerBehaviourDto>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    req.validate()?;

    sqlx::query(
        r#"
        INSERT INTO ai_player_behaviour
            (user_id, personalization_level, sentimental_memory, anti_hunter_aggressiveness,
             silent_sniper_style, vip_threshold, vip_tone, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, now())
        ON CONFLICT (user_id) DO UPDATE SET
            personalization_level = EXCLUDED.personalization_level,
            sentimental_memory = EXCLUDED.sentimental_memory,
            anti_hunter_aggressiveness = EXCLUDED.anti_hunter_aggressiveness,
            silent_sniper_style = EXCLUDED.silent_sniper_style,
            vip_threshold = EXCLUDED.vip_threshold,
            vip_tone = EXCLUDED.vip_tone,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(req.personalization_level)
    .bind(req.sentimental_memory)
    .bind(req.anti_hunter_aggressiveness)
    .bind(&req.silent_sniper_style)
    .bind(&req.vip_threshold)
    .bind(&req.vip_tone)
    .execute(&state.pool)
    .await?;

    info!(%user_id, "Player behaviour saved");

    Ok(Json(ApiResponse::<()>::success_with_message(
        (),
        "玩家行为设置保存成功",
    )))
}

/// 保存账号信息
///
/// PUT /api/admin/config/:user_id/account
pub async fn save_account(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<AccountDto>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    req.validate()?;

    sqlx::query(
        r#"
        INSERT INTO client_account
            (user_id, user_name, whatsapp_number, email, position, updated_at)
        VALUES ($1, $2, $3, $4, $5, now())
        ON CONFLICT (user_id) DO UPDATE SET
            user_name = EXCLUDED.user_name,
            whatsapp_number = EXCLUDED.whatsapp_number,
            email = EXCLUDED.email,
            position = EXCLUDED.position,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(&req.user_name)
    .bind(&req.whatsapp_number)
    .bind(&req.email)
    .bind(&req.position)
    .execute(&state.pool)
    .await?;

    info!(%user_id, "Account saved");

    Ok(Json(ApiResponse::<()>::success_with_message(
        (),
        "账号信息保存成功",
    )))
}

/// 保存外部 API 凭据
///
/// PUT /api/admin/config/:user_id/api-data
pub async fn save_api_data(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ApiDataDto>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    req.validate()?;

    sqlx::query(
        r#"
        INSERT INTO client_api_data
            (user_id, supabase_api, chat_gpt_api, updated_at)
        VALUES ($1, $2, $3, now())
        ON CONFLICT (user_id) DO UPDATE SET
            supabase_api = EXCLUDED.supabase_api,
            chat_gpt_api = EXCLUDED.chat_gpt_api,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(&req.supabase_api)
    .bind(&req.chat_gpt_api)
    .execute(&state.pool)
    .await?;

    info!(%user_id, "API data saved");

    Ok(Json(ApiResponse::<()>::success_with_message(
        (),
        "API 凭据保存成功",
    )))
}
