//! 促销知识库向导 API 处理器
//!
//! 向导会话的创建/丢弃、表单字段与子结构的编辑操作、
//! 导出文档的预览/下载/提交，以及 CSV 模板下载。
//! 每个会话由单一编辑者独占；提交成功后会话即被丢弃。

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use promo_builder::{check_completion, derive_document, document_json_pretty, template};

use crate::{
    dto::{
        AddCustomOptionRequest, ApiResponse, LevelUpUpdateRequest, MissionUpdateRequest,
        PromoSessionDto, SetStepRequest, TierRowUpdateRequest, UpdatePromoFieldsRequest,
        VipMultiplierRequest,
    },
    error::AdminError,
    state::{AppState, PromoSession, TOTAL_STEPS},
};

/// 在会话上执行一次修改并返回更新后的会话视图
fn with_session<T>(
    state: &AppState,
    id: Uuid,
    op: impl FnOnce(&mut PromoSession) -> Result<T, AdminError>,
) -> Result<(T, PromoSessionDto), AdminError> {
    let mut entry = state
        .promo_sessions
        .get_mut(&id)
        .ok_or(AdminError::SessionNotFound(id))?;
    let result = op(entry.value_mut())?;
    entry.touch();
    Ok((result, PromoSessionDto::from(entry.value())))
}

/// 创建编辑会话（进入 "Fill Form"）
///
/// POST /api/admin/promo/sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    let session = PromoSession::new();
    let dto = PromoSessionDto::from(&session);

    info!(session_id = %session.id, "Promo session created");
    state.promo_sessions.insert(session.id, session);

    Ok(Json(ApiResponse::success(dto)))
}

/// 查询会话当前状态
///
/// GET /api/admin/promo/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    let entry = state
        .promo_sessions
        .get(&id)
        .ok_or(AdminError::SessionNotFound(id))?;
    Ok(Json(ApiResponse::success(PromoSessionDto::from(&*entry))))
}

/// 丢弃会话（"返回" 或放弃编辑）
///
/// DELETE /api/admin/promo/sessions/:id
pub async fn discard_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    state
        .promo_sessions
        .remove(&id)
        .ok_or(AdminError::SessionNotFound(id))?;

    info!(session_id = %id, "Promo session discarded");
    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 部分更新表单字段
///
/// PATCH /api/admin/promo/sessions/:id/fields
pub async fn update_fields(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePromoFieldsRequest>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    req.validate()?;

    let (_, dto) = with_session(&state, id, |session| {
        let form = &mut session.form;

        macro_rules! apply {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(value) = req.$field {
                    form.$field = value;
                })+
            };
        }

        apply!(
            client_id,
            promo_name,
            promo_type,
            intent_category,
            target_segment,
            trigger_event,
            reward_mode,
            reward_type,
            reward_amount,
            min_requirement,
            max_claim,
            turnover_rule,
            claim_frequency,
            conversion_formula,
            platform_access,
            game_restriction,
            valid_from,
            valid_until,
            status,
            require_apk,
            geo_restriction,
            time_restriction,
            response_template_offer,
            response_template_requirement,
            response_template_instruction,
            ai_guidelines,
            default_behavior,
            completion_steps,
            point_unit,
            exp_mode,
            calculation_method,
            lp_formula_input,
            lp_formula_output,
            lp_formula_input_lp,
            lp_formula_output_lp,
            exp_formula_input,
            exp_formula_output,
            custom_lp_formula,
            lp_conversion_value,
            lp_conversion_type,
            reward_distribution,
            level_up_rewards_enabled,
            custom_terms,
        );

        Ok(())
    })?;

    Ok(Json(ApiResponse::success(dto)))
}

/// 保存草稿（状态置为 Draft，会话保留）
///
/// POST /api/admin/promo/sessions/:id/draft
pub async fn save_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    let (_, dto) = with_session(&state, id, |session| {
        session.form.status = "Draft".to_string();
        Ok(())
    })?;

    Ok(Json(ApiResponse::success_with_message(
        dto,
        "草稿已保存，可稍后继续编辑",
    )))
}

// ==================== 步骤导航 ====================

/// 跳转到指定步骤
///
/// PATCH /api/admin/promo/sessions/:id/step
pub async fn set_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetStepRequest>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    req.validate()?;

    let (_, dto) = with_session(&state, id, |session| {
        session.step = req.step;
        Ok(())
    })?;

    Ok(Json(ApiResponse::success(dto)))
}

/// 下一步（最后一步时原地不动）
///
/// POST /api/admin/promo/sessions/:id/step/next
pub async fn next_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    let (_, dto) = with_session(&state, id, |session| {
        if session.step < TOTAL_STEPS {
            session.step += 1;
        }
        Ok(())
    })?;

    Ok(Json(ApiResponse::success(dto)))
}

/// 上一步（第一步时原地不动）
///
/// POST /api/admin/promo/sessions/:id/step/prev
pub async fn prev_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    let (_, dto) = with_session(&state, id, |session| {
        if session.step > 1 {
            session.step -= 1;
        }
        Ok(())
    })?;

    Ok(Json(ApiResponse::success(dto)))
}

// ==================== 奖励表行 ====================

/// 追加奖励表行
///
/// POST /api/admin/promo/sessions/:id/tiers
pub async fn add_tier_row(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    let (_, dto) = with_session(&state, id, |session| {
        session.form.add_tier_row();
        Ok(())
    })?;

    Ok(Json(ApiResponse::success(dto)))
}

/// 更新奖励表行的某一列
///
/// PATCH /api/admin/promo/sessions/:id/tiers/:row_id
pub async fn update_tier_row(
    State(state): State<AppState>,
    Path((id, row_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<TierRowUpdateRequest>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    let (_, dto) = with_session(&state, id, |session| {
        if !session.form.update_tier_row(row_id, req.field, &req.value) {
            return Err(AdminError::RowNotFound(row_id.to_string()));
        }
        Ok(())
    })?;

    Ok(Json(ApiResponse::success(dto)))
}

/// 删除奖励表行（删到空时自动补一个空行）
///
/// DELETE /api/admin/promo/sessions/:id/tiers/:row_id
pub async fn remove_tier_row(
    State(state): State<AppState>,
    Path((id, row_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    let (_, dto) = with_session(&state, id, |session| {
        if !session.form.remove_tier_row(row_id) {
            return Err(AdminError::RowNotFound(row_id.to_string()));
        }
        Ok(())
    })?;

    Ok(Json(ApiResponse::success(dto)))
}

// ==================== Fast EXP 任务 ====================

/// 追加任务
///
/// POST /api/admin/promo/sessions/:id/missions
pub async fn add_mission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    let (_, dto) = with_session(&state, id, |session| {
        session.form.add_fast_exp_mission();
        Ok(())
    })?;

    Ok(Json(ApiResponse::success(dto)))
}

/// 更新任务的某一列
///
/// PATCH /api/admin/promo/sessions/:id/missions/:mission_id
pub async fn update_mission(
    State(state): State<AppState>,
    Path((id, mission_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<MissionUpdateRequest>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    let (_, dto) = with_session(&state, id, |session| {
        if !session
            .form
            .update_fast_exp_mission(mission_id, req.field, &req.value)
        {
            return Err(AdminError::RowNotFound(mission_id.to_string()));
        }
        Ok(())
    })?;

    Ok(Json(ApiResponse::success(dto)))
}

/// 删除任务
///
/// DELETE /api/admin/promo/sessions/:id/missions/:mission_id
pub async fn remove_mission(
    State(state): State<AppState>,
    Path((id, mission_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    let (_, dto) = with_session(&state, id, |session| {
        if !session.form.remove_fast_exp_mission(mission_id) {
            return Err(AdminError::RowNotFound(mission_id.to_string()));
        }
        Ok(())
    })?;

    Ok(Json(ApiResponse::success(dto)))
}

// ==================== 升级奖励与 VIP ====================

/// 更新升级奖励的某一列（五条固定记录只更新不增删）
///
/// PATCH /api/admin/promo/sessions/:id/level-rewards/:reward_id
pub async fn update_level_reward(
    State(state): State<AppState>,
    Path((id, reward_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<LevelUpUpdateRequest>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    let (_, dto) = with_session(&state, id, |session| {
        if !session
            .form
            .update_level_up_reward(reward_id, req.field, &req.value)
        {
            return Err(AdminError::RowNotFound(reward_id.to_string()));
        }
        Ok(())
    })?;

    Ok(Json(ApiResponse::success(dto)))
}

/// 更新 VIP 倍率配置
///
/// PATCH /api/admin/promo/sessions/:id/vip
pub async fn update_vip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<VipMultiplierRequest>,
) -> Result<Json<ApiResponse<PromoSessionDto>>, AdminError> {
    req.validate()?;

    let (_, dto) = with_session(&state, id, |session| {
        let vip = &mut session.form.vip_multiplier;
        if let Some(enabled) = req.enabled {
            vip.enabled = enabled;
        }
        if let Some(min_daily_to) = req.min_daily_to {
            vip.min_daily_to = min_daily_to;
        }
        if let Some(silver) = req.silver {
            vip.silver = silver;
        }
        if let Some(gold) = req.gold {
            vip.gold = gold;
        }
        if let Some(platinum) = req.platinum {
            vip.platinum = platinum;
        }
        if let Some(diamond) = req.diamond {
            vip.diamond = diamond;
        }
        Ok(())
    })?;

    Ok(Json(ApiResponse::success(dto)))
}

// ==================== 自定义选项 ====================

/// 为下拉字段追加自定义选项，返回该字段的全部可选项
///
/// POST /api/admin/promo/sessions/:id/options
pub async fn add_custom_option(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddCustomOptionRequest>,
) -> Result<Json<ApiResponse<Vec<String>>>, AdminError> {
    req.validate()?;

    let (options, _) = with_session(&state, id, |session| {
        session.catalog.add_custom(req.field, &req.value);
        Ok(session.catalog.options_for(req.field))
    })?;

    Ok(Json(ApiResponse::success(options)))
}

// ==================== 文档与提交 ====================

/// 预览导出文档
///
/// GET /api/admin/promo/sessions/:id/document
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AdminError> {
    let entry = state
        .promo_sessions
        .get(&id)
        .ok_or(AdminError::SessionNotFound(id))?;

    let document = Value::Object(derive_document(&entry.form));
    Ok(Json(ApiResponse::success(document)))
}

/// 下载导出文档（JSON 文本附件）
///
/// GET /api/admin/promo/sessions/:id/export
pub async fn export_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AdminError> {
    let entry = state
        .promo_sessions
        .get(&id)
        .ok_or(AdminError::SessionNotFound(id))?;

    let body = document_json_pretty(&entry.form);
    Ok((
        [
            (header::CONTENT_TYPE, "application/json; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"voc-promo-export.json\"",
            ),
        ],
        body,
    )
        .into_response())
}

/// 提交：必填字段齐全则返回最终文档并丢弃会话
///
/// POST /api/admin/promo/sessions/:id/submit
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AdminError> {
    let document = {
        let entry = state
            .promo_sessions
            .get(&id)
            .ok_or(AdminError::SessionNotFound(id))?;

        check_completion(&entry.form)?;
        Value::Object(derive_document(&entry.form))
    };

    // 提交成功后会话即被丢弃（对应界面回到入口选择页）
    state.promo_sessions.remove(&id);
    info!(session_id = %id, "Promo submitted to knowledge base");

    Ok(Json(ApiResponse::success_with_message(
        document,
        "促销已保存到知识库",
    )))
}

/// 下载 CSV 模板（"手动上传"流程的第一步）
///
/// GET /api/admin/promo/template
pub async fn download_template() -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"voc-promo-builder-template.csv\"",
            ),
        ],
        template::CSV_TEMPLATE,
    )
        .into_response()
}
