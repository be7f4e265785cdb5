//! 促销构建核心集成测试
//!
//! 测试完整的表单填写、可见性切换、文档生成和提交工作流。

use promo_builder::{
    CalculationMethod, ExpMode, LevelField, PointUnit, PromoForm, TierField, block_visibility,
    check_completion, derive_document, missing_required_fields,
};
use serde_json::json;

/// 填写一个典型的 LP 积分类促销
fn fill_lp_promo() -> PromoForm {
    let mut form = PromoForm::new();
    form.client_id = "WG77".to_string();
    form.promo_name = "Loyalty Mingguan".to_string();
    form.promo_type = "Loyalty Points".to_string();
    form.intent_category = "Retention".to_string();
    form.target_segment = "Existing".to_string();
    form.trigger_event = "TO".to_string();
    form.platform_access = "Semua".to_string();
    form.game_restriction = "Slots".to_string();
    form.valid_from = "2024-06-01".to_string();
    form.response_template_offer = "Kumpulkan LP setiap minggu!".to_string();

    form.lp_formula_input = "1000".to_string();
    form.lp_formula_output = "1".to_string();
    form.lp_conversion_value = "5000".to_string();
    form.lp_conversion_type = "Credit Game".to_string();
    form.reward_distribution = "after_requirement".to_string();

    let row = form.tier_rows[0].id;
    form.update_tier_row(row, TierField::MinPoint, "250");
    form.update_tier_row(row, TierField::Reward, "50");
    form.update_tier_row(row, TierField::RewardValueType, "percentage");
    form.update_tier_row(row, TierField::Type, "Freechip");
    form
}

#[test]
fn test_lp_promo_end_to_end() {
    let form = fill_lp_promo();
    assert!(check_completion(&form).is_ok());

    let doc = derive_document(&form);
    assert_eq!(doc.get("promo_unit"), Some(&json!("LP")));
    assert_eq!(doc.get("lp_calc_method"), Some(&json!("turnover")));
    assert_eq!(doc.get("lp_formula"), Some(&json!("1000 TO = 1 LP")));
    assert_eq!(doc.get("lp_value"), Some(&json!("1 LP = 5000 credit_game")));
    assert_eq!(
        doc.get("reward_distribution"),
        Some(&json!("After Requirement (setelah syarat terpenuhi)"))
    );
    assert_eq!(
        doc.get("tiers").unwrap(),
        &json!([{
            "minimal_point": 250,
            "reward": "50%",
            "type": "freechip",
            "reward_type": "percentage",
        }])
    );
    // LP 单位下 EXP 段落全部缺席
    assert!(!doc.contains_key("exp_mode"));
    assert!(!doc.contains_key("exp_formula"));
    assert!(!doc.contains_key("fast_exp_missions"));
    assert!(!doc.contains_key("level_up_rewards"));
}

#[test]
fn test_hide_then_reshow_preserves_block_state() {
    let mut form = PromoForm::new();
    form.point_unit = PointUnit::Hybrid;
    form.exp_mode = ExpMode::Both;
    form.level_up_rewards_enabled = true;

    let gold = form.level_up_rewards[2].id;
    form.update_level_up_reward(gold, LevelField::MinExp, "5000");
    form.update_level_up_reward(gold, LevelField::Reward, "250");
    form.update_level_up_reward(gold, LevelField::RewardType, "Freechip");

    // hybrid 下 C5 可见且有数据
    let doc = derive_document(&form);
    assert!(doc.contains_key("level_up_rewards"));

    // 切到 LP：C5 隐藏，导出文档中消失，但状态数据不被清除
    form.point_unit = PointUnit::Lp;
    let doc = derive_document(&form);
    assert!(!doc.contains_key("level_up_rewards"));
    assert_eq!(form.level_up_rewards[2].min_exp, "5000");

    // 切回 hybrid：先前录入的值原样回到文档
    form.point_unit = PointUnit::Hybrid;
    let doc = derive_document(&form);
    assert_eq!(
        doc.get("level_up_rewards").unwrap(),
        &json!([{
            "tier": "Gold",
            "min_exp": 5000,
            "reward": 250,
            "reward_type": "fixed",
            "type": "freechip",
        }])
    );
}

#[test]
fn test_exp_store_document_shape() {
    let mut form = PromoForm::new();
    form.point_unit = PointUnit::Exp;
    form.exp_mode = ExpMode::ExpStore;
    form.exp_formula_input = "1000".to_string();
    form.exp_formula_output = "1".to_string();

    let row = form.tier_rows[0].id;
    form.update_tier_row(row, TierField::MinPoint, "500");
    form.update_tier_row(row, TierField::Reward, "25000");
    form.update_tier_row(row, TierField::Type, "Credit Game");

    let vis = block_visibility(form.point_unit, form.exp_mode);
    assert!(!vis.conversion && vis.tier_store && vis.fast_exp && !vis.level_up);

    let doc = derive_document(&form);
    assert_eq!(doc.get("promo_unit"), Some(&json!("EXP")));
    assert_eq!(doc.get("exp_mode"), Some(&json!("exp_store")));
    assert_eq!(doc.get("exp_formula"), Some(&json!("1000 TO = 1 EXP")));
    assert!(!doc.contains_key("lp_calc_method"));
    assert!(doc.contains_key("tiers"));
}

#[test]
fn test_submission_gate_reports_missing_set() {
    let mut form = fill_lp_promo();
    form.client_id = String::new();
    form.valid_from = String::new();

    let missing = missing_required_fields(&form);
    assert_eq!(missing, vec!["client_id", "valid_from"]);
    assert!(check_completion(&form).is_err());

    form.client_id = "WG77".to_string();
    form.valid_from = "2024-06-01".to_string();
    assert!(check_completion(&form).is_ok());
}

#[test]
fn test_custom_method_with_spin_label() {
    let mut form = PromoForm::new();
    form.calculation_method = CalculationMethod::Spin;
    form.lp_formula_input = "200".to_string();
    form.lp_formula_output = "1".to_string();
    let doc = derive_document(&form);
    assert_eq!(doc.get("lp_formula"), Some(&json!("200 Spin = 1 LP")));
}

#[test]
fn test_reset_clears_everything_for_new_promo() {
    let mut form = fill_lp_promo();
    form.reset();
    assert_eq!(form.promo_name, "");
    assert_eq!(form.reward_tiers, "");
    assert_eq!(missing_required_fields(&form).len(), 10);
    let doc = derive_document(&form);
    assert!(!doc.contains_key("tiers"));
}
