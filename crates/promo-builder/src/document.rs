//! 导出文档生成器
//!
//! 从当前表单状态按需生成规范化的导出文档（纯投影，不修改模型，
//! 不做增量维护）。下游以"键是否存在"判断某个功能是否已配置，
//! 因此未填写或不可见的段落整体省略，绝不输出 null 或空数组。
//!
//! 字段映射（表单字段 → 文档键）：
//!
//! | 表单字段                        | 文档键               | 说明                       |
//! |---------------------------------|----------------------|----------------------------|
//! | point_unit                      | promo_unit           | LP / EXP / hybrid          |
//! | exp_mode                        | exp_mode             | 仅 EXP 功能启用时          |
//! | calculation_method              | lp_calc_method       | 仅 LP 功能启用时           |
//! | lp_formula_input/_output        | lp_formula           | 格式化："1000 TO = 1 LP"   |
//! | exp_formula_input/_output       | exp_formula          | 格式化："1000 TO = 1 EXP"  |
//! | lp_conversion_value/_type       | lp_value             | 格式化："1 LP = 5000 credit_game" |
//! | reward_distribution             | reward_distribution  | 写入标签而非键             |
//! | tier_rows[].min_point           | tiers[].minimal_point| 数值化，失败取 0           |
//! | tier_rows[].reward              | tiers[].reward       | 数值或 "50%"               |
//! | tier_rows[].type                | tiers[].type         | 小写、空格转下划线         |
//! | tier_rows[].reward_value_type   | tiers[].reward_type  | fixed / percentage         |
//! | vip_multiplier.*                | vip_multiplier       | Bronze 永不输出            |
//! | custom_terms                    | custom_terms         | 去除首尾空白后非空才输出   |

use serde_json::{Map, Value, json};

use crate::model::{CalculationMethod, PromoForm, RewardValueType};
use crate::options::reward_distribution_label;
use crate::visibility::{PointUnit, block_visibility};

/// 数值化：解析失败时取 0 而不是报错
///
/// 宁可输出有损的 0 也不中断草稿预览；小数输入截断取整。
pub fn coerce_int(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return n;
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return f.trunc() as i64;
        }
    }
    0
}

/// 小写并把空格替换为下划线（"Credit Game" -> "credit_game"）
fn slug(raw: &str) -> String {
    raw.to_lowercase().replace(' ', "_")
}

/// 奖励值格式化：百分比输出 "50%" 文本，固定值输出数值
fn reward_value(raw: &str, value_type: RewardValueType) -> Value {
    match value_type {
        RewardValueType::Percentage => Value::String(format!("{}%", raw)),
        RewardValueType::Fixed => json!(coerce_int(raw)),
    }
}

/// 完整行派生出的 tiers 数组（仅三列齐全的行）
pub fn derive_tiers(form: &PromoForm) -> Vec<Value> {
    form.tier_rows
        .iter()
        .filter(|row| row.is_complete())
        .map(|row| {
            json!({
                "minimal_point": coerce_int(&row.min_point),
                "reward": reward_value(&row.reward, row.reward_value_type),
                "type": slug(&row.kind),
                "reward_type": row.reward_value_type.as_str(),
            })
        })
        .collect()
}

/// LP 公式："<输入> <单位标签> = <输出> LP"
///
/// custom 方式直接使用自由文本，文本为空时回退为字面量 "Custom"。
/// hybrid 单位优先使用 hybrid 专用输入/输出对，不全时退回标准对。
fn lp_formula(form: &PromoForm) -> Option<String> {
    if form.calculation_method == CalculationMethod::Custom {
        return Some(if form.custom_lp_formula.is_empty() {
            "Custom".to_string()
        } else {
            form.custom_lp_formula.clone()
        });
    }

    let hybrid_pair_complete = form.point_unit == PointUnit::Hybrid
        && !form.lp_formula_input_lp.is_empty()
        && !form.lp_formula_output_lp.is_empty();

    let (input, output) = if hybrid_pair_complete {
        (&form.lp_formula_input_lp, &form.lp_formula_output_lp)
    } else {
        (&form.lp_formula_input, &form.lp_formula_output)
    };

    if input.is_empty() || output.is_empty() {
        return None;
    }

    Some(format!(
        "{} {} = {} LP",
        input,
        form.calculation_method.formula_label(),
        output
    ))
}

/// EXP 公式：同 LP 公式的构造方式，使用 EXP 专用输入/输出对
fn exp_formula(form: &PromoForm) -> Option<String> {
    if form.exp_formula_input.is_empty() || form.exp_formula_output.is_empty() {
        return None;
    }
    Some(format!(
        "{} {} = {} EXP",
        form.exp_formula_input,
        form.calculation_method.formula_label(),
        form.exp_formula_output
    ))
}

/// LP 兑换率："1 LP = <数值> <类型小写下划线>"
fn lp_value(form: &PromoForm) -> Option<String> {
    if form.lp_conversion_value.is_empty() || form.lp_conversion_type.is_empty() {
        return None;
    }
    Some(format!(
        "1 LP = {} {}",
        form.lp_conversion_value,
        slug(&form.lp_conversion_type)
    ))
}

/// 生成导出文档
///
/// 键按插入顺序输出；promo_unit 恒在首位。
pub fn derive_document(form: &PromoForm) -> Map<String, Value> {
    let vis = block_visibility(form.point_unit, form.exp_mode);
    let mut doc = Map::new();

    doc.insert("promo_unit".to_string(), json!(form.point_unit.as_str()));

    if vis.exp_features {
        doc.insert("exp_mode".to_string(), json!(form.exp_mode.as_str()));
    }

    if vis.lp_features {
        doc.insert(
            "lp_calc_method".to_string(),
            json!(form.calculation_method.as_str()),
        );

        if let Some(formula) = lp_formula(form) {
            doc.insert("lp_formula".to_string(), Value::String(formula));
        }
    }

    if vis.exp_features {
        if let Some(formula) = exp_formula(form) {
            doc.insert("exp_formula".to_string(), Value::String(formula));
        }
    }

    if vis.lp_features {
        if let Some(value) = lp_value(form) {
            doc.insert("lp_value".to_string(), Value::String(value));
        }
    }

    if !form.reward_distribution.is_empty() {
        let label = reward_distribution_label(&form.reward_distribution);
        // 未知键原样透传
        let label = if label.is_empty() {
            form.reward_distribution.clone()
        } else {
            label.to_string()
        };
        doc.insert("reward_distribution".to_string(), Value::String(label));
    }

    let tiers = derive_tiers(form);
    if !tiers.is_empty() {
        doc.insert("tiers".to_string(), Value::Array(tiers));
    }

    let missions: Vec<Value> = form
        .fast_exp_missions
        .iter()
        .filter(|m| m.is_complete())
        .map(|m| {
            json!({
                "activity": m.activity,
                "bonus_exp": coerce_int(&m.bonus_exp),
            })
        })
        .collect();
    if !missions.is_empty() {
        doc.insert("fast_exp_missions".to_string(), Value::Array(missions));
    }

    if form.level_up_rewards_enabled && vis.level_up {
        let rewards: Vec<Value> = form
            .level_up_rewards
            .iter()
            .filter(|r| r.is_complete())
            .map(|r| {
                json!({
                    "tier": r.tier,
                    "min_exp": coerce_int(&r.min_exp),
                    "reward": reward_value(&r.reward, r.reward_value_type),
                    "reward_type": r.reward_value_type.as_str(),
                    "type": slug(&r.reward_type),
                })
            })
            .collect();
        if !rewards.is_empty() {
            doc.insert("level_up_rewards".to_string(), Value::Array(rewards));
        }
    }

    if form.vip_multiplier.enabled {
        doc.insert(
            "vip_multiplier".to_string(),
            json!({
                "enabled": true,
                "min_daily_to": coerce_int(&form.vip_multiplier.min_daily_to),
                "silver": coerce_int(&form.vip_multiplier.silver),
                "gold": coerce_int(&form.vip_multiplier.gold),
                "platinum": coerce_int(&form.vip_multiplier.platinum),
                "diamond": coerce_int(&form.vip_multiplier.diamond),
            }),
        );
    }

    let terms = form.custom_terms.trim();
    if !terms.is_empty() {
        doc.insert("custom_terms".to_string(), Value::String(terms.to_string()));
    }

    doc
}

/// 导出文档的格式化 JSON 文本（用于预览和下载）
pub fn document_json_pretty(form: &PromoForm) -> String {
    serde_json::to_string_pretty(&Value::Object(derive_document(form))).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LevelField, MissionField, TierField};
    use crate::visibility::ExpMode;

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int("250"), 250);
        assert_eq!(coerce_int(" 250 "), 250);
        assert_eq!(coerce_int("2.5"), 2);
        assert_eq!(coerce_int("abc"), 0);
        assert_eq!(coerce_int(""), 0);
        assert_eq!(coerce_int("-10"), -10);
    }

    #[test]
    fn test_minimal_document_only_contains_unit_and_method() {
        let form = PromoForm::new();
        let doc = derive_document(&form);
        assert_eq!(doc.get("promo_unit"), Some(&json!("LP")));
        assert_eq!(doc.get("lp_calc_method"), Some(&json!("turnover")));
        // 未填写的段落必须整体缺席，不能输出空数组
        assert!(!doc.contains_key("exp_mode"));
        assert!(!doc.contains_key("tiers"));
        assert!(!doc.contains_key("lp_formula"));
        assert!(!doc.contains_key("vip_multiplier"));
        assert!(!doc.contains_key("custom_terms"));
    }

    #[test]
    fn test_promo_unit_always_first_key() {
        let mut form = PromoForm::new();
        form.point_unit = PointUnit::Hybrid;
        form.custom_terms = "S&K berlaku".to_string();
        let doc = derive_document(&form);
        assert_eq!(doc.keys().next().map(String::as_str), Some("promo_unit"));
    }

    #[test]
    fn test_lp_unit_hides_exp_sections() {
        let mut form = PromoForm::new();
        form.point_unit = PointUnit::Lp;
        form.exp_mode = ExpMode::Both;
        form.exp_formula_input = "1000".to_string();
        form.exp_formula_output = "1".to_string();
        let doc = derive_document(&form);
        assert!(!doc.contains_key("exp_mode"));
        assert!(!doc.contains_key("exp_formula"));
    }

    #[test]
    fn test_exp_unit_hides_lp_sections() {
        let mut form = PromoForm::new();
        form.point_unit = PointUnit::Exp;
        form.lp_formula_input = "1000".to_string();
        form.lp_formula_output = "1".to_string();
        form.lp_conversion_value = "5000".to_string();
        form.lp_conversion_type = "Credit Game".to_string();
        let doc = derive_document(&form);
        assert!(!doc.contains_key("lp_calc_method"));
        assert!(!doc.contains_key("lp_formula"));
        assert!(!doc.contains_key("lp_value"));
        assert_eq!(doc.get("exp_mode"), Some(&json!("level_up")));
    }

    #[test]
    fn test_lp_formula_turnover() {
        let mut form = PromoForm::new();
        form.lp_formula_input = "1000".to_string();
        form.lp_formula_output = "1".to_string();
        let doc = derive_document(&form);
        assert_eq!(doc.get("lp_formula"), Some(&json!("1000 TO = 1 LP")));
    }

    #[test]
    fn test_lp_formula_custom_fallback() {
        let mut form = PromoForm::new();
        form.calculation_method = CalculationMethod::Custom;
        let doc = derive_document(&form);
        assert_eq!(doc.get("lp_formula"), Some(&json!("Custom")));

        form.custom_lp_formula = "TO x 0.001 dibulatkan ke bawah".to_string();
        let doc = derive_document(&form);
        assert_eq!(
            doc.get("lp_formula"),
            Some(&json!("TO x 0.001 dibulatkan ke bawah"))
        );
    }

    #[test]
    fn test_lp_formula_hybrid_prefers_dedicated_pair() {
        let mut form = PromoForm::new();
        form.point_unit = PointUnit::Hybrid;
        form.lp_formula_input = "1000".to_string();
        form.lp_formula_output = "1".to_string();
        form.lp_formula_input_lp = "2000".to_string();
        form.lp_formula_output_lp = "3".to_string();
        let doc = derive_document(&form);
        assert_eq!(doc.get("lp_formula"), Some(&json!("2000 TO = 3 LP")));

        // hybrid 对不全时退回标准对
        form.lp_formula_output_lp = String::new();
        let doc = derive_document(&form);
        assert_eq!(doc.get("lp_formula"), Some(&json!("1000 TO = 1 LP")));
    }

    #[test]
    fn test_exp_formula() {
        let mut form = PromoForm::new();
        form.point_unit = PointUnit::Exp;
        form.exp_formula_input = "500".to_string();
        form.exp_formula_output = "1".to_string();
        let doc = derive_document(&form);
        assert_eq!(doc.get("exp_formula"), Some(&json!("500 TO = 1 EXP")));
    }

    #[test]
    fn test_lp_value_slugs_conversion_type() {
        let mut form = PromoForm::new();
        form.lp_conversion_value = "5000".to_string();
        form.lp_conversion_type = "Credit Game".to_string();
        let doc = derive_document(&form);
        assert_eq!(doc.get("lp_value"), Some(&json!("1 LP = 5000 credit_game")));
    }

    #[test]
    fn test_reward_distribution_uses_label() {
        let mut form = PromoForm::new();
        form.reward_distribution = "instant".to_string();
        let doc = derive_document(&form);
        assert_eq!(
            doc.get("reward_distribution"),
            Some(&json!("Instant (langsung diberikan)"))
        );

        // 未知键原样透传
        form.reward_distribution = "setiap jumat".to_string();
        let doc = derive_document(&form);
        assert_eq!(doc.get("reward_distribution"), Some(&json!("setiap jumat")));
    }

    #[test]
    fn test_tier_round_trip() {
        let mut form = PromoForm::new();
        let id = form.tier_rows[0].id;
        form.update_tier_row(id, TierField::MinPoint, "250");
        form.update_tier_row(id, TierField::Reward, "50");
        form.update_tier_row(id, TierField::RewardValueType, "percentage");
        form.update_tier_row(id, TierField::Type, "Freechip");

        let doc = derive_document(&form);
        assert_eq!(
            doc.get("tiers"),
            Some(&json!([{
                "minimal_point": 250,
                "reward": "50%",
                "type": "freechip",
                "reward_type": "percentage",
            }]))
        );
    }

    #[test]
    fn test_tier_fixed_reward_is_numeric() {
        let mut form = PromoForm::new();
        let id = form.tier_rows[0].id;
        form.update_tier_row(id, TierField::MinPoint, "100");
        form.update_tier_row(id, TierField::Reward, "25000");
        form.update_tier_row(id, TierField::Type, "Credit Game");

        let doc = derive_document(&form);
        let tiers = doc.get("tiers").unwrap().as_array().unwrap();
        assert_eq!(tiers[0]["reward"], json!(25000));
        assert_eq!(tiers[0]["type"], json!("credit_game"));
    }

    #[test]
    fn test_tier_min_point_coerces_to_zero() {
        let mut form = PromoForm::new();
        let id = form.tier_rows[0].id;
        form.update_tier_row(id, TierField::MinPoint, "abc");
        form.update_tier_row(id, TierField::Reward, "50");
        form.update_tier_row(id, TierField::Type, "Freechip");

        let doc = derive_document(&form);
        let tiers = doc.get("tiers").unwrap().as_array().unwrap();
        assert_eq!(tiers[0]["minimal_point"], json!(0));
    }

    #[test]
    fn test_incomplete_tiers_are_skipped() {
        let mut form = PromoForm::new();
        let id = form.tier_rows[0].id;
        form.update_tier_row(id, TierField::MinPoint, "250");
        form.update_tier_row(id, TierField::Reward, "50");
        // type 未填：行不完整，tiers 键不能出现
        let doc = derive_document(&form);
        assert!(!doc.contains_key("tiers"));
    }

    #[test]
    fn test_fast_exp_missions() {
        let mut form = PromoForm::new();
        form.point_unit = PointUnit::Exp;
        let id = form.add_fast_exp_mission();
        form.update_fast_exp_mission(id, MissionField::Activity, "Share ke grup WA");
        form.update_fast_exp_mission(id, MissionField::BonusExp, "75");
        // 第二个任务不完整，应被跳过
        form.add_fast_exp_mission();

        let doc = derive_document(&form);
        assert_eq!(
            doc.get("fast_exp_missions"),
            Some(&json!([{"activity": "Share ke grup WA", "bonus_exp": 75}]))
        );
    }

    #[test]
    fn test_level_up_rewards_gated_on_toggle_and_visibility() {
        let mut form = PromoForm::new();
        form.point_unit = PointUnit::Exp;
        form.exp_mode = ExpMode::LevelUp;
        let id = form.level_up_rewards[1].id;
        form.update_level_up_reward(id, LevelField::MinExp, "1000");
        form.update_level_up_reward(id, LevelField::Reward, "10");
        form.update_level_up_reward(id, LevelField::RewardValueType, "percentage");
        form.update_level_up_reward(id, LevelField::RewardType, "Credit Game");

        // 开关未打开：不输出
        let doc = derive_document(&form);
        assert!(!doc.contains_key("level_up_rewards"));

        form.level_up_rewards_enabled = true;
        let doc = derive_document(&form);
        assert_eq!(
            doc.get("level_up_rewards"),
            Some(&json!([{
                "tier": "Silver",
                "min_exp": 1000,
                "reward": "10%",
                "reward_type": "percentage",
                "type": "credit_game",
            }]))
        );

        // 切到 exp_store：C5 不可见，即使开关打开也不输出
        form.exp_mode = ExpMode::ExpStore;
        let doc = derive_document(&form);
        assert!(!doc.contains_key("level_up_rewards"));
    }

    #[test]
    fn test_vip_multiplier_absent_when_disabled() {
        let mut form = PromoForm::new();
        form.vip_multiplier.min_daily_to = "100000".to_string();
        form.vip_multiplier.silver = "5".to_string();
        // 已录入数值但开关关闭：键必须缺席
        let doc = derive_document(&form);
        assert!(!doc.contains_key("vip_multiplier"));
    }

    #[test]
    fn test_vip_multiplier_coerces_and_excludes_bronze() {
        let mut form = PromoForm::new();
        form.vip_multiplier.enabled = true;
        form.vip_multiplier.min_daily_to = "100000".to_string();
        form.vip_multiplier.silver = "5".to_string();
        form.vip_multiplier.gold = "x".to_string();
        form.vip_multiplier.platinum = "15".to_string();
        form.vip_multiplier.diamond = "20".to_string();

        let doc = derive_document(&form);
        let vip = doc.get("vip_multiplier").unwrap();
        assert_eq!(
            vip,
            &json!({
                "enabled": true,
                "min_daily_to": 100000,
                "silver": 5,
                "gold": 0,
                "platinum": 15,
                "diamond": 20,
            })
        );
        assert!(vip.get("bronze").is_none());
    }

    #[test]
    fn test_custom_terms_trimmed() {
        let mut form = PromoForm::new();
        form.custom_terms = "   ".to_string();
        assert!(!derive_document(&form).contains_key("custom_terms"));

        form.custom_terms = "  Promo tidak dapat digabung.  ".to_string();
        let doc = derive_document(&form);
        assert_eq!(
            doc.get("custom_terms"),
            Some(&json!("Promo tidak dapat digabung."))
        );
    }

    #[test]
    fn test_document_json_pretty_is_valid_json() {
        let mut form = PromoForm::new();
        form.reward_distribution = "split".to_string();
        let text = document_json_pretty(&form);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["promo_unit"], json!("LP"));
    }
}
