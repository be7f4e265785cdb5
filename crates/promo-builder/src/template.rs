//! CSV 模板导出
//!
//! 供"手动上传"流程下载的固定表头 CSV 模板：表头加一行示例数据，
//! 覆盖促销规则的平铺字段子集（不含 tier 结构）。
//! 这是静态文本，不从实时表单状态生成。

/// 模板文件名
pub const TEMPLATE_FILE_NAME: &str = "voc-promo-builder-template.csv";

/// 模板内容：固定表头 + 一行填写示例
pub const CSV_TEMPLATE: &str = r#"client_id,promo_name,promo_type,intent_category,target_segment,trigger_event,reward_mode,reward_type,reward_amount,min_requirement,max_claim,turnover_rule,claim_frequency,reward_tiers,conversion_formula,platform_access,game_restriction,valid_from,valid_until,status,require_apk,geo_restriction,time_restriction,response_template_offer,response_template_requirement,ai_guidelines,default_behavior,completion_steps
WG77,Welcome Bonus 100%,Bonus Deposit,Acquisition,User Baru,First Deposit,fixed,Persentase %,100,50000,1000000,8x,Sekali,,,"Semua","Semua",2024-01-01,2024-12-31,Active,false,Indonesia,,"Bonus 100% untuk deposit pertama!","Min deposit 50rb, TO 8x","Gunakan nada ramah","check_deposit_first","""#;
