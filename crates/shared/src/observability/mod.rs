//! 统一可观测性模块
//!
//! 提供 tracing/logging 的统一初始化和 HTTP 中间件。
//! 所有服务通过单一入口点配置日志，确保一致的输出格式。

pub mod middleware;

use anyhow::Result;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::ObservabilityConfig;

/// 初始化 tracing（日志）
///
/// 日志级别优先读取 RUST_LOG 环境变量，其次使用配置中的 log_level。
/// log_format 为 "json" 时输出结构化日志（适合日志采集），
/// 否则输出带颜色的人类可读格式（适合本地开发）。
pub fn init(service_name: &str, config: &ObservabilityConfig) -> Result<()> {
    // 构建环境过滤器
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // 构建日志层
    let fmt_layer = if config.log_format == "json" {
        fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(service = service_name, "Observability initialized");

    Ok(())
}
