use anyhow::Context;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

/// 日志配置
///
/// 容器的事件分级：注册与解析为 `debug`，缓存命中为 `trace`，
/// 立即创建失败与循环依赖为 `warn`，`must_*` 失败为 `error`。
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 未设置 `RUST_LOG` 时使用的过滤指令
    pub directive: String,
    pub format: LogFormat,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::with_level(Level::INFO, LogFormat::Compact)
    }
}

impl LoggingConfig {
    /// 只为本 crate 的事件设置级别
    pub fn with_level(level: Level, format: LogFormat) -> Self {
        Self {
            directive: format!("{}={}", env!("CARGO_PKG_NAME"), level.as_str().to_lowercase()),
            format,
            ansi: format != LogFormat::Json,
        }
    }

    /// 查看每次注册和解析
    pub fn wiring() -> Self {
        Self::with_level(Level::DEBUG, LogFormat::Pretty)
    }

    /// 连同缓存命中一起输出，排查单例共享问题时使用
    pub fn cache_trace() -> Self {
        Self::with_level(Level::TRACE, LogFormat::Compact)
    }

    /// 只保留装配失败，机器可读
    pub fn failures_only() -> Self {
        Self::with_level(Level::WARN, LogFormat::Json)
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.directive))
    }
}

/// 初始化日志系统
///
/// 全局订阅者只能设置一次，重复调用返回错误而不是 panic。
pub fn init_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_thread_ids(true)
                    .with_ansi(config.ansi),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_ansi(config.ansi),
            )
            .try_init(),
    };
    result.context("global tracing subscriber already installed")?;

    tracing::info!(directive = %config.directive, format = ?config.format, "Logging initialized");

    Ok(())
}
