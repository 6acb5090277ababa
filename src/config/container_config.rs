use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::ConfigError;

// Configuration file name
pub const CONFIG_FILE_NAME: &str = "wirebox.toml";

// Environment variable prefix
pub const ENV_PREFIX: &str = "WIREBOX_";

/// 默认最大解析深度
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Container Configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// 依赖链最大深度，超出时返回 `DepthExceeded`
    pub max_depth: usize,
    /// 是否维护解析统计
    pub collect_stats: bool,
    /// 每次解析输出 debug 日志
    pub trace_resolution: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            collect_stats: true,
            trace_resolution: false,
        }
    }
}

/// Partial Container Configuration for loading from files
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct PartialContainerConfig {
    pub max_depth: Option<usize>,
    pub collect_stats: Option<bool>,
    pub trace_resolution: Option<bool>,
}

impl ContainerConfig {
    /// Create ContainerConfig from partial config and environment
    ///
    /// 环境变量优先于文件配置，文件配置优先于默认值。
    pub fn from_partial_and_env(
        partial: PartialContainerConfig,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_depth = parse_env(env_map, "MAX_DEPTH")?
            .or(partial.max_depth)
            .unwrap_or(defaults.max_depth);

        let collect_stats = parse_env(env_map, "COLLECT_STATS")?
            .or(partial.collect_stats)
            .unwrap_or(defaults.collect_stats);

        let trace_resolution = parse_env(env_map, "TRACE_RESOLUTION")?
            .or(partial.trace_resolution)
            .unwrap_or(defaults.trace_resolution);

        let config = Self {
            max_depth,
            collect_stats,
            trace_resolution,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::FieldInvalid("max_depth".to_string()));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    name: &str,
) -> Result<Option<T>, ConfigError> {
    let key = format!("{ENV_PREFIX}{name}");
    match env_map.get(&key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                key,
                value: value.clone(),
            }),
    }
}
