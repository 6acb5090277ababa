use thiserror::Error;

/// 解析器自身返回的错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 把限定名列表渲染为诊断信息，默认限定名显示为 `type`
pub(crate) fn display_qualifiers(qualifiers: &[String]) -> String {
    qualifiers
        .iter()
        .map(|q| if q.is_empty() { "type" } else { q.as_str() })
        .collect::<Vec<_>>()
        .join(",")
}

fn join_chain(chain: &[String]) -> String {
    chain.join(" -> ")
}

/// 容器错误
#[derive(Debug, Error)]
pub enum ContainerError {
    /// 解析器不产生任何有意义的值
    #[error("container: resolver for {type_name} has an invalid signature: {reason}")]
    InvalidResolverShape {
        type_name: &'static str,
        reason: String,
    },

    /// 同一类型 + 限定名已经注册
    #[error("container: {type_name} binding [{}] already exists", display_qualifiers(std::slice::from_ref(.qualifier)))]
    DuplicateBinding {
        type_name: &'static str,
        qualifier: String,
    },

    /// 类型从未注册过
    #[error("container: no binding found for {type_name}")]
    BindingNotFound { type_name: &'static str },

    /// 类型已注册，但没有任何候选限定名匹配
    #[error(
        "container: no binding of {type_name} matches qualifiers [{}] (registered: [{}])",
        display_qualifiers(.candidates),
        display_qualifiers(.registered)
    )]
    QualifierNotMatched {
        type_name: &'static str,
        candidates: Vec<String>,
        registered: Vec<String>,
    },

    /// 解析结果无法写入目标槽位
    #[error("container: cannot assign {actual} to a slot of type {expected}")]
    InvalidTarget {
        expected: &'static str,
        actual: &'static str,
    },

    /// 结构体字段注入失败
    #[error(
        "container: cannot make {field}({type_name}) field with tags [{}]",
        display_qualifiers(.candidates)
    )]
    FieldInjectionFailure {
        field: &'static str,
        type_name: &'static str,
        candidates: Vec<String>,
        #[source]
        reason: Box<ContainerError>,
    },

    /// 检测到循环依赖
    #[error("container: circular dependency detected: {}", join_chain(.chain))]
    CircularDependency { chain: Vec<String> },

    /// 解析深度超出配置上限
    #[error("container: resolution of {type_name} exceeded the maximum depth of {max_depth}")]
    DepthExceeded {
        type_name: &'static str,
        max_depth: usize,
    },

    /// 解析器返回了错误
    #[error("container: resolver for {type_name} failed: {source}")]
    ResolverFailed {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },
}

impl ContainerError {
    /// 类型完全缺失或限定名不匹配
    pub fn is_missing_binding(&self) -> bool {
        matches!(
            self,
            ContainerError::BindingNotFound { .. } | ContainerError::QualifierNotMatched { .. }
        )
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid value '{value}' for environment variable {key}")]
    InvalidEnv { key: String, value: String },
    #[error("Required configuration field '{0}' is missing or invalid")]
    FieldInvalid(String),
}
