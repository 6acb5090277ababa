use super::qualifier::expand_qualifier;

/// 单次调用的解析选项，不会被持久化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// 限定名，空的时候为类型，否则为名称（可用逗号分隔多个候选）
    pub qualifier: String,
    /// 单例是否延迟创建
    pub lazy: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            qualifier: String::new(),
            // 默认延迟创建实例，避免注册顺序影响初始化
            lazy: true,
        }
    }
}

impl ResolveOptions {
    /// 指定限定名的选项
    pub fn named(qualifier: impl Into<String>) -> Self {
        Self {
            qualifier: qualifier.into(),
            ..Self::default()
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// 注册时立即创建单例
    pub fn eager(self) -> Self {
        self.with_lazy(false)
    }

    /// 查找时依次尝试的候选限定名
    pub fn candidates(&self) -> Vec<String> {
        expand_qualifier(&self.qualifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lazy_and_unqualified() {
        let options = ResolveOptions::default();
        assert!(options.lazy);
        assert_eq!(options.candidates(), vec![String::new()]);
    }

    #[test]
    fn test_builders() {
        let options = ResolveOptions::named("primary,type").eager();
        assert!(!options.lazy);
        assert_eq!(options.candidates(), vec!["primary".to_string(), String::new()]);
    }
}
