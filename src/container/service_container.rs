//! 服务容器 - 注册、解析、调用、字段填充的统一入口

use std::sync::Arc;

use super::binding::{Binding, Instance, TypeKey};
use super::inject::{FieldInjector, Injectable};
use super::invoker::{invoke_factory, Factory, FnResolver, ResolveContext, Resolver, ResolverOutput};
use super::options::ResolveOptions;
use super::qualifier::expand_qualifier;
use super::registry::Registry;
use super::stats::{ContainerStats, InnerStats};
use super::ServiceLifetime;
use crate::config::ContainerConfig;
use crate::errors::ContainerError;

/// 依赖注入容器
///
/// 内部同步，可在线程间共享；克隆只复制 `Arc`，所有克隆共享同一注册表。
#[derive(Clone)]
pub struct ServiceContainer {
    registry: Arc<Registry>,
    stats: Arc<InnerStats>,
    config: Arc<ContainerConfig>,
}

impl ServiceContainer {
    /// 创建新的容器实例
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            registry: Arc::new(Registry::new()),
            stats: Arc::new(InnerStats::new(config.collect_stats)),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    fn context(&self, candidates: Vec<String>) -> ResolveContext<'_> {
        ResolveContext::new(&self.registry, &self.stats, &self.config, candidates)
    }

    // ===== 注册 =====

    /// 以指定生命周期和限定名注册工厂函数
    pub fn bind<F, Args>(
        &self,
        factory: F,
        lifetime: ServiceLifetime,
        qualifier: &str,
    ) -> Result<(), ContainerError>
    where
        F: Factory<Args>,
        Args: 'static,
    {
        self.bind_resolver(Arc::new(FnResolver::<F, Args>::new(factory)), lifetime, qualifier)
    }

    /// 注册类型擦除的解析器
    ///
    /// 输出类型即注册表的键；Singleton 在此处立即创建，失败时什么都不会保存。
    /// 立即创建时依赖按 `qualifier` 展开后的候选查找。
    pub fn bind_resolver(
        &self,
        resolver: Arc<dyn Resolver>,
        lifetime: ServiceLifetime,
        qualifier: &str,
    ) -> Result<(), ContainerError> {
        let key = resolver.output();
        if key == TypeKey::of::<()>() {
            return Err(ContainerError::InvalidResolverShape {
                type_name: key.name(),
                reason: "resolver must produce exactly one value".to_string(),
            });
        }

        if self.registry.contains(key, qualifier) {
            return Err(ContainerError::DuplicateBinding {
                type_name: key.name(),
                qualifier: qualifier.to_string(),
            });
        }

        let cached = match lifetime {
            ServiceLifetime::Singleton => {
                // 依赖链沿用注册时的限定名，与延迟创建时一致
                let mut ctx = self.context(expand_qualifier(qualifier));
                match resolver.resolve(&mut ctx) {
                    Ok(instance) => Some(instance),
                    Err(err) => {
                        tracing::warn!(
                            service = key.name(),
                            qualifier,
                            error = %err,
                            "Eager singleton failed, binding not registered"
                        );
                        return Err(err);
                    }
                }
            }
            ServiceLifetime::LazySingleton | ServiceLifetime::Transient => None,
        };

        self.registry.insert(Binding::new(
            key,
            qualifier.to_string(),
            lifetime,
            resolver,
            cached,
        ))?;

        tracing::debug!(service = key.name(), qualifier, lifetime = ?lifetime, "Registered binding");
        Ok(())
    }

    /// 注册单例，默认延迟创建
    pub fn singleton<F, Args>(&self, factory: F) -> Result<(), ContainerError>
    where
        F: Factory<Args>,
        Args: 'static,
    {
        self.singleton_with(factory, ResolveOptions::default())
    }

    /// 注册命名单例
    pub fn named_singleton<F, Args>(&self, name: &str, factory: F) -> Result<(), ContainerError>
    where
        F: Factory<Args>,
        Args: 'static,
    {
        self.singleton_with(factory, ResolveOptions::named(name))
    }

    /// 按选项注册单例：`lazy` 决定是否在注册时创建
    pub fn singleton_with<F, Args>(&self, factory: F, options: ResolveOptions) -> Result<(), ContainerError>
    where
        F: Factory<Args>,
        Args: 'static,
    {
        let lifetime = if options.lazy {
            ServiceLifetime::LazySingleton
        } else {
            ServiceLifetime::Singleton
        };
        self.bind(factory, lifetime, &options.qualifier)
    }

    /// 注册瞬态服务
    pub fn transient<F, Args>(&self, factory: F) -> Result<(), ContainerError>
    where
        F: Factory<Args>,
        Args: 'static,
    {
        self.bind(factory, ServiceLifetime::Transient, "")
    }

    /// 注册命名瞬态服务
    pub fn named_transient<F, Args>(&self, name: &str, factory: F) -> Result<(), ContainerError>
    where
        F: Factory<Args>,
        Args: 'static,
    {
        self.bind(factory, ServiceLifetime::Transient, name)
    }

    // ===== 解析 =====

    /// 解析服务 - 主要API
    pub fn resolve<T: Clone + Send + Sync + 'static>(&self) -> Result<T, ContainerError> {
        self.resolve_with(&ResolveOptions::default())
    }

    /// 按限定名解析，逗号分隔的多个候选依次尝试
    pub fn named_resolve<T: Clone + Send + Sync + 'static>(&self, name: &str) -> Result<T, ContainerError> {
        self.resolve_with(&ResolveOptions::named(name))
    }

    pub fn resolve_with<T: Clone + Send + Sync + 'static>(
        &self,
        options: &ResolveOptions,
    ) -> Result<T, ContainerError> {
        let mut ctx = self.context(options.candidates());
        ctx.argument::<T>()
    }

    /// 解析并写入调用方提供的槽位
    pub fn resolve_into<T: Clone + Send + Sync + 'static>(
        &self,
        slot: &mut Option<T>,
        options: &ResolveOptions,
    ) -> Result<(), ContainerError> {
        *slot = Some(self.resolve_with(options)?);
        Ok(())
    }

    /// 按类型键解析，返回类型擦除的实例
    pub fn resolve_erased(&self, key: TypeKey, options: &ResolveOptions) -> Result<Instance, ContainerError> {
        let mut ctx = self.context(options.candidates());
        ctx.argument_erased(key)
    }

    /// 字段注入使用：按给定候选查找，依赖链使用默认限定名
    pub(crate) fn resolve_candidates<T: Clone + Send + Sync + 'static>(
        &self,
        candidates: &[String],
    ) -> Result<T, ContainerError> {
        let mut ctx = self.context(ResolveOptions::default().candidates());
        ctx.lookup_and_make(TypeKey::of::<T>(), candidates)?.downcast::<T>()
    }

    // ===== 调用 =====

    /// 解析工厂的全部参数后调用它，返回其输出值
    pub fn invoke<F, Args>(&self, factory: F) -> Result<<F::Output as ResolverOutput>::Value, ContainerError>
    where
        F: Factory<Args>,
    {
        self.invoke_with(factory, &ResolveOptions::default())
    }

    pub fn invoke_with<F, Args>(
        &self,
        factory: F,
        options: &ResolveOptions,
    ) -> Result<<F::Output as ResolverOutput>::Value, ContainerError>
    where
        F: Factory<Args>,
    {
        let mut ctx = self.context(options.candidates());
        invoke_factory(&factory, &mut ctx)
    }

    /// 调用接收函数，接收函数只能返回 `()` 或 `Result<(), E>`
    pub fn call<F, Args>(&self, receiver: F) -> Result<(), ContainerError>
    where
        F: Factory<Args>,
        F::Output: ResolverOutput<Value = ()>,
    {
        self.invoke(receiver)
    }

    pub fn call_with<F, Args>(&self, receiver: F, options: &ResolveOptions) -> Result<(), ContainerError>
    where
        F: Factory<Args>,
        F::Output: ResolverOutput<Value = ()>,
    {
        self.invoke_with(receiver, options)
    }

    // ===== 字段填充 =====

    /// 填充结构体中带标签的字段
    pub fn fill<S: Injectable + ?Sized>(&self, target: &mut S) -> Result<(), ContainerError> {
        let mut injector = FieldInjector::new(self);
        let result = target.inject(&mut injector);
        if let Err(err) = &result {
            tracing::debug!(filled = ?injector.filled(), error = %err, "Field injection stopped");
        }
        result
    }

    // ===== 查询与维护 =====

    /// 检查服务是否已注册
    pub fn is_registered<T: ?Sized + 'static>(&self, qualifier: &str) -> bool {
        self.registry.contains(TypeKey::of::<T>(), qualifier)
    }

    /// 某类型已注册的限定名
    pub fn qualifiers<T: ?Sized + 'static>(&self) -> Vec<String> {
        self.registry.qualifiers(TypeKey::of::<T>())
    }

    pub fn registered_types(&self) -> Vec<TypeKey> {
        self.registry.types()
    }

    /// 绑定总数
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// 删除所有绑定，之后的解析会得到 `BindingNotFound`
    pub fn reset(&self) {
        let removed = self.registry.len();
        self.registry.clear();
        tracing::info!(removed, "Container reset");
    }

    /// 获取容器统计信息
    pub fn stats(&self) -> ContainerStats {
        self.stats.snapshot(self.registry.len())
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Counter {
        hits: AtomicUsize,
    }

    #[derive(Debug)]
    struct Logger;

    #[test]
    fn test_transient_yields_distinct_instances() {
        let container = ServiceContainer::new();
        container.transient(|| Arc::new(Counter::default())).unwrap();

        let mut first: Option<Arc<Counter>> = None;
        let mut second: Option<Arc<Counter>> = None;
        container.resolve_into(&mut first, &ResolveOptions::default()).unwrap();
        container.resolve_into(&mut second, &ResolveOptions::default()).unwrap();

        let (first, second) = (first.unwrap(), second.unwrap());
        assert!(!Arc::ptr_eq(&first, &second));
        first.hits.fetch_add(1, Ordering::SeqCst);
        assert_eq!(second.hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_eager_singleton_yields_same_instance() {
        let container = ServiceContainer::new();
        container
            .singleton_with(|| Arc::new(Logger), ResolveOptions::default().eager())
            .unwrap();

        let first = container.resolve::<Arc<Logger>>().unwrap();
        let second = container.resolve::<Arc<Logger>>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unit_output_is_rejected() {
        let container = ServiceContainer::new();
        let err = container.transient(|| ()).unwrap_err();
        assert!(matches!(err, ContainerError::InvalidResolverShape { .. }));
        assert!(container.registered_types().is_empty());
    }

    #[test]
    fn test_reset_clears_bindings() {
        let container = ServiceContainer::new();
        container.singleton(|| Arc::new(Logger)).unwrap();
        container.reset();

        let err = container.resolve::<Arc<Logger>>().unwrap_err();
        assert!(matches!(err, ContainerError::BindingNotFound { .. }));
        assert_eq!(container.stats().registered_bindings, 0);
    }

    #[test]
    fn test_stats_count_hits_and_misses() {
        let container = ServiceContainer::new();
        container.singleton(|| Arc::new(Logger)).unwrap();

        for _ in 0..10 {
            container.resolve::<Arc<Logger>>().unwrap();
        }

        let stats = container.stats();
        assert_eq!(stats.total_resolutions, 10);
        assert_eq!(stats.cache_misses, 1); // 第一次miss，后面都是hit
        assert_eq!(stats.cache_hits, 9);
        assert!(stats.hit_rate() > 0.8);

        container.reset_stats();
        assert_eq!(container.stats().total_resolutions, 0);
    }
}
