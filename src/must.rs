//! 出错即 panic 的便捷包装
//!
//! 只适合在程序启动装配阶段使用，核心 API 始终返回 `Result`。

use crate::container::{Factory, Injectable, ResolverOutput, ServiceContainer};
use crate::errors::ContainerError;

/// 成功时返回值，失败时记录错误日志并 panic
#[track_caller]
pub fn must<T>(result: Result<T, ContainerError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(error = %err, "Container operation failed");
            panic!("{err}");
        }
    }
}

#[track_caller]
pub fn must_singleton<F, Args>(container: &ServiceContainer, factory: F)
where
    F: Factory<Args>,
    Args: 'static,
{
    must(container.singleton(factory))
}

#[track_caller]
pub fn must_named_singleton<F, Args>(container: &ServiceContainer, name: &str, factory: F)
where
    F: Factory<Args>,
    Args: 'static,
{
    must(container.named_singleton(name, factory))
}

#[track_caller]
pub fn must_transient<F, Args>(container: &ServiceContainer, factory: F)
where
    F: Factory<Args>,
    Args: 'static,
{
    must(container.transient(factory))
}

#[track_caller]
pub fn must_named_transient<F, Args>(container: &ServiceContainer, name: &str, factory: F)
where
    F: Factory<Args>,
    Args: 'static,
{
    must(container.named_transient(name, factory))
}

#[track_caller]
pub fn must_call<F, Args>(container: &ServiceContainer, receiver: F)
where
    F: Factory<Args>,
    F::Output: ResolverOutput<Value = ()>,
{
    must(container.call(receiver))
}

#[track_caller]
pub fn must_resolve<T: Clone + Send + Sync + 'static>(container: &ServiceContainer) -> T {
    must(container.resolve())
}

#[track_caller]
pub fn must_named_resolve<T: Clone + Send + Sync + 'static>(container: &ServiceContainer, name: &str) -> T {
    must(container.named_resolve(name))
}

#[track_caller]
pub fn must_fill<S: Injectable + ?Sized>(container: &ServiceContainer, target: &mut S) {
    must(container.fill(target))
}
