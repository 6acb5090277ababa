//! Container module
//!
//! 按类型 + 限定名注册解析器，递归满足解析器自身的依赖。

pub mod binding;
pub mod inject;
pub mod invoker;
pub mod options;
pub mod qualifier;
pub mod registry;
pub mod service_container;
pub mod stats;

pub use binding::{Binding, Instance, TypeKey};
pub use inject::{FieldInjector, Injectable};
pub use invoker::{Factory, ResolveContext, Resolver, ResolverOutput};
pub use options::ResolveOptions;
pub use qualifier::expand_qualifier;
pub use registry::Registry;
pub use service_container::ServiceContainer;
pub use stats::ContainerStats;

// Lifecycle enum kept at container module level so every submodule can reference it via `super::ServiceLifetime`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceLifetime {
    /// Created during registration, shared for the container lifetime
    Singleton,
    /// Created on first resolve, then shared
    LazySingleton,
    /// New instance per resolve
    Transient,
}

impl ServiceLifetime {
    /// 是否缓存实例
    pub fn is_cached(self) -> bool {
        !matches!(self, ServiceLifetime::Transient)
    }
}
