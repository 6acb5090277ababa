//! 注册表条目
//!
//! 一个 [`Binding`] 持有解析器、生命周期以及（单例时）缓存的实例。

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;

use super::invoker::{ResolveContext, Resolver};
use super::ServiceLifetime;
use crate::errors::ContainerError;

/// 抽象类型的标识
///
/// 相等性只比较 `TypeId`，类型名仅用于诊断信息。
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 类型擦除的实例
///
/// 解析时通过 `Clone` 取出，`Arc<T>` 类型的抽象因此保持指针身份。
#[derive(Clone)]
pub struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    type_key: TypeKey,
}

impl Instance {
    pub fn new<T: Clone + Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_key: TypeKey::of::<T>(),
        }
    }

    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// 安全的类型转换，失败时返回 `InvalidTarget`
    pub fn downcast<T: Clone + 'static>(&self) -> Result<T, ContainerError> {
        self.value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| ContainerError::InvalidTarget {
                expected: std::any::type_name::<T>(),
                actual: self.type_key.name(),
            })
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_key.name())
            .finish_non_exhaustive()
    }
}

/// 注册表中的一个条目，创建后不会被替换
pub struct Binding {
    type_key: TypeKey,
    qualifier: String,
    lifetime: ServiceLifetime,
    resolver: Arc<dyn Resolver>,
    /// 只写入一次：Singleton 在注册时，LazySingleton 在第一次成功创建时
    cached: Mutex<Option<Instance>>,
}

impl Binding {
    pub(crate) fn new(
        type_key: TypeKey,
        qualifier: String,
        lifetime: ServiceLifetime,
        resolver: Arc<dyn Resolver>,
        cached: Option<Instance>,
    ) -> Self {
        Self {
            type_key,
            qualifier,
            lifetime,
            resolver,
            cached: Mutex::new(cached),
        }
    }

    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn lifetime(&self) -> ServiceLifetime {
        self.lifetime
    }

    /// 解析器声明的参数类型
    pub fn dependencies(&self) -> Vec<TypeKey> {
        self.resolver.parameters()
    }

    pub fn is_cached(&self) -> bool {
        self.cached.lock().is_some()
    }

    /// 取得实例：有缓存直接返回，否则调用解析器
    ///
    /// LazySingleton 的首次创建在条目锁内完成，并发首次访问只会调用一次解析器；
    /// 创建失败时缓存保持为空，下次调用会重试。
    pub(crate) fn make(&self, ctx: &mut ResolveContext<'_>) -> Result<Instance, ContainerError> {
        if !self.lifetime.is_cached() {
            ctx.stats().record_transient();
            return self.resolver.resolve(ctx);
        }

        let mut cached = self.cached.lock();
        if let Some(instance) = cached.as_ref() {
            ctx.stats().record_hit();
            tracing::trace!(service = self.type_key.name(), qualifier = %self.qualifier, "Cache hit");
            return Ok(instance.clone());
        }

        ctx.stats().record_miss();
        let instance = self.resolver.resolve(ctx)?;
        *cached = Some(instance.clone());
        Ok(instance)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("type", &self.type_key.name())
            .field("qualifier", &self.qualifier)
            .field("lifetime", &self.lifetime)
            .field("cached", &self.is_cached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Marker(u32);

    #[test]
    fn test_type_key_equality_ignores_name() {
        assert_eq!(TypeKey::of::<Marker>(), TypeKey::of::<Marker>());
        assert_ne!(TypeKey::of::<Marker>(), TypeKey::of::<u32>());
        assert!(TypeKey::of::<Marker>().name().ends_with("Marker"));
    }

    #[test]
    fn test_instance_downcast() {
        let instance = Instance::new(Marker(7));
        assert_eq!(instance.downcast::<Marker>().unwrap(), Marker(7));
        assert!(matches!(
            instance.downcast::<String>(),
            Err(ContainerError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_instance_keeps_arc_identity() {
        let shared = Arc::new(Marker(1));
        let instance = Instance::new(shared.clone());
        let out = instance.downcast::<Arc<Marker>>().unwrap();
        assert!(Arc::ptr_eq(&shared, &out));
    }
}
