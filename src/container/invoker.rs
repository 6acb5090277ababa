//! 调用器
//!
//! 按参数顺序逐个从注册表解析依赖，然后调用工厂函数。
//! 任意位置解析失败都会立即中止，不会用部分参数调用工厂。

use std::marker::PhantomData;
use std::sync::Arc;

use super::binding::{Binding, Instance, TypeKey};
use super::registry::Registry;
use super::stats::InnerStats;
use crate::config::ContainerConfig;
use crate::errors::{BoxError, ContainerError};

/// 类型擦除的解析器
///
/// 闭包工厂通过 [`Factory`] 自动适配；也可以手写实现，显式声明输出类型和参数列表。
pub trait Resolver: Send + Sync {
    /// 产出的抽象类型，即注册表的键
    fn output(&self) -> TypeKey;

    /// 按调用顺序声明的参数类型
    fn parameters(&self) -> Vec<TypeKey>;

    /// 创建实例，依赖通过 `ctx` 解析
    fn resolve(&self, ctx: &mut ResolveContext<'_>) -> Result<Instance, ContainerError>;
}

/// 工厂函数的返回值
///
/// - `Arc<T>`：唯一的有意义输出
/// - `Result<V, E>`：值加上可选的尾随错误
/// - `()`：没有输出，只能用于 `call`
pub trait ResolverOutput {
    type Value: Clone + Send + Sync + 'static;

    fn into_value(self) -> Result<Self::Value, BoxError>;
}

impl<T: ?Sized + Send + Sync + 'static> ResolverOutput for Arc<T> {
    type Value = Arc<T>;

    fn into_value(self) -> Result<Self::Value, BoxError> {
        Ok(self)
    }
}

impl<V, E> ResolverOutput for Result<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Into<BoxError>,
{
    type Value = V;

    fn into_value(self) -> Result<Self::Value, BoxError> {
        self.map_err(Into::into)
    }
}

impl ResolverOutput for () {
    type Value = ();

    fn into_value(self) -> Result<Self::Value, BoxError> {
        Ok(())
    }
}

/// 参数可由容器解析的可调用对象
///
/// 为最多 8 个参数的 `Fn` 实现，`Args` 是参数类型元组。
///
/// 返回值必须实现 [`ResolverOutput`]：`Arc<T>`、`Result<V, E>` 或 `()`。
/// 普通值不能直接返回（与 `Arc<T>` 的实现冲突），需要包进 `Arc` 或 `Ok`：
///
/// ```
/// use std::convert::Infallible;
/// use wirebox::ServiceContainer;
///
/// let container = ServiceContainer::new();
/// container
///     .transient(|| Ok::<_, Infallible>(String::from("dsn://local")))
///     .unwrap();
/// assert_eq!(container.resolve::<String>().unwrap(), "dsn://local");
/// ```
///
/// ```compile_fail
/// use wirebox::ServiceContainer;
///
/// let container = ServiceContainer::new();
/// container.transient(|| String::from("dsn://local")).unwrap();
/// ```
pub trait Factory<Args>: Send + Sync + 'static {
    type Output: ResolverOutput;

    fn parameters() -> Vec<TypeKey>;

    fn call(&self, ctx: &mut ResolveContext<'_>) -> Result<Self::Output, ContainerError>;
}

macro_rules! impl_factory {
    ($($param:ident),*) => {
        impl<Func, Out, $($param,)*> Factory<($($param,)*)> for Func
        where
            Func: Fn($($param),*) -> Out + Send + Sync + 'static,
            Out: ResolverOutput,
            $($param: Clone + Send + Sync + 'static,)*
        {
            type Output = Out;

            fn parameters() -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$param>()),*]
            }

            #[allow(non_snake_case, unused_variables)]
            fn call(&self, ctx: &mut ResolveContext<'_>) -> Result<Out, ContainerError> {
                $(let $param = ctx.argument::<$param>()?;)*
                Ok((self)($($param),*))
            }
        }
    };
}

impl_factory!();
impl_factory!(A1);
impl_factory!(A1, A2);
impl_factory!(A1, A2, A3);
impl_factory!(A1, A2, A3, A4);
impl_factory!(A1, A2, A3, A4, A5);
impl_factory!(A1, A2, A3, A4, A5, A6);
impl_factory!(A1, A2, A3, A4, A5, A6, A7);
impl_factory!(A1, A2, A3, A4, A5, A6, A7, A8);

/// 函数式解析器 - 把 [`Factory`] 适配为 [`Resolver`]
pub(crate) struct FnResolver<F, Args> {
    factory: F,
    _args: PhantomData<fn() -> Args>,
}

impl<F, Args> FnResolver<F, Args> {
    pub(crate) fn new(factory: F) -> Self {
        Self {
            factory,
            _args: PhantomData,
        }
    }
}

impl<F, Args> Resolver for FnResolver<F, Args>
where
    F: Factory<Args>,
    Args: 'static,
{
    fn output(&self) -> TypeKey {
        TypeKey::of::<<F::Output as ResolverOutput>::Value>()
    }

    fn parameters(&self) -> Vec<TypeKey> {
        F::parameters()
    }

    fn resolve(&self, ctx: &mut ResolveContext<'_>) -> Result<Instance, ContainerError> {
        let value = invoke_factory(&self.factory, ctx)?;
        Ok(Instance::new(value))
    }
}

/// 调用工厂并解释其输出
pub(crate) fn invoke_factory<F, Args>(
    factory: &F,
    ctx: &mut ResolveContext<'_>,
) -> Result<<F::Output as ResolverOutput>::Value, ContainerError>
where
    F: Factory<Args>,
{
    factory
        .call(ctx)?
        .into_value()
        .map_err(|source| ContainerError::ResolverFailed {
            type_name: std::any::type_name::<<F::Output as ResolverOutput>::Value>(),
            source,
        })
}

/// 一次解析调用的上下文
///
/// 持有调用方的候选限定名（沿依赖链向下传递）以及正在解析的绑定栈，用于循环依赖检测。
pub struct ResolveContext<'c> {
    registry: &'c Registry,
    stats: &'c InnerStats,
    config: &'c ContainerConfig,
    candidates: Vec<String>,
    stack: Vec<(TypeKey, String)>,
}

impl<'c> ResolveContext<'c> {
    pub(crate) fn new(
        registry: &'c Registry,
        stats: &'c InnerStats,
        config: &'c ContainerConfig,
        candidates: Vec<String>,
    ) -> Self {
        Self {
            registry,
            stats,
            config,
            candidates,
            stack: Vec::new(),
        }
    }

    /// 当前调用的候选限定名
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// 当前依赖链深度
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn stats(&self) -> &'c InnerStats {
        self.stats
    }

    /// 解析下一个参数
    pub fn argument<T: Clone + Send + Sync + 'static>(&mut self) -> Result<T, ContainerError> {
        self.argument_erased(TypeKey::of::<T>())?.downcast::<T>()
    }

    /// 按类型键解析参数，供手写解析器使用
    pub fn argument_erased(&mut self, key: TypeKey) -> Result<Instance, ContainerError> {
        let registry = self.registry;
        let binding = registry.lookup(key, &self.candidates)?;
        self.make(&binding)
    }

    /// 用指定候选查找，创建时仍沿用上下文自身的候选
    pub(crate) fn lookup_and_make(
        &mut self,
        key: TypeKey,
        candidates: &[String],
    ) -> Result<Instance, ContainerError> {
        let registry = self.registry;
        let binding = registry.lookup(key, candidates)?;
        self.make(&binding)
    }

    pub(crate) fn make(&mut self, binding: &Binding) -> Result<Instance, ContainerError> {
        self.enter(binding)?;
        self.stats.record_resolution();
        if self.config.trace_resolution {
            tracing::debug!(
                service = binding.type_key().name(),
                qualifier = binding.qualifier(),
                lifetime = ?binding.lifetime(),
                depth = self.stack.len(),
                "Resolving binding"
            );
        }
        let result = binding.make(self);
        self.stack.pop();
        result
    }

    fn enter(&mut self, binding: &Binding) -> Result<(), ContainerError> {
        let key = binding.type_key();
        let qualifier = binding.qualifier();

        if self.stack.iter().any(|(k, q)| *k == key && q == qualifier) {
            let mut chain: Vec<String> = self.stack.iter().map(|(k, q)| frame_label(*k, q)).collect();
            chain.push(frame_label(key, qualifier));
            tracing::warn!(chain = %chain.join(" -> "), "Circular dependency detected");
            return Err(ContainerError::CircularDependency { chain });
        }

        if self.stack.len() >= self.config.max_depth {
            return Err(ContainerError::DepthExceeded {
                type_name: key.name(),
                max_depth: self.config.max_depth,
            });
        }

        self.stack.push((key, qualifier.to_string()));
        Ok(())
    }
}

fn frame_label(key: TypeKey, qualifier: &str) -> String {
    let qualifier = if qualifier.is_empty() { "type" } else { qualifier };
    format!("{}[{}]", key.name(), qualifier)
}
