//! 结构体字段注入
//!
//! Rust 没有字段反射，结构体通过实现 [`Injectable`] 显式暴露注入点，
//! 通常由 [`injectable!`](crate::injectable) 宏在结构体所在模块生成，因此私有字段同样可以注入。
//!
//! 字段标签规则：
//! - `type` -> 按类型匹配（默认限定名）
//! - `name` -> 按类型 + 字段名匹配
//! - 其他字面量原样作为限定名，逗号分隔时从左到右依次尝试

use super::binding::TypeKey;
use super::qualifier::expand_field_tag;
use super::service_container::ServiceContainer;
use crate::errors::ContainerError;

/// 可以被容器填充字段的结构体
pub trait Injectable {
    fn inject(&mut self, injector: &mut FieldInjector<'_>) -> Result<(), ContainerError>;
}

/// 字段注入器
///
/// 失败的字段之前已赋值的字段保持赋值，不会回滚。
pub struct FieldInjector<'a> {
    container: &'a ServiceContainer,
    filled: Vec<&'static str>,
}

impl<'a> FieldInjector<'a> {
    pub(crate) fn new(container: &'a ServiceContainer) -> Self {
        Self {
            container,
            filled: Vec::new(),
        }
    }

    /// 解析一个字段并写入槽位
    pub fn field<T: Clone + Send + Sync + 'static>(
        &mut self,
        name: &'static str,
        tag: &str,
        slot: &mut Option<T>,
    ) -> Result<(), ContainerError> {
        let candidates = expand_field_tag(tag, name);
        let key = TypeKey::of::<T>();

        let value = self
            .container
            .resolve_candidates::<T>(&candidates)
            .map_err(|reason| ContainerError::FieldInjectionFailure {
                field: name,
                type_name: key.name(),
                candidates: candidates.clone(),
                reason: Box::new(reason),
            })?;

        *slot = Some(value);
        self.filled.push(name);
        Ok(())
    }

    /// 已成功注入的字段，按注入顺序
    pub fn filled(&self) -> &[&'static str] {
        &self.filled
    }
}

/// 为结构体生成 [`Injectable`] 实现
///
/// ```
/// use std::sync::Arc;
/// use wirebox::{injectable, ServiceContainer};
///
/// struct Mailer;
///
/// #[derive(Default)]
/// struct Signup {
///     mailer: Option<Arc<Mailer>>,
///     audit: Option<Arc<String>>,
/// }
///
/// injectable!(Signup {
///     mailer: "type",
///     audit: "name,type",
/// });
///
/// let container = ServiceContainer::new();
/// container.singleton(|| Arc::new(Mailer)).unwrap();
/// container.named_singleton("audit", || Arc::new("audit-log".to_string())).unwrap();
///
/// let mut signup = Signup::default();
/// container.fill(&mut signup).unwrap();
/// assert!(signup.mailer.is_some());
/// assert_eq!(signup.audit.as_deref().map(String::as_str), Some("audit-log"));
/// ```
#[macro_export]
macro_rules! injectable {
    ($target:ty { $($field:ident : $tag:expr),* $(,)? }) => {
        impl $crate::Injectable for $target {
            #[allow(unused_variables)]
            fn inject(
                &mut self,
                injector: &mut $crate::FieldInjector<'_>,
            ) -> ::std::result::Result<(), $crate::ContainerError> {
                $(injector.field(stringify!($field), $tag, &mut self.$field)?;)*
                Ok(())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Clock;

    #[derive(Default)]
    struct Job {
        clock: Option<Arc<Clock>>,
        backup_clock: Option<Arc<Clock>>,
    }

    crate::injectable!(Job {
        clock: "type",
        backup_clock: "name",
    });

    #[test]
    fn test_private_fields_are_filled() {
        let container = ServiceContainer::new();
        container.singleton(|| Arc::new(Clock)).unwrap();
        container.named_singleton("backup_clock", || Arc::new(Clock)).unwrap();

        let mut job = Job::default();
        container.fill(&mut job).unwrap();

        let (clock, backup) = (job.clock.unwrap(), job.backup_clock.unwrap());
        assert!(!Arc::ptr_eq(&clock, &backup));
    }

    #[test]
    fn test_filled_tracks_order() {
        let container = ServiceContainer::new();
        container.singleton(|| Arc::new(Clock)).unwrap();

        let mut slot: Option<Arc<Clock>> = None;
        let mut injector = FieldInjector::new(&container);
        injector.field("clock", "", &mut slot).unwrap();
        assert_eq!(injector.filled(), &["clock"]);
        assert!(slot.is_some());
    }
}
