//! wirebox - 支持限定名的依赖注入容器
//!
//! 以解析器的输出类型（可附加限定名）为键注册工厂函数，解析时递归满足工厂自身的参数。
//!
//! ```
//! use std::sync::Arc;
//! use wirebox::{ResolveOptions, ServiceContainer};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let container = ServiceContainer::new();
//! container
//!     .singleton(|| Arc::new(English) as Arc<dyn Greeter>)
//!     .unwrap();
//!
//! let greeting = container
//!     .invoke(|greeter: Arc<dyn Greeter>| Arc::new(greeter.greet()))
//!     .unwrap();
//! assert_eq!(greeting.as_str(), "hello");
//!
//! let greeter: Arc<dyn Greeter> = container.resolve_with(&ResolveOptions::default()).unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! ```

pub mod config;
pub mod container;
pub mod errors;
pub mod logging;
pub mod must;

// Re-export commonly used items for convenience
pub use config::{ConfigLoader, ContainerConfig};
pub use container::{
    expand_qualifier, Binding, ContainerStats, Factory, FieldInjector, Injectable, Instance, Registry,
    ResolveContext, ResolveOptions, Resolver, ResolverOutput, ServiceContainer, ServiceLifetime, TypeKey,
};
pub use errors::{BoxError, ConfigError, ContainerError};
pub use logging::{init_logging, LogFormat, LoggingConfig};
