pub mod container_config;
pub mod loader;

// Re-export commonly used types
pub use container_config::{ContainerConfig, PartialContainerConfig};
pub use loader::ConfigLoader;

// Re-export constants
pub use container_config::{CONFIG_FILE_NAME, DEFAULT_MAX_DEPTH, ENV_PREFIX};
