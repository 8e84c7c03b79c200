//! Configuration system for pipeconf.
//!
//! This module provides hierarchical pipeline configuration with support for:
//! - Packaged and user-supplied base configurations selected with `FROM`
//! - Deep merging of partial override trees onto a base
//! - Pluggable validation
//! - Environment variable interpolation (`${NAME}` and `$NAME/`)
//! - Self-referential templates (`${pipeline_setup.pipeline_name}`)
//!
//! # Construction Order
//!
//! 1. Base selection (`FROM`, or the blank template)
//! 2. Deep merge of the overrides
//! 3. Null normalization (`"None"` strings become nulls)
//! 4. Validation
//! 5. Environment variable interpolation
//! 6. Template resolution
//!
//! # Examples
//!
//! Building on the default pipeline:
//!
//! ```
//! use pipeconf::{tree, ConfigurationBuilder};
//!
//! let config = ConfigurationBuilder::new()
//!     .skip_env()
//!     .build(tree! {
//!         "FROM" => "default",
//!         "pipeline_setup" => tree! { "pipeline_name" => "custom1" },
//!     })
//!     .unwrap();
//!
//! assert_eq!(config.pipeline_name(), Some("custom1"));
//! ```
//!
//! Loading from a file:
//!
//! ```no_run
//! use pipeconf::Configuration;
//! use std::path::Path;
//!
//! let config = Configuration::from_file(Path::new("pipeline_config.yml")).unwrap();
//! println!("{config}");
//! ```

pub mod builder;
pub mod configuration;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod normalize;
pub mod path;
pub mod template;
pub mod validator;
pub mod value;

#[cfg(test)]
mod proptests;

// Re-export key types at module root
pub use builder::{ConfigurationBuilder, ConstructionStage};
pub use configuration::{ConfigKey, Configuration};
pub use loader::{load_yaml_file, parse_yaml, PreconfigCatalog, PreconfigSource};
pub use path::KeyPath;
pub use template::{TemplateResolver, TemplateToken, TemplateWarning};
pub use validator::{ConfigValidator, Validator};
pub use value::{ConfigTree, ConfigValue};
