#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # pipeconf
//!
//! A library for layered neuroimaging pipeline configurations.
//!
//! A configuration starts from a base (the blank template, a packaged
//! preconfiguration or any YAML file named by `FROM`), has partial overrides
//! deep-merged onto it, is validated, and then has environment variables and
//! `${a.b}` self-references substituted. Resolved configurations can be
//! addressed by attribute or by key path and compared structurally.
//!
//! ## Core Types
//!
//! - [`Configuration`] and [`ConfigurationBuilder`]: building and reading
//!   resolved configurations
//! - [`ConfigValue`], [`ConfigTree`] and [`KeyPath`]: the tree data model
//! - [`DiffTree`]: structural differences between configurations
//! - [`RandomStateConfig`]: the configured random seed
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use pipeconf::{tree, ConfigurationBuilder};
//!
//! let base = ConfigurationBuilder::new()
//!     .skip_env()
//!     .build(tree! { "FROM" => "default" })
//!     .unwrap();
//! let custom = ConfigurationBuilder::new()
//!     .skip_env()
//!     .build(tree! {
//!         "FROM" => "default",
//!         "pipeline_setup" => tree! { "pipeline_name" => "custom1" },
//!     })
//!     .unwrap();
//!
//! let diff = &custom - &base;
//! assert_eq!(diff.len(), 1);
//! assert_eq!(
//!     diff.left()["pipeline_setup"].as_tree().unwrap()["pipeline_name"].as_str(),
//!     Some("custom1")
//! );
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod output;
pub mod random_state;

// Re-export key types at crate root for convenience
pub use config::{
    ConfigKey, ConfigTree, ConfigValue, Configuration, ConfigurationBuilder, KeyPath,
    PreconfigCatalog, TemplateWarning,
};
pub use diff::{DiffEntry, DiffNode, DiffTree};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use random_state::{seed_flags_for, RandomSeed, RandomStateConfig, ToolKind};
