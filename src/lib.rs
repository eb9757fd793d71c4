pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::SupabaseRestClient, storage::LocalStore};
pub use config::{env::SupabaseConfig, toml_config::PatchConfig};
pub use crate::core::{patcher::Patcher, probe::probe_table, schema::SchemaCheck};
pub use utils::error::{Result, ToolError};
