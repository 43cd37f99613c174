//! Dash Common - Shared utilities for the Skylily dashboard crates
//!
//! - **Initialization**: [`init_tracing`] for consistent logging setup
//! - **Configuration**: [`find_config_file`] and [`load_toml`] for locating
//!   and reading `.toml` configuration files
//!
//! # Example
//!
//! ```rust,ignore
//! dash_common::init_tracing("skylily", 0)?;
//!
//! let config: MyConfig = match dash_common::find_config_file(".skylily.toml") {
//!     Some(path) => dash_common::load_toml(&path)?,
//!     None => MyConfig::default(),
//! };
//! ```

pub mod config;
pub mod init;

pub use config::{find_config_file, load_toml, CONFIG_DIR_NAME};
pub use init::init_tracing;
