//! Pulsed client library
//!
//! Typed access to the pulsed agent's REST surface: system metrics, docker
//! inventory, tailscale presence, network interfaces and service checks.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pulsed_client::PulsedClient;
//!
//! let client = PulsedClient::new("http://localhost:9876")?;
//! let system = client.system_metrics().await?;
//! println!("cpu: {:.1}%", system.cpu_usage);
//! ```
//!
//! Every call is an independent request. There is no retry and no caching;
//! a failing agent fails every call until it recovers.

pub mod client;
mod coalesce;
pub mod error;
pub mod source;
pub mod types;

pub use client::{PulsedClient, DEFAULT_PULSED_URL};
pub use error::{PulsedError, PulsedResult};
pub use source::StatusSource;
pub use types::*;
