//! Response types for the pulsed agent endpoints
//!
//! These mirror the agent's JSON shapes. Each poll fully replaces the
//! previous value; nothing here carries identity across polls.

mod docker;
mod health;
mod network;
mod services;
mod system;
mod tailscale;

pub use docker::*;
pub use health::*;
pub use network::*;
pub use services::*;
pub use system::*;
pub use tailscale::*;
