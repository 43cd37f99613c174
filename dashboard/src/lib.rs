//! Skylily homelab dashboard
//!
//! Polls a pulsed status agent, syndication feeds and a weather API on
//! per-widget intervals and renders the results as plain text.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use skylily::scheduler::Poller;
//! use skylily::widgets::SystemWidget;
//!
//! let client = Arc::new(PulsedClient::new("http://localhost:9876")?);
//! let system = Poller::new(SystemWidget::new(client), Duration::from_secs(5)).spawn();
//! let mut updates = system.subscribe();
//! while updates.changed().await.is_ok() {
//!     println!("{:?}", updates.borrow().phase);
//! }
//! ```

pub mod board;
pub mod cli;
pub mod commands;
pub mod config;
pub mod links;
pub mod render;
pub mod scheduler;
pub mod weather;
pub mod widgets;

pub use board::Dashboard;
pub use config::DashboardConfig;
pub use links::LinkRegistry;
pub use scheduler::{Phase, Poller, PollerHandle, WidgetSnapshot};
