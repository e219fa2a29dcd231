//! # order-desk
//!
//! Supplier-side client for the marketplace's order-item workflow.
//!
//! An order item moves `pending → confirmed/processing → shipped → delivered`,
//! with `cancelled` and `refunded` as other ends. The backend decides every
//! transition; this crate shows which actions a status offers, sends them, and
//! keeps a cached list page and detail panel in step with what the server
//! answers.
//!
//! ## Layout
//!
//! - **Domain types** - server records and request bodies → [`domain`]
//! - **Workflow** - status-to-actions table and action input validation → [`workflow`]
//! - **Backend seam** - the REST contract as a trait, plus its HTTP implementation → [`api`]
//! - **View actor** - the single writer owning list, detail and in-flight ids → [`actor_framework`]
//! - **Client** - the dispatcher callers use for every operation → [`clients::OrderItemClient`]
//! - **System** - startup, shutdown and tracing setup → [`app_system`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use order_desk::app_system::OrderDesk;
//! use order_desk::config::AppConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let desk = OrderDesk::from_config(&config)?;
//!
//! desk.orders.load(config.list_query()).await?;
//! for row in desk.orders.rows().await? {
//!     println!("{} {} {:?}", row.item.reference_label(), row.item.status, row.actions);
//! }
//!
//! desk.orders.accept("3f6c1e0a").await?;
//! desk.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod actor_framework;
pub mod api;
pub mod app_system;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod order_actor;
pub mod workflow;

#[cfg(test)]
mod mock_framework;
