//! Order domain
//!
//! - [`intake`] - draft → stored order workflow
//! - [`catalog`] - line resolution and snapshots
//! - [`customer`] - resolve-or-provision of the ordering customer
//! - [`money`] - decimal totals
//! - [`stats`] - figures returned with the order list
//! - [`dashboard`] - aggregated report
//! - [`view`] - orders joined with customers and items

pub mod catalog;
pub mod customer;
pub mod dashboard;
pub mod intake;
pub mod money;
pub mod stats;
pub mod view;

pub use customer::{CustomerResolution, PlaceholderPasswordPolicy};
pub use intake::place_order;
