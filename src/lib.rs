//! # Pickup Documentation
//!
//! Back office for a smoked-meat pickup storefront.
//!
//! ## Notes
//!
//! ### 10/16/26
//! - One operator, one shared admin password
//! - Menu stays under 40 items, batches run weekly
//! - Storefront and admin share one SQLite file

pub mod panel;
