//! FoodPi Core - Shared types library.
//!
//! This crate provides common types used across all FoodPi components:
//! - `storefront` - Restaurant pages, cart, JSON API and Pi payment flow
//! - `cli` - Icon generation and catalog tooling
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, Pi amounts, ratings and statuses
//! - [`catalog`] - Restaurant, menu, review and order records
//! - [`cart`] - The per-visitor shopping cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{Cart, CartItem};
pub use catalog::{MenuItem, Order, Restaurant, Review};
pub use types::*;
