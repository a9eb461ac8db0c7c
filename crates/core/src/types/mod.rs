//! Core types for FoodPi.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod icon;
pub mod id;
pub mod price;
pub mod rating;
pub mod status;

pub use icon::{ICON_SIZES, icon_file_name};
pub use id::*;
pub use price::PiAmount;
pub use rating::{Rating, RatingError, stars};
pub use status::*;
