//! Core types for VegOre.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod price;
pub mod status;
pub mod view;

pub use category::{ArticleCategory, Categorized, Category, CategoryFilter, PlanCategory};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use status::OrderStatus;
pub use view::View;
