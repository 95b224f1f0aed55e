//! VegOre Core - Shared types library.
//!
//! This crate provides the domain types used across all VegOre components:
//! - `storefront` - Catalog loading, filtering and order capture
//! - `cli` - Terminal front-end over the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, categories and statuses
//! - [`models`] - Diet plan, health article and order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
