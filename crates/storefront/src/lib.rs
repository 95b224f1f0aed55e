//! VegOre storefront library.
//!
//! Catalog loading, category filtering and order capture on top of a hosted
//! data service. Front-ends (the `vegore` CLI, tests) drive these types; no
//! rendering lives here.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod order;
pub mod state;

pub use error::AppError;
pub use state::{Featured, ShellState, Storefront, StorefrontOptions};
