//! Catalog loading and category filtering.
//!
//! A [`Catalog`] holds one collection's records as shown by a view, along
//! with its loading flag. State changes are published on a
//! `tokio::sync::watch` channel so a presentation layer can follow them.

mod filter;
mod loader;

pub use filter::filter;
pub use loader::{Catalog, CatalogState, LoadFailure, LoadRequest, load};

use vegore_core::{Categorized, DietPlan, HealthArticle};

use crate::gateway::Record;

/// A browsable, categorized collection.
pub trait CatalogRecord: Record + Categorized {
    /// Timestamp column that orders the catalog newest-first.
    const NEWEST_FIELD: &'static str;
}

impl CatalogRecord for DietPlan {
    const NEWEST_FIELD: &'static str = "created_at";
}

impl CatalogRecord for HealthArticle {
    const NEWEST_FIELD: &'static str = "published_at";
}
