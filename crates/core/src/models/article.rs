//! Health article records.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ArticleCategory, ArticleId, Categorized};

/// Separator between paragraphs in article bodies.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// A health article, as stored in the `health_articles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthArticle {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub image_url: String,
    pub category: ArticleCategory,
    pub reading_time_minutes: NonZeroU32,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl HealthArticle {
    /// Column names of the `health_articles` table.
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "title",
        "content",
        "excerpt",
        "author",
        "image_url",
        "category",
        "reading_time_minutes",
        "published_at",
        "created_at",
    ];

    /// Body paragraphs, skipping blank ones.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content
            .split(PARAGRAPH_SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Publication date in long form, e.g. `March 4, 2024`.
    #[must_use]
    pub fn published_on(&self) -> String {
        self.published_at.format("%B %-d, %Y").to_string()
    }
}

impl Categorized for HealthArticle {
    type Category = ArticleCategory;

    fn category(&self) -> ArticleCategory {
        self.category
    }
}
