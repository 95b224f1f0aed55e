//! Diet plan catalog records.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Categorized, DietPlanId, PlanCategory, Price};

/// A purchasable diet plan, as stored in the `diet_plans` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietPlan {
    pub id: DietPlanId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub duration_days: NonZeroU32,
    pub calories_per_day: NonZeroU32,
    pub image_url: String,
    pub category: PlanCategory,
    #[serde(default)]
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl DietPlan {
    /// Column names of the `diet_plans` table.
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "price",
        "duration_days",
        "calories_per_day",
        "image_url",
        "category",
        "features",
        "created_at",
    ];

    /// Number of features shown on a catalog card.
    pub const HIGHLIGHT_COUNT: usize = 3;

    /// The features shown on the plan's catalog card.
    #[must_use]
    pub fn highlights(&self) -> &[String] {
        let end = self.features.len().min(Self::HIGHLIGHT_COUNT);
        self.features.get(..end).unwrap_or_default()
    }
}

impl Categorized for DietPlan {
    type Category = PlanCategory;

    fn category(&self) -> PlanCategory {
        self.category
    }
}
