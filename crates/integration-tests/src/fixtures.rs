//! Catalog rows as the data service stores them.

use serde_json::{Value, json};

/// IDs of the rows in [`plans`], newest first.
pub const PLAN_IDS: [&str; 3] = [
    "0b8f3f4e-6a55-4a36-8d0e-8f6a2b1c9d01",
    "5d2a7c18-93e4-4b6f-a0c1-7e8f9a0b1c2d",
    "a4b3c2d1-e5f6-4a7b-8c9d-0e1f2a3b4c5d",
];

/// IDs of the rows in [`articles`], most recently published first.
pub const ARTICLE_IDS: [&str; 4] = [
    "c1d2e3f4-a5b6-4c7d-8e9f-0a1b2c3d4e5f",
    "d2e3f4a5-b6c7-4d8e-9f0a-1b2c3d4e5f60",
    "e3f4a5b6-c7d8-4e9f-8a1b-2c3d4e5f6071",
    "f4a5b6c7-d8e9-4f0a-9b2c-3d4e5f607182",
];

/// A `diet_plans` row.
#[must_use]
pub fn plan(id: &str, name: &str, category: &str, price: f64, created_at: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name}: a guided meal plan."),
        "price": price,
        "duration_days": 30,
        "calories_per_day": 1800,
        "image_url": format!("https://images.example.com/{id}.jpg"),
        "category": category,
        "features": ["Weekly menus", "Shopping lists", "Coach check-ins", "Recipe library"],
        "created_at": created_at,
    })
}

/// Three plans, stored oldest first.
#[must_use]
pub fn plans() -> Vec<Value> {
    vec![
        plan(PLAN_IDS[2], "Keto Reset", "keto", 39.0, "2024-01-05T09:00:00Z"),
        plan(PLAN_IDS[1], "Lean Muscle", "muscle-gain", 59.0, "2024-02-11T09:00:00Z"),
        plan(PLAN_IDS[0], "Balanced Living", "balanced", 49.99, "2024-03-20T09:00:00Z"),
    ]
}

/// A `health_articles` row.
#[must_use]
pub fn article(id: &str, title: &str, category: &str, published_at: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": format!("{title} starts here.\n\nThen it goes further.\n\nAnd it ends."),
        "excerpt": format!("A short read on {}.", title.to_lowercase()),
        "author": "Dr. Ana Ruiz",
        "image_url": format!("https://images.example.com/{id}.jpg"),
        "category": category,
        "reading_time_minutes": 5,
        "published_at": published_at,
        "created_at": "2024-01-01T00:00:00Z",
    })
}

/// Four articles, stored in no particular order.
#[must_use]
pub fn articles() -> Vec<Value> {
    vec![
        article(ARTICLE_IDS[2], "Sleep and Recovery", "wellness", "2024-02-01T08:00:00Z"),
        article(ARTICLE_IDS[0], "Protein Myths", "nutrition", "2024-04-15T08:00:00Z"),
        article(ARTICLE_IDS[3], "Walking Counts", "fitness", "2024-01-10T08:00:00Z"),
        article(ARTICLE_IDS[1], "Fiber, Explained", "nutrition", "2024-03-04T08:00:00Z"),
    ]
}
