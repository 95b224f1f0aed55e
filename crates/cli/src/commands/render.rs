//! Plain-text rendering of catalog records.

use std::fmt::Write as _;

use vegore_core::{Category, DietPlan, HealthArticle};
use vegore_storefront::order::Quote;

/// One plan as a catalog card: name, category, price, length and the
/// highlighted features.
pub fn plan_card(plan: &DietPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", plan.name, plan.category.label());
    let _ = writeln!(out, "  id: {}", plan.id);
    let _ = writeln!(
        out,
        "  {} · {} days · {} kcal/day",
        plan.price.display(),
        plan.duration_days,
        plan.calories_per_day
    );
    let _ = writeln!(out, "  {}", plan.description);
    for feature in plan.highlights() {
        let _ = writeln!(out, "  - {feature}");
    }
    out
}

/// One article as a catalog card: title, byline and excerpt.
pub fn article_card(article: &HealthArticle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", article.title, article.category.label());
    let _ = writeln!(out, "  id: {}", article.id);
    let _ = writeln!(out, "  {}", byline(article));
    let _ = writeln!(out, "  {}", article.excerpt);
    out
}

/// A full article, one paragraph per block.
pub fn article_body(article: &HealthArticle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", article.title);
    let _ = writeln!(out, "{}", byline(article));
    for paragraph in article.paragraphs() {
        let _ = write!(out, "\n{paragraph}\n");
    }
    out
}

/// The summary above the order form.
pub fn quote(quote: &Quote) -> String {
    format!(
        "{} ({} days)\nTotal: {}",
        quote.plan_name,
        quote.duration_days,
        quote.total.display()
    )
}

fn byline(article: &HealthArticle) -> String {
    format!(
        "By {} · {} · {} min read",
        article.author,
        article.published_on(),
        article.reading_time_minutes
    )
}
