//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! # Every plan, newest first
//! vegore plans
//!
//! # Only keto plans
//! vegore plans --category keto
//!
//! # One article in full
//! vegore article c1d2e3f4-a5b6-4c7d-8e9f-0a1b2c3d4e5f
//! ```

use vegore_core::{ArticleCategory, ArticleId, Category, CategoryFilter, PlanCategory, View};
use vegore_storefront::{AppError, Storefront};

use super::{emit, render};

/// List plans under `selected`.
///
/// A failed load shows whatever the catalog holds, usually nothing.
pub async fn plans(store: &Storefront, selected: &CategoryFilter<PlanCategory>) {
    // Logged and recorded by the catalog.
    let _ = store.load_plans().await;
    let visible = store.plans().visible(selected);

    emit(&heading(View::Diets.label(), selected.label(), visible.len()));
    if visible.is_empty() {
        emit(&no_match::<PlanCategory>(selected));
    }
    for plan in &visible {
        emit(&render::plan_card(plan));
    }
}

/// List articles under `selected`.
///
/// A failed load shows whatever the catalog holds, usually nothing.
pub async fn articles(store: &Storefront, selected: &CategoryFilter<ArticleCategory>) {
    let _ = store.load_articles().await;
    let visible = store.articles().visible(selected);

    emit(&heading(View::Health.label(), selected.label(), visible.len()));
    if visible.is_empty() {
        emit(&no_match::<ArticleCategory>(selected));
    }
    for article in &visible {
        emit(&render::article_card(article));
    }
}

/// Show one article.
///
/// # Errors
///
/// Returns an error if the articles could not be loaded or `id` is not one
/// of them.
pub async fn article(store: &Storefront, id: ArticleId) -> Result<(), AppError> {
    store.load_articles().await?;
    let article = store
        .find_article(id)
        .ok_or_else(|| AppError::NotFound(format!("article {id}")))?;
    emit(&render::article_body(&article));
    Ok(())
}

/// Show the home view's previews.
///
/// A catalog that fails to load is reported and shown empty.
pub async fn featured(store: &Storefront) {
    let featured = store.load_featured().await;

    emit(&heading("Featured plans", PlanCategory::ALL_LABEL, featured.plans.len()));
    for plan in &featured.plans {
        emit(&render::plan_card(plan));
    }
    emit(&heading(
        "Latest articles",
        ArticleCategory::ALL_LABEL,
        featured.articles.len(),
    ));
    for article in &featured.articles {
        emit(&render::article_card(article));
    }
}

fn heading(view: &str, selection: &str, count: usize) -> String {
    format!("== {view}: {selection} ({count}) ==")
}

fn no_match<C: Category>(selected: &CategoryFilter<C>) -> String {
    match selected {
        CategoryFilter::Unrecognized(raw) => {
            let known: Vec<&str> = C::ALL.iter().map(Category::as_str).collect();
            format!("Unknown category '{raw}'. Try one of: all, {}", known.join(", "))
        }
        _ => "Nothing here yet.".to_string(),
    }
}
