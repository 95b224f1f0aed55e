//! Storefront state shared across views.

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;
use vegore_core::{
    ArticleCategory, ArticleId, CategoryFilter, DietPlan, DietPlanId, HealthArticle,
    PlanCategory, View,
};

use crate::catalog::{Catalog, LoadFailure, LoadRequest};
use crate::config::StorefrontConfig;
use crate::error::add_breadcrumb;
use crate::gateway::{DataGateway, GatewayError, RestGateway};
use crate::order::OrderFlow;

/// Tunables taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorefrontOptions {
    /// How long the order form stays open after a successful order.
    pub order_close_delay: Duration,
    /// Records per catalog on the home view.
    pub featured_limit: usize,
}

impl Default for StorefrontOptions {
    fn default() -> Self {
        Self {
            order_close_delay: Duration::from_secs(2),
            featured_limit: 3,
        }
    }
}

impl From<&StorefrontConfig> for StorefrontOptions {
    fn from(config: &StorefrontConfig) -> Self {
        Self {
            order_close_delay: config.order_close_delay,
            featured_limit: config.featured_limit,
        }
    }
}

/// The home view's previews.
#[derive(Debug, Clone, Default)]
pub struct Featured {
    pub plans: Vec<DietPlan>,
    pub articles: Vec<HealthArticle>,
}

/// Catalogs and the gateway behind them.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    gateway: Arc<dyn DataGateway>,
    options: StorefrontOptions,
    plans: Catalog<DietPlan>,
    articles: Catalog<HealthArticle>,
    featured_plans: Catalog<DietPlan>,
    featured_articles: Catalog<HealthArticle>,
}

impl Storefront {
    /// Connect to the data service described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the REST client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, GatewayError> {
        let gateway = RestGateway::new(&config.supabase)?;
        Ok(Self::with_gateway(Arc::new(gateway), config.into()))
    }

    /// Use an existing gateway.
    #[must_use]
    pub fn with_gateway(gateway: Arc<dyn DataGateway>, options: StorefrontOptions) -> Self {
        Self {
            inner: Arc::new(StorefrontInner {
                gateway,
                options,
                plans: Catalog::new(),
                articles: Catalog::new(),
                featured_plans: Catalog::new(),
                featured_articles: Catalog::new(),
            }),
        }
    }

    #[must_use]
    pub fn gateway(&self) -> &dyn DataGateway {
        self.inner.gateway.as_ref()
    }

    #[must_use]
    pub fn options(&self) -> StorefrontOptions {
        self.inner.options
    }

    /// The diet plans view's catalog.
    #[must_use]
    pub fn plans(&self) -> &Catalog<DietPlan> {
        &self.inner.plans
    }

    /// The health info view's catalog.
    #[must_use]
    pub fn articles(&self) -> &Catalog<HealthArticle> {
        &self.inner.articles
    }

    #[must_use]
    pub fn featured_plans(&self) -> &Catalog<DietPlan> {
        &self.inner.featured_plans
    }

    #[must_use]
    pub fn featured_articles(&self) -> &Catalog<HealthArticle> {
        &self.inner.featured_articles
    }

    /// Load every plan, newest first.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadFailure`]; the catalog has already recorded it.
    pub async fn load_plans(&self) -> Result<Vec<DietPlan>, LoadFailure> {
        self.plans()
            .load(self.gateway(), &LoadRequest::newest_first::<DietPlan>())
            .await
    }

    /// Load every article, most recently published first.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadFailure`]; the catalog has already recorded it.
    pub async fn load_articles(&self) -> Result<Vec<HealthArticle>, LoadFailure> {
        self.articles()
            .load(self.gateway(), &LoadRequest::newest_first::<HealthArticle>())
            .await
    }

    /// Load the home view's previews.
    ///
    /// Both catalogs are fetched concurrently; a failure in one leaves the
    /// other unaffected and yields whatever that catalog already held.
    #[instrument(skip(self), fields(limit = self.inner.options.featured_limit))]
    pub async fn load_featured(&self) -> Featured {
        let request = LoadRequest::featured(self.inner.options.featured_limit);
        let (plans, articles) = tokio::join!(
            self.featured_plans().load(self.gateway(), &request),
            self.featured_articles().load(self.gateway(), &request),
        );

        Featured {
            plans: plans.unwrap_or_else(|_| self.featured_plans().records()),
            articles: articles.unwrap_or_else(|_| self.featured_articles().records()),
        }
    }

    /// Load whatever `view` shows on entry. The about view loads nothing.
    pub async fn enter(&self, view: View) {
        match view {
            View::Home => {
                self.load_featured().await;
            }
            View::Diets => {
                let _ = self.load_plans().await;
            }
            View::Health => {
                let _ = self.load_articles().await;
            }
            View::About => {}
        }
    }

    /// A plan the customer has been shown, from either plan catalog.
    #[must_use]
    pub fn find_plan(&self, id: DietPlanId) -> Option<DietPlan> {
        self.plans()
            .find(|p| p.id == id)
            .or_else(|| self.featured_plans().find(|p| p.id == id))
    }

    /// An article the customer has been shown, from either article catalog.
    #[must_use]
    pub fn find_article(&self, id: ArticleId) -> Option<HealthArticle> {
        self.articles()
            .find(|a| a.id == id)
            .or_else(|| self.featured_articles().find(|a| a.id == id))
    }

    /// Open the order form for a plan the customer has been shown.
    ///
    /// Returns `None` if no loaded catalog holds `plan_id`.
    #[must_use]
    pub fn open_order(&self, plan_id: DietPlanId) -> Option<OrderFlow> {
        let plan = self.find_plan(plan_id)?;
        add_breadcrumb("order", "Opened order form", Some(&[("plan", plan.name.as_str())]));
        Some(OrderFlow::open(plan, self.inner.options.order_close_delay))
    }
}

// =============================================================================
// ShellState
// =============================================================================

/// The current view and the category selection of each catalog view.
///
/// Entering a catalog view starts with every category selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellState {
    pub view: View,
    pub plan_filter: CategoryFilter<PlanCategory>,
    pub article_filter: CategoryFilter<ArticleCategory>,
}

impl ShellState {
    /// Switch to the view named `name`; unknown names go home.
    pub fn navigate(&mut self, name: &str) -> View {
        let view = name.parse::<View>().unwrap_or_default();
        if view != self.view {
            add_breadcrumb("navigation", view.label(), None);
            self.view = view;
            self.plan_filter = CategoryFilter::All;
            self.article_filter = CategoryFilter::All;
        }
        view
    }

    pub fn select_plan_category(&mut self, value: &str) {
        self.plan_filter = CategoryFilter::parse(value);
    }

    pub fn select_article_category(&mut self, value: &str) {
        self.article_filter = CategoryFilter::parse(value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};
    use vegore_core::PlanCategory;

    use super::*;
    use crate::gateway::{Collection, MemoryGateway};

    const PLAN_ID: &str = "3a7e2b9c-41d5-4f0e-8c6b-2d9a1e5f7c30";

    fn plan_row(id: &str, name: &str, created_at: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": "A plan",
            "price": 39.0,
            "duration_days": 14,
            "calories_per_day": 1600,
            "image_url": "https://images.example.com/p.jpg",
            "category": "beginner",
            "features": [],
            "created_at": created_at,
        })
    }

    fn storefront(gateway: &MemoryGateway) -> Storefront {
        Storefront::with_gateway(Arc::new(gateway.clone()), StorefrontOptions::default())
    }

    #[tokio::test]
    async fn test_open_order_requires_shown_plan() {
        let gateway = MemoryGateway::new().with_rows(
            Collection::DietPlans,
            [plan_row(PLAN_ID, "First Steps", "2024-04-01T00:00:00Z")],
        );
        let store = storefront(&gateway);
        let id = DietPlanId::parse(PLAN_ID).unwrap();

        assert!(store.open_order(id).is_none());

        store.load_plans().await.unwrap();
        let flow = store.open_order(id).unwrap();
        assert_eq!(flow.plan().name, "First Steps");
    }

    #[tokio::test]
    async fn test_featured_tolerates_one_failure() {
        let gateway = MemoryGateway::new().with_rows(
            Collection::DietPlans,
            [
                plan_row(PLAN_ID, "First Steps", "2024-04-01T00:00:00Z"),
                plan_row(
                    "9d0c8b7a-6f5e-4d3c-2b1a-0f9e8d7c6b5a",
                    "Second Steps",
                    "2024-04-02T00:00:00Z",
                ),
            ],
        );
        // health_articles rows that fail to decode
        let gateway = gateway.with_rows(Collection::HealthArticles, [json!({"title": "?"})]);
        let store = storefront(&gateway);

        let featured = store.load_featured().await;
        assert_eq!(featured.plans.len(), 2);
        assert!(featured.articles.is_empty());
        assert!(store.featured_articles().last_failure().is_some());
        assert!(!store.featured_articles().is_loading());

        // featured plans count as shown
        let id = DietPlanId::parse(PLAN_ID).unwrap();
        assert!(store.open_order(id).is_some());
    }

    #[tokio::test]
    async fn test_featured_uses_configured_limit() {
        let gateway = MemoryGateway::new();
        let options = StorefrontOptions {
            featured_limit: 6,
            ..StorefrontOptions::default()
        };
        let store = Storefront::with_gateway(Arc::new(gateway.clone()), options);

        store.enter(View::Home).await;
        let queries = gateway.queries();
        assert_eq!(queries.len(), 2);
        assert!(queries.iter().all(|q| q.limit == Some(6) && q.order.is_none()));
    }

    #[tokio::test]
    async fn test_about_view_loads_nothing() {
        let gateway = MemoryGateway::new();
        storefront(&gateway).enter(View::About).await;
        assert!(gateway.queries().is_empty());
    }

    #[test]
    fn test_navigate_resets_filters() {
        let mut shell = ShellState::default();
        shell.navigate("diets");
        shell.select_plan_category("keto");
        assert_eq!(shell.plan_filter, CategoryFilter::Only(PlanCategory::Keto));

        shell.navigate("health");
        shell.navigate("diets");
        assert_eq!(shell.plan_filter, CategoryFilter::All);
    }

    #[test]
    fn test_navigate_unknown_goes_home() {
        let mut shell = ShellState::default();
        shell.navigate("diets");
        assert_eq!(shell.navigate("checkout"), View::Home);
        assert_eq!(shell.view, View::Home);
    }
}
