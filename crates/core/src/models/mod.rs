//! Records held by the hosted data service.
//!
//! Plans and articles are read-only reference data. Orders are written once
//! by the storefront and never changed afterwards.

pub mod article;
pub mod diet_plan;
pub mod order;

pub use article::HealthArticle;
pub use diet_plan::DietPlan;
pub use order::{NewOrder, Order};
