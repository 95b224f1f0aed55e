//! Order records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::DietPlan;
use crate::types::{DietPlanId, Email, OrderId, OrderStatus, Price, UserId};

/// An order as stored in the `orders` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub diet_plan_id: DietPlanId,
    pub customer_email: Email,
    pub customer_name: String,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Column names of the `orders` table.
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "user_id",
        "diet_plan_id",
        "customer_email",
        "customer_name",
        "total_amount",
        "status",
        "created_at",
    ];
}

/// Insert payload for a new order.
///
/// The data service assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub diet_plan_id: DietPlanId,
    pub customer_email: Email,
    pub customer_name: String,
    pub total_amount: Price,
    pub status: OrderStatus,
}

impl NewOrder {
    /// Build a pending order for `plan`, charging the plan's price.
    #[must_use]
    pub fn for_plan(plan: &DietPlan, customer_name: impl Into<String>, customer_email: Email) -> Self {
        Self {
            user_id: None,
            diet_plan_id: plan.id,
            customer_email,
            customer_name: customer_name.into(),
            total_amount: plan.price,
            status: OrderStatus::Pending,
        }
    }
}
