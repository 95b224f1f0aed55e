//! Order placement command.
//!
//! # Usage
//!
//! ```bash
//! vegore order --plan 0b8f3f4e-6a55-4a36-8d0e-8f6a2b1c9d01 \
//!     --name "Jane Doe" --email jane@example.com
//! ```
//!
//! The plan must be one the storefront lists: the plan catalog is loaded
//! first and the order form is opened from it.

use vegore_core::DietPlanId;
use vegore_storefront::order::SUCCESS_MESSAGE;
use vegore_storefront::{AppError, Storefront};

use super::{emit, render};

/// Place an order for `plan_id`, then wait for the form to close.
///
/// # Errors
///
/// Returns an error if the plans could not be loaded, the plan is not
/// listed, the form is invalid, or the order could not be placed.
pub async fn place(
    store: &Storefront,
    plan_id: DietPlanId,
    name: &str,
    email: &str,
) -> Result<(), AppError> {
    store.load_plans().await?;
    let flow = store
        .open_order(plan_id)
        .ok_or_else(|| AppError::NotFound(format!("diet plan {plan_id}")))?;

    emit(&render::quote(&flow.quote()));
    flow.set_name(name);
    flow.set_email(email);

    let order = flow.submit(store.gateway()).await?;
    emit(&format!("Order Successful!\n{SUCCESS_MESSAGE}\nOrder id: {}", order.id));

    flow.close_after_success().await;
    tracing::debug!("Order form closed");
    Ok(())
}
