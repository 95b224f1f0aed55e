//! The order capture surface as a state machine.

use std::num::NonZeroU32;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, instrument};
use vegore_core::{DietPlan, Email, NewOrder, Order, Price};

use super::error::{SubmitError, SubmitFailure, ValidationError};
use crate::gateway::{self, DataGateway};

/// Where a submission stands.
///
/// ```text
/// Idle --submit--> Submitting --ok--> Succeeded
///                      |
///                      +--error--> Failed --submit--> Submitting
///                                    |
///                                    +--dismiss--> Idle
/// ```
#[derive(Debug, Clone, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(Order),
    Failed(SubmitFailure),
}

impl SubmissionState {
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// The placed order, once the insert has succeeded.
    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        match self {
            Self::Succeeded(order) => Some(order),
            _ => None,
        }
    }

    /// Message to show the customer after a failed insert.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Failed(failure) => Some(&failure.message),
            _ => None,
        }
    }
}

/// What the customer has typed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub name: String,
    pub email: String,
}

impl OrderForm {
    /// Check the form and produce the validated name and email.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyName`] for a blank name, or
    /// [`ValidationError::InvalidEmail`] for a malformed address.
    pub fn validate(&self) -> Result<(String, Email), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let email = Email::parse(&self.email)?;
        Ok((name.to_owned(), email))
    }
}

/// The plan summary shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub plan_name: String,
    pub duration_days: NonZeroU32,
    pub total: Price,
}

/// Everything the capture surface renders.
#[derive(Debug, Clone, Default)]
pub struct FlowState {
    pub form: OrderForm,
    pub submission: SubmissionState,
    pub closed: bool,
}

/// An open order capture surface for one plan.
///
/// The plan (and so the price charged) is fixed when the flow is opened.
/// State is published on a `watch` channel; see [`OrderFlow::subscribe`].
pub struct OrderFlow {
    plan: DietPlan,
    close_delay: Duration,
    state: watch::Sender<FlowState>,
}

impl OrderFlow {
    /// Open the capture surface for `plan`.
    #[must_use]
    pub fn open(plan: DietPlan, close_delay: Duration) -> Self {
        Self {
            plan,
            close_delay,
            state: watch::Sender::new(FlowState::default()),
        }
    }

    #[must_use]
    pub const fn plan(&self) -> &DietPlan {
        &self.plan
    }

    #[must_use]
    pub fn quote(&self) -> Quote {
        Quote {
            plan_name: self.plan.name.clone(),
            duration_days: self.plan.duration_days,
            total: self.plan.price,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FlowState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> FlowState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn submission(&self) -> SubmissionState {
        self.state.borrow().submission.clone()
    }

    #[must_use]
    pub fn form(&self) -> OrderForm {
        self.state.borrow().form.clone()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.state.send_modify(|s| s.form.name = name);
    }

    pub fn set_email(&self, email: impl Into<String>) {
        let email = email.into();
        self.state.send_modify(|s| s.form.email = email);
    }

    /// Place the order.
    ///
    /// Validates the form, inserts a pending order charging the plan's
    /// price, and moves to `Succeeded` or `Failed`. Invalid input leaves the
    /// state as it was and sends nothing. The form is kept on failure so the
    /// customer can retry.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Validation`] if the form is incomplete
    /// - [`SubmitError::Failed`] if the insert failed
    /// - [`SubmitError::InProgress`], [`SubmitError::AlreadySubmitted`] or
    ///   [`SubmitError::Closed`] if the flow cannot accept a submission now
    #[instrument(skip(self, gateway), fields(plan_id = %self.plan.id))]
    pub async fn submit(&self, gateway: &dyn DataGateway) -> Result<Order, SubmitError> {
        let payload = self.begin()?;
        let in_flight = InFlight::new(&self.state);

        match gateway::create::<Order>(gateway, &payload).await {
            Ok(order) => {
                info!(order_id = %order.id, total = %order.total_amount, "Order placed");
                in_flight.finish(SubmissionState::Succeeded(order.clone()));
                Ok(order)
            }
            Err(e) => {
                error!(error = %e, "Failed to place order");
                let failure = SubmitFailure::new(e);
                in_flight.finish(SubmissionState::Failed(failure.clone()));
                Err(SubmitError::Failed(failure))
            }
        }
    }

    /// Check the flow can submit, then enter `Submitting` in one step.
    fn begin(&self) -> Result<NewOrder, SubmitError> {
        let mut outcome = Err(SubmitError::Closed);
        self.state.send_if_modified(|s| {
            outcome = match s.submission {
                _ if s.closed => Err(SubmitError::Closed),
                SubmissionState::Submitting => Err(SubmitError::InProgress),
                SubmissionState::Succeeded(_) => Err(SubmitError::AlreadySubmitted),
                SubmissionState::Idle | SubmissionState::Failed(_) => s
                    .form
                    .validate()
                    .map(|(name, email)| NewOrder::for_plan(&self.plan, name, email))
                    .map_err(SubmitError::from),
            };
            if outcome.is_ok() {
                s.submission = SubmissionState::Submitting;
            }
            outcome.is_ok()
        });
        outcome
    }

    /// Clear a failure message, returning to `Idle` with the form intact.
    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|s| {
            if matches!(s.submission, SubmissionState::Failed(_)) {
                s.submission = SubmissionState::Idle;
                true
            } else {
                false
            }
        });
    }

    /// Close the surface without ordering.
    ///
    /// # Errors
    ///
    /// [`SubmitError::NotCancellable`] while an insert is in flight.
    pub fn cancel(&self) -> Result<(), SubmitError> {
        let mut result = Ok(());
        self.state.send_if_modified(|s| {
            if s.submission.is_submitting() {
                result = Err(SubmitError::NotCancellable);
                return false;
            }
            let changed = !s.closed;
            s.closed = true;
            changed
        });
        result
    }

    /// After a successful order, wait the close delay and close the surface.
    ///
    /// Returns `false` without waiting if the order has not succeeded.
    pub async fn close_after_success(&self) -> bool {
        if self.state.borrow().submission.order().is_none() {
            return false;
        }
        tokio::time::sleep(self.close_delay).await;
        self.state.send_modify(|s| s.closed = true);
        true
    }
}

/// Holds the flow in `Submitting`; if dropped before [`InFlight::finish`]
/// (the submit future was abandoned), returns it to `Idle`.
struct InFlight<'a> {
    state: &'a watch::Sender<FlowState>,
    finished: bool,
}

impl<'a> InFlight<'a> {
    const fn new(state: &'a watch::Sender<FlowState>) -> Self {
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self, outcome: SubmissionState) {
        self.finished = true;
        self.state.send_modify(|s| s.submission = outcome);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state.send_modify(|s| s.submission = SubmissionState::Idle);
        }
    }
}
