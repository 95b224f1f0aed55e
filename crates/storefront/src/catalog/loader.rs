//! Fetching a catalog through the gateway.

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};
use vegore_core::{Categorized, CategoryFilter};

use super::{CatalogRecord, filter};
use crate::gateway::{self, Collection, DataGateway, Direction, GatewayError, OrderBy, Query, Record};

/// Why a catalog could not be loaded.
#[derive(Debug, Error)]
pub enum LoadFailure {
    /// The requested order field is not a column of the collection.
    #[error("{collection} has no field '{field}'")]
    UnknownField {
        collection: Collection,
        field: String,
    },

    /// The gateway call failed or returned rows that did not decode.
    #[error("Failed to load catalog: {0}")]
    Gateway(#[from] GatewayError),
}

/// Ordering and size of a catalog load.
///
/// The collection is chosen by the record type passed to [`load`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadRequest {
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl LoadRequest {
    /// Every row, in the order the data service returns them.
    #[must_use]
    pub const fn unordered() -> Self {
        Self {
            order: None,
            limit: None,
        }
    }

    /// Every row, ordered by `field`.
    #[must_use]
    pub fn ordered(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            order: Some(OrderBy {
                field: field.into(),
                direction,
            }),
            limit: None,
        }
    }

    /// The full catalog, newest first.
    #[must_use]
    pub fn newest_first<R: CatalogRecord>() -> Self {
        Self::ordered(R::NEWEST_FIELD, Direction::Descending)
    }

    /// The home view preview: the first `limit` rows, unordered.
    #[must_use]
    pub const fn featured(limit: usize) -> Self {
        Self::unordered().with_limit(limit)
    }

    /// Cap the result at `limit` rows.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn to_query<R: Record>(&self) -> Result<Query, LoadFailure> {
        let mut query = Query::new(R::COLLECTION);
        if let Some(order) = &self.order {
            if !R::has_field(&order.field) {
                return Err(LoadFailure::UnknownField {
                    collection: R::COLLECTION,
                    field: order.field.clone(),
                });
            }
            query = query.order_by(order.clone());
        }
        if let Some(limit) = self.limit {
            query = query.limit(limit);
        }
        Ok(query)
    }
}

/// Fetch `R`'s collection as described by `request`.
///
/// An unknown order field fails before the gateway is called.
///
/// # Errors
///
/// Returns [`LoadFailure::UnknownField`] or the gateway's error.
pub async fn load<R: Record>(
    gateway: &dyn DataGateway,
    request: &LoadRequest,
) -> Result<Vec<R>, LoadFailure> {
    let query = request.to_query::<R>()?;
    Ok(gateway::fetch(gateway, &query).await?)
}

// =============================================================================
// Catalog
// =============================================================================

/// A catalog as a view sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState<R> {
    /// Records from the last successful load, in load order.
    pub records: Vec<R>,
    /// Whether a load is in flight.
    pub loading: bool,
    /// Message of the most recent failed load, cleared by the next success.
    pub last_failure: Option<String>,
}

/// Before the first load: empty and loading.
impl<R> Default for CatalogState<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: true,
            last_failure: None,
        }
    }
}

/// One collection's view state.
pub struct Catalog<R> {
    state: watch::Sender<CatalogState<R>>,
}

impl<R: Record> Default for Catalog<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Catalog<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: watch::Sender::new(CatalogState::default()),
        }
    }

    /// Follow state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CatalogState<R>> {
        self.state.subscribe()
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CatalogState<R> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn records(&self) -> Vec<R> {
        self.state.borrow().records.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    #[must_use]
    pub fn last_failure(&self) -> Option<String> {
        self.state.borrow().last_failure.clone()
    }

    /// First loaded record satisfying `predicate`.
    #[must_use]
    pub fn find(&self, predicate: impl Fn(&R) -> bool) -> Option<R> {
        self.state
            .borrow()
            .records
            .iter()
            .find(|r| predicate(r))
            .cloned()
    }

    /// Load the catalog and replace its records.
    ///
    /// The loading flag is raised for the duration of the call and lowered
    /// on every exit path. On failure the records are left as they were and
    /// the failure is recorded in [`CatalogState::last_failure`].
    ///
    /// # Errors
    ///
    /// Returns the [`LoadFailure`], which callers may ignore: it has already
    /// been logged and recorded.
    #[instrument(skip(self, gateway), fields(collection = %R::COLLECTION))]
    pub async fn load(
        &self,
        gateway: &dyn DataGateway,
        request: &LoadRequest,
    ) -> Result<Vec<R>, LoadFailure> {
        let _loading = LoadingGuard::raise(&self.state);

        match load::<R>(gateway, request).await {
            Ok(records) => {
                debug!(count = records.len(), "Catalog loaded");
                self.state.send_modify(|state| {
                    state.records.clone_from(&records);
                    state.last_failure = None;
                });
                Ok(records)
            }
            Err(failure) => {
                warn!(error = %failure, "Catalog load failed");
                self.state
                    .send_modify(|state| state.last_failure = Some(failure.to_string()));
                Err(failure)
            }
        }
    }
}

impl<R: CatalogRecord> Catalog<R> {
    /// Loaded records visible under `selected`, in load order.
    #[must_use]
    pub fn visible(&self, selected: &CategoryFilter<<R as Categorized>::Category>) -> Vec<R> {
        filter(&self.state.borrow().records, selected)
            .into_iter()
            .cloned()
            .collect()
    }
}

/// Lowers the loading flag when dropped.
struct LoadingGuard<'a, R> {
    state: &'a watch::Sender<CatalogState<R>>,
}

impl<'a, R> LoadingGuard<'a, R> {
    fn raise(state: &'a watch::Sender<CatalogState<R>>) -> Self {
        state.send_modify(|s| s.loading = true);
        Self { state }
    }
}

impl<R> Drop for LoadingGuard<'_, R> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.loading = false);
    }
}
