//! Category selection over a loaded catalog.

use vegore_core::{Categorized, CategoryFilter};

/// The records visible under `selected`, in their original order.
///
/// `All` returns every record; an unrecognized selection returns none.
#[must_use]
pub fn filter<'a, R: Categorized>(
    records: &'a [R],
    selected: &CategoryFilter<R::Category>,
) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| selected.matches(record.category()))
        .collect()
}
