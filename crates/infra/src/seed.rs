//! Initial data loaded into freshly constructed stores.

use simplerest_employees::Employee;

use crate::store::{SequencedStore, StoreError};

/// Insert the demo employees, allocating their ids from the store's sequence.
///
/// On a fresh store the employees receive ids 1, 2 and 3.
pub fn seed_employees<S>(store: &S) -> Result<Vec<Employee>, StoreError>
where
    S: SequencedStore<Employee>,
{
    let seeded = simplerest_employees::seed()
        .into_iter()
        .map(|draft| store.allocate_and_insert(|id| draft.with_id(id)))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(count = seeded.len(), "seeded employee store");
    Ok(seeded)
}
