//! DataRepository - Typed CRUD and queries for [`Data`] over a [`KeyValueStore`].

use serde_json::Value;
use tracing::debug;

use super::RepositoryError;
use crate::data::{Data, Payload};
use crate::store::{CompareAndSet, Fields, KeyValueStore, StoreError};

/// Repository for Data entities.
///
/// Callers validate payloads with [`Data::from_payload`] before handing
/// entities over; the repository does not re-validate.
pub struct DataRepository<S> {
    store: S,
}

impl<S: KeyValueStore> DataRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist a new entity and return it with its assigned id.
    pub fn create(&self, mut data: Data) -> Result<Data, RepositoryError> {
        if data.is_persisted() {
            return Err(RepositoryError::Validation(format!(
                "cannot create Data with preassigned id '{}'",
                data.id
            )));
        }
        data.id = self.store.next_id()?;
        self.store.put(data.id, &data.to_fields())?;
        debug!(id = data.id, name = %data.name, "created data");
        Ok(data)
    }

    /// Point lookup. Absence is not an error.
    pub fn find(&self, id: u64) -> Result<Option<Data>, RepositoryError> {
        match self.store.get(id)? {
            Some(fields) => Ok(Some(decode(id, &fields)?)),
            None => Ok(None),
        }
    }

    /// Overwrite an existing entity. The path id wins over any id on `data`.
    pub fn update(&self, id: u64, mut data: Data) -> Result<Data, RepositoryError> {
        if self.find(id)?.is_none() {
            return Err(RepositoryError::NotFound(id));
        }
        data.id = id;
        self.store.put(id, &data.to_fields())?;
        debug!(id, "updated data");
        Ok(data)
    }

    /// Remove an entity. Deleting an unknown id succeeds.
    pub fn delete(&self, id: u64) -> Result<(), RepositoryError> {
        self.store.delete(id)?;
        debug!(id, "deleted data");
        Ok(())
    }

    /// Every stored entity, ordered by id.
    pub fn list_all(&self) -> Result<Vec<Data>, RepositoryError> {
        let mut ids = self.store.all_ids()?;
        ids.sort_unstable();

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            // Entries deleted between the scan and the lookup are skipped.
            if let Some(data) = self.find(id)? {
                results.push(data);
            }
        }
        Ok(results)
    }

    /// Entities whose category matches exactly.
    pub fn find_by_category(&self, category: &str) -> Result<Vec<Data>, RepositoryError> {
        self.filter(|data| data.category == category)
    }

    /// Entities whose name matches exactly.
    pub fn find_by_name(&self, name: &str) -> Result<Vec<Data>, RepositoryError> {
        self.filter(|data| data.name == name)
    }

    /// Entities with the given availability.
    pub fn find_by_availability(&self, available: bool) -> Result<Vec<Data>, RepositoryError> {
        self.filter(|data| data.available == available)
    }

    /// Flip `available` from true to false as one conditional store write.
    ///
    /// Of any number of concurrent purchases on the same id, exactly one
    /// succeeds; the rest get [`RepositoryError::Conflict`].
    pub fn purchase(&self, id: u64) -> Result<Data, RepositoryError> {
        let outcome = self.store.compare_and_set(
            id,
            "available",
            &Value::Bool(true),
            Value::Bool(false),
        )?;

        match outcome {
            CompareAndSet::Swapped(fields) => {
                debug!(id, "purchased data");
                decode(id, &fields)
            }
            CompareAndSet::Mismatch(fields) => {
                // A stored flag that isn't a boolean is corruption, not a sold item.
                decode(id, &fields)?;
                Err(RepositoryError::Conflict(id))
            }
            CompareAndSet::Missing => Err(RepositoryError::NotFound(id)),
        }
    }

    /// Remove every entity.
    pub fn remove_all(&self) -> Result<(), RepositoryError> {
        self.store.clear()?;
        debug!("removed all data");
        Ok(())
    }

    /// Validate and create each payload in order.
    ///
    /// Stops at the first invalid payload; entities created before it stay.
    pub fn load<I>(&self, payloads: I) -> Result<Vec<Data>, RepositoryError>
    where
        I: IntoIterator<Item = Payload>,
    {
        payloads
            .into_iter()
            .map(|payload| self.create(Data::from_payload(&payload)?))
            .collect()
    }

    fn filter(&self, predicate: impl Fn(&Data) -> bool) -> Result<Vec<Data>, RepositoryError> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|data| predicate(data))
            .collect())
    }
}

fn decode(id: u64, fields: &Fields) -> Result<Data, RepositoryError> {
    let mut data = Data::from_fields(fields)
        .map_err(|e| StoreError::Corrupt(format!("entry {}: {}", id, e)))?;
    data.id = id;
    Ok(data)
}
