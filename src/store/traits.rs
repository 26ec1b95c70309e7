use crate::model::{Instrument, InstrumentId, Page, PageRequest};
use anyhow::Result;

/// Persistence for instrument records.
///
/// Writes are split into two explicit operations instead of a single upsert:
/// `insert` lets the store assign the identifier, `replace` writes under the
/// identifier carried by the record.
#[async_trait::async_trait]
pub trait InstrumentStore: Send + Sync {
    /// Persist a new record. Any id on the input is ignored and a fresh one
    /// is assigned.
    async fn insert(&self, instrument: Instrument) -> Result<Instrument>;
    /// Write the record under its own id, creating the row if it is missing.
    async fn replace(&self, instrument: Instrument) -> Result<Instrument>;
    async fn find_by_id(&self, id: InstrumentId) -> Result<Option<Instrument>>;
    async fn find_all(&self, request: &PageRequest) -> Result<Page<Instrument>>;
    async fn exists_by_id(&self, id: InstrumentId) -> Result<bool>;
    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: InstrumentId) -> Result<bool>;
    async fn count(&self) -> Result<u64>;
}
