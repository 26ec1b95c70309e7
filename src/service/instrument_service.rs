use anyhow::Result;
use log::debug;
use std::sync::Arc;

use crate::model::{InstrumentDto, InstrumentId, Page, PageRequest};
use crate::service::mapper::InstrumentMapper;
use crate::store::traits::InstrumentStore;

/// Instrument operations over a store, speaking in transfer shapes.
///
/// Absence is reported as `None`; the service never checks identity rules
/// itself, that is left to the caller.
pub struct InstrumentService<S: InstrumentStore> {
    store: Arc<S>,
    mapper: InstrumentMapper,
}

impl<S: InstrumentStore> Clone for InstrumentService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            mapper: self.mapper,
        }
    }
}

impl<S: InstrumentStore> InstrumentService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            mapper: InstrumentMapper,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn save(&self, dto: InstrumentDto) -> Result<InstrumentDto> {
        debug!("Request to save Instrument: {:?}", dto);
        self.persist(dto).await
    }

    pub async fn update(&self, dto: InstrumentDto) -> Result<InstrumentDto> {
        debug!("Request to update Instrument: {:?}", dto);
        self.persist(dto).await
    }

    async fn persist(&self, dto: InstrumentDto) -> Result<InstrumentDto> {
        let instrument = self.mapper.to_entity(dto);
        let stored = match instrument.id {
            None => self.store.insert(instrument).await?,
            Some(_) => self.store.replace(instrument).await?,
        };
        Ok(self.mapper.to_dto(stored))
    }

    pub async fn partial_update(&self, dto: InstrumentDto) -> Result<Option<InstrumentDto>> {
        debug!("Request to partially update Instrument: {:?}", dto);

        let Some(id) = dto.id else {
            return Ok(None);
        };
        let Some(mut existing) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };

        self.mapper.partial_update(&mut existing, &dto);
        let stored = self.store.replace(existing).await?;
        Ok(Some(self.mapper.to_dto(stored)))
    }

    pub async fn find_all(&self, request: &PageRequest) -> Result<Page<InstrumentDto>> {
        debug!("Request to get all Instruments");
        let page = self.store.find_all(request).await?;
        Ok(page.map(|instrument| self.mapper.to_dto(instrument)))
    }

    pub async fn find_one(&self, id: InstrumentId) -> Result<Option<InstrumentDto>> {
        debug!("Request to get Instrument: {}", id);
        let found = self.store.find_by_id(id).await?;
        Ok(found.map(|instrument| self.mapper.to_dto(instrument)))
    }

    pub async fn delete(&self, id: InstrumentId) -> Result<()> {
        debug!("Request to delete Instrument: {}", id);
        self.store.delete_by_id(id).await?;
        Ok(())
    }
}
