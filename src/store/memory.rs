use anyhow::Result;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::{Direction, Instrument, InstrumentId, InstrumentProperty, Page, PageRequest, SortOrder};
use crate::store::traits::InstrumentStore;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<InstrumentId, Instrument>,
    /// Last id handed out by `insert`, mirrors a BIGSERIAL sequence
    sequence: InstrumentId,
}

/// Map-backed store. Used by the `memory` backend and by tests.
#[derive(Debug, Default)]
pub struct InMemoryInstrumentStore {
    table: RwLock<Table>,
}

impl InMemoryInstrumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Instrument, b: &Instrument, sort: &[SortOrder]) -> Ordering {
    for order in sort {
        let ordering = match order.property {
            InstrumentProperty::Id => a.id.cmp(&b.id),
            InstrumentProperty::Name => a.name.cmp(&b.name),
        };
        let ordering = match order.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait::async_trait]
impl InstrumentStore for InMemoryInstrumentStore {
    async fn insert(&self, instrument: Instrument) -> Result<Instrument> {
        let mut table = self.table.write();
        table.sequence += 1;
        // replace() may already have claimed ids ahead of the sequence
        while table.rows.contains_key(&table.sequence) {
            table.sequence += 1;
        }
        let id = table.sequence;

        let stored = Instrument {
            id: Some(id),
            name: instrument.name,
        };
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn replace(&self, instrument: Instrument) -> Result<Instrument> {
        let id = instrument
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot replace an instrument without an id"))?;

        let mut table = self.table.write();
        table.rows.insert(id, instrument.clone());
        Ok(instrument)
    }

    async fn find_by_id(&self, id: InstrumentId) -> Result<Option<Instrument>> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn find_all(&self, request: &PageRequest) -> Result<Page<Instrument>> {
        let table = self.table.read();
        let mut rows: Vec<Instrument> = table.rows.values().cloned().collect();
        let total = rows.len() as u64;

        let sort = request.effective_sort();
        rows.sort_by(|a, b| compare(a, b, &sort));

        let content = rows
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.size).unwrap_or(usize::MAX))
            .collect();

        Ok(Page::new(content, request, total))
    }

    async fn exists_by_id(&self, id: InstrumentId) -> Result<bool> {
        Ok(self.table.read().rows.contains_key(&id))
    }

    async fn delete_by_id(&self, id: InstrumentId) -> Result<bool> {
        Ok(self.table.write().rows.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.table.read().rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded(names: &[&str]) -> InMemoryInstrumentStore {
        let store = InMemoryInstrumentStore::new();
        for name in names {
            store
                .insert(Instrument::new().with_name(*name))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = InMemoryInstrumentStore::new();

        let first = store.insert(Instrument::new().with_name("cello")).await.unwrap();
        // an id on the input is not honoured by insert
        let second = store
            .insert(Instrument::new().with_id(99).with_name("oboe"))
            .await
            .unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert!(!store.exists_by_id(99).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_replace_overwrites_and_creates() {
        let store = seeded(&["cello"]).await;

        store
            .replace(Instrument::new().with_id(1).with_name("viola"))
            .await
            .unwrap();
        let found = store.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("viola"));
        assert_eq!(store.count().await.unwrap(), 1);

        store
            .replace(Instrument::new().with_id(42).with_name("harp"))
            .await
            .unwrap();
        assert!(store.exists_by_id(42).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 2);

        assert!(store.replace(Instrument::new().with_name("x")).await.is_err());
    }

    #[tokio::test]
    async fn test_find_all_pages_and_sorts() {
        let store = seeded(&["b", "a", "c", "e", "d"]).await;

        let page = store.find_all(&PageRequest::new(0, 2)).await.unwrap();
        let ids: Vec<_> = page.content.iter().map(|i| i.id.unwrap()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages(), 3);

        let request = PageRequest::new(1, 2).with_sort(SortOrder::desc(InstrumentProperty::Id));
        let page = store.find_all(&request).await.unwrap();
        let ids: Vec<_> = page.content.iter().map(|i| i.id.unwrap()).collect();
        assert_eq!(ids, vec![3, 2]);

        let request = PageRequest::new(0, 10).with_sort(SortOrder::asc(InstrumentProperty::Name));
        let page = store.find_all(&request).await.unwrap();
        let names: Vec<_> = page
            .content
            .iter()
            .map(|i| i.name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);

        let page = store.find_all(&PageRequest::new(7, 2)).await.unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 5);
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let store = seeded(&["cello"]).await;

        assert!(store.delete_by_id(1).await.unwrap());
        assert!(!store.delete_by_id(1).await.unwrap());
        assert!(store.find_by_id(1).await.unwrap().is_none());
    }
}
