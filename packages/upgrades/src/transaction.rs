use std::collections::BTreeMap;

use cosmwasm_std::{Order, Record, Storage};

/// Writes buffered on top of a storage that is only read until they are committed.
pub struct StorageTransaction<'a> {
    storage: &'a dyn Storage,
    /// `None` marks a removed key
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> StorageTransaction<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        StorageTransaction {
            storage,
            pending: BTreeMap::new(),
        }
    }

    /// Releases the underlying storage, keeping the buffered writes.
    pub fn prepare(self) -> PendingWrites {
        PendingWrites(self.pending)
    }
}

/// Writes collected by a [`StorageTransaction`]. Dropping them discards the transaction.
#[must_use]
pub struct PendingWrites(BTreeMap<Vec<u8>, Option<Vec<u8>>>);

impl PendingWrites {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn commit(self, storage: &mut dyn Storage) {
        for (key, value) in self.0 {
            match value {
                Some(value) => storage.set(&key, &value),
                None => storage.remove(&key),
            }
        }
    }
}

impl<'a> Storage for StorageTransaction<'a> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.pending.get(key) {
            Some(value) => value.clone(),
            None => self.storage.get(key),
        }
    }

    fn range<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        let in_range = |key: &[u8]| {
            start.map_or(true, |start| key >= start) && end.map_or(true, |end| key < end)
        };

        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.storage.range(start, end, Order::Ascending).collect();
        for (key, value) in &self.pending {
            if !in_range(key.as_slice()) {
                continue;
            }
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        match order {
            Order::Ascending => Box::new(merged.into_iter()),
            Order::Descending => Box::new(merged.into_iter().rev()),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.pending.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.pending.insert(key.to_vec(), None);
    }
}
