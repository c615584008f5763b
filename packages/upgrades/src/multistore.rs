use cosmwasm_std::{Binary, Empty, Order, StdError, StdResult, Storage};
use cw_storage_plus::Map;

/// The set of named module stores an application mounts, as seen by an upgrade.
pub trait MultiStore {
    fn has_store(&self, name: &str) -> StdResult<bool>;

    /// Mounted store names in ascending order.
    fn store_names(&self) -> StdResult<Vec<String>>;

    fn mount_store(&mut self, name: &str) -> StdResult<()>;

    /// Unmounts the store and drops everything it held.
    fn delete_store(&mut self, name: &str) -> StdResult<()>;

    /// Moves every entry of `old` under `new`. `new` must not be mounted.
    fn rename_store(&mut self, old: &str, new: &str) -> StdResult<()>;

    fn get(&self, store: &str, key: &[u8]) -> StdResult<Option<Vec<u8>>>;

    fn set(&mut self, store: &str, key: &[u8], value: &[u8]) -> StdResult<()>;

    fn remove(&mut self, store: &str, key: &[u8]) -> StdResult<()>;
}

const STORES: Map<&str, Empty> = Map::new("stores");
const DATA: Map<(&str, &[u8]), Binary> = Map::new("store_data");

/// Module stores kept as partitions of a single contract-style key value store.
pub struct PartitionedStorage<'a> {
    storage: &'a mut dyn Storage,
}

impl<'a> PartitionedStorage<'a> {
    pub fn new(storage: &'a mut dyn Storage) -> Self {
        PartitionedStorage { storage }
    }

    fn ensure_mounted(&self, name: &str) -> StdResult<()> {
        if STORES.has(self.storage, name) {
            Ok(())
        } else {
            Err(StdError::not_found(format!("store {}", name)))
        }
    }

    fn entries(&self, name: &str) -> StdResult<Vec<(Vec<u8>, Binary)>> {
        DATA.prefix(name)
            .range(self.storage, None, None, Order::Ascending)
            .collect()
    }
}

impl<'a> MultiStore for PartitionedStorage<'a> {
    fn has_store(&self, name: &str) -> StdResult<bool> {
        Ok(STORES.has(self.storage, name))
    }

    fn store_names(&self) -> StdResult<Vec<String>> {
        STORES
            .keys(self.storage, None, None, Order::Ascending)
            .collect()
    }

    fn mount_store(&mut self, name: &str) -> StdResult<()> {
        if STORES.has(self.storage, name) {
            return Err(StdError::generic_err(format!(
                "store {} is already mounted",
                name
            )));
        }
        STORES.save(self.storage, name, &Empty {})
    }

    fn delete_store(&mut self, name: &str) -> StdResult<()> {
        self.ensure_mounted(name)?;
        for (key, _) in self.entries(name)? {
            DATA.remove(self.storage, (name, key.as_slice()));
        }
        STORES.remove(self.storage, name);
        Ok(())
    }

    fn rename_store(&mut self, old: &str, new: &str) -> StdResult<()> {
        self.ensure_mounted(old)?;
        self.mount_store(new)?;
        for (key, value) in self.entries(old)? {
            DATA.remove(self.storage, (old, key.as_slice()));
            DATA.save(self.storage, (new, key.as_slice()), &value)?;
        }
        STORES.remove(self.storage, old);
        Ok(())
    }

    fn get(&self, store: &str, key: &[u8]) -> StdResult<Option<Vec<u8>>> {
        self.ensure_mounted(store)?;
        Ok(DATA
            .may_load(self.storage, (store, key))?
            .map(|value| value.to_vec()))
    }

    fn set(&mut self, store: &str, key: &[u8], value: &[u8]) -> StdResult<()> {
        self.ensure_mounted(store)?;
        DATA.save(self.storage, (store, key), &Binary::from(value))
    }

    fn remove(&mut self, store: &str, key: &[u8]) -> StdResult<()> {
        self.ensure_mounted(store)?;
        DATA.remove(self.storage, (store, key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;

    #[test]
    fn mount_and_use() {
        let mut storage = MockStorage::new();
        let mut stores = PartitionedStorage::new(&mut storage);

        stores.mount_store("bank").unwrap();
        stores.mount_store("gov").unwrap();
        assert!(stores.has_store("bank").unwrap());
        assert!(!stores.has_store("wasm").unwrap());
        assert_eq!(stores.store_names().unwrap(), vec!["bank", "gov"]);

        stores.set("bank", b"supply", b"100").unwrap();
        assert_eq!(stores.get("bank", b"supply").unwrap(), Some(b"100".to_vec()));
        assert_eq!(stores.get("gov", b"supply").unwrap(), None);

        stores.remove("bank", b"supply").unwrap();
        assert_eq!(stores.get("bank", b"supply").unwrap(), None);

        stores.mount_store("bank").unwrap_err();
        stores.set("wasm", b"code", b"1").unwrap_err();
    }

    #[test]
    fn rename_moves_data() {
        let mut storage = MockStorage::new();
        let mut stores = PartitionedStorage::new(&mut storage);
        stores.mount_store("old").unwrap();
        stores.mount_store("other").unwrap();
        stores.set("old", b"a", b"1").unwrap();
        stores.set("old", b"b", b"2").unwrap();
        stores.set("other", b"a", b"x").unwrap();

        stores.rename_store("old", "new").unwrap();
        assert_eq!(stores.store_names().unwrap(), vec!["new", "other"]);
        assert_eq!(stores.get("new", b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(stores.get("new", b"b").unwrap(), Some(b"2".to_vec()));
        assert_eq!(stores.get("other", b"a").unwrap(), Some(b"x".to_vec()));
        stores.get("old", b"a").unwrap_err();

        stores.rename_store("new", "other").unwrap_err();
    }

    #[test]
    fn delete_drops_data() {
        let mut storage = MockStorage::new();
        let mut stores = PartitionedStorage::new(&mut storage);
        stores.mount_store("intertx").unwrap();
        stores.set("intertx", b"k", b"v").unwrap();
        stores.delete_store("intertx").unwrap();
        assert!(!stores.has_store("intertx").unwrap());

        stores.mount_store("intertx").unwrap();
        assert_eq!(stores.get("intertx", b"k").unwrap(), None);

        stores.delete_store("missing").unwrap_err();
    }
}
