use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::{Configurator, ModuleManager, MultiStore, StoreUpgrades, UpgradeError, VersionMap};

/// Applies one release's store upgrades and runs its module migrations.
pub struct Orchestrator<'a> {
    upgrade: &'a str,
    store_upgrades: &'a StoreUpgrades,
}

impl<'a> Orchestrator<'a> {
    pub fn new(upgrade: &'a str, store_upgrades: &'a StoreUpgrades) -> Self {
        Orchestrator {
            upgrade,
            store_upgrades,
        }
    }

    /// Checks the store upgrades against the mounted stores, applies them and then
    /// hands the store to `migrate`.
    ///
    /// Nothing is touched when the descriptor does not fit the current layout. Store
    /// changes and writes made by `migrate` are not undone when migration fails; run
    /// it on a [`crate::StorageTransaction`] to keep them from being committed. A
    /// module whose version goes backwards fails the whole upgrade.
    pub fn run<F>(
        &self,
        store: &mut dyn MultiStore,
        from_vm: VersionMap,
        migrate: F,
    ) -> Result<VersionMap, UpgradeError>
    where
        F: FnOnce(&mut dyn MultiStore, VersionMap) -> Result<VersionMap, UpgradeError>,
    {
        info!(upgrade = self.upgrade, modules = from_vm.len(), "running upgrade");
        self.check_schema(store)?;
        self.apply(store)?;

        let to_vm = migrate(store, from_vm.clone()).map_err(|err| UpgradeError::Failed {
            upgrade: self.upgrade.to_owned(),
            source: Box::new(err),
        })?;

        for (module, from) in from_vm.iter() {
            match to_vm.get(module) {
                Some(to) if to < from => {
                    return Err(UpgradeError::Failed {
                        upgrade: self.upgrade.to_owned(),
                        source: Box::new(UpgradeError::VersionRegression {
                            module: module.to_owned(),
                            from,
                            to,
                        }),
                    })
                }
                _ => {}
            }
        }
        info!(upgrade = self.upgrade, modules = to_vm.len(), "upgrade complete");
        Ok(to_vm)
    }

    /// Runs the upgrade with the module manager as the migration step.
    pub fn run_migrations(
        &self,
        store: &mut dyn MultiStore,
        mm: &dyn ModuleManager,
        configurator: &Configurator,
        from_vm: VersionMap,
    ) -> Result<VersionMap, UpgradeError> {
        self.run(store, from_vm, |store, vm| {
            mm.run_migrations(store, configurator, vm)
        })
    }

    fn check_schema(&self, store: &dyn MultiStore) -> Result<(), UpgradeError> {
        let mismatch = |name: &str, reason: &str| UpgradeError::SchemaMismatch {
            upgrade: self.upgrade.to_owned(),
            store: name.to_owned(),
            reason: reason.to_owned(),
        };

        // replays `apply` step by step on the set of mounted names
        let mut mounted: BTreeSet<String> = store.store_names()?.into_iter().collect();
        for name in self.store_upgrades.deleted() {
            if !mounted.remove(name) {
                return Err(mismatch(name.as_str(), "cannot be deleted: not mounted"));
            }
        }
        for rename in self.store_upgrades.renamed() {
            if !mounted.remove(&rename.old_key) {
                return Err(mismatch(rename.old_key.as_str(), "cannot be renamed: not mounted"));
            }
            if !mounted.insert(rename.new_key.clone()) {
                return Err(mismatch(
                    rename.new_key.as_str(),
                    "cannot be a rename target: already mounted",
                ));
            }
        }
        for name in self.store_upgrades.added() {
            if !mounted.insert(name.clone()) {
                return Err(mismatch(name.as_str(), "cannot be added: already mounted"));
            }
        }
        Ok(())
    }

    fn apply(&self, store: &mut dyn MultiStore) -> Result<(), UpgradeError> {
        for name in self.store_upgrades.deleted() {
            debug!(upgrade = self.upgrade, store = name.as_str(), "deleting store");
            store.delete_store(name)?;
        }
        for rename in self.store_upgrades.renamed() {
            debug!(
                upgrade = self.upgrade,
                from = rename.old_key.as_str(),
                to = rename.new_key.as_str(),
                "renaming store"
            );
            store.rename_store(&rename.old_key, &rename.new_key)?;
        }
        for name in self.store_upgrades.added() {
            debug!(upgrade = self.upgrade, store = name.as_str(), "adding store");
            store.mount_store(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PartitionedStorage, StoreRename};
    use cosmwasm_std::testing::MockStorage;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn mounted(storage: &mut MockStorage, stores: &[&str]) {
        let mut store = PartitionedStorage::new(storage);
        for name in stores {
            store.mount_store(name).unwrap();
        }
    }

    #[test]
    fn applies_descriptor_before_migrating() {
        let mut storage = MockStorage::new();
        mounted(&mut storage, &["bank", "crisis", "wasm_old"]);
        let upgrades = StoreUpgrades::new(
            names(&["circuit"]),
            vec![StoreRename {
                old_key: "wasm_old".to_owned(),
                new_key: "wasm".to_owned(),
            }],
            names(&["crisis"]),
        )
        .unwrap();

        let mut store = PartitionedStorage::new(&mut storage);
        let from: VersionMap = [("bank", 1)].into_iter().collect();
        let to = Orchestrator::new("v2", &upgrades)
            .run(&mut store, from, |store, mut vm| {
                assert!(store.has_store("circuit").unwrap());
                vm.insert("bank", 2);
                Ok(vm)
            })
            .unwrap();

        assert_eq!(to.get("bank"), Some(2));
        assert_eq!(store.store_names().unwrap(), names(&["bank", "circuit", "wasm"]));
    }

    #[test]
    fn mismatch_leaves_store_untouched() {
        let mut storage = MockStorage::new();
        mounted(&mut storage, &["bank", "gov"]);
        let upgrades =
            StoreUpgrades::new(names(&["circuit"]), vec![], names(&["intertx"])).unwrap();

        let mut store = PartitionedStorage::new(&mut storage);
        let err = Orchestrator::new("v2", &upgrades)
            .run(&mut store, VersionMap::new(), |_, vm| Ok(vm))
            .unwrap_err();
        assert_eq!(
            err,
            UpgradeError::SchemaMismatch {
                upgrade: "v2".to_owned(),
                store: "intertx".to_owned(),
                reason: "cannot be deleted: not mounted".to_owned(),
            }
        );
        assert_eq!(store.store_names().unwrap(), names(&["bank", "gov"]));
    }

    #[test]
    fn rename_onto_deleted_store_is_allowed() {
        let mut storage = MockStorage::new();
        mounted(&mut storage, &["a", "b"]);
        let upgrades = StoreUpgrades::new(
            vec![],
            vec![StoreRename {
                old_key: "a".to_owned(),
                new_key: "b".to_owned(),
            }],
            names(&["b"]),
        )
        .unwrap();
        let mut store = PartitionedStorage::new(&mut storage);
        Orchestrator::new("v2", &upgrades)
            .run(&mut store, VersionMap::new(), |_, vm| Ok(vm))
            .unwrap();
        assert_eq!(store.store_names().unwrap(), names(&["b"]));
    }

    #[test]
    fn failures_are_wrapped_and_regressions_caught() {
        let mut storage = MockStorage::new();
        let upgrades = StoreUpgrades::default();
        let from: VersionMap = [("gov", 3)].into_iter().collect();

        let mut store = PartitionedStorage::new(&mut storage);
        let err = Orchestrator::new("v2", &upgrades)
            .run(&mut store, from.clone(), |_, _| {
                Err(UpgradeError::MissingMigration {
                    module: "gov".to_owned(),
                    version: 3,
                })
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Upgrade v2 failed: No migration registered for module gov from version 3"
        );

        let err = Orchestrator::new("v2", &upgrades)
            .run(&mut store, from, |_, _| Ok([("gov", 2)].into_iter().collect()))
            .unwrap_err();
        assert_eq!(
            err,
            UpgradeError::Failed {
                upgrade: "v2".to_owned(),
                source: Box::new(UpgradeError::VersionRegression {
                    module: "gov".to_owned(),
                    from: 3,
                    to: 2
                }),
            }
        );
        assert_eq!(
            err.to_string(),
            "Upgrade v2 failed: Module gov version went back from 3 to 2"
        );
    }

    #[test]
    fn rename_chain_is_checked_in_apply_order() {
        let mut storage = MockStorage::new();
        mounted(&mut storage, &["a", "b", "gone"]);
        let upgrades = StoreUpgrades::new(
            vec![],
            vec![
                StoreRename {
                    old_key: "a".to_owned(),
                    new_key: "b".to_owned(),
                },
                StoreRename {
                    old_key: "b".to_owned(),
                    new_key: "c".to_owned(),
                },
            ],
            names(&["gone"]),
        )
        .unwrap();

        let mut store = PartitionedStorage::new(&mut storage);
        let err = Orchestrator::new("v2", &upgrades)
            .run(&mut store, VersionMap::new(), |_, vm| Ok(vm))
            .unwrap_err();
        assert_eq!(
            err,
            UpgradeError::SchemaMismatch {
                upgrade: "v2".to_owned(),
                store: "b".to_owned(),
                reason: "cannot be a rename target: already mounted".to_owned(),
            }
        );
        assert_eq!(store.store_names().unwrap(), names(&["a", "b", "gone"]));
    }

    #[test]
    fn rename_chain_in_workable_order() {
        let mut storage = MockStorage::new();
        mounted(&mut storage, &["a", "b"]);
        let upgrades = StoreUpgrades::new(
            vec![],
            vec![
                StoreRename {
                    old_key: "b".to_owned(),
                    new_key: "c".to_owned(),
                },
                StoreRename {
                    old_key: "a".to_owned(),
                    new_key: "b".to_owned(),
                },
            ],
            vec![],
        )
        .unwrap();

        let mut store = PartitionedStorage::new(&mut storage);
        store.set("a", b"k", b"from a").unwrap();
        Orchestrator::new("v2", &upgrades)
            .run(&mut store, VersionMap::new(), |_, vm| Ok(vm))
            .unwrap();
        assert_eq!(store.store_names().unwrap(), names(&["b", "c"]));
        assert_eq!(store.get("b", b"k").unwrap(), Some(b"from a".to_vec()));
    }

    #[test]
    fn second_run_fails_on_added_store() {
        let mut storage = MockStorage::new();
        mounted(&mut storage, &["bank"]);
        let upgrades = StoreUpgrades::new(names(&["circuit"]), vec![], vec![]).unwrap();
        let orchestrator = Orchestrator::new("v2", &upgrades);
        let from: VersionMap = [("bank", 1)].into_iter().collect();

        let mut store = PartitionedStorage::new(&mut storage);
        let to = orchestrator
            .run(&mut store, from.clone(), |_, vm| Ok(vm))
            .unwrap();
        assert_eq!(to, from);

        let err = orchestrator
            .run(&mut store, to, |_, vm| Ok(vm))
            .unwrap_err();
        assert_eq!(
            err,
            UpgradeError::SchemaMismatch {
                upgrade: "v2".to_owned(),
                store: "circuit".to_owned(),
                reason: "cannot be added: already mounted".to_owned(),
            }
        );
        assert_eq!(store.store_names().unwrap(), names(&["bank", "circuit"]));
    }
}
