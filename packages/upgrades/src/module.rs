use std::collections::{BTreeMap, BTreeSet};

use cosmwasm_std::StdResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{MultiStore, UpgradeError};

/// Consensus version of every module known to the application, keyed by module name.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(transparent)]
pub struct VersionMap(BTreeMap<String, u64>);

impl VersionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, module: &str) -> Option<u64> {
        self.0.get(module).copied()
    }

    pub fn insert(&mut self, module: impl Into<String>, version: u64) -> Option<u64> {
        self.0.insert(module.into(), version)
    }

    pub fn remove(&mut self, module: &str) -> Option<u64> {
        self.0.remove(module)
    }

    pub fn contains(&self, module: &str) -> bool {
        self.0.contains_key(module)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, version)| (name.as_str(), *version))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for VersionMap {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        VersionMap(
            iter.into_iter()
                .map(|(name, version)| (name.into(), version))
                .collect(),
        )
    }
}

pub trait AppModule {
    fn name(&self) -> &str;

    fn consensus_version(&self) -> u64;

    /// Called when the module first appears in an upgrade.
    fn init_genesis(&self, _store: &mut dyn MultiStore) -> StdResult<()> {
        Ok(())
    }
}

/// Moves a module's state from one consensus version to the next.
pub type MigrationHandler = Box<dyn Fn(&mut dyn MultiStore) -> StdResult<()>>;

/// In-place store migrations registered by modules, keyed by the version they migrate from.
#[derive(Default)]
pub struct Configurator {
    migrations: BTreeMap<(String, u64), MigrationHandler>,
}

impl Configurator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_migration(
        &mut self,
        module: &str,
        from_version: u64,
        handler: MigrationHandler,
    ) -> Result<(), UpgradeError> {
        let key = (module.to_owned(), from_version);
        if self.migrations.contains_key(&key) {
            return Err(UpgradeError::DuplicateMigration {
                module: module.to_owned(),
                version: from_version,
            });
        }
        self.migrations.insert(key, handler);
        Ok(())
    }

    pub fn has_migration(&self, module: &str, from_version: u64) -> bool {
        self.migrations
            .contains_key(&(module.to_owned(), from_version))
    }

    /// Runs the handlers for `from`, `from + 1`, up to `to - 1`.
    pub fn run_module_migrations(
        &self,
        store: &mut dyn MultiStore,
        module: &str,
        from: u64,
        to: u64,
    ) -> Result<(), UpgradeError> {
        for version in from..to {
            let handler = self
                .migrations
                .get(&(module.to_owned(), version))
                .ok_or_else(|| UpgradeError::MissingMigration {
                    module: module.to_owned(),
                    version,
                })?;
            debug!(module, from = version, to = version + 1, "running module migration");
            handler(store).map_err(|err| UpgradeError::ModuleMigration {
                module: module.to_owned(),
                from: version,
                to: version + 1,
                msg: err.to_string(),
            })?;
        }
        Ok(())
    }
}

pub trait ModuleManager {
    /// Brings every module from the versions in `from_vm` to its current consensus
    /// version and returns the resulting map.
    fn run_migrations(
        &self,
        store: &mut dyn MultiStore,
        configurator: &Configurator,
        from_vm: VersionMap,
    ) -> Result<VersionMap, UpgradeError>;
}

pub struct Manager {
    modules: Vec<Box<dyn AppModule>>,
    order: Option<Vec<String>>,
}

impl Manager {
    pub fn new(modules: Vec<Box<dyn AppModule>>) -> Result<Self, UpgradeError> {
        let mut seen = BTreeSet::new();
        for module in &modules {
            if !seen.insert(module.name().to_owned()) {
                return Err(UpgradeError::DuplicateModule(module.name().to_owned()));
            }
        }
        Ok(Manager {
            modules,
            order: None,
        })
    }

    /// Overrides the registration order used when running migrations.
    pub fn set_order_migrations(&mut self, order: Vec<String>) -> Result<(), UpgradeError> {
        let names: BTreeSet<_> = self.modules.iter().map(|m| m.name()).collect();
        let mut seen = BTreeSet::new();
        for name in &order {
            if !names.contains(name.as_str()) {
                return Err(UpgradeError::InvalidOrder(format!("unknown module {}", name)));
            }
            if !seen.insert(name.as_str()) {
                return Err(UpgradeError::InvalidOrder(format!("{} listed twice", name)));
            }
        }
        if let Some(missing) = names.iter().find(|name| !seen.contains(*name)) {
            return Err(UpgradeError::InvalidOrder(format!("{} is missing", missing)));
        }
        self.order = Some(order);
        Ok(())
    }

    pub fn module_names(&self) -> Vec<&str> {
        match &self.order {
            Some(order) => order.iter().map(String::as_str).collect(),
            None => self.modules.iter().map(|m| m.name()).collect(),
        }
    }

    fn module(&self, name: &str) -> Option<&dyn AppModule> {
        self.modules
            .iter()
            .find(|m| m.name() == name)
            .map(|m| m.as_ref())
    }

    /// Consensus versions of all registered modules, as written at genesis.
    pub fn version_map(&self) -> VersionMap {
        self.modules
            .iter()
            .map(|m| (m.name(), m.consensus_version()))
            .collect()
    }
}

impl ModuleManager for Manager {
    fn run_migrations(
        &self,
        store: &mut dyn MultiStore,
        configurator: &Configurator,
        from_vm: VersionMap,
    ) -> Result<VersionMap, UpgradeError> {
        let mut updated = VersionMap::new();
        for name in self.module_names() {
            let module = match self.module(name) {
                Some(module) => module,
                None => continue,
            };
            let to = module.consensus_version();
            match from_vm.get(name) {
                Some(from) if from > to => {
                    return Err(UpgradeError::Downgrade {
                        module: name.to_owned(),
                        from,
                        to,
                    });
                }
                Some(from) => {
                    configurator.run_module_migrations(store, name, from, to)?;
                }
                None => {
                    debug!(module = name, version = to, "initializing new module");
                    module
                        .init_genesis(store)
                        .map_err(|err| UpgradeError::InitGenesis {
                            module: name.to_owned(),
                            msg: err.to_string(),
                        })?;
                }
            }
            updated.insert(name, to);
        }
        for (name, _) in from_vm.iter().filter(|(name, _)| !updated.contains(name)) {
            debug!(module = name, "dropping removed module");
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PartitionedStorage;
    use cosmwasm_std::testing::MockStorage;
    use cosmwasm_std::StdError;

    struct Module(&'static str, u64);

    impl AppModule for Module {
        fn name(&self) -> &str {
            self.0
        }

        fn consensus_version(&self) -> u64 {
            self.1
        }

        fn init_genesis(&self, store: &mut dyn MultiStore) -> StdResult<()> {
            store.mount_store(self.0)?;
            store.set(self.0, b"genesis", b"1")
        }
    }

    fn manager(modules: &[(&'static str, u64)]) -> Manager {
        Manager::new(
            modules
                .iter()
                .map(|&(name, version)| Box::new(Module(name, version)) as Box<dyn AppModule>)
                .collect(),
        )
        .unwrap()
    }

    fn handler(f: impl Fn(&mut dyn MultiStore) -> StdResult<()> + 'static) -> MigrationHandler {
        Box::new(f)
    }

    #[test]
    fn version_map_from_pairs() {
        let vm: VersionMap = [("gov", 2), ("bank", 1)].into_iter().collect();
        assert_eq!(vm.get("bank"), Some(1));
        assert_eq!(vm.get("mint"), None);
        let names: Vec<_> = vm.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["bank", "gov"]);
        assert_eq!(
            cosmwasm_std::to_json_string(&vm).unwrap(),
            r#"{"bank":1,"gov":2}"#
        );
    }

    #[test]
    fn duplicate_migration_rejected() {
        let mut cfg = Configurator::new();
        cfg.register_migration("bank", 1, handler(|_| Ok(())))
            .unwrap();
        let err = cfg
            .register_migration("bank", 1, handler(|_| Ok(())))
            .unwrap_err();
        assert_eq!(
            err,
            UpgradeError::DuplicateMigration {
                module: "bank".to_owned(),
                version: 1
            }
        );
        assert!(cfg.has_migration("bank", 1));
        assert!(!cfg.has_migration("bank", 2));
    }

    #[test]
    fn migrations_run_in_sequence() {
        let mut storage = MockStorage::new();
        let mut store = PartitionedStorage::new(&mut storage);
        store.mount_store("bank").unwrap();

        let mut cfg = Configurator::new();
        cfg.register_migration("bank", 1, handler(|s| s.set("bank", b"v", b"2")))
            .unwrap();
        cfg.register_migration(
            "bank",
            2,
            handler(|s| {
                let prev = s.get("bank", b"v")?;
                assert_eq!(prev, Some(b"2".to_vec()));
                s.set("bank", b"v", b"3")
            }),
        )
        .unwrap();

        cfg.run_module_migrations(&mut store, "bank", 1, 3).unwrap();
        assert_eq!(store.get("bank", b"v").unwrap(), Some(b"3".to_vec()));

        let err = cfg
            .run_module_migrations(&mut store, "bank", 3, 4)
            .unwrap_err();
        assert_eq!(
            err,
            UpgradeError::MissingMigration {
                module: "bank".to_owned(),
                version: 3
            }
        );
    }

    #[test]
    fn failing_migration_reports_versions() {
        let mut storage = MockStorage::new();
        let mut store = PartitionedStorage::new(&mut storage);
        let mut cfg = Configurator::new();
        cfg.register_migration(
            "gov",
            4,
            handler(|_| Err(StdError::generic_err("bad params"))),
        )
        .unwrap();
        let err = cfg
            .run_module_migrations(&mut store, "gov", 4, 5)
            .unwrap_err();
        assert_eq!(
            err,
            UpgradeError::ModuleMigration {
                module: "gov".to_owned(),
                from: 4,
                to: 5,
                msg: "Generic error: bad params".to_owned()
            }
        );
    }

    #[test]
    fn manager_initializes_and_drops_modules() {
        let mut storage = MockStorage::new();
        let mut store = PartitionedStorage::new(&mut storage);
        let mm = manager(&[("bank", 1), ("circuit", 1)]);
        let from: VersionMap = [("bank", 1), ("crisis", 2)].into_iter().collect();

        let to = mm.run_migrations(&mut store, &Configurator::new(), from).unwrap();
        let expected: VersionMap = [("bank", 1), ("circuit", 1)].into_iter().collect();
        assert_eq!(to, expected);
        assert_eq!(store.get("circuit", b"genesis").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn manager_rejects_downgrade() {
        let mut storage = MockStorage::new();
        let mut store = PartitionedStorage::new(&mut storage);
        let mm = manager(&[("gov", 2)]);
        let from: VersionMap = [("gov", 3)].into_iter().collect();

        let err = mm
            .run_migrations(&mut store, &Configurator::new(), from)
            .unwrap_err();
        assert_eq!(
            err,
            UpgradeError::Downgrade {
                module: "gov".to_owned(),
                from: 3,
                to: 2
            }
        );
    }

    #[test]
    fn duplicate_modules_and_bad_orders() {
        let modules: Vec<Box<dyn AppModule>> =
            vec![Box::new(Module("bank", 1)), Box::new(Module("bank", 2))];
        let err = Manager::new(modules).err().unwrap();
        assert_eq!(err, UpgradeError::DuplicateModule("bank".to_owned()));

        let mut mm = manager(&[("bank", 1), ("gov", 1)]);
        assert_eq!(mm.module_names(), vec!["bank", "gov"]);
        mm.set_order_migrations(vec!["gov".to_owned()]).unwrap_err();
        mm.set_order_migrations(vec!["gov".to_owned(), "gov".to_owned()])
            .unwrap_err();
        mm.set_order_migrations(vec!["gov".to_owned(), "mint".to_owned()])
            .unwrap_err();
        mm.set_order_migrations(vec!["gov".to_owned(), "bank".to_owned()])
            .unwrap();
        assert_eq!(mm.module_names(), vec!["gov", "bank"]);
    }

    #[test]
    fn custom_order_is_followed() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let log = Rc::new(RefCell::new(vec![]));
        let mut cfg = Configurator::new();
        for name in ["bank", "gov"] {
            let log = log.clone();
            cfg.register_migration(
                name,
                1,
                handler(move |_| {
                    log.borrow_mut().push(name);
                    Ok(())
                }),
            )
            .unwrap();
        }

        let mut mm = manager(&[("bank", 2), ("gov", 2)]);
        mm.set_order_migrations(vec!["gov".to_owned(), "bank".to_owned()])
            .unwrap();
        let mut storage = MockStorage::new();
        let mut store = PartitionedStorage::new(&mut storage);
        let from: VersionMap = [("bank", 1), ("gov", 1)].into_iter().collect();
        mm.run_migrations(&mut store, &cfg, from).unwrap();

        assert_eq!(*log.borrow(), vec!["gov", "bank"]);
    }
}
