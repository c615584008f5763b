use std::collections::BTreeMap;

use cosmwasm_std::{Event, Order, StdResult, Storage};
use cw_storage_plus::{Item, Map};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    Orchestrator, PartitionedStorage, StorageTransaction, StoreUpgrades, UpgradeError,
    UpgradeHandler, VersionMap,
};

/// A governance approved upgrade: at `height` the chain halts unless the running
/// binary has a handler registered under `name`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct Plan {
    pub name: String,
    pub height: u64,
    #[serde(default)]
    pub info: String,
}

impl Plan {
    pub fn validate(&self) -> Result<(), UpgradeError> {
        if self.name.is_empty() {
            return Err(UpgradeError::InvalidPlan("name cannot be empty".to_owned()));
        }
        if self.height == 0 {
            return Err(UpgradeError::InvalidPlan("height must be greater than 0".to_owned()));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
pub struct KeeperConfig {
    /// Heights at which a due upgrade is dropped instead of run.
    #[serde(default)]
    pub skip_heights: Vec<u64>,
}

const CONFIG: Item<KeeperConfig> = Item::new("upgrade_config");
const PLAN: Item<Plan> = Item::new("upgrade_plan");
const DONE: Map<&str, u64> = Map::new("upgrade_done");
const VERSION_MAP: Map<&str, u64> = Map::new("module_versions");

/// Tracks the scheduled plan and runs the matching handler once it is due.
///
/// Handlers live only in memory, as they are part of the binary. Plans, completed
/// upgrades and the module version map are kept in storage.
#[derive(Default)]
pub struct UpgradeKeeper<'a> {
    handlers: BTreeMap<String, UpgradeHandler<'a>>,
    store_upgrades: BTreeMap<String, StoreUpgrades>,
}

impl<'a> UpgradeKeeper<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the configuration and the genesis version map.
    pub fn instantiate(
        &self,
        storage: &mut dyn Storage,
        config: &KeeperConfig,
        genesis: &VersionMap,
    ) -> StdResult<()> {
        CONFIG.save(storage, config)?;
        self.set_module_version_map(storage, genesis)
    }

    pub fn config(&self, storage: &dyn Storage) -> StdResult<KeeperConfig> {
        Ok(CONFIG.may_load(storage)?.unwrap_or_default())
    }

    pub fn set_upgrade_handler(&mut self, name: &str, handler: UpgradeHandler<'a>) {
        self.handlers.insert(name.to_owned(), handler);
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn set_store_upgrades(&mut self, name: &str, store_upgrades: StoreUpgrades) {
        self.store_upgrades.insert(name.to_owned(), store_upgrades);
    }

    /// Replaces any pending plan.
    pub fn schedule_upgrade(
        &self,
        storage: &mut dyn Storage,
        plan: &Plan,
        current_height: u64,
    ) -> Result<(), UpgradeError> {
        plan.validate()?;
        if plan.height <= current_height {
            return Err(UpgradeError::InvalidPlan(format!(
                "upgrade cannot be scheduled in the past: height {} is not after {}",
                plan.height, current_height
            )));
        }
        if let Some(height) = DONE.may_load(storage, &plan.name)? {
            return Err(UpgradeError::UpgradeAlreadyDone {
                name: plan.name.clone(),
                height,
            });
        }
        PLAN.save(storage, plan)?;
        info!(upgrade = plan.name.as_str(), height = plan.height, "upgrade scheduled");
        Ok(())
    }

    pub fn cancel_upgrade(&self, storage: &mut dyn Storage) {
        PLAN.remove(storage);
    }

    pub fn pending_plan(&self, storage: &dyn Storage) -> StdResult<Option<Plan>> {
        PLAN.may_load(storage)
    }

    /// Height at which the named upgrade ran, if it did.
    pub fn done_height(&self, storage: &dyn Storage, name: &str) -> StdResult<Option<u64>> {
        DONE.may_load(storage, name)
    }

    pub fn module_version_map(&self, storage: &dyn Storage) -> StdResult<VersionMap> {
        VERSION_MAP
            .range(storage, None, None, Order::Ascending)
            .collect()
    }

    pub fn set_module_version_map(
        &self,
        storage: &mut dyn Storage,
        version_map: &VersionMap,
    ) -> StdResult<()> {
        let stale: Vec<String> = VERSION_MAP
            .keys(storage, None, None, Order::Ascending)
            .collect::<StdResult<_>>()?;
        for module in stale.iter().filter(|m| !version_map.contains(m)) {
            VERSION_MAP.remove(storage, module);
        }
        for (module, version) in version_map.iter() {
            VERSION_MAP.save(storage, module, &version)?;
        }
        Ok(())
    }

    /// Runs the pending upgrade when `height` reaches its plan height.
    ///
    /// Fails when the plan is due and no handler is registered, which must halt the
    /// chain, and when a handler for the plan is present before the plan is due.
    ///
    /// All writes of the upgrade are buffered and only reach `storage` once it has
    /// succeeded, so a failed upgrade can be retried at a later block.
    pub fn begin_block(
        &self,
        storage: &mut dyn Storage,
        height: u64,
    ) -> Result<Option<Event>, UpgradeError> {
        let plan = match PLAN.may_load(storage)? {
            Some(plan) => plan,
            None => return Ok(None),
        };

        if height < plan.height {
            if self.has_handler(&plan.name) {
                return Err(UpgradeError::PrematureUpgrade {
                    name: plan.name,
                    height: plan.height,
                });
            }
            return Ok(None);
        }

        if self.config(storage)?.skip_heights.contains(&height) {
            warn!(upgrade = plan.name.as_str(), height, "skipping upgrade at configured height");
            PLAN.remove(storage);
            return Ok(None);
        }

        let handler = match self.handlers.get(&plan.name) {
            Some(handler) => handler,
            None => {
                return Err(UpgradeError::MissingHandler {
                    name: plan.name,
                    height,
                })
            }
        };
        let store_upgrades = self
            .store_upgrades
            .get(&plan.name)
            .cloned()
            .unwrap_or_default();

        info!(upgrade = plan.name.as_str(), height, "applying upgrade");
        let mut tx = StorageTransaction::new(&*storage);
        let from_vm = self.module_version_map(&tx)?;
        let to_vm = {
            let mut store = PartitionedStorage::new(&mut tx);
            Orchestrator::new(&plan.name, &store_upgrades).run(&mut store, from_vm, |store, vm| {
                handler(store, &plan, vm)
            })?
        };
        self.set_module_version_map(&mut tx, &to_vm)?;
        DONE.save(&mut tx, &plan.name, &height)?;
        PLAN.remove(&mut tx);

        tx.prepare().commit(storage);
        info!(upgrade = plan.name.as_str(), height, "upgrade applied");

        Ok(Some(
            Event::new("upgrade")
                .add_attribute("name", plan.name)
                .add_attribute("height", height.to_string()),
        ))
    }
}
