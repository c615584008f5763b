//! The `v0.50.1` release: no store changes, every module migrated to its current
//! consensus version.

use crate::{Configurator, ModuleManager, StoreUpgrades, Upgrade, UpgradeHandler};

pub const UPGRADE_NAME: &str = "v0.50.1";

pub fn upgrade() -> Upgrade {
    Upgrade {
        upgrade_name: UPGRADE_NAME,
        create_upgrade_handler,
        store_upgrades: StoreUpgrades::default(),
    }
}

fn create_upgrade_handler<'a>(
    mm: &'a dyn ModuleManager,
    configurator: &'a Configurator,
) -> UpgradeHandler<'a> {
    Box::new(move |store, _plan, from_vm| mm.run_migrations(store, configurator, from_vm))
}
