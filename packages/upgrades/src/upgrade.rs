use semver::Version;

use crate::{
    Configurator, ModuleManager, MultiStore, Plan, StoreUpgrades, UpgradeError, UpgradeKeeper,
    VersionMap,
};

/// Runs the module migrations of a named upgrade once its plan height is reached.
pub type UpgradeHandler<'a> =
    Box<dyn Fn(&mut dyn MultiStore, &Plan, VersionMap) -> Result<VersionMap, UpgradeError> + 'a>;

/// Builds an upgrade's handler from the application's module manager and configurator.
pub type CreateUpgradeHandler =
    for<'a> fn(&'a dyn ModuleManager, &'a Configurator) -> UpgradeHandler<'a>;

/// A release: the upgrade name governance schedules and what the binary does for it.
#[derive(Clone)]
pub struct Upgrade {
    pub upgrade_name: &'static str,
    pub create_upgrade_handler: CreateUpgradeHandler,
    pub store_upgrades: StoreUpgrades,
}

/// Every upgrade the binary knows, oldest first.
pub struct Upgrades(Vec<Upgrade>);

fn parse_name(name: &str) -> Result<Version, UpgradeError> {
    Version::parse(name.strip_prefix('v').unwrap_or(name)).map_err(|err| {
        UpgradeError::InvalidUpgradeName {
            name: name.to_owned(),
            msg: err.to_string(),
        }
    })
}

impl Upgrades {
    /// Names must be semantic versions, optionally prefixed with `v`, listed in
    /// strictly ascending order.
    pub fn new(upgrades: Vec<Upgrade>) -> Result<Self, UpgradeError> {
        let mut last: Option<Version> = None;
        for upgrade in &upgrades {
            let version = parse_name(upgrade.upgrade_name)?;
            if let Some(last) = &last {
                if &version <= last {
                    return Err(UpgradeError::UnorderedUpgrade(
                        upgrade.upgrade_name.to_owned(),
                    ));
                }
            }
            last = Some(version);
        }
        Ok(Upgrades(upgrades))
    }

    pub fn get(&self, name: &str) -> Option<&Upgrade> {
        self.0.iter().find(|u| u.upgrade_name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|u| u.upgrade_name)
    }

    pub fn latest(&self) -> Option<&Upgrade> {
        self.0.last()
    }

    /// Installs every handler and store upgrade on the keeper.
    pub fn register<'a>(
        &self,
        keeper: &mut UpgradeKeeper<'a>,
        mm: &'a dyn ModuleManager,
        configurator: &'a Configurator,
    ) {
        for upgrade in &self.0 {
            keeper.set_upgrade_handler(
                upgrade.upgrade_name,
                (upgrade.create_upgrade_handler)(mm, configurator),
            );
            keeper.set_store_upgrades(upgrade.upgrade_name, upgrade.store_upgrades.clone());
        }
    }
}
