//! Chain upgrade plumbing: what a release changes in the store layout, how module
//! migrations are run at the upgrade height and how a named upgrade is bound to
//! its handler.

mod error;
mod keeper;
mod module;
mod multistore;
mod orchestrator;
mod store;
mod tests;
mod transaction;
mod upgrade;
pub mod v050;

pub use error::{StoreUpgradesError, UpgradeError};
pub use keeper::{KeeperConfig, Plan, UpgradeKeeper};
pub use module::{AppModule, Configurator, Manager, MigrationHandler, ModuleManager, VersionMap};
pub use multistore::{MultiStore, PartitionedStorage};
pub use orchestrator::Orchestrator;
pub use store::{StoreRename, StoreUpgrades};
pub use transaction::{PendingWrites, StorageTransaction};
pub use upgrade::{CreateUpgradeHandler, Upgrade, UpgradeHandler, Upgrades};

pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");
