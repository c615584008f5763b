use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StoreUpgradesError {
    #[error("Store name cannot be empty")]
    EmptyName {},

    #[error("Store {0} is listed more than once")]
    Duplicate(String),

    #[error("Store {0} cannot be both added and deleted")]
    Conflict(String),

    #[error("Store {0} cannot be renamed to itself")]
    SelfRename(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum UpgradeError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    StoreUpgrades(#[from] StoreUpgradesError),

    #[error("Upgrade {upgrade}: store {store} {reason}")]
    SchemaMismatch {
        upgrade: String,
        store: String,
        reason: String,
    },

    #[error("Upgrade {upgrade} failed: {source}")]
    Failed {
        upgrade: String,
        #[source]
        source: Box<UpgradeError>,
    },

    #[error("Module {module} failed to migrate from version {from} to {to}: {msg}")]
    ModuleMigration {
        module: String,
        from: u64,
        to: u64,
        msg: String,
    },

    #[error("Module {module} failed to init genesis: {msg}")]
    InitGenesis { module: String, msg: String },

    #[error("No migration registered for module {module} from version {version}")]
    MissingMigration { module: String, version: u64 },

    #[error("Migration for module {module} from version {version} already registered")]
    DuplicateMigration { module: String, version: u64 },

    #[error("Module {0} registered twice")]
    DuplicateModule(String),

    #[error("Module {module} cannot be downgraded from version {from} to {to}")]
    Downgrade { module: String, from: u64, to: u64 },

    #[error("Module {module} version went back from {from} to {to}")]
    VersionRegression { module: String, from: u64, to: u64 },

    #[error("Migration order must name every module exactly once: {0}")]
    InvalidOrder(String),

    #[error("Invalid upgrade name {name}: {msg}")]
    InvalidUpgradeName { name: String, msg: String },

    #[error("Upgrade {0} is listed out of order")]
    UnorderedUpgrade(String),

    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Upgrade {name} already done at height {height}")]
    UpgradeAlreadyDone { name: String, height: u64 },

    #[error("UPGRADE \"{name}\" NEEDED at height {height}: no handler registered")]
    MissingHandler { name: String, height: u64 },

    #[error("Handler for upgrade {name} is registered before its height {height}")]
    PrematureUpgrade { name: String, height: u64 },
}
