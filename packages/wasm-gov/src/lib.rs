mod error;
pub mod legacy;
mod msg;

pub use error::ProposalError;
pub use legacy::{
    register_legacy_proposal_types, AccessConfig, AccessConfigUpdate, ClearAdminProposal,
    ExecuteContractProposal, InstantiateContract2Proposal, InstantiateContractProposal,
    LegacyProposal, MigrateContractProposal, PinCodesProposal, ProposalDisplay, ProposalType,
    ProposalTypeRegistry, RawContractMessage, SetGaslessContractsProposal,
    StoreAndInstantiateContractProposal, StoreCodeProposal, SudoContractProposal,
    UnpinCodesProposal, UnsetGaslessContractsProposal, UpdateAdminProposal,
    UpdateInstantiateConfigProposal,
};

/// Routing key shared by every wasm proposal; they all dispatch to the wasm keeper.
pub const ROUTER_KEY: &str = "wasm";
