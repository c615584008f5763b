//! Governance v1beta1 content types of the wasm module.
//!
//! Everything in here is frozen: these values are replayed from chain history and
//! their field order, text layout and encodings must never change, even when the
//! live governance messages evolve.

mod access;
mod display;
mod kind;
mod message;
mod proposal;
mod registry;
mod render;
mod validate;

pub use access::{AccessConfig, AccessConfigUpdate};
pub use display::{
    ExecuteContractDisplay, InstantiateContract2Display, InstantiateContractDisplay,
    MigrateContractDisplay, ProposalDisplay, StoreAndInstantiateContractDisplay,
    StoreCodeDisplay, SudoContractDisplay,
};
pub use kind::ProposalType;
pub use message::RawContractMessage;
pub use proposal::{
    ClearAdminProposal, ExecuteContractProposal, InstantiateContract2Proposal,
    InstantiateContractProposal, LegacyProposal, MigrateContractProposal, PinCodesProposal,
    SetGaslessContractsProposal, StoreAndInstantiateContractProposal, StoreCodeProposal,
    SudoContractProposal, UnpinCodesProposal, UnsetGaslessContractsProposal,
    UpdateAdminProposal, UpdateInstantiateConfigProposal,
};
pub use registry::{register_legacy_proposal_types, ProposalTypeRegistry};
pub use validate::{MAX_LABEL_SIZE, MAX_SALT_SIZE, MAX_WASM_SIZE};
