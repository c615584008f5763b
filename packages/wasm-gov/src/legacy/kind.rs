use std::fmt;
use std::str::FromStr;

use crate::ProposalError;

/// Identifiers the v1beta1 gov module knows wasm proposals by.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum ProposalType {
    StoreCode,
    InstantiateContract,
    InstantiateContract2,
    MigrateContract,
    SudoContract,
    ExecuteContract,
    UpdateAdmin,
    ClearAdmin,
    PinCodes,
    UnpinCodes,
    SetGaslessContracts,
    UnSetGaslessContracts,
    UpdateInstantiateConfig,
    StoreAndInstantiateContract,
}

impl ProposalType {
    /// All kinds, in registration order.
    pub const ALL: [ProposalType; 14] = [
        ProposalType::StoreCode,
        ProposalType::InstantiateContract,
        ProposalType::InstantiateContract2,
        ProposalType::MigrateContract,
        ProposalType::SudoContract,
        ProposalType::ExecuteContract,
        ProposalType::UpdateAdmin,
        ProposalType::ClearAdmin,
        ProposalType::PinCodes,
        ProposalType::UnpinCodes,
        ProposalType::SetGaslessContracts,
        ProposalType::UnSetGaslessContracts,
        ProposalType::UpdateInstantiateConfig,
        ProposalType::StoreAndInstantiateContract,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ProposalType::StoreCode => "StoreCodeV1Beta1",
            ProposalType::InstantiateContract => "InstantiateContractV1Beta1",
            ProposalType::InstantiateContract2 => "InstantiateContract2V1Beta1",
            ProposalType::MigrateContract => "MigrateContractV1Beta1",
            ProposalType::SudoContract => "SudoContractV1Beta1",
            ProposalType::ExecuteContract => "ExecuteContractV1Beta1",
            ProposalType::UpdateAdmin => "UpdateAdminV1Beta1",
            ProposalType::ClearAdmin => "ClearAdminV1Beta1",
            ProposalType::PinCodes => "PinCodesV1Beta1",
            ProposalType::UnpinCodes => "UnpinCodesV1Beta1",
            ProposalType::SetGaslessContracts => "SetGaslessContractsV1Beta1",
            ProposalType::UnSetGaslessContracts => "UnSetGaslessContractsV1Beta1",
            ProposalType::UpdateInstantiateConfig => "UpdateInstantiateConfigV1Beta1",
            ProposalType::StoreAndInstantiateContract => "StoreAndInstantiateContractV1Beta1",
        }
    }

    /// Name the content was registered under in the amino JSON codec.
    pub const fn amino_name(self) -> &'static str {
        match self {
            ProposalType::StoreCode => "wasm/StoreCodeProposal",
            ProposalType::InstantiateContract => "wasm/InstantiateContractProposal",
            ProposalType::InstantiateContract2 => "wasm/InstantiateContract2Proposal",
            ProposalType::MigrateContract => "wasm/MigrateContractProposal",
            ProposalType::SudoContract => "wasm/SudoContractProposal",
            ProposalType::ExecuteContract => "wasm/ExecuteContractProposal",
            ProposalType::UpdateAdmin => "wasm/UpdateAdminProposal",
            ProposalType::ClearAdmin => "wasm/ClearAdminProposal",
            ProposalType::PinCodes => "wasm/PinCodesProposal",
            ProposalType::UnpinCodes => "wasm/UnpinCodesProposal",
            ProposalType::SetGaslessContracts => "wasm/SetGaslessContractsProposal",
            ProposalType::UnSetGaslessContracts => "wasm/UnSetGaslessContractsProposal",
            ProposalType::UpdateInstantiateConfig => "wasm/UpdateInstantiateConfigProposal",
            ProposalType::StoreAndInstantiateContract => {
                "wasm/StoreAndInstantiateContractProposal"
            }
        }
    }
}

impl fmt::Display for ProposalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalType {
    type Err = ProposalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProposalType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ProposalError::UnknownProposalType(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn identifiers_are_unique() {
        let names: BTreeSet<_> = ProposalType::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), ProposalType::ALL.len());

        let amino: BTreeSet<_> = ProposalType::ALL.iter().map(|k| k.amino_name()).collect();
        assert_eq!(amino.len(), ProposalType::ALL.len());
    }

    #[test]
    fn parse_back() {
        for kind in ProposalType::ALL {
            assert_eq!(kind, kind.as_str().parse().unwrap());
        }
        let err = "TextProposal".parse::<ProposalType>().unwrap_err();
        assert_eq!(err, ProposalError::UnknownProposalType("TextProposal".into()));
    }
}
