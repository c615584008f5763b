use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Binary, Coin, StdError, Uint64};

use super::{AccessConfig, AccessConfigUpdate, ProposalType, RawContractMessage};
use crate::{ProposalError, ROUTER_KEY};

// Field order in every payload below follows the proto field numbers. It is part of
// the historical encoding and must not be rearranged.

/// Upload of new wasm code, executed with the `run_as` account as creator.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct StoreCodeProposal {
    pub title: String,
    pub description: String,
    pub run_as: String,
    pub wasm_byte_code: Binary,
    pub instantiate_permission: Option<AccessConfig>,
    /// Do not pin the code after upload
    pub unpin_code: bool,
    /// URL of the code's source, for reproducible builds
    pub source: String,
    /// Docker image the code was built with
    pub builder: String,
    /// Expected sha256 of `wasm_byte_code`
    pub code_hash: Binary,
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct InstantiateContractProposal {
    pub title: String,
    pub description: String,
    pub run_as: String,
    /// Admin is an optional address that can execute migrations
    pub admin: String,
    pub code_id: Uint64,
    pub label: String,
    pub msg: RawContractMessage,
    pub funds: Vec<Coin>,
}

/// Instantiate with a predictable address derived from `salt`.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct InstantiateContract2Proposal {
    pub title: String,
    pub description: String,
    pub run_as: String,
    pub admin: String,
    pub code_id: Uint64,
    pub label: String,
    pub msg: RawContractMessage,
    pub funds: Vec<Coin>,
    pub salt: Binary,
    /// Include `msg` in the address derivation
    pub fix_msg: bool,
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct StoreAndInstantiateContractProposal {
    pub title: String,
    pub description: String,
    pub run_as: String,
    pub wasm_byte_code: Binary,
    pub instantiate_permission: Option<AccessConfig>,
    pub unpin_code: bool,
    pub admin: String,
    pub label: String,
    pub msg: RawContractMessage,
    pub funds: Vec<Coin>,
    pub source: String,
    pub builder: String,
    pub code_hash: Binary,
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct MigrateContractProposal {
    pub title: String,
    pub description: String,
    pub contract: String,
    pub code_id: Uint64,
    pub msg: RawContractMessage,
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct SudoContractProposal {
    pub title: String,
    pub description: String,
    pub contract: String,
    pub msg: RawContractMessage,
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct ExecuteContractProposal {
    pub title: String,
    pub description: String,
    pub run_as: String,
    pub contract: String,
    pub msg: RawContractMessage,
    pub funds: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct UpdateAdminProposal {
    pub title: String,
    pub description: String,
    pub new_admin: String,
    pub contract: String,
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct ClearAdminProposal {
    pub title: String,
    pub description: String,
    pub contract: String,
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct PinCodesProposal {
    pub title: String,
    pub description: String,
    /// all code ids that should be pinned in cache for high performance
    pub code_ids: Vec<Uint64>,
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct UnpinCodesProposal {
    pub title: String,
    pub description: String,
    /// all code ids that should be removed from cache to free space
    pub code_ids: Vec<Uint64>,
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct SetGaslessContractsProposal {
    pub title: String,
    pub description: String,
    pub contracts: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct UnsetGaslessContractsProposal {
    pub title: String,
    pub description: String,
    pub contracts: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema, Debug)]
#[serde(default)]
pub struct UpdateInstantiateConfigProposal {
    pub title: String,
    pub description: String,
    pub access_config_updates: Vec<AccessConfigUpdate>,
}

/// Any wasm content a v1beta1 governance proposal may carry.
///
/// Encodes to the amino JSON envelope `{"type": "wasm/...", "value": {...}}`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
#[serde(tag = "type", content = "value")]
pub enum LegacyProposal {
    #[serde(rename = "wasm/StoreCodeProposal")]
    StoreCode(StoreCodeProposal),
    #[serde(rename = "wasm/InstantiateContractProposal")]
    InstantiateContract(InstantiateContractProposal),
    #[serde(rename = "wasm/InstantiateContract2Proposal")]
    InstantiateContract2(InstantiateContract2Proposal),
    #[serde(rename = "wasm/MigrateContractProposal")]
    MigrateContract(MigrateContractProposal),
    #[serde(rename = "wasm/SudoContractProposal")]
    SudoContract(SudoContractProposal),
    #[serde(rename = "wasm/ExecuteContractProposal")]
    ExecuteContract(ExecuteContractProposal),
    #[serde(rename = "wasm/UpdateAdminProposal")]
    UpdateAdmin(UpdateAdminProposal),
    #[serde(rename = "wasm/ClearAdminProposal")]
    ClearAdmin(ClearAdminProposal),
    #[serde(rename = "wasm/PinCodesProposal")]
    PinCodes(PinCodesProposal),
    #[serde(rename = "wasm/UnpinCodesProposal")]
    UnpinCodes(UnpinCodesProposal),
    #[serde(rename = "wasm/SetGaslessContractsProposal")]
    SetGaslessContracts(SetGaslessContractsProposal),
    #[serde(rename = "wasm/UnSetGaslessContractsProposal")]
    UnsetGaslessContracts(UnsetGaslessContractsProposal),
    #[serde(rename = "wasm/UpdateInstantiateConfigProposal")]
    UpdateInstantiateConfig(UpdateInstantiateConfigProposal),
    #[serde(rename = "wasm/StoreAndInstantiateContractProposal")]
    StoreAndInstantiateContract(StoreAndInstantiateContractProposal),
}

impl LegacyProposal {
    pub fn route(&self) -> &'static str {
        ROUTER_KEY
    }

    pub fn title(&self) -> &str {
        self.header().0
    }

    pub fn description(&self) -> &str {
        self.header().1
    }

    pub fn kind(&self) -> ProposalType {
        use LegacyProposal::*;

        match self {
            StoreCode(_) => ProposalType::StoreCode,
            InstantiateContract(_) => ProposalType::InstantiateContract,
            InstantiateContract2(_) => ProposalType::InstantiateContract2,
            MigrateContract(_) => ProposalType::MigrateContract,
            SudoContract(_) => ProposalType::SudoContract,
            ExecuteContract(_) => ProposalType::ExecuteContract,
            UpdateAdmin(_) => ProposalType::UpdateAdmin,
            ClearAdmin(_) => ProposalType::ClearAdmin,
            PinCodes(_) => ProposalType::PinCodes,
            UnpinCodes(_) => ProposalType::UnpinCodes,
            SetGaslessContracts(_) => ProposalType::SetGaslessContracts,
            UnsetGaslessContracts(_) => ProposalType::UnSetGaslessContracts,
            UpdateInstantiateConfig(_) => ProposalType::UpdateInstantiateConfig,
            StoreAndInstantiateContract(_) => ProposalType::StoreAndInstantiateContract,
        }
    }

    /// The identifier registered with the gov module, e.g. `StoreCodeV1Beta1`.
    pub fn proposal_type(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Multi-line operator view, identical to what historical nodes printed.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> Result<Vec<u8>, ProposalError> {
        serde_json::to_vec(self).map_err(|e| StdError::serialize_err("LegacyProposal", e).into())
    }

    pub fn from_json(data: &[u8]) -> Result<Self, ProposalError> {
        serde_json::from_slice(data)
            .map_err(|e| StdError::parse_err("LegacyProposal", e).into())
    }

    fn header(&self) -> (&str, &str) {
        use LegacyProposal::*;

        match self {
            StoreCode(p) => (&p.title, &p.description),
            InstantiateContract(p) => (&p.title, &p.description),
            InstantiateContract2(p) => (&p.title, &p.description),
            MigrateContract(p) => (&p.title, &p.description),
            SudoContract(p) => (&p.title, &p.description),
            ExecuteContract(p) => (&p.title, &p.description),
            UpdateAdmin(p) => (&p.title, &p.description),
            ClearAdmin(p) => (&p.title, &p.description),
            PinCodes(p) => (&p.title, &p.description),
            UnpinCodes(p) => (&p.title, &p.description),
            SetGaslessContracts(p) => (&p.title, &p.description),
            UnsetGaslessContracts(p) => (&p.title, &p.description),
            UpdateInstantiateConfig(p) => (&p.title, &p.description),
            StoreAndInstantiateContract(p) => (&p.title, &p.description),
        }
    }
}

macro_rules! impl_from_payload {
    ($($payload:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for LegacyProposal {
                fn from(p: $payload) -> Self {
                    LegacyProposal::$variant(p)
                }
            }
        )*
    };
}

impl_from_payload! {
    StoreCodeProposal => StoreCode,
    InstantiateContractProposal => InstantiateContract,
    InstantiateContract2Proposal => InstantiateContract2,
    MigrateContractProposal => MigrateContract,
    SudoContractProposal => SudoContract,
    ExecuteContractProposal => ExecuteContract,
    UpdateAdminProposal => UpdateAdmin,
    ClearAdminProposal => ClearAdmin,
    PinCodesProposal => PinCodes,
    UnpinCodesProposal => UnpinCodes,
    SetGaslessContractsProposal => SetGaslessContracts,
    UnsetGaslessContractsProposal => UnsetGaslessContracts,
    UpdateInstantiateConfigProposal => UpdateInstantiateConfig,
    StoreAndInstantiateContractProposal => StoreAndInstantiateContract,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::coins;

    fn migrate() -> LegacyProposal {
        MigrateContractProposal {
            title: "Upgrade amm".to_owned(),
            description: "Move the pool to code 9".to_owned(),
            contract: "cosmos1contract".to_owned(),
            code_id: 9u64.into(),
            msg: r#"{"migrate":{}}"#.into(),
        }
        .into()
    }

    #[test]
    fn accessors_are_stable() {
        let prop = migrate();
        assert_eq!(prop.route(), "wasm");
        assert_eq!(prop.route(), prop.route());
        assert_eq!(prop.title(), "Upgrade amm");
        assert_eq!(prop.title(), prop.title());
        assert_eq!(prop.description(), "Move the pool to code 9");
        assert_eq!(prop.description(), prop.description());
        assert_eq!(prop.kind(), ProposalType::MigrateContract);
        assert_eq!(prop.proposal_type(), "MigrateContractV1Beta1");
    }

    #[test]
    fn amino_json_envelope() {
        let json = String::from_utf8(migrate().to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"type":"wasm/MigrateContractProposal","value":{"#,
                r#""title":"Upgrade amm","description":"Move the pool to code 9","#,
                r#""contract":"cosmos1contract","code_id":"9","msg":{"migrate":{}}}}"#
            )
        );
        assert_eq!(LegacyProposal::from_json(json.as_bytes()).unwrap(), migrate());
    }

    #[test]
    fn decodes_history_with_missing_fields() {
        let json = br#"{"type":"wasm/ExecuteContractProposal","value":{"title":"t","description":"d","contract":"c","msg":{"ping":{}},"funds":[{"denom":"ustake","amount":"5"}]}}"#;
        let prop = LegacyProposal::from_json(json).unwrap();
        assert_eq!(
            prop,
            LegacyProposal::ExecuteContract(ExecuteContractProposal {
                title: "t".to_owned(),
                description: "d".to_owned(),
                run_as: String::new(),
                contract: "c".to_owned(),
                msg: r#"{"ping":{}}"#.into(),
                funds: coins(5, "ustake"),
            })
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = LegacyProposal::from_json(br#"{"type":"wasm/Nope","value":{}}"#).unwrap_err();
        assert!(matches!(err, ProposalError::Std(StdError::ParseErr { .. })));
    }
}
