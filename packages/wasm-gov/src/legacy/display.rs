//! Structured projection of proposals for export and audit tooling.
//!
//! Byte code and salts are base64, code hashes lower-case hex and contract
//! messages plain strings, so the output can be read and diffed as text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Binary, Coin, Uint64};

use super::proposal::*;
use super::{AccessConfig, ProposalType, RawContractMessage};
use crate::ProposalError;

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct StoreCodeDisplay {
    pub title: String,
    pub description: String,
    pub run_as: String,
    pub wasm_byte_code: String,
    pub instantiate_permission: Option<AccessConfig>,
    pub source: String,
    pub builder: String,
    pub code_hash: String,
    #[serde(default)]
    pub unpin_code: bool,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct InstantiateContractDisplay {
    pub title: String,
    pub description: String,
    pub run_as: String,
    pub admin: String,
    pub code_id: u64,
    pub label: String,
    pub msg: String,
    pub funds: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct InstantiateContract2Display {
    pub title: String,
    pub description: String,
    pub run_as: String,
    pub admin: String,
    pub code_id: u64,
    pub label: String,
    pub msg: String,
    pub funds: Vec<Coin>,
    pub salt: String,
    #[serde(default)]
    pub fix_msg: bool,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct StoreAndInstantiateContractDisplay {
    pub title: String,
    pub description: String,
    pub run_as: String,
    pub wasm_byte_code: String,
    pub source: String,
    pub builder: String,
    pub code_hash: String,
    pub instantiate_permission: Option<AccessConfig>,
    pub unpin_code: bool,
    pub admin: String,
    pub label: String,
    pub msg: String,
    pub funds: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct MigrateContractDisplay {
    pub title: String,
    pub description: String,
    pub contract: String,
    pub code_id: u64,
    pub msg: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct SudoContractDisplay {
    pub title: String,
    pub description: String,
    pub contract: String,
    pub msg: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct ExecuteContractDisplay {
    pub title: String,
    pub description: String,
    pub contract: String,
    pub msg: String,
    pub run_as: String,
    pub funds: Vec<Coin>,
}

/// Display projection of a [`LegacyProposal`].
///
/// Kinds without binary or message fields are shown as their payload.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ProposalDisplay {
    StoreCode(StoreCodeDisplay),
    InstantiateContract(InstantiateContractDisplay),
    InstantiateContract2(InstantiateContract2Display),
    MigrateContract(MigrateContractDisplay),
    SudoContract(SudoContractDisplay),
    ExecuteContract(ExecuteContractDisplay),
    UpdateAdmin(UpdateAdminProposal),
    ClearAdmin(ClearAdminProposal),
    PinCodes(PinCodesProposal),
    UnpinCodes(UnpinCodesProposal),
    SetGaslessContracts(SetGaslessContractsProposal),
    UnsetGaslessContracts(UnsetGaslessContractsProposal),
    UpdateInstantiateConfig(UpdateInstantiateConfigProposal),
    StoreAndInstantiateContract(StoreAndInstantiateContractDisplay),
}

/// Contract messages are JSON text. Bytes that are not UTF-8 cannot be shown and
/// come out as U+FFFD, so such a message does not survive the display form.
fn msg_text(msg: &RawContractMessage) -> String {
    String::from_utf8_lossy(msg.as_bytes()).into_owned()
}

/// An empty message is kept empty, anything else must be JSON.
fn decode_msg(msg: String) -> Result<RawContractMessage, ProposalError> {
    if !msg.is_empty() {
        serde_json::from_str::<serde::de::IgnoredAny>(&msg).map_err(|e| {
            ProposalError::InvalidJson {
                field: "msg",
                msg: e.to_string(),
            }
        })?;
    }
    Ok(msg.into())
}

fn decode_base64(field: &'static str, text: &str) -> Result<Binary, ProposalError> {
    STANDARD
        .decode(text)
        .map(Binary)
        .map_err(|e| ProposalError::InvalidBase64 {
            field,
            msg: e.to_string(),
        })
}

fn decode_hex(field: &'static str, text: &str) -> Result<Binary, ProposalError> {
    hex::decode(text)
        .map(Binary)
        .map_err(|e| ProposalError::InvalidHex {
            field,
            msg: e.to_string(),
        })
}

impl LegacyProposal {
    pub fn to_display(&self) -> ProposalDisplay {
        use LegacyProposal::*;

        match self {
            StoreCode(p) => ProposalDisplay::StoreCode(StoreCodeDisplay {
                title: p.title.clone(),
                description: p.description.clone(),
                run_as: p.run_as.clone(),
                wasm_byte_code: STANDARD.encode(p.wasm_byte_code.as_slice()),
                instantiate_permission: p.instantiate_permission.clone(),
                source: p.source.clone(),
                builder: p.builder.clone(),
                code_hash: hex::encode(p.code_hash.as_slice()),
                unpin_code: p.unpin_code,
            }),
            InstantiateContract(p) => {
                ProposalDisplay::InstantiateContract(InstantiateContractDisplay {
                    title: p.title.clone(),
                    description: p.description.clone(),
                    run_as: p.run_as.clone(),
                    admin: p.admin.clone(),
                    code_id: p.code_id.u64(),
                    label: p.label.clone(),
                    msg: msg_text(&p.msg),
                    funds: p.funds.clone(),
                })
            }
            InstantiateContract2(p) => {
                ProposalDisplay::InstantiateContract2(InstantiateContract2Display {
                    title: p.title.clone(),
                    description: p.description.clone(),
                    run_as: p.run_as.clone(),
                    admin: p.admin.clone(),
                    code_id: p.code_id.u64(),
                    label: p.label.clone(),
                    msg: msg_text(&p.msg),
                    funds: p.funds.clone(),
                    salt: STANDARD.encode(p.salt.as_slice()),
                    fix_msg: p.fix_msg,
                })
            }
            MigrateContract(p) => ProposalDisplay::MigrateContract(MigrateContractDisplay {
                title: p.title.clone(),
                description: p.description.clone(),
                contract: p.contract.clone(),
                code_id: p.code_id.u64(),
                msg: msg_text(&p.msg),
            }),
            SudoContract(p) => ProposalDisplay::SudoContract(SudoContractDisplay {
                title: p.title.clone(),
                description: p.description.clone(),
                contract: p.contract.clone(),
                msg: msg_text(&p.msg),
            }),
            ExecuteContract(p) => ProposalDisplay::ExecuteContract(ExecuteContractDisplay {
                title: p.title.clone(),
                description: p.description.clone(),
                contract: p.contract.clone(),
                msg: msg_text(&p.msg),
                run_as: p.run_as.clone(),
                funds: p.funds.clone(),
            }),
            UpdateAdmin(p) => ProposalDisplay::UpdateAdmin(p.clone()),
            ClearAdmin(p) => ProposalDisplay::ClearAdmin(p.clone()),
            PinCodes(p) => ProposalDisplay::PinCodes(p.clone()),
            UnpinCodes(p) => ProposalDisplay::UnpinCodes(p.clone()),
            SetGaslessContracts(p) => ProposalDisplay::SetGaslessContracts(p.clone()),
            UnsetGaslessContracts(p) => ProposalDisplay::UnsetGaslessContracts(p.clone()),
            UpdateInstantiateConfig(p) => ProposalDisplay::UpdateInstantiateConfig(p.clone()),
            StoreAndInstantiateContract(p) => ProposalDisplay::StoreAndInstantiateContract(
                StoreAndInstantiateContractDisplay {
                    title: p.title.clone(),
                    description: p.description.clone(),
                    run_as: p.run_as.clone(),
                    wasm_byte_code: STANDARD.encode(p.wasm_byte_code.as_slice()),
                    source: p.source.clone(),
                    builder: p.builder.clone(),
                    code_hash: hex::encode(p.code_hash.as_slice()),
                    instantiate_permission: p.instantiate_permission.clone(),
                    unpin_code: p.unpin_code,
                    admin: p.admin.clone(),
                    label: p.label.clone(),
                    msg: msg_text(&p.msg),
                    funds: p.funds.clone(),
                },
            ),
        }
    }
}

impl ProposalDisplay {
    pub fn kind(&self) -> ProposalType {
        use ProposalDisplay::*;

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

    pub fn to_yaml(&self) -> Result<String, ProposalError> {
        use ProposalDisplay::*;

        let yaml = match self {
            StoreCode(d) => serde_yaml::to_string(d),
            InstantiateContract(d) => serde_yaml::to_string(d),
            InstantiateContract2(d) => serde_yaml::to_string(d),
            MigrateContract(d) => serde_yaml::to_string(d),
            SudoContract(d) => serde_yaml::to_string(d),
            ExecuteContract(d) => serde_yaml::to_string(d),
            UpdateAdmin(d) => serde_yaml::to_string(d),
            ClearAdmin(d) => serde_yaml::to_string(d),
            PinCodes(d) => serde_yaml::to_string(d),
            UnpinCodes(d) => serde_yaml::to_string(d),
            SetGaslessContracts(d) => serde_yaml::to_string(d),
            UnsetGaslessContracts(d) => serde_yaml::to_string(d),
            UpdateInstantiateConfig(d) => serde_yaml::to_string(d),
            StoreAndInstantiateContract(d) => serde_yaml::to_string(d),
        };
        yaml.map_err(|e| ProposalError::InvalidDisplay { msg: e.to_string() })
    }

    /// Parses YAML produced by [`ProposalDisplay::to_yaml`]. The kind is not part of
    /// the document and must be supplied by the caller.
    pub fn from_yaml(kind: ProposalType, yaml: &str) -> Result<Self, ProposalError> {
        fn parse<T: serde::de::DeserializeOwned>(yaml: &str) -> Result<T, ProposalError> {
            serde_yaml::from_str(yaml).map_err(|e| ProposalError::InvalidDisplay {
                msg: e.to_string(),
            })
        }

        let display = match kind {
            ProposalType::StoreCode => ProposalDisplay::StoreCode(parse(yaml)?),
            ProposalType::InstantiateContract => ProposalDisplay::InstantiateContract(parse(yaml)?),
            ProposalType::InstantiateContract2 => {
                ProposalDisplay::InstantiateContract2(parse(yaml)?)
            }
            ProposalType::MigrateContract => ProposalDisplay::MigrateContract(parse(yaml)?),
            ProposalType::SudoContract => ProposalDisplay::SudoContract(parse(yaml)?),
            ProposalType::ExecuteContract => ProposalDisplay::ExecuteContract(parse(yaml)?),
            ProposalType::UpdateAdmin => ProposalDisplay::UpdateAdmin(parse(yaml)?),
            ProposalType::ClearAdmin => ProposalDisplay::ClearAdmin(parse(yaml)?),
            ProposalType::PinCodes => ProposalDisplay::PinCodes(parse(yaml)?),
            ProposalType::UnpinCodes => ProposalDisplay::UnpinCodes(parse(yaml)?),
            ProposalType::SetGaslessContracts => ProposalDisplay::SetGaslessContracts(parse(yaml)?),
            ProposalType::UnSetGaslessContracts => {
                ProposalDisplay::UnsetGaslessContracts(parse(yaml)?)
            }
            ProposalType::UpdateInstantiateConfig => {
                ProposalDisplay::UpdateInstantiateConfig(parse(yaml)?)
            }
            ProposalType::StoreAndInstantiateContract => {
                ProposalDisplay::StoreAndInstantiateContract(parse(yaml)?)
            }
        };
        Ok(display)
    }
}

impl TryFrom<ProposalDisplay> for LegacyProposal {
    type Error = ProposalError;

    fn try_from(display: ProposalDisplay) -> Result<Self, Self::Error> {
        let prop = match display {
            ProposalDisplay::StoreCode(d) => LegacyProposal::StoreCode(StoreCodeProposal {
                title: d.title,
                description: d.description,
                run_as: d.run_as,
                wasm_byte_code: decode_base64("wasm_byte_code", &d.wasm_byte_code)?,
                instantiate_permission: d.instantiate_permission,
                unpin_code: d.unpin_code,
                source: d.source,
                builder: d.builder,
                code_hash: decode_hex("code_hash", &d.code_hash)?,
            }),
            ProposalDisplay::InstantiateContract(d) => {
                LegacyProposal::InstantiateContract(InstantiateContractProposal {
                    title: d.title,
                    description: d.description,
                    run_as: d.run_as,
                    admin: d.admin,
                    code_id: Uint64::new(d.code_id),
                    label: d.label,
                    msg: decode_msg(d.msg)?,
                    funds: d.funds,
                })
            }
            ProposalDisplay::InstantiateContract2(d) => {
                LegacyProposal::InstantiateContract2(InstantiateContract2Proposal {
                    title: d.title,
                    description: d.description,
                    run_as: d.run_as,
                    admin: d.admin,
                    code_id: Uint64::new(d.code_id),
                    label: d.label,
                    msg: decode_msg(d.msg)?,
                    funds: d.funds,
                    salt: decode_base64("salt", &d.salt)?,
                    fix_msg: d.fix_msg,
                })
            }
            ProposalDisplay::MigrateContract(d) => {
                LegacyProposal::MigrateContract(MigrateContractProposal {
                    title: d.title,
                    description: d.description,
                    contract: d.contract,
                    code_id: Uint64::new(d.code_id),
                    msg: decode_msg(d.msg)?,
                })
            }
            ProposalDisplay::SudoContract(d) => LegacyProposal::SudoContract(SudoContractProposal {
                title: d.title,
                description: d.description,
                contract: d.contract,
                msg: decode_msg(d.msg)?,
            }),
            ProposalDisplay::ExecuteContract(d) => {
                LegacyProposal::ExecuteContract(ExecuteContractProposal {
                    title: d.title,
                    description: d.description,
                    run_as: d.run_as,
                    contract: d.contract,
                    msg: decode_msg(d.msg)?,
                    funds: d.funds,
                })
            }
            ProposalDisplay::UpdateAdmin(p) => LegacyProposal::UpdateAdmin(p),
            ProposalDisplay::ClearAdmin(p) => LegacyProposal::ClearAdmin(p),
            ProposalDisplay::PinCodes(p) => LegacyProposal::PinCodes(p),
            ProposalDisplay::UnpinCodes(p) => LegacyProposal::UnpinCodes(p),
            ProposalDisplay::SetGaslessContracts(p) => LegacyProposal::SetGaslessContracts(p),
            ProposalDisplay::UnsetGaslessContracts(p) => LegacyProposal::UnsetGaslessContracts(p),
            ProposalDisplay::UpdateInstantiateConfig(p) => {
                LegacyProposal::UpdateInstantiateConfig(p)
            }
            ProposalDisplay::StoreAndInstantiateContract(d) => {
                LegacyProposal::StoreAndInstantiateContract(StoreAndInstantiateContractProposal {
                    title: d.title,
                    description: d.description,
                    run_as: d.run_as,
                    wasm_byte_code: decode_base64("wasm_byte_code", &d.wasm_byte_code)?,
                    instantiate_permission: d.instantiate_permission,
                    unpin_code: d.unpin_code,
                    admin: d.admin,
                    label: d.label,
                    msg: decode_msg(d.msg)?,
                    funds: d.funds,
                    source: d.source,
                    builder: d.builder,
                    code_hash: decode_hex("code_hash", &d.code_hash)?,
                })
            }
        };
        Ok(prop)
    }
}
