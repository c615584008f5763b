use std::collections::BTreeSet;

use cosmwasm_std::{Coin, Uint64};

use super::proposal::*;
use super::{AccessConfig, RawContractMessage};
use crate::ProposalError;

/// Largest label accepted for a contract instance.
pub const MAX_LABEL_SIZE: usize = 128;
/// Largest uncompressed wasm upload.
pub const MAX_WASM_SIZE: usize = 800 * 1024;
/// Longest salt accepted for predictable addresses.
pub const MAX_SALT_SIZE: usize = 64;

const CODE_HASH_SIZE: usize = 32;

impl LegacyProposal {
    /// Basic validation as performed by the gov module on submission.
    ///
    /// v1beta1 wasm content is no longer accepted for new proposals, so this always
    /// fails with [`ProposalError::Empty`]. Chain replay depends on this exact result.
    pub fn validate(&self) -> Result<(), ProposalError> {
        Err(ProposalError::Empty {})
    }

    /// Structural checks of the payload, for tooling that audits historical
    /// proposals. Never used on the submission path.
    pub fn check_payload(&self) -> Result<(), ProposalError> {
        use LegacyProposal::*;

        not_empty("title", self.title())?;
        not_empty("description", self.description())?;

        match self {
            StoreCode(p) => {
                not_empty("run_as", &p.run_as)?;
                check_wasm(&p.wasm_byte_code)?;
                check_code_hash(&p.code_hash)?;
                check_permission(&p.instantiate_permission)
            }
            InstantiateContract(p) => {
                not_empty("run_as", &p.run_as)?;
                check_code_id("code_id", p.code_id)?;
                check_label(&p.label)?;
                check_msg(&p.msg)?;
                check_funds(&p.funds)
            }
            InstantiateContract2(p) => {
                not_empty("run_as", &p.run_as)?;
                check_code_id("code_id", p.code_id)?;
                check_label(&p.label)?;
                check_msg(&p.msg)?;
                check_funds(&p.funds)?;
                check_salt(&p.salt)
            }
            StoreAndInstantiateContract(p) => {
                not_empty("run_as", &p.run_as)?;
                check_wasm(&p.wasm_byte_code)?;
                check_code_hash(&p.code_hash)?;
                check_permission(&p.instantiate_permission)?;
                check_label(&p.label)?;
                check_msg(&p.msg)?;
                check_funds(&p.funds)
            }
            MigrateContract(p) => {
                not_empty("contract", &p.contract)?;
                check_code_id("code_id", p.code_id)?;
                check_msg(&p.msg)
            }
            SudoContract(p) => {
                not_empty("contract", &p.contract)?;
                check_msg(&p.msg)
            }
            ExecuteContract(p) => {
                not_empty("run_as", &p.run_as)?;
                not_empty("contract", &p.contract)?;
                check_msg(&p.msg)?;
                check_funds(&p.funds)
            }
            UpdateAdmin(p) => {
                not_empty("contract", &p.contract)?;
                not_empty("new_admin", &p.new_admin)
            }
            ClearAdmin(p) => not_empty("contract", &p.contract),
            PinCodes(p) => check_code_ids(&p.code_ids),
            UnpinCodes(p) => check_code_ids(&p.code_ids),
            SetGaslessContracts(p) => check_addresses("contracts", &p.contracts),
            UnsetGaslessContracts(p) => check_addresses("contracts", &p.contracts),
            UpdateInstantiateConfig(p) => {
                if p.access_config_updates.is_empty() {
                    return Err(ProposalError::EmptyField {
                        field: "access_config_updates",
                    });
                }
                let mut seen = BTreeSet::new();
                for update in &p.access_config_updates {
                    check_code_id("code_id", update.code_id)?;
                    if !seen.insert(update.code_id) {
                        return Err(ProposalError::Duplicate {
                            field: "code_id",
                            value: update.code_id.to_string(),
                        });
                    }
                    check_access(&update.instantiate_permission)?;
                }
                Ok(())
            }
        }
    }
}

fn not_empty(field: &'static str, value: &str) -> Result<(), ProposalError> {
    if value.trim().is_empty() {
        return Err(ProposalError::EmptyField { field });
    }
    Ok(())
}

fn check_wasm(code: &[u8]) -> Result<(), ProposalError> {
    if code.is_empty() {
        return Err(ProposalError::EmptyField {
            field: "wasm_byte_code",
        });
    }
    if code.len() > MAX_WASM_SIZE {
        return Err(ProposalError::TooLarge {
            field: "wasm_byte_code",
            size: code.len(),
            max: MAX_WASM_SIZE,
        });
    }
    Ok(())
}

// optional, but must be a full sha256 when present
fn check_code_hash(hash: &[u8]) -> Result<(), ProposalError> {
    if !hash.is_empty() && hash.len() != CODE_HASH_SIZE {
        return Err(ProposalError::InvalidLength {
            field: "code_hash",
            size: hash.len(),
            expected: CODE_HASH_SIZE.to_string(),
        });
    }
    Ok(())
}

fn check_code_id(field: &'static str, code_id: Uint64) -> Result<(), ProposalError> {
    if code_id.is_zero() {
        return Err(ProposalError::ZeroCodeId { field });
    }
    Ok(())
}

fn check_code_ids(code_ids: &[Uint64]) -> Result<(), ProposalError> {
    if code_ids.is_empty() {
        return Err(ProposalError::EmptyField { field: "code_ids" });
    }
    let mut seen = BTreeSet::new();
    for id in code_ids {
        check_code_id("code_ids", *id)?;
        if !seen.insert(*id) {
            return Err(ProposalError::Duplicate {
                field: "code_ids",
                value: id.to_string(),
            });
        }
    }
    Ok(())
}

fn check_label(label: &str) -> Result<(), ProposalError> {
    not_empty("label", label)?;
    if label.len() > MAX_LABEL_SIZE {
        return Err(ProposalError::TooLarge {
            field: "label",
            size: label.len(),
            max: MAX_LABEL_SIZE,
        });
    }
    Ok(())
}

fn check_msg(msg: &RawContractMessage) -> Result<(), ProposalError> {
    msg.validate()
}

fn check_salt(salt: &[u8]) -> Result<(), ProposalError> {
    if salt.is_empty() || salt.len() > MAX_SALT_SIZE {
        return Err(ProposalError::InvalidLength {
            field: "salt",
            size: salt.len(),
            expected: format!("1..={}", MAX_SALT_SIZE),
        });
    }
    Ok(())
}

fn check_funds(funds: &[Coin]) -> Result<(), ProposalError> {
    let mut denoms = BTreeSet::new();
    for coin in funds {
        if coin.denom.is_empty() {
            return Err(ProposalError::InvalidCoins {
                msg: "empty denom".to_owned(),
            });
        }
        if coin.amount.is_zero() {
            return Err(ProposalError::InvalidCoins {
                msg: format!("zero amount of {}", coin.denom),
            });
        }
        if !denoms.insert(coin.denom.as_str()) {
            return Err(ProposalError::InvalidCoins {
                msg: format!("duplicate denom {}", coin.denom),
            });
        }
    }
    Ok(())
}

fn check_addresses(field: &'static str, addresses: &[String]) -> Result<(), ProposalError> {
    if addresses.is_empty() {
        return Err(ProposalError::EmptyField { field });
    }
    let mut seen = BTreeSet::new();
    for addr in addresses {
        not_empty(field, addr)?;
        if !seen.insert(addr.as_str()) {
            return Err(ProposalError::Duplicate {
                field,
                value: addr.clone(),
            });
        }
    }
    Ok(())
}

fn check_permission(access: &Option<AccessConfig>) -> Result<(), ProposalError> {
    match access {
        Some(access) => check_access(access),
        None => Ok(()),
    }
}

fn check_access(access: &AccessConfig) -> Result<(), ProposalError> {
    match access {
        AccessConfig::Unspecified => Err(ProposalError::InvalidAccessConfig {
            msg: "unspecified permission".to_owned(),
        }),
        AccessConfig::OnlyAddress { address } => {
            not_empty("address", address).map_err(|_| ProposalError::InvalidAccessConfig {
                msg: "empty address".to_owned(),
            })
        }
        AccessConfig::AnyOfAddresses { addresses, .. } => check_addresses("addresses", addresses)
            .map_err(|e| ProposalError::InvalidAccessConfig { msg: e.to_string() }),
        AccessConfig::Nobody | AccessConfig::Everybody => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::{coin, Binary};

    fn instantiate() -> InstantiateContractProposal {
        InstantiateContractProposal {
            title: "Instantiate".to_owned(),
            description: "cw20".to_owned(),
            run_as: "cosmos1runner".to_owned(),
            admin: String::new(),
            code_id: 1u64.into(),
            label: "token".to_owned(),
            msg: r#"{"name":"token"}"#.into(),
            funds: vec![coin(10, "ustake")],
        }
    }

    #[test]
    fn validate_always_fails_with_empty() {
        let prop = LegacyProposal::from(instantiate());
        prop.check_payload().unwrap();

        let err = prop.validate().unwrap_err();
        assert_eq!(err, ProposalError::Empty {});
        assert_eq!(err.to_string(), "empty");

        let blank = LegacyProposal::ClearAdmin(ClearAdminProposal::default());
        assert_eq!(blank.validate().unwrap_err(), ProposalError::Empty {});
    }

    #[test]
    fn payload_header_is_required() {
        let mut prop = instantiate();
        prop.title = "  ".to_owned();
        assert_eq!(
            LegacyProposal::from(prop).check_payload().unwrap_err(),
            ProposalError::EmptyField { field: "title" }
        );
    }

    #[test]
    fn instantiate_checks() {
        let mut prop = instantiate();
        prop.code_id = Uint64::zero();
        assert_eq!(
            LegacyProposal::from(prop).check_payload().unwrap_err(),
            ProposalError::ZeroCodeId { field: "code_id" }
        );

        let mut prop = instantiate();
        prop.label = "x".repeat(MAX_LABEL_SIZE + 1);
        assert!(matches!(
            LegacyProposal::from(prop).check_payload().unwrap_err(),
            ProposalError::TooLarge { field: "label", .. }
        ));

        let mut prop = instantiate();
        prop.funds = vec![coin(1, "ustake"), coin(2, "ustake")];
        assert!(matches!(
            LegacyProposal::from(prop).check_payload().unwrap_err(),
            ProposalError::InvalidCoins { .. }
        ));

        let mut prop = instantiate();
        prop.msg = "not json".into();
        assert!(matches!(
            LegacyProposal::from(prop).check_payload().unwrap_err(),
            ProposalError::InvalidJson { .. }
        ));
    }

    #[test]
    fn store_code_checks() {
        let mut prop = StoreCodeProposal {
            title: "Upload".to_owned(),
            description: "code".to_owned(),
            run_as: "cosmos1creator".to_owned(),
            wasm_byte_code: Binary(vec![0, 97, 115, 109]),
            instantiate_permission: Some(AccessConfig::any_of(Vec::<String>::new())),
            ..StoreCodeProposal::default()
        };
        assert!(matches!(
            LegacyProposal::from(prop.clone()).check_payload().unwrap_err(),
            ProposalError::InvalidAccessConfig { .. }
        ));

        prop.instantiate_permission = Some(AccessConfig::Nobody);
        prop.code_hash = Binary(vec![1; 31]);
        assert!(matches!(
            LegacyProposal::from(prop.clone()).check_payload().unwrap_err(),
            ProposalError::InvalidLength { field: "code_hash", .. }
        ));

        prop.code_hash = Binary(vec![1; 32]);
        LegacyProposal::from(prop).check_payload().unwrap();
    }

    #[test]
    fn code_id_lists() {
        let prop = PinCodesProposal {
            title: "Pin".to_owned(),
            description: "pin".to_owned(),
            code_ids: vec![1u64.into(), 1u64.into()],
        };
        assert_eq!(
            LegacyProposal::from(prop).check_payload().unwrap_err(),
            ProposalError::Duplicate {
                field: "code_ids",
                value: "1".to_owned()
            }
        );

        let prop = UnpinCodesProposal {
            title: "Unpin".to_owned(),
            description: "unpin".to_owned(),
            code_ids: vec![],
        };
        assert_eq!(
            LegacyProposal::from(prop).check_payload().unwrap_err(),
            ProposalError::EmptyField { field: "code_ids" }
        );
    }

    #[test]
    fn gasless_contracts() {
        let prop = SetGaslessContractsProposal {
            title: "Gasless".to_owned(),
            description: "oracle feeders".to_owned(),
            contracts: vec!["cosmos1oracle".to_owned()],
        };
        LegacyProposal::from(prop).check_payload().unwrap();

        let prop = UnsetGaslessContractsProposal {
            title: "Gasless".to_owned(),
            description: "oracle feeders".to_owned(),
            contracts: vec![],
        };
        assert_eq!(
            LegacyProposal::from(prop).check_payload().unwrap_err(),
            ProposalError::EmptyField { field: "contracts" }
        );
    }
}
