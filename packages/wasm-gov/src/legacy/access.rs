use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::Uint64;

/// Who may instantiate contracts from an uploaded code.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
#[serde(tag = "permission")]
pub enum AccessConfig {
    Unspecified,
    Nobody,
    /// Deprecated single-address form, still present in early chain history
    OnlyAddress { address: String },
    Everybody,
    AnyOfAddresses {
        addresses: Vec<String>,
        /// Instantiations by the listed addresses are exempt from gas
        #[serde(default, skip_serializing_if = "is_false")]
        gasless: bool,
    },
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl AccessConfig {
    pub fn any_of<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AccessConfig::AnyOfAddresses {
            addresses: addresses.into_iter().map(Into::into).collect(),
            gasless: false,
        }
    }

    pub fn permission(&self) -> &'static str {
        match self {
            AccessConfig::Unspecified => "Unspecified",
            AccessConfig::Nobody => "Nobody",
            AccessConfig::OnlyAddress { .. } => "OnlyAddress",
            AccessConfig::Everybody => "Everybody",
            AccessConfig::AnyOfAddresses { .. } => "AnyOfAddresses",
        }
    }

    pub fn allowed(&self, actor: &str) -> bool {
        match self {
            AccessConfig::Unspecified | AccessConfig::Nobody => false,
            AccessConfig::OnlyAddress { address } => address == actor,
            AccessConfig::Everybody => true,
            AccessConfig::AnyOfAddresses { addresses, .. } => addresses.iter().any(|a| a == actor),
        }
    }

    pub fn is_gasless_for(&self, actor: &str) -> bool {
        matches!(self, AccessConfig::AnyOfAddresses { gasless: true, .. } if self.allowed(actor))
    }
}

// proto compact text form, as the gov CLI prints it
impl fmt::Display for AccessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "permission:{}", self.permission())?;
        match self {
            AccessConfig::OnlyAddress { address } => write!(f, " address:{:?}", address),
            AccessConfig::AnyOfAddresses { addresses, gasless } => {
                for addr in addresses {
                    write!(f, " addresses:{:?}", addr)?;
                }
                if *gasless {
                    f.write_str(" gasless:true")?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// New instantiate permission for one stored code.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct AccessConfigUpdate {
    pub code_id: Uint64,
    pub instantiate_permission: AccessConfig,
}

impl fmt::Display for AccessConfigUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code_id:{} instantiate_permission:<{}>",
            self.code_id, self.instantiate_permission
        )
    }
}
