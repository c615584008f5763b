use tracing::debug;

use super::ProposalType;
use crate::ProposalError;

/// Proposal type identifiers known to the gov module, in registration order.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct ProposalTypeRegistry {
    types: Vec<String>,
}

impl ProposalTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new identifier. Registering the same one twice is an error the
    /// host should treat as fatal at startup.
    pub fn register(&mut self, proposal_type: impl Into<String>) -> Result<(), ProposalError> {
        let proposal_type = proposal_type.into();
        if self.is_registered(&proposal_type) {
            return Err(ProposalError::DuplicateProposalType(proposal_type));
        }
        debug!(proposal_type = %proposal_type, "registered proposal type");
        self.types.push(proposal_type);
        Ok(())
    }

    pub fn is_registered(&self, proposal_type: &str) -> bool {
        self.types.iter().any(|t| t == proposal_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Registers all legacy wasm proposal types. Call once during app setup.
///
/// Calling it again is a no-op, so the legacy set can never trip the duplicate
/// check by itself.
pub fn register_legacy_proposal_types(
    registry: &mut ProposalTypeRegistry,
) -> Result<(), ProposalError> {
    for kind in ProposalType::ALL {
        if !registry.is_registered(kind.as_str()) {
            registry.register(kind.as_str())?;
        }
    }
    Ok(())
}
