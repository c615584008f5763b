use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ProposalError {
    #[error("{0}")]
    Std(#[from] StdError),

    /// Returned by every legacy `validate`. The text is part of historical replay output.
    #[error("empty")]
    Empty {},

    #[error("Unknown proposal type: {0}")]
    UnknownProposalType(String),

    #[error("Proposal type {0} already registered")]
    DuplicateProposalType(String),

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("{field} exceeds limit: {size} > {max}")]
    TooLarge {
        field: &'static str,
        size: usize,
        max: usize,
    },

    #[error("{field} has invalid length {size}, expected {expected}")]
    InvalidLength {
        field: &'static str,
        size: usize,
        expected: String,
    },

    #[error("{field} must not be zero")]
    ZeroCodeId { field: &'static str },

    #[error("Duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    #[error("{field} is not a valid JSON object: {msg}")]
    InvalidJson { field: &'static str, msg: String },

    #[error("Invalid coins: {msg}")]
    InvalidCoins { msg: String },

    #[error("Invalid access config: {msg}")]
    InvalidAccessConfig { msg: String },

    #[error("{field} is not valid base64: {msg}")]
    InvalidBase64 { field: &'static str, msg: String },

    #[error("{field} is not valid hex: {msg}")]
    InvalidHex { field: &'static str, msg: String },

    #[error("Cannot decode display form: {msg}")]
    InvalidDisplay { msg: String },
}
