//! Operator-facing text of each proposal.
//!
//! The layouts are copied from what nodes printed when these proposals were live,
//! typos and trailing whitespace included. Do not tidy them up.

use std::fmt::{self, Display, Formatter, Write};

use cosmwasm_std::{Coin, Uint64};
use unicode_general_category::{get_general_category, GeneralCategory};

use super::proposal::*;
use super::{AccessConfig, AccessConfigUpdate};

/// Upper-case hex, nothing for empty input.
fn hex_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// `{amount}{denom}` joined by commas, empty string for no coins.
fn coins(funds: &[Coin]) -> String {
    funds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Space separated list in brackets: `[1 2 3]`.
fn list<T: Display>(items: &[T]) -> String {
    let items: Vec<_> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(" "))
}

fn permission(access: &Option<AccessConfig>) -> String {
    match access {
        Some(access) => access.to_string(),
        None => "<nil>".to_owned(),
    }
}

/// Double quoted with escapes, byte for byte like the `%q` verb did.
///
/// Valid UTF-8 is kept except for quotes, backslashes and characters that are not
/// graphic (controls, format and private use characters, unassigned code points and
/// every separator but the ASCII space). Invalid bytes are written as `\xNN`.
pub(crate) fn quote(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    let mut rest = bytes;
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(text) => {
                escape_str(&mut out, text);
                break;
            }
            Err(err) => {
                let (valid, invalid) = rest.split_at(err.valid_up_to());
                if let Ok(text) = std::str::from_utf8(valid) {
                    escape_str(&mut out, text);
                }
                let bad = err.error_len().unwrap_or(invalid.len());
                for b in &invalid[..bad] {
                    let _ = write!(out, "\\x{:02x}", b);
                }
                rest = &invalid[bad..];
            }
        }
    }
    out.push('"');
    out
}

fn printable(c: char) -> bool {
    use GeneralCategory::*;

    c == ' '
        || !matches!(
            get_general_category(c),
            Control
                | Format
                | Surrogate
                | PrivateUse
                | Unassigned
                | LineSeparator
                | ParagraphSeparator
                | SpaceSeparator
        )
}

fn escape_str(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{b}' => out.push_str("\\v"),
            ' ' => out.push(' '),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if !printable(c) => {
                if (c as u32) < 0x10000 {
                    let _ = write!(out, "\\u{:04x}", c as u32);
                } else {
                    let _ = write!(out, "\\U{:08x}", c as u32);
                }
            }
            c => out.push(c),
        }
    }
}

impl Display for StoreCodeProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store Code Proposal:
  Title:       {}
  Description: {}
  Run as:      {}
  WasmCode:    {}
  Source:      {}
  Builder:     {}
  Code Hash:   {}
",
            self.title,
            self.description,
            self.run_as,
            hex_upper(&self.wasm_byte_code),
            self.source,
            self.builder,
            hex_upper(&self.code_hash),
        )
    }
}

impl Display for InstantiateContractProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Instantiate Code Proposal:
  Title:       {}
  Description: {}
  Run as:      {}
  Admin:       {}
  Code id:     {}
  Label:       {}
  Msg:         {}
  Funds:       {}
",
            self.title,
            self.description,
            self.run_as,
            self.admin,
            self.code_id,
            self.label,
            quote(self.msg.as_bytes()),
            coins(&self.funds),
        )
    }
}

impl Display for InstantiateContract2Proposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Instantiate Code Proposal:
  Title:       {}
  Description: {}
  Run as:      {}
  Admin:       {}
  Code id:     {}
  Label:       {}
  Msg:         {}
  Funds:       {}
  Salt:        {}
",
            self.title,
            self.description,
            self.run_as,
            self.admin,
            self.code_id,
            self.label,
            quote(self.msg.as_bytes()),
            coins(&self.funds),
            hex_upper(&self.salt),
        )
    }
}

impl Display for StoreAndInstantiateContractProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store And Instantiate Coontract Proposal:
  Title:       {}
  Description: {}
  Run as:      {}
  WasmCode:    {}
  Source:      {}
  Builder:     {}
  Code Hash:   {}
  Instantiate permission: {}
  Unpin code:  {}  
  Admin:       {}
  Label:       {}
  Msg:         {}
  Funds:       {}
",
            self.title,
            self.description,
            self.run_as,
            hex_upper(&self.wasm_byte_code),
            self.source,
            self.builder,
            hex_upper(&self.code_hash),
            permission(&self.instantiate_permission),
            self.unpin_code,
            self.admin,
            self.label,
            quote(self.msg.as_bytes()),
            coins(&self.funds),
        )
    }
}

impl Display for MigrateContractProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Migrate Contract Proposal:
  Title:       {}
  Description: {}
  Contract:    {}
  Code id:     {}
  Msg:         {}
",
            self.title,
            self.description,
            self.contract,
            self.code_id,
            quote(self.msg.as_bytes()),
        )
    }
}

// sudo and execute shipped with the migrate headline
impl Display for SudoContractProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Migrate Contract Proposal:
  Title:       {}
  Description: {}
  Contract:    {}
  Msg:         {}
",
            self.title,
            self.description,
            self.contract,
            quote(self.msg.as_bytes()),
        )
    }
}

impl Display for ExecuteContractProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Migrate Contract Proposal:
  Title:       {}
  Description: {}
  Contract:    {}
  Run as:      {}
  Msg:         {}
  Funds:       {}
",
            self.title,
            self.description,
            self.contract,
            self.run_as,
            quote(self.msg.as_bytes()),
            coins(&self.funds),
        )
    }
}

impl Display for UpdateAdminProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Update Contract Admin Proposal:
  Title:       {}
  Description: {}
  Contract:    {}
  New Admin:   {}
",
            self.title, self.description, self.contract, self.new_admin,
        )
    }
}

impl Display for ClearAdminProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Clear Contract Admin Proposal:
  Title:       {}
  Description: {}
  Contract:    {}
",
            self.title, self.description, self.contract,
        )
    }
}

fn codes_proposal(
    f: &mut Formatter<'_>,
    headline: &str,
    title: &str,
    description: &str,
    code_ids: &[Uint64],
) -> fmt::Result {
    write!(
        f,
        "{}:
  Title:       {}
  Description: {}
  Codes:       {}
",
        headline,
        title,
        description,
        list(code_ids),
    )
}

impl Display for PinCodesProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        codes_proposal(
            f,
            "Pin Wasm Codes Proposal",
            &self.title,
            &self.description,
            &self.code_ids,
        )
    }
}

impl Display for UnpinCodesProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        codes_proposal(
            f,
            "Unpin Wasm Codes Proposal",
            &self.title,
            &self.description,
            &self.code_ids,
        )
    }
}

impl Display for SetGaslessContractsProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Set Gasless Contracts Proposal:
  Title:       {}
  Description: {}
  Contracts:   {}
",
            self.title,
            self.description,
            list(&self.contracts),
        )
    }
}

impl Display for UnsetGaslessContractsProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unset Gasless Contracts Proposal:
  Title:       {}
  Description: {}
  Contracts:   {}
",
            self.title,
            self.description,
            list(&self.contracts),
        )
    }
}

impl Display for UpdateInstantiateConfigProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Update Instantiate Config Proposal:
  Title:       {}
  Description: {}
  AccessConfigUpdates: {}
",
            self.title,
            self.description,
            list::<AccessConfigUpdate>(&self.access_config_updates),
        )
    }
}

impl Display for LegacyProposal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use LegacyProposal::*;

        match self {
            StoreCode(p) => p.fmt(f),
            InstantiateContract(p) => p.fmt(f),
            InstantiateContract2(p) => p.fmt(f),
            MigrateContract(p) => p.fmt(f),
            SudoContract(p) => p.fmt(f),
            ExecuteContract(p) => p.fmt(f),
            UpdateAdmin(p) => p.fmt(f),
            ClearAdmin(p) => p.fmt(f),
            PinCodes(p) => p.fmt(f),
            UnpinCodes(p) => p.fmt(f),
            SetGaslessContracts(p) => p.fmt(f),
            UnsetGaslessContracts(p) => p.fmt(f),
            UpdateInstantiateConfig(p) => p.fmt(f),
            StoreAndInstantiateContract(p) => p.fmt(f),
        }
    }
}
