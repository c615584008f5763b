use cosmwasm_std::WasmMsg;

use crate::LegacyProposal;

impl LegacyProposal {
    /// The contract message the wasm keeper would dispatch for this proposal.
    ///
    /// Only prepares the request. Code uploads, pinning, gasless lists and access
    /// updates are keeper operations without a `WasmMsg` form and return `None`.
    ///
    /// The sender is implied by whoever dispatches the message, so `run_as` is not
    /// carried over. `WasmMsg::Instantiate2` has no `fix_msg` flag either: the
    /// address is always derived from the salt alone.
    pub fn to_wasm_msg(&self) -> Option<WasmMsg> {
        use LegacyProposal::*;

        let admin = |admin: &str| (!admin.is_empty()).then(|| admin.to_owned());

        match self {
            InstantiateContract(p) => Some(WasmMsg::Instantiate {
                admin: admin(&p.admin),
                code_id: p.code_id.u64(),
                msg: p.msg.to_binary(),
                funds: p.funds.clone(),
                label: p.label.clone(),
            }),
            InstantiateContract2(p) => Some(WasmMsg::Instantiate2 {
                admin: admin(&p.admin),
                code_id: p.code_id.u64(),
                label: p.label.clone(),
                msg: p.msg.to_binary(),
                funds: p.funds.clone(),
                salt: p.salt.clone(),
            }),
            MigrateContract(p) => Some(WasmMsg::Migrate {
                contract_addr: p.contract.clone(),
                new_code_id: p.code_id.u64(),
                msg: p.msg.to_binary(),
            }),
            ExecuteContract(p) => Some(WasmMsg::Execute {
                contract_addr: p.contract.clone(),
                msg: p.msg.to_binary(),
                funds: p.funds.clone(),
            }),
            UpdateAdmin(p) => Some(WasmMsg::UpdateAdmin {
                contract_addr: p.contract.clone(),
                admin: p.new_admin.clone(),
            }),
            ClearAdmin(p) => Some(WasmMsg::ClearAdmin {
                contract_addr: p.contract.clone(),
            }),
            StoreCode(_)
            | StoreAndInstantiateContract(_)
            | SudoContract(_)
            | PinCodes(_)
            | UnpinCodes(_)
            | SetGaslessContracts(_)
            | UnsetGaslessContracts(_)
            | UpdateInstantiateConfig(_) => None,
        }
    }
}
