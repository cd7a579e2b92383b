//! Pool Engine
//!
//! Entry point for every group addressed to the pool application.
//!
//! # Pipeline
//!
//! 1. Completion gate (opt-in, close-out, update, delete)
//! 2. Decode arguments into an [`ActionKind`]
//! 3. Re-initialization guard for `boot`
//! 4. Governance for admin actions
//! 5. Group validation into an [`Action`]
//! 6. Reserve snapshot and phase gate
//! 7. Pricing
//! 8. Staging and a single commit
//!
//! Any failure aborts the invocation with the state untouched.

use lib_pricing::{burn_tokens, first_liquidity, mint_tokens, swap_tokens};
use lib_types::{Address, AppId, AssetId};
use tracing::{debug, info, warn};

use crate::action::{
    Action, ActionKind, BurnPayload, CallArgs, FundPayload, MintPayload, SetGovernorPayload,
    SwapPayload,
};
use crate::config::PoolConfig;
use crate::errors::{PoolError, PoolResult};
use crate::governance::{GovernanceGate, PoolPhase};
use crate::ledger::{Ledger, Reserves};
use crate::settlement::{Settlement, StateWrite};
use crate::state::PoolState;
use crate::types::{AppCall, Group, OnCompletion, Receipt};
use crate::validate::GroupValidator;

#[derive(Debug, Clone)]
pub struct PoolEngine {
    config: PoolConfig,
    app_id: AppId,
    app_address: Address,
    creator: Address,
    state: PoolState,
}

impl PoolEngine {
    /// Deploy a pool application with an empty state record
    pub fn deploy(config: PoolConfig, app_id: AppId, creator: Address) -> PoolResult<Self> {
        config.validate()?;
        let app_address = Address::for_application(app_id);
        info!(
            "Pool application {} deployed for assets {}/{}",
            app_id, config.asset_a, config.asset_b
        );
        Ok(Self {
            config,
            app_id,
            app_address,
            creator,
            state: PoolState::new(),
        })
    }

    /// Resume a deployed application from persisted state
    pub fn from_state(
        config: PoolConfig,
        app_id: AppId,
        creator: Address,
        state: PoolState,
    ) -> PoolResult<Self> {
        let mut engine = Self::deploy(config, app_id, creator)?;
        engine.state = state;
        Ok(engine)
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn app_id(&self) -> AppId {
        self.app_id
    }

    pub fn app_address(&self) -> Address {
        self.app_address
    }

    pub fn creator(&self) -> Address {
        self.creator
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn governor(&self) -> Address {
        self.gate().governor()
    }

    pub fn pool_asset(&self) -> Option<AssetId> {
        self.state.pool_asset()
    }

    /// Current lifecycle phase as seen through `ledger`
    pub fn phase(&self, ledger: &dyn Ledger) -> PoolResult<PoolPhase> {
        if self.state.is_destroyed() {
            return Err(PoolError::ApplicationDeleted);
        }
        match self.state.pool_asset() {
            None => Ok(PoolPhase::Uninitialized),
            Some(pool) => {
                let reserves = Reserves::observe(ledger, &self.app_address, &self.config, pool)?;
                Ok(PoolPhase::derive(&self.state, reserves.a, reserves.b))
            }
        }
    }

    /// Roll back to a snapshot taken before a failed group
    pub(crate) fn restore_state(&mut self, state: PoolState) {
        self.state = state;
    }

    /// Evaluate one group against `ledger`
    ///
    /// Reserves are read once, before any instruction is issued. Inbound
    /// transfers of the group are settled by the caller.
    pub fn execute(&mut self, ledger: &mut dyn Ledger, group: &Group) -> PoolResult<Receipt> {
        let result = self.dispatch(ledger, group);
        if let Err(e) = &result {
            warn!("Pool application {} rejected group: {}", self.app_id, e);
        }
        result
    }

    fn gate(&self) -> GovernanceGate<'_> {
        GovernanceGate::new(&self.state, self.creator)
    }

    fn dispatch(&mut self, ledger: &mut dyn Ledger, group: &Group) -> PoolResult<Receipt> {
        if self.state.is_destroyed() {
            return Err(PoolError::ApplicationDeleted);
        }

        let call = group.app_call()?;
        if call.app_id != self.app_id {
            return Err(PoolError::WrongApplication {
                expected: self.app_id,
                actual: call.app_id,
            });
        }

        if call.on_completion != OnCompletion::NoOp {
            return self.complete(ledger, group, call);
        }

        let args = CallArgs::decode(&call.args)?;
        let gate = self.gate();
        if args.kind == ActionKind::Boot {
            gate.ensure_uninitialized()?;
        }
        if args.kind.is_admin() {
            gate.authorize(&call.sender)?;
        }

        let action = GroupValidator::new(&self.config, self.app_address, self.state.pool_asset())
            .validate(group, &args)?;
        debug!("Validated {} from {:?}", args.kind, call.sender);

        let sender = call.sender;
        let mut settlement = Settlement::new(self.app_address);
        match action {
            Action::Bootstrap(_) => self.stage_bootstrap(ledger, &mut settlement)?,
            Action::Fund(payload) => self.stage_fund(ledger, &mut settlement, sender, payload)?,
            Action::Mint(payload) => self.stage_mint(ledger, &mut settlement, sender, payload)?,
            Action::Burn(payload) => self.stage_burn(ledger, &mut settlement, sender, payload)?,
            Action::Swap(payload) => self.stage_swap(ledger, &mut settlement, sender, payload)?,
            Action::SetGovernor(payload) => self.stage_set_governor(&mut settlement, payload),
        }

        let committed = settlement.commit(ledger, &mut self.state)?;
        let return_value = match action.kind() {
            ActionKind::Boot => committed.created_asset,
            _ => None,
        };
        if let Some(pool) = return_value {
            info!("Pool application {} bootstrapped pool asset {}", self.app_id, pool);
        }

        Ok(Receipt {
            action: Some(action.kind()),
            instructions: committed.instructions,
            return_value,
        })
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    fn complete(
        &mut self,
        ledger: &mut dyn Ledger,
        group: &Group,
        call: &AppCall,
    ) -> PoolResult<Receipt> {
        if group.len() != 1 {
            return Err(PoolError::BareCallGroup {
                on_completion: call.on_completion,
                actual: group.len(),
            });
        }
        self.gate().authorize_completion(call.on_completion, &call.sender)?;

        let mut settlement = Settlement::new(self.app_address);
        if call.on_completion == OnCompletion::DeleteApplication {
            settlement.write(StateWrite::Destroy);
        }
        let committed = settlement.commit(ledger, &mut self.state)?;

        info!(
            "Pool application {} accepted {:?} from {:?}",
            self.app_id, call.on_completion, call.sender
        );
        Ok(Receipt {
            instructions: committed.instructions,
            ..Receipt::empty()
        })
    }

    // =========================================================================
    // ACTION HANDLERS
    // =========================================================================

    fn require_pool_asset(&self) -> PoolResult<AssetId> {
        self.state.pool_asset().ok_or(PoolError::NotBootstrapped)
    }

    fn snapshot(&self, ledger: &dyn Ledger) -> PoolResult<(Reserves, PoolPhase)> {
        let pool = self.require_pool_asset()?;
        let reserves = Reserves::observe(ledger, &self.app_address, &self.config, pool)?;
        let phase = PoolPhase::derive(&self.state, reserves.a, reserves.b);
        debug!(
            "Reserves a={} b={} pool={} phase={}",
            reserves.a, reserves.b, reserves.pool, phase
        );
        Ok((reserves, phase))
    }

    fn stage_bootstrap(&self, ledger: &dyn Ledger, settlement: &mut Settlement) -> PoolResult<()> {
        let unit_a = ledger.unit_name(self.config.asset_a)?;
        let unit_b = ledger.unit_name(self.config.asset_b)?;

        settlement.create_asset(
            self.config
                .pool_token
                .asset_params(self.app_address, &unit_a, &unit_b),
        );
        settlement.opt_in(self.config.asset_a);
        settlement.opt_in(self.config.asset_b);
        settlement.write(StateWrite::PoolAssetFromCreation);
        Ok(())
    }

    fn stage_fund(
        &self,
        ledger: &dyn Ledger,
        settlement: &mut Settlement,
        sender: Address,
        payload: FundPayload,
    ) -> PoolResult<()> {
        let (reserves, phase) = self.snapshot(ledger)?;
        phase.ensure_fundable(reserves.issued(self.config.pool_token.total_supply)?)?;

        let seeded = first_liquidity(payload.a_amount, payload.b_amount, &self.config.fees)?;
        info!("Seeding pool liquidity: {} shares to {:?}", seeded, sender);

        settlement.transfer(sender, self.require_pool_asset()?, seeded);
        settlement.write(StateWrite::LiquiditySeeded);
        Ok(())
    }

    fn stage_mint(
        &self,
        ledger: &dyn Ledger,
        settlement: &mut Settlement,
        sender: Address,
        payload: MintPayload,
    ) -> PoolResult<()> {
        let (reserves, phase) = self.snapshot(ledger)?;
        phase.ensure_active()?;

        let issued = reserves.issued(self.config.pool_token.total_supply)?;
        let minted = mint_tokens(
            issued,
            reserves.a,
            reserves.b,
            payload.a_amount,
            payload.b_amount,
        )?;
        debug!("Mint: issued={} minted={}", issued, minted);

        settlement.transfer(sender, self.require_pool_asset()?, minted);
        Ok(())
    }

    fn stage_burn(
        &self,
        ledger: &dyn Ledger,
        settlement: &mut Settlement,
        sender: Address,
        payload: BurnPayload,
    ) -> PoolResult<()> {
        let (reserves, phase) = self.snapshot(ledger)?;
        phase.ensure_active()?;

        let issued = reserves.issued(self.config.pool_token.total_supply)?;
        let a_out = burn_tokens(issued, reserves.a, payload.pool_amount)?;
        let b_out = burn_tokens(issued, reserves.b, payload.pool_amount)?;
        debug!("Burn: issued={} a_out={} b_out={}", issued, a_out, b_out);

        settlement.transfer(sender, self.config.asset_a, a_out);
        settlement.transfer(sender, self.config.asset_b, b_out);
        Ok(())
    }

    fn stage_swap(
        &self,
        ledger: &dyn Ledger,
        settlement: &mut Settlement,
        sender: Address,
        payload: SwapPayload,
    ) -> PoolResult<()> {
        let (reserves, phase) = self.snapshot(ledger)?;
        phase.ensure_active()?;

        let in_sup = reserves.of(payload.in_asset, &self.config)?;
        let out_sup = reserves.of(payload.out_asset, &self.config)?;
        let out = swap_tokens(payload.in_amount, in_sup, out_sup, &self.config.fees)?;
        debug!(
            "Swap: {} of {} for {} of {}",
            payload.in_amount, payload.in_asset, out, payload.out_asset
        );

        settlement.transfer(sender, payload.out_asset, out);
        Ok(())
    }

    fn stage_set_governor(&self, settlement: &mut Settlement, payload: SetGovernorPayload) {
        info!("Governor reassigned to {:?}", payload.new_governor);
        settlement.write(StateWrite::Governor(payload.new_governor));
    }
}
