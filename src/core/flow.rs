//! One flow state machine for all four user actions (swap, add liquidity,
//! remove liquidity, bridge) on either network. The per-action pages share
//! this single implementation of the amount/slippage/lifecycle shape instead
//! of each carrying their own copy.
//!
//! Quote application is last-write-wins: every edit that can trigger an
//! async quote bumps a generation counter, and a resolving quote is applied
//! only if its generation is still current. Stale results are dropped.

use crate::asset::Token;
use crate::balance::{Balance, Human};
use crate::core::amount::AmountInput;
use crate::core::context::Network;
use crate::core::lifecycle::{Lifecycle, LifecycleTag};
use crate::core::tx_root::RootExtrinsic;
use crate::core::tx_xrpl::XrplTx;
use crate::slippage::Slippage;
use bigdecimal::BigDecimal;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAction {
    Swap,
    AddLiquidity,
    RemoveLiquidity,
    Bridge,
}

/// The chain-specific built transaction a flow is about to sign.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltTx {
    Root(RootExtrinsic),
    Xrpl(XrplTx),
}

/// Shared state of one user flow.
#[derive(Debug)]
pub struct Flow {
    action: FlowAction,
    network: Network,
    x: AmountInput,
    y: AmountInput,
    slippage: Slippage,
    lifecycle: Lifecycle<BuiltTx>,
    /// Gas-affordability failure; cleared synchronously when the gas asset,
    /// token selection or network changes.
    gas_error: Option<String>,
    generation: u64,
}

impl Flow {
    pub fn new(action: FlowAction, network: Network) -> Self {
        Self {
            action,
            network,
            x: AmountInput::new(),
            y: AmountInput::new(),
            slippage: Slippage::default(),
            lifecycle: Lifecycle::new(),
            gas_error: None,
            generation: 0,
        }
    }

    pub fn action(&self) -> FlowAction {
        self.action
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn x(&self) -> &AmountInput {
        &self.x
    }

    pub fn y(&self) -> &AmountInput {
        &self.y
    }

    pub fn slippage(&self) -> &Slippage {
        &self.slippage
    }

    pub fn lifecycle(&self) -> &Lifecycle<BuiltTx> {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut Lifecycle<BuiltTx> {
        &mut self.lifecycle
    }

    pub fn gas_error(&self) -> Option<&str> {
        self.gas_error.as_deref()
    }

    /// Records the gas-affordability result for the current selection.
    pub fn set_gas_error(&mut self, error: Option<String>) {
        self.gas_error = error;
    }

    pub fn set_slippage(&mut self, raw: &str) {
        self.slippage = Slippage::parse(raw);
    }

    /// Switching networks atomically clears token, amount, gas and
    /// lifecycle state so an amount denominated for one chain can never be
    /// submitted against the other. Pending quotes are invalidated.
    pub fn switch_network(&mut self, network: Network) {
        if self.network == network {
            return;
        }
        self.network = network;
        self.x = AmountInput::new();
        self.y = AmountInput::new();
        self.gas_error = None;
        self.lifecycle.reset();
        self.generation += 1;
    }

    /// Token selection; also invalidates the gas check and pending quotes.
    pub fn set_x_token(&mut self, token: Option<Token>) {
        self.x.set_token(token);
        self.gas_error = None;
        self.generation += 1;
    }

    pub fn set_y_token(&mut self, token: Option<Token>) {
        self.y.set_token(token);
        self.gas_error = None;
        self.generation += 1;
    }

    /// Applies an x-side edit. On acceptance, returns the generation a
    /// quote triggered by this edit must present to [`Flow::try_apply`].
    pub fn set_x_amount(&mut self, raw: &str, available: Option<&Balance<Human>>) -> Option<u64> {
        if !self.x.set_amount(raw, available) {
            return None;
        }
        self.generation += 1;
        Some(self.generation)
    }

    pub fn set_y_amount(&mut self, raw: &str, available: Option<&Balance<Human>>) -> Option<u64> {
        if !self.y.set_amount(raw, available) {
            return None;
        }
        self.generation += 1;
        Some(self.generation)
    }

    /// The generation an externally triggered computation (balance poll,
    /// slippage change) should capture before awaiting.
    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Last-write-wins gate: true when the resolving computation's
    /// generation is still current and its result may be applied.
    pub fn try_apply(&mut self, generation: u64) -> bool {
        if generation == self.generation {
            true
        } else {
            debug!(
                stale = generation,
                current = self.generation,
                "dropping superseded quote result"
            );
            false
        }
    }

    /// Writes the dependent side's computed amount (pool-ratio conversion).
    pub fn set_y_computed(&mut self, value: &BigDecimal, available: Option<&Balance<Human>>) {
        self.y.set_computed(value, available);
    }

    pub fn set_x_computed(&mut self, value: &BigDecimal, available: Option<&Balance<Human>>) {
        self.x.set_computed(value, available);
    }

    /// Zeroed or invalid input clears the dependent side and any built
    /// transaction rather than leaving a stale quote visible.
    pub fn clear_derived(&mut self) {
        self.y.clear();
        self.lifecycle.reset();
    }

    /// Whether the action button is blocked. Every blocking error renders
    /// inline; nothing here throws.
    pub fn is_disabled(&self) -> bool {
        if self.gas_error.is_some() {
            return true;
        }
        if matches!(self.lifecycle.tag(), LifecycleTag::Submit) {
            return true;
        }
        match self.action {
            // bridge moves a single amount
            FlowAction::Bridge => !self.x.is_ready(),
            _ => !self.x.is_ready() || !self.y.is_ready(),
        }
    }

    /// Full reset (navigation away).
    pub fn reset(&mut self) {
        self.x.clear();
        self.y.clear();
        self.gas_error = None;
        self.lifecycle.reset();
        self.generation += 1;
    }
}
