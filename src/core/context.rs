//! Session context: which network is selected and which addresses are
//! connected. Passed explicitly into every engine call so flows can be
//! tested with multiple simulated sessions; there is no ambient global.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The network the user is currently operating on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    /// The substrate chain with the constant-product DEX pallet.
    Root,
    /// The XRP Ledger with native AMM objects.
    Xrpl,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Root => write!(f, "root"),
            Network::Xrpl => write!(f, "xrpl"),
        }
    }
}

/// Connected-wallet session. Either address may be absent when the
/// corresponding wallet is not connected; engine calls that need one
/// return a validation error instead of assuming it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub network: Network,
    /// EOA address on the substrate chain.
    pub root_address: Option<String>,
    /// Smart-account (proxy) address extrinsics are wrapped for.
    pub futurepass: Option<String>,
    /// Classic address on the ledger.
    pub xrpl_address: Option<String>,
}

impl Session {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            root_address: None,
            futurepass: None,
            xrpl_address: None,
        }
    }

    /// Switches the selected network. Callers owning per-flow state must
    /// clear token/amount state when this returns `true` so a stale amount
    /// denominated for one chain is never submitted against the other.
    pub fn switch_network(&mut self, network: Network) -> bool {
        if self.network == network {
            return false;
        }
        self.network = network;
        true
    }
}
