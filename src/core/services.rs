//! Contracts for the external collaborators the engine computes against.
//! The chain SDK clients, the price REST endpoint and the history endpoint
//! are all opaque services behind these traits; tests drive the engine with
//! in-memory implementations.

use crate::core::lifecycle::SignerEvent;
use crate::core::pool::PoolKey;
use crate::core::tx_root::RootExtrinsic;
use crate::core::tx_xrpl::XrplTx;
use crate::error::Result;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Gas estimate for a wrapped extrinsic, in display units of the selected
/// fee asset.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeEstimate {
    pub fee_amount_human: BigDecimal,
}

/// Inclusion receipt for a submitted extrinsic; the explorer URL is derived
/// from block and index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootTxReceipt {
    pub block: u64,
    pub extrinsic_index: u32,
}

/// One entry of an XRPL account's balance sheet (native or trustline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerBalance {
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    pub value: BigDecimal,
}

/// On-chain AMM object state as returned by `amm_info`, reserves in display
/// units and the trading fee in units of 1/100000.
#[derive(Debug, Clone, PartialEq)]
pub struct AmmInfo {
    pub reserve_x: BigDecimal,
    pub reserve_y: BigDecimal,
    pub trading_fee: u32,
}

/// Query/submit surface of the substrate chain.
#[async_trait]
pub trait RootChainService: Send + Sync {
    /// Pool reserves in base units, in storage-key order.
    async fn query_pool(&self, key: &PoolKey) -> Result<(u128, u128)>;

    /// Counter-asset amount for an exact input, base units.
    async fn quote_exact_in(&self, amount_in: u128, path: (u32, u32)) -> Result<u128>;

    /// Required input amount for an exact output, base units.
    async fn quote_exact_out(&self, amount_out: u128, path: (u32, u32)) -> Result<u128>;

    async fn estimate_fee(&self, extrinsic: &RootExtrinsic, fee_asset: u32)
        -> Result<FeeEstimate>;

    async fn sign_and_send(&self, extrinsic: &RootExtrinsic) -> Result<RootTxReceipt>;
}

/// JSON-RPC surface of the ledger plus its interactive signer.
#[async_trait]
pub trait XrplService: Send + Sync {
    /// Generic passthrough (`amm_info`, `account_lines`, `account_info`,
    /// `account_tx`).
    async fn request(&self, command: &str, params: Value) -> Result<Value>;

    async fn get_balances(&self, address: &str) -> Result<Vec<LedgerBalance>>;

    /// Starts an interactive signing round-trip. The receiver yields zero or
    /// more `Pending` events (QR/deeplink payloads) followed by exactly one
    /// terminal `Success`/`Failure` event.
    async fn sign_transaction(&self, tx: &XrplTx) -> Result<mpsc::Receiver<SignerEvent>>;
}

/// USD prices keyed by token symbol/ticker.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn prices(&self) -> Result<HashMap<String, f64>>;
}

/// Filter for the transaction-history endpoint. Address matching on the
/// backend is case-sensitive, so both the checksummed and lowercased forms
/// of each address are supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub addresses: Vec<String>,
    pub direction: HistoryDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryDirection {
    #[default]
    From,
    To,
    Sender,
}

impl HistoryQuery {
    /// Adds an address in both its given and lowercased forms.
    pub fn with_address_variants(mut self, address: &str) -> Self {
        self.addresses.push(address.to_string());
        let lower = address.to_lowercase();
        if lower != address {
            self.addresses.push(lower);
        }
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryPage {
    pub documents: Vec<Value>,
}

#[async_trait]
pub trait HistoryFeed: Send + Sync {
    async fn query(&self, query: &HistoryQuery) -> Result<HistoryPage>;
}
