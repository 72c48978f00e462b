// Engine module: pool resolution, amount input, swap/liquidity math,
// transaction building and the signing lifecycle for both networks.
//
// Everything here is pure computation or async orchestration over the
// service traits in `services`; no chain state is owned by this crate.

pub mod amount;
pub mod context;
pub mod flow;
pub mod lifecycle;
pub mod liquidity;
pub mod pool;
pub mod services;
pub mod swap;
pub mod tx_root;
pub mod tx_xrpl;

use std::time::Duration;

/// Total exchange fee rate of the substrate-chain DEX pallet, in percent.
/// Mirrors the pallet's 0.3% constant-product trading fee. Display-only:
/// the actual fee is embedded in the pool math on chain.
pub const EXCHANGE_RATE: &str = "0.3";

/// Portion of [`EXCHANGE_RATE`] attributed to the network, in percent.
/// The remainder goes to liquidity providers.
pub const NETWORK_FEE_RATE: &str = "0.05";

/// XRPL AMM trading fees are stored as units of 1/100000.
pub const LEDGER_TRADING_FEE_DENOMINATOR: u32 = 100_000;

/// Polling interval for wallet balances and trustlines.
pub const BALANCE_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Polling interval for liquidity pools.
pub const POOL_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Polling interval for USD prices.
pub const PRICE_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Polling interval for bridge transaction history.
pub const HISTORY_POLL_INTERVAL: Duration = Duration::from_secs(5);
