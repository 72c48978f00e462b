pub mod asset;
pub mod balance;
pub mod core;
pub mod error;
pub mod slippage;

pub use asset::{ChainToken, CurrencyCode, LedgerCurrency, Token, DEFAULT_LEDGER_DECIMALS};
pub use balance::{Balance, Human, Planck, Unit};
pub use error::{DexError, Result, Severity};
pub use slippage::{Slippage, DEFAULT_SLIPPAGE};

// Core API exports
pub use core::amount::{AmountInput, INSUFFICIENT_BALANCE};
pub use core::context::{Network, Session};
pub use core::flow::{BuiltTx, Flow, FlowAction};
pub use core::lifecycle::{Lifecycle, LifecycleTag, SignerEvent};
pub use core::liquidity::{
    amount_for_percent,
    check_withdrawal,
    quote_add,
    quote_create,
    quote_remove,
    AddQuote,
    CreateQuote,
    RemoveQuote,
    WithdrawalError,
};
pub use core::pool::{
    derive_pool_balances,
    derive_position,
    find_pool,
    pool_value_in_usd,
    LiquidityPool,
    Orientation,
    PoolBalances,
    PoolKey,
    Position,
    SideBalance,
};
pub use core::services::{
    AmmInfo,
    FeeEstimate,
    HistoryDirection,
    HistoryFeed,
    HistoryPage,
    HistoryQuery,
    LedgerBalance,
    PriceFeed,
    RootChainService,
    RootTxReceipt,
    XrplService,
};
pub use core::swap::{
    check_ledger_sufficiency,
    quote_ledger_swap,
    quote_root_swap,
    LedgerSwapQuote,
    RootSwapQuote,
    SwapDirection,
    SwapLimit,
};
pub use core::tx_root::{
    build_extrinsic,
    check_gas,
    validate_xrpl_address,
    GasCheck,
    RootCall,
    RootExtrinsic,
    Wrapper,
    NATIVE_GAS_ASSET_ID,
    ROOT_EXPLORER_URL,
};
pub use core::tx_xrpl::{
    build_amm_deposit,
    build_amm_withdraw,
    build_cross_currency_payment,
    build_payment,
    build_trust_set,
    require_trustline,
    XrplAmount,
    XrplAsset,
    XrplTx,
    TF_PARTIAL_PAYMENT,
    TF_TWO_ASSET,
    TRUST_SET_DEFAULT_LIMIT,
    XRPL_EXPLORER_URL,
};
pub use core::{
    BALANCE_POLL_INTERVAL,
    EXCHANGE_RATE,
    HISTORY_POLL_INTERVAL,
    LEDGER_TRADING_FEE_DENOMINATOR,
    NETWORK_FEE_RATE,
    POOL_POLL_INTERVAL,
    PRICE_POLL_INTERVAL,
};
