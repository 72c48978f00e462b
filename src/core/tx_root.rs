//! Substrate-chain transaction building: call descriptions for the DEX
//! pallet, smart-account (proxy) wrapping, fee-proxy selection for paying
//! gas in a non-native asset, and the gas-affordability gate.

use crate::asset::Token;
use crate::core::services::RootChainService;
use crate::error::{DexError, Result};
use crate::slippage::Slippage;
use bigdecimal::BigDecimal;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Asset id of the network's gas token. Fee payment in any other asset goes
/// through the fee proxy, which swaps into this asset implicitly.
pub const NATIVE_GAS_ASSET_ID: u32 = 2;

/// Explorer base for submitted extrinsics.
pub const ROOT_EXPLORER_URL: &str = "https://explorer.rootnet.live/extrinsics";

// XRPL classic address: 'r' followed by 24-34 base58 chars (no 0, O, I, l).
static XRPL_ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^r[1-9A-HJ-NP-Za-km-z]{24,34}$").expect("static pattern"));

pub fn validate_xrpl_address(address: &str) -> Result<()> {
    if XRPL_ADDRESS_RE.is_match(address) {
        Ok(())
    } else {
        Err(DexError::Validation(format!(
            "invalid XRPL address: {address}"
        )))
    }
}

/// A DEX-pallet call, amounts in base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum RootCall {
    SwapWithExactSupply {
        amount_in: u128,
        amount_out_min: u128,
        path: Vec<u32>,
    },
    SwapWithExactTarget {
        amount_out: u128,
        amount_in_max: u128,
        path: Vec<u32>,
    },
    AddLiquidity {
        token_a: u32,
        token_b: u32,
        amount_a_desired: u128,
        amount_b_desired: u128,
        amount_a_min: u128,
        amount_b_min: u128,
    },
    RemoveLiquidity {
        token_a: u32,
        token_b: u32,
        liquidity: u128,
        amount_a_min: u128,
        amount_b_min: u128,
    },
    /// Bridge withdrawal off the chain to an XRPL destination.
    WithdrawXrp { amount: u128, destination: String },
}

impl RootCall {
    /// Base-unit amounts this call spends, per asset id. The gas check adds
    /// these to the fee when the fee asset is also being traded.
    pub fn principal_per_asset(&self) -> Vec<(u32, u128)> {
        match self {
            RootCall::SwapWithExactSupply {
                amount_in, path, ..
            } => path.first().map(|id| (*id, *amount_in)).into_iter().collect(),
            RootCall::SwapWithExactTarget {
                amount_in_max,
                path,
                ..
            } => path.first().map(|id| (*id, *amount_in_max)).into_iter().collect(),
            RootCall::AddLiquidity {
                token_a,
                token_b,
                amount_a_desired,
                amount_b_desired,
                ..
            } => vec![(*token_a, *amount_a_desired), (*token_b, *amount_b_desired)],
            RootCall::RemoveLiquidity { .. } => Vec::new(),
            RootCall::WithdrawXrp { amount, .. } => vec![(NATIVE_GAS_ASSET_ID, *amount)],
        }
    }
}

/// How the inner call is wrapped for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "wrapper", rename_all = "snake_case")]
pub enum Wrapper {
    /// Smart-account execution; gas paid in the native gas asset.
    Proxy { futurepass: String },
    /// Smart-account execution with the fee paid in another asset, swapped
    /// implicitly with the given tolerance.
    FeeProxy {
        futurepass: String,
        payment_asset: u32,
        slippage: Slippage,
    },
}

/// A built, unsigned extrinsic. Associated 1:1 with the current transaction
/// intent and must be rebuilt, never resubmitted, after a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootExtrinsic {
    pub call: RootCall,
    pub wrapper: Wrapper,
}

impl RootExtrinsic {
    pub fn fee_asset(&self) -> u32 {
        match &self.wrapper {
            Wrapper::Proxy { .. } => NATIVE_GAS_ASSET_ID,
            Wrapper::FeeProxy { payment_asset, .. } => *payment_asset,
        }
    }
}

/// Wraps a call for the connected smart account, selecting the fee proxy
/// when the chosen gas token is not the native gas asset.
pub fn build_extrinsic(
    futurepass: Option<&str>,
    call: RootCall,
    gas_token: &Token,
    slippage: &Slippage,
) -> Result<RootExtrinsic> {
    let futurepass = futurepass
        .ok_or_else(|| DexError::Validation("no smart account connected".to_string()))?
        .to_string();
    if let RootCall::WithdrawXrp { destination, .. } = &call {
        validate_xrpl_address(destination)?;
    }
    let gas_asset = match gas_token {
        Token::Chain(t) => t.asset_id,
        Token::Ledger(_) => {
            return Err(DexError::Validation(
                "gas token must be a substrate-chain asset".to_string(),
            ))
        }
    };
    let wrapper = if gas_asset == NATIVE_GAS_ASSET_ID {
        Wrapper::Proxy { futurepass }
    } else {
        Wrapper::FeeProxy {
            futurepass,
            payment_asset: gas_asset,
            slippage: slippage.clone(),
        }
    };
    Ok(RootExtrinsic { call, wrapper })
}

/// Outcome of the gas-affordability check. An unaffordable fee is a
/// user-facing gate (`error` set, submission disabled), never a thrown
/// error.
#[derive(Debug, Clone, PartialEq)]
pub struct GasCheck {
    /// Estimated fee in display units of the fee asset.
    pub fee: BigDecimal,
    pub error: Option<String>,
}

impl GasCheck {
    pub fn is_affordable(&self) -> bool {
        self.error.is_none()
    }
}

/// Estimates gas for a wrapped extrinsic and checks the payer's fee-asset
/// balance covers it. The call's principal in the fee asset is added to the
/// requirement only when the fee asset is itself being traded, so the same
/// balance is not spent twice.
pub async fn check_gas(
    service: &dyn RootChainService,
    extrinsic: &RootExtrinsic,
    gas_token: &Token,
    payer_balance_human: &BigDecimal,
) -> Result<GasCheck> {
    let fee_asset = extrinsic.fee_asset();
    let estimate = service.estimate_fee(extrinsic, fee_asset).await?;
    let mut required = estimate.fee_amount_human.clone();
    for (asset, principal) in extrinsic.call.principal_per_asset() {
        if asset == fee_asset {
            let principal_human = crate::balance::big_decimal(principal)
                / crate::balance::pow10(gas_token.decimals());
            required += principal_human;
        }
    }
    let error = if payer_balance_human < &required {
        Some(format!(
            "Insufficient {} balance to cover gas",
            gas_token.symbol()
        ))
    } else {
        None
    };
    Ok(GasCheck {
        fee: estimate.fee_amount_human,
        error,
    })
}

/// Block-and-index explorer link for an included extrinsic.
pub fn explorer_url(block: u64, extrinsic_index: u32) -> String {
    format!("{ROOT_EXPLORER_URL}/{block}-{extrinsic_index}")
}
