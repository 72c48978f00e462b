//! Swap quote engines.
//!
//! The substrate chain quotes through its read-only RPC (`quote_exact_in` /
//! `quote_exact_out`); this module never reproduces that pallet's curve. The
//! ledger side quotes client-side from AMM reserves: a proportional ratio
//! for the displayed amount, with the constant-product invariant applied
//! separately as a sufficiency check. The two can disagree near the edge of
//! the slippage tolerance; the sufficiency check is the binding one.

use crate::asset::Token;
use crate::balance::{pow10, Balance, Human, Planck};
use crate::core::services::{AmmInfo, RootChainService};
use crate::core::{EXCHANGE_RATE, LEDGER_TRADING_FEE_DENOMINATOR, NETWORK_FEE_RATE};
use crate::error::{DexError, Result};
use crate::slippage::Slippage;
use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::{One, Zero};
use std::str::FromStr;
use tracing::debug;

/// Which side of the pair the entered amount fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    ExactIn,
    ExactOut,
}

/// Slippage-adjusted execution bound, base units.
#[derive(Debug, Clone, PartialEq)]
pub enum SwapLimit {
    /// Floor on what the user receives (exact-in).
    MinimumReceived(Balance<Planck>),
    /// Ceiling on what the user pays (exact-out).
    MaximumSent(Balance<Planck>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RootSwapQuote {
    pub from_balance: Balance<Planck>,
    pub to_balance: Balance<Planck>,
    /// `to / from` in display units, fixed to 6 decimals.
    pub ratio: String,
    pub limit: SwapLimit,
    /// Display-only network fee, display units of the from asset. The real
    /// fee is embedded in the pool math on chain.
    pub network_fee: BigDecimal,
    /// Display-only LP fee, display units of the from asset.
    pub exchange_fee: BigDecimal,
    /// Quoted ratio versus spot ratio, percent. Absent without reserves.
    pub price_difference: Option<BigDecimal>,
}

fn chain_asset_id(token: &Token) -> Result<u32> {
    match token {
        Token::Chain(t) => Ok(t.asset_id),
        Token::Ledger(_) => Err(DexError::Validation(
            "expected a substrate-chain asset".to_string(),
        )),
    }
}

fn fixed_six(value: &BigDecimal) -> String {
    value.with_scale_round(6, RoundingMode::Down).to_string()
}

/// Quotes a swap on the substrate chain. Returns `None` when the entered
/// amount resolves to zero base units: callers must clear the ratio and any
/// built transaction instead of building a zero-amount extrinsic.
pub async fn quote_root_swap(
    service: &dyn RootChainService,
    from: &Token,
    to: &Token,
    amount: &BigDecimal,
    direction: SwapDirection,
    slippage: &Slippage,
    spot_reserves: Option<(u128, u128)>,
) -> Result<Option<RootSwapQuote>> {
    let from_id = chain_asset_id(from)?;
    let to_id = chain_asset_id(to)?;

    let (from_balance, to_balance) = match direction {
        SwapDirection::ExactIn => {
            let from_balance = Balance::<Human>::new(amount.clone(), from.clone()).to_planck();
            if from_balance.is_zero() {
                debug!(side = "from", "zero amount, dropping quote");
                return Ok(None);
            }
            let planck = planck_u128(&from_balance)?;
            let counter = service.quote_exact_in(planck, (from_id, to_id)).await?;
            let to_balance = Balance::<Planck>::from_planck(counter, to.clone());
            (from_balance, to_balance)
        }
        SwapDirection::ExactOut => {
            let to_balance = Balance::<Human>::new(amount.clone(), to.clone()).to_planck();
            if to_balance.is_zero() {
                debug!(side = "to", "zero amount, dropping quote");
                return Ok(None);
            }
            let planck = planck_u128(&to_balance)?;
            let required = service.quote_exact_out(planck, (from_id, to_id)).await?;
            let from_balance = Balance::<Planck>::from_planck(required, from.clone());
            (from_balance, to_balance)
        }
    };

    if from_balance.is_zero() {
        debug!("quote resolved to zero input, dropping");
        return Ok(None);
    }

    let from_human = from_balance.to_unit();
    let to_human = to_balance.to_unit();
    let ratio_value = to_human.value() / from_human.value();
    let ratio = fixed_six(&ratio_value);

    let tolerance = slippage.fraction();
    let limit = match direction {
        SwapDirection::ExactIn => SwapLimit::MinimumReceived(
            to_balance
                .multiplied_by(&(BigDecimal::one() - &tolerance))
                .integer_value(),
        ),
        SwapDirection::ExactOut => SwapLimit::MaximumSent(
            from_balance
                .multiplied_by(&(BigDecimal::one() + &tolerance))
                .integer_value(),
        ),
    };

    let network_rate = BigDecimal::from_str(NETWORK_FEE_RATE).unwrap_or_else(|_| BigDecimal::zero());
    let exchange_rate = BigDecimal::from_str(EXCHANGE_RATE).unwrap_or_else(|_| BigDecimal::zero());
    let hundred = BigDecimal::from(100);
    let network_fee = from_human.value() * &network_rate / &hundred;
    let exchange_fee = from_human.value() * (&exchange_rate - &network_rate) / &hundred;

    let price_difference = spot_reserves.and_then(|(reserve_from, reserve_to)| {
        spot_ratio(reserve_from, from.decimals(), reserve_to, to.decimals()).map(|spot| {
            (&ratio_value - &spot) / spot * BigDecimal::from(100)
        })
    });

    Ok(Some(RootSwapQuote {
        from_balance,
        to_balance,
        ratio,
        limit,
        network_fee,
        exchange_fee,
        price_difference,
    }))
}

fn planck_u128(balance: &Balance<Planck>) -> Result<u128> {
    balance
        .to_planck_string()
        .parse::<u128>()
        .map_err(|_| DexError::Validation("amount exceeds the chain's balance width".to_string()))
}

fn spot_ratio(
    reserve_from: u128,
    from_decimals: u8,
    reserve_to: u128,
    to_decimals: u8,
) -> Option<BigDecimal> {
    if reserve_from == 0 || reserve_to == 0 {
        return None;
    }
    let from = crate::balance::big_decimal(reserve_from) / pow10(from_decimals);
    let to = crate::balance::big_decimal(reserve_to) / pow10(to_decimals);
    Some(to / from)
}

/// Client-computed quote from ledger AMM reserves.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSwapQuote {
    /// Destination per source unit, from the reserve ratio.
    pub ratio: BigDecimal,
    /// `amount * ratio`, display units. Proportional, not the full
    /// constant-product-with-fee formula; the fee is surfaced separately.
    pub counter_amount: BigDecimal,
    /// AMM trading fee as a fraction (stored on-ledger in 1/100000 units).
    pub trading_fee: BigDecimal,
    /// Slippage-adjusted floor on the delivered amount, display units.
    pub minimum_received: BigDecimal,
}

/// Quotes a swap against an XRPL AMM. `source_is_x` says which reserve the
/// entered amount draws down.
pub fn quote_ledger_swap(
    amm: &AmmInfo,
    amount: &BigDecimal,
    source_is_x: bool,
    slippage: &Slippage,
) -> Result<LedgerSwapQuote> {
    let (reserve_in, reserve_out) = if source_is_x {
        (&amm.reserve_x, &amm.reserve_y)
    } else {
        (&amm.reserve_y, &amm.reserve_x)
    };
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(DexError::Validation("AMM has empty reserves".to_string()));
    }
    let ratio = reserve_out / reserve_in;
    let counter_amount = amount * &ratio;
    let trading_fee =
        BigDecimal::from(amm.trading_fee) / BigDecimal::from(LEDGER_TRADING_FEE_DENOMINATOR);
    let minimum_received = &counter_amount * (BigDecimal::one() - slippage.fraction());
    Ok(LedgerSwapQuote {
        ratio,
        counter_amount,
        trading_fee,
        minimum_received,
    })
}

/// Constant-product sufficiency check: simulates the deposit against
/// `k = R_in * R_out` and fails when the pool cannot deliver more than the
/// agreed minimum.
pub fn check_ledger_sufficiency(
    amm: &AmmInfo,
    amount: &BigDecimal,
    source_is_x: bool,
    minimum_received: &BigDecimal,
) -> Result<BigDecimal> {
    let (reserve_in, reserve_out) = if source_is_x {
        (&amm.reserve_x, &amm.reserve_y)
    } else {
        (&amm.reserve_y, &amm.reserve_x)
    };
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(DexError::Validation("AMM has empty reserves".to_string()));
    }
    let k = reserve_in * reserve_out;
    let new_reserve_in = reserve_in + amount;
    let new_reserve_out = &k / &new_reserve_in;
    let available = reserve_out - &new_reserve_out;
    if &available <= minimum_received {
        return Err(DexError::Slippage(
            "insufficient liquidity for this trade".to_string(),
        ));
    }
    Ok(available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ChainToken;
    use crate::core::services::{FeeEstimate, RootTxReceipt};
    use crate::core::pool::PoolKey;
    use crate::core::tx_root::RootExtrinsic;
    use async_trait::async_trait;

    fn dec(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).unwrap()
    }

    fn token(id: u32, decimals: u8) -> Token {
        Token::Chain(ChainToken {
            asset_id: id,
            symbol: format!("T{id}"),
            name: format!("Token {id}"),
            decimals,
            supply: 0,
            price_in_usd: None,
        })
    }

    /// Quote service that answers with a fixed proportional rate.
    struct FixedRate {
        out_per_in_numerator: u128,
        out_per_in_denominator: u128,
    }

    #[async_trait]
    impl RootChainService for FixedRate {
        async fn query_pool(&self, _key: &PoolKey) -> Result<(u128, u128)> {
            Ok((0, 0))
        }
        async fn quote_exact_in(&self, amount_in: u128, _path: (u32, u32)) -> Result<u128> {
            Ok(amount_in * self.out_per_in_numerator / self.out_per_in_denominator)
        }
        async fn quote_exact_out(&self, amount_out: u128, _path: (u32, u32)) -> Result<u128> {
            Ok(amount_out * self.out_per_in_denominator / self.out_per_in_numerator)
        }
        async fn estimate_fee(
            &self,
            _extrinsic: &RootExtrinsic,
            _fee_asset: u32,
        ) -> Result<FeeEstimate> {
            Ok(FeeEstimate {
                fee_amount_human: BigDecimal::zero(),
            })
        }
        async fn sign_and_send(&self, _extrinsic: &RootExtrinsic) -> Result<RootTxReceipt> {
            Ok(RootTxReceipt {
                block: 0,
                extrinsic_index: 0,
            })
        }
    }

    #[tokio::test]
    async fn test_root_quote_exact_in_cross_decimals() {
        // A has 6 decimals, B has 18; pool holds them 1:2 in display units
        let a = token(1, 6);
        let b = token(2, 18);
        let service = FixedRate {
            // planck(B) per planck(A): 2 * 10^12
            out_per_in_numerator: 2_000_000_000_000,
            out_per_in_denominator: 1,
        };
        let quote = quote_root_swap(
            &service,
            &a,
            &b,
            &dec("1.5"),
            SwapDirection::ExactIn,
            &Slippage::parse("5"),
            Some((1_500_000, 3_000_000_000_000_000_000)),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(quote.to_balance.to_planck_string(), "3000000000000000000");
        assert_eq!(quote.ratio, "2.000000");
        // spot and quoted ratios coincide for this service
        assert!(quote.price_difference.unwrap().is_zero());
        match quote.limit {
            SwapLimit::MinimumReceived(min) => {
                assert_eq!(min.to_planck_string(), "2850000000000000000");
            }
            _ => panic!("expected a minimum-received bound"),
        }
    }

    #[tokio::test]
    async fn test_root_quote_zero_amount_clears() {
        let a = token(1, 6);
        let b = token(2, 6);
        let service = FixedRate {
            out_per_in_numerator: 1,
            out_per_in_denominator: 1,
        };
        let quote = quote_root_swap(
            &service,
            &a,
            &b,
            &BigDecimal::zero(),
            SwapDirection::ExactIn,
            &Slippage::parse("5"),
            None,
        )
        .await
        .unwrap();
        assert!(quote.is_none());
    }

    #[tokio::test]
    async fn test_root_quote_exact_out_maximum_sent() {
        let a = token(1, 6);
        let b = token(2, 6);
        let service = FixedRate {
            out_per_in_numerator: 1,
            out_per_in_denominator: 1,
        };
        let quote = quote_root_swap(
            &service,
            &a,
            &b,
            &dec("10"),
            SwapDirection::ExactOut,
            &Slippage::parse("10"),
            None,
        )
        .await
        .unwrap()
        .unwrap();
        match quote.limit {
            SwapLimit::MaximumSent(max) => assert_eq!(max.to_planck_string(), "11000000"),
            _ => panic!("expected a maximum-sent bound"),
        }
    }

    #[tokio::test]
    async fn test_root_quote_fee_split() {
        let a = token(1, 6);
        let b = token(2, 6);
        let service = FixedRate {
            out_per_in_numerator: 1,
            out_per_in_denominator: 1,
        };
        let quote = quote_root_swap(
            &service,
            &a,
            &b,
            &dec("100"),
            SwapDirection::ExactIn,
            &Slippage::unset(),
            None,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(quote.network_fee, dec("100") * dec("0.05") / dec("100"));
        assert_eq!(
            quote.exchange_fee,
            dec("100") * (dec("0.3") - dec("0.05")) / dec("100")
        );
    }

    #[test]
    fn test_ledger_quote_proportional() {
        let amm = AmmInfo {
            reserve_x: dec("1000"),
            reserve_y: dec("2000"),
            trading_fee: 500,
        };
        let quote = quote_ledger_swap(&amm, &dec("10"), true, &Slippage::parse("0")).unwrap();
        assert_eq!(quote.ratio, dec("2"));
        assert_eq!(quote.counter_amount, dec("20"));
        assert_eq!(quote.trading_fee, dec("0.005"));
        assert_eq!(quote.minimum_received, dec("20"));
    }

    #[test]
    fn test_ledger_sufficiency_constant_product() {
        let amm = AmmInfo {
            reserve_x: dec("1000"),
            reserve_y: dec("1000"),
            trading_fee: 0,
        };
        // k = 1_000_000; new_rx = 1100; new_ry = 909.09...; available = 90.90...
        let available = check_ledger_sufficiency(&amm, &dec("100"), true, &dec("90")).unwrap();
        assert!(available > dec("90.9"));
        assert!(available < dec("91"));

        // a minimum at or above the available amount fails
        let err = check_ledger_sufficiency(&amm, &dec("100"), true, &dec("91")).unwrap_err();
        assert!(matches!(err, DexError::Slippage(_)));
    }

    #[test]
    fn test_ledger_empty_reserves_rejected() {
        let amm = AmmInfo {
            reserve_x: BigDecimal::zero(),
            reserve_y: dec("10"),
            trading_fee: 0,
        };
        assert!(quote_ledger_swap(&amm, &dec("1"), true, &Slippage::unset()).is_err());
        assert!(check_ledger_sufficiency(&amm, &dec("1"), true, &dec("0")).is_err());
    }
}
