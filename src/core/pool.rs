//! Liquidity-pool resolution and position derivation.
//!
//! Pool keys come from the chain's own storage and are NOT sorted by this
//! client: `"2-1124"` and `"1124-2"` are different keys and only one of them
//! exists. Lookups therefore try both orderings of the user-selected pair.

use crate::asset::Token;
use crate::balance::{big_decimal, Balance, Planck};
use crate::error::{DexError, Result};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Canonical two-asset storage key, `"<idA>-<idB>"` in the chain's fixed
/// (non-commutative) order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolKey(String);

impl PoolKey {
    pub fn new(component_a: &str, component_b: &str) -> Self {
        Self(format!("{component_a}-{component_b}"))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.splitn(2, '-');
        match (parts.next(), parts.next()) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => {
                Ok(Self(format!("{a}-{b}")))
            }
            _ => Err(DexError::Validation(format!("invalid pool key: {raw}"))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn components(&self) -> (&str, &str) {
        // constructor guarantees exactly one separator split is valid
        let mut parts = self.0.splitn(2, '-');
        (parts.next().unwrap_or(""), parts.next().unwrap_or(""))
    }
}

/// Whether the user's (x, y) selection matches the storage key directly or
/// with the sides swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// x is the key's first component.
    Direct,
    /// x is the key's second component.
    Flipped,
}

impl Orientation {
    /// Index of the x-side reserve within the pool's liquidity tuple.
    pub fn x_index(&self) -> usize {
        match self {
            Orientation::Direct => 0,
            Orientation::Flipped => 1,
        }
    }

    pub fn y_index(&self) -> usize {
        1 - self.x_index()
    }
}

/// A liquidity pool as fetched from chain state. Replaced wholesale on
/// refetch, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityPool {
    /// The LP token (chain asset id on the substrate chain, LP currency
    /// code on the ledger).
    pub lp_token: Token,
    pub pool_key: PoolKey,
    /// Reserves in base units, in storage-key order.
    pub liquidity: [u128; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity_in_usd: Option<f64>,
}

impl LiquidityPool {
    /// A pool is displayable/tradable only when both reserves are positive.
    pub fn has_liquidity(&self) -> bool {
        self.liquidity[0] > 0 && self.liquidity[1] > 0
    }

    /// Matches a user-selected token pair against this pool's key, trying
    /// both orderings. Currency codes compare in normalized form because
    /// `Token::pool_component` normalizes exactly as pool indexing does.
    pub fn matches(&self, x: &Token, y: &Token) -> Option<Orientation> {
        let (a, b) = self.pool_key.components();
        let xc = x.pool_component();
        let yc = y.pool_component();
        if xc == a && yc == b {
            Some(Orientation::Direct)
        } else if xc == b && yc == a {
            Some(Orientation::Flipped)
        } else {
            None
        }
    }
}

/// Locates the pool for a token pair regardless of which token the user
/// picked as "x".
pub fn find_pool<'a>(
    pools: &'a [LiquidityPool],
    x: &Token,
    y: &Token,
) -> Option<(&'a LiquidityPool, Orientation)> {
    pools
        .iter()
        .find_map(|pool| pool.matches(x, y).map(|o| (pool, o)))
}

/// A holder's LP position, derived from chain state on every refetch.
/// Never cached across a chain-state change.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub lp_token: Token,
    /// Holder's LP token balance, base units.
    pub lp_balance: Balance<Planck>,
    /// `lp_balance / total_lp_supply * 100`.
    pub pool_share: BigDecimal,
}

/// Derives a position from the holder's LP balance and the LP total supply.
/// Returns `None` when the holder has no LP balance: callers must treat
/// remove-liquidity as unavailable instead of dividing by zero.
pub fn derive_position(lp_token: &Token, lp_balance: u128, total_supply: u128) -> Option<Position> {
    if lp_balance == 0 || total_supply == 0 {
        return None;
    }
    let share = big_decimal(lp_balance) / big_decimal(total_supply) * BigDecimal::from(100);
    Some(Position {
        lp_token: lp_token.clone(),
        lp_balance: Balance::<Planck>::from_planck(lp_balance, lp_token.clone()),
        pool_share: share,
    })
}

/// One side of a holder's view of a pool.
#[derive(Debug, Clone, PartialEq)]
pub struct SideBalance {
    /// Holder's proportional amount of this side, base units.
    pub balance: Balance<Planck>,
    /// The pool's full reserve on this side, base units.
    pub liquidity: Balance<Planck>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolBalances {
    pub x: SideBalance,
    pub y: SideBalance,
}

/// Derives per-side holder balances from pool share. `None` when the
/// holder has no position.
pub fn derive_pool_balances(
    pool: &LiquidityPool,
    orientation: Orientation,
    x_token: &Token,
    y_token: &Token,
    position: Option<&Position>,
) -> Option<PoolBalances> {
    let position = position?;
    let share_fraction = &position.pool_share / BigDecimal::from(100);
    let side = |index: usize, token: &Token| {
        let liquidity = Balance::<Planck>::from_planck(pool.liquidity[index], token.clone());
        let balance = liquidity.multiplied_by(&share_fraction);
        SideBalance { balance, liquidity }
    };
    Some(PoolBalances {
        x: side(orientation.x_index(), x_token),
        y: side(orientation.y_index(), y_token),
    })
}

/// Total USD value of a pool from per-token prices, if both are known.
pub fn pool_value_in_usd(pool: &LiquidityPool, x_token: &Token, y_token: &Token) -> Option<f64> {
    let (px, py) = (x_token.price_in_usd()?, y_token.price_in_usd()?);
    let rx = Balance::<Planck>::from_planck(pool.liquidity[0], x_token.clone()).to_unit();
    let ry = Balance::<Planck>::from_planck(pool.liquidity[1], y_token.clone()).to_unit();
    use num_traits::ToPrimitive;
    Some(rx.value().to_f64()? * px + ry.value().to_f64()? * py)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ChainToken;

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

    fn pool(key: &str, liquidity: [u128; 2]) -> LiquidityPool {
        LiquidityPool {
            lp_token: token(99, 6),
            pool_key: PoolKey::parse(key).unwrap(),
            liquidity,
            liquidity_in_usd: None,
        }
    }

    #[test]
    fn test_find_pool_both_orderings() {
        let pools = vec![pool("2-1124", [100, 200])];
        let a = token(2, 6);
        let b = token(1124, 6);

        let (_, direct) = find_pool(&pools, &a, &b).unwrap();
        assert_eq!(direct, Orientation::Direct);

        let (_, flipped) = find_pool(&pools, &b, &a).unwrap();
        assert_eq!(flipped, Orientation::Flipped);

        assert!(find_pool(&pools, &token(3, 6), &b).is_none());
    }

    #[test]
    fn test_has_liquidity_requires_both_reserves() {
        assert!(pool("1-2", [1, 1]).has_liquidity());
        assert!(!pool("1-2", [0, 1]).has_liquidity());
        assert!(!pool("1-2", [1, 0]).has_liquidity());
    }

    #[test]
    fn test_derive_position_share() {
        let lp = token(99, 6);
        let position = derive_position(&lp, 250, 1000).unwrap();
        assert_eq!(position.pool_share, BigDecimal::from(25));
    }

    #[test]
    fn test_derive_position_absent_without_balance() {
        let lp = token(99, 6);
        assert!(derive_position(&lp, 0, 1000).is_none());
        assert!(derive_position(&lp, 10, 0).is_none());
    }

    #[test]
    fn test_derive_pool_balances_proportional() {
        let p = pool("2-1124", [1_000, 4_000]);
        let x = token(2, 6);
        let y = token(1124, 6);
        let position = derive_position(&p.lp_token.clone(), 100, 400).unwrap(); // 25%

        let balances =
            derive_pool_balances(&p, Orientation::Direct, &x, &y, Some(&position)).unwrap();
        assert_eq!(balances.x.balance.value(), &big_decimal(250));
        assert_eq!(balances.y.balance.value(), &big_decimal(1_000));
        assert_eq!(balances.x.liquidity.value(), &big_decimal(1_000));
    }

    #[test]
    fn test_derive_pool_balances_flipped_sides() {
        let p = pool("2-1124", [1_000, 4_000]);
        let x = token(1124, 6);
        let y = token(2, 6);
        let position = derive_position(&p.lp_token.clone(), 100, 400).unwrap();

        let balances =
            derive_pool_balances(&p, Orientation::Flipped, &x, &y, Some(&position)).unwrap();
        // x is the key's second component, so it draws from liquidity[1]
        assert_eq!(balances.x.liquidity.value(), &big_decimal(4_000));
        assert_eq!(balances.y.liquidity.value(), &big_decimal(1_000));
    }

    #[test]
    fn test_derive_pool_balances_none_without_position() {
        let p = pool("2-1124", [1_000, 4_000]);
        let x = token(2, 6);
        let y = token(1124, 6);
        assert!(derive_pool_balances(&p, Orientation::Direct, &x, &y, None).is_none());
    }
}
