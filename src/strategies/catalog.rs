//! Named strategy catalog
//!
//! Each [`StrategyKind`] derives its secondary strikes from a spread
//! percentage around the base strike and builds a [`Strategy`] with premiums
//! defaulted to the Black-Scholes price of each leg.

use serde::{Deserialize, Serialize};

use super::{Direction, PayoffConvention, StockLeg, Strategy, StrategyLeg};
use crate::core::{ContractParams, OptionContract, OptionType, PricerError, PricerResult};
use crate::models::black_scholes;

/// The eight supported strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    CoveredCall,
    ProtectivePut,
    BullSpread,
    BearSpread,
    LongButterfly,
    ShortButterfly,
    Straddle,
    Strangle,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 8] = [
        StrategyKind::CoveredCall,
        StrategyKind::ProtectivePut,
        StrategyKind::BullSpread,
        StrategyKind::BearSpread,
        StrategyKind::LongButterfly,
        StrategyKind::ShortButterfly,
        StrategyKind::Straddle,
        StrategyKind::Strangle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::CoveredCall => "Covered Call",
            StrategyKind::ProtectivePut => "Protective Put",
            StrategyKind::BullSpread => "Bull Spread",
            StrategyKind::BearSpread => "Bear Spread",
            StrategyKind::LongButterfly => "Long Butterfly",
            StrategyKind::ShortButterfly => "Short Butterfly",
            StrategyKind::Straddle => "Straddle",
            StrategyKind::Strangle => "Strangle",
        }
    }

    /// Market view the strategy expresses
    pub fn outlook(&self) -> &'static str {
        match self {
            StrategyKind::CoveredCall => "neutral to mildly bullish; collect premium, cap upside",
            StrategyKind::ProtectivePut => "bullish with downside insurance",
            StrategyKind::BullSpread => "moderately bullish, up to the higher strike",
            StrategyKind::BearSpread => "moderately bearish, down to the lower strike",
            StrategyKind::LongButterfly => "low volatility; price pinned near the middle strike",
            StrategyKind::ShortButterfly => "high volatility; price leaves the wing band",
            StrategyKind::Straddle => "long: large move either way; short: price stays put",
            StrategyKind::Strangle => "long: very large move either way; short: range-bound",
        }
    }

    /// Number of option legs the strategy is built from
    pub fn leg_count(&self) -> usize {
        match self {
            StrategyKind::CoveredCall | StrategyKind::ProtectivePut => 1,
            StrategyKind::BullSpread
            | StrategyKind::BearSpread
            | StrategyKind::Straddle
            | StrategyKind::Strangle => 2,
            StrategyKind::LongButterfly | StrategyKind::ShortButterfly => 3,
        }
    }

    /// Leg layout: (strike, type, quantity) in leg order
    fn layout(&self, params: &StrategyParams) -> Vec<(f64, OptionType, i32)> {
        let k = params.contract.strike;
        let (lower, upper) = params.wing_strikes();
        let ty = params.construction;
        let sign = params.direction.sign();

        match self {
            StrategyKind::CoveredCall => vec![(k, OptionType::Call, -1)],
            StrategyKind::ProtectivePut => vec![(k, OptionType::Put, 1)],
            StrategyKind::BullSpread => vec![(lower, ty, 1), (upper, ty, -1)],
            StrategyKind::BearSpread => vec![(lower, ty, -1), (upper, ty, 1)],
            StrategyKind::LongButterfly => {
                let middle = 0.5 * (lower + upper);
                vec![(lower, ty, 1), (middle, ty, -2), (upper, ty, 1)]
            }
            StrategyKind::ShortButterfly => {
                let middle = 0.5 * (lower + upper);
                vec![(lower, ty, -1), (middle, ty, 2), (upper, ty, -1)]
            }
            StrategyKind::Straddle => {
                vec![(k, OptionType::Call, sign), (k, OptionType::Put, sign)]
            }
            StrategyKind::Strangle => {
                vec![(upper, OptionType::Call, sign), (lower, OptionType::Put, sign)]
            }
        }
    }

    /// Strikes the strategy trades, in leg order
    pub fn strikes(&self, params: &StrategyParams) -> Vec<f64> {
        self.layout(params).into_iter().map(|(k, _, _)| k).collect()
    }

    fn convention(&self) -> PayoffConvention {
        match self {
            StrategyKind::CoveredCall | StrategyKind::ProtectivePut => PayoffConvention::MarkToModel,
            _ => PayoffConvention::IntrinsicAtExpiry,
        }
    }

    /// Display name including the construction or direction, e.g. "Bull Put Spread"
    pub fn title(&self, params: &StrategyParams) -> String {
        let ty = match params.construction {
            OptionType::Call => "Call",
            OptionType::Put => "Put",
        };
        match self {
            StrategyKind::BullSpread => format!("Bull {} Spread", ty),
            StrategyKind::BearSpread => format!("Bear {} Spread", ty),
            StrategyKind::LongButterfly => format!("Long {} Butterfly", ty),
            StrategyKind::ShortButterfly => format!("Short {} Butterfly", ty),
            StrategyKind::Straddle | StrategyKind::Strangle => {
                format!("{} {}", params.direction.label(), self.name())
            }
            _ => self.name().to_string(),
        }
    }

    /// Build the strategy from per-invocation parameters
    pub fn build(&self, params: &StrategyParams) -> PricerResult<Strategy> {
        params.validate()?;
        let base = OptionContract::try_from(params.contract)?;
        let layout = self.layout(params);

        if let Some(premiums) = &params.premiums {
            if premiums.len() != self.leg_count() {
                return Err(PricerError::invalid_input(format!(
                    "{} takes {} premiums, got {}",
                    self.name(),
                    self.leg_count(),
                    premiums.len()
                )));
            }
        }

        let legs = layout
            .iter()
            .enumerate()
            .map(|(i, &(strike, option_type, quantity))| -> PricerResult<StrategyLeg> {
                let unpriced = base.with_strike(strike)?;
                let premium = match &params.premiums {
                    Some(premiums) => premiums[i],
                    None => black_scholes::price(&unpriced, option_type),
                };
                let contract = unpriced.with_purchase_price(premium)?;
                Ok(StrategyLeg::new(contract, option_type, quantity, self.convention()))
            })
            .collect::<PricerResult<Vec<_>>>()?;

        let strategy = Strategy::new(self.title(params), legs)?;
        Ok(match self {
            StrategyKind::CoveredCall | StrategyKind::ProtectivePut => {
                strategy.with_stock(StockLeg::long(base.spot()))
            }
            _ => strategy,
        })
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-invocation strategy inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Base market and strike; `purchase_price` is ignored
    pub contract: ContractParams,
    /// Distance of the wing strikes from the base strike, in percent
    pub spread_pct: f64,
    /// Option type of spread and butterfly legs
    pub construction: OptionType,
    /// Long or short straddle/strangle
    pub direction: Direction,
    /// Premium per leg in leg order; model prices when absent
    pub premiums: Option<Vec<f64>>,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            contract: ContractParams::default(),
            spread_pct: 5.0,
            construction: OptionType::Call,
            direction: Direction::Long,
            premiums: None,
        }
    }
}

impl StrategyParams {
    pub fn new(contract: ContractParams) -> Self {
        Self {
            contract,
            ..Default::default()
        }
    }

    pub fn with_spread_pct(mut self, spread_pct: f64) -> Self {
        self.spread_pct = spread_pct;
        self
    }

    pub fn with_construction(mut self, construction: OptionType) -> Self {
        self.construction = construction;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_premiums(mut self, premiums: Vec<f64>) -> Self {
        self.premiums = Some(premiums);
        self
    }

    /// (K·(1 − pct/100), K·(1 + pct/100))
    pub fn wing_strikes(&self) -> (f64, f64) {
        let k = self.contract.strike;
        let pct = self.spread_pct / 100.0;
        (k * (1.0 - pct), k * (1.0 + pct))
    }

    fn validate(&self) -> PricerResult<()> {
        if !self.spread_pct.is_finite() || self.spread_pct < 0.0 || self.spread_pct >= 100.0 {
            return Err(PricerError::invalid_input(format!(
                "spread percentage must be in [0, 100), got {}",
                self.spread_pct
            )));
        }
        if let Some(bad) = self.premiums.iter().flatten().find(|p| !p.is_finite()) {
            return Err(PricerError::invalid_input(format!("premium must be finite, got {}", bad)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_butterfly_strikes() {
        let params = StrategyParams::default();
        let strikes = StrategyKind::LongButterfly.strikes(&params);
        assert_relative_eq!(strikes[0], 61.75, epsilon = 1e-12);
        assert_relative_eq!(strikes[1], 65.0, epsilon = 1e-12);
        assert_relative_eq!(strikes[2], 68.25, epsilon = 1e-12);
    }

    #[test]
    fn test_every_kind_builds_with_defaults() {
        let params = StrategyParams::default();
        for kind in StrategyKind::ALL {
            let strategy = kind.build(&params).unwrap();
            assert_eq!(strategy.legs().len(), kind.leg_count(), "{}", kind);
            assert!(strategy.greeks().is_finite());
        }
    }

    #[test]
    fn test_default_premiums_are_model_prices() {
        let strategy = StrategyKind::Straddle.build(&StrategyParams::default()).unwrap();
        assert_relative_eq!(strategy.legs()[0].premium(), 2.133_368_444_916_204, epsilon = 1e-8);
        assert_relative_eq!(strategy.legs()[1].premium(), 5.846_282_209_855_296, epsilon = 1e-8);
        assert_relative_eq!(
            strategy.net_premium(),
            2.133_368_444_916_204 + 5.846_282_209_855_296,
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_short_straddle_mirrors_long() {
        let long = StrategyKind::Straddle.build(&StrategyParams::default()).unwrap();
        let short = StrategyKind::Straddle
            .build(&StrategyParams::default().with_direction(Direction::Short))
            .unwrap();
        assert_eq!(short.name(), "Short Straddle");
        for spot in [40.0, 65.0, 90.0] {
            assert_relative_eq!(short.expiry_profit(spot), -long.expiry_profit(spot), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_bear_spread_inverts_bull() {
        let params = StrategyParams::default()
            .with_construction(OptionType::Put)
            .with_premiums(vec![3.0, 6.0]);
        let bull = StrategyKind::BullSpread.build(&params).unwrap();
        let bear = StrategyKind::BearSpread.build(&params).unwrap();
        assert_eq!(bull.name(), "Bull Put Spread");
        assert_relative_eq!(bull.greeks().delta, -bear.greeks().delta, epsilon = 1e-12);
        assert_relative_eq!(bull.net_premium(), -3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_covered_call_has_stock() {
        let strategy = StrategyKind::CoveredCall.build(&StrategyParams::default()).unwrap();
        assert_eq!(strategy.stock().unwrap().entry_price, 60.0);
        assert_eq!(strategy.legs()[0].quantity, -1);
        assert_eq!(strategy.legs()[0].convention, PayoffConvention::MarkToModel);
    }

    #[test]
    fn test_rejects_bad_params() {
        let wrong_count = StrategyParams::default().with_premiums(vec![1.0]);
        assert!(matches!(
            StrategyKind::Strangle.build(&wrong_count),
            Err(PricerError::InvalidInput(_))
        ));
        let two = StrategyParams::default().with_premiums(vec![1.0, 2.0]);
        let err = StrategyKind::LongButterfly.build(&two).unwrap_err();
        assert!(err.to_string().contains("takes 3 premiums, got 2"), "{}", err);

        let wide = StrategyParams::default().with_spread_pct(100.0);
        assert!(StrategyKind::BullSpread.build(&wide).is_err());

        let mut bad_market = StrategyParams::default();
        bad_market.contract.vol = 0.0;
        assert!(StrategyKind::Straddle.build(&bad_market).unwrap_err().is_domain());
    }
}
