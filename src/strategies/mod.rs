//! Option Strategies
//!
//! A [`Strategy`] is an ordered set of option legs, optionally combined with a
//! stock position. Greeks, premiums and profits of a strategy are the
//! quantity-weighted sum of per-leg values, computed by one reducer
//! ([`Strategy::weighted_sum`]) parameterized by the per-leg function.
//!
//! - `payoff`: per-unit profit under each payoff convention
//! - `catalog`: the eight named strategies and their default construction

mod catalog;
mod payoff;

pub use catalog::*;
pub use payoff::*;

use serde::{Deserialize, Serialize};

use crate::core::{
    Greeks, GreekKind, OptionContract, OptionType, PricerError, PricerResult, ScenarioPoint,
};
use crate::models::black_scholes;

/// Long or short
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Long,
    Short,
}

impl Direction {
    pub fn sign(&self) -> i32 {
        match self {
            Direction::Long => 1,
            Direction::Short => -1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }
}

/// One option position inside a strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyLeg {
    /// Contract; its purchase price is the leg premium
    pub contract: OptionContract,
    pub option_type: OptionType,
    /// Signed size: +1 long, -1 short, -2 for a doubled short leg
    pub quantity: i32,
    pub convention: PayoffConvention,
}

impl StrategyLeg {
    pub fn new(
        contract: OptionContract,
        option_type: OptionType,
        quantity: i32,
        convention: PayoffConvention,
    ) -> Self {
        Self {
            contract,
            option_type,
            quantity,
            convention,
        }
    }

    pub fn strike(&self) -> f64 {
        self.contract.strike()
    }

    pub fn premium(&self) -> f64 {
        self.contract.purchase_price()
    }

    pub fn weight(&self) -> f64 {
        self.quantity as f64
    }

    /// Greeks of one long unit
    pub fn unit_greeks(&self) -> Greeks {
        black_scholes::greeks(&self.contract, self.option_type)
    }

    /// Greeks of the whole leg (unit Greeks × quantity)
    pub fn greeks(&self) -> Greeks {
        self.unit_greeks().scale(self.weight())
    }

    /// Expiration profit of the whole leg at `spot`, against its fixed premium
    pub fn expiry_profit(&self, spot: f64) -> f64 {
        self.weight() * intrinsic_profit(self.option_type, spot, self.strike(), self.premium())
    }

    /// Profit of the whole leg at a scenario point, under the leg's convention
    pub fn scenario_profit(&self, point: &ScenarioPoint) -> PricerResult<f64> {
        let unit = scenario_unit_profit(&self.contract, self.option_type, self.convention, point)?;
        Ok(self.weight() * unit)
    }

    /// e.g. "short 2 call @ 65.00"
    pub fn describe(&self) -> String {
        let side = if self.quantity >= 0 { "long" } else { "short" };
        format!(
            "{} {} {} @ {:.2}",
            side,
            self.quantity.abs(),
            self.option_type.label(),
            self.strike()
        )
    }
}

/// Linear position in the underlying
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockLeg {
    pub entry_price: f64,
    pub quantity: i32,
}

impl StockLeg {
    pub fn long(entry_price: f64) -> Self {
        Self {
            entry_price,
            quantity: 1,
        }
    }

    pub fn profit(&self, spot: f64) -> f64 {
        self.quantity as f64 * stock_profit(spot, self.entry_price)
    }

    /// Delta of the stock position; all other Greeks are zero
    pub fn delta(&self) -> f64 {
        self.quantity as f64
    }
}

/// Ordered set of legs evaluated under a shared calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StrategyFields")]
pub struct Strategy {
    name: String,
    legs: Vec<StrategyLeg>,
    stock: Option<StockLeg>,
}

/// Unvalidated strategy, as read from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyFields {
    pub name: String,
    pub legs: Vec<StrategyLeg>,
    #[serde(default)]
    pub stock: Option<StockLeg>,
}

impl TryFrom<StrategyFields> for Strategy {
    type Error = PricerError;

    fn try_from(fields: StrategyFields) -> PricerResult<Self> {
        let strategy = Strategy::new(fields.name, fields.legs)?;
        Ok(match fields.stock {
            Some(stock) => strategy.with_stock(stock),
            None => strategy,
        })
    }
}

impl Strategy {
    /// Build a strategy; all legs must share maturity and rate
    pub fn new(name: impl Into<String>, legs: Vec<StrategyLeg>) -> PricerResult<Self> {
        let name = name.into();
        let first = legs
            .first()
            .ok_or_else(|| PricerError::invalid_input(format!("{}: strategy has no legs", name)))?;

        if let Some(bad) = legs.iter().find(|l| !l.contract.same_calendar(&first.contract)) {
            return Err(PricerError::invalid_input(format!(
                "{}: leg {} has T={}, r={} but first leg has T={}, r={}",
                name,
                bad.describe(),
                bad.contract.time(),
                bad.contract.rate(),
                first.contract.time(),
                first.contract.rate()
            )));
        }
        let off_market = |l: &&StrategyLeg| {
            l.contract.spot() != first.contract.spot() || l.contract.vol() != first.contract.vol()
        };
        if let Some(bad) = legs.iter().find(off_market) {
            return Err(PricerError::invalid_input(format!(
                "{}: leg {} is not priced at the common spot/vol",
                name,
                bad.describe()
            )));
        }

        Ok(Self {
            name,
            legs,
            stock: None,
        })
    }

    /// Single long option, marked to model
    pub fn single(contract: OptionContract, option_type: OptionType) -> Self {
        let name = match option_type {
            OptionType::Call => "Long Call",
            OptionType::Put => "Long Put",
        };
        Self {
            name: name.to_string(),
            legs: vec![StrategyLeg::new(contract, option_type, 1, PayoffConvention::MarkToModel)],
            stock: None,
        }
    }

    /// Add a stock position
    pub fn with_stock(mut self, stock: StockLeg) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn legs(&self) -> &[StrategyLeg] {
        &self.legs
    }

    pub fn stock(&self) -> Option<&StockLeg> {
        self.stock.as_ref()
    }

    /// Common market of all legs (spot, vol, maturity)
    pub fn base_point(&self) -> ScenarioPoint {
        ScenarioPoint::of(&self.legs[0].contract)
    }

    /// Distinct strikes in leg order
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = Vec::with_capacity(self.legs.len());
        for leg in &self.legs {
            if !strikes.contains(&leg.strike()) {
                strikes.push(leg.strike());
            }
        }
        strikes
    }

    /// Σ quantity · f(leg) over all option legs
    pub fn weighted_sum<F>(&self, f: F) -> f64
    where
        F: Fn(&StrategyLeg) -> f64,
    {
        self.legs.iter().map(|leg| leg.weight() * f(leg)).sum()
    }

    /// Fallible variant of [`Strategy::weighted_sum`]; stops at the first error
    pub fn try_weighted_sum<F>(&self, f: F) -> PricerResult<f64>
    where
        F: Fn(&StrategyLeg) -> PricerResult<f64>,
    {
        self.legs
            .iter()
            .try_fold(0.0, |acc, leg| -> PricerResult<f64> {
                Ok(acc + leg.weight() * f(leg)?)
            })
    }

    /// Combined Greeks: signed sum of leg Greeks plus the stock's delta
    pub fn greeks(&self) -> Greeks {
        let mut total = Greeks::new(
            self.greek(GreekKind::Delta),
            self.greek(GreekKind::Gamma),
            self.greek(GreekKind::Vega),
            self.greek(GreekKind::Rho),
            self.greek(GreekKind::Theta),
        );
        if let Some(stock) = &self.stock {
            total.delta += stock.delta();
        }
        total
    }

    /// Options-only combined value of a single Greek
    pub fn greek(&self, kind: GreekKind) -> f64 {
        self.weighted_sum(|leg| leg.unit_greeks().get(kind))
    }

    /// Σ quantity · premium; positive is a net debit
    pub fn net_premium(&self) -> f64 {
        self.weighted_sum(|leg| leg.premium())
    }

    /// Profit at expiry for terminal `spot`, using each leg's fixed premium
    pub fn expiry_profit(&self, spot: f64) -> f64 {
        let options = self.weighted_sum(|leg| {
            intrinsic_profit(leg.option_type, spot, leg.strike(), leg.premium())
        });
        options + self.stock_profit(spot)
    }

    /// Profit at a scenario point, each leg under its own convention
    pub fn scenario_profit(&self, point: &ScenarioPoint) -> PricerResult<f64> {
        let options = self.try_weighted_sum(|leg| {
            scenario_unit_profit(&leg.contract, leg.option_type, leg.convention, point)
        })?;
        Ok(options + self.stock_profit(point.spot))
    }

    pub fn stock_profit(&self, spot: f64) -> f64 {
        self.stock.map(|s| s.profit(spot)).unwrap_or(0.0)
    }
}
