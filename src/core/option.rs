//! Option contract definitions
//!
//! An [`OptionContract`] is a validated, immutable snapshot of the market and
//! contract inputs needed to value one European option. Scenario sweeps never
//! mutate a contract; they derive a new snapshot per grid point.

use serde::{Deserialize, Serialize};

use super::error::{PricerError, PricerResult};
use super::surface::ScenarioPoint;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

/// Raw contract parameters, as collected from a form or a config file.
///
/// Nothing is validated here; convert into an [`OptionContract`] to price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractParams {
    /// Current underlying price (S)
    pub spot: f64,
    /// Strike price (K)
    pub strike: f64,
    /// Time to maturity in years (T)
    pub time: f64,
    /// Risk-free rate, continuously compounded (r)
    pub rate: f64,
    /// Volatility (sigma)
    pub vol: f64,
    /// Premium paid to acquire the option
    pub purchase_price: f64,
}

impl Default for ContractParams {
    fn default() -> Self {
        Self {
            spot: 60.0,
            strike: 65.0,
            time: 0.25,
            rate: 0.08,
            vol: 0.30,
            purchase_price: 0.0,
        }
    }
}

impl TryFrom<ContractParams> for OptionContract {
    type Error = PricerError;

    fn try_from(p: ContractParams) -> PricerResult<Self> {
        OptionContract::new(p.spot, p.strike, p.time, p.rate, p.vol, p.purchase_price)
    }
}

/// Validated European option snapshot
///
/// Invariant: `spot`, `strike`, `time` and `vol` are finite and strictly
/// positive; `rate` and `purchase_price` are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContractParams", into = "ContractParams")]
pub struct OptionContract {
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    purchase_price: f64,
}

impl From<OptionContract> for ContractParams {
    fn from(c: OptionContract) -> Self {
        Self {
            spot: c.spot,
            strike: c.strike,
            time: c.time,
            rate: c.rate,
            vol: c.vol,
            purchase_price: c.purchase_price,
        }
    }
}

impl OptionContract {
    /// Create a contract, rejecting inputs outside the Black-Scholes domain
    pub fn new(
        spot: f64,
        strike: f64,
        time: f64,
        rate: f64,
        vol: f64,
        purchase_price: f64,
    ) -> PricerResult<Self> {
        check_positive("spot", spot)?;
        check_positive("strike", strike)?;
        check_positive("time to maturity", time)?;
        check_positive("volatility", vol)?;
        check_finite("rate", rate)?;
        check_finite("purchase price", purchase_price)?;

        Ok(Self {
            spot,
            strike,
            time,
            rate,
            vol,
            purchase_price,
        })
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn vol(&self) -> f64 {
        self.vol
    }

    pub fn purchase_price(&self) -> f64 {
        self.purchase_price
    }

    /// Snapshot at a different spot
    pub fn with_spot(&self, spot: f64) -> PricerResult<Self> {
        check_positive("spot", spot)?;
        Ok(Self { spot, ..*self })
    }

    /// Snapshot at a different strike
    pub fn with_strike(&self, strike: f64) -> PricerResult<Self> {
        check_positive("strike", strike)?;
        Ok(Self { strike, ..*self })
    }

    /// Snapshot at a different volatility
    pub fn with_vol(&self, vol: f64) -> PricerResult<Self> {
        check_positive("volatility", vol)?;
        Ok(Self { vol, ..*self })
    }

    /// Snapshot at a different time to maturity
    pub fn with_time(&self, time: f64) -> PricerResult<Self> {
        check_positive("time to maturity", time)?;
        Ok(Self { time, ..*self })
    }

    /// Snapshot with a different acquisition cost
    pub fn with_purchase_price(&self, purchase_price: f64) -> PricerResult<Self> {
        check_finite("purchase price", purchase_price)?;
        Ok(Self {
            purchase_price,
            ..*self
        })
    }

    /// Fresh snapshot at a grid cell's spot, vol and maturity
    pub fn at(&self, point: &ScenarioPoint) -> PricerResult<Self> {
        check_positive("spot", point.spot)?;
        check_positive("volatility", point.vol)?;
        check_positive("time to maturity", point.time)?;
        Ok(Self {
            spot: point.spot,
            vol: point.vol,
            time: point.time,
            ..*self
        })
    }

    /// Discount factor e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.time).exp()
    }

    /// Present value of the strike: K e^(-rT)
    pub fn discounted_strike(&self) -> f64 {
        self.strike * self.discount_factor()
    }

    /// True when both contracts share maturity and rate
    pub fn same_calendar(&self, other: &OptionContract) -> bool {
        self.time == other.time && self.rate == other.rate
    }
}

fn check_positive(name: &str, value: f64) -> PricerResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PricerError::domain(format!(
            "{} must be finite and > 0, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_finite(name: &str, value: f64) -> PricerResult<()> {
    if !value.is_finite() {
        return Err(PricerError::domain(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.phi(), 1.0);
        assert_eq!(OptionType::Put.phi(), -1.0);

        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        assert!(OptionContract::new(0.0, 65.0, 0.25, 0.08, 0.3, 0.0)
            .unwrap_err()
            .is_domain());
        assert!(OptionContract::new(60.0, -1.0, 0.25, 0.08, 0.3, 0.0).is_err());
        assert!(OptionContract::new(60.0, 65.0, 0.0, 0.08, 0.3, 0.0).is_err());
        assert!(OptionContract::new(60.0, 65.0, 0.25, 0.08, 0.0, 0.0).is_err());
        assert!(OptionContract::new(60.0, 65.0, 0.25, f64::NAN, 0.3, 0.0).is_err());
        assert!(OptionContract::new(f64::INFINITY, 65.0, 0.25, 0.08, 0.3, 0.0).is_err());

        // Negative rates are allowed
        assert!(OptionContract::new(60.0, 65.0, 0.25, -0.01, 0.3, 0.0).is_ok());
    }

    #[test]
    fn test_overrides_leave_original_untouched() {
        let base = OptionContract::try_from(ContractParams::default()).unwrap();
        let bumped = base.with_spot(70.0).unwrap().with_vol(0.5).unwrap();

        assert_eq!(base.spot(), 60.0);
        assert_eq!(base.vol(), 0.30);
        assert_eq!(bumped.spot(), 70.0);
        assert_eq!(bumped.vol(), 0.5);
        assert!(base.same_calendar(&bumped));

        assert!(base.with_spot(-5.0).unwrap_err().is_domain());
        assert!(base.with_time(0.0).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let ok: OptionContract = serde_json::from_str(
            r#"{"spot":60.0,"strike":65.0,"time":0.25,"rate":0.08,"vol":0.3,"purchase_price":2.0}"#,
        )
        .unwrap();
        assert_eq!(ok.purchase_price(), 2.0);

        let bad = serde_json::from_str::<OptionContract>(
            r#"{"spot":60.0,"strike":65.0,"time":0.25,"rate":0.08,"vol":-0.3,"purchase_price":0.0}"#,
        );
        assert!(bad.is_err());
    }
}
