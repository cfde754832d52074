//! Per-unit payoff functions
//!
//! Two conventions coexist:
//! - mark-to-model: the option is repriced at the scenario market and the loss
//!   is floored at the premium paid
//! - intrinsic-at-expiry: expiration value net of the premium

use serde::{Deserialize, Serialize};

use crate::core::{OptionContract, OptionType, PricerResult, ScenarioPoint};
use crate::models::black_scholes;

/// How a leg is valued on a scenario surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffConvention {
    /// Current Black-Scholes value minus premium, floored at the premium
    MarkToModel,
    /// Intrinsic value minus the premium paid for entry
    IntrinsicAtExpiry,
}

/// Intrinsic value at `spot` net of `premium`, for one long unit
pub fn intrinsic_profit(option_type: OptionType, spot: f64, strike: f64, premium: f64) -> f64 {
    option_type.intrinsic(spot, strike) - premium
}

/// Model value of an already repriced snapshot net of `premium`, for one long unit
pub fn mark_to_model_profit(snapshot: &OptionContract, option_type: OptionType, premium: f64) -> f64 {
    (black_scholes::price(snapshot, option_type) - premium).max(-premium)
}

/// P&L of one unit of underlying bought at `entry`
pub fn stock_profit(spot: f64, entry: f64) -> f64 {
    spot - entry
}

/// Profit of one long unit of `contract` at a scenario point
///
/// Mark-to-model reprices at the point and uses the contract's fixed premium.
/// Intrinsic legs on a surface are entered at the scenario market, so the
/// premium is the model value at the point.
pub fn scenario_unit_profit(
    contract: &OptionContract,
    option_type: OptionType,
    convention: PayoffConvention,
    point: &ScenarioPoint,
) -> PricerResult<f64> {
    let snapshot = contract.at(point)?;
    Ok(match convention {
        PayoffConvention::MarkToModel => {
            mark_to_model_profit(&snapshot, option_type, contract.purchase_price())
        }
        PayoffConvention::IntrinsicAtExpiry => {
            let entry = black_scholes::price(&snapshot, option_type);
            intrinsic_profit(option_type, point.spot, contract.strike(), entry)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic_profit() {
        assert_eq!(intrinsic_profit(OptionType::Call, 70.0, 65.0, 2.0), 3.0);
        assert_eq!(intrinsic_profit(OptionType::Call, 60.0, 65.0, 2.0), -2.0);
        assert_eq!(intrinsic_profit(OptionType::Put, 60.0, 65.0, 2.0), 3.0);
    }

    #[test]
    fn test_mark_to_model_matches_calculate_payoff() {
        let c = OptionContract::new(60.0, 65.0, 0.25, 0.08, 0.3, 2.5).unwrap();
        let point = ScenarioPoint::new(66.0, 0.3, 0.25);

        let via_point =
            scenario_unit_profit(&c, OptionType::Put, PayoffConvention::MarkToModel, &point).unwrap();
        let direct = black_scholes::calculate_payoff(&c, 66.0, OptionType::Put).unwrap();
        assert!((via_point - direct).abs() < 1e-12);
    }

    #[test]
    fn test_intrinsic_surface_enters_at_model_price() {
        let c = OptionContract::new(60.0, 65.0, 0.25, 0.08, 0.3, 100.0).unwrap();
        let point = ScenarioPoint::new(70.0, 0.45, 0.25);

        let p = scenario_unit_profit(&c, OptionType::Call, PayoffConvention::IntrinsicAtExpiry, &point)
            .unwrap();
        let snapshot = c.at(&point).unwrap();
        let expected = 5.0 - black_scholes::call_price(&snapshot);
        assert!((p - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_point_is_domain_error() {
        let c = OptionContract::new(60.0, 65.0, 0.25, 0.08, 0.3, 1.0).unwrap();
        let point = ScenarioPoint::new(60.0, 0.0, 0.25);
        let err = scenario_unit_profit(&c, OptionType::Call, PayoffConvention::MarkToModel, &point)
            .unwrap_err();
        assert!(err.is_domain());
    }
}
