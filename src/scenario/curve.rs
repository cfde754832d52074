//! 1D profit-at-expiry curves

use serde::{Deserialize, Serialize};

use crate::core::{AxisKind, PricerError, PricerResult, ScenarioAxis};
use crate::strategies::Strategy;

/// Profit of one leg along the curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// Strategy profit at expiry over a spot sweep, with each component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitCurve {
    pub spots: Vec<f64>,
    pub total: Vec<f64>,
    pub legs: Vec<LegSeries>,
    pub stock: Option<Vec<f64>>,
}

impl ProfitCurve {
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Highest total profit on the sweep
    pub fn max_profit(&self) -> f64 {
        self.total.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Lowest total profit on the sweep (negative for a loss)
    pub fn max_loss(&self) -> f64 {
        self.total.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Spots where total profit crosses zero, linearly interpolated
    pub fn breakevens(&self) -> Vec<f64> {
        let mut out = Vec::new();
        for i in 0..self.total.len() {
            let p0 = self.total[i];
            if p0 == 0.0 {
                out.push(self.spots[i]);
                continue;
            }
            if let Some(&p1) = self.total.get(i + 1) {
                if p1 != 0.0 && p0.signum() != p1.signum() {
                    let (s0, s1) = (self.spots[i], self.spots[i + 1]);
                    out.push(s0 + (s1 - s0) * p0 / (p0 - p1));
                }
            }
        }
        out
    }
}

/// Profit at expiry over `points` evenly spaced spots in `[min, max]`
pub fn profit_curve(
    strategy: &Strategy,
    min: f64,
    max: f64,
    points: usize,
) -> PricerResult<ProfitCurve> {
    let axis = ScenarioAxis::linspace(AxisKind::Spot, min, max, points)?;
    profit_curve_on(strategy, &axis)
}

/// Profit at expiry at every point of a spot axis
pub fn profit_curve_on(strategy: &Strategy, axis: &ScenarioAxis) -> PricerResult<ProfitCurve> {
    if axis.kind() != AxisKind::Spot {
        return Err(PricerError::invalid_input(format!(
            "profit curves sweep spot, got {}",
            axis.kind().label()
        )));
    }
    if axis.min() <= 0.0 {
        return Err(PricerError::domain(format!(
            "curve spots must be > 0, got {}",
            axis.min()
        )));
    }
    let spots = axis.points().to_vec();

    let total: Vec<f64> = spots.iter().map(|&s| strategy.expiry_profit(s)).collect();
    let legs = strategy
        .legs()
        .iter()
        .map(|leg| LegSeries {
            label: leg.describe(),
            values: spots.iter().map(|&s| leg.expiry_profit(s)).collect(),
        })
        .collect();
    let stock = strategy
        .stock()
        .map(|stock| spots.iter().map(|&s| stock.profit(s)).collect());

    Ok(ProfitCurve {
        spots,
        total,
        legs,
        stock,
    })
}
