//! Scenario Grids
//!
//! A [`ScenarioGrid`] pairs a spot axis (columns) with a volatility or
//! time-to-maturity axis (rows). Every cell is evaluated on its own
//! [`ScenarioPoint`]; nothing is shared between cells, so the sequential and
//! rayon sweeps produce identical surfaces.

mod curve;

pub use curve::*;

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    AxisKind, GreekKind, OptionContract, OptionType, PricerError, PricerResult, ScenarioAxis,
    ScenarioPoint, ScenarioSurface,
};
use crate::models::black_scholes;
use crate::strategies::{scenario_unit_profit, PayoffConvention, Strategy};

/// Sweep ranges and resolutions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub spot_min: f64,
    pub spot_max: f64,
    pub vol_min: f64,
    pub vol_max: f64,
    pub time_min: f64,
    pub time_max: f64,
    /// Columns of a surface
    pub spot_points: usize,
    /// Rows of a surface
    pub y_points: usize,
    /// Resolution of 1D profit curves
    pub curve_points: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spot_min: 48.0,
            spot_max: 81.0,
            vol_min: 0.15,
            vol_max: 0.45,
            time_min: 0.125,
            time_max: 0.375,
            spot_points: 10,
            y_points: 10,
            curve_points: 100,
        }
    }
}

impl GridConfig {
    /// Ranges centered on a contract: spot [0.8·S, 1.35·S], vol [0.5·σ, 1.5·σ], time [0.5·T, 1.5·T]
    pub fn around(contract: &OptionContract) -> Self {
        Self {
            spot_min: 0.8 * contract.spot(),
            spot_max: 1.35 * contract.spot(),
            vol_min: 0.5 * contract.vol(),
            vol_max: 1.5 * contract.vol(),
            time_min: 0.5 * contract.time(),
            time_max: 1.5 * contract.time(),
            ..Default::default()
        }
    }

    pub fn spot_axis(&self) -> PricerResult<ScenarioAxis> {
        ScenarioAxis::linspace(AxisKind::Spot, self.spot_min, self.spot_max, self.spot_points)
    }

    pub fn vol_axis(&self) -> PricerResult<ScenarioAxis> {
        ScenarioAxis::linspace(AxisKind::Volatility, self.vol_min, self.vol_max, self.y_points)
    }

    pub fn time_axis(&self) -> PricerResult<ScenarioAxis> {
        ScenarioAxis::linspace(
            AxisKind::TimeToMaturity,
            self.time_min,
            self.time_max,
            self.y_points,
        )
    }

    /// Fine spot axis for profit curves
    pub fn curve_axis(&self) -> PricerResult<ScenarioAxis> {
        ScenarioAxis::linspace(AxisKind::Spot, self.spot_min, self.spot_max, self.curve_points)
    }
}

/// Spot × (volatility | time) evaluation grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridAxes")]
pub struct ScenarioGrid {
    spot: ScenarioAxis,
    y: ScenarioAxis,
}

/// Unvalidated grid axes, as read from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct GridAxes {
    pub spot: ScenarioAxis,
    pub y: ScenarioAxis,
}

impl TryFrom<GridAxes> for ScenarioGrid {
    type Error = PricerError;

    fn try_from(axes: GridAxes) -> PricerResult<Self> {
        ScenarioGrid::new(axes.spot, axes.y)
    }
}

impl ScenarioGrid {
    /// `spot` must sweep spot and `y` must sweep volatility or time
    pub fn new(spot: ScenarioAxis, y: ScenarioAxis) -> PricerResult<Self> {
        if spot.kind() != AxisKind::Spot {
            return Err(PricerError::invalid_input(format!(
                "grid columns must sweep spot, got {}",
                spot.kind().label()
            )));
        }
        if y.kind() == AxisKind::Spot {
            return Err(PricerError::invalid_input(
                "grid rows must sweep volatility or time to maturity",
            ));
        }
        Ok(Self { spot, y })
    }

    pub fn spot_vol(config: &GridConfig) -> PricerResult<Self> {
        Self::new(config.spot_axis()?, config.vol_axis()?)
    }

    pub fn spot_time(config: &GridConfig) -> PricerResult<Self> {
        Self::new(config.spot_axis()?, config.time_axis()?)
    }

    pub fn spot_axis(&self) -> &ScenarioAxis {
        &self.spot
    }

    pub fn y_axis(&self) -> &ScenarioAxis {
        &self.y
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.y.len(), self.spot.len())
    }

    fn point(&self, base: ScenarioPoint, index: usize) -> ScenarioPoint {
        let cols = self.spot.len();
        let (row, col) = (index / cols, index % cols);
        base.with(AxisKind::Spot, self.spot.points()[col])
            .with(self.y.kind(), self.y.points()[row])
    }

    fn assemble(&self, cells: Vec<f64>) -> PricerResult<ScenarioSurface> {
        let values = Array2::from_shape_vec(self.shape(), cells)
            .map_err(|e| PricerError::numerical(e.to_string()))?;
        ScenarioSurface::new(self.spot.clone(), self.y.clone(), values)
    }

    /// Evaluate `f` at every cell, overriding the swept parameters of `base`
    pub fn evaluate_points<F>(&self, base: ScenarioPoint, f: F) -> PricerResult<ScenarioSurface>
    where
        F: Fn(&ScenarioPoint) -> PricerResult<f64>,
    {
        let (rows, cols) = self.shape();
        debug!(rows, cols, y = self.y.kind().label(), "evaluating scenario grid");

        let cells = (0..rows * cols)
            .map(|i| f(&self.point(base, i)))
            .collect::<PricerResult<Vec<f64>>>()?;
        self.assemble(cells)
    }

    /// Parallel [`ScenarioGrid::evaluate_points`]
    pub fn par_evaluate_points<F>(&self, base: ScenarioPoint, f: F) -> PricerResult<ScenarioSurface>
    where
        F: Fn(&ScenarioPoint) -> PricerResult<f64> + Sync,
    {
        let (rows, cols) = self.shape();
        debug!(
            rows,
            cols,
            threads = rayon::current_num_threads(),
            "evaluating scenario grid in parallel"
        );

        let cells = (0..rows * cols)
            .into_par_iter()
            .map(|i| f(&self.point(base, i)))
            .collect::<PricerResult<Vec<f64>>>()?;
        self.assemble(cells)
    }

    /// Evaluate `f` on a fresh contract snapshot per cell
    pub fn evaluate<F>(&self, base: &OptionContract, f: F) -> PricerResult<ScenarioSurface>
    where
        F: Fn(&OptionContract) -> PricerResult<f64>,
    {
        self.evaluate_points(ScenarioPoint::of(base), |p| f(&base.at(p)?))
    }

    /// Parallel [`ScenarioGrid::evaluate`]
    pub fn par_evaluate<F>(&self, base: &OptionContract, f: F) -> PricerResult<ScenarioSurface>
    where
        F: Fn(&OptionContract) -> PricerResult<f64> + Sync,
    {
        self.par_evaluate_points(ScenarioPoint::of(base), |p| f(&base.at(p)?))
    }
}

/// One Greek of `quantity` units at every cell
pub fn greek_surface(
    grid: &ScenarioGrid,
    contract: &OptionContract,
    option_type: OptionType,
    kind: GreekKind,
    quantity: f64,
) -> PricerResult<ScenarioSurface> {
    grid.evaluate(contract, |snapshot| {
        Ok(black_scholes::greeks(snapshot, option_type).get(kind) * quantity)
    })
}

/// Mark-to-model profit of a single long option bought at its purchase price
pub fn option_profit_surface(
    grid: &ScenarioGrid,
    contract: &OptionContract,
    option_type: OptionType,
) -> PricerResult<ScenarioSurface> {
    grid.evaluate_points(ScenarioPoint::of(contract), |p| {
        scenario_unit_profit(contract, option_type, PayoffConvention::MarkToModel, p)
    })
}

/// Strategy profit at every cell, each leg under its own convention
pub fn strategy_surface(grid: &ScenarioGrid, strategy: &Strategy) -> PricerResult<ScenarioSurface> {
    grid.evaluate_points(strategy.base_point(), |p| strategy.scenario_profit(p))
}

/// Parallel [`strategy_surface`]
pub fn par_strategy_surface(
    grid: &ScenarioGrid,
    strategy: &Strategy,
) -> PricerResult<ScenarioSurface> {
    grid.par_evaluate_points(strategy.base_point(), |p| strategy.scenario_profit(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::{StrategyKind, StrategyParams};
    use approx::assert_relative_eq;

    fn base() -> OptionContract {
        OptionContract::new(60.0, 65.0, 0.25, 0.08, 0.30, 2.0).unwrap()
    }

    #[test]
    fn test_around_contract() {
        let config = GridConfig::around(&base());
        assert_relative_eq!(config.spot_min, 48.0, epsilon = 1e-12);
        assert_relative_eq!(config.spot_max, 81.0, epsilon = 1e-12);
        assert_relative_eq!(config.vol_min, 0.15, epsilon = 1e-12);
        assert_relative_eq!(config.vol_max, 0.45, epsilon = 1e-12);
        assert_relative_eq!(config.time_max, 0.375, epsilon = 1e-12);
    }

    #[test]
    fn test_grid_rejects_swapped_axes() {
        let config = GridConfig::default();
        let spot = config.spot_axis().unwrap();
        let vol = config.vol_axis().unwrap();
        assert!(ScenarioGrid::new(vol, spot.clone()).is_err());
        assert!(ScenarioGrid::new(spot.clone(), spot).is_err());
    }

    #[test]
    fn test_deserialize_rejects_swapped_axes() {
        let grid = ScenarioGrid::spot_time(&GridConfig::default()).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<ScenarioGrid>(&json).unwrap(), grid);

        let mut swapped = serde_json::to_value(&grid).unwrap();
        let spot = swapped["spot"].take();
        swapped["spot"] = swapped["y"].take();
        swapped["y"] = spot;
        assert!(serde_json::from_value::<ScenarioGrid>(swapped).is_err());
    }

    #[test]
    fn test_cells_use_their_own_snapshot() {
        let grid = ScenarioGrid::spot_vol(&GridConfig::default()).unwrap();
        let surface = grid
            .evaluate(&base(), |c| Ok(black_scholes::call_price(c)))
            .unwrap();

        let (rows, cols) = surface.shape();
        for row in 0..rows {
            for col in 0..cols {
                let spot = grid.spot_axis().points()[col];
                let vol = grid.y_axis().points()[row];
                let expected = black_scholes::call_price(
                    &base().with_spot(spot).unwrap().with_vol(vol).unwrap(),
                );
                assert_relative_eq!(surface.get(row, col).unwrap(), expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_time_axis_surface() {
        let grid = ScenarioGrid::spot_time(&GridConfig::around(&base())).unwrap();
        let theta = greek_surface(&grid, &base(), OptionType::Put, GreekKind::Theta, 1.0).unwrap();
        assert_eq!(theta.y_axis().kind(), AxisKind::TimeToMaturity);
        assert_eq!(theta.shape(), (10, 10));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let grid = ScenarioGrid::spot_vol(&GridConfig::around(&base())).unwrap();
        let strategy = StrategyKind::LongButterfly
            .build(&StrategyParams::default())
            .unwrap();

        let seq = strategy_surface(&grid, &strategy).unwrap();
        let par = par_strategy_surface(&grid, &strategy).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_invalid_cell_aborts_sweep() {
        let config = GridConfig {
            vol_min: 0.0,
            ..GridConfig::default()
        };
        let grid = ScenarioGrid::spot_vol(&config).unwrap();
        let err = option_profit_surface(&grid, &base(), OptionType::Call).unwrap_err();
        assert!(err.is_domain());

        let err = grid
            .par_evaluate(&base(), |c| Ok(black_scholes::put_price(c)))
            .unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_non_finite_cell_is_numerical_error() {
        let grid = ScenarioGrid::spot_vol(&GridConfig::default()).unwrap();
        let err = grid.evaluate(&base(), |_| Ok(f64::NAN)).unwrap_err();
        assert!(matches!(err, PricerError::Numerical(_)));
    }
}
