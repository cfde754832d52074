//! Scenario axes and surfaces
//!
//! A [`ScenarioSurface`] holds one computed scalar (profit, payoff or a Greek)
//! for every combination of two [`ScenarioAxis`] points:
//! - x-axis: spot price
//! - y-axis: volatility or time to maturity

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::error::{PricerError, PricerResult};
use super::option::OptionContract;

/// Parameter varied along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    Spot,
    Volatility,
    TimeToMaturity,
}

impl AxisKind {
    pub fn label(&self) -> &'static str {
        match self {
            AxisKind::Spot => "Spot Price",
            AxisKind::Volatility => "Volatility",
            AxisKind::TimeToMaturity => "Time to Maturity",
        }
    }
}

/// Market state at one grid cell
///
/// All three parameters are always populated; the one not swept by the grid
/// keeps its base value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPoint {
    pub spot: f64,
    pub vol: f64,
    pub time: f64,
}

impl ScenarioPoint {
    pub fn new(spot: f64, vol: f64, time: f64) -> Self {
        Self { spot, vol, time }
    }

    /// Base market of a contract
    pub fn of(contract: &OptionContract) -> Self {
        Self {
            spot: contract.spot(),
            vol: contract.vol(),
            time: contract.time(),
        }
    }

    /// Replace the parameter an axis sweeps
    pub fn with(self, kind: AxisKind, value: f64) -> Self {
        match kind {
            AxisKind::Spot => Self { spot: value, ..self },
            AxisKind::Volatility => Self { vol: value, ..self },
            AxisKind::TimeToMaturity => Self { time: value, ..self },
        }
    }
}

/// Evenly spaced evaluation points for one parameter, both bounds included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AxisParams")]
pub struct ScenarioAxis {
    kind: AxisKind,
    points: Vec<f64>,
}

/// Unvalidated axis, as read from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct AxisParams {
    pub kind: AxisKind,
    pub points: Vec<f64>,
}

impl TryFrom<AxisParams> for ScenarioAxis {
    type Error = PricerError;

    fn try_from(p: AxisParams) -> PricerResult<Self> {
        ScenarioAxis::from_points(p.kind, p.points)
    }
}

impl ScenarioAxis {
    /// Build `count` evenly spaced points over `[min, max]`
    pub fn linspace(kind: AxisKind, min: f64, max: f64, count: usize) -> PricerResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(PricerError::invalid_input(format!(
                "{} axis bounds must be finite ({}, {})",
                kind.label(),
                min,
                max
            )));
        }
        if min > max {
            return Err(PricerError::invalid_input(format!(
                "{} axis min {} exceeds max {}",
                kind.label(),
                min,
                max
            )));
        }
        if count == 0 {
            return Err(PricerError::invalid_input(format!(
                "{} axis needs at least one point",
                kind.label()
            )));
        }

        let points = if count == 1 {
            vec![min]
        } else {
            let step = (max - min) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { max } else { min + step * i as f64 })
                .collect()
        };

        Ok(Self { kind, points })
    }

    /// Wrap explicit points; they must be finite, non-empty and non-decreasing
    pub fn from_points(kind: AxisKind, points: Vec<f64>) -> PricerResult<Self> {
        if points.is_empty() {
            return Err(PricerError::invalid_input(format!(
                "{} axis needs at least one point",
                kind.label()
            )));
        }
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(PricerError::invalid_input(format!(
                "{} axis point must be finite, got {}",
                kind.label(),
                bad
            )));
        }
        if let Some(w) = points.windows(2).find(|w| w[0] > w[1]) {
            return Err(PricerError::invalid_input(format!(
                "{} axis is not sorted: {} before {}",
                kind.label(),
                w[0],
                w[1]
            )));
        }
        Ok(Self { kind, points })
    }

    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.points[0]
    }

    pub fn max(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Points rounded to `decimals` places, for axis labels
    pub fn rounded(&self, decimals: i32) -> Vec<f64> {
        let factor = 10f64.powi(decimals);
        self.points.iter().map(|p| (p * factor).round() / factor).collect()
    }
}

/// 2D grid of computed values, `values[[row, col]]` = f(y_axis[row], x_axis[col])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SurfaceParams")]
pub struct ScenarioSurface {
    x_axis: ScenarioAxis,
    y_axis: ScenarioAxis,
    values: Array2<f64>,
}

/// Unvalidated surface, as read from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct SurfaceParams {
    pub x_axis: ScenarioAxis,
    pub y_axis: ScenarioAxis,
    pub values: Array2<f64>,
}

impl TryFrom<SurfaceParams> for ScenarioSurface {
    type Error = PricerError;

    fn try_from(p: SurfaceParams) -> PricerResult<Self> {
        ScenarioSurface::new(p.x_axis, p.y_axis, p.values)
    }
}

impl ScenarioSurface {
    /// Wrap a computed grid; every value must be finite
    pub fn new(x_axis: ScenarioAxis, y_axis: ScenarioAxis, values: Array2<f64>) -> PricerResult<Self> {
        if values.dim() != (y_axis.len(), x_axis.len()) {
            return Err(PricerError::invalid_input(format!(
                "surface shape {:?} does not match axes ({}, {})",
                values.dim(),
                y_axis.len(),
                x_axis.len()
            )));
        }
        if let Some(((row, col), v)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(PricerError::numerical(format!(
                "non-finite value {} at {}={}, {}={}",
                v,
                y_axis.kind().label(),
                y_axis.points()[row],
                x_axis.kind().label(),
                x_axis.points()[col]
            )));
        }

        Ok(Self {
            x_axis,
            y_axis,
            values,
        })
    }

    pub fn x_axis(&self) -> &ScenarioAxis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &ScenarioAxis {
        &self.y_axis
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// (rows, cols) = (y points, x points)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get([row, col]).copied()
    }

    pub fn min_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Rows in descending y order, matching a heatmap drawn with high values on top
    pub fn rows_top_down(&self) -> impl Iterator<Item = (f64, Vec<f64>)> + '_ {
        self.y_axis
            .points()
            .iter()
            .enumerate()
            .rev()
            .map(move |(i, &y)| (y, self.values.row(i).to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let axis = ScenarioAxis::linspace(AxisKind::Spot, 48.0, 81.0, 10).unwrap();
        assert_eq!(axis.len(), 10);
        assert_eq!(axis.min(), 48.0);
        assert_eq!(axis.max(), 81.0);
        assert!((axis.points()[1] - 51.666_666_666_666_664).abs() < 1e-9);

        let single = ScenarioAxis::linspace(AxisKind::Volatility, 0.2, 0.4, 1).unwrap();
        assert_eq!(single.points(), &[0.2]);
    }

    #[test]
    fn test_linspace_rejects_bad_bounds() {
        assert!(ScenarioAxis::linspace(AxisKind::Spot, 81.0, 48.0, 10).is_err());
        assert!(ScenarioAxis::linspace(AxisKind::Spot, 48.0, 81.0, 0).is_err());
        assert!(ScenarioAxis::linspace(AxisKind::Spot, f64::NAN, 81.0, 10).is_err());
    }

    #[test]
    fn test_surface_rows_top_down() {
        let x = ScenarioAxis::linspace(AxisKind::Spot, 90.0, 110.0, 3).unwrap();
        let y = ScenarioAxis::linspace(AxisKind::TimeToMaturity, 1.0, 3.0, 2).unwrap();
        // value = spot + 10 * time
        let values = Array2::from_shape_fn((2, 3), |(r, c)| x.points()[c] + 10.0 * y.points()[r]);
        let surface = ScenarioSurface::new(x, y, values).unwrap();

        assert_eq!(surface.shape(), (2, 3));
        assert_eq!(surface.get(1, 2), Some(140.0));
        assert_eq!(surface.get(2, 0), None);
        assert_eq!(surface.min_value(), 100.0);

        let top = surface.rows_top_down().next().unwrap();
        assert_eq!(top.0, 3.0);
        assert_eq!(top.1, vec![120.0, 130.0, 140.0]);
    }

    #[test]
    fn test_deserialize_validates_axis() {
        let ok: ScenarioAxis =
            serde_json::from_str(r#"{"kind":"spot","points":[48.0,60.0,81.0]}"#).unwrap();
        assert_eq!(ok.max(), 81.0);

        let empty = serde_json::from_str::<ScenarioAxis>(r#"{"kind":"spot","points":[]}"#);
        assert!(empty.is_err());
        let unsorted =
            serde_json::from_str::<ScenarioAxis>(r#"{"kind":"volatility","points":[0.3,0.1]}"#);
        assert!(unsorted.is_err());
    }

    #[test]
    fn test_deserialize_validates_surface_shape() {
        let x = ScenarioAxis::linspace(AxisKind::Spot, 90.0, 110.0, 2).unwrap();
        let y = ScenarioAxis::linspace(AxisKind::Volatility, 0.1, 0.3, 2).unwrap();
        let surface = ScenarioSurface::new(x, y, Array2::zeros((2, 2))).unwrap();

        let json = serde_json::to_string(&surface).unwrap();
        assert_eq!(serde_json::from_str::<ScenarioSurface>(&json).unwrap(), surface);

        // Three spot points against a 2x2 grid
        let mut raw = serde_json::to_value(&surface).unwrap();
        raw["x_axis"]["points"] = serde_json::json!([90.0, 100.0, 110.0]);
        assert!(serde_json::from_value::<ScenarioSurface>(raw).is_err());
    }

    #[test]
    fn test_surface_rejects_non_finite() {
        let x = ScenarioAxis::linspace(AxisKind::Spot, 90.0, 110.0, 2).unwrap();
        let y = ScenarioAxis::linspace(AxisKind::Volatility, 0.1, 0.3, 2).unwrap();
        let mut values = Array2::zeros((2, 2));
        values[[1, 0]] = f64::NAN;

        let err = ScenarioSurface::new(x, y, values).unwrap_err();
        assert!(matches!(err, PricerError::Numerical(_)));
    }
}
