//! Option Greeks
//!
//! First and second order sensitivities for options and option positions.
//! Vega, rho and theta are expressed per 1 percentage point shock (scaled by 0.01).

use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Option Greeks (sensitivities)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Vega: dV/dσ per 1% vol move
    pub vega: f64,
    /// Rho: dV/dr per 1% rate move
    pub rho: f64,
    /// Theta: time decay, scaled by 0.01
    pub theta: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, vega: f64, rho: f64, theta: f64) -> Self {
        Self {
            delta,
            gamma,
            vega,
            rho,
            theta,
        }
    }

    /// Scale Greeks by a factor (e.g., for position size)
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            vega: self.vega * factor,
            rho: self.rho * factor,
            theta: self.theta * factor,
        }
    }

    /// Add two Greeks (for portfolio)
    pub fn add(&self, other: &Greeks) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            vega: self.vega + other.vega,
            rho: self.rho + other.rho,
            theta: self.theta + other.theta,
        }
    }

    /// Look up a single sensitivity
    pub fn get(&self, kind: GreekKind) -> f64 {
        match kind {
            GreekKind::Delta => self.delta,
            GreekKind::Gamma => self.gamma,
            GreekKind::Vega => self.vega,
            GreekKind::Rho => self.rho,
            GreekKind::Theta => self.theta,
        }
    }

    /// Iterate (kind, value) in display order
    pub fn iter(&self) -> impl Iterator<Item = (GreekKind, f64)> + '_ {
        GreekKind::ALL.iter().map(move |&k| (k, self.get(k)))
    }

    pub fn is_finite(&self) -> bool {
        self.iter().all(|(_, v)| v.is_finite())
    }
}

impl Add for Greeks {
    type Output = Greeks;

    fn add(self, rhs: Greeks) -> Greeks {
        Greeks::add(&self, &rhs)
    }
}

impl Sum for Greeks {
    fn sum<I: Iterator<Item = Greeks>>(iter: I) -> Greeks {
        iter.fold(Greeks::default(), |acc, g| acc + g)
    }
}

/// Which sensitivity to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreekKind {
    Delta,
    Gamma,
    Vega,
    Rho,
    Theta,
}

impl GreekKind {
    pub const ALL: [GreekKind; 5] = [
        GreekKind::Delta,
        GreekKind::Gamma,
        GreekKind::Vega,
        GreekKind::Rho,
        GreekKind::Theta,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GreekKind::Delta => "Delta",
            GreekKind::Gamma => "Gamma",
            GreekKind::Vega => "Vega",
            GreekKind::Rho => "Rho",
            GreekKind::Theta => "Theta",
        }
    }
}

impl std::str::FromStr for GreekKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "delta" => Ok(GreekKind::Delta),
            "gamma" => Ok(GreekKind::Gamma),
            "vega" => Ok(GreekKind::Vega),
            "rho" => Ok(GreekKind::Rho),
            "theta" => Ok(GreekKind::Theta),
            other => Err(format!("unknown greek: {}", other)),
        }
    }
}
