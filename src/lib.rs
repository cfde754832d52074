//! # Option Pricer - Black-Scholes Pricing and Scenario Engine
//!
//! Closed-form prices, Greeks and scenario profit surfaces for European
//! vanilla options and common multi-leg strategies.
//!
//! ## Key Components
//!
//! - **Black-Scholes**: prices, Greeks and the mark-to-model payoff
//! - **Strategies**: covered call, protective put, spreads, butterflies,
//!   straddles and strangles built from weighted legs
//! - **Scenario grids**: spot × volatility or spot × time surfaces and 1D
//!   profit-at-expiry curves
//! - **Hedging**: offsetting quantities for a call/put book
//! - **Audit records**: flat input records for an external store
//!
//! ## Usage
//!
//! ```rust
//! use option_pricer::prelude::*;
//! use option_pricer::models::black_scholes;
//!
//! let contract = OptionContract::new(60.0, 65.0, 0.25, 0.08, 0.30, 0.0).unwrap();
//! let (call, put) = black_scholes::prices(&contract);
//! assert!((call - put - (60.0 - 65.0 * (-0.08f64 * 0.25).exp())).abs() < 1e-8);
//!
//! let fly = StrategyKind::LongButterfly.build(&StrategyParams::default()).unwrap();
//! let grid = ScenarioGrid::spot_vol(&GridConfig::around(&contract)).unwrap();
//! let surface = strategy_surface(&grid, &fly).unwrap();
//! assert_eq!(surface.shape(), (10, 10));
//! ```
//!
//! ## What This Engine Does NOT Do
//!
//! - Ingest market data
//! - Price American exercise
//! - Calibrate implied volatility

pub mod config;
pub mod core;
pub mod data;
pub mod hedging;
pub mod models;
pub mod scenario;
pub mod strategies;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        AxisKind, ContractParams, GreekKind, Greeks, OptionContract, OptionType, PricerError,
        PricerResult, ScenarioAxis, ScenarioPoint, ScenarioSurface,
    };

    // Strategies
    pub use crate::strategies::{
        Direction, PayoffConvention, StockLeg, Strategy, StrategyKind, StrategyLeg,
        StrategyParams,
    };

    // Scenarios
    pub use crate::scenario::{
        greek_surface, option_profit_surface, par_strategy_surface, profit_curve,
        profit_curve_on, strategy_surface, GridConfig, ProfitCurve, ScenarioGrid,
    };

    // Hedging
    pub use crate::hedging::{hedge_ratio, HedgeRatio, HedgeReport, OptionBook};

    // Configuration
    pub use crate::config::PricerConfig;
}

// Re-export main types at crate root
pub use crate::core::{PricerError, PricerResult};
pub use crate::models::black_scholes;
