//! Core data types for the pricing engine
//!
//! Defines fundamental types:
//! - OptionContract: validated spot/strike/maturity/rate/vol snapshot
//! - Greeks: sensitivities and their combination
//! - ScenarioAxis / ScenarioSurface: sweep axes and computed 2D grids
//! - PricerError: error taxonomy

pub mod error;
pub mod greeks;
pub mod option;
pub mod surface;

pub use error::*;
pub use greeks::*;
pub use option::*;
pub use surface::*;
