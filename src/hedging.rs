//! Greek hedging for a two-sided call/put book
//!
//! For each Greek the book total is offset with a single instrument: the
//! required quantity is `-total / instrument_greek`. An instrument whose
//! Greek is exactly zero cannot offset anything and yields
//! [`HedgeRatio::Unhedgeable`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{GreekKind, Greeks, OptionContract, OptionType, PricerError, PricerResult};
use crate::models::black_scholes;

/// Quantity of a hedge instrument needed to neutralise a Greek
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "quantity", rename_all = "snake_case")]
pub enum HedgeRatio {
    Computed(f64),
    Unhedgeable,
}

impl HedgeRatio {
    pub fn quantity(&self) -> Option<f64> {
        match self {
            HedgeRatio::Computed(q) => Some(*q),
            HedgeRatio::Unhedgeable => None,
        }
    }

    pub fn is_hedgeable(&self) -> bool {
        matches!(self, HedgeRatio::Computed(_))
    }
}

impl fmt::Display for HedgeRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HedgeRatio::Computed(q) => write!(f, "{:.4}", q),
            HedgeRatio::Unhedgeable => write!(f, "unhedgeable"),
        }
    }
}

/// Offsetting quantity of an instrument with Greek `instrument` against a book `total`
pub fn hedge_ratio(total: f64, instrument: f64) -> HedgeRatio {
    if instrument == 0.0 {
        HedgeRatio::Unhedgeable
    } else {
        HedgeRatio::Computed(-total / instrument)
    }
}

/// One Greek's exposure and both ways of hedging it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeReport {
    pub greek: GreekKind,
    pub call_exposure: f64,
    pub put_exposure: f64,
    pub total: f64,
    /// Quantity of the book's call contract that offsets `total`
    pub with_call: HedgeRatio,
    /// Quantity of the book's put contract that offsets `total`
    pub with_put: HedgeRatio,
}

/// `call_count` calls and `put_count` puts, each on its own contract
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BookParams")]
pub struct OptionBook {
    pub call: OptionContract,
    pub call_count: u32,
    pub put: OptionContract,
    pub put_count: u32,
}

/// Unvalidated book, as read from JSON
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BookParams {
    pub call: OptionContract,
    pub call_count: u32,
    pub put: OptionContract,
    pub put_count: u32,
}

impl TryFrom<BookParams> for OptionBook {
    type Error = PricerError;

    fn try_from(p: BookParams) -> PricerResult<Self> {
        OptionBook::new(p.call, p.call_count, p.put, p.put_count)
    }
}

impl OptionBook {
    pub fn new(
        call: OptionContract,
        call_count: u32,
        put: OptionContract,
        put_count: u32,
    ) -> PricerResult<Self> {
        if call_count == 0 && put_count == 0 {
            return Err(PricerError::invalid_input("option book holds no contracts"));
        }
        if !call.same_calendar(&put) {
            return Err(PricerError::invalid_input(format!(
                "call (T={}, r={}) and put (T={}, r={}) must share maturity and rate",
                call.time(),
                call.rate(),
                put.time(),
                put.rate()
            )));
        }
        Ok(Self {
            call,
            call_count,
            put,
            put_count,
        })
    }

    /// One call and one put on the same contract
    pub fn single(contract: OptionContract) -> Self {
        Self {
            call: contract,
            call_count: 1,
            put: contract,
            put_count: 1,
        }
    }

    pub fn call_unit_greeks(&self) -> Greeks {
        black_scholes::greeks(&self.call, OptionType::Call)
    }

    pub fn put_unit_greeks(&self) -> Greeks {
        black_scholes::greeks(&self.put, OptionType::Put)
    }

    /// Per-contract call Greeks × call count
    pub fn call_greeks(&self) -> Greeks {
        self.call_unit_greeks().scale(self.call_count as f64)
    }

    /// Per-contract put Greeks × put count
    pub fn put_greeks(&self) -> Greeks {
        self.put_unit_greeks().scale(self.put_count as f64)
    }

    pub fn total_greeks(&self) -> Greeks {
        self.call_greeks() + self.put_greeks()
    }

    pub fn hedge(&self, greek: GreekKind) -> HedgeReport {
        let call_exposure = self.call_greeks().get(greek);
        let put_exposure = self.put_greeks().get(greek);
        let total = call_exposure + put_exposure;

        HedgeReport {
            greek,
            call_exposure,
            put_exposure,
            total,
            with_call: hedge_ratio(total, self.call_unit_greeks().get(greek)),
            with_put: hedge_ratio(total, self.put_unit_greeks().get(greek)),
        }
    }

    /// Reports for every Greek in display order
    pub fn hedges(&self) -> Vec<HedgeReport> {
        GreekKind::ALL.iter().map(|&g| self.hedge(g)).collect()
    }
}
