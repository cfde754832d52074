//! Configuration for a pricing session

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ContractParams, OptionContract, OptionType, PricerError, PricerResult};
use crate::data::{InputRecord, RecorderConfig};
use crate::hedging::OptionBook;
use crate::models::black_scholes;
use crate::scenario::GridConfig;
use crate::strategies::StrategyParams;

/// Size of the call/put book used for hedging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub call_count: u32,
    pub put_count: u32,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            call_count: 1,
            put_count: 1,
        }
    }
}

/// Everything one session needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PricerConfig {
    /// Base market and strike; `purchase_price` is ignored
    pub contract: ContractParams,
    /// Premium paid for the call; model price when absent
    pub purchase_price_call: Option<f64>,
    /// Premium paid for the put; model price when absent
    pub purchase_price_put: Option<f64>,
    /// Sweep ranges; centered on the contract when absent
    pub grid: Option<GridConfig>,
    /// Strategy settings; its contract is replaced by `contract`
    pub strategy: StrategyParams,
    pub book: BookConfig,
    pub recorder: RecorderConfig,
}

impl PricerConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> PricerResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> PricerResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Wide spread, long volatility, no recording
    pub fn wide_spreads() -> Self {
        Self {
            strategy: StrategyParams::default().with_spread_pct(10.0),
            recorder: RecorderConfig::disabled(),
            ..Default::default()
        }
    }

    /// Validated base contract without a premium
    pub fn base_contract(&self) -> PricerResult<OptionContract> {
        OptionContract::try_from(ContractParams {
            purchase_price: 0.0,
            ..self.contract
        })
    }

    /// Call and put contracts carrying their premiums
    pub fn priced_contracts(&self) -> PricerResult<(OptionContract, OptionContract)> {
        let base = self.base_contract()?;
        let (call_model, put_model) = black_scholes::prices(&base);
        let call = base.with_purchase_price(self.purchase_price_call.unwrap_or(call_model))?;
        let put = base.with_purchase_price(self.purchase_price_put.unwrap_or(put_model))?;
        Ok((call, put))
    }

    pub fn contract_for(&self, option_type: OptionType) -> PricerResult<OptionContract> {
        let (call, put) = self.priced_contracts()?;
        Ok(match option_type {
            OptionType::Call => call,
            OptionType::Put => put,
        })
    }

    pub fn grid_config(&self) -> PricerResult<GridConfig> {
        match &self.grid {
            Some(grid) => Ok(grid.clone()),
            None => Ok(GridConfig::around(&self.base_contract()?)),
        }
    }

    pub fn strategy_params(&self) -> StrategyParams {
        StrategyParams {
            contract: self.contract,
            ..self.strategy.clone()
        }
    }

    pub fn book(&self) -> PricerResult<OptionBook> {
        let (call, put) = self.priced_contracts()?;
        OptionBook::new(call, self.book.call_count, put, self.book.put_count)
    }

    /// Audit record of the current inputs
    pub fn input_record(&self) -> PricerResult<InputRecord> {
        let (call, put) = self.priced_contracts()?;
        Ok(InputRecord::new(
            &self.contract,
            call.purchase_price(),
            put.purchase_price(),
        ))
    }

    /// Reject settings that cannot produce a session
    pub fn validate(&self) -> PricerResult<()> {
        self.base_contract()?;
        let grid = self.grid_config()?;
        if grid.curve_points < 2 {
            return Err(PricerError::invalid_input(format!(
                "curve needs at least 2 points, got {}",
                grid.curve_points
            )));
        }
        self.book()?;
        Ok(())
    }
}
