//! Flat audit record of one user input set

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::ContractParams;

/// Inputs behind one dashboard refresh, as handed to the time-series store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Hash of the seven numeric inputs; equal inputs share an id
    pub id: u64,
    pub spot: f64,
    pub strike: f64,
    pub time: f64,
    pub vol: f64,
    pub rate: f64,
    pub purchase_price_call: f64,
    pub purchase_price_put: f64,
    pub recorded_at: DateTime<Utc>,
}

impl InputRecord {
    pub fn new(params: &ContractParams, purchase_price_call: f64, purchase_price_put: f64) -> Self {
        let mut record = Self {
            id: 0,
            spot: params.spot,
            strike: params.strike,
            time: params.time,
            vol: params.vol,
            rate: params.rate,
            purchase_price_call,
            purchase_price_put,
            recorded_at: Utc::now(),
        };
        record.id = record.input_hash();
        record
    }

    /// Deterministic for a given build; `-0.0` and `0.0` hash differently
    pub fn input_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for value in [
            self.spot,
            self.strike,
            self.time,
            self.vol,
            self.rate,
            self.purchase_price_call,
            self.purchase_price_put,
        ] {
            value.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_depends_only_on_inputs() {
        let params = ContractParams::default();
        let a = InputRecord::new(&params, 2.13, 5.85);
        let b = InputRecord::new(&params, 2.13, 5.85);
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, a.input_hash());

        let c = InputRecord::new(&params, 2.13, 5.86);
        assert_ne!(a.id, c.id);

        let moved = ContractParams {
            spot: 61.0,
            ..params
        };
        assert_ne!(a.id, InputRecord::new(&moved, 2.13, 5.85).id);
    }

    #[test]
    fn test_serializes_flat() {
        let record = InputRecord::new(&ContractParams::default(), 1.0, 2.0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["strike"], 65.0);
        assert_eq!(json["purchase_price_put"], 2.0);
        assert!(json["recorded_at"].is_string());
    }
}
