//! Black-Scholes Model
//!
//! Closed-form valuation and Greeks for European options on a
//! non-dividend-paying underlying.
//!
//! Every function takes a validated [`OptionContract`], so `S`, `K`, `T` and
//! `sigma` are known to be positive and the formulas cannot divide by zero.

use std::f64::consts::PI;

use statrs::function::erf::erfc;

use crate::core::{Greeks, OptionContract, OptionType, PricerResult};

/// Scaling applied to vega, rho and theta (per 1 percentage point shock)
pub const PER_POINT: f64 = 0.01;

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter
pub fn d1(c: &OptionContract) -> f64 {
    ((c.spot() / c.strike()).ln() + (c.rate() + 0.5 * c.vol() * c.vol()) * c.time())
        / (c.vol() * c.time().sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(c: &OptionContract) -> f64 {
    d1(c) - c.vol() * c.time().sqrt()
}

pub fn call_price(c: &OptionContract) -> f64 {
    c.spot() * norm_cdf(d1(c)) - c.discounted_strike() * norm_cdf(d2(c))
}

pub fn put_price(c: &OptionContract) -> f64 {
    c.discounted_strike() * norm_cdf(-d2(c)) - c.spot() * norm_cdf(-d1(c))
}

/// Black-Scholes European option price
pub fn price(c: &OptionContract, option_type: OptionType) -> f64 {
    match option_type {
        OptionType::Call => call_price(c),
        OptionType::Put => put_price(c),
    }
}

/// Call and put prices, in that order
pub fn prices(c: &OptionContract) -> (f64, f64) {
    (call_price(c), put_price(c))
}

/// Intermediate values shared by the Greek formulas
struct Terms<'a> {
    c: &'a OptionContract,
    d1: f64,
    d2: f64,
    sqrt_t: f64,
    pdf_d1: f64,
}

impl<'a> Terms<'a> {
    fn of(c: &'a OptionContract) -> Self {
        let d1 = d1(c);
        let sqrt_t = c.time().sqrt();
        Self {
            c,
            d1,
            d2: d1 - c.vol() * sqrt_t,
            sqrt_t,
            pdf_d1: norm_pdf(d1),
        }
    }

    fn delta(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => norm_cdf(self.d1),
            OptionType::Put => norm_cdf(self.d1) - 1.0,
        }
    }

    fn gamma(&self) -> f64 {
        self.pdf_d1 / (self.c.spot() * self.c.vol() * self.sqrt_t)
    }

    fn vega(&self) -> f64 {
        self.c.spot() * self.pdf_d1 * self.sqrt_t * PER_POINT
    }

    fn rho(&self, option_type: OptionType) -> f64 {
        let kt_df = self.c.time() * self.c.discounted_strike();
        match option_type {
            OptionType::Call => kt_df * norm_cdf(self.d2) * PER_POINT,
            OptionType::Put => -kt_df * norm_cdf(-self.d2) * PER_POINT,
        }
    }

    fn theta(&self, option_type: OptionType) -> f64 {
        let decay = -self.c.spot() * self.pdf_d1 * self.c.vol() / (2.0 * self.sqrt_t);
        let carry = self.c.rate() * self.c.discounted_strike();
        match option_type {
            OptionType::Call => (decay - carry * norm_cdf(self.d2)) * PER_POINT,
            OptionType::Put => (decay + carry * norm_cdf(-self.d2)) * PER_POINT,
        }
    }
}

pub fn delta(c: &OptionContract, option_type: OptionType) -> f64 {
    Terms::of(c).delta(option_type)
}

/// Same for call and put
pub fn gamma(c: &OptionContract) -> f64 {
    Terms::of(c).gamma()
}

/// Same for call and put, per 1% vol move
pub fn vega(c: &OptionContract) -> f64 {
    Terms::of(c).vega()
}

/// Per 1% rate move
pub fn rho(c: &OptionContract, option_type: OptionType) -> f64 {
    Terms::of(c).rho(option_type)
}

pub fn theta(c: &OptionContract, option_type: OptionType) -> f64 {
    Terms::of(c).theta(option_type)
}

/// Black-Scholes Greeks, sharing d1/d2 across all five
pub fn greeks(c: &OptionContract, option_type: OptionType) -> Greeks {
    let t = Terms::of(c);
    Greeks::new(
        t.delta(option_type),
        t.gamma(),
        t.vega(),
        t.rho(option_type),
        t.theta(option_type),
    )
}

/// Profit of a long option marked to model at `spot`
///
/// Reprices a fresh snapshot at `spot` and returns
/// `max(price - purchase_price, -purchase_price)`: the loss is floored at the
/// premium paid.
pub fn calculate_payoff(c: &OptionContract, spot: f64, option_type: OptionType) -> PricerResult<f64> {
    let snapshot = c.with_spot(spot)?;
    let premium = c.purchase_price();
    Ok((price(&snapshot, option_type) - premium).max(-premium))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn contract(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> OptionContract {
        OptionContract::new(spot, strike, time, rate, vol, 0.0).unwrap()
    }

    #[test]
    fn test_norm_cdf() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-10);
        assert!((norm_cdf(1.96) - 0.975).abs() < 0.001);
        assert!((norm_cdf(-1.96) - 0.025).abs() < 0.001);
        assert!((norm_pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-12);
    }

    #[test]
    fn test_reference_prices() {
        let c = contract(60.0, 65.0, 0.25, 0.08, 0.30);

        assert_relative_eq!(d1(&c), -0.325_284_717_823_575_8, epsilon = 1e-10);
        assert_relative_eq!(call_price(&c), 2.133_368_444_916_204, epsilon = 1e-8);
        assert_relative_eq!(put_price(&c), 5.846_282_209_855_296, epsilon = 1e-8);
    }

    #[test]
    fn test_reference_greeks() {
        let c = contract(60.0, 65.0, 0.25, 0.08, 0.30);
        let g = greeks(&c, OptionType::Call);

        assert_relative_eq!(g.delta, 0.372_482_797_961_973, epsilon = 1e-8);
        assert_relative_eq!(g.gamma, 0.042_042_755_753_785_18, epsilon = 1e-8);
        assert_relative_eq!(g.vega, 0.113_515_440_535_22, epsilon = 1e-8);
        assert_relative_eq!(g.rho, 0.050_538_998_582_005_445, epsilon = 1e-8);
        assert_relative_eq!(g.theta, -0.084_281_743_867_373_75, epsilon = 1e-8);
    }

    #[test]
    fn test_greeks_match_single_functions() {
        for c in [
            contract(100.0, 95.0, 0.75, 0.03, 0.25),
            contract(60.0, 65.0, 0.25, 0.08, 0.30),
            contract(20.0, 65.0, 3.0, -0.01, 0.9),
        ] {
            for t in [OptionType::Call, OptionType::Put] {
                let g = greeks(&c, t);
                assert_eq!(g.delta, delta(&c, t));
                assert_eq!(g.gamma, gamma(&c));
                assert_eq!(g.vega, vega(&c));
                assert_eq!(g.rho, rho(&c, t));
                assert_eq!(g.theta, theta(&c, t));
            }
        }
    }

    #[test]
    fn test_greeks_match_finite_differences() {
        let (s, k, t, r, v) = (100.0, 95.0, 0.75, 0.03, 0.25);
        let h = 1e-4;
        let at = |s: f64, t: f64, r: f64, v: f64| contract(s, k, t, r, v);
        for ot in [OptionType::Call, OptionType::Put] {
            let g = greeks(&at(s, t, r, v), ot);
            let p = |c: OptionContract| price(&c, ot);

            let fd_delta = (p(at(s + h, t, r, v)) - p(at(s - h, t, r, v))) / (2.0 * h);
            let hs = 1e-2;
            let fd_gamma = (p(at(s + hs, t, r, v)) - 2.0 * p(at(s, t, r, v))
                + p(at(s - hs, t, r, v)))
                / (hs * hs);
            let fd_vega = (p(at(s, t, r, v + h)) - p(at(s, t, r, v - h))) / (2.0 * h);
            let fd_rho = (p(at(s, t, r + h, v)) - p(at(s, t, r - h, v))) / (2.0 * h);
            let fd_theta = -(p(at(s, t + h, r, v)) - p(at(s, t - h, r, v))) / (2.0 * h);

            assert_relative_eq!(g.delta, fd_delta, epsilon = 1e-6);
            assert_relative_eq!(g.gamma, fd_gamma, epsilon = 1e-6);
            assert_relative_eq!(g.vega, fd_vega * PER_POINT, epsilon = 1e-6);
            assert_relative_eq!(g.rho, fd_rho * PER_POINT, epsilon = 1e-6);
            assert_relative_eq!(g.theta, fd_theta * PER_POINT, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_put_call_parity() {
        for &(s, k, t, r, v) in &[
            (60.0, 65.0, 0.25, 0.08, 0.30),
            (100.0, 100.0, 1.0, 0.05, 0.20),
            (42.0, 30.0, 2.0, -0.01, 0.55),
            (10.0, 12.5, 0.05, 0.0, 0.9),
        ] {
            let c = contract(s, k, t, r, v);
            let (call, put) = prices(&c);
            let parity = s - k * (-r * t).exp();
            assert_relative_eq!(call - put, parity, epsilon = 1e-8, max_relative = 1e-8);
        }
    }

    #[test]
    fn test_calculate_payoff_floors_at_premium() {
        let c = contract(60.0, 65.0, 0.25, 0.08, 0.30)
            .with_purchase_price(2.0)
            .unwrap();

        // Deep OTM: model value ~0, loss capped at the premium
        let deep_otm = calculate_payoff(&c, 1.0, OptionType::Call).unwrap();
        assert!(deep_otm >= -2.0);
        assert!(deep_otm < -1.99);

        let at_spot = calculate_payoff(&c, 60.0, OptionType::Call).unwrap();
        assert_relative_eq!(at_spot, call_price(&c) - 2.0, epsilon = 1e-12);

        assert!(calculate_payoff(&c, 0.0, OptionType::Put).unwrap_err().is_domain());
    }
}
