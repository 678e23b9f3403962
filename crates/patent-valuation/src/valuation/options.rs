use serde::{Deserialize, Serialize};

use super::ValuationError;

/// Strategy for evaluating the standard normal cumulative distribution.
pub trait NormalCdf {
    fn evaluate(&self, x: f64) -> f64;
}

/// Abramowitz & Stegun 26.2.17 polynomial; absolute error below 7.5e-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbramowitzStegunCdf;

impl AbramowitzStegunCdf {
    const P: f64 = 0.231_641_9;
    const B1: f64 = 0.319_381_530;
    const B2: f64 = -0.356_563_782;
    const B3: f64 = 1.781_477_937;
    const B4: f64 = -1.821_255_978;
    const B5: f64 = 1.330_274_429;
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
}

impl NormalCdf for AbramowitzStegunCdf {
    fn evaluate(&self, x: f64) -> f64 {
        let t = 1.0 / (1.0 + Self::P * x.abs());
        let density = Self::INV_SQRT_2PI * (-x * x / 2.0).exp();
        let poly = t * (Self::B1 + t * (Self::B2 + t * (Self::B3 + t * (Self::B4 + t * Self::B5))));
        let upper_tail = density * poly;
        if x > 0.0 {
            1.0 - upper_tail
        } else {
            upper_tail
        }
    }
}

/// Inputs to the Black-Scholes call used to price a patent as a real option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionParameters {
    /// Present value of the expected cash flows (S).
    #[serde(rename = "S")]
    pub underlying_value: f64,
    /// Cost to develop or launch (K).
    #[serde(rename = "K")]
    pub exercise_cost: f64,
    /// Years until the opportunity lapses (T).
    #[serde(rename = "T")]
    pub years_to_expiry: f64,
    #[serde(rename = "r")]
    pub risk_free_rate: f64,
    #[serde(rename = "sigma")]
    pub volatility: f64,
}

impl OptionParameters {
    fn validate(&self) -> Result<(), ValuationError> {
        let positive = [
            ("S", self.underlying_value),
            ("K", self.exercise_cost),
            ("T", self.years_to_expiry),
            ("sigma", self.volatility),
        ];
        for (parameter, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValuationError::invalid(
                    parameter,
                    format!("must be a positive finite number (got {value})"),
                ));
            }
        }
        if !self.risk_free_rate.is_finite() {
            return Err(ValuationError::invalid(
                "r",
                format!("must be finite (got {})", self.risk_free_rate),
            ));
        }
        Ok(())
    }
}

/// Black-Scholes call value and its intermediate terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealOptionValuation {
    pub option_value: f64,
    pub intrinsic_value: f64,
    /// Option value minus intrinsic value. Can dip slightly below zero where the CDF
    /// approximation undershoots.
    pub time_value: f64,
    pub d1: f64,
    pub d2: f64,
    #[serde(rename = "Nd1")]
    pub nd1: f64,
    #[serde(rename = "Nd2")]
    pub nd2: f64,
    pub parameters: OptionParameters,
}

/// Price the option with the default normal CDF approximation.
pub fn real_options(params: &OptionParameters) -> Result<RealOptionValuation, ValuationError> {
    real_options_with(params, &AbramowitzStegunCdf)
}

pub fn real_options_with<C>(
    params: &OptionParameters,
    cdf: &C,
) -> Result<RealOptionValuation, ValuationError>
where
    C: NormalCdf + ?Sized,
{
    params.validate()?;

    let OptionParameters {
        underlying_value: s,
        exercise_cost: k,
        years_to_expiry: t,
        risk_free_rate: r,
        volatility: sigma,
    } = *params;

    let vol_sqrt_t = sigma * t.sqrt();
    if !vol_sqrt_t.is_finite() || vol_sqrt_t <= 0.0 {
        return Err(ValuationError::invalid(
            "sigma",
            format!("sigma * sqrt(T) must stay positive and finite (got {vol_sqrt_t})"),
        ));
    }

    let d1 = ((s / k).ln() + (r + sigma * sigma / 2.0) * t) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;
    if !d1.is_finite() || !d2.is_finite() {
        return Err(ValuationError::invalid(
            "S",
            format!("S/K and the drift leave d1 undefined (d1 = {d1}, d2 = {d2})"),
        ));
    }

    let nd1 = cdf.evaluate(d1);
    let nd2 = cdf.evaluate(d2);

    let option_value = s * nd1 - k * (-r * t).exp() * nd2;
    if !option_value.is_finite() {
        return Err(ValuationError::invalid(
            "r",
            format!("discounting K over T leaves the option value undefined (got {option_value})"),
        ));
    }
    let intrinsic_value = (s - k).max(0.0);

    Ok(RealOptionValuation {
        option_value,
        intrinsic_value,
        time_value: option_value - intrinsic_value,
        d1,
        d2,
        nd1,
        nd2,
        parameters: *params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> OptionParameters {
        OptionParameters {
            underlying_value: s,
            exercise_cost: k,
            years_to_expiry: t,
            risk_free_rate: r,
            volatility: sigma,
        }
    }

    #[test]
    fn cdf_matches_reference_values() {
        let cdf = AbramowitzStegunCdf;
        let cases = [
            (0.0, 0.5),
            (1.0, 0.841_344_746_068_542_9),
            (-1.0, 0.158_655_253_931_457_05),
            (-1.96, 0.024_997_895_148_220_435),
            (2.5, 0.993_790_334_674_223_8),
            (-4.0, 0.000_031_671_241_833_119_86),
        ];
        for (x, expected) in cases {
            let actual = cdf.evaluate(x);
            assert!(
                (actual - expected).abs() < 1e-6,
                "N({x}) = {actual}, expected {expected}"
            );
        }
    }

    #[test]
    fn cdf_is_monotonic_and_bounded() {
        let cdf = AbramowitzStegunCdf;
        let mut previous = 0.0;
        for step in -80..=80 {
            let value = cdf.evaluate(step as f64 / 10.0);
            assert!((0.0..=1.0).contains(&value));
            assert!(value + 1e-12 >= previous);
            previous = value;
        }
    }

    #[test]
    fn prices_textbook_at_the_money_call() {
        let valuation = real_options(&params(100.0, 100.0, 1.0, 0.05, 0.2)).expect("valid");
        assert!((valuation.option_value - 10.450_583_572_185_565).abs() < 1e-4);
        assert_eq!(valuation.intrinsic_value, 0.0);
    }

    #[test]
    fn in_the_money_patent_keeps_positive_time_value() {
        let valuation = real_options(&params(1000.0, 800.0, 3.0, 0.05, 0.3)).expect("valid");
        assert_eq!(valuation.intrinsic_value, 200.0);
        assert!(valuation.option_value > valuation.intrinsic_value);
        assert!(valuation.time_value > 0.0);
        assert!((valuation.d2 - (valuation.d1 - 0.3 * 3.0_f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let cases = [
            (params(0.0, 800.0, 3.0, 0.05, 0.3), "S"),
            (params(1000.0, 0.0, 3.0, 0.05, 0.3), "K"),
            (params(1000.0, 800.0, 0.0, 0.05, 0.3), "T"),
            (params(1000.0, 800.0, 3.0, 0.05, 0.0), "sigma"),
            (params(1000.0, 800.0, 3.0, 0.05, -0.1), "sigma"),
            (params(1000.0, 800.0, 3.0, f64::NAN, 0.3), "r"),
        ];
        for (input, parameter) in cases {
            let err = real_options(&input).expect_err("degenerate input rejected");
            assert_eq!(err.parameter(), parameter);
        }
    }

    #[test]
    fn rejects_volatility_that_vanishes_over_the_horizon() {
        let err = real_options(&params(1.0, 1.0, 1e-300, 0.0, 1e-200))
            .expect_err("sigma * sqrt(T) underflows");
        assert_eq!(err.parameter(), "sigma");
    }

    #[test]
    fn rejects_unbounded_moneyness() {
        let err = real_options(&params(f64::MAX, f64::MIN_POSITIVE, 1.0, 0.05, 0.3))
            .expect_err("S/K overflows");
        assert_eq!(err.parameter(), "S");
    }

    #[test]
    fn rejects_rate_that_overflows_the_strike_discount() {
        let err = real_options(&params(1000.0, 800.0, 1000.0, -1000.0, 0.3))
            .expect_err("exp(-rT) overflows");
        assert_eq!(err.parameter(), "r");
    }

    struct CoinFlip;

    impl NormalCdf for CoinFlip {
        fn evaluate(&self, _x: f64) -> f64 {
            0.5
        }
    }

    #[test]
    fn uses_injected_cdf_strategy() {
        let input = params(1000.0, 800.0, 3.0, 0.05, 0.3);
        let valuation = real_options_with(&input, &CoinFlip).expect("valid");
        let expected = 0.5 * 1000.0 - 0.5 * 800.0 * (-0.15_f64).exp();
        assert!((valuation.option_value - expected).abs() < 1e-9);
        assert_eq!(valuation.nd1, 0.5);
        assert_eq!(valuation.nd2, 0.5);
    }
}
