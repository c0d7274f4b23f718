use crate::compare_floats::total;
use crate::core::energy_supply::elec_battery::EnergyFlowData;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

/// Grid electricity prices, in EUR per kWh.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct Prices {
    #[serde(default = "default_energy_buy_price")]
    #[validate(minimum = 0.)]
    pub energy_buy_eur_per_kwh: f64,
    /// feed-in tariff
    #[serde(default = "default_energy_sell_price")]
    #[validate(minimum = 0.)]
    pub energy_sell_eur_per_kwh: f64,
}

fn default_energy_buy_price() -> f64 {
    0.30
}

fn default_energy_sell_price() -> f64 {
    0.08
}

impl Default for Prices {
    fn default() -> Self {
        Self {
            energy_buy_eur_per_kwh: default_energy_buy_price(),
            energy_sell_eur_per_kwh: default_energy_sell_price(),
        }
    }
}

/// Money gained over a run through the PV system, in EUR.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FinancialSummary {
    /// purchases avoided by using energy on site
    pub gain_self_usage: f64,
    /// revenue from energy fed into the grid
    pub gain_sell: f64,
    pub total_gain: f64,
}

impl FinancialSummary {
    pub fn from_energy_flow(energy_flow: &EnergyFlowData, prices: &Prices) -> Self {
        let gain_self_usage = total(&energy_flow.self_usage) * prices.energy_buy_eur_per_kwh;
        let gain_sell = total(&energy_flow.energy_sell) * prices.energy_sell_eur_per_kwh;
        Self {
            gain_self_usage,
            gain_sell,
            total_gain: gain_self_usage + gain_sell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_financial_summary() {
        let energy_flow = EnergyFlowData {
            self_usage: vec![1., 2., 0.5],
            energy_sell: vec![0., 3., 1.],
            ..Default::default()
        };
        let prices = Prices {
            energy_buy_eur_per_kwh: 0.4,
            energy_sell_eur_per_kwh: 0.1,
        };
        let summary = FinancialSummary::from_energy_flow(&energy_flow, &prices);

        assert_relative_eq!(summary.gain_self_usage, 1.4, max_relative = 1e-12);
        assert_relative_eq!(summary.gain_sell, 0.4, max_relative = 1e-12);
        assert_relative_eq!(summary.total_gain, 1.8, max_relative = 1e-12);
    }

    #[rstest]
    fn test_default_prices() {
        let prices: Prices = serde_json::from_str("{}").unwrap();
        assert_eq!(prices, Prices::default());
    }
}
