//! Energy and savings estimates derived from the panel count.

use serde::{Deserialize, Serialize};
use solarkit_core::LayoutError;

/// Electricity rate used until a valid one is configured, per kWh.
pub const DEFAULT_ELECTRICITY_RATE: f64 = 0.25;

/// Snapshot of the figures shown next to the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub panel_count: usize,
    /// kWh per year
    pub annual_energy: f64,
    /// kWh per month, rounded
    pub monthly_average: f64,
    /// Currency units per year, rounded
    pub annual_savings: f64,
    pub electricity_rate: f64,
}

/// Holds the mutable pricing and yield inputs.
#[derive(Debug, Clone)]
pub struct StatsCalculator {
    energy_per_panel: f64,
    electricity_rate: f64,
}

impl StatsCalculator {
    /// Creates a calculator with the given yield per panel (kWh/yr) and the
    /// default electricity rate.
    pub fn new(energy_per_panel: f64) -> Self {
        Self {
            energy_per_panel,
            electricity_rate: DEFAULT_ELECTRICITY_RATE,
        }
    }

    pub fn annual_energy(&self, panel_count: usize) -> f64 {
        panel_count as f64 * self.energy_per_panel
    }

    pub fn monthly_average(&self, annual_energy: f64) -> f64 {
        (annual_energy / 12.0).round()
    }

    pub fn annual_savings(&self, annual_energy: f64) -> f64 {
        (annual_energy * self.electricity_rate).round()
    }

    pub fn calculate(&self, panel_count: usize) -> Stats {
        let annual_energy = self.annual_energy(panel_count);
        Stats {
            panel_count,
            annual_energy,
            monthly_average: self.monthly_average(annual_energy),
            annual_savings: self.annual_savings(annual_energy),
            electricity_rate: self.electricity_rate,
        }
    }

    /// Updates the rate. Non-positive or non-finite values are rejected and
    /// the previous rate stays in effect.
    pub fn set_electricity_rate(&mut self, rate: f64) -> Result<(), LayoutError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(LayoutError::not_positive("electricity_rate", rate));
        }
        self.electricity_rate = rate;
        Ok(())
    }

    /// Overrides the yield per panel, e.g. from irradiance data. Same
    /// acceptance rule as the rate.
    pub fn set_energy_per_panel(&mut self, energy: f64) -> Result<(), LayoutError> {
        if !(energy.is_finite() && energy > 0.0) {
            return Err(LayoutError::not_positive("energy_per_panel", energy));
        }
        self.energy_per_panel = energy;
        Ok(())
    }

    pub fn electricity_rate(&self) -> f64 {
        self.electricity_rate
    }

    pub fn energy_per_panel(&self) -> f64 {
        self.energy_per_panel
    }
}

/// Formats a figure with comma thousands separators.
///
/// Fractions keep their shortest exact digits, so `2400.5` prints as
/// `2,400.5`.
pub fn format_number(value: f64) -> String {
    // -0.0 would otherwise print as "-0"
    let text = if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    };

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
