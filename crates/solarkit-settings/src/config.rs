//! Configuration for the SolarKit designer
//!
//! Provides configuration file handling, defaults, and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Canvas settings (pixel extent of the layout surface)
//! - Panel settings (real-world size, yield, peak power)
//! - Pricing settings (electricity rate)
//! - Map settings (enablement, initial center and zoom, offline lookups)

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pixel extent of the layout surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Canvas width in pixels
    pub width: f64,
    /// Canvas height in pixels
    pub height: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Physical panel description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Panel width in centimetres (used directly as pixels without a map)
    pub width_cm: f64,
    /// Panel height in centimetres (used directly as pixels without a map)
    pub height_cm: f64,
    /// Estimated energy production per panel per year (kWh)
    pub energy_per_panel_kwh: f64,
    /// Peak power of one panel in kWp, used with irradiance data
    pub peak_power_kw: f64,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            width_cm: 100.0,
            height_cm: 160.0,
            energy_per_panel_kwh: 400.0,
            peak_power_kw: 0.4,
        }
    }
}

/// Electricity pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    /// Electricity rate per kWh
    pub electricity_rate: f64,
    /// Currency label shown next to savings
    pub currency: String,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            electricity_rate: 0.25,
            currency: "EUR".to_string(),
        }
    }
}

/// An address the offline geocoder resolves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSettings {
    /// Address as typed in a search, matched case-insensitively
    pub address: String,
    /// Label shown once the address is found
    pub display_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Solar yield reported for the map center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrradianceSettings {
    /// Yearly production per installed kWp (kWh)
    pub annual_kwh_per_kwp: f64,
    /// Twelve monthly values; empty spreads the annual figure evenly
    #[serde(default)]
    pub monthly_kwh_per_kwp: Vec<f64>,
}

impl IrradianceSettings {
    /// Monthly yield, spreading the annual figure when no profile is given.
    pub fn monthly(&self) -> [f64; 12] {
        <[f64; 12]>::try_from(self.monthly_kwh_per_kwp.as_slice())
            .unwrap_or([self.annual_kwh_per_kwp / 12.0; 12])
    }
}

/// Map view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Whether a satellite map backs the layout
    pub enabled: bool,
    /// Initial map center latitude
    pub latitude: f64,
    /// Initial map center longitude
    pub longitude: f64,
    /// Initial zoom level
    pub zoom: f64,
    /// Addresses answered by address search
    pub places: Vec<PlaceSettings>,
    /// Yield answered by irradiance lookups; `None` disables them
    pub irradiance: Option<IrradianceSettings>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            latitude: 40.4168,
            longitude: -3.7038,
            zoom: 20.0,
            places: vec![PlaceSettings {
                address: "Madrid".to_string(),
                display_address: "Madrid, Spain".to_string(),
                latitude: 40.4168,
                longitude: -3.7038,
            }],
            // PVGIS-style profile for an optimally tilted array in central Spain
            irradiance: Some(IrradianceSettings {
                annual_kwh_per_kwp: 1710.0,
                monthly_kwh_per_kwp: vec![
                    95.0, 110.0, 145.0, 160.0, 175.0, 185.0, 195.0, 185.0, 155.0, 125.0, 95.0,
                    85.0,
                ],
            }),
        }
    }
}

/// Complete designer configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DesignerConfig {
    /// Canvas settings
    pub canvas: CanvasSettings,
    /// Panel settings
    pub panel: PanelSettings,
    /// Pricing settings
    pub pricing: PricingSettings,
    /// Map settings
    pub map: MapSettings,
}

impl DesignerConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file in the platform config directory
    pub fn config_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })?;
        Ok(dir.join("solarkit").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if !(positive(self.canvas.width) && positive(self.canvas.height)) {
            return Err(SettingsError::invalid(
                "canvas",
                "canvas dimensions must be > 0",
            ));
        }

        if !(positive(self.panel.width_cm) && positive(self.panel.height_cm)) {
            return Err(SettingsError::invalid(
                "panel",
                "panel dimensions must be > 0",
            ));
        }

        if !positive(self.panel.energy_per_panel_kwh) {
            return Err(SettingsError::invalid(
                "panel.energy_per_panel_kwh",
                "must be > 0",
            ));
        }

        if !positive(self.panel.peak_power_kw) {
            return Err(SettingsError::invalid("panel.peak_power_kw", "must be > 0"));
        }

        if !positive(self.pricing.electricity_rate) {
            return Err(SettingsError::invalid(
                "pricing.electricity_rate",
                "must be > 0",
            ));
        }

        validate_coordinates("map", self.map.latitude, self.map.longitude)?;

        if !(0.0..=24.0).contains(&self.map.zoom) {
            return Err(SettingsError::invalid("map.zoom", "must be within [0, 24]"));
        }

        for place in &self.map.places {
            if place.address.trim().is_empty() {
                return Err(SettingsError::invalid(
                    "map.places.address",
                    "must not be empty",
                ));
            }
            validate_coordinates("map.places", place.latitude, place.longitude)?;
        }

        if let Some(irradiance) = &self.map.irradiance {
            if !positive(irradiance.annual_kwh_per_kwp) {
                return Err(SettingsError::invalid(
                    "map.irradiance.annual_kwh_per_kwp",
                    "must be > 0",
                ));
            }
            let monthly = &irradiance.monthly_kwh_per_kwp;
            if !(monthly.is_empty() || monthly.len() == 12) {
                return Err(SettingsError::invalid(
                    "map.irradiance.monthly_kwh_per_kwp",
                    "must hold 12 values or none",
                ));
            }
            if monthly.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(SettingsError::invalid(
                    "map.irradiance.monthly_kwh_per_kwp",
                    "values must be >= 0",
                ));
            }
        }

        Ok(())
    }
}

fn validate_coordinates(section: &str, latitude: f64, longitude: f64) -> SettingsResult<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(SettingsError::invalid(
            &format!("{}.latitude", section),
            "must be within [-90, 90]",
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(SettingsError::invalid(
            &format!("{}.longitude", section),
            "must be within [-180, 180]",
        ));
    }
    Ok(())
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
