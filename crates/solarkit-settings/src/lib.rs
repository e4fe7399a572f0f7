//! SolarKit Settings Crate
//!
//! Handles designer configuration: defaults, validation, and JSON/TOML files.

pub mod config;
pub mod error;

pub use config::{
    CanvasSettings, DesignerConfig, IrradianceSettings, MapSettings, PanelSettings, PlaceSettings,
    PricingSettings,
};
pub use error::{SettingsError, SettingsResult};
