//! Event type definitions for the event bus.
//!
//! This module defines all application events organized by category.
//! Events are designed to be cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Panel collection and selection changes
    Layout(LayoutEvent),
    /// Map view and collaborator results
    Map(MapEvent),
    /// Recomputed energy and savings figures
    Stats(StatsEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Layout(_) => EventCategory::Layout,
            AppEvent::Map(_) => EventCategory::Map,
            AppEvent::Stats(_) => EventCategory::Stats,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Layout(e) => e.description(),
            AppEvent::Map(e) => e.description(),
            AppEvent::Stats(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Panel collection events.
    Layout,
    /// Map view events.
    Map,
    /// Statistics events.
    Stats,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Layout => write!(f, "Layout"),
            EventCategory::Map => write!(f, "Map"),
            EventCategory::Stats => write!(f, "Stats"),
        }
    }
}

/// Panel collection events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutEvent {
    /// A panel was appended to the layout.
    PanelAdded {
        /// Id of the new panel.
        id: u64,
        /// Grid-placed left edge in pixels.
        x: f64,
        /// Grid-placed top edge in pixels.
        y: f64,
    },
    /// A panel was deleted.
    PanelRemoved {
        /// Id of the deleted panel.
        id: u64,
    },
    /// A drag finished with the panel at a new position.
    PanelMoved {
        /// Id of the dragged panel.
        id: u64,
        /// Final left edge in pixels.
        x: f64,
        /// Final top edge in pixels.
        y: f64,
    },
    /// Every panel received a new pixel size.
    PanelsResized {
        /// Panel width in pixels.
        width: f64,
        /// Panel height in pixels.
        height: f64,
    },
    /// Selection moved to another panel or was cleared.
    SelectionChanged {
        /// Selected panel id, if any.
        id: Option<u64>,
    },
    /// All panels were removed and ids restart at zero.
    Reset,
}

impl LayoutEvent {
    fn description(&self) -> String {
        match self {
            LayoutEvent::PanelAdded { id, x, y } => {
                format!("Panel {} added at ({}, {})", id, x, y)
            }
            LayoutEvent::PanelRemoved { id } => format!("Panel {} removed", id),
            LayoutEvent::PanelMoved { id, x, y } => {
                format!("Panel {} moved to ({}, {})", id, x, y)
            }
            LayoutEvent::PanelsResized { width, height } => {
                format!("Panels resized to {}x{} px", width, height)
            }
            LayoutEvent::SelectionChanged { id: Some(id) } => format!("Panel {} selected", id),
            LayoutEvent::SelectionChanged { id: None } => "Selection cleared".to_string(),
            LayoutEvent::Reset => "Layout reset".to_string(),
        }
    }
}

/// Map view events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// The map was shown or hidden.
    VisibilityChanged {
        /// Whether geo-scaling is now active.
        visible: bool,
    },
    /// Zoom changed and panel sizes were recomputed.
    ZoomChanged {
        /// Ground resolution after the change, if a view is active.
        meters_per_pixel: Option<f64>,
    },
    /// A geocode result recentred the map.
    LocationChanged {
        /// Latitude of the new center.
        lat: f64,
        /// Longitude of the new center.
        lng: f64,
        /// Human readable address.
        address: String,
    },
    /// A geocode request returned no result.
    GeocodeFailed {
        /// The address text that was searched.
        query: String,
    },
    /// Irradiance data replaced the per-panel energy estimate.
    IrradianceUpdated {
        /// Annual yield in kWh per installed kWp.
        annual_kwh_per_kwp: f64,
        /// Resulting energy per panel in kWh per year.
        energy_per_panel: f64,
    },
    /// An irradiance request returned no usable data.
    IrradianceUnavailable,
}

impl MapEvent {
    fn description(&self) -> String {
        match self {
            MapEvent::VisibilityChanged { visible } => {
                format!("Map {}", if *visible { "shown" } else { "hidden" })
            }
            MapEvent::ZoomChanged {
                meters_per_pixel: Some(mpp),
            } => format!("Zoom changed ({:.4} m/px)", mpp),
            MapEvent::ZoomChanged {
                meters_per_pixel: None,
            } => "Zoom changed (no active view)".to_string(),
            MapEvent::LocationChanged { lat, lng, address } => {
                format!("Location {} ({:.5}, {:.5})", address, lat, lng)
            }
            MapEvent::GeocodeFailed { query } => format!("Geocode failed for '{}'", query),
            MapEvent::IrradianceUpdated {
                annual_kwh_per_kwp,
                energy_per_panel,
            } => format!(
                "Irradiance {:.1} kWh/kWp, {:.1} kWh per panel",
                annual_kwh_per_kwp, energy_per_panel
            ),
            MapEvent::IrradianceUnavailable => "Irradiance unavailable".to_string(),
        }
    }
}

/// Statistics events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatsEvent {
    /// Figures were recomputed after a layout or rate change.
    Updated {
        /// Number of panels in the layout.
        panel_count: usize,
        /// Annual energy in kWh.
        annual_energy: f64,
        /// Rounded monthly average in kWh.
        monthly_average: f64,
        /// Rounded annual savings in currency units.
        annual_savings: f64,
        /// Electricity rate in currency units per kWh.
        electricity_rate: f64,
    },
    /// A rate update was rejected and the previous rate kept.
    RateRejected {
        /// The rejected value.
        value: f64,
        /// The rate still in effect.
        retained: f64,
    },
}

impl StatsEvent {
    fn description(&self) -> String {
        match self {
            StatsEvent::Updated {
                panel_count,
                annual_energy,
                ..
            } => format!("{} panels, {} kWh/yr", panel_count, annual_energy),
            StatsEvent::RateRejected { value, retained } => {
                format!("Rate {} rejected, keeping {}", value, retained)
            }
        }
    }
}
