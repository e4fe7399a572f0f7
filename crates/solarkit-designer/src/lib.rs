//! # SolarKit Designer
//!
//! Panel layout and geo-scaling engine. Places rectangular solar panels on a
//! canvas (optionally over a map), keeps their pixel size consistent with
//! their real-world size as the map zooms, and estimates energy and savings
//! from the panel count.
//!
//! ## Core Components
//!
//! - **PanelStore**: Ordered panel collection, grid placement, hit-testing
//! - **GeoScaler**: Centimetres to clamped pixels from the ground resolution
//! - **InteractionController**: Drag, select and delete state machine
//! - **MapAdapter**: Boundary to the map, geocoding and irradiance services
//! - **Renderer**: Render frames and SVG output
//! - **StatsCalculator**: Annual energy, monthly average, savings
//!
//! ## Architecture
//!
//! ```text
//! SolarDesigner (composition root)
//!   ├── PanelStore ◀── InteractionController ◀── InputEvent
//!   ├── StatsCalculator
//!   ├── MapAdapter ──zoom/geocode/irradiance──▶ MapUpdate channel
//!   │     └── GeoScaler ──▶ PanelStore::resize_all
//!   └── Renderer ──▶ RenderFrame
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use solarkit_core::EventBus;
//! use solarkit_designer::SolarDesigner;
//! use solarkit_settings::DesignerConfig;
//!
//! let mut designer = SolarDesigner::new(DesignerConfig::default(), None, Arc::new(EventBus::new()));
//! designer.add_panel();
//! designer.add_panel();
//! assert_eq!(designer.get_stats().annual_energy, 800.0);
//! ```

pub mod designer_state;
pub mod geo_scaler;
pub mod interaction;
pub mod map_adapter;
pub mod panel;
pub mod panel_store;
pub mod renderer;
pub mod selection_manager;
pub mod stats;

pub use designer_state::{MapUpdate, SolarDesigner};
pub use geo_scaler::{panel_size, pixel_size, GeoSource, PanelDimensions, PixelSize};
pub use interaction::{InputEvent, InteractionController, InteractionOutcome, Key};
pub use map_adapter::{
    ground_resolution, GeocodeResult, Irradiance, LatLng, MapAdapter, ViewportMap,
};
pub use panel::{CanvasPoint, Panel};
pub use panel_store::PanelStore;
pub use renderer::{render, PanelElement, RenderFrame, PLACEHOLDER_PROMPT};
pub use selection_manager::SelectionManager;
pub use stats::{format_number, Stats, StatsCalculator};
