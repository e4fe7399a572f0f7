//! Designer state for UI integration.
//! Owns the panel layout and wires it to the map, stats and event bus.
//!
//! This module is split into submodules:
//! - `layout`: Panel add/delete/reset, input handling, rendering, stats
//! - `map_sync`: Map visibility, zoom-driven resizing, geocode and irradiance

mod layout;
mod map_sync;

use std::sync::Arc;

use solarkit_core::{AppEvent, EventBus, ZoomCallback};
use solarkit_settings::DesignerConfig;
use tokio::sync::mpsc;

use crate::geo_scaler::{self, GeoSource, PanelDimensions};
use crate::interaction::InteractionController;
use crate::map_adapter::{GeocodeResult, Irradiance, MapAdapter};
use crate::panel_store::PanelStore;
use crate::stats::StatsCalculator;

/// Result of an asynchronous map collaborator call, applied on the owning
/// thread by [`SolarDesigner::process_map_updates`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapUpdate {
    /// The map zoom changed; panel sizes must be recomputed.
    ZoomChanged,
    /// A geocode request finished. `None` means no match or a failed call.
    Geocoded {
        query: String,
        result: Option<GeocodeResult>,
    },
    /// An irradiance request finished.
    Irradiance(Option<Irradiance>),
}

/// Composition root of the layout engine.
///
/// Single owner of the panel store, interaction controller and stats.
/// Async map results reach it only through the [`MapUpdate`] channel.
pub struct SolarDesigner {
    config: DesignerConfig,
    store: PanelStore,
    controller: InteractionController,
    stats: StatsCalculator,
    map: Option<Arc<dyn MapAdapter>>,
    map_visible: bool,
    location_label: Option<String>,
    events: Arc<EventBus>,
    updates_tx: mpsc::UnboundedSender<MapUpdate>,
    updates_rx: mpsc::UnboundedReceiver<MapUpdate>,
}

impl SolarDesigner {
    /// Creates a designer from validated configuration.
    ///
    /// Without a map collaborator the layout runs in grid mode and the
    /// configured panel dimensions are used as pixels.
    pub fn new(
        config: DesignerConfig,
        map: Option<Arc<dyn MapAdapter>>,
        events: Arc<EventBus>,
    ) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();

        if let Some(map) = &map {
            let tx = updates_tx.clone();
            let callback: ZoomCallback = Box::new(move || {
                // receiver gone means the designer was dropped
                let _ = tx.send(MapUpdate::ZoomChanged);
            });
            map.on_zoom_changed(callback);
        }

        let map_visible = config.map.enabled && map.is_some();
        if config.map.enabled && map.is_none() {
            tracing::warn!("Map enabled but no map collaborator available, using grid mode");
        }

        let mut stats = StatsCalculator::new(config.panel.energy_per_panel_kwh);
        if let Err(e) = stats.set_electricity_rate(config.pricing.electricity_rate) {
            tracing::warn!("{}, using default rate", e);
        }

        let mut designer = Self {
            store: PanelStore::new(config.canvas.width, config.canvas.height, 0.0, 0.0),
            controller: InteractionController::new(),
            stats,
            map,
            map_visible,
            location_label: None,
            events,
            updates_tx,
            updates_rx,
            config,
        };

        let initial = designer.current_panel_size();
        designer.store.resize_all(initial.width, initial.height);
        tracing::info!(
            "Designer ready: canvas {}x{}, panel {}x{} px, map {}",
            designer.config.canvas.width,
            designer.config.canvas.height,
            initial.width,
            initial.height,
            if designer.map_visible { "on" } else { "off" }
        );
        designer
    }

    /// Scale source currently in effect.
    pub fn geo_source(&self) -> GeoSource {
        match &self.map {
            Some(map) if self.map_visible => map.geo_source(),
            _ => GeoSource::Unmapped,
        }
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn store(&self) -> &PanelStore {
        &self.store
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn map(&self) -> Option<&Arc<dyn MapAdapter>> {
        self.map.as_ref()
    }

    fn panel_dimensions(&self) -> PanelDimensions {
        PanelDimensions::new(self.config.panel.width_cm, self.config.panel.height_cm)
    }

    fn current_panel_size(&self) -> geo_scaler::PixelSize {
        geo_scaler::panel_size(self.panel_dimensions(), &self.geo_source())
    }

    fn emit(&self, event: AppEvent) {
        self.events.publish(&event);
    }
}
