//! Map visibility, zoom-driven resizing, and the async geocode and
//! irradiance flows.
//!
//! Collaborator calls run as spawned tokio tasks. Their results come back
//! as [`MapUpdate`] messages and are applied by
//! [`SolarDesigner::process_map_updates`] on the thread that owns the
//! designer, so the panel store is never touched from a task.

use solarkit_core::{AppEvent, LayoutEvent, MapEvent};
use tokio::runtime::Handle;

use super::{MapUpdate, SolarDesigner};
use crate::geo_scaler::PixelSize;
use crate::map_adapter::{GeocodeResult, Irradiance, GEOCODE_ZOOM};

impl SolarDesigner {
    /// Whether geo-scaling from the map is active.
    pub fn map_visible(&self) -> bool {
        self.map_visible
    }

    /// Shows or hides the map. Hiding switches to grid mode; both directions
    /// re-size every panel. Without a map collaborator showing is refused.
    pub fn set_map_visible(&mut self, visible: bool) -> bool {
        if visible && self.map.is_none() {
            tracing::warn!("Cannot show map: no map collaborator available");
            return false;
        }
        if self.map_visible == visible {
            return true;
        }

        self.map_visible = visible;
        tracing::info!("Map {}", if visible { "shown" } else { "hidden" });
        self.emit(AppEvent::Map(MapEvent::VisibilityChanged { visible }));
        self.refresh_panel_size();
        true
    }

    /// Recomputes the panel pixel size from the current scale source and
    /// applies it to every panel when it changed.
    pub fn refresh_panel_size(&mut self) -> PixelSize {
        let size = self.current_panel_size();
        if self.store.panel_size() != (size.width, size.height) {
            tracing::debug!("Resizing panels to {}x{} px", size.width, size.height);
            self.store.resize_all(size.width, size.height);
            self.emit(AppEvent::Layout(LayoutEvent::PanelsResized {
                width: size.width,
                height: size.height,
            }));
        }
        size
    }

    /// Text of the last successfully geocoded address.
    pub fn location_label(&self) -> Option<&str> {
        self.location_label.as_deref()
    }

    /// Starts an address lookup. The result arrives as a
    /// [`MapUpdate::Geocoded`] message.
    ///
    /// Returns `false` when nothing was started: blank query, no map, or no
    /// tokio runtime on this thread.
    pub fn search_address(&self, address: &str) -> bool {
        let query = address.trim().to_string();
        if query.is_empty() {
            return false;
        }
        let Some(map) = self.map.clone() else {
            tracing::warn!("Address search unavailable without a map");
            return false;
        };
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!("Address search needs a tokio runtime");
            return false;
        };

        let tx = self.updates_tx.clone();
        handle.spawn(async move {
            let result = map.geocode(&query).await;
            let _ = tx.send(MapUpdate::Geocoded { query, result });
        });
        true
    }

    /// Starts an irradiance lookup for the current map center. The result
    /// arrives as a [`MapUpdate::Irradiance`] message.
    pub fn request_irradiance(&self) -> bool {
        let Some(map) = self.map.clone() else {
            tracing::warn!("Irradiance lookup unavailable without a map");
            return false;
        };
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!("Irradiance lookup needs a tokio runtime");
            return false;
        };

        let tx = self.updates_tx.clone();
        handle.spawn(async move {
            let center = map.current_center();
            let result = map.fetch_irradiance(center.lat, center.lng).await;
            let _ = tx.send(MapUpdate::Irradiance(result));
        });
        true
    }

    /// Applies every pending map update without blocking. Returns how many
    /// were applied.
    pub fn process_map_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates_rx.try_recv() {
            self.apply_map_update(update);
            applied += 1;
        }
        applied
    }

    /// Waits for the next map update and applies it.
    pub async fn next_map_update(&mut self) -> Option<MapUpdate> {
        let update = self.updates_rx.recv().await?;
        self.apply_map_update(update.clone());
        Some(update)
    }

    fn apply_map_update(&mut self, update: MapUpdate) {
        match update {
            MapUpdate::ZoomChanged => self.on_zoom_changed(),
            MapUpdate::Geocoded { query, result } => self.on_geocoded(query, result),
            MapUpdate::Irradiance(result) => self.on_irradiance(result),
        }
    }

    fn on_zoom_changed(&mut self) {
        let meters_per_pixel = self.map.as_ref().and_then(|map| map.meters_per_pixel());
        self.emit(AppEvent::Map(MapEvent::ZoomChanged { meters_per_pixel }));
        self.refresh_panel_size();
    }

    fn on_geocoded(&mut self, query: String, result: Option<GeocodeResult>) {
        let (Some(result), Some(map)) = (result, self.map.clone()) else {
            tracing::warn!("No location found for '{}'", query);
            self.emit(AppEvent::Map(MapEvent::GeocodeFailed { query }));
            return;
        };

        map.move_to(result.location, GEOCODE_ZOOM);
        tracing::info!("Moved map to {}", result.display_address);
        self.emit(AppEvent::Map(MapEvent::LocationChanged {
            lat: result.location.lat,
            lng: result.location.lng,
            address: result.display_address.clone(),
        }));
        self.location_label = Some(result.display_address);

        // latitude changed even when the zoom did not
        self.refresh_panel_size();
        self.request_irradiance();
    }

    fn on_irradiance(&mut self, result: Option<Irradiance>) {
        let Some(irradiance) = result else {
            tracing::warn!(
                "Irradiance data unavailable, keeping {} kWh per panel",
                self.stats.energy_per_panel()
            );
            self.emit(AppEvent::Map(MapEvent::IrradianceUnavailable));
            return;
        };

        let energy = irradiance.annual_kwh_per_kwp * self.config.panel.peak_power_kw;
        if self.set_energy_per_panel(energy) {
            tracing::info!(
                "Irradiance {} kWh/kWp, {} kWh per panel",
                irradiance.annual_kwh_per_kwp,
                energy
            );
            self.emit(AppEvent::Map(MapEvent::IrradianceUpdated {
                annual_kwh_per_kwp: irradiance.annual_kwh_per_kwp,
                energy_per_panel: energy,
            }));
        } else {
            self.emit(AppEvent::Map(MapEvent::IrradianceUnavailable));
        }
    }
}
