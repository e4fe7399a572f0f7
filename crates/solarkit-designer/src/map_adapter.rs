//! Map collaborator boundary.
//!
//! The layout engine never talks to a mapping, geocoding or irradiance
//! service directly. It goes through [`MapAdapter`], whose async calls
//! resolve to `None` on any failure instead of erroring.
//!
//! [`ViewportMap`] is the in-process implementation: it tracks a map view
//! (center and zoom), computes Web-Mercator ground resolution, fires zoom
//! notifications, and answers geocode/irradiance queries from offline
//! tables.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use solarkit_core::{ThreadSafe, ZoomCallback};
use solarkit_settings::MapSettings;
use std::collections::HashMap;
use std::sync::Arc;

use crate::geo_scaler::GeoSource;

/// Ground resolution at the equator for zoom 0, in meters per pixel.
pub const EQUATOR_RESOLUTION_M: f64 = 156_543.033_92;

/// Zoom applied when a geocode result recentres the map.
pub const GEOCODE_ZOOM: f64 = 20.0;

/// Web-Mercator ground resolution:
///
/// ```text
/// meters_per_pixel = (156543.03392 × cos(latitude × π/180)) / 2^zoom
/// ```
pub fn ground_resolution(latitude: f64, zoom: f64) -> f64 {
    (EQUATOR_RESOLUTION_M * latitude.to_radians().cos()) / 2f64.powf(zoom)
}

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A resolved address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub location: LatLng,
    pub display_address: String,
}

/// Solar yield at a location, per installed kWp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Irradiance {
    pub annual_kwh_per_kwp: f64,
    pub monthly_kwh_per_kwp: [f64; 12],
}

/// Narrow interface to the mapping service behind the layout.
#[async_trait]
pub trait MapAdapter: Send + Sync {
    /// Ground resolution of the current view; `None` until a view is active.
    fn meters_per_pixel(&self) -> Option<f64>;

    /// Current zoom level; `None` until a view is active.
    fn zoom(&self) -> Option<f64>;

    fn current_center(&self) -> LatLng;

    /// Registers a zoom-change notification. Receivers re-read
    /// [`meters_per_pixel`](Self::meters_per_pixel) themselves.
    fn on_zoom_changed(&self, callback: ZoomCallback);

    /// Recentres the view.
    fn move_to(&self, center: LatLng, zoom: f64);

    async fn geocode(&self, address: &str) -> Option<GeocodeResult>;

    async fn fetch_irradiance(&self, lat: f64, lng: f64) -> Option<Irradiance>;

    /// Scale source for the current view, `Unmapped` when no view is active.
    fn geo_source(&self) -> GeoSource {
        match (self.meters_per_pixel(), self.zoom()) {
            (Some(meters_per_pixel), Some(zoom)) => GeoSource::Mapped {
                meters_per_pixel,
                latitude: self.current_center().lat,
                zoom,
            },
            _ => GeoSource::Unmapped,
        }
    }
}

#[derive(Debug, Clone)]
struct ViewState {
    center: LatLng,
    zoom: f64,
    active: bool,
}

/// In-process map view with offline lookups.
pub struct ViewportMap {
    view: ThreadSafe<ViewState>,
    listeners: RwLock<Vec<ZoomCallback>>,
    places: HashMap<String, GeocodeResult>,
    irradiance: Option<Irradiance>,
}

impl ViewportMap {
    /// Creates an active view.
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self {
            view: Arc::new(RwLock::new(ViewState {
                center,
                zoom,
                active: true,
            })),
            listeners: RwLock::new(Vec::new()),
            places: HashMap::new(),
            irradiance: None,
        }
    }

    /// Creates an active view at the configured center and zoom, answering
    /// lookups from the configured places and irradiance.
    pub fn from_settings(settings: &MapSettings) -> Self {
        let center = LatLng::new(settings.latitude, settings.longitude);
        let mut map = settings.places.iter().fold(
            Self::new(center, settings.zoom),
            |map, place| {
                map.with_place(
                    &place.address,
                    GeocodeResult {
                        location: LatLng::new(place.latitude, place.longitude),
                        display_address: place.display_address.clone(),
                    },
                )
            },
        );
        if let Some(irradiance) = &settings.irradiance {
            map = map.with_irradiance(Irradiance {
                annual_kwh_per_kwp: irradiance.annual_kwh_per_kwp,
                monthly_kwh_per_kwp: irradiance.monthly(),
            });
        }
        tracing::debug!(
            "Map view at ({}, {}) zoom {} with {} known place(s)",
            center.lat,
            center.lng,
            settings.zoom,
            map.places.len()
        );
        map
    }

    /// Creates a map whose view never initialised (e.g. the provider failed
    /// to load). Reports no ground resolution.
    pub fn inactive(center: LatLng) -> Self {
        let map = Self::new(center, GEOCODE_ZOOM);
        map.view.write().active = false;
        map
    }

    /// Adds an address the offline geocoder can resolve.
    pub fn with_place(mut self, address: &str, result: GeocodeResult) -> Self {
        self.places.insert(normalize(address), result);
        self
    }

    /// Sets the irradiance returned for any location.
    pub fn with_irradiance(mut self, irradiance: Irradiance) -> Self {
        self.irradiance = Some(irradiance);
        self
    }

    /// Changes the zoom level, notifying listeners when it actually changes.
    pub fn set_zoom(&self, zoom: f64) {
        let changed = {
            let mut view = self.view.write();
            let changed = view.zoom != zoom;
            view.zoom = zoom;
            changed
        };
        if changed {
            self.notify_zoom();
        }
    }

    /// Pans the view without changing zoom.
    pub fn set_center(&self, center: LatLng) {
        self.view.write().center = center;
    }

    pub fn is_active(&self) -> bool {
        self.view.read().active
    }

    fn notify_zoom(&self) {
        tracing::debug!("Map zoom changed to {}", self.view.read().zoom);
        for listener in self.listeners.read().iter() {
            listener();
        }
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

#[async_trait]
impl MapAdapter for ViewportMap {
    fn meters_per_pixel(&self) -> Option<f64> {
        let view = self.view.read();
        view.active
            .then(|| ground_resolution(view.center.lat, view.zoom))
    }

    fn zoom(&self) -> Option<f64> {
        let view = self.view.read();
        view.active.then_some(view.zoom)
    }

    fn current_center(&self) -> LatLng {
        self.view.read().center
    }

    fn on_zoom_changed(&self, callback: ZoomCallback) {
        self.listeners.write().push(callback);
    }

    fn move_to(&self, center: LatLng, zoom: f64) {
        self.set_center(center);
        self.set_zoom(zoom);
    }

    async fn geocode(&self, address: &str) -> Option<GeocodeResult> {
        let key = normalize(address);
        if key.is_empty() {
            return None;
        }
        let result = self.places.get(&key).cloned();
        if result.is_none() {
            tracing::warn!("Geocode was not successful for '{}'", address);
        }
        result
    }

    async fn fetch_irradiance(&self, lat: f64, lng: f64) -> Option<Irradiance> {
        tracing::debug!("Irradiance lookup at ({}, {})", lat, lng);
        self.irradiance
            .clone()
            .filter(|irr| irr.annual_kwh_per_kwp.is_finite() && irr.annual_kwh_per_kwp > 0.0)
    }
}
