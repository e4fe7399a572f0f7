//! # SolarKit Core
//!
//! Core types, errors, and utilities shared by the SolarKit crates.
//! Provides the error taxonomy of the layout engine, the event bus used to
//! notify the surrounding shell, and the shared-state type aliases used by
//! the composition root.

pub mod error;
pub mod event_bus;
pub mod types;

pub use error::LayoutError;

pub use event_bus::{
    AppEvent, EventBus, EventCategory, EventFilter, LayoutEvent, MapEvent, StatsEvent,
    SubscriptionId,
};

pub use types::{ThreadSafe, ZoomCallback};
