//! # Event Bus Module
//!
//! Publish/subscribe notifications between the layout engine and the UI
//! shell that displays it:
//! - The designer emits typed events without knowing who listens
//! - Subscribers filter by category (layout, map, stats)
//! - Handlers run synchronously on the publishing thread
//!
//! ## Usage
//!
//! ```rust,ignore
//! use solarkit_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter, StatsEvent};
//!
//! let bus = std::sync::Arc::new(EventBus::new());
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Stats]),
//!     |event| {
//!         if let AppEvent::Stats(StatsEvent::Updated { panel_count, .. }) = event {
//!             println!("{} panels", panel_count);
//!         }
//!     },
//! );
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
