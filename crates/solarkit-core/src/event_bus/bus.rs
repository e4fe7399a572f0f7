//! Event Bus implementation.
//!
//! Handlers are registered with a category filter and run synchronously on
//! the publishing thread. There is no global instance: the composition root
//! creates one bus and hands `Arc` clones to whoever publishes or listens.

use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::events::{AppEvent, EventCategory};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Which events a subscription receives
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    /// Events in any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Box<dyn Fn(&AppEvent) + Send + Sync>;

/// Event bus for layout, map and statistics notifications
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers an event to every matching handler.
    ///
    /// Returns how many handlers saw it; zero is normal when the layout runs
    /// without a shell attached.
    pub fn publish(&self, event: &AppEvent) -> usize {
        let handlers = self.handlers.read();
        let mut delivered = 0;
        for (filter, handler) in handlers.values() {
            if filter.matches(event) {
                handler(event);
                delivered += 1;
            }
        }
        tracing::trace!("Published {} to {} handler(s)", event.description(), delivered);
        delivered
    }

    /// Registers a handler for events passing `filter`.
    ///
    /// The handler runs on the publishing thread while the handler table is
    /// read-locked, so it must not subscribe or unsubscribe itself.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, (filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::events::{LayoutEvent, MapEvent, StatsEvent};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);

        let id = bus.subscribe(EventFilter::All, |_| {});
        assert_eq!(bus.subscriber_count(), 1);

        assert!(bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);
        assert!(!bus.unsubscribe(id));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(&AppEvent::Layout(LayoutEvent::Reset)), 0);
    }

    #[test]
    fn test_event_filtering() {
        let bus = EventBus::new();
        let layout_count = Arc::new(AtomicUsize::new(0));
        let map_count = Arc::new(AtomicUsize::new(0));

        let lc = layout_count.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Layout]),
            move |_| {
                lc.fetch_add(1, Ordering::SeqCst);
            },
        );

        let mc = map_count.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Map]),
            move |_| {
                mc.fetch_add(1, Ordering::SeqCst);
            },
        );

        assert_eq!(bus.publish(&AppEvent::Layout(LayoutEvent::PanelRemoved { id: 1 })), 1);
        bus.publish(&AppEvent::Map(MapEvent::VisibilityChanged { visible: true }));
        bus.publish(&AppEvent::Map(MapEvent::IrradianceUnavailable));

        assert_eq!(layout_count.load(Ordering::SeqCst), 1);
        assert_eq!(map_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribed_handler_stops_receiving() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let id = bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Stats]),
            move |event| seen_clone.lock().push(event.clone()),
        );

        let rejected = AppEvent::Stats(StatsEvent::RateRejected {
            value: -1.0,
            retained: 0.25,
        });
        bus.publish(&rejected);
        bus.unsubscribe(id);
        bus.publish(&rejected);

        assert_eq!(*seen.lock(), vec![rejected]);
    }
}
