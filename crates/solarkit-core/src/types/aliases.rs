//! Type aliases for commonly used complex types.
//!
//! Map views may be driven from async tasks while the designer reads them
//! from its owning thread, so their state sits behind `Arc<RwLock<T>>`.

use parking_lot::RwLock;
use std::sync::Arc;

// =============================================================================
// THREAD-SAFE TYPES
// =============================================================================

/// Thread-safe read/write state, used by map views touched from async tasks.
pub type ThreadSafe<T> = Arc<RwLock<T>>;

// =============================================================================
// CALLBACKS
// =============================================================================

/// Notification fired by a map view when its zoom level changes.
///
/// Carries no payload: the receiver re-reads meters-per-pixel itself.
pub type ZoomCallback = Box<dyn Fn() + Send + Sync>;
