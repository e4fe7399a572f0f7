//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Type aliases for `Arc<RwLock<T>>` state and callbacks.

pub mod aliases;

pub use aliases::*;
