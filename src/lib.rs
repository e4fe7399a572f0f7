//! # SolarKit
//!
//! Solar panel layout designer: place panels over a satellite map or a
//! blank grid, keep them true to scale while the map zooms, and estimate
//! energy production and savings from the layout.
//!
//! ## Architecture
//!
//! SolarKit is organized as a workspace with multiple crates:
//!
//! 1. **solarkit-core** - Errors, event bus, shared type aliases
//! 2. **solarkit-settings** - Designer configuration and config files
//! 3. **solarkit-designer** - Panel store, geo-scaling, interaction, map boundary, stats
//! 4. **solarkit** - This crate: logging setup and the line-command shell

pub mod cli;

pub use solarkit_core::{AppEvent, EventBus, LayoutError};
pub use solarkit_designer::{SolarDesigner, ViewportMap};
pub use solarkit_settings::DesignerConfig;

/// Version of the application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date of the application
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with tracing
///
/// Logs go to stderr so command output on stdout stays machine readable.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
