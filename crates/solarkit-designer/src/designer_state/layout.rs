//! Panel collection operations, input handling, rendering and stats.

use solarkit_core::{AppEvent, LayoutEvent, StatsEvent};

use super::SolarDesigner;
use crate::interaction::{InputEvent, InteractionOutcome};
use crate::panel::CanvasPoint;
use crate::renderer::{self, RenderFrame};
use crate::stats::Stats;

impl SolarDesigner {
    /// Adds a panel at the next grid cell and returns its id.
    pub fn add_panel(&mut self) -> u64 {
        let (id, x, y) = {
            let panel = self.store.add();
            (panel.id, panel.x, panel.y)
        };
        tracing::info!("Panel {} added ({} total)", id, self.store.count());
        self.emit(AppEvent::Layout(LayoutEvent::PanelAdded { id, x, y }));
        self.publish_stats();
        id
    }

    /// Deletes a panel by id. Unknown ids are ignored and return `false`.
    pub fn delete_panel(&mut self, id: u64) -> bool {
        if !self.store.remove(id) {
            tracing::debug!("Delete ignored, no panel {}", id);
            return false;
        }
        self.controller.forget(id, &mut self.store);
        self.after_removal(id);
        true
    }

    /// Removes every panel; the next panel gets id 0 again.
    pub fn reset_all(&mut self) {
        self.store.reset();
        self.controller.reset(&mut self.store);
        tracing::info!("Layout reset");
        self.emit(AppEvent::Layout(LayoutEvent::Reset));
        self.publish_stats();
    }

    /// Updates the electricity rate. Returns `false` and keeps the previous
    /// rate when the value is not a positive number.
    pub fn set_electricity_rate(&mut self, rate: f64) -> bool {
        match self.stats.set_electricity_rate(rate) {
            Ok(()) => {
                tracing::debug!("Electricity rate set to {}", rate);
                self.publish_stats();
                true
            }
            Err(e) => {
                let retained = self.stats.electricity_rate();
                tracing::warn!("{}, keeping {}", e, retained);
                self.emit(AppEvent::Stats(StatsEvent::RateRejected {
                    value: rate,
                    retained,
                }));
                false
            }
        }
    }

    /// Overrides the annual energy per panel (kWh). Same acceptance rule as
    /// the electricity rate.
    pub fn set_energy_per_panel(&mut self, energy: f64) -> bool {
        match self.stats.set_energy_per_panel(energy) {
            Ok(()) => {
                self.publish_stats();
                true
            }
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }

    /// Annual energy per panel in kWh.
    pub fn energy_per_panel(&self) -> f64 {
        self.stats.energy_per_panel()
    }

    pub fn get_stats(&self) -> Stats {
        self.stats.calculate(self.store.count())
    }

    /// Feeds one input event to the interaction controller.
    pub fn handle_input(&mut self, event: InputEvent) -> InteractionOutcome {
        let outcome = self.controller.handle(event, &mut self.store);
        match outcome {
            InteractionOutcome::Deleted { id } => self.after_removal(id),
            InteractionOutcome::SelectionChanged { id } => {
                self.emit(AppEvent::Layout(LayoutEvent::SelectionChanged { id }));
            }
            InteractionOutcome::DragEnded { id, moved: true } => {
                if let Some(panel) = self.store.get(id) {
                    let (x, y) = (panel.x, panel.y);
                    tracing::debug!("Panel {} dropped at ({}, {})", id, x, y);
                    self.emit(AppEvent::Layout(LayoutEvent::PanelMoved { id, x, y }));
                }
            }
            _ => {}
        }
        outcome
    }

    /// Sets where the panel area sits in pointer coordinates.
    pub fn set_area_origin(&mut self, x: f64, y: f64) {
        self.controller.set_area_origin(CanvasPoint::new(x, y));
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.controller.selected_id()
    }

    /// Builds the current render frame.
    pub fn render(&self) -> RenderFrame {
        renderer::render(&self.store, self.controller.dragged_id())
    }

    fn after_removal(&self, id: u64) {
        tracing::info!("Panel {} deleted ({} left)", id, self.store.count());
        self.emit(AppEvent::Layout(LayoutEvent::PanelRemoved { id }));
        self.publish_stats();
    }

    pub(super) fn publish_stats(&self) {
        let stats = self.get_stats();
        self.emit(AppEvent::Stats(StatsEvent::Updated {
            panel_count: stats.panel_count,
            annual_energy: stats.annual_energy,
            monthly_average: stats.monthly_average,
            annual_savings: stats.annual_savings,
            electricity_rate: stats.electricity_rate,
        }));
    }
}
