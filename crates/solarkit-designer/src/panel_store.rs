//! Ordered panel collection with grid placement and hit-testing.
//!
//! The vector order is the z-order: the last panel is drawn on top and wins
//! hit-tests. Ids come from a counter that only ever increases until
//! [`PanelStore::reset`].

use crate::panel::Panel;

/// Gap between grid-placed panels, in pixels.
pub const GRID_GUTTER: f64 = 20.0;
/// Distance of the first grid cell from the canvas origin, in pixels.
pub const GRID_MARGIN: f64 = 50.0;

/// Owns the panels of one layout.
#[derive(Debug, Clone)]
pub struct PanelStore {
    panels: Vec<Panel>,
    next_id: u64,
    canvas_width: f64,
    canvas_height: f64,
    panel_width: f64,
    panel_height: f64,
}

impl PanelStore {
    /// Creates an empty store for a canvas, with the default panel size in pixels.
    pub fn new(canvas_width: f64, canvas_height: f64, panel_width: f64, panel_height: f64) -> Self {
        Self {
            panels: Vec::new(),
            next_id: 0,
            canvas_width,
            canvas_height,
            panel_width,
            panel_height,
        }
    }

    /// Appends a panel at the next grid cell and returns it.
    ///
    /// Cells tile left-to-right, top-to-bottom. The position is not clamped
    /// to the canvas, so rows past the bottom edge overflow it.
    pub fn add(&mut self) -> &Panel {
        let id = self.next_id;
        self.next_id += 1;

        let columns = self.grid_columns();
        let index = self.panels.len();
        let row = index / columns;
        let col = index % columns;

        let x = col as f64 * (self.panel_width + GRID_GUTTER) + GRID_MARGIN;
        let y = row as f64 * (self.panel_height + GRID_GUTTER) + GRID_MARGIN;

        tracing::debug!("Adding panel {} at row {} col {} ({}, {})", id, row, col, x, y);
        self.panels
            .push(Panel::new(id, x, y, self.panel_width, self.panel_height));
        &self.panels[index]
    }

    /// Number of grid columns for the current panel width, never less than one.
    pub fn grid_columns(&self) -> usize {
        let computed = (self.canvas_width / (self.panel_width + GRID_GUTTER)).floor();
        if computed >= 1.0 {
            computed as usize
        } else {
            1
        }
    }

    /// Removes a panel by id. Returns false if no such panel exists.
    pub fn remove(&mut self, id: u64) -> bool {
        match self.panels.iter().position(|p| p.id == id) {
            Some(index) => {
                self.panels.remove(index);
                tracing::debug!("Removed panel {}", id);
                true
            }
            None => false,
        }
    }

    /// Returns the topmost panel containing the point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&Panel> {
        self.panels.iter().rev().find(|p| p.contains(x, y))
    }

    /// Moves a panel, clamping it inside the canvas.
    ///
    /// Returns the clamped position, or `None` when the id is unknown. When
    /// the panel is larger than the canvas the clamp collapses to 0.
    pub fn update_position(&mut self, id: u64, x: f64, y: f64) -> Option<(f64, f64)> {
        let (canvas_width, canvas_height) = (self.canvas_width, self.canvas_height);
        let panel = self.panels.iter_mut().find(|p| p.id == id)?;

        panel.x = x.min(canvas_width - panel.width).max(0.0);
        panel.y = y.min(canvas_height - panel.height).max(0.0);
        Some((panel.x, panel.y))
    }

    /// Applies a new pixel size to every panel and to future panels.
    ///
    /// Positions are left alone; they are re-clamped on the next drag.
    pub fn resize_all(&mut self, width: f64, height: f64) {
        self.panel_width = width;
        self.panel_height = height;
        for panel in &mut self.panels {
            panel.width = width;
            panel.height = height;
        }
    }

    /// Mirrors the selection onto the panels' `selected` flags.
    pub fn set_selected(&mut self, id: Option<u64>) {
        for panel in &mut self.panels {
            panel.selected = Some(panel.id) == id;
        }
    }

    /// Removes every panel and restarts ids at zero.
    pub fn reset(&mut self) {
        self.panels.clear();
        self.next_id = 0;
    }

    pub fn count(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// Panels in z-order, bottom first.
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Panel> {
        self.panels.iter()
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    /// Default size given to newly added panels.
    pub fn panel_size(&self) -> (f64, f64) {
        (self.panel_width, self.panel_height)
    }

    /// Id the next `add` will assign.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}
