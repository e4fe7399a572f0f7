//! Render model for the panel layout.
//! Turns the store into a flat list of positioned elements the UI shell
//! draws, or a placeholder prompt when the layout is empty.
//! Features:
//! - Stable `data_panel_id` on every element for DOM-style lookups
//! - 1-based labels in z-order
//! - Selection and drag indicators
//! - SVG export for headless use

use serde::{Deserialize, Serialize};

use crate::panel_store::PanelStore;

/// Text shown when no panels exist.
pub const PLACEHOLDER_PROMPT: &str = "Click \"Add Panel\" to start designing";

const PANEL_FILL: &str = "#1e3a5f";
const PANEL_STROKE: &str = "#4a90d9";
const SELECTED_STROKE: &str = "#ffeb3b";
const LABEL_COLOR: &str = "#ffffff";

/// One drawable panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelElement {
    pub data_panel_id: u64,
    /// Position in the layout plus one; shifts down when earlier panels are deleted.
    pub label: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub selected: bool,
    pub dragging: bool,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderFrame {
    Placeholder(String),
    Panels(Vec<PanelElement>),
}

impl RenderFrame {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, RenderFrame::Placeholder(_))
    }

    /// Panel elements, empty for the placeholder.
    pub fn elements(&self) -> &[PanelElement] {
        match self {
            RenderFrame::Panels(elements) => elements,
            RenderFrame::Placeholder(_) => &[],
        }
    }

    /// Renders the frame as a standalone SVG document.
    pub fn to_svg(&self, width: f64, height: f64) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = width,
            h = height
        );

        match self {
            RenderFrame::Placeholder(text) => {
                svg.push_str(&format!(
                    "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" fill=\"#888888\">{}</text>\n",
                    width / 2.0,
                    height / 2.0,
                    escape_xml(text)
                ));
            }
            RenderFrame::Panels(elements) => {
                for el in elements {
                    let stroke = if el.selected {
                        SELECTED_STROKE
                    } else {
                        PANEL_STROKE
                    };
                    let opacity = if el.dragging { 0.7 } else { 1.0 };
                    svg.push_str(&format!(
                        "  <g data-panel-id=\"{}\" opacity=\"{}\">\n",
                        el.data_panel_id, opacity
                    ));
                    svg.push_str(&format!(
                        "    <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
                        el.x,
                        el.y,
                        el.width,
                        el.height,
                        PANEL_FILL,
                        stroke,
                        if el.selected { 3 } else { 1 }
                    ));
                    svg.push_str(&format!(
                        "    <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"{}\">{}</text>\n",
                        el.x + el.width / 2.0,
                        el.y + el.height / 2.0,
                        LABEL_COLOR,
                        el.label
                    ));
                    svg.push_str("  </g>\n");
                }
            }
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Builds the frame for the current store.
///
/// `dragging` marks the panel under an active drag, if any.
pub fn render(store: &PanelStore, dragging: Option<u64>) -> RenderFrame {
    if store.is_empty() {
        return RenderFrame::Placeholder(PLACEHOLDER_PROMPT.to_string());
    }

    let elements = store
        .iter()
        .enumerate()
        .map(|(index, panel)| PanelElement {
            data_panel_id: panel.id,
            label: index + 1,
            x: panel.x,
            y: panel.y,
            width: panel.width,
            height: panel.height,
            selected: panel.selected,
            dragging: dragging == Some(panel.id),
        })
        .collect();

    RenderFrame::Panels(elements)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
