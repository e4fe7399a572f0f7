//! Pointer, touch and keyboard handling for the panel layout.
//!
//! # State Machine
//!
//! ```text
//! Idle ──pointer-down on panel──▶ Dragging ──pointer-up (anywhere)──▶ Idle
//!                                   │  ▲
//!                                   └──┘ pointer-move: clamp + move
//! ```
//!
//! Click, double-click and key events are handled in either state:
//! - click on a panel selects it, click on empty area clears the selection
//! - double-click on a panel deletes it
//! - Delete/Backspace deletes the selected panel
//!
//! # Invariants
//!
//! 1. Only one pointer sequence is tracked; a second pointer-down while
//!    dragging is ignored until the first sequence ends.
//! 2. A click that closes a drag which actually moved the panel does not
//!    change the selection.
//! 3. Events referring to panels that no longer exist are no-ops.
//!
//! Pointer positions are given in the same coordinate space as the area
//! origin (e.g. client coordinates); the controller subtracts the origin.

use crate::panel::CanvasPoint;
use crate::panel_store::PanelStore;
use crate::selection_manager::SelectionManager;

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Other,
}

/// Raw input delivered by the UI shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(CanvasPoint),
    PointerMove(CanvasPoint),
    PointerUp,
    TouchStart(CanvasPoint),
    TouchMove(CanvasPoint),
    TouchEnd,
    Click(CanvasPoint),
    DoubleClick(CanvasPoint),
    KeyDown(Key),
}

/// Ephemeral state of an active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub panel_id: u64,
    /// Pointer position relative to the panel's top-left at press time.
    pub pointer_offset: CanvasPoint,
    pub moved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    Dragging(DragState),
}

/// What an event did to the layout, so the shell knows what to refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionOutcome {
    None,
    DragStarted { id: u64 },
    Moved { id: u64, x: f64, y: f64 },
    DragEnded { id: u64, moved: bool },
    SelectionChanged { id: Option<u64> },
    Deleted { id: u64 },
}

impl InteractionOutcome {
    /// Whether the panel collection or its geometry changed.
    pub fn needs_render(&self) -> bool {
        !matches!(
            self,
            InteractionOutcome::None | InteractionOutcome::DragStarted { .. }
        )
    }
}

/// Translates input streams into panel store mutations.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    selection: SelectionManager,
    area_origin: CanvasPoint,
    suppress_click: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: InteractionState::Idle,
            selection: SelectionManager::new(),
            area_origin: CanvasPoint::default(),
            suppress_click: false,
        }
    }

    /// Sets where the panel area's top-left sits in pointer coordinates.
    pub fn set_area_origin(&mut self, origin: CanvasPoint) {
        self.area_origin = origin;
    }

    pub fn area_origin(&self) -> CanvasPoint {
        self.area_origin
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging(_))
    }

    /// Id of the panel being dragged, if any.
    pub fn dragged_id(&self) -> Option<u64> {
        match self.state {
            InteractionState::Dragging(drag) => Some(drag.panel_id),
            InteractionState::Idle => None,
        }
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selection.selected_id()
    }

    /// Feeds one input event through the state machine.
    pub fn handle(&mut self, event: InputEvent, store: &mut PanelStore) -> InteractionOutcome {
        match event {
            InputEvent::PointerDown(p) | InputEvent::TouchStart(p) => self.pointer_down(p, store),
            InputEvent::PointerMove(p) | InputEvent::TouchMove(p) => self.pointer_move(p, store),
            InputEvent::PointerUp | InputEvent::TouchEnd => self.pointer_up(),
            InputEvent::Click(p) => self.click(p, store),
            InputEvent::DoubleClick(p) => self.double_click(p, store),
            InputEvent::KeyDown(key) => self.key_down(key, store),
        }
    }

    /// Drops any reference to a panel deleted outside the controller.
    pub fn forget(&mut self, id: u64, store: &mut PanelStore) {
        if self.selection.forget(id) {
            store.set_selected(None);
        }
        if self.dragged_id() == Some(id) {
            self.state = InteractionState::Idle;
        }
    }

    /// Returns to idle with no selection, e.g. after the layout was reset.
    pub fn reset(&mut self, store: &mut PanelStore) {
        self.state = InteractionState::Idle;
        self.suppress_click = false;
        self.selection.clear(store);
    }

    fn to_local(&self, p: CanvasPoint) -> CanvasPoint {
        p.offset_from(self.area_origin)
    }

    fn pointer_down(&mut self, p: CanvasPoint, store: &PanelStore) -> InteractionOutcome {
        if self.is_dragging() {
            tracing::trace!("Ignoring pointer-down during an active drag");
            return InteractionOutcome::None;
        }
        self.suppress_click = false;

        let local = self.to_local(p);
        let Some(panel) = store.hit_test(local.x, local.y) else {
            return InteractionOutcome::None;
        };

        let drag = DragState {
            panel_id: panel.id,
            pointer_offset: local.offset_from(panel.origin()),
            moved: false,
        };
        self.state = InteractionState::Dragging(drag);
        InteractionOutcome::DragStarted { id: panel.id }
    }

    fn pointer_move(&mut self, p: CanvasPoint, store: &mut PanelStore) -> InteractionOutcome {
        let InteractionState::Dragging(mut drag) = self.state else {
            return InteractionOutcome::None;
        };

        let candidate = self.to_local(p).offset_from(drag.pointer_offset);
        match store.update_position(drag.panel_id, candidate.x, candidate.y) {
            Some((x, y)) => {
                drag.moved = true;
                self.state = InteractionState::Dragging(drag);
                InteractionOutcome::Moved {
                    id: drag.panel_id,
                    x,
                    y,
                }
            }
            None => InteractionOutcome::None,
        }
    }

    fn pointer_up(&mut self) -> InteractionOutcome {
        match std::mem::replace(&mut self.state, InteractionState::Idle) {
            InteractionState::Dragging(drag) => {
                self.suppress_click = drag.moved;
                InteractionOutcome::DragEnded {
                    id: drag.panel_id,
                    moved: drag.moved,
                }
            }
            InteractionState::Idle => InteractionOutcome::None,
        }
    }

    fn click(&mut self, p: CanvasPoint, store: &mut PanelStore) -> InteractionOutcome {
        if std::mem::take(&mut self.suppress_click) {
            return InteractionOutcome::None;
        }

        let local = self.to_local(p);
        let changed = match store.hit_test(local.x, local.y).map(|panel| panel.id) {
            Some(id) => self.selection.select(store, id),
            None => self.selection.clear(store),
        };

        if changed {
            InteractionOutcome::SelectionChanged {
                id: self.selection.selected_id(),
            }
        } else {
            InteractionOutcome::None
        }
    }

    fn double_click(&mut self, p: CanvasPoint, store: &mut PanelStore) -> InteractionOutcome {
        let local = self.to_local(p);
        let Some(id) = store.hit_test(local.x, local.y).map(|panel| panel.id) else {
            return InteractionOutcome::None;
        };
        self.delete(id, store)
    }

    fn key_down(&mut self, key: Key, store: &mut PanelStore) -> InteractionOutcome {
        match (key, self.selection.selected_id()) {
            (Key::Delete | Key::Backspace, Some(id)) => self.delete(id, store),
            _ => InteractionOutcome::None,
        }
    }

    fn delete(&mut self, id: u64, store: &mut PanelStore) -> InteractionOutcome {
        let removed = store.remove(id);
        self.forget(id, store);
        if removed {
            InteractionOutcome::Deleted { id }
        } else {
            InteractionOutcome::None
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (InteractionController, PanelStore) {
        let mut store = PanelStore::new(800.0, 600.0, 100.0, 100.0);
        store.add(); // id 0 at (50, 50)
        store.add(); // id 1 at (170, 50)
        (InteractionController::new(), store)
    }

    fn pt(x: f64, y: f64) -> CanvasPoint {
        CanvasPoint::new(x, y)
    }

    #[test]
    fn test_drag_keeps_pointer_offset() {
        let (mut ctl, mut store) = setup();

        let outcome = ctl.handle(InputEvent::PointerDown(pt(60.0, 70.0)), &mut store);
        assert_eq!(outcome, InteractionOutcome::DragStarted { id: 0 });

        let outcome = ctl.handle(InputEvent::PointerMove(pt(310.0, 320.0)), &mut store);
        assert_eq!(
            outcome,
            InteractionOutcome::Moved {
                id: 0,
                x: 300.0,
                y: 300.0
            }
        );

        let outcome = ctl.handle(InputEvent::PointerUp, &mut store);
        assert_eq!(outcome, InteractionOutcome::DragEnded { id: 0, moved: true });
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn test_drag_respects_area_origin_and_clamp() {
        let (mut ctl, mut store) = setup();
        ctl.set_area_origin(pt(100.0, 200.0));

        ctl.handle(InputEvent::TouchStart(pt(150.0, 250.0)), &mut store);
        let outcome = ctl.handle(InputEvent::TouchMove(pt(5000.0, -5000.0)), &mut store);
        assert_eq!(
            outcome,
            InteractionOutcome::Moved {
                id: 0,
                x: 700.0,
                y: 0.0
            }
        );
        ctl.handle(InputEvent::TouchEnd, &mut store);
    }

    #[test]
    fn test_pointer_down_on_empty_area_stays_idle() {
        let (mut ctl, mut store) = setup();
        let outcome = ctl.handle(InputEvent::PointerDown(pt(600.0, 500.0)), &mut store);
        assert_eq!(outcome, InteractionOutcome::None);
        assert_eq!(ctl.state(), InteractionState::Idle);
        assert_eq!(
            ctl.handle(InputEvent::PointerMove(pt(10.0, 10.0)), &mut store),
            InteractionOutcome::None
        );
        assert_eq!(
            ctl.handle(InputEvent::PointerUp, &mut store),
            InteractionOutcome::None
        );
    }

    #[test]
    fn test_second_pointer_down_ignored() {
        let (mut ctl, mut store) = setup();
        ctl.handle(InputEvent::PointerDown(pt(60.0, 60.0)), &mut store);
        let outcome = ctl.handle(InputEvent::PointerDown(pt(180.0, 60.0)), &mut store);
        assert_eq!(outcome, InteractionOutcome::None);
        assert_eq!(ctl.dragged_id(), Some(0));
    }

    #[test]
    fn test_click_selects_and_empty_click_clears() {
        let (mut ctl, mut store) = setup();

        let outcome = ctl.handle(InputEvent::Click(pt(200.0, 60.0)), &mut store);
        assert_eq!(outcome, InteractionOutcome::SelectionChanged { id: Some(1) });
        assert!(store.get(1).unwrap().selected);

        let outcome = ctl.handle(InputEvent::Click(pt(700.0, 500.0)), &mut store);
        assert_eq!(outcome, InteractionOutcome::SelectionChanged { id: None });
        assert_eq!(ctl.selected_id(), None);
    }

    #[test]
    fn test_press_release_without_move_then_click_selects() {
        let (mut ctl, mut store) = setup();
        ctl.handle(InputEvent::PointerDown(pt(60.0, 60.0)), &mut store);
        let outcome = ctl.handle(InputEvent::PointerUp, &mut store);
        assert_eq!(outcome, InteractionOutcome::DragEnded { id: 0, moved: false });

        let outcome = ctl.handle(InputEvent::Click(pt(60.0, 60.0)), &mut store);
        assert_eq!(outcome, InteractionOutcome::SelectionChanged { id: Some(0) });
    }

    #[test]
    fn test_click_after_drag_move_is_suppressed() {
        let (mut ctl, mut store) = setup();
        ctl.handle(InputEvent::PointerDown(pt(60.0, 60.0)), &mut store);
        ctl.handle(InputEvent::PointerMove(pt(90.0, 90.0)), &mut store);
        ctl.handle(InputEvent::PointerUp, &mut store);

        let outcome = ctl.handle(InputEvent::Click(pt(90.0, 90.0)), &mut store);
        assert_eq!(outcome, InteractionOutcome::None);
        assert_eq!(ctl.selected_id(), None);

        // only the one trailing click is swallowed
        let outcome = ctl.handle(InputEvent::Click(pt(90.0, 90.0)), &mut store);
        assert_eq!(outcome, InteractionOutcome::SelectionChanged { id: Some(0) });
    }

    #[test]
    fn test_double_click_deletes_and_clears_selection() {
        let (mut ctl, mut store) = setup();
        ctl.handle(InputEvent::Click(pt(60.0, 60.0)), &mut store);

        let outcome = ctl.handle(InputEvent::DoubleClick(pt(60.0, 60.0)), &mut store);
        assert_eq!(outcome, InteractionOutcome::Deleted { id: 0 });
        assert_eq!(store.count(), 1);
        assert_eq!(ctl.selected_id(), None);

        let outcome = ctl.handle(InputEvent::DoubleClick(pt(700.0, 500.0)), &mut store);
        assert_eq!(outcome, InteractionOutcome::None);
    }

    #[test]
    fn test_delete_key_removes_selected() {
        let (mut ctl, mut store) = setup();

        assert_eq!(
            ctl.handle(InputEvent::KeyDown(Key::Delete), &mut store),
            InteractionOutcome::None
        );

        ctl.handle(InputEvent::Click(pt(200.0, 60.0)), &mut store);
        let outcome = ctl.handle(InputEvent::KeyDown(Key::Backspace), &mut store);
        assert_eq!(outcome, InteractionOutcome::Deleted { id: 1 });
        assert_eq!(ctl.selected_id(), None);
        assert!(store.get(1).is_none());

        assert_eq!(
            ctl.handle(InputEvent::KeyDown(Key::Other), &mut store),
            InteractionOutcome::None
        );
    }

    #[test]
    fn test_stale_drag_target_is_noop() {
        let (mut ctl, mut store) = setup();
        ctl.handle(InputEvent::PointerDown(pt(60.0, 60.0)), &mut store);
        store.remove(0);

        assert_eq!(
            ctl.handle(InputEvent::PointerMove(pt(300.0, 300.0)), &mut store),
            InteractionOutcome::None
        );
        assert_eq!(
            ctl.handle(InputEvent::PointerUp, &mut store),
            InteractionOutcome::DragEnded { id: 0, moved: false }
        );
    }

    #[test]
    fn test_topmost_panel_is_dragged() {
        let mut store = PanelStore::new(800.0, 600.0, 100.0, 100.0);
        store.add();
        let top = store.add().id;
        store.update_position(top, 60.0, 60.0);

        let mut ctl = InteractionController::new();
        let outcome = ctl.handle(InputEvent::PointerDown(pt(100.0, 100.0)), &mut store);
        assert_eq!(outcome, InteractionOutcome::DragStarted { id: top });
    }
}
