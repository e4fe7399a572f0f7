use crate::panel_store::PanelStore;

/// Tracks the single selected panel.
///
/// `SelectionManager` is responsible for:
/// - Holding at most one selected panel id
/// - Keeping the panels' `selected` flags in sync with that id
/// - Dropping the selection when the selected panel goes away
///
/// Unknown ids are never selected; asking for one clears nothing and
/// reports `false`.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected_id: Option<u64>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use solarkit_designer::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new();
    /// assert_eq!(manager.selected_id(), None);
    /// ```
    pub fn new() -> Self {
        Self { selected_id: None }
    }

    /// Returns the ID of the selected panel.
    pub fn selected_id(&self) -> Option<u64> {
        self.selected_id
    }

    /// Selects a panel.
    ///
    /// Returns `true` if the selection changed. Selecting an id that is not
    /// in the store is ignored.
    pub fn select(&mut self, store: &mut PanelStore, id: u64) -> bool {
        if store.get(id).is_none() || self.selected_id == Some(id) {
            return false;
        }
        self.selected_id = Some(id);
        store.set_selected(self.selected_id);
        true
    }

    /// Clears the selection. Returns `true` if something was selected.
    pub fn clear(&mut self, store: &mut PanelStore) -> bool {
        let had_selection = self.selected_id.take().is_some();
        store.set_selected(None);
        had_selection
    }

    /// Drops the selection if it points at `id`, after that panel was deleted.
    pub fn forget(&mut self, id: u64) -> bool {
        if self.selected_id == Some(id) {
            self.selected_id = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(count: usize) -> PanelStore {
        let mut store = PanelStore::new(800.0, 600.0, 100.0, 100.0);
        for _ in 0..count {
            store.add();
        }
        store
    }

    #[test]
    fn test_select_and_clear() {
        let mut store = store_with(2);
        let mut manager = SelectionManager::new();

        assert!(manager.select(&mut store, 1));
        assert_eq!(manager.selected_id(), Some(1));
        assert!(store.get(1).unwrap().selected);

        // reselecting is not a change
        assert!(!manager.select(&mut store, 1));

        assert!(manager.clear(&mut store));
        assert_eq!(manager.selected_id(), None);
        assert!(!store.get(1).unwrap().selected);
        assert!(!manager.clear(&mut store));
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut store = store_with(1);
        let mut manager = SelectionManager::new();
        manager.select(&mut store, 0);

        assert!(!manager.select(&mut store, 7));
        assert_eq!(manager.selected_id(), Some(0));
    }

    #[test]
    fn test_forget_deleted_panel() {
        let mut manager = SelectionManager::new();
        let mut store = store_with(2);
        manager.select(&mut store, 0);

        assert!(!manager.forget(1));
        assert!(manager.forget(0));
        assert_eq!(manager.selected_id(), None);
    }
}
