//! Row selection for bulk actions

use indexmap::IndexSet;

/// Ordered set of selected record identifiers
///
/// Insertion order is kept so bulk actions run in the order rows were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: IndexSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present; returns whether it is now selected
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.shift_remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    pub fn deselect(&mut self, id: &str) {
        self.ids.shift_remove(id);
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Replace the selection with exactly the visible identifiers
    pub fn select_all<I, S>(&mut self, visible: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = visible.into_iter().map(Into::into).collect();
    }

    /// Header-checkbox behavior: when every visible id is already selected
    /// the selection is cleared, otherwise it becomes exactly the visible ids.
    pub fn toggle_all<S: AsRef<str>>(&mut self, visible: &[S]) {
        let all_selected = !visible.is_empty() && visible.iter().all(|id| self.is_selected(id.as_ref()));
        if all_selected {
            self.clear();
        } else {
            self.select_all(visible.iter().map(|id| id.as_ref().to_string()));
        }
    }

    /// Whether every one of `visible` is selected (false when nothing is visible)
    pub fn all_selected<S: AsRef<str>>(&self, visible: &[S]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.is_selected(id.as_ref()))
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop identifiers that no longer exist after a refresh
    pub fn retain_known<'a, I>(&mut self, known: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let known: IndexSet<&str> = known.into_iter().collect();
        self.ids.retain(|id| known.contains(id.as_str()));
    }

    /// Selected identifiers in selection order
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
