//! # Field Registry
//!
//! The in-memory working set of one card opened through the flat-file path.
//!
//! ## Ids Are Positions
//!
//! A record's id is its position. Deleting a record shifts every later record
//! down by one, so ids always form the dense sequence `0..n-1` in insertion
//! order. Anything holding an id across a delete must re-resolve it.
//!
//! ## Selection Is Membership
//!
//! The selected subset does not own records. Each record carries a private,
//! never-reused key; the subset is an ordered list of those keys. Renumbering
//! ids therefore never invalidates a selection, and deleting a record drops it
//! from the subset.
//!
//! A registry is owned by exactly one [`crate::session::FlatFileSession`].
//! There is no shared instance to reset when switching cards.

use crate::model::{now_millis, FieldId, FieldRecord};

#[derive(Debug, Clone)]
struct Entry {
    key: u64,
    record: FieldRecord,
}

#[derive(Debug, Default, Clone)]
pub struct FieldRegistry {
    entries: Vec<Entry>,
    selected: Vec<u64>,
    next_key: u64,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every record in order.
    pub fn items(&self) -> Vec<FieldRecord> {
        self.entries.iter().map(|e| e.record.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn get(&self, id: FieldId) -> Option<&FieldRecord> {
        self.position(id).map(|pos| &self.entries[pos].record)
    }

    /// Appends a record and returns its id.
    pub fn add_item(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        is_pinned: bool,
    ) -> FieldId {
        let id = self.entries.len() as FieldId;
        let key = self.next_key;
        self.next_key += 1;
        self.entries.push(Entry {
            key,
            record: FieldRecord {
                id,
                title: title.into(),
                description: description.into(),
                is_selected: false,
                is_pinned,
                created_at: now_millis(),
            },
        });
        id
    }

    /// Removes the record at `id` and renumbers the rest.
    pub fn delete_item(&mut self, id: FieldId) -> Option<FieldRecord> {
        let pos = self.position(id)?;
        let entry = self.entries.remove(pos);
        self.selected.retain(|key| *key != entry.key);
        self.reassign_ids();

        let mut record = entry.record;
        record.is_selected = false;
        Some(record)
    }

    /// Drops every record and the selection.
    pub fn delete_all_items(&mut self) {
        self.entries.clear();
        self.selected.clear();
    }

    /// Returns false if `id` does not exist.
    pub fn update_item(
        &mut self,
        id: FieldId,
        title: impl Into<String>,
        description: impl Into<String>,
        is_pinned: bool,
    ) -> bool {
        let Some(record) = self.record_mut(id) else {
            return false;
        };
        record.title = title.into();
        record.description = description.into();
        record.is_pinned = is_pinned;
        true
    }

    /// Flips the pin flag. Returns the new value.
    pub fn toggle_pin(&mut self, id: FieldId) -> Option<bool> {
        let record = self.record_mut(id)?;
        record.is_pinned = !record.is_pinned;
        Some(record.is_pinned)
    }

    /// Flips selection membership. Returns the new value.
    pub fn toggle_selection(&mut self, id: FieldId) -> Option<bool> {
        let selected = self.get(id)?.is_selected;
        if selected {
            self.remove_from_selected(id);
        } else {
            self.push_to_selected(id);
        }
        Some(!selected)
    }

    /// Adds `id` to the selected subset. Returns false if it does not exist.
    /// Selecting twice is a no-op.
    pub fn push_to_selected(&mut self, id: FieldId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        let entry = &mut self.entries[pos];
        if !self.selected.contains(&entry.key) {
            self.selected.push(entry.key);
        }
        entry.record.is_selected = true;
        true
    }

    /// Removes `id` from the selected subset. The record itself stays.
    pub fn remove_from_selected(&mut self, id: FieldId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        let entry = &mut self.entries[pos];
        entry.record.is_selected = false;
        let before = self.selected.len();
        self.selected.retain(|key| *key != entry.key);
        self.selected.len() != before
    }

    pub fn clear_selected(&mut self) {
        self.selected.clear();
        for entry in &mut self.entries {
            entry.record.is_selected = false;
        }
    }

    /// Selected records, in the order they were selected.
    pub fn selected(&self) -> Vec<FieldRecord> {
        self.selected
            .iter()
            .filter_map(|key| self.entries.iter().find(|e| e.key == *key))
            .map(|e| e.record.clone())
            .collect()
    }

    /// Deletes every selected record, then clears the subset. Returns how many
    /// records were removed.
    pub fn delete_selected_nodes(&mut self) -> usize {
        let keys = std::mem::take(&mut self.selected);
        let before = self.entries.len();
        self.entries.retain(|e| !keys.contains(&e.key));
        self.reassign_ids();
        before - self.entries.len()
    }

    fn position(&self, id: FieldId) -> Option<usize> {
        usize::try_from(id).ok().filter(|pos| *pos < self.entries.len())
    }

    fn record_mut(&mut self, id: FieldId) -> Option<&mut FieldRecord> {
        let pos = self.position(id)?;
        Some(&mut self.entries[pos].record)
    }

    fn reassign_ids(&mut self) {
        for (pos, entry) in self.entries.iter_mut().enumerate() {
            entry.record.id = pos as FieldId;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(titles: &[&str]) -> FieldRegistry {
        let mut registry = FieldRegistry::new();
        for title in titles {
            registry.add_item(*title, "", false);
        }
        registry
    }

    fn titles(registry: &FieldRegistry) -> Vec<String> {
        registry.iter().map(|r| r.title.clone()).collect()
    }

    fn ids(registry: &FieldRegistry) -> Vec<FieldId> {
        registry.iter().map(|r| r.id).collect()
    }

    #[test]
    fn add_assigns_sequential_ids() {
        let mut registry = FieldRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.add_item("a", "", false), 0);
        assert_eq!(registry.add_item("b", "", true), 1);
        assert!(!registry.is_empty());
        assert!(registry.get(1).unwrap().is_pinned);
    }

    #[test]
    fn delete_keeps_ids_dense_and_order_stable() {
        let mut registry = registry_with(&["a", "b", "c", "d"]);

        let removed = registry.delete_item(1).unwrap();
        assert_eq!(removed.title, "b");
        assert_eq!(ids(&registry), vec![0, 1, 2]);
        assert_eq!(titles(&registry), vec!["a", "c", "d"]);

        registry.delete_item(0);
        assert_eq!(ids(&registry), vec![0, 1]);
        assert_eq!(titles(&registry), vec!["c", "d"]);
    }

    #[test]
    fn delete_out_of_range_is_none() {
        let mut registry = registry_with(&["a"]);
        assert!(registry.delete_item(5).is_none());
        assert!(registry.delete_item(-1).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn add_after_delete_continues_dense() {
        let mut registry = registry_with(&["a", "b"]);
        registry.delete_item(0);
        assert_eq!(registry.add_item("c", "", false), 1);
        assert_eq!(ids(&registry), vec![0, 1]);
    }

    #[test]
    fn deleting_last_record_empties_registry() {
        let mut registry = registry_with(&["a"]);
        registry.delete_item(0);
        assert!(registry.is_empty());
        assert_eq!(registry.add_item("b", "", false), 0);
    }

    #[test]
    fn delete_all_resets() {
        let mut registry = registry_with(&["a", "b"]);
        registry.push_to_selected(0);
        registry.delete_all_items();
        assert!(registry.is_empty());
        assert!(registry.selected().is_empty());
        assert_eq!(registry.add_item("c", "", false), 0);
    }

    #[test]
    fn selection_survives_renumbering() {
        let mut registry = registry_with(&["a", "b", "c"]);
        registry.push_to_selected(2);
        registry.delete_item(0);

        let selected = registry.selected();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].title, "c");
        assert_eq!(selected[0].id, 1);
        assert!(selected[0].is_selected);
    }

    #[test]
    fn push_twice_selects_once() {
        let mut registry = registry_with(&["a"]);
        assert!(registry.push_to_selected(0));
        assert!(registry.push_to_selected(0));
        assert_eq!(registry.selected().len(), 1);
        assert!(!registry.push_to_selected(3));
    }

    #[test]
    fn remove_from_selected_keeps_record() {
        let mut registry = registry_with(&["a", "b"]);
        registry.push_to_selected(0);
        assert!(registry.remove_from_selected(0));
        assert!(!registry.remove_from_selected(0));
        assert_eq!(registry.len(), 2);
        assert!(!registry.get(0).unwrap().is_selected);
    }

    #[test]
    fn delete_selected_nodes_removes_subset_and_renumbers() {
        let mut registry = registry_with(&["a", "b", "c", "d", "e"]);
        registry.push_to_selected(3);
        registry.push_to_selected(1);

        assert_eq!(registry.delete_selected_nodes(), 2);
        assert_eq!(titles(&registry), vec!["a", "c", "e"]);
        assert_eq!(ids(&registry), vec![0, 1, 2]);
        assert!(registry.selected().is_empty());
    }

    #[test]
    fn deleting_selected_record_drops_membership() {
        let mut registry = registry_with(&["a", "b"]);
        registry.push_to_selected(1);
        registry.delete_item(1);
        assert!(registry.selected().is_empty());
        assert_eq!(registry.delete_selected_nodes(), 0);
    }

    #[test]
    fn update_and_toggles() {
        let mut registry = registry_with(&["a"]);
        assert!(registry.update_item(0, "A", "desc", true));
        assert!(!registry.update_item(1, "x", "", false));

        let record = registry.get(0).unwrap();
        assert_eq!(record.title, "A");
        assert_eq!(record.description, "desc");
        assert!(record.is_pinned);

        assert_eq!(registry.toggle_pin(0), Some(false));
        assert_eq!(registry.toggle_pin(0), Some(true));
        assert_eq!(registry.toggle_pin(9), None);

        assert_eq!(registry.toggle_selection(0), Some(true));
        assert_eq!(registry.selected().len(), 1);
        assert_eq!(registry.toggle_selection(0), Some(false));
        assert!(registry.selected().is_empty());
    }

    #[test]
    fn clear_selected_unflags_records() {
        let mut registry = registry_with(&["a", "b"]);
        registry.push_to_selected(0);
        registry.push_to_selected(1);
        registry.clear_selected();
        assert!(registry.selected().is_empty());
        assert!(registry.iter().all(|r| !r.is_selected));
    }
}
