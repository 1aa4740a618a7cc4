//! List and record reconciliation.
//!
//! Slices hold backend records in a [`Collection`]: an ordered list plus an
//! optional "current" selection. Fulfilled operations fold their payload into
//! the collection with one of the rules below.
//!
//! | Rule | Method |
//! |---|---|
//! | full replace (missing data → empty) | [`Collection::replace_all`] |
//! | append | [`Collection::append`] |
//! | update-by-id, no insert | [`Collection::update_by_id`] |
//! | delete-by-id | [`Collection::remove_by_id`] |
//! | upsert-first | [`Collection::upsert_first`] |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned record identifier (`_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A record that may carry a backend identifier.
pub trait Identified {
    /// The record's identifier, if the backend assigned one.
    fn id(&self) -> Option<&RecordId>;

    /// Whether the record carries `id`.
    fn has_id(&self, id: &RecordId) -> bool {
        self.id() == Some(id)
    }
}

/// Ordered records plus the currently selected one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection<T> {
    items: Vec<T>,
    current: Option<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: None,
        }
    }
}

impl<T> Collection<T> {
    /// Create an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            current: None,
        }
    }

    /// The records in backend order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The selected record.
    #[must_use]
    pub const fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the whole list. A missing payload empties it.
    pub fn replace_all(&mut self, items: Option<Vec<T>>) {
        self.items = items.unwrap_or_default();
    }

    /// Append a created record. A missing payload is ignored.
    pub fn append(&mut self, item: Option<T>) {
        if let Some(item) = item {
            self.items.push(item);
        }
    }

    /// Replace element 0, or create a one-element list when empty.
    pub fn upsert_first(&mut self, item: Option<T>) {
        let Some(item) = item else {
            return;
        };
        match self.items.first_mut() {
            Some(first) => *first = item,
            None => self.items.push(item),
        }
    }

    /// Select a record, or clear the selection.
    pub fn set_current(&mut self, current: Option<T>) {
        self.current = current;
    }

    /// Drop every record and the selection.
    pub fn clear(&mut self) {
        self.items.clear();
        self.current = None;
    }
}

impl<T> Collection<T>
where
    T: Identified + Clone,
{
    /// Find a record by identifier.
    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.has_id(id))
    }

    /// Replace the record with the same identifier in place.
    ///
    /// Records without an identifier and unknown identifiers leave the list
    /// untouched; nothing is inserted. The selection is replaced too when it
    /// carries the same identifier. Returns whether a list entry was replaced.
    pub fn update_by_id(&mut self, item: T) -> bool {
        let Some(id) = item.id().cloned() else {
            return false;
        };

        if self.current.as_ref().is_some_and(|current| current.has_id(&id)) {
            self.current = Some(item.clone());
        }

        match self.items.iter_mut().find(|existing| existing.has_id(&id)) {
            Some(existing) => {
                *existing = item;
                true
            },
            None => false,
        }
    }

    /// Remove every record carrying `id` and clear the selection if it matches.
    ///
    /// Returns the number of list entries removed.
    pub fn remove_by_id(&mut self, id: &RecordId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.has_id(id));

        if self.current.as_ref().is_some_and(|current| current.has_id(id)) {
            self.current = None;
        }

        before - self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: Option<RecordId>,
        title: String,
    }

    impl Entry {
        fn new(id: &str, title: &str) -> Self {
            Self {
                id: Some(RecordId::from(id)),
                title: title.to_string(),
            }
        }
    }

    impl Identified for Entry {
        fn id(&self) -> Option<&RecordId> {
            self.id.as_ref()
        }
    }

    fn collection(entries: &[(&str, &str)]) -> Collection<Entry> {
        let mut collection = Collection::new();
        collection.replace_all(Some(
            entries
                .iter()
                .map(|(id, title)| Entry::new(id, title))
                .collect(),
        ));
        collection
    }

    #[test]
    fn create_on_empty_list_yields_exactly_that_entry() {
        let mut entries = Collection::new();
        entries.append(Some(Entry::new("new1", "First")));

        assert_eq!(entries.items(), &[Entry::new("new1", "First")]);
    }

    #[test]
    fn missing_fetch_payload_empties_the_list() {
        let mut entries = collection(&[("a", "A")]);
        entries.replace_all(None);

        assert!(entries.is_empty());
    }

    #[test]
    fn update_syncs_matching_current() {
        let mut entries = collection(&[("a", "A"), ("b", "B")]);
        entries.set_current(Some(Entry::new("b", "B")));

        assert!(entries.update_by_id(Entry::new("b", "B2")));

        assert_eq!(entries.items()[1].title, "B2");
        assert_eq!(entries.current().map(|e| e.title.as_str()), Some("B2"));
    }

    #[test]
    fn update_leaves_unrelated_current_alone() {
        let mut entries = collection(&[("a", "A")]);
        entries.set_current(Some(Entry::new("z", "Z")));

        entries.update_by_id(Entry::new("a", "A2"));

        assert_eq!(entries.current().map(|e| e.title.as_str()), Some("Z"));
    }

    #[test]
    fn update_without_id_is_ignored() {
        let mut entries = collection(&[("a", "A")]);
        let anonymous = Entry {
            id: None,
            title: "?".to_string(),
        };

        assert!(!entries.update_by_id(anonymous));
        assert_eq!(entries.items()[0].title, "A");
    }

    #[test]
    fn delete_clears_matching_current() {
        let mut entries = collection(&[("a", "A"), ("b", "B")]);
        entries.set_current(Some(Entry::new("a", "A")));

        assert_eq!(entries.remove_by_id(&RecordId::from("a")), 1);

        assert_eq!(entries.len(), 1);
        assert!(entries.current().is_none());
    }

    #[test]
    fn upsert_first_replaces_or_creates() {
        let mut entries = Collection::new();
        entries.upsert_first(Some(Entry::new("c", "One")));
        entries.upsert_first(Some(Entry::new("c", "Two")));
        entries.upsert_first(None);

        assert_eq!(entries.items(), &[Entry::new("c", "Two")]);
    }

    fn arb_entries() -> impl Strategy<Value = Vec<Entry>> {
        prop::collection::vec(("[a-d]", "[a-z]{1,6}"), 0..12).prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(id, title)| Entry::new(&id, &title))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn fetch_all_is_idempotent(entries in arb_entries()) {
            let mut once = Collection::new();
            once.replace_all(Some(entries.clone()));
            let mut twice = once.clone();
            twice.replace_all(Some(entries));

            prop_assert_eq!(once, twice);
        }

        #[test]
        fn delete_removes_every_matching_entry(entries in arb_entries(), id in "[a-d]") {
            let id = RecordId::from(id);
            let mut collection = Collection::new();
            collection.replace_all(Some(entries.clone()));
            collection.set_current(entries.iter().find(|e| e.has_id(&id)).cloned());

            let removed = collection.remove_by_id(&id);

            prop_assert_eq!(removed, entries.iter().filter(|e| e.has_id(&id)).count());
            prop_assert!(collection.items().iter().all(|e| !e.has_id(&id)));
            prop_assert!(collection.current().is_none());
        }

        #[test]
        fn update_with_unknown_id_leaves_list_unchanged(entries in arb_entries(), title in "[a-z]{1,6}") {
            let mut collection = Collection::new();
            collection.replace_all(Some(entries.clone()));

            let replaced = collection.update_by_id(Entry::new("unknown", &title));

            prop_assert!(!replaced);
            prop_assert_eq!(collection.items(), entries.as_slice());
        }
    }
}
