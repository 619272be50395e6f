//! Destination list editor
//!
//! The list is treated as a value: each edit returns a fresh list and leaves
//! the receiver alone, so the form can compare before/after snapshots.

use crate::form::capitalize_first;

/// Ordered trip destinations. Always holds at least one entry; the last one
/// may be empty while the user is still typing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations(Vec<String>);

impl Default for Destinations {
    fn default() -> Self {
        Self(vec![String::new()])
    }
}

impl Destinations {
    /// Build from backend data. An empty list becomes a single blank entry.
    pub fn from_vec(items: Vec<String>) -> Self {
        if items.is_empty() {
            Self::default()
        } else {
            Self(items)
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether a remove control should be offered at all
    pub fn can_remove(&self) -> bool {
        self.0.len() > 1
    }

    /// Append a blank destination
    pub fn add(&self) -> Self {
        let mut items = self.0.clone();
        items.push(String::new());
        Self(items)
    }

    /// Remove the destination at `index`. Never removes the last one left.
    pub fn remove(&self, index: usize) -> Self {
        if !self.can_remove() || index >= self.0.len() {
            return self.clone();
        }
        let mut items = self.0.clone();
        items.remove(index);
        Self(items)
    }

    /// Replace the destination at `index`, capitalizing its first character
    pub fn edit(&self, index: usize, text: &str) -> Self {
        let mut items = self.0.clone();
        if let Some(slot) = items.get_mut(index) {
            *slot = capitalize_first(text);
        }
        Self(items)
    }
}
