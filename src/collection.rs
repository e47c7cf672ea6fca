//! Ordered collection of accepted colors
//!
//! Entries keep their insertion order and carry a stable [`EntryId`]
//! assigned when they are inserted. Display names are attached to that id,
//! so removing an entry never moves a name onto a different color.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::ColorValue;
use crate::error::{PaletteError, Result};

/// Stable identifier of a collection entry, never reused within a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One accepted color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub id: EntryId,
    /// Normalized textual form, unique within the collection
    pub normalized: String,
    pub value: ColorValue,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ColorCollection {
    entries: Vec<ColorEntry>,
    next_id: u64,
}

impl ColorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in display order
    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ColorEntry> {
        self.entries.get(index)
    }

    pub fn get_by_id(&self, id: EntryId) -> Option<&ColorEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Whether an entry with exactly this normalized string exists
    pub fn contains(&self, normalized: &str) -> bool {
        self.entries.iter().any(|e| e.normalized == normalized)
    }

    pub fn values(&self) -> impl Iterator<Item = &ColorValue> + '_ {
        self.entries.iter().map(|e| &e.value)
    }

    /// Normalized strings in display order
    pub fn normalized(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.normalized.as_str())
    }

    /// Append an entry
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::DuplicateColor`] if an entry with the same
    /// normalized string already exists; the collection is unchanged.
    pub fn insert(&mut self, normalized: String, value: ColorValue) -> Result<EntryId> {
        if self.contains(&normalized) {
            return Err(PaletteError::DuplicateColor { color: normalized });
        }
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(ColorEntry {
            id,
            normalized,
            value,
            name: None,
        });
        Ok(id)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(PaletteError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    /// Remove the entry at `index`, keeping the others in order
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::IndexOutOfRange`] for an invalid index.
    pub fn remove(&mut self, index: usize) -> Result<ColorEntry> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    /// Set or clear the display name of the entry at `index`
    ///
    /// Blank names clear the name.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::IndexOutOfRange`] for an invalid index.
    pub fn rename(&mut self, index: usize, name: &str) -> Result<EntryId> {
        self.check_index(index)?;
        let entry = &mut self.entries[index];
        let trimmed = name.trim();
        entry.name = (!trimmed.is_empty()).then(|| trimmed.to_string());
        Ok(entry.id)
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.entries.get(index).and_then(|e| e.name.as_deref())
    }

    /// Remove every entry; ids keep increasing afterwards
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
