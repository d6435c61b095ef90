use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{file, Persistable, ShortcutLookup};
use crate::error::{SmartKeyError, StoreError};

const DELIMITER: char = '|';

/// A shortcut and the text it expands to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub shortcut: SmolStr,
    pub substitution: SmolStr,
}

impl Entry {
    pub fn new(shortcut: impl Into<SmolStr>, substitution: impl Into<SmolStr>) -> Entry {
        Entry {
            shortcut: shortcut.into(),
            substitution: substitution.into(),
        }
    }
}

/// Shortcut to substitution pairs, stored as `shortcut|substitution` lines.
#[derive(Debug, Default, Clone)]
pub struct PairStore {
    pairs: HashMap<SmolStr, SmolStr>,
    initialized: bool,
    dirty: bool,
}

/// Whether `text` can be written as one side of a pair line.
pub(crate) fn is_storable(text: &str) -> bool {
    !text.is_empty() && !text.contains(|c: char| c == DELIMITER || c == '\n' || c == '\r')
}

impl PairStore {
    pub fn new() -> PairStore {
        PairStore::default()
    }

    /// Inserts or replaces the mapping for `shortcut`.
    pub fn add(&mut self, shortcut: &str, substitution: &str) -> Result<(), SmartKeyError> {
        if !is_storable(shortcut) || !is_storable(substitution) {
            return Err(SmartKeyError::BadWord);
        }

        let previous = self
            .pairs
            .insert(SmolStr::new(shortcut), SmolStr::new(substitution));
        if previous.as_deref() != Some(substitution) {
            self.dirty = true;
        }
        Ok(())
    }

    /// Returns whether a mapping was removed.
    pub fn remove(&mut self, shortcut: &str) -> bool {
        let removed = self.pairs.remove(shortcut).is_some();
        self.dirty |= removed;
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &SmolStr)> {
        self.pairs.iter()
    }
}

impl Persistable for PairStore {
    type Item = Entry;

    fn load(&mut self, path: &Path) -> Result<(), StoreError> {
        self.pairs.clear();
        self.initialized = false;
        self.dirty = false;

        let bytes = match file::read(path)? {
            Some(bytes) => bytes,
            None => return Ok(()),
        };

        for line in file::lines(&bytes) {
            let line = String::from_utf8_lossy(line);
            match line.split_once(DELIMITER) {
                Some((shortcut, substitution)) if !shortcut.is_empty() && !substitution.is_empty() => {
                    self.pairs
                        .insert(SmolStr::new(shortcut), SmolStr::new(substitution));
                }
                _ => log::trace!("skipping malformed line in {}: {:?}", path.display(), line),
            }
        }

        self.initialized = true;
        log::debug!("loaded {} pairs from {}", self.pairs.len(), path.display());
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }

        let mut pairs: Vec<_> = self.pairs.iter().collect();
        pairs.sort();
        file::write_lines(
            path,
            pairs
                .into_iter()
                .map(|(shortcut, substitution)| format!("{}{}{}", shortcut, DELIMITER, substitution)),
        )?;

        self.dirty = false;
        log::debug!("saved {} pairs to {}", self.pairs.len(), path.display());
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn len(&self) -> usize {
        self.pairs.len()
    }

    fn export_all(&self) -> Vec<Entry> {
        self.pairs
            .iter()
            .map(|(shortcut, substitution)| Entry::new(shortcut.clone(), substitution.clone()))
            .collect()
    }
}

impl ShortcutLookup for PairStore {
    fn find(&self, shortcut: &str) -> Option<SmolStr> {
        self.pairs.get(shortcut).cloned()
    }

    fn find_by_prefix(&self, prefix: &str) -> Option<SmolStr> {
        self.pairs
            .values()
            .filter(|substitution| substitution.starts_with(prefix))
            .min()
            .cloned()
    }
}
