use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;

use super::{load_or_empty, Persistable, ShortcutLookup, WordLookup};
use crate::error::StoreError;

/// A locale-independent store paired with a locale-dependent one.
///
/// The independent half is loaded once and then shared, read-only, by every
/// bundle derived from it with [`LocaleBundle::reloaded`]. The dependent half
/// is replaced on every locale change and receives all mutations.
///
/// Word lookups consult both halves. Shortcut lookups prefer the dependent
/// half, so a user's mapping overrides a shipped one.
#[derive(Debug, Default)]
pub struct LocaleBundle<S> {
    independent: Arc<S>,
    dependent: S,
}

impl<S: Persistable + Clone> LocaleBundle<S> {
    pub fn new(independent: S, dependent: S) -> LocaleBundle<S> {
        LocaleBundle {
            independent: Arc::new(independent),
            dependent,
        }
    }

    /// Loads the independent half unless it has been loaded before, then
    /// replaces the dependent half.
    pub fn load(&mut self, independent_path: &Path, dependent_path: &Path) {
        let mut dependent = self.dependent.clone();
        load_or_empty(&mut dependent, dependent_path);
        *self = self.reloaded(Some(independent_path), dependent);
    }

    /// Builds a new bundle around `dependent`, sharing this bundle's
    /// independent half once that has been loaded. `self` is not modified.
    pub fn reloaded(&self, independent_path: Option<&Path>, dependent: S) -> LocaleBundle<S> {
        let independent = match independent_path {
            Some(path) if !self.independent.is_initialized() => {
                let mut store = S::clone(&self.independent);
                load_or_empty(&mut store, path);
                Arc::new(store)
            }
            _ => Arc::clone(&self.independent),
        };

        LocaleBundle {
            independent,
            dependent,
        }
    }

    pub fn save(&mut self, dependent_path: &Path) -> Result<(), StoreError> {
        self.dependent.save(dependent_path)
    }

    pub fn independent(&self) -> &S {
        &self.independent
    }

    pub fn dependent(&self) -> &S {
        &self.dependent
    }

    pub fn dependent_mut(&mut self) -> &mut S {
        &mut self.dependent
    }

    /// Sum of both halves; keys present in both are counted twice.
    pub fn len(&self) -> usize {
        self.independent.len() + self.dependent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_dirty(&self) -> bool {
        self.dependent.is_dirty()
    }

    pub fn export_all(&self) -> Vec<S::Item> {
        let mut items = self.independent.export_all();
        items.extend(self.dependent.export_all());
        items
    }
}

impl<S: WordLookup> WordLookup for LocaleBundle<S> {
    fn contains(&self, word: &str) -> bool {
        self.independent.contains(word) || self.dependent.contains(word)
    }

    fn find_by_prefix(&self, prefix: &str) -> Option<SmolStr> {
        let a = self.independent.find_by_prefix(prefix);
        let b = self.dependent.find_by_prefix(prefix);
        a.into_iter().chain(b).min()
    }
}

impl<S: ShortcutLookup> ShortcutLookup for LocaleBundle<S> {
    fn find(&self, shortcut: &str) -> Option<SmolStr> {
        self.dependent
            .find(shortcut)
            .or_else(|| self.independent.find(shortcut))
    }

    fn find_by_prefix(&self, prefix: &str) -> Option<SmolStr> {
        self.dependent
            .find_by_prefix(prefix)
            .or_else(|| self.independent.find_by_prefix(prefix))
    }
}
