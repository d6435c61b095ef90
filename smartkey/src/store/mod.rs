//! File-backed word and shortcut stores.
//!
//! Every store is a plain in-memory collection that can be loaded from and
//! saved to a line-oriented text file. A store remembers whether it has been
//! modified since it was last loaded or saved, and [`Persistable::save`] only
//! touches the disk when it has.
//!
//! [`LocaleBundle`] layers a locale-independent store under a
//! locale-dependent one; see its documentation for lookup precedence.
use std::path::Path;

use smol_str::SmolStr;

use crate::error::StoreError;

mod bundle;
pub(crate) mod file;
mod pairs;
mod word_set;

pub use self::bundle::LocaleBundle;
pub(crate) use self::pairs::is_storable;
pub use self::pairs::{Entry, PairStore};
pub use self::word_set::{LineFormat, WordSetStore};

pub trait Persistable: Default {
    type Item;

    /// Replaces the contents with the file at `path`. A missing file leaves
    /// the store empty and uninitialized; on error the store is also empty.
    fn load(&mut self, path: &Path) -> Result<(), StoreError>;

    /// Writes the contents to `path` if modified since the last load or save.
    fn save(&mut self, path: &Path) -> Result<(), StoreError>;

    /// Whether the last load read an actual file.
    fn is_initialized(&self) -> bool;

    fn is_dirty(&self) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn export_all(&self) -> Vec<Self::Item>;
}

pub trait WordLookup {
    fn contains(&self, word: &str) -> bool;

    /// The lexicographically smallest word starting with `prefix`.
    fn find_by_prefix(&self, prefix: &str) -> Option<SmolStr>;
}

pub trait ShortcutLookup {
    fn find(&self, shortcut: &str) -> Option<SmolStr>;

    /// The lexicographically smallest substitution starting with `prefix`.
    fn find_by_prefix(&self, prefix: &str) -> Option<SmolStr>;
}

/// Loads `path` into `store`, keeping it empty if the file cannot be read.
pub(crate) fn load_or_empty<S: Persistable>(store: &mut S, path: &Path) {
    if let Err(e) = store.load(path) {
        log::warn!("{}; continuing with an empty store", e);
    }
}
